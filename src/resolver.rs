use std::collections::HashMap;
use std::mem;

use crate::error::ResolveError;
use crate::expr::*;
use crate::stmt::*;
use crate::token::Token;

#[derive(Clone, Copy, PartialEq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Clone, Copy, PartialEq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Static scope-analysis pass. Computes, for every variable/assignment/
/// `this`/`super` expression, how many enclosing scopes separate it from
/// its binding, and records that distance in the interpreter's side-table
/// keyed by the expression's id. Also enforces the handful of scope rules
/// that are errors at resolve time rather than at run time.
pub struct Resolver {
    scopes: Vec<HashMap<String, bool>>,
    locals: HashMap<ExprId, usize>,
    current_function: FunctionType,
    current_class: ClassType,
    errors: Vec<ResolveError>,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver {
            scopes: Vec::new(),
            locals: HashMap::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            errors: Vec::new(),
        }
    }

    pub fn resolve(mut self, statements: &[Stmt]) -> (HashMap<ExprId, usize>, Vec<ResolveError>) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
        (self.locals, self.errors)
    }

    fn resolve_stmts(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        stmt.accept(self);
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        expr.accept(self);
    }

    fn resolve_function(&mut self, function: &FunctionData, kind: FunctionType) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&function.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            self.errors.push(ResolveError {
                token: name.clone(),
                message: format!(
                    "A variable is already defined with name '{}' in this scope",
                    name.lexeme
                ),
            });
        }
        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.locals.insert(id, depth);
                return;
            }
        }
        // Not found in any local scope: left unresolved, the interpreter
        // falls back to globals.
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new()
    }
}

impl ExprVisitor<()> for Resolver {
    fn visit_literal(&mut self, _data: &LiteralData) {}

    fn visit_unary(&mut self, data: &UnaryData) {
        self.resolve_expr(&data.right);
    }

    fn visit_binary(&mut self, data: &BinaryData) {
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_logical(&mut self, data: &LogicalData) {
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_grouping(&mut self, data: &GroupingData) {
        self.resolve_expr(&data.expression);
    }

    fn visit_variable(&mut self, data: &VariableData) {
        if let Some(scope) = self.scopes.last() {
            if let Some(false) = scope.get(&data.name.lexeme) {
                self.errors.push(ResolveError {
                    token: data.name.clone(),
                    message: "Cannot read local variable in its own initializer".to_owned(),
                });
            }
        }

        self.resolve_local(data.id, &data.name);
    }

    fn visit_assign(&mut self, data: &AssignData) {
        self.resolve_expr(&data.value);
        self.resolve_local(data.id, &data.name);
    }

    fn visit_call(&mut self, data: &CallData) {
        self.resolve_expr(&data.callee);
        for argument in &data.arguments {
            self.resolve_expr(argument);
        }
    }

    fn visit_get(&mut self, data: &GetData) {
        self.resolve_expr(&data.object);
    }

    fn visit_set(&mut self, data: &SetData) {
        self.resolve_expr(&data.object);
        self.resolve_expr(&data.value);
    }

    fn visit_this(&mut self, data: &ThisData) {
        if self.current_class == ClassType::None {
            self.errors.push(ResolveError {
                token: data.keyword.clone(),
                message: "Cannot use 'this' outside of a class".to_owned(),
            });
            return;
        }

        self.resolve_local(data.id, &data.keyword);
    }

    fn visit_super(&mut self, data: &SuperData) {
        match self.current_class {
            ClassType::Subclass => {}
            ClassType::None => self.errors.push(ResolveError {
                token: data.keyword.clone(),
                message: "Cannot use 'super' outside of a class".to_owned(),
            }),
            ClassType::Class => self.errors.push(ResolveError {
                token: data.keyword.clone(),
                message: "Cannot use 'super' in a class with no superclass".to_owned(),
            }),
        }

        self.resolve_local(data.id, &data.keyword);
    }
}

impl StmtVisitor<()> for Resolver {
    fn visit_expression(&mut self, data: &ExpressionData) {
        self.resolve_expr(&data.expression);
    }

    fn visit_print(&mut self, data: &PrintData) {
        self.resolve_expr(&data.expression);
    }

    fn visit_var(&mut self, data: &VarData) {
        self.declare(&data.name);
        if let Some(initializer) = &data.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&data.name);
    }

    fn visit_block(&mut self, data: &BlockData) {
        self.begin_scope();
        self.resolve_stmts(&data.statements);
        self.end_scope();
    }

    fn visit_if(&mut self, data: &IfData) {
        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.then_branch);
        if let Some(else_branch) = &data.else_branch {
            self.resolve_stmt(else_branch);
        }
    }

    fn visit_while(&mut self, data: &WhileData) {
        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.body);
    }

    fn visit_function(&mut self, data: &std::rc::Rc<FunctionData>) {
        self.declare(&data.name);
        self.define(&data.name);
        self.resolve_function(data, FunctionType::Function);
    }

    fn visit_return(&mut self, data: &ReturnData) {
        if self.current_function == FunctionType::None {
            self.errors.push(ResolveError {
                token: data.keyword.clone(),
                message: "Cannot return from top-level code".to_owned(),
            });
        }

        if let Some(value) = &data.value {
            if self.current_function == FunctionType::Initializer {
                self.errors.push(ResolveError {
                    token: data.keyword.clone(),
                    message: "Cannot return a value from an initializer".to_owned(),
                });
                return;
            }
            self.resolve_expr(value);
        }
    }

    fn visit_class(&mut self, data: &ClassData) {
        let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

        self.declare(&data.name);
        self.define(&data.name);

        if let Some(superclass) = &data.superclass {
            if superclass.name.lexeme == data.name.lexeme {
                self.errors.push(ResolveError {
                    token: superclass.name.clone(),
                    message: "A class cannot inherit from itself".to_owned(),
                });
            }

            self.current_class = ClassType::Subclass;
            self.resolve_local(superclass.id, &superclass.name);

            self.begin_scope();
            self.scopes.last_mut().expect("scope stack not empty").insert("super".to_owned(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().expect("scope stack not empty").insert("this".to_owned(), true);

        for method in &data.methods {
            let kind = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, kind);
        }

        self.end_scope();

        if data.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }
}
