use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::expr::*;
use crate::function::{FunctionObject, NativeFunction};
use crate::object::Object;
use crate::stmt::*;
use crate::token::Type;

/// Normal statement execution falls through; a `return` statement carries
/// its value up to the nearest enclosing call boundary. Modeled as a plain
/// value instead of a thrown error so that propagating it through blocks
/// and loops is ordinary `match`/`?` control flow.
pub enum Signal {
    Normal,
    Return(Object),
}

/// Walks the AST, holding the current environment, the resolver's
/// expression-depth side-table, and the sink `print`/`print_error` write
/// through (real stdout/stderr in the binary, an in-memory buffer in
/// tests).
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<ExprId, usize>,
    stdout: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(stdout: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));
        install_natives(&globals);

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            stdout,
        }
    }

    pub fn set_locals(&mut self, locals: HashMap<ExprId, usize>) {
        self.locals = locals;
    }

    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        stmt.accept(self)
    }

    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<Signal, RuntimeError> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(Signal::Normal);
        for statement in statements {
            match self.execute(statement) {
                Ok(Signal::Normal) => continue,
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        expr.accept(self)
    }

    fn look_up_variable(&self, id: ExprId, token: &crate::token::Token) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(&distance) => self.environment.borrow().get_at(distance, token),
            None => self.globals.borrow().get(token),
        }
    }

    /// Writes a line to the interpreter's output sink. Used for both
    /// `print` output and diagnostic reporting, so the two share one
    /// stream the way the historical source's `print(...)`-based error
    /// reporting does.
    pub(crate) fn write_line(&mut self, line: &str) {
        let _ = writeln!(self.stdout, "{line}");
    }
}

impl ExprVisitor<Result<Object, RuntimeError>> for Interpreter {
    fn visit_literal(&mut self, data: &LiteralData) -> Result<Object, RuntimeError> {
        Ok(match &data.value {
            crate::literal::Literal::Nil => Object::Nil,
            crate::literal::Literal::Bool(b) => Object::Bool(*b),
            crate::literal::Literal::Number(n) => Object::Number(*n),
            crate::literal::Literal::String(s) => Object::String(s.clone()),
        })
    }

    fn visit_unary(&mut self, data: &UnaryData) -> Result<Object, RuntimeError> {
        let right = self.evaluate(&data.right)?;

        match data.operator.r#type {
            Type::Minus => match right {
                Object::Number(n) => Ok(Object::Number(-n)),
                _ => Err(RuntimeError {
                    token: data.operator.clone(),
                    message: "Operand must be a number".to_owned(),
                }),
            },
            Type::Bang => Ok(Object::Bool(!right.is_truthy())),
            _ => unreachable!("unary operator restricted to '-' and '!' by the parser"),
        }
    }

    fn visit_binary(&mut self, data: &BinaryData) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;

        let number_error = || RuntimeError {
            token: data.operator.clone(),
            message: "Operand must be a number".to_owned(),
        };

        match data.operator.r#type {
            Type::Minus => match (left, right) {
                (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l - r)),
                _ => Err(number_error()),
            },
            Type::Slash => match (left, right) {
                (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l / r)),
                _ => Err(number_error()),
            },
            Type::Star => match (left, right) {
                (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l * r)),
                _ => Err(number_error()),
            },
            Type::Plus => match (left, right) {
                (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l + r)),
                (Object::String(l), Object::String(r)) => Ok(Object::String(l + &r)),
                _ => Err(RuntimeError {
                    token: data.operator.clone(),
                    message: "Operand must be number or strings".to_owned(),
                }),
            },
            Type::Greater => match (left, right) {
                (Object::Number(l), Object::Number(r)) => Ok(Object::Bool(l > r)),
                _ => Err(number_error()),
            },
            Type::GreaterEqual => match (left, right) {
                (Object::Number(l), Object::Number(r)) => Ok(Object::Bool(l >= r)),
                _ => Err(number_error()),
            },
            Type::Less => match (left, right) {
                (Object::Number(l), Object::Number(r)) => Ok(Object::Bool(l < r)),
                _ => Err(number_error()),
            },
            Type::LessEqual => match (left, right) {
                (Object::Number(l), Object::Number(r)) => Ok(Object::Bool(l <= r)),
                _ => Err(number_error()),
            },
            Type::EqualEqual => Ok(Object::Bool(left == right)),
            Type::BangEqual => Ok(Object::Bool(left != right)),
            _ => unreachable!("binary operator type restricted by the parser"),
        }
    }

    fn visit_logical(&mut self, data: &LogicalData) -> Result<Object, RuntimeError> {
        let left = self.evaluate(&data.left)?;

        // Short-circuit: the result is the last-evaluated operand, not a
        // coerced boolean.
        if data.operator.r#type == Type::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(&data.right)
    }

    fn visit_grouping(&mut self, data: &GroupingData) -> Result<Object, RuntimeError> {
        self.evaluate(&data.expression)
    }

    fn visit_variable(&mut self, data: &VariableData) -> Result<Object, RuntimeError> {
        self.look_up_variable(data.id, &data.name)
    }

    fn visit_assign(&mut self, data: &AssignData) -> Result<Object, RuntimeError> {
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.id) {
            Some(&distance) => {
                self.environment.borrow_mut().assign_at(distance, &data.name, value.clone())?;
            }
            None => {
                self.globals.borrow_mut().assign(&data.name, value.clone())?;
            }
        }

        Ok(value)
    }

    fn visit_call(&mut self, data: &CallData) -> Result<Object, RuntimeError> {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let Some(arity) = callee.arity() else {
            return Err(RuntimeError {
                token: data.paren.clone(),
                message: "Can only call functions and classes".to_owned(),
            });
        };

        if arguments.len() != arity {
            return Err(RuntimeError {
                token: data.paren.clone(),
                message: format!("Expected {arity} arguments but got {}", arguments.len()),
            });
        }

        callee.call(self, arguments)
    }

    fn visit_get(&mut self, data: &GetData) -> Result<Object, RuntimeError> {
        let object = self.evaluate(&data.object)?;

        match &object {
            Object::Instance(instance) => instance.borrow().get(&data.name, &object),
            _ => Err(RuntimeError {
                token: data.name.clone(),
                message: "Only instances have properties".to_owned(),
            }),
        }
    }

    fn visit_set(&mut self, data: &SetData) -> Result<Object, RuntimeError> {
        let object = self.evaluate(&data.object)?;

        let Object::Instance(instance) = object else {
            return Err(RuntimeError {
                token: data.name.clone(),
                message: "Only instances have fields".to_owned(),
            });
        };

        let value = self.evaluate(&data.value)?;
        instance.borrow_mut().set(&data.name, value.clone());
        Ok(value)
    }

    fn visit_this(&mut self, data: &ThisData) -> Result<Object, RuntimeError> {
        self.look_up_variable(data.id, &data.keyword)
    }

    fn visit_super(&mut self, data: &SuperData) -> Result<Object, RuntimeError> {
        let distance = *self
            .locals
            .get(&data.id)
            .expect("resolver always records a depth for 'super'");

        let superclass = self.environment.borrow().get_at(distance, &data.keyword)?;
        let Object::Class(superclass) = superclass else {
            unreachable!("'super' always resolves to a class value");
        };

        let this_token = crate::token::Token::from("this");
        let instance = self.environment.borrow().get_at(distance - 1, &this_token)?;

        let Some(method) = superclass.borrow().find_method(&data.method.lexeme) else {
            return Err(RuntimeError {
                token: data.method.clone(),
                message: format!("Undefined property '{}'", data.method.lexeme),
            });
        };

        Ok(Object::Function(Rc::new(method.bind(instance))))
    }
}

impl StmtVisitor<Result<Signal, RuntimeError>> for Interpreter {
    fn visit_expression(&mut self, data: &ExpressionData) -> Result<Signal, RuntimeError> {
        self.evaluate(&data.expression)?;
        Ok(Signal::Normal)
    }

    fn visit_print(&mut self, data: &PrintData) -> Result<Signal, RuntimeError> {
        let value = self.evaluate(&data.expression)?;
        let rendered = value.to_string();
        self.write_line(&rendered);
        Ok(Signal::Normal)
    }

    fn visit_var(&mut self, data: &VarData) -> Result<Signal, RuntimeError> {
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::Nil,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(Signal::Normal)
    }

    fn visit_block(&mut self, data: &BlockData) -> Result<Signal, RuntimeError> {
        let enclosing = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
        self.execute_block(&data.statements, enclosing)
    }

    fn visit_if(&mut self, data: &IfData) -> Result<Signal, RuntimeError> {
        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(Signal::Normal)
        }
    }

    fn visit_while(&mut self, data: &WhileData) -> Result<Signal, RuntimeError> {
        while self.evaluate(&data.condition)?.is_truthy() {
            match self.execute(&data.body)? {
                Signal::Normal => continue,
                signal @ Signal::Return(_) => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }

    fn visit_function(&mut self, data: &Rc<FunctionData>) -> Result<Signal, RuntimeError> {
        let function = FunctionObject::new(Rc::clone(data), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Object::Function(Rc::new(function)));
        Ok(Signal::Normal)
    }

    fn visit_return(&mut self, data: &ReturnData) -> Result<Signal, RuntimeError> {
        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::Nil,
        };
        Ok(Signal::Return(value))
    }

    fn visit_class(&mut self, data: &ClassData) -> Result<Signal, RuntimeError> {
        let superclass = match &data.superclass {
            Some(variable) => {
                let value = self.look_up_variable(variable.id, &variable.name)?;
                match value {
                    Object::Class(class) => Some(class),
                    _ => {
                        return Err(RuntimeError {
                            token: variable.name.clone(),
                            message: "Superclass must be a class".to_owned(),
                        })
                    }
                }
            }
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::Nil);

        let method_env = if let Some(superclass) = &superclass {
            let env = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
            env.borrow_mut().define("super", Object::Class(Rc::clone(superclass)));
            env
        } else {
            Rc::clone(&self.environment)
        };

        let mut methods = HashMap::new();
        for method in &data.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = FunctionObject::new(Rc::clone(method), Rc::clone(&method_env), is_initializer);
            methods.insert(method.name.lexeme.clone(), Rc::new(function));
        }

        let class = Class::new(data.name.lexeme.clone(), superclass, methods);
        self.environment
            .borrow_mut()
            .assign(&data.name, Object::Class(Rc::new(RefCell::new(class))))?;

        Ok(Signal::Normal)
    }
}

fn install_natives(globals: &Rc<RefCell<Environment>>) {
    let mut env = globals.borrow_mut();

    env.define(
        "clock",
        Object::NativeFunction(Rc::new(NativeFunction {
            name: "clock",
            arity: 0,
            function: |_, _| {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .expect("system clock to be after the Unix epoch")
                    .as_secs_f64();
                Ok(Object::Number(now))
            },
        })),
    );

    env.define(
        "getc",
        Object::NativeFunction(Rc::new(NativeFunction {
            name: "getc",
            arity: 0,
            function: |_, _| {
                use std::io::Read;
                let mut byte = [0u8; 1];
                match std::io::stdin().read(&mut byte) {
                    Ok(1) => Ok(Object::Number(byte[0] as f64)),
                    _ => Ok(Object::Number(-1.0)),
                }
            },
        })),
    );

    env.define(
        "chr",
        Object::NativeFunction(Rc::new(NativeFunction {
            name: "chr",
            arity: 1,
            function: |_, args| match &args[0] {
                Object::Number(n) => {
                    let code = *n as u32;
                    match char::from_u32(code) {
                        Some(c) => Ok(Object::String(c.to_string())),
                        None => Err(RuntimeError {
                            token: crate::token::Token::from("chr"),
                            message: format!("'{code}' is not a valid character code"),
                        }),
                    }
                }
                _ => Err(RuntimeError {
                    token: crate::token::Token::from("chr"),
                    message: "Argument to 'chr' must be a number".to_owned(),
                }),
            },
        })),
    );

    env.define(
        "exit",
        Object::NativeFunction(Rc::new(NativeFunction {
            name: "exit",
            arity: 1,
            function: |_, args| match &args[0] {
                Object::Number(n) => std::process::exit(*n as i32),
                _ => Err(RuntimeError {
                    token: crate::token::Token::from("exit"),
                    message: "Argument to 'exit' must be a number".to_owned(),
                }),
            },
        })),
    );

    env.define(
        "print_error",
        Object::NativeFunction(Rc::new(NativeFunction {
            name: "print_error",
            arity: 1,
            function: |_, args| {
                eprintln!("{}", args[0]);
                Ok(Object::Nil)
            },
        })),
    );
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::token::Token;

    fn interpreter() -> Interpreter {
        Interpreter::new(Box::new(Vec::new()))
    }

    #[test]
    fn evaluate_literal() {
        let mut interpreter = interpreter();
        let expr = Expr::Literal(LiteralData { value: crate::literal::Literal::Number(12.0) });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::Number(12.0));
    }

    #[test]
    fn evaluate_unary_negation() {
        let mut interpreter = interpreter();
        let expr = Expr::Unary(UnaryData {
            operator: Token::new(Type::Minus, "-".to_owned(), None, 1),
            right: Box::new(Expr::Literal(LiteralData { value: crate::literal::Literal::Number(12.0) })),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::Number(-12.0));
    }

    #[test]
    fn evaluate_binary_subtraction() {
        let mut interpreter = interpreter();
        let expr = Expr::Binary(BinaryData {
            left: Box::new(Expr::Literal(LiteralData { value: crate::literal::Literal::Number(6.0) })),
            operator: Token::new(Type::Minus, "-".to_owned(), None, 1),
            right: Box::new(Expr::Literal(LiteralData { value: crate::literal::Literal::Number(4.0) })),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::Number(2.0));
    }

    #[test]
    fn evaluate_string_concatenation() {
        let mut interpreter = interpreter();
        let expr = Expr::Binary(BinaryData {
            left: Box::new(Expr::Literal(LiteralData {
                value: crate::literal::Literal::String("Hello, ".to_owned()),
            })),
            operator: Token::new(Type::Plus, "+".to_owned(), None, 1),
            right: Box::new(Expr::Literal(LiteralData {
                value: crate::literal::Literal::String("world".to_owned()),
            })),
        });
        assert_eq!(
            interpreter.evaluate(&expr).unwrap(),
            Object::String("Hello, world".to_owned())
        );
    }

    #[test]
    fn evaluate_string_plus_number_is_a_runtime_error() {
        let mut interpreter = interpreter();
        let expr = Expr::Binary(BinaryData {
            left: Box::new(Expr::Literal(LiteralData {
                value: crate::literal::Literal::String("Hello".to_owned()),
            })),
            operator: Token::new(Type::Plus, "+".to_owned(), None, 1),
            right: Box::new(Expr::Literal(LiteralData { value: crate::literal::Literal::Number(12.0) })),
        });
        assert!(interpreter.evaluate(&expr).is_err());
    }

    #[test]
    fn truthiness_of_nil_and_zero() {
        assert!(!Object::Nil.is_truthy());
        assert!(Object::Number(0.0).is_truthy());
        assert!(Object::String(String::new()).is_truthy());
    }

    #[test]
    fn logical_or_short_circuits_to_left_value() {
        let mut interpreter = interpreter();
        let expr = Expr::Logical(LogicalData {
            left: Box::new(Expr::Literal(LiteralData { value: crate::literal::Literal::Number(1.0) })),
            operator: Token::new(Type::Or, "or".to_owned(), None, 1),
            right: Box::new(Expr::Literal(LiteralData { value: crate::literal::Literal::Bool(false) })),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::Number(1.0));
    }
}
