use std::rc::Rc;

use crate::expr::Expr;
use crate::token::Token;

#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(ExpressionData),
    Print(PrintData),
    Var(VarData),
    Block(BlockData),
    If(IfData),
    While(WhileData),
    Function(Rc<FunctionData>),
    Return(ReturnData),
    Class(ClassData),
}

#[derive(Debug, Clone)]
pub struct ExpressionData {
    pub expression: Expr,
}

#[derive(Debug, Clone)]
pub struct PrintData {
    pub expression: Expr,
}

#[derive(Debug, Clone)]
pub struct VarData {
    pub name: Token,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct BlockData {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct IfData {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct WhileData {
    pub condition: Expr,
    pub body: Box<Stmt>,
}

/// Shared behind `Rc` so every closure/bound-method value derived from one
/// declaration points at the same body instead of re-cloning it.
#[derive(Debug)]
pub struct FunctionData {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct ReturnData {
    pub keyword: Token,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct ClassData {
    pub name: Token,
    pub superclass: Option<crate::expr::VariableData>,
    pub methods: Vec<Rc<FunctionData>>,
}

pub trait StmtVisitor<T> {
    fn visit_expression(&mut self, data: &ExpressionData) -> T;
    fn visit_print(&mut self, data: &PrintData) -> T;
    fn visit_var(&mut self, data: &VarData) -> T;
    fn visit_block(&mut self, data: &BlockData) -> T;
    fn visit_if(&mut self, data: &IfData) -> T;
    fn visit_while(&mut self, data: &WhileData) -> T;
    fn visit_function(&mut self, data: &Rc<FunctionData>) -> T;
    fn visit_return(&mut self, data: &ReturnData) -> T;
    fn visit_class(&mut self, data: &ClassData) -> T;
}

impl Stmt {
    pub fn accept<T>(&self, visitor: &mut dyn StmtVisitor<T>) -> T {
        match self {
            Stmt::Expression(data) => visitor.visit_expression(data),
            Stmt::Print(data) => visitor.visit_print(data),
            Stmt::Var(data) => visitor.visit_var(data),
            Stmt::Block(data) => visitor.visit_block(data),
            Stmt::If(data) => visitor.visit_if(data),
            Stmt::While(data) => visitor.visit_while(data),
            Stmt::Function(data) => visitor.visit_function(data),
            Stmt::Return(data) => visitor.visit_return(data),
            Stmt::Class(data) => visitor.visit_class(data),
        }
    }
}
