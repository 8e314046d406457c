use crate::literal::Literal;
use crate::token::Token;

/// Every expression node that can appear as the target of a variable
/// lookup (`Variable`, `Assign`, `This`, `Super`) carries a stable id
/// assigned once at parse time. The resolver keys its depth side-table by
/// this id rather than by the node's syntactic content, so that two
/// textually identical expressions in different places resolve
/// independently.
pub type ExprId = u64;

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralData),
    Unary(UnaryData),
    Binary(BinaryData),
    Logical(LogicalData),
    Grouping(GroupingData),
    Variable(VariableData),
    Assign(AssignData),
    Call(CallData),
    Get(GetData),
    Set(SetData),
    This(ThisData),
    Super(SuperData),
}

#[derive(Debug, Clone)]
pub struct LiteralData {
    pub value: Literal,
}

#[derive(Debug, Clone)]
pub struct UnaryData {
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct BinaryData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct LogicalData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct GroupingData {
    pub expression: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct VariableData {
    pub id: ExprId,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct AssignData {
    pub id: ExprId,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CallData {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct GetData {
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct SetData {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct ThisData {
    pub id: ExprId,
    pub keyword: Token,
}

#[derive(Debug, Clone)]
pub struct SuperData {
    pub id: ExprId,
    pub keyword: Token,
    pub method: Token,
}

/// One method per expression variant, taking its Data struct directly.
pub trait ExprVisitor<T> {
    fn visit_literal(&mut self, data: &LiteralData) -> T;
    fn visit_unary(&mut self, data: &UnaryData) -> T;
    fn visit_binary(&mut self, data: &BinaryData) -> T;
    fn visit_logical(&mut self, data: &LogicalData) -> T;
    fn visit_grouping(&mut self, data: &GroupingData) -> T;
    fn visit_variable(&mut self, data: &VariableData) -> T;
    fn visit_assign(&mut self, data: &AssignData) -> T;
    fn visit_call(&mut self, data: &CallData) -> T;
    fn visit_get(&mut self, data: &GetData) -> T;
    fn visit_set(&mut self, data: &SetData) -> T;
    fn visit_this(&mut self, data: &ThisData) -> T;
    fn visit_super(&mut self, data: &SuperData) -> T;
}

impl Expr {
    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Literal(data) => visitor.visit_literal(data),
            Expr::Unary(data) => visitor.visit_unary(data),
            Expr::Binary(data) => visitor.visit_binary(data),
            Expr::Logical(data) => visitor.visit_logical(data),
            Expr::Grouping(data) => visitor.visit_grouping(data),
            Expr::Variable(data) => visitor.visit_variable(data),
            Expr::Assign(data) => visitor.visit_assign(data),
            Expr::Call(data) => visitor.visit_call(data),
            Expr::Get(data) => visitor.visit_get(data),
            Expr::Set(data) => visitor.visit_set(data),
            Expr::This(data) => visitor.visit_this(data),
            Expr::Super(data) => visitor.visit_super(data),
        }
    }
}

/// Hands out fresh, monotonically increasing expression ids during parsing.
#[derive(Debug, Default)]
pub struct ExprIdGen {
    next: ExprId,
}

impl ExprIdGen {
    pub fn next(&mut self) -> ExprId {
        let id = self.next;
        self.next += 1;
        id
    }
}
