use crate::expr::*;

/// Renders an expression as parenthesized prefix notation, e.g. `(+ 1 2)`.
/// A debugging aid; never used on the execution path.
macro_rules! parenthesize {
    ( $self:ident, $name:expr, $( $x:expr ),+ ) => {
        {
            let mut string = String::new();
            string += "(";
            string += $name;
            $(
                string += " ";
                string += &$x.accept($self);
            )*
            string += ")";
            string
        }
    };
}

pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }
}

impl ExprVisitor<String> for AstPrinter {
    fn visit_literal(&mut self, data: &LiteralData) -> String {
        data.value.to_string()
    }

    fn visit_unary(&mut self, data: &UnaryData) -> String {
        parenthesize!(self, &data.operator.lexeme, &data.right)
    }

    fn visit_binary(&mut self, data: &BinaryData) -> String {
        parenthesize!(self, &data.operator.lexeme, &data.left, &data.right)
    }

    fn visit_logical(&mut self, data: &LogicalData) -> String {
        parenthesize!(self, &data.operator.lexeme, &data.left, &data.right)
    }

    fn visit_grouping(&mut self, data: &GroupingData) -> String {
        parenthesize!(self, "group", &data.expression)
    }

    fn visit_variable(&mut self, data: &VariableData) -> String {
        data.name.lexeme.clone()
    }

    fn visit_assign(&mut self, data: &AssignData) -> String {
        parenthesize!(self, &format!("= {}", data.name.lexeme), &data.value)
    }

    fn visit_call(&mut self, data: &CallData) -> String {
        let mut string = data.callee.accept(self);
        string += "(";
        string += &data
            .arguments
            .iter()
            .map(|arg| arg.accept(self))
            .collect::<Vec<_>>()
            .join(" ");
        string += ")";
        string
    }

    fn visit_get(&mut self, data: &GetData) -> String {
        format!("(. {} {})", data.object.accept(self), data.name.lexeme)
    }

    fn visit_set(&mut self, data: &SetData) -> String {
        format!(
            "(= (. {} {}) {})",
            data.object.accept(self),
            data.name.lexeme,
            data.value.accept(self)
        )
    }

    fn visit_this(&mut self, _data: &ThisData) -> String {
        "this".to_owned()
    }

    fn visit_super(&mut self, data: &SuperData) -> String {
        format!("(super {})", data.method.lexeme)
    }
}
