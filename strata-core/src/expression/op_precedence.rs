use crate::{Expression, Operator, writer::SqlWriter};

/// Provides numeric precedence for expressions allowing sql writers to insert parentheses.
pub trait OpPrecedence {
    /// Lower numbers bind weaker, writers parenthesize when child precedence <= operator precedence.
    fn precedence(&self, writer: &dyn SqlWriter) -> i32;
}

impl<T: OpPrecedence> OpPrecedence for &T {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        (*self).precedence(writer)
    }
}

impl OpPrecedence for Operator {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        writer.expression_operator_precedence(self)
    }
}

impl OpPrecedence for Expression {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        match self {
            Expression::Unary(v) => writer.expression_operator_precedence(&v.operator),
            Expression::Binary(v) => writer.expression_operator_precedence(&v.operator),
            Expression::Range(..) => writer.expression_operator_precedence(&Operator::Between),
            Expression::Condition(v) => match v.items.as_slice() {
                [] => 1_000_000_000,
                [item] => item.precedence(writer),
                _ => writer.expression_operator_precedence(&v.combination.operator()),
            },
            // Sub statements are always parenthesized as operands
            Expression::Select(..) => 0,
            _ => 1_000_000_000,
        }
    }
}
