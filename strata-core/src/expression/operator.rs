use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Concatenate,
    Negate,
    Not,
    BitwiseNot,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    Assign,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Is,
    IsNot,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    NotBetween,
    Exists,
    NotExists,
    All,
    Any,
    And,
    Or,
}

impl Operator {
    /// Binding strength, lower numbers bind weaker.
    pub fn precedence(&self) -> i32 {
        match self {
            Operator::Or => 100,
            Operator::And => 200,
            Operator::Not => 250,
            Operator::Assign => 300,
            Operator::Equal => 300,
            Operator::NotEqual => 300,
            Operator::LessThan => 300,
            Operator::LessThanOrEqual => 300,
            Operator::GreaterThan => 300,
            Operator::GreaterThanOrEqual => 300,
            Operator::Is => 400,
            Operator::IsNot => 400,
            Operator::Like => 400,
            Operator::NotLike => 400,
            Operator::In => 400,
            Operator::NotIn => 400,
            Operator::Between => 400,
            Operator::NotBetween => 400,
            Operator::BitwiseOr => 500,
            Operator::BitwiseXor => 550,
            Operator::BitwiseAnd => 600,
            Operator::Plus => 800,
            Operator::Minus => 800,
            Operator::Concatenate => 800,
            Operator::Multiply => 900,
            Operator::Divide => 900,
            Operator::Modulo => 900,
            Operator::Negate => 1250,
            Operator::BitwiseNot => 1250,
            Operator::Exists => 1300,
            Operator::NotExists => 1300,
            Operator::All => 1300,
            Operator::Any => 1300,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::Plus => "Plus",
            Operator::Minus => "Minus",
            Operator::Multiply => "Multiply",
            Operator::Divide => "Divide",
            Operator::Modulo => "Modulo",
            Operator::Concatenate => "Concatenate",
            Operator::Negate => "Negate",
            Operator::Not => "Not",
            Operator::BitwiseNot => "BitwiseNot",
            Operator::BitwiseAnd => "BitwiseAnd",
            Operator::BitwiseOr => "BitwiseOr",
            Operator::BitwiseXor => "BitwiseXor",
            Operator::Assign => "Assign",
            Operator::Equal => "Equal",
            Operator::NotEqual => "NotEqual",
            Operator::LessThan => "LessThan",
            Operator::LessThanOrEqual => "LessThanOrEqual",
            Operator::GreaterThan => "GreaterThan",
            Operator::GreaterThanOrEqual => "GreaterThanOrEqual",
            Operator::Is => "Is",
            Operator::IsNot => "IsNot",
            Operator::Like => "Like",
            Operator::NotLike => "NotLike",
            Operator::In => "In",
            Operator::NotIn => "NotIn",
            Operator::Between => "Between",
            Operator::NotBetween => "NotBetween",
            Operator::Exists => "Exists",
            Operator::NotExists => "NotExists",
            Operator::All => "All",
            Operator::Any => "Any",
            Operator::And => "And",
            Operator::Or => "Or",
        })
    }
}
