use crate::{Combination, Value};

/// Comparison requested by the caller, independent of any dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    NotLike,
    Between,
    In,
    NotIn,
    Exists,
    NotExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Not,
}

/// Computed value compared against a member.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Member(String),
    Value(Value),
    Unary(UnaryOperator, Box<Operand>),
    Binary(ArithmeticOperator, Box<Operand>, Box<Operand>),
}

impl Operand {
    pub fn member(path: impl Into<String>) -> Self {
        Operand::Member(path.into())
    }
    pub fn value(value: impl Into<Value>) -> Self {
        Operand::Value(value.into())
    }
    pub fn binary(operator: ArithmeticOperator, left: Operand, right: Operand) -> Self {
        Operand::Binary(operator, left.into(), right.into())
    }
    pub fn add(self, other: Operand) -> Self {
        Self::binary(ArithmeticOperator::Add, self, other)
    }
    pub fn subtract(self, other: Operand) -> Self {
        Self::binary(ArithmeticOperator::Subtract, self, other)
    }
    pub fn multiply(self, other: Operand) -> Self {
        Self::binary(ArithmeticOperator::Multiply, self, other)
    }
    pub fn negate(self) -> Self {
        Operand::Unary(UnaryOperator::Negate, self.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaValue {
    None,
    Value(Value),
    Values(Vec<Value>),
    Range {
        min: Option<Value>,
        max: Option<Value>,
    },
    Operand(Operand),
    /// Nested criteria evaluated against the entity reached by the member, used by `Exists`.
    Criteria(Box<Criteria>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub member: String,
    pub operator: ConditionOperator,
    pub value: CriteriaValue,
}

/// Filter tree supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    Condition(Condition),
    Group {
        combination: Combination,
        items: Vec<Criteria>,
    },
}

impl Criteria {
    pub fn compare(
        member: impl Into<String>,
        operator: ConditionOperator,
        value: CriteriaValue,
    ) -> Self {
        Criteria::Condition(Condition {
            member: member.into(),
            operator,
            value,
        })
    }
    pub fn equal(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(
            member,
            ConditionOperator::Equal,
            CriteriaValue::Value(value.into()),
        )
    }
    pub fn not_equal(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(
            member,
            ConditionOperator::NotEqual,
            CriteriaValue::Value(value.into()),
        )
    }
    pub fn greater_than(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(
            member,
            ConditionOperator::GreaterThan,
            CriteriaValue::Value(value.into()),
        )
    }
    pub fn less_than(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(
            member,
            ConditionOperator::LessThan,
            CriteriaValue::Value(value.into()),
        )
    }
    pub fn like(member: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::compare(
            member,
            ConditionOperator::Like,
            CriteriaValue::Value(pattern.into()),
        )
    }
    pub fn between(
        member: impl Into<String>,
        min: Option<Value>,
        max: Option<Value>,
    ) -> Self {
        Self::compare(
            member,
            ConditionOperator::Between,
            CriteriaValue::Range { min, max },
        )
    }
    pub fn is_in<V: Into<Value>>(
        member: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::compare(
            member,
            ConditionOperator::In,
            CriteriaValue::Values(values.into_iter().map(Into::into).collect()),
        )
    }
    pub fn not_in<V: Into<Value>>(
        member: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::compare(
            member,
            ConditionOperator::NotIn,
            CriteriaValue::Values(values.into_iter().map(Into::into).collect()),
        )
    }
    pub fn exists(member: impl Into<String>, criteria: Option<Criteria>) -> Self {
        Self::compare(
            member,
            ConditionOperator::Exists,
            criteria.map_or(CriteriaValue::None, |v| CriteriaValue::Criteria(v.into())),
        )
    }
    pub fn not_exists(member: impl Into<String>, criteria: Option<Criteria>) -> Self {
        Self::compare(
            member,
            ConditionOperator::NotExists,
            criteria.map_or(CriteriaValue::None, |v| CriteriaValue::Criteria(v.into())),
        )
    }
    pub fn operand(
        member: impl Into<String>,
        operator: ConditionOperator,
        operand: Operand,
    ) -> Self {
        Self::compare(member, operator, CriteriaValue::Operand(operand))
    }
    pub fn and(items: impl IntoIterator<Item = Criteria>) -> Self {
        Criteria::Group {
            combination: Combination::And,
            items: items.into_iter().collect(),
        }
    }
    pub fn or(items: impl IntoIterator<Item = Criteria>) -> Self {
        Criteria::Group {
            combination: Combination::Or,
            items: items.into_iter().collect(),
        }
    }
}
