use crate::{
    AggregateExpression, AggregateFunction, Combination, ConditionExpression, FieldIdentifier,
    MethodExpression, Operator, SelectStatement, SequenceExpression, SequenceMethod, Value,
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockDelimiter {
    #[default]
    Comma,
    Space,
}

/// Ordered list of expressions, the right hand side of `IN` or a function argument list.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct BlockExpression {
    pub delimiter: BlockDelimiter,
    pub items: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: Operator,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: Operator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// Every node a statement tree can contain.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Value written inline as a literal.
    Constant(Value),
    /// Raw text written as is.
    Literal(String),
    /// `*` or `alias.*`.
    Wildcard(Option<String>),
    Field(FieldIdentifier),
    Variable(String),
    /// Reference to a parameter of the statement (or of its host) by final name.
    Parameter(String),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    /// Bounds of `BETWEEN`.
    Range(Box<Expression>, Box<Expression>),
    Block(BlockExpression),
    Method(MethodExpression),
    Aggregate(AggregateExpression),
    Sequence(SequenceExpression),
    Condition(ConditionExpression),
    Aliased(Box<Expression>, String),
    Select(Box<SelectStatement>),
}

impl Expression {
    pub fn constant(value: impl Into<Value>) -> Self {
        Expression::Constant(value.into())
    }
    pub fn null() -> Self {
        Expression::Constant(Value::Null)
    }
    pub fn literal(value: impl Into<String>) -> Self {
        Expression::Literal(value.into())
    }
    pub fn field(source: impl Into<String>, name: impl Into<String>) -> Self {
        Expression::Field(FieldIdentifier::new(source, name))
    }
    pub fn parameter(name: impl Into<String>) -> Self {
        Expression::Parameter(name.into())
    }
    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn unary(operator: Operator, operand: Expression) -> Self {
        Expression::Unary(UnaryExpression {
            operator,
            operand: operand.into(),
        })
    }
    pub fn binary(operator: Operator, left: Expression, right: Expression) -> Self {
        Expression::Binary(BinaryExpression {
            operator,
            left: left.into(),
            right: right.into(),
        })
    }

    pub fn equal(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::Equal, left, right)
    }
    pub fn not_equal(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::NotEqual, left, right)
    }
    pub fn less_than(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::LessThan, left, right)
    }
    pub fn less_than_or_equal(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::LessThanOrEqual, left, right)
    }
    pub fn greater_than(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::GreaterThan, left, right)
    }
    pub fn greater_than_or_equal(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::GreaterThanOrEqual, left, right)
    }
    pub fn like(left: Expression, right: Expression) -> Self {
        Self::binary(Operator::Like, left, right)
    }
    pub fn is_in(left: Expression, items: Vec<Expression>) -> Self {
        Self::binary(Operator::In, left, Self::block(items))
    }
    pub fn not_in(left: Expression, items: Vec<Expression>) -> Self {
        Self::binary(Operator::NotIn, left, Self::block(items))
    }
    pub fn in_select(left: Expression, select: SelectStatement) -> Self {
        Self::binary(Operator::In, left, Expression::Select(select.into()))
    }
    pub fn between(left: Expression, min: Expression, max: Expression) -> Self {
        Self::binary(
            Operator::Between,
            left,
            Expression::Range(min.into(), max.into()),
        )
    }
    pub fn exists(select: SelectStatement) -> Self {
        Self::unary(Operator::Exists, Expression::Select(select.into()))
    }
    pub fn not_exists(select: SelectStatement) -> Self {
        Self::unary(Operator::NotExists, Expression::Select(select.into()))
    }
    pub fn not(operand: Expression) -> Self {
        Self::unary(Operator::Not, operand)
    }
    pub fn negate(operand: Expression) -> Self {
        Self::unary(Operator::Negate, operand)
    }
    pub fn and(items: Vec<Expression>) -> Self {
        Expression::Condition(ConditionExpression {
            combination: Combination::And,
            items,
        })
    }
    pub fn or(items: Vec<Expression>) -> Self {
        Expression::Condition(ConditionExpression {
            combination: Combination::Or,
            items,
        })
    }

    pub fn block(items: Vec<Expression>) -> Self {
        Expression::Block(BlockExpression {
            delimiter: BlockDelimiter::Comma,
            items,
        })
    }
    pub fn call(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::Method(MethodExpression {
            name: name.into(),
            arguments,
        })
    }
    pub fn aggregate(function: AggregateFunction, argument: Option<Expression>) -> Self {
        Expression::Aggregate(AggregateExpression {
            function,
            distinct: false,
            argument: argument.map(Box::new),
        })
    }
    pub fn count_all() -> Self {
        Self::aggregate(AggregateFunction::Count, None)
    }
    pub fn next_value(sequence: impl Into<String>) -> Self {
        Expression::Sequence(SequenceExpression {
            name: sequence.into(),
            method: SequenceMethod::Next,
        })
    }
    pub fn current_value(sequence: impl Into<String>) -> Self {
        Expression::Sequence(SequenceExpression {
            name: sequence.into(),
            method: SequenceMethod::Current,
        })
    }
    pub fn aliased(self, alias: impl Into<String>) -> Self {
        Expression::Aliased(self.into(), alias.into())
    }

    pub fn is_null_constant(&self) -> bool {
        matches!(self, Expression::Constant(v) if v.is_null())
    }
    pub fn as_field(&self) -> Option<&FieldIdentifier> {
        match self {
            Expression::Field(v) => Some(v),
            Expression::Aliased(v, ..) => v.as_field(),
            _ => None,
        }
    }
    /// Name the expression is read back with when selected.
    pub fn label(&self) -> Option<&str> {
        match self {
            Expression::Field(v) => Some(v.label()),
            Expression::Aliased(.., alias) => Some(alias),
            _ => None,
        }
    }
    /// Visit this node and every node below it, sub statements excluded.
    pub fn walk<'s>(&'s self, f: &mut impl FnMut(&'s Expression)) {
        f(self);
        match self {
            Expression::Unary(v) => v.operand.walk(f),
            Expression::Binary(v) => {
                v.left.walk(f);
                v.right.walk(f);
            }
            Expression::Range(min, max) => {
                min.walk(f);
                max.walk(f);
            }
            Expression::Block(v) => v.items.iter().for_each(|v| v.walk(f)),
            Expression::Method(v) => v.arguments.iter().for_each(|v| v.walk(f)),
            Expression::Aggregate(v) => {
                if let Some(v) = &v.argument {
                    v.walk(f)
                }
            }
            Expression::Condition(v) => v.items.iter().for_each(|v| v.walk(f)),
            Expression::Aliased(v, ..) => v.walk(f),
            _ => {}
        }
    }
}

impl From<FieldIdentifier> for Expression {
    fn from(value: FieldIdentifier) -> Self {
        Expression::Field(value)
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Expression::Constant(value)
    }
}

impl From<ConditionExpression> for Expression {
    fn from(value: ConditionExpression) -> Self {
        Expression::Condition(value)
    }
}
