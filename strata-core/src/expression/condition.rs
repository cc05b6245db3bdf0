use crate::{Expression, Operator};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combination {
    #[default]
    And,
    Or,
}

impl Combination {
    pub fn operator(&self) -> Operator {
        match self {
            Combination::And => Operator::And,
            Combination::Or => Operator::Or,
        }
    }
}

/// Group of predicates joined by the same logical operator.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ConditionExpression {
    pub combination: Combination,
    pub items: Vec<Expression>,
}

impl ConditionExpression {
    pub fn and() -> Self {
        Self {
            combination: Combination::And,
            items: Vec::new(),
        }
    }
    pub fn or() -> Self {
        Self {
            combination: Combination::Or,
            items: Vec::new(),
        }
    }
    pub fn with(mut self, item: Expression) -> Self {
        self.add(item);
        self
    }
    /// Append a predicate, empty groups are dropped.
    ///
    /// Groups of one member or of the same combination are spliced into this one.
    pub fn add(&mut self, item: Expression) {
        match item {
            Expression::Condition(v) if v.items.is_empty() => {}
            Expression::Condition(v) if v.items.len() == 1 || v.combination == self.combination => {
                v.items.into_iter().for_each(|v| self.add(v));
            }
            v => self.items.push(v),
        }
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    /// The group as an expression, `None` when there is nothing to test.
    pub fn into_expression(mut self) -> Option<Expression> {
        match self.items.len() {
            0 => None,
            1 => self.items.pop(),
            _ => Some(Expression::Condition(self)),
        }
    }
}

impl From<Expression> for ConditionExpression {
    fn from(value: Expression) -> Self {
        match value {
            Expression::Condition(v) => v,
            v => ConditionExpression::and().with(v),
        }
    }
}
