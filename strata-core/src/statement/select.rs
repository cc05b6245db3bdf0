use crate::{
    ConditionExpression, Expression, Paging, SourceCollection, StatementBase, TableIdentifier,
};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderExpression {
    pub expression: Expression,
    pub descending: bool,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub base: StatementBase,
    /// Missing for selects of pure expressions (like the value of a sequence).
    pub table: Option<TableIdentifier>,
    pub from: SourceCollection,
    pub members: Vec<Expression>,
    pub distinct: bool,
    pub into: Option<TableIdentifier>,
    pub condition: ConditionExpression,
    pub group_by: Vec<Expression>,
    pub having: ConditionExpression,
    pub order_by: Vec<OrderExpression>,
    pub paging: Option<Paging>,
}

impl SelectStatement {
    pub fn new(base: StatementBase, table: TableIdentifier) -> Self {
        Self {
            base,
            table: Some(table),
            ..Default::default()
        }
    }
    /// Select without a FROM clause.
    pub fn values(base: StatementBase, members: Vec<Expression>) -> Self {
        Self {
            base,
            members,
            ..Default::default()
        }
    }
    pub fn member(mut self, member: Expression) -> Self {
        self.members.push(member);
        self
    }
    /// Whether a member is read back with `label`.
    pub fn selects(&self, label: &str) -> bool {
        self.members
            .iter()
            .any(|v| v.label().is_some_and(|v| crate::same_name(v, label)))
    }
    pub fn is_grouped(&self) -> bool {
        !self.group_by.is_empty()
    }
    /// Alias of the primary table.
    pub fn alias(&self) -> &str {
        self.table.as_ref().map(|v| v.alias.as_str()).unwrap_or("")
    }
}

/// Tests whether any row matches, projecting the primary key of the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistStatement {
    pub select: SelectStatement,
}

/// Single aggregate value computed over the filtered rows.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStatement {
    pub select: SelectStatement,
}
