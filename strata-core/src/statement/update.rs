use crate::{
    Assignment, ConditionExpression, ReturningClause, SourceCollection, StatementBase,
    TableIdentifier,
};

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub base: StatementBase,
    pub table: TableIdentifier,
    /// Joined tables, only present when the engine updates several tables at once.
    pub from: SourceCollection,
    pub set: Vec<Assignment>,
    pub condition: ConditionExpression,
    pub returning: Option<ReturningClause>,
}

impl UpdateStatement {
    pub fn new(base: StatementBase, table: TableIdentifier) -> Self {
        Self {
            base,
            table,
            from: SourceCollection::new(),
            set: Vec::new(),
            condition: ConditionExpression::and(),
            returning: None,
        }
    }
    /// Whether the statement writes more than its own table.
    pub fn is_multi_table(&self) -> bool {
        !self.from.is_empty()
    }
}
