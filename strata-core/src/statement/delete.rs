use crate::{
    ConditionExpression, ReturningClause, SourceCollection, StatementBase, TableIdentifier,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub base: StatementBase,
    pub table: TableIdentifier,
    pub from: SourceCollection,
    /// Aliases of the joined tables whose rows are deleted too.
    pub targets: Vec<String>,
    pub condition: ConditionExpression,
    pub returning: Option<ReturningClause>,
}

impl DeleteStatement {
    pub fn new(base: StatementBase, table: TableIdentifier) -> Self {
        Self {
            base,
            table,
            from: SourceCollection::new(),
            targets: Vec::new(),
            condition: ConditionExpression::and(),
            returning: None,
        }
    }
    pub fn is_multi_table(&self) -> bool {
        !self.targets.is_empty()
    }
}
