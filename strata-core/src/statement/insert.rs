use crate::{Expression, FieldIdentifier, ReturningClause, StatementBase, TableIdentifier};

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub base: StatementBase,
    pub table: TableIdentifier,
    pub fields: Vec<FieldIdentifier>,
    /// One `VALUES` row per record, parallel to `fields`.
    pub rows: Vec<Vec<Expression>>,
    pub returning: Option<ReturningClause>,
}

impl InsertStatement {
    pub fn new(base: StatementBase, table: TableIdentifier) -> Self {
        Self {
            base,
            table,
            fields: Vec::new(),
            rows: Vec::new(),
            returning: None,
        }
    }
}
