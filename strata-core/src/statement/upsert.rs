use crate::{
    Assignment, ConditionExpression, FieldIdentifier, ReturningClause, StatementBase,
    TableIdentifier,
};

/// Insert or update of a single row, matched on `keys`.
///
/// A key whose value is the `NULL` constant is generated by the engine: it is left out of the
/// inserted columns.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertStatement {
    pub base: StatementBase,
    pub table: TableIdentifier,
    pub keys: Vec<Assignment>,
    pub fields: Vec<Assignment>,
    /// Fields overwritten when the row already exists.
    pub updation: Vec<FieldIdentifier>,
    /// Extra predicate the existing row must satisfy to be updated.
    pub condition: ConditionExpression,
    pub returning: Option<ReturningClause>,
}

impl UpsertStatement {
    pub fn new(base: StatementBase, table: TableIdentifier) -> Self {
        Self {
            base,
            table,
            keys: Vec::new(),
            fields: Vec::new(),
            updation: Vec::new(),
            condition: ConditionExpression::and(),
            returning: None,
        }
    }
    /// Columns of the insert branch with their values.
    pub fn inserted(&self) -> impl Iterator<Item = &Assignment> {
        self.keys
            .iter()
            .filter(|v| !v.value.is_null_constant())
            .chain(self.fields.iter())
    }
}
