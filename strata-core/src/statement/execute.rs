use crate::{CommandKind, Expression, StatementBase};

/// Call of a stored procedure or function.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionStatement {
    pub base: StatementBase,
    pub routine: String,
    pub kind: CommandKind,
    pub arguments: Vec<Expression>,
    /// Parameter receiving the value of a function.
    pub result: Option<String>,
}
