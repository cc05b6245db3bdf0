use crate::Expression;
use thiserror::Error;

/// Failures raised while turning an access context into a statement plan.
///
/// They are always fatal for the whole plan, no statement is handed to the writer.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("The entity `{0}` does not exist in the metadata")]
    UnknownEntity(String),
    #[error("The command `{0}` does not exist in the metadata")]
    UnknownCommand(String),
    #[error("The member `{member}` does not exist in the `{entity}` entity")]
    UnknownProperty { entity: String, member: String },
    #[error("Cannot resolve the member path `{path}` starting from the `{entity}` entity")]
    UnresolvedPath { entity: String, path: String },
    #[error("The one-to-many member `{path}` of the `{entity}` entity cannot be used {usage}")]
    IllegalNavigation {
        entity: String,
        path: String,
        usage: &'static str,
    },
    #[error("The member `{path}` of the `{entity}` entity is not sortable")]
    NotSortable { entity: String, path: String },
    #[error("The member `{path}` of the `{entity}` entity cannot be used as a grouping key")]
    NotGroupable { entity: String, path: String },
    #[error("The complex member `{path}` of the `{entity}` entity is immutable")]
    ImmutableProperty { entity: String, path: String },
    #[error(
        "Writing the primary key `{path}` of the `{entity}` entity requires the explicit `update_primary_key` option"
    )]
    PrimaryKeyWrite { entity: String, path: String },
    #[error("Missing the value of the primary key `{path}` to update the `{entity}` entity")]
    MissingPrimaryKey { entity: String, path: String },
    #[error("The criteria on `{path}` of the `{entity}` entity is not supported: {detail}")]
    UnsupportedCriteria {
        entity: String,
        path: String,
        detail: String,
    },
    #[error("There is no data to write into the `{0}` entity")]
    EmptyData(String),
    #[error("The parameter `{0}` is already declared in the statement")]
    DuplicateParameter(String),
    #[error("Invalid schema expression at {position}: {message}")]
    InvalidSchema { position: usize, message: String },
}

/// Failures raised while writing a statement, they abort the output of that statement only.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unrecognized expression {0:?}")]
    Unrecognized(Box<Expression>),
    #[error("The dialect `{dialect}` does not support {construct}")]
    Unsupported {
        dialect: &'static str,
        construct: String,
    },
    #[error("The select statement `{alias}` does not have any member to select")]
    EmptySelect { alias: String },
}
