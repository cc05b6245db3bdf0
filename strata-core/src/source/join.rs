use crate::{ConditionExpression, TableIdentifier};
use std::fmt::{self, Display, Formatter};

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

/// Identity of a join inside a statement, derived from the member path that requested it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinKey {
    /// One-to-one navigation reached by the member path.
    Navigation(String),
    /// Ancestor table of the entity reached by the member path (empty path is the statement entity).
    Inheritance { path: String, entity: String },
}

impl JoinKey {
    pub fn navigation(path: impl Into<String>) -> Self {
        JoinKey::Navigation(path.into().to_lowercase())
    }
    pub fn inheritance(path: impl Into<String>, entity: impl Into<String>) -> Self {
        JoinKey::Inheritance {
            path: path.into().to_lowercase(),
            entity: entity.into().to_lowercase(),
        }
    }
}

impl Display for JoinKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            JoinKey::Navigation(path) => f.write_str(path),
            JoinKey::Inheritance { path, entity } => write!(f, "{}${}", path, entity),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub key: JoinKey,
    pub kind: JoinKind,
    pub target: TableIdentifier,
    /// Combined with `AND`.
    pub on: ConditionExpression,
}

impl JoinClause {
    pub fn new(key: JoinKey, kind: JoinKind, target: TableIdentifier) -> Self {
        Self {
            key,
            kind,
            target,
            on: ConditionExpression::and(),
        }
    }
    pub fn alias(&self) -> &str {
        &self.target.alias
    }
}
