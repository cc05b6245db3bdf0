use crate::{DataType, same_name};
use std::fmt::{self, Display, Formatter};

/// Column of a synthetic table.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

/// Shape of a table that has no entity behind it, like the temporary tables capturing deleted keys.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub fields: Vec<FieldDefinition>,
    pub temporary: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableOrigin {
    /// Name of the entity mapped onto the table.
    Entity(String),
    Definition(TableDefinition),
}

/// Physical table participating in a statement.
#[derive(Debug, Clone)]
pub struct TableIdentifier {
    pub name: String,
    pub alias: String,
    pub origin: TableOrigin,
}

impl TableIdentifier {
    pub fn entity(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: String::new(),
            origin: TableOrigin::Entity(entity.into()),
        }
    }
    pub fn temporary(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            alias: String::new(),
            origin: TableOrigin::Definition(TableDefinition {
                fields,
                temporary: true,
            }),
        }
    }
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }
    pub fn definition(&self) -> Option<&TableDefinition> {
        match &self.origin {
            TableOrigin::Definition(v) => Some(v),
            TableOrigin::Entity(..) => None,
        }
    }
    pub fn is_temporary(&self) -> bool {
        self.definition().is_some_and(|v| v.temporary)
    }
    /// Field of this table, qualified by its alias.
    pub fn field(&self, name: impl Into<String>) -> FieldIdentifier {
        FieldIdentifier::new(&self.alias, name)
    }
}

impl PartialEq for TableIdentifier {
    fn eq(&self, other: &Self) -> bool {
        same_name(&self.name, &other.name)
            && same_name(&self.alias, &other.alias)
            && self.is_temporary() == other.is_temporary()
    }
}

impl Display for TableIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.alias.is_empty() {
            write!(f, " {}", self.alias)?;
        }
        Ok(())
    }
}

/// Column reference.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIdentifier {
    /// Alias of the table or join the field belongs to, empty when unqualified.
    pub source: String,
    pub name: String,
    pub alias: Option<String>,
    /// Member path of the property this field serializes.
    pub token: Option<String>,
}

impl FieldIdentifier {
    pub fn new(source: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
            alias: None,
            token: None,
        }
    }
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self::new("", name)
    }
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
    /// Name the field is read back with: the alias, else the physical name.
    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}
