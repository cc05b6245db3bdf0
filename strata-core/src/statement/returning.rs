use crate::{Expression, FieldIdentifier, Image, TableIdentifier};

#[derive(Debug, Clone, PartialEq)]
pub struct ReturningMember {
    pub field: FieldIdentifier,
    pub image: Image,
}

/// Values a write statement hands back, optionally captured into a temporary table.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ReturningClause {
    pub into: Option<TableIdentifier>,
    pub members: Vec<ReturningMember>,
}

impl ReturningClause {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn add(&mut self, field: FieldIdentifier, image: Image) {
        if !self
            .members
            .iter()
            .any(|v| v.field.label() == field.label() && v.image == image)
        {
            self.members.push(ReturningMember { field, image });
        }
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// `field = value` of update and upsert statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub field: FieldIdentifier,
    pub value: Expression,
}

impl Assignment {
    pub fn new(field: FieldIdentifier, value: Expression) -> Self {
        Self { field, value }
    }
}
