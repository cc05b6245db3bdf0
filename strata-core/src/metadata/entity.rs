use crate::{Property, SimplexProperty, same_name};

/// Metadata of an entity mapped onto one physical table.
///
/// Inheritance is expressed through `base`: every level of the chain stores a disjoint subset of
/// the fields and repeats the primary key.
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    /// Physical table name, may embed `${slot}` placeholders.
    pub table: String,
    pub base: Option<String>,
    /// Names of the primary key members.
    pub key: Vec<String>,
    pub properties: Vec<Property>,
}

impl Entity {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            base: None,
            key: Vec::new(),
            properties: Vec::new(),
        }
    }
    pub fn inherits(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }
    pub fn key<S: Into<String>>(mut self, key: impl IntoIterator<Item = S>) -> Self {
        self.key = key.into_iter().map(Into::into).collect();
        self
    }
    pub fn property(mut self, property: impl Into<Property>) -> Self {
        self.properties.push(property.into());
        self
    }

    /// Property declared by this very entity (ancestors excluded).
    pub fn find(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|v| same_name(v.name(), name))
    }
    pub fn simplex(&self, name: &str) -> Option<&SimplexProperty> {
        self.find(name).and_then(Property::as_simplex)
    }
    pub fn simplex_properties(&self) -> impl Iterator<Item = &SimplexProperty> {
        self.properties.iter().filter_map(Property::as_simplex)
    }
}
