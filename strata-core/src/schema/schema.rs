use crate::{Paging, Sorting, same_name};

/// Projection tree requested by the caller.
///
/// A member naming a navigation carries the schema of the navigated entity; a missing child schema
/// selects every simplex member of it.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Schema {
    /// Every simplex member, besides the listed ones.
    pub wildcard: bool,
    pub members: Vec<SchemaMember>,
    pub excluded: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaMember {
    pub name: String,
    pub schema: Option<Schema>,
    /// Only meaningful on one-to-many members.
    pub paging: Option<Paging>,
    pub sorting: Vec<Sorting>,
}

impl Schema {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn all() -> Self {
        Self {
            wildcard: true,
            ..Default::default()
        }
    }
    /// Add a member, a dotted name nests it under its navigation.
    pub fn with(mut self, member: impl Into<SchemaMember>) -> Self {
        self.add(member.into());
        self
    }
    pub fn without(mut self, name: impl Into<String>) -> Self {
        self.excluded.push(name.into());
        self
    }
    pub fn add(&mut self, member: SchemaMember) {
        if let Some((head, tail)) = member
            .name
            .split_once('.')
            .map(|(h, t)| (h.to_owned(), t.to_owned()))
        {
            let nested = SchemaMember {
                name: tail,
                ..member
            };
            match self.members.iter_mut().find(|v| same_name(&v.name, &head)) {
                Some(parent) => parent.schema.get_or_insert_with(Schema::new).add(nested),
                None => self.members.push(SchemaMember {
                    name: head,
                    schema: Some(Schema::new().with(nested)),
                    paging: None,
                    sorting: Vec::new(),
                }),
            }
            return;
        }
        match self
            .members
            .iter_mut()
            .find(|v| same_name(&v.name, &member.name))
        {
            Some(current) => *current = member,
            None => self.members.push(member),
        }
    }
    pub fn member(&self, name: &str) -> Option<&SchemaMember> {
        self.members.iter().find(|v| same_name(&v.name, name))
    }
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|v| same_name(v, name))
    }
    pub fn is_empty(&self) -> bool {
        !self.wildcard && self.members.is_empty()
    }
}

impl SchemaMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            paging: None,
            sorting: Vec::new(),
        }
    }
    pub fn children(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }
    pub fn paging(mut self, paging: Paging) -> Self {
        self.paging = Some(paging);
        self
    }
    pub fn sort(mut self, sorting: Sorting) -> Self {
        self.sorting.push(sorting);
        self
    }
}

impl From<&str> for SchemaMember {
    fn from(value: &str) -> Self {
        SchemaMember::new(value)
    }
}

impl From<String> for SchemaMember {
    fn from(value: String) -> Self {
        SchemaMember::new(value)
    }
}
