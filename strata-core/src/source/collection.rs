use crate::{JoinClause, JoinKey};

/// Joins of a statement FROM list, the primary table excluded.
///
/// Keys are unique: requesting an existing key returns the clause already registered.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SourceCollection {
    joins: Vec<JoinClause>,
}

impl SourceCollection {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn find(&self, key: &JoinKey) -> Option<&JoinClause> {
        self.joins.iter().find(|v| v.key == *key)
    }
    /// The join registered with `key`, created by `f` when missing. The flag is true when created.
    pub fn get_or_add(
        &mut self,
        key: &JoinKey,
        f: impl FnOnce() -> JoinClause,
    ) -> (&mut JoinClause, bool) {
        match self.joins.iter().position(|v| v.key == *key) {
            Some(i) => (&mut self.joins[i], false),
            None => {
                self.joins.push(f());
                let last = self.joins.len() - 1;
                (&mut self.joins[last], true)
            }
        }
    }
    pub fn iter(&self) -> impl Iterator<Item = &JoinClause> {
        self.joins.iter()
    }
    pub fn len(&self) -> usize {
        self.joins.len()
    }
    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }
}

impl<'a> IntoIterator for &'a SourceCollection {
    type Item = &'a JoinClause;
    type IntoIter = std::slice::Iter<'a, JoinClause>;
    fn into_iter(self) -> Self::IntoIter {
        self.joins.iter()
    }
}
