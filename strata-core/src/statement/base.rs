use crate::{ParameterCollection, Parameters, Statement, Value, slot_names};

/// Late bound placeholder (`${name}`) embedded in a table name.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub name: String,
    pub value: Option<Value>,
}

/// State every statement owns besides its clauses.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct StatementBase {
    /// Identifies the statement in diagnostics, for slaves it is the member path they serve.
    pub alias: String,
    pub parameters: Parameters,
    /// Dependent statements, executed in order after this one.
    pub slaves: Vec<Statement>,
    pub slots: Vec<Slot>,
}

impl StatementBase {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            ..Default::default()
        }
    }
    /// Base of a correlated sub statement, sharing the parameters of its host.
    pub fn hosted(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            parameters: Parameters::Host,
            ..Default::default()
        }
    }
    pub fn collection(&self) -> Option<&ParameterCollection> {
        self.parameters.collection()
    }
    /// Register the slots embedded in a table name.
    pub fn track_slots(&mut self, table: &str) {
        for name in slot_names(table) {
            if !self.slots.iter().any(|v| v.name == name) {
                self.slots.push(Slot {
                    name: name.to_owned(),
                    value: None,
                });
            }
        }
    }
}
