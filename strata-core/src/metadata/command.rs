use crate::{DataType, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Procedure,
    Function,
}

#[derive(Debug, Clone)]
pub struct CommandParameter {
    pub name: String,
    pub data_type: DataType,
    pub direction: Direction,
}

/// Stored procedure or function callable through the execute operation.
#[derive(Debug, Clone)]
pub struct CommandDef {
    pub name: String,
    /// Physical routine name.
    pub routine: String,
    pub kind: CommandKind,
    pub parameters: Vec<CommandParameter>,
}

impl CommandDef {
    pub fn procedure(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            routine: name.clone(),
            name,
            kind: CommandKind::Procedure,
            parameters: Vec::new(),
        }
    }
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            kind: CommandKind::Function,
            ..Self::procedure(name)
        }
    }
    pub fn routine(mut self, routine: impl Into<String>) -> Self {
        self.routine = routine.into();
        self
    }
    pub fn parameter(
        mut self,
        name: impl Into<String>,
        data_type: DataType,
        direction: Direction,
    ) -> Self {
        self.parameters.push(CommandParameter {
            name: name.into(),
            data_type,
            direction,
        });
        self
    }
}
