use crate::{BuildError, DataType, Expression, Result, Value, same_name};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

impl Direction {
    pub fn is_input(&self) -> bool {
        matches!(self, Direction::Input | Direction::InputOutput)
    }
}

/// Where the value of a parameter comes from at execution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Dotted member path in the write record.
    Data(String),
    /// Member of the row produced by the master statement, the closest one up the plan that
    /// returns a row.
    Master(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterExpression {
    /// Empty until inserted into a collection when anonymous.
    pub name: String,
    pub data_type: DataType,
    pub direction: Direction,
    pub value: Option<Value>,
    pub binding: Option<Binding>,
}

impl ParameterExpression {
    pub fn anonymous(data_type: DataType) -> Self {
        Self {
            name: String::new(),
            data_type,
            direction: Direction::Input,
            value: None,
            binding: None,
        }
    }
    pub fn named(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            ..Self::anonymous(data_type)
        }
    }
    /// Anonymous input parameter carrying a value known at build time.
    pub fn value(value: Value, data_type: DataType) -> Self {
        Self {
            value: Some(value),
            ..Self::anonymous(data_type)
        }
    }
    /// Anonymous input parameter read from the write record once executed.
    pub fn pending(path: impl Into<String>, data_type: DataType) -> Self {
        Self {
            binding: Some(Binding::Data(path.into())),
            ..Self::anonymous(data_type)
        }
    }
    /// Anonymous input parameter read from the master statement row.
    pub fn master(member: impl Into<String>, data_type: DataType) -> Self {
        Self {
            binding: Some(Binding::Master(member.into())),
            ..Self::anonymous(data_type)
        }
    }
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
    pub fn is_pending(&self) -> bool {
        self.value.is_none() && self.binding.is_some()
    }
}

/// Parameters of a statement, ordered by insertion.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ParameterCollection {
    items: Vec<ParameterExpression>,
}

impl ParameterCollection {
    pub fn new() -> Self {
        Default::default()
    }

    /// Insert a parameter and return the expression referencing it.
    ///
    /// Anonymous parameters are named `p<ordinal>`, skipping names already taken.
    pub fn add(&mut self, mut parameter: ParameterExpression) -> Result<Expression> {
        if parameter.is_anonymous() {
            let mut ordinal = self.items.len() + 1;
            parameter.name = loop {
                let name = format!("p{}", ordinal);
                if !self.contains(&name) {
                    break name;
                }
                ordinal += 1;
            };
        } else if self.contains(&parameter.name) {
            return Err(BuildError::DuplicateParameter(parameter.name).into());
        }
        let name = parameter.name.clone();
        self.items.push(parameter);
        Ok(Expression::Parameter(name))
    }
    /// Move the first `count` parameters behind the others, names are kept.
    pub fn defer(&mut self, count: usize) {
        let len = self.items.len();
        self.items.rotate_left(count.min(len));
    }
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
    pub fn get(&self, name: &str) -> Option<&ParameterExpression> {
        self.items.iter().find(|v| same_name(&v.name, name))
    }
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ParameterExpression> {
        self.items.iter_mut().find(|v| same_name(&v.name, name))
    }
    /// One based position, positional placeholders are numbered with it.
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|v| same_name(&v.name, name))
            .map(|v| v + 1)
    }
    pub fn iter(&self) -> impl Iterator<Item = &ParameterExpression> {
        self.items.iter()
    }
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ParameterExpression> {
        self.items.iter_mut()
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parameter ownership of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameters {
    Own(ParameterCollection),
    /// Correlated sub statement, its parameters live in the host collection.
    Host,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters::Own(Default::default())
    }
}

impl Parameters {
    pub fn collection(&self) -> Option<&ParameterCollection> {
        match self {
            Parameters::Own(v) => Some(v),
            Parameters::Host => None,
        }
    }
    pub fn collection_mut(&mut self) -> Option<&mut ParameterCollection> {
        match self {
            Parameters::Own(v) => Some(v),
            Parameters::Host => None,
        }
    }
}
