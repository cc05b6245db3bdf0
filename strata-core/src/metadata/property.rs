use crate::{DataType, Value};

/// A member of an entity: either a scalar field or a navigation to another entity.
#[derive(Debug, Clone)]
pub enum Property {
    Simplex(SimplexProperty),
    Complex(ComplexProperty),
}

impl Property {
    pub fn name(&self) -> &str {
        match self {
            Property::Simplex(v) => &v.name,
            Property::Complex(v) => &v.name,
        }
    }
    pub fn is_simplex(&self) -> bool {
        matches!(self, Property::Simplex(..))
    }
    pub fn as_simplex(&self) -> Option<&SimplexProperty> {
        match self {
            Property::Simplex(v) => Some(v),
            _ => None,
        }
    }
    pub fn as_complex(&self) -> Option<&ComplexProperty> {
        match self {
            Property::Complex(v) => Some(v),
            _ => None,
        }
    }
}

impl From<SimplexProperty> for Property {
    fn from(value: SimplexProperty) -> Self {
        Property::Simplex(value)
    }
}

impl From<ComplexProperty> for Property {
    fn from(value: ComplexProperty) -> Self {
        Property::Complex(value)
    }
}

/// Auto generated values of a field.
///
/// An empty name is the engine built-in identity (auto increment), otherwise it is a named
/// sequence object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub name: String,
    pub seed: i64,
    pub interval: i64,
}

impl Sequence {
    pub fn identity() -> Self {
        Self {
            name: String::new(),
            seed: 1,
            interval: 1,
        }
    }
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seed: 1,
            interval: 1,
        }
    }
    pub fn is_builtin(&self) -> bool {
        self.name.is_empty()
    }
}

/// Scalar entity field.
#[derive(Debug, Clone)]
pub struct SimplexProperty {
    /// Logical member name.
    pub name: String,
    /// Physical column name.
    pub field: String,
    pub data_type: DataType,
    pub nullable: bool,
    /// Immutable fields are never written by updates.
    pub immutable: bool,
    pub sortable: bool,
    pub sequence: Option<Sequence>,
    pub default: Option<Value>,
}

impl SimplexProperty {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        let name = name.into();
        Self {
            field: name.clone(),
            name,
            data_type,
            nullable: true,
            immutable: false,
            sortable: true,
            sequence: None,
            default: None,
        }
    }
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }
    pub fn sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = Some(sequence);
        self
    }
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    ZeroOrOne,
    One,
    Many,
}

/// Pairs a field of the owning entity with a field of the navigated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Member of the entity declaring the navigation.
    pub principal: String,
    /// Member of the foreign entity.
    pub foreign: String,
}

impl Link {
    pub fn new(principal: impl Into<String>, foreign: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            foreign: foreign.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintActor {
    Principal,
    Foreign,
}

/// Fixed value a member must have for the navigation to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub actor: ConstraintActor,
    pub value: Value,
}

/// Navigation property towards another entity.
#[derive(Debug, Clone)]
pub struct ComplexProperty {
    pub name: String,
    /// Name of the foreign entity.
    pub port: String,
    pub multiplicity: Multiplicity,
    pub links: Vec<Link>,
    pub constraints: Vec<Constraint>,
    pub immutable: bool,
}

impl ComplexProperty {
    pub fn new(
        name: impl Into<String>,
        port: impl Into<String>,
        multiplicity: Multiplicity,
    ) -> Self {
        Self {
            name: name.into(),
            port: port.into(),
            multiplicity,
            links: Vec::new(),
            constraints: Vec::new(),
            immutable: false,
        }
    }
    pub fn link(mut self, principal: impl Into<String>, foreign: impl Into<String>) -> Self {
        self.links.push(Link::new(principal, foreign));
        self
    }
    pub fn constraint(
        mut self,
        name: impl Into<String>,
        actor: ConstraintActor,
        value: impl Into<Value>,
    ) -> Self {
        self.constraints.push(Constraint {
            name: name.into(),
            actor,
            value: value.into(),
        });
        self
    }
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }
    pub fn is_one_to_many(&self) -> bool {
        self.multiplicity == Multiplicity::Many
    }
}
