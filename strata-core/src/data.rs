use crate::{Value, same_name, split_path};
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Member value of a write record.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Value(Value),
    /// One-to-one navigation.
    Record(Record),
    /// One-to-many navigation.
    Records(Vec<Record>),
}

impl Data {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Data::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Ordered set of named members, the write data handed to insert, update and upsert.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    members: Vec<(String, Data)>,
}

impl Record {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn with(mut self, name: impl Into<String>, data: impl Into<Data>) -> Self {
        self.set(name, data);
        self
    }
    /// Insert or replace a member.
    pub fn set(&mut self, name: impl Into<String>, data: impl Into<Data>) {
        let name = name.into();
        let data = data.into();
        match self.members.iter_mut().find(|(k, _)| same_name(k, &name)) {
            Some(member) => member.1 = data,
            None => self.members.push((name, data)),
        }
    }
    pub fn find(&self, name: &str) -> Option<&Data> {
        self.members
            .iter()
            .find(|(k, _)| same_name(k, name))
            .map(|(_, v)| v)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.find(name).and_then(Data::as_value)
    }
    /// Follow a dotted path through nested records, a numeric segment indexes a list of records
    /// (`Members.0.Name`).
    pub fn resolve(&self, path: &str) -> Option<&Data> {
        match split_path(path) {
            (head, None) => self.find(head),
            (head, Some(tail)) => match self.find(head)? {
                Data::Record(record) => record.resolve(tail),
                Data::Records(records) => {
                    let (index, tail) = split_path(tail);
                    let record = records.get(index.parse::<usize>().ok()?)?;
                    match tail {
                        Some(tail) => record.resolve(tail),
                        None => None,
                    }
                }
                _ => None,
            },
        }
    }
    /// Set the value at a dotted path, creating the missing one-to-one records along the way.
    ///
    /// Returns whether the value was stored.
    pub fn assign(&mut self, path: &str, value: Value) -> bool {
        let (head, Some(tail)) = split_path(path) else {
            self.set(path, value);
            return true;
        };
        match self.members.iter_mut().find(|(k, _)| same_name(k, head)) {
            Some((_, Data::Record(record))) => record.assign(tail, value),
            Some((_, Data::Records(records))) => {
                let (index, tail) = split_path(tail);
                match (index.parse::<usize>().ok(), tail) {
                    (Some(index), Some(tail)) => records
                        .get_mut(index)
                        .is_some_and(|v| v.assign(tail, value)),
                    _ => false,
                }
            }
            Some(..) => false,
            None => {
                let mut record = Record::new();
                let result = record.assign(tail, value);
                self.members.push((head.to_owned(), Data::Record(record)));
                result
            }
        }
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Data)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl From<Value> for Data {
    fn from(value: Value) -> Self {
        Data::Value(value)
    }
}

impl From<Record> for Data {
    fn from(value: Record) -> Self {
        Data::Record(value)
    }
}

impl From<Vec<Record>> for Data {
    fn from(value: Vec<Record>) -> Self {
        Data::Records(value)
    }
}

macro_rules! impl_data_from {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for Data {
                fn from(value: $source) -> Self {
                    Data::Value(value.into())
                }
            }
        )+
    };
}

impl_data_from!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    &str,
    String,
    Decimal,
    Date,
    Time,
    PrimitiveDateTime,
    OffsetDateTime,
    Uuid,
);
