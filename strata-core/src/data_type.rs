/// Logical data type of a field or parameter, mapped to a type name by the sql writer.
///
/// A length of zero means unbounded (or dialect default).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Decimal(/* prec: */ u8, /* scale: */ u8),
    Char(u32),
    String(u32),
    AnsiString(u32),
    Binary(u32),
    Date,
    Time,
    DateTime,
    DateTimeOffset,
    Guid,
    List(Box<DataType>),
}

impl DataType {
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            DataType::Char(..) | DataType::String(..) | DataType::AnsiString(..)
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }
}
