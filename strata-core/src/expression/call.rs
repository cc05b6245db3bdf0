use crate::{DataType, Expression};
use std::fmt::{self, Display, Formatter};

/// Call of a logical function, mapped to the engine name by the writer.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodExpression {
    pub name: String,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Sum,
    Average,
    Maximum,
    Minimum,
    Deviation,
    DeviationPopulation,
    Variance,
    VariancePopulation,
}

impl Display for AggregateFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregateFunction::Count => "Count",
            AggregateFunction::Sum => "Sum",
            AggregateFunction::Average => "Average",
            AggregateFunction::Maximum => "Maximum",
            AggregateFunction::Minimum => "Minimum",
            AggregateFunction::Deviation => "Deviation",
            AggregateFunction::DeviationPopulation => "DeviationPopulation",
            AggregateFunction::Variance => "Variance",
            AggregateFunction::VariancePopulation => "VariancePopulation",
        })
    }
}

impl AggregateFunction {
    /// Type of the computed value, `argument` is the type of the aggregated member.
    pub fn data_type(&self, argument: Option<&DataType>) -> DataType {
        match (self, argument) {
            (AggregateFunction::Count, _) => DataType::Int64,
            (AggregateFunction::Sum, Some(v)) if v.is_integer() => DataType::Int64,
            (AggregateFunction::Sum, Some(v)) if matches!(v, DataType::Decimal(..)) => v.clone(),
            (AggregateFunction::Maximum | AggregateFunction::Minimum, Some(v)) => v.clone(),
            _ => DataType::Float64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateExpression {
    pub function: AggregateFunction,
    pub distinct: bool,
    /// Missing argument means `*`.
    pub argument: Option<Box<Expression>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceMethod {
    Next,
    Current,
}

/// Value of a sequence, an empty name is the engine identity of the last insert.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceExpression {
    pub name: String,
    pub method: SequenceMethod,
}
