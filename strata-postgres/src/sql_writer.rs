use std::fmt::Write;
use strata_core::{
    Context, DataType, Expression, Features, GenericSqlWriter, Operator, RenderError, Result,
    SequenceExpression, SequenceMethod, SqlWriter, UpsertStatement, unsupported,
    write_on_conflict,
};

/// PostgreSQL dialect: `$n` placeholders, `ON CONFLICT` upserts and `RETURNING` everywhere.
#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresSqlWriter {}

impl PostgresSqlWriter {
    pub fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for PostgresSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "postgres"
    }

    fn features(&self) -> Features {
        Features {
            returning: true,
            multi_table_update: false,
            multi_table_delete: false,
            upsert_returning: true,
        }
    }

    fn write_data_type(&self, context: &mut Context, out: &mut String, value: &DataType) {
        match value {
            DataType::Boolean => out.push_str("BOOLEAN"),
            DataType::Int8 => out.push_str("SMALLINT"),
            DataType::Int16 => out.push_str("SMALLINT"),
            DataType::Int32 => out.push_str("INTEGER"),
            DataType::Int64 => out.push_str("BIGINT"),
            DataType::UInt8 => out.push_str("SMALLINT"),
            DataType::UInt16 => out.push_str("INTEGER"),
            DataType::UInt32 => out.push_str("BIGINT"),
            DataType::UInt64 => out.push_str("NUMERIC(19)"),
            DataType::Float32 => out.push_str("REAL"),
            DataType::Float64 => out.push_str("DOUBLE PRECISION"),
            DataType::Decimal(precision, scale) => {
                out.push_str("NUMERIC");
                if (precision, scale) != (&0, &0) {
                    let _ = write!(out, "({},{})", precision, scale);
                }
            }
            DataType::Char(length) => {
                let _ = write!(out, "CHARACTER({})", (*length).max(1));
            }
            DataType::String(length) | DataType::AnsiString(length) => {
                if *length > 0 {
                    let _ = write!(out, "VARCHAR({})", length);
                } else {
                    out.push_str("TEXT");
                }
            }
            DataType::Binary(..) => out.push_str("BYTEA"),
            DataType::Date => out.push_str("DATE"),
            DataType::Time => out.push_str("TIME"),
            DataType::DateTime => out.push_str("TIMESTAMP"),
            DataType::DateTimeOffset => out.push_str("TIMESTAMP WITH TIME ZONE"),
            DataType::Guid => out.push_str("UUID"),
            DataType::List(inner) => {
                self.write_data_type(context, out, inner);
                out.push_str("[]");
            }
        }
    }

    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push_str("'\\x");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    fn expression_binary_op(
        &self,
        value: &Operator,
    ) -> Option<(&'static str, &'static str, &'static str, bool, bool)> {
        match value {
            Operator::BitwiseXor => Some(("", " # ", "", false, false)),
            _ => GenericSqlWriter::new().expression_binary_op(value),
        }
    }

    /// Positional `$n` placeholder, numbered after the parameter collection of the statement.
    fn write_parameter(&self, context: &mut Context, out: &mut String, name: &str) -> Result<()> {
        let Some(ordinal) = context.parameters.and_then(|v| v.ordinal(name)) else {
            return Err(
                RenderError::Unrecognized(Box::new(Expression::Parameter(name.to_owned()))).into(),
            );
        };
        let _ = write!(out, "${}", ordinal);
        Ok(())
    }

    fn write_sequence(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &SequenceExpression,
    ) -> Result<()> {
        match (value.method, value.name.is_empty()) {
            (SequenceMethod::Next, false) => {
                out.push_str("nextval(");
                self.write_value_string(context, out, &value.name);
                out.push(')');
            }
            (SequenceMethod::Current, false) => {
                out.push_str("currval(");
                self.write_value_string(context, out, &value.name);
                out.push(')');
            }
            (SequenceMethod::Current, true) => out.push_str("lastval()"),
            (SequenceMethod::Next, true) => {
                return Err(unsupported(self, "the next value of an identity"));
            }
        }
        Ok(())
    }

    fn write_upsert(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &UpsertStatement,
    ) -> Result<()> {
        write_on_conflict(self, context, out, value)
    }
}
