use std::fmt::Write;
use strata_core::{
    Context, DataType, Features, GenericSqlWriter, MethodExpression, Operator, Result,
    SequenceExpression, SequenceMethod, SqlWriter, TableIdentifier, UpsertStatement, fill_slots,
    try_separated_by, unsupported, write_on_conflict,
};

/// SQLite dialect: `:name` placeholders, dynamic column types, `ON CONFLICT` upserts.
#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteSqlWriter {}

impl SqliteSqlWriter {
    pub fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for SqliteSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn features(&self) -> Features {
        Features {
            returning: true,
            multi_table_update: false,
            multi_table_delete: false,
            upsert_returning: true,
        }
    }

    fn capture_with_cte(&self) -> bool {
        false
    }

    fn write_table(&self, context: &mut Context, out: &mut String, value: &TableIdentifier) {
        let name = fill_slots(&value.name, context.slots);
        self.write_identifier_quoted(context, out, &name);
        if !value.alias.is_empty() && self.alias_declaration(context) {
            let _ = write!(out, " AS {}", value.alias);
        }
    }

    fn write_data_type(&self, _context: &mut Context, out: &mut String, value: &DataType) {
        out.push_str(match value {
            DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => "INTEGER",
            DataType::Float32 | DataType::Float64 => "REAL",
            DataType::Decimal(..) => "NUMERIC",
            DataType::Binary(..) => "BLOB",
            DataType::Char(..)
            | DataType::String(..)
            | DataType::AnsiString(..)
            | DataType::Date
            | DataType::Time
            | DataType::DateTime
            | DataType::DateTimeOffset
            | DataType::Guid
            | DataType::List(..) => "TEXT",
        });
    }

    fn write_value_infinity(&self, _context: &mut Context, out: &mut String, negative: bool) {
        if negative {
            out.push('-');
        }
        out.push_str("1.0e+10000");
    }

    fn expression_binary_op(
        &self,
        value: &Operator,
    ) -> Option<(&'static str, &'static str, &'static str, bool, bool)> {
        match value {
            Operator::BitwiseXor => None,
            _ => GenericSqlWriter::new().expression_binary_op(value),
        }
    }

    /// Functions without a direct SQLite counterpart are expanded in place.
    fn write_method(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &MethodExpression,
    ) -> Result<()> {
        match value.name.to_ascii_lowercase().as_str() {
            "now" => {
                out.push_str("CURRENT_TIMESTAMP");
                return Ok(());
            }
            "guid" => {
                out.push_str("LOWER(HEX(RANDOMBLOB(16)))");
                return Ok(());
            }
            _ => {}
        }
        out.push_str(self.function_name(&value.name));
        out.push('(');
        try_separated_by(
            out,
            &value.arguments,
            |out, v| self.write_expression(context, out, v),
            ", ",
        )?;
        out.push(')');
        Ok(())
    }

    fn write_parameter(&self, _context: &mut Context, out: &mut String, name: &str) -> Result<()> {
        out.push(':');
        out.push_str(name);
        Ok(())
    }

    fn write_sequence(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &SequenceExpression,
    ) -> Result<()> {
        match (value.method, value.name.is_empty()) {
            (SequenceMethod::Current, true) => {
                out.push_str("last_insert_rowid()");
                Ok(())
            }
            (_, false) => Err(unsupported(
                self,
                format!("the sequence object `{}`", value.name),
            )),
            (SequenceMethod::Next, true) => Err(unsupported(self, "the next value of an identity")),
        }
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
