use std::fmt::Write;
use strata_core::{
    Context, DataType, DeleteStatement, Features, Fragment, GenericSqlWriter, Operator, Result,
    SequenceExpression, SequenceMethod, SqlWriter, UpdateStatement, UpsertStatement, unsupported,
    write_assignments, write_delete, write_on_duplicate_key, write_update,
};

/// MySQL and MariaDB dialect.
///
/// No `RETURNING`, so generated keys are read back with `LAST_INSERT_ID()`. Updates and deletes
/// touching several tables are written as a single joined statement.
#[derive(Default, Debug, Clone, Copy)]
pub struct MySqlSqlWriter {}

impl MySqlSqlWriter {
    pub fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for MySqlSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "mysql"
    }

    fn features(&self) -> Features {
        Features {
            returning: false,
            multi_table_update: true,
            multi_table_delete: true,
            upsert_returning: false,
        }
    }

    fn capture_with_cte(&self) -> bool {
        false
    }

    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(context, out, value, '`', "``");
        out.push('`');
    }

    fn write_data_type(&self, _context: &mut Context, out: &mut String, value: &DataType) {
        match value {
            DataType::Boolean => out.push_str("BOOLEAN"),
            DataType::Int8 => out.push_str("TINYINT"),
            DataType::Int16 => out.push_str("SMALLINT"),
            DataType::Int32 => out.push_str("INTEGER"),
            DataType::Int64 => out.push_str("BIGINT"),
            DataType::UInt8 => out.push_str("TINYINT UNSIGNED"),
            DataType::UInt16 => out.push_str("SMALLINT UNSIGNED"),
            DataType::UInt32 => out.push_str("INTEGER UNSIGNED"),
            DataType::UInt64 => out.push_str("BIGINT UNSIGNED"),
            DataType::Float32 => out.push_str("FLOAT"),
            DataType::Float64 => out.push_str("DOUBLE"),
            DataType::Decimal(precision, scale) => {
                out.push_str("DECIMAL");
                if (precision, scale) != (&0, &0) {
                    let _ = write!(out, "({},{})", precision, scale);
                }
            }
            DataType::Char(length) => {
                let _ = write!(out, "CHAR({})", (*length).max(1));
            }
            DataType::String(length) | DataType::AnsiString(length) => {
                if *length > 0 {
                    let _ = write!(out, "VARCHAR({})", length);
                } else {
                    out.push_str("TEXT");
                }
            }
            DataType::Binary(length) => {
                if *length > 0 {
                    let _ = write!(out, "VARBINARY({})", length);
                } else {
                    out.push_str("BLOB");
                }
            }
            DataType::Date => out.push_str("DATE"),
            DataType::Time => out.push_str("TIME"),
            DataType::DateTime => out.push_str("DATETIME"),
            DataType::DateTimeOffset => out.push_str("DATETIME"),
            DataType::Guid => out.push_str("CHAR(36)"),
            DataType::List(..) => out.push_str("JSON"),
        }
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
            Operator::Concatenate => Some(("CONCAT(", ", ", ")", true, true)),
            _ => GenericSqlWriter::new().expression_binary_op(value),
        }
    }

    fn function_name<'a>(&self, name: &'a str) -> &'a str {
        match name.to_ascii_lowercase().as_str() {
            "guid" => "UUID",
            "length" => "CHAR_LENGTH",
            _ => GenericSqlWriter::new().function_name(name),
        }
    }

    /// Positional `?` placeholder, the values are bound in the order `render_bound` reports.
    fn write_parameter(&self, _context: &mut Context, out: &mut String, _name: &str) -> Result<()> {
        out.push('?');
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
                out.push_str("LAST_INSERT_ID()");
                Ok(())
            }
            (_, false) => Err(unsupported(
                self,
                format!("the sequence object `{}`", value.name),
            )),
            (SequenceMethod::Next, true) => Err(unsupported(self, "the next value of an identity")),
        }
    }

    /// `UPDATE ... JOIN ... SET` when the statement writes joined tables, the targets are then
    /// qualified by their alias.
    fn write_update(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &UpdateStatement,
    ) -> Result<()> {
        if value.returning.as_ref().is_some_and(|v| !v.is_empty()) {
            return Err(unsupported(self, "returning the updated values"));
        }
        if !value.is_multi_table() {
            return write_update(self, context, out, value);
        }
        let mut context = context.switch_fragment(Fragment::SqlUpdate);
        out.push_str("UPDATE ");
        self.write_table(&mut context.current, out, &value.table);
        for join in &value.from {
            out.push('\n');
            self.write_join(&mut context.current, out, join)?;
        }
        {
            let mut context = context.current.switch_fragment(Fragment::SqlUpdateSet);
            out.push_str("\nSET ");
            write_assignments(self, &mut context.current, out, &value.set, true)?;
        }
        if !value.condition.is_empty() {
            let mut context = context.current.switch_fragment(Fragment::SqlUpdateWhere);
            out.push_str("\nWHERE ");
            self.write_condition(&mut context.current, out, &value.condition)?;
        }
        Ok(())
    }

    /// `DELETE t, t1 FROM ... JOIN ...` when the statement removes the rows of joined tables or
    /// picks the rows through joins.
    fn write_delete(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &DeleteStatement,
    ) -> Result<()> {
        if value.targets.is_empty() && value.from.is_empty() {
            return write_delete(self, context, out, value);
        }
        if value.returning.as_ref().is_some_and(|v| !v.is_empty()) {
            return Err(unsupported(self, "returning the deleted values of several tables"));
        }
        let mut context = context.switch_fragment(Fragment::SqlDeleteFrom);
        out.push_str("DELETE ");
        out.push_str(&value.table.alias);
        for target in &value.targets {
            out.push_str(", ");
            out.push_str(target);
        }
        {
            let mut context = context.current.switch_fragment(Fragment::SqlSelectFrom);
            out.push_str("\nFROM ");
            self.write_table(&mut context.current, out, &value.table);
        }
        for join in &value.from {
            out.push('\n');
            self.write_join(&mut context.current, out, join)?;
        }
        if !value.condition.is_empty() {
            let mut context = context.current.switch_fragment(Fragment::SqlDeleteFromWhere);
            out.push_str("\nWHERE ");
            self.write_condition(&mut context.current, out, &value.condition)?;
        }
        Ok(())
    }

    fn write_upsert(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &UpsertStatement,
    ) -> Result<()> {
        write_on_duplicate_key(self, context, out, value)
    }
}
