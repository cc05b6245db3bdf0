use crate::{
    AggregateExpression, AggregateFunction, BinaryExpression, BlockDelimiter, BlockExpression,
    ConditionExpression, DataType, DeleteStatement, Error, ExecutionStatement, Expression,
    Features, FieldIdentifier, Image, InsertStatement, JoinClause, JoinKind, MethodExpression,
    OpPrecedence, Operator, Paging, RenderError, Result, ReturningClause, ReturningMember,
    SelectStatement, SequenceExpression, SequenceMethod, Statement, TableIdentifier,
    UnaryExpression, UpdateStatement, UpsertStatement, Value, fill_slots, possibly_parenthesized,
    separated_by, try_separated_by,
    writer::{self, Context, Fragment},
};
use std::{
    cell::RefCell,
    fmt::{Display, Write},
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $context:ident,$out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $this.write_value_infinity($context, $out, $value.is_sign_negative());
        } else if $value.is_nan() {
            $this.write_value_nan($context, $out);
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// Error for a construct the dialect cannot express.
pub fn unsupported(writer: &dyn SqlWriter, construct: impl Display) -> Error {
    RenderError::Unsupported {
        dialect: writer.name(),
        construct: construct.to_string(),
    }
    .into()
}

/// Dialect printer converting statement trees into concrete SQL strings.
///
/// Every method has a default producing ANSI SQL close to PostgreSQL, dialects override what differs.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Name of the dialect used in diagnostics.
    fn name(&self) -> &'static str {
        "generic"
    }

    /// Capabilities of the engine, to be passed into the access contexts.
    fn features(&self) -> Features {
        Features {
            returning: true,
            multi_table_update: false,
            multi_table_delete: false,
            upsert_returning: false,
        }
    }

    /// Whether deleted rows are captured by a data modifying common table expression, otherwise
    /// they are selected into the temporary table before the delete.
    fn capture_with_cte(&self) -> bool {
        true
    }

    /// Whether the current fragment context allows alias declaration.
    fn alias_declaration(&self, context: &mut Context) -> bool {
        matches!(
            context.fragment,
            Fragment::SqlSelectFrom
                | Fragment::SqlJoin
                | Fragment::SqlUpdate
                | Fragment::SqlDeleteFrom
                | Fragment::SqlMerge
        )
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &str,
        search: char,
        replace: &str,
    ) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(context, out, value, '"', "\"\"");
        out.push('"');
    }

    /// Render a table with its alias where the context declares aliases.
    fn write_table(&self, context: &mut Context, out: &mut String, value: &TableIdentifier) {
        let name = fill_slots(&value.name, context.slots);
        self.write_identifier_quoted(context, out, &name);
        if !value.alias.is_empty() && self.alias_declaration(context) {
            let _ = write!(out, " {}", value.alias);
        }
    }

    /// Render a column qualified by the alias of its source.
    fn write_field(&self, context: &mut Context, out: &mut String, value: &FieldIdentifier) {
        if context.qualify_columns && !value.source.is_empty() {
            out.push_str(&value.source);
            out.push('.');
        }
        self.write_identifier_quoted(context, out, &value.name);
        if context.fragment == Fragment::SqlSelect
            && let Some(alias) = &value.alias
        {
            out.push_str(" AS ");
            self.write_identifier_quoted(context, out, alias);
        }
    }

    /// Render the type name of a column or a parameter.
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
            DataType::UInt64 => out.push_str("NUMERIC(20)"),
            DataType::Float32 => out.push_str("REAL"),
            DataType::Float64 => out.push_str("DOUBLE PRECISION"),
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
                out.push_str("VARCHAR");
                if *length > 0 {
                    let _ = write!(out, "({})", length);
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
            DataType::DateTime => out.push_str("TIMESTAMP"),
            DataType::DateTimeOffset => out.push_str("TIMESTAMP WITH TIME ZONE"),
            DataType::Guid => out.push_str("UUID"),
            DataType::List(inner) => {
                self.write_data_type(context, out, inner);
                out.push_str("[]");
            }
        }
    }

    /// Render a concrete value (including proper quoting / escaping).
    fn write_value(&self, context: &mut Context, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(context, out),
            Value::Boolean(Some(v)) => self.write_value_bool(context, out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, context, out, *v),
            Value::Float64(Some(v)) => write_float!(self, context, out, *v),
            Value::Decimal(Some(v), ..) => drop(write!(out, "{}", v)),
            Value::Varchar(Some(v)) => self.write_value_string(context, out, v),
            Value::Blob(Some(v)) => self.write_value_blob(context, out, v.as_ref()),
            Value::Date(Some(v)) => self.write_value_date(context, out, v, false),
            Value::Time(Some(v)) => self.write_value_time(context, out, v, false),
            Value::Timestamp(Some(v)) => self.write_value_timestamp(context, out, v),
            Value::TimestampWithTimezone(Some(v)) => self.write_value_timestamptz(context, out, v),
            Value::Uuid(Some(v)) => drop(write!(out, "'{}'", v)),
            Value::List(Some(v), ..) => self.write_value_list(context, out, v),
            _ => {
                log::error!("Cannot write {:?}", value);
            }
        };
    }

    /// Render NULL literal.
    fn write_value_none(&self, _context: &mut Context, out: &mut String) {
        out.push_str("NULL");
    }

    /// Render boolean literal.
    fn write_value_bool(&self, _context: &mut Context, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    /// Render +/- INF via CAST for dialect portability.
    fn write_value_infinity(&self, context: &mut Context, out: &mut String, negative: bool) {
        let mut buffer = ryu::Buffer::new();
        out.push_str("CAST('");
        out.push_str(buffer.format(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        }));
        out.push_str("' AS ");
        self.write_data_type(context, out, &DataType::Float64);
        out.push(')');
    }

    /// Render NaN via CAST for dialect portability.
    fn write_value_nan(&self, context: &mut Context, out: &mut String) {
        out.push_str("CAST('NaN' AS ");
        self.write_data_type(context, out, &DataType::Float64);
        out.push(')');
    }

    /// Render and escape a string literal using single quotes.
    fn write_value_string(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(context, out, value, '\'', "''");
        out.push('\'');
    }

    /// Render a blob literal in hexadecimal notation.
    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    /// Render a DATE literal (optionally as part of TIMESTAMP composition).
    fn write_value_date(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &Date,
        timestamp: bool,
    ) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:04}-{:02}-{:02}{b}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    /// Render a TIME literal (optionally as part of TIMESTAMP composition).
    fn write_value_time(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &Time,
        timestamp: bool,
    ) {
        let mut subsecond = value.nanosecond();
        let mut width = 9;
        while width > 1 && subsecond % 10 == 0 {
            subsecond /= 10;
            width -= 1;
        }
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:02}:{:02}:{:02}.{:0width$}{b}",
            value.hour(),
            value.minute(),
            value.second(),
            subsecond
        );
    }

    /// Render a TIMESTAMP literal.
    fn write_value_timestamp(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &PrimitiveDateTime,
    ) {
        out.push('\'');
        self.write_value_date(context, out, &value.date(), true);
        out.push('T');
        self.write_value_time(context, out, &value.time(), true);
        out.push('\'');
    }

    /// Render a TIMESTAMPTZ literal.
    fn write_value_timestamptz(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &OffsetDateTime,
    ) {
        let date_time = value.to_utc();
        self.write_value_timestamp(
            context,
            out,
            &PrimitiveDateTime::new(date_time.date(), date_time.time()),
        );
    }

    /// Render list literal.
    fn write_value_list(&self, context: &mut Context, out: &mut String, value: &[Value]) {
        out.push('[');
        separated_by(
            out,
            value,
            |out, v| {
                self.write_value(context, out, v);
            },
            ",",
        );
        out.push(']');
    }

    /// Precedence table of the operators.
    fn expression_operator_precedence(&self, value: &Operator) -> i32 {
        value.precedence()
    }

    /// Symbol written before the operand of a unary operator, `None` when not supported.
    fn expression_unary_op(&self, value: &Operator) -> Option<&'static str> {
        Some(match value {
            Operator::Not => "NOT ",
            Operator::Negate => "-",
            Operator::BitwiseNot => "~",
            Operator::Exists => "EXISTS ",
            Operator::NotExists => "NOT EXISTS ",
            Operator::All => "ALL ",
            Operator::Any => "ANY ",
            _ => return None,
        })
    }

    /// Prefix, infix, suffix of a binary operator and whether each operand is already enclosed.
    /// `None` when the dialect does not support the operator.
    fn expression_binary_op(
        &self,
        value: &Operator,
    ) -> Option<(&'static str, &'static str, &'static str, bool, bool)> {
        Some(match value {
            Operator::Multiply => ("", " * ", "", false, false),
            Operator::Divide => ("", " / ", "", false, false),
            Operator::Modulo => ("", " % ", "", false, false),
            Operator::Plus => ("", " + ", "", false, false),
            Operator::Minus => ("", " - ", "", false, false),
            Operator::Concatenate => ("", " || ", "", false, false),
            Operator::BitwiseAnd => ("", " & ", "", false, false),
            Operator::BitwiseOr => ("", " | ", "", false, false),
            Operator::BitwiseXor => ("", " ^ ", "", false, false),
            Operator::Assign => ("", " = ", "", false, false),
            Operator::Equal => ("", " = ", "", false, false),
            Operator::NotEqual => ("", " != ", "", false, false),
            Operator::LessThan => ("", " < ", "", false, false),
            Operator::LessThanOrEqual => ("", " <= ", "", false, false),
            Operator::GreaterThan => ("", " > ", "", false, false),
            Operator::GreaterThanOrEqual => ("", " >= ", "", false, false),
            Operator::Is => ("", " IS ", "", false, false),
            Operator::IsNot => ("", " IS NOT ", "", false, false),
            Operator::Like => ("", " LIKE ", "", false, false),
            Operator::NotLike => ("", " NOT LIKE ", "", false, false),
            Operator::In => ("", " IN (", ")", false, true),
            Operator::NotIn => ("", " NOT IN (", ")", false, true),
            Operator::Between => ("", " BETWEEN ", "", false, true),
            Operator::NotBetween => ("", " NOT BETWEEN ", "", false, true),
            Operator::And => ("", " AND ", "", false, false),
            Operator::Or => ("", " OR ", "", false, false),
            _ => return None,
        })
    }

    /// Engine name of a logical function.
    fn function_name<'a>(&self, name: &'a str) -> &'a str {
        match name.to_ascii_lowercase().as_str() {
            "now" => "NOW",
            "guid" => "GEN_RANDOM_UUID",
            "coalesce" => "COALESCE",
            "length" => "LENGTH",
            "lower" => "LOWER",
            "upper" => "UPPER",
            "trim" => "TRIM",
            "abs" => "ABS",
            "round" => "ROUND",
            _ => name,
        }
    }

    /// Engine name of an aggregate function.
    fn aggregate_function_name(&self, value: &AggregateFunction) -> &'static str {
        match value {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Average => "AVG",
            AggregateFunction::Maximum => "MAX",
            AggregateFunction::Minimum => "MIN",
            AggregateFunction::Deviation => "STDDEV_SAMP",
            AggregateFunction::DeviationPopulation => "STDDEV_POP",
            AggregateFunction::Variance => "VAR_SAMP",
            AggregateFunction::VariancePopulation => "VAR_POP",
        }
    }

    /// Render parameter placeholder (dialect may override).
    fn write_parameter(&self, _context: &mut Context, out: &mut String, name: &str) -> Result<()> {
        out.push('@');
        out.push_str(name);
        Ok(())
    }

    fn write_variable(&self, _context: &mut Context, out: &mut String, name: &str) {
        out.push('@');
        out.push_str(name);
    }

    /// Dispatch an expression node to the method rendering its kind.
    fn write_expression(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Expression,
    ) -> Result<()> {
        match value {
            Expression::Constant(v) => self.write_value(context, out, v),
            Expression::Literal(v) => out.push_str(v),
            Expression::Wildcard(source) => {
                if let Some(source) = source {
                    out.push_str(source);
                    out.push('.');
                }
                out.push('*');
            }
            Expression::Field(v) => self.write_field(context, out, v),
            Expression::Variable(v) => self.write_variable(context, out, v),
            Expression::Parameter(v) => {
                context.bind(v);
                return self.write_parameter(context, out, v);
            }
            Expression::Unary(v) => return self.write_expression_unary(context, out, v),
            Expression::Binary(v) => return self.write_expression_binary(context, out, v),
            Expression::Range(min, max) => {
                self.write_expression(context, out, min)?;
                out.push_str(" AND ");
                self.write_expression(context, out, max)?;
            }
            Expression::Block(v) => return self.write_block(context, out, v),
            Expression::Method(v) => return self.write_method(context, out, v),
            Expression::Aggregate(v) => return self.write_aggregate(context, out, v),
            Expression::Sequence(v) => return self.write_sequence(context, out, v),
            Expression::Condition(v) => return self.write_condition(context, out, v),
            Expression::Aliased(v, alias) => {
                self.write_expression(context, out, v)?;
                if context.fragment != Fragment::SqlSelectOrderBy {
                    out.push_str(" AS ");
                    self.write_identifier_quoted(context, out, alias);
                }
            }
            Expression::Select(v) => return self.write_select(context, out, v),
        };
        Ok(())
    }

    /// Render an operand, enclosed in parentheses when requested.
    ///
    /// Inside the parentheses the condition groups start again from the top level.
    fn write_operand(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Expression,
        parenthesized: bool,
    ) -> Result<()> {
        if !parenthesized {
            return self.write_expression(context, out, value);
        }
        let counter = context.counter;
        context.counter = 0;
        out.push('(');
        self.write_expression(context, out, value)?;
        out.push(')');
        context.counter = counter;
        Ok(())
    }

    /// Render unary operator expression.
    fn write_expression_unary(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &UnaryExpression,
    ) -> Result<()> {
        let Some(symbol) = self.expression_unary_op(&value.operator) else {
            return Err(unsupported(self.as_dyn(), value.operator));
        };
        out.push_str(symbol);
        self.write_operand(
            context,
            out,
            &value.operand,
            value.operand.precedence(self.as_dyn())
                <= self.expression_operator_precedence(&value.operator),
        )
    }

    /// Render binary operator expression handling precedence / parenthesis.
    ///
    /// A comparison against the `NULL` constant is written with `IS` / `IS NOT`.
    fn write_expression_binary(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &BinaryExpression,
    ) -> Result<()> {
        let operator = match value.operator {
            Operator::Equal if value.right.is_null_constant() => Operator::Is,
            Operator::NotEqual if value.right.is_null_constant() => Operator::IsNot,
            v => v,
        };
        let Some((prefix, infix, suffix, lhs_parenthesized, rhs_parenthesized)) =
            self.expression_binary_op(&operator)
        else {
            return Err(unsupported(self.as_dyn(), operator));
        };
        let precedence = self.expression_operator_precedence(&operator);
        out.push_str(prefix);
        self.write_operand(
            context,
            out,
            &value.left,
            !lhs_parenthesized && value.left.precedence(self.as_dyn()) < precedence,
        )?;
        out.push_str(infix);
        self.write_operand(
            context,
            out,
            &value.right,
            !rhs_parenthesized && value.right.precedence(self.as_dyn()) <= precedence,
        )?;
        out.push_str(suffix);
        Ok(())
    }

    /// Render a group of predicates, parenthesized when nested and made of several members.
    ///
    /// A group of one member is transparent, its member is written at the depth of the group.
    fn write_condition(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &ConditionExpression,
    ) -> Result<()> {
        if value.is_empty() {
            self.write_value_bool(context, out, true);
            return Ok(());
        }
        let operator = value.combination.operator();
        let precedence = self.expression_operator_precedence(&operator);
        let separator = match self.expression_binary_op(&operator) {
            Some((_, infix, ..)) => infix,
            None => return Err(unsupported(self.as_dyn(), operator)),
        };
        let nested = value.len() > 1;
        let mut result = Ok(());
        possibly_parenthesized!(out, context.counter > 0 && nested, {
            context.counter += nested as u32;
            result = try_separated_by(
                out,
                &value.items,
                |out, v| {
                    let weaker = !matches!(v, Expression::Condition(..))
                        && v.precedence(self.as_dyn()) < precedence;
                    self.write_operand(context, out, v, weaker)
                },
                separator,
            );
            context.counter -= nested as u32;
        });
        result
    }

    fn write_block(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &BlockExpression,
    ) -> Result<()> {
        try_separated_by(
            out,
            &value.items,
            |out, v| self.write_expression(context, out, v),
            match value.delimiter {
                BlockDelimiter::Comma => ", ",
                BlockDelimiter::Space => " ",
            },
        )
    }

    fn write_method(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &MethodExpression,
    ) -> Result<()> {
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

    fn write_aggregate(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &AggregateExpression,
    ) -> Result<()> {
        out.push_str(self.aggregate_function_name(&value.function));
        out.push('(');
        if value.distinct {
            out.push_str("DISTINCT ");
        }
        match &value.argument {
            Some(v) => self.write_expression(context, out, v)?,
            None => out.push('*'),
        }
        out.push(')');
        Ok(())
    }

    /// Render the next or current value of a sequence, an empty name is the identity.
    fn write_sequence(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &SequenceExpression,
    ) -> Result<()> {
        match (value.method, value.name.is_empty()) {
            (SequenceMethod::Next, false) => {
                out.push_str("NEXT VALUE FOR ");
                self.write_identifier_quoted(context, out, &value.name);
            }
            (SequenceMethod::Current, false) => {
                out.push_str("CURRVAL(");
                self.write_value_string(context, out, &value.name);
                out.push(')');
            }
            (SequenceMethod::Current, true) => out.push_str("LASTVAL()"),
            (SequenceMethod::Next, true) => {
                return Err(unsupported(self.as_dyn(), "the next value of an identity"));
            }
        }
        Ok(())
    }

    /// Render join keyword(s) for the given join kind.
    fn write_join_kind(&self, _context: &mut Context, out: &mut String, value: &JoinKind) {
        out.push_str(match value {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        });
    }

    /// Render a JOIN clause.
    fn write_join(&self, context: &mut Context, out: &mut String, value: &JoinClause) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlJoin);
        context.current.qualify_columns = true;
        self.write_join_kind(&mut context.current, out, &value.kind);
        out.push(' ');
        self.write_table(&mut context.current, out, &value.target);
        if !value.on.is_empty() {
            out.push_str(" ON ");
            self.write_condition(&mut context.current, out, &value.on)?;
        }
        Ok(())
    }

    /// Render the page of rows to read.
    fn write_paging(&self, _context: &mut Context, out: &mut String, value: &Paging) {
        let _ = write!(out, "\nLIMIT {}", value.size);
        let offset = value.offset();
        if offset > 0 {
            let _ = write!(out, " OFFSET {}", offset);
        }
    }

    /// Render the RETURNING clause of a write statement.
    fn write_returning(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &ReturningClause,
    ) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        let update = context.fragment == Fragment::SqlUpdate;
        out.push_str("\nRETURNING ");
        let mut context = context.switch_fragment(Fragment::SqlReturning);
        try_separated_by(
            out,
            &value.members,
            |out, v| self.write_returning_member(&mut context.current, out, v, update),
            ", ",
        )
    }

    /// Render one returned column, the pre image of an update reads from `OLD`.
    fn write_returning_member(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &ReturningMember,
        update: bool,
    ) -> Result<()> {
        if update && value.image == Image::Deleted {
            out.push_str("OLD.");
        }
        self.write_identifier_quoted(context, out, &value.field.name);
        if let Some(alias) = &value.field.alias {
            out.push_str(" AS ");
            self.write_identifier_quoted(context, out, alias);
        }
        Ok(())
    }

    /// Emit CREATE TEMPORARY TABLE for a synthetic table.
    fn write_create_temporary_table(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &TableIdentifier,
    ) -> Result<()> {
        let Some(definition) = value.definition() else {
            return Err(unsupported(
                self.as_dyn(),
                format!("creating the table `{}` without definition", value.name),
            ));
        };
        let mut context = context.switch_fragment(Fragment::SqlCreateTable);
        out.push_str("CREATE TEMPORARY TABLE IF NOT EXISTS ");
        self.write_identifier_quoted(&mut context.current, out, &value.name);
        out.push_str(" (");
        separated_by(
            out,
            &definition.fields,
            |out, v| {
                self.write_identifier_quoted(&mut context.current, out, &v.name);
                out.push(' ');
                self.write_data_type(&mut context.current, out, &v.data_type);
                if !v.nullable {
                    out.push_str(" NOT NULL");
                }
            },
            ", ",
        );
        out.push(')');
        Ok(())
    }

    /// Emit the body of a SELECT statement.
    fn write_select(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &SelectStatement,
    ) -> Result<()> {
        writer::write_select(self.as_dyn(), context, out, value)
    }

    /// Emit the query counting the rows of a paged SELECT.
    fn write_count(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &SelectStatement,
    ) -> Result<()> {
        writer::write_count(self.as_dyn(), context, out, value)
    }

    fn write_insert(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &InsertStatement,
    ) -> Result<()> {
        writer::write_insert(self.as_dyn(), context, out, value)
    }

    fn write_update(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &UpdateStatement,
    ) -> Result<()> {
        writer::write_update(self.as_dyn(), context, out, value)
    }

    fn write_delete(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &DeleteStatement,
    ) -> Result<()> {
        writer::write_delete(self.as_dyn(), context, out, value)
    }

    fn write_upsert(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &UpsertStatement,
    ) -> Result<()> {
        writer::write_merge(self.as_dyn(), context, out, value)
    }

    fn write_execute(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &ExecutionStatement,
    ) -> Result<()> {
        writer::write_execute(self.as_dyn(), context, out, value)
    }

    /// Emit a statement (its slaves excluded) terminated by `;`.
    ///
    /// On failure the output is left as it was before the call.
    fn write_statement(&self, out: &mut String, value: &Statement) -> Result<()> {
        self.write_statement_bound(out, value, None)
    }

    /// Emit a statement like `write_statement`, noting the parameter placeholders into `bound`.
    fn write_statement_bound(
        &self,
        out: &mut String,
        value: &Statement,
        bound: Option<&RefCell<Vec<String>>>,
    ) -> Result<()> {
        let len = out.len();
        out.reserve(256);
        if !out.is_empty() {
            out.push('\n');
        }
        let mut context = Context::new(Fragment::None, true)
            .with_parameters(value.base().collection())
            .with_slots(&value.base().slots)
            .with_bound(bound);
        let result = match value {
            Statement::Select(v) => {
                let count = if v.paging.is_some_and(|p| p.total) {
                    self.write_count(&mut context, out, v)
                        .map(|_| out.push_str(";\n"))
                } else {
                    Ok(())
                };
                count.and_then(|_| self.write_select(&mut context, out, v))
            }
            Statement::Insert(v) => self.write_insert(&mut context, out, v),
            Statement::Update(v) => self.write_update(&mut context, out, v),
            Statement::Delete(v) => self.write_delete(&mut context, out, v),
            Statement::Upsert(v) => self.write_upsert(&mut context, out, v),
            Statement::Exist(v) => self.write_select(&mut context, out, &v.select),
            Statement::Execute(v) => self.write_execute(&mut context, out, v),
            Statement::Aggregate(v) => self.write_select(&mut context, out, &v.select),
        };
        match result {
            Ok(()) => {
                out.push(';');
                Ok(())
            }
            Err(e) => {
                out.truncate(len);
                Err(e)
            }
        }
    }

    /// Text of a single statement, its slaves excluded.
    fn render(&self, value: &Statement) -> Result<String> {
        let mut out = String::new();
        self.write_statement(&mut out, value)?;
        Ok(out)
    }

    /// Text of a single statement with the names of its parameters in the order of their
    /// placeholders.
    ///
    /// A name repeats when its placeholder is written more than once, as in the count query of a
    /// paged select. Positional placeholders are bound following this list.
    fn render_bound(&self, value: &Statement) -> Result<(String, Vec<String>)> {
        let bound = RefCell::new(Vec::new());
        let mut out = String::new();
        self.write_statement_bound(&mut out, value, Some(&bound))?;
        Ok((out, bound.into_inner()))
    }

    /// Text of every statement of the plan in execution order, a failure affects its statement only.
    fn render_plan(&self, value: &Statement) -> Vec<Result<String>> {
        value
            .flatten()
            .into_iter()
            .map(|v| self.render(v))
            .collect()
    }
}

/// Fallback generic SQL writer (closest to ANSI / PostgreSQL conventions), the explicit default
/// dialect.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    /// Construct a new generic writer.
    pub fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
