use crate::{
    Assignment, Result, SqlWriter, UpdateStatement, try_separated_by,
    writer::{Context, Fragment},
};

/// `UPDATE ... SET ... WHERE ... RETURNING`.
///
/// Joined tables are written in a `FROM` list, their join conditions move into the `WHERE` clause.
pub fn write_update(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    value: &UpdateStatement,
) -> Result<()> {
    let mut context = context.switch_fragment(Fragment::SqlUpdate);
    out.push_str("UPDATE ");
    writer.write_table(&mut context.current, out, &value.table);
    {
        let mut context = context.current.switch_fragment(Fragment::SqlUpdateSet);
        out.push_str("\nSET ");
        write_assignments(writer, &mut context.current, out, &value.set, false)?;
    }
    if !value.from.is_empty() {
        let mut context = context.current.switch_fragment(Fragment::SqlSelectFrom);
        out.push_str("\nFROM ");
        let mut first = true;
        for join in &value.from {
            if !first {
                out.push_str(", ");
            }
            first = false;
            writer.write_table(&mut context.current, out, &join.target);
        }
    }
    let mut condition = value.condition.clone();
    for join in &value.from {
        for v in &join.on.items {
            condition.add(v.clone());
        }
    }
    if !condition.is_empty() {
        let mut context = context.current.switch_fragment(Fragment::SqlUpdateWhere);
        out.push_str("\nWHERE ");
        writer.write_condition(&mut context.current, out, &condition)?;
    }
    if let Some(returning) = &value.returning {
        writer.write_returning(&mut context.current, out, returning)?;
    }
    Ok(())
}

/// `"field" = value` pairs, the target column is qualified only when `qualified`.
pub fn write_assignments(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    value: &[Assignment],
    qualified: bool,
) -> Result<()> {
    try_separated_by(
        out,
        value,
        |out, v| {
            if qualified && !v.field.source.is_empty() {
                out.push_str(&v.field.source);
                out.push('.');
            }
            writer.write_identifier_quoted(context, out, &v.field.name);
            out.push_str(" = ");
            writer.write_expression(context, out, &v.value)
        },
        ", ",
    )
}
