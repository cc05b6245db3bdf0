use crate::{
    Assignment, Expression, FieldIdentifier, Result, SqlWriter, UpsertStatement, same_name,
    try_separated_by,
    writer::{Context, Fragment, unsupported, write_assignments, write_column_list},
};

const SOURCE: &str = "src";

/// Upsert as a `MERGE` over a one row source built from the parameters.
pub fn write_merge(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    value: &UpsertStatement,
) -> Result<()> {
    let mut context = context.switch_fragment(Fragment::SqlMerge);
    let context = &mut context.current;
    let inserted: Vec<_> = value.inserted().collect();
    out.push_str("MERGE INTO ");
    writer.write_table(context, out, &value.table);
    out.push_str("\nUSING (SELECT ");
    try_separated_by(
        out,
        &inserted,
        |out, v| {
            writer.write_expression(context, out, &v.value)?;
            out.push_str(" AS ");
            writer.write_identifier_quoted(context, out, &v.field.name);
            Ok(())
        },
        ", ",
    )?;
    out.push_str(") AS ");
    out.push_str(SOURCE);
    out.push_str("\nON ");
    let keys: Vec<_> = value
        .keys
        .iter()
        .filter(|v| !v.value.is_null_constant())
        .collect();
    if keys.is_empty() {
        writer.write_value_bool(context, out, false);
    } else {
        let mut first = true;
        for key in keys {
            if !first {
                out.push_str(" AND ");
            }
            first = false;
            writer.write_field(context, out, &qualified(&value.table.alias, &key.field));
            out.push_str(" = ");
            writer.write_field(context, out, &qualified(SOURCE, &key.field));
        }
    }
    if !value.updation.is_empty() {
        out.push_str("\nWHEN MATCHED");
        if !value.condition.is_empty() {
            out.push_str(" AND ");
            context.counter += 1;
            writer.write_condition(context, out, &value.condition)?;
            context.counter -= 1;
        }
        out.push_str(" THEN UPDATE SET ");
        let mut first = true;
        for field in &value.updation {
            if !first {
                out.push_str(", ");
            }
            first = false;
            writer.write_identifier_quoted(context, out, &field.name);
            out.push_str(" = ");
            writer.write_field(context, out, &qualified(SOURCE, field));
        }
    }
    out.push_str("\nWHEN NOT MATCHED THEN INSERT (");
    write_column_list(
        writer,
        context,
        out,
        inserted.iter().map(|v| v.field.name.as_str()),
    );
    out.push_str(") VALUES (");
    let mut first = true;
    for v in &inserted {
        if !first {
            out.push_str(", ");
        }
        first = false;
        writer.write_field(context, out, &qualified(SOURCE, &v.field));
    }
    out.push(')');
    if let Some(returning) = &value.returning {
        writer.write_returning(context, out, returning)?;
    }
    Ok(())
}

/// Upsert as `INSERT ... ON CONFLICT (keys) DO UPDATE SET ...`.
///
/// The existing row is referenced by the table alias, the proposed one by `EXCLUDED`.
pub fn write_on_conflict(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    value: &UpsertStatement,
) -> Result<()> {
    let mut context = context.switch_fragment(Fragment::SqlInsertInto);
    let context = &mut context.current;
    let inserted: Vec<_> = value.inserted().collect();
    out.push_str("INSERT INTO ");
    writer.write_table(context, out, &value.table);
    if !value.condition.is_empty() {
        out.push_str(" AS ");
        out.push_str(&value.table.alias);
    }
    if inserted.is_empty() {
        out.push_str(" DEFAULT VALUES");
    } else {
        out.push_str(" (");
        write_column_list(
            writer,
            context,
            out,
            inserted.iter().map(|v| v.field.name.as_str()),
        );
        out.push_str(") VALUES\n(");
        let mut values = context.switch_fragment(Fragment::SqlInsertIntoValues);
        try_separated_by(
            out,
            &inserted,
            |out, v| writer.write_expression(&mut values.current, out, &v.value),
            ", ",
        )?;
        out.push(')');
    }
    let mut context = context.switch_fragment(Fragment::SqlInsertIntoOnConflict);
    let context = &mut context.current;
    out.push_str("\nON CONFLICT (");
    write_column_list(
        writer,
        context,
        out,
        value.keys.iter().map(|v| v.field.name.as_str()),
    );
    out.push(')');
    let updation: Vec<_> = value
        .updation
        .iter()
        .filter(|v| !value.keys.iter().any(|k| same_name(&k.field.name, &v.name)))
        .collect();
    if updation.is_empty() {
        out.push_str(" DO NOTHING");
    } else {
        out.push_str(" DO UPDATE SET\n");
        let mut first = true;
        for field in updation {
            if !first {
                out.push_str(",\n");
            }
            first = false;
            writer.write_identifier_quoted(context, out, &field.name);
            out.push_str(" = EXCLUDED.");
            writer.write_identifier_quoted(context, out, &field.name);
        }
        if !value.condition.is_empty() {
            out.push_str("\nWHERE ");
            writer.write_condition(context, out, &value.condition)?;
        }
    }
    if let Some(returning) = &value.returning {
        writer.write_returning(context, out, returning)?;
    }
    Ok(())
}

/// Upsert as `INSERT ... ON DUPLICATE KEY UPDATE`, the engine matches on any unique key.
pub fn write_on_duplicate_key(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    value: &UpsertStatement,
) -> Result<()> {
    if !value.condition.is_empty() {
        return Err(unsupported(writer, "a condition on the row to update"));
    }
    let mut context = context.switch_fragment(Fragment::SqlInsertInto);
    let context = &mut context.current;
    let inserted: Vec<_> = value.inserted().collect();
    out.push_str("INSERT INTO ");
    writer.write_table(context, out, &value.table);
    out.push_str(" (");
    write_column_list(
        writer,
        context,
        out,
        inserted.iter().map(|v| v.field.name.as_str()),
    );
    out.push_str(") VALUES\n(");
    try_separated_by(
        out,
        &inserted,
        |out, v| writer.write_expression(context, out, &v.value),
        ", ",
    )?;
    out.push_str(")\nON DUPLICATE KEY UPDATE\n");
    if value.updation.is_empty() {
        // Matched rows are left as they are
        let assignments: Vec<_> = value
            .keys
            .iter()
            .take(1)
            .map(|v| {
                Assignment::new(
                    v.field.clone(),
                    Expression::Field(FieldIdentifier::unqualified(&v.field.name)),
                )
            })
            .collect();
        write_assignments(writer, context, out, &assignments, false)?;
    } else {
        let mut first = true;
        for field in &value.updation {
            if !first {
                out.push_str(",\n");
            }
            first = false;
            writer.write_identifier_quoted(context, out, &field.name);
            out.push_str(" = VALUES(");
            writer.write_identifier_quoted(context, out, &field.name);
            out.push(')');
        }
    }
    if let Some(returning) = &value.returning {
        writer.write_returning(context, out, returning)?;
    }
    Ok(())
}

fn qualified(source: &str, field: &FieldIdentifier) -> FieldIdentifier {
    FieldIdentifier::new(source, &field.name)
}
