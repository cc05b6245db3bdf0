use crate::{
    DeleteStatement, Result, SqlWriter, try_separated_by,
    writer::{Context, Fragment, unsupported, write_column_list},
};

/// `DELETE FROM ... WHERE ... RETURNING`.
///
/// When the returning clause is captured into a temporary table the table is created and emptied
/// first, then filled with the deleted rows either through a data modifying common table
/// expression or by selecting the rows before deleting them.
pub fn write_delete(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    value: &DeleteStatement,
) -> Result<()> {
    if value.is_multi_table() {
        return Err(unsupported(writer, "deleting from several tables at once"));
    }
    if !value.from.is_empty() {
        return Err(unsupported(writer, "joined tables in a delete"));
    }
    let Some((returning, into)) = value
        .returning
        .as_ref()
        .and_then(|v| v.into.as_ref().map(|into| (v, into)))
    else {
        return write_delete_body(writer, context, out, value, true);
    };
    writer.write_create_temporary_table(context, out, into)?;
    out.push_str(";\nDELETE FROM ");
    writer.write_table(context, out, into);
    out.push_str(";\n");
    if writer.capture_with_cte() {
        out.push_str("WITH ");
        writer.write_identifier_quoted(context, out, "captured");
        out.push_str(" AS (");
        write_delete_body(writer, context, out, value, true)?;
        out.push_str(")\nINSERT INTO ");
        writer.write_table(context, out, into);
        out.push_str(" SELECT * FROM ");
        writer.write_identifier_quoted(context, out, "captured");
    } else {
        out.push_str("INSERT INTO ");
        writer.write_table(context, out, into);
        out.push_str(" (");
        write_column_list(
            writer,
            context,
            out,
            returning.members.iter().map(|v| v.field.label()),
        );
        out.push_str(")\n");
        {
            let mut context = context.switch_fragment(Fragment::SqlSelect);
            out.push_str("SELECT ");
            try_separated_by(
                out,
                &returning.members,
                |out, v| {
                    out.push_str(&value.table.alias);
                    out.push('.');
                    writer.write_identifier_quoted(&mut context.current, out, &v.field.name);
                    Ok(())
                },
                ", ",
            )?;
        }
        {
            let mut context = context.switch_fragment(Fragment::SqlSelectFrom);
            out.push_str("\nFROM ");
            writer.write_table(&mut context.current, out, &value.table);
        }
        if !value.condition.is_empty() {
            let mut context = context.switch_fragment(Fragment::SqlSelectWhere);
            out.push_str("\nWHERE ");
            writer.write_condition(&mut context.current, out, &value.condition)?;
        }
        out.push_str(";\n");
        write_delete_body(writer, context, out, value, false)?;
    }
    Ok(())
}

/// The plain `DELETE FROM` statement, with its returning clause when `returning`.
pub fn write_delete_body(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    value: &DeleteStatement,
    returning: bool,
) -> Result<()> {
    let mut context = context.switch_fragment(Fragment::SqlDeleteFrom);
    out.push_str("DELETE FROM ");
    writer.write_table(&mut context.current, out, &value.table);
    if !value.condition.is_empty() {
        let mut context = context.current.switch_fragment(Fragment::SqlDeleteFromWhere);
        out.push_str("\nWHERE ");
        writer.write_condition(&mut context.current, out, &value.condition)?;
    }
    if returning && let Some(clause) = &value.returning {
        writer.write_returning(&mut context.current, out, clause)?;
    }
    Ok(())
}
