use crate::{
    InsertStatement, Result, SqlWriter, try_separated_by,
    writer::{Context, Fragment, write_column_list},
};

/// `INSERT INTO` with one `VALUES` row per record, `DEFAULT VALUES` when there are no fields.
pub fn write_insert(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    value: &InsertStatement,
) -> Result<()> {
    let mut context = context.switch_fragment(Fragment::SqlInsertInto);
    out.push_str("INSERT INTO ");
    writer.write_table(&mut context.current, out, &value.table);
    if value.fields.is_empty() || value.rows.is_empty() {
        out.push_str(" DEFAULT VALUES");
    } else {
        out.push_str(" (");
        write_column_list(
            writer,
            &mut context.current,
            out,
            value.fields.iter().map(|v| v.name.as_str()),
        );
        out.push_str(") VALUES\n");
        let mut context = context.current.switch_fragment(Fragment::SqlInsertIntoValues);
        try_separated_by(
            out,
            &value.rows,
            |out, row| {
                out.push('(');
                try_separated_by(
                    out,
                    row,
                    |out, v| writer.write_expression(&mut context.current, out, v),
                    ", ",
                )?;
                out.push(')');
                Ok(())
            },
            ",\n",
        )?;
    }
    if let Some(returning) = &value.returning {
        writer.write_returning(&mut context.current, out, returning)?;
    }
    Ok(())
}
