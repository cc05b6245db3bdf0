use crate::{
    Expression, RenderError, Result, SelectStatement, SqlWriter, StatementBase, separated_by,
    try_separated_by,
    writer::{Context, Fragment},
};

/// Body of a SELECT: members, sources, filter, grouping, ordering and page.
pub fn write_select(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    value: &SelectStatement,
) -> Result<()> {
    if value.members.is_empty() {
        return Err(RenderError::EmptySelect {
            alias: value.base.alias.clone(),
        }
        .into());
    }
    // Nested selects start their conditions from the top level
    let counter = context.counter;
    context.counter = 0;
    {
        let mut context = context.switch_fragment(Fragment::SqlSelect);
        out.push_str("SELECT ");
        if value.distinct {
            out.push_str("DISTINCT ");
        }
        try_separated_by(
            out,
            &value.members,
            |out, v| writer.write_expression(&mut context.current, out, v),
            ", ",
        )?;
    }
    if let Some(into) = &value.into {
        out.push_str("\nINTO ");
        writer.write_table(context, out, into);
    }
    if let Some(table) = &value.table {
        let mut context = context.switch_fragment(Fragment::SqlSelectFrom);
        out.push_str("\nFROM ");
        writer.write_table(&mut context.current, out, table);
        for join in &value.from {
            out.push('\n');
            writer.write_join(&mut context.current, out, join)?;
        }
    }
    if !value.condition.is_empty() {
        let mut context = context.switch_fragment(Fragment::SqlSelectWhere);
        out.push_str("\nWHERE ");
        writer.write_condition(&mut context.current, out, &value.condition)?;
    }
    if !value.group_by.is_empty() {
        let mut context = context.switch_fragment(Fragment::SqlSelectGroupBy);
        out.push_str("\nGROUP BY ");
        try_separated_by(
            out,
            &value.group_by,
            |out, v| writer.write_expression(&mut context.current, out, v),
            ", ",
        )?;
    }
    if !value.having.is_empty() {
        let mut context = context.switch_fragment(Fragment::SqlSelectHaving);
        out.push_str("\nHAVING ");
        writer.write_condition(&mut context.current, out, &value.having)?;
    }
    if !value.order_by.is_empty() {
        let mut context = context.switch_fragment(Fragment::SqlSelectOrderBy);
        out.push_str("\nORDER BY ");
        try_separated_by(
            out,
            &value.order_by,
            |out, v| {
                writer.write_expression(&mut context.current, out, &v.expression)?;
                out.push_str(if v.descending { " DESC" } else { " ASC" });
                Ok(())
            },
            ", ",
        )?;
    }
    if let Some(paging) = &value.paging {
        writer.write_paging(context, out, paging);
    }
    context.counter = counter;
    Ok(())
}

/// Query counting the rows a paged select would return without its page.
///
/// Grouped or distinct selects are counted by wrapping them, the others by replacing their members.
pub fn write_count(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    value: &SelectStatement,
) -> Result<()> {
    let inner = SelectStatement {
        base: StatementBase::hosted(&value.base.alias),
        table: value.table.clone(),
        from: value.from.clone(),
        members: value.members.clone(),
        distinct: value.distinct,
        into: None,
        condition: value.condition.clone(),
        group_by: value.group_by.clone(),
        having: value.having.clone(),
        order_by: Vec::new(),
        paging: None,
    };
    if value.is_grouped() || value.distinct {
        out.push_str("SELECT COUNT(*) FROM (");
        write_select(writer, context, out, &inner)?;
        out.push_str(") AS ");
        writer.write_identifier_quoted(context, out, "counted");
    } else {
        let inner = SelectStatement {
            members: vec![Expression::count_all()],
            ..inner
        };
        write_select(writer, context, out, &inner)?;
    }
    Ok(())
}

/// Comma separated list of plain column names.
pub fn write_column_list<'a>(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    names: impl IntoIterator<Item = &'a str>,
) {
    separated_by(
        out,
        names,
        |out, v| writer.write_identifier_quoted(context, out, v),
        ", ",
    );
}
