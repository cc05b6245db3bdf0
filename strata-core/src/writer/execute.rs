use crate::{
    CommandKind, ExecutionStatement, Result, SqlWriter, try_separated_by,
    writer::{Context, Fragment},
};

/// `CALL "procedure"(...)` or `SELECT "function"(...) AS "result"`.
pub fn write_execute(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    value: &ExecutionStatement,
) -> Result<()> {
    let mut context = context.switch_fragment(Fragment::SqlExecute);
    let context = &mut context.current;
    out.push_str(match value.kind {
        CommandKind::Procedure => "CALL ",
        CommandKind::Function => "SELECT ",
    });
    writer.write_identifier_quoted(context, out, &value.routine);
    out.push('(');
    try_separated_by(
        out,
        &value.arguments,
        |out, v| writer.write_expression(context, out, v),
        ", ",
    )?;
    out.push(')');
    if value.kind == CommandKind::Function {
        out.push_str(" AS ");
        writer.write_identifier_quoted(
            context,
            out,
            value.result.as_deref().unwrap_or("result"),
        );
    }
    Ok(())
}
