use crate::{
    Direction, ExecuteContext, ExecutionStatement, ParameterCollection, ParameterExpression,
    Parameters, Result, Statement, StatementBase, Value,
    builder::{StatementBuilder, built},
};

impl StatementBuilder for ExecuteContext<'_> {
    /// Call of the command with one named parameter per declared parameter, in declaration order.
    ///
    /// Input values come from the record (`NULL` when missing), the return value parameter is not
    /// an argument but receives the result of a function.
    fn build(&self) -> Result<Statement> {
        let command = self.metadata.require_command(&self.command)?;
        let mut parameters = ParameterCollection::new();
        let mut arguments = Vec::with_capacity(command.parameters.len());
        let mut result = None;
        for declared in &command.parameters {
            let mut parameter = ParameterExpression::named(&declared.name, declared.data_type.clone())
                .with_direction(declared.direction);
            if declared.direction.is_input() {
                parameter.value = Some(self.data.value(&declared.name).cloned().unwrap_or(Value::Null));
            }
            let expression = parameters.add(parameter)?;
            if declared.direction == Direction::ReturnValue {
                result = Some(declared.name.clone());
            } else {
                arguments.push(expression);
            }
        }
        let mut base = StatementBase::new(&command.name);
        base.parameters = Parameters::Own(parameters);
        Ok(built(Statement::Execute(ExecutionStatement {
            base,
            routine: command.routine.clone(),
            kind: command.kind,
            arguments,
            result,
        })))
    }
}
