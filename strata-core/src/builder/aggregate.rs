use crate::{
    AggregateContext, AggregateStatement, Resolver, Result, Statement, StatementBase,
    builder::{SelectAssembler, StatementBuilder, built},
};

/// Label of the value computed by an aggregate statement.
pub const AGGREGATE_LABEL: &str = "Value";

impl StatementBuilder for AggregateContext<'_> {
    fn build(&self) -> Result<Statement> {
        let entity = self.metadata.require_entity(&self.entity)?;
        let mut resolver = Resolver::new(self.metadata);
        let mut select =
            SelectAssembler::new(&mut resolver, entity, StatementBase::new(&entity.name));
        let (expression, _) =
            select.aggregate(self.function, self.member.as_deref(), self.distinct)?;
        select.members.push(expression.aliased(AGGREGATE_LABEL));
        select.filter(self.criteria.as_ref())?;
        Ok(built(Statement::Aggregate(AggregateStatement {
            select: select.finish(),
        })))
    }
}
