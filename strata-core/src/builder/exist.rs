use crate::{
    ExistContext, ExistStatement, Paging, Resolver, Result, Statement, StatementBase,
    builder::{SelectAssembler, StatementBuilder, built},
};

impl StatementBuilder for ExistContext<'_> {
    /// Primary key of the first row matching the criteria.
    fn build(&self) -> Result<Statement> {
        let entity = self.metadata.require_entity(&self.entity)?;
        let mut resolver = Resolver::new(self.metadata);
        let keys = resolver.key(entity)?;
        let mut select =
            SelectAssembler::new(&mut resolver, entity, StatementBase::new(&entity.name));
        for key in keys {
            select.member(&key.name)?;
        }
        select.filter(self.criteria.as_ref())?;
        let mut select = select.finish();
        select.paging = Some(Paging::limit(1));
        Ok(built(Statement::Exist(ExistStatement { select })))
    }
}
