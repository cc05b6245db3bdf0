use crate::{
    Assignment, BuildError, Criteria, Data, Entity, Expression, FieldIdentifier, Image,
    ParameterCollection, Parameters, Record, Resolver, Result, ReturningClause, Schema, Scope,
    SelectStatement, SimplexProperty, SourceCollection, Statement, StatementBase, UpsertContext,
    UpsertStatement,
    builder::{
        Cell, StatementBuilder, WritePlanner, built, check_immutable, filter, has_value, levels,
        nest, returned_field, sequence_select,
    },
    join_path, same_name,
};

impl StatementBuilder for UpsertContext<'_> {
    fn build(&self) -> Result<Statement> {
        let entity = self.metadata.require_entity(&self.entity)?;
        let planner = WritePlanner {
            metadata: self.metadata,
            features: self.features,
            options: &self.options,
            pending: true,
        };
        let statement = planner.merge(
            entity,
            &self.data,
            "",
            self.schema.as_ref(),
            Vec::new(),
            self.condition.as_ref(),
        )?;
        Ok(built(statement))
    }
}

impl<'c, 'm> WritePlanner<'c, 'm> {
    /// Upsert plan of one record, used for the children written by updates and upserts.
    pub fn upsert(
        &self,
        entity: &'m Entity,
        record: &Record,
        prefix: &str,
        schema: Option<&Schema>,
        foreign: Vec<(String, Cell)>,
    ) -> Result<Statement> {
        self.merge(entity, record, prefix, schema, foreign, None)
    }

    /// One upsert per level of the chain, the root ancestor first, matched on the primary key.
    ///
    /// Every member goes into the insert branch, defaults included. The update branch only writes
    /// the mutable members the record supplies or the navigations assign. The extra condition only
    /// guards the update of the entity own table.
    fn merge(
        &self,
        entity: &'m Entity,
        record: &Record,
        prefix: &str,
        schema: Option<&Schema>,
        foreign: Vec<(String, Cell)>,
        condition: Option<&Criteria>,
    ) -> Result<Statement> {
        check_immutable(self.metadata, entity, record, prefix)?;
        let levels = levels(self.metadata, entity)?;
        let keys = self.metadata.key_properties(entity)?;
        let mut assigned = self.navigations(entity, record, prefix)?;
        assigned.extend(foreign);
        let generated = self.generated(&keys, record);
        let missing = keys.iter().find(|k| {
            !generated.is_some_and(|v| same_name(&v.name, &k.name))
                && !has_value(record, &k.name)
                && !assigned.iter().any(|(name, _)| same_name(name, &k.name))
        });
        if keys.is_empty() || missing.is_some() {
            return Err(BuildError::MissingPrimaryKey {
                entity: entity.name.clone(),
                path: missing
                    .map(|v| join_path(prefix, &v.name))
                    .unwrap_or_default(),
            }
            .into());
        }
        let children = self.children(
            entity,
            record,
            prefix,
            schema,
            generated,
            |entity, record, prefix, schema, foreign| {
                self.upsert(entity, record, prefix, schema, foreign)
            },
        )?;
        let retrieve = generated.is_some()
            && (levels.len() > 1 || !children.is_empty() || !self.options.suppress_sequence);
        let mut resolver = Resolver::new(self.metadata);
        resolver.ignore_constraint = self.options.ignore_constraint;
        let mut chain = Vec::with_capacity(levels.len() + 1);
        for (index, level) in levels.iter().copied().enumerate() {
            let alias = if prefix.is_empty() { &level.name } else { prefix };
            let mut upsert = UpsertStatement::new(StatementBase::new(alias), resolver.table(level));
            upsert.base.track_slots(&level.table);
            let mut parameters = ParameterCollection::new();
            if index == 0
                && let Some(key) = generated.filter(|v| v.sequence.as_ref().is_some_and(|s| s.is_builtin()))
            {
                upsert.keys.push(Assignment::new(
                    FieldIdentifier::unqualified(&key.field).with_token(join_path(prefix, &key.name)),
                    Expression::null(),
                ));
            }
            let mut lookup = Vec::new();
            for (property, cell) in
                self.cells(level, &keys, generated, index == 0, record, prefix, &assigned)?
            {
                let field = FieldIdentifier::unqualified(&property.field)
                    .with_token(join_path(prefix, &property.name));
                if keys.iter().any(|k| same_name(&k.name, &property.name)) {
                    upsert
                        .keys
                        .push(Assignment::new(field, cell.into_expression(&mut parameters)?));
                    continue;
                }
                let linked = assigned.iter().any(|(k, _)| same_name(k, &property.name));
                if !property.immutable
                    && property.sequence.is_none()
                    && (linked || matches!(record.find(&property.name), Some(Data::Value(..))))
                {
                    upsert.updation.push(field.clone());
                    if linked || has_value(record, &property.name) {
                        lookup.push((property, cell.clone()));
                    }
                }
                upsert
                    .fields
                    .push(Assignment::new(field, cell.into_expression(&mut parameters)?));
            }
            if let Some(criteria) = condition.filter(|_| same_name(&level.name, &entity.name)) {
                let mut scope = Scope {
                    entity,
                    table: upsert.table.clone(),
                    from: SourceCollection::new(),
                };
                if let Some(v) = filter(&mut resolver, &mut scope, &mut parameters, Some(criteria))? {
                    upsert.condition.add(v);
                }
                if !scope.from.is_empty() {
                    return Err(BuildError::UnsupportedCriteria {
                        entity: entity.name.clone(),
                        path: String::new(),
                        detail: "the condition of an upsert can only read its own table".into(),
                    }
                    .into());
                }
            }
            let mut returning = ReturningClause::new();
            if self.features.upsert_returning {
                if index == 0
                    && retrieve
                    && let Some(key) = generated
                {
                    returning.add(returned_field(key, prefix), Image::Inserted);
                }
                if prefix.is_empty() {
                    self.requested(level, &mut returning);
                }
            }
            if !returning.is_empty() {
                upsert.returning = Some(returning);
            }
            upsert.base.parameters = Parameters::Own(parameters);
            chain.push(Statement::Upsert(upsert));
            if index == 0
                && retrieve
                && !self.features.upsert_returning
                && let Some(key) = generated
            {
                chain.push(self.key_lookup(&mut resolver, level, key, prefix, lookup)?);
            }
        }
        Ok(nest(chain, children))
    }

    /// Select reading back the generated key of the row just written, found through the values
    /// the record supplies for its mutable members.
    fn key_lookup(
        &self,
        resolver: &mut Resolver<'m>,
        level: &'m Entity,
        key: &'m SimplexProperty,
        prefix: &str,
        members: Vec<(&'m SimplexProperty, Cell)>,
    ) -> Result<Statement> {
        if members.is_empty() {
            log::debug!(
                "No member identifies the row of `{}`, reading the last generated value",
                level.name
            );
            return Ok(sequence_select(key, prefix));
        }
        let label = join_path(prefix, &key.name);
        let table = resolver.table(level);
        let field = table.field(&key.field);
        let field = if key.field == label {
            field
        } else {
            field.with_alias(&label)
        };
        let mut parameters = ParameterCollection::new();
        let mut select = SelectStatement::new(StatementBase::new(&label), table.clone())
            .member(field.with_token(&label).into());
        for (property, cell) in members {
            select.condition.add(Expression::equal(
                table.field(&property.field).into(),
                cell.into_expression(&mut parameters)?,
            ));
        }
        select.base.track_slots(&level.table);
        select.base.parameters = Parameters::Own(parameters);
        Ok(select.into())
    }
}
