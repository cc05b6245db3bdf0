use crate::{
    BuildError, ComplexProperty, ConditionExpression, ConstraintActor, DeleteContext,
    DeleteStatement, Entity, Expression, FieldDefinition, FieldIdentifier, Image, Metadata,
    ParameterCollection, Parameters, Property, Resolver, Result, ReturningClause, Schema, Scope,
    SelectStatement, Statement, StatementBase, TableIdentifier, Value,
    builder::{StatementBuilder, built, filter, key_condition, returned_field},
    join_path, same_name,
};

impl StatementBuilder for DeleteContext<'_> {
    /// Delete the rows picked by the record key and the criteria, together with the rows of the
    /// ancestors and of the navigations listed by the schema.
    ///
    /// Engines deleting from several tables at once get one statement joining them all. The
    /// others delete the entity rows first, capturing their keys into a temporary table, then
    /// delete the related rows matching the captured keys.
    fn build(&self) -> Result<Statement> {
        let entity = self.metadata.require_entity(&self.entity)?;
        let mut resolver = Resolver::new(self.metadata);
        resolver.ignore_constraint = self.options.ignore_constraint;
        if self.data.is_none() && self.criteria.is_none() {
            log::debug!("Deleting every row of `{}`", entity.name);
        }
        let mut planner = DeletePlanner {
            resolver,
            context: self,
        };
        let statement = if self.features.multi_table_delete {
            planner.joined(entity)?
        } else {
            planner.plan(entity, "", self.schema.as_ref(), None)?
        };
        Ok(built(statement))
    }
}

/// Rows of the principal entity captured before deleting them.
struct Origin<'m> {
    captured: TableIdentifier,
    owner: &'m Entity,
    property: &'m ComplexProperty,
}

struct DeletePlanner<'c, 'm> {
    resolver: Resolver<'m>,
    context: &'c DeleteContext<'m>,
}

impl<'c, 'm> DeletePlanner<'c, 'm> {
    fn metadata(&self) -> &'m dyn Metadata {
        self.resolver.metadata
    }

    /// Condition picking the rows of the root entity in the scope.
    fn root_filter(
        &mut self,
        scope: &mut Scope<'m>,
        parameters: &mut ParameterCollection,
    ) -> Result<ConditionExpression> {
        let mut result = match &self.context.data {
            Some(record) => key_condition(&self.resolver, scope, parameters, record, "", false)?,
            None => ConditionExpression::and(),
        };
        if let Some(v) = filter(
            &mut self.resolver,
            scope,
            parameters,
            self.context.criteria.as_ref(),
        )? {
            result.add(v);
        }
        Ok(result)
    }

    fn returning(&self, entity: &'m Entity) -> Option<ReturningClause> {
        let requests = &self.context.options.returning;
        if requests.is_empty() {
            return None;
        }
        if !self.context.features.returning {
            log::warn!(
                "Returning members requested on `{}` but the engine does not return values",
                entity.name
            );
            return None;
        }
        let mut result = ReturningClause::new();
        for request in requests {
            if let Some(property) = entity.simplex(&request.member) {
                result.add(returned_field(property, ""), request.image);
            }
        }
        (!result.is_empty()).then_some(result)
    }

    /// One statement removing the rows of every joined table.
    fn joined(&mut self, entity: &'m Entity) -> Result<Statement> {
        let mut scope = self.resolver.scope(entity);
        let mut targets = Vec::new();
        let alias = scope.alias().to_owned();
        self.join_levels(&mut scope, &mut targets, "", &alias, entity)?;
        self.join_cascades(
            &mut scope,
            &mut targets,
            "",
            entity,
            self.context.schema.as_ref(),
        )?;
        let mut parameters = ParameterCollection::new();
        let condition = self.root_filter(&mut scope, &mut parameters)?;
        let mut base = StatementBase::new(&entity.name);
        for name in scope.table_names() {
            base.track_slots(name);
        }
        base.parameters = Parameters::Own(parameters);
        let mut delete = DeleteStatement::new(base, scope.table);
        delete.from = scope.from;
        delete.targets = targets;
        delete.condition = condition;
        delete.returning = self.returning(entity);
        Ok(delete.into())
    }

    fn join_levels(
        &mut self,
        scope: &mut Scope<'m>,
        targets: &mut Vec<String>,
        prefix: &str,
        alias: &str,
        entity: &'m Entity,
    ) -> Result<()> {
        for ancestor in self.metadata().inherits(entity)?.into_iter().skip(1) {
            targets.push(
                self.resolver
                    .inheritance_join(scope, prefix, alias, entity, ancestor)?,
            );
        }
        Ok(())
    }

    fn join_cascades(
        &mut self,
        scope: &mut Scope<'m>,
        targets: &mut Vec<String>,
        prefix: &str,
        entity: &'m Entity,
        schema: Option<&Schema>,
    ) -> Result<()> {
        for (property, schema) in cascades(self.metadata(), entity, schema)? {
            let path = join_path(prefix, &property.name);
            let (alias, target) = self
                .resolver
                .navigation_join(scope, prefix, &path, property)?;
            targets.push(alias.clone());
            self.join_levels(scope, targets, &path, &alias, target)?;
            self.join_cascades(scope, targets, &path, target, schema)?;
        }
        Ok(())
    }

    /// Delete plan of the entity rows, `origin` tells they are the ones related to captured rows.
    fn plan(
        &mut self,
        entity: &'m Entity,
        path: &str,
        schema: Option<&Schema>,
        origin: Option<&Origin<'m>>,
    ) -> Result<Statement> {
        let ancestors = self.metadata().inherits(entity)?.split_off(1);
        let cascades = cascades(self.metadata(), entity, schema)?;
        let alias = if path.is_empty() { &entity.name } else { path };
        let mut base = StatementBase::new(alias);
        let mut parameters = ParameterCollection::new();
        let (table, condition) = match origin {
            Some(origin) => {
                let table = self.resolver.table(entity);
                let condition = self.related(origin, entity, &table)?;
                base.track_slots(&entity.table);
                (table, condition)
            }
            None => self.root_rows(entity, &mut base, &mut parameters)?,
        };
        base.parameters = Parameters::Own(parameters);
        let mut delete = DeleteStatement::new(base, table);
        delete.condition = condition;
        if ancestors.is_empty() && cascades.is_empty() {
            if origin.is_none() {
                delete.returning = self.returning(entity);
            }
            return Ok(delete.into());
        }
        if origin.is_none() && !self.context.options.returning.is_empty() {
            log::warn!(
                "Returning members requested on `{}` are not returned by a split delete",
                entity.name
            );
        }
        let keys = self.resolver.key(entity)?;
        let mut fields: Vec<FieldDefinition> = keys
            .iter()
            .map(|v| FieldDefinition {
                name: v.field.clone(),
                data_type: v.data_type.clone(),
                nullable: false,
            })
            .collect();
        for (property, _) in &cascades {
            let mut members: Vec<&str> = property.links.iter().map(|v| v.principal.as_str()).collect();
            if !self.resolver.ignore_constraint {
                members.extend(
                    property
                        .constraints
                        .iter()
                        .filter(|v| v.actor == ConstraintActor::Principal)
                        .map(|v| v.name.as_str()),
                );
            }
            for member in members {
                let Some((_, Property::Simplex(simplex))) = self.metadata().locate(entity, member)?
                else {
                    return Err(BuildError::UnknownProperty {
                        entity: entity.name.clone(),
                        member: member.to_owned(),
                    }
                    .into());
                };
                if !fields.iter().any(|v| same_name(&v.name, &simplex.field)) {
                    fields.push(FieldDefinition {
                        name: simplex.field.clone(),
                        data_type: simplex.data_type.clone(),
                        nullable: simplex.nullable,
                    });
                }
            }
        }
        let name = if path.is_empty() {
            format!("deleted_{}", entity.name)
        } else {
            format!("deleted_{}", path.replace('.', "_"))
        };
        let mut returning = ReturningClause::new();
        for field in &fields {
            returning.add(FieldIdentifier::unqualified(&field.name), Image::Deleted);
        }
        let captured = TableIdentifier::temporary(name, fields);
        returning.into = Some(captured.clone());
        delete.returning = Some(returning);
        let mut statement: Statement = delete.into();
        for ancestor in ancestors {
            let table = self.resolver.table(ancestor);
            let pairs = keys
                .iter()
                .map(|v| (v.field.clone(), v.field.clone()))
                .collect();
            let condition = self.captured(&captured, pairs, &table, Vec::new());
            let mut base = StatementBase::new(&ancestor.name);
            base.track_slots(&ancestor.table);
            let mut delete = DeleteStatement::new(base, table);
            delete.condition.add(condition);
            statement.slaves_mut().push(delete.into());
        }
        for (property, schema) in cascades {
            let target = self.resolver.entity(&property.port)?;
            let origin = Origin {
                captured: captured.clone(),
                owner: entity,
                property,
            };
            let slave = self.plan(
                target,
                &join_path(path, &property.name),
                schema,
                Some(&origin),
            )?;
            statement.slaves_mut().push(slave);
        }
        Ok(statement)
    }

    /// Table of the root entity and the condition picking its rows, correlated on the key when
    /// the criteria needs joins.
    fn root_rows(
        &mut self,
        entity: &'m Entity,
        base: &mut StatementBase,
        parameters: &mut ParameterCollection,
    ) -> Result<(TableIdentifier, ConditionExpression)> {
        let mut scope = self.resolver.scope(entity);
        let mut condition = self.root_filter(&mut scope, parameters)?;
        for name in scope.table_names() {
            base.track_slots(name);
        }
        if scope.from.is_empty() {
            return Ok((scope.table, condition));
        }
        let table = self.resolver.table(entity);
        for key in self.resolver.key(entity)? {
            condition.add(Expression::equal(
                Expression::field(scope.alias(), &key.field),
                Expression::field(&table.alias, &key.field),
            ));
        }
        let mut select = SelectStatement::new(StatementBase::hosted(&entity.name), scope.table)
            .member(Expression::literal("1"));
        select.from = scope.from;
        select.condition = condition;
        Ok((
            table,
            ConditionExpression::and().with(Expression::exists(select)),
        ))
    }

    /// Rows of the navigated entity related to the captured principal rows.
    fn related(
        &mut self,
        origin: &Origin<'m>,
        target: &'m Entity,
        table: &TableIdentifier,
    ) -> Result<ConditionExpression> {
        let mut pairs = Vec::with_capacity(origin.property.links.len());
        for link in &origin.property.links {
            pairs.push((
                self.resolver
                    .foreign_field(origin.owner, &link.principal)?
                    .to_owned(),
                self.resolver
                    .foreign_field(target, &link.foreign)?
                    .to_owned(),
            ));
        }
        let mut constants = Vec::new();
        let mut result = ConditionExpression::and();
        if !self.resolver.ignore_constraint {
            for constraint in &origin.property.constraints {
                match constraint.actor {
                    ConstraintActor::Principal => constants.push((
                        self.resolver
                            .foreign_field(origin.owner, &constraint.name)?
                            .to_owned(),
                        constraint.value.clone(),
                    )),
                    ConstraintActor::Foreign => result.add(Expression::equal(
                        table
                            .field(self.resolver.foreign_field(target, &constraint.name)?)
                            .into(),
                        Expression::Constant(constraint.value.clone()),
                    )),
                }
            }
        }
        result.add(self.captured(&origin.captured, pairs, table, constants));
        Ok(result)
    }

    /// Match the rows of `table` against the captured ones, `pairs` maps a captured column to a
    /// column of the table and `constants` are values the captured columns must have.
    ///
    /// A single pair reads `IN (SELECT ...)`, otherwise a correlated `EXISTS`.
    fn captured(
        &mut self,
        captured: &TableIdentifier,
        pairs: Vec<(String, String)>,
        table: &TableIdentifier,
        constants: Vec<(String, Value)>,
    ) -> Expression {
        if let [(source, target)] = pairs.as_slice()
            && constants.is_empty()
        {
            let select =
                SelectStatement::new(StatementBase::hosted(&captured.name), captured.clone())
                    .member(Expression::field("", source));
            return Expression::in_select(table.field(target).into(), select);
        }
        let captured = captured.clone().with_alias(self.resolver.aliaser.next());
        let mut select =
            SelectStatement::new(StatementBase::hosted(&captured.name), captured.clone())
                .member(Expression::literal("1"));
        for (source, value) in constants {
            select.condition.add(Expression::equal(
                captured.field(source).into(),
                Expression::Constant(value),
            ));
        }
        for (source, target) in pairs {
            select.condition.add(Expression::equal(
                captured.field(source).into(),
                table.field(target).into(),
            ));
        }
        Expression::exists(select)
    }
}

/// Navigations of the entity listed by the schema, with their nested schema.
fn cascades<'m, 's>(
    metadata: &'m dyn Metadata,
    entity: &'m Entity,
    schema: Option<&'s Schema>,
) -> Result<Vec<(&'m ComplexProperty, Option<&'s Schema>)>> {
    let mut result = Vec::new();
    for member in schema.into_iter().flat_map(|v| v.members.iter()) {
        match metadata.locate(entity, &member.name)? {
            Some((_, Property::Complex(property))) => {
                result.push((property, member.schema.as_ref()))
            }
            Some(..) => {}
            None => {
                return Err(BuildError::UnknownProperty {
                    entity: entity.name.clone(),
                    member: member.name.clone(),
                }
                .into());
            }
        }
    }
    Ok(result)
}
