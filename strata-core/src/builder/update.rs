use crate::{
    Assignment, BuildError, ComplexProperty, ConditionExpression, Criteria, Data, Entity,
    Expression, Features, FieldIdentifier, ParameterCollection, ParameterExpression, Parameters,
    Property, Record, Resolver, Result, ReturningClause, Scope, SelectStatement, SimplexProperty,
    SourceCollection, Statement, StatementBase, TableIdentifier, UpdateContext, UpdateStatement,
    WriteOptions,
    builder::{
        StatementBuilder, WritePlanner, built, check_immutable, filter, key_condition, levels,
        returned_field,
    },
    join_path, same_name,
};

impl StatementBuilder for UpdateContext<'_> {
    /// Write the members supplied by the record, the rows are picked by the primary key or by the
    /// criteria of a bulk update.
    ///
    /// Engines updating several tables at once get a single statement joining the ancestors and
    /// the one-to-one children, the others get one statement per table correlated with `EXISTS`.
    /// One-to-many children are upserted by slave plans.
    fn build(&self) -> Result<Statement> {
        let entity = self.metadata.require_entity(&self.entity)?;
        check_immutable(self.metadata, entity, &self.data, "")?;
        let mut resolver = Resolver::new(self.metadata);
        resolver.ignore_constraint = self.options.ignore_constraint;
        let mut planner = UpdatePlanner {
            resolver,
            root: entity,
            record: &self.data,
            criteria: self.criteria.as_ref(),
            options: &self.options,
            features: self.features,
        };
        let mut statement = if self.features.multi_table_update {
            planner.joined()?
        } else {
            planner.split()?
        };
        let writer = WritePlanner {
            metadata: self.metadata,
            features: self.features,
            options: &self.options,
            pending: true,
        };
        let children = writer.children(
            entity,
            &self.data,
            "",
            self.schema.as_ref(),
            None,
            |entity, record, prefix, schema, foreign| {
                writer.upsert(entity, record, prefix, schema, foreign)
            },
        )?;
        if !children.is_empty() {
            if self.criteria.is_some() {
                log::warn!(
                    "The one-to-many members of `{}` are not written by a bulk update",
                    entity.name
                );
            } else {
                statement.slaves_mut().extend(children);
            }
        }
        Ok(built(statement))
    }
}

/// Navigation followed from the root to reach a nested record: the path of the declaring record,
/// the path of the navigation and its property.
type Step<'m> = (String, String, &'m ComplexProperty);

struct UpdatePlanner<'c, 'm> {
    resolver: Resolver<'m>,
    root: &'m Entity,
    record: &'c Record,
    criteria: Option<&'c Criteria>,
    options: &'c WriteOptions,
    features: Features,
}

impl<'c, 'm> UpdatePlanner<'c, 'm> {
    fn bulk(&self) -> bool {
        self.criteria.is_some()
    }

    /// Members of one level written by the record.
    ///
    /// Primary keys are only written by bulk updates that allow it, immutable and sequence
    /// members are never written.
    fn supplied(
        &self,
        entity: &'m Entity,
        level: &'m Entity,
        record: &Record,
        prefix: &str,
    ) -> Result<Vec<&'m SimplexProperty>> {
        let keys = self.resolver.metadata.key_properties(entity)?;
        let given = |name: &str| matches!(record.find(name), Some(Data::Value(..)));
        let mut result = Vec::new();
        if self.bulk() && prefix.is_empty() {
            for key in keys.iter().copied().filter(|v| given(&v.name)) {
                if !self.options.update_primary_key {
                    return Err(BuildError::PrimaryKeyWrite {
                        entity: entity.name.clone(),
                        path: key.name.clone(),
                    }
                    .into());
                }
                result.push(key);
            }
        }
        for property in level.simplex_properties() {
            if keys.iter().any(|k| same_name(&k.name, &property.name)) || !given(&property.name) {
                continue;
            }
            if property.immutable || property.sequence.is_some() {
                log::trace!(
                    "Not writing `{}` of `{}`",
                    join_path(prefix, &property.name),
                    entity.name
                );
                continue;
            }
            result.push(property);
        }
        Ok(result)
    }

    fn assign(
        &self,
        properties: Vec<&'m SimplexProperty>,
        prefix: &str,
        alias: &str,
        parameters: &mut ParameterCollection,
    ) -> Result<Vec<Assignment>> {
        let mut result = Vec::with_capacity(properties.len());
        for property in properties {
            let path = join_path(prefix, &property.name);
            let value = parameters.add(ParameterExpression::pending(
                &path,
                property.data_type.clone(),
            ))?;
            result.push(Assignment::new(
                FieldIdentifier::new(alias, &property.field).with_token(path),
                value,
            ));
        }
        Ok(result)
    }

    /// Condition picking the rows of the root entity in the scope.
    fn root_filter(
        &mut self,
        scope: &mut Scope<'m>,
        parameters: &mut ParameterCollection,
    ) -> Result<ConditionExpression> {
        match self.criteria {
            Some(criteria) => {
                let mut result = ConditionExpression::and();
                if let Some(v) = filter(&mut self.resolver, scope, parameters, Some(criteria))? {
                    result.add(v);
                }
                Ok(result)
            }
            None => key_condition(&self.resolver, scope, parameters, self.record, "", true),
        }
    }

    fn returning(&self, levels: &[&'m Entity]) -> Option<ReturningClause> {
        if !self.features.returning {
            return None;
        }
        let mut result = ReturningClause::new();
        for request in &self.options.returning {
            if let Some(property) = levels.iter().find_map(|v| v.simplex(&request.member)) {
                result.add(returned_field(property, ""), request.image);
            }
        }
        (!result.is_empty()).then_some(result)
    }

    /// One statement writing every table, joined to the root one.
    fn joined(&mut self) -> Result<Statement> {
        let mut scope = self.resolver.scope(self.root);
        let mut parameters = ParameterCollection::new();
        let mut set = Vec::new();
        let alias = scope.alias().to_owned();
        self.join_record(
            &mut scope,
            &mut parameters,
            &mut set,
            "",
            &alias,
            self.root,
            self.record,
        )?;
        if set.is_empty() {
            return Err(BuildError::EmptyData(self.root.name.clone()).into());
        }
        let condition = self.root_filter(&mut scope, &mut parameters)?;
        let mut base = StatementBase::new(&self.root.name);
        for table in scope.table_names() {
            base.track_slots(table);
        }
        base.parameters = Parameters::Own(parameters);
        let mut update = UpdateStatement::new(base, scope.table);
        update.from = scope.from;
        update.set = set;
        update.condition = condition;
        update.returning = self.returning(&[self.root]);
        Ok(update.into())
    }

    #[allow(clippy::too_many_arguments)]
    fn join_record(
        &mut self,
        scope: &mut Scope<'m>,
        parameters: &mut ParameterCollection,
        set: &mut Vec<Assignment>,
        prefix: &str,
        alias: &str,
        entity: &'m Entity,
        record: &Record,
    ) -> Result<()> {
        for level in levels(self.resolver.metadata, entity)? {
            let properties = self.supplied(entity, level, record, prefix)?;
            if properties.is_empty() {
                continue;
            }
            let alias = if same_name(&level.name, &entity.name) {
                alias.to_owned()
            } else {
                self.resolver
                    .inheritance_join(scope, prefix, alias, entity, level)?
            };
            set.extend(self.assign(properties, prefix, &alias, parameters)?);
        }
        for (name, property, child) in self.one_to_one(entity, record)? {
            let path = join_path(prefix, name);
            let (alias, target) = self
                .resolver
                .navigation_join(scope, prefix, &path, property)?;
            self.join_record(scope, parameters, set, &path, &alias, target, child)?;
        }
        Ok(())
    }

    /// One statement per table, the first one is the primary.
    fn split(&mut self) -> Result<Statement> {
        let mut statements = Vec::new();
        self.split_record(&mut statements, "", self.root, self.record, &[])?;
        let mut statements = statements.into_iter();
        let Some(mut primary) = statements.next() else {
            return Err(BuildError::EmptyData(self.root.name.clone()).into());
        };
        primary.slaves_mut().extend(statements);
        Ok(primary)
    }

    fn split_record(
        &mut self,
        out: &mut Vec<Statement>,
        prefix: &str,
        entity: &'m Entity,
        record: &Record,
        chain: &[Step<'m>],
    ) -> Result<()> {
        for level in levels(self.resolver.metadata, entity)? {
            let properties = self.supplied(entity, level, record, prefix)?;
            if properties.is_empty() {
                continue;
            }
            let mut base = StatementBase::new(if prefix.is_empty() {
                &level.name
            } else {
                prefix
            });
            let mut parameters = ParameterCollection::new();
            let (table, condition) =
                self.level_filter(entity, level, chain, &mut base, &mut parameters)?;
            let mut update = UpdateStatement::new(base, table);
            let filtering = parameters.len();
            update.set = self.assign(properties, prefix, &update.table.alias, &mut parameters)?;
            parameters.defer(filtering);
            update.condition = condition;
            if prefix.is_empty() {
                update.returning = self.returning(&[level]);
            }
            update.base.parameters = Parameters::Own(parameters);
            out.push(update.into());
        }
        for (name, property, child) in self.one_to_one(entity, record)? {
            let path = join_path(prefix, name);
            let mut chain = chain.to_vec();
            chain.push((prefix.to_owned(), path.clone(), property));
            let target = self.resolver.entity(&property.port)?;
            self.split_record(out, &path, target, child, &chain)?;
        }
        Ok(())
    }

    /// Table of one level and the condition picking its rows.
    ///
    /// The rows of the root entity are picked directly when possible, every other table is
    /// correlated on the primary key with `EXISTS` over the root reaching it through the chain.
    fn level_filter(
        &mut self,
        entity: &'m Entity,
        level: &'m Entity,
        chain: &[Step<'m>],
        base: &mut StatementBase,
        parameters: &mut ParameterCollection,
    ) -> Result<(TableIdentifier, ConditionExpression)> {
        if chain.is_empty() && !self.bulk() {
            let scope = Scope {
                entity,
                table: self.resolver.table(level),
                from: SourceCollection::new(),
            };
            let condition = key_condition(&self.resolver, &scope, parameters, self.record, "", true)?;
            base.track_slots(&level.table);
            return Ok((scope.table, condition));
        }
        let direct = chain.is_empty() && same_name(&level.name, &entity.name);
        let table = (!direct).then(|| self.resolver.table(level));
        let mut sub = self.resolver.scope(self.root);
        let mut target = sub.alias().to_owned();
        for (prefix, path, property) in chain {
            target = self
                .resolver
                .navigation_join(&mut sub, prefix, path, *property)?
                .0;
        }
        let mut condition = self.root_filter(&mut sub, parameters)?;
        for name in sub.table_names() {
            base.track_slots(name);
        }
        let table = match table {
            Some(table) => table,
            None if sub.from.is_empty() => return Ok((sub.table, condition)),
            None => self.resolver.table(level),
        };
        base.track_slots(&level.table);
        for key in self.resolver.key(entity)? {
            condition.add(Expression::equal(
                Expression::field(&target, &key.field),
                Expression::field(&table.alias, &key.field),
            ));
        }
        let mut select = SelectStatement::new(StatementBase::hosted(&entity.name), sub.table)
            .member(Expression::literal("1"));
        select.from = sub.from;
        select.condition = condition;
        Ok((
            table,
            ConditionExpression::and().with(Expression::exists(select)),
        ))
    }

    /// One-to-one navigations written by the record.
    fn one_to_one<'r>(
        &self,
        entity: &'m Entity,
        record: &'r Record,
    ) -> Result<Vec<(&'r str, &'m ComplexProperty, &'r Record)>> {
        let mut result = Vec::new();
        for (name, data) in record.iter() {
            let Data::Record(child) = data else {
                continue;
            };
            if let Some((_, Property::Complex(property))) =
                self.resolver.metadata.locate(entity, name)?
                && !property.is_one_to_many()
            {
                result.push((name, property, child));
            }
        }
        Ok(result)
    }
}
