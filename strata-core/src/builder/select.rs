use crate::{
    AggregateExpression, BuildError, ComplexProperty, ConditionExpression, ConstraintActor,
    Criteria, DataType, Entity, Expression, Grouping, Metadata, OrderExpression,
    ParameterCollection, ParameterExpression, Parameters, Policy, Property, Reduction, Resolver,
    Result, Schema, SchemaMember, Scope, SelectContext, SelectStatement, SimplexProperty, Sorting,
    Statement, StatementBase, Translator,
    builder::{StatementBuilder, built, filter},
    join_path, same_name,
};
use std::collections::VecDeque;

impl StatementBuilder for SelectContext<'_> {
    fn build(&self) -> Result<Statement> {
        let entity = self.metadata.require_entity(&self.entity)?;
        let mut resolver = Resolver::new(self.metadata);
        let mut select =
            SelectAssembler::new(&mut resolver, entity, StatementBase::new(&entity.name));
        match &self.grouping {
            Some(grouping) => select.group(grouping)?,
            None => select.walk(self.schema.as_ref())?,
        }
        select.filter(self.criteria.as_ref())?;
        if let Some(having) = self.grouping.as_ref().and_then(|v| v.having.as_ref()) {
            select.having(having)?;
        }
        select.sort(&self.sorting)?;
        let mut result = select.finish();
        result.distinct = self.distinct;
        result.paging = self.paging;
        Ok(built(result.into()))
    }
}

/// Select statement being assembled, shared by the read builders.
pub(crate) struct SelectAssembler<'r, 'm> {
    pub resolver: &'r mut Resolver<'m>,
    pub scope: Scope<'m>,
    pub base: StatementBase,
    pub parameters: ParameterCollection,
    pub members: Vec<Expression>,
    pub condition: ConditionExpression,
    pub group_by: Vec<Expression>,
    pub having: ConditionExpression,
    pub order_by: Vec<OrderExpression>,
    /// Aggregates addressable by alias in HAVING and ORDER BY, with the type they compute.
    pub aliases: Vec<(String, Expression, DataType)>,
    pub slaves: Vec<Statement>,
}

impl<'r, 'm> SelectAssembler<'r, 'm> {
    pub fn new(resolver: &'r mut Resolver<'m>, entity: &'m Entity, mut base: StatementBase) -> Self {
        let scope = resolver.scope(entity);
        base.track_slots(&entity.table);
        Self {
            resolver,
            scope,
            base,
            parameters: ParameterCollection::new(),
            members: Vec::new(),
            condition: ConditionExpression::and(),
            group_by: Vec::new(),
            having: ConditionExpression::and(),
            order_by: Vec::new(),
            aliases: Vec::new(),
            slaves: Vec::new(),
        }
    }

    fn metadata(&self) -> &'m dyn Metadata {
        self.resolver.metadata
    }

    pub fn selects(&self, label: &str) -> bool {
        self.members
            .iter()
            .any(|v| v.label().is_some_and(|v| same_name(v, label)))
    }

    /// Select the field reached by the path, read back with the path as label.
    pub fn member(&mut self, path: &str) -> Result<&'m SimplexProperty> {
        let (field, property) = self
            .resolver
            .reduce_field(&mut self.scope, path, "as a selected member")?;
        if !self.selects(path) {
            let field = if field.name == path {
                field
            } else {
                field.with_alias(path)
            };
            self.members.push(field.into());
        }
        Ok(property)
    }

    /// Select the members of the schema tree, breadth first.
    ///
    /// One-to-one navigations are joined, one-to-many navigations become slave selects.
    pub fn walk(&mut self, schema: Option<&Schema>) -> Result<()> {
        let mut queue = VecDeque::from([(String::new(), self.scope.entity, schema)]);
        while let Some((prefix, entity, schema)) = queue.pop_front() {
            for (property, member) in schema_members(self.metadata(), entity, schema)? {
                let path = join_path(&prefix, property.name());
                match property {
                    Property::Simplex(..) => {
                        self.member(&path)?;
                    }
                    Property::Complex(property) if property.is_one_to_many() => {
                        self.slave(&prefix, &path, property, member)?;
                    }
                    Property::Complex(property) => {
                        let target = self.resolver.entity(&property.port)?;
                        queue.push_back((path, target, member.and_then(|v| v.schema.as_ref())));
                    }
                }
            }
        }
        Ok(())
    }

    /// Slave select of the entities reached by a one-to-many navigation.
    ///
    /// It is correlated through parameters bound to the row of this select, the fields they read
    /// are added to the members when missing.
    fn slave(
        &mut self,
        prefix: &str,
        path: &str,
        property: &'m ComplexProperty,
        member: Option<&SchemaMember>,
    ) -> Result<()> {
        let target = self.resolver.entity(&property.port)?;
        let mut principal: Vec<(String, DataType, Correlation)> = Vec::new();
        for link in &property.links {
            let label = join_path(prefix, &link.principal);
            let data_type = self.member(&label)?.data_type.clone();
            principal.push((label, data_type, Correlation::Link(&link.foreign)));
        }
        if !self.resolver.ignore_constraint {
            for constraint in &property.constraints {
                match constraint.actor {
                    ConstraintActor::Principal => {
                        let label = join_path(prefix, &constraint.name);
                        let data_type = self.member(&label)?.data_type.clone();
                        principal.push((label, data_type, Correlation::Constant(constraint)));
                    }
                    ConstraintActor::Foreign => {
                        principal.push((
                            String::new(),
                            DataType::Boolean,
                            Correlation::Foreign(constraint),
                        ));
                    }
                }
            }
        }
        let mut slave = SelectAssembler::new(&mut *self.resolver, target, StatementBase::new(path));
        for (label, data_type, correlation) in principal {
            let condition = match correlation {
                Correlation::Link(foreign) => {
                    let field = slave.resolver.foreign_field(target, foreign)?;
                    Expression::equal(
                        Expression::field(slave.scope.alias(), field),
                        slave
                            .parameters
                            .add(ParameterExpression::master(label, data_type))?,
                    )
                }
                Correlation::Constant(constraint) => Expression::equal(
                    slave
                        .parameters
                        .add(ParameterExpression::master(label, data_type))?,
                    Expression::Constant(constraint.value.clone()),
                ),
                Correlation::Foreign(constraint) => {
                    let field = slave.resolver.foreign_field(target, &constraint.name)?;
                    Expression::equal(
                        Expression::field(slave.scope.alias(), field),
                        Expression::Constant(constraint.value.clone()),
                    )
                }
            };
            slave.condition.add(condition);
        }
        slave.walk(member.and_then(|v| v.schema.as_ref()))?;
        if let Some(member) = member {
            slave.sort(&member.sorting)?;
        }
        let mut statement = slave.finish();
        statement.paging = member.and_then(|v| v.paging);
        log::trace!("Slave select `{}` of `{}`", path, target.name);
        self.slaves.push(statement.into());
        Ok(())
    }

    /// Select the grouping keys and the aggregates, the schema is not used.
    pub fn group(&mut self, grouping: &Grouping) -> Result<()> {
        for key in &grouping.keys {
            match self
                .resolver
                .reduce(&mut self.scope, key, Policy::Join("as a grouping key"))?
            {
                Reduction::Field { field, .. } => {
                    self.group_by.push(field.clone().into());
                    self.member(key)?;
                }
                Reduction::Navigation { path, .. } => {
                    return Err(BuildError::NotGroupable {
                        entity: self.scope.entity.name.clone(),
                        path,
                    }
                    .into());
                }
            }
        }
        for aggregate in &grouping.aggregates {
            let (expression, data_type) = self.aggregate(
                aggregate.function,
                aggregate.member.as_deref(),
                aggregate.distinct,
            )?;
            self.aliases
                .push((aggregate.alias.clone(), expression.clone(), data_type));
            self.members.push(expression.aliased(&aggregate.alias));
        }
        Ok(())
    }

    /// Filter on the groups, aggregates are addressed by their alias.
    ///
    /// Translated after the row filter, so the parameters follow the order of the clauses.
    pub fn having(&mut self, criteria: &Criteria) -> Result<()> {
        let mut translator = Translator::new(&mut *self.resolver, &mut self.parameters)
            .with_aliases(self.aliases.clone());
        if let Some(v) = translator.translate(&mut self.scope, criteria)? {
            self.having.add(v);
        }
        Ok(())
    }

    /// Aggregate call over the field reached by the path, `*` when missing, with the type it
    /// computes.
    pub fn aggregate(
        &mut self,
        function: crate::AggregateFunction,
        member: Option<&str>,
        distinct: bool,
    ) -> Result<(Expression, DataType)> {
        let (argument, data_type) = match member {
            Some(path) => {
                let (field, property) =
                    self.resolver
                        .reduce_field(&mut self.scope, path, "in an aggregate")?;
                (
                    Some(Box::new(field.into())),
                    function.data_type(Some(&property.data_type)),
                )
            }
            None => (None, function.data_type(None)),
        };
        let expression = Expression::Aggregate(AggregateExpression {
            function,
            distinct,
            argument,
        });
        Ok((expression, data_type))
    }

    pub fn filter(&mut self, criteria: Option<&Criteria>) -> Result<()> {
        if let Some(v) = filter(
            &mut *self.resolver,
            &mut self.scope,
            &mut self.parameters,
            criteria,
        )? {
            self.condition.add(v);
        }
        Ok(())
    }

    /// Order by simplex sortable members, or by the alias of an aggregate.
    pub fn sort(&mut self, sorting: &[Sorting]) -> Result<()> {
        for sorting in sorting {
            if let Some((_, expression, _)) = self
                .aliases
                .iter()
                .find(|(k, ..)| same_name(k, &sorting.member))
            {
                self.order_by.push(OrderExpression {
                    expression: expression.clone(),
                    descending: sorting.descending,
                });
                continue;
            }
            let not_sortable = |scope: &Scope<'m>, path: &str| -> crate::Error {
                BuildError::NotSortable {
                    entity: scope.entity.name.clone(),
                    path: path.to_owned(),
                }
                .into()
            };
            match self.resolver.reduce(
                &mut self.scope,
                &sorting.member,
                Policy::Join("as a sorting key"),
            )? {
                Reduction::Field {
                    field, property, ..
                } => {
                    if !property.sortable {
                        return Err(not_sortable(&self.scope, &sorting.member));
                    }
                    self.order_by.push(OrderExpression {
                        expression: field.into(),
                        descending: sorting.descending,
                    });
                }
                Reduction::Navigation { path, .. } => {
                    return Err(not_sortable(&self.scope, &path));
                }
            }
        }
        Ok(())
    }

    pub fn finish(self) -> SelectStatement {
        let mut base = self.base;
        base.parameters = Parameters::Own(self.parameters);
        base.slaves = self.slaves;
        SelectStatement {
            base,
            table: Some(self.scope.table),
            from: self.scope.from,
            members: self.members,
            distinct: false,
            into: None,
            condition: self.condition,
            group_by: self.group_by,
            having: self.having,
            order_by: self.order_by,
            paging: None,
        }
    }
}

enum Correlation<'m> {
    Link(&'m str),
    Constant(&'m crate::Constraint),
    Foreign(&'m crate::Constraint),
}

/// Properties selected by a schema at one level of the tree, with the schema member naming them.
///
/// Without a schema (or with an empty one) every simplex member is selected, ancestors first.
fn schema_members<'m, 's>(
    metadata: &'m dyn Metadata,
    entity: &'m Entity,
    schema: Option<&'s Schema>,
) -> Result<Vec<(&'m Property, Option<&'s SchemaMember>)>> {
    let mut result: Vec<(&'m Property, Option<&'s SchemaMember>)> = Vec::new();
    let wildcard = schema.is_none_or(|v| v.is_empty() || v.wildcard);
    if wildcard {
        for owner in metadata.inherits(entity)?.into_iter().rev() {
            for property in owner.properties.iter().filter(|v| v.is_simplex()) {
                let excluded = schema.is_some_and(|v| v.is_excluded(property.name()));
                if !excluded && !result.iter().any(|(v, _)| same_name(v.name(), property.name())) {
                    result.push((property, None));
                }
            }
        }
    }
    for member in schema.into_iter().flat_map(|v| v.members.iter()) {
        if schema.is_some_and(|v| v.is_excluded(&member.name)) {
            continue;
        }
        let Some((_, property)) = metadata.locate(entity, &member.name)? else {
            return Err(BuildError::UnknownProperty {
                entity: entity.name.clone(),
                member: member.name.clone(),
            }
            .into());
        };
        match result
            .iter_mut()
            .find(|(v, _)| same_name(v.name(), property.name()))
        {
            Some(current) => current.1 = Some(member),
            None => result.push((property, Some(member))),
        }
    }
    Ok(result)
}
