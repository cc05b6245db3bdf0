use crate::{
    BuildError, ComplexProperty, ConstraintActor, Data, DataType, Entity, Expression, Features,
    FieldIdentifier, Image, InsertContext, InsertStatement, Metadata, ParameterCollection,
    ParameterExpression, Parameters, Property, Record, Result, ReturningClause, Schema,
    SelectStatement, SimplexProperty, Statement, StatementBase, TableIdentifier, Value,
    WriteOptions,
    builder::{StatementBuilder, built, check_immutable, levels},
    join_path, same_name,
};

impl StatementBuilder for InsertContext<'_> {
    /// One insert per level of the inheritance chain, the root ancestor first.
    ///
    /// The key generated by a sequence is read back (through `RETURNING` or a select of the
    /// current value) when a later statement or the caller needs it. One-to-many children follow
    /// as slave plans. Several records share one multi row insert per level unless a generated
    /// key must reach another statement, then each record gets its own plan.
    fn build(&self) -> Result<Statement> {
        let entity = self.metadata.require_entity(&self.entity)?;
        if self.data.is_empty() {
            return Err(BuildError::EmptyData(entity.name.clone()).into());
        }
        if !self.options.returning.is_empty() && !self.features.returning {
            log::warn!(
                "Returning members requested on `{}` but the engine does not return values",
                entity.name
            );
        }
        let mut planner = WritePlanner {
            metadata: self.metadata,
            features: self.features,
            options: &self.options,
            pending: self.data.len() == 1,
        };
        let statement = if let [record] = self.data.as_slice() {
            planner.plan(entity, record, "", self.schema.as_ref(), Vec::new())?
        } else if planner.batchable(entity, &self.data)? {
            planner.batch(entity, &self.data)?
        } else {
            planner.pending = false;
            let mut plans = Vec::with_capacity(self.data.len());
            for record in &self.data {
                plans.push(planner.plan(entity, record, "", self.schema.as_ref(), Vec::new())?);
            }
            let mut plans = plans.into_iter();
            let Some(mut root) = plans.next() else {
                return Err(BuildError::EmptyData(entity.name.clone()).into());
            };
            root.slaves_mut().extend(plans);
            root
        };
        Ok(built(statement))
    }
}

/// Value written into a column.
#[derive(Debug, Clone)]
pub(crate) enum Cell {
    Parameter(ParameterExpression),
    Expression(Expression),
}

impl Cell {
    pub fn into_expression(self, parameters: &mut ParameterCollection) -> Result<Expression> {
        match self {
            Cell::Parameter(v) => parameters.add(v),
            Cell::Expression(v) => Ok(v),
        }
    }
}

/// Shared by the insert and upsert builders: columns of each level and the plans of the children.
pub(crate) struct WritePlanner<'c, 'm> {
    pub metadata: &'m dyn Metadata,
    pub features: Features,
    pub options: &'c WriteOptions,
    /// Parameters are read from the write record at execution, otherwise they carry the values.
    pub pending: bool,
}

impl<'c, 'm> WritePlanner<'c, 'm> {
    /// Parameter of a member of the record, `path` is relative to the record found at `prefix`.
    pub fn parameter(
        &self,
        record: &Record,
        prefix: &str,
        path: &str,
        data_type: &DataType,
    ) -> ParameterExpression {
        if self.pending {
            ParameterExpression::pending(join_path(prefix, path), data_type.clone())
        } else {
            let value = record
                .resolve(path)
                .and_then(Data::as_value)
                .cloned()
                .unwrap_or(Value::Null);
            ParameterExpression::value(value, data_type.clone())
        }
    }

    /// Key member whose value the engine generates because the record does not supply it.
    pub fn generated(
        &self,
        keys: &[&'m SimplexProperty],
        record: &Record,
    ) -> Option<&'m SimplexProperty> {
        keys.iter()
            .copied()
            .find(|k| k.sequence.is_some() && !has_value(record, &k.name))
    }

    /// Members written through the one-to-one navigations of the record: the link fields and the
    /// constraints of the principal side.
    pub fn navigations(
        &self,
        entity: &'m Entity,
        record: &Record,
        prefix: &str,
    ) -> Result<Vec<(String, Cell)>> {
        let mut result = Vec::new();
        for (name, data) in record.iter() {
            let Data::Record(..) = data else {
                continue;
            };
            let Some((_, Property::Complex(property))) = self.metadata.locate(entity, name)? else {
                continue;
            };
            if property.is_one_to_many() {
                continue;
            }
            let target = self.metadata.require_entity(&property.port)?;
            for link in &property.links {
                let foreign = self.simplex(target, &link.foreign)?;
                let path = join_path(name, &link.foreign);
                result.push((
                    link.principal.clone(),
                    Cell::Parameter(self.parameter(record, prefix, &path, &foreign.data_type)),
                ));
            }
            if !self.options.ignore_constraint {
                for constraint in &property.constraints {
                    if constraint.actor == ConstraintActor::Principal {
                        let member = self.simplex(entity, &constraint.name)?;
                        result.push((
                            constraint.name.clone(),
                            Cell::Parameter(ParameterExpression::value(
                                constraint.value.clone(),
                                member.data_type.clone(),
                            )),
                        ));
                    }
                }
            }
        }
        Ok(result)
    }

    /// Columns written at one level of the chain, the primary key first.
    ///
    /// The generated key is produced by the first level (omitted for an identity, the next value
    /// of a named sequence) and read from the master row by the others.
    #[allow(clippy::too_many_arguments)]
    pub fn cells(
        &self,
        level: &'m Entity,
        keys: &[&'m SimplexProperty],
        generated: Option<&'m SimplexProperty>,
        first: bool,
        record: &Record,
        prefix: &str,
        assigned: &[(String, Cell)],
    ) -> Result<Vec<(&'m SimplexProperty, Cell)>> {
        let mut result = Vec::new();
        let find = |name: &str| {
            assigned
                .iter()
                .rev()
                .find(|(k, _)| same_name(k, name))
                .map(|(_, v)| v.clone())
        };
        for key in keys.iter().copied() {
            let cell = if generated.is_some_and(|v| same_name(&v.name, &key.name)) {
                if first {
                    match &key.sequence {
                        Some(sequence) if !sequence.is_builtin() => {
                            Cell::Expression(Expression::next_value(&sequence.name))
                        }
                        _ => continue,
                    }
                } else {
                    Cell::Parameter(ParameterExpression::master(
                        join_path(prefix, &key.name),
                        key.data_type.clone(),
                    ))
                }
            } else if let Some(cell) = find(&key.name) {
                cell
            } else {
                Cell::Parameter(self.parameter(record, prefix, &key.name, &key.data_type))
            };
            result.push((key, cell));
        }
        for property in level.simplex_properties() {
            if keys.iter().any(|k| same_name(&k.name, &property.name)) {
                continue;
            }
            let cell = if let Some(cell) = find(&property.name) {
                cell
            } else if matches!(record.find(&property.name), Some(Data::Value(..))) {
                Cell::Parameter(self.parameter(
                    record,
                    prefix,
                    &property.name,
                    &property.data_type,
                ))
            } else if let Some(value) = &property.default {
                Cell::Parameter(ParameterExpression::value(
                    value.clone(),
                    property.data_type.clone(),
                ))
            } else if let Some(sequence) = property.sequence.as_ref().filter(|v| !v.is_builtin())
            {
                Cell::Expression(Expression::next_value(&sequence.name))
            } else {
                continue;
            };
            result.push((property, cell));
        }
        Ok(result)
    }

    /// Slave plans writing the one-to-many children of the record.
    ///
    /// A schema restricts the navigations written, the children are linked to the principal
    /// member of the record (read from the master row when it is the generated key).
    pub fn children(
        &self,
        entity: &'m Entity,
        record: &Record,
        prefix: &str,
        schema: Option<&Schema>,
        generated: Option<&'m SimplexProperty>,
        mut plan: impl FnMut(&'m Entity, &Record, &str, Option<&Schema>, Vec<(String, Cell)>) -> Result<Statement>,
    ) -> Result<Vec<Statement>> {
        let mut result = Vec::new();
        for (name, data) in record.iter() {
            let Data::Records(records) = data else {
                continue;
            };
            let Some((_, Property::Complex(property))) = self.metadata.locate(entity, name)? else {
                continue;
            };
            if !property.is_one_to_many() {
                continue;
            }
            let member = match schema {
                Some(schema) => match schema.member(name) {
                    Some(member) => Some(member),
                    None => continue,
                },
                None => None,
            };
            let target = self.metadata.require_entity(&property.port)?;
            for (i, child) in records.iter().enumerate() {
                let path = join_path(prefix, &format!("{}.{}", property.name, i));
                let foreign = self.foreign(entity, target, property, record, prefix, generated)?;
                result.push(plan(
                    target,
                    child,
                    &path,
                    member.and_then(|v| v.schema.as_ref()),
                    foreign,
                )?);
            }
        }
        Ok(result)
    }

    /// Members of a child set by the navigation: its links and its foreign constraints.
    fn foreign(
        &self,
        entity: &'m Entity,
        target: &'m Entity,
        property: &'m ComplexProperty,
        record: &Record,
        prefix: &str,
        generated: Option<&'m SimplexProperty>,
    ) -> Result<Vec<(String, Cell)>> {
        let mut result = Vec::new();
        for link in &property.links {
            let principal = self.simplex(entity, &link.principal)?;
            let parameter = if generated.is_some_and(|v| same_name(&v.name, &principal.name)) {
                ParameterExpression::master(
                    join_path(prefix, &principal.name),
                    principal.data_type.clone(),
                )
            } else {
                self.parameter(record, prefix, &principal.name, &principal.data_type)
            };
            result.push((link.foreign.clone(), Cell::Parameter(parameter)));
        }
        if !self.options.ignore_constraint {
            for constraint in &property.constraints {
                if constraint.actor == ConstraintActor::Foreign {
                    let member = self.simplex(target, &constraint.name)?;
                    result.push((
                        constraint.name.clone(),
                        Cell::Parameter(ParameterExpression::value(
                            constraint.value.clone(),
                            member.data_type.clone(),
                        )),
                    ));
                }
            }
        }
        Ok(result)
    }

    /// Add the returning members requested by the caller that the level stores.
    pub fn requested(&self, level: &'m Entity, returning: &mut ReturningClause) {
        if !self.features.returning {
            return;
        }
        for request in &self.options.returning {
            if let Some(property) = level.simplex(&request.member) {
                returning.add(returned_field(property, ""), request.image);
            }
        }
    }

    pub fn simplex(&self, entity: &'m Entity, member: &str) -> Result<&'m SimplexProperty> {
        match self.metadata.locate(entity, member)? {
            Some((_, Property::Simplex(property))) => Ok(property),
            _ => Err(BuildError::UnknownProperty {
                entity: entity.name.clone(),
                member: member.to_owned(),
            }
            .into()),
        }
    }

    /// Insert plan of one record, `foreign` sets the members linking it to its principal.
    pub fn plan(
        &self,
        entity: &'m Entity,
        record: &Record,
        prefix: &str,
        schema: Option<&Schema>,
        foreign: Vec<(String, Cell)>,
    ) -> Result<Statement> {
        check_immutable(self.metadata, entity, record, prefix)?;
        let levels = levels(self.metadata, entity)?;
        let keys = self.metadata.key_properties(entity)?;
        if keys.is_empty() && levels.len() > 1 {
            return Err(BuildError::MissingPrimaryKey {
                entity: entity.name.clone(),
                path: String::new(),
            }
            .into());
        }
        let generated = self.generated(&keys, record);
        let children = self.children(
            entity,
            record,
            prefix,
            schema,
            generated,
            |entity, record, prefix, schema, foreign| {
                self.plan(entity, record, prefix, schema, foreign)
            },
        )?;
        let retrieve = generated.is_some()
            && (levels.len() > 1 || !children.is_empty() || !self.options.suppress_sequence);
        let mut assigned = self.navigations(entity, record, prefix)?;
        assigned.extend(foreign);
        let mut chain = Vec::with_capacity(levels.len() + 1);
        for (index, level) in levels.iter().copied().enumerate() {
            let alias = if prefix.is_empty() { &level.name } else { prefix };
            let mut insert = InsertStatement::new(
                StatementBase::new(alias),
                TableIdentifier::entity(&level.table, &level.name),
            );
            insert.base.track_slots(&level.table);
            let mut parameters = ParameterCollection::new();
            let mut row = Vec::new();
            for (property, cell) in
                self.cells(level, &keys, generated, index == 0, record, prefix, &assigned)?
            {
                insert.fields.push(
                    FieldIdentifier::unqualified(&property.field)
                        .with_token(join_path(prefix, &property.name)),
                );
                row.push(cell.into_expression(&mut parameters)?);
            }
            if !row.is_empty() {
                insert.rows.push(row);
            }
            let mut returning = ReturningClause::new();
            if index == 0
                && retrieve
                && self.features.returning
                && let Some(key) = generated
            {
                returning.add(returned_field(key, prefix), Image::Inserted);
            }
            if prefix.is_empty() {
                self.requested(level, &mut returning);
            }
            if !returning.is_empty() {
                insert.returning = Some(returning);
            }
            insert.base.parameters = Parameters::Own(parameters);
            chain.push(Statement::Insert(insert));
            if index == 0
                && retrieve
                && !self.features.returning
                && let Some(key) = generated
            {
                chain.push(sequence_select(key, prefix));
            }
        }
        Ok(nest(chain, children))
    }

    /// Whether the records can share one multi row insert per level.
    pub fn batchable(&self, entity: &'m Entity, records: &[Record]) -> Result<bool> {
        let levels = self.metadata.inherits(entity)?.len();
        let keys = self.metadata.key_properties(entity)?;
        let children = records
            .iter()
            .any(|r| r.iter().any(|(_, v)| matches!(v, Data::Records(..))));
        let generated = records.iter().any(|r| self.generated(&keys, r).is_some());
        Ok(!children
            && (!generated
                || (levels == 1 && (self.features.returning || self.options.suppress_sequence))))
    }

    /// One multi row insert per level, missing members are written as `DEFAULT`.
    pub fn batch(&self, entity: &'m Entity, records: &[Record]) -> Result<Statement> {
        let levels = levels(self.metadata, entity)?;
        let keys = self.metadata.key_properties(entity)?;
        let mut chain = Vec::with_capacity(levels.len());
        for (index, level) in levels.iter().copied().enumerate() {
            let mut fields: Vec<&'m SimplexProperty> = Vec::new();
            let mut rows = Vec::with_capacity(records.len());
            for record in records {
                check_immutable(self.metadata, entity, record, "")?;
                let generated = self.generated(&keys, record);
                let assigned = self.navigations(entity, record, "")?;
                let cells =
                    self.cells(level, &keys, generated, index == 0, record, "", &assigned)?;
                for (property, _) in &cells {
                    if !fields.iter().any(|v| same_name(&v.name, &property.name)) {
                        fields.push(property);
                    }
                }
                rows.push(cells);
            }
            let mut insert = InsertStatement::new(
                StatementBase::new(&level.name),
                TableIdentifier::entity(&level.table, &level.name),
            );
            insert.base.track_slots(&level.table);
            let mut parameters = ParameterCollection::new();
            for cells in rows {
                let mut row = Vec::with_capacity(fields.len());
                for field in &fields {
                    let expression = match cells
                        .iter()
                        .find(|(v, _)| same_name(&v.name, &field.name))
                    {
                        Some((_, cell)) => cell.clone().into_expression(&mut parameters)?,
                        None => Expression::literal("DEFAULT"),
                    };
                    row.push(expression);
                }
                insert.rows.push(row);
            }
            insert.fields = fields
                .iter()
                .map(|v| FieldIdentifier::unqualified(&v.field).with_token(&v.name))
                .collect();
            let mut returning = ReturningClause::new();
            if index == 0 && self.features.returning && !self.options.suppress_sequence {
                for key in keys.iter().filter(|v| v.sequence.is_some()) {
                    returning.add(returned_field(key, ""), Image::Inserted);
                }
            }
            self.requested(level, &mut returning);
            if !returning.is_empty() {
                insert.returning = Some(returning);
            }
            insert.base.parameters = Parameters::Own(parameters);
            chain.push(Statement::Insert(insert));
        }
        Ok(nest(chain, Vec::new()))
    }
}

pub(crate) fn has_value(record: &Record, member: &str) -> bool {
    record.value(member).is_some_and(|v| !v.is_null())
}

/// Column returned with the member path as label.
pub(crate) fn returned_field(property: &SimplexProperty, prefix: &str) -> FieldIdentifier {
    let label = join_path(prefix, &property.name);
    let field = FieldIdentifier::unqualified(&property.field);
    let field = if property.field == label {
        field
    } else {
        field.with_alias(&label)
    };
    field.with_token(label)
}

/// Select of the value last generated for the key.
pub(crate) fn sequence_select(key: &SimplexProperty, prefix: &str) -> Statement {
    let label = join_path(prefix, &key.name);
    let name = key
        .sequence
        .as_ref()
        .map(|v| v.name.as_str())
        .unwrap_or_default();
    SelectStatement::values(
        StatementBase::new(&label),
        vec![Expression::current_value(name).aliased(&label)],
    )
    .into()
}

/// Chain the statements so that each one is a slave of the previous, the children hang from the
/// last one.
pub(crate) fn nest(chain: Vec<Statement>, children: Vec<Statement>) -> Statement {
    let mut children = Some(children);
    let mut current: Option<Statement> = None;
    for mut statement in chain.into_iter().rev() {
        match current.take() {
            Some(next) => statement.slaves_mut().insert(0, next),
            None => statement
                .slaves_mut()
                .extend(children.take().unwrap_or_default()),
        }
        current = Some(statement);
    }
    current.unwrap_or_else(|| {
        Statement::Select(SelectStatement::values(StatementBase::default(), Vec::new()))
    })
}
