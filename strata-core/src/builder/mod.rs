mod aggregate;
mod delete;
mod execute;
mod exist;
mod insert;
mod select;
mod update;
mod upsert;

pub use aggregate::AGGREGATE_LABEL;
pub(crate) use insert::*;
pub(crate) use select::*;

use crate::{
    AccessContext, BuildError, ConditionExpression, Criteria, Data, Entity, Expression, Metadata,
    ParameterCollection, ParameterExpression, Property, Record, Resolver, Result, Scope,
    Statement, Translator, join_path,
};

/// Turns an access context into a plan: the returned statement runs first, its slaves after it
/// in depth first order.
pub trait StatementBuilder {
    fn build(&self) -> Result<Statement>;
}

impl AccessContext<'_> {
    /// Build the plan of the operation.
    pub fn build(&self) -> Result<Statement> {
        match self {
            AccessContext::Select(v) => v.build(),
            AccessContext::Insert(v) => v.build(),
            AccessContext::Update(v) => v.build(),
            AccessContext::Upsert(v) => v.build(),
            AccessContext::Delete(v) => v.build(),
            AccessContext::Exist(v) => v.build(),
            AccessContext::Aggregate(v) => v.build(),
            AccessContext::Execute(v) => v.build(),
        }
    }
}

pub(crate) fn built(statement: Statement) -> Statement {
    log::debug!(
        "Built {} with {} statement(s)",
        statement,
        statement.flatten().len()
    );
    statement
}

/// Translate the criteria of the caller into a condition of the scope.
pub(crate) fn filter<'m>(
    resolver: &mut Resolver<'m>,
    scope: &mut Scope<'m>,
    parameters: &mut ParameterCollection,
    criteria: Option<&Criteria>,
) -> Result<Option<Expression>> {
    match criteria {
        Some(criteria) => Translator::new(resolver, parameters).translate(scope, criteria),
        None => Ok(None),
    }
}

/// Levels of the inheritance chain, the root ancestor first.
///
/// Writes run in this order so that a key generated by the root table reaches the derived ones,
/// the reverse of the most-derived-first order of the chain lookups.
pub(crate) fn levels<'m>(metadata: &'m dyn Metadata, entity: &'m Entity) -> Result<Vec<&'m Entity>> {
    let mut result = metadata.inherits(entity)?;
    result.reverse();
    Ok(result)
}

/// Fail when the record writes a navigation declared immutable.
pub(crate) fn check_immutable(
    metadata: &dyn Metadata,
    entity: &Entity,
    record: &Record,
    prefix: &str,
) -> Result<()> {
    for (name, data) in record.iter() {
        if matches!(data, Data::Value(..)) {
            continue;
        }
        if let Some((_, Property::Complex(property))) = metadata.locate(entity, name)?
            && property.immutable
        {
            return Err(BuildError::ImmutableProperty {
                entity: entity.name.clone(),
                path: join_path(prefix, name),
            }
            .into());
        }
    }
    Ok(())
}

/// Equality of every primary key field of the scope table with the value in the record.
///
/// `pending` parameters are read from the record at execution, the others carry the value now.
pub(crate) fn key_condition<'m>(
    resolver: &Resolver<'m>,
    scope: &Scope<'m>,
    parameters: &mut ParameterCollection,
    record: &Record,
    prefix: &str,
    pending: bool,
) -> Result<ConditionExpression> {
    let mut result = ConditionExpression::and();
    for key in resolver.key(scope.entity)? {
        let value = match record.value(&key.name) {
            Some(v) if !v.is_null() => v,
            _ => {
                return Err(BuildError::MissingPrimaryKey {
                    entity: scope.entity.name.clone(),
                    path: join_path(prefix, &key.name),
                }
                .into());
            }
        };
        let parameter = if pending {
            ParameterExpression::pending(join_path(prefix, &key.name), key.data_type.clone())
        } else {
            ParameterExpression::value(value.clone(), key.data_type.clone())
        };
        result.add(Expression::equal(
            scope.field(key).into(),
            parameters.add(parameter)?,
        ));
    }
    Ok(result)
}
