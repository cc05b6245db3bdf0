use crate::{
    ArithmeticOperator, BuildError, Combination, Condition, ConditionExpression, ConditionOperator,
    Criteria, CriteriaValue, DataType, Expression, Operand, Operator, Paging, ParameterCollection,
    ParameterExpression, Policy, Reduction, Resolver, Result, Scope, SelectStatement,
    StatementBase, UnaryOperator, Value, same_name,
};

/// Turns the criteria of the caller into condition expressions.
///
/// Members are resolved through the resolver, registering the joins they need into the scope.
/// Values become parameters of `parameters`, correlated sub statements share it.
pub struct Translator<'t, 'm> {
    pub resolver: &'t mut Resolver<'m>,
    pub parameters: &'t mut ParameterCollection,
    /// Expressions addressable by alias with their type, the aggregates of a grouped select.
    pub aliases: Vec<(String, Expression, DataType)>,
}

impl<'t, 'm> Translator<'t, 'm> {
    pub fn new(resolver: &'t mut Resolver<'m>, parameters: &'t mut ParameterCollection) -> Self {
        Self {
            resolver,
            parameters,
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: Vec<(String, Expression, DataType)>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Translate a criteria tree keeping its grouping.
    ///
    /// Conditions that do not filter anything vanish: `In` and `NotIn` over an empty list, a
    /// `Between` without bounds. A group left empty vanishes too, `None` means no filter at all.
    pub fn translate(
        &mut self,
        scope: &mut Scope<'m>,
        criteria: &Criteria,
    ) -> Result<Option<Expression>> {
        match criteria {
            Criteria::Condition(condition) => self.condition(scope, condition),
            Criteria::Group { combination, items } => {
                let mut group = match combination {
                    Combination::And => ConditionExpression::and(),
                    Combination::Or => ConditionExpression::or(),
                };
                for item in items {
                    if let Some(v) = self.translate(scope, item)? {
                        group.add(v);
                    }
                }
                Ok(group.into_expression())
            }
        }
    }

    fn condition(
        &mut self,
        scope: &mut Scope<'m>,
        condition: &Condition,
    ) -> Result<Option<Expression>> {
        let path = condition.member.as_str();
        if matches!(
            condition.operator,
            ConditionOperator::Exists | ConditionOperator::NotExists
        ) {
            return self.exists(scope, condition).map(Some);
        }
        let (member, data_type) = self.member(scope, path)?;
        let result = match (condition.operator, &condition.value) {
            (ConditionOperator::Between, CriteriaValue::Range { min, max }) => {
                match (min, max) {
                    (Some(min), Some(max)) if min == max => {
                        Expression::equal(member, self.value(min.clone(), &data_type)?)
                    }
                    (Some(min), Some(max)) => Expression::between(
                        member,
                        self.value(min.clone(), &data_type)?,
                        self.value(max.clone(), &data_type)?,
                    ),
                    (Some(min), None) => Expression::greater_than_or_equal(
                        member,
                        self.value(min.clone(), &data_type)?,
                    ),
                    (None, Some(max)) => Expression::less_than_or_equal(
                        member,
                        self.value(max.clone(), &data_type)?,
                    ),
                    (None, None) => {
                        log::debug!("Range without bounds on `{}`, the condition is dropped", path);
                        return Ok(None);
                    }
                }
            }
            (ConditionOperator::In | ConditionOperator::NotIn, value) => {
                let negated = condition.operator == ConditionOperator::NotIn;
                let values: &[Value] = match value {
                    CriteriaValue::Values(v) => v,
                    CriteriaValue::Value(Value::List(Some(v), ..)) => v,
                    CriteriaValue::Value(v) => std::slice::from_ref(v),
                    _ => return Err(self.unsupported(scope, path, "expected a list of values")),
                };
                match values {
                    [] => {
                        log::debug!(
                            "Empty list of values for `{}`, the condition is dropped",
                            path
                        );
                        return Ok(None);
                    }
                    [value] => {
                        let value = self.value(value.clone(), &data_type)?;
                        if negated {
                            Expression::not_equal(member, value)
                        } else {
                            Expression::equal(member, value)
                        }
                    }
                    _ => {
                        let mut items = Vec::with_capacity(values.len());
                        for value in values {
                            items.push(self.value(value.clone(), &data_type)?);
                        }
                        if negated {
                            Expression::not_in(member, items)
                        } else {
                            Expression::is_in(member, items)
                        }
                    }
                }
            }
            (operator, CriteriaValue::None) => match operator {
                ConditionOperator::Equal => Expression::equal(member, Expression::null()),
                ConditionOperator::NotEqual => Expression::not_equal(member, Expression::null()),
                _ => return Err(self.unsupported(scope, path, "missing value")),
            },
            (operator, CriteriaValue::Value(value)) => {
                let value = self.value(value.clone(), &data_type)?;
                Expression::binary(self.comparison(scope, path, operator)?, member, value)
            }
            (operator, CriteriaValue::Operand(operand)) => {
                let (value, _) = self.operand(scope, operand, &data_type)?;
                Expression::binary(self.comparison(scope, path, operator)?, member, value)
            }
            (operator, _) => {
                return Err(self.unsupported(
                    scope,
                    path,
                    &format!("unexpected value for {:?}", operator),
                ));
            }
        };
        Ok(Some(result))
    }

    fn comparison(
        &self,
        scope: &Scope<'m>,
        path: &str,
        operator: ConditionOperator,
    ) -> Result<Operator> {
        Ok(match operator {
            ConditionOperator::Equal => Operator::Equal,
            ConditionOperator::NotEqual => Operator::NotEqual,
            ConditionOperator::GreaterThan => Operator::GreaterThan,
            ConditionOperator::GreaterThanOrEqual => Operator::GreaterThanOrEqual,
            ConditionOperator::LessThan => Operator::LessThan,
            ConditionOperator::LessThanOrEqual => Operator::LessThanOrEqual,
            ConditionOperator::Like => Operator::Like,
            ConditionOperator::NotLike => Operator::NotLike,
            v => return Err(self.unsupported(scope, path, &format!("{:?} needs a list", v))),
        })
    }

    /// Resolve a member path, or an alias when it matches one.
    fn member(&mut self, scope: &mut Scope<'m>, path: &str) -> Result<(Expression, DataType)> {
        if let Some((_, expression, data_type)) =
            self.aliases.iter().find(|(k, ..)| same_name(k, path))
        {
            return Ok((expression.clone(), data_type.clone()));
        }
        let (field, property) = self.resolver.reduce_field(scope, path, "in a criteria")?;
        Ok((field.into(), property.data_type.clone()))
    }

    /// The value as a parameter, `NULL` is written inline so that it compares with `IS`.
    fn value(&mut self, value: Value, data_type: &DataType) -> Result<Expression> {
        if value.is_null() {
            return Ok(Expression::null());
        }
        let data_type = value.data_type().unwrap_or_else(|| data_type.clone());
        self.parameters
            .add(ParameterExpression::value(value, data_type))
    }

    /// Translate a computed operand, returns the expression and its data type.
    fn operand(
        &mut self,
        scope: &mut Scope<'m>,
        operand: &Operand,
        hint: &DataType,
    ) -> Result<(Expression, DataType)> {
        Ok(match operand {
            Operand::Member(path) => self.member(scope, path)?,
            Operand::Value(value) => {
                let data_type = value.data_type().unwrap_or_else(|| hint.clone());
                (self.value(value.clone(), &data_type)?, data_type)
            }
            Operand::Unary(operator, operand) => {
                let (operand, data_type) = self.operand(scope, operand, hint)?;
                let operator = match operator {
                    UnaryOperator::Negate => Operator::Negate,
                    UnaryOperator::Not if data_type.is_integer() => Operator::BitwiseNot,
                    UnaryOperator::Not => Operator::Not,
                };
                (Expression::unary(operator, operand), data_type)
            }
            Operand::Binary(operator, left, right) => {
                let (left, left_type) = self.operand(scope, left, hint)?;
                let (right, right_type) = self.operand(scope, right, hint)?;
                let textual = left_type.is_textual() || right_type.is_textual();
                let operator = match operator {
                    ArithmeticOperator::Add if textual => Operator::Concatenate,
                    ArithmeticOperator::Add => Operator::Plus,
                    ArithmeticOperator::Subtract => Operator::Minus,
                    ArithmeticOperator::Multiply => Operator::Multiply,
                    ArithmeticOperator::Divide => Operator::Divide,
                    ArithmeticOperator::Modulo => Operator::Modulo,
                    ArithmeticOperator::BitwiseAnd => Operator::BitwiseAnd,
                    ArithmeticOperator::BitwiseOr => Operator::BitwiseOr,
                    ArithmeticOperator::BitwiseXor => Operator::BitwiseXor,
                };
                let data_type = if textual {
                    DataType::String(0)
                } else {
                    left_type
                };
                (Expression::binary(operator, left, right), data_type)
            }
        })
    }

    /// `Exists` on a navigation is a correlated sub select limited to one row, on a field it
    /// tests for `NULL`.
    fn exists(&mut self, scope: &mut Scope<'m>, condition: &Condition) -> Result<Expression> {
        let negated = condition.operator == ConditionOperator::NotExists;
        let nested = match &condition.value {
            CriteriaValue::None => None,
            CriteriaValue::Criteria(v) => Some(v.as_ref()),
            _ => {
                return Err(self.unsupported(
                    scope,
                    &condition.member,
                    "exists accepts only a nested criteria",
                ));
            }
        };
        match self
            .resolver
            .reduce(scope, &condition.member, Policy::Subquery)?
        {
            Reduction::Field { field, .. } => {
                if nested.is_some() {
                    return Err(self.unsupported(
                        scope,
                        &condition.member,
                        "a nested criteria needs a navigation",
                    ));
                }
                Ok(if negated {
                    Expression::equal(field.into(), Expression::null())
                } else {
                    Expression::not_equal(field.into(), Expression::null())
                })
            }
            Reduction::Navigation {
                source,
                owner,
                property,
                path,
                remainder,
            } => {
                let target = self.resolver.entity(&property.port)?;
                let mut sub = self.resolver.scope(target);
                let mut select =
                    SelectStatement::new(StatementBase::hosted(&path), sub.table.clone());
                for v in self
                    .resolver
                    .link_condition(&source, owner, property, sub.alias())?
                {
                    select.condition.add(v);
                }
                // The rest of the path is tested inside the sub select
                let inner = match remainder {
                    Some(rest) => Some(Criteria::Condition(Condition {
                        member: rest,
                        operator: ConditionOperator::Exists,
                        value: condition.value.clone(),
                    })),
                    None => nested.cloned(),
                };
                if let Some(inner) = inner {
                    if let Some(v) = self.translate(&mut sub, &inner)? {
                        select.condition.add(v);
                    }
                }
                select.from = sub.from;
                select.members.push(Expression::literal("1"));
                select.paging = Some(Paging::limit(1));
                log::trace!("Correlated sub select for `{}`", path);
                Ok(if negated {
                    Expression::not_exists(select)
                } else {
                    Expression::exists(select)
                })
            }
        }
    }

    fn unsupported(&self, scope: &Scope<'m>, path: &str, detail: &str) -> crate::Error {
        BuildError::UnsupportedCriteria {
            entity: scope.entity.name.clone(),
            path: path.to_owned(),
            detail: detail.to_owned(),
        }
        .into()
    }
}
