use crate::{
    Aliaser, BuildError, ComplexProperty, ConstraintActor, Entity, Expression, FieldIdentifier,
    JoinClause, JoinKey, JoinKind, Metadata, Multiplicity, Property, Result, SimplexProperty,
    SourceCollection, TableIdentifier, join_path, same_name, split_path,
};

/// How a one-to-many navigation met along a path is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Fail, the string tells where the path was used.
    Join(&'static str),
    /// Stop there, the caller builds a correlated sub statement.
    Subquery,
}

/// Sources being assembled for one statement.
#[derive(Debug, Clone)]
pub struct Scope<'m> {
    pub entity: &'m Entity,
    pub table: TableIdentifier,
    pub from: SourceCollection,
}

impl<'m> Scope<'m> {
    pub fn alias(&self) -> &str {
        &self.table.alias
    }
    /// Field of the primary table.
    pub fn field(&self, property: &SimplexProperty) -> FieldIdentifier {
        FieldIdentifier::new(&self.table.alias, &property.field).with_token(&property.name)
    }
    /// Names of every table in the scope.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.table.name.as_str())
            .chain(self.from.iter().map(|v| v.target.name.as_str()))
    }
}

/// Where a member path ends.
#[derive(Debug, Clone)]
pub enum Reduction<'m> {
    Field {
        field: FieldIdentifier,
        owner: &'m Entity,
        property: &'m SimplexProperty,
    },
    /// The path stops on a navigation: it ends there (one-to-one) or it goes through a
    /// one-to-many navigation under the subquery policy, `remainder` being the rest of the path.
    Navigation {
        /// Alias of the table holding the principal side of the links.
        source: String,
        owner: &'m Entity,
        property: &'m ComplexProperty,
        path: String,
        remainder: Option<String>,
    },
}

/// Resolves member paths into fields, registering the joins they need.
///
/// One resolver serves a whole plan, its aliaser keeps every alias unique.
pub struct Resolver<'m> {
    pub metadata: &'m dyn Metadata,
    pub aliaser: Aliaser,
    /// Skip the navigation constraints in the join conditions.
    pub ignore_constraint: bool,
}

impl<'m> Resolver<'m> {
    pub fn new(metadata: &'m dyn Metadata) -> Self {
        Self {
            metadata,
            aliaser: Aliaser::new(),
            ignore_constraint: false,
        }
    }

    pub fn entity(&self, name: &str) -> Result<&'m Entity> {
        self.metadata.require_entity(name)
    }

    /// A new scope whose primary table is the one of the entity.
    pub fn scope(&mut self, entity: &'m Entity) -> Scope<'m> {
        Scope {
            entity,
            table: self.table(entity),
            from: SourceCollection::new(),
        }
    }

    /// The table of the entity with a fresh alias.
    pub fn table(&mut self, entity: &Entity) -> TableIdentifier {
        TableIdentifier::entity(&entity.table, &entity.name).with_alias(self.aliaser.next())
    }

    pub fn key(&self, entity: &'m Entity) -> Result<Vec<&'m SimplexProperty>> {
        let result = self.metadata.key_properties(entity)?;
        if result.is_empty() {
            return Err(BuildError::MissingPrimaryKey {
                entity: entity.name.clone(),
                path: String::new(),
            }
            .into());
        }
        Ok(result)
    }

    /// Walk the member path from the scope entity, joining ancestors and one-to-one navigations.
    pub fn reduce(
        &mut self,
        scope: &mut Scope<'m>,
        path: &str,
        policy: Policy,
    ) -> Result<Reduction<'m>> {
        let root = scope.entity;
        let unresolved = || -> crate::Error {
            BuildError::UnresolvedPath {
                entity: root.name.clone(),
                path: path.to_owned(),
            }
            .into()
        };
        let mut entity = scope.entity;
        let mut alias = scope.table.alias.clone();
        let mut prefix = String::new();
        let mut rest = path;
        loop {
            let (head, tail) = split_path(rest);
            let chain = self.metadata.inherits(entity)?;
            let Some((position, property)) = chain
                .iter()
                .enumerate()
                .find_map(|(i, v)| v.find(head).map(|p| (i, p)))
            else {
                return Err(unresolved());
            };
            let owner = chain[position];
            let mut source = alias.clone();
            // Every level stores the primary key, reading it needs no ancestor
            let shared_key = match property {
                Property::Simplex(p) if position > 0 => self
                    .metadata
                    .key_properties(entity)?
                    .iter()
                    .any(|k| same_name(&k.name, &p.name)),
                _ => false,
            };
            // Ancestors are joined root to leaf
            if !shared_key {
                for ancestor in chain[1..=position].iter().rev() {
                    let joined =
                        self.inheritance_join(scope, &prefix, &alias, entity, ancestor)?;
                    if same_name(&ancestor.name, &owner.name) {
                        source = joined;
                    }
                }
            }
            match property {
                Property::Simplex(property) => {
                    if tail.is_some() {
                        return Err(unresolved());
                    }
                    return Ok(Reduction::Field {
                        field: FieldIdentifier::new(source, &property.field).with_token(path),
                        owner,
                        property,
                    });
                }
                Property::Complex(property) => {
                    let current = join_path(&prefix, head);
                    if property.is_one_to_many() {
                        return match policy {
                            Policy::Join(usage) => Err(BuildError::IllegalNavigation {
                                entity: root.name.clone(),
                                path: current,
                                usage,
                            }
                            .into()),
                            Policy::Subquery => Ok(Reduction::Navigation {
                                source,
                                owner,
                                property,
                                path: current,
                                remainder: tail.map(ToOwned::to_owned),
                            }),
                        };
                    }
                    let Some(tail) = tail else {
                        return Ok(Reduction::Navigation {
                            source,
                            owner,
                            property,
                            path: current,
                            remainder: None,
                        });
                    };
                    let (joined, target) =
                        self.navigation_join(scope, &prefix, &current, property)?;
                    log::trace!("Path `{}` reaches `{}` as {}", current, target.name, joined);
                    entity = target;
                    alias = joined;
                    prefix = current;
                    rest = tail;
                }
            }
        }
    }

    /// Like `reduce` but the path must end on a field.
    pub fn reduce_field(
        &mut self,
        scope: &mut Scope<'m>,
        path: &str,
        usage: &'static str,
    ) -> Result<(FieldIdentifier, &'m SimplexProperty)> {
        match self.reduce(scope, path, Policy::Join(usage))? {
            Reduction::Field {
                field, property, ..
            } => Ok((field, property)),
            Reduction::Navigation { path, .. } => Err(BuildError::UnresolvedPath {
                entity: scope.entity.name.clone(),
                path,
            }
            .into()),
        }
    }

    /// Join an ancestor table on the shared primary key, returns its alias.
    pub fn inheritance_join(
        &mut self,
        scope: &mut Scope<'m>,
        prefix: &str,
        alias: &str,
        entity: &'m Entity,
        ancestor: &'m Entity,
    ) -> Result<String> {
        let key = JoinKey::inheritance(prefix, &ancestor.name);
        if let Some(join) = scope.from.find(&key) {
            return Ok(join.alias().to_owned());
        }
        let fields = self.key(entity)?;
        let target = self.table(ancestor);
        let mut join = JoinClause::new(key, JoinKind::Left, target);
        for field in fields {
            join.on.add(Expression::equal(
                join.target.field(&field.field).into(),
                FieldIdentifier::new(alias, &field.field).into(),
            ));
        }
        log::trace!("Inheritance join {} of `{}`", join.key, ancestor.name);
        let key = join.key.clone();
        let (join, _) = scope.from.get_or_add(&key, || join);
        Ok(join.alias().to_owned())
    }

    /// Join the entity reached by a one-to-one navigation, returns its alias and entity.
    ///
    /// `prefix` is the path of the entity declaring the navigation, `path` the one of the navigation.
    pub fn navigation_join(
        &mut self,
        scope: &mut Scope<'m>,
        prefix: &str,
        path: &str,
        property: &'m ComplexProperty,
    ) -> Result<(String, &'m Entity)> {
        let target = self.entity(&property.port)?;
        let key = JoinKey::navigation(path);
        if let Some(join) = scope.from.find(&key) {
            return Ok((join.alias().to_owned(), target));
        }
        let kind = match property.multiplicity {
            Multiplicity::One => JoinKind::Inner,
            _ => JoinKind::Left,
        };
        let mut join = JoinClause::new(key, kind, self.table(target));
        for link in &property.links {
            let principal = self.reduce_link(scope, prefix, &link.principal)?;
            let foreign = self.foreign_field(target, &link.foreign)?;
            join.on.add(Expression::equal(
                join.target.field(foreign).into(),
                principal.into(),
            ));
        }
        if !self.ignore_constraint {
            for constraint in &property.constraints {
                let field = match constraint.actor {
                    ConstraintActor::Principal => {
                        self.reduce_link(scope, prefix, &constraint.name)?
                    }
                    ConstraintActor::Foreign => join
                        .target
                        .field(self.foreign_field(target, &constraint.name)?),
                };
                join.on.add(Expression::equal(
                    field.into(),
                    Expression::Constant(constraint.value.clone()),
                ));
            }
        }
        let key = join.key.clone();
        let (join, _) = scope.from.get_or_add(&key, || join);
        Ok((join.alias().to_owned(), target))
    }

    fn reduce_link(
        &mut self,
        scope: &mut Scope<'m>,
        prefix: &str,
        member: &str,
    ) -> Result<FieldIdentifier> {
        let path = join_path(prefix, member);
        Ok(self.reduce_field(scope, &path, "as a link")?.0)
    }

    /// Physical field of a member of the navigated entity, keys live on every level.
    pub fn foreign_field(&self, entity: &'m Entity, member: &str) -> Result<&'m str> {
        match self.metadata.locate(entity, member)? {
            Some((_, Property::Simplex(property))) => Ok(&property.field),
            _ => Err(BuildError::UnknownProperty {
                entity: entity.name.clone(),
                member: member.to_owned(),
            }
            .into()),
        }
    }

    /// Conditions correlating the navigated entity (aliased `target`) with the principal side.
    pub fn link_condition(
        &self,
        source: &str,
        owner: &'m Entity,
        property: &'m ComplexProperty,
        target: &str,
    ) -> Result<Vec<Expression>> {
        let foreign_entity = self.entity(&property.port)?;
        let mut result = Vec::new();
        for link in &property.links {
            let principal = self.foreign_field(owner, &link.principal)?;
            let foreign = self.foreign_field(foreign_entity, &link.foreign)?;
            result.push(Expression::equal(
                Expression::field(target, foreign),
                Expression::field(source, principal),
            ));
        }
        if !self.ignore_constraint {
            for constraint in &property.constraints {
                let field = match constraint.actor {
                    ConstraintActor::Principal => Expression::field(
                        source,
                        self.foreign_field(owner, &constraint.name)?,
                    ),
                    ConstraintActor::Foreign => Expression::field(
                        target,
                        self.foreign_field(foreign_entity, &constraint.name)?,
                    ),
                };
                result.push(Expression::equal(
                    field,
                    Expression::Constant(constraint.value.clone()),
                ));
            }
        }
        Ok(result)
    }
}
