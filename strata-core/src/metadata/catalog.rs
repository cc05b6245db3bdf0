use crate::{BuildError, CommandDef, Entity, Property, Result, SimplexProperty, same_name};
use std::collections::HashMap;

/// Read only access to the entity metadata, supplied by the host application.
pub trait Metadata: Send + Sync {
    fn entity(&self, name: &str) -> Option<&Entity>;
    fn command(&self, name: &str) -> Option<&CommandDef>;

    fn require_entity(&self, name: &str) -> Result<&Entity> {
        self.entity(name)
            .ok_or_else(|| BuildError::UnknownEntity(name.to_owned()).into())
    }

    fn require_command(&self, name: &str) -> Result<&CommandDef> {
        self.command(name)
            .ok_or_else(|| BuildError::UnknownCommand(name.to_owned()).into())
    }

    /// The inheritance chain starting from `entity` (included) up to the root ancestor.
    fn inherits<'a>(&'a self, entity: &'a Entity) -> Result<Vec<&'a Entity>> {
        let mut result = vec![entity];
        let mut current = entity;
        while let Some(base) = &current.base {
            let base = self.require_entity(base)?;
            if result.iter().any(|v| same_name(&v.name, &base.name)) {
                return Err(BuildError::UnresolvedPath {
                    entity: entity.name.clone(),
                    path: format!("{} (circular inheritance)", base.name),
                }
                .into());
            }
            result.push(base);
            current = base;
        }
        Ok(result)
    }

    /// Find a property declared by the entity or any of its ancestors, together with the owner.
    fn locate<'a>(
        &'a self,
        entity: &'a Entity,
        name: &str,
    ) -> Result<Option<(&'a Entity, &'a Property)>> {
        for owner in self.inherits(entity)? {
            if let Some(property) = owner.find(name) {
                return Ok(Some((owner, property)));
            }
        }
        Ok(None)
    }

    /// Primary key members, declared by the nearest entity of the chain that has a key.
    ///
    /// Every level of the chain stores the key in the same physical fields.
    fn key_properties<'a>(&'a self, entity: &'a Entity) -> Result<Vec<&'a SimplexProperty>> {
        let chain = self.inherits(entity)?;
        let Some(declaring) = chain.iter().find(|v| !v.key.is_empty()) else {
            return Ok(Vec::new());
        };
        let mut result = Vec::with_capacity(declaring.key.len());
        for name in &declaring.key {
            let property = chain
                .iter()
                .find_map(|v| v.simplex(name))
                .ok_or_else(|| BuildError::UnknownProperty {
                    entity: declaring.name.clone(),
                    member: name.clone(),
                })?;
            result.push(property);
        }
        Ok(result)
    }

    /// Every simplex property reachable through the inheritance chain, most derived first.
    ///
    /// Shared primary key members are reported once, owned by the most derived entity.
    fn simplex_properties<'a>(
        &'a self,
        entity: &'a Entity,
    ) -> Result<Vec<(&'a Entity, &'a SimplexProperty)>> {
        let mut result: Vec<(&Entity, &SimplexProperty)> = Vec::new();
        for owner in self.inherits(entity)? {
            for property in owner.simplex_properties() {
                if !result.iter().any(|(_, v)| same_name(&v.name, &property.name)) {
                    result.push((owner, property));
                }
            }
        }
        Ok(result)
    }
}

/// In-memory metadata, names are matched case insensitively.
#[derive(Debug, Default, Clone)]
pub struct MetadataCatalog {
    entities: HashMap<String, Entity>,
    commands: HashMap<String, CommandDef>,
}

impl MetadataCatalog {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.add_entity(entity);
        self
    }
    pub fn with_command(mut self, command: CommandDef) -> Self {
        self.add_command(command);
        self
    }
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.insert(entity.name.to_lowercase(), entity);
    }
    pub fn add_command(&mut self, command: CommandDef) {
        self.commands.insert(command.name.to_lowercase(), command);
    }
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }
}

impl Metadata for MetadataCatalog {
    fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(&name.to_lowercase())
    }
    fn command(&self, name: &str) -> Option<&CommandDef> {
        self.commands.get(&name.to_lowercase())
    }
}
