//! World state: the entity-component manager.
//!
//! A [`World`] owns the entity registry, the schema registry, and a storage
//! backend. All reads and writes go through it (or through an [`Entity`]
//! handle that forwards to it). Writes are validated in full before anything
//! is mutated, so a failed call leaves the world unchanged.

use ecm_foundation::{
    Component, ComponentType, EntityId, EntitySet, Error, ErrorContext, Result, SchemaViolation,
    Value, WorldId,
};
use tracing::{debug, trace, warn};

use crate::backend::{DenseStorage, Storage};
use crate::config::WorldConfig;
use crate::entity::EntityStore;
use crate::handle::Entity;
use crate::query::{self, QueryRow};
use crate::relational::TableStorage;
use crate::schema::{ComponentSchema, Registration, SchemaRegistry};

/// An entity-component manager.
///
/// Generic over its [`Storage`] backend; [`DenseStorage`] by default.
#[derive(Debug)]
pub struct World<S: Storage = DenseStorage> {
    /// Identity, checked by entity handles.
    id: WorldId,
    /// Registration and validation policy.
    config: WorldConfig,
    /// Entity lifecycle management.
    entities: EntityStore,
    /// Registered component schemas.
    schemas: SchemaRegistry,
    /// Component data.
    storage: S,
}

impl World {
    /// Creates an empty world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates an empty world with the given configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        let storage = DenseStorage::with_capacity(config.capacity_hint);
        Self::with_storage(storage, config)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World<TableStorage> {
    /// Creates an empty world backed by relational tables.
    #[must_use]
    pub fn relational(config: WorldConfig) -> Self {
        Self::with_storage(TableStorage::new(), config)
    }
}

impl<S: Storage> World<S> {
    /// Creates an empty world over the given backend.
    #[must_use]
    pub fn with_storage(storage: S, config: WorldConfig) -> Self {
        let id = WorldId::next();
        debug!(world = %id, backend = S::NAME, autoregister = config.autoregister, "world created");
        Self {
            id,
            config,
            entities: EntityStore::new(),
            schemas: SchemaRegistry::new(),
            storage,
        }
    }

    /// Returns this world's identity.
    #[must_use]
    pub fn id(&self) -> WorldId {
        self.id
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the storage backend.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // --- Entities ---

    /// Allocates a new entity.
    pub fn new_entity(&mut self) -> EntityId {
        let id = self.entities.spawn();
        self.storage.entity_created(id);
        trace!(world = %self.id, entity = id.index(), "entity created");
        id
    }

    /// Allocates a new entity and returns a handle to it.
    pub fn spawn(&mut self) -> Entity {
        let id = self.new_entity();
        self.entity(id)
    }

    /// Returns a handle for an entity id of this world.
    ///
    /// The id is not checked; handle operations on a dead entity behave like
    /// the matching world operations.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Entity {
        Entity::new(self.id, id)
    }

    /// Removes an entity and all of its components.
    ///
    /// Returns false (and does nothing) if the entity is not live.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        self.destroy(id).is_some()
    }

    /// Removes an entity and returns the components it held, in registration
    /// order. Returns an empty vector if the entity is not live.
    pub fn take_entity(&mut self, id: EntityId) -> Vec<Component> {
        self.destroy(id).unwrap_or_default()
    }

    /// Removes every live entity. Ids allocated later continue from where
    /// allocation stopped.
    pub fn clear(&mut self) {
        let live = self.entities.live().clone();
        for id in live.iter() {
            self.destroy(id);
        }
        debug!(world = %self.id, removed = live.len(), next_id = self.entities.next_id().index(), "world cleared");
    }

    /// Checks if an entity is live.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.exists(id)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    fn destroy(&mut self, id: EntityId) -> Option<Vec<Component>> {
        if !self.entities.exists(id) {
            return None;
        }
        let removed: Vec<Component> = self
            .schemas
            .iter()
            .filter_map(|schema| self.storage.clear(schema, id))
            .collect();
        self.entities.despawn(id);
        self.storage.entity_removed(id);
        debug!(world = %self.id, entity = id.index(), components = removed.len(), "entity removed");
        Some(removed)
    }

    // --- Schemas ---

    /// Registers a component type.
    ///
    /// Registering a type that is already known has no effect, except that a
    /// redeclaration with the same fields and a value index enables the index
    /// (see [`World::index_component_type`]). A redeclaration with different
    /// fields is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the declaration is malformed.
    pub fn register_component_type(&mut self, schema: ComponentSchema) -> Result<()> {
        let name = schema.name.clone();
        let indexed = schema.indexed;
        let registration = self.schemas.register(schema).map_err(|e| {
            e.with_context(
                ErrorContext::new()
                    .with_operation("register_component_type")
                    .with_component(name.as_str()),
            )
        })?;
        match registration {
            Registration::Added => {
                if let Some(schema) = self.schemas.get(name.as_str()) {
                    self.storage.register(schema, self.entities.slot_count());
                }
                debug!(world = %self.id, component = %name, indexed, "component type registered");
            }
            Registration::Indexed => {
                if let Some(schema) = self.schemas.get(name.as_str()) {
                    self.storage.enable_index(schema);
                    debug!(
                        world = %self.id,
                        component = %name,
                        holders = self.storage.members(schema).len(),
                        "value index enabled by redeclaration"
                    );
                }
            }
            Registration::Unchanged => {
                trace!(world = %self.id, component = %name, "component type already registered");
            }
            Registration::Conflicting => {
                warn!(
                    world = %self.id,
                    component = %name,
                    "ignoring redeclaration of component type with a different schema"
                );
            }
        }
        Ok(())
    }

    /// Enables a value index on a registered type, indexing the values it
    /// already holds.
    ///
    /// # Errors
    ///
    /// Returns an unregistered type error if the type is unknown.
    pub fn index_component_type(&mut self, ty: &str) -> Result<()> {
        if !self.schemas.contains(ty) {
            return Err(unregistered(ty, "index_component_type"));
        }
        if let Some(schema) = self.schemas.set_indexed(ty) {
            self.storage.enable_index(schema);
            debug!(
                world = %self.id,
                component = ty,
                holders = self.storage.members(schema).len(),
                "value index enabled"
            );
        }
        Ok(())
    }

    /// Returns the schema of a registered type.
    #[must_use]
    pub fn schema(&self, ty: &str) -> Option<&ComponentSchema> {
        self.schemas.get(ty)
    }

    /// Iterates registered types in registration order.
    pub fn component_types(&self) -> impl Iterator<Item = &ComponentType> {
        self.schemas.iter().map(|s| &s.name)
    }

    /// Checks if a type is registered.
    #[must_use]
    pub fn is_registered(&self, ty: &str) -> bool {
        self.schemas.contains(ty)
    }

    /// Checks if a registered type keeps a value index.
    #[must_use]
    pub fn is_indexed(&self, ty: &str) -> bool {
        self.schemas.get(ty).is_some_and(|s| s.indexed)
    }

    // --- Components ---

    /// Attaches a component to an entity, replacing any value of the same type.
    ///
    /// # Errors
    ///
    /// - entity not found if the entity is not live
    /// - unregistered type if the type is unknown and autoregistration is off
    /// - schema error if the value does not match the type's schema
    pub fn set_component(&mut self, id: EntityId, component: Component) -> Result<()> {
        self.write(id, component, "set_component").map(|_| ())
    }

    /// Reads the component of a type held by an entity.
    ///
    /// Returns `None` if the entity does not hold one or is not live.
    ///
    /// # Errors
    ///
    /// Returns an unregistered type error if the type is unknown and
    /// autoregistration is off.
    pub fn get_component(&self, id: EntityId, ty: &str) -> Result<Option<Component>> {
        let Some(schema) = self.resolve(ty, "get_component")? else {
            return Ok(None);
        };
        if !self.entities.exists(id) {
            return Ok(None);
        }
        Ok(self.storage.read(schema, id))
    }

    /// Checks if an entity holds a component of a type.
    ///
    /// # Errors
    ///
    /// Returns an unregistered type error if the type is unknown and
    /// autoregistration is off.
    pub fn has_component(&self, id: EntityId, ty: &str) -> Result<bool> {
        let Some(schema) = self.resolve(ty, "has_component")? else {
            return Ok(false);
        };
        Ok(self.entities.exists(id) && self.storage.contains(schema, id))
    }

    /// Detaches a component from an entity, returning the removed value.
    ///
    /// Detaching a component the entity does not hold is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an unregistered type error if the type is unknown and
    /// autoregistration is off.
    pub fn remove_component(&mut self, id: EntityId, ty: &str) -> Result<Option<Component>> {
        let Some(schema) = resolve_in(&self.schemas, &self.config, ty, "remove_component")? else {
            return Ok(None);
        };
        if !self.entities.exists(id) {
            return Ok(None);
        }
        let removed = self.storage.clear(schema, id);
        if removed.is_some() {
            trace!(world = %self.id, entity = id.index(), component = ty, "component removed");
        }
        Ok(removed)
    }

    /// Replaces a component with the result of a transform of its current
    /// value. Returns the stored value, or `None` if the entity does not hold
    /// the component (the transform is not called).
    ///
    /// # Errors
    ///
    /// Propagates errors from the transform, and returns a schema error if
    /// the new value is of another type or does not match the schema.
    pub fn update_component<F>(&mut self, id: EntityId, ty: &str, f: F) -> Result<Option<Component>>
    where
        F: FnOnce(&Component) -> Result<Component>,
    {
        let Some(current) = self.get_component(id, ty)? else {
            return Ok(None);
        };
        let updated = f(&current)?;
        if updated.component_type().as_str() != ty {
            return Err(Error::schema(
                ty,
                SchemaViolation::ComponentTypeMismatch {
                    expected: ty.to_string(),
                    actual: updated.component_type().to_string(),
                },
            )
            .with_context(context("update_component", id, ty)));
        }
        self.write(id, updated, "update_component").map(Some)
    }

    /// Returns every component an entity holds, in registration order.
    #[must_use]
    pub fn components(&self, id: EntityId) -> Vec<Component> {
        if !self.entities.exists(id) {
            return Vec::new();
        }
        self.schemas
            .iter()
            .filter_map(|schema| self.storage.read(schema, id))
            .collect()
    }

    // --- Queries ---

    /// Returns the entities holding every listed type.
    ///
    /// With no types, returns every live entity.
    ///
    /// # Errors
    ///
    /// Returns an unregistered type error if a type is unknown and
    /// autoregistration is off.
    pub fn entities(&self, types: &[&str]) -> Result<Vec<EntityId>> {
        Ok(self
            .select(types, "entities")?
            .map(|(set, _)| set.to_vec())
            .unwrap_or_default())
    }

    /// Returns the entities holding every listed type, with those components
    /// in the order the types were listed.
    ///
    /// # Errors
    ///
    /// Returns an unregistered type error if a type is unknown and
    /// autoregistration is off.
    pub fn entities_with_components(&self, types: &[&str]) -> Result<Vec<QueryRow>> {
        Ok(self
            .select(types, "entities_with_components")?
            .map(|(set, schemas)| query::rows(&self.storage, &set, &schemas))
            .unwrap_or_default())
    }

    /// Returns the holders of a type whose fields equal every given value.
    ///
    /// With no constraints, returns every holder of the type.
    ///
    /// ```
    /// use ecm_storage::{ComponentSchema, FieldSchema, World};
    /// use ecm_foundation::{Component, FieldKind};
    ///
    /// let mut world = World::new();
    /// world.register_component_type(
    ///     ComponentSchema::new("Position")
    ///         .with_field(FieldSchema::new("x", FieldKind::Int))
    ///         .with_field(FieldSchema::new("y", FieldKind::Int))
    ///         .with_index(),
    /// )?;
    /// let e = world.new_entity();
    /// world.set_component(e, Component::new("Position").with("x", 0).with("y", 0))?;
    ///
    /// assert_eq!(world.entities_by_value("Position", [("x", 0), ("y", 0)])?, vec![e]);
    /// # Ok::<(), ecm_foundation::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// - unregistered type if the type is unknown and autoregistration is off
    /// - schema error if a constraint names an unknown field or has the wrong kind
    pub fn entities_by_value<I, N, V>(&self, ty: &str, constraints: I) -> Result<Vec<EntityId>>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<Value>,
    {
        let Some(schema) = self.resolve(ty, "entities_by_value")? else {
            return Ok(Vec::new());
        };
        let resolved = constraints
            .into_iter()
            .map(|(field, value)| schema.resolve(field.as_ref(), &value.into()))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| {
                e.with_context(
                    ErrorContext::new()
                        .with_operation("entities_by_value")
                        .with_component(ty),
                )
            })?;
        Ok(self.storage.lookup(schema, &resolved).to_vec())
    }

    // --- Internals ---

    fn resolve(&self, ty: &str, operation: &'static str) -> Result<Option<&ComponentSchema>> {
        resolve_in(&self.schemas, &self.config, ty, operation)
    }

    /// Resolves types for a query. `None` means an unknown type under
    /// autoregistration, which nothing can hold.
    fn select(
        &self,
        types: &[&str],
        operation: &'static str,
    ) -> Result<Option<(EntitySet, Vec<&ComponentSchema>)>> {
        let mut schemas = Vec::with_capacity(types.len());
        for ty in types {
            match self.resolve(ty, operation)? {
                Some(schema) => schemas.push(schema),
                None => return Ok(None),
            }
        }
        let set = query::holders_of_all(&self.storage, &schemas)
            .unwrap_or_else(|| self.entities.live().clone());
        Ok(Some((set, schemas)))
    }

    fn write(
        &mut self,
        id: EntityId,
        component: Component,
        operation: &'static str,
    ) -> Result<Component> {
        let ty = component.component_type().clone();
        let ctx = || context(operation, id, ty.as_str());

        if !self.entities.exists(id) {
            return Err(Error::entity_not_found(id).with_context(ctx()));
        }

        let inferred = match self.schemas.get(ty.as_str()) {
            Some(_) => None,
            None if self.config.autoregister => {
                let mut schema = ComponentSchema::infer(&component);
                schema.indexed = self.config.index_autoregistered;
                schema.validate().map_err(|e| e.with_context(ctx()))?;
                Some(schema)
            }
            None => return Err(Error::unregistered_type(ty.as_str()).with_context(ctx())),
        };

        let stored = {
            let schema = match &inferred {
                Some(schema) => schema,
                None => self
                    .schemas
                    .get(ty.as_str())
                    .ok_or_else(|| Error::unregistered_type(ty.as_str()).with_context(ctx()))?,
            };
            let stored = schema.conform(component).map_err(|e| e.with_context(ctx()))?;
            self.check_entity_refs(&stored).map_err(|e| e.with_context(ctx()))?;
            stored
        };

        if let Some(schema) = inferred {
            debug!(world = %self.id, component = %ty, fields = schema.arity(), "autoregistering component type");
            self.register_component_type(schema)?;
        }

        let schema = self
            .schemas
            .get(ty.as_str())
            .ok_or_else(|| Error::unregistered_type(ty.as_str()).with_context(ctx()))?;
        let previous = self.storage.write(schema, id, stored.clone());
        trace!(
            world = %self.id,
            entity = id.index(),
            component = %ty,
            replaced = previous.is_some(),
            "component written"
        );
        Ok(stored)
    }

    fn check_entity_refs(&self, component: &Component) -> Result<()> {
        if !self.config.validate_entity_refs {
            return Ok(());
        }
        for field in component.fields() {
            if let Value::EntityRef(target) = field.value {
                if !self.entities.exists(target) {
                    return Err(Error::schema(
                        component.component_type().as_str(),
                        SchemaViolation::DanglingEntityRef {
                            field: field.name.to_string(),
                            target,
                        },
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Resolves a type name for an operation. `Ok(None)` means the type is
/// unknown but autoregistration is on.
fn resolve_in<'a>(
    schemas: &'a SchemaRegistry,
    config: &WorldConfig,
    ty: &str,
    operation: &'static str,
) -> Result<Option<&'a ComponentSchema>> {
    match schemas.get(ty) {
        Some(schema) => Ok(Some(schema)),
        None if config.autoregister => Ok(None),
        None => Err(unregistered(ty, operation)),
    }
}

fn unregistered(ty: &str, operation: &'static str) -> Error {
    Error::unregistered_type(ty).with_context(
        ErrorContext::new()
            .with_operation(operation)
            .with_component(ty),
    )
}

fn context(operation: &'static str, id: EntityId, ty: &str) -> ErrorContext {
    ErrorContext::new()
        .with_operation(operation)
        .with_entity(id)
        .with_component(ty)
}
