//! Storage backends.
//!
//! A [`World`](crate::World) owns the entity registry and the schemas; a
//! [`Storage`] owns the component data and answers membership and value
//! lookups. The world validates every write before it reaches the backend,
//! so backend operations cannot fail.
//!
//! Two backends ship with the crate:
//! - [`DenseStorage`]: slot arrays with membership and value indexes
//! - [`TableStorage`](crate::relational::TableStorage): one row table per type

use std::collections::HashMap;

use ecm_foundation::{Component, ComponentType, EntityId, EntitySet, Value};

use crate::component::ComponentStore;
use crate::index::{MembershipIndex, ValueIndex};
use crate::query;
use crate::schema::ComponentSchema;

/// Component data storage behind a world.
///
/// Every method that takes a schema is only called for registered types,
/// and every entity passed to a write is live.
pub trait Storage {
    /// Short backend name, used in logs.
    const NAME: &'static str;

    /// Creates storage for a newly registered type.
    ///
    /// `slots` is the number of entity ids allocated so far.
    fn register(&mut self, schema: &ComponentSchema, slots: usize);

    /// Starts keeping a value index for a registered type.
    ///
    /// Existing values must be indexed before this returns.
    fn enable_index(&mut self, schema: &ComponentSchema);

    /// Notifies the backend that an id was allocated.
    fn entity_created(&mut self, id: EntityId);

    /// Notifies the backend that an entity was removed.
    ///
    /// All of its components have already been cleared.
    fn entity_removed(&mut self, id: EntityId);

    /// Stores a validated component, returning the value it replaced.
    fn write(&mut self, schema: &ComponentSchema, id: EntityId, component: Component)
    -> Option<Component>;

    /// Detaches a component, returning the value it held.
    fn clear(&mut self, schema: &ComponentSchema, id: EntityId) -> Option<Component>;

    /// Reads the component an entity holds.
    fn read(&self, schema: &ComponentSchema, id: EntityId) -> Option<Component>;

    /// Returns true if the entity holds the component.
    fn contains(&self, schema: &ComponentSchema, id: EntityId) -> bool;

    /// Returns the entities holding the component.
    fn members(&self, schema: &ComponentSchema) -> EntitySet;

    /// Returns the holders whose field values equal every `(position, value)`
    /// constraint. With no constraints, returns every holder.
    fn lookup(&self, schema: &ComponentSchema, constraints: &[(usize, Value)]) -> EntitySet;
}

/// Storage for one type in a [`DenseStorage`].
#[derive(Clone, Debug)]
struct DenseTable {
    store: ComponentStore,
    members: MembershipIndex,
    values: Option<ValueIndex>,
}

/// Slot-array storage with membership and optional value indexes.
///
/// Reads index directly by entity id. Type queries intersect membership
/// sets. Value queries on indexed types intersect value buckets; on
/// unindexed types they scan the members.
#[derive(Clone, Debug, Default)]
pub struct DenseStorage {
    capacity: usize,
    tables: HashMap<ComponentType, DenseTable>,
}

impl DenseStorage {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty backend that reserves `capacity` slots per type.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            tables: HashMap::new(),
        }
    }

    /// Returns the slot array for a type.
    #[must_use]
    pub fn store(&self, ty: &str) -> Option<&ComponentStore> {
        self.tables.get(ty).map(|t| &t.store)
    }

    /// Returns the value index for a type, if it keeps one.
    #[must_use]
    pub fn value_index(&self, ty: &str) -> Option<&ValueIndex> {
        self.tables.get(ty)?.values.as_ref()
    }

    fn table(&self, schema: &ComponentSchema) -> Option<&DenseTable> {
        self.tables.get(&schema.name)
    }

    fn table_mut(&mut self, schema: &ComponentSchema) -> Option<&mut DenseTable> {
        self.tables.get_mut(&schema.name)
    }
}

impl Storage for DenseStorage {
    const NAME: &'static str = "dense";

    fn register(&mut self, schema: &ComponentSchema, slots: usize) {
        let store = ComponentStore::with_capacity(slots, self.capacity);
        let values = schema.indexed.then(|| ValueIndex::new(schema.arity()));
        self.tables.insert(
            schema.name.clone(),
            DenseTable {
                store,
                members: MembershipIndex::new(),
                values,
            },
        );
    }

    fn enable_index(&mut self, schema: &ComponentSchema) {
        if let Some(table) = self.table_mut(schema) {
            if table.values.is_none() {
                table.values = Some(ValueIndex::build(schema.arity(), &table.store));
            }
        }
    }

    fn entity_created(&mut self, _id: EntityId) {
        for table in self.tables.values_mut() {
            table.store.push_empty();
        }
    }

    fn entity_removed(&mut self, _id: EntityId) {}

    fn write(
        &mut self,
        schema: &ComponentSchema,
        id: EntityId,
        component: Component,
    ) -> Option<Component> {
        let table = self.table_mut(schema)?;
        if let Some(values) = table.values.as_mut() {
            values.replace(id, table.store.get(id), &component);
        }
        table.members.insert(id);
        table.store.write(id, component)
    }

    fn clear(&mut self, schema: &ComponentSchema, id: EntityId) -> Option<Component> {
        let table = self.table_mut(schema)?;
        let old = table.store.clear(id)?;
        table.members.remove(id);
        if let Some(values) = table.values.as_mut() {
            values.remove(id, &old);
        }
        Some(old)
    }

    fn read(&self, schema: &ComponentSchema, id: EntityId) -> Option<Component> {
        self.table(schema)?.store.get(id).cloned()
    }

    fn contains(&self, schema: &ComponentSchema, id: EntityId) -> bool {
        self.table(schema).is_some_and(|t| t.members.contains(id))
    }

    fn members(&self, schema: &ComponentSchema) -> EntitySet {
        self.table(schema)
            .map(|t| t.members.members().clone())
            .unwrap_or_default()
    }

    fn lookup(&self, schema: &ComponentSchema, constraints: &[(usize, Value)]) -> EntitySet {
        let Some(table) = self.table(schema) else {
            return EntitySet::new();
        };
        if let Some(hits) = table.values.as_ref().and_then(|v| v.lookup(constraints)) {
            return hits;
        }
        if constraints.is_empty() {
            return table.members.members().clone();
        }
        table
            .members
            .members()
            .iter()
            .filter(|id| {
                table
                    .store
                    .get(*id)
                    .is_some_and(|c| query::matches(c, constraints))
            })
            .collect()
    }
}
