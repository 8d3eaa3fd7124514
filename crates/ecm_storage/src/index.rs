//! Indexes over component stores.
//!
//! - [`MembershipIndex`]: which entities hold a component type
//! - [`ValueIndex`]: which entities hold a given value in a given field
//!
//! Both are kept in lockstep with the slots they describe. Writes replace
//! old index entries before adding new ones, and empty buckets are dropped,
//! so a lookup never returns an entity whose value has since changed.

use std::collections::HashMap;

use ecm_foundation::{Component, EntityId, EntitySet, Value};

use crate::component::ComponentStore;

/// Set of entities holding a component type.
#[derive(Clone, Debug, Default)]
pub struct MembershipIndex {
    members: EntitySet,
}

impl MembershipIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that an entity holds the type.
    pub fn insert(&mut self, id: EntityId) {
        self.members.insert(id);
    }

    /// Records that an entity no longer holds the type.
    pub fn remove(&mut self, id: EntityId) {
        self.members.remove(id);
    }

    /// Checks membership.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(id)
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if no entity holds the type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the members.
    ///
    /// Clone the result for an O(1) frozen snapshot.
    #[must_use]
    pub fn members(&self) -> &EntitySet {
        &self.members
    }
}

/// Per-field map from value to the entities holding it.
#[derive(Clone, Debug, Default)]
pub struct ValueIndex {
    /// One bucket map per field position.
    fields: Vec<HashMap<Value, EntitySet>>,
}

impl ValueIndex {
    /// Creates an empty index for a type with `arity` fields.
    #[must_use]
    pub fn new(arity: usize) -> Self {
        Self {
            fields: vec![HashMap::new(); arity],
        }
    }

    /// Builds an index over every occupied slot of a store.
    #[must_use]
    pub fn build(arity: usize, store: &ComponentStore) -> Self {
        let mut index = Self::new(arity);
        for (id, component) in store.iter() {
            index.insert(id, component);
        }
        index
    }

    /// Adds an entity under each of its field values.
    pub fn insert(&mut self, id: EntityId, component: &Component) {
        for (buckets, value) in self.fields.iter_mut().zip(component.values()) {
            buckets.entry(value.clone()).or_default().insert(id);
        }
    }

    /// Removes an entity from the buckets of each of its field values.
    pub fn remove(&mut self, id: EntityId, component: &Component) {
        for (buckets, value) in self.fields.iter_mut().zip(component.values()) {
            if let Some(bucket) = buckets.get_mut(value) {
                bucket.remove(id);
                if bucket.is_empty() {
                    buckets.remove(value);
                }
            }
        }
    }

    /// Moves an entity from the buckets of `old` to those of `new`.
    pub fn replace(&mut self, id: EntityId, old: Option<&Component>, new: &Component) {
        if let Some(old) = old {
            self.remove(id, old);
        }
        self.insert(id, new);
    }

    /// Returns the entities holding `value` at field `position`.
    #[must_use]
    pub fn bucket(&self, position: usize, value: &Value) -> Option<&EntitySet> {
        self.fields.get(position)?.get(value)
    }

    /// Returns the entities matching every `(position, value)` constraint.
    ///
    /// Returns `None` when there are no constraints.
    #[must_use]
    pub fn lookup(&self, constraints: &[(usize, Value)]) -> Option<EntitySet> {
        if constraints.is_empty() {
            return None;
        }
        let mut buckets = Vec::with_capacity(constraints.len());
        for (position, value) in constraints {
            match self.bucket(*position, value) {
                Some(bucket) => buckets.push(bucket),
                None => return Some(EntitySet::new()),
            }
        }
        EntitySet::intersect_all(buckets)
    }

    /// Returns the number of non-empty buckets across all fields.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.fields.iter().map(HashMap::len).sum()
    }
}
