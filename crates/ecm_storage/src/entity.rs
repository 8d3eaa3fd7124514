//! Entity allocation and liveness.
//!
//! The `EntityStore` hands out dense ids starting at zero and never reuses
//! them. Removing an entity only drops it from the live set; its index stays
//! allocated, so a stale id can never alias a newer entity.

use ecm_foundation::{EntityId, EntitySet};

/// Allocates entity ids and tracks which are live.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    /// Next id to allocate. Also the length of every component store.
    next_id: u64,
    /// Currently live ids.
    live: EntitySet,
}

impl EntityStore {
    /// Creates a new empty entity store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new live entity.
    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        id
    }

    /// Marks an entity as no longer live.
    ///
    /// Returns false if the entity was not live.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.live.remove(id)
    }

    /// Checks if an entity is live.
    #[must_use]
    pub fn exists(&self, id: EntityId) -> bool {
        self.live.contains(id)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns true if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Returns the next id that will be allocated.
    #[must_use]
    pub fn next_id(&self) -> EntityId {
        EntityId::new(self.next_id)
    }

    /// Returns the number of ids ever allocated, as a slot count.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn slot_count(&self) -> usize {
        self.next_id as usize
    }

    /// Returns the live set.
    ///
    /// Cloning the returned set is O(1) and yields a frozen snapshot.
    #[must_use]
    pub fn live(&self) -> &EntitySet {
        &self.live
    }

    /// Iterates over all live entity IDs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.live.iter()
    }
}
