//! Dense per-type component storage.
//!
//! Each registered type owns one `ComponentStore`: a slot per allocated
//! entity id, holding the component value or nothing. The slot count always
//! equals the number of ids ever allocated, so lookups index directly by id.

use ecm_foundation::{Component, EntityId};

/// Slot array for a single component type.
#[derive(Clone, Debug, Default)]
pub struct ComponentStore {
    slots: Vec<Option<Component>>,
}

impl ComponentStore {
    /// Creates a store with `len` empty slots.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self::with_capacity(len, len)
    }

    /// Creates a store with `len` empty slots and room for `capacity`.
    #[must_use]
    pub fn with_capacity(len: usize, capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.max(len));
        slots.resize(len, None);
        Self { slots }
    }

    /// Appends an empty slot for a newly allocated entity.
    pub fn push_empty(&mut self) {
        self.slots.push(None);
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if there are no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Reads the component held for an entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Component> {
        self.slots.get(id.slot())?.as_ref()
    }

    /// Returns true if the entity holds a value in this store.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Writes a component into an entity's slot, returning the previous value.
    ///
    /// Index maintenance is the caller's job.
    pub(crate) fn write(&mut self, id: EntityId, component: Component) -> Option<Component> {
        let slot = id.slot();
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot].replace(component)
    }

    /// Empties an entity's slot, returning the value it held.
    pub(crate) fn clear(&mut self, id: EntityId) -> Option<Component> {
        self.slots.get_mut(id.slot())?.take()
    }

    /// Iterates occupied slots in id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Component)> {
        self.slots.iter().enumerate().filter_map(|(slot, c)| {
            c.as_ref().map(|c| (EntityId::new(slot as u64), c))
        })
    }
}
