//! Configuration for a world.

/// Configuration for a [`World`](crate::World).
///
/// Controls registration policy and validation strictness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Register unknown component types on first `set_component`, inferring
    /// the schema from the value. When false, unknown types are an error.
    pub autoregister: bool,

    /// Give autoregistered types a value index.
    pub index_autoregistered: bool,

    /// Number of entity slots to reserve up front in every store.
    pub capacity_hint: usize,

    /// Reject entity-ref field values that point at entities which are not live.
    pub validate_entity_refs: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            autoregister: false,
            index_autoregistered: false,
            capacity_hint: 0,
            validate_entity_refs: false,
        }
    }
}

impl WorldConfig {
    /// Creates a configuration that autoregisters unknown component types.
    #[must_use]
    pub fn autoregistering() -> Self {
        Self {
            autoregister: true,
            ..Self::default()
        }
    }

    /// Creates the strictest configuration: explicit registration and
    /// entity-ref validation.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            validate_entity_refs: true,
            ..Self::default()
        }
    }

    /// Sets the autoregistration policy.
    #[must_use]
    pub fn with_autoregister(mut self, enabled: bool) -> Self {
        self.autoregister = enabled;
        self
    }

    /// Sets whether autoregistered types are indexed.
    #[must_use]
    pub fn with_index_autoregistered(mut self, enabled: bool) -> Self {
        self.index_autoregistered = enabled;
        self
    }

    /// Sets the slot capacity hint.
    #[must_use]
    pub fn with_capacity_hint(mut self, capacity: usize) -> Self {
        self.capacity_hint = capacity;
        self
    }

    /// Sets entity-ref validation.
    #[must_use]
    pub fn with_validate_entity_refs(mut self, enabled: bool) -> Self {
        self.validate_entity_refs = enabled;
        self
    }
}
