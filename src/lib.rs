//! ecm - Schema-checked, multiply-indexed entity-component storage
//!
//! This crate re-exports all layers of the ecm system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: ecm_storage    - Entity registry, schemas, stores, indexes, queries, World
//! Layer 0: ecm_foundation - Core types (EntityId, Value, Component, EntitySet, Error)
//! ```

pub use ecm_foundation as foundation;
pub use ecm_storage as storage;
