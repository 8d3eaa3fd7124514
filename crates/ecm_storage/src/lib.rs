//! Entity registry, component stores, indexes, and world state for ecm.
//!
//! This crate provides:
//! - [`EntityStore`] - Dense, never-reused entity allocation
//! - [`SchemaRegistry`] - Ordered, kind-checked component schemas
//! - [`ComponentStore`] - Per-type slot arrays indexed by entity id
//! - [`MembershipIndex`] / [`ValueIndex`] - Type and field-value indexes
//! - [`Storage`] - Backend trait, with [`DenseStorage`] and [`TableStorage`]
//! - [`World`] - The manager facade: validation, queries, logging
//! - [`Entity`] - Copyable handles bound to one world
//!
//! # Example
//!
//! ```
//! use ecm_foundation::{Component, FieldKind};
//! use ecm_storage::{ComponentSchema, FieldSchema, World};
//!
//! let mut world = World::new();
//! world.register_component_type(
//!     ComponentSchema::new("Health").with_field(FieldSchema::new("hp", FieldKind::Int)),
//! )?;
//!
//! let orc = world.spawn();
//! orc.set(&mut world, Component::new("Health").with("hp", 10))?;
//! assert_eq!(world.entities(&["Health"])?, vec![orc.id()]);
//! # Ok::<(), ecm_foundation::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod backend;
pub mod component;
pub mod config;
pub mod entity;
pub mod handle;
pub mod index;
pub mod query;
pub mod relational;
pub mod schema;
pub mod world;

pub use backend::{DenseStorage, Storage};
pub use component::ComponentStore;
pub use config::WorldConfig;
pub use entity::EntityStore;
pub use handle::Entity;
pub use index::{MembershipIndex, ValueIndex};
pub use query::QueryRow;
pub use relational::{Column, SqlType, SqlValue, Table, TableStorage};
pub use schema::{ComponentSchema, FieldSchema, Registration, SchemaRegistry};
pub use world::World;
