//! Core ids, values, components, and errors for the ecm engine.
//!
//! This crate provides:
//! - [`EntityId`] - Dense, never-reused entity identifiers
//! - [`WorldId`] - Identity of a world, used by entity handles
//! - [`Value`] - Scalar field values
//! - [`FieldKind`] - Field kinds for schema validation
//! - [`Component`] - Immutable, positional component values
//! - [`EntitySet`] - Persistent set of entity ids
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod component;
pub mod entity;
pub mod error;
pub mod types;
pub mod value;

pub use collections::EntitySet;
pub use component::{Component, ComponentType, Field};
pub use entity::{EntityId, WorldId};
pub use error::{Error, ErrorContext, ErrorKind, SchemaViolation};
pub use types::FieldKind;
pub use value::Value;

/// Result type alias using the ecm [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
