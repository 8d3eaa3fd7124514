//! Integration tests for Layer 1: Storage
//!
//! Tests for the entity registry, component stores, indexes, queries,
//! handles, the relational backend, and world configuration.

mod handles;
mod queries;
mod relational;

use ecm_foundation::{Component, FieldKind};
use ecm_storage::{ComponentSchema, FieldSchema, World};

/// `Position(x, y)` with int fields.
pub fn position_schema() -> ComponentSchema {
    ComponentSchema::new("Position")
        .with_field(FieldSchema::new("x", FieldKind::Int))
        .with_field(FieldSchema::new("y", FieldKind::Int))
}

/// `Health(hp)` with an int field.
pub fn health_schema() -> ComponentSchema {
    ComponentSchema::new("Health").with_field(FieldSchema::new("hp", FieldKind::Int))
}

pub fn pos(x: i64, y: i64) -> Component {
    Component::new("Position").with("x", x).with("y", y)
}

pub fn health(hp: i64) -> Component {
    Component::new("Health").with("hp", hp)
}

/// A world with `Position` (indexed) and `Health` registered.
pub fn world() -> World {
    let mut world = World::new();
    world
        .register_component_type(position_schema().with_index())
        .unwrap();
    world.register_component_type(health_schema()).unwrap();
    world
}
