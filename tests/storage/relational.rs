//! Integration tests for the relational backend

use std::collections::BTreeSet;

use ecm_foundation::{Component, FieldKind};
use ecm_storage::{ComponentSchema, FieldSchema, SqlType, SqlValue, TableStorage, World, WorldConfig};

use crate::{health, health_schema, pos, position_schema};

fn tables() -> World<TableStorage> {
    let mut world = World::relational(WorldConfig::default());
    world
        .register_component_type(position_schema().with_index())
        .unwrap();
    world.register_component_type(health_schema()).unwrap();
    world
}

#[test]
fn same_contract_as_dense() {
    let mut world = tables();
    let a = world.new_entity();
    let b = world.new_entity();
    world.set_component(a, pos(0, 0)).unwrap();
    world.set_component(b, pos(0, 0)).unwrap();
    world.set_component(b, health(2)).unwrap();

    assert_eq!(world.get_component(a, "Position").unwrap(), Some(pos(0, 0)));
    assert_eq!(world.entities(&["Position", "Health"]).unwrap(), vec![b]);
    let hits: BTreeSet<_> = world
        .entities_by_value("Position", [("x", 0), ("y", 0)])
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(hits, [a, b].into_iter().collect());
}

#[test]
fn upsert_leaves_one_row() {
    let mut world = tables();
    let e = world.new_entity();
    world.set_component(e, pos(1, 2)).unwrap();
    world.set_component(e, pos(9, 9)).unwrap();

    let table = world.storage().table("Position").unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(
        table.row(e).unwrap(),
        &[SqlValue::Integer(9), SqlValue::Integer(9)]
    );
    assert!(world.entities_by_value("Position", [("x", 1)]).unwrap().is_empty());
}

#[test]
fn entity_refs_round_trip_through_integers() {
    let mut world = World::relational(WorldConfig::default());
    world
        .register_component_type(
            ComponentSchema::new("Target").with_field(FieldSchema::new("who", FieldKind::EntityRef)),
        )
        .unwrap();
    let hunter = world.new_entity();
    let prey = world.new_entity();
    world
        .set_component(hunter, Component::new("Target").with("who", prey))
        .unwrap();

    let table = world.storage().table("Target").unwrap();
    assert_eq!(table.columns()[0].sql_type(), SqlType::Integer);
    assert_eq!(table.row(hunter).unwrap(), &[SqlValue::Integer(1)]);
    assert_eq!(
        world.entities_by_value("Target", [("who", prey)]).unwrap(),
        vec![hunter]
    );
}

#[test]
fn removal_deletes_rows() {
    let mut world = tables();
    let e = world.new_entity();
    world.set_component(e, pos(1, 1)).unwrap();
    world.set_component(e, health(1)).unwrap();

    world.remove_entity(e);
    assert!(world.storage().table("Position").unwrap().is_empty());
    assert!(world.storage().table("Health").unwrap().is_empty());
    assert_eq!(world.storage().entity_rows(), 0);
}

#[test]
fn ddl_describes_registered_tables() {
    let mut world = tables();
    world
        .register_component_type(
            ComponentSchema::new("MoveDestination")
                .with_field(FieldSchema::new("x", FieldKind::Int))
                .with_field(FieldSchema::new("speed", FieldKind::Float)),
        )
        .unwrap();

    let ddl = world.storage().ddl();
    assert!(ddl.starts_with("CREATE TABLE entities (id INTEGER PRIMARY KEY);"));
    assert!(ddl.contains("CREATE TABLE position_components"));
    assert!(ddl.contains("CREATE INDEX position_components_y ON position_components (y);"));
    assert!(ddl.contains("CREATE TABLE health_components"));
    assert!(!ddl.contains("CREATE INDEX health_components"));
    assert!(ddl.contains("CREATE TABLE move_destination_components"));
    assert!(ddl.contains("speed REAL NOT NULL"));
}

#[test]
fn late_index_is_reflected_in_ddl() {
    let mut world = tables();
    world.index_component_type("Health").unwrap();
    assert!(world.storage().ddl().contains("CREATE INDEX health_components_hp"));
}

#[test]
fn text_cells() {
    let mut world = World::relational(WorldConfig::autoregistering());
    let e = world.new_entity();
    world
        .set_component(e, Component::new("Name").with("text", "orc"))
        .unwrap();

    let table = world.storage().table("Name").unwrap();
    assert_eq!(table.name(), "name_components");
    assert_eq!(table.row(e).unwrap(), &[SqlValue::Text("orc".into())]);
    assert_eq!(world.entities_by_value("Name", [("text", "orc")]).unwrap(), vec![e]);
}
