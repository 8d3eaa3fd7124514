//! Integration tests for entity handles

use std::collections::HashMap;

use ecm_foundation::{ErrorKind, Value};
use ecm_storage::World;

use crate::{health, pos, world};

#[test]
fn handle_round_trip() {
    let mut world = world();
    let e = world.spawn();
    e.set(&mut world, pos(3, 4)).unwrap();

    assert!(e.has(&world, "Position").unwrap());
    assert_eq!(e.get(&world, "Position").unwrap(), Some(pos(3, 4)));
    assert_eq!(e.components(&world).unwrap(), vec![pos(3, 4)]);
    assert_eq!(world.entities(&["Position"]).unwrap(), vec![e.id()]);
}

#[test]
fn handles_key_hash_maps() {
    let mut world = world();
    let a = world.spawn();
    let b = world.spawn();

    let mut names = HashMap::new();
    names.insert(a, "orc");
    names.insert(b, "goblin");
    names.insert(world.entity(a.id()), "troll");

    assert_eq!(names.len(), 2);
    assert_eq!(names[&a], "troll");
}

#[test]
fn update_moves_entity_between_buckets() {
    let mut world = world();
    let e = world.spawn();
    e.set(&mut world, pos(0, 0)).unwrap();

    e.update(&mut world, "Position", |p| {
        let x = p.get("x").and_then(Value::as_int).unwrap_or(0);
        p.replace("x", x + 5)
    })
    .unwrap();

    assert!(world.entities_by_value("Position", [("x", 0)]).unwrap().is_empty());
    assert_eq!(world.entities_by_value("Position", [("x", 5)]).unwrap(), vec![e.id()]);
}

#[test]
fn update_error_leaves_value() {
    let mut world = world();
    let e = world.spawn();
    e.set(&mut world, health(5)).unwrap();

    let err = e
        .update(&mut world, "Health", |h| h.replace("mana", 1))
        .unwrap_err();
    assert!(err.is_schema_error());
    assert_eq!(e.get(&world, "Health").unwrap(), Some(health(5)));
}

#[test]
fn handle_of_removed_entity() {
    let mut world = world();
    let e = world.spawn();
    e.set(&mut world, health(1)).unwrap();
    world.remove_entity(e.id());

    assert!(!e.is_alive(&world));
    assert_eq!(e.get(&world, "Health").unwrap(), None);
    assert!(matches!(
        e.set(&mut world, health(2)).unwrap_err().kind,
        ErrorKind::EntityNotFound(_)
    ));
}

#[test]
fn handles_are_bound_to_their_world() {
    let mut home = world();
    let mut away = World::new();
    let e = home.spawn();
    away.spawn();

    let err = e.get(&away, "Health").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ForeignHandle { .. }));
    assert!(e.components(&away).is_err());
    assert!(e.remove(&mut away, "Health").is_err());
}
