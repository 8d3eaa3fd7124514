//! Integration tests for the query engine

use std::collections::BTreeSet;

use ecm_foundation::{Component, EntityId, FieldKind};
use ecm_storage::{ComponentSchema, FieldSchema, Storage, World, WorldConfig};

use crate::{health, pos, world};

fn set(ids: impl IntoIterator<Item = EntityId>) -> BTreeSet<EntityId> {
    ids.into_iter().collect()
}

// =============================================================================
// Type queries
// =============================================================================

#[test]
fn no_types_returns_all_live() {
    let mut world = world();
    let a = world.new_entity();
    let b = world.new_entity();
    let c = world.new_entity();
    world.remove_entity(b);

    assert_eq!(set(world.entities(&[]).unwrap()), set([a, c]));
}

#[test]
fn membership_matches_get() {
    let mut world = world();
    let ids: Vec<_> = (0..6).map(|_| world.new_entity()).collect();
    for (i, &e) in ids.iter().enumerate() {
        if i % 2 == 0 {
            world.set_component(e, health(1)).unwrap();
        }
    }
    world.remove_component(ids[2], "Health").unwrap();

    let holders = set(world.entities(&["Health"]).unwrap());
    for &e in &ids {
        assert_eq!(
            holders.contains(&e),
            world.get_component(e, "Health").unwrap().is_some()
        );
    }
}

#[test]
fn intersection_of_types() {
    let mut world = world();
    let both = world.new_entity();
    let only_pos = world.new_entity();
    world.set_component(both, pos(0, 0)).unwrap();
    world.set_component(both, health(1)).unwrap();
    world.set_component(only_pos, pos(1, 1)).unwrap();

    assert_eq!(world.entities(&["Position", "Health"]).unwrap(), vec![both]);
}

#[test]
fn disjoint_types_yield_empty() {
    let mut world = world();
    let a = world.new_entity();
    let b = world.new_entity();
    world.set_component(a, pos(0, 0)).unwrap();
    world.set_component(b, health(1)).unwrap();

    assert!(world.entities(&["Position", "Health"]).unwrap().is_empty());
}

#[test]
fn rows_carry_components_in_requested_order() {
    let mut world = world();
    let e = world.new_entity();
    world.set_component(e, pos(2, 3)).unwrap();
    world.set_component(e, health(7)).unwrap();

    let rows = world.entities_with_components(&["Health", "Position"]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].entity, e);
    assert_eq!(rows[0].components, vec![health(7), pos(2, 3)]);
    assert_eq!(rows[0].get("Position"), Some(&pos(2, 3)));
}

#[test]
fn results_are_frozen_snapshots() {
    let mut world = world();
    let ids: Vec<_> = (0..3).map(|_| world.new_entity()).collect();
    for &e in &ids {
        world.set_component(e, health(1)).unwrap();
    }

    let holders = world.entities(&["Health"]).unwrap();
    for &e in &holders {
        if e == ids[1] {
            world.remove_component(ids[2], "Health").unwrap();
        }
    }
    assert_eq!(holders.len(), 3);
    assert_eq!(world.entities(&["Health"]).unwrap(), vec![ids[0], ids[1]]);
}

// =============================================================================
// Value queries
// =============================================================================

#[test]
fn indexed_lookup_finds_matches() {
    let mut world = world();
    let a = world.new_entity();
    let b = world.new_entity();
    let c = world.new_entity();
    world.set_component(a, pos(0, 0)).unwrap();
    world.set_component(b, pos(0, 0)).unwrap();
    world.set_component(c, pos(5, 5)).unwrap();

    assert_eq!(
        set(world.entities_by_value("Position", [("x", 0), ("y", 0)]).unwrap()),
        set([a, b])
    );
}

#[test]
fn index_has_no_stale_entries() {
    let mut world = world();
    let e = world.new_entity();
    world.set_component(e, pos(1, 2)).unwrap();
    world.set_component(e, pos(9, 9)).unwrap();

    assert!(world.entities_by_value("Position", [("x", 1)]).unwrap().is_empty());
    assert_eq!(world.entities_by_value("Position", [("x", 9)]).unwrap(), vec![e]);
}

#[test]
fn unindexed_lookup_scans() {
    let mut world = world();
    let a = world.new_entity();
    let b = world.new_entity();
    world.set_component(a, health(10)).unwrap();
    world.set_component(b, health(3)).unwrap();
    world.set_component(a, health(3)).unwrap();

    assert!(!world.is_indexed("Health"));
    assert!(world.entities_by_value("Health", [("hp", 10)]).unwrap().is_empty());
    assert_eq!(
        set(world.entities_by_value("Health", [("hp", 3)]).unwrap()),
        set([a, b])
    );
}

#[test]
fn no_constraints_returns_all_holders() {
    let mut world = world();
    let a = world.new_entity();
    let _b = world.new_entity();
    world.set_component(a, pos(1, 1)).unwrap();
    world.set_component(a, health(1)).unwrap();

    let none: [(&str, i64); 0] = [];
    assert_eq!(world.entities_by_value("Position", none).unwrap(), vec![a]);
    assert_eq!(world.entities_by_value("Health", none).unwrap(), vec![a]);
}

#[test]
fn bad_constraints_are_schema_errors() {
    let world = world();
    assert!(world.entities_by_value("Position", [("z", 1)]).unwrap_err().is_schema_error());
    assert!(world.entities_by_value("Position", [("x", "one")]).unwrap_err().is_schema_error());
}

#[test]
fn text_and_bool_lookups() {
    let mut world = World::new();
    world
        .register_component_type(
            ComponentSchema::new("Monster")
                .with_field(FieldSchema::new("kind", FieldKind::Text))
                .with_field(FieldSchema::new("awake", FieldKind::Bool))
                .with_index(),
        )
        .unwrap();
    let a = world.new_entity();
    let b = world.new_entity();
    world
        .set_component(a, Component::new("Monster").with("kind", "anxiety").with("awake", true))
        .unwrap();
    world
        .set_component(b, Component::new("Monster").with("kind", "anxiety").with("awake", false))
        .unwrap();

    assert_eq!(
        world.entities_by_value("Monster", [("kind", "anxiety")]).unwrap().len(),
        2
    );
    assert_eq!(world.entities_by_value("Monster", [("awake", true)]).unwrap(), vec![a]);
}

#[test]
fn float_constraint_accepts_int() {
    let mut world = World::new();
    world
        .register_component_type(
            ComponentSchema::new("Speed")
                .with_field(FieldSchema::new("v", FieldKind::Float))
                .with_index(),
        )
        .unwrap();
    let e = world.new_entity();
    world.set_component(e, Component::new("Speed").with("v", 2.0)).unwrap();

    assert_eq!(world.entities_by_value("Speed", [("v", 2)]).unwrap(), vec![e]);
}

fn heat_world<S: Storage>(mut world: World<S>, indexed: bool) -> World<S> {
    let schema = ComponentSchema::new("Heat").with_field(FieldSchema::new("t", FieldKind::Float));
    world
        .register_component_type(if indexed { schema.with_index() } else { schema })
        .unwrap();
    world
}

fn zero_lookups<S: Storage>(mut world: World<S>) {
    let cold = world.new_entity();
    let warm = world.new_entity();
    world.set_component(cold, Component::new("Heat").with("t", -0.0)).unwrap();
    world.set_component(warm, Component::new("Heat").with("t", 1.0)).unwrap();

    assert_eq!(world.entities_by_value("Heat", [("t", 0.0)]).unwrap(), vec![cold]);
    assert_eq!(world.entities_by_value("Heat", [("t", -0.0)]).unwrap(), vec![cold]);
    assert_eq!(world.entities_by_value("Heat", [("t", 0)]).unwrap(), vec![cold]);
    assert_eq!(
        world.get_component(cold, "Heat").unwrap(),
        Some(Component::new("Heat").with("t", 0.0))
    );
}

#[test]
fn negative_zero_matches_zero_on_every_path() {
    zero_lookups(heat_world(World::new(), true));
    zero_lookups(heat_world(World::new(), false));
    zero_lookups(heat_world(World::relational(WorldConfig::default()), true));
    zero_lookups(heat_world(World::relational(WorldConfig::default()), false));
}

#[test]
fn nan_is_rejected_on_write_and_lookup() {
    let mut world = heat_world(World::new(), true);
    let e = world.new_entity();

    let err = world
        .set_component(e, Component::new("Heat").with("t", f64::NAN))
        .unwrap_err();
    assert!(err.is_schema_error());
    assert!(!world.has_component(e, "Heat").unwrap());
    assert!(
        world
            .entities_by_value("Heat", [("t", f64::NAN)])
            .unwrap_err()
            .is_schema_error()
    );
}

// =============================================================================
// Property Tests
// =============================================================================

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn value_lookup_matches_filtering_gets(
            writes in prop::collection::vec((0usize..8, 0i64..4, 0i64..4), 0..40),
            x in 0i64..4,
        ) {
            let mut world = world();
            let ids: Vec<_> = (0..8).map(|_| world.new_entity()).collect();
            for (slot, px, py) in writes {
                world.set_component(ids[slot], pos(px, py)).unwrap();
            }

            let expected: BTreeSet<_> = ids
                .iter()
                .copied()
                .filter(|&e| world.get_component(e, "Position").unwrap().is_some_and(|p| {
                    p.get("x").and_then(ecm_foundation::Value::as_int) == Some(x)
                }))
                .collect();
            let found = set(world.entities_by_value("Position", [("x", x)]).unwrap());
            prop_assert_eq!(found, expected);
        }
    }
}
