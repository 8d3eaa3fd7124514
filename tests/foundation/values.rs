//! Integration tests for Value and FieldKind

use std::collections::HashSet;

use ecm_foundation::{EntityId, FieldKind, Value};

// =============================================================================
// Kinds
// =============================================================================

#[test]
fn every_value_reports_its_kind() {
    assert_eq!(Value::from(true).kind(), FieldKind::Bool);
    assert_eq!(Value::from(3).kind(), FieldKind::Int);
    assert_eq!(Value::from(2.5).kind(), FieldKind::Float);
    assert_eq!(Value::from("orc").kind(), FieldKind::Text);
    assert_eq!(Value::from(EntityId::new(4)).kind(), FieldKind::EntityRef);
}

#[test]
fn kind_names_parse_back() {
    for kind in FieldKind::ALL {
        assert_eq!(kind.name().parse::<FieldKind>().unwrap(), kind);
    }
}

#[test]
fn kind_aliases_parse() {
    assert_eq!(" Integer ".parse::<FieldKind>().unwrap(), FieldKind::Int);
    assert_eq!("entity".parse::<FieldKind>().unwrap(), FieldKind::EntityRef);
    assert_eq!("string".parse::<FieldKind>().unwrap(), FieldKind::Text);
    assert!("tuple".parse::<FieldKind>().is_err());
}

// =============================================================================
// Coercion
// =============================================================================

#[test]
fn float_fields_accept_ints() {
    assert!(FieldKind::Float.accepts(FieldKind::Int));
    assert_eq!(Value::Int(2).coerce_to(FieldKind::Float), Some(Value::Float(2.0)));
}

#[test]
fn no_other_coercion() {
    assert!(!FieldKind::Int.accepts(FieldKind::Float));
    assert!(!FieldKind::Int.accepts(FieldKind::Bool));
    assert!(!FieldKind::EntityRef.accepts(FieldKind::Int));
    assert_eq!(Value::Float(2.0).coerce_to(FieldKind::Int), None);
    assert_eq!(Value::from("1").coerce_to(FieldKind::Int), None);
}

// =============================================================================
// Equality and hashing
// =============================================================================

#[test]
fn values_can_key_a_hash_set() {
    let mut set = HashSet::new();
    set.insert(Value::Int(1));
    set.insert(Value::Int(1));
    set.insert(Value::Float(1.0));
    set.insert(Value::from("1"));
    assert_eq!(set.len(), 3);
}

#[test]
fn int_and_float_are_distinct_values() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
}

#[test]
fn nan_equals_itself_bitwise() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
}

#[test]
fn accessors_extract_payloads() {
    assert_eq!(Value::Int(5).as_int(), Some(5));
    assert_eq!(Value::Int(5).as_number(), Some(5.0));
    assert_eq!(Value::from("x").as_str(), Some("x"));
    assert_eq!(Value::Bool(true).as_int(), None);
    assert_eq!(
        Value::EntityRef(EntityId::new(2)).as_entity(),
        Some(EntityId::new(2))
    );
}
