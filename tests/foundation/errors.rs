//! Integration tests for error types

use ecm_foundation::{EntityId, Error, ErrorContext, ErrorKind, FieldKind, SchemaViolation, WorldId};

#[test]
fn error_kinds_are_matchable() {
    let err = Error::unregistered_type("Velocity");
    assert!(matches!(err.kind, ErrorKind::UnregisteredType(ref name) if name == "Velocity"));

    let err = Error::entity_not_found(EntityId::new(9));
    assert!(matches!(err.kind, ErrorKind::EntityNotFound(id) if id == EntityId::new(9)));
}

#[test]
fn schema_error_carries_component_and_violation() {
    let err = Error::schema(
        "Position",
        SchemaViolation::KindMismatch {
            field: "x".to_string(),
            expected: FieldKind::Int,
            actual: FieldKind::Float,
        },
    );
    match err.kind {
        ErrorKind::Schema {
            component,
            violation,
        } => {
            assert_eq!(component, "Position");
            assert!(matches!(violation, SchemaViolation::KindMismatch { .. }));
        }
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[test]
fn errors_display_their_kind() {
    let msg = format!("{}", Error::unregistered_type("Health"));
    assert_eq!(msg, "unregistered component type: Health");
}

#[test]
fn context_is_optional() {
    let bare = Error::unregistered_type("Health");
    assert!(bare.context.is_none());

    let with = bare.with_context(ErrorContext::new().with_operation("get_component"));
    assert_eq!(with.context.unwrap().operation, Some("get_component"));
}

#[test]
fn foreign_handle_names_both_worlds() {
    let a = WorldId::next();
    let b = WorldId::next();
    let err = Error::foreign_handle(EntityId::new(0), a, b);
    assert!(matches!(
        err.kind,
        ErrorKind::ForeignHandle { handle, world, .. } if handle == a && world == b
    ));
}

#[test]
fn errors_are_std_errors() {
    fn takes_error(_: &dyn std::error::Error) {}
    takes_error(&Error::entity_not_found(EntityId::new(1)));
}
