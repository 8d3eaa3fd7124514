//! Error types for the ecm engine.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Two kinds are misuse of the engine and are never recovered internally:
//! schema errors and unregistered component types. An entity simply lacking
//! a component is not an error at all; it surfaces as `None` or an empty
//! result.

use std::fmt;

use thiserror::Error;

use crate::entity::{EntityId, WorldId};
use crate::types::FieldKind;

/// The main error type for ecm operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a schema error for a component type.
    #[must_use]
    pub fn schema(component: impl Into<String>, violation: SchemaViolation) -> Self {
        Self::new(ErrorKind::Schema {
            component: component.into(),
            violation,
        })
    }

    /// Creates an unregistered component type error.
    #[must_use]
    pub fn unregistered_type(component: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnregisteredType(component.into()))
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a foreign handle error.
    #[must_use]
    pub fn foreign_handle(entity: EntityId, handle: WorldId, world: WorldId) -> Self {
        Self::new(ErrorKind::ForeignHandle {
            entity,
            handle,
            world,
        })
    }

    /// Returns true if this is a schema error.
    #[must_use]
    pub fn is_schema_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Schema { .. })
    }

    /// Returns true if this is an unregistered component type error.
    #[must_use]
    pub fn is_unregistered_type(&self) -> bool {
        matches!(self.kind, ErrorKind::UnregisteredType(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A component value or declaration does not match its schema.
    #[error("schema error in component {component}: {violation}")]
    Schema {
        /// The component type name.
        component: String,
        /// What was wrong.
        violation: SchemaViolation,
    },

    /// A component type was used before registration.
    #[error("unregistered component type: {0}")]
    UnregisteredType(String),

    /// Entity is not live in this world.
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// An entity handle was used with a world other than the one that issued it.
    #[error("handle for {entity:?} belongs to {handle} but was used with {world}")]
    ForeignHandle {
        /// The entity the handle refers to.
        entity: EntityId,
        /// The world the handle was issued by.
        handle: WorldId,
        /// The world it was used with.
        world: WorldId,
    },
}

/// The specific way a schema was violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    /// A component type was declared with an empty name.
    EmptyTypeName,
    /// A field was declared with an empty name.
    EmptyFieldName {
        /// Position of the field.
        position: usize,
    },
    /// The same field name was declared twice.
    DuplicateField(String),
    /// A declared field kind is not one of the supported kinds.
    UnknownFieldKind(String),
    /// A field name does not exist in the schema.
    UnknownField(String),
    /// The value has the wrong number of fields.
    ArityMismatch {
        /// Number of fields in the schema.
        expected: usize,
        /// Number of fields in the value.
        actual: usize,
    },
    /// A positional field has a different name than the schema declares.
    FieldNameMismatch {
        /// Position of the field.
        position: usize,
        /// Name declared by the schema.
        expected: String,
        /// Name carried by the value.
        actual: String,
    },
    /// A field value has the wrong kind.
    KindMismatch {
        /// The field name.
        field: String,
        /// The declared kind.
        expected: FieldKind,
        /// The kind of the supplied value.
        actual: FieldKind,
    },
    /// A float field was given NaN, which never equals itself.
    NotANumber {
        /// The field name.
        field: String,
    },
    /// A transform produced a component of a different type.
    ComponentTypeMismatch {
        /// The type being updated.
        expected: String,
        /// The type the transform returned.
        actual: String,
    },
    /// An entity reference points at an entity that is not live.
    DanglingEntityRef {
        /// The field name.
        field: String,
        /// The referenced entity.
        target: EntityId,
    },
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTypeName => write!(f, "component type name is empty"),
            Self::EmptyFieldName { position } => {
                write!(f, "field at position {position} has an empty name")
            }
            Self::DuplicateField(name) => write!(f, "field {name} declared twice"),
            Self::UnknownFieldKind(kind) => write!(f, "unknown field kind {kind:?}"),
            Self::UnknownField(name) => write!(f, "no field named {name}"),
            Self::ArityMismatch { expected, actual } => {
                write!(f, "expected {expected} fields, got {actual}")
            }
            Self::FieldNameMismatch {
                position,
                expected,
                actual,
            } => write!(
                f,
                "field at position {position} should be {expected}, got {actual}"
            ),
            Self::KindMismatch {
                field,
                expected,
                actual,
            } => write!(f, "field {field} expects {expected}, got {actual}"),
            Self::NotANumber { field } => write!(f, "field {field} is NaN"),
            Self::ComponentTypeMismatch { expected, actual } => {
                write!(f, "expected a {expected} component, got {actual}")
            }
            Self::DanglingEntityRef { field, target } => {
                write!(f, "field {field} references dead entity {target:?}")
            }
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The world operation that failed (e.g. `set_component`).
    pub operation: Option<&'static str>,
    /// The entity the operation targeted.
    pub entity: Option<EntityId>,
    /// The component type involved.
    pub component: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Sets the target entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Sets the component type.
    #[must_use]
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = self.operation {
            write!(f, "in {operation}")?;
        }
        let mut first = self.operation.is_none();
        if let Some(entity) = self.entity {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "on {entity}")?;
            first = false;
        }
        if let Some(component) = &self.component {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "for {component}")?;
        }
        Ok(())
    }
}
