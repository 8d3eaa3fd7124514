//! Field kinds for schema validation.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SchemaViolation;

/// Kind of a component field.
///
/// Used to declare component schemas and validate values at runtime.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldKind {
    /// Boolean.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// UTF-8 text.
    Text,
    /// Reference to another entity.
    EntityRef,
}

impl FieldKind {
    /// All field kinds, in declaration order.
    pub const ALL: [FieldKind; 5] = [
        Self::Bool,
        Self::Int,
        Self::Float,
        Self::Text,
        Self::EntityRef,
    ];

    /// Returns the canonical lowercase name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::EntityRef => "entity-ref",
        }
    }

    /// Checks if a value of kind `actual` is accepted by a field of this kind.
    ///
    /// Kinds must match exactly, except that `Float` accepts `Int`
    /// (numeric promotion).
    #[must_use]
    pub const fn accepts(self, actual: FieldKind) -> bool {
        matches!(
            (self, actual),
            (Self::Bool, Self::Bool)
                | (Self::Int | Self::Float, Self::Int)
                | (Self::Float, Self::Float)
                | (Self::Text, Self::Text)
                | (Self::EntityRef, Self::EntityRef)
        )
    }
}

impl FromStr for FieldKind {
    type Err = SchemaViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Ok(Self::Bool),
            "int" | "integer" => Ok(Self::Int),
            "float" | "real" => Ok(Self::Float),
            "text" | "string" | "str" => Ok(Self::Text),
            "entity" | "entity-ref" | "entityref" => Ok(Self::EntityRef),
            _ => Err(SchemaViolation::UnknownFieldKind(s.to_string())),
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
