//! Scalar field values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::types::FieldKind;

const NEGATIVE_ZERO_BITS: u64 = 0x8000_0000_0000_0000;

/// Value held by a single component field.
///
/// Values are immutable and cheaply cloneable. Floats compare and hash by
/// bit pattern so that values can key a value index. Schemas store `-0.0`
/// as `0.0` and reject NaN, so stored floats compare numerically.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Text value.
    Text(Arc<str>),
    /// Entity reference.
    EntityRef(EntityId),
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Bool(_) => FieldKind::Bool,
            Self::Int(_) => FieldKind::Int,
            Self::Float(_) => FieldKind::Float,
            Self::Text(_) => FieldKind::Text,
            Self::EntityRef(_) => FieldKind::EntityRef,
        }
    }

    /// Converts this value to the representation stored for a field of `kind`.
    ///
    /// Returns `None` if `kind` does not accept this value. An `Int` stored in
    /// a `Float` field is promoted, and `-0.0` becomes `0.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn coerce_to(&self, kind: FieldKind) -> Option<Value> {
        match (kind, self) {
            (FieldKind::Float, Self::Int(n)) => Some(Self::Float(*n as f64)),
            (FieldKind::Float, Self::Float(n)) => Some(Self::Float(*n + 0.0)),
            _ if kind == self.kind() => Some(self.clone()),
            _ => None,
        }
    }

    /// Returns true for a float NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Float(n) if n.is_nan())
    }

    /// Returns true for a float `-0.0`.
    #[must_use]
    pub fn is_negative_zero(&self) -> bool {
        matches!(self, Self::Float(n) if n.to_bits() == NEGATIVE_ZERO_BITS)
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a float value.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a number as f64 (converts int to float).
    ///
    /// Note: Converting large i64 values to f64 may lose precision.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a text reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract an entity ID.
    #[must_use]
    pub const fn as_entity(&self) -> Option<EntityId> {
        match self {
            Self::EntityRef(id) => Some(*id),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::EntityRef(a), Self::EntityRef(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
            Self::Text(s) => s.hash(state),
            Self::EntityRef(id) => id.hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::EntityRef(id) => write!(f, "{id:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::EntityRef(id) => write!(f, "{id}"),
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Float(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::Text(s)
    }
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Self::EntityRef(id)
    }
}
