//! Component types and immutable component values.
//!
//! A [`Component`] is a positional tuple of named [`Value`]s tagged with its
//! [`ComponentType`]. Components are never mutated in place: [`Component::replace`]
//! returns a new value, which is then written back wholesale.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, SchemaViolation};
use crate::value::Value;
use crate::Result;

/// Name of a component type (e.g. `Position`, `Health`).
///
/// Cloning is O(1).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ComponentType(Arc<str>);

impl ComponentType {
    /// Creates a component type with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.into())
    }

    /// Returns the type name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ComponentType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ComponentType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ComponentType {
    fn from(name: String) -> Self {
        Self(name.into())
    }
}

impl From<&ComponentType> for ComponentType {
    fn from(ty: &ComponentType) -> Self {
        ty.clone()
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single named field within a component value.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Field {
    /// Field name.
    pub name: Arc<str>,
    /// Field value.
    pub value: Value,
}

/// An immutable component value.
///
/// Cloning is O(1); fields are shared.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Component {
    ty: ComponentType,
    fields: Arc<[Field]>,
}

impl Component {
    /// Creates a component with no fields (a tag).
    #[must_use]
    pub fn new(ty: impl Into<ComponentType>) -> Self {
        Self {
            ty: ty.into(),
            fields: Arc::from(Vec::new()),
        }
    }

    /// Creates a component from `(name, value)` pairs, in schema order.
    #[must_use]
    pub fn from_fields<N, V, I>(ty: impl Into<ComponentType>, fields: I) -> Self
    where
        N: Into<Arc<str>>,
        V: Into<Value>,
        I: IntoIterator<Item = (N, V)>,
    {
        let fields: Vec<Field> = fields
            .into_iter()
            .map(|(name, value)| Field {
                name: name.into(),
                value: value.into(),
            })
            .collect();
        Self {
            ty: ty.into(),
            fields: fields.into(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn with(self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        let mut fields = self.fields.to_vec();
        fields.push(Field {
            name: name.into(),
            value: value.into(),
        });
        Self {
            ty: self.ty,
            fields: fields.into(),
        }
    }

    /// Returns the component type.
    #[must_use]
    pub fn component_type(&self) -> &ComponentType {
        &self.ty
    }

    /// Returns the fields in positional order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if this is a tag component (no fields).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates the field values in positional order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|f| &f.value)
    }

    /// Returns the position of a field by name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| &*f.name == name)
    }

    /// Gets a field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| &*f.name == name).map(|f| &f.value)
    }

    /// Gets a field value by position.
    #[must_use]
    pub fn value_at(&self, position: usize) -> Option<&Value> {
        self.fields.get(position).map(|f| &f.value)
    }

    /// Returns a new component with one field replaced.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the component has no field with that name.
    pub fn replace(&self, name: &str, value: impl Into<Value>) -> Result<Self> {
        let position = self.position(name).ok_or_else(|| {
            Error::schema(
                self.ty.as_str(),
                SchemaViolation::UnknownField(name.to_string()),
            )
        })?;
        let mut fields = self.fields.to_vec();
        fields[position].value = value.into();
        Ok(Self {
            ty: self.ty.clone(),
            fields: fields.into(),
        })
    }

    /// Returns a new component with the same type and field names but new values.
    ///
    /// `values` must yield exactly one value per field.
    #[must_use]
    pub fn with_values(&self, values: impl IntoIterator<Item = Value>) -> Self {
        let fields: Vec<Field> = self
            .fields
            .iter()
            .zip(values)
            .map(|(f, value)| Field {
                name: f.name.clone(),
                value,
            })
            .collect();
        debug_assert_eq!(fields.len(), self.fields.len());
        Self {
            ty: self.ty.clone(),
            fields: fields.into(),
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.ty.as_str());
        for field in self.fields.iter() {
            s.field(&field.name, &field.value);
        }
        s.finish()
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.ty)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", field.name, field.value)?;
        }
        write!(f, ")")
    }
}
