//! Schema definitions for component types.
//!
//! A schema fixes the ordered field names and field kinds of a component
//! type. Every value written to a world is checked against its schema before
//! anything is mutated.

use std::collections::HashMap;
use std::sync::Arc;

use ecm_foundation::{Component, ComponentType, Error, FieldKind, Result, SchemaViolation, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Schema definition for a component type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentSchema {
    /// Component name (e.g., `Position`, `Health`).
    pub name: ComponentType,
    /// Field definitions, in positional order.
    pub fields: Vec<FieldSchema>,
    /// Whether the type keeps a value index.
    pub indexed: bool,
}

impl ComponentSchema {
    /// Creates a new component schema with no fields.
    ///
    /// A schema without fields describes a tag component.
    #[must_use]
    pub fn new(name: impl Into<ComponentType>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            indexed: false,
        }
    }

    /// Adds a field to the schema.
    #[must_use]
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Marks the type as indexed by field value.
    #[must_use]
    pub fn with_index(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Builds a schema from `(field name, kind name)` pairs, such as
    /// `[("x", "int"), ("y", "int")]`.
    ///
    /// # Errors
    ///
    /// Returns a schema error if a kind name is not recognized.
    pub fn from_declaration<'a, I>(name: impl Into<ComponentType>, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut schema = Self::new(name);
        for (field, kind) in fields {
            let kind = kind
                .parse::<FieldKind>()
                .map_err(|violation| Error::schema(schema.name.as_str(), violation))?;
            schema.fields.push(FieldSchema::new(field, kind));
        }
        Ok(schema)
    }

    /// Infers a schema from a component value.
    ///
    /// Field names come from the value and each kind is the kind of the
    /// supplied field value.
    #[must_use]
    pub fn infer(component: &Component) -> Self {
        Self {
            name: component.component_type().clone(),
            fields: component
                .fields()
                .iter()
                .map(|f| FieldSchema {
                    name: f.name.clone(),
                    kind: f.value.kind(),
                })
                .collect(),
            indexed: false,
        }
    }

    /// Returns true if this is a tag component (no fields).
    #[must_use]
    pub fn is_tag(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Returns the field schema by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    /// Returns the position of a field by name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| &*f.name == name)
    }

    /// Checks that the declaration itself is well-formed.
    ///
    /// # Errors
    ///
    /// Returns a schema error for an empty type name, an empty field name,
    /// or a field declared twice.
    pub fn validate(&self) -> Result<()> {
        if self.name.as_str().is_empty() {
            return Err(self.violation(SchemaViolation::EmptyTypeName));
        }
        for (position, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(self.violation(SchemaViolation::EmptyFieldName { position }));
            }
            if self.fields[..position].iter().any(|f| f.name == field.name) {
                return Err(self.violation(SchemaViolation::DuplicateField(
                    field.name.to_string(),
                )));
            }
        }
        Ok(())
    }

    /// Checks a component value against this schema and returns the value to
    /// store.
    ///
    /// Integer values in float fields are promoted and `-0.0` is stored as
    /// `0.0`; everything else is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the type, arity, field names, or field
    /// kinds do not match, or if a float field holds NaN.
    pub fn conform(&self, component: Component) -> Result<Component> {
        if component.component_type() != &self.name {
            return Err(self.violation(SchemaViolation::ComponentTypeMismatch {
                expected: self.name.to_string(),
                actual: component.component_type().to_string(),
            }));
        }
        if component.len() != self.fields.len() {
            return Err(self.violation(SchemaViolation::ArityMismatch {
                expected: self.fields.len(),
                actual: component.len(),
            }));
        }

        let mut rewrite = false;
        for (position, (field, declared)) in component.fields().iter().zip(&self.fields).enumerate() {
            if field.name != declared.name {
                return Err(self.violation(SchemaViolation::FieldNameMismatch {
                    position,
                    expected: declared.name.to_string(),
                    actual: field.name.to_string(),
                }));
            }
            let actual = field.value.kind();
            if !declared.kind.accepts(actual) {
                return Err(self.violation(SchemaViolation::KindMismatch {
                    field: declared.name.to_string(),
                    expected: declared.kind,
                    actual,
                }));
            }
            if field.value.is_nan() {
                return Err(self.violation(SchemaViolation::NotANumber {
                    field: declared.name.to_string(),
                }));
            }
            rewrite |= actual != declared.kind || field.value.is_negative_zero();
        }

        if !rewrite {
            return Ok(component);
        }
        let values: Vec<Value> = component
            .values()
            .zip(&self.fields)
            .map(|(value, declared)| value.coerce_to(declared.kind).unwrap_or_else(|| value.clone()))
            .collect();
        Ok(component.with_values(values))
    }

    /// Resolves a `field = value` constraint to a field position and the
    /// value as it would be stored.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the field does not exist, the value has
    /// the wrong kind, or the value is NaN.
    pub fn resolve(&self, field: &str, value: &Value) -> Result<(usize, Value)> {
        let position = self
            .position(field)
            .ok_or_else(|| self.violation(SchemaViolation::UnknownField(field.to_string())))?;
        let kind = self.fields[position].kind;
        let value = value.coerce_to(kind).ok_or_else(|| {
            self.violation(SchemaViolation::KindMismatch {
                field: field.to_string(),
                expected: kind,
                actual: value.kind(),
            })
        })?;
        if value.is_nan() {
            return Err(self.violation(SchemaViolation::NotANumber {
                field: field.to_string(),
            }));
        }
        Ok((position, value))
    }

    fn violation(&self, violation: SchemaViolation) -> Error {
        Error::schema(self.name.as_str(), violation)
    }
}

/// Schema definition for a component field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSchema {
    /// Field name.
    pub name: Arc<str>,
    /// Field kind.
    pub kind: FieldKind,
}

impl FieldSchema {
    /// Creates a field schema.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Outcome of registering a schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// The type was not known and is now registered.
    Added,
    /// The type was already registered with the same declaration.
    Unchanged,
    /// The type was already registered with the same fields but no value
    /// index, and the new declaration asks for one. The index flag is now set.
    Indexed,
    /// The type was already registered with a different declaration. The
    /// existing declaration is kept.
    Conflicting,
}

/// Registered schemas, in registration order.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    schemas: Vec<ComponentSchema>,
    by_name: HashMap<ComponentType, usize>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema.
    ///
    /// Registering a type that is already known never replaces its fields.
    /// A redeclaration with the same fields may turn the value index on, but
    /// never off.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the declaration is malformed.
    pub fn register(&mut self, schema: ComponentSchema) -> Result<Registration> {
        schema.validate()?;
        if let Some(&slot) = self.by_name.get(&schema.name) {
            let existing = &mut self.schemas[slot];
            return Ok(if existing.fields != schema.fields {
                Registration::Conflicting
            } else if schema.indexed && !existing.indexed {
                existing.indexed = true;
                Registration::Indexed
            } else {
                Registration::Unchanged
            });
        }
        self.by_name.insert(schema.name.clone(), self.schemas.len());
        self.schemas.push(schema);
        Ok(Registration::Added)
    }

    /// Gets a schema by type name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ComponentSchema> {
        self.by_name.get(name).map(|&slot| &self.schemas[slot])
    }

    /// Checks if a type is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Marks a registered type as indexed.
    ///
    /// Returns the schema if the flag changed, `None` if the type is unknown
    /// or already indexed.
    pub fn set_indexed(&mut self, name: &str) -> Option<&ComponentSchema> {
        let slot = *self.by_name.get(name)?;
        let schema = &mut self.schemas[slot];
        if schema.indexed {
            return None;
        }
        schema.indexed = true;
        Some(&*schema)
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Iterates schemas in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentSchema> {
        self.schemas.iter()
    }
}
