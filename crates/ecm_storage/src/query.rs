//! Query evaluation.
//!
//! Type queries intersect the membership sets of the requested types,
//! smallest first. Value queries go through the backend's `lookup`, which
//! uses a value index when one exists and a scan otherwise; both paths
//! return the same set.
//!
//! Results are materialized eagerly: a caller may mutate the world while
//! walking a result without affecting it.

use ecm_foundation::{Component, EntityId, EntitySet, Value};

use crate::backend::Storage;
use crate::schema::ComponentSchema;

/// One row of a component query: an entity and the requested components, in
/// the order they were requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryRow {
    /// The matching entity.
    pub entity: EntityId,
    /// The requested components.
    pub components: Vec<Component>,
}

impl QueryRow {
    /// Gets a component of the row by type name.
    #[must_use]
    pub fn get(&self, ty: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.component_type().as_str() == ty)
    }
}

/// Returns true if the component's values equal every `(position, value)`
/// constraint.
#[must_use]
pub fn matches(component: &Component, constraints: &[(usize, Value)]) -> bool {
    constraints
        .iter()
        .all(|(position, value)| component.value_at(*position) == Some(value))
}

/// Intersects the holders of every schema.
///
/// Returns `None` for an empty schema list; the caller decides whether that
/// means every live entity.
pub(crate) fn holders_of_all<S: Storage>(
    storage: &S,
    schemas: &[&ComponentSchema],
) -> Option<EntitySet> {
    let sets: Vec<EntitySet> = schemas.iter().map(|s| storage.members(s)).collect();
    EntitySet::intersect_all(&sets)
}

/// Reads the requested components for each entity.
///
/// An entity missing any component is skipped.
pub(crate) fn rows<S: Storage>(
    storage: &S,
    entities: &EntitySet,
    schemas: &[&ComponentSchema],
) -> Vec<QueryRow> {
    entities
        .iter()
        .filter_map(|entity| {
            let components = schemas
                .iter()
                .map(|s| storage.read(s, entity))
                .collect::<Option<Vec<_>>>()?;
            Some(QueryRow { entity, components })
        })
        .collect()
}
