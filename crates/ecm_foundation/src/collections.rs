//! Persistent entity sets.
//!
//! [`EntitySet`] is a thin wrapper around `im::OrdSet`. Snapshots are O(1)
//! clones that share structure with the live set, so a query can hand out a
//! frozen copy of an index without copying it.

use std::fmt;
use std::iter::FromIterator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Ordered persistent set of entity ids.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntitySet(im::OrdSet<EntityId>);

impl EntitySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self(im::OrdSet::new())
    }

    /// Returns the number of ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the set contains the id.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.0.contains(&id)
    }

    /// Inserts an id. Returns true if it was not already present.
    pub fn insert(&mut self, id: EntityId) -> bool {
        self.0.insert(id).is_none()
    }

    /// Removes an id. Returns true if it was present.
    pub fn remove(&mut self, id: EntityId) -> bool {
        self.0.remove(&id).is_some()
    }

    /// Iterates the ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.0.iter().copied()
    }

    /// Returns the intersection of two sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        // Probe the larger set with the smaller one.
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().filter(|id| large.contains(*id)).collect()
    }

    /// Intersects many sets, smallest first.
    ///
    /// Returns `None` when no sets are given: the caller decides what an
    /// unconstrained intersection means.
    #[must_use]
    pub fn intersect_all<'a, I>(sets: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a EntitySet>,
    {
        let mut sets: Vec<&EntitySet> = sets.into_iter().collect();
        sets.sort_by_key(|s| s.len());
        let (first, rest) = sets.split_first()?;
        let mut result = (*first).clone();
        for set in rest {
            if result.is_empty() {
                break;
            }
            result = result.intersection(set);
        }
        Some(result)
    }

    /// Collects the ids into a vector, in ascending order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<EntityId> {
        self.iter().collect()
    }
}

impl fmt::Debug for EntitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<EntityId> for EntitySet {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        Self(im::OrdSet::from_iter(iter))
    }
}

impl Extend<EntityId> for EntitySet {
    fn extend<I: IntoIterator<Item = EntityId>>(&mut self, iter: I) {
        for id in iter {
            self.0.insert(id);
        }
    }
}
