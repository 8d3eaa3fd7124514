//! Entity handles.
//!
//! An [`Entity`] is a small `Copy` value naming one entity of one world. It
//! does not borrow the world; each method takes the world explicitly and
//! checks that it is the world that issued the handle.

use std::fmt;

use ecm_foundation::{Component, EntityId, Error, ErrorContext, Result, WorldId};

use crate::backend::Storage;
use crate::world::World;

/// A reference to an entity of a specific world.
///
/// Two handles are equal when they name the same id in the same world.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    world: WorldId,
    id: EntityId,
}

impl Entity {
    pub(crate) fn new(world: WorldId, id: EntityId) -> Self {
        Self { world, id }
    }

    /// Returns the entity id.
    #[must_use]
    pub fn id(self) -> EntityId {
        self.id
    }

    /// Returns the world that issued this handle.
    #[must_use]
    pub fn world(self) -> WorldId {
        self.world
    }

    /// Checks if the entity is live in the given world.
    ///
    /// Always false for a world that did not issue the handle.
    #[must_use]
    pub fn is_alive<S: Storage>(self, world: &World<S>) -> bool {
        world.id() == self.world && world.is_alive(self.id)
    }

    /// Checks if the entity holds a component of a type.
    ///
    /// # Errors
    ///
    /// Returns a foreign handle error if `world` did not issue this handle,
    /// or any error of [`World::has_component`].
    pub fn has<S: Storage>(self, world: &World<S>, ty: &str) -> Result<bool> {
        self.check(world, "has")?;
        world.has_component(self.id, ty)
    }

    /// Reads a component.
    ///
    /// # Errors
    ///
    /// Returns a foreign handle error if `world` did not issue this handle,
    /// or any error of [`World::get_component`].
    pub fn get<S: Storage>(self, world: &World<S>, ty: &str) -> Result<Option<Component>> {
        self.check(world, "get")?;
        world.get_component(self.id, ty)
    }

    /// Attaches or replaces a component.
    ///
    /// # Errors
    ///
    /// Returns a foreign handle error if `world` did not issue this handle,
    /// or any error of [`World::set_component`].
    pub fn set<S: Storage>(self, world: &mut World<S>, component: Component) -> Result<()> {
        self.check(world, "set")?;
        world.set_component(self.id, component)
    }

    /// Detaches a component, returning the removed value.
    ///
    /// # Errors
    ///
    /// Returns a foreign handle error if `world` did not issue this handle,
    /// or any error of [`World::remove_component`].
    pub fn remove<S: Storage>(self, world: &mut World<S>, ty: &str) -> Result<Option<Component>> {
        self.check(world, "remove")?;
        world.remove_component(self.id, ty)
    }

    /// Replaces a component with a transform of its current value.
    ///
    /// # Errors
    ///
    /// Returns a foreign handle error if `world` did not issue this handle,
    /// or any error of [`World::update_component`].
    pub fn update<S, F>(self, world: &mut World<S>, ty: &str, f: F) -> Result<Option<Component>>
    where
        S: Storage,
        F: FnOnce(&Component) -> Result<Component>,
    {
        self.check(world, "update")?;
        world.update_component(self.id, ty, f)
    }

    /// Returns every component the entity holds.
    ///
    /// # Errors
    ///
    /// Returns a foreign handle error if `world` did not issue this handle.
    pub fn components<S: Storage>(self, world: &World<S>) -> Result<Vec<Component>> {
        self.check(world, "components")?;
        Ok(world.components(self.id))
    }

    fn check<S: Storage>(self, world: &World<S>, operation: &'static str) -> Result<()> {
        if world.id() == self.world {
            Ok(())
        } else {
            Err(Error::foreign_handle(self.id, self.world, world.id()).with_context(
                ErrorContext::new()
                    .with_operation(operation)
                    .with_entity(self.id),
            ))
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}@{})", self.id.index(), self.world)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl From<Entity> for EntityId {
    fn from(entity: Entity) -> Self {
        entity.id
    }
}
