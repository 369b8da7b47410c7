//! Component Storage
//!
//! Components are plain data attached to entities. This module provides
//! `ComponentStore<T>` - a sparse array mapping entity ids to component
//! data - and the two-store inner join that backs every pairwise query.
//!
//! There is at most one component of a given kind per entity; inserting a
//! second overwrites the first (last-write-wins, not an error). Queries of
//! higher arity are deliberately unsupported: the API only offers single
//! iteration and the two-store [`join`], so an arbitrary-arity query is
//! unrepresentable rather than a runtime failure.

use super::entity::Entity;

/// Sparse storage for a single component kind.
///
/// Uses Option<T> so we can have "holes" where entities don't have this
/// component. Indexed by the entity id; since ids are never reused a slot
/// can only ever belong to one entity.
pub struct ComponentStore<T> {
    /// Sparse array indexed by entity.id()
    data: Vec<Option<T>>,
}

impl<T> ComponentStore<T> {
    /// Create empty storage.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }

    /// Insert a component for an entity.
    /// Replaces any existing component; never fails.
    pub fn insert(&mut self, entity: Entity, component: T) {
        let idx = entity.id() as usize;
        self.ensure_capacity(idx);
        self.data[idx] = Some(component);
    }

    /// Remove a component from an entity.
    /// Returns the removed component if it existed.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let idx = entity.id() as usize;
        if idx < self.data.len() {
            self.data[idx].take()
        } else {
            None
        }
    }

    /// Get a reference to an entity's component, or None if absent.
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let idx = entity.id() as usize;
        self.data.get(idx).and_then(|opt| opt.as_ref())
    }

    /// Get a mutable reference to an entity's component.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let idx = entity.id() as usize;
        self.data.get_mut(idx).and_then(|opt| opt.as_mut())
    }

    /// Check if an entity has this component.
    pub fn contains(&self, entity: Entity) -> bool {
        let idx = entity.id() as usize;
        idx < self.data.len() && self.data[idx].is_some()
    }

    /// Iterate over all (entity, component) pairs in ascending id order.
    ///
    /// The order is incidental (it shifts with add/remove churn); callers
    /// must not treat it as a contract.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(idx, opt)| opt.as_ref().map(|c| (Entity::new(idx as u32), c)))
    }

    /// Iterate mutably over all (entity, component) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .filter_map(|(idx, opt)| opt.as_mut().map(|c| (Entity::new(idx as u32), c)))
    }

    /// Collect the entities currently holding this component.
    /// Handy when a system needs to mutate the world while walking the set.
    pub fn entities(&self) -> Vec<Entity> {
        self.iter().map(|(e, _)| e).collect()
    }

    /// Clear the component from an entity slot.
    /// Called when an entity is despawned to clean up its components.
    pub fn clear_slot(&mut self, entity: Entity) {
        let idx = entity.id() as usize;
        if idx < self.data.len() {
            self.data[idx] = None;
        }
    }

    /// Clear all components. Used for per-tick transient tags.
    pub fn clear(&mut self) {
        for slot in &mut self.data {
            *slot = None;
        }
    }

    /// Get the number of entities that have this component.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|opt| opt.is_some()).count()
    }
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Inner join over two component stores.
///
/// Yields (entity, a, b) for every entity holding both kinds, in ascending
/// id order of the first store. This is the only multi-kind query the ECS
/// offers.
pub fn join<'s, A, B>(
    a: &'s ComponentStore<A>,
    b: &'s ComponentStore<B>,
) -> impl Iterator<Item = (Entity, &'s A, &'s B)> {
    a.iter()
        .filter_map(move |(entity, ca)| b.get(entity).map(|cb| (entity, ca, cb)))
}
