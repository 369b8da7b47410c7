//! Entity Ids
//!
//! Entities are lightweight identifiers that reference game objects.
//! Ids are monotonically increasing per world and are never reused:
//! once an entity is freed, its id stays dead forever. A stale reference
//! to a destroyed enemy can therefore never accidentally match an entity
//! spawned later - there is no slot reuse to collide with.

use serde::{Deserialize, Serialize};

/// A unique identifier for a game entity.
///
/// Just an index into per-component storage. Because ids are never
/// recycled, identity checks reduce to integer equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    id: u32,
}

impl Entity {
    /// Create an entity handle from a raw id.
    /// Should only be called by [`EntityAllocator`] and component storage.
    pub(crate) fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the raw id of this entity (for component array access).
    pub fn id(&self) -> u32 {
        self.id
    }

    /// A null/invalid entity reference.
    /// Useful for "no target" or uninitialized fields.
    pub const NULL: Entity = Entity { id: u32::MAX };

    /// Check if this is the null entity.
    pub fn is_null(&self) -> bool {
        self.id == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "entity(null)")
        } else {
            write!(f, "entity({})", self.id)
        }
    }
}

/// Allocates and tracks entity lifetimes.
///
/// Hands out strictly increasing ids. Freed ids are tombstoned rather
/// than returned to a pool.
pub struct EntityAllocator {
    /// Liveness flag per id ever allocated
    alive: Vec<bool>,
    /// Next fresh id
    next: u32,
    /// Number of currently alive entities
    alive_count: u32,
}

impl EntityAllocator {
    /// Create a new allocator with no entities.
    pub fn new() -> Self {
        Self {
            alive: Vec::new(),
            next: 0,
            alive_count: 0,
        }
    }

    /// Allocate a new entity with a fresh id.
    pub fn allocate(&mut self) -> Entity {
        let id = self.next;
        self.next += 1;
        self.alive.push(true);
        self.alive_count += 1;
        Entity::new(id)
    }

    /// Free an entity. Its id is permanently retired.
    /// Returns true if the entity was alive and is now freed.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.alive[entity.id as usize] = false;
        self.alive_count -= 1;
        true
    }

    /// Check if an entity is currently alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        let idx = entity.id as usize;
        idx < self.alive.len() && self.alive[idx]
    }

    /// Get the number of currently alive entities.
    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }

    /// Total ids ever handed out (alive or dead).
    pub fn capacity(&self) -> u32 {
        self.next
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_free() {
        let mut alloc = EntityAllocator::new();

        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        assert_eq!(alloc.alive_count(), 2);
        assert!(alloc.is_alive(e1));
        assert!(alloc.is_alive(e2));

        alloc.free(e1);
        assert_eq!(alloc.alive_count(), 1);
        assert!(!alloc.is_alive(e1));
        assert!(alloc.is_alive(e2));
    }

    #[test]
    fn test_ids_strictly_increase_across_deletion() {
        let mut alloc = EntityAllocator::new();

        let mut last = alloc.allocate();
        for _ in 0..10 {
            // Free and reallocate - the freed id must never come back
            alloc.free(last);
            let next = alloc.allocate();
            assert!(next.id() > last.id());
            assert!(!alloc.is_alive(last));
            last = next;
        }
    }

    #[test]
    fn test_double_free_is_a_noop() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        assert!(alloc.free(e));
        assert!(!alloc.free(e));
        assert_eq!(alloc.alive_count(), 0);
    }

    #[test]
    fn test_null_entity() {
        let alloc = EntityAllocator::new();
        assert!(!alloc.is_alive(Entity::NULL));
        assert!(Entity::NULL.is_null());
    }
}
