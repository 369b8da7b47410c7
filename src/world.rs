//! ECS World
//!
//! The World is the central container for all simulation state: entity
//! allocation, one typed component store per component kind, and the
//! deferred delete sweep. Component kinds are fixed at compile time - a
//! typed field per kind preserves the one-component-per-(entity, kind)
//! invariant without any runtime type registry.
//!
//! Entities are destroyed only by marking [`PendingDelete`]; the sweep at
//! the end of each tick consumes every marker in one deterministic place,
//! so no system ever observes a half-deleted entity mid-tick.

use tracing::debug;

use super::component::ComponentStore;
use super::components::{
    Animation, Collider, Facing, Grounded, Health, Hitbox, Hurtbox, PendingDelete, Player,
    Position, Rigid, Sprite, Team, Trigger, Velocity,
};
use super::entity::{Entity, EntityAllocator};
use super::script::Instance;

/// The simulation world: entity ids plus per-kind component storage.
pub struct World {
    entities: EntityAllocator,

    // Physics / movement
    pub positions: ComponentStore<Position>,
    pub velocities: ComponentStore<Velocity>,
    pub facings: ComponentStore<Facing>,

    // Collision volumes and their mutually exclusive role tags
    pub colliders: ComponentStore<Collider>,
    pub rigids: ComponentStore<Rigid>,
    pub hitboxes: ComponentStore<Hitbox>,
    pub hurtboxes: ComponentStore<Hurtbox>,
    pub triggers: ComponentStore<Trigger>,

    // Combat
    pub healths: ComponentStore<Health>,
    pub teams: ComponentStore<Team>,

    // Presentation
    pub sprites: ComponentStore<Sprite>,
    pub animations: ComponentStore<Animation>,

    // Behavior scripts
    pub instances: ComponentStore<Instance>,

    // Markers
    pub players: ComponentStore<Player>,
    pub pending_delete: ComponentStore<PendingDelete>,
    pub grounded: ComponentStore<Grounded>,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            positions: ComponentStore::new(),
            velocities: ComponentStore::new(),
            facings: ComponentStore::new(),
            colliders: ComponentStore::new(),
            rigids: ComponentStore::new(),
            hitboxes: ComponentStore::new(),
            hurtboxes: ComponentStore::new(),
            triggers: ComponentStore::new(),
            healths: ComponentStore::new(),
            teams: ComponentStore::new(),
            sprites: ComponentStore::new(),
            animations: ComponentStore::new(),
            instances: ComponentStore::new(),
            players: ComponentStore::new(),
            pending_delete: ComponentStore::new(),
            grounded: ComponentStore::new(),
        }
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    /// Create a new bare entity. Factories in the `spawn` module attach
    /// complete component sets; nothing outside them should leave an
    /// entity half-built across a tick boundary.
    pub fn spawn(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Mark an entity for destruction at the end of the current tick.
    /// The only way to destroy an entity.
    pub fn mark_despawn(&mut self, entity: Entity) {
        if self.is_alive(entity) {
            self.pending_delete.insert(entity, PendingDelete);
        }
    }

    /// Check if an entity is currently alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of alive entities.
    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    /// First alive entity carrying the Player marker, if any.
    pub fn player(&self) -> Option<Entity> {
        self.players.iter().map(|(e, _)| e).next()
    }

    /// End-of-tick delete sweep. Runs after every other system.
    ///
    /// Consumes every PendingDelete marker, removing the entity and all
    /// its components, and cascades to collider entities whose parent body
    /// is among the deleted - a body never leaves orphaned hulls behind.
    pub fn sweep(&mut self) {
        let mut doomed = self.pending_delete.entities();
        if doomed.is_empty() {
            return;
        }

        // Cascade: sub-colliders of deleted bodies go in the same sweep.
        let direct: Vec<Entity> = doomed.clone();
        for (collider_entity, collider) in self.colliders.iter() {
            if direct.contains(&collider.parent) && !doomed.contains(&collider_entity) {
                doomed.push(collider_entity);
            }
        }

        debug!(count = doomed.len(), "delete sweep");
        for entity in doomed {
            self.remove_all(entity);
            self.entities.free(entity);
        }
        // No tick boundary ever observes a marker.
        self.pending_delete.clear();
    }

    /// Clear every component slot belonging to an entity.
    fn remove_all(&mut self, entity: Entity) {
        self.positions.clear_slot(entity);
        self.velocities.clear_slot(entity);
        self.facings.clear_slot(entity);
        self.colliders.clear_slot(entity);
        self.rigids.clear_slot(entity);
        self.hitboxes.clear_slot(entity);
        self.hurtboxes.clear_slot(entity);
        self.triggers.clear_slot(entity);
        self.healths.clear_slot(entity);
        self.teams.clear_slot(entity);
        self.sprites.clear_slot(entity);
        self.animations.clear_slot(entity);
        self.instances.clear_slot(entity);
        self.players.clear_slot(entity);
        self.pending_delete.clear_slot(entity);
        self.grounded.clear_slot(entity);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
