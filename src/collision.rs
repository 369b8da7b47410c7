//! Collision System - broad phase, narrow phase, classification
//!
//! Every tick the narrow phase visits each unordered collider pair once,
//! classifies it into exactly one interaction kind, and appends MTV
//! results to per-kind buffers. It never mutates positions or velocities
//! itself - downstream systems consume the buffers - so pair-processing
//! order cannot affect the outcome.
//!
//! The pass is O(n^2) in collider count. That is the documented cost
//! ceiling for world size, not a defect: rooms hold tens of colliders,
//! not thousands.

use glam::Vec2;
use tracing::trace;

use super::components::Team;
use super::entity::Entity;
use super::geom::{mtv, Aabb};
use super::world::World;

/// The mutually exclusive role a collider volume plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Rigid,
    Hitbox,
    Hurtbox,
    Trigger,
}

/// Read the role tag of a collider entity.
///
/// Exactly one of Rigid/Hitbox/Hurtbox/Trigger may be present. More than
/// one is a fatal configuration error: simultaneous tags corrupt gameplay
/// semantics and must never be silently resolved. A collider with no tag
/// participates in nothing.
pub fn collider_role(world: &World, entity: Entity) -> Option<Role> {
    let mut found: Option<Role> = None;
    let mut claim = |role: Role| {
        if let Some(existing) = found {
            panic!(
                "{} carries both {:?} and {:?} collider tags",
                entity, existing, role
            );
        }
        found = Some(role);
    };
    if world.rigids.contains(entity) {
        claim(Role::Rigid);
    }
    if world.hitboxes.contains(entity) {
        claim(Role::Hitbox);
    }
    if world.hurtboxes.contains(entity) {
        claim(Role::Hurtbox);
    }
    if world.triggers.contains(entity) {
        claim(Role::Trigger);
    }
    found
}

/// A rigid-rigid overlap awaiting positional resolution.
#[derive(Debug, Clone, Copy)]
pub struct RigidContact {
    /// Body to be pushed out (the side with a Velocity)
    pub mover: Entity,
    /// Body it is pushed out of
    pub obstacle: Entity,
    /// Subtracting this from the mover's position separates the pair
    pub mtv: Vec2,
    /// False when both sides move: hooks still fire, no correction
    pub resolve: bool,
}

/// A hitbox overlapping an opposing team's hurtbox.
#[derive(Debug, Clone, Copy)]
pub struct DamagePair {
    /// Body owning the hitbox
    pub attacker: Entity,
    /// Body owning the hurtbox
    pub victim: Entity,
    pub damage: i32,
}

/// A trigger volume overlapped by the player.
#[derive(Debug, Clone, Copy)]
pub struct TriggerHit {
    /// Body owning the trigger volume
    pub owner: Entity,
    /// The player body that fired it
    pub player: Entity,
}

/// Per-kind transient result buffers. Owned by the collision system while
/// it fills them, then read by the rigid-resolution and damage systems.
#[derive(Default)]
pub struct ContactBuffers {
    pub rigid: Vec<RigidContact>,
    pub damage: Vec<DamagePair>,
    pub trigger: Vec<TriggerHit>,
}

impl ContactBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.rigid.clear();
        self.damage.clear();
        self.trigger.clear();
    }
}

/// Everything the narrow phase needs to know about one collider, resolved
/// up front so the pair loop does no storage lookups.
struct ColliderRef {
    entity: Entity,
    role: Role,
    parent: Entity,
    aabb: Aabb,
    team: Option<Team>,
    is_player: bool,
    moving: bool,
    /// Damage carried by this collider's hitbox tag; zero when it has none
    damage: i32,
}

/// Run broad and narrow phase, filling `buffers`.
///
/// Clears the transient Grounded tags and all result buffers first, so
/// every tick starts from a clean slate.
pub fn collision_system(world: &mut World, buffers: &mut ContactBuffers) {
    world.grounded.clear();
    buffers.clear();

    // Broad phase: every collider entity, ascending id.
    let mut refs: Vec<ColliderRef> = Vec::new();
    for (entity, collider) in world.colliders.iter() {
        let Some(role) = collider_role(world, entity) else {
            continue;
        };
        // Parent without a Position is already gone under deferred
        // deletion; skip this collider for the current tick only.
        let Some(pos) = world.positions.get(collider.parent) else {
            trace!(collider = %entity, parent = %collider.parent, "parent gone, collider skipped");
            continue;
        };
        refs.push(ColliderRef {
            entity,
            role,
            parent: collider.parent,
            aabb: Aabb::of_collider(pos, collider),
            team: world.teams.get(collider.parent).copied(),
            is_player: world.players.contains(collider.parent),
            moving: world.velocities.contains(collider.parent),
            damage: world.hitboxes.get(entity).map(|h| h.damage).unwrap_or(0),
        });
    }

    // Narrow phase: every unordered pair (i < j).
    for i in 0..refs.len() {
        for j in (i + 1)..refs.len() {
            let (a, b) = (&refs[i], &refs[j]);
            classify_pair(a, b, buffers);
        }
    }
}

/// Classify one pair into exactly one interaction kind and, when it is
/// one the simulation cares about, do the AABB math and buffer the result.
fn classify_pair(a: &ColliderRef, b: &ColliderRef, buffers: &mut ContactBuffers) {
    // A body never interacts with itself (its hull vs its own hurtbox).
    if a.parent == b.parent {
        return;
    }

    let rigid = a.role == Role::Rigid && b.role == Role::Rigid;
    let damage_a_to_b = opposing_hit(a, b);
    let damage_b_to_a = opposing_hit(b, a);
    let trigger = (a.role == Role::Trigger && b.is_player)
        || (b.role == Role::Trigger && a.is_player);

    let kinds = usize::from(rigid)
        + usize::from(damage_a_to_b)
        + usize::from(damage_b_to_a)
        + usize::from(trigger);
    match kinds {
        // No interaction: cheap reject, no geometric work at all.
        0 => return,
        1 => {}
        _ => panic!(
            "collider pair {}/{} classifies as {} interaction kinds",
            a.entity, b.entity, kinds
        ),
    }

    if rigid {
        let (mover, obstacle) = match (a.moving, b.moving) {
            (true, false) => (a, b),
            (false, true) => (b, a),
            // Two static obstacles overlapping is benign authored geometry.
            (false, false) => return,
            // Both moving: contact hooks fire, nobody gets displaced.
            (true, true) => (a, b),
        };
        if let Some(v) = mtv(&mover.aabb, &obstacle.aabb) {
            buffers.rigid.push(RigidContact {
                mover: mover.parent,
                obstacle: obstacle.parent,
                mtv: v,
                resolve: !(a.moving && b.moving),
            });
        }
    } else if damage_a_to_b || damage_b_to_a {
        let (hit, hurt) = if damage_a_to_b { (a, b) } else { (b, a) };
        if mtv(&hit.aabb, &hurt.aabb).is_some() {
            buffers.damage.push(DamagePair {
                attacker: hit.parent,
                victim: hurt.parent,
                damage: hit.damage,
            });
        }
    } else if trigger {
        let (zone, player) = if a.role == Role::Trigger { (a, b) } else { (b, a) };
        if mtv(&zone.aabb, &player.aabb).is_some() {
            buffers.trigger.push(TriggerHit {
                owner: zone.parent,
                player: player.parent,
            });
        }
    }
}

/// Hitbox on `hit` against hurtbox on `hurt`, teams opposing.
fn opposing_hit(hit: &ColliderRef, hurt: &ColliderRef) -> bool {
    if hit.role != Role::Hitbox || hurt.role != Role::Hurtbox {
        return false;
    }
    match (hit.team, hurt.team) {
        (Some(ht), Some(vt)) => ht.hostile_to(vt),
        // A side without a Team never deals or receives damage
        _ => false,
    }
}
