//! Game Components
//!
//! All the component types used by the platformer simulation. Components
//! are plain data structs - behavior lives in systems and in the per-entity
//! scripts (see the `script` module).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;

// =============================================================================
// Physics / Movement
// =============================================================================

/// World position of a body, top-left anchor, y grows downward (screen space).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// Velocity in units per second.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Horizontal facing of a body, used for sprite mirroring and attack aim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Unit sign along x: -1 for left, +1 for right.
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Facing derived from a horizontal speed; None when there is no
    /// meaningful direction.
    pub fn from_vx(vx: f32) -> Option<Self> {
        if vx > f32::EPSILON {
            Some(Facing::Right)
        } else if vx < -f32::EPSILON {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

// =============================================================================
// Collision
// =============================================================================

/// An axis-aligned collision volume.
///
/// A collider is its own entity, separate from the physical body it
/// protects. `parent` is a non-owning back-reference to the body entity
/// whose Position anchors the box - this lets one body own several
/// independently tagged colliders (a rigid hull plus a hurtbox plus a
/// hitbox). A parent lacking a Position mid-tick means the body is
/// already gone; the collider is simply skipped that tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    /// The body entity this volume belongs to
    pub parent: Entity,
    /// Offset of the box's top-left corner from the parent position
    pub offset: Vec2,
    /// Width and height of the box
    pub size: Vec2,
}

impl Collider {
    pub fn new(parent: Entity, offset: Vec2, size: Vec2) -> Self {
        Self {
            parent,
            offset,
            size,
        }
    }
}

/// Role tag: solid volume resolved against other solids.
/// Exactly one of Rigid/Hitbox/Hurtbox/Trigger may sit on a collider
/// entity; more than one is a fatal configuration error.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Rigid;

/// Role tag: a volume that deals damage while overlapping an opposing
/// team's hurtbox.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hitbox {
    pub damage: i32,
}

/// Role tag: a volume that can receive damage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Hurtbox;

/// Role tag: a volume fired by player overlap (portals, pickups).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Trigger;

/// Team affiliation for damage filtering, read from the collider's parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Team {
    Player,
    Enemy,
    /// Environmental hazards - hostile to everyone
    Neutral,
}

impl Team {
    /// Whether a hitbox on `self`'s side damages a hurtbox on `other`'s side.
    pub fn hostile_to(&self, other: Team) -> bool {
        match (self, other) {
            (Team::Neutral, _) | (_, Team::Neutral) => true,
            (a, b) => a != &b,
        }
    }
}

// =============================================================================
// Combat
// =============================================================================

/// Health for damageable entities, with an invulnerability window that
/// absorbs repeat hits while it is open.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
    /// Seconds of invulnerability remaining
    pub invuln_remaining: f32,
    /// Window length granted after a successful hit
    pub invuln_duration: f32,
}

impl Health {
    pub fn new(max: i32, invuln_duration: f32) -> Self {
        Self {
            current: max,
            max,
            invuln_remaining: 0.0,
            invuln_duration,
        }
    }

    /// Explicit death predicate - systems must use this, never a raw sign
    /// check on `current`.
    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln_remaining > 0.0
    }

    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount).min(self.max);
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// Renderable sprite reference. Translating sheet + frame into pixels is
/// entirely the renderer's job; the core only bookkeeps indices.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sprite {
    /// Sprite-sheet identifier, meaningful to the renderer only
    pub sheet: u32,
    /// Frame index within the sheet
    pub frame: u32,
    /// Draw order; the render view sorts by z descending
    pub z: i32,
}

impl Sprite {
    pub fn new(sheet: u32, z: i32) -> Self {
        Self { sheet, frame: 0, z }
    }
}

/// Frame animation driving a [`Sprite`]'s frame index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Animation {
    /// First frame of the clip within the sheet
    pub first_frame: u32,
    /// Number of frames in the clip
    pub frame_count: u32,
    /// Seconds per frame
    pub frame_time: f32,
    /// Time accumulated into the current frame
    pub elapsed: f32,
    /// Loop or play once and hold the last frame
    pub looping: bool,
    /// Set once a non-looping clip has played through
    pub finished: bool,
}

impl Animation {
    pub fn looping(first_frame: u32, frame_count: u32, frame_time: f32) -> Self {
        Self {
            first_frame,
            frame_count,
            frame_time,
            elapsed: 0.0,
            looping: true,
            finished: false,
        }
    }

    pub fn once(first_frame: u32, frame_count: u32, frame_time: f32) -> Self {
        Self {
            looping: false,
            ..Self::looping(first_frame, frame_count, frame_time)
        }
    }
}

// =============================================================================
// Markers
// =============================================================================

/// Marks the player body entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Player;

/// Transient marker for deferred destruction. Added during a tick,
/// consumed exactly once by the end-of-tick delete sweep; no tick
/// boundary ever observes one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingDelete;

/// Transient per-tick tag: resting on a surface this frame.
/// Cleared at the start of every collision pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grounded;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_hostility() {
        assert!(Team::Player.hostile_to(Team::Enemy));
        assert!(Team::Enemy.hostile_to(Team::Player));
        assert!(Team::Neutral.hostile_to(Team::Player));
        assert!(Team::Enemy.hostile_to(Team::Neutral));
        assert!(!Team::Player.hostile_to(Team::Player));
        assert!(!Team::Enemy.hostile_to(Team::Enemy));
    }

    #[test]
    fn test_health_death_predicate() {
        let mut health = Health::new(10, 0.5);
        assert!(!health.is_dead());
        health.current = 0;
        assert!(health.is_dead());
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut health = Health::new(10, 0.5);
        health.current = 8;
        health.heal(100);
        assert_eq!(health.current, 10);
    }

    #[test]
    fn test_facing_from_velocity() {
        assert_eq!(Facing::from_vx(3.0), Some(Facing::Right));
        assert_eq!(Facing::from_vx(-0.5), Some(Facing::Left));
        assert_eq!(Facing::from_vx(0.0), None);
    }
}
