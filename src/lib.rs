//! Platformer Simulation Core
//!
//! A deterministic 2D side-scroller simulation: a lightweight ECS world,
//! AABB collision with minimum-translation resolution, and per-entity
//! behavior scripts built on a generic state machine. The crate owns no
//! window, renderer or audio device - each tick consumes an input intent
//! and produces a render view plus outbound scene/audio requests for the
//! embedder to act on.
//!
//! Key concepts:
//! - Entity: Monotonic id, never reused within a world
//! - Collider: Its own entity, back-referencing the body it guards
//! - Script: Per-entity hooks called at fixed points in the tick
//! - Outbox: Requests toward the embedder, drained after each tick
//!
//! Coordinates are screen space: y grows downward, so gravity is
//! positive y and a grounded body was pushed up (negative y) by the
//! resolver.

pub mod behaviors;
pub mod collision;
pub mod component;
pub mod components;
pub mod config;
pub mod entity;
pub mod fsm;
pub mod geom;
pub mod input;
pub mod level;
pub mod outbox;
pub mod script;
pub mod sim;
pub mod spawn;
pub mod systems;
pub mod timer;
pub mod world;

// Re-export main types
pub use component::ComponentStore;
pub use config::SimConfig;
pub use entity::Entity;
pub use geom::Aabb;
pub use input::Intent;
pub use level::LevelData;
pub use outbox::Outbox;
pub use script::{Contact, ContactLayer, Instance, Script, ScriptCtx};
pub use sim::{Simulation, SpriteView};
pub use world::World;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
