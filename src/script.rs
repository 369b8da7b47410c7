//! Behavior Scripts
//!
//! A script is a capability object bound to one owning entity, stored in
//! that entity's [`Instance`] component. The engine calls optional hooks
//! at fixed points in the tick; a hook a script does not override is a
//! no-op, never an error. There is no entity class hierarchy - all
//! polymorphic behavior flows through this one protocol.
//!
//! Hooks receive a [`ScriptCtx`] with mutable access to the whole world.
//! To make that sound, the instance is detached from its component slot
//! for the duration of its own hook and reattached afterwards.

use glam::Vec2;

use super::components::Position;
use super::config::SimConfig;
use super::entity::Entity;
use super::input::Intent;
use super::outbox::Outbox;
use super::world::World;

/// Which collision classification produced a contact hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactLayer {
    /// Solid-on-solid overlap
    Rigid,
    /// Player overlapped a trigger volume
    Trigger,
}

/// Contact details handed to `on_collision`.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub layer: ContactLayer,
    /// Minimum translation vector, oriented for the moving side
    pub mtv: Vec2,
}

/// The world view a script hook operates on.
pub struct ScriptCtx<'a> {
    pub world: &'a mut World,
    pub outbox: &'a mut Outbox,
    pub input: &'a Intent,
    pub config: &'a SimConfig,
    /// The entity this script is bound to
    pub owner: Entity,
}

impl ScriptCtx<'_> {
    /// Position of the owning entity, if it still has one.
    pub fn owner_position(&self) -> Option<Vec2> {
        self.world.positions.get(self.owner).map(|p| p.0)
    }

    /// Position of the player body, if one exists.
    pub fn player_position(&self) -> Option<Vec2> {
        let player = self.world.player()?;
        self.world.positions.get(player).map(|p| p.0)
    }

    /// Horizontal distance from the owner to the player.
    pub fn horizontal_distance_to_player(&self) -> Option<f32> {
        let own = self.owner_position()?;
        let player = self.player_position()?;
        Some((player.x - own.x).abs())
    }

    /// True while the owner rests on a surface this frame.
    pub fn owner_grounded(&self) -> bool {
        self.world.grounded.contains(self.owner)
    }

    /// Read another entity's position.
    pub fn position_of(&self, entity: Entity) -> Option<Position> {
        self.world.positions.get(entity).copied()
    }
}

/// Per-entity behavior hooks. Every method has a no-op default.
pub trait Script {
    /// Called once, before the first `on_update`.
    fn on_init(&mut self, _ctx: &mut ScriptCtx<'_>) {}

    /// Called once per tick for every script-bearing entity.
    fn on_update(&mut self, _ctx: &mut ScriptCtx<'_>, _dt: f32) {}

    /// Called when a collision involving one of the owner's colliders was
    /// resolved. `other` is the opposing body entity.
    fn on_collision(&mut self, _ctx: &mut ScriptCtx<'_>, _other: Entity, _contact: Contact) {}

    /// Called after the owner took damage.
    fn on_hurt(&mut self, _ctx: &mut ScriptCtx<'_>, _attacker: Entity) {}

    /// Called after a hitbox owned by this entity landed damage.
    fn on_hit(&mut self, _ctx: &mut ScriptCtx<'_>, _victim: Entity) {}

    /// Called exactly once when the owner's health reaches zero.
    fn on_die(&mut self, _ctx: &mut ScriptCtx<'_>) {}
}

/// Component wrapping a per-entity behavior script.
pub struct Instance {
    pub script: Box<dyn Script>,
    pub(crate) initialized: bool,
}

impl Instance {
    pub fn new(script: Box<dyn Script>) -> Self {
        Self {
            script,
            initialized: false,
        }
    }
}

/// Detach `owner`'s instance, run `f` on its script with a fresh context,
/// then reattach. A missing instance is a no-op. If the hook itself
/// installed a replacement instance, the replacement wins.
pub(crate) fn run_hook<F>(
    world: &mut World,
    outbox: &mut Outbox,
    input: &Intent,
    config: &SimConfig,
    owner: Entity,
    f: F,
) where
    F: FnOnce(&mut dyn Script, &mut ScriptCtx<'_>),
{
    let Some(mut instance) = world.instances.remove(owner) else {
        return;
    };
    {
        let mut ctx = ScriptCtx {
            world,
            outbox,
            input,
            config,
            owner,
        };
        f(instance.script.as_mut(), &mut ctx);
    }
    if world.is_alive(owner) && !world.instances.contains(owner) {
        world.instances.insert(owner, instance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Velocity;

    /// Script that records which hooks fired.
    struct Recorder {
        updates: u32,
        hurts: u32,
    }

    impl Script for Recorder {
        fn on_update(&mut self, ctx: &mut ScriptCtx<'_>, _dt: f32) {
            self.updates += 1;
            // Hooks may freely mutate the world, including the owner
            ctx.world.velocities.insert(ctx.owner, Velocity::new(1.0, 0.0));
        }

        fn on_hurt(&mut self, _ctx: &mut ScriptCtx<'_>, _attacker: Entity) {
            self.hurts += 1;
        }
    }

    #[test]
    fn test_hook_runs_and_reattaches() {
        let mut world = World::new();
        let mut outbox = Outbox::new();
        let input = Intent::idle();
        let config = SimConfig::default();

        let e = world.spawn();
        world.instances.insert(
            e,
            Instance::new(Box::new(Recorder {
                updates: 0,
                hurts: 0,
            })),
        );

        run_hook(&mut world, &mut outbox, &input, &config, e, |script, ctx| {
            script.on_update(ctx, 0.016)
        });

        // Instance survived its own hook and the world mutation landed
        assert!(world.instances.contains(e));
        assert!(world.velocities.contains(e));
    }

    #[test]
    fn test_missing_instance_is_noop() {
        let mut world = World::new();
        let mut outbox = Outbox::new();
        let input = Intent::idle();
        let config = SimConfig::default();

        let e = world.spawn();
        // No instance attached: nothing happens, nothing panics
        run_hook(&mut world, &mut outbox, &input, &config, e, |script, ctx| {
            script.on_update(ctx, 0.016)
        });
        assert!(!world.instances.contains(e));
    }

    #[test]
    fn test_default_hooks_are_noops() {
        struct Empty;
        impl Script for Empty {}

        let mut world = World::new();
        let mut outbox = Outbox::new();
        let input = Intent::idle();
        let config = SimConfig::default();

        let e = world.spawn();
        world.instances.insert(e, Instance::new(Box::new(Empty)));

        run_hook(&mut world, &mut outbox, &input, &config, e, |script, ctx| {
            script.on_hurt(ctx, Entity::NULL);
            script.on_die(ctx);
        });
        assert!(world.instances.contains(e));
    }
}
