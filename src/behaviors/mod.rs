//! Concrete Behaviors
//!
//! Every creature and trigger in the game is one [`Script`] built on the
//! generic state machine from the `fsm` module. Behaviors own their
//! machine, build it lazily in `on_init` (the first point a context is
//! available) and forward the relevant script hooks into it as events.

pub mod boss;
pub mod jumper;
pub mod player;
pub mod trigger;
pub mod walker;

pub use boss::{BossScript, BossTuning};
pub use jumper::JumperScript;
pub use player::PlayerScript;
pub use trigger::{CollectibleScript, PortalScript};
pub use walker::WalkerScript;

use std::fmt::Debug;
use std::marker::PhantomData;

use glam::Vec2;

use super::fsm::State;
use super::script::ScriptCtx;
use super::timer::Countdown;

/// Size of the owner's rigid hull, read back from its collider so states
/// never hard-code body dimensions.
pub(crate) fn body_hull_size(ctx: &ScriptCtx<'_>) -> Option<Vec2> {
    ctx.world
        .colliders
        .iter()
        .find(|(entity, collider)| {
            collider.parent == ctx.owner && ctx.world.rigids.contains(*entity)
        })
        .map(|(_, collider)| collider.size)
}

/// Retire every hitbox volume owned by the owner. Dying bodies must stop
/// dealing contact damage immediately.
pub(crate) fn despawn_owned_hitboxes(ctx: &mut ScriptCtx<'_>) {
    let owned: Vec<_> = ctx
        .world
        .colliders
        .iter()
        .filter(|(entity, collider)| {
            collider.parent == ctx.owner && ctx.world.hitboxes.contains(*entity)
        })
        .map(|(entity, _)| entity)
        .collect();
    for entity in owned {
        ctx.world.mark_despawn(entity);
    }
}

/// Shared terminal state: play a death cue, stop moving, linger for the
/// death animation, then despawn the owner.
pub(crate) struct DieState<K> {
    cue: &'static str,
    fade: Countdown,
    _key: PhantomData<K>,
}

impl<K> DieState<K> {
    pub(crate) fn new(cue: &'static str, linger: f32) -> Self {
        Self {
            cue,
            fade: Countdown::new(linger),
            _key: PhantomData,
        }
    }
}

impl<K: Copy + Eq + Debug> State<K> for DieState<K> {
    fn enter(&mut self, ctx: &mut ScriptCtx<'_>) {
        self.fade.reset();
        if let Some(velocity) = ctx.world.velocities.get_mut(ctx.owner) {
            velocity.0.x = 0.0;
        }
        despawn_owned_hitboxes(ctx);
        ctx.outbox.play(self.cue);
    }

    fn update(&mut self, ctx: &mut ScriptCtx<'_>, dt: f32) -> Option<K> {
        if self.fade.tick(dt) {
            ctx.world.mark_despawn(ctx.owner);
        }
        None
    }
}

/// A state with no callbacks at all; terminal resting point for one-shot
/// machines.
pub(crate) struct Inert;

impl<K: Copy + Eq + Debug> State<K> for Inert {}
