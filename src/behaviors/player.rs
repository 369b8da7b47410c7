//! Player Avatar
//!
//! Unlike the enemies the player is not a state machine - it answers the
//! per-tick input intent directly. Attacking materializes a short-lived
//! hitbox volume in front of the avatar; the swing despawns itself when
//! its window closes.

use glam::Vec2;

use super::super::components::{Collider, Facing, Hitbox};
use super::super::entity::Entity;
use super::super::script::{Script, ScriptCtx};
use super::super::timer::Countdown;
use super::{body_hull_size, despawn_owned_hitboxes};

/// Seconds an attack swing stays live.
const ATTACK_WINDOW: f32 = 0.2;

pub struct PlayerScript {
    /// Live swing hitbox and its remaining window
    attack: Option<(Entity, Countdown)>,
}

impl PlayerScript {
    pub fn new() -> Self {
        Self { attack: None }
    }

    fn begin_attack(&mut self, ctx: &mut ScriptCtx<'_>) {
        let hull = body_hull_size(ctx).unwrap_or(Vec2::new(24.0, 48.0));
        let facing = ctx
            .world
            .facings
            .get(ctx.owner)
            .copied()
            .unwrap_or(Facing::Right);
        let size = Vec2::new(hull.x, hull.y * 0.5);
        let offset_x = match facing {
            Facing::Right => hull.x,
            Facing::Left => -size.x,
        };

        let owner = ctx.owner;
        let damage = ctx.config.player_attack_damage;
        let swing = ctx.world.spawn();
        ctx.world.colliders.insert(
            swing,
            Collider::new(owner, Vec2::new(offset_x, hull.y * 0.2), size),
        );
        ctx.world.hitboxes.insert(swing, Hitbox { damage });
        ctx.outbox.play("player-swing");

        self.attack = Some((swing, Countdown::new(ATTACK_WINDOW)));
    }
}

impl Default for PlayerScript {
    fn default() -> Self {
        Self::new()
    }
}

impl Script for PlayerScript {
    fn on_update(&mut self, ctx: &mut ScriptCtx<'_>, dt: f32) {
        let grounded = ctx.owner_grounded();
        let owner = ctx.owner;

        if let Some(velocity) = ctx.world.velocities.get_mut(owner) {
            velocity.0.x = ctx.input.move_x * ctx.config.player_speed;

            if ctx.input.jump_pressed && grounded {
                velocity.0.y = -ctx.config.player_jump_speed;
                ctx.outbox.play("player-jump");
            } else if !ctx.input.jump_held && velocity.0.y < 0.0 {
                // Releasing jump while rising shortens the arc
                velocity.0.y *= 0.5;
            }
        }

        // Retire an expired swing before possibly starting a new one
        if let Some((swing, window)) = &mut self.attack {
            if window.tick(dt) {
                let swing = *swing;
                ctx.world.mark_despawn(swing);
                self.attack = None;
            }
        }
        if ctx.input.attack_pressed && self.attack.is_none() {
            self.begin_attack(ctx);
        }
    }

    fn on_hurt(&mut self, ctx: &mut ScriptCtx<'_>, _attacker: Entity) {
        ctx.outbox.play("player-hurt");
    }

    fn on_die(&mut self, ctx: &mut ScriptCtx<'_>) {
        despawn_owned_hitboxes(ctx);
        ctx.outbox.play("player-die");
        ctx.outbox.request_scene("game-over");
        let owner = ctx.owner;
        ctx.world.mark_despawn(owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Grounded, Player, Position, Velocity};
    use crate::config::SimConfig;
    use crate::input::Intent;
    use crate::outbox::Outbox;
    use crate::script::Instance;
    use crate::systems::script_system;
    use crate::world::World;

    fn player_world() -> (World, Entity) {
        let mut world = World::new();
        let e = world.spawn();
        world.positions.insert(e, Position(Vec2::ZERO));
        world.velocities.insert(e, Velocity::default());
        world.players.insert(e, Player);
        world
            .instances
            .insert(e, Instance::new(Box::new(PlayerScript::new())));
        (world, e)
    }

    #[test]
    fn test_moves_at_configured_speed() {
        let (mut world, e) = player_world();
        let mut outbox = Outbox::new();
        let config = SimConfig::default();
        let input = Intent {
            move_x: -1.0,
            ..Intent::idle()
        };

        script_system(&mut world, &mut outbox, &input, &config, 0.016);
        assert_eq!(world.velocities.get(e).unwrap().0.x, -config.player_speed);
    }

    #[test]
    fn test_jumps_only_from_ground() {
        let (mut world, e) = player_world();
        let mut outbox = Outbox::new();
        let config = SimConfig::default();
        let input = Intent {
            jump_pressed: true,
            jump_held: true,
            ..Intent::idle()
        };

        // Airborne press: nothing happens
        script_system(&mut world, &mut outbox, &input, &config, 0.016);
        assert_eq!(world.velocities.get(e).unwrap().0.y, 0.0);

        world.grounded.insert(e, Grounded);
        script_system(&mut world, &mut outbox, &input, &config, 0.016);
        assert_eq!(
            world.velocities.get(e).unwrap().0.y,
            -config.player_jump_speed
        );
    }

    #[test]
    fn test_releasing_jump_cuts_the_arc() {
        let (mut world, e) = player_world();
        let mut outbox = Outbox::new();
        let config = SimConfig::default();

        world.velocities.insert(e, Velocity::new(0.0, -400.0));
        script_system(&mut world, &mut outbox, &Intent::idle(), &config, 0.016);
        assert_eq!(world.velocities.get(e).unwrap().0.y, -200.0);
    }

    #[test]
    fn test_attack_spawns_and_retires_a_hitbox() {
        let (mut world, _e) = player_world();
        let mut outbox = Outbox::new();
        let config = SimConfig::default();
        let attack = Intent {
            attack_pressed: true,
            ..Intent::idle()
        };

        script_system(&mut world, &mut outbox, &attack, &config, 0.016);
        assert_eq!(world.hitboxes.count(), 1);

        // Holding attack does not stack swings while one is live
        script_system(&mut world, &mut outbox, &attack, &config, 0.016);
        assert_eq!(world.hitboxes.count(), 1);

        // Window elapses: the swing is marked for the delete sweep
        script_system(&mut world, &mut outbox, &Intent::idle(), &config, 1.0);
        assert_eq!(world.pending_delete.count(), 1);
    }

    #[test]
    fn test_death_requests_game_over() {
        let (mut world, e) = player_world();
        let mut outbox = Outbox::new();
        let config = SimConfig::default();
        let input = Intent::idle();

        crate::script::run_hook(&mut world, &mut outbox, &input, &config, e, |script, ctx| {
            script.on_die(ctx)
        });

        let scenes: Vec<_> = outbox.scenes.drain().map(|r| r.scene).collect();
        assert_eq!(scenes, vec!["game-over"]);
        assert!(world.pending_delete.contains(e));
    }
}
