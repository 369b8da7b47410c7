//! Per-Tick Systems
//!
//! Each system reads the world globally but writes only the components
//! and buffers it logically owns. The fixed order per tick is:
//! script -> movement -> collision -> rigid-resolution -> damage ->
//! animation -> delete-sweep. The `sim` module drives that order; nothing
//! here may assume any other.

use tracing::debug;

use super::collision::ContactBuffers;
use super::components::{Facing, Grounded};
use super::config::SimConfig;
use super::input::Intent;
use super::outbox::Outbox;
use super::script::{run_hook, Contact, ContactLayer};
use super::world::World;

/// Invoke `on_init` (first tick only) and `on_update` on every
/// script-bearing entity, in entity-iteration order.
pub fn script_system(
    world: &mut World,
    outbox: &mut Outbox,
    input: &Intent,
    config: &SimConfig,
    dt: f32,
) {
    for owner in world.instances.entities() {
        if !world.is_alive(owner) {
            continue;
        }
        let needs_init = world
            .instances
            .get(owner)
            .map(|i| !i.initialized)
            .unwrap_or(false);
        if needs_init {
            if let Some(instance) = world.instances.get_mut(owner) {
                instance.initialized = true;
            }
            run_hook(world, outbox, input, config, owner, |script, ctx| {
                script.on_init(ctx)
            });
        }
        run_hook(world, outbox, input, config, owner, |script, ctx| {
            script.on_update(ctx, dt)
        });
    }
}

/// Integrate gravity into velocities and velocities into positions, and
/// keep Facing in sync with horizontal motion.
pub fn movement_system(world: &mut World, config: &SimConfig, dt: f32) {
    for owner in world.velocities.entities() {
        let grounded = world.grounded.contains(owner);
        let Some(velocity) = world.velocities.get_mut(owner) else {
            continue;
        };
        // Gravity accumulates into velocity, capped at terminal speed
        // (y grows downward, so falling is +y).
        if !grounded {
            velocity.0.y = (velocity.0.y + config.gravity * dt).min(config.terminal_velocity);
        }
        let v = velocity.0;

        if let Some(facing) = Facing::from_vx(v.x) {
            if world.facings.contains(owner) {
                world.facings.insert(owner, facing);
            }
        }
        if let Some(position) = world.positions.get_mut(owner) {
            position.0 += v * dt;
        }
    }
}

/// Consume the rigid buffer: push movers out of obstacles, tag Grounded
/// where a body was pushed up out of a floor, and fire collision hooks
/// on both sides.
pub fn rigid_resolution_system(
    world: &mut World,
    outbox: &mut Outbox,
    input: &Intent,
    config: &SimConfig,
    buffers: &ContactBuffers,
) {
    for contact in &buffers.rigid {
        if contact.resolve {
            if let Some(position) = world.positions.get_mut(contact.mover) {
                position.0 -= contact.mtv;
            }
            // Pushed upward out of a floor: resting contact. Clamp the
            // downward speed to a small value instead of zero so the body
            // keeps settling against the surface without re-penetrating.
            if contact.mtv.y > 0.0 {
                world.grounded.insert(contact.mover, Grounded);
                if let Some(velocity) = world.velocities.get_mut(contact.mover) {
                    if velocity.0.y > config.resting_velocity {
                        velocity.0.y = config.resting_velocity;
                    }
                }
            }
        }

        let hook = Contact {
            layer: ContactLayer::Rigid,
            mtv: contact.mtv,
        };
        let (mover, obstacle) = (contact.mover, contact.obstacle);
        run_hook(world, outbox, input, config, mover, |script, ctx| {
            script.on_collision(ctx, obstacle, hook)
        });
        let flipped = Contact {
            layer: ContactLayer::Rigid,
            mtv: -contact.mtv,
        };
        run_hook(world, outbox, input, config, obstacle, |script, ctx| {
            script.on_collision(ctx, mover, flipped)
        });
    }

    // Trigger firings ride the same resolution stage: the trigger owner's
    // script decides what firing means (portal, pickup, ...).
    for hit in &buffers.trigger {
        let hook = Contact {
            layer: ContactLayer::Trigger,
            mtv: glam::Vec2::ZERO,
        };
        let player = hit.player;
        run_hook(world, outbox, input, config, hit.owner, |script, ctx| {
            script.on_collision(ctx, player, hook)
        });
    }
}

/// Consume the damage buffer: apply hits gated by the victim's
/// invulnerability window and fire on_hurt/on_hit/on_die.
pub fn damage_system(
    world: &mut World,
    outbox: &mut Outbox,
    input: &Intent,
    config: &SimConfig,
    buffers: &ContactBuffers,
    dt: f32,
) {
    for pair in &buffers.damage {
        let Some(health) = world.healths.get_mut(pair.victim) else {
            continue;
        };
        // Post-mortem hits do nothing; on_die already fired.
        if health.is_dead() {
            continue;
        }
        if health.is_invulnerable() {
            health.invuln_remaining -= dt;
            continue;
        }

        health.current -= pair.damage;
        health.invuln_remaining = health.invuln_duration;
        let died = health.is_dead();
        debug!(victim = %pair.victim, attacker = %pair.attacker, damage = pair.damage, died, "hit landed");

        let (attacker, victim) = (pair.attacker, pair.victim);
        run_hook(world, outbox, input, config, victim, |script, ctx| {
            script.on_hurt(ctx, attacker)
        });
        run_hook(world, outbox, input, config, attacker, |script, ctx| {
            script.on_hit(ctx, victim)
        });
        if died {
            run_hook(world, outbox, input, config, victim, |script, ctx| {
                script.on_die(ctx)
            });
        }
    }
}

/// Advance animation clocks and write the resulting frame indices into
/// sprites.
pub fn animation_system(world: &mut World, dt: f32) {
    let World {
        animations,
        sprites,
        ..
    } = world;

    for (entity, anim) in animations.iter_mut() {
        if anim.frame_count == 0 || anim.frame_time <= 0.0 {
            continue;
        }
        if !anim.finished {
            anim.elapsed += dt;
        }

        let mut frame = (anim.elapsed / anim.frame_time) as u32;
        if anim.looping {
            frame %= anim.frame_count;
        } else if frame >= anim.frame_count {
            frame = anim.frame_count - 1;
            anim.finished = true;
        }

        if let Some(sprite) = sprites.get_mut(entity) {
            sprite.frame = anim.first_frame + frame;
        }
    }
}
