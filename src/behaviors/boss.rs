//! Boss - a multi-phase fight
//!
//! idle -> alert -> targeting -> prepare -> attack -> cooldown -> idle,
//! plus a terminal die phase. The attack phase materializes a transient
//! hitbox collider in front of the boss and retires it on exit, so the
//! swing can only damage while the phase is live.

use glam::Vec2;

use super::super::components::{Collider, Facing, Hitbox};
use super::super::entity::Entity;
use super::super::fsm::{State, StateMachine};
use super::super::script::{Script, ScriptCtx};
use super::super::timer::Countdown;
use super::{body_hull_size, DieState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossState {
    Idle,
    Alert,
    Targeting,
    Prepare,
    Attack,
    Cooldown,
    Die,
}

/// Tuning knobs for one boss instance.
#[derive(Debug, Clone, Copy)]
pub struct BossTuning {
    /// Player distance that wakes the boss
    pub aggro_range: f32,
    /// Horizontal distance at which it stops chasing and winds up
    pub attack_range: f32,
    pub move_speed: f32,
    pub roar_time: f32,
    pub telegraph_time: f32,
    pub attack_time: f32,
    pub cooldown_time: f32,
    pub attack_damage: i32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            aggro_range: 320.0,
            attack_range: 72.0,
            move_speed: 120.0,
            roar_time: 0.8,
            telegraph_time: 0.5,
            attack_time: 0.35,
            cooldown_time: 1.2,
            attack_damage: 2,
        }
    }
}

struct IdleState {
    aggro_range: f32,
}

impl State<BossState> for IdleState {
    fn enter(&mut self, ctx: &mut ScriptCtx<'_>) {
        if let Some(velocity) = ctx.world.velocities.get_mut(ctx.owner) {
            velocity.0.x = 0.0;
        }
    }

    fn update(&mut self, ctx: &mut ScriptCtx<'_>, _dt: f32) -> Option<BossState> {
        match ctx.horizontal_distance_to_player() {
            Some(distance) if distance <= self.aggro_range => Some(BossState::Alert),
            _ => None,
        }
    }
}

struct AlertState {
    roar: Countdown,
}

impl State<BossState> for AlertState {
    fn enter(&mut self, ctx: &mut ScriptCtx<'_>) {
        self.roar.reset();
        ctx.outbox.play("boss-roar");
    }

    fn update(&mut self, _ctx: &mut ScriptCtx<'_>, dt: f32) -> Option<BossState> {
        if self.roar.tick(dt) {
            Some(BossState::Targeting)
        } else {
            None
        }
    }
}

struct TargetingState {
    move_speed: f32,
    attack_range: f32,
}

impl State<BossState> for TargetingState {
    fn update(&mut self, ctx: &mut ScriptCtx<'_>, _dt: f32) -> Option<BossState> {
        let (Some(own), Some(player)) = (ctx.owner_position(), ctx.player_position()) else {
            // Player gone: stand down
            return Some(BossState::Idle);
        };
        let dx = player.x - own.x;
        if dx.abs() <= self.attack_range {
            return Some(BossState::Prepare);
        }
        if let Some(velocity) = ctx.world.velocities.get_mut(ctx.owner) {
            velocity.0.x = self.move_speed * dx.signum();
        }
        None
    }

    fn exit(&mut self, ctx: &mut ScriptCtx<'_>) {
        if let Some(velocity) = ctx.world.velocities.get_mut(ctx.owner) {
            velocity.0.x = 0.0;
        }
    }
}

struct PrepareState {
    telegraph: Countdown,
}

impl State<BossState> for PrepareState {
    fn enter(&mut self, ctx: &mut ScriptCtx<'_>) {
        self.telegraph.reset();
        ctx.outbox.play("boss-telegraph");
    }

    fn update(&mut self, _ctx: &mut ScriptCtx<'_>, dt: f32) -> Option<BossState> {
        if self.telegraph.tick(dt) {
            Some(BossState::Attack)
        } else {
            None
        }
    }
}

struct AttackState {
    damage: i32,
    active: Countdown,
    hitbox: Option<Entity>,
}

impl State<BossState> for AttackState {
    fn enter(&mut self, ctx: &mut ScriptCtx<'_>) {
        self.active.reset();
        ctx.outbox.play("boss-slam");

        // Swing volume in front of the boss, sized from its own hull
        let hull = body_hull_size(ctx).unwrap_or(Vec2::new(96.0, 96.0));
        let facing = ctx
            .world
            .facings
            .get(ctx.owner)
            .copied()
            .unwrap_or(Facing::Right);
        let width = hull.x * 0.75;
        let offset_x = match facing {
            Facing::Right => hull.x,
            Facing::Left => -width,
        };

        let owner = ctx.owner;
        let hitbox = ctx.world.spawn();
        ctx.world.colliders.insert(
            hitbox,
            Collider::new(owner, Vec2::new(offset_x, hull.y * 0.25), Vec2::new(width, hull.y * 0.5)),
        );
        ctx.world.hitboxes.insert(
            hitbox,
            Hitbox {
                damage: self.damage,
            },
        );
        self.hitbox = Some(hitbox);
    }

    fn update(&mut self, _ctx: &mut ScriptCtx<'_>, dt: f32) -> Option<BossState> {
        if self.active.tick(dt) {
            Some(BossState::Cooldown)
        } else {
            None
        }
    }

    fn exit(&mut self, ctx: &mut ScriptCtx<'_>) {
        if let Some(hitbox) = self.hitbox.take() {
            ctx.world.mark_despawn(hitbox);
        }
    }
}

struct CooldownState {
    rest: Countdown,
}

impl State<BossState> for CooldownState {
    fn enter(&mut self, _ctx: &mut ScriptCtx<'_>) {
        self.rest.reset();
    }

    fn update(&mut self, _ctx: &mut ScriptCtx<'_>, dt: f32) -> Option<BossState> {
        if self.rest.tick(dt) {
            Some(BossState::Idle)
        } else {
            None
        }
    }
}

pub struct BossScript {
    tuning: BossTuning,
    machine: Option<StateMachine<BossState>>,
}

impl BossScript {
    pub fn new(tuning: BossTuning) -> Self {
        Self {
            tuning,
            machine: None,
        }
    }

    /// Current phase, exposed for tests and debug overlays.
    pub fn phase(&self) -> Option<BossState> {
        self.machine.as_ref().map(|m| m.current())
    }
}

impl Script for BossScript {
    fn on_init(&mut self, ctx: &mut ScriptCtx<'_>) {
        let t = self.tuning;
        let states: Vec<(BossState, Box<dyn State<BossState>>)> = vec![
            (
                BossState::Idle,
                Box::new(IdleState {
                    aggro_range: t.aggro_range,
                }),
            ),
            (
                BossState::Alert,
                Box::new(AlertState {
                    roar: Countdown::new(t.roar_time),
                }),
            ),
            (
                BossState::Targeting,
                Box::new(TargetingState {
                    move_speed: t.move_speed,
                    attack_range: t.attack_range,
                }),
            ),
            (
                BossState::Prepare,
                Box::new(PrepareState {
                    telegraph: Countdown::new(t.telegraph_time),
                }),
            ),
            (
                BossState::Attack,
                Box::new(AttackState {
                    damage: t.attack_damage,
                    active: Countdown::new(t.attack_time),
                    hitbox: None,
                }),
            ),
            (
                BossState::Cooldown,
                Box::new(CooldownState {
                    rest: Countdown::new(t.cooldown_time),
                }),
            ),
            (BossState::Die, Box::new(DieState::new("boss-die", 1.5))),
        ];
        self.machine = Some(StateMachine::new(states, BossState::Idle, ctx));
    }

    fn on_update(&mut self, ctx: &mut ScriptCtx<'_>, dt: f32) {
        if let Some(machine) = &mut self.machine {
            machine.update(ctx, dt);
        }
    }

    fn on_hurt(&mut self, ctx: &mut ScriptCtx<'_>, _attacker: Entity) {
        ctx.outbox.play("boss-hurt");
    }

    fn on_die(&mut self, ctx: &mut ScriptCtx<'_>) {
        if let Some(machine) = &mut self.machine {
            machine.transition(BossState::Die, ctx);
        }
    }
}
