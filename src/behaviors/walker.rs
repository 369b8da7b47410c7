//! Walker - a patrolling ground enemy
//!
//! Paces horizontally, turning around at its patrol bounds and when it
//! walks into a wall. Deals contact damage through a hitbox volume the
//! factory attaches; dying retires that volume before the body lingers
//! through its death animation.

use super::super::fsm::{State, StateEvent, StateMachine};
use super::super::script::{ContactLayer, Script, ScriptCtx};
use super::super::entity::Entity;
use super::DieState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerState {
    Walk,
    Die,
}

struct WalkState {
    speed: f32,
    patrol: Option<(f32, f32)>,
    /// Current direction sign, -1 or +1
    dir: f32,
}

impl State<WalkerState> for WalkState {
    fn enter(&mut self, ctx: &mut ScriptCtx<'_>) {
        if let Some(velocity) = ctx.world.velocities.get_mut(ctx.owner) {
            velocity.0.x = self.speed * self.dir;
        }
    }

    fn update(&mut self, ctx: &mut ScriptCtx<'_>, _dt: f32) -> Option<WalkerState> {
        if let Some(own) = ctx.owner_position() {
            if let Some((min, max)) = self.patrol {
                if self.dir > 0.0 && own.x >= max {
                    self.dir = -1.0;
                } else if self.dir < 0.0 && own.x <= min {
                    self.dir = 1.0;
                }
            }
        }
        if let Some(velocity) = ctx.world.velocities.get_mut(ctx.owner) {
            velocity.0.x = self.speed * self.dir;
        }
        None
    }

    fn handle_event(
        &mut self,
        _ctx: &mut ScriptCtx<'_>,
        event: &StateEvent,
    ) -> Option<WalkerState> {
        // Walked into a wall: turn around
        if let StateEvent::Collision { contact, .. } = event {
            if contact.layer == ContactLayer::Rigid && contact.mtv.x != 0.0 {
                self.dir = -self.dir;
            }
        }
        None
    }
}

pub struct WalkerScript {
    speed: f32,
    patrol: Option<(f32, f32)>,
    machine: Option<StateMachine<WalkerState>>,
}

impl WalkerScript {
    pub fn new(speed: f32, patrol: Option<(f32, f32)>) -> Self {
        Self {
            speed,
            patrol,
            machine: None,
        }
    }
}

impl Script for WalkerScript {
    fn on_init(&mut self, ctx: &mut ScriptCtx<'_>) {
        let states: Vec<(WalkerState, Box<dyn State<WalkerState>>)> = vec![
            (
                WalkerState::Walk,
                Box::new(WalkState {
                    speed: self.speed,
                    patrol: self.patrol,
                    dir: 1.0,
                }),
            ),
            (WalkerState::Die, Box::new(DieState::new("enemy-die", 0.6))),
        ];
        self.machine = Some(StateMachine::new(states, WalkerState::Walk, ctx));
    }

    fn on_update(&mut self, ctx: &mut ScriptCtx<'_>, dt: f32) {
        if let Some(machine) = &mut self.machine {
            machine.update(ctx, dt);
        }
    }

    fn on_collision(
        &mut self,
        ctx: &mut ScriptCtx<'_>,
        other: Entity,
        contact: super::super::script::Contact,
    ) {
        if let Some(machine) = &mut self.machine {
            machine.handle_event(ctx, &StateEvent::Collision { other, contact });
        }
    }

    fn on_hurt(&mut self, ctx: &mut ScriptCtx<'_>, _attacker: Entity) {
        ctx.outbox.play("enemy-hurt");
    }

    fn on_die(&mut self, ctx: &mut ScriptCtx<'_>) {
        if let Some(machine) = &mut self.machine {
            machine.transition(WalkerState::Die, ctx);
        }
    }
}
