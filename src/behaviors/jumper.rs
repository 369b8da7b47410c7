//! Jumper - a hopping enemy
//!
//! Rests on the ground between hops, then launches upward; lands when the
//! collision pass grounds it again.

use super::super::entity::Entity;
use super::super::fsm::{State, StateMachine};
use super::super::script::{Script, ScriptCtx};
use super::super::timer::Countdown;
use super::DieState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumperState {
    Idle,
    Jumping,
    Die,
}

struct IdleState {
    wait: Countdown,
}

impl State<JumperState> for IdleState {
    fn enter(&mut self, ctx: &mut ScriptCtx<'_>) {
        self.wait.reset();
        if let Some(velocity) = ctx.world.velocities.get_mut(ctx.owner) {
            velocity.0.x = 0.0;
        }
    }

    fn update(&mut self, _ctx: &mut ScriptCtx<'_>, dt: f32) -> Option<JumperState> {
        if self.wait.tick(dt) {
            Some(JumperState::Jumping)
        } else {
            None
        }
    }
}

struct JumpingState {
    impulse: f32,
}

impl State<JumperState> for JumpingState {
    fn enter(&mut self, ctx: &mut ScriptCtx<'_>) {
        if let Some(velocity) = ctx.world.velocities.get_mut(ctx.owner) {
            velocity.0.y = -self.impulse;
        }
        ctx.outbox.play("jumper-hop");
    }

    fn update(&mut self, ctx: &mut ScriptCtx<'_>, _dt: f32) -> Option<JumperState> {
        // Back to rest once the collision pass grounds us again
        if ctx.owner_grounded() {
            Some(JumperState::Idle)
        } else {
            None
        }
    }
}

pub struct JumperScript {
    impulse: f32,
    rest_time: f32,
    machine: Option<StateMachine<JumperState>>,
}

impl JumperScript {
    pub fn new(impulse: f32, rest_time: f32) -> Self {
        Self {
            impulse,
            rest_time,
            machine: None,
        }
    }
}

impl Script for JumperScript {
    fn on_init(&mut self, ctx: &mut ScriptCtx<'_>) {
        let states: Vec<(JumperState, Box<dyn State<JumperState>>)> = vec![
            (
                JumperState::Idle,
                Box::new(IdleState {
                    wait: Countdown::new(self.rest_time),
                }),
            ),
            (
                JumperState::Jumping,
                Box::new(JumpingState {
                    impulse: self.impulse,
                }),
            ),
            (JumperState::Die, Box::new(DieState::new("enemy-die", 0.6))),
        ];
        self.machine = Some(StateMachine::new(states, JumperState::Idle, ctx));
    }

    fn on_update(&mut self, ctx: &mut ScriptCtx<'_>, dt: f32) {
        if let Some(machine) = &mut self.machine {
            machine.update(ctx, dt);
        }
    }

    fn on_hurt(&mut self, ctx: &mut ScriptCtx<'_>, _attacker: Entity) {
        ctx.outbox.play("enemy-hurt");
    }

    fn on_die(&mut self, ctx: &mut ScriptCtx<'_>) {
        if let Some(machine) = &mut self.machine {
            machine.transition(JumperState::Die, ctx);
        }
    }
}
