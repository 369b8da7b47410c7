//! Generic Finite State Machine
//!
//! One state machine, reused uninstantiated by every concrete behavior: a
//! multi-phase boss, a jumping enemy, a one-shot trigger all build on the
//! same enter/exit ordering and self-transition guard. The machine is
//! parameterized over a closed, caller-defined set of state keys (an enum
//! per behavior); each state declares optional `enter`, `update`, `exit`
//! and `handle_event`.
//!
//! Contract:
//! - exactly one state is current at all times; the initial state's
//!   `enter` fires at construction
//! - `transition(to)` with `to == current` is a no-op, preventing
//!   enter/exit thrash when policy code re-requests the same state every
//!   tick
//! - otherwise `exit` on the old state runs, then `enter` on the new,
//!   synchronously, before `transition` returns
//! - a transition to a key that was never registered is a fatal
//!   programming error

use std::fmt::Debug;

use super::entity::Entity;
use super::script::{Contact, ScriptCtx};

/// Events forwarded from script hooks into a behavior's state machine.
#[derive(Debug, Clone, Copy)]
pub enum StateEvent {
    Hurt { attacker: Entity },
    Hit { victim: Entity },
    Collision { other: Entity, contact: Contact },
    Died,
}

/// One named state of a behavior. All callbacks are optional; `update`
/// and `handle_event` may request a transition by returning the next key.
pub trait State<K: Copy + Eq + Debug> {
    fn enter(&mut self, _ctx: &mut ScriptCtx<'_>) {}
    fn update(&mut self, _ctx: &mut ScriptCtx<'_>, _dt: f32) -> Option<K> {
        None
    }
    fn exit(&mut self, _ctx: &mut ScriptCtx<'_>) {}
    fn handle_event(&mut self, _ctx: &mut ScriptCtx<'_>, _event: &StateEvent) -> Option<K> {
        None
    }
}

/// A machine over a fixed set of keyed states.
pub struct StateMachine<K: Copy + Eq + Debug> {
    states: Vec<(K, Box<dyn State<K>>)>,
    current: usize,
}

impl<K: Copy + Eq + Debug> StateMachine<K> {
    /// Build a machine and synchronously fire the initial state's `enter`.
    pub fn new(
        states: Vec<(K, Box<dyn State<K>>)>,
        initial: K,
        ctx: &mut ScriptCtx<'_>,
    ) -> Self {
        let mut machine = Self { states, current: 0 };
        machine.current = machine.index_of(initial);
        machine.states[machine.current].1.enter(ctx);
        machine
    }

    fn index_of(&self, key: K) -> usize {
        self.states
            .iter()
            .position(|(k, _)| *k == key)
            // Unregistered state key: corrupted behavior logic, cannot continue
            .unwrap_or_else(|| panic!("unrecognized state {:?} in dispatch", key))
    }

    /// The key of the current state.
    pub fn current(&self) -> K {
        self.states[self.current].0
    }

    /// Switch states. Self-transitions are guarded no-ops; otherwise the
    /// old state's `exit` and the new state's `enter` run before return.
    pub fn transition(&mut self, to: K, ctx: &mut ScriptCtx<'_>) {
        if to == self.current() {
            return;
        }
        let next = self.index_of(to);
        self.states[self.current].1.exit(ctx);
        self.current = next;
        self.states[self.current].1.enter(ctx);
    }

    /// Dispatch `update` to the current state only, applying any requested
    /// transition afterwards.
    pub fn update(&mut self, ctx: &mut ScriptCtx<'_>, dt: f32) {
        if let Some(next) = self.states[self.current].1.update(ctx, dt) {
            self.transition(next, ctx);
        }
    }

    /// Dispatch an event to the current state only.
    pub fn handle_event(&mut self, ctx: &mut ScriptCtx<'_>, event: &StateEvent) {
        if let Some(next) = self.states[self.current].1.handle_event(ctx, event) {
            self.transition(next, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::input::Intent;
    use crate::outbox::Outbox;
    use crate::world::World;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Key {
        A,
        B,
        Unregistered,
    }

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct Tracked {
        name: &'static str,
        log: Log,
        next: Option<Key>,
    }

    impl State<Key> for Tracked {
        fn enter(&mut self, _ctx: &mut ScriptCtx<'_>) {
            self.log.borrow_mut().push(match self.name {
                "a" => "enter a",
                _ => "enter b",
            });
        }
        fn update(&mut self, _ctx: &mut ScriptCtx<'_>, _dt: f32) -> Option<Key> {
            self.log.borrow_mut().push(match self.name {
                "a" => "update a",
                _ => "update b",
            });
            self.next
        }
        fn exit(&mut self, _ctx: &mut ScriptCtx<'_>) {
            self.log.borrow_mut().push(match self.name {
                "a" => "exit a",
                _ => "exit b",
            });
        }
    }

    fn machine(log: &Log, a_next: Option<Key>) -> (World, Outbox, SimConfig, StateMachine<Key>) {
        let mut world = World::new();
        let mut outbox = Outbox::new();
        let config = SimConfig::default();
        let input = Intent::idle();
        let owner = world.spawn();

        let states: Vec<(Key, Box<dyn State<Key>>)> = vec![
            (
                Key::A,
                Box::new(Tracked {
                    name: "a",
                    log: log.clone(),
                    next: a_next,
                }),
            ),
            (
                Key::B,
                Box::new(Tracked {
                    name: "b",
                    log: log.clone(),
                    next: None,
                }),
            ),
        ];
        let m = {
            let mut ctx = ScriptCtx {
                world: &mut world,
                outbox: &mut outbox,
                input: &input,
                config: &config,
                owner,
            };
            StateMachine::new(states, Key::A, &mut ctx)
        };
        (world, outbox, config, m)
    }

    fn with_ctx<R>(
        world: &mut World,
        outbox: &mut Outbox,
        config: &SimConfig,
        f: impl FnOnce(&mut ScriptCtx<'_>) -> R,
    ) -> R {
        let input = Intent::idle();
        let owner = crate::entity::Entity::NULL;
        let mut ctx = ScriptCtx {
            world,
            outbox,
            input: &input,
            config,
            owner,
        };
        f(&mut ctx)
    }

    #[test]
    fn test_initial_enter_fires_at_construction() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let (_, _, _, m) = machine(&log, None);
        assert_eq!(*log.borrow(), vec!["enter a"]);
        assert_eq!(m.current(), Key::A);
    }

    #[test]
    fn test_self_transition_is_guarded() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let (mut world, mut outbox, config, mut m) = machine(&log, None);

        with_ctx(&mut world, &mut outbox, &config, |ctx| {
            m.transition(Key::A, ctx);
        });
        // No exit/enter thrash
        assert_eq!(*log.borrow(), vec!["enter a"]);
    }

    #[test]
    fn test_transition_runs_exit_then_enter() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let (mut world, mut outbox, config, mut m) = machine(&log, None);

        with_ctx(&mut world, &mut outbox, &config, |ctx| {
            m.transition(Key::B, ctx);
        });
        assert_eq!(*log.borrow(), vec!["enter a", "exit a", "enter b"]);
        assert_eq!(m.current(), Key::B);
    }

    #[test]
    fn test_update_dispatches_to_current_only_and_applies_transition() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let (mut world, mut outbox, config, mut m) = machine(&log, Some(Key::B));

        with_ctx(&mut world, &mut outbox, &config, |ctx| {
            m.update(ctx, 0.016);
            m.update(ctx, 0.016);
        });
        assert_eq!(
            *log.borrow(),
            vec!["enter a", "update a", "exit a", "enter b", "update b"]
        );
    }

    #[test]
    #[should_panic(expected = "unrecognized state")]
    fn test_unregistered_key_is_fatal() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let (mut world, mut outbox, config, mut m) = machine(&log, None);

        with_ctx(&mut world, &mut outbox, &config, |ctx| {
            m.transition(Key::Unregistered, ctx);
        });
    }
}
