//! Trigger Objects
//!
//! Portals and collectibles are bodies with a trigger collider and a
//! one-shot machine: armed until the player overlaps them, then fired
//! forever. Firing while already fired is impossible because the fired
//! state ignores every event.

use super::super::entity::Entity;
use super::super::fsm::{State, StateEvent, StateMachine};
use super::super::script::{Contact, ContactLayer, Script, ScriptCtx};
use super::Inert;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Armed,
    Fired,
}

fn trigger_fired(event: &StateEvent) -> Option<Entity> {
    match event {
        StateEvent::Collision { other, contact } if contact.layer == ContactLayer::Trigger => {
            Some(*other)
        }
        _ => None,
    }
}

struct ArmedPortal {
    destination: String,
}

impl State<TriggerState> for ArmedPortal {
    fn handle_event(
        &mut self,
        ctx: &mut ScriptCtx<'_>,
        event: &StateEvent,
    ) -> Option<TriggerState> {
        trigger_fired(event)?;
        ctx.outbox.play("portal");
        ctx.outbox.request_scene(&self.destination);
        let owner = ctx.owner;
        ctx.world.mark_despawn(owner);
        Some(TriggerState::Fired)
    }
}

struct ArmedCollectible {
    heal: i32,
}

impl State<TriggerState> for ArmedCollectible {
    fn handle_event(
        &mut self,
        ctx: &mut ScriptCtx<'_>,
        event: &StateEvent,
    ) -> Option<TriggerState> {
        let toucher = trigger_fired(event)?;
        if let Some(health) = ctx.world.healths.get_mut(toucher) {
            health.heal(self.heal);
        }
        ctx.outbox.play("pickup");
        let owner = ctx.owner;
        ctx.world.mark_despawn(owner);
        Some(TriggerState::Fired)
    }
}

fn one_shot(armed: Box<dyn State<TriggerState>>, ctx: &mut ScriptCtx<'_>) -> StateMachine<TriggerState> {
    StateMachine::new(
        vec![
            (TriggerState::Armed, armed),
            (TriggerState::Fired, Box::new(Inert)),
        ],
        TriggerState::Armed,
        ctx,
    )
}

/// Teleports the player to another scene on touch.
pub struct PortalScript {
    destination: String,
    machine: Option<StateMachine<TriggerState>>,
}

impl PortalScript {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            machine: None,
        }
    }
}

impl Script for PortalScript {
    fn on_init(&mut self, ctx: &mut ScriptCtx<'_>) {
        let armed = Box::new(ArmedPortal {
            destination: self.destination.clone(),
        });
        self.machine = Some(one_shot(armed, ctx));
    }

    fn on_collision(&mut self, ctx: &mut ScriptCtx<'_>, other: Entity, contact: Contact) {
        if let Some(machine) = &mut self.machine {
            machine.handle_event(ctx, &StateEvent::Collision { other, contact });
        }
    }
}

/// Heals the toucher and despawns itself.
pub struct CollectibleScript {
    heal: i32,
    machine: Option<StateMachine<TriggerState>>,
}

impl CollectibleScript {
    pub fn new(heal: i32) -> Self {
        Self {
            heal,
            machine: None,
        }
    }
}

impl Script for CollectibleScript {
    fn on_init(&mut self, ctx: &mut ScriptCtx<'_>) {
        let armed = Box::new(ArmedCollectible { heal: self.heal });
        self.machine = Some(one_shot(armed, ctx));
    }

    fn on_collision(&mut self, ctx: &mut ScriptCtx<'_>, other: Entity, contact: Contact) {
        if let Some(machine) = &mut self.machine {
            machine.handle_event(ctx, &StateEvent::Collision { other, contact });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Health, Position};
    use crate::config::SimConfig;
    use crate::input::Intent;
    use crate::outbox::Outbox;
    use crate::script::Instance;
    use crate::systems::script_system;
    use crate::world::World;
    use glam::Vec2;

    fn touch(
        world: &mut World,
        outbox: &mut Outbox,
        owner: Entity,
        toucher: Entity,
    ) {
        let input = Intent::idle();
        let config = SimConfig::default();
        crate::script::run_hook(world, outbox, &input, &config, owner, |script, ctx| {
            script.on_collision(
                ctx,
                toucher,
                Contact {
                    layer: ContactLayer::Trigger,
                    mtv: Vec2::ZERO,
                },
            )
        });
    }

    fn init_scripts(world: &mut World, outbox: &mut Outbox) {
        script_system(world, outbox, &Intent::idle(), &SimConfig::default(), 0.016);
    }

    #[test]
    fn test_portal_requests_scene_once() {
        let mut world = World::new();
        let mut outbox = Outbox::new();

        let portal = world.spawn();
        world.positions.insert(portal, Position(Vec2::ZERO));
        world.instances.insert(
            portal,
            Instance::new(Box::new(PortalScript::new("cave-2"))),
        );
        let player = world.spawn();

        init_scripts(&mut world, &mut outbox);
        touch(&mut world, &mut outbox, portal, player);
        touch(&mut world, &mut outbox, portal, player);

        let scenes: Vec<_> = outbox.scenes.drain().map(|r| r.scene).collect();
        assert_eq!(scenes, vec!["cave-2"]);
        assert!(world.pending_delete.contains(portal));
    }

    #[test]
    fn test_collectible_heals_the_toucher() {
        let mut world = World::new();
        let mut outbox = Outbox::new();

        let pickup = world.spawn();
        world.positions.insert(pickup, Position(Vec2::ZERO));
        world
            .instances
            .insert(pickup, Instance::new(Box::new(CollectibleScript::new(2))));

        let player = world.spawn();
        let mut health = Health::new(5, 0.8);
        health.current = 2;
        world.healths.insert(player, health);

        init_scripts(&mut world, &mut outbox);
        touch(&mut world, &mut outbox, pickup, player);

        assert_eq!(world.healths.get(player).unwrap().current, 4);
        assert!(world.pending_delete.contains(pickup));

        // Second touch in the same tick is absorbed by the fired state
        touch(&mut world, &mut outbox, pickup, player);
        assert_eq!(world.healths.get(player).unwrap().current, 4);
    }
}
