//! Simulation Driver
//!
//! One discrete tick advances the whole world: delta time is derived from
//! wall-clock elapsed time and clamped to an upper bound, then every
//! system runs to completion in the fixed order
//! script -> movement -> collision -> rigid-resolution -> damage ->
//! animation -> delete-sweep. Single-threaded and cooperative; nothing
//! suspends mid-tick.

use glam::Vec2;

use super::collision::{collision_system, ContactBuffers};
use super::components::Facing;
use super::config::SimConfig;
use super::geom::Aabb;
use super::input::Intent;
use super::outbox::Outbox;
use super::systems::{
    animation_system, damage_system, movement_system, rigid_resolution_system, script_system,
};
use super::world::World;

/// One renderable tuple exposed to the render consumer. The core only
/// hands out indices; pixels are the renderer's problem.
#[derive(Debug, Clone, Copy)]
pub struct SpriteView {
    pub position: Vec2,
    pub sheet: u32,
    pub frame: u32,
    pub z: i32,
    pub facing: Option<Facing>,
}

/// The whole simulation: world, config, transient buffers and outbound
/// requests.
pub struct Simulation {
    pub world: World,
    pub outbox: Outbox,
    pub config: SimConfig,
    buffers: ContactBuffers,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            outbox: Outbox::new(),
            config,
            buffers: ContactBuffers::new(),
        }
    }

    /// Advance one tick. `elapsed` is wall-clock seconds since the last
    /// tick; it is clamped to `config.max_dt` so a background pause can
    /// never tunnel a fast body through a thin wall in one step.
    pub fn tick(&mut self, input: &Intent, elapsed: f32) {
        let dt = elapsed.clamp(0.0, self.config.max_dt);

        script_system(&mut self.world, &mut self.outbox, input, &self.config, dt);
        movement_system(&mut self.world, &self.config, dt);
        collision_system(&mut self.world, &mut self.buffers);
        rigid_resolution_system(
            &mut self.world,
            &mut self.outbox,
            input,
            &self.config,
            &self.buffers,
        );
        damage_system(
            &mut self.world,
            &mut self.outbox,
            input,
            &self.config,
            &self.buffers,
            dt,
        );
        animation_system(&mut self.world, dt);
        // Sweep runs last so no system ever sees a half-deleted entity.
        self.world.sweep();
    }

    /// Read-only view for the render consumer: every (Position, Sprite,
    /// optional Facing) tuple, ordered by z descending.
    pub fn render_view(&self) -> Vec<SpriteView> {
        let mut views: Vec<SpriteView> = Vec::new();
        for (entity, sprite) in self.world.sprites.iter() {
            // A sprite whose body already lost its Position is gone.
            let Some(position) = self.world.positions.get(entity) else {
                continue;
            };
            views.push(SpriteView {
                position: position.0,
                sheet: sprite.sheet,
                frame: sprite.frame,
                z: sprite.z,
                facing: self.world.facings.get(entity).copied(),
            });
        }
        views.sort_by(|a, b| b.z.cmp(&a.z));
        views
    }

    /// Debug-shape requests: the box of every live collider. Renderers
    /// may overlay these; the core attaches no meaning to them.
    pub fn debug_shapes(&self) -> Vec<Aabb> {
        let mut shapes = Vec::new();
        for (_, collider) in self.world.colliders.iter() {
            if let Some(pos) = self.world.positions.get(collider.parent) {
                shapes.push(Aabb::of_collider(pos, collider));
            }
        }
        shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::*;
    use crate::entity::Entity;
    use glam::Vec2;

    fn body(sim: &mut Simulation, x: f32, y: f32) -> Entity {
        let e = sim.world.spawn();
        sim.world.positions.insert(e, Position(Vec2::new(x, y)));
        e
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut sim = Simulation::new(SimConfig::default());
        let e = body(&mut sim, 0.0, 0.0);
        sim.world.velocities.insert(e, Velocity::new(100.0, 0.0));
        // Also cancel gravity influence on the check by only reading x
        sim.tick(&Intent::idle(), 10.0);

        let x = sim.world.positions.get(e).unwrap().0.x;
        assert!((x - 100.0 * sim.config.max_dt).abs() < 1e-4);
    }

    #[test]
    fn test_negative_elapsed_is_a_zero_tick() {
        let mut sim = Simulation::new(SimConfig::default());
        let e = body(&mut sim, 5.0, 5.0);
        sim.world.velocities.insert(e, Velocity::new(100.0, 0.0));

        sim.tick(&Intent::idle(), -1.0);
        assert_eq!(sim.world.positions.get(e).unwrap().0, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_render_view_sorted_by_z_descending() {
        let mut sim = Simulation::new(SimConfig::default());

        let back = body(&mut sim, 0.0, 0.0);
        sim.world.sprites.insert(back, Sprite::new(1, -5));
        let front = body(&mut sim, 1.0, 0.0);
        sim.world.sprites.insert(front, Sprite::new(2, 10));
        let mid = body(&mut sim, 2.0, 0.0);
        sim.world.sprites.insert(mid, Sprite::new(3, 0));

        let views = sim.render_view();
        let zs: Vec<i32> = views.iter().map(|v| v.z).collect();
        assert_eq!(zs, vec![10, 0, -5]);
    }

    #[test]
    fn test_render_view_skips_bodies_without_position() {
        let mut sim = Simulation::new(SimConfig::default());
        let e = sim.world.spawn();
        sim.world.sprites.insert(e, Sprite::new(1, 0));

        assert!(sim.render_view().is_empty());
    }

    #[test]
    fn test_tick_consumes_pending_delete() {
        let mut sim = Simulation::new(SimConfig::default());
        let e = body(&mut sim, 0.0, 0.0);
        sim.world.mark_despawn(e);

        sim.tick(&Intent::idle(), 0.016);
        assert!(!sim.world.is_alive(e));
        assert_eq!(sim.world.pending_delete.count(), 0);
    }
}
