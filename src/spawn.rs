//! Entity Factories
//!
//! Construction is the only place an entity's component set is assembled,
//! so every archetype lives here: the player avatar, each enemy kind,
//! static obstacles and the special trigger objects. Bodies and their
//! collider children are always spawned together; nothing else in the
//! crate builds colliders by hand.

use glam::Vec2;
use tracing::info;

use super::behaviors::{
    BossScript, BossTuning, CollectibleScript, JumperScript, PlayerScript, PortalScript,
    WalkerScript,
};
use super::components::{
    Animation, Collider, Facing, Health, Hitbox, Hurtbox, Player, Position, Rigid, Sprite, Team,
    Trigger, Velocity,
};
use super::config::SimConfig;
use super::entity::Entity;
use super::level::{EnemyKind, LevelData, ObstacleRect, SpecialKind};
use super::script::Instance;
use super::world::World;

// =============================================================================
// Archetype constants
// =============================================================================

pub const PLAYER_SIZE: Vec2 = Vec2::new(24.0, 48.0);
pub const WALKER_SIZE: Vec2 = Vec2::new(40.0, 52.0);
pub const JUMPER_SIZE: Vec2 = Vec2::new(32.0, 32.0);
pub const BOSS_SIZE: Vec2 = Vec2::new(96.0, 96.0);
pub const PORTAL_SIZE: Vec2 = Vec2::new(32.0, 48.0);
pub const COLLECTIBLE_SIZE: Vec2 = Vec2::new(16.0, 16.0);

pub const SHEET_PLAYER: u32 = 0;
pub const SHEET_WALKER: u32 = 1;
pub const SHEET_JUMPER: u32 = 2;
pub const SHEET_BOSS: u32 = 3;
pub const SHEET_SPECIAL: u32 = 4;

const WALKER_SPEED: f32 = 60.0;
const WALKER_HEALTH: i32 = 2;
const WALKER_CONTACT_DAMAGE: i32 = 1;
const JUMPER_IMPULSE: f32 = 420.0;
const JUMPER_REST_TIME: f32 = 1.2;
const JUMPER_HEALTH: i32 = 2;
const JUMPER_CONTACT_DAMAGE: i32 = 1;
const BOSS_HEALTH: i32 = 12;

// =============================================================================
// Collider children
// =============================================================================

fn attach_rigid(world: &mut World, parent: Entity, size: Vec2) -> Entity {
    let collider = world.spawn();
    world
        .colliders
        .insert(collider, Collider::new(parent, Vec2::ZERO, size));
    world.rigids.insert(collider, Rigid);
    collider
}

fn attach_hurtbox(world: &mut World, parent: Entity, size: Vec2) -> Entity {
    let collider = world.spawn();
    world
        .colliders
        .insert(collider, Collider::new(parent, Vec2::ZERO, size));
    world.hurtboxes.insert(collider, Hurtbox);
    collider
}

fn attach_contact_hitbox(world: &mut World, parent: Entity, size: Vec2, damage: i32) -> Entity {
    let collider = world.spawn();
    world
        .colliders
        .insert(collider, Collider::new(parent, Vec2::ZERO, size));
    world.hitboxes.insert(collider, Hitbox { damage });
    collider
}

fn attach_trigger(world: &mut World, parent: Entity, size: Vec2) -> Entity {
    let collider = world.spawn();
    world
        .colliders
        .insert(collider, Collider::new(parent, Vec2::ZERO, size));
    world.triggers.insert(collider, Trigger);
    collider
}

// =============================================================================
// Factories
// =============================================================================

/// The player avatar, placed at the config's spawn point.
pub fn spawn_player(world: &mut World, config: &SimConfig) -> Entity {
    let body = world.spawn();
    world.positions.insert(body, Position(config.spawn_point));
    world.velocities.insert(body, Velocity::default());
    world.facings.insert(body, Facing::Right);
    world.teams.insert(body, Team::Player);
    world.healths.insert(
        body,
        Health::new(config.player_health, config.invuln_duration),
    );
    world.sprites.insert(body, Sprite::new(SHEET_PLAYER, 0));
    world.animations.insert(body, Animation::looping(0, 4, 0.15));
    world.players.insert(body, Player);
    world
        .instances
        .insert(body, Instance::new(Box::new(PlayerScript::new())));

    attach_rigid(world, body, PLAYER_SIZE);
    attach_hurtbox(world, body, PLAYER_SIZE);
    body
}

/// A patrolling ground enemy with a contact-damage hitbox.
pub fn spawn_walker(
    world: &mut World,
    config: &SimConfig,
    at: Vec2,
    patrol: Option<(f32, f32)>,
) -> Entity {
    let body = world.spawn();
    world.positions.insert(body, Position(at));
    world.velocities.insert(body, Velocity::default());
    world.facings.insert(body, Facing::Right);
    world.teams.insert(body, Team::Enemy);
    world
        .healths
        .insert(body, Health::new(WALKER_HEALTH, config.invuln_duration));
    world.sprites.insert(body, Sprite::new(SHEET_WALKER, 1));
    world.animations.insert(body, Animation::looping(0, 4, 0.2));
    world.instances.insert(
        body,
        Instance::new(Box::new(WalkerScript::new(WALKER_SPEED, patrol))),
    );

    attach_rigid(world, body, WALKER_SIZE);
    attach_hurtbox(world, body, WALKER_SIZE);
    attach_contact_hitbox(world, body, WALKER_SIZE, WALKER_CONTACT_DAMAGE);
    body
}

/// A hopping enemy.
pub fn spawn_jumper(world: &mut World, config: &SimConfig, at: Vec2) -> Entity {
    let body = world.spawn();
    world.positions.insert(body, Position(at));
    world.velocities.insert(body, Velocity::default());
    world.facings.insert(body, Facing::Left);
    world.teams.insert(body, Team::Enemy);
    world
        .healths
        .insert(body, Health::new(JUMPER_HEALTH, config.invuln_duration));
    world.sprites.insert(body, Sprite::new(SHEET_JUMPER, 1));
    world.animations.insert(body, Animation::looping(0, 2, 0.25));
    world.instances.insert(
        body,
        Instance::new(Box::new(JumperScript::new(JUMPER_IMPULSE, JUMPER_REST_TIME))),
    );

    attach_rigid(world, body, JUMPER_SIZE);
    attach_hurtbox(world, body, JUMPER_SIZE);
    attach_contact_hitbox(world, body, JUMPER_SIZE, JUMPER_CONTACT_DAMAGE);
    body
}

/// The multi-phase boss. Its attack hitbox is transient and owned by the
/// boss script, not the factory.
pub fn spawn_boss(world: &mut World, config: &SimConfig, at: Vec2) -> Entity {
    let body = world.spawn();
    world.positions.insert(body, Position(at));
    world.velocities.insert(body, Velocity::default());
    world.facings.insert(body, Facing::Left);
    world.teams.insert(body, Team::Enemy);
    world
        .healths
        .insert(body, Health::new(BOSS_HEALTH, config.invuln_duration));
    world.sprites.insert(body, Sprite::new(SHEET_BOSS, 1));
    world.animations.insert(body, Animation::looping(0, 4, 0.3));
    world.instances.insert(
        body,
        Instance::new(Box::new(BossScript::new(BossTuning::default()))),
    );

    attach_rigid(world, body, BOSS_SIZE);
    attach_hurtbox(world, body, BOSS_SIZE);
    body
}

/// A static solid rectangle. No velocity component, so the rigid
/// resolver treats it as immovable.
pub fn spawn_obstacle(world: &mut World, rect: &ObstacleRect) -> Entity {
    let body = world.spawn();
    world
        .positions
        .insert(body, Position(Vec2::new(rect.x, rect.y)));
    attach_rigid(world, body, Vec2::new(rect.width, rect.height));
    body
}

/// A portal trigger leading to another scene.
pub fn spawn_portal(world: &mut World, at: Vec2, destination: &str) -> Entity {
    let body = world.spawn();
    world.positions.insert(body, Position(at));
    world.sprites.insert(body, Sprite::new(SHEET_SPECIAL, 2));
    world
        .instances
        .insert(body, Instance::new(Box::new(PortalScript::new(destination))));
    attach_trigger(world, body, PORTAL_SIZE);
    body
}

/// A healing pickup.
pub fn spawn_collectible(world: &mut World, at: Vec2, heal: i32) -> Entity {
    let body = world.spawn();
    world.positions.insert(body, Position(at));
    world.sprites.insert(body, Sprite::new(SHEET_SPECIAL, 2));
    world
        .instances
        .insert(body, Instance::new(Box::new(CollectibleScript::new(heal))));
    attach_trigger(world, body, COLLECTIBLE_SIZE);
    body
}

/// Build a whole room from authored level data and place the player.
/// Returns the player body entity.
pub fn populate(world: &mut World, config: &SimConfig, level: &LevelData) -> Entity {
    for rect in &level.obstacles {
        spawn_obstacle(world, rect);
    }
    for spawn in &level.spawns {
        let at = Vec2::new(spawn.x, spawn.y);
        match spawn.kind {
            EnemyKind::Walker => {
                spawn_walker(world, config, at, spawn.patrol);
            }
            EnemyKind::Jumper => {
                spawn_jumper(world, config, at);
            }
            EnemyKind::Boss => {
                spawn_boss(world, config, at);
            }
        }
    }
    for special in &level.specials {
        let at = Vec2::new(special.x, special.y);
        match &special.kind {
            SpecialKind::Portal { destination } => {
                spawn_portal(world, at, destination);
            }
            SpecialKind::Collectible { heal } => {
                spawn_collectible(world, at, *heal);
            }
        }
    }
    let player = spawn_player(world, config);
    info!(
        obstacles = level.obstacles.len(),
        enemies = level.spawns.len(),
        specials = level.specials.len(),
        "level populated"
    );
    player
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{EnemySpawn, SpecialObject, TileGrid};

    fn children_of(world: &World, parent: Entity) -> Vec<Entity> {
        world
            .colliders
            .iter()
            .filter(|(_, c)| c.parent == parent)
            .map(|(e, _)| e)
            .collect()
    }

    #[test]
    fn test_player_archetype_is_complete() {
        let mut world = World::new();
        let config = SimConfig::default();
        let player = spawn_player(&mut world, &config);

        assert!(world.positions.contains(player));
        assert!(world.velocities.contains(player));
        assert!(world.facings.contains(player));
        assert!(world.healths.contains(player));
        assert!(world.instances.contains(player));
        assert!(world.players.contains(player));
        assert_eq!(world.teams.get(player), Some(&Team::Player));
        assert_eq!(
            world.healths.get(player).unwrap().max,
            config.player_health
        );

        // One rigid hull and one hurtbox, nothing else
        let children = children_of(&world, player);
        assert_eq!(children.len(), 2);
        assert_eq!(
            children
                .iter()
                .filter(|c| world.rigids.contains(**c))
                .count(),
            1
        );
        assert_eq!(
            children
                .iter()
                .filter(|c| world.hurtboxes.contains(**c))
                .count(),
            1
        );
    }

    #[test]
    fn test_walker_carries_contact_damage() {
        let mut world = World::new();
        let config = SimConfig::default();
        let walker = spawn_walker(&mut world, &config, Vec2::new(100.0, 500.0), None);

        assert_eq!(world.teams.get(walker), Some(&Team::Enemy));
        let children = children_of(&world, walker);
        assert_eq!(children.len(), 3);
        assert!(children.iter().any(|c| world.hitboxes.contains(*c)));
    }

    #[test]
    fn test_obstacle_is_static() {
        let mut world = World::new();
        let rect = ObstacleRect {
            x: 0.0,
            y: 560.0,
            width: 640.0,
            height: 32.0,
        };
        let obstacle = spawn_obstacle(&mut world, &rect);

        assert!(world.positions.contains(obstacle));
        assert!(!world.velocities.contains(obstacle));

        let children = children_of(&world, obstacle);
        assert_eq!(children.len(), 1);
        assert!(world.rigids.contains(children[0]));
        assert_eq!(
            world.colliders.get(children[0]).unwrap().size,
            Vec2::new(640.0, 32.0)
        );
    }

    #[test]
    fn test_populate_builds_the_room_and_returns_the_player() {
        let mut world = World::new();
        let config = SimConfig::default();
        let level = LevelData {
            tile_grid: TileGrid::default(),
            obstacles: vec![ObstacleRect {
                x: 0.0,
                y: 560.0,
                width: 640.0,
                height: 32.0,
            }],
            spawns: vec![
                EnemySpawn {
                    kind: EnemyKind::Walker,
                    x: 200.0,
                    y: 500.0,
                    patrol: Some((150.0, 300.0)),
                },
                EnemySpawn {
                    kind: EnemyKind::Boss,
                    x: 500.0,
                    y: 450.0,
                    patrol: None,
                },
            ],
            specials: vec![SpecialObject {
                kind: SpecialKind::Collectible { heal: 1 },
                x: 300.0,
                y: 520.0,
            }],
        };

        let player = populate(&mut world, &config, &level);

        assert_eq!(world.player(), Some(player));
        assert_eq!(
            world.positions.get(player).unwrap().0,
            config.spawn_point
        );
        // Two enemies plus the player carry scripts, plus the collectible
        assert_eq!(world.instances.count(), 4);
        assert_eq!(world.triggers.count(), 1);
    }
}
