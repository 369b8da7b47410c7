//! Level Data
//!
//! Authored room content consumed from the level editor: a tile-index
//! grid for the renderer, static obstacle rectangles, enemy spawn
//! descriptors and special-object descriptors. Stored as RON
//! (Rusty Object Notation) for human-readable level files; every file is
//! validated on load so malformed authored content fails loudly instead
//! of corrupting a running world.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    /// Maximum tile grid dimension (width or height)
    pub const MAX_GRID_SIZE: usize = 512;
    /// Maximum number of static obstacles
    pub const MAX_OBSTACLES: usize = 1024;
    /// Maximum number of enemy spawns
    pub const MAX_SPAWNS: usize = 256;
    /// Maximum number of special objects
    pub const MAX_SPECIALS: usize = 256;
    /// Maximum string length for scene names
    pub const MAX_STRING_LEN: usize = 256;
    /// Maximum coordinate value (prevents overflow issues)
    pub const MAX_COORD: f32 = 1_000_000.0;
}

/// Error type for level loading
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    ValidationError(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for LevelError {}

/// Background tile indices, row-major. Purely for the renderer; the
/// simulation collides against `obstacles`, not tiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileGrid {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<u16>,
}

/// A static solid rectangle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObstacleRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Which enemy an [`EnemySpawn`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Walker,
    Jumper,
    Boss,
}

/// Where and what to spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    /// Horizontal patrol bounds (min x, max x), walkers only
    pub patrol: Option<(f32, f32)>,
}

/// Special objects: one-shot trigger volumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SpecialKind {
    /// Teleports the player to a named scene
    Portal { destination: String },
    /// Heals the player on pickup
    Collectible { heal: i32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialObject {
    pub kind: SpecialKind,
    pub x: f32,
    pub y: f32,
}

/// One authored room.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelData {
    pub tile_grid: TileGrid,
    pub obstacles: Vec<ObstacleRect>,
    pub spawns: Vec<EnemySpawn>,
    pub specials: Vec<SpecialObject>,
}

/// Check if a float is valid (not NaN or Inf, within coordinate bounds)
fn is_valid_float(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

fn validate_coords(x: f32, y: f32, context: &str) -> Result<(), String> {
    if !is_valid_float(x) || !is_valid_float(y) {
        return Err(format!("{}: invalid position ({}, {})", context, x, y));
    }
    Ok(())
}

impl LevelData {
    /// Load a level from a RON file.
    pub fn load(path: &Path) -> Result<LevelData, LevelError> {
        let contents = fs::read_to_string(path)?;
        let level: LevelData = ron::from_str(&contents)?;
        level
            .validate()
            .map_err(LevelError::ValidationError)?;
        Ok(level)
    }

    /// Validate all authored content against the limits module.
    pub fn validate(&self) -> Result<(), String> {
        let grid = &self.tile_grid;
        if grid.width > limits::MAX_GRID_SIZE || grid.height > limits::MAX_GRID_SIZE {
            return Err(format!(
                "tile grid {}x{} exceeds maximum {}",
                grid.width,
                grid.height,
                limits::MAX_GRID_SIZE
            ));
        }
        if grid.tiles.len() != grid.width * grid.height {
            return Err(format!(
                "tile grid claims {}x{} but holds {} tiles",
                grid.width,
                grid.height,
                grid.tiles.len()
            ));
        }
        if self.obstacles.len() > limits::MAX_OBSTACLES {
            return Err(format!("too many obstacles ({})", self.obstacles.len()));
        }
        if self.spawns.len() > limits::MAX_SPAWNS {
            return Err(format!("too many spawns ({})", self.spawns.len()));
        }
        if self.specials.len() > limits::MAX_SPECIALS {
            return Err(format!("too many special objects ({})", self.specials.len()));
        }

        for (i, rect) in self.obstacles.iter().enumerate() {
            let context = format!("obstacle[{}]", i);
            validate_coords(rect.x, rect.y, &context)?;
            if !is_valid_float(rect.width)
                || !is_valid_float(rect.height)
                || rect.width <= 0.0
                || rect.height <= 0.0
            {
                return Err(format!(
                    "{}: invalid size {}x{}",
                    context, rect.width, rect.height
                ));
            }
        }
        for (i, spawn) in self.spawns.iter().enumerate() {
            let context = format!("spawn[{}]", i);
            validate_coords(spawn.x, spawn.y, &context)?;
            if let Some((min, max)) = spawn.patrol {
                if !is_valid_float(min) || !is_valid_float(max) || min > max {
                    return Err(format!("{}: invalid patrol bounds ({}, {})", context, min, max));
                }
            }
        }
        for (i, special) in self.specials.iter().enumerate() {
            let context = format!("special[{}]", i);
            validate_coords(special.x, special.y, &context)?;
            match &special.kind {
                SpecialKind::Portal { destination } => {
                    if destination.is_empty() || destination.len() > limits::MAX_STRING_LEN {
                        return Err(format!("{}: invalid portal destination", context));
                    }
                }
                SpecialKind::Collectible { heal } => {
                    if *heal <= 0 {
                        return Err(format!("{}: collectible heal must be positive", context));
                    }
                }
            }
        }
        Ok(())
    }
}
