// All tunable game constants in one place.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GameError;

// World
pub const TILE_SIZE: f32 = 32.0;
pub const WORLD_WIDTH_TILES: usize = 45;
pub const WORLD_HEIGHT_TILES: usize = 28;
pub const WORLD_WIDTH: f32 = WORLD_WIDTH_TILES as f32 * TILE_SIZE;
pub const WORLD_HEIGHT: f32 = WORLD_HEIGHT_TILES as f32 * TILE_SIZE;

// Simulation
pub const MAX_DT: f32 = 0.1;

// Stats
pub const MAX_STAT: f32 = 100.0;
pub const HUNGER_RATE: f32 = 0.4;
pub const THIRST_RATE: f32 = 0.6;
pub const SWIM_HUNGER_MULT: f32 = 1.5;
pub const SWIM_THIRST_MULT: f32 = 1.7;
pub const SUN_DAMAGE_RATE: f32 = 1.75;
pub const SHADE_HEALTH_REGEN_RATE: f32 = 1.75;
pub const SWIM_HEALTH_DRAIN_RATE: f32 = 0.15;
pub const STARVING_DAMAGE_RATE: f32 = 0.5;
pub const DEHYDRATED_DAMAGE_RATE: f32 = 1.0;
pub const LOW_HUNGER_DAMAGE_RATE: f32 = 0.03;
pub const LOW_THIRST_DAMAGE_RATE: f32 = 0.05;
pub const SHADE_REGEN_MESSAGE_COOLDOWN: f32 = 5.0;

// Time (fractions of a day)
pub const DAY_LENGTH: f32 = 120.0;
pub const DAY_START: f32 = 0.0;
pub const MORNING_START: f32 = 0.15;
pub const AFTERNOON_START: f32 = 0.4;
pub const EVENING_START: f32 = 0.7;
pub const NIGHT_START: f32 = 0.85;

// Rescue
pub const RESCUE_START_DAY: u32 = 4;
pub const BASE_RESCUE_CHANCE: f32 = 0.15;

// Player
pub const PLAYER_SIZE: f32 = TILE_SIZE;
pub const PLAYER_SPEED_TILES: f32 = 3.0;
pub const SWIM_SPEED_MULT: f32 = 0.6;
pub const INTERACTION_RANGE: f32 = TILE_SIZE * 2.0;
pub const INTERACTION_REACH: f32 = TILE_SIZE * 0.6;
pub const PLACEMENT_GAP: f32 = TILE_SIZE * 0.3;

// Resource placement
pub const REFERENCE_AREA_TILES: f32 = 45.0 * 28.0;
pub const TREE_COUNT: f32 = 50.0;
pub const ROCK_COUNT: f32 = 15.0;
pub const SHRUB_COUNT: f32 = 30.0;
pub const TREE_ATTEMPT_MULT: usize = 70;
pub const ROCK_ATTEMPT_MULT: usize = 100;
pub const SHRUB_ATTEMPT_MULT: usize = 80;
pub const SPAWN_CLEARANCE_TILES: f32 = 5.0;

// Trees
pub const TREE_WIDTH_TILES: f32 = 1.8;
pub const TREE_HEIGHT_TILES: f32 = 2.8;
pub const INITIAL_TREE_RESOURCE: u32 = 400;
pub const TREE_REGROW_DAYS: f32 = 365.0;
pub const AXE_WOOD_PER_HIT: u32 = 30;
pub const HAND_WOOD_PER_HIT: u32 = 1;

// Rocks
pub const MEDIUM_ROCK_TILES: f32 = 0.9;
pub const LARGE_ROCK_TILES: f32 = 1.2;
pub const MEDIUM_ROCK_WEIGHT: u32 = 2;
pub const LARGE_ROCK_WEIGHT: u32 = 1;

// Shrubs
pub const SHRUB_HEALTH: u32 = 3;
pub const SHRUB_WOOD_YIELD: u32 = 5;
pub const SHRUB_REGROW_DAYS: f32 = 2.0;
pub const SHRUB_STUMP_DURATION: f32 = 0.5;

// Driftwood
pub const DRIFTWOOD_SPAWN_CHANCE_PER_DAY: f32 = 0.6;
pub const MAX_DRIFTWOOD_COUNT: usize = 15;
pub const DRIFTWOOD_SPAWN_ATTEMPTS: usize = 50;
pub const DRIFTWOOD_SPACING_TILES: f32 = 1.5;
pub const DRIFTWOOD_YIELD_MIN: u32 = 50;
pub const DRIFTWOOD_YIELD_MAX: u32 = 100;

// Signal fire
pub const SIGNAL_FIRE_MAX_FUEL: f32 = 100.0;
pub const SIGNAL_FIRE_FUEL_PER_WOOD: f32 = 5.0;
pub const SIGNAL_FIRE_BURN_RATE: f32 = 0.5;
pub const MAX_WOOD_PER_REFUEL: u32 = 10;

// Food and water
pub const FISH_HUNGER: f32 = 30.0;
pub const FISH_HEAL: f32 = 3.0;
pub const PURIFIER_THIRST: f32 = 40.0;
pub const PURIFIER_HEAL: f32 = 2.0;
pub const DIRTY_WATER_THIRST: f32 = 15.0;
pub const DIRTY_WATER_SICK_CHANCE: f32 = 0.3;
pub const DIRTY_WATER_DAMAGE: f32 = 10.0;

// Fishing
pub const FISHING_DURATION: f32 = 2.5;
pub const FISHING_COOLDOWN: f32 = 1.0;
pub const FISH_CHANCE_NIGHT: f32 = 0.6;
pub const FISH_CHANCE_DAY: f32 = 0.3;
pub const FISH_JUMPING_CHANCE_PER_SECOND: f32 = 0.02;
pub const FISH_JUMPING_DURATION: f32 = 8.0;
pub const QUICK_CATCH_NIGHT: f32 = 0.9;
pub const QUICK_CATCH_DAY: f32 = 0.7;
pub const FISH_JUMP_ANIMATION_TIME: f32 = 0.7;
pub const FISH_JUMP_SPOT_ATTEMPTS: usize = 30;

// Inventory
pub const MAX_INVENTORY_SLOTS: usize = 20;

// Shark
pub const SHARK_SPAWN_DISTANCE_TILES: f32 = 5.0;
pub const SHARK_SPAWN_CHANCE: f32 = 0.005;
pub const SHARK_SPEED: f32 = 2.0 * TILE_SIZE;
pub const SHARK_DETECTION_RANGE: f32 = TILE_SIZE * 8.0;
pub const SHARK_ATTACK_RANGE: f32 = TILE_SIZE * 1.2;
pub const SHARK_LOSE_SIGHT_MULT: f32 = 1.8;
pub const SHARK_COOLDOWN: f32 = 3.0;
pub const SHARK_DESPAWN_LAND_TIME: f32 = 5.0;
pub const SHARK_SPAWN_ATTEMPTS: usize = 50;
pub const SHARK_DEEP_TILE_ATTEMPTS: usize = 200;
pub const SHARK_DEEP_TILE_MIN_TILES: f32 = 7.0;
pub const SHARK_LAND_SEARCH_RADIUS: i32 = 20;
pub const SHARK_LINGER_RADIUS_TILES: f32 = 3.0;
pub const SHARK_LINGER_REPICK_TILES: f32 = 4.0;
pub const SHARK_LINGER_MIN: f32 = 5.0;
pub const SHARK_LINGER_MAX: f32 = 10.0;
pub const SHARK_BOUNDS_MARGIN: f32 = TILE_SIZE * 2.0;

// Leaderboard
pub const LEADERBOARD_MAX_ENTRIES: usize = 10;
pub const DEFAULT_LEADERBOARD_PATH: &str = "longest_day_leaderboard.json";

// Camera
pub const CAMERA_ZOOM_MIN: f32 = 0.5;
pub const CAMERA_ZOOM_MAX: f32 = 3.0;
pub const CAMERA_ZOOM_SPEED: f32 = 0.1;
pub const CAMERA_SMOOTH_SPEED: f32 = 8.0;

/// Island shaping parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub base_noise_scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub island_falloff_power: f64,
    pub island_size_factor: f64,
    pub water_threshold: f64,
    pub sand_threshold: f64,
    /// Normalized center distance beyond which the rim penalty applies.
    pub rim_start: f64,
    pub rim_penalty: f64,
    /// Decorative grass patches per 25x28 reference area.
    pub grass_patches_per_reference: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            base_noise_scale: 0.045,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            island_falloff_power: 2.0,
            island_size_factor: 0.45,
            water_threshold: -0.1,
            sand_threshold: -0.1,
            rim_start: 0.48,
            rim_penalty: 0.1,
            grass_patches_per_reference: 500.0,
        }
    }
}

/// Top-level game configuration, optionally loaded from a JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: Option<u64>,
    pub width_tiles: usize,
    pub height_tiles: usize,
    pub terrain: TerrainParams,
    pub leaderboard_path: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            width_tiles: WORLD_WIDTH_TILES,
            height_tiles: WORLD_HEIGHT_TILES,
            terrain: TerrainParams::default(),
            leaderboard_path: DEFAULT_LEADERBOARD_PATH.to_string(),
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| GameError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut config: GameConfig = serde_json::from_str(text)?;
        config.width_tiles = config.width_tiles.max(3);
        config.height_tiles = config.height_tiles.max(3);
        Ok(config)
    }

    /// Apply `--seed <n>` and `--config <path>` command-line flags.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self, GameError> {
        let mut config = GameConfig::default();
        let mut seed = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args
                        .next()
                        .ok_or_else(|| GameError::InvalidArgument("--seed needs a value".into()))?;
                    let parsed = value.parse::<u64>().map_err(|_| {
                        GameError::InvalidArgument(format!("--seed expects an integer, got {value}"))
                    })?;
                    seed = Some(parsed);
                }
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| GameError::InvalidArgument("--config needs a path".into()))?;
                    config = GameConfig::load(path)?;
                }
                other => {
                    return Err(GameError::InvalidArgument(format!("unknown flag {other}")));
                }
            }
        }
        if seed.is_some() {
            config.seed = seed;
        }
        Ok(config)
    }
}
