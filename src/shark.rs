use macroquad::prelude::*;
use ::rand::Rng;

use crate::config;
use crate::terrain::{distance_to_nearest_land, Tile, TileGrid};
use crate::world::WorldState;

/// Behavior state. Linger bookkeeping only exists while lingering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SharkMode {
    Inactive,
    Patrolling,
    Chasing,
    Lingering { timer: f32, last_seen: Vec2 },
}

impl SharkMode {
    pub fn label(&self) -> &'static str {
        match self {
            SharkMode::Inactive => "inactive",
            SharkMode::Patrolling => "patrolling",
            SharkMode::Chasing => "chasing",
            SharkMode::Lingering { .. } => "lingering",
        }
    }
}

/// What a behavior tick produced for the rest of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SharkEvent {
    None,
    Attack,
    Despawned,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SharkState {
    pub mode: SharkMode,
    pub pos: Vec2,
    pub target: Vec2,
    /// Unit heading while moving, zero when parked on the target.
    pub heading: Vec2,
    pub speed: f32,
    pub cooldown: f32,
    /// Seconds the player has spent off the ocean.
    pub player_safe_time: f32,
}

impl Default for SharkState {
    fn default() -> Self {
        Self {
            mode: SharkMode::Inactive,
            pos: Vec2::ZERO,
            target: Vec2::ZERO,
            heading: Vec2::ZERO,
            speed: config::SHARK_SPEED,
            cooldown: 0.0,
            player_safe_time: 0.0,
        }
    }
}

fn land_distance(world: &WorldState, pos: Vec2) -> f32 {
    distance_to_nearest_land(&world.grid, pos, config::SHARK_LAND_SEARCH_RADIUS)
}

fn in_ocean(world: &WorldState, pos: Vec2) -> bool {
    world.tile_at_pixel(pos) == Some(Tile::OceanWater)
}

/// Random ocean tile center at least `min_tiles` from land, with two fallbacks.
pub fn find_random_deep_water(world: &WorldState, min_tiles: f32, rng: &mut impl Rng) -> Vec2 {
    let min_dist = min_tiles * config::TILE_SIZE;
    for _ in 0..config::SHARK_DEEP_TILE_ATTEMPTS {
        let tx = rng.gen_range(0..world.grid.width) as i32;
        let ty = rng.gen_range(0..world.grid.height) as i32;
        if world.tile_at(tx, ty) != Some(Tile::OceanWater) {
            continue;
        }
        let center = TileGrid::tile_center(tx, ty);
        if land_distance(world, center) > min_dist {
            return center;
        }
    }

    let cx = (world.grid.width / 2) as i32;
    let cy = (world.grid.height / 2) as i32;
    if world.tile_at(cx, cy) == Some(Tile::OceanWater) {
        let center = TileGrid::tile_center(cx, cy);
        if land_distance(world, center) > min_dist {
            return center;
        }
    }

    log::error!("no deep ocean tile found; shark falls back to the map center");
    world.center()
}

impl SharkState {
    pub fn is_active(&self) -> bool {
        self.mode != SharkMode::Inactive
    }

    pub fn is_chasing(&self) -> bool {
        self.mode == SharkMode::Chasing
    }

    pub fn deactivate(&mut self) {
        self.mode = SharkMode::Inactive;
        self.heading = Vec2::ZERO;
        self.player_safe_time = 0.0;
    }

    /// Roll for a spawn while the player swims far from shore. Returns true if the shark appeared.
    pub fn try_spawn(&mut self, world: &WorldState, player_center: Vec2, rng: &mut impl Rng) -> bool {
        if self.is_active() || !in_ocean(world, player_center) {
            return false;
        }
        let trigger = config::SHARK_SPAWN_DISTANCE_TILES * config::TILE_SIZE;
        if land_distance(world, player_center) <= trigger {
            return false;
        }
        if rng.gen::<f32>() >= config::SHARK_SPAWN_CHANCE {
            return false;
        }

        let (spawn, near_player) = match self.spawn_point_near(world, player_center, rng) {
            Some(p) => (p, true),
            None => {
                log::warn!("no ocean spot near the player, using a random deep tile for the shark");
                let fallback = find_random_deep_water(world, config::SHARK_SPAWN_DISTANCE_TILES + 1.0, rng);
                if fallback == world.center() && !in_ocean(world, fallback) {
                    log::error!("shark spawn fallback landed off the ocean; skipping spawn");
                    return false;
                }
                (fallback, false)
            }
        };

        self.mode = SharkMode::Patrolling;
        self.cooldown = 0.0;
        self.pos = spawn;
        self.heading = Vec2::ZERO;
        self.player_safe_time = 0.0;
        self.target = if near_player {
            player_center
        } else {
            find_random_deep_water(world, config::SHARK_DEEP_TILE_MIN_TILES, rng)
        };
        log::info!("shark spawned at ({:.0}, {:.0})", spawn.x, spawn.y);
        true
    }

    fn spawn_point_near(&self, world: &WorldState, player_center: Vec2, rng: &mut impl Rng) -> Option<Vec2> {
        let inner = config::SHARK_DETECTION_RANGE * 1.5;
        let outer = inner * 1.8;
        let min_land = (config::SHARK_SPAWN_DISTANCE_TILES - 1.0) * config::TILE_SIZE;

        for _ in 0..config::SHARK_SPAWN_ATTEMPTS {
            let angle = rng.gen::<f32>() * std::f32::consts::TAU;
            let radius = inner + rng.gen::<f32>() * (outer - inner);
            let p = player_center + vec2(angle.cos(), angle.sin()) * radius;
            if p.x < 0.0 || p.y < 0.0 || p.x >= world.width() || p.y >= world.height() {
                continue;
            }
            if in_ocean(world, p) && land_distance(world, p) > min_land {
                return Some(p);
            }
        }
        None
    }

    fn linger_point(&self, world: &WorldState, around: Vec2, radius_tiles: f32, rng: &mut impl Rng) -> Vec2 {
        let angle = rng.gen::<f32>() * std::f32::consts::TAU;
        let p = around + vec2(angle.cos(), angle.sin()) * radius_tiles * config::TILE_SIZE;
        let ts = config::TILE_SIZE;
        vec2(
            p.x.clamp(ts, (world.width() - ts).max(ts)),
            p.y.clamp(ts, (world.height() - ts).max(ts)),
        )
    }

    /// One behavior step: timers, state transitions, movement, despawn.
    pub fn update(&mut self, world: &WorldState, player_center: Vec2, dt: f32, rng: &mut impl Rng) -> SharkEvent {
        if !self.is_active() {
            return SharkEvent::None;
        }

        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
        if let SharkMode::Lingering { timer, .. } = &mut self.mode {
            *timer -= dt;
            if *timer <= 0.0 {
                self.mode = SharkMode::Patrolling;
                self.target = find_random_deep_water(world, config::SHARK_DEEP_TILE_MIN_TILES, rng);
            }
        }

        let player_in_ocean = in_ocean(world, player_center);
        let player_safe = !player_in_ocean;
        let dist_sq = self.pos.distance_squared(player_center);
        let detect_sq = config::SHARK_DETECTION_RANGE * config::SHARK_DETECTION_RANGE;

        match self.mode {
            SharkMode::Chasing => {
                self.target = player_center;
                let lose = config::SHARK_DETECTION_RANGE * config::SHARK_LOSE_SIGHT_MULT;
                if dist_sq > lose * lose || player_safe {
                    self.cooldown = config::SHARK_COOLDOWN;
                    if player_safe {
                        let last_seen = self.target;
                        self.mode = SharkMode::Lingering {
                            timer: rng.gen_range(config::SHARK_LINGER_MIN..config::SHARK_LINGER_MAX),
                            last_seen,
                        };
                        self.target = self.linger_point(world, last_seen, config::SHARK_LINGER_RADIUS_TILES, rng);
                        log::debug!("player escaped the shark; lingering");
                    } else {
                        self.mode = SharkMode::Patrolling;
                        self.target = find_random_deep_water(world, config::SHARK_DEEP_TILE_MIN_TILES, rng);
                    }
                } else if dist_sq < config::SHARK_ATTACK_RANGE * config::SHARK_ATTACK_RANGE {
                    return SharkEvent::Attack;
                }
            }
            SharkMode::Lingering { last_seen, .. } => {
                if dist_sq < detect_sq && player_in_ocean && self.cooldown <= 0.0 {
                    self.mode = SharkMode::Chasing;
                    self.target = player_center;
                } else {
                    let arrive = config::TILE_SIZE * 1.5;
                    if self.pos.distance_squared(self.target) < arrive * arrive {
                        self.target = self.linger_point(world, last_seen, config::SHARK_LINGER_REPICK_TILES, rng);
                    }
                }
            }
            SharkMode::Patrolling => {
                if dist_sq < detect_sq && self.cooldown <= 0.0 && player_in_ocean {
                    self.mode = SharkMode::Chasing;
                    self.target = player_center;
                } else {
                    let arrive = config::TILE_SIZE * 0.5;
                    if self.pos.distance_squared(self.target) < arrive * arrive {
                        self.target = find_random_deep_water(world, config::SHARK_DEEP_TILE_MIN_TILES, rng);
                    }
                }
            }
            SharkMode::Inactive => {}
        }

        self.step_toward_target(dt);

        let mut event = SharkEvent::None;
        if player_safe {
            self.player_safe_time += dt;
            if self.player_safe_time > config::SHARK_DESPAWN_LAND_TIME && !self.is_chasing() {
                self.deactivate();
                log::debug!("shark despawned");
                event = SharkEvent::Despawned;
            }
        } else {
            self.player_safe_time = 0.0;
        }

        let m = config::SHARK_BOUNDS_MARGIN;
        self.pos.x = self.pos.x.clamp(-m, world.width() + m);
        self.pos.y = self.pos.y.clamp(-m, world.height() + m);
        event
    }

    fn step_toward_target(&mut self, dt: f32) {
        let to_target = self.target - self.pos;
        let dist_sq = to_target.length_squared();
        let step = self.speed * dt;
        if dist_sq > step * step && dist_sq > 1.0 {
            self.heading = to_target.normalize_or_zero();
            self.pos += self.heading * step;
        } else {
            if dist_sq > 1.0 {
                self.pos = self.target;
            }
            self.heading = Vec2::ZERO;
        }
    }
}
