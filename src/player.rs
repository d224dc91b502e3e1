use macroquad::prelude::*;

use crate::config;
use crate::entity::EntityId;
use crate::terrain::TileGrid;
use crate::world::WorldState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Health, hunger and thirst, each kept within [0, MAX_STAT].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurvivalStats {
    pub health: f32,
    pub hunger: f32,
    pub thirst: f32,
}

impl Default for SurvivalStats {
    fn default() -> Self {
        Self {
            health: config::MAX_STAT,
            hunger: config::MAX_STAT,
            thirst: config::MAX_STAT,
        }
    }
}

impl SurvivalStats {
    pub fn clamp(&mut self) {
        self.health = self.health.clamp(0.0, config::MAX_STAT);
        self.hunger = self.hunger.clamp(0.0, config::MAX_STAT);
        self.thirst = self.thirst.clamp(0.0, config::MAX_STAT);
    }

    pub fn change_health(&mut self, delta: f32) {
        self.health = (self.health + delta).clamp(0.0, config::MAX_STAT);
    }

    pub fn change_hunger(&mut self, delta: f32) {
        self.hunger = (self.hunger + delta).clamp(0.0, config::MAX_STAT);
    }

    pub fn change_thirst(&mut self, delta: f32) {
        self.thirst = (self.thirst + delta).clamp(0.0, config::MAX_STAT);
    }
}

/// Environmental inputs to one stat update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Exposure {
    pub swimming: bool,
    pub sun_up: bool,
    pub in_shade: bool,
}

/// What one stat update did to health.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatTick {
    pub health_delta: f32,
    pub shade_regen: bool,
}

/// Decay hunger and thirst, then apply every health modifier at once and clamp.
pub fn apply_stat_decay(stats: &mut SurvivalStats, exposure: Exposure, dt: f32) -> StatTick {
    let (hunger_mult, thirst_mult) = if exposure.swimming {
        (config::SWIM_HUNGER_MULT, config::SWIM_THIRST_MULT)
    } else {
        (1.0, 1.0)
    };
    stats.hunger -= config::HUNGER_RATE * hunger_mult * dt;
    stats.thirst -= config::THIRST_RATE * thirst_mult * dt;

    let mut delta = 0.0;
    let mut shade_regen = false;

    if exposure.sun_up {
        if exposure.in_shade {
            if stats.health < config::MAX_STAT {
                delta += config::SHADE_HEALTH_REGEN_RATE * dt;
                shade_regen = true;
            }
        } else if !exposure.swimming {
            delta -= config::SUN_DAMAGE_RATE * dt;
        }
    }

    if exposure.swimming {
        delta -= config::SWIM_HEALTH_DRAIN_RATE * dt;
    }

    if stats.hunger <= 0.0 {
        delta -= config::STARVING_DAMAGE_RATE * dt;
        stats.hunger = 0.0;
    }
    if stats.thirst <= 0.0 {
        delta -= config::DEHYDRATED_DAMAGE_RATE * dt;
        stats.thirst = 0.0;
    }

    let half = config::MAX_STAT * 0.5;
    if stats.hunger > 0.0 && stats.hunger < half {
        delta -= config::LOW_HUNGER_DAMAGE_RATE * dt;
    }
    if stats.thirst > 0.0 && stats.thirst < half {
        delta -= config::LOW_THIRST_DAMAGE_RATE * dt;
    }

    stats.health += delta;
    stats.clamp();

    StatTick {
        health_delta: delta,
        shade_regen,
    }
}

/// Per-tick control snapshot from whatever drives the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub interact: bool,
    pub use_item: bool,
    /// Enter the nearest shelter, or leave the current one.
    pub shelter: bool,
    pub select_slot: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub pos: Vec2,
    pub size: Vec2,
    pub direction: Direction,
    /// Tiles per second.
    pub speed: f32,
    pub interaction_range: f32,
    /// The shelter the player is sitting in, if any.
    pub shelter: Option<EntityId>,
    pub stats: SurvivalStats,
    pub shade_message_cooldown: f32,
}

impl PlayerState {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            size: vec2(config::PLAYER_SIZE, config::PLAYER_SIZE),
            direction: Direction::Down,
            speed: config::PLAYER_SPEED_TILES,
            interaction_range: config::INTERACTION_RANGE,
            shelter: None,
            stats: SurvivalStats::default(),
            shade_message_cooldown: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Point just above the bottom edge, used for terrain checks.
    pub fn feet(&self) -> Vec2 {
        vec2(self.pos.x + self.size.x * 0.5, self.pos.y + self.size.y - 1.0)
    }

    pub fn is_inside_shelter(&self) -> bool {
        self.shelter.is_some()
    }

    pub fn is_swimming(&self, world: &WorldState) -> bool {
        world.tile_at_pixel(self.feet()).is_some_and(|t| t.is_water())
    }

    /// Where the player is reaching: a short step from the center in the facing direction.
    pub fn interaction_point(&self, world: &WorldState) -> Vec2 {
        let mut p = self.center();
        let reach = config::INTERACTION_REACH;
        match self.direction {
            Direction::Up => p.y -= reach,
            Direction::Down => p.y += reach + self.size.y * 0.5,
            Direction::Left => p.x -= reach,
            Direction::Right => p.x += reach,
        }
        vec2(
            p.x.clamp(0.0, world.width() - 1.0),
            p.y.clamp(0.0, world.height() - 1.0),
        )
    }

    pub fn within_range(&self, point: Vec2) -> bool {
        self.center().distance_squared(point) < self.interaction_range * self.interaction_range
    }

    /// Tile coordinates of the body center.
    pub fn center_tile(&self) -> (i32, i32) {
        TileGrid::tile_coords(self.center())
    }
}

/// Walk according to `intent`, resolving each axis separately against obstacles and the map edge.
pub fn move_player(player: &mut PlayerState, intent: &PlayerIntent, world: &WorldState, dt: f32) {
    if player.is_inside_shelter() {
        return;
    }

    let swim = if player.is_swimming(world) {
        config::SWIM_SPEED_MULT
    } else {
        1.0
    };
    let step = player.speed * config::TILE_SIZE * dt * swim;

    let mut delta = Vec2::ZERO;
    if intent.up {
        delta.y -= step;
        player.direction = Direction::Up;
    }
    if intent.down {
        delta.y += step;
        player.direction = Direction::Down;
    }
    if intent.left {
        delta.x -= step;
        player.direction = Direction::Left;
    }
    if intent.right {
        delta.x += step;
        player.direction = Direction::Right;
    }
    if delta == Vec2::ZERO {
        return;
    }

    let blockers = world.movement_blockers();
    let size = player.size;
    let blocked = |pos: Vec2| {
        let body = Rect::new(pos.x, pos.y, size.x, size.y);
        !world.contains_rect(&body) || blockers.iter().any(|b| body.overlaps(b))
    };

    let next_x = vec2(player.pos.x + delta.x, player.pos.y);
    if !blocked(next_x) {
        player.pos.x = next_x.x;
    }
    let next_y = vec2(player.pos.x, player.pos.y + delta.y);
    if !blocked(next_y) {
        player.pos.y = next_y.y;
    }

    player.pos.x = player.pos.x.clamp(0.0, (world.width() - player.size.x).max(0.0));
    player.pos.y = player.pos.y.clamp(0.0, (world.height() - player.size.y).max(0.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, Rock};
    use crate::terrain::Tile;

    fn uniform_world(tile: Tile) -> WorldState {
        WorldState::new(TileGrid::filled(20, 20, tile), Vec::new(), vec2(320.0, 320.0))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn swimming_at_night_drains_without_sun_terms() {
        let mut stats = SurvivalStats::default();
        let exposure = Exposure {
            swimming: true,
            sun_up: false,
            in_shade: false,
        };
        let tick = apply_stat_decay(&mut stats, exposure, 1.0);

        assert!(approx(stats.hunger, 100.0 - 0.4 * 1.5));
        assert!(approx(stats.thirst, 100.0 - 0.6 * 1.7));
        assert!(approx(tick.health_delta, -0.15));
        assert!(approx(stats.health, 99.85));
        assert!(!tick.shade_regen);
    }

    #[test]
    fn sun_burns_on_land_but_not_while_swimming() {
        let mut on_land = SurvivalStats::default();
        apply_stat_decay(
            &mut on_land,
            Exposure {
                sun_up: true,
                ..Default::default()
            },
            1.0,
        );
        assert!(approx(on_land.health, 100.0 - 1.75));

        let mut in_water = SurvivalStats::default();
        apply_stat_decay(
            &mut in_water,
            Exposure {
                swimming: true,
                sun_up: true,
                in_shade: false,
            },
            1.0,
        );
        assert!(approx(in_water.health, 100.0 - 0.15));
    }

    #[test]
    fn shade_regenerates_only_when_hurt() {
        let exposure = Exposure {
            sun_up: true,
            in_shade: true,
            swimming: false,
        };
        let mut full = SurvivalStats::default();
        assert!(!apply_stat_decay(&mut full, exposure, 1.0).shade_regen);
        assert_eq!(full.health, 100.0);

        let mut hurt = SurvivalStats {
            health: 50.0,
            ..Default::default()
        };
        assert!(apply_stat_decay(&mut hurt, exposure, 1.0).shade_regen);
        assert!(approx(hurt.health, 51.75));
    }

    #[test]
    fn empty_hunger_and_thirst_hurt_and_stay_at_zero() {
        let mut stats = SurvivalStats {
            health: 80.0,
            hunger: 0.1,
            thirst: 0.1,
        };
        apply_stat_decay(&mut stats, Exposure::default(), 1.0);
        assert_eq!(stats.hunger, 0.0);
        assert_eq!(stats.thirst, 0.0);
        assert!(approx(stats.health, 80.0 - 0.5 - 1.0));
    }

    #[test]
    fn below_half_adds_small_penalty() {
        let mut stats = SurvivalStats {
            health: 80.0,
            hunger: 40.0,
            thirst: 40.0,
        };
        apply_stat_decay(&mut stats, Exposure::default(), 1.0);
        assert!(approx(stats.health, 80.0 - 0.03 - 0.05));
    }

    #[test]
    fn stats_stay_clamped_for_extreme_steps() {
        let mut stats = SurvivalStats::default();
        for dt in [0.0, 0.1, 50.0, 1000.0] {
            for sun_up in [false, true] {
                apply_stat_decay(
                    &mut stats,
                    Exposure {
                        sun_up,
                        ..Default::default()
                    },
                    dt,
                );
                for v in [stats.health, stats.hunger, stats.thirst] {
                    assert!((0.0..=config::MAX_STAT).contains(&v));
                }
            }
        }
        stats.change_health(500.0);
        assert_eq!(stats.health, config::MAX_STAT);
        stats.change_thirst(-500.0);
        assert_eq!(stats.thirst, 0.0);
    }

    #[test]
    fn walks_at_tile_speed_and_faces_last_key() {
        let world = uniform_world(Tile::Grass);
        let mut player = PlayerState::new(vec2(100.0, 100.0));
        let intent = PlayerIntent {
            right: true,
            ..Default::default()
        };
        move_player(&mut player, &intent, &world, 1.0);
        assert!(approx(player.pos.x, 100.0 + 3.0 * 32.0));
        assert_eq!(player.direction, Direction::Right);
    }

    #[test]
    fn swimming_slows_movement() {
        let world = uniform_world(Tile::OceanWater);
        let mut player = PlayerState::new(vec2(100.0, 100.0));
        let intent = PlayerIntent {
            down: true,
            ..Default::default()
        };
        move_player(&mut player, &intent, &world, 0.5);
        assert!(approx(player.pos.y, 100.0 + 3.0 * 32.0 * 0.5 * 0.6));
    }

    #[test]
    fn rock_blocks_one_axis_only() {
        let mut world = uniform_world(Tile::Grass);
        world.add(Entity::Rock(Rock {
            rect: Rect::new(140.0, 90.0, 30.0, 60.0),
            remaining: 10,
        }));
        let mut player = PlayerState::new(vec2(100.0, 100.0));
        let intent = PlayerIntent {
            right: true,
            down: true,
            ..Default::default()
        };
        move_player(&mut player, &intent, &world, 0.1);
        assert_eq!(player.pos.x, 100.0);
        assert!(player.pos.y > 100.0);
    }

    #[test]
    fn cannot_leave_the_map() {
        let world = uniform_world(Tile::Grass);
        let mut player = PlayerState::new(vec2(2.0, 2.0));
        let intent = PlayerIntent {
            up: true,
            left: true,
            ..Default::default()
        };
        move_player(&mut player, &intent, &world, 1.0);
        assert_eq!(player.pos, vec2(2.0, 2.0));
    }

    #[test]
    fn interaction_point_reaches_past_feet_when_facing_down() {
        let world = uniform_world(Tile::Grass);
        let mut player = PlayerState::new(vec2(100.0, 100.0));
        player.direction = Direction::Down;
        let p = player.interaction_point(&world);
        assert!(approx(p.x, 116.0));
        assert!(approx(p.y, 116.0 + 19.2 + 16.0));
        player.direction = Direction::Left;
        assert!(approx(player.interaction_point(&world).x, 116.0 - 19.2));
    }
}
