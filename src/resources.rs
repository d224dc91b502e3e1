use macroquad::prelude::*;
use ::rand::distributions::{Distribution, WeightedIndex};
use ::rand::Rng;

use crate::config;
use crate::entity::{Entity, Rock, Shrub, Tree};
use crate::terrain::Tile;
use crate::world::WorldState;

/// Which terrain a resource may stand on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Footing {
    GrassOnly,
    AnyLand,
}

impl Footing {
    fn accepts(self, tile: Tile) -> bool {
        match self {
            Footing::GrassOnly => tile == Tile::Grass,
            Footing::AnyLand => tile.is_land(),
        }
    }
}

/// A rock size class with its own stone range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RockTier {
    pub name: &'static str,
    pub size_tiles: f32,
    pub min_stone: u32,
    pub max_stone: u32,
    pub weight: u32,
}

pub const ROCK_TIERS: [RockTier; 2] = [
    RockTier {
        name: "medium",
        size_tiles: config::MEDIUM_ROCK_TILES,
        min_stone: 60,
        max_stone: 120,
        weight: config::MEDIUM_ROCK_WEIGHT,
    },
    RockTier {
        name: "large",
        size_tiles: config::LARGE_ROCK_TILES,
        min_stone: 120,
        max_stone: 250,
        weight: config::LARGE_ROCK_WEIGHT,
    },
];

/// Requested vs placed counts for one category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementTally {
    pub requested: usize,
    pub placed: usize,
}

impl PlacementTally {
    pub fn is_short(&self) -> bool {
        self.placed < self.requested
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementReport {
    pub trees: PlacementTally,
    pub rocks: PlacementTally,
    pub shrubs: PlacementTally,
}

/// Rejection-sampling scatter of trees, rocks and shrubs around a spawn point.
pub struct ResourcePlacer {
    spawn: Vec2,
}

impl ResourcePlacer {
    pub fn new(spawn: Vec2) -> Self {
        Self { spawn }
    }

    /// Target count for a category, scaled linearly with the grid area.
    pub fn scaled_count(world: &WorldState, per_reference: f32) -> usize {
        let area = (world.grid.width * world.grid.height) as f32;
        (per_reference * area / config::REFERENCE_AREA_TILES).floor() as usize
    }

    pub fn populate(&self, world: &mut WorldState, rng: &mut impl Rng) -> PlacementReport {
        let report = PlacementReport {
            trees: self.place_trees(world, rng),
            rocks: self.place_rocks(world, rng),
            shrubs: self.place_shrubs(world, rng),
        };

        for (label, tally) in [("trees", report.trees), ("rocks", report.rocks), ("shrubs", report.shrubs)] {
            if tally.is_short() {
                log::warn!("placed only {}/{} {label}", tally.placed, tally.requested);
            }
        }
        log::info!(
            "resources placed: {} trees, {} rocks, {} shrubs",
            report.trees.placed,
            report.rocks.placed,
            report.shrubs.placed
        );
        report
    }

    /// All placement constraints for a candidate rectangle.
    pub fn can_place(&self, world: &WorldState, rect: Rect, footing: Footing) -> bool {
        if !world.contains_rect(&rect) {
            return false;
        }
        let center = rect.center();
        match world.tile_at_pixel(center) {
            Some(tile) if tile.is_land() && footing.accepts(tile) => {}
            _ => return false,
        }

        let spawn_center = self.spawn + vec2(config::TILE_SIZE * 0.5, config::TILE_SIZE * 0.5);
        let clearance = config::TILE_SIZE * config::SPAWN_CLEARANCE_TILES;
        if center.distance_squared(spawn_center) < clearance * clearance {
            return false;
        }

        let buffer = config::TILE_SIZE * 0.5;
        let padded = Rect::new(
            rect.x - buffer,
            rect.y - buffer,
            rect.w + buffer * 2.0,
            rect.h + buffer * 2.0,
        );
        let blocked = world
            .trees
            .values()
            .map(|t| t.rect)
            .chain(world.rocks.values().map(|r| r.rect))
            .chain(world.shrubs.values().map(|s| s.rect))
            .any(|other| padded.overlaps(&other));
        !blocked
    }

    fn random_tile(world: &WorldState, rng: &mut impl Rng) -> (i32, i32, Option<Tile>) {
        let tx = rng.gen_range(0..world.grid.width) as i32;
        let ty = rng.gen_range(0..world.grid.height) as i32;
        (tx, ty, world.tile_at(tx, ty))
    }

    fn place_trees(&self, world: &mut WorldState, rng: &mut impl Rng) -> PlacementTally {
        let requested = Self::scaled_count(world, config::TREE_COUNT);
        let mut placed = 0;
        let w = config::TILE_SIZE * config::TREE_WIDTH_TILES;
        let h = config::TILE_SIZE * config::TREE_HEIGHT_TILES;
        let ts = config::TILE_SIZE;

        for _ in 0..requested * config::TREE_ATTEMPT_MULT {
            if placed >= requested {
                break;
            }
            let (tx, ty, tile) = Self::random_tile(world, rng);
            if tile != Some(Tile::Grass) {
                continue;
            }
            let x = tx as f32 * ts + (ts - w) / 2.0 + (rng.gen::<f32>() - 0.5) * ts * 0.2;
            let y = ty as f32 * ts + (ts - h);
            let rect = Rect::new(x, y, w, h);
            if self.can_place(world, rect, Footing::GrassOnly) {
                world.add(Entity::Tree(Tree::new(rect)));
                placed += 1;
            }
        }
        PlacementTally { requested, placed }
    }

    fn place_rocks(&self, world: &mut WorldState, rng: &mut impl Rng) -> PlacementTally {
        let requested = Self::scaled_count(world, config::ROCK_COUNT);
        let mut placed = 0;
        let ts = config::TILE_SIZE;
        let weights = WeightedIndex::new(ROCK_TIERS.iter().map(|t| t.weight));

        let weights = match weights {
            Ok(w) => w,
            Err(e) => {
                log::error!("rock tier weights invalid: {e}");
                return PlacementTally { requested, placed };
            }
        };

        for _ in 0..requested * config::ROCK_ATTEMPT_MULT {
            if placed >= requested {
                break;
            }
            let tier = ROCK_TIERS[weights.sample(rng)];
            let w = ts * tier.size_tiles * rng.gen_range(0.9..1.1);
            let h = ts * tier.size_tiles * rng.gen_range(0.9..1.1);
            let stone = rng.gen_range(tier.min_stone..=tier.max_stone);

            let (tx, ty, tile) = Self::random_tile(world, rng);
            if !tile.is_some_and(Tile::is_land) {
                continue;
            }
            let x = tx as f32 * ts + (ts - w) / 2.0 + (rng.gen::<f32>() - 0.5) * ts * 0.2;
            let y = ty as f32 * ts + (ts - h) / 2.0 + (rng.gen::<f32>() - 0.5) * ts * 0.2;
            let rect = Rect::new(x, y, w, h);
            if self.can_place(world, rect, Footing::AnyLand) {
                world.add(Entity::Rock(Rock { rect, remaining: stone }));
                placed += 1;
            }
        }
        PlacementTally { requested, placed }
    }

    fn place_shrubs(&self, world: &mut WorldState, rng: &mut impl Rng) -> PlacementTally {
        let requested = Self::scaled_count(world, config::SHRUB_COUNT);
        let mut placed = 0;
        let ts = config::TILE_SIZE;
        // One shrub shape per island.
        let w = ts * rng.gen_range(0.8..1.2);
        let h = ts * rng.gen_range(0.7..1.0);

        for _ in 0..requested * config::SHRUB_ATTEMPT_MULT {
            if placed >= requested {
                break;
            }
            let (tx, ty, tile) = Self::random_tile(world, rng);
            if tile != Some(Tile::Grass) {
                continue;
            }
            let x = tx as f32 * ts + (ts - w) / 2.0 + (rng.gen::<f32>() - 0.5) * ts * 0.3;
            let y = ty as f32 * ts + (ts - h) / 2.0 + (rng.gen::<f32>() - 0.5) * ts * 0.3;
            let rect = Rect::new(x, y, w, h);
            if self.can_place(world, rect, Footing::GrassOnly) {
                world.add(Entity::Shrub(Shrub::new(rect)));
                placed += 1;
            }
        }
        PlacementTally { requested, placed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainParams;
    use crate::noise_field::NoiseField;
    use crate::terrain::{TerrainGenerator, TileGrid};
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generated_world(seed: u64) -> (WorldState, ChaCha8Rng) {
        let params = TerrainParams::default();
        let noise = NoiseField::from_game_seed(seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let terrain = TerrainGenerator::new(&params, &noise).generate(
            config::WORLD_WIDTH_TILES,
            config::WORLD_HEIGHT_TILES,
            &mut rng,
        );
        (
            WorldState::new(terrain.grid, terrain.grass_patches, terrain.spawn),
            rng,
        )
    }

    fn padded(rect: Rect) -> Rect {
        let b = config::TILE_SIZE * 0.5;
        Rect::new(rect.x - b, rect.y - b, rect.w + 2.0 * b, rect.h + 2.0 * b)
    }

    #[test]
    fn default_counts_match_reference_area() {
        let world = WorldState::new(TileGrid::filled(45, 28, Tile::Grass), Vec::new(), Vec2::ZERO);
        assert_eq!(ResourcePlacer::scaled_count(&world, config::TREE_COUNT), 50);
        assert_eq!(ResourcePlacer::scaled_count(&world, config::ROCK_COUNT), 15);
        assert_eq!(ResourcePlacer::scaled_count(&world, config::SHRUB_COUNT), 30);
    }

    #[test]
    fn placed_resources_respect_all_constraints() {
        for seed in [3, 11, 42] {
            let (mut world, mut rng) = generated_world(seed);
            let placer = ResourcePlacer::new(world.spawn);
            placer.populate(&mut world, &mut rng);

            let spawn_center = world.spawn + vec2(16.0, 16.0);
            let min_dist = config::TILE_SIZE * config::SPAWN_CLEARANCE_TILES;
            let mut rects: Vec<Rect> = Vec::new();

            for tree in world.trees.values() {
                assert_eq!(world.tile_at_pixel(tree.rect.center()), Some(Tile::Grass));
                rects.push(tree.rect);
            }
            for shrub in world.shrubs.values() {
                assert_eq!(world.tile_at_pixel(shrub.rect.center()), Some(Tile::Grass));
                rects.push(shrub.rect);
            }
            for rock in world.rocks.values() {
                assert!(world.tile_at_pixel(rock.rect.center()).unwrap().is_land());
                assert!((60..=250).contains(&rock.remaining));
                rects.push(rock.rect);
            }

            for (i, a) in rects.iter().enumerate() {
                assert!(world.contains_rect(a));
                assert!(a.center().distance(spawn_center) >= min_dist);
                for b in rects.iter().skip(i + 1) {
                    assert!(!padded(*a).overlaps(b));
                }
            }
        }
    }

    #[test]
    fn all_water_map_places_nothing_without_failing() {
        let mut world = WorldState::new(TileGrid::filled(45, 28, Tile::OceanWater), Vec::new(), Vec2::ZERO);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = ResourcePlacer::new(Vec2::ZERO).populate(&mut world, &mut rng);
        assert_eq!(report.trees.placed, 0);
        assert!(report.trees.is_short());
        assert_eq!(world.rocks.len(), 0);
    }

    #[test]
    fn rocks_accept_sand_but_trees_do_not() {
        let world = WorldState::new(TileGrid::filled(45, 28, Tile::Sand), Vec::new(), Vec2::ZERO);
        let placer = ResourcePlacer::new(Vec2::ZERO);
        let rect = Rect::new(640.0, 480.0, 28.0, 28.0);
        assert!(placer.can_place(&world, rect, Footing::AnyLand));
        assert!(!placer.can_place(&world, rect, Footing::GrassOnly));
    }

    #[test]
    fn near_spawn_is_rejected() {
        let world = WorldState::new(TileGrid::filled(45, 28, Tile::Grass), Vec::new(), vec2(640.0, 448.0));
        let placer = ResourcePlacer::new(world.spawn);
        let close = Rect::new(700.0, 470.0, 28.0, 28.0);
        let far = Rect::new(100.0, 100.0, 28.0, 28.0);
        assert!(!placer.can_place(&world, close, Footing::GrassOnly));
        assert!(placer.can_place(&world, far, Footing::GrassOnly));
    }

    #[test]
    fn weighted_tiers_favor_medium_rocks() {
        let weights = WeightedIndex::new(ROCK_TIERS.iter().map(|t| t.weight)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let medium = (0..3000).filter(|_| weights.sample(&mut rng) == 0).count();
        assert!(medium > 1800 && medium < 2200, "medium picks: {medium}");
    }
}
