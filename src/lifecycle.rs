use macroquad::prelude::*;
use ::rand::Rng;

use crate::config;
use crate::entity::{Driftwood, Entity, EntityId, SignalFire};
use crate::terrain::{Tile, TileGrid};
use crate::world::WorldState;

/// Advance stump regrowth for every tree. Returns how many trees regrew this tick.
pub fn update_trees(world: &mut WorldState, dt: f32) -> usize {
    let mut regrown = 0;
    for tree in world.trees.iter_mut().map(|(_, t)| t) {
        if !tree.is_stump {
            continue;
        }
        tree.regrow_timer += dt;
        if tree.regrow_timer >= tree.regrow_time {
            tree.is_stump = false;
            tree.remaining = tree.initial_resource;
            tree.regrow_timer = 0.0;
            regrown += 1;
        }
    }
    regrown
}

/// Advance shrub regrowth. The stump timer is measured in day fractions.
pub fn update_shrubs(world: &mut WorldState, dt: f32, day_length: f32) -> usize {
    let mut regrown = 0;
    for shrub in world.shrubs.iter_mut().map(|(_, s)| s) {
        if !shrub.is_stump {
            continue;
        }
        if day_length > 0.0 {
            shrub.stump_timer = (shrub.stump_timer - dt / day_length).max(0.0);
        }
        shrub.regrow_timer += dt;
        if shrub.regrow_timer >= shrub.regrow_time {
            shrub.health = shrub.max_health;
            shrub.is_stump = false;
            shrub.regrow_timer = 0.0;
            shrub.stump_timer = 0.0;
            regrown += 1;
        }
    }
    regrown
}

/// Maybe wash a new piece of driftwood onto a beach tile.
pub fn spawn_driftwood(world: &mut WorldState, dt: f32, day_length: f32, rng: &mut impl Rng) -> Option<EntityId> {
    if day_length <= 0.0 || world.driftwood.len() >= config::MAX_DRIFTWOOD_COUNT {
        return None;
    }
    let chance = config::DRIFTWOOD_SPAWN_CHANCE_PER_DAY / day_length * dt;
    if rng.gen::<f32>() > chance {
        return None;
    }

    let (tx, ty) = find_beach_tile(world, rng)?;
    let ts = config::TILE_SIZE;
    let w = ts * rng.gen_range(0.8..1.5);
    let h = ts * rng.gen_range(0.2..0.4);
    let x = tx as f32 * ts + (ts - w) / 2.0 + (rng.gen::<f32>() - 0.5) * ts * 0.4;
    let y = ty as f32 * ts + (ts - h) / 2.0 + (rng.gen::<f32>() - 0.5) * ts * 0.4;
    let wood = rng.gen_range(config::DRIFTWOOD_YIELD_MIN..=config::DRIFTWOOD_YIELD_MAX);

    let id = world.add(Entity::Driftwood(Driftwood {
        rect: Rect::new(x, y, w, h),
        wood,
    }));
    log::debug!("driftwood ({wood} wood) washed up at tile ({tx}, {ty})");
    Some(id)
}

fn find_beach_tile(world: &WorldState, rng: &mut impl Rng) -> Option<(i32, i32)> {
    let spacing = config::TILE_SIZE * config::DRIFTWOOD_SPACING_TILES;
    for _ in 0..config::DRIFTWOOD_SPAWN_ATTEMPTS {
        let tx = rng.gen_range(0..world.grid.width) as i32;
        let ty = rng.gen_range(0..world.grid.height) as i32;
        if world.tile_at(tx, ty) != Some(Tile::Sand) {
            continue;
        }
        let center = TileGrid::tile_center(tx, ty);
        let crowded = world
            .driftwood
            .values()
            .any(|d| d.rect.center().distance_squared(center) < spacing * spacing);
        if !crowded {
            return Some((tx, ty));
        }
    }
    None
}

/// Burn fuel on every lit fire. Returns true if at least one is still burning.
pub fn burn_signal_fires(world: &mut WorldState, dt: f32) -> bool {
    let mut any_burning = false;
    for fire in world.signal_fires.iter_mut().map(|(_, f)| f) {
        if fire.burn(dt) {
            any_burning = true;
        }
    }
    any_burning
}

impl SignalFire {
    /// Consume fuel for `dt` seconds. True if the fire was lit and still is.
    pub fn burn(&mut self, dt: f32) -> bool {
        if !self.is_burning {
            return false;
        }
        self.fuel -= dt * self.burn_rate;
        if self.fuel <= 0.0 {
            self.fuel = 0.0;
            self.is_burning = false;
        }
        self.is_burning
    }

    /// Feed `wood` pieces into the fire and light it.
    pub fn add_fuel(&mut self, wood: u32) {
        self.fuel = (self.fuel + wood as f32 * self.fuel_per_wood).min(self.max_fuel);
        self.is_burning = true;
    }
}
