use macroquad::prelude::*;
use ::rand::Rng;

use crate::config;
use crate::terrain::{Tile, TileGrid};
use crate::world::WorldState;

/// A fish leaping out of a lake, purely visual.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FishJump {
    pub x: f32,
    pub surface_y: f32,
    /// 0 at launch, 1 when it lands.
    pub progress: f32,
}

/// Result of pressing interact while facing water with a rod in hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastOutcome {
    NoRod,
    AlreadyFishing,
    CoolingDown,
    /// Fish were jumping, so the catch roll happened immediately.
    QuickCatch { caught: bool },
    Started,
}

/// Fishing timers and the jumping-fish event. Everything is an explicit timer ticked by the simulation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FishingState {
    pub is_fishing: bool,
    pub timer: f32,
    pub cooldown: f32,
    pub fish_jumping: bool,
    pub jump_timer: f32,
    pub animation: Option<FishJump>,
}

fn catch_chance(quick: bool, is_night: bool) -> f32 {
    match (quick, is_night) {
        (true, true) => config::QUICK_CATCH_NIGHT,
        (true, false) => config::QUICK_CATCH_DAY,
        (false, true) => config::FISH_CHANCE_NIGHT,
        (false, false) => config::FISH_CHANCE_DAY,
    }
}

impl FishingState {
    pub fn cast(&mut self, has_rod: bool, is_night: bool, rng: &mut impl Rng) -> CastOutcome {
        if !has_rod {
            return CastOutcome::NoRod;
        }
        if self.is_fishing {
            return CastOutcome::AlreadyFishing;
        }
        if self.cooldown > 0.0 {
            return CastOutcome::CoolingDown;
        }
        if self.fish_jumping {
            let caught = rng.gen::<f32>() < catch_chance(true, is_night);
            self.cooldown = config::FISHING_COOLDOWN;
            return CastOutcome::QuickCatch { caught };
        }
        self.is_fishing = true;
        self.timer = 0.0;
        CastOutcome::Started
    }

    /// Drop an in-progress cast without rolling.
    pub fn cancel(&mut self) {
        self.is_fishing = false;
        self.timer = 0.0;
    }

    pub fn tick_cooldown(&mut self, dt: f32) {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
    }

    /// Advance an active cast. Returns the catch roll when the wait finishes.
    pub fn tick_cast(&mut self, dt: f32, is_night: bool, rng: &mut impl Rng) -> Option<bool> {
        if !self.is_fishing {
            return None;
        }
        self.timer += dt;
        if self.timer < config::FISHING_DURATION {
            return None;
        }
        self.is_fishing = false;
        self.timer = 0.0;
        self.cooldown = config::FISHING_COOLDOWN;
        Some(rng.gen::<f32>() < catch_chance(false, is_night))
    }

    /// Count down or maybe start the jumping event. Returns true when it just started.
    pub fn tick_jumping(&mut self, dt: f32, player_center: Vec2, world: &WorldState, rng: &mut impl Rng) -> bool {
        if self.jump_timer > 0.0 {
            self.jump_timer -= dt;
            if self.jump_timer <= 0.0 {
                self.fish_jumping = false;
                self.jump_timer = 0.0;
            }
            return false;
        }
        if self.fish_jumping || self.is_fishing || self.cooldown > 0.0 {
            return false;
        }
        if rng.gen::<f32>() >= config::FISH_JUMPING_CHANCE_PER_SECOND * dt {
            return false;
        }

        self.fish_jumping = true;
        self.jump_timer = config::FISH_JUMPING_DURATION;
        if self.animation.is_none() {
            self.animation = find_jump_spot(player_center, world, rng);
            if self.animation.is_none() {
                log::debug!("no lake tile near the player for the fish jump");
            }
        }
        true
    }

    pub fn tick_animation(&mut self, dt: f32) {
        if let Some(anim) = &mut self.animation {
            anim.progress += dt / config::FISH_JUMP_ANIMATION_TIME;
            if anim.progress >= 1.0 {
                self.animation = None;
            }
        }
    }
}

fn find_jump_spot(center: Vec2, world: &WorldState, rng: &mut impl Rng) -> Option<FishJump> {
    let ts = config::TILE_SIZE;
    for _ in 0..config::FISH_JUMP_SPOT_ATTEMPTS {
        let angle = rng.gen::<f32>() * std::f32::consts::TAU;
        let dist = ts * 2.0 + rng.gen::<f32>() * ts * 4.0;
        let p = center + vec2(angle.cos(), angle.sin()) * dist;
        if p.x <= 0.0 || p.y <= 0.0 || p.x >= world.width() || p.y >= world.height() {
            continue;
        }
        let (_, ty) = TileGrid::tile_coords(p);
        if world.tile_at_pixel(p) == Some(Tile::Water) {
            return Some(FishJump {
                x: p.x,
                surface_y: ty as f32 * ts + ts * 0.8,
                progress: 0.0,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn lake_world() -> WorldState {
        let mut grid = TileGrid::filled(20, 20, Tile::Grass);
        for y in 0..20 {
            for x in 0..20 {
                if (x as i32 - 10).abs() > 1 || (y as i32 - 10).abs() > 1 {
                    grid.set(x, y, Tile::Water);
                }
            }
        }
        WorldState::new(grid, Vec::new(), vec2(320.0, 320.0))
    }

    #[test]
    fn cast_needs_rod_and_respects_cooldown() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut fishing = FishingState::default();
        assert_eq!(fishing.cast(false, false, &mut rng), CastOutcome::NoRod);

        assert_eq!(fishing.cast(true, false, &mut rng), CastOutcome::Started);
        assert_eq!(fishing.cast(true, false, &mut rng), CastOutcome::AlreadyFishing);

        fishing.cancel();
        fishing.cooldown = 0.5;
        assert_eq!(fishing.cast(true, false, &mut rng), CastOutcome::CoolingDown);
    }

    #[test]
    fn cast_resolves_after_wait_and_sets_cooldown() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut fishing = FishingState::default();
        fishing.cast(true, true, &mut rng);

        let mut result = None;
        for _ in 0..24 {
            assert!(result.is_none());
            result = fishing.tick_cast(0.1, true, &mut rng);
        }
        assert!(result.is_none());
        assert!(fishing.tick_cast(0.2, true, &mut rng).is_some());
        assert!(!fishing.is_fishing);
        assert_eq!(fishing.cooldown, config::FISHING_COOLDOWN);

        fishing.tick_cooldown(5.0);
        assert_eq!(fishing.cooldown, 0.0);
    }

    #[test]
    fn jumping_fish_allow_quick_catch() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut fishing = FishingState {
            fish_jumping: true,
            jump_timer: 8.0,
            ..Default::default()
        };
        let outcome = fishing.cast(true, true, &mut rng);
        assert!(matches!(outcome, CastOutcome::QuickCatch { .. }));
        assert!(!fishing.is_fishing);
        assert!(fishing.cooldown > 0.0);
    }

    #[test]
    fn quick_catch_rate_beats_normal_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let trials = 2000;
        let quick = (0..trials)
            .filter(|_| {
                let mut f = FishingState {
                    fish_jumping: true,
                    ..Default::default()
                };
                f.cast(true, false, &mut rng) == CastOutcome::QuickCatch { caught: true }
            })
            .count();
        let rate = quick as f32 / trials as f32;
        assert!((rate - 0.7).abs() < 0.05, "quick catch rate {rate}");
    }

    #[test]
    fn jumping_event_starts_and_expires() {
        let world = lake_world();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut fishing = FishingState::default();

        // A huge dt makes the start roll certain.
        assert!(fishing.tick_jumping(1000.0, vec2(336.0, 336.0), &world, &mut rng));
        assert!(fishing.fish_jumping);
        let anim = fishing.animation.unwrap();
        assert_eq!(world.tile_at_pixel(vec2(anim.x, anim.surface_y)), Some(Tile::Water));

        for _ in 0..79 {
            fishing.tick_jumping(0.1, vec2(336.0, 336.0), &world, &mut rng);
        }
        assert!(fishing.fish_jumping);
        fishing.tick_jumping(0.2, vec2(336.0, 336.0), &world, &mut rng);
        assert!(!fishing.fish_jumping);
    }

    #[test]
    fn no_jumping_while_fishing() {
        let world = lake_world();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut fishing = FishingState {
            is_fishing: true,
            ..Default::default()
        };
        assert!(!fishing.tick_jumping(1000.0, vec2(336.0, 336.0), &world, &mut rng));
    }

    #[test]
    fn animation_finishes() {
        let mut fishing = FishingState {
            animation: Some(FishJump {
                x: 10.0,
                surface_y: 10.0,
                progress: 0.0,
            }),
            ..Default::default()
        };
        fishing.tick_animation(0.5);
        assert!(fishing.animation.is_some());
        fishing.tick_animation(0.3);
        assert!(fishing.animation.is_none());
    }
}
