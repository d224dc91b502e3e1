use macroquad::prelude::*;
use ::rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{self, GameConfig};
use crate::entity::EntityId;
use crate::fishing::FishingState;
use crate::hooks::{Notifier, RunRecorder, RunSummary};
use crate::interaction::{self, Interaction};
use crate::inventory::{Inventory, Item};
use crate::lifecycle;
use crate::noise_field::NoiseField;
use crate::player::{self, Exposure, PlayerIntent, PlayerState};
use crate::resources::ResourcePlacer;
use crate::shadow::{self, Shadow};
use crate::shark::{SharkEvent, SharkState};
use crate::terrain::TerrainGenerator;
use crate::time::TimeState;
use crate::world::WorldState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathCause {
    Health,
    Hunger,
    Thirst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Rescued,
    Died(DeathCause),
    SharkAttack,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Rescued => "A ship spotted your signal fire. You've been rescued!",
            Outcome::Died(DeathCause::Health) => "Your health reached zero.",
            Outcome::Died(DeathCause::Hunger) => "You succumbed to hunger.",
            Outcome::Died(DeathCause::Thirst) => "You succumbed to thirst.",
            Outcome::SharkAttack => "A shark attacked you in the deep water!",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Outcome::Rescued => "RESCUED",
            _ => "GAME OVER",
        }
    }
}

/// Overall game flow. `Ended` is terminal; a new run builds a new context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    NotStarted,
    Running,
    Paused,
    Ended(Outcome),
}

/// Everything one run mutates, passed explicitly to each subsystem.
pub struct SimulationContext {
    pub world: WorldState,
    pub player: PlayerState,
    pub inventory: Inventory,
    pub fishing: FishingState,
    pub shark: SharkState,
    pub time: TimeState,
    /// Tree shadows for the current tick.
    pub shadows: Vec<(EntityId, Shadow)>,
    pub rng: ChaCha8Rng,
}

impl SimulationContext {
    /// Generate terrain and resources for `seed` and place the player at the spawn point.
    pub fn generate(config: &GameConfig, seed: u64) -> Self {
        let noise = NoiseField::from_game_seed(seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let terrain = TerrainGenerator::new(&config.terrain, &noise).generate(
            config.width_tiles,
            config.height_tiles,
            &mut rng,
        );
        let spawn = terrain.spawn;
        let mut world = WorldState::new(terrain.grid, terrain.grass_patches, spawn);
        let report = ResourcePlacer::new(spawn).populate(&mut world, &mut rng);
        log::info!(
            "world seed {seed}: {} trees, {} rocks, {} shrubs, spawn ({:.0}, {:.0})",
            report.trees.placed,
            report.rocks.placed,
            report.shrubs.placed,
            spawn.x,
            spawn.y
        );
        Self::from_parts(world, rng)
    }

    /// Wrap an existing world. The player starts at `world.spawn`.
    pub fn with_world(world: WorldState, seed: u64) -> Self {
        Self::from_parts(world, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_parts(world: WorldState, rng: ChaCha8Rng) -> Self {
        let player = PlayerState::new(world.spawn);
        Self {
            world,
            player,
            inventory: Inventory::new(),
            fishing: FishingState::default(),
            shark: SharkState::default(),
            time: TimeState::default(),
            shadows: Vec::new(),
            rng,
        }
    }

    /// Inside a shelter or under a tree shadow.
    pub fn in_shade(&self) -> bool {
        self.player.is_inside_shelter() || shadow::body_in_shade(self.player.rect(), &self.shadows)
    }
}

/// Per-tick rescue roll while a signal fire burns.
pub fn rescue_roll(day: u32, any_burning: bool, dt: f32, day_length: f32, rng: &mut impl Rng) -> bool {
    if !any_burning || day < config::RESCUE_START_DAY || day_length <= 0.0 {
        return false;
    }
    rng.gen::<f32>() < config::BASE_RESCUE_CHANCE * dt / day_length
}

fn death_cause(player: &PlayerState) -> Option<DeathCause> {
    let stats = &player.stats;
    if stats.health <= 0.0 {
        Some(DeathCause::Health)
    } else if stats.hunger <= 0.0 {
        Some(DeathCause::Hunger)
    } else if stats.thirst <= 0.0 {
        Some(DeathCause::Thirst)
    } else {
        None
    }
}

/// The survival game: one context plus the phase machine and external hooks.
pub struct Simulation<N: Notifier, R: RunRecorder> {
    pub ctx: SimulationContext,
    pub phase: GamePhase,
    pub seed: u64,
    pub notifier: N,
    pub recorder: R,
    /// What interact would do this tick; the renderer highlights it.
    pub target: Interaction,
    sunset_warned: bool,
    last_prompt: Option<String>,
}

impl<N: Notifier, R: RunRecorder> Simulation<N, R> {
    /// Build a fresh world. Uses the configured seed, or a random one.
    pub fn new(config: &GameConfig, notifier: N, recorder: R) -> Self {
        let seed = config.seed.unwrap_or_else(|| ::rand::thread_rng().gen());
        Self::from_context(SimulationContext::generate(config, seed), seed, notifier, recorder)
    }

    pub fn from_context(ctx: SimulationContext, seed: u64, notifier: N, recorder: R) -> Self {
        Self {
            ctx,
            phase: GamePhase::NotStarted,
            seed,
            notifier,
            recorder,
            target: Interaction::None,
            sunset_warned: false,
            last_prompt: None,
        }
    }

    /// Throw away the current run and generate a new island.
    pub fn restart(&mut self, config: &GameConfig) {
        self.seed = config.seed.unwrap_or_else(|| ::rand::thread_rng().gen());
        self.ctx = SimulationContext::generate(config, self.seed);
        self.phase = GamePhase::NotStarted;
        self.target = Interaction::None;
        self.sunset_warned = false;
        self.last_prompt = None;
        self.notifier.prompt(None);
    }

    pub fn start(&mut self) {
        if self.phase != GamePhase::NotStarted {
            return;
        }
        self.phase = GamePhase::Running;
        log::info!("game started (seed {})", self.seed);
        self.notifier
            .message("You wake up on a deserted island. Find water, food and a way home.", 5000);
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            other => other,
        };
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            day: self.ctx.time.day,
            total_items_collected: self.ctx.inventory.total_items_collected,
            fish_caught: self.ctx.inventory.fish_caught,
        }
    }

    /// Craft from the crafting panel. Only while running.
    pub fn craft(&mut self, item: Item) {
        if !self.is_running() {
            return;
        }
        match self.ctx.inventory.craft(item) {
            Ok(()) => self.notifier.message(&format!("Crafted {}!", item.name()), 2000),
            Err(e) => self.notifier.message(&e.to_string(), 2000),
        }
    }

    /// Advance one frame. Does nothing unless the game is running.
    pub fn tick(&mut self, dt: f32, intent: &PlayerIntent) {
        if !self.is_running() {
            return;
        }
        let dt = dt.clamp(0.0, config::MAX_DT);
        if let Some(outcome) = self.step(dt, intent) {
            self.end_game(outcome);
        }
    }

    fn step(&mut self, dt: f32, intent: &PlayerIntent) -> Option<Outcome> {
        let ctx = &mut self.ctx;

        ctx.shadows = shadow::compute_shadows(&ctx.world, &ctx.time);
        ctx.fishing.tick_animation(dt);

        // Clock
        if let Some(day) = ctx.time.advance(dt) {
            log::info!("day {day} begins");
            self.notifier.message(&format!("Day {day} has begun."), 3000);
        }
        if ctx.time.is_evening() {
            if !self.sunset_warned {
                self.sunset_warned = true;
                self.notifier.message("Sun is setting. It might get cold...", 3000);
            }
        } else {
            self.sunset_warned = false;
        }

        // Stats
        let exposure = Exposure {
            swimming: ctx.player.is_swimming(&ctx.world),
            sun_up: ctx.time.sun_up(),
            in_shade: ctx.in_shade(),
        };
        let stat_tick = player::apply_stat_decay(&mut ctx.player.stats, exposure, dt);
        if stat_tick.shade_regen {
            if ctx.player.shade_message_cooldown <= 0.0 {
                self.notifier.message("+Health (In Shade)", 1000);
                ctx.player.shade_message_cooldown = config::SHADE_REGEN_MESSAGE_COOLDOWN;
            } else {
                ctx.player.shade_message_cooldown -= dt;
            }
        } else {
            ctx.player.shade_message_cooldown = 0.0;
        }

        ctx.fishing.tick_cooldown(dt);

        // Movement cancels an in-progress cast
        if let Some(slot) = intent.select_slot {
            ctx.inventory.select(slot);
        }
        let before = ctx.player.pos;
        player::move_player(&mut ctx.player, intent, &ctx.world, dt);
        if ctx.fishing.is_fishing && ctx.player.pos != before {
            ctx.fishing.cancel();
            self.notifier.message("Stopped fishing.", 1000);
        }

        // Fishing
        if let Some(caught) = ctx.fishing.tick_cast(dt, ctx.time.is_night, &mut ctx.rng) {
            interaction::finish_cast(ctx, caught, &mut self.notifier);
        }
        let center = ctx.player.center();
        if ctx.fishing.tick_jumping(dt, center, &ctx.world, &mut ctx.rng) {
            self.notifier.message("Fish are jumping nearby!", 3000);
        }

        // Player actions
        if intent.shelter {
            interaction::toggle_shelter(ctx, &mut self.notifier);
        }
        if intent.use_item {
            interaction::use_selected_item(ctx, &mut self.notifier);
        }
        if intent.interact {
            let target = interaction::peek_target(ctx);
            interaction::perform(ctx, target, &mut self.notifier);
        }
        self.target = interaction::peek_target(ctx);
        let prompt = interaction::prompt_text(ctx, self.target);
        if prompt != self.last_prompt {
            self.notifier.prompt(prompt.as_deref());
            self.last_prompt = prompt;
        }

        // Regrowth and driftwood
        let day_length = ctx.time.day_length;
        lifecycle::update_trees(&mut ctx.world, dt);
        lifecycle::update_shrubs(&mut ctx.world, dt, day_length);
        if let Some(id) = lifecycle::spawn_driftwood(&mut ctx.world, dt, day_length, &mut ctx.rng) {
            log::debug!("driftwood washed ashore: {id:?}");
        }

        // Shark
        let center = ctx.player.center();
        if ctx.shark.try_spawn(&ctx.world, center, &mut ctx.rng) {
            self.notifier.message("You sense a large presence nearby in the OCEAN...", 4000);
        }
        match ctx.shark.update(&ctx.world, center, dt, &mut ctx.rng) {
            SharkEvent::Attack => return Some(Outcome::SharkAttack),
            SharkEvent::Despawned => log::info!("shark lost interest and left"),
            SharkEvent::None => {}
        }

        // Signal fires and rescue
        let burning = lifecycle::burn_signal_fires(&mut ctx.world, dt);
        if rescue_roll(ctx.time.day, burning, dt, day_length, &mut ctx.rng) {
            return Some(Outcome::Rescued);
        }

        death_cause(&ctx.player).map(Outcome::Died)
    }

    /// Enter the terminal phase. Later calls are no-ops.
    fn end_game(&mut self, outcome: Outcome) {
        if matches!(self.phase, GamePhase::Ended(_)) {
            return;
        }
        self.phase = GamePhase::Ended(outcome);
        self.ctx.shark.deactivate();
        self.ctx.fishing.cancel();
        self.last_prompt = None;
        self.notifier.prompt(None);
        self.notifier.message(outcome.message(), 10_000);

        let summary = self.summary();
        log::info!(
            "run over: {outcome:?} on day {}, {} items, {} fish",
            summary.day,
            summary.total_items_collected,
            summary.fish_caught
        );
        self.recorder.record_run(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, SignalFire, Tree};
    use crate::hooks::MessageLog;
    use crate::player::Direction;
    use crate::shark::SharkMode;
    use crate::terrain::{Tile, TileGrid};

    type TestSim = Simulation<MessageLog, Vec<RunSummary>>;

    fn uniform_sim(tile: Tile) -> TestSim {
        let world = WorldState::new(TileGrid::filled(30, 30, tile), Vec::new(), vec2(464.0, 464.0));
        let ctx = SimulationContext::with_world(world, 11);
        let mut sim = Simulation::from_context(ctx, 11, MessageLog::new(64), Vec::new());
        sim.start();
        sim
    }

    fn idle() -> PlayerIntent {
        PlayerIntent::default()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn generated_game_waits_for_start() {
        let config = GameConfig {
            seed: Some(2024),
            ..Default::default()
        };
        let mut sim: TestSim = Simulation::new(&config, MessageLog::new(8), Vec::new());
        assert_eq!(sim.phase, GamePhase::NotStarted);
        let (tx, ty) = sim.ctx.player.center_tile();
        assert!(sim.ctx.world.tile_at(tx, ty).is_some_and(Tile::is_land));
        assert!(sim.ctx.world.grid.count(Tile::OceanWater) > 0);

        sim.tick(0.1, &idle());
        assert_eq!(sim.ctx.time.current, 0.0);

        sim.start();
        sim.tick(0.1, &idle());
        assert!(sim.ctx.time.current > 0.0);
    }

    #[test]
    fn same_seed_builds_same_island() {
        let config = GameConfig {
            seed: Some(77),
            ..Default::default()
        };
        let a: TestSim = Simulation::new(&config, MessageLog::new(8), Vec::new());
        let b: TestSim = Simulation::new(&config, MessageLog::new(8), Vec::new());
        assert_eq!(a.ctx.world.grid, b.ctx.world.grid);
        assert_eq!(a.ctx.world.trees.len(), b.ctx.world.trees.len());
        assert_eq!(a.ctx.player.pos, b.ctx.player.pos);
    }

    #[test]
    fn swimming_in_a_lake_at_night_only_drains() {
        let mut sim = uniform_sim(Tile::Water);
        assert!(sim.ctx.time.is_night);
        sim.tick(0.1, &idle());

        let stats = sim.ctx.player.stats;
        assert!(approx(stats.hunger, 100.0 - 0.4 * 1.5 * 0.1));
        assert!(approx(stats.thirst, 100.0 - 0.6 * 1.7 * 0.1));
        assert!(approx(stats.health, 100.0 - 0.15 * 0.1));
    }

    #[test]
    fn large_frame_time_is_clamped() {
        let mut sim = uniform_sim(Tile::Grass);
        sim.tick(5.0, &idle());
        assert!(approx(sim.ctx.time.current, config::MAX_DT));
    }

    #[test]
    fn paused_game_does_not_advance() {
        let mut sim = uniform_sim(Tile::Grass);
        sim.tick(0.1, &idle());
        let before_time = sim.ctx.time.current;
        let before_stats = sim.ctx.player.stats;

        sim.toggle_pause();
        assert_eq!(sim.phase, GamePhase::Paused);
        for _ in 0..50 {
            sim.tick(0.1, &PlayerIntent {
                right: true,
                ..Default::default()
            });
        }
        assert_eq!(sim.ctx.time.current, before_time);
        assert_eq!(sim.ctx.player.stats, before_stats);

        sim.toggle_pause();
        assert!(sim.is_running());
    }

    #[test]
    fn shark_attack_ends_the_run_exactly_once() {
        let mut sim = uniform_sim(Tile::OceanWater);
        let center = sim.ctx.player.center();
        sim.ctx.shark.mode = SharkMode::Chasing;
        sim.ctx.shark.pos = center + vec2(10.0, 0.0);
        sim.ctx.shark.target = center;

        for _ in 0..5 {
            sim.tick(0.1, &idle());
        }
        assert_eq!(sim.phase, GamePhase::Ended(Outcome::SharkAttack));
        assert_eq!(sim.recorder.len(), 1);
        assert!(!sim.ctx.shark.is_active());

        sim.end_game(Outcome::Rescued);
        assert_eq!(sim.outcome(), Some(Outcome::SharkAttack));
        assert_eq!(sim.recorder.len(), 1);
    }

    #[test]
    fn terminal_checks_go_health_hunger_thirst() {
        let mut sim = uniform_sim(Tile::Grass);
        sim.ctx.player.stats.health = 0.0;
        sim.ctx.player.stats.hunger = 0.0;
        sim.tick(0.1, &idle());
        assert_eq!(sim.outcome(), Some(Outcome::Died(DeathCause::Health)));

        let mut sim = uniform_sim(Tile::Grass);
        sim.ctx.player.stats.hunger = 0.0;
        sim.ctx.player.stats.thirst = 0.0;
        sim.tick(0.1, &idle());
        assert_eq!(sim.outcome(), Some(Outcome::Died(DeathCause::Hunger)));

        let mut sim = uniform_sim(Tile::Grass);
        sim.ctx.player.stats.thirst = 0.0;
        sim.tick(0.1, &idle());
        assert_eq!(sim.outcome(), Some(Outcome::Died(DeathCause::Thirst)));
        assert_eq!(
            sim.recorder,
            vec![RunSummary {
                day: 1,
                total_items_collected: 0,
                fish_caught: 0
            }]
        );
    }

    #[test]
    fn rescue_needs_a_fire_and_day_four() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1000 {
            assert!(!rescue_roll(3, true, 0.1, 0.001, &mut rng));
            assert!(!rescue_roll(9, false, 0.1, 0.001, &mut rng));
        }
        assert!(rescue_roll(4, true, 0.1, 0.001, &mut rng));
    }

    #[test]
    fn burning_fire_can_end_in_rescue() {
        let mut sim = uniform_sim(Tile::Grass);
        let mut fire = SignalFire::new(Rect::new(32.0, 32.0, 64.0, 64.0));
        fire.add_fuel(10);
        sim.ctx.world.add(Entity::SignalFire(fire));
        sim.ctx.time.day = 4;
        sim.ctx.time.day_length = 0.001;

        sim.tick(0.1, &idle());
        assert_eq!(sim.outcome(), Some(Outcome::Rescued));
        assert_eq!(sim.recorder.len(), 1);
    }

    #[test]
    fn sunset_warning_once_per_evening() {
        let mut sim = uniform_sim(Tile::Grass);
        sim.ctx.time.current = 0.69 * sim.ctx.time.day_length;
        for _ in 0..30 {
            sim.tick(0.1, &idle());
        }
        let warnings = sim.notifier.active().filter(|m| m.text.starts_with("Sun is setting")).count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn day_rollover_announces_new_day() {
        let mut sim = uniform_sim(Tile::Grass);
        sim.ctx.time.current = sim.ctx.time.day_length - 0.05;
        sim.tick(0.1, &idle());
        assert_eq!(sim.ctx.time.day, 2);
        assert!(sim.notifier.contains("Day 2 has begun."));
    }

    #[test]
    fn interact_intent_chops_the_facing_tree() {
        let mut sim = uniform_sim(Tile::Grass);
        sim.ctx.player.pos = vec2(200.0, 200.0);
        sim.ctx.player.direction = Direction::Right;
        let tree = sim.ctx.world.add(Entity::Tree(Tree::new(Rect::new(222.0, 180.0, 57.6, 89.6))));

        sim.tick(0.1, &idle());
        assert_eq!(sim.target, Interaction::Gather(tree));
        assert_eq!(sim.notifier.current_prompt(), Some("Press E to Chop Tree (400 wood left)"));

        sim.tick(0.1, &PlayerIntent {
            interact: true,
            ..Default::default()
        });
        assert_eq!(sim.ctx.inventory.count(Item::Wood), 1);
        assert_eq!(sim.ctx.world.trees.get(tree).map(|t| t.remaining), Some(399));
    }

    #[test]
    fn crafting_only_while_running() {
        let mut sim = uniform_sim(Tile::Grass);
        sim.ctx.inventory.add(Item::Wood, 3).unwrap();
        sim.toggle_pause();
        sim.craft(Item::FishingRod);
        assert!(!sim.ctx.inventory.has(Item::FishingRod));

        sim.toggle_pause();
        sim.craft(Item::FishingRod);
        assert!(sim.ctx.inventory.has(Item::FishingRod));
        assert_eq!(sim.notifier.latest(), Some("Crafted Fishing Rod!"));
    }
}
