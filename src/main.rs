use macroquad::prelude::*;

mod camera;
mod config;
mod entity;
mod error;
mod fishing;
mod hooks;
mod input;
mod interaction;
mod inventory;
mod leaderboard;
mod lifecycle;
mod noise_field;
mod player;
mod renderer;
mod resources;
mod shadow;
mod shark;
mod simulation;
mod terrain;
mod time;
mod ui;
mod world;

use camera::CameraController;
use config::GameConfig;
use hooks::MessageLog;
use leaderboard::Leaderboard;
use simulation::{GamePhase, Simulation};
use ui::{Game, UiState};

fn window_conf() -> Conf {
    Conf {
        window_title: "The Longest Day".to_string(),
        window_width: 1280,
        window_height: 800,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match GameConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}; falling back to default settings");
            GameConfig::default()
        }
    };

    let leaderboard = Leaderboard::open(&config.leaderboard_path);
    let mut sim: Game = Simulation::new(&config, MessageLog::new(5), leaderboard);
    let mut camera = CameraController::new(sim.ctx.player.center());
    let mut ui_state = UiState::default();

    loop {
        let dt = get_frame_time().min(config::MAX_DT);

        if !ui_state.keyboard_captured {
            if is_key_pressed(KeyCode::Space) {
                sim.toggle_pause();
            }
            if is_key_pressed(KeyCode::Enter) {
                match sim.phase {
                    GamePhase::NotStarted => sim.start(),
                    GamePhase::Ended(_) => ui_state.restart_requested = true,
                    GamePhase::Running | GamePhase::Paused => {}
                }
            }
        }

        let intent = input::read_intent(ui_state.keyboard_captured);
        sim.tick(dt, &intent);
        sim.notifier.tick(dt);

        let world_size = vec2(sim.ctx.world.width(), sim.ctx.world.height());
        camera.update(sim.ctx.player.center(), world_size, dt);

        renderer::draw(&sim, &camera);
        renderer::draw_hud(&sim);
        ui::draw_ui(&mut sim, &mut ui_state);

        if ui_state.restart_requested {
            ui_state.restart_requested = false;
            sim.restart(&config);
            sim.notifier.clear();
            camera.snap_to(sim.ctx.player.center());
        }

        next_frame().await;
    }
}
