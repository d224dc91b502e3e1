pub mod crafting;
pub mod scores;
pub mod status;
pub mod toolbar;

use crate::hooks::MessageLog;
use crate::leaderboard::Leaderboard;
use crate::simulation::{GamePhase, Simulation};

/// The concrete game the window runs.
pub type Game = Simulation<MessageLog, Leaderboard>;

/// Tracks which UI panels are open.
pub struct UiState {
    pub show_status: bool,
    pub show_crafting: bool,
    pub show_scores: bool,
    pub restart_requested: bool,
    /// egui had keyboard focus last frame.
    pub keyboard_captured: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_status: true,
            show_crafting: false,
            show_scores: false,
            restart_requested: false,
            keyboard_captured: false,
        }
    }
}

/// Draw all egui UI panels.
pub fn draw_ui(game: &mut Game, ui_state: &mut UiState) {
    egui_macroquad::ui(|ctx| {
        toolbar::draw_toolbar(ctx, game, ui_state);

        if ui_state.show_status {
            status::draw_status(ctx, game);
        }

        if ui_state.show_crafting {
            crafting::draw_crafting(ctx, game, &mut ui_state.show_crafting);
        }

        if ui_state.show_scores {
            scores::draw_scores(ctx, &game.recorder, &mut ui_state.show_scores);
        }

        match game.phase {
            GamePhase::NotStarted => scores::draw_start_panel(ctx, game),
            GamePhase::Ended(_) => scores::draw_game_over(ctx, game, ui_state),
            GamePhase::Running | GamePhase::Paused => {}
        }

        ui_state.keyboard_captured = ctx.wants_keyboard_input();
    });

    egui_macroquad::draw();
}
