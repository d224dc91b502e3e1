use egui;

use super::{Game, UiState};
use crate::leaderboard::{Category, Leaderboard};

fn table_column(ui: &mut egui::Ui, board: &Leaderboard, category: Category) {
    ui.label(egui::RichText::new(category.label()).strong());
    let table = board.tables.table(category);
    if table.is_empty() {
        ui.label(egui::RichText::new("No scores yet").small().italics());
    }
    for (i, entry) in table.iter().enumerate() {
        ui.label(format!("{:>2}. {} - {}", i + 1, entry.name, entry.score));
    }
}

pub fn draw_scores(ctx: &egui::Context, board: &Leaderboard, open: &mut bool) {
    egui::Window::new("Leaderboard")
        .open(open)
        .default_pos(egui::pos2(320.0, 90.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.columns(Category::ALL.len(), |cols| {
                for (col, category) in cols.iter_mut().zip(Category::ALL) {
                    table_column(col, board, category);
                }
            });
        });
}

pub fn draw_start_panel(ctx: &egui::Context, game: &mut Game) {
    egui::Window::new("The Longest Day")
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label("You are stranded on an island. Gather, craft and keep a signal fire burning.");
            ui.label("Rescue ships pass by from day 4. Stay out of the deep ocean.");
            ui.separator();
            ui.horizontal(|ui| {
                ui.label("Name:");
                ui.text_edit_singleline(&mut game.recorder.player_name);
            });
            ui.add_space(6.0);
            if ui.button("Start (Enter)").clicked() {
                game.start();
            }
        });
}

pub fn draw_game_over(ctx: &egui::Context, game: &Game, ui_state: &mut UiState) {
    let Some(outcome) = game.outcome() else {
        return;
    };
    let summary = game.summary();
    egui::Window::new(outcome.title())
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(outcome.message());
            ui.separator();
            ui.label(format!("Days survived: {}", summary.day));
            ui.label(format!("Items collected: {}", summary.total_items_collected));
            ui.label(format!("Fish caught: {}", summary.fish_caught));

            if !game.recorder.last_placements.is_empty() {
                ui.separator();
                for (category, rank) in &game.recorder.last_placements {
                    ui.label(
                        egui::RichText::new(format!("New #{} in {}!", rank + 1, category.label()))
                            .color(egui::Color32::from_rgb(255, 214, 150)),
                    );
                }
            }

            ui.add_space(6.0);
            if ui.button("Play Again (Enter)").clicked() {
                ui_state.restart_requested = true;
            }
        });
}
