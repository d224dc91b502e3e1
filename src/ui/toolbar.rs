use egui;

use super::{Game, UiState};
use crate::simulation::GamePhase;

/// Slim status strip + compact controls.
pub fn draw_toolbar(ctx: &egui::Context, game: &mut Game, ui_state: &mut UiState) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.add_space(3.0);
        ui.horizontal_wrapped(|ui| {
            title_badge(ui, "THE LONGEST DAY");

            ui.separator();
            compact_group(ui, "Game", |ui| {
                match game.phase {
                    GamePhase::NotStarted => {
                        if ui.button("Start").clicked() {
                            game.start();
                        }
                    }
                    GamePhase::Running | GamePhase::Paused => {
                        let label = if game.phase == GamePhase::Paused { "Resume" } else { "Pause" };
                        if ui.button(label).clicked() {
                            game.toggle_pause();
                        }
                    }
                    GamePhase::Ended(_) => {}
                }
                if ui.button("New Island").clicked() {
                    ui_state.restart_requested = true;
                }
            });

            compact_group(ui, "Panels", |ui| {
                ui.toggle_value(&mut ui_state.show_status, "Status");
                ui.toggle_value(&mut ui_state.show_crafting, "Craft");
                ui.toggle_value(&mut ui_state.show_scores, "Scores");
            });
        });

        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            let run = &game.ctx;
            let (hours, minutes) = run.time.clock();
            metric_chip(ui, "Day", run.time.day);
            metric_chip(
                ui,
                "Time",
                format!("{hours:02}:{minutes:02} · {}", run.time.phase().label()),
            );
            metric_chip(ui, "Items", run.inventory.total_items_collected);
            metric_chip(ui, "Fish", run.inventory.fish_caught);

            if run.player.is_swimming(&run.world) {
                status_chip(ui, "SWIMMING", egui::Color32::from_rgb(98, 154, 191));
            }
            if run.in_shade() {
                status_chip(ui, "SHADE", egui::Color32::from_rgb(120, 190, 120));
            }
            if run.fishing.fish_jumping {
                status_chip(ui, "FISH JUMPING", egui::Color32::from_rgb(230, 170, 80));
            }
            if run.shark.is_chasing() {
                status_chip(ui, "SHARK!", egui::Color32::from_rgb(220, 70, 60));
            }
            metric_chip(ui, "Seed", game.seed);
        });
        ui.add_space(3.0);
    });
}

const MUTED: egui::Color32 = egui::Color32::from_rgb(168, 160, 140);
const SAND: egui::Color32 = egui::Color32::from_rgb(236, 222, 190);

fn title_badge(ui: &mut egui::Ui, label: &str) {
    ui.label(
        egui::RichText::new(label)
            .strong()
            .color(egui::Color32::from_rgb(255, 214, 150)),
    );
}

/// A framed row with a small muted heading in front of its contents.
fn compact_group(ui: &mut egui::Ui, heading: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(heading).small().color(MUTED));
            add_contents(ui);
        })
    });
}

fn chip(ui: &mut egui::Ui, text: egui::RichText) {
    ui.group(|ui| ui.label(text.small()));
}

fn metric_chip(ui: &mut egui::Ui, key: &str, value: impl std::fmt::Display) {
    chip(ui, egui::RichText::new(format!("{key}: {value}")).color(SAND));
}

fn status_chip(ui: &mut egui::Ui, label: &str, color: egui::Color32) {
    chip(ui, egui::RichText::new(label).strong().color(color));
}
