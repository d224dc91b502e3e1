use egui;

use super::Game;
use crate::config;

fn vital_bar(ui: &mut egui::Ui, label: &str, value: f32) {
    let frac = (value / config::MAX_STAT).clamp(0.0, 1.0);
    let fill = if frac > 0.5 {
        egui::Color32::from_rgb(80, 170, 90)
    } else if frac > 0.25 {
        egui::Color32::from_rgb(210, 180, 60)
    } else {
        egui::Color32::from_rgb(200, 70, 60)
    };
    ui.horizontal(|ui| {
        ui.label(format!("{label}:"));
        let bar = egui::ProgressBar::new(frac)
            .fill(fill)
            .text(format!("{:.0}/{:.0}", value, config::MAX_STAT));
        ui.add(bar);
    });
}

/// Vitals and inventory, docked bottom right.
pub fn draw_status(ctx: &egui::Context, game: &mut Game) {
    egui::Window::new("Survivor")
        .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
        .default_width(240.0)
        .resizable(false)
        .show(ctx, |ui| {
            let stats = game.ctx.player.stats;
            vital_bar(ui, "Health", stats.health);
            vital_bar(ui, "Hunger", stats.hunger);
            vital_bar(ui, "Thirst", stats.thirst);

            ui.separator();
            ui.label(egui::RichText::new("Inventory").strong());
            let inventory = &mut game.ctx.inventory;
            if inventory.slots().is_empty() {
                ui.label(egui::RichText::new("Empty").small().italics());
            }
            let mut clicked = None;
            egui::Grid::new("inventory_slots").num_columns(2).show(ui, |ui| {
                for (i, stack) in inventory.slots().iter().enumerate() {
                    let label = format!("{}. {} x{}", (i + 1) % 10, stack.item.name(), stack.count);
                    let selected = i == inventory.selected;
                    if ui
                        .selectable_label(selected, label)
                        .on_hover_text(stack.item.description())
                        .clicked()
                    {
                        clicked = Some(i);
                    }
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
            if let Some(i) = clicked {
                inventory.select(i);
            }

            ui.separator();
            ui.label(
                egui::RichText::new("WASD move · E interact · Q use · F shelter · 1-0 select")
                    .small()
                    .color(egui::Color32::from_rgb(150, 170, 185)),
            );
        });
}
