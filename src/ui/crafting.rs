use egui;

use super::Game;
use crate::inventory::Item;

/// "5 Wood, 2 Stone"
pub fn recipe_text(recipe: &[(Item, u32)]) -> String {
    recipe
        .iter()
        .map(|(item, n)| format!("{n} {}", item.name()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn draw_crafting(ctx: &egui::Context, game: &mut Game, open: &mut bool) {
    egui::Window::new("Crafting")
        .open(open)
        .default_pos(egui::pos2(20.0, 90.0))
        .resizable(false)
        .show(ctx, |ui| {
            egui::Grid::new("recipes").striped(true).num_columns(3).show(ui, |ui| {
                for item in Item::CRAFTABLE {
                    let Some(recipe) = item.recipe() else {
                        continue;
                    };
                    ui.label(item.name()).on_hover_text(item.description());
                    ui.label(egui::RichText::new(recipe_text(recipe)).small());
                    let enabled = game.is_running() && game.ctx.inventory.can_craft(item);
                    if ui.add_enabled(enabled, egui::Button::new("Craft")).clicked() {
                        game.craft(item);
                    }
                    ui.end_row();
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_lists_every_ingredient() {
        let text = Item::Axe.recipe().map(recipe_text);
        assert_eq!(text.as_deref(), Some("5 Wood, 2 Stone"));
        assert_eq!(Item::FishingRod.recipe().map(recipe_text).as_deref(), Some("3 Wood"));
    }
}
