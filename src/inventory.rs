use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

/// Everything that can sit in an inventory slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    Wood,
    Stone,
    Fish,
    Axe,
    FishingRod,
    Campfire,
    Shelter,
    WaterPurifier,
    SignalFire,
}

impl Item {
    pub const CRAFTABLE: [Item; 6] = [
        Item::Axe,
        Item::FishingRod,
        Item::Campfire,
        Item::Shelter,
        Item::WaterPurifier,
        Item::SignalFire,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Item::Wood => "Wood",
            Item::Stone => "Stone",
            Item::Fish => "Fish",
            Item::Axe => "Axe",
            Item::FishingRod => "Fishing Rod",
            Item::Campfire => "Campfire",
            Item::Shelter => "Shelter",
            Item::WaterPurifier => "Water Purifier",
            Item::SignalFire => "Signal Fire",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Item::Wood => "Basic building material.",
            Item::Stone => "Sturdy material for tools.",
            Item::Fish => "Eat for nourishment.",
            Item::Axe => "Chops trees faster.",
            Item::FishingRod => "Enables fishing.",
            Item::Campfire => "Place for light and warmth.",
            Item::Shelter => "Place, then step in for shade. Pick up with interact.",
            Item::WaterPurifier => "Place near water. Interact for clean water.",
            Item::SignalFire => "Place and keep lit for a chance of rescue.",
        }
    }

    /// Ingredients, or `None` for raw materials.
    pub fn recipe(self) -> Option<&'static [(Item, u32)]> {
        match self {
            Item::Axe => Some(&[(Item::Wood, 5), (Item::Stone, 2)]),
            Item::FishingRod => Some(&[(Item::Wood, 3)]),
            Item::Campfire => Some(&[(Item::Wood, 10), (Item::Stone, 3)]),
            Item::Shelter => Some(&[(Item::Wood, 20)]),
            Item::WaterPurifier => Some(&[(Item::Wood, 8), (Item::Stone, 5)]),
            Item::SignalFire => Some(&[(Item::Wood, 30), (Item::Stone, 10)]),
            Item::Wood | Item::Stone | Item::Fish => None,
        }
    }

    /// World footprint for items that can be placed.
    pub fn footprint(self) -> Option<Vec2> {
        match self {
            Item::Campfire => Some(vec2(48.0, 48.0)),
            Item::Shelter => Some(vec2(64.0, 48.0)),
            Item::WaterPurifier => Some(vec2(40.0, 40.0)),
            Item::SignalFire => Some(vec2(64.0, 64.0)),
            _ => None,
        }
    }

    /// (hunger restored, health restored) when eaten.
    pub fn nourishment(self) -> Option<(f32, f32)> {
        match self {
            Item::Fish => Some((config::FISH_HUNGER, config::FISH_HEAL)),
            _ => None,
        }
    }

    /// Raw materials count toward the collection score.
    pub fn is_gathered(self) -> bool {
        matches!(self, Item::Wood | Item::Stone | Item::Fish)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Inventory is full!")]
    Full,
    #[error("Not enough {}: need {needed}, have {have}", .item.name())]
    Missing { item: Item, needed: u32, have: u32 },
    #[error("{} cannot be crafted", .0.name())]
    NotCraftable(Item),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemStack {
    pub item: Item,
    pub count: u32,
}

/// Slot list with a selection cursor and run counters.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    slots: Vec<ItemStack>,
    pub selected: usize,
    pub total_items_collected: u32,
    pub fish_caught: u32,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[ItemStack] {
        &self.slots
    }

    pub fn selected_stack(&self) -> Option<ItemStack> {
        self.slots.get(self.selected).copied()
    }

    pub fn selected_item(&self) -> Option<Item> {
        self.selected_stack().map(|s| s.item)
    }

    pub fn select(&mut self, slot: usize) {
        if slot < self.slots.len() {
            self.selected = slot;
        }
    }

    pub fn count(&self, item: Item) -> u32 {
        self.slots.iter().filter(|s| s.item == item).map(|s| s.count).sum()
    }

    pub fn has(&self, item: Item) -> bool {
        self.count(item) > 0
    }

    /// Merge into an existing stack or open a new slot.
    pub fn add(&mut self, item: Item, count: u32) -> Result<(), InventoryError> {
        if count == 0 {
            return Ok(());
        }
        if let Some(stack) = self.slots.iter_mut().find(|s| s.item == item) {
            stack.count += count;
        } else if self.slots.len() < config::MAX_INVENTORY_SLOTS {
            self.slots.push(ItemStack { item, count });
        } else {
            return Err(InventoryError::Full);
        }

        if item.is_gathered() {
            self.total_items_collected += count;
            if item == Item::Fish {
                self.fish_caught += count;
            }
        }
        Ok(())
    }

    /// Take `count` of `item`, draining stacks from the back. Nothing is removed on shortfall.
    pub fn remove(&mut self, item: Item, count: u32) -> Result<(), InventoryError> {
        let have = self.count(item);
        if have < count {
            return Err(InventoryError::Missing {
                item,
                needed: count,
                have,
            });
        }

        let mut remaining = count;
        let mut i = self.slots.len();
        while remaining > 0 && i > 0 {
            i -= 1;
            if self.slots[i].item != item {
                continue;
            }
            let take = remaining.min(self.slots[i].count);
            self.slots[i].count -= take;
            remaining -= take;
            if self.slots[i].count == 0 {
                self.slots.remove(i);
                if i < self.selected {
                    self.selected -= 1;
                }
            }
        }
        if self.selected >= self.slots.len() {
            self.selected = self.slots.len().saturating_sub(1);
        }
        Ok(())
    }

    pub fn can_craft(&self, item: Item) -> bool {
        item.recipe()
            .is_some_and(|r| r.iter().all(|(ingredient, n)| self.count(*ingredient) >= *n))
    }

    pub fn craft(&mut self, item: Item) -> Result<(), InventoryError> {
        let recipe = item.recipe().ok_or(InventoryError::NotCraftable(item))?;
        for (ingredient, needed) in recipe {
            let have = self.count(*ingredient);
            if have < *needed {
                return Err(InventoryError::Missing {
                    item: *ingredient,
                    needed: *needed,
                    have,
                });
            }
        }
        for (ingredient, needed) in recipe {
            self.remove(*ingredient, *needed)?;
        }
        if let Err(e) = self.add(item, 1) {
            // Undo the removal.
            for (ingredient, needed) in recipe {
                self.restore(*ingredient, *needed);
            }
            return Err(e);
        }
        Ok(())
    }

    fn restore(&mut self, item: Item, count: u32) {
        if let Some(stack) = self.slots.iter_mut().find(|s| s.item == item) {
            stack.count += count;
        } else {
            self.slots.push(ItemStack { item, count });
        }
    }
}
