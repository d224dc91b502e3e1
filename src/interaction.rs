use macroquad::prelude::*;
use ::rand::Rng;
use thiserror::Error;

use crate::config;
use crate::entity::{Entity, EntityId, EntityKind, SignalFire, Structure};
use crate::fishing::CastOutcome;
use crate::hooks::Notifier;
use crate::inventory::Item;
use crate::player::{Direction, PlayerState};
use crate::simulation::SimulationContext;
use crate::terrain::{Tile, TileGrid};
use crate::world::WorldState;

/// What pressing interact would do right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    AddFuel(EntityId),
    UsePurifier(EntityId),
    /// Tree, rock, shrub or driftwood; the handle carries the kind.
    Gather(EntityId),
    Fish,
    DrinkDirtyWater,
    PickupShelter(EntityId),
    None,
}

/// Resolve the highest-priority action available to the player.
pub fn peek_target(ctx: &SimulationContext) -> Interaction {
    let player = &ctx.player;
    let world = &ctx.world;
    let center = player.center();
    let reach = player.interaction_point(world);
    let range_sq = player.interaction_range * player.interaction_range;

    let holding_wood = ctx.inventory.selected_stack().is_some_and(|s| s.item == Item::Wood && s.count > 0);
    if holding_wood {
        if let Some((id, _)) = world.signal_fires.iter().find(|(_, f)| player.within_range(f.rect.center())) {
            return Interaction::AddFuel(id);
        }
    }

    let purifier_reach = config::TILE_SIZE * 0.8;
    for (id, p) in world.purifiers.iter() {
        let c = p.rect.center();
        if reach.distance_squared(c) < purifier_reach * purifier_reach && player.within_range(c) {
            return Interaction::UsePurifier(id);
        }
    }

    if let Some(id) = nearest_gatherable(world, center, reach, range_sq) {
        return Interaction::Gather(id);
    }

    let (itx, ity) = TileGrid::tile_coords(reach);
    let near_water = match world.tile_at(itx, ity) {
        Some(t) if t.is_water() => true,
        Some(_) => world.grid.any_neighbor(itx, ity, Tile::is_water),
        None => false,
    };
    if near_water {
        if ctx.inventory.has(Item::FishingRod) {
            return Interaction::Fish;
        }
        let close = config::TILE_SIZE * 1.5;
        let purifier_close = world
            .purifiers
            .values()
            .any(|p| center.distance_squared(p.rect.center()) < close * close);
        if !purifier_close {
            return Interaction::DrinkDirtyWater;
        }
    }

    let shelter_reach = config::TILE_SIZE * 1.2;
    for (id, s) in world.shelters.iter() {
        let c = s.rect.center();
        if reach.distance_squared(c) < shelter_reach * shelter_reach && player.within_range(c) {
            return Interaction::PickupShelter(id);
        }
    }

    Interaction::None
}

fn nearest_gatherable(world: &WorldState, center: Vec2, reach: Vec2, range_sq: f32) -> Option<EntityId> {
    let candidates = world
        .trees
        .iter()
        .filter(|(_, t)| !t.is_stump)
        .map(|(id, t)| (id, t.rect))
        .chain(world.rocks.iter().map(|(id, r)| (id, r.rect)))
        .chain(world.shrubs.iter().filter(|(_, s)| !s.is_stump).map(|(id, s)| (id, s.rect)))
        .chain(world.driftwood.iter().map(|(id, d)| (id, d.rect)));

    let mut best = None;
    let mut best_sq = range_sq;
    for (id, rect) in candidates {
        let c = rect.center();
        if center.distance_squared(c) >= range_sq * 1.5 {
            continue;
        }
        let d = reach.distance_squared(c);
        if d < best_sq {
            best_sq = d;
            best = Some(id);
        }
    }
    best
}

/// Prompt line for the current target, or `None` to hide it.
pub fn prompt_text(ctx: &SimulationContext, target: Interaction) -> Option<String> {
    if ctx.player.is_inside_shelter() {
        return Some("Press F to leave the shelter".to_string());
    }
    let world = &ctx.world;
    let text = match target {
        Interaction::AddFuel(id) => {
            let fire = world.signal_fires.get(id)?;
            format!("Press E to Add Wood (Fuel: {}/{})", fire.fuel.ceil(), fire.max_fuel)
        }
        Interaction::UsePurifier(_) => "Press E to Use Water Purifier".to_string(),
        Interaction::Gather(id) => match id.kind {
            EntityKind::Tree => format!("Press E to Chop Tree ({} wood left)", world.trees.get(id)?.remaining),
            EntityKind::Rock => format!("Press E to Mine Rock ({} hits left)", world.rocks.get(id)?.remaining),
            EntityKind::Shrub => "Press E to Cut Shrub".to_string(),
            EntityKind::Driftwood => {
                format!("Press E to Gather Driftwood ({} wood)", world.driftwood.get(id)?.wood)
            }
            _ => return None,
        },
        Interaction::Fish => {
            if ctx.fishing.is_fishing {
                "Fishing...".to_string()
            } else if ctx.fishing.fish_jumping && ctx.fishing.cooldown <= 0.0 {
                "Press E to Fish (Fish Jumping!)".to_string()
            } else {
                "Press E to Fish".to_string()
            }
        }
        Interaction::DrinkDirtyWater => "Press E to Drink Dirty Water".to_string(),
        Interaction::PickupShelter(_) => "Press E to Pick Up Shelter".to_string(),
        Interaction::None => return None,
    };
    Some(text)
}

/// Carry out one interaction. Blocked while sheltering.
pub fn perform(ctx: &mut SimulationContext, target: Interaction, notifier: &mut dyn Notifier) {
    if ctx.player.is_inside_shelter() {
        return;
    }
    match target {
        Interaction::AddFuel(id) => add_fuel(ctx, id, notifier),
        Interaction::UsePurifier(_) => {
            ctx.player.stats.change_thirst(config::PURIFIER_THIRST);
            ctx.player.stats.change_health(config::PURIFIER_HEAL);
            notifier.message("Used purifier. Drank clean water (+2 Health).", 2000);
        }
        Interaction::Gather(id) => {
            gather(ctx, id, notifier);
        }
        Interaction::Fish => fish(ctx, notifier),
        Interaction::DrinkDirtyWater => {
            ctx.player.stats.change_thirst(config::DIRTY_WATER_THIRST);
            if ctx.rng.gen::<f32>() < config::DIRTY_WATER_SICK_CHANCE {
                ctx.player.stats.change_health(-config::DIRTY_WATER_DAMAGE);
                notifier.message("Drank dirty water. Felt unwell (-10 Health).", 2500);
            } else {
                notifier.message("Drank dirty water. Risky...", 2000);
            }
        }
        Interaction::PickupShelter(id) => {
            if ctx.world.shelters.get(id).is_none() {
                return;
            }
            match ctx.inventory.add(Item::Shelter, 1) {
                Ok(()) => {
                    ctx.world.remove(id);
                    notifier.message("Picked up Shelter.", 2000);
                }
                Err(_) => notifier.message("Cannot pick up shelter, inventory full!", 2500),
            }
        }
        Interaction::None => {}
    }
}

fn add_fuel(ctx: &mut SimulationContext, id: EntityId, notifier: &mut dyn Notifier) {
    let wood = match ctx.inventory.selected_stack() {
        Some(s) if s.item == Item::Wood && s.count > 0 => s.count,
        _ => {
            notifier.message("Select wood to add fuel.", 2000);
            return;
        }
    };
    let Some(fire) = ctx.world.signal_fires.get_mut(id) else {
        return;
    };
    let n = wood.min(config::MAX_WOOD_PER_REFUEL);
    fire.add_fuel(n);
    let text = format!("Added {n} wood. Fuel: {}/{}", fire.fuel.ceil(), fire.max_fuel);
    match ctx.inventory.remove(Item::Wood, n) {
        Ok(()) => notifier.message(&text, 2500),
        Err(e) => log::error!("refuel took wood that was not there: {e}"),
    }
}

fn give(ctx: &mut SimulationContext, item: Item, count: u32, notifier: &mut dyn Notifier) -> bool {
    match ctx.inventory.add(item, count) {
        Ok(()) => true,
        Err(e) => {
            notifier.message(&e.to_string(), 2000);
            false
        }
    }
}

/// Harvest one resource object. Returns false for a stale handle or a full inventory.
pub fn gather(ctx: &mut SimulationContext, id: EntityId, notifier: &mut dyn Notifier) -> bool {
    match id.kind {
        EntityKind::Tree => {
            let per_hit = if ctx.inventory.has(Item::Axe) {
                config::AXE_WOOD_PER_HIT
            } else {
                config::HAND_WOOD_PER_HIT
            };
            let Some(tree) = ctx.world.trees.get(id) else {
                return false;
            };
            if tree.is_stump || tree.remaining == 0 {
                notifier.message("It's just a stump.", 1500);
                return true;
            }
            let wood = per_hit.min(tree.remaining);
            if !give(ctx, Item::Wood, wood, notifier) {
                return false;
            }
            notifier.message(&format!("Chopped tree. Got {wood} wood."), 1500);
            if let Some(tree) = ctx.world.trees.get_mut(id) {
                tree.remaining -= wood;
                if tree.remaining == 0 {
                    tree.is_stump = true;
                    tree.regrow_timer = 0.0;
                    notifier.message("Tree depleted, became a stump.", 2000);
                }
            }
            true
        }
        EntityKind::Rock => {
            let Some(rock) = ctx.world.rocks.get(id) else {
                return false;
            };
            if rock.remaining == 0 {
                notifier.message("This rock is depleted.", 1500);
                return true;
            }
            if !give(ctx, Item::Stone, 1, notifier) {
                return false;
            }
            if let Some(rock) = ctx.world.rocks.get_mut(id) {
                rock.remaining -= 1;
                notifier.message(&format!("Mined stone. ({} left)", rock.remaining), 1500);
            }
            true
        }
        EntityKind::Shrub => {
            let Some(shrub) = ctx.world.shrubs.get(id) else {
                return false;
            };
            if shrub.is_stump {
                notifier.message("Already cut.", 1500);
                return true;
            }
            if !give(ctx, Item::Wood, config::SHRUB_WOOD_YIELD, notifier) {
                return false;
            }
            if let Some(shrub) = ctx.world.shrubs.get_mut(id) {
                shrub.is_stump = true;
                shrub.regrow_timer = 0.0;
                shrub.stump_timer = config::SHRUB_STUMP_DURATION;
                shrub.health = 0;
            }
            notifier.message(&format!("Cut shrub, got {} wood.", config::SHRUB_WOOD_YIELD), 2000);
            true
        }
        EntityKind::Driftwood => {
            let Some(piece) = ctx.world.driftwood.get(id) else {
                return false;
            };
            let wood = piece.wood.max(1);
            if !give(ctx, Item::Wood, wood, notifier) {
                return false;
            }
            ctx.world.remove(id);
            notifier.message(&format!("Gathered driftwood, got {wood} wood."), 2000);
            true
        }
        _ => false,
    }
}

fn fish(ctx: &mut SimulationContext, notifier: &mut dyn Notifier) {
    let has_rod = ctx.inventory.has(Item::FishingRod);
    let is_night = ctx.time.is_night;
    match ctx.fishing.cast(has_rod, is_night, &mut ctx.rng) {
        CastOutcome::NoRod => notifier.message("Need a fishing rod.", 2000),
        CastOutcome::AlreadyFishing => notifier.message("Already fishing...", 1500),
        CastOutcome::CoolingDown => {}
        CastOutcome::QuickCatch { caught } => {
            notifier.message("Quick catch attempt!", 1500);
            if caught {
                if give(ctx, Item::Fish, 1, notifier) {
                    notifier.message("Caught a fish! (Quick!)", 2500);
                }
            } else {
                notifier.message("Missed the jumping fish!", 2000);
            }
        }
        CastOutcome::Started => notifier.message("Started fishing...", 2000),
    }
}

/// Resolve a finished normal cast.
pub fn finish_cast(ctx: &mut SimulationContext, caught: bool, notifier: &mut dyn Notifier) {
    if caught {
        if give(ctx, Item::Fish, 1, notifier) {
            let suffix = if ctx.time.is_night { " (Night!)" } else { "" };
            notifier.message(&format!("Caught a fish!{suffix}"), 2500);
        }
    } else {
        notifier.message("Fishing... nothing biting.", 2000);
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    #[error("Cannot place outside the island bounds.")]
    OutOfBounds,
    #[error("Cannot place in water.")]
    InWater,
    #[error("Cannot place here (Obstacle).")]
    Obstructed,
    #[error("Purifier must be placed on land (Grass or Sand).")]
    PurifierOffLand,
    #[error("Place purifier closer to water.")]
    NoWaterNearby,
    #[error("Cannot place {} on {tile}. Needs {needs}.", .item.name())]
    WrongGround {
        item: Item,
        tile: &'static str,
        needs: &'static str,
    },
    #[error("That item cannot be placed.")]
    NotPlaceable,
}

/// Footprint just ahead of the player in the facing direction.
pub fn placement_rect(player: &PlayerState, size: Vec2) -> Rect {
    let gap = config::PLACEMENT_GAP;
    let centered_x = player.pos.x + player.size.x * 0.5 - size.x * 0.5;
    let centered_y = player.pos.y + player.size.y * 0.5 - size.y * 0.5;
    let (x, y) = match player.direction {
        Direction::Up => (centered_x, player.pos.y - size.y - gap),
        Direction::Down => (centered_x, player.pos.y + player.size.y + gap),
        Direction::Left => (player.pos.x - size.x - gap, centered_y),
        Direction::Right => (player.pos.x + player.size.x + gap, centered_y),
    };
    Rect::new(x, y, size.x, size.y)
}

fn water_source_nearby(world: &WorldState, tx: i32, ty: i32) -> bool {
    const RADIUS: i32 = 2;
    for y in (ty - RADIUS)..=(ty + RADIUS) {
        for x in (tx - RADIUS)..=(tx + RADIUS) {
            match world.tile_at(x, y) {
                Some(t) if t.is_water() => return true,
                Some(Tile::Sand) if world.grid.any_neighbor(x, y, Tile::is_water) => return true,
                _ => {}
            }
        }
    }
    false
}

/// All ground and obstacle rules for putting `item` at `rect`.
pub fn check_placement(world: &WorldState, item: Item, rect: Rect) -> Result<(), PlacementError> {
    if !world.contains_rect(&rect) {
        return Err(PlacementError::OutOfBounds);
    }
    let (tx, ty) = TileGrid::tile_coords(rect.center());
    let tile = world.tile_at(tx, ty);

    if item != Item::WaterPurifier && tile.is_some_and(Tile::is_water) {
        return Err(PlacementError::InWater);
    }
    if world.placement_blockers().iter().any(|b| rect.overlaps(b)) {
        return Err(PlacementError::Obstructed);
    }

    if item == Item::WaterPurifier {
        if !tile.is_some_and(Tile::is_land) {
            return Err(PlacementError::PurifierOffLand);
        }
        if !water_source_nearby(world, tx, ty) {
            return Err(PlacementError::NoWaterNearby);
        }
        return Ok(());
    }

    let sand_ok = matches!(item, Item::Shelter | Item::Campfire | Item::SignalFire);
    match tile {
        Some(Tile::Grass) => Ok(()),
        Some(Tile::Sand) if sand_ok => Ok(()),
        other => Err(PlacementError::WrongGround {
            item,
            tile: other.map_or("water", Tile::name),
            needs: if sand_ok { "grass or sand" } else { "grass" },
        }),
    }
}

/// Eat or place the selected item.
pub fn use_selected_item(ctx: &mut SimulationContext, notifier: &mut dyn Notifier) {
    if ctx.player.is_inside_shelter() {
        return;
    }
    let Some(stack) = ctx.inventory.selected_stack() else {
        return;
    };
    if stack.count == 0 {
        return;
    }
    let item = stack.item;

    if let Some((hunger, heal)) = item.nourishment() {
        ctx.player.stats.change_hunger(hunger);
        ctx.player.stats.change_health(heal);
        if ctx.inventory.remove(item, 1).is_ok() {
            notifier.message(&format!("Ate {}. (+{heal}H) (+{hunger}Hu)", item.name()), 2000);
        }
        return;
    }

    if item.footprint().is_some() {
        match place(ctx, item) {
            Ok(_) => notifier.message(&format!("Placed {}.", item.name()), 2500),
            Err(e) => notifier.message(&e.to_string(), 2500),
        }
    }
}

/// Put a structure from the inventory into the world ahead of the player.
pub fn place(ctx: &mut SimulationContext, item: Item) -> Result<EntityId, PlacementError> {
    let size = item.footprint().ok_or(PlacementError::NotPlaceable)?;
    let rect = placement_rect(&ctx.player, size);
    check_placement(&ctx.world, item, rect)?;

    let entity = match item {
        Item::Campfire => Entity::Campfire(Structure { rect }),
        Item::Shelter => Entity::Shelter(Structure { rect }),
        Item::WaterPurifier => Entity::WaterPurifier(Structure { rect }),
        Item::SignalFire => Entity::SignalFire(SignalFire::new(rect)),
        _ => return Err(PlacementError::NotPlaceable),
    };
    if ctx.inventory.remove(item, 1).is_err() {
        return Err(PlacementError::NotPlaceable);
    }
    let id = ctx.world.add(entity);
    log::debug!("placed {} at ({:.0}, {:.0})", item.name(), rect.x, rect.y);
    Ok(id)
}

/// Closest shelter whose center is within interaction range.
pub fn shelter_in_range(ctx: &SimulationContext) -> Option<EntityId> {
    let center = ctx.player.center();
    ctx.world
        .shelters
        .iter()
        .filter(|(_, s)| ctx.player.within_range(s.rect.center()))
        .min_by(|a, b| {
            let da = center.distance_squared(a.1.rect.center());
            let db = center.distance_squared(b.1.rect.center());
            da.total_cmp(&db)
        })
        .map(|(id, _)| id)
}

/// Step into a nearby shelter, or out of the current one.
pub fn toggle_shelter(ctx: &mut SimulationContext, notifier: &mut dyn Notifier) {
    if let Some(id) = ctx.player.shelter {
        let player = &mut ctx.player;
        match ctx.world.shelters.get(id) {
            Some(s) => {
                player.pos.x = s.rect.center().x - player.size.x * 0.5;
                player.pos.y = s.rect.bottom() + 2.0;
            }
            None => log::warn!("player was inside a shelter that no longer exists"),
        }
        player.pos.x = player.pos.x.clamp(0.0, (ctx.world.width() - player.size.x).max(0.0));
        player.pos.y = player.pos.y.clamp(0.0, (ctx.world.height() - player.size.y).max(0.0));
        player.shelter = None;
        notifier.message("Exited shelter.", 1500);
        return;
    }

    let Some(id) = shelter_in_range(ctx) else {
        return;
    };
    if let Some(s) = ctx.world.shelters.get(id) {
        ctx.player.pos = s.rect.center() - ctx.player.size * 0.5;
        ctx.player.shelter = Some(id);
        ctx.fishing.cancel();
        notifier.message("Entered shelter. You are in the shade.", 2000);
    }
}
