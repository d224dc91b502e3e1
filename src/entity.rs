use macroquad::prelude::*;

use crate::config;

/// Discriminant for every kind of object that lives in the world.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EntityKind {
    Tree,
    Rock,
    Shrub,
    Driftwood,
    Campfire,
    Shelter,
    WaterPurifier,
    SignalFire,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Tree,
        EntityKind::Rock,
        EntityKind::Shrub,
        EntityKind::Driftwood,
        EntityKind::Campfire,
        EntityKind::Shelter,
        EntityKind::WaterPurifier,
        EntityKind::SignalFire,
    ];
}

/// Stable handle to a world object. The generation field invalidates stale references.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EntityId {
    pub kind: EntityKind,
    pub index: u32,
    pub generation: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    pub rect: Rect,
    pub initial_resource: u32,
    pub remaining: u32,
    pub is_stump: bool,
    pub regrow_timer: f32,
    pub regrow_time: f32,
}

impl Tree {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            initial_resource: config::INITIAL_TREE_RESOURCE,
            remaining: config::INITIAL_TREE_RESOURCE,
            is_stump: false,
            regrow_timer: 0.0,
            regrow_time: config::TREE_REGROW_DAYS * config::DAY_LENGTH,
        }
    }

    /// Collision box around the trunk base only.
    pub fn trunk_rect(&self) -> Rect {
        let w = self.rect.w * 0.35;
        let h = config::TILE_SIZE * 0.5;
        Rect::new(
            self.rect.x + self.rect.w * 0.5 - w * 0.5,
            self.rect.y + self.rect.h - h,
            w,
            h,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rock {
    pub rect: Rect,
    pub remaining: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shrub {
    pub rect: Rect,
    pub health: u32,
    pub max_health: u32,
    pub is_stump: bool,
    pub regrow_timer: f32,
    pub regrow_time: f32,
    /// Remaining stump visibility, in fractions of a day.
    pub stump_timer: f32,
}

impl Shrub {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            health: config::SHRUB_HEALTH,
            max_health: config::SHRUB_HEALTH,
            is_stump: false,
            regrow_timer: 0.0,
            regrow_time: config::SHRUB_REGROW_DAYS * config::DAY_LENGTH,
            stump_timer: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Driftwood {
    pub rect: Rect,
    pub wood: u32,
}

/// Campfires, shelters and purifiers carry no state beyond their footprint.
#[derive(Clone, Debug, PartialEq)]
pub struct Structure {
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignalFire {
    pub rect: Rect,
    pub fuel: f32,
    pub max_fuel: f32,
    pub fuel_per_wood: f32,
    pub burn_rate: f32,
    pub is_burning: bool,
}

impl SignalFire {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            fuel: 0.0,
            max_fuel: config::SIGNAL_FIRE_MAX_FUEL,
            fuel_per_wood: config::SIGNAL_FIRE_FUEL_PER_WOOD,
            burn_rate: config::SIGNAL_FIRE_BURN_RATE,
            is_burning: false,
        }
    }
}

/// Tagged world object, used at the add/remove boundary of `WorldState`.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Tree(Tree),
    Rock(Rock),
    Shrub(Shrub),
    Driftwood(Driftwood),
    Campfire(Structure),
    Shelter(Structure),
    WaterPurifier(Structure),
    SignalFire(SignalFire),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Tree(_) => EntityKind::Tree,
            Entity::Rock(_) => EntityKind::Rock,
            Entity::Shrub(_) => EntityKind::Shrub,
            Entity::Driftwood(_) => EntityKind::Driftwood,
            Entity::Campfire(_) => EntityKind::Campfire,
            Entity::Shelter(_) => EntityKind::Shelter,
            Entity::WaterPurifier(_) => EntityKind::WaterPurifier,
            Entity::SignalFire(_) => EntityKind::SignalFire,
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            Entity::Tree(t) => t.rect,
            Entity::Rock(r) => r.rect,
            Entity::Shrub(s) => s.rect,
            Entity::Driftwood(d) => d.rect,
            Entity::Campfire(s) | Entity::Shelter(s) | Entity::WaterPurifier(s) => s.rect,
            Entity::SignalFire(f) => f.rect,
        }
    }
}

/// Arena storage with generational indices and a free list.
#[derive(Clone, Debug)]
pub struct EntityArena<T> {
    kind: EntityKind,
    slots: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: Vec<u32>,
    count: usize,
}

impl<T> EntityArena<T> {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            count: 0,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn spawn(&mut self, value: T) -> EntityId {
        self.count += 1;
        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            self.slots[idx] = Some(value);
            EntityId {
                kind: self.kind,
                index,
                generation: self.generations[idx],
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Some(value));
            self.generations.push(0);
            EntityId {
                kind: self.kind,
                index,
                generation: 0,
            }
        }
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<T> {
        if !self.is_live(id) {
            return None;
        }
        let idx = id.index as usize;
        let value = self.slots[idx].take();
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_list.push(id.index);
        self.count -= 1;
        value
    }

    fn is_live(&self, id: EntityId) -> bool {
        let idx = id.index as usize;
        id.kind == self.kind
            && idx < self.slots.len()
            && self.generations[idx] == id.generation
            && self.slots[idx].is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        if self.is_live(id) {
            self.slots[id.index as usize].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        if self.is_live(id) {
            self.slots[id.index as usize].as_mut()
        } else {
            None
        }
    }

    fn id_at(&self, idx: usize) -> EntityId {
        EntityId {
            kind: self.kind,
            index: idx as u32,
            generation: self.generations[idx],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(i, slot)| slot.as_ref().map(|v| (self.id_at(i), v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        let kind = self.kind;
        let generations = &self.generations;
        self.slots.iter_mut().enumerate().filter_map(move |(i, slot)| {
            slot.as_mut().map(|v| {
                (
                    EntityId {
                        kind,
                        index: i as u32,
                        generation: generations[i],
                    },
                    v,
                )
            })
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
