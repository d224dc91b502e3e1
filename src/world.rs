use macroquad::prelude::*;

use crate::entity::{
    Driftwood, Entity, EntityArena, EntityId, EntityKind, Rock, Shrub, SignalFire, Structure, Tree,
};
use crate::terrain::{GrassPatch, Tile, TileGrid};

/// Owns the tile grid and every placed object. No game rules live here.
#[derive(Clone, Debug)]
pub struct WorldState {
    pub grid: TileGrid,
    pub grass_patches: Vec<GrassPatch>,
    pub spawn: Vec2,
    pub trees: EntityArena<Tree>,
    pub rocks: EntityArena<Rock>,
    pub shrubs: EntityArena<Shrub>,
    pub driftwood: EntityArena<Driftwood>,
    pub campfires: EntityArena<Structure>,
    pub shelters: EntityArena<Structure>,
    pub purifiers: EntityArena<Structure>,
    pub signal_fires: EntityArena<SignalFire>,
}

impl WorldState {
    pub fn new(grid: TileGrid, grass_patches: Vec<GrassPatch>, spawn: Vec2) -> Self {
        Self {
            grid,
            grass_patches,
            spawn,
            trees: EntityArena::new(EntityKind::Tree),
            rocks: EntityArena::new(EntityKind::Rock),
            shrubs: EntityArena::new(EntityKind::Shrub),
            driftwood: EntityArena::new(EntityKind::Driftwood),
            campfires: EntityArena::new(EntityKind::Campfire),
            shelters: EntityArena::new(EntityKind::Shelter),
            purifiers: EntityArena::new(EntityKind::WaterPurifier),
            signal_fires: EntityArena::new(EntityKind::SignalFire),
        }
    }

    pub fn width(&self) -> f32 {
        self.grid.pixel_width()
    }

    pub fn height(&self) -> f32 {
        self.grid.pixel_height()
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width() * 0.5, self.height() * 0.5)
    }

    pub fn contains_rect(&self, rect: &Rect) -> bool {
        rect.x >= 0.0 && rect.y >= 0.0 && rect.right() <= self.width() && rect.bottom() <= self.height()
    }

    pub fn tile_at(&self, tx: i32, ty: i32) -> Option<Tile> {
        self.grid.get(tx, ty)
    }

    pub fn tile_at_pixel(&self, pos: Vec2) -> Option<Tile> {
        self.grid.tile_at_pixel(pos)
    }

    pub fn add(&mut self, entity: Entity) -> EntityId {
        match entity {
            Entity::Tree(t) => self.trees.spawn(t),
            Entity::Rock(r) => self.rocks.spawn(r),
            Entity::Shrub(s) => self.shrubs.spawn(s),
            Entity::Driftwood(d) => self.driftwood.spawn(d),
            Entity::Campfire(s) => self.campfires.spawn(s),
            Entity::Shelter(s) => self.shelters.spawn(s),
            Entity::WaterPurifier(s) => self.purifiers.spawn(s),
            Entity::SignalFire(f) => self.signal_fires.spawn(f),
        }
    }

    /// Remove by handle. Stale or foreign handles return `None`.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        match id.kind {
            EntityKind::Tree => self.trees.despawn(id).map(Entity::Tree),
            EntityKind::Rock => self.rocks.despawn(id).map(Entity::Rock),
            EntityKind::Shrub => self.shrubs.despawn(id).map(Entity::Shrub),
            EntityKind::Driftwood => self.driftwood.despawn(id).map(Entity::Driftwood),
            EntityKind::Campfire => self.campfires.despawn(id).map(Entity::Campfire),
            EntityKind::Shelter => self.shelters.despawn(id).map(Entity::Shelter),
            EntityKind::WaterPurifier => self.purifiers.despawn(id).map(Entity::WaterPurifier),
            EntityKind::SignalFire => self.signal_fires.despawn(id).map(Entity::SignalFire),
        }
    }

    pub fn rect_of(&self, id: EntityId) -> Option<Rect> {
        match id.kind {
            EntityKind::Tree => self.trees.get(id).map(|t| t.rect),
            EntityKind::Rock => self.rocks.get(id).map(|r| r.rect),
            EntityKind::Shrub => self.shrubs.get(id).map(|s| s.rect),
            EntityKind::Driftwood => self.driftwood.get(id).map(|d| d.rect),
            EntityKind::Campfire => self.campfires.get(id).map(|s| s.rect),
            EntityKind::Shelter => self.shelters.get(id).map(|s| s.rect),
            EntityKind::WaterPurifier => self.purifiers.get(id).map(|s| s.rect),
            EntityKind::SignalFire => self.signal_fires.get(id).map(|f| f.rect),
        }
    }

    /// Handles and bounds of every object of one kind.
    pub fn query(&self, kind: EntityKind) -> Vec<(EntityId, Rect)> {
        match kind {
            EntityKind::Tree => self.trees.iter().map(|(id, t)| (id, t.rect)).collect(),
            EntityKind::Rock => self.rocks.iter().map(|(id, r)| (id, r.rect)).collect(),
            EntityKind::Shrub => self.shrubs.iter().map(|(id, s)| (id, s.rect)).collect(),
            EntityKind::Driftwood => self.driftwood.iter().map(|(id, d)| (id, d.rect)).collect(),
            EntityKind::Campfire => self.campfires.iter().map(|(id, s)| (id, s.rect)).collect(),
            EntityKind::Shelter => self.shelters.iter().map(|(id, s)| (id, s.rect)).collect(),
            EntityKind::WaterPurifier => self.purifiers.iter().map(|(id, s)| (id, s.rect)).collect(),
            EntityKind::SignalFire => self.signal_fires.iter().map(|(id, f)| (id, f.rect)).collect(),
        }
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Tree => self.trees.len(),
            EntityKind::Rock => self.rocks.len(),
            EntityKind::Shrub => self.shrubs.len(),
            EntityKind::Driftwood => self.driftwood.len(),
            EntityKind::Campfire => self.campfires.len(),
            EntityKind::Shelter => self.shelters.len(),
            EntityKind::WaterPurifier => self.purifiers.len(),
            EntityKind::SignalFire => self.signal_fires.len(),
        }
    }

    /// Boxes that block walking: trunks of standing trees, rocks, uncut shrubs and every structure.
    pub fn movement_blockers(&self) -> Vec<Rect> {
        let mut out: Vec<Rect> = self
            .trees
            .values()
            .filter(|t| !t.is_stump)
            .map(|t| t.trunk_rect())
            .collect();
        out.extend(self.rocks.values().map(|r| r.rect));
        out.extend(self.shrubs.values().filter(|s| !s.is_stump).map(|s| s.rect));
        out.extend(self.structure_rects());
        out
    }

    /// Boxes that block placing a new structure. Driftwood counts here but not for walking.
    pub fn placement_blockers(&self) -> Vec<Rect> {
        let mut out: Vec<Rect> = self
            .trees
            .values()
            .filter(|t| !t.is_stump)
            .map(|t| t.rect)
            .collect();
        out.extend(self.rocks.values().map(|r| r.rect));
        out.extend(self.shrubs.values().filter(|s| !s.is_stump).map(|s| s.rect));
        out.extend(self.driftwood.values().map(|d| d.rect));
        out.extend(self.structure_rects());
        out
    }

    fn structure_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.campfires
            .values()
            .chain(self.shelters.values())
            .chain(self.purifiers.values())
            .map(|s| s.rect)
            .chain(self.signal_fires.values().map(|f| f.rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_world() -> WorldState {
        WorldState::new(TileGrid::filled(10, 10, Tile::Grass), Vec::new(), vec2(16.0, 16.0))
    }

    #[test]
    fn add_query_remove_roundtrip_per_kind() {
        let mut world = empty_world();
        let rect = Rect::new(32.0, 32.0, 20.0, 20.0);
        let ids: Vec<EntityId> = vec![
            world.add(Entity::Tree(Tree::new(rect))),
            world.add(Entity::Rock(Rock { rect, remaining: 10 })),
            world.add(Entity::Shrub(Shrub::new(rect))),
            world.add(Entity::Driftwood(Driftwood { rect, wood: 50 })),
            world.add(Entity::Campfire(Structure { rect })),
            world.add(Entity::Shelter(Structure { rect })),
            world.add(Entity::WaterPurifier(Structure { rect })),
            world.add(Entity::SignalFire(SignalFire::new(rect))),
        ];

        for (id, kind) in ids.iter().zip(EntityKind::ALL) {
            assert_eq!(id.kind, kind);
            assert_eq!(world.query(kind), vec![(*id, rect)]);
        }

        for id in &ids {
            let removed = world.remove(*id).unwrap();
            assert_eq!(removed.kind(), id.kind);
            assert_eq!(world.count(id.kind), 0);
        }
    }

    #[test]
    fn removing_one_of_two_identical_objects_keeps_the_other() {
        let mut world = empty_world();
        let rect = Rect::new(0.0, 0.0, 10.0, 4.0);
        let a = world.add(Entity::Driftwood(Driftwood { rect, wood: 60 }));
        let b = world.add(Entity::Driftwood(Driftwood { rect, wood: 60 }));

        world.remove(a);
        assert!(world.driftwood.get(b).is_some());
        assert!(world.remove(a).is_none());
    }

    #[test]
    fn stumps_do_not_block_movement() {
        let mut world = empty_world();
        let mut tree = Tree::new(Rect::new(0.0, 0.0, 57.6, 89.6));
        tree.is_stump = true;
        world.add(Entity::Tree(tree));
        assert!(world.movement_blockers().is_empty());
    }

    #[test]
    fn tile_lookup_outside_grid_is_none() {
        let world = empty_world();
        assert_eq!(world.tile_at(0, 0), Some(Tile::Grass));
        assert_eq!(world.tile_at(-1, 0), None);
        assert_eq!(world.tile_at_pixel(vec2(400.0, 10.0)), None);
    }
}
