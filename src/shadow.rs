use macroquad::prelude::*;

use crate::entity::{EntityId, Tree};
use crate::time::TimeState;
use crate::world::WorldState;

/// Ground shadow ellipse cast by a tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub center: Vec2,
    pub radius_x: f32,
    pub radius_y: f32,
}

impl Shadow {
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius_x,
            self.center.y - self.radius_y,
            self.radius_x * 2.0,
            self.radius_y * 2.0,
        )
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let d = point - self.center;
        if self.radius_x > 0.0 && self.radius_y > 0.0 {
            (d.x * d.x) / (self.radius_x * self.radius_x) + (d.y * d.y) / (self.radius_y * self.radius_y) <= 1.0
        } else {
            d == Vec2::ZERO
        }
    }

    /// A body is shaded when its box touches the ellipse bounds and its center lies inside.
    pub fn shades(&self, body: Rect) -> bool {
        body.overlaps(&self.bounds()) && self.contains(body.center())
    }
}

/// Shadow for a tree at the current time. Stumps and night cast nothing.
pub fn tree_shadow(tree: &Tree, time: &TimeState) -> Option<Shadow> {
    if tree.is_stump {
        return None;
    }
    let f = time.fraction();
    if f >= time.night_start || f < time.morning_start {
        return None;
    }

    let span = time.night_start - time.morning_start;
    let angle = (std::f32::consts::PI * (f - time.morning_start) / span)
        .clamp(0.01, std::f32::consts::PI - 0.01);

    let h = tree.rect.h;
    let max_len = h * 0.5;
    let offset = vec2(-angle.cos() * max_len, angle.sin() * max_len * 0.2 + h * 0.03);
    let scale = angle.sin().max(0.3);
    let radius_x = tree.rect.w * 0.5 * scale;

    Some(Shadow {
        center: vec2(tree.rect.x + tree.rect.w * 0.5, tree.rect.bottom()) + offset,
        radius_x,
        radius_y: radius_x * 0.3,
    })
}

/// Shadows of every tree for this frame, keyed by tree handle.
pub fn compute_shadows(world: &WorldState, time: &TimeState) -> Vec<(EntityId, Shadow)> {
    world
        .trees
        .iter()
        .filter_map(|(id, tree)| tree_shadow(tree, time).map(|s| (id, s)))
        .collect()
}

pub fn body_in_shade(body: Rect, shadows: &[(EntityId, Shadow)]) -> bool {
    shadows.iter().any(|(_, s)| s.shades(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::terrain::{Tile, TileGrid};

    fn test_tree(pos: Vec2) -> Tree {
        Tree::new(Rect::new(pos.x, pos.y, 57.6, 89.6))
    }

    fn time_at(fraction: f32) -> TimeState {
        let mut time = TimeState::new(100.0);
        time.advance(fraction * 100.0);
        time
    }

    #[test]
    fn no_shadow_at_night_or_for_stumps() {
        let tree = test_tree(vec2(100.0, 100.0));
        assert!(tree_shadow(&tree, &time_at(0.1)).is_none());
        assert!(tree_shadow(&tree, &time_at(0.9)).is_none());

        let mut stump = tree.clone();
        stump.is_stump = true;
        assert!(tree_shadow(&stump, &time_at(0.5)).is_none());
    }

    #[test]
    fn shadow_shrinks_toward_noon() {
        let tree = test_tree(vec2(100.0, 100.0));
        let morning = tree_shadow(&tree, &time_at(0.16)).unwrap();
        let noon = tree_shadow(&tree, &time_at(0.5)).unwrap();

        assert!(noon.radius_x > morning.radius_x);
        let base_x = tree.rect.x + tree.rect.w * 0.5;
        assert!((noon.center.x - base_x).abs() < (morning.center.x - base_x).abs());
        assert!(morning.center.x < base_x);
        assert!((noon.radius_y - noon.radius_x * 0.3).abs() < 1e-4);
    }

    #[test]
    fn shadow_falls_east_late_in_the_day() {
        let tree = test_tree(vec2(100.0, 100.0));
        let late = tree_shadow(&tree, &time_at(0.8)).unwrap();
        assert!(late.center.x > tree.rect.x + tree.rect.w * 0.5);
    }

    #[test]
    fn body_centered_in_ellipse_is_shaded() {
        let shadow = Shadow {
            center: vec2(200.0, 200.0),
            radius_x: 30.0,
            radius_y: 9.0,
        };
        assert!(shadow.shades(Rect::new(184.0, 184.0, 32.0, 32.0)));
        assert!(!shadow.shades(Rect::new(184.0, 160.0, 32.0, 32.0)));
        assert!(!shadow.shades(Rect::new(400.0, 400.0, 32.0, 32.0)));
    }

    #[test]
    fn degenerate_ellipse_only_contains_its_center() {
        let shadow = Shadow {
            center: vec2(10.0, 10.0),
            radius_x: 0.0,
            radius_y: 0.0,
        };
        assert!(shadow.contains(vec2(10.0, 10.0)));
        assert!(!shadow.contains(vec2(10.5, 10.0)));
    }

    #[test]
    fn compute_shadows_skips_stumps() {
        let mut world = WorldState::new(TileGrid::filled(20, 20, Tile::Grass), Vec::new(), Vec2::ZERO);
        world.add(Entity::Tree(test_tree(vec2(100.0, 100.0))));
        let mut stump = test_tree(vec2(300.0, 100.0));
        stump.is_stump = true;
        world.add(Entity::Tree(stump));

        let shadows = compute_shadows(&world, &time_at(0.5));
        assert_eq!(shadows.len(), 1);

        let under = shadows[0].1.center - vec2(16.0, 16.0);
        assert!(body_in_shade(Rect::new(under.x, under.y, 32.0, 32.0), &shadows));
    }
}
