use macroquad::prelude::*;

use crate::config;

/// Follows the player, clamped so the view stays over the island when it can.
pub struct CameraController {
    pub target: Vec2,
    pub zoom: f32,
    pub smooth_target: Vec2,
    pub smooth_zoom: f32,
}

/// Keep a view of half-size `half_view` inside `[0, world]` on each axis.
/// An axis narrower than the view centers on the world instead.
pub fn clamp_focus(focus: Vec2, world: Vec2, half_view: Vec2) -> Vec2 {
    let axis = |f: f32, w: f32, h: f32| {
        if w <= h * 2.0 {
            w * 0.5
        } else {
            f.clamp(h, w - h)
        }
    };
    vec2(axis(focus.x, world.x, half_view.x), axis(focus.y, world.y, half_view.y))
}

impl CameraController {
    pub fn new(initial_target: Vec2) -> Self {
        let initial_zoom = 1.5;
        Self {
            target: initial_target,
            zoom: initial_zoom,
            smooth_target: initial_target,
            smooth_zoom: initial_zoom,
        }
    }

    /// Jump straight to `focus`, e.g. after a new island is generated.
    pub fn snap_to(&mut self, focus: Vec2) {
        self.target = focus;
        self.smooth_target = focus;
    }

    pub fn update(&mut self, focus: Vec2, world_size: Vec2, dt: f32) {
        let (_, scroll_y) = mouse_wheel();
        if scroll_y != 0.0 {
            let zoom_factor = 1.0 + scroll_y.signum() * config::CAMERA_ZOOM_SPEED;
            self.zoom = (self.zoom * zoom_factor).clamp(config::CAMERA_ZOOM_MIN, config::CAMERA_ZOOM_MAX);
        }

        let half_view = vec2(screen_width(), screen_height()) * 0.5 / self.smooth_zoom.max(f32::EPSILON);
        self.target = clamp_focus(focus, world_size, half_view);

        let smooth = 1.0 - (-config::CAMERA_SMOOTH_SPEED * dt).exp();
        self.smooth_target = self.smooth_target.lerp(self.target, smooth);
        self.smooth_zoom += (self.zoom - self.smooth_zoom) * smooth;
    }

    pub fn to_macroquad_camera(&self) -> Camera2D {
        Camera2D {
            target: self.smooth_target,
            zoom: vec2(
                self.smooth_zoom / screen_width() * 2.0,
                -self.smooth_zoom / screen_height() * 2.0,
            ),
            ..Default::default()
        }
    }
}
