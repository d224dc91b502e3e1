use macroquad::prelude::*;

use crate::camera::CameraController;
use crate::entity::{Driftwood, EntityId, Rock, Shrub, SignalFire, Structure, Tree};
use crate::hooks::{MessageLog, Notifier, RunRecorder};
use crate::interaction::Interaction;
use crate::player::{Direction, PlayerState};
use crate::shadow::Shadow;
use crate::shark::SharkState;
use crate::simulation::{GamePhase, Simulation, SimulationContext};
use crate::terrain::{self, Tile};
use crate::time::{DayPhase, TimeState};
use crate::world::WorldState;

const BG_COLOR: Color = Color::new(0.05, 0.18, 0.35, 1.0);
const BARK: Color = Color::new(0.45, 0.30, 0.16, 1.0);
const STUMP: Color = Color::new(0.55, 0.40, 0.24, 1.0);

/// How dark the world overlay is at this time of day, 0 = full daylight.
pub fn darkness(time: &TimeState) -> f32 {
    const NIGHT: f32 = 0.55;
    let f = time.fraction();
    match time.phase() {
        DayPhase::Night => NIGHT,
        DayPhase::Dawn => {
            // Lighten across the dawn window.
            let t = (f / time.morning_start.max(f32::EPSILON)).clamp(0.0, 1.0);
            NIGHT * (1.0 - t)
        }
        DayPhase::Evening => {
            let span = (time.night_start - time.evening_start).max(f32::EPSILON);
            NIGHT * ((f - time.evening_start) / span).clamp(0.0, 1.0)
        }
        DayPhase::Morning | DayPhase::Afternoon => 0.0,
    }
}

/// Draw the world in camera space.
pub fn draw<N: Notifier, R: RunRecorder>(sim: &Simulation<N, R>, camera: &CameraController) {
    clear_background(BG_COLOR);
    set_camera(&camera.to_macroquad_camera());

    let ctx = &sim.ctx;
    let world = &ctx.world;
    terrain::draw_terrain(&world.grid, &world.grass_patches);

    draw_shadows(&ctx.shadows);
    for d in world.driftwood.values() {
        draw_driftwood(d);
    }
    for r in world.rocks.values() {
        draw_rock(r);
    }
    for s in world.shrubs.values() {
        draw_shrub(s);
    }
    for c in world.campfires.values() {
        draw_campfire(c);
    }
    for p in world.purifiers.values() {
        draw_purifier(p);
    }
    for f in world.signal_fires.values() {
        draw_signal_fire(f);
    }
    for s in world.shelters.values() {
        draw_shelter(s);
    }

    draw_fish_jump(ctx);
    draw_shark(&ctx.shark, world);
    if !ctx.player.is_inside_shelter() {
        draw_player(&ctx.player);
    }

    // Trees last so canopies cover the player.
    for t in world.trees.values() {
        draw_tree(t);
    }

    if sim.phase == GamePhase::Running {
        draw_target(world, sim.target);
    }

    let dark = darkness(&ctx.time);
    if dark > 0.0 {
        draw_rectangle(0.0, 0.0, world.width(), world.height(), Color::new(0.02, 0.03, 0.12, dark));
    }

    set_default_camera();
}

fn draw_shadows(shadows: &[(EntityId, Shadow)]) {
    let color = Color::new(0.0, 0.0, 0.0, 0.25);
    for (_, s) in shadows {
        draw_ellipse(s.center.x, s.center.y, s.radius_x, s.radius_y, 0.0, color);
    }
}

fn draw_tree(tree: &Tree) {
    let trunk = tree.trunk_rect();
    if tree.is_stump {
        let h = trunk.h * 0.6;
        draw_rectangle(trunk.x, trunk.bottom() - h, trunk.w, h, STUMP);
        draw_ellipse(trunk.center().x, trunk.bottom() - h, trunk.w * 0.5, 3.0, 0.0, BARK);
        return;
    }
    let r = tree.rect;
    draw_rectangle(trunk.x, r.y + r.h * 0.45, trunk.w, r.bottom() - (r.y + r.h * 0.45), BARK);
    let canopy = Color::new(0.16, 0.45, 0.18, 1.0);
    let cx = r.center().x;
    draw_circle(cx, r.y + r.h * 0.3, r.w * 0.45, canopy);
    draw_circle(cx - r.w * 0.22, r.y + r.h * 0.4, r.w * 0.32, canopy);
    draw_circle(cx + r.w * 0.22, r.y + r.h * 0.4, r.w * 0.32, canopy);
}

fn draw_rock(rock: &Rock) {
    let r = rock.rect;
    let color = if rock.remaining > 0 {
        Color::new(0.52, 0.52, 0.55, 1.0)
    } else {
        Color::new(0.35, 0.35, 0.37, 1.0)
    };
    draw_ellipse(r.center().x, r.center().y, r.w * 0.5, r.h * 0.45, 0.0, color);
    draw_ellipse_lines(r.center().x, r.center().y, r.w * 0.5, r.h * 0.45, 0.0, 1.5, Color::new(0.25, 0.25, 0.27, 1.0));
}

fn draw_shrub(shrub: &Shrub) {
    let r = shrub.rect;
    if shrub.is_stump {
        if shrub.stump_timer > 0.0 {
            draw_rectangle(r.center().x - 3.0, r.bottom() - 6.0, 6.0, 6.0, STUMP);
        }
        return;
    }
    let leaf = Color::new(0.22, 0.55, 0.22, 1.0);
    draw_ellipse(r.center().x, r.center().y, r.w * 0.5, r.h * 0.5, 0.0, leaf);
    draw_circle(r.center().x - r.w * 0.15, r.center().y - r.h * 0.1, 2.0, Color::new(0.8, 0.2, 0.25, 1.0));
}

fn draw_driftwood(d: &Driftwood) {
    let r = d.rect;
    draw_rectangle(r.x, r.y, r.w, r.h, Color::new(0.62, 0.50, 0.36, 1.0));
    draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, Color::new(0.40, 0.30, 0.20, 1.0));
}

fn draw_flame(base: Vec2, height: f32) {
    let t = get_time() as f32;
    let flicker = 1.0 + (t * 12.0).sin() * 0.08;
    let h = height * flicker;
    draw_triangle(
        vec2(base.x - h * 0.35, base.y),
        vec2(base.x + h * 0.35, base.y),
        vec2(base.x, base.y - h),
        Color::new(1.0, 0.55, 0.1, 0.95),
    );
    draw_triangle(
        vec2(base.x - h * 0.18, base.y),
        vec2(base.x + h * 0.18, base.y),
        vec2(base.x, base.y - h * 0.6),
        Color::new(1.0, 0.9, 0.3, 0.95),
    );
}

fn draw_campfire(c: &Structure) {
    let r = c.rect;
    let center = r.center();
    for i in 0..8 {
        let a = i as f32 / 8.0 * std::f32::consts::TAU;
        let p = center + vec2(a.cos(), a.sin()) * r.w * 0.38;
        draw_circle(p.x, p.y, r.w * 0.09, Color::new(0.5, 0.5, 0.5, 1.0));
    }
    draw_flame(center + vec2(0.0, r.h * 0.15), r.h * 0.5);
}

fn draw_shelter(s: &Structure) {
    let r = s.rect;
    let wall = Color::new(0.55, 0.42, 0.25, 1.0);
    let roof = Color::new(0.42, 0.55, 0.25, 1.0);
    draw_rectangle(r.x + 4.0, r.y + r.h * 0.45, r.w - 8.0, r.h * 0.55, wall);
    draw_triangle(
        vec2(r.x, r.y + r.h * 0.5),
        vec2(r.right(), r.y + r.h * 0.5),
        vec2(r.center().x, r.y),
        roof,
    );
    draw_rectangle(r.center().x - 6.0, r.bottom() - r.h * 0.35, 12.0, r.h * 0.35, Color::new(0.2, 0.14, 0.08, 1.0));
}

fn draw_purifier(p: &Structure) {
    let r = p.rect;
    draw_rectangle(r.x, r.y, r.w, r.h, Color::new(0.35, 0.45, 0.55, 1.0));
    draw_rectangle(r.x + 6.0, r.y + 6.0, r.w - 12.0, r.h - 12.0, Color::new(0.55, 0.80, 0.95, 1.0));
    draw_rectangle_lines(r.x, r.y, r.w, r.h, 2.0, Color::new(0.2, 0.25, 0.3, 1.0));
}

fn draw_signal_fire(f: &SignalFire) {
    let r = f.rect;
    let base = vec2(r.center().x, r.bottom() - 8.0);
    for i in 0..3 {
        let y = r.bottom() - 10.0 - i as f32 * 6.0;
        draw_line(r.x + 6.0, y, r.right() - 6.0, y - 4.0, 5.0, BARK);
    }
    if f.is_burning {
        let frac = f.fuel / f.max_fuel.max(f32::EPSILON);
        draw_flame(base, r.h * (0.4 + 0.6 * frac));
    }

    let w = r.w;
    let y = r.bottom() + 4.0;
    draw_rectangle(r.x, y, w, 4.0, Color::new(0.15, 0.15, 0.15, 0.6));
    draw_rectangle(r.x, y, w * (f.fuel / f.max_fuel.max(f32::EPSILON)), 4.0, Color::new(1.0, 0.6, 0.1, 0.9));
}

fn draw_fish_jump(ctx: &SimulationContext) {
    if let Some(jump) = ctx.fishing.animation {
        let height = (jump.progress * std::f32::consts::PI).sin() * 20.0;
        let x = jump.x + (jump.progress - 0.5) * 16.0;
        draw_ellipse(x, jump.surface_y - height, 6.0, 3.0, 0.0, Color::new(0.95, 0.6, 0.2, 1.0));
    }
}

fn draw_shark(shark: &SharkState, world: &WorldState) {
    if !shark.is_active() || world.tile_at_pixel(shark.pos) != Some(Tile::OceanWater) {
        return;
    }
    let p = shark.pos;
    let dir = if shark.heading.length_squared() > 0.0 {
        shark.heading.normalize()
    } else {
        vec2(1.0, 0.0)
    };
    let fin = Color::new(0.28, 0.30, 0.34, 1.0);
    draw_triangle(p - dir * 10.0 + vec2(0.0, 4.0), p + dir * 6.0 + vec2(0.0, 4.0), p - dir * 4.0 - vec2(0.0, 14.0), fin);
    draw_ellipse(p.x, p.y + 6.0, 16.0, 3.0, 0.0, Color::new(1.0, 1.0, 1.0, 0.25));
}

fn draw_player(player: &PlayerState) {
    let r = player.rect();
    draw_rectangle(r.x + 6.0, r.y + 10.0, r.w - 12.0, r.h - 10.0, Color::new(0.85, 0.35, 0.25, 1.0));
    draw_circle(r.center().x, r.y + 9.0, 8.0, Color::new(0.95, 0.78, 0.62, 1.0));

    let c = r.center();
    let offset = match player.direction {
        Direction::Up => vec2(0.0, -r.h * 0.7),
        Direction::Down => vec2(0.0, r.h * 0.7),
        Direction::Left => vec2(-r.w * 0.7, 0.0),
        Direction::Right => vec2(r.w * 0.7, 0.0),
    };
    draw_circle(c.x + offset.x, c.y + offset.y, 2.5, Color::new(1.0, 1.0, 1.0, 0.7));
}

fn draw_target(world: &WorldState, target: Interaction) {
    let id = match target {
        Interaction::AddFuel(id)
        | Interaction::UsePurifier(id)
        | Interaction::Gather(id)
        | Interaction::PickupShelter(id) => id,
        Interaction::Fish | Interaction::DrinkDirtyWater | Interaction::None => return,
    };
    if let Some(r) = world.rect_of(id) {
        draw_rectangle_lines(r.x - 2.0, r.y - 2.0, r.w + 4.0, r.h + 4.0, 2.0, Color::new(1.0, 1.0, 0.6, 0.8));
    }
}

fn shadowed_text(text: &str, x: f32, y: f32, size: f32, color: Color) {
    draw_text(text, x + 1.0, y + 1.0, size, Color::new(0.0, 0.0, 0.0, 0.6));
    draw_text(text, x, y, size, color);
}

/// Screen-space prompt, message feed and pause banner.
pub fn draw_hud<R: RunRecorder>(sim: &Simulation<MessageLog, R>) {
    let tc = Color::new(0.95, 0.95, 0.9, 1.0);

    if let Some(prompt) = sim.notifier.current_prompt() {
        let tw = measure_text(prompt, None, 22, 1.0).width;
        shadowed_text(prompt, screen_width() * 0.5 - tw * 0.5, screen_height() - 40.0, 22.0, Color::new(1.0, 0.95, 0.6, 1.0));
    }

    let mut y = screen_height() - 80.0;
    for m in sim.notifier.active().collect::<Vec<_>>().into_iter().rev() {
        let alpha = m.remaining.clamp(0.0, 1.0);
        shadowed_text(&m.text, 12.0, y, 18.0, Color::new(tc.r, tc.g, tc.b, alpha));
        y -= 20.0;
    }

    if sim.phase == GamePhase::Paused {
        let pause_text = "PAUSED (Space to resume)";
        let tw = measure_text(pause_text, None, 28, 1.0).width;
        shadowed_text(pause_text, screen_width() * 0.5 - tw * 0.5, screen_height() * 0.4, 28.0, Color::new(1.0, 0.8, 0.2, 0.9));
    }
}
