//! Frame builder: game state to screen-space triangles
//!
//! Backdrop first, then world objects far to near, then the runner, then
//! particles. All world positions go through the camera projection; the
//! screen-shake offset is applied to the whole frame at the end.

use glam::Vec2;

use super::shapes::{circle, ellipse, line, quad, rect, ring};
use super::vertex::{Vertex, colors, shade, with_alpha};
use crate::consts::*;
use crate::settings::Palette;
use crate::sim::projection::Camera;
use crate::sim::state::{Barrier, BarrierKind, Coin, GameState, PowerUp, PowerUpKind, Train};
use crate::sim::world::SceneObject;

/// Nothing nearer than this is drawn
const NEAR_CLIP: f32 = 0.2;
const TIE_SPACING: f32 = 2.5;
const TRACK_HALF_WIDTH: f32 = 1.6;
const RAIL_OFFSETS: [f32; 6] = [-1.15, -0.85, -0.15, 0.15, 0.85, 1.15];
const RAIL_SEGMENT: f32 = 4.0;
const COIN_RADIUS: f32 = 0.2;
const POWERUP_RADIUS: f32 = 0.3;

/// Build every triangle for one frame in pixel coordinates
pub fn build_frame(state: &GameState, palette: &Palette) -> Vec<Vertex> {
    let camera = &state.camera;
    let mut out = Vec::with_capacity(4096);

    backdrop(&mut out, camera, state.scroll_offset);

    for object in state.world.sorted_objects() {
        match object {
            SceneObject::Train(t) => train(&mut out, camera, t),
            SceneObject::Barrier(b) => barrier(&mut out, camera, b),
            SceneObject::Coin(c) => coin(&mut out, camera, c, state.time),
            SceneObject::PowerUp(p) => powerup(&mut out, camera, p, state.time),
        }
    }

    // Hidden once the crash shake has settled
    if !state.player.dead || state.shake_time > 0.0 {
        runner(&mut out, state, palette);
    }

    for p in &state.particles.particles {
        let size = p.draw_size();
        rect(
            &mut out,
            p.pos - Vec2::splat(size / 2.0),
            Vec2::splat(size),
            with_alpha(p.color, p.color[3] * p.alpha()),
        );
    }

    // Run time stops after a crash; the shake timer keeps ticking
    let offset = shake_offset(state.shake_intensity(), state.shake_time);
    if offset != Vec2::ZERO {
        for v in &mut out {
            v.position[0] += offset.x;
            v.position[1] += offset.y;
        }
    }
    out
}

/// Jitter for the current shake; deterministic in the remaining shake time
pub fn shake_offset(intensity: f32, shake_time: f32) -> Vec2 {
    if intensity <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new((shake_time * 97.0).sin() * 0.5, (shake_time * 131.0).cos() * 0.5) * intensity
}

fn project(camera: &Camera, x: f32, y: f32, z: f32) -> Vec2 {
    camera.project(x, y, z).pos()
}

fn backdrop(out: &mut Vec<Vertex>, camera: &Camera, scroll_offset: f32) {
    rect(
        out,
        Vec2::ZERO,
        Vec2::new(camera.width, camera.horizon_y),
        colors::SKY,
    );
    rect(
        out,
        Vec2::new(0.0, camera.horizon_y),
        Vec2::new(camera.width, camera.height - camera.horizon_y),
        colors::GROUND,
    );

    // Track bed as one trapezoid to the draw distance
    quad(
        out,
        [
            project(camera, -TRACK_HALF_WIDTH, 0.0, 0.0),
            project(camera, TRACK_HALF_WIDTH, 0.0, 0.0),
            project(camera, TRACK_HALF_WIDTH, 0.0, DRAW_DISTANCE),
            project(camera, -TRACK_HALF_WIDTH, 0.0, DRAW_DISTANCE),
        ],
        colors::TRACK_BED,
    );

    // Ties scroll with the ground
    let offset = scroll_offset.rem_euclid(TIE_SPACING);
    let mut z = TIE_SPACING - offset;
    while z < DRAW_DISTANCE {
        let s = camera.scale_at(z);
        line(
            out,
            project(camera, -TRACK_HALF_WIDTH, 0.0, z),
            project(camera, TRACK_HALF_WIDTH, 0.0, z),
            (s * 4.0).max(1.0),
            colors::TIE,
        );
        z += TIE_SPACING;
    }

    for rx in RAIL_OFFSETS {
        let mut z = 0.0;
        while z < DRAW_DISTANCE {
            let width = (camera.scale_at(z) * 3.0).max(1.0);
            line(
                out,
                project(camera, rx, 0.0, z),
                project(camera, rx, 0.0, z + RAIL_SEGMENT),
                width,
                colors::RAIL,
            );
            z += RAIL_SEGMENT;
        }
    }
}

fn train(out: &mut Vec<Vertex>, camera: &Camera, t: &Train) {
    let z0 = t.z.max(NEAR_CLIP);
    let z1 = t.z + t.length;
    if z1 < NEAR_CLIP || z0 > DRAW_DISTANCE {
        return;
    }
    let (x, hw, h) = (t.x(), t.width / 2.0, t.height);
    let corner = |dx: f32, y: f32, z: f32| project(camera, x + dx, y, z);

    // Roof
    quad(
        out,
        [corner(-hw, h, z0), corner(hw, h, z0), corner(hw, h, z1), corner(-hw, h, z1)],
        shade(t.color, colors::TRAIN_ROOF_SHADE),
    );
    // Both long sides; the hidden one is covered by the front/roof
    for side in [-hw, hw] {
        quad(
            out,
            [corner(side, 0.0, z0), corner(side, 0.0, z1), corner(side, h, z1), corner(side, h, z0)],
            shade(t.color, colors::TRAIN_SIDE_SHADE),
        );
    }
    // Front face and windscreen
    quad(
        out,
        [corner(-hw, 0.0, z0), corner(hw, 0.0, z0), corner(hw, h, z0), corner(-hw, h, z0)],
        t.color,
    );
    if t.z >= NEAR_CLIP {
        quad(
            out,
            [
                corner(-hw * 0.6, h * 0.45, z0),
                corner(hw * 0.6, h * 0.45, z0),
                corner(hw * 0.6, h * 0.8, z0),
                corner(-hw * 0.6, h * 0.8, z0),
            ],
            colors::TRAIN_WINDOW,
        );
    }
}

fn barrier(out: &mut Vec<Vertex>, camera: &Camera, b: &Barrier) {
    if b.z < NEAR_CLIP || b.z > DRAW_DISTANCE {
        return;
    }
    let (x, hw) = (b.x(), b.width / 2.0);
    let (y_base, y_top) = match b.kind {
        BarrierKind::Low => (0.0, b.height()),
        BarrierKind::High => (BARRIER_HIGH_Y, b.height()),
    };

    if b.kind == BarrierKind::High {
        let width = (camera.scale_at(b.z) * 4.0).max(1.0);
        for px in [x - hw, x + hw] {
            line(
                out,
                project(camera, px, 0.0, b.z),
                project(camera, px, y_base, b.z),
                width,
                colors::BARRIER_POST,
            );
        }
    }

    // Top face
    quad(
        out,
        [
            project(camera, x - hw, y_top, b.z),
            project(camera, x + hw, y_top, b.z),
            project(camera, x + hw, y_top, b.z + BARRIER_DEPTH),
            project(camera, x - hw, y_top, b.z + BARRIER_DEPTH),
        ],
        colors::BARRIER_STRIPE_A,
    );

    // Striped front
    const STRIPES: usize = 5;
    for i in 0..STRIPES {
        let y1 = y_base + (y_top - y_base) * i as f32 / STRIPES as f32;
        let y2 = y_base + (y_top - y_base) * (i + 1) as f32 / STRIPES as f32;
        let color = if i % 2 == 0 {
            colors::BARRIER_STRIPE_A
        } else {
            colors::BARRIER_STRIPE_B
        };
        quad(
            out,
            [
                project(camera, x - hw, y1, b.z),
                project(camera, x + hw, y1, b.z),
                project(camera, x + hw, y2, b.z),
                project(camera, x - hw, y2, b.z),
            ],
            color,
        );
    }
}

fn coin(out: &mut Vec<Vertex>, camera: &Camera, c: &Coin, time: f32) {
    if c.z < NEAR_CLIP || c.z > DRAW_DISTANCE || c.collected {
        return;
    }
    let bob = (time * 3.0 + c.phase).sin() * 0.15;
    let p = camera.project(c.x, c.y + bob, c.z);
    let r = (p.scale * COIN_RADIUS * camera.road_half_width).max(2.0);
    let spin = (time * 4.0 + c.phase).cos().abs().max(0.1);

    ellipse(out, p.pos(), Vec2::new(r * spin, r), colors::COIN_RIM, 12);
    ellipse(out, p.pos(), Vec2::new(r * spin * 0.75, r * 0.75), colors::COIN, 12);
}

fn powerup_color(kind: PowerUpKind) -> [f32; 4] {
    match kind {
        PowerUpKind::Magnet => colors::MAGNET,
        PowerUpKind::Multiplier => colors::MULTIPLIER,
        PowerUpKind::Jetpack => colors::JETPACK,
    }
}

fn powerup(out: &mut Vec<Vertex>, camera: &Camera, pu: &PowerUp, time: f32) {
    if pu.z < NEAR_CLIP || pu.z > DRAW_DISTANCE || pu.collected {
        return;
    }
    let bob = (time * 2.0 + pu.phase).sin() * 0.25;
    let p = camera.project(pu.x(), pu.y + bob, pu.z);
    let r = (p.scale * POWERUP_RADIUS * camera.road_half_width).max(4.0);

    circle(out, p.pos(), r * 1.4, colors::GLOW, 20);
    circle(out, p.pos(), r, powerup_color(pu.kind), 20);
    ring(out, p.pos(), r * 0.6, r * 0.7, with_alpha([1.0; 4], 0.5), 20);
}

fn runner(out: &mut Vec<Vertex>, state: &GameState, palette: &Palette) {
    let camera = &state.camera;
    let player = &state.player;

    let ground = camera.project(player.x, 0.0, PLAYER_DRAW_Z);
    let p = camera.project(player.x, player.y, PLAYER_DRAW_Z);
    let scale = p.scale * 1.1;
    let full_h = camera.unit_height * scale;
    let w = camera.road_half_width * 0.35 * scale;
    let h = if player.sliding { full_h * 0.45 } else { full_h };

    // Shadow shrinks with altitude
    let lift = (1.0 - player.y / 6.0).clamp(0.3, 1.0);
    ellipse(
        out,
        ground.pos(),
        Vec2::new(w * 0.6 * lift, w * 0.15 * lift),
        colors::SHADOW,
        16,
    );

    let feet = p.pos();
    let swing = if player.is_airborne() || player.sliding {
        0.0
    } else {
        (player.run_frame as f32 / RUN_FRAME_COUNT as f32 * std::f32::consts::TAU).sin()
    };

    // Legs
    let leg_h = h * 0.4;
    let leg_w = w * 0.22;
    for (side, phase) in [(-1.0f32, 1.0f32), (1.0, -1.0)] {
        let x = feet.x + side * w * 0.15 - leg_w / 2.0 + swing * phase * w * 0.12;
        rect(out, Vec2::new(x, feet.y - leg_h), Vec2::new(leg_w, leg_h), palette.pants);
        rect(
            out,
            Vec2::new(x - leg_w * 0.1, feet.y - leg_h * 0.15),
            Vec2::new(leg_w * 1.2, leg_h * 0.15),
            palette.shoes,
        );
    }

    // Torso
    let torso_h = h * 0.38;
    let torso_top = feet.y - leg_h - torso_h;
    rect(
        out,
        Vec2::new(feet.x - w * 0.35, torso_top),
        Vec2::new(w * 0.7, torso_h),
        palette.hoodie,
    );

    // Head and cap
    let head_r = h * 0.11;
    let head = Vec2::new(feet.x, torso_top - head_r);
    circle(out, head, head_r, palette.skin, 16);
    rect(
        out,
        Vec2::new(head.x - head_r, head.y - head_r),
        Vec2::new(head_r * 2.0, head_r * 0.8),
        palette.cap,
    );

    if player.has_jetpack {
        let pack = Vec2::new(feet.x - w * 0.25, torso_top + torso_h * 0.2);
        rect(out, pack, Vec2::new(w * 0.5, torso_h * 0.6), colors::BARRIER_POST);
        let flicker = 0.7 + 0.3 * (state.time * 40.0).sin().abs();
        ellipse(
            out,
            Vec2::new(feet.x, pack.y + torso_h * 0.6 + h * 0.1 * flicker),
            Vec2::new(w * 0.15, h * 0.1 * flicker),
            colors::FLAME,
            10,
        );
    }

    if player.has_magnet {
        ring(out, head, head_r * 1.8, head_r * 2.0, with_alpha(colors::MAGNET, 0.6), 20);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Character;
    use crate::sim::state::{GamePhase, TRAIN_COLORS};
    use crate::sim::tick::tick_effects;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        let mut state = GameState::new(1, Tuning::default());
        state.phase = GamePhase::Playing;
        state
    }

    fn contains_color(verts: &[Vertex], color: [f32; 4]) -> bool {
        verts.iter().any(|v| v.color == color)
    }

    #[test]
    fn test_empty_world_draws_backdrop_and_runner() {
        let s = state();
        let palette = Character::Jake.palette();
        let verts = build_frame(&s, &palette);
        assert!(!verts.is_empty());
        assert_eq!(verts.len() % 3, 0);
        assert!(contains_color(&verts, colors::SKY));
        assert!(contains_color(&verts, palette.hoodie));
    }

    #[test]
    fn test_far_objects_drawn_first() {
        let mut s = state();
        let near = [0.1, 0.2, 0.3, 1.0];
        let far = [0.4, 0.5, 0.6, 1.0];
        s.world.trains.push(Train::new(0, 10.0, 5.0, near));
        s.world.trains.push(Train::new(2, 80.0, 5.0, far));
        let verts = build_frame(&s, &Character::Jake.palette());
        let first = |c: [f32; 4]| verts.iter().position(|v| v.color == c);
        assert!(first(far).expect("far train") < first(near).expect("near train"));
    }

    #[test]
    fn test_objects_behind_camera_skipped() {
        let mut s = state();
        let color = TRAIN_COLORS[3];
        s.world.trains.push(Train::new(0, -20.0, 5.0, color));
        let verts = build_frame(&s, &Character::Jake.palette());
        assert!(!contains_color(&verts, color));
    }

    #[test]
    fn test_dead_runner_hidden_after_shake() {
        let mut s = state();
        let palette = Character::Spike.palette();
        s.player.dead = true;
        s.shake_time = 0.1;
        assert!(contains_color(&build_frame(&s, &palette), palette.hoodie));
        s.shake_time = 0.0;
        assert!(!contains_color(&build_frame(&s, &palette), palette.hoodie));
    }

    #[test]
    fn test_shake_moves_everything() {
        let mut s = state();
        s.time = 1.234;
        let palette = Character::Jake.palette();
        let still = build_frame(&s, &palette);
        s.shake_time = 0.3;
        let shaken = build_frame(&s, &palette);
        let expected = shake_offset(s.shake_intensity(), s.shake_time);
        assert_ne!(expected, Vec2::ZERO);
        assert_eq!(still.len(), shaken.len());
        let dx = shaken[0].position[0] - still[0].position[0];
        assert!((dx - expected.x).abs() < 1e-3);
    }

    #[test]
    fn test_crash_shake_changes_direction_each_frame() {
        let mut s = state();
        s.time = 4.0;
        s.phase = GamePhase::GameOver;
        s.player.dead = true;
        s.shake_time = s.tuning.shake_duration;
        let palette = Character::Jake.palette();

        let mut directions = Vec::new();
        for _ in 0..5 {
            let mut still = s.clone();
            still.shake_time = 0.0;
            let base = build_frame(&still, &palette)[0].position;
            let moved = build_frame(&s, &palette)[0].position;
            let offset = Vec2::new(moved[0] - base[0], moved[1] - base[1]);
            assert_ne!(offset, Vec2::ZERO);
            directions.push(offset.normalize_or_zero());
            tick_effects(&mut s, 0.016);
        }
        assert_eq!(s.time, 4.0);
        assert!(
            directions
                .windows(2)
                .any(|w| (w[0] - w[1]).length() > 0.1),
            "shake stuck at {:?}",
            directions[0]
        );
    }

    #[test]
    fn test_no_shake_no_offset() {
        assert_eq!(shake_offset(0.0, 5.0), Vec2::ZERO);
    }
}
