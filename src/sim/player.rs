//! The runner: lane switching, jump/slide arcs, and timed buffs
//!
//! Intent methods return `true` only when they changed state, so callers can
//! gate feedback (sound) on it.

use std::f32::consts::PI;

use super::collision::Hitbox;
use crate::consts::*;
use crate::lane_x;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Lane the player is committed to (follows `target_lane`)
    pub lane: usize,
    pub target_lane: usize,
    /// Continuous lateral position, interpolates toward the target lane
    pub x: f32,
    /// Height above the rail bed
    pub y: f32,

    pub jumping: bool,
    pub jump_time: f32,
    pub sliding: bool,
    pub slide_time: f32,

    pub has_magnet: bool,
    pub magnet_time: f32,
    pub has_multiplier: bool,
    pub multiplier_time: f32,
    pub has_jetpack: bool,
    pub jetpack_time: f32,

    pub run_frame: u8,
    run_timer: f32,

    pub dead: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            lane: 1,
            target_lane: 1,
            x: 0.0,
            y: 0.0,
            jumping: false,
            jump_time: 0.0,
            sliding: false,
            slide_time: 0.0,
            has_magnet: false,
            magnet_time: 0.0,
            has_multiplier: false,
            multiplier_time: 0.0,
            has_jetpack: false,
            jetpack_time: 0.0,
            run_frame: 0,
            run_timer: 0.0,
            dead: false,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the centre lane with no buffs, ready for a new run
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn move_left(&mut self) -> bool {
        if self.target_lane > 0 {
            self.target_lane -= 1;
            true
        } else {
            false
        }
    }

    pub fn move_right(&mut self) -> bool {
        if self.target_lane < LANE_COUNT - 1 {
            self.target_lane += 1;
            true
        } else {
            false
        }
    }

    pub fn jump(&mut self) -> bool {
        if self.has_jetpack || self.jumping {
            return false;
        }
        self.jumping = true;
        self.jump_time = 0.0;
        self.sliding = false;
        true
    }

    /// Slide; while airborne this is a fast-fall straight into the slide
    pub fn slide(&mut self) -> bool {
        if self.has_jetpack {
            return false;
        }
        if self.jumping {
            self.jumping = false;
            self.y = 0.0;
        } else if self.sliding {
            return false;
        }
        self.sliding = true;
        self.slide_time = 0.0;
        true
    }

    /// Start (or restart) the jetpack
    pub fn activate_jetpack(&mut self, duration: f32) {
        self.has_jetpack = true;
        self.jetpack_time = duration;
    }

    pub fn activate_magnet(&mut self, duration: f32) {
        self.has_magnet = true;
        self.magnet_time = duration;
    }

    pub fn activate_multiplier(&mut self, duration: f32) {
        self.has_multiplier = true;
        self.multiplier_time = duration;
    }

    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        let dt = dt.max(0.0);
        self.update_lane(dt, tuning.lane_switch_speed);

        if self.jumping {
            self.jump_time += dt;
            let t = self.jump_time / tuning.jump_duration;
            if t >= 1.0 {
                self.jumping = false;
                self.y = 0.0;
            } else {
                self.y = tuning.jump_height * (t * PI).sin();
            }
        }

        if self.has_jetpack {
            self.jetpack_time = (self.jetpack_time - dt).max(0.0);
            self.y = tuning.jetpack_height();
            self.jumping = false;
            self.sliding = false;
            if self.jetpack_time <= 0.0 {
                // Drop back down along the second half of a jump arc
                self.has_jetpack = false;
                self.jumping = true;
                self.jump_time = tuning.jump_duration * 0.5;
            }
        }

        if self.sliding {
            self.slide_time += dt;
            if self.slide_time >= tuning.slide_duration {
                self.sliding = false;
            }
        }

        if self.has_magnet {
            self.magnet_time = (self.magnet_time - dt).max(0.0);
            if self.magnet_time <= 0.0 {
                self.has_magnet = false;
            }
        }
        if self.has_multiplier {
            self.multiplier_time = (self.multiplier_time - dt).max(0.0);
            if self.multiplier_time <= 0.0 {
                self.has_multiplier = false;
            }
        }

        self.run_timer += dt;
        if self.run_timer > RUN_FRAME_TIME {
            self.run_frame = (self.run_frame + 1) % RUN_FRAME_COUNT;
            self.run_timer = 0.0;
        }
    }

    fn update_lane(&mut self, dt: f32, switch_speed: f32) {
        let target_x = lane_x(self.target_lane);
        let dx = target_x - self.x;
        if dx.abs() > LANE_SETTLE_EPSILON {
            let step = switch_speed * dt;
            if step >= dx.abs() {
                self.x = target_x;
            } else {
                self.x += dx.signum() * step;
            }
            if (self.x - target_x).abs() < LANE_SNAP_EPSILON {
                self.x = target_x;
            }
        } else {
            self.x = target_x;
        }
        self.lane = self.target_lane;
    }

    /// Collision box; shorter while sliding
    pub fn hitbox(&self) -> Hitbox {
        let height = if self.sliding {
            PLAYER_SLIDE_HEIGHT
        } else {
            PLAYER_HEIGHT
        };
        Hitbox::centered_x(self.x, self.y, PLAYER_Z, PLAYER_WIDTH, height, PLAYER_DEPTH)
    }

    /// Obstacles cannot hurt a player on a jetpack
    pub fn is_invulnerable(&self) -> bool {
        self.has_jetpack
    }

    pub fn is_airborne(&self) -> bool {
        self.jumping || self.has_jetpack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_lane_bounds() {
        let mut p = Player::new();
        assert!(p.move_left());
        assert_eq!(p.target_lane, 0);
        assert!(!p.move_left());
        assert_eq!(p.target_lane, 0);

        p.reset();
        assert!(p.move_right());
        assert!(!p.move_right());
        assert_eq!(p.target_lane, 2);
    }

    #[test]
    fn test_lane_interpolation_reaches_target() {
        let tuning = Tuning::default();
        let mut p = Player::new();
        p.move_right();
        p.update(DT, &tuning);
        assert!(p.x > 0.0 && p.x < 1.0);
        for _ in 0..10 {
            p.update(DT, &tuning);
        }
        assert_eq!(p.x, 1.0);
        assert_eq!(p.lane, 2);
    }

    #[test]
    fn test_second_jump_rejected() {
        let mut p = Player::new();
        assert!(p.jump());
        assert!(!p.jump());
    }

    #[test]
    fn test_jump_arc_and_landing() {
        let tuning = Tuning::default();
        let mut p = Player::new();
        p.jump();
        p.update(tuning.jump_duration / 2.0, &tuning);
        assert!((p.y - tuning.jump_height).abs() < 1e-4);
        p.update(tuning.jump_duration / 2.0 + 0.01, &tuning);
        assert!(!p.jumping);
        assert_eq!(p.y, 0.0);
        assert!(p.jump());
    }

    #[test]
    fn test_jump_cancels_slide() {
        let mut p = Player::new();
        assert!(p.slide());
        assert!(p.jump());
        assert!(!p.sliding);
    }

    #[test]
    fn test_slide_fast_falls_from_jump() {
        let tuning = Tuning::default();
        let mut p = Player::new();
        p.jump();
        p.update(0.1, &tuning);
        assert!(p.y > 0.0);
        assert!(p.slide());
        assert!(!p.jumping);
        assert!(p.sliding);
        assert_eq!(p.y, 0.0);
        assert!(!p.slide());
    }

    #[test]
    fn test_slide_ends_and_shrinks_hitbox() {
        let tuning = Tuning::default();
        let mut p = Player::new();
        let standing = p.hitbox().size.y;
        p.slide();
        assert!(p.hitbox().size.y < standing);
        p.update(tuning.slide_duration + 0.01, &tuning);
        assert!(!p.sliding);
        assert_eq!(p.hitbox().size.y, standing);
    }

    #[test]
    fn test_jetpack_blocks_jump_and_slide() {
        let tuning = Tuning::default();
        let mut p = Player::new();
        p.activate_jetpack(tuning.jetpack_duration);
        assert!(!p.jump());
        assert!(!p.slide());
        p.update(DT, &tuning);
        assert_eq!(p.y, tuning.jetpack_height());
        assert!(p.is_invulnerable());
    }

    #[test]
    fn test_jetpack_expiry_descends_mid_arc() {
        let tuning = Tuning::default();
        let mut p = Player::new();
        p.activate_jetpack(0.05);
        p.update(0.06, &tuning);
        assert!(!p.has_jetpack);
        assert!(p.jumping);
        assert!((p.jump_time - tuning.jump_duration * 0.5).abs() < 1e-6);

        // Next tick continues down the arc instead of snapping to the ground
        p.update(DT, &tuning);
        assert!(p.jumping);
        assert!(p.y > 0.0 && p.y < tuning.jump_height);
    }

    #[test]
    fn test_buff_timers_expire() {
        let tuning = Tuning::default();
        let mut p = Player::new();
        p.activate_magnet(0.1);
        p.activate_multiplier(0.2);
        p.update(0.15, &tuning);
        assert!(!p.has_magnet);
        assert_eq!(p.magnet_time, 0.0);
        assert!(p.has_multiplier);
        p.update(0.1, &tuning);
        assert!(!p.has_multiplier);
    }

    #[test]
    fn test_reactivation_resets_timer() {
        let tuning = Tuning::default();
        let mut p = Player::new();
        p.activate_magnet(8.0);
        p.update(5.0, &tuning);
        p.activate_magnet(8.0);
        assert_eq!(p.magnet_time, 8.0);
    }

    #[test]
    fn test_run_animation_cycles() {
        let tuning = Tuning::default();
        let mut p = Player::new();
        for _ in 0..(RUN_FRAME_COUNT as usize + 1) {
            p.update(0.08, &tuning);
        }
        assert_eq!(p.run_frame, 1);
    }

    proptest! {
        #[test]
        fn target_lane_stays_in_bounds(moves in proptest::collection::vec(any::<bool>(), 0..40)) {
            let mut p = Player::new();
            for right in moves {
                let before = p.target_lane;
                let moved = if right { p.move_right() } else { p.move_left() };
                prop_assert!(p.target_lane < LANE_COUNT);
                prop_assert_eq!(moved, before != p.target_lane);
            }
        }
    }
}
