//! Data-driven game balance
//!
//! Every number a designer might want to tweak lives here. Defaults match the
//! shipped game; a partial JSON document can override any subset.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speed (world units per second) ===
    pub initial_speed: f32,
    pub max_speed: f32,
    /// Speed gained per second of running
    pub speed_increment: f32,
    /// Largest dt a single tick will simulate (tab stalls)
    pub max_frame_dt: f32,

    // === Player ===
    pub jump_height: f32,
    pub jump_duration: f32,
    pub slide_duration: f32,
    pub lane_switch_speed: f32,
    /// Jetpack altitude as a multiple of jump height
    pub jetpack_altitude: f32,

    // === Spawning ===
    pub spawn_ahead: f32,
    pub spawn_gap_min: f32,
    pub spawn_gap_max: f32,
    pub train_length_min: f32,
    pub train_length_max: f32,
    /// Distance per difficulty step
    pub difficulty_step_distance: f32,
    /// Difficulty added per step
    pub difficulty_step: f32,
    /// Spawn gaps stop shrinking past this difficulty
    pub difficulty_gap_cap: f32,
    pub powerup_chance: f32,

    // === Power-ups (seconds) ===
    pub magnet_duration: f32,
    pub multiplier_duration: f32,
    pub jetpack_duration: f32,
    pub magnet_range: f32,
    /// Per-tick lateral pull toward the player
    pub magnet_pull_x: f32,
    /// Per-tick pull toward z = 0
    pub magnet_pull_z: f32,

    // === Scoring / feedback ===
    pub coin_value: u32,
    pub shake_duration: f32,
    pub notification_duration: f32,
    /// Delay between the crash and the game-over screen
    pub game_over_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_speed: 65.0,
            max_speed: 200.0,
            speed_increment: 0.4,
            max_frame_dt: 0.05,

            jump_height: 2.4,
            jump_duration: 0.6,
            slide_duration: 0.5,
            lane_switch_speed: 10.0,
            jetpack_altitude: 1.8,

            spawn_ahead: 280.0,
            spawn_gap_min: 28.0,
            spawn_gap_max: 48.0,
            train_length_min: 8.0,
            train_length_max: 22.0,
            difficulty_step_distance: 400.0,
            difficulty_step: 0.15,
            difficulty_gap_cap: 1.8,
            powerup_chance: 0.06,

            magnet_duration: 8.0,
            multiplier_duration: 8.0,
            jetpack_duration: 6.0,
            magnet_range: 3.0,
            magnet_pull_x: 0.15,
            magnet_pull_z: 0.1,

            coin_value: 1,
            shake_duration: 0.3,
            notification_duration: 2.0,
            game_over_delay: 0.8,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => Self::sanitized(tuning),
            Err(e) => {
                log::warn!("Invalid tuning override ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Repair values that parse but would break the simulation
    ///
    /// Non-finite or non-positive fields fall back to their defaults and
    /// inverted ranges are swapped. Each correction is logged.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        fn positive(name: &str, value: &mut f32, default: f32) {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("Tuning field {} = {} is invalid, using {}", name, value, default);
                *value = default;
            }
        }

        fn ordered(name: &str, min: &mut f32, max: &mut f32) {
            if *min > *max {
                log::warn!("Tuning range {} is inverted ({} > {}), swapping", name, min, max);
                std::mem::swap(min, max);
            }
        }

        positive("initial_speed", &mut self.initial_speed, defaults.initial_speed);
        positive("max_speed", &mut self.max_speed, defaults.max_speed);
        positive("max_frame_dt", &mut self.max_frame_dt, defaults.max_frame_dt);
        positive("jump_height", &mut self.jump_height, defaults.jump_height);
        positive("jump_duration", &mut self.jump_duration, defaults.jump_duration);
        positive("slide_duration", &mut self.slide_duration, defaults.slide_duration);
        positive("lane_switch_speed", &mut self.lane_switch_speed, defaults.lane_switch_speed);
        positive("jetpack_altitude", &mut self.jetpack_altitude, defaults.jetpack_altitude);
        positive("spawn_ahead", &mut self.spawn_ahead, defaults.spawn_ahead);
        positive("spawn_gap_min", &mut self.spawn_gap_min, defaults.spawn_gap_min);
        positive("spawn_gap_max", &mut self.spawn_gap_max, defaults.spawn_gap_max);
        positive("train_length_min", &mut self.train_length_min, defaults.train_length_min);
        positive("train_length_max", &mut self.train_length_max, defaults.train_length_max);
        positive(
            "difficulty_step_distance",
            &mut self.difficulty_step_distance,
            defaults.difficulty_step_distance,
        );
        positive("difficulty_gap_cap", &mut self.difficulty_gap_cap, defaults.difficulty_gap_cap);
        positive("magnet_duration", &mut self.magnet_duration, defaults.magnet_duration);
        positive(
            "multiplier_duration",
            &mut self.multiplier_duration,
            defaults.multiplier_duration,
        );
        positive("jetpack_duration", &mut self.jetpack_duration, defaults.jetpack_duration);
        positive("shake_duration", &mut self.shake_duration, defaults.shake_duration);
        positive(
            "notification_duration",
            &mut self.notification_duration,
            defaults.notification_duration,
        );

        if !self.speed_increment.is_finite() || self.speed_increment < 0.0 {
            log::warn!("Tuning field speed_increment = {} is invalid", self.speed_increment);
            self.speed_increment = defaults.speed_increment;
        }
        if !self.difficulty_step.is_finite() || self.difficulty_step < 0.0 {
            log::warn!("Tuning field difficulty_step = {} is invalid", self.difficulty_step);
            self.difficulty_step = defaults.difficulty_step;
        }
        for (name, value, default) in [
            ("powerup_chance", &mut self.powerup_chance, defaults.powerup_chance),
            ("magnet_range", &mut self.magnet_range, defaults.magnet_range),
            ("magnet_pull_x", &mut self.magnet_pull_x, defaults.magnet_pull_x),
            ("magnet_pull_z", &mut self.magnet_pull_z, defaults.magnet_pull_z),
            ("game_over_delay", &mut self.game_over_delay, defaults.game_over_delay),
        ] {
            if !value.is_finite() || *value < 0.0 {
                log::warn!("Tuning field {} = {} is invalid, using {}", name, value, default);
                *value = default;
            }
        }

        ordered("initial_speed..max_speed", &mut self.initial_speed, &mut self.max_speed);
        ordered("spawn_gap", &mut self.spawn_gap_min, &mut self.spawn_gap_max);
        ordered("train_length", &mut self.train_length_min, &mut self.train_length_max);
        if self.train_length_min == self.train_length_max {
            log::warn!("Tuning range train_length is empty, widening");
            self.train_length_max += 1.0;
        }
        self
    }

    /// Elevated height held while the jetpack is active
    pub fn jetpack_height(&self) -> f32 {
        self.jump_height * self.jetpack_altitude
    }

    /// Speed after `t` seconds of running
    pub fn speed_at(&self, t: f32) -> f32 {
        (self.initial_speed + self.speed_increment * t.max(0.0)).min(self.max_speed)
    }

    /// Difficulty multiplier for a cumulative distance (steps, never decreasing)
    pub fn difficulty_for(&self, distance: f32) -> f32 {
        let steps = (distance.max(0.0) / self.difficulty_step_distance).floor();
        1.0 + steps * self.difficulty_step
    }
}
