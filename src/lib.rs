//! Rail Runner - An endless three-lane runner with a pseudo-3D camera
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, world generator, collisions)
//! - `renderer`: Depth-sorted draw list and WebGPU upload
//! - `platform`: Browser/native platform abstraction (input mapping)
//! - `persistence`: Key-value storage backends
//! - `tuning`: Data-driven game balance
//! - `session`: The explicitly constructed game context tying it all together

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::Records;
pub use session::Session;
pub use settings::{Character, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Camera & projection
    pub const CAMERA_DEPTH: f32 = 140.0;
    pub const HORIZON_RATIO: f32 = 0.32;
    pub const GROUND_RATIO: f32 = 0.95;
    pub const DRAW_DISTANCE: f32 = 280.0;
    pub const ROAD_WIDTH_FACTOR: f32 = 0.24;
    pub const UNIT_HEIGHT_FACTOR: f32 = 0.17;
    /// Anything closer than this is projected as if it were here
    pub const MIN_PROJECT_Z: f32 = 0.1;

    /// Lanes are indexed 0..LANE_COUNT, world x = lane - 1
    pub const LANE_COUNT: usize = 3;

    /// Trains
    pub const TRAIN_WIDTH: f32 = 0.72;
    pub const TRAIN_HEIGHT: f32 = 3.5;

    /// Barriers
    pub const BARRIER_WIDTH: f32 = 0.9;
    pub const BARRIER_LOW_HEIGHT: f32 = 0.9;
    /// Visual height of a high barrier (posts included)
    pub const BARRIER_HIGH_HEIGHT: f32 = 2.8;
    /// High barriers only block above this height - slide under them
    pub const BARRIER_HIGH_Y: f32 = 1.2;
    pub const BARRIER_HIGH_HITBOX_HEIGHT: f32 = 1.6;
    pub const BARRIER_DEPTH: f32 = 0.8;

    /// Collectibles
    pub const COIN_HEIGHT: f32 = 1.2;
    pub const COIN_ARC_RISE: f32 = 1.8;
    pub const COIN_LINE_SPACING: f32 = 2.2;
    pub const POWERUP_HEIGHT: f32 = 1.6;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 0.35;
    pub const PLAYER_HEIGHT: f32 = 1.7;
    pub const PLAYER_SLIDE_HEIGHT: f32 = 0.6;
    pub const PLAYER_Z: f32 = -0.5;
    pub const PLAYER_DEPTH: f32 = 1.0;
    /// Depth at which the player sprite is drawn
    pub const PLAYER_DRAW_Z: f32 = 2.0;

    /// Lane interpolation snaps once within this distance
    pub const LANE_SNAP_EPSILON: f32 = 0.05;
    /// Below this the player is considered settled on the lane
    pub const LANE_SETTLE_EPSILON: f32 = 0.02;

    /// Run animation
    pub const RUN_FRAME_TIME: f32 = 0.07;
    pub const RUN_FRAME_COUNT: u8 = 8;

    /// Collection point (relative to the player) and tolerances
    pub const COLLECT_Z: f32 = 0.5;
    pub const COIN_COLLECT_OFFSET_Y: f32 = 0.9;
    pub const COIN_COLLECT_TOLERANCE: [f32; 3] = [0.5, 0.8, 1.5];
    pub const POWERUP_COLLECT_OFFSET_Y: f32 = 1.0;
    pub const POWERUP_COLLECT_TOLERANCE: [f32; 3] = [0.5, 1.0, 1.5];

    /// Cleanup thresholds behind the camera
    pub const TRAIN_CLEANUP_Z: f32 = -10.0;
    pub const ENTITY_CLEANUP_Z: f32 = -5.0;

    /// Where the first pattern spawns
    pub const INITIAL_SPAWN_Z: f32 = 60.0;
    /// Extra z margin around a pattern when checking for free lanes
    pub const SPAWN_CLEARANCE: f32 = 2.0;

    /// Screen-space particle gravity (pixels/s²)
    pub const PARTICLE_GRAVITY: f32 = 400.0;
    pub const MAX_PARTICLES: usize = 512;
    /// Screen shake pixels per second of remaining shake
    pub const SHAKE_INTENSITY: f32 = 15.0;
}

/// World x of a lane index
#[inline]
pub fn lane_x(lane: usize) -> f32 {
    lane as f32 - 1.0
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_x() {
        assert_eq!(lane_x(0), -1.0);
        assert_eq!(lane_x(1), 0.0);
        assert_eq!(lane_x(2), 1.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
        assert_eq!(lerp(4.0, 4.0, 0.9), 4.0);
    }
}
