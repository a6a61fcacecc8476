//! Perspective camera for the lane world
//!
//! The world is laid out with x across the lanes (lane 1 at x = 0), y up from the
//! rail bed, and z forward from the player. Everything on screen, including
//! particle anchors, goes through [`Camera::project`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A projected point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Perspective shrink factor in (0, 1]
    pub scale: f32,
}

impl ScreenPoint {
    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Camera model plus the viewport-derived constants
///
/// All derived fields are recomputed together in [`Camera::resize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Viewport size in pixels
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub center_x: f32,
    pub horizon_y: f32,
    pub ground_y: f32,
    /// Pixels per world unit of x at scale 1
    pub road_half_width: f32,
    /// Pixels per world unit of y at scale 1
    pub unit_height: f32,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        let mut camera = Self {
            width: 0.0,
            height: 0.0,
            depth: CAMERA_DEPTH,
            center_x: 0.0,
            horizon_y: 0.0,
            ground_y: 0.0,
            road_half_width: 0.0,
            unit_height: 0.0,
        };
        camera.resize(width, height);
        camera
    }

    /// Re-derive every viewport constant from a new size
    ///
    /// Non-finite or non-positive sizes are clamped to a 1x1 viewport.
    pub fn resize(&mut self, width: f32, height: f32) {
        let w = if width.is_finite() { width.max(1.0) } else { 1.0 };
        let h = if height.is_finite() { height.max(1.0) } else { 1.0 };

        *self = Self {
            width: w,
            height: h,
            depth: CAMERA_DEPTH,
            center_x: w / 2.0,
            horizon_y: h * HORIZON_RATIO,
            ground_y: h * GROUND_RATIO,
            road_half_width: w * ROAD_WIDTH_FACTOR,
            unit_height: h * UNIT_HEIGHT_FACTOR,
        };
    }

    /// Perspective shrink factor for a depth
    #[inline]
    pub fn scale_at(&self, z: f32) -> f32 {
        let z = z.max(MIN_PROJECT_Z);
        self.depth / (z + self.depth)
    }

    /// Project a world position to screen space
    pub fn project(&self, x: f32, y: f32, z: f32) -> ScreenPoint {
        let scale = self.scale_at(z);
        ScreenPoint {
            x: self.center_x + x * scale * self.road_half_width,
            y: self.horizon_y + (self.ground_y - self.horizon_y) * scale
                - y * scale * self.unit_height,
            scale,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_center_lane_projects_to_center() {
        let camera = Camera::new(1000.0, 500.0);
        let p = camera.project(0.0, 0.0, 50.0);
        assert!((p.x - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_near_z_is_clamped() {
        let camera = Camera::default();
        let a = camera.project(0.5, 1.0, -3.0);
        let b = camera.project(0.5, 1.0, MIN_PROJECT_Z);
        assert_eq!(a, b);
        assert!(a.scale < 1.0);
    }

    #[test]
    fn test_ground_line_near_camera() {
        let camera = Camera::new(800.0, 600.0);
        let p = camera.project(0.0, 0.0, 0.0);
        // Just above the ground line at the minimum depth
        assert!(p.y <= camera.ground_y);
        assert!(p.y > camera.ground_y - 1.0);
    }

    #[test]
    fn test_resize_recomputes_everything() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.resize(400.0, 1000.0);
        assert_eq!(camera.center_x, 200.0);
        assert_eq!(camera.horizon_y, 1000.0 * HORIZON_RATIO);
        assert_eq!(camera.ground_y, 1000.0 * GROUND_RATIO);
        assert_eq!(camera.road_half_width, 400.0 * ROAD_WIDTH_FACTOR);
        assert_eq!(camera.unit_height, 1000.0 * UNIT_HEIGHT_FACTOR);
    }

    #[test]
    fn test_degenerate_viewport() {
        let camera = Camera::new(0.0, f32::NAN);
        assert_eq!(camera.width, 1.0);
        assert_eq!(camera.height, 1.0);
        assert!(camera.project(1.0, 1.0, 10.0).x.is_finite());
    }

    proptest! {
        #[test]
        fn scale_in_unit_interval(z in 0.0f32..10_000.0) {
            let camera = Camera::default();
            let s = camera.project(0.0, 0.0, z).scale;
            prop_assert!(s > 0.0 && s <= 1.0);
        }

        #[test]
        fn scale_strictly_decreasing(z in 0.1f32..5_000.0, dz in 0.01f32..100.0) {
            let camera = Camera::default();
            prop_assert!(camera.scale_at(z + dz) < camera.scale_at(z));
        }

        #[test]
        fn farther_points_sit_closer_to_horizon(z in 0.1f32..1_000.0, dz in 0.5f32..100.0) {
            let camera = Camera::default();
            let near = camera.project(0.0, 0.0, z);
            let far = camera.project(0.0, 0.0, z + dz);
            prop_assert!(far.y < near.y);
            prop_assert!(far.y > camera.horizon_y);
        }
    }
}
