//! Box-overlap collision for the lane world
//!
//! Obstacles and the player are axis-aligned boxes; collectibles are picked up
//! when they fall inside a tolerance box around the player's collection point.

use glam::Vec3;

/// An axis-aligned 3D box given by its minimum corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    /// Minimum corner (x, y, z)
    pub origin: Vec3,
    /// Extent along each axis (width, height, depth)
    pub size: Vec3,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, z: f32, width: f32, height: f32, depth: f32) -> Self {
        Self {
            origin: Vec3::new(x, y, z),
            size: Vec3::new(width, height, depth),
        }
    }

    /// Box of the given size centred on `x` across the lane axis
    pub fn centered_x(x: f32, y: f32, z: f32, width: f32, height: f32, depth: f32) -> Self {
        Self::new(x - width / 2.0, y, z, width, height, depth)
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.origin + self.size
    }

    /// Z range covered by this box
    #[inline]
    pub fn z_span(&self) -> (f32, f32) {
        (self.origin.z, self.origin.z + self.size.z)
    }
}

/// Strict overlap on all three axes; touching faces do not count
pub fn boxes_overlap(a: &Hitbox, b: &Hitbox) -> bool {
    let (a_min, a_max) = (a.origin, a.max());
    let (b_min, b_max) = (b.origin, b.max());

    a_min.x < b_max.x
        && a_max.x > b_min.x
        && a_min.y < b_max.y
        && a_max.y > b_min.y
        && a_min.z < b_max.z
        && a_max.z > b_min.z
}

/// True when `point` lies strictly within `tolerance` of `anchor` on every axis
pub fn within_tolerance(point: Vec3, anchor: Vec3, tolerance: Vec3) -> bool {
    let d = (point - anchor).abs();
    d.x < tolerance.x && d.y < tolerance.y && d.z < tolerance.z
}

/// Does the closed interval [a0, a1] intersect [b0, b1]?
#[inline]
pub fn spans_intersect(a: (f32, f32), b: (f32, f32)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}
