//! Shape generation for 2D primitives
//!
//! Every function appends triangles to an existing list so a whole frame is
//! built into one buffer.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Arbitrary convex quad, corners in order
pub fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: [f32; 4]) {
    let [a, b, c, d] = corners;
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));

    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(c.x, c.y, color));
    out.push(Vertex::new(d.x, d.y, color));
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(out: &mut Vec<Vertex>, min: Vec2, size: Vec2, color: [f32; 4]) {
    let max = min + size;
    quad(
        out,
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
        color,
    );
}

/// Filled ellipse
pub fn ellipse(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radii: Vec2,
    color: [f32; 4],
    segments: u32,
) {
    let segments = segments.max(3);
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }
}

pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    ellipse(out, center, Vec2::splat(radius), color, segments);
}

/// Hollow circle
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    let segments = segments.max(3);
    out.reserve((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let (s1, c1) = theta1.sin_cos();
        let (s2, c2) = theta2.sin_cos();

        let inner1 = center + Vec2::new(c1, s1) * inner_radius;
        let outer1 = center + Vec2::new(c1, s1) * outer_radius;
        let inner2 = center + Vec2::new(c2, s2) * inner_radius;
        let outer2 = center + Vec2::new(c2, s2) * outer_radius;

        quad(out, [inner1, outer1, outer2, inner2], color);
    }
}

/// Thick line segment
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(out, [from + perp, to + perp, to - perp, from - perp], color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_is_two_triangles() {
        let mut out = Vec::new();
        rect(&mut out, Vec2::new(10.0, 20.0), Vec2::new(5.0, 5.0), [1.0; 4]);
        assert_eq!(out.len(), 6);
        assert_eq!(out[2].position, [15.0, 25.0]);
    }

    #[test]
    fn test_circle_vertex_count() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 4.0, [1.0; 4], 12);
        assert_eq!(out.len(), 36);
        // Every rim vertex is on the circle
        for v in out.iter().skip(1).step_by(3) {
            let r = Vec2::from_array(v.position).length();
            assert!((r - 4.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ring_and_line() {
        let mut out = Vec::new();
        ring(&mut out, Vec2::ZERO, 2.0, 3.0, [1.0; 4], 8);
        assert_eq!(out.len(), 48);
        out.clear();
        line(&mut out, Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, [1.0; 4]);
        assert_eq!(out[0].position, [0.0, 1.0]);
    }
}
