//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Screen-space vertex with position (pixels until upload) and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for scene elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.36, 0.62, 0.91, 1.0];
    pub const GROUND: [f32; 4] = [0.42, 0.36, 0.29, 1.0];
    pub const TRACK_BED: [f32; 4] = [0.33, 0.29, 0.25, 1.0];
    pub const TIE: [f32; 4] = [0.45, 0.33, 0.22, 1.0];
    pub const RAIL: [f32; 4] = [0.72, 0.74, 0.78, 1.0];
    pub const TRAIN_ROOF_SHADE: f32 = 1.2;
    pub const TRAIN_SIDE_SHADE: f32 = 0.6;
    pub const TRAIN_WINDOW: [f32; 4] = [0.75, 0.88, 1.0, 1.0];
    pub const BARRIER_STRIPE_A: [f32; 4] = [0.95, 0.95, 0.95, 1.0];
    pub const BARRIER_STRIPE_B: [f32; 4] = [0.9, 0.2, 0.2, 1.0];
    pub const BARRIER_POST: [f32; 4] = [0.35, 0.35, 0.38, 1.0];
    pub const COIN: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const COIN_RIM: [f32; 4] = [0.85, 0.6, 0.0, 1.0];
    pub const MAGNET: [f32; 4] = [0.94, 0.27, 0.27, 1.0];
    pub const MULTIPLIER: [f32; 4] = [0.66, 0.33, 0.97, 1.0];
    pub const JETPACK: [f32; 4] = [0.98, 0.57, 0.24, 1.0];
    pub const GLOW: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
    pub const SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.3];
    pub const FLAME: [f32; 4] = [1.0, 0.6, 0.1, 0.9];
}

/// Multiply the RGB channels, keeping alpha
pub fn shade(color: [f32; 4], factor: f32) -> [f32; 4] {
    [
        color[0] * factor,
        color[1] * factor,
        color[2] * factor,
        color[3],
    ]
}

/// Replace alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}
