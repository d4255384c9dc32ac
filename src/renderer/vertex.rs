//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position, texture coordinate and color.
/// Untextured shapes sample a 1x1 white texture, so `color` alone decides.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [0.0, 0.0],
            color,
        }
    }

    pub const fn textured(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color: [1.0; 4],
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
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: (2 * std::mem::size_of::<[f32; 2]>()) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.53, 0.81, 0.92, 1.0];
    pub const SKY_MID: [f32; 4] = [0.69, 0.88, 0.90, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.94, 0.97, 1.0, 1.0];
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 0.7];
    pub const GROUND: [f32; 4] = [0.56, 0.93, 0.56, 1.0];
    pub const GRASS: [f32; 4] = [0.13, 0.55, 0.13, 1.0];

    pub const PIPE_LIGHT: [f32; 4] = [0.13, 0.77, 0.37, 1.0];
    pub const PIPE_MID: [f32; 4] = [0.09, 0.64, 0.29, 1.0];
    pub const PIPE_DARK: [f32; 4] = [0.08, 0.50, 0.24, 1.0];
    pub const PIPE_CAP: [f32; 4] = [0.29, 0.87, 0.50, 1.0];
    pub const PIPE_OUTLINE: [f32; 4] = [0.08, 0.33, 0.18, 1.0];

    pub const BIRD_CENTER: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const BIRD_EDGE: [f32; 4] = [0.93, 0.35, 0.14, 1.0];
    pub const BIRD_WING: [f32; 4] = [0.75, 0.22, 0.17, 1.0];
    pub const BEAK: [f32; 4] = [1.0, 0.58, 0.0, 1.0];
    pub const EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PUPIL: [f32; 4] = [0.10, 0.10, 0.18, 1.0];

    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}
