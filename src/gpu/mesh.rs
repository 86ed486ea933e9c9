//! CPU-side vertex generation for [`FrameData`].

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::surface::FrameData;

/// Vertices emitted per point (two triangles).
pub const POINT_VERTICES: usize = 6;

/// Corners of a point quad, in the order the two triangles use them.
const QUAD_CORNERS: [[f32; 2]; POINT_VERTICES] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

/// Vertex shared by the point and line pipelines.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Clip-space position.
    pub position: [f32; 2],
    /// Offset inside the point quad, -1..1. Zero for lines.
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Pixel to clip-space conversion for one backing buffer size.
#[derive(Debug, Clone, Copy)]
pub struct PixelSpace {
    width: f32,
    height: f32,
}

impl PixelSpace {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    /// Physical pixel (origin top-left) to clip space (origin center, y up).
    pub fn to_clip(&self, pixel: Vec2) -> [f32; 2] {
        [
            pixel.x / self.width * 2.0 - 1.0,
            1.0 - pixel.y / self.height * 2.0,
        ]
    }
}

/// Expand visible points into quads, replacing the contents of `out`.
pub fn build_point_vertices(frame: &FrameData, space: PixelSpace, out: &mut Vec<Vertex>) {
    out.clear();
    for point in frame.points.iter().filter(|p| p.visible && p.size > 0.0) {
        let center = space.to_clip(point.position);
        // Diameter in pixels over the 2-unit clip range gives the half extent
        let half = [point.size / space.width, point.size / space.height];
        let color = point.color.to_array();
        for corner in QUAD_CORNERS {
            out.push(Vertex {
                position: [center[0] + corner[0] * half[0], center[1] + corner[1] * half[1]],
                uv: corner,
                color,
            });
        }
    }
}

/// Two vertices per line, replacing the contents of `out`.
pub fn build_line_vertices(frame: &FrameData, space: PixelSpace, out: &mut Vec<Vertex>) {
    out.clear();
    for line in &frame.lines {
        let color = line.color.to_array();
        out.push(Vertex {
            position: space.to_clip(line.from),
            uv: [0.0; 2],
            color,
        });
        out.push(Vertex {
            position: space.to_clip(line.to),
            uv: [0.0; 2],
            color,
        });
    }
}
