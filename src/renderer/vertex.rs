//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// RGBA, components in `[0, 1]`
pub type Color = [f32; 4];

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Color,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Stride of one vertex in an uploaded buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Raw bytes of a vertex slice, ready for a GPU buffer upload
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// HSL to RGBA. `hue` in degrees, `saturation` and `lightness` in `[0, 1]`.
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Color {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, 1.0]
}

/// Colors for visualizer elements
pub mod colors {
    use super::Color;

    pub const AXIS: Color = [0.0, 0.0, 0.0, 1.0];
    pub const CHECKPOINT: Color = [1.0, 0.0, 0.0, 1.0];
    pub const PATH: Color = [0.0, 0.0, 1.0, 1.0];
    pub const FUTURE_PATH: Color = [0.5, 0.5, 0.5, 1.0];
    pub const TEXT: Color = [0.0, 0.0, 0.0, 1.0];
    pub const WALL: Color = [0.2, 0.2, 0.25, 1.0];
    pub const PILL: Color = [0.9, 0.75, 0.2, 1.0];
    pub const WALKER: Color = [0.2, 0.6, 1.0, 1.0];
}
