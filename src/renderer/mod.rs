//! Rendering module
//!
//! Builds backend-agnostic drawing instructions, then tessellates them into
//! colored triangle lists for whatever surface the host provides.

pub mod draw;
pub mod shapes;
pub mod vertex;

pub use draw::{CellLayout, DrawCommand, RenderStyle, Scene, board_scene, trajectory_scene, walk_scene};
pub use shapes::tessellate;
pub use vertex::{Color, Vertex, as_bytes, colors, hsl};
