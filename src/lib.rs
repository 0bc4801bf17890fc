//! Puzzle Viz - visualization core for the contest dashboard
//!
//! Core modules:
//! - `sim`: Deterministic puzzle logic (trajectory integration, board walk, replay cursor)
//! - `board`: Sparse labeled grid for the 3D puzzle editor, plus warp-link overlay
//! - `viewport`: Pan/zoom transform between logical space and the drawing surface
//! - `renderer`: Drawing instructions and vertex tessellation
//! - `api`: Request/response types for the remote simulator
//! - `platform`: Frame scheduling and listener teardown
//! - `settings`: Viewer configuration

pub mod api;
pub mod board;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod viewport;

pub use board::{Bounds, Coord, SparseGrid, WarpLink, infer_links};
pub use settings::Settings;
pub use sim::{LambdaMap, ReplayController, Waypoint, integrate};
pub use viewport::{PointerEvent, Viewport};

/// Viewer configuration constants
pub mod consts {
    /// Wheel-up zoom factor (zoom in)
    pub const ZOOM_IN_FACTOR: f64 = 0.8;
    /// Wheel-down zoom factor (zoom out)
    pub const ZOOM_OUT_FACTOR: f64 = 1.2;

    /// Total margin added around the fitted point set (5%)
    pub const VIEWPORT_MARGIN: f64 = 0.05;
    /// Smallest window produced by fitting a point set
    pub const MIN_FIT_SIZE: f64 = 2.0;
    /// Hard floor for the window size, zooming can't go below this
    pub const MIN_SPACE_SIZE: f64 = 1e-6;

    /// Default drawing surface edge in pixels
    pub const CANVAS_SIZE: u32 = 4000;

    /// Marker radii in pixels at `CANVAS_SIZE`
    pub const CHECKPOINT_RADIUS: f32 = 8.0;
    pub const WAYPOINT_RADIUS: f32 = 10.0;
    pub const HEAD_RADIUS: f32 = 30.0;
    pub const PATH_WIDTH: f32 = 3.0;
    pub const CROSSHAIR_HALF: f32 = 50.0;
}

