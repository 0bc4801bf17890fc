//! Sparse labeled board for the 3D puzzle editor
//!
//! - `grid`: coordinate-keyed cells, both text dialects, editor window
//! - `links`: warp-link inference for the overlay

pub mod grid;
pub mod links;

pub use grid::{Bounds, Coord, Dialect, EMPTY_TOKEN, Edge, GridCell, SparseGrid};
pub use links::{WarpLink, infer_links, label_of, link_hue};
