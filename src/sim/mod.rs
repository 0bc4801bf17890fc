//! Deterministic puzzle logic
//!
//! Everything here is pure and recomputed from input:
//! - Same command string, same trajectory
//! - Same map and directions, same walk
//! - No rendering or platform dependencies

pub mod replay;
pub mod trajectory;
pub mod walk;

pub use replay::{Accepted, ReplayController, ReplayRequest};
pub use trajectory::{
    Waypoint, integrate, integrate_from, parse_checkpoints, split_waypoints, thrust,
};
pub use walk::{LambdaMap, MapCell, direction};
