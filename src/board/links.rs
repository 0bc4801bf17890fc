//! Warp-link inference for the board overlay
//!
//! Labels are cells like `F` or `loop[2]`. A cell `@F` warps to the label `F`;
//! an `@` without a known label falls back to the numeric offsets in its left
//! (dx) and right (dy) neighbours. Links start one row above the `@` cell,
//! where the warped value sits.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::grid::{Coord, SparseGrid};

/// Word characters with an optional bracketed subscript
static LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)(\[.*\])?$").expect("label pattern is valid")
});

/// Operator tokens that look like labels but never are
pub const RESERVED_LABELS: [&str; 3] = ["S", "A", "B"];

/// Directed overlay link between two cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpLink {
    pub from: Coord,
    pub to: Coord,
}

/// Label name for a cell value, if it is one
pub fn label_of(value: &str) -> Option<&str> {
    let caps = LABEL_PATTERN.captures(value)?;
    let name = caps.get(1)?.as_str();
    (!RESERVED_LABELS.contains(&name)).then_some(name)
}

fn non_negative(grid: &SparseGrid, at: Coord) -> Option<i64> {
    grid.get(at)?.parse::<i64>().ok().filter(|n| *n >= 0)
}

/// Scan the grid for warp links, in scan order of the `@` cells
pub fn infer_links(grid: &SparseGrid) -> Vec<WarpLink> {
    // Later cells overwrite earlier ones with the same label
    let labels: HashMap<&str, Coord> = grid
        .iter()
        .filter_map(|(coord, value)| label_of(value).map(|name| (name, coord)))
        .collect();

    grid.iter()
        .filter_map(|(coord, value)| {
            let key = value.strip_prefix('@')?;
            let from = coord.checked_offset(0, -1)?;
            if let Some(&to) = labels.get(key) {
                return Some(WarpLink { from, to });
            }
            let dx = non_negative(grid, coord.checked_offset(-1, 0)?)?;
            let dy = non_negative(grid, coord.checked_offset(1, 0)?)?;
            // Offsets that leave the coordinate range make no link
            let to = Coord::new(coord.x.checked_sub(dx)?, coord.y.checked_sub(dy)?);
            Some(WarpLink { from, to })
        })
        .collect()
}

/// Hue in degrees for link `index` of `total`, spread evenly around the wheel
pub fn link_hue(index: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    index as f32 / total as f32 * 360.0
}
