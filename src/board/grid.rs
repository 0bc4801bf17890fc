//! Sparse labeled grid for the 3D puzzle editor
//!
//! Cells are keyed by coordinate; a missing key is an empty cell. Two text
//! forms are accepted:
//! - spaced: tokens separated by spaces, `.` for empty (canonical)
//! - tabular: tokens separated by tabs, empty token for empty, a leading `'`
//!   stripped (spreadsheet paste)
//!
//! The dialect is picked by a single signal: a tab anywhere in the text.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder for an empty cell in the spaced dialect
pub const EMPTY_TOKEN: &str = ".";

/// Grid coordinate. `y` grows downward, one row per text line.
///
/// Ordering is row-major (`y`, then `x`), which is the scan order used
/// everywhere cells are iterated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Shifted coordinate, `None` if either axis overflows
    pub fn checked_offset(self, dx: i64, dy: i64) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Inclusive rectangle of coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

/// Side of a `Bounds` to grow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

impl Bounds {
    /// Window the editor opens with
    pub const DEFAULT_WINDOW: Bounds = Bounds {
        min_x: -1,
        min_y: -1,
        max_x: 1,
        max_y: 1,
    };

    pub const fn point(c: Coord) -> Self {
        Self {
            min_x: c.x,
            min_y: c.y,
            max_x: c.x,
            max_y: c.y,
        }
    }

    pub fn include(self, c: Coord) -> Self {
        Self {
            min_x: self.min_x.min(c.x),
            min_y: self.min_y.min(c.y),
            max_x: self.max_x.max(c.x),
            max_y: self.max_y.max(c.y),
        }
    }

    pub fn union(self, other: Bounds) -> Self {
        self.include(Coord::new(other.min_x, other.min_y))
            .include(Coord::new(other.max_x, other.max_y))
    }

    /// Extend one side outward by a cell
    pub fn grow(self, edge: Edge) -> Self {
        let mut b = self;
        match edge {
            Edge::Left => b.min_x -= 1,
            Edge::Top => b.min_y -= 1,
            Edge::Right => b.max_x += 1,
            Edge::Bottom => b.max_y += 1,
        }
        b
    }

    pub fn width(&self) -> u64 {
        (self.max_x - self.min_x + 1) as u64
    }

    pub fn height(&self) -> u64 {
        (self.max_y - self.min_y + 1) as u64
    }

    pub fn contains(&self, c: Coord) -> bool {
        (self.min_x..=self.max_x).contains(&c.x) && (self.min_y..=self.max_y).contains(&c.y)
    }

    /// Rows of coordinates, top to bottom
    pub fn rows(self) -> impl Iterator<Item = impl Iterator<Item = Coord>> {
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_y..=self.max_y).map(move |y| (min_x..=max_x).map(move |x| Coord::new(x, y)))
    }
}

/// Text dialect of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Space separated, `.` for empty
    Spaced,
    /// Tab separated, empty for empty, `'` escape
    Tabular,
}

impl Dialect {
    pub fn detect(text: &str) -> Self {
        if text.contains('\t') {
            Dialect::Tabular
        } else {
            Dialect::Spaced
        }
    }
}

/// A single cell edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub coord: Coord,
    /// Empty string clears the cell
    pub value: String,
}

/// Sparse coordinate-keyed grid. Travels as text, see `serialize`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SparseGrid {
    cells: BTreeMap<Coord, String>,
}

impl SparseGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse either dialect. Never fails; unreadable tokens just don't make cells.
    pub fn parse(text: &str) -> Self {
        match Dialect::detect(text) {
            Dialect::Spaced => Self::parse_spaced(text),
            Dialect::Tabular => Self::parse_tabular(text),
        }
    }

    pub fn parse_spaced(text: &str) -> Self {
        let mut grid = Self::new();
        for (y, line) in text.lines().enumerate() {
            for (x, token) in line.split_whitespace().enumerate() {
                if token != EMPTY_TOKEN {
                    grid.insert(Coord::new(x as i64, y as i64), token);
                }
            }
        }
        grid
    }

    pub fn parse_tabular(text: &str) -> Self {
        let mut grid = Self::new();
        for (y, line) in text.lines().enumerate() {
            for (x, token) in line.split('\t').enumerate() {
                let token = token.trim();
                let token = token.strip_prefix('\'').unwrap_or(token);
                if !token.is_empty() {
                    grid.insert(Coord::new(x as i64, y as i64), token);
                }
            }
        }
        grid
    }

    fn insert(&mut self, coord: Coord, value: &str) {
        self.cells.insert(coord, value.to_string());
    }

    pub fn get(&self, coord: Coord) -> Option<&str> {
        self.cells.get(&coord).map(String::as_str)
    }

    /// Set or clear one cell. An empty value removes the entry.
    pub fn set_cell(&mut self, coord: Coord, value: &str) {
        if value.is_empty() {
            self.cells.remove(&coord);
        } else {
            self.insert(coord, value);
        }
    }

    pub fn apply(&mut self, edit: GridCell) {
        self.set_cell(edit.coord, &edit.value);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in scan order
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &str)> {
        self.cells.iter().map(|(c, v)| (*c, v.as_str()))
    }

    /// Tight bounding box of the cells, `None` when empty
    pub fn bounds(&self) -> Option<Bounds> {
        let mut coords = self.cells.keys();
        let first = Bounds::point(*coords.next()?);
        Some(coords.fold(first, |b, c| b.include(*c)))
    }

    /// Editor window: `current` grown to cover every cell, never shrunk
    pub fn editor_window(&self, current: Bounds) -> Bounds {
        match self.bounds() {
            Some(b) => current.union(b),
            None => current,
        }
    }

    /// Region the canonical text covers: the bounding box plus the origin,
    /// so parsed text keeps its coordinates on a round trip
    fn text_region(&self) -> Option<Bounds> {
        self.bounds().map(|b| b.include(Coord::ORIGIN))
    }

    fn write_region(
        &self,
        region: Bounds,
        sep: &str,
        token: impl Fn(Option<&str>) -> String,
    ) -> String {
        region
            .rows()
            .map(|row| {
                row.map(|c| token(self.get(c)))
                    .collect::<Vec<_>>()
                    .join(sep)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn spaced_token(value: Option<&str>) -> String {
        value.unwrap_or(EMPTY_TOKEN).to_string()
    }

    fn tabular_token(value: Option<&str>) -> String {
        match value {
            None => String::new(),
            // Spreadsheets would read these as formulas
            Some(v @ ("+" | "=")) => format!("'{}", v),
            Some(v) => v.to_string(),
        }
    }

    /// Canonical spaced text. Empty grid gives an empty string.
    pub fn serialize(&self) -> String {
        match self.text_region() {
            Some(region) => self.write_region(region, " ", Self::spaced_token),
            None => String::new(),
        }
    }

    /// Spaced text covering `window` and every cell
    pub fn serialize_window(&self, window: Bounds) -> String {
        self.write_region(self.editor_window(window), " ", Self::spaced_token)
    }

    /// Tabular text for `region`. A lone column gets a trailing tab on every
    /// row so the text still reads back as the tabular dialect.
    fn write_tabular(&self, region: Bounds) -> String {
        let text = self.write_region(region, "\t", Self::tabular_token);
        if region.width() > 1 {
            return text;
        }
        text.split('\n')
            .map(|row| format!("{}\t", row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Tab separated export for spreadsheet paste
    pub fn to_tsv(&self) -> String {
        match self.text_region() {
            Some(region) => self.write_tabular(region),
            None => String::new(),
        }
    }

    pub fn to_tsv_window(&self, window: Bounds) -> String {
        self.write_tabular(self.editor_window(window))
    }
}

impl fmt::Display for SparseGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spaced() {
        let grid = SparseGrid::parse("S . .\n. @F .\n. . F");
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.get(Coord::new(0, 0)), Some("S"));
        assert_eq!(grid.get(Coord::new(1, 1)), Some("@F"));
        assert_eq!(grid.get(Coord::new(2, 2)), Some("F"));
        assert_eq!(grid.get(Coord::new(1, 0)), None);
    }

    #[test]
    fn test_parse_spaced_collapses_runs_of_spaces() {
        let grid = SparseGrid::parse("1   2\n");
        assert_eq!(grid.get(Coord::new(1, 0)), Some("2"));
    }

    #[test]
    fn test_parse_tabular() {
        let grid = SparseGrid::parse("1\t'+\t\n\t'=\tS");
        assert_eq!(Dialect::detect("a\tb"), Dialect::Tabular);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.get(Coord::new(1, 0)), Some("+"));
        assert_eq!(grid.get(Coord::new(2, 0)), None);
        assert_eq!(grid.get(Coord::new(0, 1)), None);
        assert_eq!(grid.get(Coord::new(1, 1)), Some("="));
        assert_eq!(grid.get(Coord::new(2, 1)), Some("S"));
    }

    #[test]
    fn test_serialize_pads_with_dots() {
        let grid = SparseGrid::parse("S . .\n. @F .\n. . F");
        assert_eq!(grid.serialize(), "S . .\n. @F .\n. . F");
    }

    #[test]
    fn test_serialize_keeps_origin() {
        let grid = SparseGrid::parse(". .\n. S");
        assert_eq!(grid.serialize(), ". .\n. S");
        assert_eq!(SparseGrid::parse(&grid.serialize()), grid);
    }

    #[test]
    fn test_empty_grid_serializes_empty() {
        assert_eq!(SparseGrid::new().serialize(), "");
        assert_eq!(SparseGrid::new().to_tsv(), "");
    }

    #[test]
    fn test_serialize_window() {
        let grid = SparseGrid::new();
        assert_eq!(grid.serialize_window(Bounds::DEFAULT_WINDOW), ". . .\n. . .\n. . .");
    }

    #[test]
    fn test_to_tsv_escapes_formula_tokens() {
        let grid = SparseGrid::parse("1 + .\n= . 2");
        assert_eq!(grid.to_tsv(), "1\t'+\t\n'=\t\t2");
        assert_eq!(SparseGrid::parse(&grid.to_tsv()), grid);
    }

    #[test]
    fn test_single_column_tsv_stays_tabular() {
        let grid = SparseGrid::parse("+\n.\n=");
        assert_eq!(grid.to_tsv(), "'+\t\n\t\n'=\t");
        assert_eq!(SparseGrid::parse(&grid.to_tsv()), grid);
    }

    #[test]
    fn test_set_cell_and_clear() {
        let mut grid = SparseGrid::new();
        grid.set_cell(Coord::new(-1, 2), "A");
        assert_eq!(grid.get(Coord::new(-1, 2)), Some("A"));
        grid.apply(GridCell {
            coord: Coord::new(-1, 2),
            value: String::new(),
        });
        assert!(grid.is_empty());
    }

    #[test]
    fn test_bounds_and_editor_window() {
        let mut grid = SparseGrid::new();
        assert_eq!(grid.bounds(), None);
        grid.set_cell(Coord::new(3, -2), "x");
        grid.set_cell(Coord::new(0, 4), "y");
        let b = grid.bounds().unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (0, -2, 3, 4));

        let w = grid.editor_window(Bounds::DEFAULT_WINDOW);
        assert_eq!((w.min_x, w.min_y, w.max_x, w.max_y), (-1, -2, 3, 4));
        assert_eq!(w.grow(Edge::Left).min_x, -2);
        assert_eq!(w.grow(Edge::Bottom).max_y, 5);
    }

    #[test]
    fn test_iter_is_row_major() {
        let grid = SparseGrid::parse(". b\na .");
        let order: Vec<_> = grid.iter().map(|(_, v)| v).collect();
        assert_eq!(order, vec!["b", "a"]);
    }
}
