//! Board-walk puzzle map
//!
//! A dense grid of walls and pills with a single walker. Walking consumes pills
//! and leaves visited cells empty.

use serde::{Deserialize, Serialize};

/// One cell of the walk map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapCell {
    Wall,
    Pill,
    /// Current walker position
    Lambda,
    /// Visited or empty
    Done,
}

impl MapCell {
    pub fn from_char(c: char) -> Self {
        match c {
            '#' => MapCell::Wall,
            '.' => MapCell::Pill,
            'L' => MapCell::Lambda,
            _ => MapCell::Done,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            MapCell::Wall => '#',
            MapCell::Pill => '.',
            MapCell::Lambda => 'L',
            MapCell::Done => ' ',
        }
    }
}

/// Row/column offset for a direction letter
pub fn direction(c: char) -> Option<(isize, isize)> {
    match c {
        'U' => Some((-1, 0)),
        'D' => Some((1, 0)),
        'L' => Some((0, -1)),
        'R' => Some((0, 1)),
        _ => None,
    }
}

/// Dense walk map with the walker position and remaining pill count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LambdaMap {
    /// Cells indexed `[row][col]`; rows may differ in length
    pub cells: Vec<Vec<MapCell>>,
    /// Walker `(row, col)`, `None` if the map had no `L`
    pub position: Option<(usize, usize)>,
    /// Pills not yet consumed
    pub remaining: usize,
}

impl LambdaMap {
    /// Parse a raw map. Unknown characters become empty cells. If several `L`
    /// are present the last one in scan order is the walker.
    pub fn parse(raw: &str) -> Self {
        let mut cells: Vec<Vec<MapCell>> = raw
            .trim()
            .lines()
            .map(|line| line.trim().chars().map(MapCell::from_char).collect())
            .collect();

        let mut position = None;
        let mut remaining = 0;
        for (r, row) in cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    MapCell::Pill => remaining += 1,
                    MapCell::Lambda => {
                        if let Some((pr, pc)) = position {
                            log::warn!("Extra walker at ({}, {}), keeping ({}, {})", pr, pc, r, c);
                        }
                        position = Some((r, c));
                    }
                    _ => {}
                }
            }
        }

        // Only the chosen walker keeps its marker
        if let Some(pos) = position {
            for (r, row) in cells.iter_mut().enumerate() {
                for (c, cell) in row.iter_mut().enumerate() {
                    if *cell == MapCell::Lambda && (r, c) != pos {
                        *cell = MapCell::Done;
                    }
                }
            }
        } else if !cells.is_empty() {
            log::warn!("Walk map has no walker, moves will be ignored");
        }

        Self {
            cells,
            position,
            remaining,
        }
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Width of the first row
    pub fn width(&self) -> usize {
        self.cells.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<MapCell> {
        self.cells.get(row)?.get(col).copied()
    }

    /// All pills consumed. Walking may continue harmlessly.
    pub fn is_cleared(&self) -> bool {
        self.remaining == 0
    }

    /// Apply a direction string. Unknown letters, out-of-bounds moves and
    /// moves into walls are skipped.
    pub fn walk(&mut self, directions: &str) {
        let Some((mut row, mut col)) = self.position else {
            return;
        };

        for c in directions.chars() {
            let Some((dr, dc)) = direction(c) else {
                continue;
            };
            let (Some(nr), Some(nc)) = (row.checked_add_signed(dr), col.checked_add_signed(dc))
            else {
                continue;
            };
            let target = match self.get(nr, nc) {
                None | Some(MapCell::Wall) => continue,
                Some(cell) => cell,
            };

            self.cells[row][col] = MapCell::Done;
            if target == MapCell::Pill {
                debug_assert!(self.remaining > 0, "pill count out of sync with map");
                self.remaining = self.remaining.saturating_sub(1);
            }
            self.cells[nr][nc] = MapCell::Lambda;
            row = nr;
            col = nc;
        }

        self.position = Some((row, col));
    }

    /// Copy of this map after walking, leaving `self` untouched
    pub fn walked(&self, directions: &str) -> Self {
        let mut next = self.clone();
        next.walk(directions);
        next
    }

    /// Render back to text, empty cells as spaces
    pub fn to_text(&self) -> String {
        self.cells
            .iter()
            .map(|row| row.iter().map(MapCell::as_char).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Count pills actually on the map
    pub fn count_pills(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c == MapCell::Pill)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROSS: &str = "...\n.L.\n...";

    #[test]
    fn test_parse_counts_pills() {
        let map = LambdaMap::parse(CROSS);
        assert_eq!(map.height(), 3);
        assert_eq!(map.width(), 3);
        assert_eq!(map.position, Some((1, 1)));
        assert_eq!(map.remaining, 8);
    }

    #[test]
    fn test_walk_consumes_pills() {
        let mut map = LambdaMap::parse(CROSS);
        map.walk("UDLR");
        // U eats (0,1), D returns over the now-empty center, L eats (1,0), R returns
        assert_eq!(map.remaining, 6);
        assert_eq!(map.position, Some((1, 1)));
        assert_eq!(map.get(0, 1), Some(MapCell::Done));
        assert_eq!(map.get(1, 1), Some(MapCell::Lambda));
        assert_eq!(map.remaining, map.count_pills());
    }

    #[test]
    fn test_wall_blocks_move() {
        let mut map = LambdaMap::parse("#.\nL.");
        map.walk("U");
        assert_eq!(map.position, Some((1, 0)));
        assert_eq!(map.remaining, 2);
        assert_eq!(map.get(0, 0), Some(MapCell::Wall));
    }

    #[test]
    fn test_out_of_bounds_and_unknown_letters_ignored() {
        let mut map = LambdaMap::parse("L.");
        map.walk("ULDxq");
        assert_eq!(map.position, Some((0, 0)));
        assert_eq!(map.remaining, 1);
        map.walk("RRRR");
        assert_eq!(map.position, Some((0, 1)));
        assert!(map.is_cleared());
    }

    #[test]
    fn test_walked_leaves_source_untouched() {
        let before = LambdaMap::parse(CROSS);
        let after = before.walked("UU");
        assert_eq!(before.remaining, 8);
        assert_eq!(before.position, Some((1, 1)));
        assert_eq!(after.remaining, 7);
        assert_eq!(after.position, Some((0, 1)));
    }

    #[test]
    fn test_missing_walker_ignores_moves() {
        let mut map = LambdaMap::parse("..\n..");
        map.walk("DR");
        assert_eq!(map.position, None);
        assert_eq!(map.remaining, 4);
    }

    #[test]
    fn test_duplicate_walker_keeps_last() {
        let map = LambdaMap::parse("L.\n.L");
        assert_eq!(map.position, Some((1, 1)));
        assert_eq!(map.get(0, 0), Some(MapCell::Done));
    }

    #[test]
    fn test_to_text() {
        let map = LambdaMap::parse("#.L").walked("L");
        assert_eq!(map.to_text(), "#L ");
    }
}
