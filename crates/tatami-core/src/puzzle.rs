use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A grid position, row-major ordered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// An aspect-ratio clue: the rectangle containing it must be a square
/// (`Plus`), taller than wide (`Vert`), or wider than tall (`Horiz`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Clue {
    Plus,
    Vert,
    Horiz,
}

impl Clue {
    /// Maps a puzzle-text glyph to its clue, if it is one.
    pub fn from_symbol(ch: char) -> Option<Clue> {
        match ch {
            '+' => Some(Clue::Plus),
            '|' => Some(Clue::Vert),
            '-' => Some(Clue::Horiz),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Clue::Plus => '+',
            Clue::Vert => '|',
            Clue::Horiz => '-',
        }
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An immutable Tatamibari puzzle: a set of active cells (the grid may be
/// irregular or contain holes) and a partial mapping from cells to clues.
#[derive(Debug, Clone)]
pub struct Puzzle {
    cells: BTreeSet<Point>,
    clues: BTreeMap<Point, Clue>,
    rows: usize,
    cols: usize,
}

impl Puzzle {
    /// Parses the puzzle text format: one line per row, where a space is an
    /// inactive cell, `+`/`|`/`-` are clue cells, and any other character is
    /// a plain active cell (`_` by convention). Lines are right-trimmed, so
    /// CRLF input and trailing blanks do not create cells.
    pub fn from_text(text: &str) -> Puzzle {
        let mut cells = BTreeSet::new();
        let mut clues = BTreeMap::new();
        for (row, line) in text.lines().enumerate() {
            for (col, ch) in line.trim_end().chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let p = Point::new(row, col);
                cells.insert(p);
                if let Some(clue) = Clue::from_symbol(ch) {
                    clues.insert(p, clue);
                }
            }
        }
        let rows = cells.iter().map(|p| p.row).max().map_or(0, |r| r + 1);
        let cols = cells.iter().map(|p| p.col).max().map_or(0, |c| c + 1);
        Puzzle {
            cells,
            clues,
            rows,
            cols,
        }
    }

    /// Number of grid rows spanned by the active cells.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns spanned by the active cells.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_active(&self, p: Point) -> bool {
        self.cells.contains(&p)
    }

    pub fn clue(&self, p: Point) -> Option<Clue> {
        self.clues.get(&p).copied()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn clue_count(&self) -> usize {
        self.clues.len()
    }

    /// All active cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().copied()
    }

    /// All clue placements in row-major order.
    pub fn clues(&self) -> impl Iterator<Item = (Point, Clue)> + '_ {
        self.clues.iter().map(|(&p, &clue)| (p, clue))
    }

    /// Positions inside the bounding grid that are not active cells.
    pub fn holes(&self) -> impl Iterator<Item = Point> + '_ {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| {
            (0..cols)
                .map(move |col| Point::new(row, col))
                .filter(move |&p| !self.is_active(p))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_grid() {
        let puzzle = Puzzle::from_text("+_\n_-\n");
        assert_eq!(puzzle.rows(), 2);
        assert_eq!(puzzle.cols(), 2);
        assert_eq!(puzzle.cell_count(), 4);
        assert_eq!(puzzle.clue(Point::new(0, 0)), Some(Clue::Plus));
        assert_eq!(puzzle.clue(Point::new(1, 1)), Some(Clue::Horiz));
        assert_eq!(puzzle.clue(Point::new(0, 1)), None);
        assert_eq!(puzzle.holes().count(), 0);
    }

    #[test]
    fn test_parse_irregular_grid() {
        // Hole in the middle, ragged right edge.
        let puzzle = Puzzle::from_text("|_\n| \n__\n");
        assert_eq!(puzzle.rows(), 3);
        assert_eq!(puzzle.cols(), 2);
        assert_eq!(puzzle.cell_count(), 5);
        assert!(!puzzle.is_active(Point::new(1, 1)));
        let holes: Vec<Point> = puzzle.holes().collect();
        assert_eq!(holes, vec![Point::new(1, 1)]);
    }

    #[test]
    fn test_parse_crlf_input() {
        let puzzle = Puzzle::from_text("+_\r\n__\r\n");
        assert_eq!(puzzle.cols(), 2);
        assert_eq!(puzzle.cell_count(), 4);
    }

    #[test]
    fn test_parse_empty_text() {
        let puzzle = Puzzle::from_text("");
        assert_eq!(puzzle.rows(), 0);
        assert_eq!(puzzle.cols(), 0);
        assert_eq!(puzzle.cell_count(), 0);
    }

    #[test]
    fn test_clue_symbols() {
        assert_eq!(Clue::from_symbol('+'), Some(Clue::Plus));
        assert_eq!(Clue::from_symbol('|'), Some(Clue::Vert));
        assert_eq!(Clue::from_symbol('-'), Some(Clue::Horiz));
        assert_eq!(Clue::from_symbol('_'), None);
        assert_eq!(Clue::Vert.to_string(), "|");
    }
}
