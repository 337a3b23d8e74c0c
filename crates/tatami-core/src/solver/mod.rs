//! Puzzle solving: candidate generation, constraint encoding, and bounded
//! solution enumeration.

mod candidates;
mod encode;
mod enumerate;

pub use enumerate::Solutions;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::puzzle::{Clue, Point, Puzzle};
use crate::rect::Rect;
use crate::sat::{PbSolver, SolverFailure, VarisatSolver};

/// Interpretation of clue constraints on the shape of the containing
/// rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CluePolicy {
    /// Every clue cell is covered by exactly one rectangle of the matching
    /// shape class; mismatched candidates are pruned outright.
    #[default]
    Hard,
    /// Clue shapes are not enforced.
    Ignore,
}

/// Interpretation of cell-coverage constraints (for non-clue cells, or all
/// cells when clues are ignored).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoverPolicy {
    /// Exactly one covering rectangle per cell.
    #[default]
    Exact,
    /// At most one (hard), at least one (soft).
    Subset,
    /// At least one (hard), at most one (soft).
    Superset,
    /// Exactly one, as a soft objective only.
    Incomparable,
    /// No coverage constraint.
    Ignore,
}

/// Interpretation of the four-corner rule: no grid vertex may be a shared
/// corner of four selected rectangles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CornerPolicy {
    #[default]
    Hard,
    Soft,
    Ignore,
}

/// Error for an unrecognized policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {what} policy {value:?}")]
pub struct ParsePolicyError {
    what: &'static str,
    value: String,
}

macro_rules! policy_strings {
    ($ty:ident, $what:literal, { $($name:literal => $variant:ident),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = ParsePolicyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(ParsePolicyError {
                        what: $what,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($ty::$variant => write!(f, $name),)+
                }
            }
        }
    };
}

policy_strings!(CluePolicy, "clue", { "hard" => Hard, "ignore" => Ignore });
policy_strings!(CoverPolicy, "cover", {
    "exact" => Exact,
    "subset" => Subset,
    "superset" => Superset,
    "incomparable" => Incomparable,
    "ignore" => Ignore,
});
policy_strings!(CornerPolicy, "corner", { "hard" => Hard, "soft" => Soft, "ignore" => Ignore });

/// Configuration for a single solve.
#[derive(Debug, Clone, Default)]
pub struct SolveConfig {
    /// Rectangles required to be part of every returned solution.
    pub forced: Vec<Rect>,
    pub clues: CluePolicy,
    pub covers: CoverPolicy,
    pub corners: CornerPolicy,
    /// Forbid three rectangles meeting at a reflex corner next to a hole.
    pub reflex_three_corners: bool,
}

/// Result type for solver operations.
pub type SolveResult<T> = Result<T, SolveError>;

/// Errors detected before or during a solve. Forced-rectangle problems are
/// all caught before any satisfiability check runs; unsatisfiability itself
/// is a normal zero-solutions outcome, not an error.
#[derive(Debug, Clone, Error)]
pub enum SolveError {
    /// The forced rectangle overlaps an inactive cell.
    #[error("forced rectangle {rect} contains a hole at {hole}")]
    ForcedRectHole { rect: Rect, hole: Point },
    /// The forced rectangle contains more than one clue.
    #[error("forced rectangle {rect} contains multiple clues at {cells:?}")]
    ForcedRectMultipleClues { rect: Rect, cells: Vec<Point> },
    /// The forced rectangle contains no clue at all.
    #[error("forced rectangle {rect} contains no clue")]
    ForcedRectNoClue { rect: Rect },
    /// The forced rectangle holds a clue its shape cannot satisfy.
    #[error("forced rectangle {rect} contains a `{clue}` clue, but is shaped for `{shape}`")]
    ForcedRectShapeMismatch { rect: Rect, clue: Clue, shape: Clue },
    /// Forced rectangles that never became candidates for any other reason
    /// (outside the grid, zero-sized).
    #[error("forced rectangles {rects:?} were pruned during candidate generation")]
    ForcedRectPruned { rects: Vec<Rect> },
    /// The constraint backend failed to run a check.
    #[error(transparent)]
    Backend(#[from] SolverFailure),
}

/// An immutable solution: interior-disjoint rectangles in canonical
/// (row, col, height, width) order, covering the puzzle as the configured
/// policies demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Solution {
    rects: Vec<Rect>,
}

impl Solution {
    pub(crate) fn new(rects: Vec<Rect>) -> Self {
        Self { rects }
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.rects.iter()
    }

    pub fn contains(&self, rect: &Rect) -> bool {
        self.rects.binary_search(rect).is_ok()
    }
}

impl<'a> IntoIterator for &'a Solution {
    type Item = &'a Rect;
    type IntoIter = std::slice::Iter<'a, Rect>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.iter()
    }
}

/// Solves a puzzle with the default constraint backend, returning the lazy
/// solution stream.
///
/// The stream yields distinct solutions until the constraint problem is
/// exhausted; bound it with [`Iterator::take`] (take 2 to test uniqueness).
pub fn solve(puzzle: &Puzzle, config: &SolveConfig) -> SolveResult<Solutions<VarisatSolver>> {
    solve_with(puzzle, config, VarisatSolver::new())
}

/// Solves a puzzle with a caller-supplied constraint backend.
pub fn solve_with<S: PbSolver>(
    puzzle: &Puzzle,
    config: &SolveConfig,
    mut solver: S,
) -> SolveResult<Solutions<S>> {
    let candidates = candidates::generate(puzzle, &config.forced, config.clues)?;
    encode::encode(puzzle, &candidates, config, &mut solver);
    Ok(Solutions::new(solver, candidates.into_rects()))
}
