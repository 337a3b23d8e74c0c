//! Core Tatamibari engine.
//!
//! A Tatamibari puzzle is a grid (possibly with holes) in which some cells
//! carry an aspect-ratio clue. A solution tiles the active cells with
//! axis-aligned rectangles so that every rectangle contains exactly one clue
//! of the matching shape class and no four rectangles meet at a single grid
//! vertex.
//!
//! The engine reduces a puzzle to a pseudo-boolean constraint problem: one
//! decision variable per candidate rectangle, cardinality constraints for
//! clue satisfaction, cell coverage and corner well-formedness, and a
//! solve-then-block loop that enumerates distinct solutions.

pub mod puzzle;
pub mod rect;
pub mod sat;
pub mod solver;

pub use puzzle::{Clue, Point, Puzzle};
pub use rect::{ParseRectError, Rect};
pub use solver::{
    solve, solve_with, CluePolicy, CornerPolicy, CoverPolicy, ParsePolicyError, SolveConfig,
    SolveError, SolveResult, Solution, Solutions,
};
