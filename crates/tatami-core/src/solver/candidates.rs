//! Candidate rectangle generation and the index structures the encoder
//! consumes.

use std::collections::{BTreeMap, BTreeSet};

use crate::puzzle::{Clue, Point, Puzzle};
use crate::rect::Rect;
use crate::sat::VarId;
use crate::solver::{CluePolicy, SolveError, SolveResult};

/// The candidate set and its derived indices, immutable once built.
///
/// Candidate ids are dense and double as decision-variable ids: id `i` owns
/// `rects[i]`. The corner maps key by the corner's cell position and are the
/// raw material of the four-corner and reflex-corner constraints.
#[derive(Debug)]
pub(super) struct Candidates {
    rects: Vec<Rect>,
    ids: BTreeMap<Rect, VarId>,
    covering: BTreeMap<Point, Vec<VarId>>,
    satisfying: BTreeMap<Point, Vec<VarId>>,
    upper_left: BTreeMap<Point, Vec<VarId>>,
    upper_right: BTreeMap<Point, Vec<VarId>>,
    lower_left: BTreeMap<Point, Vec<VarId>>,
    lower_right: BTreeMap<Point, Vec<VarId>>,
}

impl Candidates {
    pub(super) fn len(&self) -> usize {
        self.rects.len()
    }

    pub(super) fn id_of(&self, rect: &Rect) -> Option<VarId> {
        self.ids.get(rect).copied()
    }

    /// Candidates covering the cell.
    pub(super) fn covering(&self, p: Point) -> &[VarId] {
        map_slice(&self.covering, p)
    }

    /// Candidates whose single clue is at the cell.
    pub(super) fn satisfying(&self, p: Point) -> &[VarId] {
        map_slice(&self.satisfying, p)
    }

    pub(super) fn upper_left(&self, p: Point) -> &[VarId] {
        map_slice(&self.upper_left, p)
    }

    pub(super) fn upper_right(&self, p: Point) -> &[VarId] {
        map_slice(&self.upper_right, p)
    }

    pub(super) fn lower_left(&self, p: Point) -> &[VarId] {
        map_slice(&self.lower_left, p)
    }

    pub(super) fn lower_right(&self, p: Point) -> &[VarId] {
        map_slice(&self.lower_right, p)
    }

    pub(super) fn into_rects(self) -> Vec<Rect> {
        self.rects
    }
}

fn map_slice(map: &BTreeMap<Point, Vec<VarId>>, p: Point) -> &[VarId] {
    map.get(&p).map(Vec::as_slice).unwrap_or(&[])
}

/// Enumerates every geometrically valid candidate rectangle and builds the
/// indices, validating forced rectangles along the way.
///
/// For a fixed top-left cell the sweep over bottom-right corners is
/// monotonic: once a hole or a second clue appears, every wider extension
/// in the same rows also contains it, so the column sweep stops early.
/// Zero-clue rectangles are skipped but the sweep continues (growing may
/// pick a clue up); so are shape-mismatched ones under the hard clue
/// policy (growing changes the shape class).
pub(super) fn generate(
    puzzle: &Puzzle,
    forced: &[Rect],
    clues: CluePolicy,
) -> SolveResult<Candidates> {
    let forced: BTreeSet<Rect> = forced.iter().copied().collect();
    let mut candidates = Candidates {
        rects: Vec::new(),
        ids: BTreeMap::new(),
        covering: BTreeMap::new(),
        satisfying: BTreeMap::new(),
        upper_left: BTreeMap::new(),
        upper_right: BTreeMap::new(),
        lower_left: BTreeMap::new(),
        lower_right: BTreeMap::new(),
    };

    for r1 in 0..puzzle.rows() {
        for c1 in 0..puzzle.cols() {
            for r2 in r1..puzzle.rows() {
                for c2 in c1..puzzle.cols() {
                    let rect = Rect::new(r1, c1, r2 - r1 + 1, c2 - c1 + 1);
                    if let Some(hole) = rect.points().find(|&p| !puzzle.is_active(p)) {
                        if forced.contains(&rect) {
                            return Err(SolveError::ForcedRectHole { rect, hole });
                        }
                        break;
                    }
                    let clue_cells: Vec<(Point, Clue)> = rect
                        .points()
                        .filter_map(|p| puzzle.clue(p).map(|clue| (p, clue)))
                        .collect();
                    if clue_cells.len() > 1 {
                        if forced.contains(&rect) {
                            return Err(SolveError::ForcedRectMultipleClues {
                                rect,
                                cells: clue_cells.iter().map(|&(p, _)| p).collect(),
                            });
                        }
                        break;
                    }
                    let Some(&(clue_cell, clue)) = clue_cells.first() else {
                        if forced.contains(&rect) {
                            return Err(SolveError::ForcedRectNoClue { rect });
                        }
                        continue;
                    };
                    if clues == CluePolicy::Hard && rect.shape() != clue {
                        if forced.contains(&rect) {
                            return Err(SolveError::ForcedRectShapeMismatch {
                                rect,
                                clue,
                                shape: rect.shape(),
                            });
                        }
                        continue;
                    }
                    admit(&mut candidates, rect, clue_cell);
                }
            }
        }
    }

    let pruned: Vec<Rect> = forced
        .iter()
        .filter(|rect| !candidates.ids.contains_key(rect))
        .copied()
        .collect();
    if !pruned.is_empty() {
        return Err(SolveError::ForcedRectPruned { rects: pruned });
    }

    report_gaps(puzzle, &candidates);
    Ok(candidates)
}

fn admit(candidates: &mut Candidates, rect: Rect, clue_cell: Point) {
    let id = candidates.rects.len();
    candidates.rects.push(rect);
    candidates.ids.insert(rect, id);
    for p in rect.points() {
        candidates.covering.entry(p).or_default().push(id);
    }
    candidates.satisfying.entry(clue_cell).or_default().push(id);
    candidates
        .upper_left
        .entry(rect.top_left())
        .or_default()
        .push(id);
    candidates
        .upper_right
        .entry(rect.top_right())
        .or_default()
        .push(id);
    candidates
        .lower_left
        .entry(rect.bottom_left())
        .or_default()
        .push(id);
    candidates
        .lower_right
        .entry(rect.bottom_right())
        .or_default()
        .push(id);
}

/// Advisory diagnostics: coverage gaps make the solve unsatisfiable but are
/// not errors.
fn report_gaps(puzzle: &Puzzle, candidates: &Candidates) {
    for cell in puzzle.cells() {
        if candidates.covering(cell).is_empty() {
            tracing::warn!("cell {} has no covering candidate rectangles", cell);
        }
    }
    for (cell, clue) in puzzle.clues() {
        if candidates.satisfying(cell).is_empty() {
            tracing::warn!("clue `{}` at {} has no candidate rectangles", clue, cell);
        }
    }
}
