//! Lowers a candidate set to constraints on the solving service.

use crate::puzzle::{Point, Puzzle};
use crate::sat::{Bound, PbSolver, VarId};
use crate::solver::candidates::Candidates;
use crate::solver::{CluePolicy, CornerPolicy, CoverPolicy, SolveConfig};

/// Weight of every soft objective; families only label the reports.
const SOFT_WEIGHT: u32 = 1;

pub(super) fn encode<S: PbSolver>(
    puzzle: &Puzzle,
    candidates: &Candidates,
    config: &SolveConfig,
    solver: &mut S,
) {
    solver.declare_vars(candidates.len());
    encode_cover(puzzle, candidates, config, solver);
    if config.corners != CornerPolicy::Ignore {
        encode_corners(puzzle, candidates, config.corners, solver);
        if config.reflex_three_corners {
            encode_reflex_corners(puzzle, candidates, config.corners, solver);
        }
    }
    for rect in &config.forced {
        let id = candidates
            .id_of(rect)
            .expect("forced rectangles are validated during generation");
        solver.add_clause(&[(id, true)]);
    }
}

/// Clue and coverage constraints, cell by cell. Under the hard clue policy a
/// clue cell is settled by its satisfying candidates alone; everything else
/// falls to the cover policy.
fn encode_cover<S: PbSolver>(
    puzzle: &Puzzle,
    candidates: &Candidates,
    config: &SolveConfig,
    solver: &mut S,
) {
    for cell in puzzle.cells() {
        if config.clues == CluePolicy::Hard && puzzle.clue(cell).is_some() {
            solver.add_hard(candidates.satisfying(cell), Bound::Exactly, 1);
            continue;
        }
        let covering = candidates.covering(cell);
        match config.covers {
            CoverPolicy::Exact => solver.add_hard(covering, Bound::Exactly, 1),
            CoverPolicy::Subset => {
                solver.add_hard(covering, Bound::AtMost, 1);
                solver.add_soft(covering, Bound::AtLeast, 1, SOFT_WEIGHT, "cover");
            }
            CoverPolicy::Superset => {
                solver.add_soft(covering, Bound::AtMost, 1, SOFT_WEIGHT, "cover");
                solver.add_hard(covering, Bound::AtLeast, 1);
            }
            CoverPolicy::Incomparable => {
                solver.add_soft(covering, Bound::Exactly, 1, SOFT_WEIGHT, "cover");
            }
            CoverPolicy::Ignore => {}
        }
    }
}

/// The four-corner rule: for every grid vertex, of the four rectangles that
/// could meet there (one per quadrant), at most three may be selected.
fn encode_corners<S: PbSolver>(
    puzzle: &Puzzle,
    candidates: &Candidates,
    policy: CornerPolicy,
    solver: &mut S,
) {
    for cell in puzzle.cells() {
        let right = Point::new(cell.row, cell.col + 1);
        let below = Point::new(cell.row + 1, cell.col);
        let diagonal = Point::new(cell.row + 1, cell.col + 1);
        for &a in candidates.lower_right(cell) {
            for &b in candidates.lower_left(right) {
                for &c in candidates.upper_right(below) {
                    for &d in candidates.upper_left(diagonal) {
                        corner_bound(solver, policy, &[a, b, c, d], 3);
                    }
                }
            }
        }
    }
}

/// The reflex-corner rule: at each corner of a hole, of the three
/// rectangles that could meet there from the active side, at most two may
/// be selected.
fn encode_reflex_corners<S: PbSolver>(
    puzzle: &Puzzle,
    candidates: &Candidates,
    policy: CornerPolicy,
    solver: &mut S,
) {
    for hole in puzzle.holes() {
        let Point { row, col } = hole;
        // South-east corner of the hole.
        for &a in candidates.lower_left(Point::new(row, col + 1)) {
            for &b in candidates.upper_right(Point::new(row + 1, col)) {
                for &c in candidates.upper_left(Point::new(row + 1, col + 1)) {
                    corner_bound(solver, policy, &[a, b, c], 2);
                }
            }
        }
        // South-west.
        if col > 0 {
            for &a in candidates.lower_right(Point::new(row, col - 1)) {
                for &b in candidates.upper_right(Point::new(row + 1, col - 1)) {
                    for &c in candidates.upper_left(Point::new(row + 1, col)) {
                        corner_bound(solver, policy, &[a, b, c], 2);
                    }
                }
            }
        }
        // North-east.
        if row > 0 {
            for &a in candidates.lower_right(Point::new(row - 1, col)) {
                for &b in candidates.lower_left(Point::new(row - 1, col + 1)) {
                    for &c in candidates.upper_left(Point::new(row, col + 1)) {
                        corner_bound(solver, policy, &[a, b, c], 2);
                    }
                }
            }
        }
        // North-west.
        if row > 0 && col > 0 {
            for &a in candidates.lower_right(Point::new(row - 1, col - 1)) {
                for &b in candidates.lower_left(Point::new(row - 1, col)) {
                    for &c in candidates.upper_right(Point::new(row, col - 1)) {
                        corner_bound(solver, policy, &[a, b, c], 2);
                    }
                }
            }
        }
    }
}

fn corner_bound<S: PbSolver>(solver: &mut S, policy: CornerPolicy, vars: &[VarId], k: usize) {
    match policy {
        CornerPolicy::Hard => solver.add_hard(vars, Bound::AtMost, k),
        CornerPolicy::Soft => solver.add_soft(vars, Bound::AtMost, k, SOFT_WEIGHT, "corner"),
        CornerPolicy::Ignore => {}
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::rect::Rect;
    use crate::sat::{Model, SolverFailure};

    #[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
    enum Recorded {
        Hard(Vec<VarId>, usize),
        Soft(Vec<VarId>, usize, String),
        Clause(Vec<(VarId, bool)>),
    }

    /// Records constraints instead of solving; exercises the encoder
    /// against the service contract without a backend.
    #[derive(Default)]
    struct Recorder {
        vars: usize,
        entries: Vec<Recorded>,
    }

    impl PbSolver for Recorder {
        fn declare_vars(&mut self, count: usize) {
            self.vars += count;
        }

        fn num_vars(&self) -> usize {
            self.vars
        }

        fn add_hard(&mut self, vars: &[VarId], _bound: Bound, k: usize) {
            self.entries.push(Recorded::Hard(vars.to_vec(), k));
        }

        fn add_soft(&mut self, vars: &[VarId], _bound: Bound, k: usize, _weight: u32, family: &str) {
            self.entries
                .push(Recorded::Soft(vars.to_vec(), k, family.to_string()));
        }

        fn add_clause(&mut self, lits: &[(VarId, bool)]) {
            self.entries.push(Recorded::Clause(lits.to_vec()));
        }

        fn check(&mut self) -> Result<Option<Model>, SolverFailure> {
            Ok(None)
        }
    }

    fn encoded(text: &str, config: &SolveConfig) -> (Recorder, Candidates) {
        let puzzle = Puzzle::from_text(text);
        let candidates =
            crate::solver::candidates::generate(&puzzle, &config.forced, config.clues).unwrap();
        let mut recorder = Recorder::default();
        encode(&puzzle, &candidates, config, &mut recorder);
        (recorder, candidates)
    }

    #[test]
    fn test_exact_cover_posts_one_constraint_per_cell() {
        let (recorder, _) = encoded("++\n++", &SolveConfig::default());
        // Four exactly-1 clue constraints plus one corner quadruple.
        let hards = recorder
            .entries
            .iter()
            .filter(|e| matches!(e, Recorded::Hard(..)))
            .count();
        assert_eq!(recorder.vars, 4);
        assert_eq!(hards, 5);
    }

    #[test]
    fn test_corner_quadruple_uses_all_four_quadrants() {
        let (recorder, candidates) = encoded("++\n++", &SolveConfig::default());
        let quad = recorder
            .entries
            .iter()
            .find_map(|e| match e {
                Recorded::Hard(vars, 3) => Some(vars.clone()),
                _ => None,
            })
            .expect("a four-corner constraint");
        let expected: BTreeSet<VarId> = [
            Rect::new(0, 0, 1, 1),
            Rect::new(0, 1, 1, 1),
            Rect::new(1, 0, 1, 1),
            Rect::new(1, 1, 1, 1),
        ]
        .iter()
        .map(|r| candidates.id_of(r).unwrap())
        .collect();
        assert_eq!(quad.iter().copied().collect::<BTreeSet<_>>(), expected);
    }

    #[test]
    fn test_ignore_covers_posts_nothing_for_plain_cells() {
        let config = SolveConfig {
            covers: CoverPolicy::Ignore,
            corners: CornerPolicy::Ignore,
            ..SolveConfig::default()
        };
        let (recorder, _) = encoded("+_\n__", &config);
        // Only the clue cell contributes a constraint.
        assert_eq!(recorder.entries.len(), 1);
    }

    #[test]
    fn test_subset_covers_mix_hard_and_soft() {
        let config = SolveConfig {
            covers: CoverPolicy::Subset,
            ..SolveConfig::default()
        };
        let (recorder, _) = encoded("+_\n__", &config);
        let softs: Vec<&Recorded> = recorder
            .entries
            .iter()
            .filter(|e| matches!(e, Recorded::Soft(..)))
            .collect();
        // Three plain cells get a soft at-least-1 in the "cover" family.
        assert_eq!(softs.len(), 3);
        assert!(softs
            .iter()
            .all(|e| matches!(e, Recorded::Soft(_, 1, family) if family == "cover")));
    }

    #[test]
    fn test_forced_rects_become_unit_clauses() {
        let config = SolveConfig {
            forced: vec![Rect::new(0, 0, 1, 2)],
            ..SolveConfig::default()
        };
        let (recorder, candidates) = encoded("-_\n-_", &config);
        let id = candidates.id_of(&Rect::new(0, 0, 1, 2)).unwrap();
        assert!(recorder
            .entries
            .iter()
            .any(|e| matches!(e, Recorded::Clause(lits) if lits == &[(id, true)])));
    }

    #[test]
    fn test_reflex_corners_constrain_hole_neighbors() {
        // 2x2 grid with a hole at (1,1); the hole's north-west triple is the
        // only orientation with all three corner sets populated.
        let config = SolveConfig {
            clues: CluePolicy::Ignore,
            reflex_three_corners: true,
            ..SolveConfig::default()
        };
        let (recorder, _) = encoded("+-\n|", &config);
        assert!(recorder
            .entries
            .iter()
            .any(|e| matches!(e, Recorded::Hard(vars, 2) if vars.len() == 3)));
    }
}
