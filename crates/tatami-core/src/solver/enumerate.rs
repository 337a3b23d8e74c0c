//! Pull-based enumeration of distinct solutions.

use crate::rect::Rect;
use crate::sat::{PbSolver, VarId};
use crate::solver::{SolveError, Solution};

/// Lazy stream of distinct solutions over one solving-service session.
///
/// Each step runs one satisfiability check. A model is turned into a
/// canonically sorted [`Solution`] and then blocked: a clause requiring at
/// least one declared variable to differ from its model value guarantees
/// the same rectangle set can never be returned again. An unsatisfiable
/// check exhausts the stream for good; dropping the stream releases the
/// session.
pub struct Solutions<S: PbSolver> {
    solver: S,
    rects: Vec<Rect>,
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Searching,
    Exhausted,
}

impl<S: PbSolver> Solutions<S> {
    pub(super) fn new(solver: S, rects: Vec<Rect>) -> Self {
        Self {
            solver,
            rects,
            state: State::Searching,
        }
    }

    /// True once enumeration has proven there are no further solutions.
    pub fn exhausted(&self) -> bool {
        self.state == State::Exhausted
    }
}

impl<S: PbSolver> Iterator for Solutions<S> {
    type Item = Result<Solution, SolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == State::Exhausted {
            return None;
        }
        let model = match self.solver.check() {
            Ok(Some(model)) => model,
            Ok(None) => {
                self.state = State::Exhausted;
                return None;
            }
            Err(failure) => {
                self.state = State::Exhausted;
                return Some(Err(failure.into()));
            }
        };
        let mut rects: Vec<Rect> = (0..self.rects.len())
            .filter(|&id| model.value(id))
            .map(|id| self.rects[id])
            .collect();
        rects.sort_unstable();
        let blocking: Vec<(VarId, bool)> = (0..self.rects.len())
            .map(|id| (id, !model.value(id)))
            .collect();
        self.solver.add_clause(&blocking);
        Some(Ok(Solution::new(rects)))
    }
}
