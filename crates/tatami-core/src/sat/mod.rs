//! Generic pseudo-boolean constraint-solving service.
//!
//! The solver consumes this module through the [`PbSolver`] trait: declare
//! one boolean decision variable per candidate rectangle, post hard and soft
//! cardinality constraints over them, then alternate satisfiability checks
//! with incrementally added blocking clauses. Unsatisfiability is a normal
//! outcome (`Ok(None)`), not an error.
//!
//! [`VarisatSolver`] is the default backend, lowering everything to CNF for
//! the `varisat` SAT solver.

mod backend;
mod cardinality;

pub use backend::VarisatSolver;

use thiserror::Error;

/// Index of a decision variable, dense from zero in declaration order.
pub type VarId = usize;

/// Bound sense of a cardinality constraint over unit-weight literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exactly,
    AtMost,
    AtLeast,
}

/// A satisfying assignment for every declared decision variable.
#[derive(Debug, Clone)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    pub(crate) fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// The assigned value of a declared decision variable.
    pub fn value(&self, var: VarId) -> bool {
        self.values[var]
    }

    /// Number of declared decision variables covered by the model.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The backend failed to run a satisfiability check. Distinct from
/// unsatisfiability, which checks report as `Ok(None)`.
#[derive(Debug, Clone, Error)]
#[error("constraint solver failure: {0}")]
pub struct SolverFailure(pub String);

/// Contract of the constraint-solving service.
///
/// Implementations accumulate state monotonically over a session: declared
/// variables, hard constraints, soft (best-effort, weighted, labeled)
/// constraints, and incrementally added clauses. A session backs exactly one
/// puzzle solve.
pub trait PbSolver {
    /// Declares `count` fresh decision variables with ids following on from
    /// the variables declared so far.
    fn declare_vars(&mut self, count: usize);

    /// Number of declared decision variables.
    fn num_vars(&self) -> usize;

    /// Adds a hard constraint: the number of true variables among `vars`
    /// must satisfy `bound` relative to `k`.
    fn add_hard(&mut self, vars: &[VarId], bound: Bound, k: usize);

    /// Adds the same constraint as a best-effort optimization goal with the
    /// given weight, labeled with a constraint family for reporting.
    fn add_soft(&mut self, vars: &[VarId], bound: Bound, k: usize, weight: u32, family: &str);

    /// Adds an arbitrary clause over `(variable, polarity)` literals.
    fn add_clause(&mut self, lits: &[(VarId, bool)]);

    /// Runs a satisfiability check. `Ok(Some(model))` on success (violating
    /// as little soft-constraint weight as possible), `Ok(None)` when the
    /// hard constraints are unsatisfiable.
    fn check(&mut self) -> Result<Option<Model>, SolverFailure>;
}
