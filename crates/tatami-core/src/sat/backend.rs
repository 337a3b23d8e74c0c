//! Default [`PbSolver`] backend over the `varisat` SAT solver.

use std::collections::{BTreeMap, HashSet};

use varisat::{ExtendFormula, Lit, Solver, Var};

use super::cardinality;
use super::{Bound, Model, PbSolver, SolverFailure, VarId};

/// Incremental pseudo-boolean solver lowering everything to CNF.
///
/// Hard cardinality bounds become clauses directly. A soft constraint gets a
/// fresh relaxation literal appended to every clause of its encoding, so
/// setting the literal true switches the whole constraint off at the cost of
/// its weight. [`check`](PbSolver::check) minimizes the total violated
/// weight by a linear search over a violation budget, enforced through
/// assumptions on a unary counter over the relaxation literals.
pub struct VarisatSolver {
    solver: Solver<'static>,
    /// Positive literal of each declared decision variable, by id.
    decision: Vec<Lit>,
    /// One literal per unit of soft weight; true means the owning
    /// constraint is violated.
    relax_units: Vec<Lit>,
    /// Relaxation literal and family label per soft constraint.
    soft: Vec<(String, Lit)>,
    counter: Option<ViolationCounter>,
}

/// Count registers over the relaxation literals, rebuilt if soft
/// constraints arrive after a previous build. Stale registers from an
/// earlier build stay in the formula but constrain nothing.
struct ViolationCounter {
    registers: Vec<Lit>,
    covers: usize,
}

impl VarisatSolver {
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            decision: Vec::new(),
            relax_units: Vec::new(),
            soft: Vec::new(),
            counter: None,
        }
    }

    fn lits(&self, vars: &[VarId]) -> Vec<Lit> {
        vars.iter().map(|&v| self.decision[v]).collect()
    }

    fn encode_bound(&mut self, vars: &[VarId], bound: Bound, k: usize) -> Vec<Vec<Lit>> {
        let lits = self.lits(vars);
        let solver = &mut self.solver;
        let mut fresh = || solver.new_lit();
        cardinality::encode(&lits, bound, k, &mut fresh)
    }

    fn solve_raw(&mut self) -> Result<bool, SolverFailure> {
        self.solver
            .solve()
            .map_err(|e| SolverFailure(e.to_string()))
    }

    fn extract(&self) -> Result<Model, SolverFailure> {
        let model = self
            .solver
            .model()
            .ok_or_else(|| SolverFailure("satisfiable check produced no model".into()))?;
        let true_vars: HashSet<Var> = model
            .iter()
            .filter(|lit| lit.is_positive())
            .map(|lit| lit.var())
            .collect();
        if tracing::enabled!(tracing::Level::DEBUG) && !self.soft.is_empty() {
            let mut violated: BTreeMap<&str, usize> = BTreeMap::new();
            for (family, lit) in &self.soft {
                if true_vars.contains(&lit.var()) == lit.is_positive() {
                    *violated.entry(family.as_str()).or_default() += 1;
                }
            }
            tracing::debug!("soft constraints violated by family: {:?}", violated);
        }
        let values = self
            .decision
            .iter()
            .map(|lit| true_vars.contains(&lit.var()))
            .collect();
        Ok(Model::new(values))
    }

    fn ensure_counter(&mut self) {
        let n = self.relax_units.len();
        if self.counter.as_ref().map(|c| c.covers) == Some(n) {
            return;
        }
        let mut clauses = Vec::new();
        let registers = {
            let solver = &mut self.solver;
            let mut fresh = || solver.new_lit();
            cardinality::count_registers(&self.relax_units, n, &mut fresh, &mut clauses)
        };
        for clause in &clauses {
            self.solver.add_clause(clause);
        }
        self.counter = Some(ViolationCounter {
            registers,
            covers: n,
        });
    }
}

impl Default for VarisatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PbSolver for VarisatSolver {
    fn declare_vars(&mut self, count: usize) {
        for _ in 0..count {
            let lit = self.solver.new_lit();
            self.decision.push(lit);
        }
    }

    fn num_vars(&self) -> usize {
        self.decision.len()
    }

    fn add_hard(&mut self, vars: &[VarId], bound: Bound, k: usize) {
        let clauses = self.encode_bound(vars, bound, k);
        for clause in &clauses {
            self.solver.add_clause(clause);
        }
    }

    fn add_soft(&mut self, vars: &[VarId], bound: Bound, k: usize, weight: u32, family: &str) {
        let clauses = self.encode_bound(vars, bound, k);
        if clauses.is_empty() {
            return;
        }
        let relax = self.solver.new_lit();
        for clause in clauses {
            let mut relaxed = clause;
            relaxed.push(relax);
            self.solver.add_clause(&relaxed);
        }
        for _ in 0..weight {
            self.relax_units.push(relax);
        }
        self.soft.push((family.to_string(), relax));
    }

    fn add_clause(&mut self, lits: &[(VarId, bool)]) {
        let clause: Vec<Lit> = lits
            .iter()
            .map(|&(v, polarity)| {
                if polarity {
                    self.decision[v]
                } else {
                    !self.decision[v]
                }
            })
            .collect();
        self.solver.add_clause(&clause);
    }

    fn check(&mut self) -> Result<Option<Model>, SolverFailure> {
        if self.relax_units.is_empty() {
            if !self.solve_raw()? {
                return Ok(None);
            }
            return Ok(Some(self.extract()?));
        }
        self.ensure_counter();
        let registers = self
            .counter
            .as_ref()
            .map(|c| c.registers.clone())
            .unwrap_or_default();
        // Search budgets from zero up; the first satisfiable one is the
        // minimum total violated weight.
        let mut found = None;
        for budget in 0..=registers.len() {
            match registers.get(budget) {
                Some(&overflow) => self.solver.assume(&[!overflow]),
                None => self.solver.assume(&[]),
            }
            if self.solve_raw()? {
                found = Some(self.extract()?);
                break;
            }
        }
        self.solver.assume(&[]);
        Ok(found)
    }
}
