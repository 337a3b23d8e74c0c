//! CNF lowerings for cardinality bounds.
//!
//! Constraints are returned as clause lists rather than added directly, so
//! the soft-constraint path can append a relaxation literal to every clause
//! before submitting them.

use itertools::Itertools;
use varisat::Lit;

use super::Bound;

/// Bounds over at most this many literals use the naive binomial encoding;
/// larger ones switch to a sequential counter with auxiliary variables.
const BINOMIAL_LIMIT: usize = 8;

pub(super) fn encode(
    lits: &[Lit],
    bound: Bound,
    k: usize,
    new_lit: &mut dyn FnMut() -> Lit,
) -> Vec<Vec<Lit>> {
    let mut clauses = Vec::new();
    match bound {
        Bound::AtMost => at_most(lits, k, new_lit, &mut clauses),
        Bound::AtLeast => at_least(lits, k, new_lit, &mut clauses),
        Bound::Exactly => {
            at_most(lits, k, new_lit, &mut clauses);
            at_least(lits, k, new_lit, &mut clauses);
        }
    }
    clauses
}

fn at_most(lits: &[Lit], k: usize, new_lit: &mut dyn FnMut() -> Lit, out: &mut Vec<Vec<Lit>>) {
    if k >= lits.len() {
        return;
    }
    if k == 0 {
        for &lit in lits {
            out.push(vec![!lit]);
        }
        return;
    }
    if lits.len() <= BINOMIAL_LIMIT {
        // No k+1 of them may all be true.
        for combo in lits.iter().copied().combinations(k + 1) {
            out.push(combo.into_iter().map(|lit| !lit).collect());
        }
    } else {
        let registers = count_registers(lits, k + 1, new_lit, out);
        // The overflow register says "at least k+1 true"; forbid it.
        out.push(vec![!registers[k]]);
    }
}

fn at_least(lits: &[Lit], k: usize, new_lit: &mut dyn FnMut() -> Lit, out: &mut Vec<Vec<Lit>>) {
    if k == 0 {
        return;
    }
    if k > lits.len() {
        // Unsatisfiable as stated; the empty clause carries that verdict
        // (or, relaxed, charges the soft constraint's weight).
        out.push(Vec::new());
        return;
    }
    if lits.len() <= BINOMIAL_LIMIT {
        // Every n-k+1 of them must contain a true literal.
        for combo in lits.iter().copied().combinations(lits.len() - k + 1) {
            out.push(combo);
        }
    } else {
        // At least k true is at most n-k false.
        let negated: Vec<Lit> = lits.iter().map(|&lit| !lit).collect();
        at_most(&negated, lits.len() - k, new_lit, out);
    }
}

/// Sequential unary counter over `lits`, capped at `width`.
///
/// Emits defining clauses into `out` and returns the final register row,
/// where `registers[j]` is forced true whenever at least `j + 1` of the
/// literals are true. Only that forcing direction is encoded, which is
/// sufficient for upper bounds enforced by unit clauses or assumptions.
pub(super) fn count_registers(
    lits: &[Lit],
    width: usize,
    new_lit: &mut dyn FnMut() -> Lit,
    out: &mut Vec<Vec<Lit>>,
) -> Vec<Lit> {
    debug_assert!(width >= 1 && width <= lits.len());
    let mut prev: Vec<Lit> = Vec::new();
    for (i, &x) in lits.iter().enumerate() {
        let rows = width.min(i + 1);
        let row: Vec<Lit> = (0..rows).map(|_| new_lit()).collect();
        // x alone reaches a count of one.
        out.push(vec![!x, row[0]]);
        for j in 1..rows {
            // x on top of j previous trues reaches j+1.
            out.push(vec![!x, !prev[j - 1], row[j]]);
        }
        // Counts carry over from the previous position.
        for j in 0..prev.len().min(rows) {
            out.push(vec![!prev[j], row[j]]);
        }
        prev = row;
    }
    prev
}

#[cfg(test)]
mod tests {
    use varisat::{ExtendFormula, Solver};

    use super::*;

    fn solve_with(
        n_vars: usize,
        build: impl FnOnce(&[Lit], &mut dyn FnMut() -> Lit) -> Vec<Vec<Lit>>,
    ) -> Option<Vec<bool>> {
        let mut solver = Solver::new();
        let lits: Vec<Lit> = (0..n_vars).map(|_| solver.new_lit()).collect();
        let clauses = {
            let solver = &mut solver;
            let mut fresh = move || solver.new_lit();
            build(&lits, &mut fresh)
        };
        for clause in &clauses {
            solver.add_clause(clause);
        }
        if !solver.solve().unwrap() {
            return None;
        }
        let model = solver.model().unwrap();
        Some(
            lits.iter()
                .map(|lit| model.contains(lit))
                .collect(),
        )
    }

    #[test]
    fn test_exactly_one_binomial() {
        let assignment = solve_with(4, |lits, fresh| {
            let mut clauses = encode(lits, Bound::Exactly, 1, fresh);
            // Pin the first variable false so the solver has to commit.
            clauses.push(vec![!lits[0]]);
            clauses
        })
        .unwrap();
        assert_eq!(assignment.iter().filter(|&&v| v).count(), 1);
        assert!(!assignment[0]);
    }

    #[test]
    fn test_at_most_zero() {
        let assignment = solve_with(3, |lits, fresh| encode(lits, Bound::AtMost, 0, fresh)).unwrap();
        assert!(assignment.iter().all(|&v| !v));
    }

    #[test]
    fn test_at_least_unsatisfiable_when_k_exceeds_n() {
        assert!(solve_with(2, |lits, fresh| encode(lits, Bound::AtLeast, 3, fresh)).is_none());
    }

    #[test]
    fn test_exactly_k_sequential_counter() {
        // 12 literals forces the counter path on both bound directions.
        let assignment =
            solve_with(12, |lits, fresh| encode(lits, Bound::Exactly, 3, fresh)).unwrap();
        assert_eq!(assignment.iter().filter(|&&v| v).count(), 3);
    }

    #[test]
    fn test_at_most_k_sequential_counter_blocks_excess() {
        // Force 4 of 12 true while demanding at most 3: unsatisfiable.
        let result = solve_with(12, |lits, fresh| {
            let mut clauses = encode(lits, Bound::AtMost, 3, fresh);
            for &lit in &lits[..4] {
                clauses.push(vec![lit]);
            }
            clauses
        });
        assert!(result.is_none());
    }

    #[test]
    fn test_at_least_k_sequential_counter() {
        let assignment =
            solve_with(12, |lits, fresh| encode(lits, Bound::AtLeast, 10, fresh)).unwrap();
        assert!(assignment.iter().filter(|&&v| v).count() >= 10);
    }
}
