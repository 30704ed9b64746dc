//! Small 0/1 integer linear programs and an exact branch-and-bound solver.
//!
//! Problems here are tiny (one variable per transition), so the solver keeps a
//! dense coefficient matrix and does plain depth-first branching with
//! interval propagation on every constraint and an objective bound.

use log::debug;

#[derive(Debug, Clone, Eq, PartialEq)]
struct Constraint {
    terms: Vec<(usize, i64)>,
    lower: i64,
    upper: i64,
}

/// `maximize Σ c_i x_i` subject to `lower ≤ Σ a_i x_i ≤ upper`, `x_i ∈ {0, 1}`.
#[derive(Debug, Clone, Default)]
pub struct BinaryProgram {
    objective: Vec<i64>,
    constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Solution {
    pub values: Vec<bool>,
    pub objective: i64,
}

impl BinaryProgram {
    /// Program over `num_vars` variables with a zero objective.
    pub fn new(num_vars: usize) -> Self {
        Self {
            objective: vec![0; num_vars],
            constraints: Vec::new(),
        }
    }

    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn set_objective(&mut self, var: usize, coeff: i64) {
        self.objective[var] = coeff;
    }

    /// Add `lower ≤ Σ terms ≤ upper`. Missing bounds are unbounded.
    pub fn add_constraint(
        &mut self,
        terms: impl IntoIterator<Item = (usize, i64)>,
        lower: Option<i64>,
        upper: Option<i64>,
    ) {
        let terms: Vec<_> = terms.into_iter().collect();
        for &(var, _) in &terms {
            assert!(var < self.num_vars(), "Variable {} out of range", var);
        }
        self.constraints.push(Constraint {
            terms,
            lower: lower.unwrap_or(i64::MIN),
            upper: upper.unwrap_or(i64::MAX),
        });
    }

    /// Force `var` to `value`.
    pub fn fix(&mut self, var: usize, value: bool) {
        let v = i64::from(value);
        self.add_constraint([(var, 1)], Some(v), Some(v));
    }

    /// Optimal solution, or `None` if the program is infeasible.
    ///
    /// Among optimal solutions, the one found first is returned; branching
    /// tries `x_i = 1` before `x_i = 0` in variable order, so the result is
    /// deterministic.
    pub fn solve(&self) -> Option<Solution> {
        let n = self.num_vars();

        let mut rows = vec![vec![0i64; n]; self.constraints.len()];
        for (row, c) in rows.iter_mut().zip(&self.constraints) {
            for &(var, a) in &c.terms {
                row[var] += a;
            }
        }

        // Range of what variables k.. can still add to each row / to the objective.
        let min_rest: Vec<Vec<i64>> = rows
            .iter()
            .map(|row| suffix_sums(n, |k| row[k].min(0)))
            .collect();
        let max_rest: Vec<Vec<i64>> = rows
            .iter()
            .map(|row| suffix_sums(n, |k| row[k].max(0)))
            .collect();
        let objective_rest = suffix_sums(n, |k| self.objective[k].max(0));

        let mut search = Search {
            program: self,
            rows: &rows,
            min_rest: &min_rest,
            max_rest: &max_rest,
            objective_rest: &objective_rest,
            values: vec![false; n],
            sums: vec![0; rows.len()],
            best: None,
            visited: 0,
        };
        search.branch(0, 0);

        debug!(
            "branch-and-bound: {} vars, {} constraints, {} nodes, optimum {:?}",
            n,
            rows.len(),
            search.visited,
            search.best.as_ref().map(|s| s.objective)
        );
        search.best
    }
}

fn suffix_sums(n: usize, value: impl Fn(usize) -> i64) -> Vec<i64> {
    let mut acc = vec![0i64; n + 1];
    for k in (0..n).rev() {
        acc[k] = acc[k + 1] + value(k);
    }
    acc
}

struct Search<'p> {
    program: &'p BinaryProgram,
    rows: &'p [Vec<i64>],
    min_rest: &'p [Vec<i64>],
    max_rest: &'p [Vec<i64>],
    objective_rest: &'p [i64],
    values: Vec<bool>,
    sums: Vec<i64>,
    best: Option<Solution>,
    visited: usize,
}

impl Search<'_> {
    fn is_viable(&self, k: usize) -> bool {
        self.program.constraints.iter().enumerate().all(|(c, constraint)| {
            self.sums[c] + self.max_rest[c][k] >= constraint.lower
                && self.sums[c] + self.min_rest[c][k] <= constraint.upper
        })
    }

    fn branch(&mut self, k: usize, objective: i64) {
        self.visited += 1;
        if !self.is_viable(k) {
            return;
        }
        if let Some(best) = &self.best {
            if objective + self.objective_rest[k] <= best.objective {
                return;
            }
        }
        if k == self.values.len() {
            self.best = Some(Solution {
                values: self.values.clone(),
                objective,
            });
            return;
        }

        self.values[k] = true;
        for c in 0..self.rows.len() {
            self.sums[c] += self.rows[c][k];
        }
        self.branch(k + 1, objective + self.program.objective[k]);
        for c in 0..self.rows.len() {
            self.sums[c] -= self.rows[c][k];
        }

        self.values[k] = false;
        self.branch(k + 1, objective);
    }
}
