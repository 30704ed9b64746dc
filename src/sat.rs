use std::collections::HashMap;

use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::reference::Ref;

impl Bdd {
    /// Deterministic satisfying assignment of `f` over `vars`.
    ///
    /// Walks `vars` in ascending order and sets each one to `true` whenever the
    /// remaining function stays satisfiable, otherwise to `false`. Variables
    /// that `f` does not constrain on the chosen path therefore come out `true`.
    /// Variables of `f` outside `vars` are projected away.
    ///
    /// Returns `None` iff `f` is the constant false function.
    pub fn pick_assignment(&self, f: Ref, vars: &[u32]) -> Option<Vec<bool>> {
        assert!(
            vars.windows(2).all(|w| w[0] < w[1]),
            "Variables must be strictly ascending"
        );

        if self.is_zero(f) {
            return None;
        }

        let mut assignment = Vec::with_capacity(vars.len());
        let mut current = f;
        for &v in vars {
            while self.top_var(current) < v {
                current = self.prefer_high(current);
            }
            if self.top_var(current) == v {
                let high = self.high_node(current);
                if self.is_zero(high) {
                    assignment.push(false);
                    current = self.low_node(current);
                } else {
                    assignment.push(true);
                    current = high;
                }
            } else {
                assignment.push(true);
            }
        }

        Some(assignment)
    }

    fn prefer_high(&self, node: Ref) -> Ref {
        let high = self.high_node(node);
        if self.is_zero(high) {
            self.low_node(node)
        } else {
            high
        }
    }

    /// Number of satisfying assignments of `f` over `num_vars` variables.
    ///
    /// `num_vars` must be at least the size of the support of `f`.
    pub fn sat_count(&self, f: Ref, num_vars: usize) -> BigUint {
        let mut cache = HashMap::new();
        let max = BigUint::from(2u32).pow(num_vars as u32);
        self.sat_count_(f, &max, &mut cache)
    }

    fn sat_count_(&self, node: Ref, max: &BigUint, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        } else if self.is_one(node) {
            return max.clone();
        }

        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let count_low = self.sat_count_(self.low(node.index()), max, cache);
        let count_high = self.sat_count_(self.high(node.index()), max, cache);

        let count: BigUint = (count_low + count_high) >> 1;
        let count = if node.is_negated() { max - count } else { count };

        cache.insert(node, count.clone());
        count
    }

    /// All satisfying assignments of `f` over `vars`, in lexicographic order
    /// (`false < true`).
    ///
    /// The support of `f` must be contained in `vars`. The result can be
    /// exponential in `vars.len()`.
    pub fn all_assignments(&self, f: Ref, vars: &[u32]) -> Vec<Vec<bool>> {
        assert!(
            vars.windows(2).all(|w| w[0] < w[1]),
            "Variables must be strictly ascending"
        );
        let mut out = Vec::new();
        let mut prefix = Vec::with_capacity(vars.len());
        self.all_assignments_(f, vars, &mut prefix, &mut out);
        out
    }

    fn all_assignments_(&self, f: Ref, vars: &[u32], prefix: &mut Vec<bool>, out: &mut Vec<Vec<bool>>) {
        if self.is_zero(f) {
            return;
        }
        let Some((&v, rest)) = vars.split_first() else {
            assert!(self.is_one(f), "Function depends on variables outside the given list");
            out.push(prefix.clone());
            return;
        };
        assert!(
            self.top_var(f) >= v,
            "Function depends on variables outside the given list"
        );

        let (f0, f1) = self.top_cofactors(f, v);
        for (value, branch) in [(false, f0), (true, f1)] {
            prefix.push(value);
            self.all_assignments_(branch, rest, prefix, out);
            prefix.pop();
        }
    }
}
