//! The decision-graph manager.
//!
//! All predicates are built through a single [`Bdd`] value that owns the
//! unique table (hash consing) and the computed table (operation cache).
//! Because every node is created via [`Bdd::mk_node`], two [`Ref`]s obtained
//! from the same manager are equal iff they denote the same Boolean function.
//!
//! # Node lifetime
//!
//! A [`Ref`] is a plain index into the manager's arena. It stays valid until the
//! next [`Bdd::collect_garbage`], which frees every node not reachable from a
//! *retained* root. Long-lived predicates are retained through
//! [`Bdd::retain`]/[`Bdd::release`] or, preferably, the [`Root`] guard returned
//! by [`Bdd::protect`]. Intermediate results of a computation need no
//! bookkeeping as long as no collection runs in the middle of it.
//!
//! Releasing a predicate that is not retained panics instead of silently
//! corrupting the table.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::node::Node;
use crate::reference::Ref;
use crate::root::Root;
use crate::table::Table;
use crate::utils::{pairing3, MyHash};

/// Sizing of a [`Bdd`] manager.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BddConfig {
    /// The unique table holds at most `2^storage_bits` nodes.
    pub storage_bits: usize,
    /// The computed table has `2^cache_bits` slots.
    pub cache_bits: usize,
}

impl Default for BddConfig {
    fn default() -> Self {
        Self {
            storage_bits: 20,
            cache_bits: 16,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum OpKey {
    Ite(Ref, Ref, Ref),
}

impl MyHash for OpKey {
    fn hash(&self) -> u64 {
        match self {
            OpKey::Ite(f, g, h) => pairing3(
                f.unsigned() as u64,
                g.unsigned() as u64,
                h.unsigned() as u64,
            ),
        }
    }
}

pub struct Bdd {
    storage: RefCell<Table<Node>>,
    cache: RefCell<Cache<OpKey, Ref>>,
    size_cache: RefCell<Cache<Ref, u64>>,
    /// Reference counts of retained roots, keyed by node index.
    roots: RefCell<HashMap<u32, usize>>,
    zero: Ref,
    one: Ref,
}

impl Bdd {
    pub fn new(storage_bits: usize) -> Self {
        Self::with_config(BddConfig {
            storage_bits,
            cache_bits: storage_bits.min(16),
        })
    }

    pub fn with_config(config: BddConfig) -> Self {
        let mut storage = Table::new(config.storage_bits);

        // The terminal node must be (1).
        let one = storage.put(Node::default());
        assert_eq!(one, 1);
        let one = Ref::positive(one as u32);

        Self {
            storage: RefCell::new(storage),
            cache: RefCell::new(Cache::new(config.cache_bits)),
            size_cache: RefCell::new(Cache::new(config.cache_bits)),
            roots: RefCell::new(HashMap::new()),
            zero: -one,
            one,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::with_config(BddConfig::default())
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.borrow();
        f.debug_struct("Bdd")
            .field("capacity", &storage.capacity())
            .field("size", &storage.size())
            .field("real_size", &storage.real_size())
            .field("roots", &self.roots.borrow().len())
            .finish()
    }
}

impl Bdd {
    pub fn zero(&self) -> Ref {
        self.zero
    }
    pub fn one(&self) -> Ref {
        self.one
    }

    pub fn variable(&self, index: u32) -> u32 {
        self.storage.borrow().value(index as usize).variable
    }
    pub fn low(&self, index: u32) -> Ref {
        self.storage.borrow().value(index as usize).low
    }
    pub fn high(&self, index: u32) -> Ref {
        self.storage.borrow().value(index as usize).high
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.low(node.index());
        if node.is_negated() {
            -low
        } else {
            low
        }
    }
    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.high(node.index());
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        node.index() == self.one.index()
    }

    /// Variable at the root of `node`, or `u32::MAX` for terminals, so that
    /// terminals sort below every variable.
    pub(crate) fn top_var(&self, node: Ref) -> u32 {
        if self.is_terminal(node) {
            u32::MAX
        } else {
            self.variable(node.index())
        }
    }

    /// Number of live nodes in the unique table, including the terminal.
    pub fn num_nodes(&self) -> usize {
        self.storage.borrow().real_size()
    }

    pub fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.borrow();
        (cache.hits(), cache.misses())
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");

        if high.is_negated() {
            return -self.mk_node(v, -low, -high);
        }

        if low == high {
            return low;
        }

        let i = self.storage.borrow_mut().put(Node {
            variable: v,
            low,
            high,
        });
        Ref::positive(i as u32)
    }

    pub fn mk_var(&self, v: u32) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");
        self.mk_node(v, self.zero, self.one)
    }

    /// Conjunction of DIMACS-style literals (`-v` is the negation of `v`).
    pub fn cube(&self, literals: impl IntoIterator<Item = i32>) -> Ref {
        let mut literals = literals.into_iter().collect::<Vec<_>>();
        literals.sort_by_key(|&lit| std::cmp::Reverse(lit.unsigned_abs()));
        debug!("cube(literals = {:?})", literals);
        let mut current = self.one;
        for lit in literals {
            assert_ne!(lit, 0, "Variable index should not be zero");
            let v = lit.unsigned_abs();
            if v == self.top_var(current) {
                // Repeated variable: consistent repeats are no-ops.
                let (low, high) = self.top_cofactors(current, v);
                current = if lit < 0 {
                    self.mk_node(v, low, self.zero)
                } else {
                    self.mk_node(v, self.zero, high)
                };
                continue;
            }
            current = if lit < 0 {
                self.mk_node(v, current, self.zero)
            } else {
                self.mk_node(v, self.zero, current)
            };
        }
        current
    }

    pub fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        assert_ne!(v, 0, "Variable index should not be zero");

        if self.is_terminal(node) || v < self.variable(node.index()) {
            return (node, node);
        }
        assert_eq!(v, self.variable(node.index()));
        (self.low_node(node), self.high_node(node))
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(x, y, z) = (x ∧ y) ∨ (¬x ∧ z)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use petri_bdd::bdd::Bdd;
    ///
    /// let bdd = Bdd::default();
    /// let x = bdd.mk_var(1);
    /// let y = bdd.mk_var(2);
    /// let z = bdd.mk_var(3);
    /// let f = bdd.apply_ite(x, y, z);
    /// let x_and_y = bdd.apply_and(x, y);
    /// let not_x_and_z = bdd.apply_and(-x, z);
    /// assert_eq!(f, bdd.apply_or(x_and_y, not_x_and_z));
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        debug!("apply_ite(f = {}, g = {}, h = {})", f, g, h);

        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,G,~F) => ite(F,G,1)
        let g = if g == f {
            self.one
        } else if g == -f {
            self.zero
        } else {
            g
        };
        let h = if h == f {
            self.zero
        } else if h == -f {
            self.one
        } else {
            h
        };

        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }

        // ite(~F,G,H) => ite(F,H,G)
        let (f, g, h) = if f.is_negated() { (-f, h, g) } else { (f, g, h) };
        // ite(F,~G,H) => ~ite(F,G,~H)
        let (g, h, n) = if g.is_negated() {
            (-g, -h, true)
        } else {
            (g, h, false)
        };

        let key = OpKey::Ite(f, g, h);
        if let Some(&res) = self.cache.borrow().get(&key) {
            debug!("cache: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return if n { -res } else { res };
        }

        let m = self
            .top_var(f)
            .min(self.top_var(g))
            .min(self.top_var(h));
        debug!("min variable = {}", m);

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0);
        let t = self.apply_ite(f1, g1, h1);

        let res = self.mk_node(m, e, t);
        debug!("computed: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
        self.cache.borrow_mut().insert(key, res);

        if n {
            -res
        } else {
            res
        }
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, self.zero)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, self.one, v)
    }

    pub fn apply_xor(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, -v, v)
    }

    pub fn apply_eq(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, -v)
    }

    /// Set difference: `u ∧ ¬v`.
    pub fn apply_diff(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(v, self.zero, u)
    }

    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.one;
        for node in nodes {
            res = self.apply_and(res, node);
            if self.is_zero(res) {
                break;
            }
        }
        res
    }

    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.zero;
        for node in nodes {
            res = self.apply_or(res, node);
        }
        res
    }

    /// Existential elimination: `∃ vars. f`.
    pub fn exists(&self, f: Ref, vars: &[u32]) -> Ref {
        let mut vars = vars.to_vec();
        vars.sort_unstable();
        vars.dedup();
        debug!("exists(f = {}, vars = {:?})", f, vars);
        let mut cache = HashMap::new();
        self.exists_(f, &vars, &mut cache)
    }

    fn exists_(&self, f: Ref, vars: &[u32], cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) {
            return f;
        }

        let v = self.variable(f.index());
        // Quantified variables above `v` do not occur in `f`.
        let vars = &vars[vars.partition_point(|&x| x < v)..];
        if vars.is_empty() {
            return f;
        }

        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let low = self.exists_(self.low_node(f), vars, cache);
        let high = self.exists_(self.high_node(f), vars, cache);
        let res = if vars[0] == v {
            self.apply_or(low, high)
        } else {
            self.mk_node(v, low, high)
        };
        cache.insert(f, res);
        res
    }

    /// Simultaneous variable substitution `f[v := map(v)]`.
    ///
    /// Variables absent from `map` are kept. When the mapping preserves the
    /// relative order of the support, nodes are rebuilt directly; otherwise
    /// the result is assembled with ITE.
    pub fn rename(&self, f: Ref, map: &HashMap<u32, u32>) -> Ref {
        debug!("rename(f = {}, map = {:?})", f, map);
        let mut cache = HashMap::new();
        self.rename_(f, map, &mut cache)
    }

    fn rename_(&self, f: Ref, map: &HashMap<u32, u32>, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) {
            return f;
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let v = self.variable(f.index());
        let low = self.rename_(self.low_node(f), map, cache);
        let high = self.rename_(self.high_node(f), map, cache);
        let w = map.get(&v).copied().unwrap_or(v);

        let res = if w < self.top_var(low) && w < self.top_var(high) {
            self.mk_node(w, low, high)
        } else {
            self.apply_ite(self.mk_var(w), high, low)
        };
        cache.insert(f, res);
        res
    }

    /// Set of variables `f` depends on.
    pub fn support(&self, f: Ref) -> BTreeSet<u32> {
        self.descendants([f])
            .into_iter()
            .filter(|&i| i != self.one.index())
            .map(|i| self.variable(i))
            .collect()
    }

    /// Indices of all nodes reachable from `nodes`, terminal included.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<u32> {
        let mut visited = HashSet::new();
        visited.insert(self.one.index());
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            let i = node.index();
            if visited.insert(i) {
                queue.push_back(self.low(i));
                queue.push_back(self.high(i));
            }
        }

        visited
    }

    /// Number of distinct nodes of `f`, terminal included.
    pub fn size(&self, f: Ref) -> u64 {
        if let Some(&size) = self.size_cache.borrow().get(&f) {
            return size;
        }
        let size = self.descendants([f]).len() as u64;
        self.size_cache.borrow_mut().insert(f, size);
        size
    }

    /// Register one more owner of `f`. Retained nodes (and everything below
    /// them) survive [`Bdd::collect_garbage`].
    pub fn retain(&self, f: Ref) {
        *self.roots.borrow_mut().entry(f.index()).or_insert(0) += 1;
    }

    /// Drop one ownership of `f`.
    ///
    /// # Panics
    ///
    /// Panics if `f` is not currently retained.
    pub fn release(&self, f: Ref) {
        let mut roots = self.roots.borrow_mut();
        match roots.get_mut(&f.index()) {
            Some(count) => {
                *count -= 1;
                if *count == 0 {
                    roots.remove(&f.index());
                }
            }
            None => panic!("Unbalanced release of {}", f),
        }
    }

    /// Retain `f` for the lifetime of the returned guard.
    pub fn protect(&self, f: Ref) -> Root<'_> {
        Root::new(self, f)
    }

    pub fn ref_count(&self, f: Ref) -> usize {
        self.roots.borrow().get(&f.index()).copied().unwrap_or(0)
    }

    /// Number of distinct retained roots.
    pub fn num_roots(&self) -> usize {
        self.roots.borrow().len()
    }

    /// Free every node not reachable from a retained root.
    ///
    /// Unretained [`Ref`]s obtained before the call become dangling.
    /// Returns the number of freed nodes.
    pub fn collect_garbage(&self) -> usize {
        self.cache.borrow_mut().clear();
        self.size_cache.borrow_mut().clear();

        let roots: Vec<Ref> = self
            .roots
            .borrow()
            .keys()
            .map(|&i| Ref::positive(i))
            .collect();
        let alive = self.descendants(roots);

        let freed = self
            .storage
            .borrow_mut()
            .retain(|i| alive.contains(&(i as u32)));
        debug!("collect_garbage: freed {} nodes, {} alive", freed, alive.len());
        freed
    }

    pub fn to_bracket_string(&self, node: Ref) -> String {
        if self.is_zero(node) {
            return "(0)".to_string();
        } else if self.is_one(node) {
            return "(1)".to_string();
        }

        format!(
            "{}:(x{}, {}, {})",
            node,
            self.variable(node.index()),
            self.to_bracket_string(self.high_node(node)),
            self.to_bracket_string(self.low_node(node))
        )
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_var() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);

        assert_eq!(bdd.variable(x.index()), 1);
        assert_eq!(bdd.high_node(x), bdd.one());
        assert_eq!(bdd.low_node(x), bdd.zero());
        assert_eq!(bdd.high_node(-x), bdd.zero());
        assert_eq!(bdd.low_node(-x), bdd.one());
    }

    #[test]
    fn test_terminal() {
        let bdd = Bdd::default();

        assert!(bdd.is_terminal(bdd.zero()));
        assert!(bdd.is_zero(bdd.zero()));
        assert!(!bdd.is_one(bdd.zero()));
        assert!(bdd.is_terminal(bdd.one()));
        assert!(bdd.is_one(bdd.one()));
        assert_eq!(bdd.zero(), -bdd.one());
    }

    #[test]
    fn test_cube() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_and(bdd.apply_and(x1, x2), x3);
        assert_eq!(f, bdd.cube([1, 2, 3]));

        let f = bdd.apply_and(bdd.apply_and(x1, -x2), -x3);
        assert_eq!(f, bdd.cube([-3, 1, -2]));

        assert_eq!(bdd.cube([]), bdd.one());
        assert_eq!(bdd.cube([2, 2]), x2);
        assert_eq!(bdd.cube([2, -2]), bdd.zero());
    }

    #[test]
    fn test_de_morgan() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);

        assert_eq!(-bdd.apply_and(x, y), bdd.apply_or(-x, -y));
        assert_eq!(-bdd.apply_or(x, y), bdd.apply_and(-x, -y));
    }

    #[test]
    fn test_xor() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        let f = bdd.apply_and(x, y);

        assert_eq!(bdd.apply_xor(f, f), bdd.zero());
        assert_eq!(bdd.apply_xor(f, -f), bdd.one());
        assert_eq!(bdd.apply_eq(x, y), -bdd.apply_xor(x, y));
    }

    #[test]
    fn test_diff() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        let f = bdd.apply_or(x, y);

        assert_eq!(bdd.apply_diff(f, x), bdd.apply_and(-x, y));
        assert_eq!(bdd.apply_diff(f, f), bdd.zero());
        assert_eq!(bdd.apply_diff(f, bdd.zero()), f);
    }

    #[test]
    fn test_apply_ite() {
        let bdd = Bdd::default();

        let g = bdd.mk_var(2);
        let h = bdd.mk_var(3);
        assert_eq!(bdd.apply_ite(bdd.one(), g, h), g);
        assert_eq!(bdd.apply_ite(bdd.zero(), g, h), h);

        let f = bdd.mk_node(1, bdd.one(), h);
        assert_eq!(bdd.apply_ite(f, f, h), bdd.apply_or(f, h));
        assert_eq!(bdd.apply_ite(f, g, f), bdd.apply_and(f, g));
        assert_eq!(bdd.apply_ite(f, -g, bdd.one()), -bdd.apply_and(f, g));
        assert_eq!(bdd.apply_ite(f, bdd.zero(), -h), -bdd.apply_or(f, h));

        let f = bdd.mk_var(5);
        assert_eq!(bdd.apply_ite(f, g, g), g);
        assert_eq!(bdd.apply_ite(f, bdd.one(), bdd.zero()), f);
        assert_eq!(bdd.apply_ite(f, bdd.zero(), bdd.one()), -f);

        let f = bdd.mk_var(6);
        let g = bdd.mk_var(7);
        let h = bdd.mk_var(8);
        let expected = bdd.mk_node(6, -g, -h);
        assert_eq!(bdd.apply_ite(-f, -g, -h), expected);
    }

    #[test]
    fn test_canonicity_of_equivalent_formulas() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        // x1 ∧ (x2 ∨ x3) == (x1 ∧ x2) ∨ (x1 ∧ x3)
        let f = bdd.apply_and(x1, bdd.apply_or(x2, x3));
        let g = bdd.apply_or(bdd.apply_and(x1, x2), bdd.apply_and(x1, x3));
        assert_eq!(f, g);
    }

    #[test]
    fn test_exists() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_and(x1, bdd.apply_xor(x2, x3));
        assert_eq!(bdd.exists(f, &[2]), x1);
        assert_eq!(bdd.exists(f, &[1]), bdd.apply_xor(x2, x3));
        assert_eq!(bdd.exists(f, &[1, 2, 3]), bdd.one());
        assert_eq!(bdd.exists(bdd.zero(), &[1]), bdd.zero());
        assert_eq!(bdd.exists(f, &[4]), f);

        let g = bdd.cube([-1, 2]);
        assert_eq!(bdd.exists(g, &[1]), x2);
        assert_eq!(bdd.exists(-g, &[1]), bdd.one());
    }

    #[test]
    fn test_rename_order_preserving() {
        let bdd = Bdd::default();

        // x2 ∧ ¬x4  ->  x1 ∧ ¬x3
        let f = bdd.cube([2, -4]);
        let map = HashMap::from([(2, 1), (4, 3)]);
        assert_eq!(bdd.rename(f, &map), bdd.cube([1, -3]));
    }

    #[test]
    fn test_rename_swap() {
        let bdd = Bdd::default();

        // x1 ∧ ¬x2  ->  x2 ∧ ¬x1
        let f = bdd.cube([1, -2]);
        let map = HashMap::from([(1, 2), (2, 1)]);
        assert_eq!(bdd.rename(f, &map), bdd.cube([2, -1]));

        let g = bdd.apply_or(bdd.mk_var(1), bdd.cube([-2, 3]));
        let expected = bdd.apply_or(bdd.mk_var(2), bdd.cube([-1, 3]));
        assert_eq!(bdd.rename(g, &map), expected);
    }

    #[test]
    fn test_support() {
        let bdd = Bdd::default();

        let f = bdd.apply_or(bdd.mk_var(3), bdd.cube([1, -5]));
        assert_eq!(bdd.support(f), BTreeSet::from([1, 3, 5]));
        assert!(bdd.support(bdd.one()).is_empty());
    }

    #[test]
    fn test_size() {
        let bdd = Bdd::default();

        assert_eq!(bdd.size(bdd.one()), 1);
        assert_eq!(bdd.size(bdd.mk_var(1)), 2);
        assert_eq!(bdd.size(bdd.cube([1, 2, 3])), 4);
    }

    #[test]
    fn test_collect_garbage_keeps_retained() {
        let bdd = Bdd::default();

        let kept = bdd.cube([1, 2, 3]);
        bdd.retain(kept);
        let before = bdd.num_nodes();
        let _temp = bdd.apply_xor(bdd.mk_var(4), bdd.mk_var(5));
        assert!(bdd.num_nodes() > before);

        let freed = bdd.collect_garbage();
        assert!(freed > 0);
        assert_eq!(bdd.num_nodes(), before);

        // The retained predicate is still intact and canonical.
        assert_eq!(bdd.cube([1, 2, 3]), kept);
        bdd.release(kept);

        bdd.collect_garbage();
        assert_eq!(bdd.num_nodes(), 1);
    }

    #[test]
    fn test_ref_counts_nest() {
        let bdd = Bdd::default();

        let f = bdd.mk_var(1);
        bdd.retain(f);
        bdd.retain(-f);
        assert_eq!(bdd.ref_count(f), 2);
        bdd.release(f);
        assert_eq!(bdd.num_roots(), 1);
        bdd.release(f);
        assert_eq!(bdd.num_roots(), 0);
    }

    #[test]
    #[should_panic(expected = "Unbalanced release")]
    fn test_unbalanced_release_panics() {
        let bdd = Bdd::default();
        let f = bdd.mk_var(1);
        bdd.release(f);
    }

    #[test]
    #[should_panic(expected = "Storage is full")]
    fn test_storage_exhaustion_is_fatal() {
        let bdd = Bdd::new(3);
        bdd.cube([1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
