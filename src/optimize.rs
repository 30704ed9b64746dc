//! Maximizing a linear objective over the reachable markings.
//!
//! Two strategies are available:
//! - **Heuristic**: one witness of the symbolic reachable set plus those of
//!   its single-place flips that are also reachable. This is a bounded local
//!   search and may well miss the global optimum.
//! - **Exact**: scan the explicitly enumerated reachable set. Used when no
//!   symbolic set is given or the heuristic yields nothing.

use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::encoder::SymbolicEncoder;
use crate::explicit::{ExplicitReachability, ExplicitResult};
use crate::marking::{Marking, Objective};
use crate::net::NetModel;
use crate::reference::Ref;

pub const DEFAULT_NEIGHBOR_LIMIT: usize = 128;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OptimizerMode {
    Heuristic,
    Exact,
}

impl Display for OptimizerMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizerMode::Heuristic => write!(f, "heuristic"),
            OptimizerMode::Exact => write!(f, "exact"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Best marking found and its objective value. `None` only if there was
    /// no candidate at all.
    pub best: Option<(Marking, i64)>,
    pub mode: OptimizerMode,
    /// Number of markings evaluated.
    pub candidates: usize,
    pub elapsed: Duration,
}

pub struct MarkingOptimizer<'n> {
    net: &'n NetModel,
    objective: Objective,
    neighbor_limit: usize,
    max_explicit_markings: Option<usize>,
    explicit: Option<&'n ExplicitResult>,
}

impl<'n> MarkingOptimizer<'n> {
    pub fn new(net: &'n NetModel, objective: Objective) -> Self {
        Self {
            net,
            objective,
            neighbor_limit: DEFAULT_NEIGHBOR_LIMIT,
            max_explicit_markings: None,
            explicit: None,
        }
    }

    /// Cap on heuristic candidates, the witness itself included.
    pub fn with_neighbor_limit(mut self, limit: usize) -> Self {
        self.neighbor_limit = limit;
        self
    }

    /// Marking limit of the explicit search backing exact mode.
    pub fn with_explicit_limit(mut self, limit: Option<usize>) -> Self {
        self.max_explicit_markings = limit;
        self
    }

    /// Explicit reachable set to use for exact mode instead of searching again.
    pub fn with_explicit_result(mut self, explicit: &'n ExplicitResult) -> Self {
        self.explicit = Some(explicit);
        self
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Witness of `reachable` followed by its reachable single-place flips,
    /// at most `neighbor_limit` markings in total.
    pub fn heuristic_candidates(&self, encoder: &SymbolicEncoder<'_>, reachable: Ref) -> Vec<Marking> {
        let Some(base) = encoder.pick_marking(reachable) else {
            return Vec::new();
        };
        if self.neighbor_limit == 0 {
            return Vec::new();
        }

        let mut candidates = vec![base.clone()];
        for p in 0..base.len() {
            if candidates.len() >= self.neighbor_limit {
                break;
            }
            let neighbor = base.flipped(p);
            if encoder.contains(reachable, &neighbor) {
                candidates.push(neighbor);
            }
        }
        debug!("{} heuristic candidates around {}", candidates.len(), base);
        candidates
    }

    /// Optimize over the symbolic set if one is given, else exactly.
    pub fn optimize(&self, symbolic: Option<(&SymbolicEncoder<'_>, Ref)>) -> OptimizationResult {
        let start = Instant::now();
        if let Some((encoder, reachable)) = symbolic {
            let candidates = self.heuristic_candidates(encoder, reachable);
            if let Some(best) = self.best_of(&candidates) {
                let elapsed = start.elapsed();
                info!(
                    "optimizer (heuristic): {} with value {} among {} candidates in {:?}",
                    best.0,
                    best.1,
                    candidates.len(),
                    elapsed
                );
                return OptimizationResult {
                    best: Some(best),
                    mode: OptimizerMode::Heuristic,
                    candidates: candidates.len(),
                    elapsed,
                };
            }
            warn!("heuristic optimizer found no candidate, falling back to explicit search");
        }
        let mut result = self.optimize_exact();
        result.elapsed = start.elapsed();
        result
    }

    /// Exact maximum over the explicit reachable set. Ties go to the
    /// lexicographically smallest marking.
    ///
    /// Reuses the result given to [`with_explicit_result`][Self::with_explicit_result]
    /// when it is complete, otherwise runs a fresh explicit search.
    pub fn optimize_exact(&self) -> OptimizationResult {
        if let Some(explicit) = self.explicit.filter(|e| !e.truncated) {
            return self.optimize_over(explicit);
        }
        let start = Instant::now();
        let explicit = ExplicitReachability::new(self.net)
            .with_limit(self.max_explicit_markings)
            .explore();
        let mut result = self.optimize_over(&explicit);
        result.elapsed = start.elapsed();
        result
    }

    /// Exact maximum over an already enumerated reachable set.
    pub fn optimize_over(&self, explicit: &ExplicitResult) -> OptimizationResult {
        let start = Instant::now();
        if explicit.truncated {
            warn!("explicit search was truncated, the optimum may be missed");
        }

        let best = self.best_of(&explicit.markings);
        let elapsed = start.elapsed();
        match &best {
            Some((m, v)) => info!(
                "optimizer (exact): {} with value {} among {} markings in {:?}",
                m,
                v,
                explicit.len(),
                elapsed
            ),
            None => info!("optimizer (exact): no marking"),
        }
        OptimizationResult {
            best,
            mode: OptimizerMode::Exact,
            candidates: explicit.len(),
            elapsed,
        }
    }

    /// First marking with the highest objective value.
    fn best_of<'m>(&self, markings: impl IntoIterator<Item = &'m Marking>) -> Option<(Marking, i64)> {
        let mut best: Option<(&Marking, i64)> = None;
        for m in markings {
            let value = self.objective.value(m);
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((m, value));
            }
        }
        best.map(|(m, v)| (m.clone(), v))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::bdd::Bdd;
    use crate::builder::NetBuilder;
    use crate::fixpoint::SymbolicReachability;

    fn toggle() -> NetModel {
        NetBuilder::new()
            .place("p0", 1)
            .place("p1", 0)
            .transition("t0")
            .arc("p0", "t0")
            .arc("t0", "p1")
            .build()
            .unwrap()
    }

    /// `fork` splits one token into two; `join` merges them back.
    fn fork_join() -> NetModel {
        NetBuilder::new()
            .place("start", 1)
            .place("left", 0)
            .place("right", 0)
            .transition("fork")
            .transition("join")
            .arc("start", "fork")
            .arc("fork", "left")
            .arc("fork", "right")
            .arc("left", "join")
            .arc("right", "join")
            .arc("join", "start")
            .build()
            .unwrap()
    }

    #[test]
    fn test_heuristic_toggle() {
        let bdd = Bdd::default();
        let net = toggle();
        let enc = SymbolicEncoder::new(&bdd, &net).unwrap();
        let reach = SymbolicReachability::new(&enc).compute();

        let optimizer = MarkingOptimizer::new(&net, Objective::new(vec![1, 1]));
        let result = optimizer.optimize(Some((&enc, *reach.reachable)));
        assert_eq!(result.mode, OptimizerMode::Heuristic);
        assert_eq!(result.best, Some((Marking::from([1, 0]), 1)));
        assert_eq!(result.candidates, 1);
    }

    #[test]
    fn test_exact_toggle() {
        let net = toggle();
        let result = MarkingOptimizer::new(&net, Objective::new(vec![1, 1])).optimize(None);
        assert_eq!(result.mode, OptimizerMode::Exact);
        assert_eq!(result.best, Some((Marking::from([0, 1]), 1)));
        assert_eq!(result.candidates, 2);

        let result = MarkingOptimizer::new(&net, Objective::new(vec![5, -1])).optimize_exact();
        assert_eq!(result.best, Some((Marking::from([1, 0]), 5)));
    }

    #[test]
    fn test_exact_reuses_explicit_result() {
        let net = toggle();
        let explicit = ExplicitReachability::new(&net).explore();
        let optimizer = MarkingOptimizer::new(&net, Objective::new(vec![1, 3])).with_explicit_result(&explicit);

        let over = optimizer.optimize_over(&explicit);
        assert_eq!(over.best, Some((Marking::from([0, 1]), 3)));
        assert_eq!(over.candidates, 2);

        let exact = optimizer.optimize(None);
        assert_eq!(exact.mode, OptimizerMode::Exact);
        assert_eq!(exact.best, over.best);
    }

    #[test]
    fn test_truncated_explicit_result_is_not_reused() {
        let net = toggle();
        let partial = ExplicitReachability::new(&net).with_limit(Some(1)).explore();
        assert!(partial.truncated);

        let optimizer = MarkingOptimizer::new(&net, Objective::new(vec![0, 1])).with_explicit_result(&partial);
        // A fresh search still finds [0 1].
        assert_eq!(optimizer.optimize_exact().best, Some((Marking::from([0, 1]), 1)));
        // Scanning the partial set directly only sees the initial marking.
        assert_eq!(optimizer.optimize_over(&partial).best, Some((Marking::from([1, 0]), 0)));
    }

    #[test]
    fn test_candidates_include_reachable_flips() {
        let bdd = Bdd::default();
        let net = fork_join();
        let enc = SymbolicEncoder::new(&bdd, &net).unwrap();
        let reach = SymbolicReachability::new(&enc).compute();

        // Reachable: [1 0 0], [0 1 1]. The witness prefers tokens early: [1 0 0].
        let optimizer = MarkingOptimizer::new(&net, Objective::token_count(3));
        let candidates = optimizer.heuristic_candidates(&enc, *reach.reachable);
        assert_eq!(candidates, vec![Marking::from([1, 0, 0])]);

        // The heuristic misses the optimum [0 1 1] that exact mode finds.
        let heuristic = optimizer.optimize(Some((&enc, *reach.reachable)));
        assert_eq!(heuristic.best, Some((Marking::from([1, 0, 0]), 1)));
        let exact = optimizer.optimize_exact();
        assert_eq!(exact.best, Some((Marking::from([0, 1, 1]), 2)));
    }

    #[test]
    fn test_neighbor_limit_counts_witness() {
        let bdd = Bdd::default();
        // Three independent toggles: every 0/1 marking is reachable.
        let net = NetBuilder::new()
            .place("a", 1)
            .place("b", 1)
            .place("c", 1)
            .transition("ta")
            .transition("tb")
            .transition("tc")
            .arc("a", "ta")
            .arc("b", "tb")
            .arc("c", "tc")
            .build()
            .unwrap();
        let enc = SymbolicEncoder::new(&bdd, &net).unwrap();
        let reach = SymbolicReachability::new(&enc).compute();

        let optimizer = MarkingOptimizer::new(&net, Objective::token_count(3));
        let all = optimizer.heuristic_candidates(&enc, *reach.reachable);
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], Marking::from([1, 1, 1]));

        let capped = optimizer
            .with_neighbor_limit(2)
            .heuristic_candidates(&enc, *reach.reachable);
        assert_eq!(capped, vec![Marking::from([1, 1, 1]), Marking::from([0, 1, 1])]);
    }

    #[test]
    fn test_empty_symbolic_set_falls_back() {
        let bdd = Bdd::default();
        let net = toggle();
        let enc = SymbolicEncoder::new(&bdd, &net).unwrap();

        let result = MarkingOptimizer::new(&net, Objective::token_count(2)).optimize(Some((&enc, bdd.zero())));
        assert_eq!(result.mode, OptimizerMode::Exact);
        assert!(result.best.is_some());
    }
}
