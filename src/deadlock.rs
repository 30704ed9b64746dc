//! Reachable deadlocks: markings at which no transition is enabled.
//!
//! The symbolic check intersects the reachable set with the set of dead
//! markings and extracts one witness. An optional [`DeadlockConfirmer`] then
//! double-checks that witness against the net itself.

use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::encoder::SymbolicEncoder;
use crate::marking::Marking;
use crate::net::NetModel;
use crate::reference::Ref;
use crate::solver::BinaryProgram;

/// Independent check of a deadlock witness.
pub trait DeadlockConfirmer {
    /// Returns `true` if no transition of `net` is enabled at `marking`.
    fn confirm(&self, net: &NetModel, marking: &Marking) -> bool;
}

/// Confirms a witness by maximizing the number of enabled transitions as a
/// 0/1 program: one variable per transition, fixed to 0 whenever one of its
/// input places lacks tokens. The witness is dead iff the optimum is 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct IlpConfirmer;

impl IlpConfirmer {
    pub fn program(net: &NetModel, marking: &Marking) -> BinaryProgram {
        let mut program = BinaryProgram::new(net.num_transitions());
        for t in 0..net.num_transitions() {
            program.set_objective(t, 1);
            if net.inputs_of(t).any(|p| net.input(p, t) > marking[p]) {
                program.fix(t, false);
            }
        }
        program
    }
}

impl DeadlockConfirmer for IlpConfirmer {
    fn confirm(&self, net: &NetModel, marking: &Marking) -> bool {
        match Self::program(net, marking).solve() {
            Some(solution) => {
                debug!("at most {} transitions enabled at {}", solution.objective, marking);
                solution.objective == 0
            }
            // Infeasible cannot happen without a lower bound, treat it as dead.
            None => true,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Confirmation {
    /// No confirmer was configured; the symbolic witness was accepted as is.
    Unchecked,
    Confirmed,
    /// The confirmer found an enabled transition at the symbolic witness.
    Refuted,
}

impl Display for Confirmation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Confirmation::Unchecked => write!(f, "unchecked"),
            Confirmation::Confirmed => write!(f, "confirmed"),
            Confirmation::Refuted => write!(f, "refuted"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeadlockResult {
    pub found: bool,
    /// Reachable dead marking, set iff `found`.
    pub witness: Option<Marking>,
    /// Marking extracted from the symbolic intersection, even when refuted.
    pub candidate: Option<Marking>,
    /// `None` when there was no candidate to check.
    pub confirmation: Option<Confirmation>,
    pub elapsed: Duration,
}

pub struct DeadlockAnalyzer<'e, 'a> {
    encoder: &'e SymbolicEncoder<'a>,
    confirmer: Option<Box<dyn DeadlockConfirmer + 'e>>,
}

impl<'e, 'a> DeadlockAnalyzer<'e, 'a> {
    pub fn new(encoder: &'e SymbolicEncoder<'a>) -> Self {
        Self {
            encoder,
            confirmer: None,
        }
    }

    pub fn with_confirmer(mut self, confirmer: impl DeadlockConfirmer + 'e) -> Self {
        self.confirmer = Some(Box::new(confirmer));
        self
    }

    /// Dead markings over the current-state variables:
    /// `∧_t ¬(∧_{p ∈ •t} x_p)`.
    ///
    /// A transition without input places is enabled everywhere, which makes
    /// the whole conjunction false. That case returns immediately.
    pub fn deadlock_predicate(&self) -> Ref {
        let enc = self.encoder;
        let net = enc.net();
        let bdd = enc.bdd();

        if let Some(t) = (0..net.num_transitions()).find(|&t| net.is_source(t)) {
            debug!(
                "transition {} has no input places, no marking is dead",
                net.transitions()[t].id
            );
            return bdd.zero();
        }

        bdd.apply_and_many(
            (0..net.num_transitions()).map(|t| bdd.apply_not(enc.enabling_predicate(t))),
        )
    }

    /// Look for a dead marking inside `reachable`.
    pub fn analyze(&self, reachable: Ref) -> DeadlockResult {
        let start = Instant::now();
        let enc = self.encoder;
        let bdd = enc.bdd();

        let dead = bdd.protect(self.deadlock_predicate());
        let stuck = bdd.protect(bdd.apply_and(reachable, *dead));

        let Some(candidate) = enc.pick_marking(*stuck) else {
            let elapsed = start.elapsed();
            info!("deadlock check: no reachable deadlock ({:?})", elapsed);
            return DeadlockResult {
                found: false,
                witness: None,
                candidate: None,
                confirmation: None,
                elapsed,
            };
        };
        info!("deadlock check: candidate {}", candidate);

        let confirmation = match &self.confirmer {
            Some(confirmer) if confirmer.confirm(enc.net(), &candidate) => Confirmation::Confirmed,
            Some(_) => {
                warn!("deadlock candidate {} refuted: a transition is enabled", candidate);
                Confirmation::Refuted
            }
            None => {
                warn!("no deadlock confirmer configured, accepting {}", candidate);
                Confirmation::Unchecked
            }
        };
        let found = confirmation != Confirmation::Refuted;

        let elapsed = start.elapsed();
        info!(
            "deadlock check: {} ({}) in {:?}",
            if found { "found" } else { "not found" },
            confirmation,
            elapsed
        );
        DeadlockResult {
            found,
            witness: found.then(|| candidate.clone()),
            candidate: Some(candidate),
            confirmation: Some(confirmation),
            elapsed,
        }
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

    struct Refuse;

    impl DeadlockConfirmer for Refuse {
        fn confirm(&self, _: &NetModel, _: &Marking) -> bool {
            false
        }
    }

    #[test]
    fn test_toggle_deadlocks() {
        let bdd = Bdd::default();
        let net = toggle();
        let enc = SymbolicEncoder::new(&bdd, &net).unwrap();
        let reach = SymbolicReachability::new(&enc).compute();

        let result = DeadlockAnalyzer::new(&enc)
            .with_confirmer(IlpConfirmer)
            .analyze(*reach.reachable);
        assert!(result.found);
        assert_eq!(result.witness, Some(Marking::from([0, 1])));
        assert_eq!(result.confirmation, Some(Confirmation::Confirmed));
    }

    #[test]
    fn test_without_confirmer() {
        let bdd = Bdd::default();
        let net = toggle();
        let enc = SymbolicEncoder::new(&bdd, &net).unwrap();
        let reach = SymbolicReachability::new(&enc).compute();

        let result = DeadlockAnalyzer::new(&enc).analyze(*reach.reachable);
        assert!(result.found);
        assert_eq!(result.confirmation, Some(Confirmation::Unchecked));
    }

    #[test]
    fn test_refuted_candidate() {
        let bdd = Bdd::default();
        let net = toggle();
        let enc = SymbolicEncoder::new(&bdd, &net).unwrap();
        let reach = SymbolicReachability::new(&enc).compute();

        let result = DeadlockAnalyzer::new(&enc)
            .with_confirmer(Refuse)
            .analyze(*reach.reachable);
        assert!(!result.found);
        assert_eq!(result.witness, None);
        assert_eq!(result.candidate, Some(Marking::from([0, 1])));
        assert_eq!(result.confirmation, Some(Confirmation::Refuted));
    }

    #[test]
    fn test_source_transition_means_no_deadlock() {
        let bdd = Bdd::default();
        let net = NetBuilder::new()
            .place("p", 0)
            .place("q", 1)
            .transition("gen")
            .transition("eat")
            .arc("gen", "p")
            .arc("q", "eat")
            .build()
            .unwrap();
        let enc = SymbolicEncoder::new(&bdd, &net).unwrap();
        let analyzer = DeadlockAnalyzer::new(&enc);
        assert_eq!(analyzer.deadlock_predicate(), bdd.zero());

        let result = analyzer.analyze(bdd.one());
        assert!(!result.found);
        assert_eq!(result.candidate, None);
    }

    #[test]
    fn test_no_transitions_everything_is_dead() {
        let bdd = Bdd::default();
        let net = NetBuilder::new().place("p", 1).build().unwrap();
        let enc = SymbolicEncoder::new(&bdd, &net).unwrap();
        let analyzer = DeadlockAnalyzer::new(&enc).with_confirmer(IlpConfirmer);
        assert_eq!(analyzer.deadlock_predicate(), bdd.one());

        let reach = SymbolicReachability::new(&enc).compute();
        let result = analyzer.analyze(*reach.reachable);
        assert_eq!(result.witness, Some(Marking::from([1])));
    }

    #[test]
    fn test_predicate_matches_enabledness() {
        // a + b -> c, c -> a, b -> b (self-loop)
        let bdd = Bdd::default();
        let net = NetBuilder::new()
            .place("a", 1)
            .place("b", 1)
            .place("c", 0)
            .transition("join")
            .transition("back")
            .transition("spin")
            .arc("a", "join")
            .arc("b", "join")
            .arc("join", "c")
            .arc("c", "back")
            .arc("back", "a")
            .arc("b", "spin")
            .arc("spin", "b")
            .build()
            .unwrap();
        let enc = SymbolicEncoder::new(&bdd, &net).unwrap();
        let dead = DeadlockAnalyzer::new(&enc).deadlock_predicate();

        for bits in 0..8u32 {
            let m: Marking = (0..3).map(|p| bits >> p & 1).collect();
            assert_eq!(enc.contains(dead, &m), net.is_dead(&m), "marking {}", m);
        }
    }

    #[test]
    fn test_ilp_confirmer() {
        let net = toggle();
        assert!(!IlpConfirmer.confirm(&net, &Marking::from([1, 0])));
        assert!(IlpConfirmer.confirm(&net, &Marking::from([0, 1])));
        assert!(IlpConfirmer.confirm(&net, &Marking::from([0, 0])));

        let program = IlpConfirmer::program(&net, &Marking::from([0, 1]));
        assert_eq!(program.num_vars(), 1);
        assert_eq!(program.num_constraints(), 1);
    }

    #[test]
    fn test_guards_are_released() {
        let bdd = Bdd::default();
        let net = toggle();
        let enc = SymbolicEncoder::new(&bdd, &net).unwrap();
        let reach = SymbolicReachability::new(&enc).compute();
        DeadlockAnalyzer::new(&enc).analyze(*reach.reachable);
        assert_eq!(bdd.num_roots(), 1);
    }
}
