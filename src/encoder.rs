//! Binary encoding of markings and of the one-step firing relation.
//!
//! Every place `p` gets a current-state variable `2p + 1` and a next-state
//! variable `2p + 2`. Interleaving the two copies keeps the transition
//! relation small, since each frame axiom `x'_p ⇔ x_p` touches adjacent
//! levels only.
//!
//! One variable per place means the encoding is exact only for 1-safe nets:
//! a variable records whether the place is marked, not how many tokens it
//! holds. [`SymbolicEncoder::new`] rejects nets that are statically known to
//! violate this; nets that become unsafe while running are not detected here
//! (compare with [`ExplicitResult::is_one_safe`][crate::explicit::ExplicitResult::is_one_safe]).

use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};
use num_bigint::BigUint;
use thiserror::Error;

use crate::bdd::Bdd;
use crate::marking::Marking;
use crate::net::NetModel;
use crate::reference::Ref;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum EncodingError {
    #[error("place '{place}' initially holds {tokens} tokens, but the symbolic encoding is 1-safe")]
    NonBinaryInitialMarking { place: String, tokens: u32 },
    #[error("arc between place '{place}' and transition '{transition}' has weight {weight}, but the symbolic encoding is 1-safe")]
    WeightedArc {
        place: String,
        transition: String,
        weight: u32,
    },
}

pub struct SymbolicEncoder<'a> {
    bdd: &'a Bdd,
    net: &'a NetModel,
    current: Vec<u32>,
    next: Vec<u32>,
    next_to_current: HashMap<u32, u32>,
}

impl<'a> SymbolicEncoder<'a> {
    pub fn new(bdd: &'a Bdd, net: &'a NetModel) -> Result<Self, EncodingError> {
        Self::check_binary(net).inspect_err(|e| warn!("symbolic encoding rejected: {}", e))?;

        let np = net.num_places() as u32;
        let current: Vec<u32> = (0..np).map(|p| 2 * p + 1).collect();
        let next: Vec<u32> = (0..np).map(|p| 2 * p + 2).collect();
        let next_to_current = next.iter().copied().zip(current.iter().copied()).collect();

        Ok(Self {
            bdd,
            net,
            current,
            next,
            next_to_current,
        })
    }

    fn check_binary(net: &NetModel) -> Result<(), EncodingError> {
        for place in net.places() {
            if place.initial_tokens > 1 {
                return Err(EncodingError::NonBinaryInitialMarking {
                    place: place.id.clone(),
                    tokens: place.initial_tokens,
                });
            }
        }
        for transition in net.transitions() {
            for place in net.places() {
                let (p, t) = (place.index, transition.index);
                let consumed = net.input(p, t);
                let produced = (net.incidence(p, t) + consumed as i32) as u32;
                let weight = consumed.max(produced);
                if weight > 1 {
                    return Err(EncodingError::WeightedArc {
                        place: place.id.clone(),
                        transition: transition.id.clone(),
                        weight,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn bdd(&self) -> &'a Bdd {
        self.bdd
    }

    pub fn net(&self) -> &'a NetModel {
        self.net
    }

    pub fn num_places(&self) -> usize {
        self.current.len()
    }

    /// Current-state variables, in place order.
    pub fn current_vars(&self) -> &[u32] {
        &self.current
    }

    /// Next-state variables, in place order.
    pub fn next_vars(&self) -> &[u32] {
        &self.next
    }

    fn current_lit(&self, p: usize, marked: bool) -> i32 {
        let v = self.current[p] as i32;
        if marked {
            v
        } else {
            -v
        }
    }

    /// Predicate denoting exactly `{m}`.
    ///
    /// A marking with more than one token on some place is not representable;
    /// its predicate is the empty set.
    pub fn marking_predicate(&self, m: &Marking) -> Ref {
        assert_eq!(m.len(), self.num_places(), "Marking has wrong length");
        if !m.is_binary() {
            return self.bdd.zero();
        }
        self.bdd
            .cube((0..m.len()).map(|p| self.current_lit(p, m[p] == 1)))
    }

    /// Enabling condition of `t`: all of its input places are marked.
    /// The constant true predicate for a transition without inputs.
    pub fn enabling_predicate(&self, t: usize) -> Ref {
        self.bdd
            .cube(self.net.inputs_of(t).map(|p| self.current_lit(p, true)))
    }

    /// Relation `R(x, x')` of firing exactly transition `t`.
    pub fn transition_predicate(&self, t: usize) -> Ref {
        let mut literals: Vec<i32> = self
            .net
            .inputs_of(t)
            .map(|p| self.current_lit(p, true))
            .collect();
        let mut frame = Vec::new();
        for p in 0..self.num_places() {
            let next = self.next[p] as i32;
            match self.net.incidence(p, t).signum() {
                -1 => literals.push(-next),
                1 => literals.push(next),
                _ => frame.push(p),
            }
        }

        let mut relation = self.bdd.cube(literals);
        // Frame axioms bottom-up keep intermediate diagrams small.
        for &p in frame.iter().rev() {
            let keep = self
                .bdd
                .apply_eq(self.bdd.mk_var(self.next[p]), self.bdd.mk_var(self.current[p]));
            relation = self.bdd.apply_and(relation, keep);
        }
        relation
    }

    /// Relation `R(x, x')`: `x'` is obtained from `x` by firing exactly one
    /// transition.
    pub fn transition_relation(&self) -> Ref {
        let relation = self
            .bdd
            .apply_or_many((0..self.net.num_transitions()).map(|t| self.transition_predicate(t)));
        debug!(
            "transition relation over {} transitions has {} nodes",
            self.net.num_transitions(),
            self.bdd.size(relation)
        );
        relation
    }

    /// Successors of `states` under one step of `relation`:
    /// `(∃x. S(x) ∧ R(x, x'))[x' := x]`.
    pub fn image(&self, states: Ref, relation: Ref) -> Ref {
        let step = self.bdd.apply_and(states, relation);
        let next = self.bdd.exists(step, &self.current);
        self.bdd.rename(next, &self.next_to_current)
    }

    pub fn contains(&self, states: Ref, m: &Marking) -> bool {
        let single = self.marking_predicate(m);
        !self.bdd.is_zero(self.bdd.apply_and(states, single))
    }

    /// One marking of `states`: places are visited in index order and marked
    /// whenever that keeps the predicate satisfiable.
    pub fn pick_marking(&self, states: Ref) -> Option<Marking> {
        self.bdd
            .pick_assignment(states, &self.current)
            .map(|bits| bits.into_iter().map(u32::from).collect())
    }

    /// Every marking of `states`. Exponential in the worst case.
    pub fn markings(&self, states: Ref) -> BTreeSet<Marking> {
        self.bdd
            .all_assignments(states, &self.current)
            .into_iter()
            .map(|bits| bits.into_iter().map(u32::from).collect())
            .collect()
    }

    /// Number of markings in `states` (model count over the current-state
    /// variables).
    pub fn count(&self, states: Ref) -> BigUint {
        self.bdd.sat_count(states, self.num_places())
    }

    /// Graphviz rendering with place ids as labels (`p'` for next-state).
    pub fn to_dot(&self, roots: &[(&str, Ref)]) -> Result<String, std::fmt::Error> {
        let places = self.net.places();
        self.bdd.to_dot(roots, |v| {
            let place = &places[((v - 1) / 2) as usize].id;
            if v % 2 == 0 {
                format!("{}'", place)
            } else {
                place.clone()
            }
        })
    }
}
