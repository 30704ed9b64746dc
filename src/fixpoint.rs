//! Least-fixpoint computation of the reachable markings.

use std::time::{Duration, Instant};

use log::{debug, info};
use num_bigint::BigUint;

use crate::encoder::SymbolicEncoder;
use crate::root::Root;

/// Outcome of [`SymbolicReachability::compute`].
#[derive(Debug)]
pub struct SymbolicResult<'a> {
    /// Predicate over the current-state variables denoting all reachable markings.
    pub reachable: Root<'a>,
    /// Exact number of reachable markings.
    pub states: BigUint,
    /// Node count of `reachable`.
    pub nodes: u64,
    /// Number of image computations, the final empty one included.
    pub iterations: usize,
    /// Cardinality of `Reach_i` after each iteration, starting with `Reach_0`.
    pub growth: Vec<BigUint>,
    pub elapsed: Duration,
}

pub struct SymbolicReachability<'e, 'a> {
    encoder: &'e SymbolicEncoder<'a>,
    gc_interval: Option<usize>,
}

impl<'e, 'a> SymbolicReachability<'e, 'a> {
    pub fn new(encoder: &'e SymbolicEncoder<'a>) -> Self {
        Self {
            encoder,
            gc_interval: None,
        }
    }

    /// Collect garbage every `interval` iterations.
    pub fn with_gc_interval(mut self, interval: Option<usize>) -> Self {
        self.gc_interval = interval.filter(|&k| k > 0);
        self
    }

    /// Breadth-first frontier iteration:
    /// `Frontier_{i+1} = Image(Frontier_i) \ Reach_i`,
    /// `Reach_{i+1} = Reach_i ∪ Frontier_{i+1}`, until the frontier is empty.
    pub fn compute(&self) -> SymbolicResult<'a> {
        let start = Instant::now();
        let enc = self.encoder;
        let bdd = enc.bdd();

        let relation = bdd.protect(enc.transition_relation());
        let init = enc.marking_predicate(enc.net().initial_marking());
        let mut reach = bdd.protect(init);
        let mut frontier = bdd.protect(init);
        info!(
            "symbolic search: {} places, relation has {} nodes",
            enc.num_places(),
            bdd.size(*relation)
        );

        let mut growth = vec![enc.count(*reach)];
        let mut iterations = 0;
        loop {
            iterations += 1;
            let image = enc.image(*frontier, *relation);
            let fresh = bdd.apply_diff(image, *reach);
            if bdd.is_zero(fresh) {
                break;
            }
            reach.replace(bdd.apply_or(*reach, fresh));
            frontier.replace(fresh);

            let count = enc.count(*reach);
            debug!(
                "iteration {}: {} markings, frontier {} nodes, reach {} nodes",
                iterations,
                count,
                bdd.size(*frontier),
                bdd.size(*reach)
            );
            growth.push(count);

            if self.gc_interval.is_some_and(|k| iterations % k == 0) {
                bdd.collect_garbage();
            }
        }

        let states = enc.count(*reach);
        let nodes = bdd.size(*reach);
        let elapsed = start.elapsed();
        info!(
            "symbolic search: {} markings ({} nodes) after {} iterations in {:?}",
            states, nodes, iterations, elapsed
        );

        drop(frontier);
        drop(relation);
        SymbolicResult {
            reachable: reach,
            states,
            nodes,
            iterations,
            growth,
            elapsed,
        }
    }
}
