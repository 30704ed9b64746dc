//! Explicit breadth-first enumeration of reachable markings.
//!
//! This is the ground truth for small nets and the oracle the symbolic engine is
//! checked against. On unbounded nets it does not terminate unless a marking
//! limit is set.

use std::collections::{BTreeSet, VecDeque};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::marking::Marking;
use crate::net::NetModel;

#[derive(Debug, Clone)]
pub struct ExplicitResult {
    /// Distinct reachable markings, the initial one included.
    pub markings: BTreeSet<Marking>,
    /// Set when the search stopped at the marking limit.
    pub truncated: bool,
    pub elapsed: Duration,
}

impl ExplicitResult {
    pub fn len(&self) -> usize {
        self.markings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markings.is_empty()
    }

    pub fn contains(&self, m: &Marking) -> bool {
        self.markings.contains(m)
    }

    /// Returns `true` if no reachable marking puts more than one token on a place.
    pub fn is_one_safe(&self) -> bool {
        is_one_safe(&self.markings)
    }
}

pub fn is_one_safe<'a>(markings: impl IntoIterator<Item = &'a Marking>) -> bool {
    markings.into_iter().all(Marking::is_binary)
}

pub struct ExplicitReachability<'a> {
    net: &'a NetModel,
    max_markings: Option<usize>,
}

impl<'a> ExplicitReachability<'a> {
    pub fn new(net: &'a NetModel) -> Self {
        Self {
            net,
            max_markings: None,
        }
    }

    /// Stop once `limit` distinct markings have been discovered.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.max_markings = limit;
        self
    }

    pub fn explore(&self) -> ExplicitResult {
        let start = Instant::now();
        info!(
            "explicit search: {} places, {} transitions",
            self.net.num_places(),
            self.net.num_transitions()
        );

        let initial = self.net.initial_marking().clone();
        let mut visited = BTreeSet::from([initial.clone()]);
        let mut queue = VecDeque::from([initial]);
        let mut truncated = false;

        'search: while let Some(m) = queue.pop_front() {
            for t in self.net.enabled(&m) {
                let next = self.net.fire(&m, t);
                if visited.contains(&next) {
                    continue;
                }
                if self.max_markings.is_some_and(|limit| visited.len() >= limit) {
                    truncated = true;
                    break 'search;
                }
                debug!("{} --{}--> {}", m, self.net.transitions()[t].id, next);
                visited.insert(next.clone());
                queue.push_back(next);
            }
        }

        let elapsed = start.elapsed();
        if truncated {
            warn!(
                "explicit search stopped at the limit of {} markings",
                visited.len()
            );
        }
        info!(
            "explicit search: {} markings in {:?}",
            visited.len(),
            elapsed
        );

        ExplicitResult {
            markings: visited,
            truncated,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::builder::NetBuilder;

    #[test]
    fn test_two_place_toggle() {
        let net = NetBuilder::new()
            .place("p0", 1)
            .place("p1", 0)
            .transition("t0")
            .arc("p0", "t0")
            .arc("t0", "p1")
            .build()
            .unwrap();

        let result = ExplicitReachability::new(&net).explore();
        assert_eq!(
            result.markings,
            BTreeSet::from([Marking::from([1, 0]), Marking::from([0, 1])])
        );
        assert!(!result.truncated);
        assert!(result.is_one_safe());
    }

    #[test]
    fn test_no_transitions() {
        let net = NetBuilder::new().place("p", 3).build().unwrap();
        let result = ExplicitReachability::new(&net).explore();
        assert_eq!(result.len(), 1);
        assert!(result.contains(&Marking::from([3])));
        assert!(!result.is_one_safe());
    }

    #[test]
    fn test_cycle_terminates() {
        let net = NetBuilder::new()
            .place("a", 1)
            .place("b", 0)
            .place("c", 0)
            .transition("ab")
            .transition("bc")
            .transition("ca")
            .arc("a", "ab")
            .arc("ab", "b")
            .arc("b", "bc")
            .arc("bc", "c")
            .arc("c", "ca")
            .arc("ca", "a")
            .build()
            .unwrap();
        let result = ExplicitReachability::new(&net).explore();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_limit_on_unbounded_net() {
        // A source transition pumps tokens into `p` forever.
        let net = NetBuilder::new()
            .place("p", 0)
            .transition("gen")
            .arc("gen", "p")
            .build()
            .unwrap();
        let result = ExplicitReachability::new(&net).with_limit(Some(5)).explore();
        assert!(result.truncated);
        assert_eq!(result.len(), 5);
        assert!(result.contains(&Marking::from([4])));
    }
}
