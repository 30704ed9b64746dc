//! Structural description of a place/transition net.
//!
//! A [`NetModel`] is immutable once built. It is usually produced by
//! [`NetBuilder`][crate::builder::NetBuilder], which derives the matrices from
//! an arc list and checks identifier consistency.

use crate::marking::Marking;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Place {
    pub id: String,
    pub index: usize,
    pub initial_tokens: u32,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transition {
    pub id: String,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct NetModel {
    places: Vec<Place>,
    transitions: Vec<Transition>,
    /// `incidence[p][t]`: net token change at `p` when `t` fires.
    incidence: Vec<Vec<i32>>,
    /// `input[p][t]`: number of tokens `t` consumes from `p` (number of
    /// place-to-transition arcs). Non-zero iff `p` is an input place of `t`.
    input: Vec<Vec<u32>>,
    initial: Marking,
}

impl NetModel {
    /// Assemble a model from already consistent parts.
    ///
    /// # Panics
    ///
    /// Panics if the matrix dimensions do not match the place and transition
    /// lists, or if an index disagrees with its position.
    pub fn new(
        places: Vec<Place>,
        transitions: Vec<Transition>,
        incidence: Vec<Vec<i32>>,
        input: Vec<Vec<u32>>,
    ) -> Self {
        assert!(
            places.iter().enumerate().all(|(i, p)| p.index == i),
            "Place indices must be dense and ordered"
        );
        assert!(
            transitions.iter().enumerate().all(|(i, t)| t.index == i),
            "Transition indices must be dense and ordered"
        );
        assert_eq!(incidence.len(), places.len(), "Incidence matrix needs one row per place");
        assert_eq!(input.len(), places.len(), "Input matrix needs one row per place");
        for p in 0..places.len() {
            assert_eq!(incidence[p].len(), transitions.len(), "Incidence row has wrong length");
            assert_eq!(input[p].len(), transitions.len(), "Input row has wrong length");
        }

        let initial = places.iter().map(|p| p.initial_tokens).collect();
        Self {
            places,
            transitions,
            incidence,
            input,
            initial,
        }
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn num_places(&self) -> usize {
        self.places.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    pub fn initial_marking(&self) -> &Marking {
        &self.initial
    }

    pub fn incidence(&self, p: usize, t: usize) -> i32 {
        self.incidence[p][t]
    }

    pub fn input(&self, p: usize, t: usize) -> u32 {
        self.input[p][t]
    }

    /// Input places of `t`, in index order.
    pub fn inputs_of(&self, t: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.places.len()).filter(move |&p| self.input[p][t] > 0)
    }

    /// Returns `true` if `t` has no input place, i.e. is enabled everywhere.
    pub fn is_source(&self, t: usize) -> bool {
        self.inputs_of(t).next().is_none()
    }

    /// `t` is enabled at `m` iff every input place holds enough tokens.
    pub fn is_enabled(&self, m: &Marking, t: usize) -> bool {
        (0..self.places.len()).all(|p| self.input[p][t] <= m[p])
    }

    /// Transitions enabled at `m`, in index order.
    pub fn enabled<'a>(&'a self, m: &'a Marking) -> impl Iterator<Item = usize> + 'a {
        (0..self.transitions.len()).filter(move |&t| self.is_enabled(m, t))
    }

    pub fn is_dead(&self, m: &Marking) -> bool {
        self.enabled(m).next().is_none()
    }

    /// Marking reached by firing `t` at `m`: `m + Δ[:, t]`.
    ///
    /// Only meaningful when `t` is enabled at `m`, which is not checked here.
    /// Firing a disabled transition still yields a marking: places that would
    /// go negative are clamped to 0.
    pub fn fire(&self, m: &Marking, t: usize) -> Marking {
        (0..self.places.len())
            .map(|p| (m[p] as i64 + self.incidence[p][t] as i64).max(0) as u32)
            .collect()
    }

    pub fn place_index(&self, id: &str) -> Option<usize> {
        self.places.iter().position(|p| p.id == id)
    }

    pub fn transition_index(&self, id: &str) -> Option<usize> {
        self.transitions.iter().position(|t| t.id == id)
    }
}
