//! Building a [`NetModel`] from identifiers and arcs.

use std::collections::HashMap;

use log::debug;
use thiserror::Error;

use crate::net::{NetModel, Place, Transition};

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum NetError {
    #[error("net has neither places nor transitions")]
    Empty,
    #[error("identifier '{0}' is declared more than once")]
    DuplicateId(String),
    #[error("arc {source_id} -> {target}: endpoint '{missing}' does not exist")]
    UnknownEndpoint {
        source_id: String,
        target: String,
        missing: String,
    },
    #[error("arc {source_id} -> {target} connects two places")]
    PlaceToPlace { source_id: String, target: String },
    #[error("arc {source_id} -> {target} connects two transitions")]
    TransitionToTransition { source_id: String, target: String },
}

#[derive(Debug, Copy, Clone)]
enum Node {
    Place(usize),
    Transition(usize),
}

/// Collects places, transitions and arcs, then checks them and reduces the
/// arc list to the incidence and input matrices.
///
/// Parallel arcs compound: every place→transition arc adds one consumed
/// token, every transition→place arc one produced token.
///
/// ```
/// use petri_bdd::builder::NetBuilder;
///
/// let net = NetBuilder::new()
///     .place("p0", 1)
///     .place("p1", 0)
///     .transition("t0")
///     .arc("p0", "t0")
///     .arc("t0", "p1")
///     .build()
///     .unwrap();
/// assert_eq!(net.incidence(0, 0), -1);
/// assert_eq!(net.incidence(1, 0), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NetBuilder {
    places: Vec<(String, u32)>,
    transitions: Vec<String>,
    arcs: Vec<(String, String)>,
}

impl NetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(mut self, id: impl Into<String>, initial_tokens: u32) -> Self {
        self.places.push((id.into(), initial_tokens));
        self
    }

    pub fn transition(mut self, id: impl Into<String>) -> Self {
        self.transitions.push(id.into());
        self
    }

    pub fn arc(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.arcs.push((source.into(), target.into()));
        self
    }

    pub fn build(self) -> Result<NetModel, NetError> {
        if self.places.is_empty() && self.transitions.is_empty() {
            return Err(NetError::Empty);
        }

        let mut nodes = HashMap::new();
        let declared = self
            .places
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id, Node::Place(i)))
            .chain(
                self.transitions
                    .iter()
                    .enumerate()
                    .map(|(i, id)| (id, Node::Transition(i))),
            );
        for (id, node) in declared {
            if nodes.insert(id.as_str(), node).is_some() {
                return Err(NetError::DuplicateId(id.clone()));
            }
        }

        let np = self.places.len();
        let nt = self.transitions.len();
        let mut incidence = vec![vec![0i32; nt]; np];
        let mut input = vec![vec![0u32; nt]; np];

        for (source, target) in &self.arcs {
            let lookup = |id: &String| {
                nodes.get(id.as_str()).copied().ok_or_else(|| NetError::UnknownEndpoint {
                    source_id: source.clone(),
                    target: target.clone(),
                    missing: id.clone(),
                })
            };
            match (lookup(source)?, lookup(target)?) {
                (Node::Place(p), Node::Transition(t)) => {
                    incidence[p][t] -= 1;
                    input[p][t] += 1;
                }
                (Node::Transition(t), Node::Place(p)) => {
                    incidence[p][t] += 1;
                }
                (Node::Place(_), Node::Place(_)) => {
                    return Err(NetError::PlaceToPlace {
                        source_id: source.clone(),
                        target: target.clone(),
                    });
                }
                (Node::Transition(_), Node::Transition(_)) => {
                    return Err(NetError::TransitionToTransition {
                        source_id: source.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
        drop(nodes);

        debug!(
            "built net with {} places, {} transitions, {} arcs",
            np,
            nt,
            self.arcs.len()
        );

        let places = self
            .places
            .into_iter()
            .enumerate()
            .map(|(index, (id, initial_tokens))| Place {
                id,
                index,
                initial_tokens,
            })
            .collect();
        let transitions = self
            .transitions
            .into_iter()
            .enumerate()
            .map(|(index, id)| Transition { id, index })
            .collect();

        Ok(NetModel::new(places, transitions, incidence, input))
    }
}
