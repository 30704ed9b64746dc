//! # petri-bdd: Petri net analysis with Binary Decision Diagrams
//!
//! **`petri-bdd`** computes the reachable markings of a place/transition net, looks for reachable deadlocks,
//! and maximizes a linear objective over the reachable markings.
//! Every question is answered twice where it makes sense: once by explicit enumeration and once symbolically,
//! on top of a small manager-centric BDD library with complement edges.
//!
//! ## How it works
//!
//! Each place `p` owns two Boolean variables: `x_p` (current state, variable `2p + 1`)
//! and `x'_p` (next state, variable `2p + 2`).
//! A set of markings is a predicate over the `x` variables, and the firing rule is a relation `R(x, x')`.
//! The reachable set is the least fixpoint of `S ↦ S ∪ Image(S, R)` starting from the initial marking,
//! where `Image(S, R) = (∃x. S(x) ∧ R(x, x'))[x' := x]`.
//!
//! One variable per place means the symbolic side handles **1-safe** nets (at most one token per place).
//! The explicit engine has no such restriction and serves as the reference on small nets.
//!
//! ## Quick Start
//!
//! ```rust
//! use petri_bdd::analysis::Analysis;
//! use petri_bdd::builder::NetBuilder;
//! use petri_bdd::marking::Marking;
//!
//! // p0 --t0--> p1
//! let net = NetBuilder::new()
//!     .place("p0", 1)
//!     .place("p1", 0)
//!     .transition("t0")
//!     .arc("p0", "t0")
//!     .arc("t0", "p1")
//!     .build()?;
//!
//! let report = Analysis::default().run(&net);
//! assert_eq!(report.explicit.len(), 2);
//! assert_eq!(report.deadlock.unwrap().witness, Some(Marking::from([0, 1])));
//! # Ok::<(), petri_bdd::builder::NetError>(())
//! ```
//!
//! ## Working with the phases directly
//!
//! ```rust
//! use petri_bdd::bdd::Bdd;
//! use petri_bdd::builder::NetBuilder;
//! use petri_bdd::deadlock::{DeadlockAnalyzer, IlpConfirmer};
//! use petri_bdd::encoder::SymbolicEncoder;
//! use petri_bdd::fixpoint::SymbolicReachability;
//!
//! let net = NetBuilder::new()
//!     .place("a", 1)
//!     .place("b", 0)
//!     .transition("go")
//!     .transition("back")
//!     .arc("a", "go")
//!     .arc("go", "b")
//!     .arc("b", "back")
//!     .arc("back", "a")
//!     .build()
//!     .unwrap();
//!
//! // The manager is an explicit value; nothing is global.
//! let bdd = Bdd::default();
//! let encoder = SymbolicEncoder::new(&bdd, &net).unwrap();
//!
//! let reach = SymbolicReachability::new(&encoder).compute();
//! assert_eq!(reach.states.to_string(), "2");
//!
//! let deadlock = DeadlockAnalyzer::new(&encoder)
//!     .with_confirmer(IlpConfirmer)
//!     .analyze(*reach.reachable);
//! assert!(!deadlock.found);
//! ```
//!
//! ## Core Components
//!
//! - **[`bdd`]**: The [`Bdd`][crate::bdd::Bdd] manager: ITE-based operations, quantification, renaming, garbage collection.
//! - **[`root`]**: [`Root`][crate::root::Root] guards that keep predicates alive across garbage collections.
//! - **[`sat`]**: Witness extraction and model counting.
//! - **[`net`]** and **[`builder`]**: The net model and its construction from identifiers and arcs.
//! - **[`explicit`]**: Breadth-first enumeration of markings.
//! - **[`encoder`]** and **[`fixpoint`]**: Symbolic encoding and the fixpoint iteration.
//! - **[`deadlock`]**: Reachable deadlock detection, with optional confirmation by a 0/1 program ([`solver`]).
//! - **[`optimize`]**: Maximizing a linear objective over reachable markings.
//! - **[`analysis`]**: All of the above in one timed run.
//!
//! For the node lifetime rules, check the [`bdd`] module documentation.

pub mod analysis;
pub mod bdd;
pub mod builder;
pub mod cache;
pub mod config;
pub mod deadlock;
pub mod dot;
pub mod encoder;
pub mod explicit;
pub mod fixpoint;
pub mod marking;
pub mod net;
pub mod node;
pub mod optimize;
pub mod reference;
pub mod root;
pub mod sat;
pub mod solver;
pub mod table;
pub mod utils;
