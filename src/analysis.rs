//! The full pipeline: explicit search, symbolic search, deadlock check and
//! optimization, each timed separately.

use std::fmt::{Display, Formatter};
use std::time::Duration;

use log::{info, warn};
use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::config::AnalysisConfig;
use crate::deadlock::{DeadlockAnalyzer, DeadlockResult, IlpConfirmer};
use crate::encoder::{EncodingError, SymbolicEncoder};
use crate::explicit::{ExplicitReachability, ExplicitResult};
use crate::fixpoint::SymbolicReachability;
use crate::marking::Objective;
use crate::net::NetModel;
use crate::optimize::{MarkingOptimizer, OptimizationResult};

/// Owned summary of a symbolic search; the reachable predicate itself does
/// not outlive the manager.
#[derive(Debug, Clone)]
pub struct SymbolicSummary {
    pub states: BigUint,
    pub nodes: u64,
    pub iterations: usize,
    pub growth: Vec<BigUint>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub explicit: ExplicitResult,
    /// `Err` if the net cannot be encoded symbolically.
    pub symbolic: Result<SymbolicSummary, EncodingError>,
    /// `None` when the symbolic search was skipped.
    pub deadlock: Option<DeadlockResult>,
    pub optimization: OptimizationResult,
    /// Whether both engines found the same set of markings. `None` if either
    /// side is missing or incomplete.
    pub engines_agree: Option<bool>,
}

impl Display for AnalysisReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "explicit:  {} markings in {:?}",
            self.explicit.len(),
            self.explicit.elapsed
        )?;
        if self.explicit.truncated {
            write!(f, " (truncated)")?;
        }
        writeln!(f)?;

        match &self.symbolic {
            Ok(s) => {
                write!(
                    f,
                    "symbolic:  {} markings, {} nodes, {} iterations in {:?}",
                    s.states, s.nodes, s.iterations, s.elapsed
                )?;
                if self.engines_agree == Some(false) {
                    write!(f, " (differs from explicit)")?;
                }
                writeln!(f)?;
            }
            Err(e) => writeln!(f, "symbolic:  skipped ({})", e)?,
        }

        match &self.deadlock {
            Some(d) => match (&d.witness, d.confirmation) {
                (Some(w), Some(c)) => writeln!(f, "deadlock:  {} ({}) in {:?}", w, c, d.elapsed)?,
                _ => writeln!(f, "deadlock:  none in {:?}", d.elapsed)?,
            },
            None => writeln!(f, "deadlock:  skipped")?,
        }

        let o = &self.optimization;
        match &o.best {
            Some((m, v)) => write!(f, "optimum:   {} = {} ({}) in {:?}", m, v, o.mode, o.elapsed),
            None => write!(f, "optimum:   none ({}) in {:?}", o.mode, o.elapsed),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Analysis {
    config: AnalysisConfig,
}

impl Analysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run all phases with a fresh manager sized by the configuration.
    pub fn run(&self, net: &NetModel) -> AnalysisReport {
        let bdd = Bdd::with_config(self.config.bdd_config());
        self.run_with(&bdd, net)
    }

    /// Run all phases on `bdd`. Leaves no predicate retained.
    pub fn run_with(&self, bdd: &Bdd, net: &NetModel) -> AnalysisReport {
        info!(
            "analyzing net with {} places and {} transitions",
            net.num_places(),
            net.num_transitions()
        );

        let explicit = ExplicitReachability::new(net)
            .with_limit(self.config.max_explicit_markings)
            .explore();
        if !explicit.is_one_safe() {
            warn!("net is not 1-safe, symbolic results will not match the explicit ones");
        }

        let objective = self
            .config
            .objective
            .clone()
            .unwrap_or_else(|| Objective::token_count(net.num_places()));
        let optimizer = MarkingOptimizer::new(net, objective)
            .with_neighbor_limit(self.config.neighbor_limit)
            .with_explicit_limit(self.config.max_explicit_markings)
            .with_explicit_result(&explicit);

        let encoder = match SymbolicEncoder::new(bdd, net) {
            Ok(encoder) => encoder,
            Err(e) => {
                let optimization = optimizer.optimize(None);
                return AnalysisReport {
                    explicit,
                    symbolic: Err(e),
                    deadlock: None,
                    optimization,
                    engines_agree: None,
                };
            }
        };

        let reach = SymbolicReachability::new(&encoder)
            .with_gc_interval(self.config.gc_interval)
            .compute();

        let mut analyzer = DeadlockAnalyzer::new(&encoder);
        if self.config.confirm_with_solver {
            analyzer = analyzer.with_confirmer(IlpConfirmer);
        }
        let deadlock = analyzer.analyze(*reach.reachable);

        let optimization = optimizer.optimize(Some((&encoder, *reach.reachable)));

        let engines_agree = (!explicit.truncated).then(|| {
            reach.states == BigUint::from(explicit.len())
                && explicit
                    .markings
                    .iter()
                    .all(|m| encoder.contains(*reach.reachable, m))
        });
        if engines_agree == Some(false) {
            warn!("explicit and symbolic reachable sets differ");
        }

        AnalysisReport {
            explicit,
            symbolic: Ok(SymbolicSummary {
                states: reach.states,
                nodes: reach.nodes,
                iterations: reach.iterations,
                growth: reach.growth,
                elapsed: reach.elapsed,
            }),
            deadlock: Some(deadlock),
            optimization,
            engines_agree,
        }
    }
}
