use crate::bdd::BddConfig;
use crate::marking::Objective;
use crate::optimize::DEFAULT_NEIGHBOR_LIMIT;

/// Tunables of an [`Analysis`][crate::analysis::Analysis] run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// The unique table holds up to `2^storage_bits` nodes.
    pub storage_bits: usize,
    /// The computed table has `2^cache_bits` entries.
    pub cache_bits: usize,
    /// Stop the explicit search after this many markings.
    pub max_explicit_markings: Option<usize>,
    /// Collect garbage every this many fixpoint iterations.
    pub gc_interval: Option<usize>,
    /// Heuristic optimizer candidate cap, witness included.
    pub neighbor_limit: usize,
    /// `None` maximizes the total number of tokens.
    pub objective: Option<Objective>,
    /// Double-check deadlock witnesses with the 0/1 program.
    pub confirm_with_solver: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let bdd = BddConfig::default();
        Self {
            storage_bits: bdd.storage_bits,
            cache_bits: bdd.cache_bits,
            max_explicit_markings: None,
            gc_interval: None,
            neighbor_limit: DEFAULT_NEIGHBOR_LIMIT,
            objective: None,
            confirm_with_solver: true,
        }
    }
}

impl AnalysisConfig {
    pub fn bdd_config(&self) -> BddConfig {
        BddConfig {
            storage_bits: self.storage_bits,
            cache_bits: self.cache_bits,
        }
    }
}
