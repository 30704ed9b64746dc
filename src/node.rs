use crate::reference::Ref;
use crate::utils::{pairing3, MyHash};

/// Entry of the unique table.
///
/// Invariant: `high` is never negated (complement edges are pushed to the
/// incoming reference), and `low != high`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            variable: 0,
            low: Ref::positive(1),
            high: Ref::positive(1),
        }
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing3(
            self.variable as u64,
            self.low.unsigned() as u64,
            self.high.unsigned() as u64,
        )
    }
}
