#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Default bound on how far a k-mer implied shift may stray from the
/// overlap implied shift, in bases.
pub const DEFAULT_MAXIMUM_JUMP: i64 = 1500;

/// Tunables for contig generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct ContigConfig {
    /// A shared k-mer is accepted as a switch candidate only if its
    /// shift differs from the overlap shift by less than half of this.
    pub maximum_jump: i64,
}

impl Default for ContigConfig {
    fn default() -> Self {
        ContigConfig {
            maximum_jump: DEFAULT_MAXIMUM_JUMP,
        }
    }
}

impl ContigConfig {
    pub fn with_maximum_jump(mut self, maximum_jump: i64) -> Self {
        self.maximum_jump = maximum_jump;
        self
    }

    /// The largest accepted deviation, exclusive.
    #[inline]
    pub fn jump_tolerance(&self) -> i64 {
        self.maximum_jump / 2
    }
}
