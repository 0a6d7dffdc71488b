//! Refresh generations.
//!
//! Each resource partition carries a counter bumped by every committed
//! refresh. An append records the generation it started under and may only
//! commit if the counter has not moved, so a page fetched for a window that
//! a refresh has since replaced is discarded instead of merged.

use thiserror::Error;

/// Monotonic refresh counter of one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// Create a generation with the given value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The generation after one more refresh.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Check that the partition is still at `self`.
    pub fn check(&self, found: Generation) -> Result<(), StaleGeneration> {
        if *self == found {
            Ok(())
        } else {
            Err(StaleGeneration {
                expected: *self,
                found,
            })
        }
    }
}

/// A write was planned against an older generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("stale generation: expected {}, found {}", expected.0, found.0)]
pub struct StaleGeneration {
    /// Generation the write was planned under.
    pub expected: Generation,
    /// Generation currently stored.
    pub found: Generation,
}
