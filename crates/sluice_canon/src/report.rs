//! Summary of one canonicalizer run.

use sluice_common::ContentHash;
use std::collections::BTreeMap;

/// What a [`Canonicalizer`](crate::Canonicalizer) run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonReport {
    /// Number of sweeps performed.
    pub iterations: u32,
    /// Successful rewrites per pattern name.
    pub rewrites: BTreeMap<&'static str, usize>,
    /// `true` if the last sweep changed nothing.
    pub converged: bool,
    /// Fingerprint of the graph before the run.
    pub before: ContentHash,
    /// Fingerprint of the graph after the run.
    pub after: ContentHash,
}

impl CanonReport {
    /// Total rewrites across all patterns.
    pub fn total_rewrites(&self) -> usize {
        self.rewrites.values().sum()
    }

    /// Returns `true` if the run changed the graph.
    pub fn changed(&self) -> bool {
        self.before != self.after
    }

    /// Returns how often the named pattern fired.
    pub fn count(&self, pattern: &str) -> usize {
        self.rewrites.get(pattern).copied().unwrap_or(0)
    }
}
