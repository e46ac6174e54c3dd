//! Graph fingerprints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 hash of a serialized graph.
///
/// The canonicalizer records one before and one after a run, so callers can
/// tell whether a graph actually changed without diffing it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Hashes an already serialized graph.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data).to_be_bytes())
    }

    /// The leading eight hex digits, enough to tell two fingerprints apart
    /// in a diagnostic note.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({}..)", self.short())
    }
}
