//! Configuration types deserialized from `sluice.toml`.

use serde::Deserialize;

/// The top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SluiceConfig {
    /// Canonicalization policy.
    #[serde(default)]
    pub canonicalize: CanonConfig,
    /// Verification policy.
    #[serde(default)]
    pub verify: VerifyConfig,
}

/// Policy knobs for the canonicalizer.
///
/// Rewrites that can change latency or touch operations the core does not
/// own are off by default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanonConfig {
    /// Upper bound on the depth produced by folding a chain of buffers.
    /// `None` means chains always collapse.
    #[serde(default)]
    pub max_buffer_depth: Option<u64>,
    /// Remove depth-1 buffers whose result has exactly one reader.
    #[serde(default)]
    pub eliminate_unit_buffers: bool,
    /// Inline nodes that wrap a single operation into their parent block.
    #[serde(default)]
    pub inline_single_op_nodes: bool,
    /// After erasing a dead node or buffer, also erase pure producers whose
    /// results became unused.
    #[serde(default)]
    pub transitive_dce: bool,
    /// Maximum number of sweeps the greedy driver performs.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_max_iterations() -> u32 {
    32
}

impl Default for CanonConfig {
    fn default() -> Self {
        Self {
            max_buffer_depth: None,
            eliminate_unit_buffers: false,
            inline_single_op_nodes: false,
            transitive_dce: false,
            max_iterations: default_max_iterations(),
        }
    }
}

/// Policy knobs for verification.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyConfig {
    /// Re-verify the graph after every canonicalizer sweep and stop at the
    /// first sweep that leaves it invalid.
    #[serde(default)]
    pub after_each_iteration: bool,
}
