//! The rewrite pattern trait.

use sluice_common::SluiceResult;
use sluice_config::CanonConfig;
use sluice_ir::{Graph, OpId, OpKind};

/// A local rewrite anchored on one op.
///
/// `rewrite` inspects the op and its neighbourhood, mutates the graph if the
/// pattern matches, and returns `true` if it changed anything. An `Err` means
/// the graph was left in a state the mutation API refused, which is a bug in
/// the pattern.
pub trait RewritePattern {
    /// Short kebab-case name used in reports.
    fn name(&self) -> &'static str;

    /// Returns `true` if ops of this kind can anchor the pattern.
    fn applies_to(&self, kind: &OpKind) -> bool;

    /// Tries to rewrite `op`.
    fn rewrite(&self, graph: &mut Graph, op: OpId, config: &CanonConfig) -> SluiceResult<bool>;
}
