//! Rule-based structural verifier for dataflow graphs.
//!
//! Each rule inspects one op at a time and appends [`VerifyError`]s. The
//! [`VerifyEngine`] walks the whole graph post-order (nested ops before the
//! op that owns them) and runs every rule whose [`VerifyRule::applies_to`]
//! accepts the op's kind. A graph that yields any error must not be handed to
//! scheduling or code generation.

#![warn(missing_docs)]

mod engine;
mod report;
mod rules;

pub use engine::VerifyEngine;
pub use report::{code_for, to_diagnostic, GraphLocs};
pub use rules::{
    register_builtin_rules, BufferRules, CastLegality, ChannelDiscipline, ConstShape,
    MulLegality, NodeTerminator, StreamAccess, Structure,
};

use sluice_diagnostics::DiagnosticSink;
use sluice_ir::{Graph, OpId, OpKind, VerifyError};

/// A single verification rule.
pub trait VerifyRule: Send + Sync {
    /// Returns the short kebab-case name of this rule (e.g. "channel-discipline").
    fn name(&self) -> &str;

    /// Returns a human-readable description of what this rule checks.
    fn description(&self) -> &str;

    /// Returns `true` if the rule inspects ops of this kind.
    fn applies_to(&self, kind: &OpKind) -> bool;

    /// Checks one op and appends any violations to `errors`.
    ///
    /// Must not panic on ops whose operand or result counts are wrong; the
    /// [`Structure`] rule reports those.
    fn check_op(&self, graph: &Graph, op: OpId, errors: &mut Vec<VerifyError>);
}

/// Verifies the whole graph with the builtin rules.
pub fn verify(graph: &Graph) -> Result<(), Vec<VerifyError>> {
    let errors = VerifyEngine::new().check(graph);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Verifies the whole graph and reports each violation to `sink`.
///
/// Returns `true` if the graph is clean.
pub fn verify_with_diagnostics(graph: &Graph, sink: &DiagnosticSink) -> bool {
    VerifyEngine::new().run(graph, sink)
}
