//! Verify engine that manages rule registration and execution.

use sluice_diagnostics::DiagnosticSink;
use sluice_ir::{Graph, VerifyError};

use crate::report::to_diagnostic;
use crate::rules::register_builtin_rules;
use crate::VerifyRule;

/// Runs a set of [`VerifyRule`]s over every live op of a graph.
pub struct VerifyEngine {
    rules: Vec<Box<dyn VerifyRule>>,
}

impl Default for VerifyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl VerifyEngine {
    /// Creates an engine with every builtin rule registered.
    pub fn new() -> Self {
        let mut engine = Self::empty();
        register_builtin_rules(&mut engine);
        engine
    }

    /// Creates an engine with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Registers a rule with the engine.
    pub fn register(&mut self, rule: Box<dyn VerifyRule>) {
        self.rules.push(rule);
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the names of all registered rules.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Collects every violation in the graph, in post-order of the offending ops.
    pub fn check(&self, graph: &Graph) -> Vec<VerifyError> {
        let mut errors = Vec::new();
        for op in graph.walk(graph.body()) {
            let kind = &graph.op(op).kind;
            for rule in &self.rules {
                if rule.applies_to(kind) {
                    rule.check_op(graph, op, &mut errors);
                }
            }
        }
        errors
    }

    /// Checks the graph and emits one error diagnostic per violation.
    ///
    /// Returns `true` if no violation was found.
    pub fn run(&self, graph: &Graph, sink: &DiagnosticSink) -> bool {
        let errors = self.check(graph);
        for err in &errors {
            sink.emit(to_diagnostic(err, graph));
        }
        errors.is_empty()
    }
}
