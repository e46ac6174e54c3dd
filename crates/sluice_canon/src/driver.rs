//! Greedy fixed-point driver.

use std::collections::BTreeMap;

use sluice_common::{ContentHash, InternalError, Loc, SluiceResult};
use sluice_config::SluiceConfig;
use sluice_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use sluice_ir::Graph;
use sluice_verify::verify_with_diagnostics;

use crate::patterns::builtin_patterns;
use crate::{CanonReport, RewritePattern};

/// Reported when the iteration bound is hit before a fixed point.
const NOT_CONVERGED: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 201,
};

/// Summary remark for a run that rewrote something.
const REWRITE_SUMMARY: DiagnosticCode = DiagnosticCode {
    category: Category::Remark,
    number: 301,
};

/// Fingerprints a graph by hashing its serialized form.
pub fn fingerprint(graph: &Graph) -> SluiceResult<ContentHash> {
    let bytes = serde_json::to_vec(graph)
        .map_err(|e| InternalError::new(format!("failed to serialize graph: {e}")))?;
    Ok(ContentHash::from_bytes(&bytes))
}

/// Applies a set of rewrite patterns until nothing changes.
pub struct Canonicalizer {
    patterns: Vec<Box<dyn RewritePattern>>,
    config: SluiceConfig,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(&SluiceConfig::default())
    }
}

impl Canonicalizer {
    /// Creates a canonicalizer with every builtin pattern.
    pub fn new(config: &SluiceConfig) -> Self {
        Self::with_patterns(config, builtin_patterns())
    }

    /// Creates a canonicalizer with a custom pattern set.
    pub fn with_patterns(config: &SluiceConfig, patterns: Vec<Box<dyn RewritePattern>>) -> Self {
        Self {
            patterns,
            config: config.clone(),
        }
    }

    /// Names of the registered patterns, in application order.
    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.name()).collect()
    }

    /// Canonicalizes `graph` in place.
    ///
    /// Emits `W201` if the iteration bound is reached first and an `R301`
    /// remark summarizing the rewrites otherwise. With
    /// `verify.after_each_iteration` set, the graph is verified after every
    /// sweep; violations are reported to `sink` and the run stops with an error.
    pub fn run(&self, graph: &mut Graph, sink: &DiagnosticSink) -> SluiceResult<CanonReport> {
        let before = fingerprint(graph)?;
        let limit = self.config.canonicalize.max_iterations;
        let mut rewrites = BTreeMap::new();
        let mut iterations = 0;
        let mut converged = false;

        while iterations < limit {
            iterations += 1;
            let changed = self.sweep(graph, &mut rewrites)?;
            if self.config.verify.after_each_iteration && !verify_with_diagnostics(graph, sink) {
                return Err(InternalError::new(format!(
                    "graph failed verification after canonicalizer sweep {iterations}"
                )));
            }
            if !changed {
                converged = true;
                break;
            }
        }

        let report = CanonReport {
            iterations,
            rewrites,
            converged,
            before,
            after: fingerprint(graph)?,
        };
        if !converged {
            sink.emit(
                Diagnostic::warning(
                    NOT_CONVERGED,
                    format!("canonicalizer did not reach a fixed point within {limit} sweeps"),
                    Loc::UNKNOWN,
                )
                .with_help("raise `canonicalize.max_iterations` in sluice.toml"),
            );
        } else if report.total_rewrites() > 0 {
            let mut diag = Diagnostic::note(
                REWRITE_SUMMARY,
                format!(
                    "canonicalizer applied {} rewrites in {iterations} sweeps",
                    report.total_rewrites()
                ),
                Loc::UNKNOWN,
            );
            for (name, count) in &report.rewrites {
                diag = diag.with_note(format!("{name}: {count}"));
            }
            diag = diag.with_note(format!(
                "fingerprint {} -> {}",
                report.before.short(),
                report.after.short()
            ));
            sink.emit(diag);
        }
        Ok(report)
    }

    /// One post-order pass offering every live op to every matching pattern.
    fn sweep(
        &self,
        graph: &mut Graph,
        rewrites: &mut BTreeMap<&'static str, usize>,
    ) -> SluiceResult<bool> {
        let mut changed = false;
        for op in graph.walk(graph.body()) {
            for pattern in &self.patterns {
                if graph.is_erased(op) {
                    break;
                }
                if !pattern.applies_to(&graph.op(op).kind) {
                    continue;
                }
                if pattern.rewrite(graph, op, &self.config.canonicalize)? {
                    changed = true;
                    *rewrites.entry(pattern.name()).or_default() += 1;
                }
            }
        }
        Ok(changed)
    }
}

/// Canonicalizes `graph` with the builtin patterns.
pub fn canonicalize(
    graph: &mut Graph,
    config: &SluiceConfig,
    sink: &DiagnosticSink,
) -> SluiceResult<CanonReport> {
    Canonicalizer::new(config).run(graph, sink)
}
