//! Conformance test helpers for the sluice dataflow IR.
//!
//! Provides the verify → canonicalize → verify pipeline and small graph
//! fixtures, returning structured results for assertion in integration tests.

#![warn(missing_docs)]

use sluice_canon::{canonicalize, CanonReport};
use sluice_config::{load_config_from_str, ConfigError, SluiceConfig};
use sluice_diagnostics::{
    Category, Diagnostic, DiagnosticCode, DiagnosticRenderer, DiagnosticSink, Severity,
    TerminalRenderer,
};
use sluice_ir::{Graph, OpId, OpKind, TypeId};
use sluice_verify::{verify_with_diagnostics, GraphLocs};

/// Code used when the canonicalizer reports an internal failure.
const INTERNAL: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 999,
};

/// Result of running the full verify → canonicalize → verify pipeline.
pub struct PipelineResult {
    /// The graph after canonicalization (or as given, if it failed to verify).
    pub graph: Graph,
    /// The canonicalizer report; `None` if the input failed verification.
    pub report: Option<CanonReport>,
    /// All diagnostics emitted during the pipeline.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    /// Renders every diagnostic against the resulting graph.
    pub fn render(&self) -> String {
        let renderer = TerminalRenderer::new(false);
        let locs = GraphLocs(&self.graph);
        self.diagnostics
            .iter()
            .map(|d| renderer.render(d, &locs))
            .collect()
    }

    /// Returns the codes of all diagnostics, e.g. `["E101", "W201"]`.
    pub fn codes(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.code.to_string()).collect()
    }
}

/// Parses a `sluice.toml` body whose `[canonicalize]` section holds `body`.
pub fn make_config(body: &str) -> Result<SluiceConfig, ConfigError> {
    load_config_from_str(&format!("[canonicalize]\n{body}\n"))
}

/// Verifies `graph`, canonicalizes it if it is clean, and verifies the result.
pub fn full_pipeline(mut graph: Graph, config: &SluiceConfig) -> PipelineResult {
    let sink = DiagnosticSink::new();
    let mut report = None;
    if verify_with_diagnostics(&graph, &sink) {
        match canonicalize(&mut graph, config, &sink) {
            Ok(r) => report = Some(r),
            Err(e) => sink.emit(Diagnostic::for_code(INTERNAL, e.to_string(), e.loc)),
        }
        verify_with_diagnostics(&graph, &sink);
    }
    let diagnostics = sink.take_all();
    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    PipelineResult {
        graph,
        report,
        has_errors: error_count > 0,
        diagnostics,
        error_count,
        warning_count,
    }
}

/// Interns `iWIDTH` for one lane, `vector<LANESxiWIDTH>` otherwise.
pub fn int_or_vector(graph: &mut Graph, lanes: u32, width: u32) -> TypeId {
    if lanes == 1 {
        graph.int_type(width)
    } else {
        graph.vector_type(lanes, width)
    }
}

/// Builds `prim.mul` over block arguments of the given `(lanes, width)`
/// shapes and returns the graph and the multiply.
pub fn mul_fixture(lhs: (u32, u32), rhs: (u32, u32), result: (u32, u32)) -> (Graph, OpId) {
    let mut graph = Graph::new();
    let a_ty = int_or_vector(&mut graph, lhs.0, lhs.1);
    let b_ty = int_or_vector(&mut graph, rhs.0, rhs.1);
    let c_ty = int_or_vector(&mut graph, result.0, result.1);
    let mut b = graph.builder();
    let a = b.arg(a_ty);
    let bv = b.arg(b_ty);
    let mul = b.create(OpKind::PrimMul, &[a, bv], &[c_ty]);
    let c = b.graph().op(mul).results[0];
    b.opaque("test.consume", &[c], &[], true);
    (graph, mul)
}

/// Builds `buffer(buffer(x, d1, level), d2, level)` feeding a side-effecting
/// consumer. Returns the graph and the outer buffer op.
pub fn buffer_chain(d1: i64, d2: i64, level: Option<u32>) -> (Graph, OpId) {
    let mut graph = Graph::new();
    let i16 = graph.int_type(16);
    let mut b = graph.builder();
    let def = b.opaque("test.produce", &[], &[i16], true);
    let x = b.graph().op(def).results[0];
    let inner = b.buffer(x, d1, level);
    let outer = b.create(OpKind::DataflowBuffer { depth: d2, level }, &[inner], &[i16]);
    let out = b.graph().op(outer).results[0];
    b.opaque("test.consume", &[out], &[], true);
    (graph, outer)
}
