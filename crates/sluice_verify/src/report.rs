//! Maps verification errors to diagnostic codes and renders them.

use sluice_common::Loc;
use sluice_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, LocResolver};
use sluice_ir::{Graph, OpId, VerifyError};

/// Returns the diagnostic code reported for a violation.
pub fn code_for(err: &VerifyError) -> DiagnosticCode {
    let number = match err {
        VerifyError::MultipleWriters { .. } => 101,
        VerifyError::DanglingChannel { .. } => 102,
        VerifyError::TypeMismatch { .. } => 103,
        VerifyError::InvalidDepth { .. } => 104,
        VerifyError::IllegalOperandShape { .. } => 105,
        VerifyError::WidthMismatch { .. } => 106,
        VerifyError::ShapeMismatch { .. } => 107,
        VerifyError::MultiBlockRegion { .. } => 108,
        VerifyError::MissingTerminator { .. } => 109,
        VerifyError::ResultMismatch { .. } => 110,
        VerifyError::Malformed { .. } => 111,
    };
    DiagnosticCode::new(Category::Error, number)
}

fn help_for(err: &VerifyError) -> Option<&'static str> {
    match err {
        VerifyError::MultipleWriters { .. } => {
            Some("give each producer its own channel, or merge the writes in one node")
        }
        VerifyError::DanglingChannel { .. } => Some("add a `stream.write` or remove the channel"),
        VerifyError::InvalidDepth { .. } => Some("dataflow buffers need a depth of at least 1"),
        VerifyError::WidthMismatch { .. } | VerifyError::IllegalOperandShape { .. } => {
            Some("`prim.mul` takes i8 or vector<2xi8> operands and yields i16 or vector<2xi16>")
        }
        VerifyError::MissingTerminator { .. } => {
            Some("finish the node body with `dataflow.output`")
        }
        _ => None,
    }
}

/// Converts a violation into an error diagnostic anchored at the offending op.
pub fn to_diagnostic(err: &VerifyError, graph: &Graph) -> Diagnostic {
    let op = err.op();
    let loc = graph.loc(op);
    let mut diag = Diagnostic::for_code(code_for(err), err.to_string(), loc)
        .with_label(Label::primary(loc, err.kind_name()));
    if let VerifyError::MultipleWriters { channel, .. } = err {
        for writer in graph.channel_writers(*channel) {
            if writer != op {
                diag = diag.with_label(Label::secondary(graph.loc(writer), "also written by"));
            }
        }
    }
    if graph.contains_op(op) {
        diag = diag.with_note(format!("at {}", graph.describe_op(op)));
    }
    if let Some(help) = help_for(err) {
        diag = diag.with_help(help);
    }
    diag
}

/// Resolves diagnostic locations against a graph.
pub struct GraphLocs<'a>(pub &'a Graph);

impl LocResolver for GraphLocs<'_> {
    fn describe(&self, loc: Loc) -> Option<String> {
        let op = OpId::from_raw(loc.op_index()?);
        self.0
            .contains_op(op)
            .then(|| self.0.describe_op(op))
    }
}
