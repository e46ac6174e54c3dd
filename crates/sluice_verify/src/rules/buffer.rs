//! Depth and typing of dataflow and memory buffers.

use sluice_ir::buffer::MIN_DATAFLOW_DEPTH;
use sluice_ir::{Graph, OpId, OpKind, Type, VerifyError};

use crate::VerifyRule;

/// A `dataflow.buffer` has a positive depth and passes its input type
/// through unchanged; a `prim.buffer` has a non-negative depth and a memref
/// result.
pub struct BufferRules;

impl VerifyRule for BufferRules {
    fn name(&self) -> &str {
        "buffer"
    }

    fn description(&self) -> &str {
        "buffer depths are in range and buffer types agree"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        matches!(kind, OpKind::DataflowBuffer { .. } | OpKind::PrimBuffer { .. })
    }

    fn check_op(&self, graph: &Graph, op: OpId, errors: &mut Vec<VerifyError>) {
        let operation = graph.op(op);
        match operation.kind {
            OpKind::DataflowBuffer { depth, .. } => {
                if depth < MIN_DATAFLOW_DEPTH {
                    errors.push(VerifyError::InvalidDepth {
                        op,
                        depth,
                        detail: format!("dataflow buffer depth must be at least {MIN_DATAFLOW_DEPTH}"),
                    });
                }
                if let (Some(&input), Some(&output)) =
                    (operation.operands.first(), operation.results.first())
                {
                    let (in_ty, out_ty) = (graph.value_type(input), graph.value_type(output));
                    if in_ty != out_ty {
                        errors.push(VerifyError::TypeMismatch {
                            op,
                            expected: graph.type_name(in_ty),
                            found: graph.type_name(out_ty),
                        });
                    }
                }
            }
            OpKind::PrimBuffer { depth } => {
                if depth < 0 {
                    errors.push(VerifyError::InvalidDepth {
                        op,
                        depth,
                        detail: "memory buffer depth must not be negative".into(),
                    });
                }
                if let Some(&result) = operation.results.first() {
                    let ty = graph.value_type(result);
                    if !matches!(graph.types.get(ty), Type::MemRef { .. }) {
                        errors.push(VerifyError::TypeMismatch {
                            op,
                            expected: "a memref".into(),
                            found: graph.type_name(ty),
                        });
                    }
                }
            }
            _ => {}
        }
    }
}
