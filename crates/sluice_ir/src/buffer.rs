//! Buffer attribute queries and the externality predicate.

use crate::graph::Graph;
use crate::ids::OpId;
use crate::op::OpKind;

/// Smallest legal depth of a `dataflow.buffer`.
pub const MIN_DATAFLOW_DEPTH: i64 = 1;

impl Graph {
    /// Returns the depth of a `dataflow.buffer` or `prim.buffer`.
    pub fn buffer_depth(&self, op: OpId) -> Option<i64> {
        match self.op(op).kind {
            OpKind::DataflowBuffer { depth, .. } | OpKind::PrimBuffer { depth } => Some(depth),
            _ => None,
        }
    }

    /// Returns the pipeline level of a node or dataflow buffer.
    pub fn level(&self, op: OpId) -> Option<u32> {
        match self.op(op).kind {
            OpKind::DataflowBuffer { level, .. } | OpKind::DataflowNode { level } => level,
            _ => None,
        }
    }

    /// Returns `true` if `op` is a dataflow buffer whose input is not produced
    /// by any op in the graph, so the buffer acts as a free-running source.
    pub fn is_external(&self, op: OpId) -> bool {
        let operation = self.op(op);
        matches!(operation.kind, OpKind::DataflowBuffer { .. })
            && operation
                .operands
                .first()
                .is_some_and(|&input| self.value(input).is_block_arg())
    }
}
