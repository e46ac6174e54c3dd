//! Dataflow node queries: the terminator and the boundary cut-set.
//!
//! Nothing here is cached. Each call walks the node body as it is now, so the
//! answers stay correct across any mutation.

use crate::graph::Graph;
use crate::ids::{OpId, RegionId, ValueId};
use crate::op::OpKind;
use sluice_common::{InternalError, SluiceResult};
use std::collections::HashSet;

impl Graph {
    /// Returns the body region of a `dataflow.node`.
    pub fn node_body(&self, node: OpId) -> Option<RegionId> {
        let operation = self.op(node);
        if operation.kind.is_node() {
            operation.regions.first().copied()
        } else {
            None
        }
    }

    /// Returns the node's `dataflow.output` terminator.
    ///
    /// A verified node always has one; failing here means a transform broke
    /// the graph, so the error is internal rather than a [`VerifyError`](crate::VerifyError).
    pub fn output_op(&self, node: OpId) -> SluiceResult<OpId> {
        let body = self
            .node_body(node)
            .ok_or_else(|| InternalError::at(self.loc(node), format!("{node} is not a dataflow.node")))?;
        self.region(body)
            .single_block()
            .and_then(|block| block.ops.last())
            .copied()
            .filter(|&last| matches!(self.op(last).kind, OpKind::DataflowOutput))
            .ok_or_else(|| {
                InternalError::at(self.loc(node), format!("node {node} has no dataflow.output terminator"))
            })
    }

    /// Returns every `(value, user)` pair where `value` is defined inside the
    /// node body and `user` lies outside it.
    ///
    /// The node's own results are defined by the node itself, not inside its
    /// body, and are not part of the cut-set.
    pub fn dataflow_uses(&self, node: OpId) -> Vec<(ValueId, OpId)> {
        let Some(body) = self.node_body(node) else {
            return Vec::new();
        };
        let mut defined: Vec<ValueId> = Vec::new();
        for op in self.walk(body) {
            let operation = self.op(op);
            for &region in &operation.regions {
                for block in &self.region(region).blocks {
                    defined.extend(&block.args);
                }
            }
            defined.extend(&operation.results);
        }
        for block in &self.region(body).blocks {
            defined.extend(&block.args);
        }

        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for value in defined {
            for user in self.users(value) {
                if !self.op_within(user, body) && seen.insert((value, user)) {
                    pairs.push((value, user));
                }
            }
        }
        pairs
    }

    /// Returns every `(value, user)` pair where `user` lies inside the node
    /// body and `value` is defined outside it.
    pub fn dataflow_inputs(&self, node: OpId) -> Vec<(ValueId, OpId)> {
        let Some(body) = self.node_body(node) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for op in self.walk(body) {
            for &value in &self.op(op).operands {
                if !self.value_within(value, body) && seen.insert((value, op)) {
                    pairs.push((value, op));
                }
            }
        }
        pairs
    }

    /// Returns the nodes placed directly in `region`, in program order.
    pub fn nodes_in(&self, region: RegionId) -> Vec<OpId> {
        self.region(region)
            .blocks
            .iter()
            .flat_map(|block| block.ops.iter().copied())
            .filter(|&op| self.op(op).kind.is_node())
            .collect()
    }

    /// Returns the ancestor of `op` (or `op` itself) that sits directly in
    /// `region`.
    pub fn ancestor_in(&self, op: OpId, region: RegionId) -> Option<OpId> {
        let mut current = op;
        loop {
            let block = self.parent_block(current)?;
            if block.region == region {
                return Some(current);
            }
            current = self.region(block.region).parent?;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::Graph;

    #[test]
    fn output_op_found() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let x = b.arg(i8);
        let node = b.node(&[i8], None);
        b.enter(node.body);
        let out = b.output(&[x]);
        b.exit();
        assert_eq!(g.output_op(node.op).unwrap(), out);
    }

    #[test]
    fn output_op_missing_is_internal_error() {
        let mut g = Graph::new();
        let mut b = g.builder();
        let node = b.node(&[], None);
        let err = g.output_op(node.op).unwrap_err();
        assert!(err.to_string().contains("no dataflow.output"));
    }

    #[test]
    fn output_op_on_non_node() {
        let mut g = Graph::new();
        let mut b = g.builder();
        let src = b.source();
        assert!(g.output_op(src).is_err());
    }

    #[test]
    fn dataflow_uses_exact_cut() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let node = b.node(&[], None);
        b.enter(node.body);
        let d1 = b.opaque("test.def", &[], &[i8], false);
        let v1 = b.graph().op(d1).results[0];
        let d2 = b.opaque("test.def", &[], &[i8], false);
        let v2 = b.graph().op(d2).results[0];
        b.opaque("test.use", &[v1], &[], false);
        b.output(&[]);
        b.exit();
        let outside = b.opaque("test.use", &[v2], &[], true);
        assert_eq!(g.dataflow_uses(node.op), vec![(v2, outside)]);
    }

    #[test]
    fn dataflow_uses_reflects_mutation() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let x = b.arg(i8);
        let node = b.node(&[], None);
        b.enter(node.body);
        let d = b.opaque("test.def", &[], &[i8], false);
        let v = b.graph().op(d).results[0];
        b.output(&[]);
        b.exit();
        let outside = b.opaque("test.use", &[v], &[], true);
        assert_eq!(g.dataflow_uses(node.op).len(), 1);
        g.set_operand(outside, 0, x);
        assert!(g.dataflow_uses(node.op).is_empty());
    }

    #[test]
    fn dataflow_inputs_lists_captures() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let x = b.arg(i8);
        let node = b.node(&[i8], None);
        b.enter(node.body);
        let c = b.cast(x, i8);
        let out = b.output(&[c]);
        b.exit();
        let cast_op = g.value(c).defining_op().unwrap();
        assert_eq!(g.dataflow_inputs(node.op), vec![(x, cast_op)]);
        assert_ne!(cast_op, out);
    }

    #[test]
    fn ancestor_and_nodes_in() {
        let mut g = Graph::new();
        let mut b = g.builder();
        let node = b.node(&[], None);
        b.enter(node.body);
        let out = b.output(&[]);
        b.exit();
        let sink = b.sink();
        let body = g.body();
        assert_eq!(g.nodes_in(body), vec![node.op]);
        assert_eq!(g.ancestor_in(out, body), Some(node.op));
        assert_eq!(g.ancestor_in(sink, body), Some(sink));
        assert_eq!(g.ancestor_in(out, node.body), Some(out));
        assert_eq!(g.ancestor_in(node.op, node.body), None);
    }
}
