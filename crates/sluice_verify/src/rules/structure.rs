//! Arity and terminator placement for every op kind.

use sluice_ir::{Graph, OpId, OpKind, VerifyError};

use crate::VerifyRule;

/// Checks operand, result and region counts against the kind's signature,
/// and that `dataflow.output` only appears as the last op of a node body.
pub struct Structure;

impl VerifyRule for Structure {
    fn name(&self) -> &str {
        "structure"
    }

    fn description(&self) -> &str {
        "operand, result and region counts match the op kind"
    }

    fn applies_to(&self, _kind: &OpKind) -> bool {
        true
    }

    fn check_op(&self, graph: &Graph, op: OpId, errors: &mut Vec<VerifyError>) {
        let operation = graph.op(op);
        let sig = operation.kind.signature();
        let malformed = |detail: String| VerifyError::Malformed {
            op,
            name: operation.kind.name().to_string(),
            detail,
        };

        if !sig.operands.admits(operation.operands.len()) {
            errors.push(malformed(format!(
                "expected {} operands, found {}",
                sig.operands,
                operation.operands.len()
            )));
        }
        if !sig.results.admits(operation.results.len()) {
            errors.push(malformed(format!(
                "expected {} results, found {}",
                sig.results,
                operation.results.len()
            )));
        }
        if operation.regions.len() != sig.regions {
            errors.push(malformed(format!(
                "expected {} regions, found {}",
                sig.regions,
                operation.regions.len()
            )));
        }

        if operation.kind.is_terminator() {
            let in_node = graph
                .parent_op(op)
                .is_some_and(|parent| graph.op(parent).kind.is_node());
            if !in_node {
                errors.push(malformed("must be nested directly in a `dataflow.node`".into()));
            }
            let is_last = graph
                .parent_block(op)
                .is_some_and(|block| graph.block(block).ops.last() == Some(&op));
            if !is_last {
                errors.push(malformed("must be the last op of its block".into()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(graph: &Graph, op: OpId) -> Vec<VerifyError> {
        let mut errors = Vec::new();
        Structure.check_op(graph, op, &mut errors);
        errors
    }

    #[test]
    fn well_formed_mul_passes() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let i16 = g.int_type(16);
        let mut b = g.builder();
        let x = b.arg(i8);
        let y = b.arg(i8);
        let p = b.mul(x, y, i16);
        let op = g.value(p).defining_op().unwrap();
        assert!(check(&g, op).is_empty());
    }

    #[test]
    fn wrong_operand_count_is_malformed() {
        let mut g = Graph::new();
        let i16 = g.int_type(16);
        let mut b = g.builder();
        let op = b.create(OpKind::PrimMul, &[], &[i16]);
        let errors = check(&g, op);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("expected exactly 2 operands, found 0"));
    }

    #[test]
    fn output_at_top_level_is_malformed() {
        let mut g = Graph::new();
        let mut b = g.builder();
        let out = b.output(&[]);
        let errors = check(&g, out);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], VerifyError::Malformed { .. }));
    }

    #[test]
    fn output_not_last_is_malformed() {
        let mut g = Graph::new();
        let mut b = g.builder();
        let node = b.node(&[], None);
        b.enter(node.body);
        let out = b.output(&[]);
        b.sink();
        b.exit();
        let errors = check(&g, out);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("last op"));
    }

    #[test]
    fn discarding_read_is_well_formed() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let ch = b.channel(i8);
        let r = b.read_discard(ch);
        assert!(check(&g, r).is_empty());
    }
}
