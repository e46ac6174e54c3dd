//! Node body shape and the terminator signature.

use sluice_ir::{Graph, OpId, OpKind, VerifyError};

use crate::VerifyRule;

/// A node body is one block ending in `dataflow.output`, whose operands match
/// the node's results pairwise.
pub struct NodeTerminator;

impl VerifyRule for NodeTerminator {
    fn name(&self) -> &str {
        "node-terminator"
    }

    fn description(&self) -> &str {
        "node bodies are one block terminated by a matching dataflow.output"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        kind.is_node()
    }

    fn check_op(&self, graph: &Graph, op: OpId, errors: &mut Vec<VerifyError>) {
        let Some(body) = graph.node_body(op) else {
            return;
        };
        let region = graph.region(body);
        let Some(block) = region.single_block() else {
            errors.push(VerifyError::MultiBlockRegion {
                op,
                blocks: region.blocks.len(),
            });
            return;
        };
        let Some(&last) = block
            .ops
            .last()
            .filter(|&&last| matches!(graph.op(last).kind, OpKind::DataflowOutput))
        else {
            errors.push(VerifyError::MissingTerminator { op });
            return;
        };

        let results = &graph.op(op).results;
        let outputs = &graph.op(last).operands;
        if results.len() != outputs.len() {
            errors.push(VerifyError::ResultMismatch {
                op,
                detail: format!(
                    "node declares {} results but its output yields {}",
                    results.len(),
                    outputs.len()
                ),
            });
            return;
        }
        for (position, (&result, &output)) in results.iter().zip(outputs).enumerate() {
            let (declared, yielded) = (graph.value_type(result), graph.value_type(output));
            if declared != yielded {
                errors.push(VerifyError::ResultMismatch {
                    op,
                    detail: format!(
                        "result {position} is declared {} but the output yields {}",
                        graph.type_name(declared),
                        graph.type_name(yielded)
                    ),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(graph: &Graph, op: OpId) -> Vec<VerifyError> {
        let mut errors = Vec::new();
        NodeTerminator.check_op(graph, op, &mut errors);
        errors
    }

    #[test]
    fn matching_output_passes() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let x = b.arg(i8);
        let node = b.node(&[i8], None);
        b.enter(node.body);
        b.output(&[x]);
        b.exit();
        assert!(check(&g, node.op).is_empty());
    }

    #[test]
    fn empty_body_missing_terminator() {
        let mut g = Graph::new();
        let mut b = g.builder();
        let node = b.node(&[], None);
        assert_eq!(check(&g, node.op), vec![VerifyError::MissingTerminator { op: node.op }]);
    }

    #[test]
    fn two_blocks_rejected() {
        let mut g = Graph::new();
        let mut b = g.builder();
        let node = b.node(&[], None);
        b.enter(node.body);
        b.output(&[]);
        b.exit();
        g.add_block(node.body);
        assert_eq!(
            check(&g, node.op),
            vec![VerifyError::MultiBlockRegion {
                op: node.op,
                blocks: 2
            }]
        );
    }

    #[test]
    fn arity_mismatch() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let node = b.node(&[i8, i8], None);
        let x = b.arg(i8);
        b.enter(node.body);
        b.output(&[x]);
        b.exit();
        assert_eq!(check(&g, node.op)[0].kind_name(), "ResultMismatch");
    }

    #[test]
    fn type_mismatch_per_position() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let i16 = g.int_type(16);
        let mut b = g.builder();
        let x = b.arg(i8);
        let y = b.arg(i8);
        let node = b.node(&[i8, i16], None);
        b.enter(node.body);
        b.output(&[x, y]);
        b.exit();
        let errors = check(&g, node.op);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("result 1 is declared i16"));
    }
}
