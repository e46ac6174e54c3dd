//! Node elimination and inlining.

use sluice_common::SluiceResult;
use sluice_config::CanonConfig;
use sluice_ir::{Graph, OpId, OpKind};

use crate::dce::erase_dead_producers;
use crate::RewritePattern;

/// A pure node whose results and body values are all unread is erased.
pub struct DeadNodeElim;

impl RewritePattern for DeadNodeElim {
    fn name(&self) -> &'static str {
        "dead-node"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        kind.is_node()
    }

    fn rewrite(&self, graph: &mut Graph, op: OpId, config: &CanonConfig) -> SluiceResult<bool> {
        if !graph.is_pure(op) || !graph.results_unused(op) || !graph.dataflow_uses(op).is_empty() {
            return Ok(false);
        }
        let inputs: Vec<_> = graph
            .dataflow_inputs(op)
            .into_iter()
            .map(|(value, _)| value)
            .collect();
        graph.erase_op(op)?;
        if config.transitive_dce {
            erase_dead_producers(graph, inputs)?;
        }
        Ok(true)
    }
}

/// A level-free node wrapping exactly one region-free op is replaced by that
/// op, placed where the node was.
///
/// Gated by `inline_single_op_nodes`; a node with a level carries scheduling
/// intent and is never inlined.
pub struct SingleOpNodeInline;

impl RewritePattern for SingleOpNodeInline {
    fn name(&self) -> &'static str {
        "inline-node"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        matches!(kind, OpKind::DataflowNode { level: None })
    }

    fn rewrite(&self, graph: &mut Graph, op: OpId, config: &CanonConfig) -> SluiceResult<bool> {
        if !config.inline_single_op_nodes {
            return Ok(false);
        }
        let Some(body) = graph.node_body(op) else {
            return Ok(false);
        };
        let Some(block) = graph.region(body).single_block() else {
            return Ok(false);
        };
        // Block arguments have no meaning once the op leaves the body.
        if !block.args.is_empty() {
            return Ok(false);
        }
        let &[inner, terminator] = block.ops.as_slice() else {
            return Ok(false);
        };
        if !graph.op(inner).regions.is_empty()
            || graph.op(inner).kind.is_terminator()
            || !matches!(graph.op(terminator).kind, OpKind::DataflowOutput)
            || graph
                .op(inner)
                .operands
                .iter()
                .any(|&operand| graph.value_within(operand, body))
        {
            return Ok(false);
        }
        let results = graph.op(op).results.clone();
        let yielded = graph.op(terminator).operands.clone();
        if results.len() != yielded.len()
            || results
                .iter()
                .zip(&yielded)
                .any(|(&r, &y)| graph.value_type(r) != graph.value_type(y))
        {
            return Ok(false);
        }

        graph.move_before(inner, op)?;
        for (result, value) in results.into_iter().zip(yielded) {
            graph.replace_all_uses(result, value);
        }
        graph.erase_op(op)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_unused_node_erased() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let i16 = g.int_type(16);
        let mut b = g.builder();
        let x = b.arg(i8);
        let node = b.node(&[i16], None);
        b.enter(node.body);
        let y = b.cast(x, i16);
        b.output(&[y]);
        b.exit();
        assert!(DeadNodeElim
            .rewrite(&mut g, node.op, &CanonConfig::default())
            .unwrap());
        assert_eq!(g.live_op_count(), 0);
    }

    #[test]
    fn side_effecting_node_kept() {
        let mut g = Graph::new();
        let mut b = g.builder();
        let node = b.node(&[], None);
        b.enter(node.body);
        b.sink();
        b.output(&[]);
        b.exit();
        assert!(!DeadNodeElim
            .rewrite(&mut g, node.op, &CanonConfig::default())
            .unwrap());
    }

    #[test]
    fn node_with_live_result_kept() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let x = b.arg(i8);
        let node = b.node(&[i8], None);
        b.enter(node.body);
        b.output(&[x]);
        b.exit();
        b.opaque("test.use", &[node.results[0]], &[], true);
        assert!(!DeadNodeElim
            .rewrite(&mut g, node.op, &CanonConfig::default())
            .unwrap());
    }

    #[test]
    fn escaping_body_value_keeps_node() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let x = b.arg(i8);
        let node = b.node(&[], None);
        b.enter(node.body);
        let y = b.cast(x, i8);
        b.output(&[]);
        b.exit();
        b.opaque("test.use", &[y], &[], true);
        assert!(!DeadNodeElim
            .rewrite(&mut g, node.op, &CanonConfig::default())
            .unwrap());
    }

    #[test]
    fn single_op_node_inlined_when_enabled() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let i16 = g.int_type(16);
        let mut b = g.builder();
        let x = b.arg(i8);
        let node = b.node(&[i16], None);
        b.enter(node.body);
        let y = b.cast(x, i16);
        b.output(&[y]);
        b.exit();
        let user = b.opaque("test.use", &[node.results[0]], &[], true);
        let cast = g.value(y).defining_op().unwrap();

        assert!(!SingleOpNodeInline
            .rewrite(&mut g, node.op, &CanonConfig::default())
            .unwrap());

        let config = CanonConfig {
            inline_single_op_nodes: true,
            ..CanonConfig::default()
        };
        assert!(SingleOpNodeInline.rewrite(&mut g, node.op, &config).unwrap());
        assert!(g.is_erased(node.op));
        assert_eq!(g.op(user).operands, vec![y]);
        assert_eq!(g.block(g.body_block()).ops, vec![cast, user]);
    }

    #[test]
    fn node_reading_its_own_block_arg_not_inlined() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let node = b.node(&[i8], None);
        b.enter(node.body);
        let arg = b.arg(i8);
        let inner = b.opaque("test.op", &[arg], &[i8], false);
        let y = b.graph().op(inner).results[0];
        b.output(&[y]);
        b.exit();
        let user = b.opaque("test.use", &[node.results[0]], &[], true);
        let before = crate::fingerprint(&g).unwrap();

        let config = CanonConfig {
            inline_single_op_nodes: true,
            ..CanonConfig::default()
        };
        assert!(!SingleOpNodeInline.rewrite(&mut g, node.op, &config).unwrap());
        assert!(!g.is_erased(node.op));
        assert_eq!(g.parent_op(inner), Some(node.op));
        assert_eq!(g.op(user).operands, vec![node.results[0]]);
        assert_eq!(crate::fingerprint(&g).unwrap(), before);
    }

    #[test]
    fn leveled_node_not_inlined() {
        let kind = OpKind::DataflowNode { level: Some(0) };
        assert!(!SingleOpNodeInline.applies_to(&kind));
    }
}
