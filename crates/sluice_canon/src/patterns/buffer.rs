//! Buffer folding and elimination.

use sluice_common::SluiceResult;
use sluice_config::CanonConfig;
use sluice_ir::buffer::MIN_DATAFLOW_DEPTH;
use sluice_ir::{Graph, OpId, OpKind};

use crate::dce::erase_dead_producers;
use crate::RewritePattern;

/// `buffer(buffer(x, d1, L), d2, L)` becomes `buffer(x, d1 + d2, L)` when the
/// inner buffer feeds nothing else and the sum stays within
/// `max_buffer_depth`.
pub struct BufferChainFold;

impl RewritePattern for BufferChainFold {
    fn name(&self) -> &'static str {
        "buffer-chain"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        matches!(kind, OpKind::DataflowBuffer { .. })
    }

    fn rewrite(&self, graph: &mut Graph, op: OpId, config: &CanonConfig) -> SluiceResult<bool> {
        let OpKind::DataflowBuffer { depth: outer_depth, level } = graph.op(op).kind else {
            return Ok(false);
        };
        let Some(&middle) = graph.op(op).operands.first() else {
            return Ok(false);
        };
        let Some(inner_op) = graph.value(middle).defining_op() else {
            return Ok(false);
        };
        let OpKind::DataflowBuffer {
            depth: inner_depth,
            level: inner_level,
        } = graph.op(inner_op).kind
        else {
            return Ok(false);
        };
        if inner_level != level || graph.value(middle).uses.len() != 1 {
            return Ok(false);
        }
        if inner_depth < MIN_DATAFLOW_DEPTH || outer_depth < MIN_DATAFLOW_DEPTH {
            return Ok(false);
        }
        let Some(sum) = inner_depth.checked_add(outer_depth) else {
            return Ok(false);
        };
        if config
            .max_buffer_depth
            .is_some_and(|max| u64::try_from(sum).map_or(true, |s| s > max))
        {
            return Ok(false);
        }
        let Some(&source) = graph.op(inner_op).operands.first() else {
            return Ok(false);
        };

        graph.set_operand(op, 0, source);
        *graph.kind_mut(op) = OpKind::DataflowBuffer { depth: sum, level };
        graph.erase_op(inner_op)?;
        Ok(true)
    }
}

/// A dataflow buffer whose result is never read is erased.
pub struct DeadBufferElim;

impl RewritePattern for DeadBufferElim {
    fn name(&self) -> &'static str {
        "dead-buffer"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        matches!(kind, OpKind::DataflowBuffer { .. })
    }

    fn rewrite(&self, graph: &mut Graph, op: OpId, config: &CanonConfig) -> SluiceResult<bool> {
        if !graph.results_unused(op) {
            return Ok(false);
        }
        let inputs = graph.op(op).operands.clone();
        graph.erase_op(op)?;
        if config.transitive_dce {
            erase_dead_producers(graph, inputs)?;
        }
        Ok(true)
    }
}

/// A depth-1 buffer with exactly one reader is bypassed.
///
/// Gated by `eliminate_unit_buffers` because it removes a pipeline stage.
/// External buffers are kept; they stand in for a free-running source.
pub struct UnitBufferElim;

impl RewritePattern for UnitBufferElim {
    fn name(&self) -> &'static str {
        "unit-buffer"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        matches!(kind, OpKind::DataflowBuffer { depth: 1, .. })
    }

    fn rewrite(&self, graph: &mut Graph, op: OpId, config: &CanonConfig) -> SluiceResult<bool> {
        if !config.eliminate_unit_buffers || graph.is_external(op) {
            return Ok(false);
        }
        let operation = graph.op(op);
        let (&[input], &[output]) = (operation.operands.as_slice(), operation.results.as_slice())
        else {
            return Ok(false);
        };
        if graph.value(output).uses.len() != 1 || graph.value_type(input) != graph.value_type(output)
        {
            return Ok(false);
        }
        graph.replace_all_uses(output, input);
        graph.erase_op(op)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_ir::ValueId;

    fn chain(depths: (i64, i64), levels: (Option<u32>, Option<u32>)) -> (Graph, ValueId, OpId, OpId) {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let x = b.arg(i8);
        let inner = b.buffer(x, depths.0, levels.0);
        let outer = b.buffer(inner, depths.1, levels.1);
        b.opaque("test.use", &[outer], &[], true);
        let inner_op = g.value(inner).defining_op().unwrap();
        let outer_op = g.value(outer).defining_op().unwrap();
        (g, x, inner_op, outer_op)
    }

    #[test]
    fn equal_levels_fold() {
        let (mut g, x, inner, outer) = chain((3, 5), (Some(1), Some(1)));
        assert!(BufferChainFold
            .rewrite(&mut g, outer, &CanonConfig::default())
            .unwrap());
        assert!(g.is_erased(inner));
        assert_eq!(g.op(outer).operands, vec![x]);
        assert_eq!(
            g.op(outer).kind,
            OpKind::DataflowBuffer {
                depth: 8,
                level: Some(1)
            }
        );
    }

    #[test]
    fn different_levels_kept() {
        let (mut g, _, _, outer) = chain((3, 5), (Some(0), Some(1)));
        assert!(!BufferChainFold
            .rewrite(&mut g, outer, &CanonConfig::default())
            .unwrap());
    }

    #[test]
    fn bound_respected() {
        let config = CanonConfig {
            max_buffer_depth: Some(7),
            ..CanonConfig::default()
        };
        let (mut g, _, _, outer) = chain((3, 5), (None, None));
        assert!(!BufferChainFold.rewrite(&mut g, outer, &config).unwrap());

        let config = CanonConfig {
            max_buffer_depth: Some(8),
            ..CanonConfig::default()
        };
        assert!(BufferChainFold.rewrite(&mut g, outer, &config).unwrap());
    }

    #[test]
    fn intervening_reader_blocks_fold() {
        let (mut g, _, inner, outer) = chain((3, 5), (None, None));
        let middle = g.op(inner).results[0];
        g.builder().opaque("test.use", &[middle], &[], true);
        assert!(!BufferChainFold
            .rewrite(&mut g, outer, &CanonConfig::default())
            .unwrap());
    }

    #[test]
    fn invalid_depth_not_folded() {
        let (mut g, _, _, outer) = chain((0, 5), (None, None));
        assert!(!BufferChainFold
            .rewrite(&mut g, outer, &CanonConfig::default())
            .unwrap());
    }

    #[test]
    fn dead_buffer_erased() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let x = b.arg(i8);
        let buf = b.buffer(x, 2, None);
        let op = g.value(buf).defining_op().unwrap();
        assert!(DeadBufferElim
            .rewrite(&mut g, op, &CanonConfig::default())
            .unwrap());
        assert_eq!(g.live_op_count(), 0);
    }

    #[test]
    fn unit_buffer_needs_flag() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let def = b.opaque("test.def", &[], &[i8], false);
        let x = b.graph().op(def).results[0];
        let buf = b.buffer(x, 1, None);
        let user = b.opaque("test.use", &[buf], &[], true);
        let op = g.value(buf).defining_op().unwrap();

        assert!(!UnitBufferElim
            .rewrite(&mut g, op, &CanonConfig::default())
            .unwrap());

        let config = CanonConfig {
            eliminate_unit_buffers: true,
            ..CanonConfig::default()
        };
        assert!(UnitBufferElim.rewrite(&mut g, op, &config).unwrap());
        assert_eq!(g.op(user).operands, vec![x]);
    }

    #[test]
    fn external_unit_buffer_kept() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let x = b.arg(i8);
        let buf = b.buffer(x, 1, None);
        b.opaque("test.use", &[buf], &[], true);
        let op = g.value(buf).defining_op().unwrap();
        let config = CanonConfig {
            eliminate_unit_buffers: true,
            ..CanonConfig::default()
        };
        assert!(!UnitBufferElim.rewrite(&mut g, op, &config).unwrap());
    }
}
