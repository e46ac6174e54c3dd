//! Cast folding.

use sluice_common::SluiceResult;
use sluice_config::CanonConfig;
use sluice_ir::{CastDirection, Graph, OpId, OpKind};

use crate::dce::erase_dead_producers;
use crate::RewritePattern;

/// `prim.cast x : T -> T` is replaced by `x`.
pub struct IdentityCastFold;

impl RewritePattern for IdentityCastFold {
    fn name(&self) -> &'static str {
        "identity-cast"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        matches!(kind, OpKind::PrimCast)
    }

    fn rewrite(&self, graph: &mut Graph, op: OpId, config: &CanonConfig) -> SluiceResult<bool> {
        let operation = graph.op(op);
        let (&[input], &[output]) = (operation.operands.as_slice(), operation.results.as_slice())
        else {
            return Ok(false);
        };
        if graph.value_type(input) != graph.value_type(output) {
            return Ok(false);
        }
        graph.replace_all_uses(output, input);
        graph.erase_op(op)?;
        if config.transitive_dce {
            erase_dead_producers(graph, vec![input])?;
        }
        Ok(true)
    }
}

/// `cast(cast(x : A -> B) : B -> C)` becomes `cast(x : A -> C)` when both
/// casts widen or both narrow.
///
/// Mixed chains are left alone: narrowing after a widening can discard bits
/// the direct cast would keep, and vice versa.
pub struct CastChainFold;

impl RewritePattern for CastChainFold {
    fn name(&self) -> &'static str {
        "cast-chain"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        matches!(kind, OpKind::PrimCast)
    }

    fn rewrite(&self, graph: &mut Graph, op: OpId, config: &CanonConfig) -> SluiceResult<bool> {
        let Ok(outer) = graph.cast_direction(op) else {
            return Ok(false);
        };
        let middle = graph.op(op).operands[0];
        let Some(inner_op) = graph.value(middle).defining_op() else {
            return Ok(false);
        };
        let Ok(inner) = graph.cast_direction(inner_op) else {
            return Ok(false);
        };
        let monotone = matches!(
            (inner, outer),
            (CastDirection::Widen, CastDirection::Widen)
                | (CastDirection::Narrow, CastDirection::Narrow)
        );
        if !monotone {
            return Ok(false);
        }
        let source = graph.op(inner_op).operands[0];
        graph.set_operand(op, 0, source);
        if !graph.value(middle).has_uses() {
            graph.erase_op(inner_op)?;
            if config.transitive_dce {
                erase_dead_producers(graph, vec![source])?;
            }
        }
        Ok(true)
    }
}
