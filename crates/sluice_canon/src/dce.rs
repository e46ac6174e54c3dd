//! Transitive removal of pure producers whose results became unused.

use sluice_common::SluiceResult;
use sluice_ir::{Graph, ValueId};

/// Erases the producers of `seeds` that are now dead, then their producers,
/// and so on. Returns the number of erased ops.
///
/// Only pure ops are touched. A node is additionally kept while anything
/// outside it reads a value defined in its body.
pub(crate) fn erase_dead_producers(graph: &mut Graph, seeds: Vec<ValueId>) -> SluiceResult<usize> {
    let mut worklist = seeds;
    let mut erased = 0;
    while let Some(value) = worklist.pop() {
        if graph.value(value).has_uses() {
            continue;
        }
        let Some(def) = graph.value(value).defining_op() else {
            continue;
        };
        if graph.is_erased(def) || !graph.is_pure(def) || !graph.results_unused(def) {
            continue;
        }
        let mut inputs = graph.op(def).operands.clone();
        if graph.op(def).kind.is_node() {
            if !graph.dataflow_uses(def).is_empty() {
                continue;
            }
            inputs.extend(graph.dataflow_inputs(def).into_iter().map(|(v, _)| v));
        }
        graph.erase_op(def)?;
        erased += 1;
        worklist.extend(inputs);
    }
    Ok(erased)
}
