//! Insertion-point builder for constructing graphs.
//!
//! The builder appends to a current block. `enter`/`exit` push and pop the
//! insertion point so node bodies can be filled in place. Apart from the
//! single-writer check on [`Builder::write`], nothing is validated here.

use crate::const_value::ConstValue;
use crate::error::VerifyError;
use crate::graph::Graph;
use crate::ids::{OpId, RegionId, TypeId, ValueId};
use crate::op::OpKind;
use crate::region::BlockRef;

/// Handles returned by [`Builder::node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeParts {
    /// The `dataflow.node` op.
    pub op: OpId,
    /// Its body region.
    pub body: RegionId,
    /// Its results, one per requested type.
    pub results: Vec<ValueId>,
}

/// Appends ops to a block of a [`Graph`].
pub struct Builder<'g> {
    graph: &'g mut Graph,
    current: BlockRef,
    saved: Vec<BlockRef>,
}

impl Graph {
    /// Returns a builder appending to the graph's entry block.
    pub fn builder(&mut self) -> Builder<'_> {
        let entry = self.body_block();
        Builder::at(self, entry)
    }

    /// Returns a builder appending to `block`.
    pub fn builder_at(&mut self, block: BlockRef) -> Builder<'_> {
        Builder::at(self, block)
    }
}

impl<'g> Builder<'g> {
    /// Creates a builder appending to `block`.
    pub fn at(graph: &'g mut Graph, block: BlockRef) -> Self {
        Self {
            graph,
            current: block,
            saved: Vec::new(),
        }
    }

    /// The graph being built.
    pub fn graph(&self) -> &Graph {
        &*self.graph
    }

    /// Mutable access to the graph, for edits the builder has no helper for.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut *self.graph
    }

    /// The block new ops are appended to.
    pub fn block(&self) -> BlockRef {
        self.current
    }

    /// Moves the insertion point to the first block of `region`.
    pub fn enter(&mut self, region: RegionId) {
        self.enter_block(BlockRef { region, index: 0 });
    }

    /// Moves the insertion point to `block`, remembering the previous one.
    pub fn enter_block(&mut self, block: BlockRef) {
        self.saved.push(self.current);
        self.current = block;
    }

    /// Restores the insertion point saved by the matching `enter`.
    pub fn exit(&mut self) {
        if let Some(previous) = self.saved.pop() {
            self.current = previous;
        }
    }

    /// Appends an arbitrary op. Used for ops with no dedicated helper and for
    /// building deliberately malformed graphs.
    pub fn create(&mut self, kind: OpKind, operands: &[ValueId], result_types: &[TypeId]) -> OpId {
        self.graph
            .create_op(kind, operands, result_types, self.current)
    }

    fn create_value(&mut self, kind: OpKind, operands: &[ValueId], ty: TypeId) -> ValueId {
        let op = self.create(kind, operands, &[ty]);
        self.graph.op(op).results[0]
    }

    /// Adds an argument to the current block.
    pub fn arg(&mut self, ty: TypeId) -> ValueId {
        self.graph.add_block_arg(self.current, ty)
    }

    /// Declares a channel of `element`s and returns the channel value.
    pub fn channel(&mut self, element: TypeId) -> ValueId {
        let ty = self.graph.stream_type(element);
        self.create_value(OpKind::StreamChannel, &[], ty)
    }

    /// Writes `value` into `channel`.
    ///
    /// Fails with [`VerifyError::MultipleWriters`] if the channel already has
    /// a writer; the graph is left unchanged in that case.
    pub fn write(&mut self, channel: ValueId, value: ValueId) -> Result<OpId, VerifyError> {
        let writers = self.graph.channel_writers(channel);
        if let Some(&first) = writers.first() {
            return Err(VerifyError::MultipleWriters {
                op: first,
                channel,
                count: writers.len() + 1,
            });
        }
        Ok(self.create(OpKind::StreamWrite, &[channel, value], &[]))
    }

    /// Reads one element from `channel`.
    ///
    /// The result takes the channel's element type. A non-stream operand is
    /// accepted and left for the verifier to report.
    pub fn read(&mut self, channel: ValueId) -> ValueId {
        let ty = self
            .graph
            .channel_element(channel)
            .unwrap_or_else(|| self.graph.value_type(channel));
        self.create_value(OpKind::StreamRead, &[channel], ty)
    }

    /// Pops one element from `channel` and drops it.
    pub fn read_discard(&mut self, channel: ValueId) -> OpId {
        self.create(OpKind::StreamRead, &[channel], &[])
    }

    /// Inserts a dataflow buffer after `input`.
    pub fn buffer(&mut self, input: ValueId, depth: i64, level: Option<u32>) -> ValueId {
        let ty = self.graph.value_type(input);
        self.create_value(OpKind::DataflowBuffer { depth, level }, &[input], ty)
    }

    /// Creates an empty node. Fill its body with [`enter`](Self::enter) and
    /// finish it with [`output`](Self::output).
    pub fn node(&mut self, result_types: &[TypeId], level: Option<u32>) -> NodeParts {
        let op = self.create(OpKind::DataflowNode { level }, &[], result_types);
        let operation = self.graph.op(op);
        NodeParts {
            op,
            body: operation.regions[0],
            results: operation.results.clone(),
        }
    }

    /// Terminates the current node body.
    pub fn output(&mut self, values: &[ValueId]) -> OpId {
        self.create(OpKind::DataflowOutput, values, &[])
    }

    /// Appends a `dataflow.source` boundary marker.
    pub fn source(&mut self) -> OpId {
        self.create(OpKind::DataflowSource, &[], &[])
    }

    /// Appends a `dataflow.sink` boundary marker.
    pub fn sink(&mut self) -> OpId {
        self.create(OpKind::DataflowSink, &[], &[])
    }

    /// `prim.mul lhs, rhs : ty`.
    pub fn mul(&mut self, lhs: ValueId, rhs: ValueId, ty: TypeId) -> ValueId {
        self.create_value(OpKind::PrimMul, &[lhs, rhs], ty)
    }

    /// `prim.buffer` of the given depth.
    pub fn prim_buffer(&mut self, depth: i64, ty: TypeId) -> ValueId {
        self.create_value(OpKind::PrimBuffer { depth }, &[], ty)
    }

    /// `prim.const` holding `value`.
    pub fn constant(&mut self, value: ConstValue, ty: TypeId) -> ValueId {
        self.create_value(OpKind::PrimConst { value }, &[], ty)
    }

    /// `prim.cast input : ty`.
    pub fn cast(&mut self, input: ValueId, ty: TypeId) -> ValueId {
        self.create_value(OpKind::PrimCast, &[input], ty)
    }

    /// An op from outside the dataflow dialects.
    pub fn opaque(
        &mut self,
        name: &str,
        operands: &[ValueId],
        result_types: &[TypeId],
        side_effects: bool,
    ) -> OpId {
        let kind = OpKind::Opaque {
            name: name.to_string(),
            side_effects,
        };
        self.create(kind, operands, result_types)
    }
}
