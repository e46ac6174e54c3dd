//! Stream channel queries.
//!
//! Writers and readers are derived from the channel value's use-list every
//! time, so they always reflect the current graph.

use crate::graph::Graph;
use crate::ids::{OpId, TypeId, ValueId};
use crate::op::OpKind;

/// Operand slot of the channel in `stream.read` and `stream.write`.
pub const CHANNEL_OPERAND: u32 = 0;

impl Graph {
    /// Returns every `stream.write` into `channel`, in use order.
    pub fn channel_writers(&self, channel: ValueId) -> Vec<OpId> {
        self.channel_users(channel, |kind| matches!(kind, OpKind::StreamWrite))
    }

    /// Returns every `stream.read` from `channel`, in use order.
    pub fn channel_readers(&self, channel: ValueId) -> Vec<OpId> {
        self.channel_users(channel, |kind| matches!(kind, OpKind::StreamRead))
    }

    fn channel_users(&self, channel: ValueId, want: impl Fn(&OpKind) -> bool) -> Vec<OpId> {
        self.value(channel)
            .uses
            .iter()
            .filter(|u| u.operand == CHANNEL_OPERAND && want(&self.op(u.op).kind))
            .map(|u| u.op)
            .collect()
    }

    /// Returns the element type carried by `channel`, or `None` if it is not a stream.
    pub fn channel_element(&self, channel: ValueId) -> Option<TypeId> {
        self.types.stream_element(self.value_type(channel))
    }

    /// Returns the channel value a `stream.read` or `stream.write` operates on.
    pub fn stream_channel_of(&self, op: OpId) -> Option<ValueId> {
        let operation = self.op(op);
        match operation.kind {
            OpKind::StreamRead | OpKind::StreamWrite => operation.operands.first().copied(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::Graph;

    #[test]
    fn writers_and_readers_are_tracked() {
        let mut g = Graph::new();
        let i16 = g.int_type(16);
        let mut b = g.builder();
        let v = b.arg(i16);
        let ch = b.channel(i16);
        let w = b.write(ch, v).unwrap();
        b.read(ch);
        let r2 = b.read_discard(ch);
        assert_eq!(g.channel_writers(ch), vec![w]);
        assert_eq!(g.channel_readers(ch).len(), 2);
        assert_eq!(g.channel_readers(ch)[1], r2);
        assert_eq!(g.channel_element(ch), Some(i16));
        assert_eq!(g.stream_channel_of(w), Some(ch));
    }

    #[test]
    fn value_operand_of_write_is_not_a_channel_use() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let s = g.stream_type(i8);
        let mut b = g.builder();
        // A stream value written as data into a channel of streams.
        let outer = b.channel(s);
        let inner = b.arg(s);
        b.write(outer, inner).unwrap();
        assert!(g.channel_writers(inner).is_empty());
        assert_eq!(g.channel_writers(outer).len(), 1);
    }

    #[test]
    fn non_stream_has_no_element() {
        let mut g = Graph::new();
        let i8 = g.int_type(8);
        let mut b = g.builder();
        let v = b.arg(i8);
        assert_eq!(g.channel_element(v), None);
    }
}
