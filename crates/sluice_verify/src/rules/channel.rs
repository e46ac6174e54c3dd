//! Single-writer discipline and element typing of stream channels.

use sluice_ir::{Graph, OpId, OpKind, VerifyError};

use crate::VerifyRule;

/// Every declared channel has exactly one writer.
///
/// A channel with no writer is dangling. With several writers the error is
/// anchored on the second one, the first write that broke the discipline.
pub struct ChannelDiscipline;

impl VerifyRule for ChannelDiscipline {
    fn name(&self) -> &str {
        "channel-discipline"
    }

    fn description(&self) -> &str {
        "each declared stream channel is written exactly once"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        matches!(kind, OpKind::StreamChannel)
    }

    fn check_op(&self, graph: &Graph, op: OpId, errors: &mut Vec<VerifyError>) {
        let Some(&channel) = graph.op(op).results.first() else {
            return;
        };
        let writers = graph.channel_writers(channel);
        match writers.as_slice() {
            [] => errors.push(VerifyError::DanglingChannel { op, channel }),
            [_] => {}
            [_, second, ..] => errors.push(VerifyError::MultipleWriters {
                op: *second,
                channel,
                count: writers.len(),
            }),
        }
    }
}

/// Reads and writes go through a stream whose element type matches the
/// transferred value.
///
/// Streams that arrive as block arguments are written outside the graph, so
/// only a second internal writer is reported for them.
pub struct StreamAccess;

impl VerifyRule for StreamAccess {
    fn name(&self) -> &str {
        "stream-access"
    }

    fn description(&self) -> &str {
        "stream reads and writes match the channel element type"
    }

    fn applies_to(&self, kind: &OpKind) -> bool {
        matches!(kind, OpKind::StreamRead | OpKind::StreamWrite)
    }

    fn check_op(&self, graph: &Graph, op: OpId, errors: &mut Vec<VerifyError>) {
        let operation = graph.op(op);
        let Some(&channel) = operation.operands.first() else {
            return;
        };
        let Some(element) = graph.channel_element(channel) else {
            errors.push(VerifyError::TypeMismatch {
                op,
                expected: "a stream channel".into(),
                found: graph.type_name(graph.value_type(channel)),
            });
            return;
        };

        let transferred = match operation.kind {
            OpKind::StreamWrite => operation.operands.get(1),
            _ => operation.results.first(),
        };
        if let Some(&value) = transferred {
            let ty = graph.value_type(value);
            if ty != element {
                errors.push(VerifyError::TypeMismatch {
                    op,
                    expected: graph.type_name(element),
                    found: graph.type_name(ty),
                });
            }
        }

        let declared = graph
            .value(channel)
            .defining_op()
            .is_some_and(|def| matches!(graph.op(def).kind, OpKind::StreamChannel));
        if matches!(operation.kind, OpKind::StreamWrite) && !declared {
            let writers = graph.channel_writers(channel);
            if writers.get(1) == Some(&op) {
                errors.push(VerifyError::MultipleWriters {
                    op,
                    channel,
                    count: writers.len(),
                });
            }
        }
    }
}
