//! Operation kinds, their capabilities and their structural signatures.

use crate::const_value::ConstValue;
use crate::ids::{RegionId, ValueId};
use crate::region::BlockRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Static properties an operation kind declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No capabilities.
    pub const NONE: Self = Self(0);
    /// The op has effects beyond its results and must not be removed when unused.
    pub const SIDE_EFFECTS: Self = Self(1);
    /// The op terminates its block.
    pub const TERMINATOR: Self = Self(1 << 1);
    /// The op's result is a stream channel handle.
    pub const DECLARES_CHANNEL: Self = Self(1 << 2);
    /// The op owns nested regions.
    pub const HAS_REGION: Self = Self(1 << 3);

    /// Returns `true` if every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// How many operands or results an op kind admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    /// Exactly this many.
    Exactly(usize),
    /// Zero up to this many.
    AtMost(usize),
    /// Any number.
    Any,
}

impl Count {
    /// Returns `true` if `n` satisfies the constraint.
    pub fn admits(self, n: usize) -> bool {
        match self {
            Count::Exactly(k) => n == k,
            Count::AtMost(k) => n <= k,
            Count::Any => true,
        }
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Count::Exactly(k) => write!(f, "exactly {k}"),
            Count::AtMost(k) => write!(f, "at most {k}"),
            Count::Any => write!(f, "any number of"),
        }
    }
}

/// Structural shape of an op kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Operand count.
    pub operands: Count,
    /// Result count.
    pub results: Count,
    /// Number of owned regions.
    pub regions: usize,
}

impl Signature {
    const fn new(operands: Count, results: Count, regions: usize) -> Self {
        Self {
            operands,
            results,
            regions,
        }
    }
}

/// The kind of an operation, with its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    /// Declares a FIFO stream channel.
    StreamChannel,
    /// Pops one element from a channel. The result may be omitted to discard it.
    StreamRead,
    /// Pushes a value into a channel.
    StreamWrite,
    /// A dataflow process owning one single-block body region.
    DataflowNode {
        /// Optional scheduling level.
        level: Option<u32>,
    },
    /// Terminator of a node body; its operands become the node's results.
    DataflowOutput,
    /// A FIFO or ping-pong buffer between dataflow nodes.
    DataflowBuffer {
        /// Buffer depth; verified to be positive.
        depth: i64,
        /// Optional scheduling level.
        level: Option<u32>,
    },
    /// Marks a boundary where data enters the design.
    DataflowSource,
    /// Marks a boundary where data leaves the design.
    DataflowSink,
    /// Integer multiply; may pack two narrow products into one wide lane pair.
    PrimMul,
    /// Allocates a memory-backed buffer.
    PrimBuffer {
        /// Buffer depth; must not be negative.
        depth: i64,
    },
    /// A memory-backed constant.
    PrimConst {
        /// The constant payload.
        value: ConstValue,
    },
    /// Integer width conversion.
    PrimCast,
    /// An operation outside the dataflow dialects.
    Opaque {
        /// Fully qualified op name, e.g. `arith.addi`.
        name: String,
        /// Whether the op must be kept even when its results are unused.
        side_effects: bool,
    },
}

impl OpKind {
    /// Returns the textual op name.
    pub fn name(&self) -> &str {
        match self {
            OpKind::StreamChannel => "stream.channel",
            OpKind::StreamRead => "stream.read",
            OpKind::StreamWrite => "stream.write",
            OpKind::DataflowNode { .. } => "dataflow.node",
            OpKind::DataflowOutput => "dataflow.output",
            OpKind::DataflowBuffer { .. } => "dataflow.buffer",
            OpKind::DataflowSource => "dataflow.source",
            OpKind::DataflowSink => "dataflow.sink",
            OpKind::PrimMul => "prim.mul",
            OpKind::PrimBuffer { .. } => "prim.buffer",
            OpKind::PrimConst { .. } => "prim.const",
            OpKind::PrimCast => "prim.cast",
            OpKind::Opaque { name, .. } => name,
        }
    }

    /// Returns the capability flags of this kind.
    pub fn capabilities(&self) -> Capabilities {
        match self {
            OpKind::StreamChannel => Capabilities::DECLARES_CHANNEL,
            OpKind::StreamRead
            | OpKind::StreamWrite
            | OpKind::DataflowSource
            | OpKind::DataflowSink => Capabilities::SIDE_EFFECTS,
            OpKind::DataflowNode { .. } => Capabilities::HAS_REGION,
            OpKind::DataflowOutput => Capabilities::TERMINATOR,
            OpKind::DataflowBuffer { .. }
            | OpKind::PrimMul
            | OpKind::PrimBuffer { .. }
            | OpKind::PrimConst { .. }
            | OpKind::PrimCast => Capabilities::NONE,
            OpKind::Opaque { side_effects, .. } => {
                if *side_effects {
                    Capabilities::SIDE_EFFECTS
                } else {
                    Capabilities::NONE
                }
            }
        }
    }

    /// Returns the operand, result and region counts this kind admits.
    pub fn signature(&self) -> Signature {
        use Count::{Any, AtMost, Exactly};
        match self {
            OpKind::StreamChannel => Signature::new(Exactly(0), Exactly(1), 0),
            OpKind::StreamRead => Signature::new(Exactly(1), AtMost(1), 0),
            OpKind::StreamWrite => Signature::new(Exactly(2), Exactly(0), 0),
            OpKind::DataflowNode { .. } => Signature::new(Exactly(0), Any, 1),
            OpKind::DataflowOutput => Signature::new(Any, Exactly(0), 0),
            OpKind::DataflowBuffer { .. } => Signature::new(Exactly(1), Exactly(1), 0),
            OpKind::DataflowSource | OpKind::DataflowSink => {
                Signature::new(Exactly(0), Exactly(0), 0)
            }
            OpKind::PrimMul => Signature::new(Exactly(2), Exactly(1), 0),
            OpKind::PrimBuffer { .. } | OpKind::PrimConst { .. } => {
                Signature::new(Exactly(0), Exactly(1), 0)
            }
            OpKind::PrimCast => Signature::new(Exactly(1), Exactly(1), 0),
            OpKind::Opaque { .. } => Signature::new(Any, Any, 0),
        }
    }

    /// Returns `true` if the op must be kept even when its results are unused.
    pub fn has_side_effects(&self) -> bool {
        self.capabilities().contains(Capabilities::SIDE_EFFECTS)
    }

    /// Returns `true` for block terminators.
    pub fn is_terminator(&self) -> bool {
        self.capabilities().contains(Capabilities::TERMINATOR)
    }

    /// Returns `true` for `dataflow.node`.
    pub fn is_node(&self) -> bool {
        matches!(self, OpKind::DataflowNode { .. })
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An operation in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// The kind and attributes.
    pub kind: OpKind,
    /// Consumed values, in order.
    pub operands: Vec<ValueId>,
    /// Produced values, in order.
    pub results: Vec<ValueId>,
    /// Owned regions.
    pub regions: Vec<RegionId>,
    /// The block this op lives in; `None` once erased.
    pub parent: Option<BlockRef>,
    /// Tombstone flag set by [`Graph::erase_op`](crate::Graph::erase_op).
    pub erased: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_dialect_qualified() {
        assert_eq!(OpKind::StreamChannel.name(), "stream.channel");
        assert_eq!(
            OpKind::DataflowBuffer {
                depth: 2,
                level: None
            }
            .name(),
            "dataflow.buffer"
        );
        let opaque = OpKind::Opaque {
            name: "arith.addi".into(),
            side_effects: false,
        };
        assert_eq!(opaque.to_string(), "arith.addi");
    }

    #[test]
    fn side_effect_kinds() {
        assert!(OpKind::StreamRead.has_side_effects());
        assert!(OpKind::StreamWrite.has_side_effects());
        assert!(OpKind::DataflowSource.has_side_effects());
        assert!(OpKind::DataflowSink.has_side_effects());
        assert!(!OpKind::PrimCast.has_side_effects());
        assert!(!OpKind::DataflowNode { level: None }.has_side_effects());
        assert!(OpKind::Opaque {
            name: "func.call".into(),
            side_effects: true
        }
        .has_side_effects());
    }

    #[test]
    fn output_is_only_terminator() {
        assert!(OpKind::DataflowOutput.is_terminator());
        assert!(!OpKind::DataflowNode { level: Some(0) }.is_terminator());
    }

    #[test]
    fn capabilities_combine() {
        let both = Capabilities::SIDE_EFFECTS | Capabilities::HAS_REGION;
        assert!(both.contains(Capabilities::HAS_REGION));
        assert!(!both.contains(Capabilities::TERMINATOR));
        assert!(both.contains(Capabilities::NONE));
    }

    #[test]
    fn read_result_is_optional() {
        let sig = OpKind::StreamRead.signature();
        assert!(sig.results.admits(0));
        assert!(sig.results.admits(1));
        assert!(!sig.results.admits(2));
    }

    #[test]
    fn node_owns_one_region() {
        let sig = OpKind::DataflowNode { level: None }.signature();
        assert_eq!(sig.regions, 1);
        assert_eq!(sig.results, Count::Any);
    }

    #[test]
    fn count_display() {
        assert_eq!(Count::Exactly(2).to_string(), "exactly 2");
        assert_eq!(Count::AtMost(1).to_string(), "at most 1");
    }
}
