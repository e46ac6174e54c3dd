//! Verification failures.
//!
//! Every variant names the op it is anchored on so diagnostics can point at
//! it. The remaining fields are rendered context for the message.

use crate::ids::{OpId, ValueId};
use thiserror::Error;

/// A structural or typing violation found in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// A stream channel has more than one writer.
    #[error("channel {channel} has {count} writers, expected exactly one")]
    MultipleWriters {
        /// The offending (second or later) writer, or the channel itself.
        op: OpId,
        /// The channel value.
        channel: ValueId,
        /// Number of writers found.
        count: usize,
    },

    /// A declared channel has no writer.
    #[error("channel {channel} is never written")]
    DanglingChannel {
        /// The `stream.channel` op.
        op: OpId,
        /// The channel value.
        channel: ValueId,
    },

    /// A value's type does not match what its position requires.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The op with the mismatched operand or result.
        op: OpId,
        /// The required type.
        expected: String,
        /// The actual type.
        found: String,
    },

    /// A buffer depth is out of range.
    #[error("invalid depth {depth}: {detail}")]
    InvalidDepth {
        /// The buffer op.
        op: OpId,
        /// The offending depth.
        depth: i64,
        /// The accepted range.
        detail: String,
    },

    /// Operand or result shapes are not a legal combination.
    #[error("illegal operand shape: {detail}")]
    IllegalOperandShape {
        /// The primitive op.
        op: OpId,
        /// What was found.
        detail: String,
    },

    /// Bit widths do not satisfy the op's width rules.
    #[error("width mismatch: {detail}")]
    WidthMismatch {
        /// The primitive op.
        op: OpId,
        /// What was found.
        detail: String,
    },

    /// A shape attribute disagrees with a result shape.
    #[error("shape mismatch: {detail}")]
    ShapeMismatch {
        /// The primitive op.
        op: OpId,
        /// What was found.
        detail: String,
    },

    /// A node body does not have exactly one block.
    #[error("node region has {blocks} blocks, expected exactly one")]
    MultiBlockRegion {
        /// The node.
        op: OpId,
        /// Number of blocks found.
        blocks: usize,
    },

    /// A node body does not end in `dataflow.output`.
    #[error("node body does not end with `dataflow.output`")]
    MissingTerminator {
        /// The node.
        op: OpId,
    },

    /// A node's output operands disagree with its results.
    #[error("result mismatch: {detail}")]
    ResultMismatch {
        /// The node.
        op: OpId,
        /// What disagrees.
        detail: String,
    },

    /// An op violates the structural signature of its kind.
    #[error("malformed `{name}`: {detail}")]
    Malformed {
        /// The op.
        op: OpId,
        /// The op's name.
        name: String,
        /// What is wrong.
        detail: String,
    },
}

impl VerifyError {
    /// Returns the op the error is anchored on.
    pub fn op(&self) -> OpId {
        match self {
            VerifyError::MultipleWriters { op, .. }
            | VerifyError::DanglingChannel { op, .. }
            | VerifyError::TypeMismatch { op, .. }
            | VerifyError::InvalidDepth { op, .. }
            | VerifyError::IllegalOperandShape { op, .. }
            | VerifyError::WidthMismatch { op, .. }
            | VerifyError::ShapeMismatch { op, .. }
            | VerifyError::MultiBlockRegion { op, .. }
            | VerifyError::MissingTerminator { op }
            | VerifyError::ResultMismatch { op, .. }
            | VerifyError::Malformed { op, .. } => *op,
        }
    }

    /// Returns the variant name, e.g. `"WidthMismatch"`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            VerifyError::MultipleWriters { .. } => "MultipleWriters",
            VerifyError::DanglingChannel { .. } => "DanglingChannel",
            VerifyError::TypeMismatch { .. } => "TypeMismatch",
            VerifyError::InvalidDepth { .. } => "InvalidDepth",
            VerifyError::IllegalOperandShape { .. } => "IllegalOperandShape",
            VerifyError::WidthMismatch { .. } => "WidthMismatch",
            VerifyError::ShapeMismatch { .. } => "ShapeMismatch",
            VerifyError::MultiBlockRegion { .. } => "MultiBlockRegion",
            VerifyError::MissingTerminator { .. } => "MissingTerminator",
            VerifyError::ResultMismatch { .. } => "ResultMismatch",
            VerifyError::Malformed { .. } => "Malformed",
        }
    }
}
