//! SSA values and their use-lists.

use crate::ids::{OpId, TypeId};
use crate::region::BlockRef;
use serde::{Deserialize, Serialize};

/// Where a value is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueDef {
    /// The `index`-th result of `op`.
    OpResult {
        /// The defining op.
        op: OpId,
        /// Result position.
        index: u32,
    },
    /// The `index`-th argument of `block`.
    BlockArg {
        /// The owning block.
        block: BlockRef,
        /// Argument position.
        index: u32,
    },
}

/// One use of a value: operand slot `operand` of `op`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Use {
    /// The consuming op.
    pub op: OpId,
    /// Operand position within the consuming op.
    pub operand: u32,
}

/// Storage for one SSA value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueData {
    /// The value's type.
    pub ty: TypeId,
    /// The definition site.
    pub def: ValueDef,
    /// Every operand slot that reads this value, in insertion order.
    pub uses: Vec<Use>,
}

impl ValueData {
    /// Returns the defining op, or `None` for block arguments.
    pub fn defining_op(&self) -> Option<OpId> {
        match self.def {
            ValueDef::OpResult { op, .. } => Some(op),
            ValueDef::BlockArg { .. } => None,
        }
    }

    /// Returns `true` if the value is a block argument.
    pub fn is_block_arg(&self) -> bool {
        matches!(self.def, ValueDef::BlockArg { .. })
    }

    /// Returns `true` if anything reads the value.
    pub fn has_uses(&self) -> bool {
        !self.uses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::RegionId;

    #[test]
    fn defining_op_of_result() {
        let v = ValueData {
            ty: TypeId::from_raw(0),
            def: ValueDef::OpResult {
                op: OpId::from_raw(4),
                index: 0,
            },
            uses: vec![],
        };
        assert_eq!(v.defining_op(), Some(OpId::from_raw(4)));
        assert!(!v.is_block_arg());
        assert!(!v.has_uses());
    }

    #[test]
    fn block_arg_has_no_defining_op() {
        let v = ValueData {
            ty: TypeId::from_raw(0),
            def: ValueDef::BlockArg {
                block: BlockRef {
                    region: RegionId::from_raw(0),
                    index: 0,
                },
                index: 1,
            },
            uses: vec![Use {
                op: OpId::from_raw(2),
                operand: 0,
            }],
        };
        assert_eq!(v.defining_op(), None);
        assert!(v.is_block_arg());
        assert!(v.has_uses());
    }
}
