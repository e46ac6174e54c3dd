//! Regions and the blocks they own.

use crate::ids::{OpId, RegionId, ValueId};
use serde::{Deserialize, Serialize};

/// Addresses one block: the `index`-th block of `region`.
///
/// Blocks are never removed from a region, so the index is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRef {
    /// The owning region.
    pub region: RegionId,
    /// Block position within the region.
    pub index: u32,
}

/// A straight-line sequence of ops with block arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block arguments.
    pub args: Vec<ValueId>,
    /// Ops in program order.
    pub ops: Vec<OpId>,
}

/// A list of blocks owned by an op, or by the graph for the top-level body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// The owning op; `None` for the graph body.
    pub parent: Option<OpId>,
    /// Blocks in order.
    pub blocks: Vec<Block>,
}

impl Region {
    /// Returns the only block, if the region has exactly one.
    pub fn single_block(&self) -> Option<&Block> {
        match self.blocks.as_slice() {
            [block] => Some(block),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_block_requires_exactly_one() {
        let mut region = Region::default();
        assert!(region.single_block().is_none());
        region.blocks.push(Block::default());
        assert!(region.single_block().is_some());
        region.blocks.push(Block::default());
        assert!(region.single_block().is_none());
    }
}
