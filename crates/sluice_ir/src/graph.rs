//! The op graph: arenas of operations, values and regions plus the mutation
//! API every transform goes through.
//!
//! Use-lists are maintained eagerly. Every operand edit, replacement or
//! erasure updates the affected [`ValueData::uses`] so that queries such as
//! [`Graph::channel_writers`] never see stale edges.

use crate::arena::Arena;
use crate::ids::{OpId, RegionId, TypeId, ValueId};
use crate::op::{OpKind, Operation};
use crate::region::{Block, BlockRef, Region};
use crate::types::{Type, TypeDb};
use crate::value::{Use, ValueData, ValueDef};
use serde::{Deserialize, Serialize};
use sluice_common::{InternalError, Loc, SluiceResult};
use std::collections::HashSet;

/// A dataflow program: a top-level body region and everything nested in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Interned types of every value.
    pub types: TypeDb,
    ops: Arena<OpId, Operation>,
    values: Arena<ValueId, ValueData>,
    regions: Arena<RegionId, Region>,
    body: RegionId,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Creates an empty graph whose body region has one empty block.
    pub fn new() -> Self {
        let mut regions = Arena::new();
        let body = regions.alloc(Region {
            parent: None,
            blocks: vec![Block::default()],
        });
        Self {
            types: TypeDb::new(),
            ops: Arena::new(),
            values: Arena::new(),
            regions,
            body,
        }
    }

    /// The top-level region.
    pub fn body(&self) -> RegionId {
        self.body
    }

    /// The entry block of the top-level region.
    pub fn body_block(&self) -> BlockRef {
        BlockRef {
            region: self.body,
            index: 0,
        }
    }

    /// Returns `true` if `op` was allocated by this graph.
    pub fn contains_op(&self, op: OpId) -> bool {
        self.ops.contains(op)
    }

    /// Returns the op with the given ID, erased or not.
    pub fn op(&self, id: OpId) -> &Operation {
        &self.ops[id]
    }

    /// Returns the value with the given ID.
    pub fn value(&self, id: ValueId) -> &ValueData {
        &self.values[id]
    }

    /// Returns the region with the given ID.
    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id]
    }

    /// Returns the block addressed by `block`.
    pub fn block(&self, block: BlockRef) -> &Block {
        &self.regions[block.region].blocks[block.index as usize]
    }

    fn block_mut(&mut self, block: BlockRef) -> &mut Block {
        &mut self.regions[block.region].blocks[block.index as usize]
    }

    /// Returns the type of a value.
    pub fn value_type(&self, value: ValueId) -> TypeId {
        self.values[value].ty
    }

    /// Gives mutable access to an op's kind so transforms can update attributes.
    pub fn kind_mut(&mut self, op: OpId) -> &mut OpKind {
        &mut self.ops[op].kind
    }

    /// Returns `true` if the op has been erased.
    pub fn is_erased(&self, op: OpId) -> bool {
        self.ops[op].erased
    }

    /// Iterates over every live op in allocation order.
    pub fn ops(&self) -> impl Iterator<Item = (OpId, &Operation)> {
        self.ops.iter().filter(|(_, op)| !op.erased)
    }

    /// Returns the number of live ops.
    pub fn live_op_count(&self) -> usize {
        self.ops().count()
    }

    /// Interns `iN`.
    pub fn int_type(&mut self, width: u32) -> TypeId {
        self.types.intern(Type::Int { width })
    }

    /// Interns `vector<LENxiWIDTH>`.
    pub fn vector_type(&mut self, len: u32, width: u32) -> TypeId {
        let element = self.int_type(width);
        self.types.intern(Type::Vector { len, element })
    }

    /// Interns `memref<SHAPE x element>`.
    pub fn memref_type(&mut self, shape: &[u64], element: TypeId) -> TypeId {
        self.types.intern(Type::MemRef {
            shape: shape.to_vec(),
            element,
        })
    }

    /// Interns `stream<element>`.
    pub fn stream_type(&mut self, element: TypeId) -> TypeId {
        self.types.intern(Type::Stream { element })
    }

    /// Renders a type.
    pub fn type_name(&self, ty: TypeId) -> String {
        self.types.display(ty).to_string()
    }

    /// Renders a value with its type, e.g. `%3: vector<2xi8>`.
    pub fn describe_value(&self, value: ValueId) -> String {
        format!("{value}: {}", self.type_name(self.value_type(value)))
    }

    /// Renders an op's kind and position for diagnostics.
    pub fn describe_op(&self, op: OpId) -> String {
        let operation = &self.ops[op];
        match operation.parent {
            Some(block) if !operation.erased => {
                format!("`{}` {op} in {}", operation.kind, block.region)
            }
            _ => format!("`{}` {op} (erased)", operation.kind),
        }
    }

    /// Returns the diagnostic location of an op.
    pub fn loc(&self, op: OpId) -> Loc {
        Loc::op(op.as_raw())
    }

    /// Appends a new op at the end of `block`.
    ///
    /// Results are allocated from `result_types`. Regions are allocated
    /// according to the kind's signature, each with one empty block.
    /// No structural checking happens here; the verifier reports violations.
    pub fn create_op(
        &mut self,
        kind: OpKind,
        operands: &[ValueId],
        result_types: &[TypeId],
        block: BlockRef,
    ) -> OpId {
        let id = self.ops.next_id();
        let results = result_types
            .iter()
            .enumerate()
            .map(|(index, &ty)| {
                self.values.alloc(ValueData {
                    ty,
                    def: ValueDef::OpResult {
                        op: id,
                        index: index as u32,
                    },
                    uses: Vec::new(),
                })
            })
            .collect();
        for (index, &value) in operands.iter().enumerate() {
            self.values[value].uses.push(Use {
                op: id,
                operand: index as u32,
            });
        }
        let regions = (0..kind.signature().regions)
            .map(|_| {
                self.regions.alloc(Region {
                    parent: Some(id),
                    blocks: vec![Block::default()],
                })
            })
            .collect();
        self.ops.alloc(Operation {
            kind,
            operands: operands.to_vec(),
            results,
            regions,
            parent: Some(block),
            erased: false,
        });
        self.block_mut(block).ops.push(id);
        id
    }

    /// Appends an empty block to `region`.
    pub fn add_block(&mut self, region: RegionId) -> BlockRef {
        let blocks = &mut self.regions[region].blocks;
        blocks.push(Block::default());
        BlockRef {
            region,
            index: (blocks.len() - 1) as u32,
        }
    }

    /// Appends an argument of type `ty` to `block`.
    pub fn add_block_arg(&mut self, block: BlockRef, ty: TypeId) -> ValueId {
        let index = self.block(block).args.len() as u32;
        let value = self.values.alloc(ValueData {
            ty,
            def: ValueDef::BlockArg { block, index },
            uses: Vec::new(),
        });
        self.block_mut(block).args.push(value);
        value
    }

    /// Rewires operand `index` of `op` to read `value`.
    pub fn set_operand(&mut self, op: OpId, index: usize, value: ValueId) {
        let old = self.ops[op].operands[index];
        if old == value {
            return;
        }
        self.remove_use(old, op, index as u32);
        self.values[value].uses.push(Use {
            op,
            operand: index as u32,
        });
        self.ops[op].operands[index] = value;
    }

    fn remove_use(&mut self, value: ValueId, op: OpId, operand: u32) {
        let uses = &mut self.values[value].uses;
        if let Some(pos) = uses
            .iter()
            .position(|u| u.op == op && u.operand == operand)
        {
            uses.remove(pos);
        }
    }

    /// Redirects every use of `from` to `to`.
    pub fn replace_all_uses(&mut self, from: ValueId, to: ValueId) {
        if from == to {
            return;
        }
        let uses = std::mem::take(&mut self.values[from].uses);
        for u in &uses {
            self.ops[u.op].operands[u.operand as usize] = to;
        }
        self.values[to].uses.extend(uses);
    }

    /// Erases `op` together with everything nested in its regions.
    ///
    /// Fails, leaving the graph untouched, if any value defined by the erased
    /// subtree is still read from outside it.
    pub fn erase_op(&mut self, op: OpId) -> SluiceResult<()> {
        if self.ops[op].erased {
            return Err(InternalError::at(self.loc(op), format!("{op} is already erased")));
        }
        let mut doomed = Vec::new();
        for &region in &self.ops[op].regions {
            self.walk_into(region, &mut doomed);
        }
        doomed.push(op);
        let members: HashSet<OpId> = doomed.iter().copied().collect();

        for &d in &doomed {
            let operation = &self.ops[d];
            let block_args = operation
                .regions
                .iter()
                .flat_map(|&r| self.regions[r].blocks.iter())
                .flat_map(|b| b.args.iter());
            for &value in operation.results.iter().chain(block_args) {
                if let Some(user) = self.values[value]
                    .uses
                    .iter()
                    .find(|u| !members.contains(&u.op))
                {
                    return Err(InternalError::at(
                        self.loc(user.op),
                        format!("cannot erase {op}: {value} is still used by {}", user.op),
                    ));
                }
            }
        }

        for &d in &doomed {
            let operands = self.ops[d].operands.clone();
            for (index, value) in operands.into_iter().enumerate() {
                self.remove_use(value, d, index as u32);
            }
            self.ops[d].erased = true;
        }
        if let Some(parent) = self.ops[op].parent.take() {
            self.block_mut(parent).ops.retain(|&o| o != op);
        }
        Ok(())
    }

    /// Moves `op` so it sits immediately before `anchor`, possibly in another block.
    pub fn move_before(&mut self, op: OpId, anchor: OpId) -> SluiceResult<()> {
        let target = self.ops[anchor]
            .parent
            .ok_or_else(|| InternalError::at(self.loc(anchor), format!("anchor {anchor} is not in a block")))?;
        if let Some(from) = self.ops[op].parent {
            self.block_mut(from).ops.retain(|&o| o != op);
        }
        let anchor_loc = self.loc(anchor);
        let ops = &mut self.block_mut(target).ops;
        let pos = ops
            .iter()
            .position(|&o| o == anchor)
            .ok_or_else(|| InternalError::at(anchor_loc, format!("anchor {anchor} missing from its block")))?;
        ops.insert(pos, op);
        self.ops[op].parent = Some(target);
        Ok(())
    }

    /// Returns the block containing `op`.
    pub fn parent_block(&self, op: OpId) -> Option<BlockRef> {
        self.ops[op].parent
    }

    /// Returns the op owning the region that contains `op`.
    pub fn parent_op(&self, op: OpId) -> Option<OpId> {
        self.ops[op]
            .parent
            .and_then(|block| self.regions[block.region].parent)
    }

    /// Returns `true` if `region` is `ancestor` or nested anywhere inside it.
    pub fn region_within(&self, region: RegionId, ancestor: RegionId) -> bool {
        let mut current = region;
        loop {
            if current == ancestor {
                return true;
            }
            let Some(owner) = self.regions[current].parent else {
                return false;
            };
            let Some(block) = self.ops[owner].parent else {
                return false;
            };
            current = block.region;
        }
    }

    /// Returns `true` if `op` lies anywhere inside `region`.
    pub fn op_within(&self, op: OpId, region: RegionId) -> bool {
        self.ops[op]
            .parent
            .is_some_and(|block| self.region_within(block.region, region))
    }

    /// Returns `true` if `value` is defined anywhere inside `region`.
    pub fn value_within(&self, value: ValueId, region: RegionId) -> bool {
        match self.values[value].def {
            ValueDef::OpResult { op, .. } => self.op_within(op, region),
            ValueDef::BlockArg { block, .. } => self.region_within(block.region, region),
        }
    }

    /// Lists every op in `region`, children before parents.
    pub fn walk(&self, region: RegionId) -> Vec<OpId> {
        let mut out = Vec::new();
        self.walk_into(region, &mut out);
        out
    }

    fn walk_into(&self, region: RegionId, out: &mut Vec<OpId>) {
        for block in &self.regions[region].blocks {
            for &op in &block.ops {
                for &nested in &self.ops[op].regions {
                    self.walk_into(nested, out);
                }
                out.push(op);
            }
        }
    }

    /// Iterates over the ops reading `value`, one entry per operand slot.
    pub fn users(&self, value: ValueId) -> impl Iterator<Item = OpId> + '_ {
        self.values[value].uses.iter().map(|u| u.op)
    }

    /// Returns `true` if none of the op's results are read.
    pub fn results_unused(&self, op: OpId) -> bool {
        self.ops[op]
            .results
            .iter()
            .all(|&r| !self.values[r].has_uses())
    }

    /// Returns `true` if neither the op nor anything nested in it has side effects.
    pub fn is_pure(&self, op: OpId) -> bool {
        let operation = &self.ops[op];
        !operation.kind.has_side_effects()
            && operation
                .regions
                .iter()
                .flat_map(|&r| self.walk(r))
                .all(|inner| !self.ops[inner].kind.has_side_effects())
    }
}
