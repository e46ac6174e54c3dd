//! Dataflow IR for streaming hardware pipelines.
//!
//! A [`Graph`] holds operations, SSA values and regions in arenas. On top of
//! that substrate live the stream channel, buffer, node and primitive op
//! models with the queries downstream scheduling relies on:
//! [`Graph::dataflow_uses`], [`Graph::is_external`] and [`Graph::is_pack_mul`].

#![warn(missing_docs)]

pub mod arena;
pub mod buffer;
pub mod builder;
pub mod channel;
pub mod const_value;
pub mod deps;
pub mod error;
pub mod graph;
pub mod ids;
pub mod node;
pub mod op;
pub mod prim;
pub mod region;
pub mod types;
pub mod value;

pub use builder::{Builder, NodeParts};
pub use const_value::ConstValue;
pub use deps::DependencyGraph;
pub use error::VerifyError;
pub use graph::Graph;
pub use ids::{OpId, RegionId, TypeId, ValueId};
pub use op::{Capabilities, Count, OpKind, Operation, Signature};
pub use prim::{CastDirection, MulShape};
pub use region::{Block, BlockRef, Region};
pub use types::{IntShape, Type, TypeDb};
pub use value::{Use, ValueData, ValueDef};
