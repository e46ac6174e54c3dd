//! Shared foundational types used across the sluice dataflow IR toolchain.
//!
//! This crate provides operation locations for diagnostics, content hashing
//! for graph fingerprints, and the internal-error result type.

#![warn(missing_docs)]

pub mod hash;
pub mod loc;
pub mod result;

pub use hash::ContentHash;
pub use loc::Loc;
pub use result::{InternalError, SluiceResult};
