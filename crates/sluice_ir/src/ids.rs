//! Opaque ID newtypes for graph entities.
//!
//! Each ID is a thin `u32` wrapper created by
//! [`Arena::alloc`](crate::arena::Arena::alloc).

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// ID of an operation in a [`Graph`](crate::Graph).
    OpId,
    "#"
);

define_id!(
    /// ID of an SSA value (op result or block argument).
    ValueId,
    "%"
);

define_id!(
    /// ID of a region owned by an operation or by the graph itself.
    RegionId,
    "region #"
);

define_id!(
    /// ID of an interned type in the [`TypeDb`](crate::types::TypeDb).
    TypeId,
    "type #"
);
