//! Locations of operations inside a dataflow graph.
//!
//! A [`Loc`] is how diagnostics point back at the offending operation. It only
//! stores the raw operation index; turning it into something readable is the
//! job of whoever owns the graph (see `LocResolver` in `sluice_diagnostics`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The location of an operation, or [`Loc::UNKNOWN`] when none applies.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Loc {
    op: u32,
}

impl Loc {
    /// A location used for graph-wide diagnostics that have no single op.
    pub const UNKNOWN: Loc = Loc { op: u32::MAX };

    /// Creates a location for the operation with the given raw index.
    pub fn op(raw: u32) -> Self {
        Self { op: raw }
    }

    /// Returns the raw operation index, or `None` for [`Loc::UNKNOWN`].
    pub fn op_index(self) -> Option<u32> {
        if self.is_unknown() {
            None
        } else {
            Some(self.op)
        }
    }

    /// Returns `true` if this is the unknown location.
    pub fn is_unknown(self) -> bool {
        self.op == u32::MAX
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op_index() {
            Some(op) => write!(f, "op #{op}"),
            None => write!(f, "<unknown>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_loc_has_index() {
        let loc = Loc::op(7);
        assert_eq!(loc.op_index(), Some(7));
        assert!(!loc.is_unknown());
        assert_eq!(format!("{loc}"), "op #7");
    }

    #[test]
    fn unknown_loc() {
        assert!(Loc::UNKNOWN.is_unknown());
        assert_eq!(Loc::UNKNOWN.op_index(), None);
        assert_eq!(format!("{}", Loc::UNKNOWN), "<unknown>");
    }

    #[test]
    fn serde_roundtrip() {
        let loc = Loc::op(12);
        let json = serde_json::to_string(&loc).unwrap();
        let back: Loc = serde_json::from_str(&json).unwrap();
        assert_eq!(loc, back);
    }
}
