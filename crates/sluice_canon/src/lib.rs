//! Greedy fixed-point canonicalizer for dataflow graphs.
//!
//! A [`Canonicalizer`] sweeps the graph post-order, offering every live op to
//! each [`RewritePattern`] that accepts its kind, and repeats until a sweep
//! changes nothing or the configured iteration bound is hit. Patterns only
//! perform rewrites that preserve verification; anything that could alter
//! semantics (e.g. narrow-wide-narrow casts) is not matched at all.

mod dce;
mod driver;
mod pattern;
mod patterns;
mod report;

pub use driver::{canonicalize, fingerprint, Canonicalizer};
pub use pattern::RewritePattern;
pub use patterns::{
    builtin_patterns, BufferChainFold, CastChainFold, DeadBufferElim, DeadNodeElim,
    IdentityCastFold, SingleOpNodeInline, UnitBufferElim,
};
pub use report::CanonReport;
