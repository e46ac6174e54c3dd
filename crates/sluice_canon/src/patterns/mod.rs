//! Builtin canonicalization patterns.

mod buffer;
mod cast;
mod node;

pub use buffer::{BufferChainFold, DeadBufferElim, UnitBufferElim};
pub use cast::{CastChainFold, IdentityCastFold};
pub use node::{DeadNodeElim, SingleOpNodeInline};

use crate::RewritePattern;

/// Returns every builtin pattern, in the order the driver offers ops to them.
///
/// Policy-gated patterns are included; they check their flag on each call.
pub fn builtin_patterns() -> Vec<Box<dyn RewritePattern>> {
    vec![
        Box::new(IdentityCastFold),
        Box::new(CastChainFold),
        Box::new(BufferChainFold),
        Box::new(DeadBufferElim),
        Box::new(UnitBufferElim),
        Box::new(DeadNodeElim),
        Box::new(SingleOpNodeInline),
    ]
}
