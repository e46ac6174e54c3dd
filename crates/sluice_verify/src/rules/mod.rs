//! All built-in verification rules.

mod buffer;
mod channel;
mod node;
mod prim;
mod structure;

pub use buffer::BufferRules;
pub use channel::{ChannelDiscipline, StreamAccess};
pub use node::NodeTerminator;
pub use prim::{CastLegality, ConstShape, MulLegality};
pub use structure::Structure;

use crate::VerifyEngine;

/// Registers the eight builtin rules with the engine.
pub fn register_builtin_rules(engine: &mut VerifyEngine) {
    engine.register(Box::new(Structure));
    engine.register(Box::new(ChannelDiscipline));
    engine.register(Box::new(StreamAccess));
    engine.register(Box::new(BufferRules));
    engine.register(Box::new(MulLegality));
    engine.register(Box::new(CastLegality));
    engine.register(Box::new(ConstShape));
    engine.register(Box::new(NodeTerminator));
}
