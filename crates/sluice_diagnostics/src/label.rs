//! Labels that point at operations within a diagnostic.

use serde::{Deserialize, Serialize};
use sluice_common::Loc;

/// The role of a diagnostic label.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LabelStyle {
    /// The offending operation.
    Primary,
    /// A related operation (e.g. the first writer of a channel).
    Secondary,
}

/// An annotated operation location within a diagnostic.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Label {
    /// The operation this label points at.
    pub loc: Loc,
    /// The message displayed next to the location.
    pub message: String,
    /// Whether this is a primary or secondary label.
    pub style: LabelStyle,
}

impl Label {
    /// Creates a primary label.
    pub fn primary(loc: Loc, message: impl Into<String>) -> Self {
        Self {
            loc,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    /// Creates a secondary label.
    pub fn secondary(loc: Loc, message: impl Into<String>) -> Self {
        Self {
            loc,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}
