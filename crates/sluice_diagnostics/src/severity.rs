//! How seriously a diagnostic affects the graph it describes.

use crate::code::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity of a diagnostic, ordered from informational to blocking.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Information about work done, such as the rewrites a canonicalizer run
    /// applied. The graph is unaffected.
    Note,
    /// The graph is still valid, but a pass stopped short of its goal.
    Warning,
    /// The graph is malformed and must not reach scheduling or codegen.
    Error,
}

impl Severity {
    /// Returns the severity every code of `category` is reported with.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Error => Severity::Error,
            Category::Warning => Severity::Warning,
            Category::Remark => Severity::Note,
        }
    }

    /// Returns `true` if the graph must be rejected.
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_outrank_warnings_outrank_notes() {
        let mut all = vec![Severity::Error, Severity::Note, Severity::Warning];
        all.sort();
        assert_eq!(all, vec![Severity::Note, Severity::Warning, Severity::Error]);
    }

    #[test]
    fn category_decides_severity() {
        assert_eq!(Severity::for_category(Category::Error), Severity::Error);
        assert_eq!(Severity::for_category(Category::Warning), Severity::Warning);
        assert_eq!(Severity::for_category(Category::Remark), Severity::Note);
        assert!(Severity::for_category(Category::Error).is_error());
        assert!(!Severity::for_category(Category::Remark).is_error());
    }

    #[test]
    fn renders_lowercase() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Note.to_string(), "note");
    }
}
