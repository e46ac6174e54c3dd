//! Structured diagnostic messages with severity, codes, labels, and notes.

use crate::code::DiagnosticCode;
use crate::label::Label;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use sluice_common::Loc;

/// A structured diagnostic message attached to an operation.
///
/// Each diagnostic includes:
/// - A severity level and code
/// - A primary message and the location of the offending op
/// - Optional labels on related ops, notes, and help text
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The operation where the issue was detected.
    pub primary_loc: Loc,
    /// Additional annotated operations providing context.
    pub labels: Vec<Label>,
    /// Explanatory footnotes (e.g., "note: ...").
    pub notes: Vec<String>,
    /// Actionable suggestions (e.g., "help: ...").
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, loc: Loc) -> Self {
        Self::with_severity(Severity::Error, code, message, loc)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, loc: Loc) -> Self {
        Self::with_severity(Severity::Warning, code, message, loc)
    }

    /// Creates a new note diagnostic.
    pub fn note(code: DiagnosticCode, message: impl Into<String>, loc: Loc) -> Self {
        Self::with_severity(Severity::Note, code, message, loc)
    }

    /// Creates a diagnostic whose severity follows from the code's category.
    pub fn for_code(code: DiagnosticCode, message: impl Into<String>, loc: Loc) -> Self {
        Self::with_severity(Severity::for_category(code.category), code, message, loc)
    }

    fn with_severity(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        loc: Loc,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            primary_loc: loc,
            labels: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Adds a label to this diagnostic.
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}
