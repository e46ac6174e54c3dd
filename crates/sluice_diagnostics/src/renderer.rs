//! Diagnostic rendering for human-readable output.

use crate::diagnostic::Diagnostic;
use crate::label::LabelStyle;
use sluice_common::Loc;

/// Turns an operation location into a readable description.
///
/// Implemented by whatever owns the graph the diagnostics refer to.
pub trait LocResolver {
    /// Describes the op at `loc`, e.g. ``op #4 `dataflow.buffer` in region #1``.
    /// Returns `None` if the location is unknown to the resolver.
    fn describe(&self, loc: Loc) -> Option<String>;
}

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic, resolver: &dyn LocResolver) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// ```text
/// error[E101]: channel %3 has 2 writers
///   --> op #2 `stream.channel` in region #0
///    = first writer: op #5 `stream.write` in region #0
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in the header.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let head = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return head;
        }
        let color = match diag.severity {
            crate::Severity::Error => "31",
            crate::Severity::Warning => "33",
            crate::Severity::Note => "36",
        };
        format!("\x1b[1;{color}m{head}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, resolver: &dyn LocResolver) -> String {
        let mut out = format!("{}: {}\n", self.header(diag), diag.message);

        if !diag.primary_loc.is_unknown() {
            let place = resolver
                .describe(diag.primary_loc)
                .unwrap_or_else(|| diag.primary_loc.to_string());
            out.push_str(&format!("  --> {place}\n"));
        }

        for label in &diag.labels {
            if label.style == LabelStyle::Primary && label.loc == diag.primary_loc {
                out.push_str(&format!("   | {}\n", label.message));
                continue;
            }
            let place = resolver
                .describe(label.loc)
                .unwrap_or_else(|| label.loc.to_string());
            out.push_str(&format!("   = {}: {place}\n", label.message));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use crate::label::Label;

    struct Names;
    impl LocResolver for Names {
        fn describe(&self, loc: Loc) -> Option<String> {
            loc.op_index().map(|i| format!("op #{i} `stream.write`"))
        }
    }

    #[test]
    fn render_error_with_location_and_label() {
        let code = DiagnosticCode::new(Category::Error, 101);
        let diag = Diagnostic::error(code, "channel %0 has 2 writers", Loc::op(3))
            .with_label(Label::primary(Loc::op(3), "second writer"))
            .with_label(Label::secondary(Loc::op(1), "first writer"));

        let output = TerminalRenderer::new(false).render(&diag, &Names);

        assert!(output.contains("error[E101]: channel %0 has 2 writers"));
        assert!(output.contains("--> op #3 `stream.write`"));
        assert!(output.contains("| second writer"));
        assert!(output.contains("= first writer: op #1 `stream.write`"));
    }

    #[test]
    fn render_unknown_location_has_no_arrow() {
        let code = DiagnosticCode::new(Category::Warning, 201);
        let diag = Diagnostic::warning(code, "did not converge", Loc::UNKNOWN)
            .with_note("stopped after 32 iterations")
            .with_help("raise canonicalize.max_iterations");

        let output = TerminalRenderer::new(false).render(&diag, &Names);

        assert!(output.contains("warning[W201]: did not converge"));
        assert!(!output.contains("-->"));
        assert!(output.contains("= note: stopped after 32 iterations"));
        assert!(output.contains("= help: raise canonicalize.max_iterations"));
    }

    #[test]
    fn color_wraps_header_only() {
        let code = DiagnosticCode::new(Category::Error, 104);
        let diag = Diagnostic::error(code, "invalid depth", Loc::UNKNOWN);
        let output = TerminalRenderer::new(true).render(&diag, &Names);
        assert!(output.starts_with("\x1b[1;31merror[E104]\x1b[0m: invalid depth"));
    }
}
