//! Diagnostic creation, severity management, and terminal rendering.
//!
//! This crate provides structured [`Diagnostic`] messages with severity levels,
//! codes, operation labels, notes and help. The thread-safe [`DiagnosticSink`]
//! accumulates diagnostics while a graph is verified or canonicalized, and
//! [`TerminalRenderer`] formats them for humans.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, LocResolver, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
