//! Diagnostic creation, severity management, and terminal rendering for
//! verification runs.
//!
//! Scenario outcomes are reported as structured [`Diagnostic`] messages with a
//! severity, a code, and the scenario/tick they refer to. The thread-safe
//! [`DiagnosticSink`] accumulates them during a run and [`TerminalRenderer`]
//! formats them for humans.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::{Diagnostic, Location};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
