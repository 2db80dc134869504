//! Diagnostic rendering for terminal output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E301]: r_data mismatch: expected 17'h1fffe, observed 17'h0
///   --> scenario `random` at tick 42
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, severity: Severity) -> String {
        if self.color {
            format!("\x1b[1;{}m{severity}\x1b[0m", severity.ansi_color())
        } else {
            severity.to_string()
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "{}[{}]: {}\n",
            self.header(diag.severity),
            diag.code,
            diag.message
        ));

        match (&diag.location.scenario, diag.location.tick) {
            (Some(name), Some(tick)) => {
                out.push_str(&format!("  --> scenario `{name}` at tick {tick}\n"))
            }
            (Some(name), None) => out.push_str(&format!("  --> scenario `{name}`\n")),
            (None, Some(tick)) => out.push_str(&format!("  --> tick {tick}\n")),
            (None, None) => {}
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
    use crate::diagnostic::Location;

    #[test]
    fn render_error_with_location() {
        let diag = Diagnostic::error(
            DiagnosticCode::new(Category::Error, 301),
            "r_valid asserted during reset",
            Location::scenario("reset", Some(5)),
        );
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.contains("error[E301]: r_valid asserted during reset"));
        assert!(output.contains("--> scenario `reset` at tick 5"));
    }

    #[test]
    fn render_note_with_notes_and_help() {
        let diag = Diagnostic::note(
            DiagnosticCode::new(Category::Info, 1),
            "scenario passed",
            Location::scenario("random", None),
        )
        .with_note("100 transfers")
        .with_help("raise run.transactions for a longer stream");
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.contains("note[I001]: scenario passed"));
        assert!(output.contains("--> scenario `random`\n"));
        assert!(output.contains("= note: 100 transfers"));
        assert!(output.contains("= help: raise run.transactions"));
    }

    #[test]
    fn render_without_location() {
        let diag = Diagnostic::error(
            DiagnosticCode::new(Category::Error, 999),
            "general error",
            Location::NONE,
        );
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(!output.contains("-->"));
    }

    #[test]
    fn color_wraps_severity() {
        let diag = Diagnostic::error(
            DiagnosticCode::new(Category::Error, 301),
            "x",
            Location::NONE,
        );
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.starts_with("\x1b[1;31merror\x1b[0m[E301]"));
    }
}
