//! Structured diagnostic messages with severity, code, and run location.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// Where in a verification run a diagnostic was raised.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Name of the scenario, if the diagnostic belongs to one.
    pub scenario: Option<String>,
    /// Clock tick at which the problem was observed.
    pub tick: Option<u64>,
}

impl Location {
    /// A location with no scenario or tick.
    pub const NONE: Location = Location {
        scenario: None,
        tick: None,
    };

    /// A location inside a scenario, optionally pinned to a tick.
    pub fn scenario(name: impl Into<String>, tick: Option<u64>) -> Self {
        Self {
            scenario: Some(name.into()),
            tick,
        }
    }

    /// Returns `true` if neither a scenario nor a tick is recorded.
    pub fn is_none(&self) -> bool {
        self.scenario.is_none() && self.tick.is_none()
    }
}

/// A structured diagnostic message.
///
/// Each diagnostic carries a severity, a unique code, the main message, the
/// run location, and optional notes and help lines.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// Where the diagnostic was raised.
    pub location: Location,
    /// Explanatory footnotes (e.g., "note: ...").
    pub notes: Vec<String>,
    /// Actionable suggestions (e.g., "help: ...").
    pub help: Vec<String>,
}

impl Diagnostic {
    fn with_severity(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::with_severity(Severity::Error, code, message, location)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::with_severity(Severity::Warning, code, message, location)
    }

    /// Creates a new informational note.
    pub fn note(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::with_severity(Severity::Note, code, message, location)
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
