//! How serious a reported outcome is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic, ordered from informational to fatal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// A scenario result or other run information.
    Note,
    /// A configuration that weakens a protocol guarantee.
    Warning,
    /// A failed check or a simulator fault.
    Error,
}

impl Severity {
    /// Returns `true` for [`Severity::Error`].
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// The lowercase label used in rendered output.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// The ANSI foreground color code used when rendering in color.
    pub fn ansi_color(self) -> u8 {
        match self {
            Severity::Note => 32,
            Severity::Warning => 33,
            Severity::Error => 31,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
