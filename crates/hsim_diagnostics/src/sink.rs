//! Thread-safe diagnostic collection.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Collects diagnostics from any number of threads.
///
/// Per-severity counts are kept in atomics so a run can ask whether anything
/// failed without locking the list.
#[derive(Default)]
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    notes: AtomicUsize,
    warnings: AtomicUsize,
    errors: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        // Pushing and draining a Vec cannot be interrupted half way.
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn counter(&self, severity: Severity) -> &AtomicUsize {
        match severity {
            Severity::Note => &self.notes,
            Severity::Warning => &self.warnings,
            Severity::Error => &self.errors,
        }
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.counter(diag.severity).fetch_add(1, Ordering::Relaxed);
        self.lock().push(diag);
    }

    /// Number of diagnostics of `severity` emitted so far, drained or not.
    pub fn count(&self, severity: Severity) -> usize {
        self.counter(severity).load(Ordering::Relaxed)
    }

    /// Returns `true` if any error was emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of errors emitted so far.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Drains every collected diagnostic. Counts are kept.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Copies the collected diagnostics without draining them.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }
}
