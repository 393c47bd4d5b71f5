//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of same-line errors with the same code
//! - Warnings kept separate from the error count

use crate::{Diagnostic, ErrorCode};
use garnet_ir::{SourcePos, SourceRange};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before dropping further ones (0 = unlimited).
    pub error_limit: usize,
    /// Drop an error whose line and code match the previous error.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 20,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
    /// Line and code of the last accepted error.
    last_error: Option<(u32, ErrorCode)>,
    /// Set once an error was dropped because of the limit.
    truncated: bool,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if !diag.is_error() {
            self.warning_count += 1;
            self.diagnostics.push(diag);
            return true;
        }

        if self.limit_reached() {
            self.truncated = true;
            return false;
        }

        let line = diag.primary_range().map_or(0, |r| r.start.line);
        if self.config.deduplicate && self.last_error == Some((line, diag.code)) {
            return false;
        }

        self.last_error = Some((line, diag.code));
        self.error_count += 1;
        self.diagnostics.push(diag);
        true
    }

    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.add(diag);
        }
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Sort diagnostics by position and return them, clearing the queue.
    ///
    /// A "too many errors" note is appended when the limit dropped errors.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| sort_key(&w[0]) <= sort_key(&w[1]));
        if !already_sorted {
            // Stable, so same-position diagnostics keep insertion order.
            self.diagnostics.sort_by_key(sort_key);
        }

        let mut result = std::mem::take(&mut self.diagnostics);
        if self.truncated {
            let at = result
                .last()
                .and_then(Diagnostic::primary_range)
                .unwrap_or(SourceRange::point(SourcePos::START));
            result.push(too_many_errors(self.config.error_limit, at));
        }

        self.error_count = 0;
        self.warning_count = 0;
        self.last_error = None;
        self.truncated = false;
        result
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

fn sort_key(diag: &Diagnostic) -> (u32, u32) {
    diag.primary_range()
        .map_or((0, 0), |r| (r.start.line, r.start.column))
}

/// Create a "too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize, range: SourceRange) -> Diagnostic {
    Diagnostic::error(ErrorCode::E0903)
        .with_message(format!("aborting report after {limit} errors"))
        .with_label(range, "error limit reached here")
}
