use std::fmt;

use garnet_ir::SourceRange;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled source range with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub range: SourceRange,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    pub fn primary(range: SourceRange, message: impl Into<String>) -> Self {
        Label {
            range,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(range: SourceRange, message: impl Into<String>) -> Self {
        Label {
            range,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A diagnostic ready for reporting.
///
/// The lexer reads its input a line at a time and does not keep it, so the
/// text of the offending line travels with the diagnostic for the excerpt.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
    /// Text of the line containing the primary range, without terminator.
    pub source_line: Option<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
            source_line: None,
        }
    }

    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label at the error location.
    pub fn with_label(mut self, range: SourceRange, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(range, message));
        self
    }

    pub fn with_secondary_label(mut self, range: SourceRange, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(range, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Attach the source line for the excerpt. A trailing newline is dropped.
    pub fn with_source_line(mut self, line: impl Into<String>) -> Self {
        let mut line = line.into();
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        self.source_line = Some(line);
        self
    }

    /// Range of the first primary label.
    pub fn primary_range(&self) -> Option<SourceRange> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.range)
    }

    /// `file:line:col: severity[code]: message`, the source excerpt and a
    /// caret underline.
    pub fn render(&self, file_name: &str, colors: bool) -> String {
        crate::emitter::render(self, file_name, colors)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {} {}: {}", marker, label.range, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }

        Ok(())
    }
}
