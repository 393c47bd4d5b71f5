//! Terminal output for diagnostics.
//!
//! ```text
//! script.rb:3:6: error[E0001]: unterminated string meets end of file
//!     3 | puts "abc
//!       |      ^~~~
//!   = help: add the closing `"`
//! ```
//!
//! Columns in the header are 1-based for humans; ranges stay 0-based.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::{Diagnostic, Severity};

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const BOLD: &str = "\x1b[1m";
    pub const GUTTER: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for the terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Use colors when the output is a TTY.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Writes diagnostics for one source file.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
    file_name: String,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, file_name: impl Into<String>, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            file_name: file_name.into(),
        }
    }

    pub fn emit(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        let text = render(diagnostic, &self.file_name, self.colors);
        self.writer.write_all(text.as_bytes())
    }

    pub fn emit_all<'a>(
        &mut self,
        diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
    ) -> io::Result<()> {
        for diagnostic in diagnostics {
            self.emit(diagnostic)?;
        }
        Ok(())
    }

    /// `N errors, M warnings emitted`, or nothing when both are zero.
    pub fn emit_summary(&mut self, errors: usize, warnings: usize) -> io::Result<()> {
        if errors == 0 && warnings == 0 {
            return Ok(());
        }
        writeln!(
            self.writer,
            "{errors} error{}, {warnings} warning{} emitted",
            plural_s(errors),
            plural_s(warnings)
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn paint(out: &mut String, colors: bool, color: &str, text: &str) {
    if colors {
        let _ = write!(out, "{color}{text}{}", colors::RESET);
    } else {
        out.push_str(text);
    }
}

/// Render one diagnostic: header, excerpt with caret, notes, help lines.
pub fn render(diagnostic: &Diagnostic, file_name: &str, colors: bool) -> String {
    let mut out = String::new();
    let primary = diagnostic.primary_range();

    match primary {
        Some(range) => {
            let _ = write!(
                out,
                "{file_name}:{}:{}: ",
                range.start.line,
                range.start.column + 1
            );
        }
        None => {
            let _ = write!(out, "{file_name}: ");
        }
    }

    let severity_color = match diagnostic.severity {
        Severity::Error => colors::ERROR,
        Severity::Warning => colors::WARNING,
        Severity::Note => colors::NOTE,
    };
    paint(
        &mut out,
        colors,
        severity_color,
        &diagnostic.severity.to_string(),
    );
    paint(
        &mut out,
        colors,
        colors::BOLD,
        &format!("[{}]", diagnostic.code),
    );
    let _ = writeln!(out, ": {}", diagnostic.message);

    if let (Some(range), Some(line)) = (primary, diagnostic.source_line.as_deref()) {
        let number = range.start.line.to_string();
        let gutter = " ".repeat(number.len());
        let start = range.start.column as usize;
        let end = if range.is_multiline() {
            line.len()
        } else {
            range.end.column as usize
        };

        paint(&mut out, colors, colors::GUTTER, &format!("    {number} | "));
        out.push_str(line);
        out.push('\n');
        paint(&mut out, colors, colors::GUTTER, &format!("    {gutter} | "));
        out.push_str(&caret_prefix(line, start));
        paint(&mut out, colors, severity_color, &caret(line, start, end));
        out.push('\n');
    }

    for label in diagnostic.labels.iter().filter(|l| !l.is_primary) {
        let _ = writeln!(out, "  = {}: {}", label.range, label.message);
    }
    for note in &diagnostic.notes {
        let _ = writeln!(out, "  = note: {note}");
    }
    for suggestion in &diagnostic.suggestions {
        let _ = writeln!(out, "  = help: {suggestion}");
    }
    out
}

/// Whitespace matching the line up to byte column `column`, tabs kept so
/// the caret lines up.
fn caret_prefix(line: &str, column: usize) -> String {
    let prefix = line.get(..column.min(line.len())).unwrap_or(line);
    prefix
        .chars()
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect()
}

/// `^` followed by `~` for the rest of the range, at least one character.
fn caret(line: &str, start: usize, end: usize) -> String {
    let width = line
        .get(start.min(line.len())..end.clamp(start, line.len()))
        .map_or(0, |s| s.chars().count());
    let mut marks = String::from("^");
    for _ in 1..width {
        marks.push('~');
    }
    marks
}
