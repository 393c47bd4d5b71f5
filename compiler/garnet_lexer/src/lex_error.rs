//! Lexer errors, warnings and fatal conditions.
//!
//! Errors follow the WHERE+WHAT+WHY+HOW shape:
//! - WHERE: `range`/`span` locating the error in source, plus the line text
//!   for the excerpt
//! - WHAT: `kind` describing what went wrong
//! - WHY: `context` explaining what the lexer was doing
//! - HOW: `suggestions` providing actionable fixes
//!
//! Errors and warnings are values accumulated by the lexer; scanning goes
//! on. [`LexFatal`] is the exception: after one, no further byte can be
//! interpreted.

use std::fmt;
use std::io;

use garnet_diagnostic::{Diagnostic, ErrorCode};
use garnet_ir::{SourcePos, SourceRange, Span};
use garnet_stack::NestingExceeded;
use thiserror::Error;

use crate::bit_stack::BitStackUnderflow;

/// A recoverable lexer error with full context for diagnostic rendering.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    /// WHERE the error occurred (line/column).
    pub range: SourceRange,
    /// WHERE the error occurred (byte offsets).
    pub span: Span,
    /// WHAT went wrong.
    pub kind: LexErrorKind,
    /// WHY we were checking (lexing context at the point of error).
    pub context: LexErrorContext,
    /// HOW to fix (actionable suggestions).
    pub suggestions: Vec<LexSuggestion>,
    /// Text of the line the range starts on.
    pub line_text: Option<String>,
}

/// Which literal ran into end of input.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LiteralKind {
    String,
    Regexp,
    /// `%w`, `%W`, `%i`, `%I`
    List,
    /// `%` with nothing after the type letter.
    Quoted,
}

/// What kind of lexer error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    // === Literal Errors ===
    /// End of input inside a quoted literal.
    Unterminated { literal: LiteralKind },
    /// End of input before a heredoc terminator line.
    UnterminatedHeredoc { id: String },
    /// Quoted heredoc identifier not closed on its line.
    UnterminatedHeredocId,
    /// `=begin` without `=end`.
    UnterminatedEmbeddedDoc,
    /// `%` followed by a letter that names no literal type.
    UnknownPercentType,
    /// Letters after a regexp's closing delimiter that are not options.
    UnknownRegexpOption { options: String },

    // === Escape Errors ===
    /// Malformed `\M-`, `\C-`, `\c` or a backslash at end of input.
    InvalidEscape,
    /// `\x` without hex digits.
    InvalidHexEscape,
    /// `\u` not followed by four hex digits, or an empty `\u{}` element.
    InvalidUnicodeEscape,
    /// `\u{` without `}`.
    UnterminatedUnicodeEscape,
    /// Code point above U+10FFFF.
    UnicodeCodepointTooLarge,
    /// Surrogate code point.
    InvalidUnicodeCodepoint,
    /// `?\u{41 42}`: a character literal names one character.
    MultipleCodepoints,

    // === Numeric Errors ===
    /// `0x`, `0b`, `0d`, `0o` with no digits after the prefix.
    NumericWithoutDigits,
    /// `1_`, `1__2`, `1e+`: the number ends on a separator or sign.
    TrailingNonDigit { byte: char },
    /// `08`.
    InvalidOctalDigit,
    /// `1.2.3`: a second fraction after a complete number.
    UnexpectedFraction,
    /// `.5`
    NoDotDigitFloat,

    // === Character Errors ===
    /// A byte that starts no token.
    InvalidChar { byte: u8 },
    /// Bytes that are not a character in the source encoding.
    InvalidMultibyte { encoding: &'static str },
    /// `\` not followed by a newline.
    StrayBackslash,
    /// `?` at end of input.
    IncompleteCharSyntax,

    // === Variable Name Errors ===
    /// `@`, `@@` or `$` followed by nothing usable.
    MissingVariableName { sigil: &'static str },
    /// `@1`, `@@1`, `$%`.
    InvalidVariableName { sigil: &'static str, found: char },
}

/// Lexing context at the point of error: the WHY.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum LexErrorContext {
    /// Top-level scanning (not inside any literal).
    #[default]
    TopLevel,
    /// Inside a quoted literal opened at `opened`.
    InsideLiteral { opened: SourcePos },
    /// Inside a heredoc body whose opener is at `opened`.
    InsideHeredoc { opened: SourcePos },
    /// Inside a backslash escape.
    EscapeSequence,
    /// Inside a numeric literal.
    NumberLiteral,
    /// After `$`, `@` or `@@`.
    VariableName,
}

/// Suggestion for fixing a lexical error: the HOW.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexSuggestion {
    /// Human-readable message describing the fix.
    pub message: String,
    /// Concrete text replacement for auto-fix, if applicable.
    pub replacement: Option<LexReplacement>,
    /// Priority (lower = more likely relevant). 0 = most likely.
    pub priority: u8,
}

/// A concrete text replacement for an auto-fix.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexReplacement {
    /// The span to replace.
    pub span: Span,
    /// The replacement text.
    pub text: String,
}

impl LexSuggestion {
    /// Create a text-only suggestion (no code replacement).
    pub fn text(message: impl Into<String>, priority: u8) -> Self {
        Self {
            message: message.into(),
            replacement: None,
            priority,
        }
    }

    /// Create a suggestion with a removal (replace span with empty string).
    pub fn removal(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            replacement: Some(LexReplacement {
                span,
                text: String::new(),
            }),
            priority: 0,
        }
    }

    /// Create a suggestion with a replacement.
    pub fn replace(message: impl Into<String>, span: Span, text: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            replacement: Some(LexReplacement {
                span,
                text: text.into(),
            }),
            priority: 0,
        }
    }
}

impl LexErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            LexErrorKind::Unterminated { .. } => ErrorCode::E0001,
            LexErrorKind::InvalidChar { .. } | LexErrorKind::StrayBackslash => ErrorCode::E0002,
            LexErrorKind::NumericWithoutDigits
            | LexErrorKind::TrailingNonDigit { .. }
            | LexErrorKind::InvalidOctalDigit
            | LexErrorKind::UnexpectedFraction => ErrorCode::E0003,
            LexErrorKind::IncompleteCharSyntax => ErrorCode::E0004,
            LexErrorKind::InvalidEscape | LexErrorKind::InvalidHexEscape => ErrorCode::E0005,
            LexErrorKind::InvalidUnicodeEscape
            | LexErrorKind::UnterminatedUnicodeEscape
            | LexErrorKind::UnicodeCodepointTooLarge
            | LexErrorKind::InvalidUnicodeCodepoint
            | LexErrorKind::MultipleCodepoints => ErrorCode::E0006,
            LexErrorKind::UnterminatedHeredoc { .. } | LexErrorKind::UnterminatedHeredocId => {
                ErrorCode::E0007
            }
            LexErrorKind::UnknownPercentType => ErrorCode::E0008,
            LexErrorKind::UnknownRegexpOption { .. } => ErrorCode::E0009,
            LexErrorKind::UnterminatedEmbeddedDoc => ErrorCode::E0010,
            LexErrorKind::MissingVariableName { .. } | LexErrorKind::InvalidVariableName { .. } => {
                ErrorCode::E0011
            }
            LexErrorKind::InvalidMultibyte { .. } => ErrorCode::E0013,
            LexErrorKind::NoDotDigitFloat => ErrorCode::E0014,
        }
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::Unterminated { literal } => match literal {
                LiteralKind::String => f.write_str("unterminated string meets end of file"),
                LiteralKind::Regexp => f.write_str("unterminated regexp meets end of file"),
                LiteralKind::List => f.write_str("unterminated list meets end of file"),
                LiteralKind::Quoted => f.write_str("unterminated quoted string meets end of file"),
            },
            LexErrorKind::UnterminatedHeredoc { id } => {
                write!(f, "can't find string \"{id}\" anywhere before EOF")
            }
            LexErrorKind::UnterminatedHeredocId => {
                f.write_str("unterminated here document identifier")
            }
            LexErrorKind::UnterminatedEmbeddedDoc => {
                f.write_str("embedded document meets end of file")
            }
            LexErrorKind::UnknownPercentType => f.write_str("unknown type of %string"),
            LexErrorKind::UnknownRegexpOption { options } => {
                let plural = if options.chars().count() > 1 { "s" } else { "" };
                write!(f, "unknown regexp option{plural} - {options}")
            }
            LexErrorKind::InvalidEscape => f.write_str("Invalid escape character syntax"),
            LexErrorKind::InvalidHexEscape => f.write_str("invalid hex escape"),
            LexErrorKind::InvalidUnicodeEscape => f.write_str("invalid Unicode escape"),
            LexErrorKind::UnterminatedUnicodeEscape => f.write_str("unterminated Unicode escape"),
            LexErrorKind::UnicodeCodepointTooLarge => {
                f.write_str("invalid Unicode codepoint (too large)")
            }
            LexErrorKind::InvalidUnicodeCodepoint => f.write_str("invalid Unicode codepoint"),
            LexErrorKind::MultipleCodepoints => {
                f.write_str("Multiple codepoints at single character literal")
            }
            LexErrorKind::NumericWithoutDigits => f.write_str("numeric literal without digits"),
            LexErrorKind::TrailingNonDigit { byte } => write!(f, "trailing '{byte}' in number"),
            LexErrorKind::InvalidOctalDigit => f.write_str("Invalid octal digit"),
            LexErrorKind::UnexpectedFraction => {
                f.write_str("unexpected fraction part after numeric literal")
            }
            LexErrorKind::NoDotDigitFloat => {
                f.write_str("no .<digit> floating literal anymore; put 0 before dot")
            }
            LexErrorKind::InvalidChar { byte } => {
                write!(f, "Invalid char `\\x{byte:02X}' in expression")
            }
            LexErrorKind::InvalidMultibyte { encoding } => {
                write!(f, "invalid multibyte char ({encoding})")
            }
            LexErrorKind::StrayBackslash => f.write_str("backslash appearing outside of a literal"),
            LexErrorKind::IncompleteCharSyntax => f.write_str("incomplete character syntax"),
            LexErrorKind::MissingVariableName { sigil } => write!(
                f,
                "`{sigil}' without identifiers is not allowed as {}",
                variable_noun(sigil)
            ),
            LexErrorKind::InvalidVariableName { sigil, found } => write!(
                f,
                "`{sigil}{found}' is not allowed as {}",
                variable_noun(sigil)
            ),
        }
    }
}

fn variable_noun(sigil: &str) -> &'static str {
    match sigil {
        "@" => "an instance variable name",
        "@@" => "a class variable name",
        _ => "a global variable name",
    }
}

impl LexError {
    /// Create an error with no context or suggestions.
    #[cold]
    pub fn new(kind: LexErrorKind, range: SourceRange, span: Span) -> Self {
        Self {
            range,
            span,
            kind,
            context: LexErrorContext::TopLevel,
            suggestions: Vec::new(),
            line_text: None,
        }
    }

    /// Create an unterminated-literal error pointing at the opener.
    #[cold]
    pub fn unterminated(literal: LiteralKind, range: SourceRange, span: Span) -> Self {
        Self::new(LexErrorKind::Unterminated { literal }, range, span)
            .with_context(LexErrorContext::InsideLiteral {
                opened: range.start,
            })
    }

    /// Create an unterminated-heredoc error pointing at the opener.
    #[cold]
    pub fn unterminated_heredoc(id: &[u8], range: SourceRange, span: Span) -> Self {
        let id = String::from_utf8_lossy(id).into_owned();
        let suggestion = LexSuggestion::text(format!("add a line containing only `{id}`"), 0);
        Self::new(LexErrorKind::UnterminatedHeredoc { id }, range, span)
            .with_context(LexErrorContext::InsideHeredoc {
                opened: range.start,
            })
            .with_suggestion(suggestion)
    }

    /// Create an invalid-character error.
    #[cold]
    pub fn invalid_char(byte: u8, range: SourceRange, span: Span) -> Self {
        Self::new(LexErrorKind::InvalidChar { byte }, range, span)
            .with_suggestion(LexSuggestion::removal("remove this byte", span))
    }

    /// Create a `.5`-style float error.
    #[cold]
    pub fn no_dot_digit_float(range: SourceRange, span: Span) -> Self {
        Self::new(LexErrorKind::NoDotDigitFloat, range, span)
            .with_context(LexErrorContext::NumberLiteral)
            .with_suggestion(LexSuggestion::replace(
                "add a leading zero",
                Span::point(span.start),
                "0",
            ))
    }

    /// Create a malformed-numeric error.
    #[cold]
    pub fn numeric(kind: LexErrorKind, range: SourceRange, span: Span) -> Self {
        Self::new(kind, range, span).with_context(LexErrorContext::NumberLiteral)
    }

    /// Create an escape-sequence error.
    #[cold]
    pub fn escape(kind: LexErrorKind, range: SourceRange, span: Span) -> Self {
        Self::new(kind, range, span).with_context(LexErrorContext::EscapeSequence)
    }

    /// Create an error for `@`, `@@` or `$` without a usable name.
    #[cold]
    pub fn variable_name(kind: LexErrorKind, range: SourceRange, span: Span) -> Self {
        Self::new(kind, range, span).with_context(LexErrorContext::VariableName)
    }

    #[must_use]
    pub fn with_context(mut self, context: LexErrorContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: LexSuggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    #[must_use]
    pub fn with_line_text(mut self, line: impl Into<String>) -> Self {
        self.line_text = Some(line.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code())
            .with_message(self.kind.to_string())
            .with_label(self.range, "");
        match self.context {
            LexErrorContext::InsideLiteral { opened } | LexErrorContext::InsideHeredoc { opened }
                if opened != self.range.start =>
            {
                diag = diag.with_secondary_label(SourceRange::point(opened), "literal opened here");
            }
            _ => {}
        }
        let mut suggestions: Vec<&LexSuggestion> = self.suggestions.iter().collect();
        suggestions.sort_by_key(|s| s.priority);
        for suggestion in suggestions {
            diag = diag.with_suggestion(suggestion.message.clone());
        }
        if let Some(line) = &self.line_text {
            diag = diag.with_source_line(line.clone());
        }
        diag
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.range.start.line,
            self.range.start.column + 1,
            self.kind
        )
    }
}

/// A warning: the input is valid but probably not what was meant.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexWarning {
    pub range: SourceRange,
    pub span: Span,
    pub kind: LexWarningKind,
    pub line_text: Option<String>,
}

/// What the warning is about.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexWarningKind {
    // === Spacing ===
    /// `foo -1`, `foo /re/`: read as a prefix, but could be binary.
    AmbiguousFirstArgument { op: char },
    /// `a -b` where `a` is a local: read as binary, but looks like a prefix.
    AmbiguousOperator { op: &'static str, seems_like: &'static str },
    /// `foo *args`, `foo **opts`, `foo &blk`.
    ArgumentPrefix { op: &'static str },
    /// `? ` with whitespace after the `?`.
    SpaceAfterQuestion { escape: char },
    /// `x ?a:b`-style: `?` followed by an identifier.
    QuestionBeforeIdentifier { text: String },

    // === Magic Comments ===
    /// Boolean or enum pragma with an unrecognized value.
    InvalidMagicValue { name: String, value: String },
    /// Pragma that only applies before the first token.
    MagicCommentIgnored { name: String },

    // === Input ===
    /// Lone `\r`.
    CarriageReturn,

    // === Literals ===
    /// `$N` with N past the supported range.
    NthRefTooBig { text: String },
    /// Float literal outside `f64` range.
    FloatOutOfRange { text: String },

    // === Scopes ===
    /// Local assigned but never read.
    UnusedVariable { name: String },
}

impl LexWarningKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            LexWarningKind::AmbiguousFirstArgument { .. } => ErrorCode::W0001,
            LexWarningKind::AmbiguousOperator { .. } => ErrorCode::W0002,
            LexWarningKind::ArgumentPrefix { .. } => ErrorCode::W0003,
            LexWarningKind::SpaceAfterQuestion { .. }
            | LexWarningKind::QuestionBeforeIdentifier { .. } => ErrorCode::W0004,
            LexWarningKind::InvalidMagicValue { .. } => ErrorCode::W0005,
            LexWarningKind::MagicCommentIgnored { .. } => ErrorCode::W0006,
            LexWarningKind::CarriageReturn => ErrorCode::W0007,
            LexWarningKind::NthRefTooBig { .. } => ErrorCode::W0008,
            LexWarningKind::FloatOutOfRange { .. } => ErrorCode::W0009,
            LexWarningKind::UnusedVariable { .. } => ErrorCode::W0010,
        }
    }
}

impl fmt::Display for LexWarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexWarningKind::AmbiguousFirstArgument { op: '/' } => f.write_str(
                "ambiguity between regexp and two divisions: wrap regexp in parentheses or add a space after `/' operator",
            ),
            LexWarningKind::AmbiguousFirstArgument { op } => write!(
                f,
                "ambiguous first argument; put parentheses or a space even after `{op}' operator"
            ),
            LexWarningKind::AmbiguousOperator { op, seems_like } => write!(
                f,
                "`{op}' after local variable or literal is interpreted as binary operator even though it seems like {seems_like}"
            ),
            LexWarningKind::ArgumentPrefix { op } => {
                write!(f, "`{op}' interpreted as argument prefix")
            }
            LexWarningKind::SpaceAfterQuestion { escape } => {
                write!(f, "invalid character syntax; use ?\\{escape}")
            }
            LexWarningKind::QuestionBeforeIdentifier { text } => write!(
                f,
                "`?' just followed by `{text}' is interpreted as a conditional operator, put a space after `?'"
            ),
            LexWarningKind::InvalidMagicValue { name, value } => {
                write!(f, "invalid value for {name}: {value}")
            }
            LexWarningKind::MagicCommentIgnored { name } => {
                write!(f, "`{name}' is ignored after any tokens")
            }
            LexWarningKind::CarriageReturn => {
                f.write_str("encountered \\r in middle of line, treated as a mere space")
            }
            LexWarningKind::NthRefTooBig { text } => {
                write!(f, "`{text}' is too big for a number variable, always nil")
            }
            LexWarningKind::FloatOutOfRange { text } => write!(f, "Float {text} out of range"),
            LexWarningKind::UnusedVariable { name } => {
                write!(f, "assigned but unused variable - {name}")
            }
        }
    }
}

impl LexWarning {
    #[cold]
    pub fn new(kind: LexWarningKind, range: SourceRange, span: Span) -> Self {
        Self {
            range,
            span,
            kind,
            line_text: None,
        }
    }

    #[must_use]
    pub fn with_line_text(mut self, line: impl Into<String>) -> Self {
        self.line_text = Some(line.into());
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::warning(self.kind.code())
            .with_message(self.kind.to_string())
            .with_label(self.range, "");
        match &self.line_text {
            Some(line) => diag.with_source_line(line.clone()),
            None => diag,
        }
    }
}

/// Conditions that end tokenization.
#[derive(Debug, Error)]
pub enum LexFatal {
    /// Magic comment or option names an encoding we do not know.
    #[error("unknown encoding name: {name}")]
    UnknownEncoding { name: String, range: SourceRange },

    /// UTF-16/UTF-32 and friends: ASCII bytes no longer mean ASCII.
    #[error("{name} is not ASCII compatible")]
    IncompatibleEncoding { name: String, range: SourceRange },

    /// The line source failed.
    #[error("failed to read source: {0}")]
    Io(#[from] io::Error),

    /// A parser popped a context stack it never pushed.
    #[error("internal error: {stack} stack underflow")]
    BitStackUnderflow {
        stack: &'static str,
        #[source]
        source: BitStackUnderflow,
    },

    /// Interpolation nested past the configured limit.
    #[error(transparent)]
    NestingExceeded(#[from] NestingExceeded),
}

impl LexFatal {
    pub fn code(&self) -> ErrorCode {
        match self {
            LexFatal::UnknownEncoding { .. } | LexFatal::IncompatibleEncoding { .. } => {
                ErrorCode::E0012
            }
            LexFatal::Io(_) => ErrorCode::E0901,
            LexFatal::BitStackUnderflow { .. } => ErrorCode::E0902,
            LexFatal::NestingExceeded(_) => ErrorCode::E0903,
        }
    }

    /// Where the condition was detected, when it has a location.
    pub fn range(&self) -> Option<SourceRange> {
        match self {
            LexFatal::UnknownEncoding { range, .. } | LexFatal::IncompatibleEncoding { range, .. } => {
                Some(*range)
            }
            _ => None,
        }
    }

    /// `at` locates conditions that carry no range of their own.
    pub fn to_diagnostic(&self, at: SourceRange) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(self.range().unwrap_or(at), "")
    }
}
