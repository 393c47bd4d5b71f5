use std::fmt;

/// Error codes for lexer diagnostics.
///
/// - E00xx: lexical errors
/// - E05xx: scope errors
/// - E09xx: internal and input failures
/// - W00xx: lexical warnings
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Unterminated string, regexp, list or symbol literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Malformed numeric literal
    E0003,
    /// Incomplete character literal
    E0004,
    /// Invalid escape sequence
    E0005,
    /// Invalid Unicode escape or code point
    E0006,
    /// Unterminated heredoc
    E0007,
    /// Unknown `%` literal type
    E0008,
    /// Unknown regexp option
    E0009,
    /// Unterminated embedded document
    E0010,
    /// Invalid variable name after `$`, `@` or `@@`
    E0011,
    /// Unknown or ASCII-incompatible source encoding
    E0012,
    /// Invalid byte sequence for the source encoding
    E0013,
    /// `.5`-style float literal
    E0014,

    /// Duplicated argument name
    E0501,
    /// Assignment to a read-only variable
    E0502,

    /// Input could not be read
    E0901,
    /// Internal nesting invariant violated
    E0902,
    /// Nesting too deep
    E0903,

    /// Ambiguous first argument
    W0001,
    /// Operator spacing suggests a different reading
    W0002,
    /// `*`, `**` or `&` interpreted as an argument prefix
    W0003,
    /// `?` followed by whitespace
    W0004,
    /// Invalid magic comment value
    W0005,
    /// Magic comment in the wrong place
    W0006,
    /// `\r` in the middle of a line
    W0007,
    /// Numbered reference too large
    W0008,
    /// Float literal out of range
    W0009,
    /// Assigned but unused variable
    W0010,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E0008 => "E0008",
            ErrorCode::E0009 => "E0009",
            ErrorCode::E0010 => "E0010",
            ErrorCode::E0011 => "E0011",
            ErrorCode::E0012 => "E0012",
            ErrorCode::E0013 => "E0013",
            ErrorCode::E0014 => "E0014",
            ErrorCode::E0501 => "E0501",
            ErrorCode::E0502 => "E0502",
            ErrorCode::E0901 => "E0901",
            ErrorCode::E0902 => "E0902",
            ErrorCode::E0903 => "E0903",
            ErrorCode::W0001 => "W0001",
            ErrorCode::W0002 => "W0002",
            ErrorCode::W0003 => "W0003",
            ErrorCode::W0004 => "W0004",
            ErrorCode::W0005 => "W0005",
            ErrorCode::W0006 => "W0006",
            ErrorCode::W0007 => "W0007",
            ErrorCode::W0008 => "W0008",
            ErrorCode::W0009 => "W0009",
            ErrorCode::W0010 => "W0010",
        }
    }

    pub fn is_warning(&self) -> bool {
        self.as_str().starts_with('W')
    }

    /// Conditions that stop tokenization.
    pub fn is_fatal(&self) -> bool {
        self.as_str().starts_with("E09") || matches!(self, ErrorCode::E0012)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
