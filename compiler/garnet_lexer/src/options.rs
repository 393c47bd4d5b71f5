//! Lexer configuration and the pragmas found in source.

use garnet_lexer_core::SourceEncoding;
use garnet_stack::DEFAULT_MAX_NESTING;

/// Settings fixed when a [`Lexer`](crate::Lexer) is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexerOptions {
    /// Name used in rendered diagnostics.
    pub file_name: String,
    /// Number of the first line.
    pub start_line: u32,
    /// Synthesize `DummyEnd` tokens for awaited closers at end of input.
    pub error_tolerant: bool,
    /// Encoding until a BOM or magic comment says otherwise.
    pub default_encoding: SourceEncoding,
    /// Record warnings.
    pub verbose: bool,
    /// `frozen_string_literal` before any magic comment sets it.
    pub frozen_string_literal: Option<bool>,
    /// Deepest allowed `#{}` nesting.
    pub max_nesting: u32,
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions {
            file_name: String::from("-"),
            start_line: 1,
            error_tolerant: false,
            default_encoding: SourceEncoding::UTF_8,
            verbose: true,
            frozen_string_literal: None,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

impl LexerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    #[must_use]
    pub fn start_line(mut self, line: u32) -> Self {
        self.start_line = line;
        self
    }

    #[must_use]
    pub fn error_tolerant(mut self, on: bool) -> Self {
        self.error_tolerant = on;
        self
    }

    #[must_use]
    pub fn default_encoding(mut self, encoding: SourceEncoding) -> Self {
        self.default_encoding = encoding;
        self
    }

    #[must_use]
    pub fn verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }

    #[must_use]
    pub fn frozen_string_literal(mut self, frozen: bool) -> Self {
        self.frozen_string_literal = Some(frozen);
        self
    }

    #[must_use]
    pub fn max_nesting(mut self, depth: u32) -> Self {
        self.max_nesting = depth;
        self
    }
}

/// Values of `shareable_constant_value`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShareableConstantValue {
    #[default]
    None,
    Literal,
    ExperimentalEverything,
    ExperimentalCopy,
}

impl ShareableConstantValue {
    /// Parse a pragma value, ignoring ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        const VALUES: [(&str, ShareableConstantValue); 4] = [
            ("none", ShareableConstantValue::None),
            ("literal", ShareableConstantValue::Literal),
            (
                "experimental_everything",
                ShareableConstantValue::ExperimentalEverything,
            ),
            ("experimental_copy", ShareableConstantValue::ExperimentalCopy),
        ];
        VALUES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
            .map(|&(_, v)| v)
    }
}

/// Magic-comment settings seen so far. The lexer records them; their
/// meaning belongs to later stages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pragmas {
    pub frozen_string_literal: Option<bool>,
    pub warn_indent: Option<bool>,
    pub shareable_constant_value: ShareableConstantValue,
    /// Encoding named by a `coding:` comment or BOM.
    pub encoding: Option<SourceEncoding>,
}
