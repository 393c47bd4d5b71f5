//! Tokens produced by the lexer.

mod flags;
mod kind;
mod value;

pub use flags::TokenFlags;
pub use kind::TokenKind;
pub use value::{NumberSuffix, NumericValue, TokenValue};

use crate::{SourceRange, Span};

/// One lexed token.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub range: SourceRange,
    pub span: Span,
    pub flags: TokenFlags,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, range: SourceRange, span: Span) -> Self {
        Token {
            kind,
            value,
            range,
            span,
            flags: TokenFlags::EMPTY,
        }
    }

    /// Zero-width token with no value, for synthesized markers.
    pub fn synthetic(kind: TokenKind, range: SourceRange, span: Span) -> Self {
        Token {
            kind,
            value: TokenValue::None,
            range,
            span,
            flags: TokenFlags::from_bits(TokenFlags::SYNTHETIC),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
