//! Per-token metadata flags.

/// Per-token metadata flags packed into a `u16`.
///
/// Records layout facts the parser needs but that do not change the token
/// kind: preceding whitespace, word-list element boundaries, recovery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TokenFlags(u16);

impl TokenFlags {
    /// Whitespace preceded this token.
    pub const SPACE_BEFORE: u16 = 1 << 0;
    /// A newline (significant or skipped) preceded this token.
    pub const NEWLINE_BEFORE: u16 = 1 << 1;
    /// First token of a `%w`/`%W`/`%i`/`%I` element.
    pub const WORD_START: u16 = 1 << 2;
    /// The lexer reported an error while producing this token.
    pub const HAS_ERROR: u16 = 1 << 3;
    /// Synthesized for recovery; no source bytes back it.
    pub const SYNTHETIC: u16 = 1 << 4;
    /// String opened while `frozen_string_literal: true` was in effect.
    pub const FROZEN: u16 = 1 << 5;
    /// Content belongs to a heredoc body.
    pub const HEREDOC: u16 = 1 << 6;
    /// Token was read as a command name at statement start.
    pub const COMMAND_START: u16 = 1 << 7;

    pub const EMPTY: Self = TokenFlags(0);

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        TokenFlags(bits)
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn contains(self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn set(&mut self, flag: u16) {
        self.0 |= flag;
    }

    #[inline]
    #[must_use]
    pub const fn with(self, flag: u16) -> Self {
        TokenFlags(self.0 | flag)
    }

    #[inline]
    pub const fn has_space_before(self) -> bool {
        self.contains(Self::SPACE_BEFORE)
    }

    #[inline]
    pub const fn is_word_start(self) -> bool {
        self.contains(Self::WORD_START)
    }

    #[inline]
    pub const fn has_error(self) -> bool {
        self.contains(Self::HAS_ERROR)
    }
}
