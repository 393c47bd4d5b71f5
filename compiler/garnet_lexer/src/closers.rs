//! Closers the parser is still waiting for.
//!
//! When the parser opens a construct that needs `end` (or `}` or `)`), it
//! records the opener here. If input runs out first and the lexer is
//! error-tolerant, each record left on the stack becomes one synthetic
//! `DummyEnd` token, innermost first.

use garnet_ir::{SourceRange, TokenKind};

/// One awaited closer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AwaitedCloser {
    /// Token that opened the construct.
    pub opener: TokenKind,
    /// Where it was opened.
    pub range: SourceRange,
}

#[derive(Clone, Debug, Default)]
pub struct AwaitedClosers {
    stack: Vec<AwaitedCloser>,
}

impl AwaitedClosers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, opener: TokenKind, range: SourceRange) {
        self.stack.push(AwaitedCloser { opener, range });
    }

    /// The innermost construct closed normally.
    pub fn pop(&mut self) -> Option<AwaitedCloser> {
        self.stack.pop()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Innermost first.
    pub fn iter(&self) -> impl Iterator<Item = &AwaitedCloser> {
        self.stack.iter().rev()
    }
}
