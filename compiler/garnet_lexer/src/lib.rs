//! Lexer for Ruby source.
//!
//! The lexer is mode-driven: the meaning of `-`, `/`, `{`, `do` and many
//! other bytes depends on what came before, tracked as a [`LexMode`] plus
//! the `cond`/`cmdarg`/`paren` [`BitStack`]s. A parser drives [`Lexer`]
//! token by token and may adjust that state between calls; [`lex`]
//! tokenizes a whole string without a parser.
//!
//! Lexical errors are collected as [`LexError`] values and lexing
//! continues. Only [`LexFatal`] conditions stop it.

mod bit_stack;
mod closers;
mod keywords;
mod lex_error;
mod lexer;
mod mode;
mod options;
mod scope;

pub use bit_stack::{BitStack, BitStackUnderflow};
pub use closers::{AwaitedCloser, AwaitedClosers};
pub use keywords::{lookup as lookup_keyword, Keyword};
pub use lex_error::{
    LexError, LexErrorContext, LexErrorKind, LexFatal, LexReplacement, LexSuggestion, LexWarning,
    LexWarningKind, LiteralKind,
};
pub use lexer::Lexer;
pub use mode::{transition, LexMode};
pub use options::{LexerOptions, Pragmas, ShareableConstantValue};
pub use scope::{PoppedScope, ScopeError, ScopeKind, ScopeTable, Variable};

use garnet_diagnostic::Diagnostic;
use garnet_ir::{SharedInterner, Token};
use garnet_lexer_core::StrSource;

/// Everything produced by lexing a whole source.
#[derive(Debug)]
pub struct LexOutput {
    /// Tokens through `EndOfInput`.
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
    pub warnings: Vec<LexWarning>,
    /// The condition that stopped lexing early, if any.
    pub fatal: Option<LexFatal>,
    pub pragmas: Pragmas,
    /// Byte offset of the data after `__END__`.
    pub data_offset: Option<u32>,
    pub interner: SharedInterner,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.fatal.is_some()
    }

    /// Errors, then warnings, then the fatal condition, as diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out: Vec<Diagnostic> = self
            .errors
            .iter()
            .map(LexError::to_diagnostic)
            .chain(self.warnings.iter().map(LexWarning::to_diagnostic))
            .collect();
        if let Some(fatal) = &self.fatal {
            let at = fatal
                .range()
                .or_else(|| self.tokens.last().map(|token| token.range))
                .unwrap_or_default();
            out.push(fatal.to_diagnostic(at));
        }
        out
    }
}

/// Tokenize `source` without a parser.
///
/// Nothing declares local variables, so `a -1` after `a = 1` reads as a
/// call with a negative argument.
pub fn lex(source: &str, options: LexerOptions) -> LexOutput {
    let mut lexer = Lexer::new(StrSource::new(source), options);
    let tokens: Vec<Token> = lexer.by_ref().collect();
    tracing::debug!(tokens = tokens.len(), errors = lexer.errors().len(), "lexed source");
    LexOutput {
        tokens,
        errors: lexer.take_errors(),
        warnings: lexer.take_warnings(),
        fatal: lexer.take_fatal(),
        pragmas: lexer.pragmas().clone(),
        data_offset: lexer.data_offset(),
        interner: lexer.interner().clone(),
    }
}
