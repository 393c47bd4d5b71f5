//! Quoted literals: strings, symbols, regexps, word lists, backticks.
//!
//! Opening a literal emits its `*Beg` token and parks a [`LiteralTerm`].
//! Each later call produces one piece of the body: a `StringContent` run,
//! an interpolation opener (`StringDbeg`, `StringDvar`), or the closer.

use garnet_ir::{SourceRange, Span, Token, TokenFlags, TokenKind, TokenValue};
use tracing::trace;

use super::escape::EscapeFlags;
use super::{is_space, Interpolation, Lexer, StrTerm};
use crate::lex_error::{LexError, LexErrorKind, LexFatal, LiteralKind};
use crate::mode::LexMode;

bitflags::bitflags! {
    /// How a literal body is scanned.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub(super) struct StrFunc: u16 {
        /// Keep backslashes of escapes (regexp source).
        const ESCAPE = 1 << 0;
        /// Process escapes and `#{}` interpolation.
        const EXPAND = 1 << 1;
        const REGEXP = 1 << 2;
        /// Whitespace separates elements.
        const QWORDS = 1 << 3;
        const SYMBOL = 1 << 4;
        /// `<<-` and `<<~`: terminator may be indented.
        const INDENT = 1 << 5;
        /// A `:` right after the closer makes a label.
        const LABEL = 1 << 6;
        /// The first element has not started yet.
        const LIST = 1 << 14;
        /// Body ran out; only the closer is left.
        const TERM = 1 << 15;
    }
}

impl StrFunc {
    pub(super) const SQUOTE: Self = Self::empty();
    pub(super) const DQUOTE: Self = Self::EXPAND;
    pub(super) const XQUOTE: Self = Self::EXPAND;
    pub(super) const REGEXP_LIT: Self = Self::REGEXP.union(Self::ESCAPE).union(Self::EXPAND);
    pub(super) const SWORD: Self = Self::QWORDS.union(Self::LIST);
    pub(super) const DWORD: Self = Self::QWORDS.union(Self::EXPAND).union(Self::LIST);
    pub(super) const SSYM: Self = Self::SYMBOL;
    pub(super) const DSYM: Self = Self::SYMBOL.union(Self::EXPAND);
}

/// An open quoted literal.
#[derive(Clone, Debug)]
pub(super) struct LiteralTerm {
    pub(super) func: StrFunc,
    /// Closing byte.
    pub(super) term: u8,
    /// Opening byte for bracket pairs, which nest.
    pub(super) paren: Option<u8>,
    pub(super) nest: u32,
    /// The next content token starts a new list element.
    pub(super) word_pending: bool,
    pub(super) opened: SourceRange,
    pub(super) opened_span: Span,
}

impl LiteralTerm {
    pub(super) fn literal_kind(&self) -> LiteralKind {
        if self.func.contains(StrFunc::REGEXP) {
            LiteralKind::Regexp
        } else if self.func.contains(StrFunc::QWORDS) {
            LiteralKind::List
        } else {
            LiteralKind::String
        }
    }
}

/// What follows a `#` inside an expanding literal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum Hole {
    /// `#$var`, `#@var`, `#@@var`.
    Dvar,
    /// `#{`.
    Dbeg,
}

/// Regexp option letters.
const REGEXP_OPTIONS: &[u8] = b"imxounse";

/// Escaped in a regexp, these keep their backslash even when they are the
/// terminator.
fn is_simple_re_meta(c: u8) -> bool {
    matches!(c, b'$' | b'*' | b'+' | b'.' | b'?' | b'^' | b'|' | b')' | b']' | b'}' | b'>')
}

impl Lexer<'_> {
    /// Emit the opener of a literal and park its terminator.
    pub(super) fn open_literal(
        &mut self,
        kind: TokenKind,
        func: StrFunc,
        term: u8,
        paren: Option<u8>,
    ) -> Token {
        let mut token = self.emit(kind, TokenValue::None);
        if kind == TokenKind::StringBeg && self.pragmas.frozen_string_literal == Some(true) {
            token.flags.set(TokenFlags::FROZEN);
        }
        self.strterm = Some(StrTerm::Literal(LiteralTerm {
            func,
            term,
            paren,
            nest: 0,
            word_pending: false,
            opened: token.range,
            opened_span: token.span,
        }));
        token
    }

    /// One piece of a literal body.
    pub(super) fn parse_string(&mut self, mut term: LiteralTerm) -> Result<Token, LexFatal> {
        if term.func.contains(StrFunc::TERM) {
            self.buf.mark_token_start();
            self.mode = LexMode::END;
            return Ok(if term.func.contains(StrFunc::REGEXP) {
                self.emit(TokenKind::RegexpEnd, TokenValue::Str(Vec::new()))
            } else {
                self.emit(TokenKind::StringEnd, TokenValue::None)
            });
        }

        let mut c = self.buf.nextc();
        self.buf.mark_last_char();
        if term.func.contains(StrFunc::QWORDS) && c.is_some_and(is_space) {
            while c.is_some_and(is_space) {
                c = self.buf.nextc();
            }
            self.buf.mark_last_char();
            term.word_pending = true;
        }
        if term.func.contains(StrFunc::LIST) {
            term.func.remove(StrFunc::LIST);
            term.word_pending = true;
        }
        if c == Some(term.term) && term.nest == 0 {
            return Ok(self.close_literal(&term));
        }
        if term.word_pending && c.is_some() {
            self.flags.set(TokenFlags::WORD_START);
            term.word_pending = false;
        }

        self.tokbuf.clear();
        if term.func.contains(StrFunc::EXPAND) && c == Some(b'#') {
            match self.peek_variable_name() {
                Some(Hole::Dbeg) => return self.begin_interpolation(StrTerm::Literal(term)),
                Some(Hole::Dvar) => return Ok(self.begin_dvar(StrTerm::Literal(term))),
                None => {
                    self.tokbuf.push(b'#');
                    c = self.buf.nextc();
                }
            }
        }
        self.buf.pushback(c);

        let func = term.func;
        let stop = self.tokadd_string(func, term.term, term.paren, &mut term.nest);
        if stop.is_none() {
            if func.contains(StrFunc::QWORDS) {
                self.push_error(LexError::unterminated(
                    LiteralKind::List,
                    term.opened,
                    term.opened_span,
                ));
                self.mode = LexMode::END;
                self.buf.mark_token_start();
                return Ok(self.emit(TokenKind::StringEnd, TokenValue::None));
            }
            self.push_error(LexError::unterminated(
                term.literal_kind(),
                term.opened,
                term.opened_span,
            ));
            term.func.insert(StrFunc::TERM);
        }
        self.strterm = Some(StrTerm::Literal(term));
        let value = self.take_tokbuf();
        Ok(self.emit(TokenKind::StringContent, value))
    }

    /// The closer was just read.
    fn close_literal(&mut self, term: &LiteralTerm) -> Token {
        if term.func.contains(StrFunc::REGEXP) {
            let options = self.regexp_options();
            self.mode = LexMode::END;
            return self.emit(TokenKind::RegexpEnd, TokenValue::Str(options));
        }
        if term.func.contains(StrFunc::LABEL) && self.is_label_suffix() {
            self.buf.skip(1);
            self.mode = LexMode::BEGIN | LexMode::LABEL;
            return self.emit(TokenKind::LabelEnd, TokenValue::None);
        }
        self.mode = LexMode::END;
        self.emit(TokenKind::StringEnd, TokenValue::None)
    }

    /// Option letters after a regexp's closing `/`.
    fn regexp_options(&mut self) -> Vec<u8> {
        let start = self.buf.position();
        let mut options = Vec::new();
        let mut unknown = String::new();
        loop {
            let c = self.buf.nextc();
            match c {
                Some(b) if b.is_ascii_alphabetic() => {
                    if REGEXP_OPTIONS.contains(&b) {
                        options.push(b);
                    } else {
                        unknown.push(char::from(b));
                    }
                }
                other => {
                    self.buf.pushback(other);
                    break;
                }
            }
        }
        if !unknown.is_empty() {
            let kind = LexErrorKind::UnknownRegexpOption { options: unknown };
            self.report_at(start, |range, span| LexError::new(kind, range, span));
        }
        options
    }

    /// Classify the bytes after a `#` that was just read, without
    /// consuming them.
    pub(super) fn peek_variable_name(&self) -> Option<Hole> {
        let rest = self.buf.rest();
        if rest.len() < 2 {
            return None;
        }
        let at = match rest.first()? {
            b'$' => match rest.get(1) {
                Some(b'-') => 2,
                Some(&b) if b.is_ascii_digit() || is_global_punct(b) => {
                    return Some(Hole::Dvar);
                }
                _ => 1,
            },
            b'@' if rest.get(1) == Some(&b'@') => 2,
            b'@' => 1,
            b'{' => return Some(Hole::Dbeg),
            _ => return None,
        };
        match rest.get(at) {
            Some(&b) if b.is_ascii_alphabetic() || b == b'_' || !b.is_ascii() => Some(Hole::Dvar),
            _ => None,
        }
    }

    /// `#{`: park the literal and lex code until the matching `}`.
    pub(super) fn begin_interpolation(&mut self, term: StrTerm) -> Result<Token, LexFatal> {
        self.buf.skip(1);
        self.nesting.enter()?;
        trace!(depth = self.nesting.depth(), "enter interpolation");
        self.interpolations.push(Interpolation {
            term,
            cond: self.cond,
            cmdarg: self.cmdarg,
            paren: self.paren,
            brace_nest: self.brace_nest,
            mode: self.mode,
        });
        self.push_nesting();
        self.brace_nest = 0;
        self.mode = LexMode::BEGIN;
        self.command_start = true;
        Ok(self.emit(TokenKind::StringDbeg, TokenValue::None))
    }

    /// `}` closing an interpolation, if one is open at this brace depth.
    pub(super) fn end_interpolation(&mut self) -> Option<Token> {
        if self.brace_nest != 0 {
            return None;
        }
        let frame = self.interpolations.pop()?;
        self.nesting.exit();
        trace!(depth = self.nesting.depth(), "leave interpolation");
        self.cond = frame.cond;
        self.cmdarg = frame.cmdarg;
        self.paren = frame.paren;
        self.brace_nest = frame.brace_nest;
        self.mode = frame.mode;
        self.strterm = Some(frame.term);
        Some(self.emit(TokenKind::StringDend, TokenValue::None))
    }

    /// `#$x`, `#@x`: the next token is the variable, then the literal
    /// resumes.
    pub(super) fn begin_dvar(&mut self, term: StrTerm) -> Token {
        self.dvar_resume = Some(term);
        self.mode = LexMode::BEGIN;
        self.emit(TokenKind::StringDvar, TokenValue::None)
    }

    /// Accumulate literal body bytes into the token buffer.
    ///
    /// Stops before the terminator, before `#` that starts interpolation,
    /// and before whitespace in word lists. Returns the byte it stopped at,
    /// or `None` at end of input.
    pub(super) fn tokadd_string(
        &mut self,
        func: StrFunc,
        term: u8,
        paren: Option<u8>,
        nest: &mut u32,
    ) -> Option<u8> {
        loop {
            let c = self.buf.nextc()?;
            if paren == Some(c) {
                *nest += 1;
            } else if c == term {
                if *nest == 0 {
                    self.buf.pushback(Some(c));
                    return Some(c);
                }
                *nest -= 1;
            } else if func.contains(StrFunc::EXPAND)
                && c == b'#'
                && matches!(self.buf.peek(), Some(b'$' | b'@' | b'{'))
            {
                self.buf.pushback(Some(c));
                return Some(c);
            } else if c == b'\\' {
                self.tokadd_backslash(func, term, paren)?;
                continue;
            } else if !c.is_ascii() {
                self.tokadd_mbchar(c);
                continue;
            } else if func.contains(StrFunc::QWORDS) && is_space(c) {
                self.buf.pushback(Some(c));
                return Some(c);
            }
            self.tokbuf.push(c);
        }
    }

    /// A backslash inside a literal body. `None` at end of input.
    fn tokadd_backslash(&mut self, func: StrFunc, term: u8, paren: Option<u8>) -> Option<()> {
        let start = self.last_char_start();
        let c = self.buf.nextc()?;
        match c {
            b'\n' => {
                if func.contains(StrFunc::QWORDS) {
                    self.tokbuf.push(b'\n');
                } else if !func.contains(StrFunc::EXPAND) {
                    self.tokbuf.extend_from_slice(b"\\\n");
                }
            }
            b'\\' => {
                if func.contains(StrFunc::ESCAPE) {
                    self.tokbuf.push(b'\\');
                }
                self.tokbuf.push(b'\\');
            }
            b'u' if func.contains(StrFunc::EXPAND) => {
                self.tokadd_utf8(Some(term), func.contains(StrFunc::REGEXP), start);
            }
            b'u' => self.tokbuf.extend_from_slice(b"\\u"),
            _ if !c.is_ascii() => {
                if !func.contains(StrFunc::EXPAND) {
                    self.tokbuf.push(b'\\');
                }
                self.tokadd_mbchar(c);
            }
            _ if func.contains(StrFunc::REGEXP) => {
                if matches!(c, b'c' | b'C' | b'M') {
                    self.buf.pushback(Some(c));
                    let byte = self.read_escape(EscapeFlags::empty(), start);
                    self.tokbuf.extend_from_slice(format!("\\x{byte:02X}").as_bytes());
                } else if c == term && !is_simple_re_meta(c) {
                    self.tokbuf.push(c);
                } else {
                    self.buf.pushback(Some(c));
                    self.tokadd_escape(start);
                }
            }
            _ if func.contains(StrFunc::EXPAND) => {
                self.buf.pushback(Some(c));
                let byte = self.read_escape(EscapeFlags::empty(), start);
                self.tokbuf.push(byte);
            }
            _ if func.contains(StrFunc::QWORDS) && is_space(c) => self.tokbuf.push(c),
            _ if c != term && paren != Some(c) => {
                self.tokbuf.push(b'\\');
                self.buf.pushback(Some(c));
            }
            _ => self.tokbuf.push(c),
        }
        Some(())
    }
}

/// Single-byte global variable names: `$~`, `$*`, `$$`, ...
pub(super) fn is_global_punct(b: u8) -> bool {
    b"~*$?!@/\\;,.=:<>\"&`'+0_".contains(&b)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
