//! Identifiers, reserved words, labels and sigiled variables.

use garnet_ir::{Token, TokenKind, TokenValue};
use tracing::trace;

use super::string_term::is_global_punct;
use super::{is_identchar, is_space, Lexer};
use crate::keywords::{self, Keyword};
use crate::lex_error::{LexError, LexErrorKind, LexWarningKind};
use crate::mode::LexMode;

/// Largest `$N` back-reference number.
const MAX_NTH_REF: u32 = (1 << 30) - 1;

impl Lexer<'_> {
    /// A bare word starting with `first`: identifier, constant, method name
    /// with `!`/`?`/`=`, label, or reserved word.
    pub(super) fn lex_identifier(&mut self, first: u8) -> Token {
        let last_state = self.mode;
        self.tokbuf.clear();
        let (c, ascii) = self.read_ident(first);

        let mut kind = TokenKind::Constant;
        match c {
            Some(b @ (b'!' | b'?')) if !self.buf.peek_is(b'=') => {
                kind = TokenKind::Fid;
                self.tokbuf.push(b);
            }
            Some(b'=')
                if self.mode.contains(LexMode::FNAME)
                    && !self.buf.peek_is(b'~')
                    && !self.buf.peek_is(b'>')
                    && (!self.buf.peek_is(b'=') || self.buf.peek_at(1) == Some(b'>')) =>
            {
                kind = TokenKind::Ident;
                self.tokbuf.push(b'=');
            }
            _ => self.buf.pushback(c),
        }

        if self.mode.is_label_possible(self.command_state) && self.is_label_suffix() {
            self.buf.skip(1);
            self.mode = LexMode::ARG | LexMode::LABELED;
            let value = self.intern_tokbuf();
            return self.emit(TokenKind::Label, value);
        }

        if ascii && !self.mode.contains(LexMode::DOT) {
            if let Some(keyword) = keywords::lookup(&self.tokbuf) {
                return self.keyword(keyword);
            }
        }

        self.mode = if last_state.intersects(LexMode::BEG_ANY | LexMode::ARG_ANY | LexMode::DOT) {
            if self.command_state {
                LexMode::CMD_ARG
            } else {
                LexMode::ARG
            }
        } else if last_state == LexMode::FNAME {
            LexMode::END_FN
        } else {
            LexMode::END
        };

        if kind == TokenKind::Constant && !self.encoding.is_upper(&self.tokbuf) {
            kind = TokenKind::Ident;
        }
        let value = self.intern_tokbuf();
        if kind == TokenKind::Ident && !last_state.intersects(LexMode::DOT | LexMode::FNAME) {
            if let Some(name) = value.name().filter(|&name| self.scopes.is_defined_name(name)) {
                self.mode = LexMode::END | LexMode::LABEL;
                self.scopes.mark_used(name);
            }
        }
        self.emit(kind, value)
    }

    fn keyword(&mut self, keyword: &Keyword) -> Token {
        let state = self.mode;
        if state.intersects(LexMode::FNAME) {
            self.mode = LexMode::END_FN;
            let value = self.intern_tokbuf();
            return self.emit(keyword.kind, value);
        }
        self.mode = keyword.mode;
        if self.mode.intersects(LexMode::BEGIN) {
            self.command_start = true;
        }
        if keyword.kind == TokenKind::Do {
            let kind = self.do_keyword(state);
            return self.emit(kind, TokenValue::None);
        }
        let kind = if state.intersects(LexMode::BEGIN | LexMode::LABELED | LexMode::CLASS) {
            keyword.kind
        } else {
            if keyword.has_modifier() {
                self.mode = LexMode::BEGIN | LexMode::LABEL;
            }
            keyword.modifier
        };
        match kind {
            TokenKind::While | TokenKind::Until => self.begin_loop_head(),
            TokenKind::For => self.pending_for += 1,
            TokenKind::In if self.pending_for > 0 => {
                self.pending_for -= 1;
                self.begin_loop_head();
            }
            _ => {}
        }
        self.emit(kind, TokenValue::None)
    }

    /// `while`, `until` and `for ... in` open a loop head: a `do` before the
    /// next statement boundary belongs to the loop.
    fn begin_loop_head(&mut self) {
        self.cond.push(true);
        self.loop_heads += 1;
        trace!(depth = self.loop_heads, "loop head");
    }

    /// Which `do` this is: lambda body, loop body, command block, or plain.
    fn do_keyword(&mut self, prev: LexMode) -> TokenKind {
        if self.paren.top() {
            self.paren.set_top(false);
            return TokenKind::DoLambda;
        }
        if self.cond.top() {
            if self.loop_heads > 0 {
                self.cond.pop_if_any();
                self.loop_heads -= 1;
            }
            return TokenKind::DoCond;
        }
        if self.cmdarg.top() && !prev.contains(LexMode::CMD_ARG) {
            return TokenKind::DoBlock;
        }
        if prev.intersects(LexMode::BEGIN | LexMode::END_ARG) {
            return TokenKind::DoBlock;
        }
        TokenKind::Do
    }

    // === Sigiled Variables ===

    /// After `$`.
    pub(super) fn lex_gvar(&mut self) -> Token {
        let last_state = self.last_state;
        self.mode = LexMode::END;
        self.tokbuf.clear();
        self.tokbuf.push(b'$');
        let c = self.buf.nextc();
        match c {
            Some(b'_') if self.buf.peek().is_some_and(is_identchar) => {
                let (stop, _) = self.read_ident(b'_');
                self.buf.pushback(stop);
            }
            Some(b @ (b'&' | b'`' | b'\'' | b'+')) => {
                if !last_state.intersects(LexMode::FNAME) {
                    return self.emit(TokenKind::BackRef, TokenValue::BackRef(b));
                }
                self.tokbuf.push(b);
            }
            Some(b) if is_global_punct(b) => self.tokbuf.push(b),
            Some(b'-') => {
                self.tokbuf.push(b'-');
                match self.buf.nextc() {
                    Some(b) if is_identchar(b) => self.tokadd_mbchar(b),
                    other => {
                        self.buf.pushback(other);
                        self.report(|range, span| {
                            LexError::variable_name(
                                LexErrorKind::InvalidVariableName { sigil: "$", found: '-' },
                                range,
                                span,
                            )
                        });
                    }
                }
            }
            Some(d @ b'1'..=b'9') => return self.nth_ref(d, last_state),
            Some(b) if is_identchar(b) => {
                let (stop, _) = self.read_ident(b);
                self.buf.pushback(stop);
            }
            other => {
                let kind = match other {
                    Some(b) if !is_space(b) => {
                        self.buf.pushback(other);
                        LexErrorKind::InvalidVariableName {
                            sigil: "$",
                            found: char::from(b),
                        }
                    }
                    _ => {
                        self.buf.pushback(other);
                        LexErrorKind::MissingVariableName { sigil: "$" }
                    }
                };
                self.report(|range, span| LexError::variable_name(kind, range, span));
            }
        }
        let value = self.intern_tokbuf();
        self.emit(TokenKind::Gvar, value)
    }

    /// `$1`..`$N`. After `alias` or `def` these are plain global names.
    fn nth_ref(&mut self, first: u8, last_state: LexMode) -> Token {
        self.tokbuf.push(first);
        while let Some(d) = self.buf.peek().filter(u8::is_ascii_digit) {
            self.tokbuf.push(d);
            self.buf.skip(1);
        }
        if last_state.intersects(LexMode::FNAME) {
            let value = self.intern_tokbuf();
            return self.emit(TokenKind::Gvar, value);
        }
        let digits = String::from_utf8_lossy(&self.tokbuf[1..]).into_owned();
        let number = match digits.parse::<u32>() {
            Ok(n) if n <= MAX_NTH_REF => n,
            _ => {
                let text = String::from_utf8_lossy(&self.tokbuf).into_owned();
                self.warn(LexWarningKind::NthRefTooBig { text });
                0
            }
        };
        self.emit(TokenKind::NthRef, TokenValue::NthRef(number))
    }

    /// After `@`: instance or class variable.
    pub(super) fn lex_ivar(&mut self) -> Token {
        let last_state = self.last_state;
        self.tokbuf.clear();
        self.tokbuf.push(b'@');
        let (kind, sigil) = if self.buf.peek_is(b'@') {
            self.buf.skip(1);
            self.tokbuf.push(b'@');
            (TokenKind::Cvar, "@@")
        } else {
            (TokenKind::Ivar, "@")
        };
        self.mode = if last_state.intersects(LexMode::FNAME) {
            LexMode::END_FN
        } else {
            LexMode::END
        };
        let c = self.buf.nextc();
        match c {
            Some(b) if is_identchar(b) && !b.is_ascii_digit() => {
                let (stop, _) = self.read_ident(b);
                self.buf.pushback(stop);
                let value = self.intern_tokbuf();
                self.emit(kind, value)
            }
            _ => {
                self.buf.pushback(c);
                let error = match c {
                    Some(d) if d.is_ascii_digit() => LexErrorKind::InvalidVariableName {
                        sigil,
                        found: char::from(d),
                    },
                    _ => LexErrorKind::MissingVariableName { sigil },
                };
                self.report(|range, span| LexError::variable_name(error, range, span));
                self.mode = LexMode::END;
                self.emit(kind, TokenValue::None)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
