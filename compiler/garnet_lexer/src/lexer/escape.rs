//! Backslash escapes and `?c` character literals.
//!
//! Double-quoted bodies decode escapes to bytes ([`read_escape`]).
//! Regexp bodies keep their escapes as source text so the regexp engine
//! sees them unchanged ([`tokadd_escape`]); only `\c`, `\C-` and `\M-` are
//! rewritten there, into `\xHH`.
//!
//! [`read_escape`]: Lexer::read_escape
//! [`tokadd_escape`]: Lexer::tokadd_escape

use garnet_ir::{Token, TokenKind, TokenValue};
use garnet_lexer_core::TokenStart;
use garnet_stack::ensure_sufficient_stack;

use super::{is_identchar, is_space, Lexer};
use crate::lex_error::{LexError, LexErrorKind, LexFatal, LexWarningKind};
use crate::mode::LexMode;

bitflags::bitflags! {
    /// Modifiers already applied in a `\M-\C-x` chain.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub(super) struct EscapeFlags: u8 {
        const META = 1 << 0;
        const CONTROL = 1 << 1;
    }
}

const MAX_CODEPOINT: u32 = 0x10_FFFF;

/// Whitespace that has a named escape: `\s`, `\n`, `\t`, `\v`, `\r`, `\f`.
pub(super) fn escaped_control_code(c: u8) -> Option<char> {
    match c {
        b' ' => Some('s'),
        b'\n' => Some('n'),
        b'\t' => Some('t'),
        0x0b => Some('v'),
        b'\r' => Some('r'),
        0x0c => Some('f'),
        _ => None,
    }
}

fn hex_value(digits: &[u8]) -> u32 {
    digits.iter().fold(0u32, |acc, &d| {
        let nibble = char::from(d).to_digit(16).unwrap_or(0);
        acc.wrapping_mul(16).wrapping_add(nibble)
    })
}

impl Lexer<'_> {
    /// Decode the escape after a backslash to one byte.
    ///
    /// `start` is the position of the backslash, for error ranges. Invalid
    /// escapes are reported and decode to `0`.
    pub(super) fn read_escape(&mut self, flags: EscapeFlags, start: TokenStart) -> u8 {
        let Some(c) = self.buf.nextc() else {
            return self.invalid_escape(start);
        };
        match c {
            b'\\' => b'\\',
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            b'f' => 0x0c,
            b'v' => 0x0b,
            b'a' => 0x07,
            b'e' => 0x1b,
            b'b' => 0x08,
            b's' => b' ',
            b'0'..=b'7' => {
                let mut value = c - b'0';
                for _ in 0..2 {
                    match self.buf.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value.wrapping_mul(8).wrapping_add(d - b'0');
                            self.buf.skip(1);
                        }
                        _ => break,
                    }
                }
                value
            }
            b'x' => {
                let digits = self.buf.rest().iter().take(2).take_while(|b| b.is_ascii_hexdigit()).count();
                if digits == 0 {
                    self.report_at(start, |range, span| {
                        LexError::escape(LexErrorKind::InvalidHexEscape, range, span)
                    });
                    return 0;
                }
                let value = hex_value(&self.buf.rest()[..digits]);
                self.buf.skip(digits);
                u8::try_from(value).unwrap_or(0)
            }
            b'M' => {
                if flags.contains(EscapeFlags::META) || !self.eat_dash() {
                    return self.invalid_escape(start);
                }
                match self.buf.nextc() {
                    Some(b'\\') => {
                        if self.buf.peek().is_some_and(|b| b == b'u' || b == b'U') {
                            self.buf.skip(1);
                            return self.invalid_escape(start);
                        }
                        let inner = ensure_sufficient_stack(|| {
                            self.read_escape(flags | EscapeFlags::META, start)
                        });
                        inner | 0x80
                    }
                    Some(b)
                        if b.is_ascii()
                            && (!b.is_ascii_control() || escaped_control_code(b).is_some()) =>
                    {
                        b | 0x80
                    }
                    other => {
                        self.buf.pushback(other);
                        self.invalid_escape(start)
                    }
                }
            }
            b'C' => {
                if !self.eat_dash() {
                    return self.invalid_escape(start);
                }
                self.read_control(flags, start)
            }
            b'c' => self.read_control(flags, start),
            other => other,
        }
    }

    /// The byte after `\c` or `\C-`.
    fn read_control(&mut self, flags: EscapeFlags, start: TokenStart) -> u8 {
        if flags.contains(EscapeFlags::CONTROL) {
            return self.invalid_escape(start);
        }
        match self.buf.nextc() {
            Some(b'\\') => {
                if self.buf.peek().is_some_and(|b| b == b'u' || b == b'U') {
                    self.buf.skip(1);
                    return self.invalid_escape(start);
                }
                let inner = ensure_sufficient_stack(|| {
                    self.read_escape(flags | EscapeFlags::CONTROL, start)
                });
                inner & 0x9f
            }
            Some(b'?') => 0x7f,
            Some(b) if b.is_ascii() && (!b.is_ascii_control() || escaped_control_code(b).is_some()) => {
                b & 0x9f
            }
            other => {
                self.buf.pushback(other);
                self.invalid_escape(start)
            }
        }
    }

    fn eat_dash(&mut self) -> bool {
        let c = self.buf.nextc();
        if c == Some(b'-') {
            return true;
        }
        self.buf.pushback(c);
        false
    }

    fn invalid_escape(&mut self, start: TokenStart) -> u8 {
        self.report_at(start, |range, span| {
            LexError::escape(LexErrorKind::InvalidEscape, range, span)
        });
        0
    }

    /// Copy a regexp escape through unchanged.
    pub(super) fn tokadd_escape(&mut self, start: TokenStart) {
        let c = self.buf.nextc();
        match c {
            Some(b'\n') => {}
            Some(d @ b'0'..=b'7') => {
                self.tokbuf.push(b'\\');
                self.tokbuf.push(d);
                let more = self.buf.rest().iter().take(2).take_while(|b| matches!(b, b'0'..=b'7')).count();
                self.tokbuf.extend_from_slice(&self.buf.rest()[..more]);
                self.buf.skip(more);
            }
            Some(b'x') => {
                let digits = self.buf.rest().iter().take(2).take_while(|b| b.is_ascii_hexdigit()).count();
                if digits == 0 {
                    self.report_at(start, |range, span| {
                        LexError::escape(LexErrorKind::InvalidHexEscape, range, span)
                    });
                    return;
                }
                self.tokbuf.extend_from_slice(b"\\x");
                self.tokbuf.extend_from_slice(&self.buf.rest()[..digits]);
                self.buf.skip(digits);
            }
            Some(b) => {
                self.tokbuf.push(b'\\');
                self.tokbuf.push(b);
            }
            None => {
                self.invalid_escape(start);
            }
        }
    }

    /// `\u` escapes, after the `u`. `term` is the literal's closer, `None`
    /// for `?\u...` character literals.
    pub(super) fn tokadd_utf8(&mut self, term: Option<u8>, regexp: bool, start: TokenStart) {
        if regexp {
            self.tokbuf.extend_from_slice(b"\\u");
            let len = if self.buf.peek_is(b'{') {
                self.buf
                    .rest()
                    .iter()
                    .position(|&b| b == b'}' || b == b'\n' || Some(b) == term)
                    .map_or(self.buf.rest().len(), |at| {
                        at + usize::from(self.buf.rest()[at] == b'}')
                    })
            } else {
                self.buf.rest().iter().take(4).take_while(|b| b.is_ascii_hexdigit()).count()
            };
            self.tokbuf.extend_from_slice(&self.buf.rest()[..len]);
            self.buf.skip(len);
            return;
        }

        if !self.buf.peek_is(b'{') {
            self.tokadd_codepoint(false, start);
            return;
        }
        self.buf.skip(1);
        let blank = |b: u8| b == b' ' || b == b'\t';
        self.buf.eat_while(blank);
        let mut count = 0;
        loop {
            match self.buf.peek() {
                Some(b'}') => {
                    self.buf.skip(1);
                    break;
                }
                None | Some(b'\n') => {
                    self.unterminated_unicode(start);
                    return;
                }
                Some(b) if Some(b) == term => {
                    self.unterminated_unicode(start);
                    return;
                }
                Some(_) => {
                    if !self.tokadd_codepoint(true, start) {
                        self.buf.eat_while(|b| b != b'}' && b != b'\n' && Some(b) != term);
                        if self.buf.peek_is(b'}') {
                            self.buf.skip(1);
                        }
                        return;
                    }
                    count += 1;
                    self.buf.eat_while(blank);
                }
            }
        }
        if count > 1 && term.is_none() {
            self.report_at(start, |range, span| {
                LexError::escape(LexErrorKind::MultipleCodepoints, range, span)
            });
        }
    }

    fn unterminated_unicode(&mut self, start: TokenStart) {
        self.report_at(start, |range, span| {
            LexError::escape(LexErrorKind::UnterminatedUnicodeEscape, range, span)
        });
    }

    /// One codepoint of a `\u` escape, appended as UTF-8. `wide` is the
    /// braced form, 1-6 digits; otherwise exactly 4. Returns whether the
    /// braced scan may go on.
    fn tokadd_codepoint(&mut self, wide: bool, start: TokenStart) -> bool {
        let limit = if wide { usize::MAX } else { 4 };
        let len = self.buf.rest().iter().take(limit).take_while(|b| b.is_ascii_hexdigit()).count();
        let value = hex_value(&self.buf.rest()[..len.min(8)]);
        self.buf.skip(len);

        let kind = if (wide && (len == 0 || len > 6)) || (!wide && len < 4) {
            Some(LexErrorKind::InvalidUnicodeEscape)
        } else if value > MAX_CODEPOINT {
            Some(LexErrorKind::UnicodeCodepointTooLarge)
        } else if value & 0xFFFF_F800 == 0xD800 {
            Some(LexErrorKind::InvalidUnicodeCodepoint)
        } else {
            None
        };
        if let Some(kind) = kind {
            self.report_at(start, |range, span| LexError::escape(kind, range, span));
            return wide && len > 0;
        }
        if let Some(ch) = char::from_u32(value) {
            let mut utf8 = [0u8; 4];
            self.tokbuf.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        }
        true
    }

    /// `?` after something that ends an expression is the ternary operator;
    /// elsewhere it starts a character literal.
    pub(super) fn char_literal(&mut self) -> Result<Token, LexFatal> {
        if self.mode.is_end() {
            self.mode = LexMode::VALUE;
            return Ok(self.emit(TokenKind::Question, TokenValue::None));
        }
        let Some(c) = self.buf.nextc() else {
            self.report(|range, span| LexError::new(LexErrorKind::IncompleteCharSyntax, range, span));
            return self.end_of_input();
        };
        if is_space(c) {
            if !self.mode.is_arg() {
                if let Some(escape) = escaped_control_code(c) {
                    self.warn(LexWarningKind::SpaceAfterQuestion { escape });
                }
            }
            return Ok(self.ternary(c));
        }

        self.tokbuf.clear();
        if !c.is_ascii() {
            self.tokadd_mbchar(c);
        } else if (c.is_ascii_alphanumeric() || c == b'_') && self.buf.peek().is_some_and(is_identchar) {
            if self.space_seen {
                let from = self.buf.cursor() - 1;
                let line = self.buf.line().bytes();
                let len = line[from..].iter().take_while(|&&b| is_identchar(b)).count();
                let text = String::from_utf8_lossy(&line[from..from + len]).into_owned();
                self.warn(LexWarningKind::QuestionBeforeIdentifier { text });
            }
            return Ok(self.ternary(c));
        } else if c == b'\\' {
            let start = self.last_char_start();
            if self.buf.peek_is(b'u') {
                self.buf.skip(1);
                self.tokadd_utf8(None, false, start);
            } else if let Some(next) = self.buf.peek().filter(|b| !b.is_ascii()) {
                self.buf.skip(1);
                self.tokadd_mbchar(next);
            } else {
                let byte = self.read_escape(EscapeFlags::empty(), start);
                self.tokbuf.push(byte);
            }
        } else {
            self.tokbuf.push(c);
        }
        self.mode = LexMode::END;
        let value = self.take_tokbuf();
        Ok(self.emit(TokenKind::Char, value))
    }

    fn ternary(&mut self, c: u8) -> Token {
        self.buf.pushback(Some(c));
        self.mode = LexMode::VALUE;
        self.emit(TokenKind::Question, TokenValue::None)
    }
}
