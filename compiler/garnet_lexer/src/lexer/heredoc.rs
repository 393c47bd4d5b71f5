//! Here documents.
//!
//! `<<ID`, `<<-ID` and `<<~ID` (optionally with a quoted `ID`) open a
//! literal whose body is the lines after the current one, up to a line that
//! is exactly `ID`. The rest of the opening line is parked in a
//! [`Continuation`] and lexed after the terminator.
//!
//! `<<~` bodies are dedented before any of them is lexed: every body line
//! loses the smallest indentation found among its non-blank lines, with
//! tabs advancing to the next multiple of eight columns.

use garnet_ir::{SourceRange, Span, Token, TokenFlags, TokenKind, TokenValue};
use garnet_lexer_core::{Continuation, Line};
use tracing::debug;

use super::string_term::{Hole, StrFunc};
use super::{is_identchar, Lexer, StrTerm};
use crate::lex_error::{LexError, LexErrorKind, LexFatal};
use crate::mode::LexMode;

const TAB_WIDTH: usize = 8;

/// An open here document.
#[derive(Clone, Debug)]
pub(super) struct HeredocTerm {
    pub(super) func: StrFunc,
    pub(super) id: Vec<u8>,
    /// Opening line and the cursor just past the identifier.
    pub(super) continuation: Continuation,
    pub(super) opened: SourceRange,
    pub(super) opened_span: Span,
}

/// `line` is `id` and nothing else, ignoring the line terminator and, when
/// `indent` is set, leading blanks.
pub(super) fn whole_match(line: &Line, id: &[u8], indent: bool) -> bool {
    let mut text = line.without_terminator();
    if indent {
        let blanks = text.iter().take_while(|&&b| b == b' ' || b == b'\t').count();
        text = &text[blanks..];
    }
    text == id
}

/// Indentation width of a line, or `None` for a blank one.
fn indent_width(bytes: &[u8]) -> Option<usize> {
    let mut width = 0;
    for &b in bytes {
        match b {
            b' ' => width += 1,
            b'\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
            b'\n' | b'\r' => return None,
            _ => return Some(width),
        }
    }
    None
}

/// Bytes to strip from the front of a line to remove `width` columns. A tab
/// that would overshoot stays.
fn dedent_len(bytes: &[u8], width: usize) -> usize {
    let mut col = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if col >= width {
            return i;
        }
        let next = match b {
            b' ' => col + 1,
            b'\t' => (col / TAB_WIDTH + 1) * TAB_WIDTH,
            _ => return i,
        };
        if next > width {
            return i;
        }
        col = next;
    }
    bytes.len()
}

impl Lexer<'_> {
    /// After `<<`: a heredoc opener, or `None` with the cursor restored when
    /// no identifier follows.
    pub(super) fn heredoc_identifier(&mut self) -> Option<Token> {
        let mark = self.buf.cursor();
        let mut func = StrFunc::empty();
        let mut squiggly = false;
        let mut c = self.buf.nextc();
        match c {
            Some(b'-') => {
                func |= StrFunc::INDENT;
                c = self.buf.nextc();
            }
            Some(b'~') => {
                func |= StrFunc::INDENT;
                squiggly = true;
                c = self.buf.nextc();
            }
            _ => {}
        }

        let mut id = Vec::new();
        let kind = match c {
            Some(quote @ (b'\'' | b'"' | b'`')) => {
                func |= match quote {
                    b'\'' => StrFunc::SQUOTE,
                    b'"' => StrFunc::DQUOTE,
                    _ => StrFunc::XQUOTE,
                };
                loop {
                    match self.buf.nextc() {
                        Some(b) if b == quote => break,
                        end @ (None | Some(b'\n')) => {
                            self.buf.pushback(end);
                            self.report(|range, span| {
                                LexError::new(LexErrorKind::UnterminatedHeredocId, range, span)
                            });
                            return Some(self.open_literal(
                                TokenKind::StringBeg,
                                StrFunc::DQUOTE | StrFunc::TERM,
                                b'\n',
                                None,
                            ));
                        }
                        Some(b) => id.push(b),
                    }
                }
                if quote == b'`' {
                    TokenKind::XstringBeg
                } else {
                    TokenKind::StringBeg
                }
            }
            Some(b) if is_identchar(b) => {
                func |= StrFunc::DQUOTE;
                id.push(b);
                while let Some(b) = self.buf.peek().filter(|&b| is_identchar(b)) {
                    id.push(b);
                    self.buf.skip(1);
                }
                TokenKind::StringBeg
            }
            _ => {
                self.buf.set_cursor(mark);
                return None;
            }
        };

        let mut token = self.emit(kind, TokenValue::None);
        token.flags.set(TokenFlags::HEREDOC);
        if kind == TokenKind::StringBeg && self.pragmas.frozen_string_literal == Some(true) {
            token.flags.set(TokenFlags::FROZEN);
        }
        let continuation = self.buf.save();
        self.buf.goto_eol();
        if squiggly {
            self.dedent_body(&id);
        }
        debug!(
            id = %String::from_utf8_lossy(&id),
            line = continuation.line_number(),
            squiggly,
            "heredoc"
        );
        self.strterm = Some(StrTerm::Heredoc(HeredocTerm {
            func,
            id,
            continuation,
            opened: token.range,
            opened_span: token.span,
        }));
        Some(token)
    }

    /// Read a `<<~` body through its terminator, strip the common
    /// indentation, and queue the lines for lexing.
    fn dedent_body(&mut self, id: &[u8]) {
        let mut lines = Vec::new();
        let mut terminated = false;
        while let Some(line) = self.buf.read_line() {
            terminated = whole_match(&line, id, true);
            lines.push(line);
            if terminated {
                break;
            }
        }
        let body = if terminated { lines.len() - 1 } else { lines.len() };
        let width = lines[..body]
            .iter()
            .filter_map(|line| indent_width(line.bytes()))
            .min()
            .unwrap_or(0);
        let dedented: Vec<Line> = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                if i < body {
                    let strip = dedent_len(line.bytes(), width);
                    line.strip_prefix(strip)
                } else {
                    line
                }
            })
            .collect();
        self.buf.inject(dedented);
    }

    /// One piece of a heredoc body.
    pub(super) fn here_document(&mut self, mut here: HeredocTerm) -> Result<Token, LexFatal> {
        self.flags.set(TokenFlags::HEREDOC);
        let mut c = self.buf.nextc();
        self.buf.mark_last_char();
        let Some(first) = c else {
            self.push_error(LexError::unterminated_heredoc(
                &here.id,
                here.opened,
                here.opened_span,
            ));
            self.buf.restore(here.continuation);
            self.mode = LexMode::END;
            return Ok(self.emit(TokenKind::StringEnd, TokenValue::None));
        };

        let indent = here.func.contains(StrFunc::INDENT);
        if self.buf.was_bol() && whole_match(self.buf.line(), &here.id, indent) {
            self.buf.set_cursor(self.buf.line().without_terminator().len());
            let token = self.emit(TokenKind::StringEnd, TokenValue::None);
            self.buf.restore(here.continuation);
            self.mode = LexMode::END;
            return Ok(token);
        }

        self.tokbuf.clear();
        if !here.func.contains(StrFunc::EXPAND) {
            self.buf.pushback(Some(first));
            self.raw_heredoc_lines(&here.id, indent);
        } else {
            if first == b'#' {
                match self.peek_variable_name() {
                    Some(Hole::Dbeg) => return self.begin_interpolation(StrTerm::Heredoc(here)),
                    Some(Hole::Dvar) => return Ok(self.begin_dvar(StrTerm::Heredoc(here))),
                    None => {
                        self.tokbuf.push(b'#');
                        c = self.buf.nextc();
                    }
                }
            }
            self.buf.pushback(c);
            self.expanded_heredoc_lines(&mut here);
        }
        self.strterm = Some(StrTerm::Heredoc(here));
        let value = self.take_tokbuf();
        Ok(self.emit(TokenKind::StringContent, value))
    }

    /// Whole body lines, verbatim, up to the terminator or end of input.
    fn raw_heredoc_lines(&mut self, id: &[u8], indent: bool) {
        loop {
            let line = self.buf.line();
            self.tokbuf.extend_from_slice(line.without_terminator());
            if line.len() != line.without_terminator().len() {
                self.tokbuf.push(b'\n');
            }
            self.buf.goto_eol();
            let next = self.buf.nextc();
            if next.is_none() {
                return;
            }
            if whole_match(self.buf.line(), id, indent) {
                self.buf.set_cursor(0);
                return;
            }
            self.buf.pushback(next);
        }
    }

    /// Escaped body text up to the terminator, an interpolation, or end of
    /// input.
    fn expanded_heredoc_lines(&mut self, here: &mut HeredocTerm) {
        let indent = here.func.contains(StrFunc::INDENT);
        loop {
            match self.tokadd_string(here.func, b'\n', None, &mut 0) {
                Some(b'\n') => {
                    self.buf.nextc();
                    self.tokbuf.push(b'\n');
                    let next = self.buf.nextc();
                    if next.is_none() {
                        return;
                    }
                    if whole_match(self.buf.line(), &here.id, indent) {
                        self.buf.set_cursor(0);
                        return;
                    }
                    self.buf.pushback(next);
                }
                _ => return,
            }
        }
    }
}
