//! The byte-level switch for code outside literals.
//!
//! Whitespace and comments loop back to the top; everything else returns a
//! token. Operators that change meaning with spacing (`-1` vs `- 1`,
//! `*args` vs `a * b`, `/re/` vs `a / b`) decide here, from the mode and
//! whether whitespace came before.

use garnet_ir::{SourceRange, Span, Token, TokenFlags, TokenKind, TokenValue};
use tracing::debug;

use super::heredoc::whole_match;
use super::string_term::StrFunc;
use super::{is_identchar, is_space, Lexer};
use crate::lex_error::{LexError, LexErrorKind, LexFatal, LexWarningKind, LiteralKind};
use crate::mode::LexMode;

/// Bytes that end the input wherever code is expected.
fn is_eof_byte(c: u8) -> bool {
    matches!(c, 0x00 | 0x04 | 0x1a)
}

fn closing_pair(open: u8) -> Option<u8> {
    match open {
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        b'{' => Some(b'}'),
        b'<' => Some(b'>'),
        _ => None,
    }
}

impl Lexer<'_> {
    pub(super) fn lex_normal(&mut self) -> Result<Token, LexFatal> {
        if self.eofp {
            return self.end_of_input();
        }
        self.command_state = std::mem::take(&mut self.command_start);
        loop {
            self.last_state = self.mode;
            let next = self.buf.nextc();
            self.buf.mark_last_char();
            let Some(c) = next.filter(|&c| !is_eof_byte(c)) else {
                return self.end_of_input();
            };
            match c {
                b' ' | b'\t' | 0x0c | 0x0b => self.space_seen = true,
                b'\r' => {
                    if !self.cr_warned {
                        self.cr_warned = true;
                        self.warn(LexWarningKind::CarriageReturn);
                    }
                    self.space_seen = true;
                }
                b'#' => {
                    let at_top = self.comment_at_top();
                    if !self.magic_comment(at_top)? && at_top {
                        self.coding_fallback()?;
                    }
                    self.buf.goto_eol();
                    if let Some(token) = self.newline() {
                        return Ok(token);
                    }
                }
                b'\n' => {
                    if let Some(token) = self.newline() {
                        return Ok(token);
                    }
                }
                b'=' => {
                    if self.buf.was_bol() && self.word_match(b"begin") {
                        if !self.skip_embedded_doc() {
                            return self.end_of_input();
                        }
                        continue;
                    }
                    return Ok(self.equals());
                }
                b'*' => return Ok(self.star()),
                b'!' => return Ok(self.bang()),
                b'<' => return Ok(self.less_than()),
                b'>' => return Ok(self.greater_than()),
                b'"' => {
                    let func = self.label_func(StrFunc::DQUOTE);
                    return Ok(self.open_literal(TokenKind::StringBeg, func, b'"', None));
                }
                b'\'' => {
                    let func = self.label_func(StrFunc::SQUOTE);
                    return Ok(self.open_literal(TokenKind::StringBeg, func, b'\'', None));
                }
                b'`' => return Ok(self.backtick()),
                b'?' => return self.char_literal(),
                b'&' => return Ok(self.ampersand()),
                b'|' => return Ok(self.pipe()),
                b'+' => return Ok(self.plus()),
                b'-' => return Ok(self.minus()),
                b'.' => {
                    if let Some(token) = self.dot() {
                        return Ok(token);
                    }
                }
                b'0'..=b'9' => return Ok(self.lex_number(c)),
                b')' => {
                    self.pop_nesting();
                    return Ok(self.op(TokenKind::Rparen));
                }
                b']' => {
                    self.pop_nesting();
                    return Ok(self.op(TokenKind::Rbracket));
                }
                b'}' => {
                    if let Some(token) = self.end_interpolation() {
                        return Ok(token);
                    }
                    self.brace_nest = self.brace_nest.saturating_sub(1);
                    self.pop_nesting();
                    return Ok(self.op(TokenKind::Rbrace));
                }
                b':' => return Ok(self.colon()),
                b'/' => return Ok(self.slash()),
                b'^' => {
                    let next = self.buf.nextc();
                    if next == Some(b'=') {
                        return Ok(self.op_asgn("^"));
                    }
                    self.buf.pushback(next);
                    return Ok(self.op(TokenKind::Caret));
                }
                b';' => {
                    self.mode = LexMode::BEGIN;
                    self.command_start = true;
                    self.end_loop_head();
                    return Ok(self.emit(TokenKind::Semicolon, TokenValue::None));
                }
                b',' => return Ok(self.op(TokenKind::Comma)),
                b'~' => {
                    if self.mode.is_after_operator() {
                        let next = self.buf.nextc();
                        if next != Some(b'@') {
                            self.buf.pushback(next);
                        }
                    }
                    return Ok(self.op(TokenKind::Tilde));
                }
                b'(' => return Ok(self.left_paren()),
                b'[' => return Ok(self.left_bracket()),
                b'{' => return Ok(self.left_brace()),
                b'\\' => {
                    let next = self.buf.nextc();
                    if next == Some(b'\n') {
                        self.space_seen = true;
                        continue;
                    }
                    self.buf.pushback(next);
                    self.report(|range, span| LexError::new(LexErrorKind::StrayBackslash, range, span));
                }
                b'%' => {
                    if let Some(token) = self.percent()? {
                        return Ok(token);
                    }
                }
                b'$' => return Ok(self.lex_gvar()),
                b'@' => return Ok(self.lex_ivar()),
                b'_' if self.buf.was_bol() && whole_match(self.buf.line(), b"__END__", false) => {
                    let offset = self.buf.line().end_offset();
                    debug!(offset, "__END__");
                    self.data_offset = Some(offset);
                    return self.end_of_input();
                }
                _ if !is_identchar(c) => {
                    self.report(|range, span| LexError::invalid_char(c, range, span));
                }
                _ => return Ok(self.lex_identifier(c)),
            }
        }
    }

    // === Newlines ===

    /// A line ended. Returns `None` when the newline is insignificant and
    /// lexing should go on.
    fn newline(&mut self) -> Option<Token> {
        let ignorable = self
            .mode
            .intersects(LexMode::BEGIN | LexMode::CLASS | LexMode::FNAME | LexMode::DOT)
            && !self.mode.contains(LexMode::LABELED);
        if ignorable || (self.mode.contains(LexMode::ARG | LexMode::LABELED) && !self.in_kwarg) {
            self.flags.set(TokenFlags::NEWLINE_BEFORE);
            return None;
        }

        let (range, span) = self.terminator_range();
        // A following line that starts with `.meth` or `&.meth` continues
        // this one.
        loop {
            let c = self.buf.nextc();
            match c {
                Some(b' ' | b'\t' | 0x0c | b'\r' | 0x0b) => self.space_seen = true,
                Some(b'#') => {
                    self.buf.pushback(c);
                    self.flags.set(TokenFlags::NEWLINE_BEFORE);
                    return None;
                }
                Some(b'&') if self.buf.peek_is(b'.') => {
                    self.buf.pushback(c);
                    self.flags.set(TokenFlags::NEWLINE_BEFORE);
                    return None;
                }
                Some(b'.') if !self.buf.peek_is(b'.') => {
                    self.buf.pushback(c);
                    self.flags.set(TokenFlags::NEWLINE_BEFORE);
                    return None;
                }
                None => break,
                Some(_) => {
                    self.buf.set_cursor(0);
                    break;
                }
            }
        }
        self.mode = LexMode::BEGIN;
        self.command_start = true;
        self.end_loop_head();
        Some(self.make_token(TokenKind::Newline, TokenValue::None, range, span))
    }

    /// Range of the current line's terminator, or a point at its end when
    /// it has none.
    fn terminator_range(&self) -> (SourceRange, Span) {
        let line = self.buf.line();
        let terminator = line.len() - line.without_terminator().len();
        let end = self.buf.position();
        let mut start = end;
        let back = u32::try_from(terminator).unwrap_or(0);
        start.column = start.column.saturating_sub(back);
        start.offset = start.offset.saturating_sub(back);
        super::range_between(start, end)
    }

    /// `word` follows the cursor and ends at whitespace or end of line.
    fn word_match(&self, word: &[u8]) -> bool {
        let rest = self.buf.rest();
        rest.starts_with(word)
            && rest
                .get(word.len())
                .is_none_or(|&b| is_space(b) || is_eof_byte(b))
    }

    /// Skip an `=begin` ... `=end` block. `false` when input ends first.
    fn skip_embedded_doc(&mut self) -> bool {
        let start = self.buf.token_start();
        loop {
            self.buf.goto_eol();
            let c = self.buf.nextc();
            match c {
                None => {
                    self.report_at(start, |range, span| {
                        LexError::new(LexErrorKind::UnterminatedEmbeddedDoc, range, span)
                    });
                    return false;
                }
                Some(b'=') if self.word_match(b"end") => break,
                _ => {}
            }
        }
        self.buf.goto_eol();
        true
    }

    // === Operators ===

    /// `is_space_arg` with `c` as the byte after the operator.
    fn is_spcarg(&self, c: Option<u8>) -> bool {
        self.mode.is_space_arg(self.space_seen, c.is_some_and(is_space))
    }

    /// `x -1` where `x` cannot take arguments: read as binary, but spaced
    /// like a prefix.
    fn warn_balanced(&mut self, op: &'static str, seems_like: &'static str) {
        if !self
            .last_state
            .intersects(LexMode::CLASS | LexMode::DOT | LexMode::FNAME | LexMode::END_FN)
            && self.space_seen
            && !self.buf.peek().is_some_and(is_space)
        {
            self.warn(LexWarningKind::AmbiguousOperator { op, seems_like });
        }
    }

    fn ambiguous_first_argument(&mut self, op: char) -> bool {
        self.warn(LexWarningKind::AmbiguousFirstArgument { op });
        true
    }

    fn equals(&mut self) -> Token {
        let c = self.buf.nextc();
        let kind = match c {
            Some(b'=') => {
                let next = self.buf.nextc();
                if next == Some(b'=') {
                    TokenKind::Eqq
                } else {
                    self.buf.pushback(next);
                    TokenKind::EqEq
                }
            }
            Some(b'~') => TokenKind::Match,
            Some(b'>') => TokenKind::Assoc,
            _ => {
                self.buf.pushback(c);
                TokenKind::Assign
            }
        };
        self.op(kind)
    }

    fn star(&mut self) -> Token {
        let c = self.buf.nextc();
        let (operator, prefix, binary, next) = if c == Some(b'*') {
            let next = self.buf.nextc();
            if next == Some(b'=') {
                return self.op_asgn("**");
            }
            ("**", TokenKind::Dstar, TokenKind::Pow, next)
        } else {
            if c == Some(b'=') {
                return self.op_asgn("*");
            }
            ("*", TokenKind::Star, TokenKind::Mul, c)
        };
        self.buf.pushback(next);
        let kind = if self.is_spcarg(next) {
            self.warn(LexWarningKind::ArgumentPrefix { op: operator });
            prefix
        } else if self.mode.is_beg() {
            prefix
        } else {
            self.warn_balanced(operator, "argument prefix");
            binary
        };
        self.op(kind)
    }

    fn bang(&mut self) -> Token {
        let c = self.buf.nextc();
        if self.mode.is_after_operator() && c == Some(b'@') {
            return self.op(TokenKind::Bang);
        }
        let kind = match c {
            Some(b'=') => TokenKind::Neq,
            Some(b'~') => TokenKind::Nmatch,
            _ => {
                self.buf.pushback(c);
                TokenKind::Bang
            }
        };
        self.op(kind)
    }

    fn less_than(&mut self) -> Token {
        let c = self.buf.nextc();
        if c == Some(b'<')
            && !self.mode.intersects(LexMode::DOT | LexMode::CLASS)
            && !self.mode.is_end()
            && (!self.mode.is_arg() || self.mode.contains(LexMode::LABELED) || self.space_seen)
        {
            if let Some(token) = self.heredoc_identifier() {
                return token;
            }
        }
        if !self.mode.is_after_operator() && self.mode.contains(LexMode::CLASS) {
            self.command_start = true;
        }
        let kind = match c {
            Some(b'=') => {
                let next = self.buf.nextc();
                if next == Some(b'>') {
                    TokenKind::Cmp
                } else {
                    self.buf.pushback(next);
                    TokenKind::Leq
                }
            }
            Some(b'<') => {
                let next = self.buf.nextc();
                if next == Some(b'=') {
                    return self.op_asgn("<<");
                }
                self.buf.pushback(next);
                self.warn_balanced("<<", "here document");
                TokenKind::Lshift
            }
            _ => {
                self.buf.pushback(c);
                TokenKind::Lt
            }
        };
        self.op(kind)
    }

    fn greater_than(&mut self) -> Token {
        let c = self.buf.nextc();
        let kind = match c {
            Some(b'=') => TokenKind::Geq,
            Some(b'>') => {
                let next = self.buf.nextc();
                if next == Some(b'=') {
                    return self.op_asgn(">>");
                }
                self.buf.pushback(next);
                TokenKind::Rshift
            }
            _ => {
                self.buf.pushback(c);
                TokenKind::Gt
            }
        };
        self.op(kind)
    }

    /// `"..."` and `'...'` may close as a label (`"key": v`) where a label
    /// could start.
    fn label_func(&self, func: StrFunc) -> StrFunc {
        if self.mode.is_label_possible(self.command_state) {
            func | StrFunc::LABEL
        } else {
            func
        }
    }

    fn backtick(&mut self) -> Token {
        if self.mode.intersects(LexMode::FNAME) {
            self.mode = LexMode::END_FN;
            let name = self.interner.intern("`");
            return self.emit(TokenKind::Backtick, TokenValue::Name(name));
        }
        if self.mode.intersects(LexMode::DOT) {
            self.mode = if self.command_state {
                LexMode::CMD_ARG
            } else {
                LexMode::ARG
            };
            let name = self.interner.intern("`");
            return self.emit(TokenKind::Backtick, TokenValue::Name(name));
        }
        self.open_literal(TokenKind::XstringBeg, StrFunc::XQUOTE, b'`', None)
    }

    fn ampersand(&mut self) -> Token {
        let c = self.buf.nextc();
        match c {
            Some(b'&') => {
                let next = self.buf.nextc();
                if next == Some(b'=') {
                    return self.op_asgn("&&");
                }
                self.buf.pushback(next);
                return self.op(TokenKind::AndOp);
            }
            Some(b'=') => return self.op_asgn("&"),
            Some(b'.') => return self.op(TokenKind::AndDot),
            _ => {}
        }
        self.buf.pushback(c);
        let kind = if self.is_spcarg(c) {
            // `&:sym` and `&:"sym"` read as intended.
            let quiet = c == Some(b':')
                && self
                    .buf
                    .peek_at(1)
                    .is_some_and(|b| b == b'\'' || b == b'"' || is_identchar(b));
            if !quiet {
                self.warn(LexWarningKind::ArgumentPrefix { op: "&" });
            }
            TokenKind::Amper
        } else if self.mode.is_beg() {
            TokenKind::Amper
        } else {
            self.warn_balanced("&", "argument prefix");
            TokenKind::BitAnd
        };
        self.op(kind)
    }

    fn pipe(&mut self) -> Token {
        let c = self.buf.nextc();
        if c == Some(b'|') {
            let next = self.buf.nextc();
            if next == Some(b'=') {
                return self.op_asgn("||");
            }
            self.buf.pushback(next);
            if self.last_state.intersects(LexMode::BEGIN) {
                // `{ || ... }`: an empty block parameter list, one `|` at a
                // time.
                self.buf.pushback(c);
                self.mode = LexMode::BEGIN;
                return self.emit(TokenKind::Pipe, TokenValue::None);
            }
            return self.op(TokenKind::OrOp);
        }
        if c == Some(b'=') {
            return self.op_asgn("|");
        }
        self.buf.pushback(c);
        self.op(TokenKind::Pipe)
    }

    fn plus(&mut self) -> Token {
        let c = self.buf.nextc();
        if self.mode.is_after_operator() {
            if c == Some(b'@') {
                return self.op(TokenKind::Uplus);
            }
            self.buf.pushback(c);
            return self.op(TokenKind::Plus);
        }
        if c == Some(b'=') {
            return self.op_asgn("+");
        }
        if self.mode.is_beg() || (self.is_spcarg(c) && self.ambiguous_first_argument('+')) {
            self.buf.pushback(c);
            if c.is_some_and(|b| b.is_ascii_digit()) {
                return self.lex_number(b'+');
            }
            return self.op(TokenKind::Uplus);
        }
        self.buf.pushback(c);
        self.warn_balanced("+", "unary operator");
        self.op(TokenKind::Plus)
    }

    fn minus(&mut self) -> Token {
        let c = self.buf.nextc();
        if self.mode.is_after_operator() {
            if c == Some(b'@') {
                return self.op(TokenKind::Uminus);
            }
            self.buf.pushback(c);
            return self.op(TokenKind::Minus);
        }
        if c == Some(b'=') {
            return self.op_asgn("-");
        }
        if c == Some(b'>') {
            self.paren.set_top(true);
            return self.op(TokenKind::Lambda);
        }
        if self.mode.is_beg() || (self.is_spcarg(c) && self.ambiguous_first_argument('-')) {
            self.buf.pushback(c);
            if c.is_some_and(|b| b.is_ascii_digit()) {
                return self.op(TokenKind::UminusNum);
            }
            return self.op(TokenKind::Uminus);
        }
        self.buf.pushback(c);
        self.warn_balanced("-", "unary operator");
        self.op(TokenKind::Minus)
    }

    /// `.`, ranges, and the `.5` error. `None` after the error: the digits
    /// were consumed and lexing goes on.
    fn dot(&mut self) -> Option<Token> {
        let is_beg = self.mode.is_beg();
        let c = self.buf.nextc();
        if c == Some(b'.') {
            let next = self.buf.nextc();
            let kind = if next == Some(b'.') {
                if is_beg {
                    TokenKind::Bdot3
                } else {
                    TokenKind::Dot3
                }
            } else {
                self.buf.pushback(next);
                if is_beg {
                    TokenKind::Bdot2
                } else {
                    TokenKind::Dot2
                }
            };
            return Some(self.op(kind));
        }
        self.buf.pushback(c);
        if c.is_some_and(|b| b.is_ascii_digit()) {
            let after_digit =
                matches!(self.buf.before_cursor(), [.., prev, b'.'] if prev.is_ascii_digit());
            let start = self.buf.token_start();
            let _ = self.lex_number(b'.');
            if after_digit {
                self.report_at(start, |range, span| {
                    LexError::numeric(LexErrorKind::UnexpectedFraction, range, span)
                });
            } else {
                self.report_at(start, LexError::no_dot_digit_float);
            }
            self.mode = LexMode::END;
            return None;
        }
        Some(self.op(TokenKind::Dot))
    }

    fn colon(&mut self) -> Token {
        let c = self.buf.nextc();
        if c == Some(b':') {
            let kind = if self.mode.is_beg()
                || self.mode.contains(LexMode::CLASS)
                || (self.mode.is_arg() && self.space_seen)
            {
                TokenKind::Colon3
            } else {
                TokenKind::Colon2
            };
            return self.op(kind);
        }
        if self.mode.is_end() || c.is_some_and(is_space) || c == Some(b'#') {
            self.buf.pushback(c);
            self.warn_balanced(":", "symbol literal");
            return self.op(TokenKind::Colon);
        }
        let func = match c {
            Some(b'\'') => StrFunc::SSYM,
            Some(b'"') => StrFunc::DSYM,
            _ => {
                self.buf.pushback(c);
                return self.op(TokenKind::Symbeg);
            }
        };
        let quote = if func == StrFunc::SSYM { b'\'' } else { b'"' };
        let token = self.open_literal(TokenKind::Symbeg, func, quote, None);
        self.mode = LexMode::FNAME;
        token
    }

    fn slash(&mut self) -> Token {
        if self.mode.is_beg() {
            return self.open_literal(TokenKind::RegexpBeg, StrFunc::REGEXP_LIT, b'/', None);
        }
        let c = self.buf.nextc();
        if c == Some(b'=') {
            return self.op_asgn("/");
        }
        self.buf.pushback(c);
        if self.is_spcarg(c) {
            self.ambiguous_first_argument('/');
            return self.open_literal(TokenKind::RegexpBeg, StrFunc::REGEXP_LIT, b'/', None);
        }
        self.warn_balanced("/", "regexp literal");
        self.op(TokenKind::Div)
    }

    // === Brackets ===

    fn left_paren(&mut self) -> Token {
        let kind = if self.mode.is_beg() {
            TokenKind::Lparen
        } else if !self.space_seen {
            TokenKind::LparenCall
        } else if self.mode.is_arg() || self.mode.contains(LexMode::END | LexMode::LABEL) {
            TokenKind::LparenArg
        } else {
            TokenKind::LparenCall
        };
        self.push_nesting();
        self.mode = LexMode::BEGIN | LexMode::LABEL;
        self.emit(kind, TokenValue::None)
    }

    fn left_bracket(&mut self) -> Token {
        if self.mode.is_after_operator() {
            let c = self.buf.nextc();
            if c == Some(b']') {
                self.mode = LexMode::ARG;
                let next = self.buf.nextc();
                if next == Some(b'=') {
                    return self.emit(TokenKind::Aset, TokenValue::None);
                }
                self.buf.pushback(next);
                return self.emit(TokenKind::Aref, TokenValue::None);
            }
            self.buf.pushback(c);
            self.push_nesting();
            self.mode = LexMode::ARG | LexMode::LABEL;
            return self.emit(TokenKind::LbrackIndex, TokenValue::None);
        }
        let kind = if self.mode.is_beg()
            || (self.mode.is_arg() && (self.space_seen || self.mode.contains(LexMode::LABELED)))
        {
            TokenKind::Lbrack
        } else {
            TokenKind::LbrackIndex
        };
        self.push_nesting();
        self.mode = LexMode::BEGIN | LexMode::LABEL;
        self.emit(kind, TokenValue::None)
    }

    fn left_brace(&mut self) -> Token {
        self.brace_nest += 1;
        let kind = if self.paren.top() {
            self.paren.set_top(false);
            TokenKind::Lambeg
        } else if self.mode.contains(LexMode::LABELED) {
            TokenKind::Lbrace
        } else if self.mode.intersects(LexMode::ARG_ANY | LexMode::END | LexMode::END_FN) {
            TokenKind::Lcurly
        } else if self.mode.contains(LexMode::END_ARG) {
            TokenKind::LbraceArg
        } else {
            TokenKind::Lbrace
        };
        if kind == TokenKind::Lbrace {
            self.mode = LexMode::BEGIN | LexMode::LABEL;
        } else {
            self.command_start = true;
            self.mode = LexMode::BEGIN;
        }
        self.push_nesting();
        self.emit(kind, TokenValue::None)
    }

    // === Percent Literals ===

    /// `%`: a percent literal, `%=`, or modulo. `None` after an unknown
    /// literal type was reported and skipped.
    fn percent(&mut self) -> Result<Option<Token>, LexFatal> {
        let c = self.buf.nextc();
        if self.mode.is_beg() {
            return self.quotation(c);
        }
        if c == Some(b'=') {
            return Ok(Some(self.op_asgn("%")));
        }
        if self.is_spcarg(c) || (self.mode.intersects(LexMode::FITEM) && c == Some(b's')) {
            return self.quotation(c);
        }
        self.buf.pushback(c);
        self.warn_balanced("%", "string literal");
        Ok(Some(self.op(TokenKind::Percent)))
    }

    fn quotation(&mut self, c: Option<u8>) -> Result<Option<Token>, LexFatal> {
        let Some(c) = c else {
            self.report(|range, span| LexError::unterminated(LiteralKind::Quoted, range, span));
            return self.end_of_input().map(Some);
        };
        let (kind, open) = if c.is_ascii_alphanumeric() {
            let term = self.buf.nextc();
            match term {
                None => {
                    self.report(|range, span| {
                        LexError::unterminated(LiteralKind::Quoted, range, span)
                    });
                    return self.end_of_input().map(Some);
                }
                Some(t) if t.is_ascii_alphanumeric() || !t.is_ascii() => {
                    self.unknown_percent(t);
                    return Ok(None);
                }
                Some(t) => (c, t),
            }
        } else if !c.is_ascii() {
            self.unknown_percent(c);
            return Ok(None);
        } else {
            (b'Q', c)
        };

        let paren = closing_pair(open).map(|_| open);
        let term = closing_pair(open).unwrap_or(open);
        let token = match kind {
            b'Q' => self.open_literal(TokenKind::StringBeg, StrFunc::DQUOTE, term, paren),
            b'q' => self.open_literal(TokenKind::StringBeg, StrFunc::SQUOTE, term, paren),
            b'W' => self.open_literal(TokenKind::WordsBeg, StrFunc::DWORD, term, paren),
            b'w' => self.open_literal(TokenKind::QwordsBeg, StrFunc::SWORD, term, paren),
            b'I' => self.open_literal(TokenKind::SymbolsBeg, StrFunc::DWORD, term, paren),
            b'i' => self.open_literal(TokenKind::QsymbolsBeg, StrFunc::SWORD, term, paren),
            b'x' => self.open_literal(TokenKind::XstringBeg, StrFunc::XQUOTE, term, paren),
            b'r' => self.open_literal(TokenKind::RegexpBeg, StrFunc::REGEXP_LIT, term, paren),
            b's' => {
                let token = self.open_literal(TokenKind::Symbeg, StrFunc::SSYM, term, paren);
                self.mode = LexMode::FNAME | LexMode::FITEM;
                token
            }
            _ => {
                self.report(|range, span| LexError::new(LexErrorKind::UnknownPercentType, range, span));
                self.open_literal(TokenKind::StringBeg, StrFunc::DQUOTE, term, paren)
            }
        };
        Ok(Some(token))
    }

    /// `%` followed by something that cannot delimit a literal. The byte
    /// `c`, just read, is skipped with the rest of its character.
    fn unknown_percent(&mut self, c: u8) {
        if !c.is_ascii() {
            let rest = self.buf.line().bytes();
            let from = self.buf.cursor() - 1;
            let len = self.encoding.char_len(&rest[from..]).unwrap_or(1);
            self.buf.skip(len - 1);
        }
        self.report(|range, span| LexError::new(LexErrorKind::UnknownPercentType, range, span));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
