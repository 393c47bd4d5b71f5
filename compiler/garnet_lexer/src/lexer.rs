//! The mode-driven lexer.
//!
//! [`Lexer`] pulls lines from a [`LineBuffer`] and produces one [`Token`] per
//! call. What a byte means depends on three pieces of state:
//!
//! - the [`LexMode`], updated after every token;
//! - the active literal terminator, if any (`strterm`), which routes the
//!   next call to the string or heredoc scanner instead of the dispatcher;
//! - the bit stacks (`cond`, `cmdarg`, `paren`) that remember which
//!   bracket, loop head or lambda the cursor is inside.
//!
//! The parser may also steer the lexer between tokens: it sets the mode,
//! pushes and pops the bit stacks, opens scopes and records closers.
//!
//! Sub-lexers live in child modules, each an `impl Lexer` block:
//! `dispatch` (the byte-level switch), `ident`, `numeric`, `escape`,
//! `string_term`, `heredoc` and `magic_comment`.

use std::mem;

use garnet_ir::{SharedInterner, SourcePos, SourceRange, Span, Token, TokenFlags, TokenKind, TokenValue};
use garnet_lexer_core::{detect_bom, Bom, LineBuffer, LineSource, SourceEncoding, TokenStart};
use garnet_stack::NestingLimit;
use tracing::{debug, trace};

use crate::bit_stack::BitStack;
use crate::closers::{AwaitedCloser, AwaitedClosers};
use crate::lex_error::{LexError, LexErrorKind, LexFatal, LexWarning, LexWarningKind};
use crate::mode::{transition, LexMode};
use crate::options::{LexerOptions, Pragmas};
use crate::scope::{PoppedScope, ScopeError, ScopeTable};

mod dispatch;
mod escape;
mod heredoc;
mod ident;
mod magic_comment;
mod numeric;
mod string_term;

use heredoc::HeredocTerm;
use string_term::LiteralTerm;

/// What the next call reads: the body of an open literal or heredoc.
#[derive(Clone, Debug)]
enum StrTerm {
    Literal(LiteralTerm),
    Heredoc(HeredocTerm),
}

/// State parked while the code inside `#{...}` is lexed.
#[derive(Clone, Debug)]
struct Interpolation {
    term: StrTerm,
    cond: BitStack,
    cmdarg: BitStack,
    paren: BitStack,
    brace_nest: u32,
    mode: LexMode,
}

/// Identifier bytes: ASCII alphanumerics, `_`, and anything non-ASCII.
#[inline]
pub(crate) fn is_identchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || !b.is_ascii()
}

/// Whitespace in the sense of C `isspace`.
#[inline]
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn range_between(start: TokenStart, end: TokenStart) -> (SourceRange, Span) {
    (
        SourceRange::new(
            SourcePos::new(start.line, start.column),
            SourcePos::new(end.line, end.column),
        ),
        Span::new(start.offset, end.offset),
    )
}

fn point_at(at: TokenStart) -> (SourceRange, Span) {
    (
        SourceRange::point(SourcePos::new(at.line, at.column)),
        Span::point(at.offset),
    )
}

/// Tokenizer for one source.
pub struct Lexer<'src> {
    buf: LineBuffer<'src>,
    options: LexerOptions,
    interner: SharedInterner,
    encoding: SourceEncoding,
    pragmas: Pragmas,

    mode: LexMode,
    /// Mode when the current token started.
    last_state: LexMode,
    cond: BitStack,
    cmdarg: BitStack,
    paren: BitStack,

    /// The next token starts a command.
    command_start: bool,
    /// The current token starts a command.
    command_state: bool,
    space_seen: bool,
    /// Any non-newline token has been produced.
    token_seen: bool,
    in_kwarg: bool,
    /// Unclosed `{` in the current code region.
    brace_nest: u32,
    /// `for` keywords still waiting for their `in`.
    pending_for: u32,
    /// Loop heads whose `cond` bit is still pushed.
    loop_heads: u32,

    strterm: Option<StrTerm>,
    /// Literal to resume after the variable that follows `#$`, `#@`.
    dvar_resume: Option<StrTerm>,
    interpolations: Vec<Interpolation>,
    nesting: NestingLimit,
    /// Bytes of the token being built.
    tokbuf: Vec<u8>,
    /// Flags for the token being built.
    flags: TokenFlags,

    scopes: ScopeTable,
    closers: AwaitedClosers,

    errors: Vec<LexError>,
    warnings: Vec<LexWarning>,

    has_shebang: bool,
    prologue_done: bool,
    /// Input is exhausted; every further call ends the input.
    eofp: bool,
    /// The iterator has yielded end of input.
    done: bool,
    /// A fatal condition was returned.
    failed: bool,
    fatal: Option<LexFatal>,
    data_offset: Option<u32>,
    cr_warned: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: impl LineSource + 'src, options: LexerOptions) -> Self {
        Self::with_interner(source, options, SharedInterner::new())
    }

    /// A lexer that interns names into an existing table.
    pub fn with_interner(
        source: impl LineSource + 'src,
        options: LexerOptions,
        interner: SharedInterner,
    ) -> Self {
        let buf = LineBuffer::new(source, options.start_line);
        let pragmas = Pragmas {
            frozen_string_literal: options.frozen_string_literal,
            ..Pragmas::default()
        };
        Lexer {
            buf,
            encoding: options.default_encoding,
            pragmas,
            mode: LexMode::BEGIN,
            last_state: LexMode::BEGIN,
            cond: BitStack::new(),
            cmdarg: BitStack::new(),
            paren: BitStack::new(),
            command_start: true,
            command_state: false,
            space_seen: false,
            token_seen: false,
            in_kwarg: false,
            brace_nest: 0,
            pending_for: 0,
            loop_heads: 0,
            strterm: None,
            dvar_resume: None,
            interpolations: Vec::new(),
            nesting: NestingLimit::new(options.max_nesting),
            tokbuf: Vec::with_capacity(64),
            flags: TokenFlags::EMPTY,
            scopes: ScopeTable::new(interner.clone()),
            closers: AwaitedClosers::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            has_shebang: false,
            prologue_done: false,
            eofp: false,
            done: false,
            failed: false,
            fatal: None,
            data_offset: None,
            cr_warned: false,
            interner,
            options,
        }
    }

    /// Produce the next token.
    ///
    /// A fatal condition is returned once; every later call yields
    /// `EndOfInput`.
    pub fn next_token(&mut self) -> Result<Token, LexFatal> {
        if self.failed {
            let (range, span) = point_at(self.buf.position());
            return Ok(Token::new(TokenKind::EndOfInput, TokenValue::None, range, span));
        }
        match self.lex() {
            Ok(token) => Ok(token),
            Err(fatal) => {
                debug!(error = %fatal, "lexing stopped");
                self.failed = true;
                Err(fatal)
            }
        }
    }

    // === Parser Controls ===

    pub fn mode(&self) -> LexMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LexMode) {
        self.mode = mode;
    }

    pub fn push_cond(&mut self, bit: bool) {
        self.cond.push(bit);
    }

    pub fn pop_cond(&mut self) -> Result<bool, LexFatal> {
        self.cond
            .pop()
            .map_err(|source| LexFatal::BitStackUnderflow { stack: "cond", source })
    }

    pub fn push_cmdarg(&mut self, bit: bool) {
        self.cmdarg.push(bit);
    }

    pub fn pop_cmdarg(&mut self) -> Result<bool, LexFatal> {
        self.cmdarg
            .pop()
            .map_err(|source| LexFatal::BitStackUnderflow { stack: "cmdarg", source })
    }

    pub fn cond_stack(&self) -> BitStack {
        self.cond
    }

    pub fn cmdarg_stack(&self) -> BitStack {
        self.cmdarg
    }

    pub fn paren_stack(&self) -> BitStack {
        self.paren
    }

    pub fn brace_nest(&self) -> u32 {
        self.brace_nest
    }

    /// Inside a pattern or keyword-argument list, where a newline after a
    /// label ends the construct.
    pub fn set_in_kwarg(&mut self, on: bool) {
        self.in_kwarg = on;
    }

    pub fn scopes(&self) -> &ScopeTable {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeTable {
        &mut self.scopes
    }

    /// Open a method, class or program scope. Command-argument state starts
    /// fresh inside it.
    pub fn push_local_scope(&mut self) {
        let saved = mem::take(&mut self.cmdarg);
        self.scopes.push_local(saved);
    }

    /// Open a block scope.
    pub fn push_block_scope(&mut self) {
        self.scopes.push_block(self.cmdarg);
        self.cmdarg.push(false);
    }

    /// Close the innermost scope, restoring the command-argument state of the
    /// code around it. Unused locals become warnings when verbose.
    pub fn pop_scope(&mut self) -> Result<PoppedScope, ScopeError> {
        let popped = self.scopes.pop()?;
        self.cmdarg = popped.saved_cmdarg;
        if self.options.verbose {
            for var in &popped.unused {
                let name = self.interner.lookup(var.name).to_owned();
                self.warnings.push(LexWarning::new(
                    LexWarningKind::UnusedVariable { name },
                    var.range,
                    Span::DUMMY,
                ));
            }
        }
        Ok(popped)
    }

    /// Record a construct that still needs its closer.
    pub fn expect_closer(&mut self, opener: TokenKind, range: SourceRange) {
        self.closers.push(opener, range);
    }

    /// The innermost awaited closer arrived.
    pub fn close_expected(&mut self) -> Option<AwaitedCloser> {
        self.closers.pop()
    }

    // === Results ===

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    pub fn pragmas(&self) -> &Pragmas {
        &self.pragmas
    }

    /// Encoding in effect: the default, or what a BOM or magic comment set.
    pub fn encoding(&self) -> SourceEncoding {
        self.encoding
    }

    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[LexWarning] {
        &self.warnings
    }

    pub fn take_errors(&mut self) -> Vec<LexError> {
        mem::take(&mut self.errors)
    }

    pub fn take_warnings(&mut self) -> Vec<LexWarning> {
        mem::take(&mut self.warnings)
    }

    /// Byte offset just past the `__END__` line, when one was seen.
    pub fn data_offset(&self) -> Option<u32> {
        self.data_offset
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// The fatal condition swallowed by the iterator, if any.
    pub fn take_fatal(&mut self) -> Option<LexFatal> {
        self.fatal.take()
    }

    // === Driver ===

    fn lex(&mut self) -> Result<Token, LexFatal> {
        if !self.prologue_done {
            self.prologue()?;
        }
        self.flags = TokenFlags::EMPTY;
        self.space_seen = false;

        let token = match self.strterm.take() {
            Some(StrTerm::Literal(term)) => self.parse_string(term)?,
            Some(StrTerm::Heredoc(here)) => self.here_document(here)?,
            None => {
                let token = self.lex_normal()?;
                if let Some(term) = self.dvar_resume.take() {
                    self.strterm = Some(term);
                }
                token
            }
        };
        if !matches!(
            token.kind,
            TokenKind::Newline | TokenKind::EndOfInput | TokenKind::DummyEnd
        ) {
            self.token_seen = true;
        }
        trace!(kind = ?token.kind, range = %token.range, mode = ?self.mode, "token");
        Ok(token)
    }

    /// Byte-order mark and shebang, checked once before the first token.
    fn prologue(&mut self) -> Result<(), LexFatal> {
        self.prologue_done = true;
        let Some(mut first) = self.buf.read_line() else {
            return Ok(());
        };
        match detect_bom(first.bytes()) {
            Some(Bom::Utf8) => {
                first = first.strip_prefix(Bom::Utf8.len());
                self.encoding = SourceEncoding::UTF_8;
                self.pragmas.encoding = Some(SourceEncoding::UTF_8);
                debug!("UTF-8 byte order mark");
            }
            Some(bom) => {
                let (range, _) = point_at(self.buf.position());
                return Err(LexFatal::IncompatibleEncoding {
                    name: bom.encoding().name().to_owned(),
                    range,
                });
            }
            None => {}
        }
        self.has_shebang = first.bytes().starts_with(b"#!");
        self.buf.inject([first]);
        Ok(())
    }

    /// Finish the input: report literals left open, then synthesize awaited
    /// closers when error-tolerant, then `EndOfInput`.
    fn end_of_input(&mut self) -> Result<Token, LexFatal> {
        self.eofp = true;
        if let Some(err) = self.buf.take_error() {
            return Err(LexFatal::Io(err));
        }
        while let Some(frame) = self.interpolations.pop() {
            self.nesting.exit();
            let error = match frame.term {
                StrTerm::Literal(term) => {
                    LexError::unterminated(term.literal_kind(), term.opened, term.opened_span)
                }
                StrTerm::Heredoc(here) => {
                    LexError::unterminated_heredoc(&here.id, here.opened, here.opened_span)
                }
            };
            self.push_error(error);
        }
        let (range, span) = point_at(self.buf.position());
        if self.options.error_tolerant {
            if let Some(closer) = self.closers.pop() {
                debug!(opener = ?closer.opener, "synthesized closer");
                return Ok(Token::synthetic(TokenKind::DummyEnd, range, span));
            }
        }
        Ok(Token::new(TokenKind::EndOfInput, TokenValue::None, range, span)
            .with_flags(self.flags))
    }

    // === Token Construction ===

    fn make_token(&self, kind: TokenKind, value: TokenValue, range: SourceRange, span: Span) -> Token {
        let mut flags = self.flags;
        if self.space_seen {
            flags.set(TokenFlags::SPACE_BEFORE);
        }
        if self.command_state {
            flags.set(TokenFlags::COMMAND_START);
        }
        Token::new(kind, value, range, span).with_flags(flags)
    }

    /// Token from the recorded start to the cursor.
    fn emit(&self, kind: TokenKind, value: TokenValue) -> Token {
        let (range, span) = range_between(self.buf.token_start(), self.buf.position());
        self.make_token(kind, value, range, span)
    }

    /// Operator-like token whose mode follows from the kind alone.
    fn op(&mut self, kind: TokenKind) -> Token {
        if let Some(next) = transition(kind, self.mode) {
            self.mode = next;
        }
        self.emit(kind, TokenValue::None)
    }

    /// `op=` assignment, carrying the operator name.
    fn op_asgn(&mut self, operator: &str) -> Token {
        self.mode = LexMode::BEGIN;
        let name = self.interner.intern(operator);
        self.emit(TokenKind::OpAsgn, TokenValue::Name(name))
    }

    fn intern_tokbuf(&self) -> TokenValue {
        let text = self.encoding.decode_name(&self.tokbuf);
        TokenValue::Name(self.interner.intern(&text))
    }

    fn take_tokbuf(&mut self) -> TokenValue {
        TokenValue::Str(mem::take(&mut self.tokbuf))
    }

    // === Diagnostics ===

    fn line_text(&self) -> String {
        String::from_utf8_lossy(self.buf.line().without_terminator()).into_owned()
    }

    fn push_error(&mut self, mut error: LexError) {
        if error.range.start.line == self.buf.line().number() {
            error = error.with_line_text(self.line_text());
        }
        self.flags.set(TokenFlags::HAS_ERROR);
        self.errors.push(error);
    }

    /// Report an error spanning `start` to the cursor.
    fn report_at(&mut self, start: TokenStart, make: impl FnOnce(SourceRange, Span) -> LexError) {
        let (range, span) = range_between(start, self.buf.position());
        self.push_error(make(range, span));
    }

    /// Report an error spanning the current token so far.
    fn report(&mut self, make: impl FnOnce(SourceRange, Span) -> LexError) {
        self.report_at(self.buf.token_start(), make);
    }

    fn warn_at(&mut self, start: TokenStart, kind: LexWarningKind) {
        if !self.options.verbose {
            return;
        }
        let (range, span) = range_between(start, self.buf.position());
        let mut warning = LexWarning::new(kind, range, span);
        if range.start.line == self.buf.line().number() {
            warning = warning.with_line_text(self.line_text());
        }
        self.warnings.push(warning);
    }

    fn warn(&mut self, kind: LexWarningKind) {
        self.warn_at(self.buf.token_start(), kind);
    }

    /// Position of the byte just read, for escapes that start mid-token.
    fn last_char_start(&self) -> TokenStart {
        let mut at = self.buf.position();
        at.column = at.column.saturating_sub(1);
        at.offset = at.offset.saturating_sub(1);
        at
    }

    // === Shared Scanning ===

    /// Copy one possibly multibyte character, whose first byte `c` was just
    /// read, into the token buffer.
    fn tokadd_mbchar(&mut self, c: u8) {
        if c.is_ascii() {
            self.tokbuf.push(c);
            return;
        }
        let start = self.buf.cursor().saturating_sub(1);
        let bytes = &self.buf.line().bytes()[start..];
        match self.encoding.char_len(bytes) {
            Some(len) => {
                self.tokbuf.extend_from_slice(&bytes[..len]);
                self.buf.skip(len - 1);
            }
            None => {
                self.tokbuf.push(c);
                let encoding = self.encoding.name();
                let at = self.last_char_start();
                self.report_at(at, |range, span| {
                    LexError::new(LexErrorKind::InvalidMultibyte { encoding }, range, span)
                });
            }
        }
    }

    /// Read identifier characters starting with `first` into the token
    /// buffer. Returns the byte that stopped the scan (consumed) and whether
    /// every byte was ASCII.
    fn read_ident(&mut self, first: u8) -> (Option<u8>, bool) {
        let mut ascii = true;
        let mut c = Some(first);
        while let Some(b) = c.filter(|&b| is_identchar(b)) {
            ascii &= b.is_ascii();
            self.tokadd_mbchar(b);
            c = self.buf.nextc();
        }
        (c, ascii)
    }

    /// The next byte is `:` and the one after is not.
    fn is_label_suffix(&self) -> bool {
        self.buf.peek_is(b':') && self.buf.peek_at(1) != Some(b':')
    }

    /// Push a clear bit on every bracket-scoped stack.
    fn push_nesting(&mut self) {
        self.cond.push(false);
        self.cmdarg.push(false);
        self.paren.push(false);
    }

    fn pop_nesting(&mut self) {
        self.cond.pop_if_any();
        self.cmdarg.pop_if_any();
        self.paren.pop_if_any();
    }

    /// A statement boundary ends the innermost loop head.
    fn end_loop_head(&mut self) {
        if self.loop_heads > 0 && self.cond.top() {
            self.cond.pop_if_any();
            self.loop_heads -= 1;
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Tokens through `EndOfInput`. A fatal condition is kept for
    /// [`Lexer::take_fatal`] and ends the stream with a synthetic
    /// `EndOfInput`.
    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(token) => {
                if token.is_eof() {
                    self.done = true;
                }
                Some(token)
            }
            Err(fatal) => {
                self.fatal = Some(fatal);
                self.done = true;
                let (range, span) = point_at(self.buf.position());
                Some(Token::synthetic(TokenKind::EndOfInput, range, span))
            }
        }
    }
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("mode", &self.mode)
            .field("cond", &self.cond)
            .field("cmdarg", &self.cmdarg)
            .field("paren", &self.paren)
            .field("brace_nest", &self.brace_nest)
            .field("encoding", &self.encoding)
            .field("errors", &self.errors.len())
            .finish_non_exhaustive()
    }
}
