//! The lexer's window onto the source: one physical line and a cursor.
//!
//! The buffer pulls lines from a [`LineSource`] on demand. `\r\n` reads as a
//! single `\n`. Two redirections support heredocs:
//!
//! - [`LineBuffer::save`] / [`LineBuffer::restore`]: park the opening line of
//!   a heredoc while its body is read from the following lines, then jump
//!   back. Lines consumed by the body are gone from the source, so the next
//!   refill after the restore continues after the terminator.
//! - [`LineBuffer::inject`]: queue already-read lines (a dedented `<<~`
//!   body) so they are served before the source is consulted again.

use std::collections::VecDeque;
use std::io;

use crate::LineSource;

/// One physical source line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    bytes: Vec<u8>,
    number: u32,
    offset: u32,
    column_shift: u32,
}

impl Line {
    /// `offset` is the absolute byte offset of the line's first byte.
    pub fn new(bytes: Vec<u8>, number: u32, offset: u32) -> Self {
        Line {
            bytes,
            number,
            offset,
            column_shift: 0,
        }
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 1-based line number.
    #[inline]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Absolute offset just past the line's last byte.
    pub fn end_offset(&self) -> u32 {
        self.offset
            .saturating_add(u32::try_from(self.bytes.len()).unwrap_or(u32::MAX))
    }

    /// Drop the first `count` bytes, keeping reported columns and offsets
    /// anchored to the original text.
    #[must_use]
    pub fn strip_prefix(mut self, count: usize) -> Line {
        let count = count.min(self.bytes.len());
        self.bytes.drain(..count);
        let shift = u32::try_from(count).unwrap_or(u32::MAX);
        self.offset = self.offset.saturating_add(shift);
        self.column_shift = self.column_shift.saturating_add(shift);
        self
    }

    /// Content without the trailing `\n` or `\r\n`.
    pub fn without_terminator(&self) -> &[u8] {
        let bytes = self.bytes.as_slice();
        let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        bytes.strip_suffix(b"\r").unwrap_or(bytes)
    }
}

/// A position in the source: 1-based line, 0-based byte column, absolute
/// byte offset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenStart {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

/// A parked line and cursor, restored after a heredoc body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Continuation {
    line: Line,
    pos: usize,
}

impl Continuation {
    pub fn line_number(&self) -> u32 {
        self.line.number
    }
}

/// Current line, cursor and refill logic.
pub struct LineBuffer<'src> {
    source: Box<dyn LineSource + 'src>,
    line: Line,
    pos: usize,
    last: usize,
    token_start: TokenStart,
    injected: VecDeque<Line>,
    next_number: u32,
    next_offset: u32,
    eof: bool,
    error: Option<io::Error>,
}

impl<'src> LineBuffer<'src> {
    /// A buffer positioned before the first line. `first_line` numbers it.
    pub fn new(source: impl LineSource + 'src, first_line: u32) -> Self {
        LineBuffer {
            source: Box::new(source),
            line: Line::new(Vec::new(), first_line, 0),
            pos: 0,
            last: 0,
            token_start: TokenStart {
                line: first_line,
                column: 0,
                offset: 0,
            },
            injected: VecDeque::new(),
            next_number: first_line,
            next_offset: 0,
            eof: false,
            error: None,
        }
    }

    // === Reading ===

    /// Next byte, refilling from the source at end of line.
    ///
    /// `\r\n` is returned as one `\n`. `None` at end of input.
    pub fn nextc(&mut self) -> Option<u8> {
        while self.pos >= self.line.len() {
            if !self.refill() {
                return None;
            }
        }
        let c = self.line.bytes[self.pos];
        self.last = self.pos;
        self.pos += 1;
        if c == b'\r' && self.peek() == Some(b'\n') {
            self.pos += 1;
            return Some(b'\n');
        }
        Some(c)
    }

    /// Undo the last [`nextc`](Self::nextc) within the current line.
    pub fn pushback(&mut self, c: Option<u8>) {
        if c.is_none() || self.pos == 0 {
            return;
        }
        self.pos -= 1;
        if self.pos > 0 && self.line.bytes[self.pos] == b'\n' && self.line.bytes[self.pos - 1] == b'\r'
        {
            self.pos -= 1;
        }
    }

    /// Byte under the cursor, without refilling.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.line.bytes.get(self.pos).copied()
    }

    /// Byte `n` past the cursor, without refilling.
    #[inline]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.line.bytes.get(self.pos + n).copied()
    }

    #[inline]
    pub fn peek_is(&self, byte: u8) -> bool {
        self.peek() == Some(byte)
    }

    /// Whether the rest of the line starts with `prefix`.
    #[inline]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Advance past up to `n` bytes of the current line.
    pub fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.line.len());
    }

    /// Consume bytes of the current line while `pred` holds.
    pub fn eat_while(&mut self, mut pred: impl FnMut(u8) -> bool) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(&mut pred) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Unread part of the current line.
    #[inline]
    pub fn rest(&self) -> &[u8] {
        &self.line.bytes[self.pos.min(self.line.len())..]
    }

    /// Read part of the current line.
    #[inline]
    pub fn before_cursor(&self) -> &[u8] {
        &self.line.bytes[..self.pos.min(self.line.len())]
    }

    #[inline]
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Cursor index into the current line.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.pos
    }

    /// Move the cursor within the current line.
    pub fn set_cursor(&mut self, pos: usize) {
        self.pos = pos.min(self.line.len());
    }

    #[inline]
    pub fn is_eol(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Skip the rest of the current line.
    pub fn goto_eol(&mut self) {
        self.pos = self.line.len();
    }

    /// Cursor is just past the first byte of the line.
    #[inline]
    pub fn was_bol(&self) -> bool {
        self.pos == 1
    }

    #[inline]
    pub fn is_bol(&self) -> bool {
        self.pos == 0
    }

    /// End of input reached and nothing is queued.
    pub fn at_eof(&self) -> bool {
        self.eof && self.injected.is_empty() && self.is_eol()
    }

    // === Positions ===

    /// Position of the cursor.
    pub fn position(&self) -> TokenStart {
        let pos = u32::try_from(self.pos).unwrap_or(u32::MAX);
        TokenStart {
            line: self.line.number,
            column: self.line.column_shift.saturating_add(pos),
            offset: self.line.offset.saturating_add(pos),
        }
    }

    /// Record the cursor as the start of the next token.
    pub fn mark_token_start(&mut self) {
        self.token_start = self.position();
    }

    /// Record the byte returned by the last [`nextc`](Self::nextc) as the
    /// start of the next token.
    pub fn mark_last_char(&mut self) {
        let last = u32::try_from(self.last.min(self.pos)).unwrap_or(u32::MAX);
        self.token_start = TokenStart {
            line: self.line.number,
            column: self.line.column_shift.saturating_add(last),
            offset: self.line.offset.saturating_add(last),
        };
    }

    #[inline]
    pub fn token_start(&self) -> TokenStart {
        self.token_start
    }

    /// Override the recorded token start.
    pub fn set_token_start(&mut self, start: TokenStart) {
        self.token_start = start;
    }

    // === Refill and redirection ===

    /// Make the next line current. `false` at end of input.
    fn refill(&mut self) -> bool {
        match self.read_line() {
            Some(line) => {
                self.line = line;
                self.pos = 0;
                true
            }
            None => {
                self.pos = self.line.len();
                false
            }
        }
    }

    /// Pull the next line without making it current.
    ///
    /// Queued lines come first. I/O errors end the input and are kept for
    /// [`take_error`](Self::take_error).
    pub fn read_line(&mut self) -> Option<Line> {
        if let Some(line) = self.injected.pop_front() {
            return Some(line);
        }
        if self.eof {
            return None;
        }
        match self.source.next_line() {
            Ok(Some(bytes)) => {
                let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
                let line = Line::new(bytes, self.next_number, self.next_offset);
                self.next_number = self.next_number.saturating_add(1);
                self.next_offset = self.next_offset.saturating_add(len);
                Some(line)
            }
            Ok(None) => {
                self.eof = true;
                None
            }
            Err(err) => {
                self.eof = true;
                self.error = Some(err);
                None
            }
        }
    }

    /// Queue lines to be served, in order, before anything else.
    pub fn inject(&mut self, lines: impl IntoIterator<Item = Line>) {
        let lines: Vec<Line> = lines.into_iter().collect();
        for line in lines.into_iter().rev() {
            self.injected.push_front(line);
        }
    }

    /// Park the current line and cursor.
    pub fn save(&self) -> Continuation {
        Continuation {
            line: self.line.clone(),
            pos: self.pos,
        }
    }

    /// Return to a parked line and cursor.
    pub fn restore(&mut self, continuation: Continuation) {
        self.line = continuation.line;
        self.pos = continuation.pos;
    }

    /// The I/O error that ended input early, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl std::fmt::Debug for LineBuffer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineBuffer")
            .field("line", &self.line.number)
            .field("pos", &self.pos)
            .field("eof", &self.eof)
            .finish_non_exhaustive()
    }
}
