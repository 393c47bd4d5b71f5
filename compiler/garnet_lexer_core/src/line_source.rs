//! Line suppliers.
//!
//! A [`LineSource`] hands the lexer one physical line at a time, terminator
//! included. The last line may lack a terminator. Sources never see lexer
//! state; they only answer "what comes next".

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Anything that can supply successive lines of source text.
pub trait LineSource {
    /// The next line including its `\n` (or `\r\n`), or `None` at end of input.
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>>;
}

/// Lines of an in-memory buffer.
#[derive(Clone, Debug)]
pub struct StrSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> StrSource<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    /// Source bytes need not be UTF-8; the effective encoding is decided by
    /// the lexer (BOM or magic comment).
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        StrSource { bytes, pos: 0 }
    }
}

impl LineSource for StrSource<'_> {
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let rest = &self.bytes[self.pos..];
        if rest.is_empty() {
            return Ok(None);
        }
        let len = memchr::memchr(b'\n', rest).map_or(rest.len(), |nl| nl + 1);
        self.pos += len;
        Ok(Some(rest[..len].to_vec()))
    }
}

/// Lines of any buffered reader, e.g. an opened file.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }
}

impl ReaderSource<BufReader<File>> {
    /// Open a file for line-by-line reading.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(ReaderSource::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Lines produced by a callback, for interactive or generated input.
pub struct FnSource<F> {
    supply: F,
}

impl<F> FnSource<F>
where
    F: FnMut() -> io::Result<Option<Vec<u8>>>,
{
    pub fn new(supply: F) -> Self {
        FnSource { supply }
    }
}

impl<F> LineSource for FnSource<F>
where
    F: FnMut() -> io::Result<Option<Vec<u8>>>,
{
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        (self.supply)()
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        (**self).next_line()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
