//! Low-level input layer for the Garnet lexer.
//!
//! The lexer consumes source one physical line at a time. This crate supplies
//! the pieces below the lexer proper:
//!
//! - [`LineSource`]: anything that yields successive lines (a string, a
//!   reader or file, a callback).
//! - [`LineBuffer`]: the current line with its cursor, token-start mark,
//!   pushback, refill, and the continuation save/restore used by heredocs.
//! - [`SourceEncoding`]: the table of named encodings the lexer accepts,
//!   ASCII-compatibility checks, per-encoding character widths, and BOM
//!   detection.
//!
//! Nothing here knows about tokens or lexer modes.

mod encoding;
mod line_buffer;
mod line_source;

pub use encoding::{detect_bom, Bom, EncodingKind, SourceEncoding};
pub use line_buffer::{Continuation, Line, LineBuffer, TokenStart};
pub use line_source::{FnSource, LineSource, ReaderSource, StrSource};
