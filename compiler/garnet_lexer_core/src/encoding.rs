//! Source encodings.
//!
//! The lexer scans bytes, never decoded text. All it needs from an encoding
//! is: is it ASCII-compatible (so that delimiters and operators are the
//! ASCII bytes they look like), how long is the character starting at a
//! given byte, and is that character uppercase (for constant detection).
//!
//! Name resolution covers the encodings a magic comment can realistically
//! name. Anything else is "unknown", which the lexer reports as fatal.

use std::borrow::Cow;

/// How characters are laid out in bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EncodingKind {
    Utf8,
    /// 7-bit only; high bytes are invalid.
    Ascii,
    /// One byte per character (`ASCII-8BIT`, ISO-8859-x, Windows-125x).
    SingleByte,
    /// EUC-JP: `0x8E`/`0xA1..=0xFE` lead 2 bytes, `0x8F` leads 3.
    EucJp,
    /// Shift_JIS family: `0x81..=0x9F`/`0xE0..=0xFC` lead 2 bytes.
    ShiftJis,
    /// GBK, Big5, EUC-KR: `0x81..=0xFE` leads 2 bytes.
    DoubleByte,
    /// UTF-16/UTF-32: not ASCII-compatible, rejected as a source encoding.
    Wide,
}

/// A named source encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceEncoding {
    name: &'static str,
    kind: EncodingKind,
}

/// Canonical names and the aliases that resolve to them.
const ENCODINGS: &[(&str, EncodingKind, &[&str])] = &[
    ("UTF-8", EncodingKind::Utf8, &["UTF8", "CP65001", "UTF8-MAC", "UTF-8-MAC"]),
    (
        "US-ASCII",
        EncodingKind::Ascii,
        &["ASCII", "ANSI_X3.4-1968", "646"],
    ),
    ("ASCII-8BIT", EncodingKind::SingleByte, &["BINARY"]),
    ("ISO-8859-1", EncodingKind::SingleByte, &["ISO8859-1", "LATIN1"]),
    ("ISO-8859-2", EncodingKind::SingleByte, &["ISO8859-2", "LATIN2"]),
    ("ISO-8859-5", EncodingKind::SingleByte, &["ISO8859-5"]),
    ("ISO-8859-9", EncodingKind::SingleByte, &["ISO8859-9", "LATIN5"]),
    ("ISO-8859-15", EncodingKind::SingleByte, &["ISO8859-15", "LATIN9"]),
    ("Windows-1250", EncodingKind::SingleByte, &["CP1250"]),
    ("Windows-1251", EncodingKind::SingleByte, &["CP1251"]),
    ("Windows-1252", EncodingKind::SingleByte, &["CP1252"]),
    ("KOI8-R", EncodingKind::SingleByte, &["CP878"]),
    ("EUC-JP", EncodingKind::EucJp, &["EUCJP", "eucJP-ms", "CP51932"]),
    (
        "Shift_JIS",
        EncodingKind::ShiftJis,
        &["SJIS", "Windows-31J", "CP932", "csWindows31J", "PCK"],
    ),
    ("EUC-KR", EncodingKind::DoubleByte, &["EUCKR", "CP949"]),
    ("GBK", EncodingKind::DoubleByte, &["CP936", "GB2312", "EUC-CN"]),
    ("Big5", EncodingKind::DoubleByte, &["CP950", "Big5-HKSCS"]),
    ("UTF-16LE", EncodingKind::Wide, &[]),
    ("UTF-16BE", EncodingKind::Wide, &["UCS-2BE"]),
    ("UTF-16", EncodingKind::Wide, &[]),
    ("UTF-32LE", EncodingKind::Wide, &["UCS-4LE"]),
    ("UTF-32BE", EncodingKind::Wide, &[]),
    ("UTF-32", EncodingKind::Wide, &[]),
];

impl SourceEncoding {
    pub const UTF_8: SourceEncoding = SourceEncoding {
        name: "UTF-8",
        kind: EncodingKind::Utf8,
    };
    pub const US_ASCII: SourceEncoding = SourceEncoding {
        name: "US-ASCII",
        kind: EncodingKind::Ascii,
    };
    pub const BINARY: SourceEncoding = SourceEncoding {
        name: "ASCII-8BIT",
        kind: EncodingKind::SingleByte,
    };

    /// Resolve an encoding name, case-insensitively, including aliases.
    pub fn lookup(name: &str) -> Option<SourceEncoding> {
        ENCODINGS.iter().find_map(|&(canonical, kind, aliases)| {
            let matches = canonical.eq_ignore_ascii_case(name)
                || aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name));
            matches.then_some(SourceEncoding {
                name: canonical,
                kind,
            })
        })
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> EncodingKind {
        self.kind
    }

    /// Whether ASCII bytes mean ASCII characters in this encoding.
    #[inline]
    pub fn is_ascii_compatible(&self) -> bool {
        self.kind != EncodingKind::Wide
    }

    #[inline]
    pub fn is_utf8(&self) -> bool {
        self.kind == EncodingKind::Utf8
    }

    /// Byte length of the character starting at `bytes[0]`.
    ///
    /// `None` when the bytes do not form a complete, valid character.
    pub fn char_len(&self, bytes: &[u8]) -> Option<usize> {
        let lead = *bytes.first()?;
        if lead < 0x80 {
            return Some(1);
        }
        let len = match self.kind {
            EncodingKind::Utf8 => utf8_char_width(lead),
            EncodingKind::Ascii => 0,
            EncodingKind::SingleByte => 1,
            EncodingKind::EucJp => match lead {
                0x8F => 3,
                0x8E | 0xA1..=0xFE => 2,
                _ => 0,
            },
            EncodingKind::ShiftJis => match lead {
                0x81..=0x9F | 0xE0..=0xFC => 2,
                0xA1..=0xDF => 1,
                _ => 0,
            },
            EncodingKind::DoubleByte => match lead {
                0x81..=0xFE => 2,
                _ => 0,
            },
            EncodingKind::Wide => 0,
        };
        if len == 0 || bytes.len() < len {
            return None;
        }
        if self.kind == EncodingKind::Utf8 {
            std::str::from_utf8(&bytes[..len]).ok()?;
        }
        Some(len)
    }

    /// Whether the character at `bytes[0]` is uppercase.
    ///
    /// Only ASCII and UTF-8 have a notion of case here; other multi-byte
    /// characters are never uppercase.
    pub fn is_upper(&self, bytes: &[u8]) -> bool {
        match bytes.first() {
            Some(b) if b.is_ascii() => b.is_ascii_uppercase(),
            Some(_) if self.is_utf8() => self
                .char_len(bytes)
                .and_then(|len| std::str::from_utf8(&bytes[..len]).ok())
                .and_then(|s| s.chars().next())
                .is_some_and(char::is_uppercase),
            _ => false,
        }
    }

    /// Text form of an identifier for interning.
    ///
    /// UTF-8 names pass through. Bytes of other encodings map one-to-one onto
    /// `U+0000..=U+00FF`, which keeps distinct byte strings distinct.
    pub fn decode_name<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        if self.is_utf8() || bytes.is_ascii() {
            if let Ok(text) = std::str::from_utf8(bytes) {
                return Cow::Borrowed(text);
            }
        }
        Cow::Owned(bytes.iter().copied().map(char::from).collect())
    }
}

impl Default for SourceEncoding {
    fn default() -> Self {
        Self::UTF_8
    }
}

impl std::fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Width of a UTF-8 sequence from its lead byte; 0 for a continuation or
/// invalid lead.
#[inline]
fn utf8_char_width(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

/// Byte order mark found at the start of the source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bom {
    /// `EF BB BF`: skipped, forces UTF-8.
    Utf8,
    /// `FF FE`
    Utf16Le,
    /// `FE FF`
    Utf16Be,
}

impl Bom {
    /// Byte length of the mark.
    pub fn len(self) -> usize {
        match self {
            Bom::Utf8 => 3,
            Bom::Utf16Le | Bom::Utf16Be => 2,
        }
    }

    /// The encoding the mark announces.
    pub fn encoding(self) -> SourceEncoding {
        match self {
            Bom::Utf8 => SourceEncoding::UTF_8,
            Bom::Utf16Le => SourceEncoding {
                name: "UTF-16LE",
                kind: EncodingKind::Wide,
            },
            Bom::Utf16Be => SourceEncoding {
                name: "UTF-16BE",
                kind: EncodingKind::Wide,
            },
        }
    }
}

/// Detect a byte order mark at the start of the first line.
pub fn detect_bom(first_line: &[u8]) -> Option<Bom> {
    match first_line {
        [0xEF, 0xBB, 0xBF, ..] => Some(Bom::Utf8),
        [0xFF, 0xFE, ..] => Some(Bom::Utf16Le),
        [0xFE, 0xFF, ..] => Some(Bom::Utf16Be),
        _ => None,
    }
}
