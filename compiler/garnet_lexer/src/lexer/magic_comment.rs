//! Magic comments: `# frozen_string_literal: true`, `# -*- coding: ... -*-`.
//!
//! A comment is magic when it is a single `name: value` pair, or when it
//! holds an Emacs-style `-*- name: value; ... -*-` section. Names ignore
//! case and treat `-` as `_`.

use garnet_lexer_core::SourceEncoding;
use memchr::memmem;
use tracing::debug;

use super::{point_at, Lexer};
use crate::lex_error::{LexFatal, LexWarningKind};
use crate::options::ShareableConstantValue;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct MagicPair {
    pub(super) name: String,
    pub(super) value: String,
}

fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | 0x0b | 0x0c | b'\r' | b'\n')
}

fn skip_blanks(text: &[u8]) -> &[u8] {
    let n = text.iter().take_while(|&&b| is_blank(b)).count();
    &text[n..]
}

/// Split a `"quoted"` or bare value off the front of `text`.
fn split_value(text: &[u8], emacs: bool) -> (Vec<u8>, &[u8]) {
    if let Some(quoted) = text.strip_prefix(b"\"") {
        let mut value = Vec::new();
        let mut i = 0;
        while i < quoted.len() {
            match quoted[i] {
                b'"' => return (value, &quoted[i + 1..]),
                b'\\' if i + 1 < quoted.len() => {
                    value.push(quoted[i + 1]);
                    i += 2;
                }
                b => {
                    value.push(b);
                    i += 1;
                }
            }
        }
        return (value, &[]);
    }
    let len = text
        .iter()
        .take_while(|&&b| !is_blank(b) && !(emacs && b == b';'))
        .count();
    (text[..len].to_vec(), &text[len..])
}

/// Pairs in a comment body (the text after `#`), or `None` when the comment
/// is not magic.
pub(super) fn scan(text: &[u8]) -> Option<Vec<MagicPair>> {
    let (body, emacs) = match memmem::find(text, b"-*-") {
        Some(open) => {
            let after = &text[open + 3..];
            let close = memmem::find(after, b"-*-")?;
            (&after[..close], true)
        }
        None => (text, false),
    };

    let mut pairs = Vec::new();
    let mut rest = body;
    loop {
        let skip = rest
            .iter()
            .take_while(|&&b| is_blank(b) || (emacs && b == b';'))
            .count();
        rest = &rest[skip..];
        if rest.is_empty() {
            break;
        }
        let name_len = rest
            .iter()
            .take_while(|&&b| !is_blank(b) && b != b':' && b != b';')
            .count();
        if name_len == 0 {
            return None;
        }
        let name: String = String::from_utf8_lossy(&rest[..name_len])
            .chars()
            .map(|c| if c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();
        rest = skip_blanks(&rest[name_len..]);
        rest = rest.strip_prefix(b":")?;
        rest = skip_blanks(rest);
        let (value, after) = split_value(rest, emacs);
        rest = after;
        pairs.push(MagicPair {
            name,
            value: String::from_utf8_lossy(&value).into_owned(),
        });
        if !emacs {
            if !skip_blanks(rest).is_empty() {
                return None;
            }
            break;
        }
    }
    (!pairs.is_empty()).then_some(pairs)
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Drop an end-of-line convention suffix: `-unix`, `-dos`, `-mac`.
/// `utf8-mac` and `utf-8-mac` are encodings in their own right.
fn strip_eol_suffix(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    if lower == "utf8-mac" || lower == "utf-8-mac" {
        return name;
    }
    for suffix in ["-unix", "-dos", "-mac"] {
        if lower.ends_with(suffix) {
            return &name[..name.len() - suffix.len()];
        }
    }
    name
}

impl Lexer<'_> {
    /// The `#` just read starts the first line (the second after a shebang)
    /// with only blanks before it.
    pub(super) fn comment_at_top(&self) -> bool {
        let first = self.options.start_line + u32::from(self.has_shebang);
        if self.buf.line().number() != first {
            return false;
        }
        let before = self.buf.before_cursor();
        before[..before.len().saturating_sub(1)]
            .iter()
            .all(|&b| b == b' ' || b == b'\t')
    }

    /// Text of the comment after its `#`, without the line terminator.
    fn comment_text(&self) -> Vec<u8> {
        let line = self.buf.line();
        let end = line.without_terminator().len();
        let start = self.buf.cursor().min(end);
        line.bytes()[start..end].to_vec()
    }

    /// Apply a magic comment, if the `#` just read starts one. `false` when
    /// the comment is not magic.
    pub(super) fn magic_comment(&mut self, at_top: bool) -> Result<bool, LexFatal> {
        let text = self.comment_text();
        let Some(pairs) = scan(&text) else {
            return Ok(false);
        };
        let alone = {
            let before = self.buf.before_cursor();
            before[..before.len().saturating_sub(1)]
                .iter()
                .all(|&b| b == b' ' || b == b'\t')
        };
        for pair in pairs {
            self.apply_pragma(pair, at_top, alone)?;
        }
        Ok(true)
    }

    fn apply_pragma(&mut self, pair: MagicPair, at_top: bool, alone: bool) -> Result<(), LexFatal> {
        let MagicPair { name, value } = pair;
        debug!(pragma = %name, value = %value, "magic comment");
        match name.as_str() {
            "coding" | "encoding" => {
                if at_top {
                    self.set_encoding(&value)?;
                }
            }
            "frozen_string_literal" => {
                if self.token_seen {
                    self.warn(LexWarningKind::MagicCommentIgnored { name });
                    return Ok(());
                }
                match parse_bool(&value) {
                    Some(frozen) => self.pragmas.frozen_string_literal = Some(frozen),
                    None => self.warn(LexWarningKind::InvalidMagicValue { name, value }),
                }
            }
            "warn_indent" => match parse_bool(&value) {
                Some(on) => self.pragmas.warn_indent = Some(on),
                None => self.warn(LexWarningKind::InvalidMagicValue { name, value }),
            },
            "shareable_constant_value" => {
                if !alone {
                    return Ok(());
                }
                match ShareableConstantValue::parse(&value) {
                    Some(setting) => self.pragmas.shareable_constant_value = setting,
                    None => self.warn(LexWarningKind::InvalidMagicValue { name, value }),
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Switch the source encoding by name.
    fn set_encoding(&mut self, name: &str) -> Result<(), LexFatal> {
        let (range, _) = point_at(self.buf.token_start());
        let Some(encoding) = SourceEncoding::lookup(strip_eol_suffix(name)) else {
            return Err(LexFatal::UnknownEncoding {
                name: name.to_owned(),
                range,
            });
        };
        if !encoding.is_ascii_compatible() {
            return Err(LexFatal::IncompatibleEncoding {
                name: encoding.name().to_owned(),
                range,
            });
        }
        debug!(encoding = encoding.name(), "source encoding");
        self.encoding = encoding;
        self.pragmas.encoding = Some(encoding);
        Ok(())
    }

    /// A top comment that is not a `name: value` pair may still name an
    /// encoding: `# vim: set fileencoding=utf-8`.
    pub(super) fn coding_fallback(&mut self) -> Result<(), LexFatal> {
        let text = self.comment_text();
        let lower = text.to_ascii_lowercase();
        for at in memmem::find_iter(&lower, b"coding") {
            let after = &text[at + 6..];
            let Some(after) = after.strip_prefix(b":").or_else(|| after.strip_prefix(b"=")) else {
                continue;
            };
            let after = skip_blanks(after);
            let len = after
                .iter()
                .take_while(|&&b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
                .count();
            if len == 0 {
                continue;
            }
            let name = String::from_utf8_lossy(&after[..len]).into_owned();
            return self.set_encoding(&name);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
