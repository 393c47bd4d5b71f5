//! Numeric literals.
//!
//! Integers in four radixes (`0x`, `0b`, `0o`/`0`, `0d` or none), floats,
//! and the `r` (rational) and `i` (imaginary) suffixes. `_` may separate
//! digits but may not trail, double up, or follow a radix prefix alone.
//! Malformed literals are reported and still produce a token, valued zero.

use garnet_ir::{NumberSuffix, NumericValue, Token, TokenKind, TokenValue};
use num_bigint::BigInt;

use super::Lexer;
use crate::lex_error::{LexError, LexErrorKind, LexWarningKind};
use crate::mode::LexMode;

/// Digits read so far, and how the literal turned out.
struct Scanned {
    kind: NumberShape,
    bad: bool,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum NumberShape {
    Integer { radix: u32 },
    /// Float; `point` is the index of `.` in the digits, `exponent` whether
    /// an `e` part was read.
    Float { point: Option<usize>, exponent: bool },
}

impl Lexer<'_> {
    /// Lex a number whose first byte, a digit, `+`, or `.`, was just read.
    /// A leading `+` is dropped; the token range still covers it.
    pub(super) fn lex_number(&mut self, first: u8) -> Token {
        self.mode = LexMode::END;
        self.tokbuf.clear();
        let c = if first == b'+' { self.buf.nextc() } else { Some(first) };
        let scanned = self.scan_number(c);

        let allow_rational = !matches!(scanned.kind, NumberShape::Float { exponent: true, .. });
        let suffix = if scanned.bad && self.tokbuf.is_empty() {
            NumberSuffix::None
        } else {
            self.number_suffix(allow_rational)
        };
        let value = if scanned.bad {
            match scanned.kind {
                NumberShape::Float { .. } => NumericValue::float(0.0),
                NumberShape::Integer { .. } => NumericValue::Integer(BigInt::from(0u8)),
            }
        } else {
            self.number_value(scanned.kind, suffix)
        };

        let kind = match suffix {
            NumberSuffix::None => match value {
                NumericValue::Float(_) => TokenKind::Float,
                _ => TokenKind::Integer,
            },
            NumberSuffix::Rational => TokenKind::Rational,
            NumberSuffix::Imaginary | NumberSuffix::RationalImaginary => TokenKind::Imaginary,
        };
        self.emit(kind, TokenValue::Number { value, suffix })
    }

    fn scan_number(&mut self, c: Option<u8>) -> Scanned {
        let mut c = c;
        let mut bad = false;
        if c == Some(b'0') {
            c = self.buf.nextc();
            match c {
                Some(b'x' | b'X') => return self.radix_digits(16, |b| b.is_ascii_hexdigit()),
                Some(b'b' | b'B') => return self.radix_digits(2, |b| matches!(b, b'0' | b'1')),
                Some(b'd' | b'D') => return self.radix_digits(10, |b| b.is_ascii_digit()),
                Some(b'o' | b'O') => {
                    let next = self.buf.nextc();
                    if !next.is_some_and(|b| b.is_ascii_digit()) {
                        self.buf.pushback(next);
                        return self.no_digits(8);
                    }
                    match self.octal_digits(next) {
                        Some(scanned) => return scanned,
                        None => bad = true,
                    }
                    c = self.buf.nextc();
                }
                Some(b'_' | b'0'..=b'7') => {
                    match self.octal_digits(c) {
                        Some(scanned) => return scanned,
                        None => bad = true,
                    }
                    c = self.buf.nextc();
                }
                Some(b'8' | b'9') => {
                    self.report(|range, span| {
                        LexError::numeric(LexErrorKind::InvalidOctalDigit, range, span)
                    });
                    bad = true;
                }
                Some(b'.' | b'e' | b'E') => self.tokbuf.push(b'0'),
                _ => {
                    self.buf.pushback(c);
                    self.tokbuf.push(b'0');
                    return Scanned {
                        kind: NumberShape::Integer { radix: 10 },
                        bad: false,
                    };
                }
            }
        }
        let mut scanned = self.decimal_digits(c);
        scanned.bad |= bad;
        scanned
    }

    /// Digits after `0x`, `0b`, `0d`.
    fn radix_digits(&mut self, radix: u32, is_digit: impl Fn(u8) -> bool) -> Scanned {
        let mut c = self.buf.nextc();
        let mut trailing = false;
        if c.is_some_and(&is_digit) {
            while let Some(b) = c {
                if b == b'_' {
                    if trailing {
                        break;
                    }
                    trailing = true;
                } else if is_digit(b) {
                    trailing = false;
                    self.tokbuf.push(b);
                } else {
                    break;
                }
                c = self.buf.nextc();
            }
        }
        self.buf.pushback(c);
        if self.tokbuf.is_empty() {
            return self.no_digits(radix);
        }
        if trailing {
            self.trailing_nondigit(b'_');
        }
        Scanned {
            kind: NumberShape::Integer { radix },
            bad: trailing,
        }
    }

    /// Digits after `0`, `0_` or `0o`. `None` when an `8` or `9` turned up
    /// and the rest should be read as a (bad) decimal.
    fn octal_digits(&mut self, first: Option<u8>) -> Option<Scanned> {
        let mut c = first;
        let mut trailing = false;
        while let Some(b) = c {
            if b == b'_' {
                if trailing {
                    break;
                }
                trailing = true;
            } else if matches!(b, b'0'..=b'7') {
                trailing = false;
                self.tokbuf.push(b);
            } else if matches!(b, b'8' | b'9') {
                self.report(|range, span| {
                    LexError::numeric(LexErrorKind::InvalidOctalDigit, range, span)
                });
                self.buf.pushback(c);
                return None;
            } else {
                break;
            }
            c = self.buf.nextc();
        }
        self.buf.pushback(c);
        if trailing {
            self.trailing_nondigit(b'_');
        }
        if self.tokbuf.is_empty() && !trailing {
            self.tokbuf.push(b'0');
        }
        Some(Scanned {
            kind: NumberShape::Integer { radix: 8 },
            bad: trailing,
        })
    }

    fn decimal_digits(&mut self, first: Option<u8>) -> Scanned {
        let mut c = first;
        let mut point = None;
        let mut exponent = false;
        // Byte that may not end the literal: `_`, or the `e`/sign of an
        // exponent.
        let mut nondigit: Option<u8> = None;
        let mut bad = false;
        loop {
            match c {
                Some(d @ b'0'..=b'9') => {
                    nondigit = None;
                    self.tokbuf.push(d);
                }
                Some(b'.') if nondigit.is_none() && point.is_none() && !exponent => {
                    let next = self.buf.nextc();
                    match next {
                        Some(d) if d.is_ascii_digit() => {
                            point = Some(self.tokbuf.len());
                            self.tokbuf.push(b'.');
                            self.tokbuf.push(d);
                        }
                        _ => {
                            self.buf.pushback(next);
                            break;
                        }
                    }
                }
                Some(e @ (b'e' | b'E')) if !exponent => {
                    if let Some(held) = nondigit {
                        self.buf.pushback(c);
                        c = Some(held);
                        break;
                    }
                    let next = self.buf.nextc();
                    if !matches!(next, Some(b'+' | b'-' | b'0'..=b'9')) {
                        self.buf.pushback(next);
                        break;
                    }
                    exponent = true;
                    self.tokbuf.push(e);
                    if let Some(sign @ (b'+' | b'-')) = next {
                        self.tokbuf.push(sign);
                        nondigit = Some(sign);
                    } else if let Some(d) = next {
                        self.tokbuf.push(d);
                    }
                }
                Some(b'_') if nondigit.is_none() => nondigit = Some(b'_'),
                _ => break,
            }
            c = self.buf.nextc();
        }
        self.buf.pushback(c);
        if let Some(byte) = nondigit {
            self.trailing_nondigit(byte);
            bad = true;
        }
        let kind = if point.is_some() || exponent {
            NumberShape::Float { point, exponent }
        } else {
            NumberShape::Integer { radix: 10 }
        };
        Scanned { kind, bad }
    }

    fn no_digits(&mut self, radix: u32) -> Scanned {
        if self.buf.peek_is(b'_') {
            self.buf.skip(1);
        }
        self.report(|range, span| {
            LexError::numeric(LexErrorKind::NumericWithoutDigits, range, span)
        });
        Scanned {
            kind: NumberShape::Integer { radix },
            bad: true,
        }
    }

    fn trailing_nondigit(&mut self, byte: u8) {
        let kind = LexErrorKind::TrailingNonDigit {
            byte: char::from(byte),
        };
        self.report(|range, span| LexError::numeric(kind, range, span));
    }

    /// `r`, `i` or `ri` directly after the digits. Anything else that could
    /// continue an identifier cancels the suffix and leaves the cursor where
    /// the suffix started.
    fn number_suffix(&mut self, allow_rational: bool) -> NumberSuffix {
        let mark = self.buf.cursor();
        let mut rational = false;
        let mut imaginary = false;
        loop {
            let c = self.buf.nextc();
            match c {
                Some(b'i') if !imaginary => imaginary = true,
                Some(b'r') if allow_rational && !rational && !imaginary => rational = true,
                Some(b) if b.is_ascii_alphabetic() || b == b'_' || !b.is_ascii() => {
                    self.buf.set_cursor(mark);
                    return NumberSuffix::None;
                }
                other => {
                    self.buf.pushback(other);
                    break;
                }
            }
        }
        match (rational, imaginary) {
            (false, false) => NumberSuffix::None,
            (true, false) => NumberSuffix::Rational,
            (false, true) => NumberSuffix::Imaginary,
            (true, true) => NumberSuffix::RationalImaginary,
        }
    }

    fn number_value(&mut self, shape: NumberShape, suffix: NumberSuffix) -> NumericValue {
        match shape {
            NumberShape::Integer { radix } => {
                let value = BigInt::parse_bytes(&self.tokbuf, radix).unwrap_or_else(|| BigInt::from(0u8));
                if suffix.is_rational() {
                    NumericValue::rational(value, BigInt::from(1u8))
                } else {
                    NumericValue::Integer(value)
                }
            }
            NumberShape::Float { point, .. } if suffix.is_rational() => {
                // Only reachable without an exponent: `1.25r` is 125/100.
                let mut digits = self.tokbuf.clone();
                let mut denominator = BigInt::from(1u8);
                if let Some(at) = point {
                    digits.remove(at);
                    for _ in at..digits.len() {
                        denominator *= 10u32;
                    }
                }
                let numerator = BigInt::parse_bytes(&digits, 10).unwrap_or_else(|| BigInt::from(0u8));
                NumericValue::rational(numerator, denominator)
            }
            NumberShape::Float { .. } => {
                let text = String::from_utf8_lossy(&self.tokbuf).into_owned();
                let value = text.parse::<f64>().unwrap_or(0.0);
                if value.is_infinite() {
                    self.warn(LexWarningKind::FloatOutOfRange { text });
                }
                NumericValue::float(value)
            }
        }
    }
}
