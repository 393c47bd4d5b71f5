//! Semantic values attached to tokens.

use num_bigint::BigInt;

use crate::Name;

/// Which literal suffixes followed a number.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberSuffix {
    #[default]
    None,
    /// `3r`
    Rational,
    /// `3i`
    Imaginary,
    /// `3ri`
    RationalImaginary,
}

impl NumberSuffix {
    pub fn is_rational(self) -> bool {
        matches!(self, NumberSuffix::Rational | NumberSuffix::RationalImaginary)
    }

    pub fn is_imaginary(self) -> bool {
        matches!(self, NumberSuffix::Imaginary | NumberSuffix::RationalImaginary)
    }
}

/// Decoded numeric literal.
///
/// Floats are stored as bits so the value keeps `Eq` and `Hash`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NumericValue {
    Integer(BigInt),
    Float(u64),
    /// Always in lowest terms with a positive denominator.
    Rational {
        numerator: BigInt,
        denominator: BigInt,
    },
}

impl NumericValue {
    pub fn float(value: f64) -> Self {
        NumericValue::Float(value.to_bits())
    }

    /// The float value, if this is a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumericValue::Float(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            NumericValue::Integer(value) => Some(value),
            _ => None,
        }
    }

    /// Build a rational, reducing to lowest terms.
    ///
    /// A zero denominator is kept as `n/0` so the caller can report it.
    pub fn rational(numerator: BigInt, denominator: BigInt) -> Self {
        let divisor = gcd(numerator.clone(), denominator.clone());
        let (mut numerator, mut denominator) = if divisor == BigInt::from(0u8) {
            (numerator, denominator)
        } else {
            (numerator / &divisor, denominator / &divisor)
        };
        if denominator < BigInt::from(0u8) {
            numerator = -numerator;
            denominator = -denominator;
        }
        NumericValue::Rational {
            numerator,
            denominator,
        }
    }
}

fn gcd(mut a: BigInt, mut b: BigInt) -> BigInt {
    let zero = BigInt::from(0u8);
    while b != zero {
        let r = &a % &b;
        a = b;
        b = r;
    }
    if a < zero {
        -a
    } else {
        a
    }
}

/// The semantic value carried by a token.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenValue {
    #[default]
    None,
    /// Identifiers, constants, variables, labels, keywords, and the operator
    /// of an `OpAsgn`.
    Name(Name),
    /// Literal content, character literals and regexp options. Raw bytes in
    /// the source encoding.
    Str(Vec<u8>),
    Number {
        value: NumericValue,
        suffix: NumberSuffix,
    },
    /// `$1` → 1. Zero when the reference is too large to be useful.
    NthRef(u32),
    /// The punctuation byte of `$&`, `` $` ``, `$'`, `$+`.
    BackRef(u8),
}

impl TokenValue {
    pub fn name(&self) -> Option<Name> {
        match self {
            TokenValue::Name(name) => Some(*name),
            _ => None,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            TokenValue::Str(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Content as UTF-8 text, lossily. Convenience for tests and tooling.
    pub fn text(&self) -> Option<String> {
        self.bytes()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn number(&self) -> Option<(&NumericValue, NumberSuffix)> {
        match self {
            TokenValue::Number { value, suffix } => Some((value, *suffix)),
            _ => None,
        }
    }
}
