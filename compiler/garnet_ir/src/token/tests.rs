use num_bigint::BigInt;
use pretty_assertions::assert_eq;

use super::*;
use crate::SourcePos;

// === TokenKind ===

#[test]
fn keyword_classification() {
    assert!(TokenKind::End.is_keyword());
    assert!(TokenKind::IfMod.is_keyword());
    assert!(TokenKind::DoLambda.is_keyword());
    assert!(!TokenKind::Ident.is_keyword());
    assert!(!TokenKind::Lambda.is_keyword());
}

#[test]
fn literal_open_and_close() {
    assert!(TokenKind::QwordsBeg.opens_literal());
    assert!(TokenKind::Symbeg.opens_literal());
    assert!(!TokenKind::StringContent.opens_literal());
    assert!(TokenKind::LabelEnd.closes_literal());
    assert!(TokenKind::RegexpEnd.closes_literal());
}

#[test]
fn display_names_share_spelling_across_contexts() {
    assert_eq!(TokenKind::IfMod.to_string(), "`if'");
    assert_eq!(TokenKind::If.to_string(), "`if'");
    assert_eq!(TokenKind::Colon3.display_name(), "::");
    assert_eq!(TokenKind::Bdot3.display_name(), "...");
}

// === NumericValue ===

#[test]
fn rational_reduces_to_lowest_terms() {
    let value = NumericValue::rational(BigInt::from(15), BigInt::from(10));
    assert_eq!(
        value,
        NumericValue::Rational {
            numerator: BigInt::from(3),
            denominator: BigInt::from(2),
        }
    );
}

#[test]
fn rational_normalizes_negative_denominator() {
    let value = NumericValue::rational(BigInt::from(1), BigInt::from(-4));
    assert_eq!(
        value,
        NumericValue::Rational {
            numerator: BigInt::from(-1),
            denominator: BigInt::from(4),
        }
    );
}

#[test]
fn float_round_trips_through_bits() {
    let value = NumericValue::float(2.5);
    assert_eq!(value.as_f64(), Some(2.5));
    assert_eq!(value.as_integer(), None);
}

#[test]
fn suffix_predicates() {
    assert!(NumberSuffix::RationalImaginary.is_rational());
    assert!(NumberSuffix::RationalImaginary.is_imaginary());
    assert!(!NumberSuffix::Imaginary.is_rational());
    assert!(!NumberSuffix::None.is_imaginary());
}

// === Token / TokenFlags ===

#[test]
fn synthetic_tokens_are_flagged_and_zero_width() {
    let pos = SourcePos::new(3, 0);
    let token = Token::synthetic(TokenKind::DummyEnd, crate::SourceRange::point(pos), crate::Span::point(9));
    assert!(token.flags.contains(TokenFlags::SYNTHETIC));
    assert!(token.range.is_empty());
    assert_eq!(token.value, TokenValue::None);
}

#[test]
fn flag_composition() {
    let flags = TokenFlags::EMPTY
        .with(TokenFlags::SPACE_BEFORE)
        .with(TokenFlags::WORD_START);
    assert!(flags.has_space_before());
    assert!(flags.is_word_start());
    assert!(!flags.has_error());
}

#[test]
fn value_accessors() {
    let value = TokenValue::Str(b"b c".to_vec());
    assert_eq!(value.text().as_deref(), Some("b c"));
    assert_eq!(value.name(), None);
    assert_eq!(TokenValue::NthRef(2).bytes(), None);
}
