use garnet_ir::{TokenFlags, TokenKind};
use pretty_assertions::assert_eq;

use crate::lex_error::{LexErrorKind, LexWarningKind};
use crate::lexer::tests::{error_kinds, kinds, lex_all, name_of, warning_kinds};

use TokenKind::*;

// === Spacing-Sensitive Operators ===

#[test]
fn minus_before_digit_in_argument_position_is_unary() {
    assert_eq!(kinds("foo -1"), vec![Ident, UminusNum, Integer, EndOfInput]);
    assert_eq!(
        warning_kinds("foo -1"),
        vec![LexWarningKind::AmbiguousFirstArgument { op: '-' }]
    );
}

#[test]
fn spaced_minus_is_binary() {
    assert_eq!(kinds("foo - 1"), vec![Ident, Minus, Integer, EndOfInput]);
    assert!(warning_kinds("foo - 1").is_empty());
}

#[test]
fn minus_after_value_is_binary() {
    assert_eq!(kinds("1 -2"), vec![Integer, Minus, Integer, EndOfInput]);
    assert_eq!(kinds("x = -a"), vec![Ident, Assign, Uminus, Ident, EndOfInput]);
}

#[test]
fn plus_before_digit_at_start_is_part_of_number() {
    assert_eq!(kinds("+5"), vec![Integer, EndOfInput]);
    assert_eq!(kinds("a +b"), vec![Ident, Uplus, Ident, EndOfInput]);
}

#[test]
fn star_reads_as_splat_or_multiply() {
    assert_eq!(kinds("foo *args"), vec![Ident, Star, Ident, EndOfInput]);
    assert_eq!(
        warning_kinds("foo *args"),
        vec![LexWarningKind::ArgumentPrefix { op: "*" }]
    );
    assert_eq!(kinds("a * b"), vec![Ident, Mul, Ident, EndOfInput]);
    assert_eq!(kinds("a*b"), vec![Ident, Mul, Ident, EndOfInput]);
    assert_eq!(kinds("foo **opts"), vec![Ident, Dstar, Ident, EndOfInput]);
    assert_eq!(kinds("2 ** 3"), vec![Integer, Pow, Integer, EndOfInput]);
}

#[test]
fn ampersand_reads_as_block_pass_or_bit_and() {
    assert_eq!(kinds("foo &blk"), vec![Ident, Amper, Ident, EndOfInput]);
    assert_eq!(
        warning_kinds("foo &blk"),
        vec![LexWarningKind::ArgumentPrefix { op: "&" }]
    );
    assert_eq!(kinds("foo &:sym"), vec![Ident, Amper, Symbeg, Ident, EndOfInput]);
    assert!(warning_kinds("foo &:sym").is_empty());
    assert_eq!(kinds("1 & 2"), vec![Integer, BitAnd, Integer, EndOfInput]);
    assert_eq!(kinds("a&.b"), vec![Ident, AndDot, Ident, EndOfInput]);
    assert_eq!(kinds("a && b"), vec![Ident, AndOp, Ident, EndOfInput]);
}

#[test]
fn slash_reads_as_regexp_or_divide() {
    assert_eq!(
        kinds("foo /re/"),
        vec![Ident, RegexpBeg, StringContent, RegexpEnd, EndOfInput]
    );
    assert_eq!(
        warning_kinds("foo /re/"),
        vec![LexWarningKind::AmbiguousFirstArgument { op: '/' }]
    );
    assert_eq!(kinds("a / b"), vec![Ident, Div, Ident, EndOfInput]);
    assert_eq!(
        kinds("/x/"),
        vec![RegexpBeg, StringContent, RegexpEnd, EndOfInput]
    );
}

#[test]
fn percent_after_value_is_modulo() {
    assert_eq!(kinds("10 % 3"), vec![Integer, Percent, Integer, EndOfInput]);
}

// === Comparison And Assignment ===

#[test]
fn equals_family() {
    assert_eq!(kinds("a == b"), vec![Ident, EqEq, Ident, EndOfInput]);
    assert_eq!(kinds("a === b"), vec![Ident, Eqq, Ident, EndOfInput]);
    assert_eq!(kinds("a =~ b"), vec![Ident, Match, Ident, EndOfInput]);
    assert_eq!(kinds("a != b"), vec![Ident, Neq, Ident, EndOfInput]);
    assert_eq!(kinds("a !~ b"), vec![Ident, Nmatch, Ident, EndOfInput]);
    assert_eq!(kinds("a <=> b"), vec![Ident, Cmp, Ident, EndOfInput]);
    assert_eq!(kinds("{a => b}"), vec![Lbrace, Ident, Assoc, Ident, Rbrace, EndOfInput]);
}

#[test]
fn op_assign_carries_operator_name() {
    for op in ["+", "-", "*", "/", "%", "**", "&", "|", "^", "<<", ">>", "&&", "||"] {
        let src = format!("a {op}= 1");
        assert_eq!(kinds(&src), vec![Ident, OpAsgn, Integer, EndOfInput], "{src}");
        assert_eq!(name_of(&src, OpAsgn), op, "{src}");
    }
}

#[test]
fn shift_is_not_heredoc_when_spaced() {
    assert_eq!(kinds("a << b"), vec![Ident, Lshift, Ident, EndOfInput]);
    assert_eq!(kinds("1 << 2"), vec![Integer, Lshift, Integer, EndOfInput]);
    assert_eq!(kinds("1 >> 2"), vec![Integer, Rshift, Integer, EndOfInput]);
}

// === Method Names ===

#[test]
fn operator_method_names_after_def() {
    assert_eq!(kinds("def []="), vec![Def, Aset, EndOfInput]);
    assert_eq!(kinds("def []"), vec![Def, Aref, EndOfInput]);
    assert_eq!(kinds("def -@"), vec![Def, Uminus, EndOfInput]);
    assert_eq!(kinds("def +@"), vec![Def, Uplus, EndOfInput]);
    assert_eq!(kinds("def !@"), vec![Def, Bang, EndOfInput]);
    assert_eq!(kinds("def ~@"), vec![Def, Tilde, EndOfInput]);
}

#[test]
fn backtick_as_method_name() {
    assert_eq!(kinds("def `"), vec![Def, Backtick, EndOfInput]);
    assert_eq!(name_of("def `", Backtick), "`");
}

// === Brackets ===

#[test]
fn paren_kinds_follow_spacing() {
    assert_eq!(kinds("foo(1)"), vec![Ident, LparenCall, Integer, Rparen, EndOfInput]);
    assert_eq!(kinds("foo (1)"), vec![Ident, LparenArg, Integer, Rparen, EndOfInput]);
    assert_eq!(kinds("(1)"), vec![Lparen, Integer, Rparen, EndOfInput]);
}

#[test]
fn bracket_kinds_follow_spacing() {
    assert_eq!(
        kinds("[1, 2]"),
        vec![Lbrack, Integer, Comma, Integer, Rbracket, EndOfInput]
    );
    assert_eq!(kinds("a[1]"), vec![Ident, LbrackIndex, Integer, Rbracket, EndOfInput]);
    assert_eq!(kinds("a [1]"), vec![Ident, Lbrack, Integer, Rbracket, EndOfInput]);
}

#[test]
fn brace_kinds_follow_context() {
    assert_eq!(kinds("foo { }"), vec![Ident, Lcurly, Rbrace, EndOfInput]);
    assert_eq!(kinds("x = { }"), vec![Ident, Assign, Lbrace, Rbrace, EndOfInput]);
    assert_eq!(kinds("-> { }"), vec![Lambda, Lambeg, Rbrace, EndOfInput]);
}

#[test]
fn lambda_body_brace_survives_parameter_parens() {
    assert_eq!(
        kinds("->(x) { x }"),
        vec![Lambda, LparenCall, Ident, Rparen, Lambeg, Ident, Rbrace, EndOfInput]
    );
}

#[test]
fn nested_hash_in_lambda_body_is_a_hash() {
    assert_eq!(
        kinds("-> { {} }"),
        vec![Lambda, Lambeg, Lbrace, Rbrace, Rbrace, EndOfInput]
    );
}

#[test]
fn labels_inside_call_parens() {
    assert_eq!(
        kinds("foo(a: 1)"),
        vec![Ident, LparenCall, Label, Integer, Rparen, EndOfInput]
    );
    assert_eq!(
        kinds("{\"a\": 1}"),
        vec![Lbrace, StringBeg, StringContent, LabelEnd, Integer, Rbrace, EndOfInput]
    );
}

// === Colons And Dots ===

#[test]
fn scope_resolution() {
    assert_eq!(kinds("Foo::Bar"), vec![Constant, Colon2, Constant, EndOfInput]);
    assert_eq!(kinds("::Foo"), vec![Colon3, Constant, EndOfInput]);
}

#[test]
fn ternary_question_and_colon() {
    assert_eq!(
        kinds("a ? b : c"),
        vec![Ident, Question, Ident, Colon, Ident, EndOfInput]
    );
}

#[test]
fn ranges_and_beginless_ranges() {
    assert_eq!(kinds("1..2"), vec![Integer, Dot2, Integer, EndOfInput]);
    assert_eq!(kinds("1...2"), vec![Integer, Dot3, Integer, EndOfInput]);
    assert_eq!(kinds("..5"), vec![Bdot2, Integer, EndOfInput]);
    assert_eq!(kinds("...5"), vec![Bdot3, Integer, EndOfInput]);
}

#[test]
fn leading_dot_float_is_an_error() {
    assert_eq!(kinds(".5"), vec![EndOfInput]);
    assert_eq!(error_kinds(".5"), vec![LexErrorKind::NoDotDigitFloat]);
}

#[test]
fn method_call_dot() {
    assert_eq!(kinds("a.b"), vec![Ident, Dot, Ident, EndOfInput]);
    assert_eq!(kinds("a.class"), vec![Ident, Dot, Ident, EndOfInput]);
}

// === Newlines And Comments ===

#[test]
fn newline_after_operator_is_ignored() {
    assert_eq!(kinds("a +\nb"), vec![Ident, Plus, Ident, EndOfInput]);
}

#[test]
fn leading_dot_continues_previous_line() {
    let out = lex_all("foo\n  .bar\n");
    let got: Vec<TokenKind> = out.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(got, vec![Ident, Dot, Ident, Newline, EndOfInput]);
    assert!(out.tokens[1].flags.contains(TokenFlags::NEWLINE_BEFORE));
}

#[test]
fn safe_navigation_continues_previous_line() {
    assert_eq!(kinds("foo\n&.bar"), vec![Ident, AndDot, Ident, EndOfInput]);
}

#[test]
fn range_on_next_line_does_not_continue() {
    assert_eq!(kinds("foo\n..bar"), vec![Ident, Newline, Bdot2, Ident, EndOfInput]);
}

#[test]
fn comment_lines_between_do_not_break_continuation() {
    assert_eq!(
        kinds("foo\n# note\n.bar\n"),
        vec![Ident, Dot, Ident, Newline, EndOfInput]
    );
}

#[test]
fn comment_is_skipped_and_newline_kept() {
    assert_eq!(
        kinds("a # note\nb"),
        vec![Ident, Newline, Ident, EndOfInput]
    );
}

#[test]
fn semicolon_ends_statement() {
    assert_eq!(kinds("a; b"), vec![Ident, Semicolon, Ident, EndOfInput]);
}

#[test]
fn backslash_newline_joins_lines() {
    assert_eq!(kinds("a \\\n  b"), vec![Ident, Ident, EndOfInput]);
}

#[test]
fn stray_backslash_is_reported_and_skipped() {
    assert_eq!(kinds("a \\ b"), vec![Ident, Ident, EndOfInput]);
    assert_eq!(error_kinds("a \\ b"), vec![LexErrorKind::StrayBackslash]);
}

#[test]
fn lone_carriage_return_warns_once() {
    assert_eq!(kinds("a\rb\rc"), vec![Ident, Ident, Ident, EndOfInput]);
    assert_eq!(
        warning_kinds("a\rb\rc"),
        vec![LexWarningKind::CarriageReturn]
    );
    assert!(warning_kinds("a\r\nb").is_empty());
}

// === Embedded Documents And Data ===

#[test]
fn embedded_document_is_skipped() {
    assert_eq!(kinds("=begin\nfoo\n=end\nx"), vec![Ident, EndOfInput]);
}

#[test]
fn unterminated_embedded_document() {
    assert_eq!(kinds("=begin\nfoo"), vec![EndOfInput]);
    assert_eq!(
        error_kinds("=begin\nfoo"),
        vec![LexErrorKind::UnterminatedEmbeddedDoc]
    );
}

#[test]
fn end_marker_stops_lexing_and_records_data_offset() {
    let out = lex_all("a\n__END__\nxyz\n");
    let got: Vec<TokenKind> = out.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(got, vec![Ident, Newline, EndOfInput]);
    assert_eq!(out.data_offset, Some(10));
}

#[test]
fn end_marker_must_be_alone_on_its_line() {
    assert_eq!(kinds("__END__ x"), vec![Ident, Ident, EndOfInput]);
}

// === Percent Literals ===

#[test]
fn percent_literal_types() {
    assert_eq!(
        kinds("%w[a b]"),
        vec![QwordsBeg, StringContent, StringContent, StringEnd, EndOfInput]
    );
    assert_eq!(
        kinds("%i(a)"),
        vec![QsymbolsBeg, StringContent, StringEnd, EndOfInput]
    );
    assert_eq!(kinds("%q(a)"), vec![StringBeg, StringContent, StringEnd, EndOfInput]);
    assert_eq!(kinds("%(a)"), vec![StringBeg, StringContent, StringEnd, EndOfInput]);
    assert_eq!(kinds("%x(ls)"), vec![XstringBeg, StringContent, StringEnd, EndOfInput]);
    assert_eq!(kinds("%r{a}"), vec![RegexpBeg, StringContent, RegexpEnd, EndOfInput]);
    assert_eq!(kinds("%s(a)"), vec![Symbeg, StringContent, StringEnd, EndOfInput]);
}

#[test]
fn unknown_percent_type_is_reported() {
    assert_eq!(
        kinds("%z(a)"),
        vec![StringBeg, StringContent, StringEnd, EndOfInput]
    );
    assert_eq!(error_kinds("%z(a)"), vec![LexErrorKind::UnknownPercentType]);
}

#[test]
fn percent_at_end_of_input_is_unterminated() {
    assert!(matches!(
        error_kinds("%")[..],
        [LexErrorKind::Unterminated { .. }]
    ));
}

// === Invalid Input ===

#[test]
fn invalid_byte_is_reported_and_skipped() {
    assert_eq!(kinds("a\u{1}b"), vec![Ident, Ident, EndOfInput]);
    assert_eq!(
        error_kinds("a\u{1}b"),
        vec![LexErrorKind::InvalidChar { byte: 1 }]
    );
}

#[test]
fn nul_byte_ends_input() {
    assert_eq!(kinds("a\0b"), vec![Ident, EndOfInput]);
}
