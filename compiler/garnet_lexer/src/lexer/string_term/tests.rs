use garnet_ir::{TokenFlags, TokenKind};
use pretty_assertions::assert_eq;

use super::{is_global_punct, StrFunc};
use crate::lex_error::{LexErrorKind, LexFatal, LiteralKind};
use crate::lexer::tests::{contents, error_kinds, kinds, lex_all};
use crate::LexerOptions;

use TokenKind::*;

// === Quoted Strings ===

#[test]
fn double_quoted_with_interpolation() {
    assert_eq!(
        kinds("\"a#{b}c\""),
        vec![
            StringBeg,
            StringContent,
            StringDbeg,
            Ident,
            StringDend,
            StringContent,
            StringEnd,
            EndOfInput,
        ]
    );
    assert_eq!(contents("\"a#{b}c\""), vec!["a", "c"]);
}

#[test]
fn single_quoted_does_not_interpolate() {
    assert_eq!(
        kinds("'a#{b}'"),
        vec![StringBeg, StringContent, StringEnd, EndOfInput]
    );
    assert_eq!(contents("'a#{b}'"), vec!["a#{b}"]);
}

#[test]
fn single_quoted_keeps_unknown_escapes() {
    assert_eq!(contents(r"'a\nb'"), vec![r"a\nb"]);
    assert_eq!(contents(r"'it\'s'"), vec!["it's"]);
    assert_eq!(contents(r"'a\\b'"), vec![r"a\b"]);
}

#[test]
fn double_quoted_processes_escapes() {
    assert_eq!(contents(r#""a\nb""#), vec!["a\nb"]);
    assert_eq!(contents(r#""\t\"""#), vec!["\t\""]);
}

#[test]
fn hash_without_hole_is_content() {
    assert_eq!(contents("\"a#b\""), vec!["a#b"]);
    assert_eq!(contents("\"#\""), vec!["#"]);
}

#[test]
fn variable_holes() {
    assert_eq!(
        kinds("\"#@foo\""),
        vec![StringBeg, StringDvar, Ivar, StringEnd, EndOfInput]
    );
    assert_eq!(
        kinds("\"#$1\""),
        vec![StringBeg, StringDvar, NthRef, StringEnd, EndOfInput]
    );
    assert_eq!(
        kinds("\"#@@x y\""),
        vec![StringBeg, StringDvar, Cvar, StringContent, StringEnd, EndOfInput]
    );
}

#[test]
fn variable_hole_needs_a_name_start() {
    assert_eq!(
        kinds("\"#$-w\""),
        vec![StringBeg, StringDvar, Gvar, StringEnd, EndOfInput]
    );
    assert_eq!(
        kinds("\"#$foo\""),
        vec![StringBeg, StringDvar, Gvar, StringEnd, EndOfInput]
    );
    assert_eq!(contents("\"#@1\""), vec!["#@1"]);
    assert_eq!(contents("\"#@\""), vec!["#@"]);
    assert_eq!(contents("\"#$ \""), vec!["#$ "]);
}

#[test]
fn nested_interpolation() {
    assert_eq!(
        kinds("\"#{\"#{1}\"}\""),
        vec![
            StringBeg,
            StringDbeg,
            StringBeg,
            StringDbeg,
            Integer,
            StringDend,
            StringEnd,
            StringDend,
            StringEnd,
            EndOfInput,
        ]
    );
}

#[test]
fn braces_inside_interpolation_do_not_close_it() {
    assert_eq!(
        kinds("\"#{ {a: 1} }\""),
        vec![
            StringBeg,
            StringDbeg,
            Lbrace,
            Label,
            Integer,
            Rbrace,
            StringDend,
            StringEnd,
            EndOfInput,
        ]
    );
}

#[test]
fn interpolation_depth_is_bounded() {
    let out = crate::lex("\"#{\"#{\"#{1}\"}\"}\"", LexerOptions::default().max_nesting(2));
    assert!(matches!(out.fatal, Some(LexFatal::NestingExceeded(_))));
}

#[test]
fn only_interpolation_counts_toward_the_limit() {
    let options = || LexerOptions::default().max_nesting(1);
    let out = crate::lex("%(a(b(c(d))))", options());
    assert!(out.fatal.is_none());
    assert_eq!(out.tokens.last().map(|t| t.kind), Some(EndOfInput));

    let out = crate::lex("<<A\n#{<<B}\nx\nB\nA\n", options());
    assert!(out.fatal.is_none());

    let out = crate::lex("\"#{1}\"", options());
    assert!(out.fatal.is_none());
    let out = crate::lex("\"#{\"#{1}\"}\"", options());
    assert!(matches!(out.fatal, Some(LexFatal::NestingExceeded(_))));
}

#[test]
fn string_label_in_hash() {
    assert_eq!(
        kinds("{'a': 1}"),
        vec![Lbrace, StringBeg, StringContent, LabelEnd, Integer, Rbrace, EndOfInput]
    );
}

#[test]
fn string_followed_by_colon_outside_label_position() {
    assert_eq!(
        kinds("x ? \"a\" : b"),
        vec![
            Ident,
            Question,
            StringBeg,
            StringContent,
            StringEnd,
            Colon,
            Ident,
            EndOfInput,
        ]
    );
}

// === Percent And Symbol Literals ===

#[test]
fn bracketed_delimiters_nest() {
    assert_eq!(contents("%q(a(b)c)"), vec!["a(b)c"]);
    assert_eq!(contents("%Q{x{y}}"), vec!["x{y}"]);
}

#[test]
fn same_byte_delimiters() {
    assert_eq!(contents("%q|a b|"), vec!["a b"]);
    assert_eq!(contents("%!x!"), vec!["x"]);
}

#[test]
fn quoted_symbols() {
    assert_eq!(kinds(":\"foo\""), vec![Symbeg, StringContent, StringEnd, EndOfInput]);
    assert_eq!(kinds(":'foo'"), vec![Symbeg, StringContent, StringEnd, EndOfInput]);
    assert_eq!(
        kinds(":\"a#{b}\""),
        vec![Symbeg, StringContent, StringDbeg, Ident, StringDend, StringEnd, EndOfInput]
    );
}

#[test]
fn backtick_command() {
    assert_eq!(
        kinds("`ls`"),
        vec![XstringBeg, StringContent, StringEnd, EndOfInput]
    );
    assert_eq!(contents("`ls`"), vec!["ls"]);
}

// === Word Lists ===

#[test]
fn word_list_elements_are_flagged() {
    let out = lex_all("%w[a b]");
    let kinds: Vec<TokenKind> = out.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![QwordsBeg, StringContent, StringContent, StringEnd, EndOfInput]
    );
    assert!(out.tokens[1].flags.contains(TokenFlags::WORD_START));
    assert!(out.tokens[2].flags.contains(TokenFlags::WORD_START));
    assert_eq!(contents("%w[a b]"), vec!["a", "b"]);
}

#[test]
fn word_list_surrounding_whitespace_is_ignored() {
    assert_eq!(contents("%w[  a\n  b  ]"), vec!["a", "b"]);
    assert_eq!(kinds("%w[]"), vec![QwordsBeg, StringEnd, EndOfInput]);
}

#[test]
fn escaped_space_joins_words() {
    assert_eq!(contents(r"%w[a\ b c]"), vec!["a b", "c"]);
}

#[test]
fn interpolating_word_list() {
    let out = lex_all("%W[a#{b}c d]");
    let kinds: Vec<TokenKind> = out.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            WordsBeg,
            StringContent,
            StringDbeg,
            Ident,
            StringDend,
            StringContent,
            StringContent,
            StringEnd,
            EndOfInput,
        ]
    );
    assert!(out.tokens[1].flags.contains(TokenFlags::WORD_START));
    assert!(!out.tokens[5].flags.contains(TokenFlags::WORD_START));
    assert!(out.tokens[6].flags.contains(TokenFlags::WORD_START));
}

#[test]
fn symbol_lists() {
    assert_eq!(
        kinds("%i[a b]"),
        vec![QsymbolsBeg, StringContent, StringContent, StringEnd, EndOfInput]
    );
    assert_eq!(
        kinds("%I[a]"),
        vec![SymbolsBeg, StringContent, StringEnd, EndOfInput]
    );
}

// === Regexps ===

#[test]
fn regexp_options_are_the_closer_value() {
    let out = lex_all("/a/im");
    let end = out.tokens.iter().find(|t| t.kind == RegexpEnd).unwrap();
    assert_eq!(end.value.bytes(), Some(&b"im"[..]));
}

#[test]
fn unknown_regexp_option_is_reported() {
    assert_eq!(
        error_kinds("/a/iz"),
        vec![LexErrorKind::UnknownRegexpOption {
            options: "z".to_owned()
        }]
    );
}

#[test]
fn regexp_keeps_escapes() {
    assert_eq!(contents(r"/a\d+/"), vec![r"a\d+"]);
    assert_eq!(contents(r"%r{a\}}"), vec![r"a\}"]);
    assert_eq!(contents(r"/a\/b/"), vec!["a/b"]);
}

// === Unterminated ===

#[test]
fn unterminated_string_closes_at_end_of_input() {
    assert_eq!(
        kinds("\"abc"),
        vec![StringBeg, StringContent, StringEnd, EndOfInput]
    );
    assert_eq!(
        error_kinds("\"abc"),
        vec![LexErrorKind::Unterminated {
            literal: LiteralKind::String
        }]
    );
}

#[test]
fn unterminated_regexp() {
    assert_eq!(
        kinds("/abc"),
        vec![RegexpBeg, StringContent, RegexpEnd, EndOfInput]
    );
    assert_eq!(
        error_kinds("/abc"),
        vec![LexErrorKind::Unterminated {
            literal: LiteralKind::Regexp
        }]
    );
}

#[test]
fn unterminated_word_list() {
    assert_eq!(
        error_kinds("%w[a"),
        vec![LexErrorKind::Unterminated {
            literal: LiteralKind::List
        }]
    );
}

#[test]
fn frozen_pragma_marks_string_openers() {
    let out = lex_all("# frozen_string_literal: true\n\"a\"");
    let beg = out.tokens.iter().find(|t| t.kind == StringBeg).unwrap();
    assert!(beg.flags.contains(TokenFlags::FROZEN));

    let out = lex_all("\"a\"");
    assert!(!out.tokens[0].flags.contains(TokenFlags::FROZEN));
}

// === Helpers ===

#[test]
fn str_func_presets() {
    assert!(StrFunc::DQUOTE.contains(StrFunc::EXPAND));
    assert!(!StrFunc::SQUOTE.contains(StrFunc::EXPAND));
    assert!(StrFunc::REGEXP_LIT.contains(StrFunc::ESCAPE));
    assert!(StrFunc::DWORD.contains(StrFunc::LIST));
}

#[test]
fn global_punctuation_names() {
    for b in b"~*$?!@/\\;,.=:<>\"&`'+0_" {
        assert!(is_global_punct(*b), "{}", char::from(*b));
    }
    assert!(!is_global_punct(b'a'));
    assert!(!is_global_punct(b'('));
}
