//! Property-based tests for literal decoding and parser-visible state.
//!
//! Each property pins a lexer result to an independent computation:
//! integer and float values to the standard parsers, quoted forms to each
//! other, squiggly heredocs to a direct dedent, and the bit stacks to
//! their values before a balanced group.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use garnet_ir::{NumericValue, Token, TokenKind};
use garnet_lexer::{lex, LexMode, Lexer, LexerOptions};
use garnet_lexer_core::StrSource;
use num_bigint::BigInt;
use proptest::prelude::*;

fn tokens(src: &str) -> Vec<Token> {
    lex(src, LexerOptions::default()).tokens
}

fn contents(src: &str) -> String {
    tokens(src)
        .iter()
        .filter(|t| t.kind == TokenKind::StringContent)
        .filter_map(|t| t.value.text())
        .collect()
}

/// Decimal digits grouped by threes with underscores.
fn with_underscores(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('_');
        }
        out.push(c);
    }
    out
}

/// Body text for single-quoted forms: plain runs and escaped backslashes.
fn quoted_body() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![3 => "[a-z0-9 ]{1,4}", 1 => Just("\\\\".to_owned())],
        0..6,
    )
    .prop_map(|pieces| pieces.concat())
}

/// Heredoc body lines as (indent, word) pairs.
fn heredoc_lines() -> impl Strategy<Value = Vec<(usize, String)>> {
    prop::collection::vec((0usize..8, "[a-z]{1,8}"), 1..6)
}

/// Expressions that open and close their own brackets.
fn balanced_expr() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "",
        "1",
        "a + b",
        "foo(1)",
        "[1, 2]",
        "{a: 1}",
        "\"s#{x}\"",
        "-> { x }",
        "x ? y : z",
        "foo(bar(1), [2])",
        "->(x) { x }",
        "-> (a) { a }",
        "((x))",
    ])
}

proptest! {
    #[test]
    fn decimal_integer_matches_value(n in any::<u64>()) {
        let toks = tokens(&n.to_string());
        prop_assert_eq!(toks[0].kind, TokenKind::Integer);
        let (value, _) = toks[0].value.number().unwrap();
        prop_assert_eq!(value, &NumericValue::Integer(BigInt::from(n)));
    }

    #[test]
    fn underscores_do_not_change_value(n in any::<u64>()) {
        let src = with_underscores(n);
        let out = lex(&src, LexerOptions::default());
        prop_assert!(out.errors.is_empty(), "{src}: {:?}", out.errors);
        let (value, _) = out.tokens[0].value.number().unwrap();
        prop_assert_eq!(value, &NumericValue::Integer(BigInt::from(n)));
    }

    #[test]
    fn hex_integer_matches_value(n in any::<u64>()) {
        let toks = tokens(&format!("0x{n:x}"));
        let (value, _) = toks[0].value.number().unwrap();
        prop_assert_eq!(value, &NumericValue::Integer(BigInt::from(n)));
    }

    #[test]
    fn suffix_selects_kind(n in 0u32..1_000_000, suffix in prop::sample::select(vec!["r", "i", "ri"])) {
        let toks = tokens(&format!("{n}{suffix}"));
        let expected = if suffix == "r" { TokenKind::Rational } else { TokenKind::Imaginary };
        prop_assert_eq!(toks[0].kind, expected);
        prop_assert_eq!(toks[1].kind, TokenKind::EndOfInput);
    }

    #[test]
    fn float_matches_std_parse(
        int in 0u32..1_000_000,
        frac in "[0-9]{1,6}",
        exp in prop::option::of(-30i32..30),
    ) {
        let src = match exp {
            Some(e) => format!("{int}.{frac}e{e}"),
            None => format!("{int}.{frac}"),
        };
        let toks = tokens(&src);
        prop_assert_eq!(toks[0].kind, TokenKind::Float);
        let (value, _) = toks[0].value.number().unwrap();
        let expected: f64 = src.parse().unwrap();
        prop_assert_eq!(value.as_f64(), Some(expected));
    }

    #[test]
    fn percent_q_reads_like_single_quotes(body in quoted_body()) {
        prop_assert_eq!(contents(&format!("%q({body})")), contents(&format!("'{body}'")));
    }

    #[test]
    fn plain_double_quoted_text_is_unchanged(body in "[a-z0-9 ]{0,20}") {
        prop_assert_eq!(contents(&format!("\"{body}\"")), body);
    }

    #[test]
    fn squiggly_heredoc_strips_least_indent(lines in heredoc_lines()) {
        let least = lines.iter().map(|(indent, _)| *indent).min().unwrap();
        let mut src = String::from("<<~EOS\n");
        let mut expected = String::new();
        for (indent, word) in &lines {
            src.push_str(&" ".repeat(*indent));
            src.push_str(word);
            src.push('\n');
            expected.push_str(&" ".repeat(indent - least));
            expected.push_str(word);
            expected.push('\n');
        }
        src.push_str("EOS\n");
        prop_assert_eq!(contents(&src), expected);
    }

    #[test]
    fn parenthesized_group_restores_state(expr in balanced_expr()) {
        let src = format!("({expr})");
        let mut lexer = Lexer::new(StrSource::new(&src), LexerOptions::default());
        lexer.push_cond(true);
        lexer.push_cmdarg(true);
        let cond = lexer.cond_stack();
        let cmdarg = lexer.cmdarg_stack();
        let paren = lexer.paren_stack();
        let brace_nest = lexer.brace_nest();

        let mut after_close = None;
        loop {
            let token = lexer.next_token().unwrap();
            match token.kind {
                TokenKind::EndOfInput => break,
                TokenKind::Rparen => {
                    after_close = Some((
                        lexer.cond_stack(),
                        lexer.cmdarg_stack(),
                        lexer.paren_stack(),
                        lexer.brace_nest(),
                        lexer.mode(),
                    ));
                }
                _ => {}
            }
        }

        let (cond_after, cmdarg_after, paren_after, brace_after, mode) = after_close.unwrap();
        prop_assert_eq!(cond_after, cond);
        prop_assert_eq!(cmdarg_after, cmdarg);
        prop_assert_eq!(paren_after, paren);
        prop_assert_eq!(brace_after, brace_nest);
        prop_assert_eq!(mode, LexMode::END_FN);
    }
}
