//! End-to-end lexing of small Ruby programs.
//!
//! Each test feeds a complete source through [`garnet_lexer::lex`] or a
//! parser-driven [`Lexer`] and checks the token stream the parser would see.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::io::Cursor;

use garnet_diagnostic::{ColorMode, DiagnosticQueue, TerminalEmitter};
use garnet_ir::{TokenFlags, TokenKind};
use garnet_lexer::{lex, LexErrorKind, LexWarningKind, Lexer, LexerOptions};
use garnet_lexer_core::{ReaderSource, StrSource};
use pretty_assertions::assert_eq;

use TokenKind::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src, LexerOptions::default())
        .tokens
        .iter()
        .map(|t| t.kind)
        .collect()
}

fn contents(src: &str) -> Vec<String> {
    lex(src, LexerOptions::default())
        .tokens
        .iter()
        .filter(|t| t.kind == StringContent)
        .filter_map(|t| t.value.text())
        .collect()
}

// === Ambiguity Resolution ===

#[test]
fn minus_before_number_after_command_word() {
    let out = lex("a = 1; a -1", LexerOptions::default());
    let got: Vec<TokenKind> = out.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        got,
        vec![Ident, Assign, Integer, Semicolon, Ident, UminusNum, Integer, EndOfInput]
    );
    assert_eq!(
        out.warnings.iter().map(|w| w.kind.clone()).collect::<Vec<_>>(),
        vec![LexWarningKind::AmbiguousFirstArgument { op: '-' }]
    );
}

#[test]
fn block_pass_inside_call_arguments() {
    assert_eq!(
        kinds("a(1, &b)"),
        vec![Ident, LparenCall, Integer, Comma, Amper, Ident, Rparen, EndOfInput]
    );
}

#[test]
fn regexp_argument_to_command() {
    assert_eq!(
        kinds("foo /bar/"),
        vec![Ident, RegexpBeg, StringContent, RegexpEnd, EndOfInput]
    );
}

#[test]
fn squiggly_heredoc_with_unindented_terminator() {
    assert_eq!(contents("<<~EOS\n  hi\nEOS\n"), vec!["hi\n"]);
}

#[test]
fn word_list_with_escaped_space() {
    assert_eq!(contents("%w[a b\\ c]"), vec!["a", "b c"]);
}

// === Programs ===

#[test]
fn method_definition() {
    let src = "def add(a, b = 2)\n  a + b\nend\n";
    assert_eq!(
        kinds(src),
        vec![
            Def,
            Ident,
            LparenCall,
            Ident,
            Comma,
            Ident,
            Assign,
            Integer,
            Rparen,
            Newline,
            Ident,
            Plus,
            Ident,
            Newline,
            End,
            Newline,
            EndOfInput,
        ]
    );
}

#[test]
fn class_with_constant_and_ivar() {
    let src = "class Point < Struct\n  ORIGIN = 0\n  def x = @x\nend\n";
    assert_eq!(
        kinds(src),
        vec![
            Class,
            Constant,
            Lt,
            Constant,
            Newline,
            Constant,
            Assign,
            Integer,
            Newline,
            Def,
            Ident,
            Assign,
            Ivar,
            Newline,
            End,
            Newline,
            EndOfInput,
        ]
    );
}

#[test]
fn block_with_parameters() {
    assert_eq!(
        kinds("xs.each { |x| p x }"),
        vec![Ident, Dot, Ident, Lcurly, Pipe, Ident, Pipe, Ident, Ident, Rbrace, EndOfInput]
    );
}

#[test]
fn hash_with_symbol_keys_and_rockets() {
    assert_eq!(
        kinds("h = { a: 1, :b => 2 }"),
        vec![
            Ident, Assign, Lbrace, Label, Integer, Comma, Symbeg, Ident, Assoc, Integer,
            Rbrace, EndOfInput,
        ]
    );
}

#[test]
fn string_formatting_with_heredoc_and_interpolation() {
    let src = "puts <<~MSG\n  Hello, #{name}!\nMSG\n";
    assert_eq!(
        kinds(src),
        vec![
            Ident,
            StringBeg,
            StringContent,
            StringDbeg,
            Ident,
            StringDend,
            StringContent,
            StringEnd,
            Newline,
            EndOfInput,
        ]
    );
    assert_eq!(contents(src), vec!["Hello, ", "!\n"]);
}

#[test]
fn heredoc_inside_interpolation_of_heredoc() {
    let src = "<<A\nx#{<<B}y\ninner\nB\nA\n";
    assert_eq!(contents(src), vec!["x", "inner\n", "y\n"]);
    assert!(lex(src, LexerOptions::default()).errors.is_empty());
}

#[test]
fn crlf_source_reads_like_lf() {
    assert_eq!(kinds("a = 1\r\nb\r\n"), kinds("a = 1\nb\n"));
    assert_eq!(contents("<<EOS\r\nx\r\nEOS\r\n"), vec!["x\n"]);
}

#[test]
fn method_chain_across_lines() {
    let src = "items\n  .select { |i| i }\n  # keep going\n  &.first\n";
    assert_eq!(
        kinds(src),
        vec![
            Ident, Dot, Ident, Lcurly, Pipe, Ident, Pipe, Ident, Rbrace, AndDot, Ident, Newline,
            EndOfInput,
        ]
    );
}

// === Recovery ===

#[test]
fn errors_accumulate_and_lexing_continues() {
    let out = lex("x = 0x\ny = @1\nz = 08\n", LexerOptions::default());
    let errors: Vec<LexErrorKind> = out.errors.iter().map(|e| e.kind.clone()).collect();
    assert_eq!(
        errors,
        vec![
            LexErrorKind::NumericWithoutDigits,
            LexErrorKind::InvalidVariableName {
                sigil: "@",
                found: '1'
            },
            LexErrorKind::InvalidOctalDigit,
        ]
    );
    assert!(out.fatal.is_none());
    assert_eq!(out.tokens.last().map(|t| t.kind), Some(EndOfInput));
}

#[test]
fn error_tokens_are_flagged() {
    let out = lex("\"abc", LexerOptions::default());
    assert!(out
        .tokens
        .iter()
        .any(|t| t.flags.contains(TokenFlags::HAS_ERROR)));
    let clean = lex("\"abc\"", LexerOptions::default());
    assert!(!clean
        .tokens
        .iter()
        .any(|t| t.flags.contains(TokenFlags::HAS_ERROR)));
}

#[test]
fn unknown_encoding_stops_lexing() {
    let out = lex("# coding: klingon\nputs 1\n", LexerOptions::default());
    assert!(out.fatal.is_some());
    assert!(out.has_errors());
    assert_eq!(out.tokens.len(), 1);
}

#[test]
fn diagnostics_render_with_location_and_excerpt() {
    let out = lex("x = \"abc", LexerOptions::default());
    let diagnostics = out.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let text = diagnostics[0].render("t.rb", false);
    assert!(text.starts_with("t.rb:1:"), "{text}");
    assert!(
        text.contains("error[E0001]: unterminated string meets end of file"),
        "{text}"
    );
}

#[test]
fn diagnostics_flow_through_queue_and_emitter() {
    let out = lex("x = 0x\ny = @1\nfoo -1\n", LexerOptions::default());
    let mut queue = DiagnosticQueue::new();
    queue.extend(out.diagnostics());
    let (errors, warnings) = (queue.error_count(), queue.warning_count());
    assert_eq!((errors, warnings), (2, 1));

    let mut emitter = TerminalEmitter::new(Vec::new(), "t.rb", ColorMode::Never, false);
    emitter.emit_all(&queue.flush()).unwrap();
    emitter.emit_summary(errors, warnings).unwrap();
    let text = String::from_utf8(emitter.into_inner()).unwrap();
    assert!(text.contains("t.rb:1:"), "{text}");
    assert!(text.contains("t.rb:2:"), "{text}");
    assert!(text.contains("t.rb:3:"), "{text}");
    assert!(text.ends_with("2 errors, 1 warning emitted\n"), "{text}");
}

// === Sources And Options ===

#[test]
fn reader_source_matches_string_source() {
    let src = "a = [1, 2]\nb = a.map { _1 * 2 }\n";
    let from_reader: Vec<TokenKind> = Lexer::new(
        ReaderSource::new(Cursor::new(src.as_bytes())),
        LexerOptions::default(),
    )
    .map(|t| t.kind)
    .collect();
    let from_str: Vec<TokenKind> = Lexer::new(StrSource::new(src), LexerOptions::default())
        .map(|t| t.kind)
        .collect();
    assert_eq!(from_reader, from_str);
}

#[test]
fn start_line_offsets_positions() {
    let out = lex("a\nb", LexerOptions::default().start_line(10));
    assert_eq!(out.tokens[0].range.start.line, 10);
    assert_eq!(out.tokens[2].range.start.line, 11);
}

#[test]
fn quiet_lexer_records_no_warnings() {
    let out = lex("foo -1", LexerOptions::default().verbose(false));
    assert!(out.warnings.is_empty());
}

#[test]
fn frozen_default_applies_to_strings() {
    let out = lex("'a'", LexerOptions::default().frozen_string_literal(true));
    assert!(out.tokens[0].flags.contains(TokenFlags::FROZEN));
    assert_eq!(out.pragmas.frozen_string_literal, Some(true));
}
