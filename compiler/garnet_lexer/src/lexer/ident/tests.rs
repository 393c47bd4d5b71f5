use garnet_ir::{TokenKind, TokenValue};
use pretty_assertions::assert_eq;

use crate::lex_error::{LexErrorKind, LexWarningKind};
use crate::lexer::tests::{error_kinds, kinds, lex_all, name_of, warning_kinds};

use TokenKind::*;

// === Identifiers And Constants ===

#[test]
fn identifier_and_constant() {
    assert_eq!(kinds("foo"), vec![Ident, EndOfInput]);
    assert_eq!(kinds("Foo"), vec![Constant, EndOfInput]);
    assert_eq!(kinds("_foo"), vec![Ident, EndOfInput]);
    assert_eq!(name_of("foo_bar2", Ident), "foo_bar2");
}

#[test]
fn non_ascii_identifiers() {
    assert_eq!(kinds("été"), vec![Ident, EndOfInput]);
    assert_eq!(name_of("été", Ident), "été");
    assert_eq!(kinds("Été"), vec![Constant, EndOfInput]);
}

#[test]
fn predicate_and_bang_methods() {
    assert_eq!(kinds("foo?"), vec![Fid, EndOfInput]);
    assert_eq!(name_of("foo?", Fid), "foo?");
    assert_eq!(kinds("save!"), vec![Fid, EndOfInput]);
    assert_eq!(kinds("a!= b"), vec![Ident, Neq, Ident, EndOfInput]);
}

#[test]
fn setter_name_after_def() {
    assert_eq!(kinds("def foo="), vec![Def, Ident, EndOfInput]);
    assert_eq!(name_of("def foo=", Ident), "foo=");
    assert_eq!(
        kinds("def foo=>"),
        vec![Def, Ident, Assoc, EndOfInput]
    );
}

#[test]
fn labels_in_argument_position() {
    assert_eq!(kinds("foo a: 1"), vec![Ident, Label, Integer, EndOfInput]);
    assert_eq!(name_of("foo a: 1", Label), "a");
    assert_eq!(
        kinds("foo::bar"),
        vec![Ident, Colon2, Ident, EndOfInput]
    );
}

#[test]
fn predicate_label() {
    assert_eq!(kinds("foo a?: 1"), vec![Ident, Label, Integer, EndOfInput]);
    assert_eq!(name_of("foo a?: 1", Label), "a?");
}

// === Reserved Words ===

#[test]
fn keywords_at_statement_start() {
    assert_eq!(
        kinds("if x then y end"),
        vec![If, Ident, Then, Ident, End, EndOfInput]
    );
    assert_eq!(kinds("nil"), vec![Nil, EndOfInput]);
    assert_eq!(kinds("self"), vec![SelfKw, EndOfInput]);
    assert_eq!(kinds("defined?(x)"), vec![Defined, LparenCall, Ident, Rparen, EndOfInput]);
}

#[test]
fn modifier_keywords() {
    assert_eq!(kinds("a if b"), vec![Ident, IfMod, Ident, EndOfInput]);
    assert_eq!(kinds("a unless b"), vec![Ident, UnlessMod, Ident, EndOfInput]);
    assert_eq!(kinds("a while b"), vec![Ident, WhileMod, Ident, EndOfInput]);
    assert_eq!(kinds("a rescue b"), vec![Ident, RescueMod, Ident, EndOfInput]);
}

#[test]
fn keywords_after_dot_are_method_names() {
    assert_eq!(kinds("foo.class"), vec![Ident, Dot, Ident, EndOfInput]);
    assert_eq!(kinds("foo.end"), vec![Ident, Dot, Ident, EndOfInput]);
}

#[test]
fn keywords_after_def_keep_their_kind() {
    assert_eq!(kinds("def if"), vec![Def, If, EndOfInput]);
    assert_eq!(name_of("def end", End), "end");
}

#[test]
fn keyword_as_label() {
    assert_eq!(kinds("foo if: 1"), vec![Ident, Label, Integer, EndOfInput]);
}

// === Do ===

#[test]
fn do_after_loop_head_is_cond() {
    assert_eq!(
        kinds("while x do end"),
        vec![While, Ident, DoCond, End, EndOfInput]
    );
    assert_eq!(
        kinds("until x do end"),
        vec![Until, Ident, DoCond, End, EndOfInput]
    );
    assert_eq!(
        kinds("for x in y do end"),
        vec![For, Ident, In, Ident, DoCond, End, EndOfInput]
    );
}

#[test]
fn loop_head_ends_at_newline() {
    assert_eq!(
        kinds("while x\nfoo do end\nend"),
        vec![While, Ident, Newline, Ident, Do, End, Newline, End, EndOfInput]
    );
}

#[test]
fn do_for_lambda_and_plain_call() {
    assert_eq!(kinds("-> do end"), vec![Lambda, DoLambda, End, EndOfInput]);
    assert_eq!(kinds("foo do end"), vec![Ident, Do, End, EndOfInput]);
}

#[test]
fn do_block_when_cmdarg_is_set() {
    use crate::lexer::Lexer;
    use crate::LexerOptions;
    use garnet_lexer_core::StrSource;

    let mut lx = Lexer::new(StrSource::new("foo x do"), LexerOptions::default());
    assert_eq!(lx.next_token().unwrap().kind, Ident);
    lx.push_cmdarg(true);
    assert_eq!(lx.next_token().unwrap().kind, Ident);
    assert_eq!(lx.next_token().unwrap().kind, DoBlock);
}

// === Global Variables ===

#[test]
fn named_globals() {
    assert_eq!(name_of("$foo", Gvar), "$foo");
    assert_eq!(name_of("$_", Gvar), "$_");
    assert_eq!(name_of("$_foo", Gvar), "$_foo");
    assert_eq!(name_of("$0", Gvar), "$0");
    assert_eq!(name_of("$~", Gvar), "$~");
    assert_eq!(name_of("$-w", Gvar), "$-w");
}

#[test]
fn program_name_global_stops_after_zero() {
    assert_eq!(kinds("$0x"), vec![Gvar, Ident, EndOfInput]);
    assert_eq!(name_of("$0x", Gvar), "$0");
    assert_eq!(name_of("$0x", Ident), "x");
}

#[test]
fn back_references() {
    let out = lex_all("$&");
    assert_eq!(out.tokens[0].kind, BackRef);
    assert_eq!(out.tokens[0].value, TokenValue::BackRef(b'&'));
    assert_eq!(kinds("$'"), vec![BackRef, EndOfInput]);
}

#[test]
fn nth_references() {
    let out = lex_all("$12");
    assert_eq!(out.tokens[0].kind, NthRef);
    assert_eq!(out.tokens[0].value, TokenValue::NthRef(12));
}

#[test]
fn oversized_nth_reference_warns() {
    let out = lex_all("$99999999999");
    assert_eq!(out.tokens[0].value, TokenValue::NthRef(0));
    assert_eq!(
        warning_kinds("$99999999999"),
        vec![LexWarningKind::NthRefTooBig {
            text: "$99999999999".to_owned()
        }]
    );
}

#[test]
fn bad_global_names() {
    assert_eq!(kinds("$-"), vec![Gvar, EndOfInput]);
    assert_eq!(
        error_kinds("$-"),
        vec![LexErrorKind::InvalidVariableName {
            sigil: "$",
            found: '-'
        }]
    );
    assert_eq!(
        error_kinds("$"),
        vec![LexErrorKind::MissingVariableName { sigil: "$" }]
    );
}

// === Instance And Class Variables ===

#[test]
fn instance_and_class_variables() {
    assert_eq!(kinds("@foo"), vec![Ivar, EndOfInput]);
    assert_eq!(name_of("@foo", Ivar), "@foo");
    assert_eq!(kinds("@@bar"), vec![Cvar, EndOfInput]);
    assert_eq!(name_of("@@bar", Cvar), "@@bar");
}

#[test]
fn bad_instance_variable_names() {
    assert_eq!(
        error_kinds("@1"),
        vec![LexErrorKind::InvalidVariableName {
            sigil: "@",
            found: '1'
        }]
    );
    assert_eq!(
        error_kinds("@"),
        vec![LexErrorKind::MissingVariableName { sigil: "@" }]
    );
    assert_eq!(
        error_kinds("@@ "),
        vec![LexErrorKind::MissingVariableName { sigil: "@@" }]
    );
}
