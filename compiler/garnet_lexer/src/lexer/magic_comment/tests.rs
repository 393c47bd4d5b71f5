use garnet_lexer_core::SourceEncoding;
use pretty_assertions::assert_eq;

use super::{parse_bool, scan, strip_eol_suffix, MagicPair};
use crate::lex_error::{LexFatal, LexWarningKind};
use crate::lexer::tests::{lex_all, warning_kinds};
use crate::options::ShareableConstantValue;

fn pair(name: &str, value: &str) -> MagicPair {
    MagicPair {
        name: name.to_owned(),
        value: value.to_owned(),
    }
}

// === Scanning ===

#[test]
fn single_pair() {
    assert_eq!(
        scan(b" frozen_string_literal: true"),
        Some(vec![pair("frozen_string_literal", "true")])
    );
}

#[test]
fn names_ignore_case_and_dashes() {
    assert_eq!(
        scan(b" Frozen-String-Literal: true"),
        Some(vec![pair("frozen_string_literal", "true")])
    );
}

#[test]
fn quoted_value() {
    assert_eq!(
        scan(b" key: \"a b\""),
        Some(vec![pair("key", "a b")])
    );
}

#[test]
fn emacs_section_holds_several_pairs() {
    assert_eq!(
        scan(b" -*- coding: utf-8; mode: ruby -*-"),
        Some(vec![pair("coding", "utf-8"), pair("mode", "ruby")])
    );
    assert_eq!(scan(b" -*- -*-"), None);
    assert_eq!(scan(b" -*- coding: utf-8"), None);
}

#[test]
fn prose_is_not_magic() {
    assert_eq!(scan(b" just a comment"), None);
    assert_eq!(scan(b" TODO: fix this"), None);
    assert_eq!(scan(b""), None);
}

#[test]
fn boolean_values() {
    assert_eq!(parse_bool("true"), Some(true));
    assert_eq!(parse_bool("FALSE"), Some(false));
    assert_eq!(parse_bool("yes"), None);
}

#[test]
fn line_ending_suffixes() {
    assert_eq!(strip_eol_suffix("utf-8-unix"), "utf-8");
    assert_eq!(strip_eol_suffix("euc-jp-dos"), "euc-jp");
    assert_eq!(strip_eol_suffix("utf8-mac"), "utf8-mac");
    assert_eq!(strip_eol_suffix("UTF-8-MAC"), "UTF-8-MAC");
    assert_eq!(strip_eol_suffix("utf-8"), "utf-8");
}

// === Pragmas ===

#[test]
fn frozen_string_literal_pragma() {
    let out = lex_all("# frozen_string_literal: true\nx\n");
    assert_eq!(out.pragmas.frozen_string_literal, Some(true));
}

#[test]
fn frozen_string_literal_after_code_is_ignored() {
    let out = lex_all("x\n# frozen_string_literal: true\n");
    assert_eq!(out.pragmas.frozen_string_literal, None);
    assert_eq!(
        warning_kinds("x\n# frozen_string_literal: true\n"),
        vec![LexWarningKind::MagicCommentIgnored {
            name: "frozen_string_literal".to_owned()
        }]
    );
}

#[test]
fn invalid_pragma_value_warns() {
    assert_eq!(
        warning_kinds("# frozen_string_literal: maybe\n"),
        vec![LexWarningKind::InvalidMagicValue {
            name: "frozen_string_literal".to_owned(),
            value: "maybe".to_owned()
        }]
    );
}

#[test]
fn warn_indent_pragma() {
    let out = lex_all("# warn_indent: false\n");
    assert_eq!(out.pragmas.warn_indent, Some(false));
}

#[test]
fn shareable_constant_value_must_stand_alone() {
    let out = lex_all("# shareable_constant_value: literal\n");
    assert_eq!(
        out.pragmas.shareable_constant_value,
        ShareableConstantValue::Literal
    );

    let out = lex_all("x # shareable_constant_value: literal\n");
    assert_eq!(
        out.pragmas.shareable_constant_value,
        ShareableConstantValue::None
    );
}

// === Encoding ===

#[test]
fn coding_comment_on_first_line() {
    let out = lex_all("# coding: utf-8\n");
    assert_eq!(out.pragmas.encoding, Some(SourceEncoding::UTF_8));
}

#[test]
fn emacs_coding_with_eol_suffix() {
    let out = lex_all("# -*- coding: us-ascii-unix -*-\n");
    assert_eq!(out.pragmas.encoding, Some(SourceEncoding::US_ASCII));
}

#[test]
fn coding_comment_after_shebang() {
    let out = lex_all("#!/usr/bin/env ruby\n# encoding: binary\n");
    assert_eq!(out.pragmas.encoding, Some(SourceEncoding::BINARY));
    assert!(out.fatal.is_none());
}

#[test]
fn coding_comment_below_the_top_is_ignored() {
    let out = lex_all("x = 1\n# coding: bogus\n");
    assert_eq!(out.pragmas.encoding, None);
    assert!(out.fatal.is_none());
}

#[test]
fn vim_style_fileencoding() {
    let out = lex_all("# vim: set fileencoding=utf-8 :\n");
    assert_eq!(out.pragmas.encoding, Some(SourceEncoding::UTF_8));
}

#[test]
fn wide_encoding_is_fatal() {
    let out = lex_all("# coding: utf-16le\n");
    assert!(matches!(
        out.fatal,
        Some(LexFatal::IncompatibleEncoding { ref name, .. }) if name == "UTF-16LE"
    ));
}
