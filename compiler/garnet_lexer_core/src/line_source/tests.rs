use std::io::Cursor;

use pretty_assertions::assert_eq;

use super::*;

fn drain(source: &mut dyn LineSource) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    while let Ok(Some(line)) = source.next_line() {
        lines.push(line);
    }
    lines
}

#[test]
fn str_source_keeps_terminators() {
    let mut source = StrSource::new("a\nbb\r\nccc");
    assert_eq!(
        drain(&mut source),
        vec![b"a\n".to_vec(), b"bb\r\n".to_vec(), b"ccc".to_vec()]
    );
}

#[test]
fn str_source_empty_input_has_no_lines() {
    let mut source = StrSource::new("");
    assert!(matches!(source.next_line(), Ok(None)));
}

#[test]
fn str_source_trailing_newline_has_no_extra_line() {
    let mut source = StrSource::new("x\n");
    assert_eq!(drain(&mut source), vec![b"x\n".to_vec()]);
}

#[test]
fn reader_source_matches_str_source() {
    let text = "puts 1\n\n# done\n";
    let mut from_reader = ReaderSource::new(Cursor::new(text.as_bytes()));
    let mut from_str = StrSource::new(text);
    assert_eq!(drain(&mut from_reader), drain(&mut from_str));
}

#[test]
fn fn_source_yields_until_none() {
    let mut remaining = vec![b"two\n".to_vec(), b"one\n".to_vec()];
    let mut source = FnSource::new(move || Ok(remaining.pop()));
    assert_eq!(drain(&mut source), vec![b"one\n".to_vec(), b"two\n".to_vec()]);
}

#[test]
fn fn_source_propagates_errors() {
    let mut source = FnSource::new(|| Err(io::Error::other("closed")));
    assert!(source.next_line().is_err());
}
