//! Reserved words.
//!
//! Each entry carries two token kinds and a mode. The first kind is the
//! statement form; the second is the modifier form (`x if y`), the same as
//! the first for words without one. The mode is forced after the word is
//! read, whatever came before.
//!
//! The lookup uses the word's length as a first-pass filter (reserved words
//! are 2-12 bytes), then matches against the words of that length.

use garnet_ir::TokenKind;

use crate::mode::LexMode;

/// One reserved word.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Keyword {
    /// Kind at the start of a statement.
    pub kind: TokenKind,
    /// Kind after an expression (`return x if y`).
    pub modifier: TokenKind,
    /// Mode after the word.
    pub mode: LexMode,
}

impl Keyword {
    const fn new(kind: TokenKind, mode: LexMode) -> Self {
        Keyword {
            kind,
            modifier: kind,
            mode,
        }
    }

    const fn with_modifier(kind: TokenKind, modifier: TokenKind, mode: LexMode) -> Self {
        Keyword {
            kind,
            modifier,
            mode,
        }
    }

    /// Has a distinct modifier form.
    #[inline]
    pub fn has_modifier(&self) -> bool {
        self.kind != self.modifier
    }
}

const NAME_ITEM: LexMode = LexMode::FNAME.union(LexMode::FITEM);

const ALIAS: Keyword = Keyword::new(TokenKind::Alias, NAME_ITEM);
const AND: Keyword = Keyword::new(TokenKind::And, LexMode::VALUE);
const BEGIN: Keyword = Keyword::new(TokenKind::Begin, LexMode::BEGIN);
const BEGIN_UPPER: Keyword = Keyword::new(TokenKind::UpperBegin, LexMode::END);
const BREAK: Keyword = Keyword::new(TokenKind::Break, LexMode::MID);
const CASE: Keyword = Keyword::new(TokenKind::Case, LexMode::VALUE);
const CLASS: Keyword = Keyword::new(TokenKind::Class, LexMode::CLASS);
const DEF: Keyword = Keyword::new(TokenKind::Def, LexMode::FNAME);
const DEFINED: Keyword = Keyword::new(TokenKind::Defined, LexMode::ARG);
const DO: Keyword = Keyword::new(TokenKind::Do, LexMode::BEGIN);
const ELSE: Keyword = Keyword::new(TokenKind::Else, LexMode::BEGIN);
const ELSIF: Keyword = Keyword::new(TokenKind::Elsif, LexMode::VALUE);
const END: Keyword = Keyword::new(TokenKind::End, LexMode::END);
const END_UPPER: Keyword = Keyword::new(TokenKind::UpperEnd, LexMode::END);
const ENCODING: Keyword = Keyword::new(TokenKind::KwEncoding, LexMode::END);
const ENSURE: Keyword = Keyword::new(TokenKind::Ensure, LexMode::BEGIN);
const FALSE: Keyword = Keyword::new(TokenKind::False, LexMode::END);
const FILE: Keyword = Keyword::new(TokenKind::KwFile, LexMode::END);
const FOR: Keyword = Keyword::new(TokenKind::For, LexMode::VALUE);
const IF: Keyword = Keyword::with_modifier(TokenKind::If, TokenKind::IfMod, LexMode::VALUE);
const IN: Keyword = Keyword::new(TokenKind::In, LexMode::VALUE);
const LINE: Keyword = Keyword::new(TokenKind::KwLine, LexMode::END);
const MODULE: Keyword = Keyword::new(TokenKind::Module, LexMode::VALUE);
const NEXT: Keyword = Keyword::new(TokenKind::Next, LexMode::MID);
const NIL: Keyword = Keyword::new(TokenKind::Nil, LexMode::END);
const NOT: Keyword = Keyword::new(TokenKind::Not, LexMode::ARG);
const OR: Keyword = Keyword::new(TokenKind::Or, LexMode::VALUE);
const REDO: Keyword = Keyword::new(TokenKind::Redo, LexMode::END);
const RESCUE: Keyword =
    Keyword::with_modifier(TokenKind::Rescue, TokenKind::RescueMod, LexMode::MID);
const RETRY: Keyword = Keyword::new(TokenKind::Retry, LexMode::END);
const RETURN: Keyword = Keyword::new(TokenKind::Return, LexMode::MID);
const SELF: Keyword = Keyword::new(TokenKind::SelfKw, LexMode::END);
const SUPER: Keyword = Keyword::new(TokenKind::Super, LexMode::ARG);
const THEN: Keyword = Keyword::new(TokenKind::Then, LexMode::BEGIN);
const TRUE: Keyword = Keyword::new(TokenKind::True, LexMode::END);
const UNDEF: Keyword = Keyword::new(TokenKind::Undef, NAME_ITEM);
const UNLESS: Keyword =
    Keyword::with_modifier(TokenKind::Unless, TokenKind::UnlessMod, LexMode::VALUE);
const UNTIL: Keyword =
    Keyword::with_modifier(TokenKind::Until, TokenKind::UntilMod, LexMode::VALUE);
const WHEN: Keyword = Keyword::new(TokenKind::When, LexMode::VALUE);
const WHILE: Keyword =
    Keyword::with_modifier(TokenKind::While, TokenKind::WhileMod, LexMode::VALUE);
const YIELD: Keyword = Keyword::new(TokenKind::Yield, LexMode::ARG);

/// Look up a reserved word by its bytes.
///
/// `defined?` is matched with its `?`; the identifier scanner includes the
/// suffix before asking.
#[inline]
pub fn lookup(text: &[u8]) -> Option<&'static Keyword> {
    let len = text.len();

    // Guard: all reserved words are 2-12 bytes and start with a letter or `_`
    if !(2..=12).contains(&len) {
        return None;
    }
    let first = text[0];
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }

    let keyword = match len {
        2 => match text {
            b"do" => &DO,
            b"if" => &IF,
            b"in" => &IN,
            b"or" => &OR,
            _ => return None,
        },
        3 => match text {
            b"and" => &AND,
            b"def" => &DEF,
            b"end" => &END,
            b"END" => &END_UPPER,
            b"for" => &FOR,
            b"nil" => &NIL,
            b"not" => &NOT,
            _ => return None,
        },
        4 => match text {
            b"case" => &CASE,
            b"else" => &ELSE,
            b"next" => &NEXT,
            b"redo" => &REDO,
            b"self" => &SELF,
            b"then" => &THEN,
            b"true" => &TRUE,
            b"when" => &WHEN,
            _ => return None,
        },
        5 => match text {
            b"alias" => &ALIAS,
            b"begin" => &BEGIN,
            b"BEGIN" => &BEGIN_UPPER,
            b"break" => &BREAK,
            b"class" => &CLASS,
            b"elsif" => &ELSIF,
            b"false" => &FALSE,
            b"retry" => &RETRY,
            b"super" => &SUPER,
            b"undef" => &UNDEF,
            b"until" => &UNTIL,
            b"while" => &WHILE,
            b"yield" => &YIELD,
            _ => return None,
        },
        6 => match text {
            b"ensure" => &ENSURE,
            b"module" => &MODULE,
            b"rescue" => &RESCUE,
            b"return" => &RETURN,
            b"unless" => &UNLESS,
            _ => return None,
        },
        8 => match text {
            b"defined?" => &DEFINED,
            b"__LINE__" => &LINE,
            b"__FILE__" => &FILE,
            _ => return None,
        },
        12 => match text {
            b"__ENCODING__" => &ENCODING,
            _ => return None,
        },
        _ => return None,
    };
    Some(keyword)
}
