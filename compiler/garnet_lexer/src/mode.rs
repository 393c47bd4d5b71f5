//! Lexer mode: what kind of token the grammar expects next.
//!
//! Ruby's surface syntax is ambiguous at the byte level. `-` can be binary
//! minus, unary minus, or the sign of a number; `/` can divide or open a
//! regexp; `{` can open a hash, a block or a lambda body. The lexer resolves
//! each of these by consulting the mode left behind by the previous token.
//!
//! # Design
//!
//! Flags are organized into categories:
//! - **Expression start**: `BEGIN`, `MID`, `CLASS`, `VALUE`
//! - **Expression end**: `END`, `END_ARG`, `END_FN`
//! - **Argument position**: `ARG`, `CMD_ARG`
//! - **Name position**: `FNAME`, `DOT`, `FITEM`
//! - **Labels**: `LABEL`, `LABELED`
//!
//! [`transition`] is the data-driven half of the state machine: given a
//! punctuation token and the mode it was read in, it returns the next mode.
//! Identifiers, keywords and literal parts depend on more than the kind and
//! are handled where they are scanned.

use bitflags::bitflags;
use garnet_ir::TokenKind;

bitflags! {
    /// What the lexer expects next.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct LexMode: u16 {
        // === Expression start ===

        /// Start of an expression: after an operator, `(`, `;` or a newline.
        const BEGIN = 1 << 0;
        /// After `return`, `break`, `next`, `rescue`: an argument is optional.
        const MID = 1 << 6;
        /// After `class`: `<<` is a singleton class, not a heredoc.
        const CLASS = 1 << 9;

        // === Expression end ===

        /// After a complete operand: operators are binary.
        const END = 1 << 1;
        /// After the `)` of a parenthesized command argument.
        const END_ARG = 1 << 2;
        /// After a method name in a definition, or after `)`.
        const END_FN = 1 << 3;

        // === Argument position ===

        /// After a method name that may take arguments.
        const ARG = 1 << 4;
        /// After a method name at the start of a command.
        const CMD_ARG = 1 << 5;

        // === Name position ===

        /// Expecting a method name: after `def`, `alias`, `:`.
        const FNAME = 1 << 7;
        /// After `.` or `&.`: expecting a method name, keywords allowed.
        const DOT = 1 << 8;
        /// Expecting a symbol or method name item of `alias`/`undef`.
        const FITEM = 1 << 12;

        // === Labels ===

        /// `name:` would be a label here.
        const LABEL = 1 << 10;
        /// Just read a label.
        const LABELED = 1 << 11;
    }
}

impl LexMode {
    /// Alias for `BEGIN`: a value is expected.
    pub const VALUE: Self = Self::BEGIN;

    /// Any expression-start context.
    pub const BEG_ANY: Self =
        Self::from_bits_truncate(Self::BEGIN.bits() | Self::MID.bits() | Self::CLASS.bits());

    /// Any argument context.
    pub const ARG_ANY: Self = Self::from_bits_truncate(Self::ARG.bits() | Self::CMD_ARG.bits());

    /// Any expression-end context.
    pub const END_ANY: Self = Self::from_bits_truncate(
        Self::END.bits() | Self::END_ARG.bits() | Self::END_FN.bits(),
    );

    /// A prefix reading is preferred: `*` splats, `-` negates, `/` opens a
    /// regexp.
    ///
    /// True in any expression-start mode, and right after a label in
    /// argument position (`foo a: -1`).
    #[inline]
    pub const fn is_beg(self) -> bool {
        self.intersects(Self::BEG_ANY)
            || self.contains(Self::ARG.union(Self::LABELED))
    }

    #[inline]
    pub const fn is_end(self) -> bool {
        self.intersects(Self::END_ANY)
    }

    #[inline]
    pub const fn is_arg(self) -> bool {
        self.intersects(Self::ARG_ANY)
    }

    /// After `def` or `.`: operators read as method names (`-@`, `[]=`).
    #[inline]
    pub const fn is_after_operator(self) -> bool {
        self.intersects(Self::FNAME.union(Self::DOT))
    }

    /// `name:` may be a label.
    #[inline]
    pub const fn is_label_possible(self, command_state: bool) -> bool {
        (self.intersects(Self::LABEL.union(Self::END_FN)) && !command_state) || self.is_arg()
    }

    /// Argument position after whitespace, with a non-space next byte:
    /// `foo -1`, `foo *args`, `foo /re/`.
    #[inline]
    pub const fn is_space_arg(self, space_seen: bool, next_is_space: bool) -> bool {
        self.is_arg() && space_seen && !next_is_space
    }

    /// Mode for an operator that reads as binary or prefix: `ARG` after a
    /// method-name context (so `def -(x)` takes parameters), `BEGIN`
    /// otherwise.
    #[inline]
    pub const fn after_operator(self) -> Self {
        if self.is_after_operator() {
            Self::ARG
        } else {
            Self::BEGIN
        }
    }
}

impl Default for LexMode {
    fn default() -> Self {
        Self::BEGIN
    }
}

/// Next mode after a punctuation token read in mode `prev`.
///
/// Returns `None` for tokens whose transition depends on more than their
/// kind: identifiers, keywords, quoted-literal parts.
#[allow(clippy::enum_glob_use, reason = "exhaustive kind table")]
pub fn transition(kind: TokenKind, prev: LexMode) -> Option<LexMode> {
    use TokenKind::*;
    let next = match kind {
        // Binary or prefix depending on context; method names after `def`.
        Plus | Minus | Uplus | Uminus | Mul | Star | Pow | Dstar | Div | Percent | Caret
        | BitAnd | Amper | Lt | Gt | Leq | Geq | Cmp | EqEq | Eqq | Match | Neq | Nmatch
        | Lshift | Rshift | Assign | Assoc | Tilde | Bang => prev.after_operator(),
        Pipe => {
            if prev.is_after_operator() {
                LexMode::ARG
            } else {
                LexMode::BEGIN | LexMode::LABEL
            }
        }
        Lbrack | LbrackIndex => {
            if prev.is_after_operator() {
                LexMode::ARG | LexMode::LABEL
            } else {
                LexMode::BEGIN | LexMode::LABEL
            }
        }
        Aref | Aset => LexMode::ARG,

        UminusNum | OpAsgn | AndOp | OrOp | Semicolon | Newline | Colon3 | Dot2 | Dot3
        | Bdot2 | Bdot3 | Lcurly | LbraceArg | Lambeg => LexMode::BEGIN,
        Question | Colon => LexMode::VALUE,
        Comma | Lparen | LparenArg | LparenCall | Lbrace | LabelEnd => {
            LexMode::BEGIN | LexMode::LABEL
        }

        Dot | AndDot | Colon2 => LexMode::DOT,
        Lambda | Rparen => LexMode::END_FN,
        Rbracket | Rbrace | StringEnd | RegexpEnd | Char | Integer | Float
        | Rational | Imaginary | Gvar | Ivar | Cvar | NthRef | BackRef => LexMode::END,
        Label => LexMode::ARG | LexMode::LABELED,
        Symbeg => LexMode::FNAME,

        _ => return None,
    };
    Some(next)
}
