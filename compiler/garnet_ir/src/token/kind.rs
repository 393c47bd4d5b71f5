//! Token kinds.

use std::fmt;

/// Token kinds produced by the lexer.
///
/// The kind carries no payload; literal contents, names and numeric values
/// travel in the token's [`TokenValue`](super::TokenValue). Kinds that share a
/// spelling but differ by context (`-` as binary minus, unary minus, or a
/// negative-number prefix) are distinct variants: choosing between them is
/// the lexer's job, not the parser's.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    // Reserved words
    Class,
    Module,
    Def,
    Undef,
    Begin,
    Rescue,
    Ensure,
    End,
    If,
    Unless,
    Then,
    Elsif,
    Else,
    Case,
    When,
    While,
    Until,
    For,
    Break,
    Next,
    Redo,
    Retry,
    In,
    /// Plain `do` (e.g. after `while cond` with no condition stack bit).
    Do,
    /// `do` closing a `while`/`until`/`for` head.
    DoCond,
    /// `do` opening a block for a command call.
    DoBlock,
    /// `do` opening a lambda body after `->`.
    DoLambda,
    Return,
    Yield,
    Super,
    SelfKw,
    Nil,
    True,
    False,
    And,
    Or,
    Not,
    /// `if` as a statement modifier.
    IfMod,
    UnlessMod,
    WhileMod,
    UntilMod,
    RescueMod,
    Alias,
    Defined,
    /// `BEGIN`
    UpperBegin,
    /// `END`
    UpperEnd,
    /// `__LINE__`
    KwLine,
    /// `__FILE__`
    KwFile,
    /// `__ENCODING__`
    KwEncoding,

    // Names
    /// Local variable or method name.
    Ident,
    /// Method name ending in `!` or `?`.
    Fid,
    /// `$name`, `$~`, `$-w`
    Gvar,
    /// `@name`
    Ivar,
    /// `@@name`
    Cvar,
    /// Capitalized name.
    Constant,
    /// `name:` in label position.
    Label,
    /// `$1`..`$N`
    NthRef,
    /// `$&`, `` $` ``, `$'`, `$+`
    BackRef,
    /// `` ` `` as a method name, after `def` or `.`.
    Backtick,

    // Numeric and character literals
    Integer,
    Float,
    Rational,
    Imaginary,
    /// `?a`
    Char,

    // Quoted literals
    StringBeg,
    XstringBeg,
    RegexpBeg,
    /// `%W[`
    WordsBeg,
    /// `%w[`
    QwordsBeg,
    /// `%I[`
    SymbolsBeg,
    /// `%i[`
    QsymbolsBeg,
    /// `:` starting a symbol, or `:"`, `:'`, `%s(`
    Symbeg,
    StringContent,
    /// `#{`
    StringDbeg,
    /// `#` before `@ivar` / `$gvar` inside a literal.
    StringDvar,
    /// `}` closing an interpolation.
    StringDend,
    StringEnd,
    /// Closing delimiter of a regexp, with options as value.
    RegexpEnd,
    /// Closing quote of `"key":` in label position.
    LabelEnd,

    // Unary and prefix forms
    /// `+@` / unary plus
    Uplus,
    /// unary minus
    Uminus,
    /// `-` directly before a numeric literal in expression position.
    UminusNum,
    /// `*` splat
    Star,
    /// `**` keyword splat
    Dstar,
    /// `&` block pass
    Amper,
    /// `->`
    Lambda,

    // Binary operators
    Plus,
    Minus,
    /// binary `*`
    Mul,
    /// binary `**`
    Pow,
    Div,
    Percent,
    /// binary `&`
    BitAnd,
    Pipe,
    Caret,
    Bang,
    Tilde,
    Lt,
    Gt,
    Leq,
    Geq,
    /// `<=>`
    Cmp,
    /// `==`
    EqEq,
    /// `===`
    Eqq,
    /// `!=`
    Neq,
    /// `=~`
    Match,
    /// `!~`
    Nmatch,
    /// `&&`
    AndOp,
    /// `||`
    OrOp,
    Lshift,
    Rshift,
    /// `x op= y`, operator as value.
    OpAsgn,
    /// `=`
    Assign,
    /// `=>`
    Assoc,
    /// `..`
    Dot2,
    /// `...`
    Dot3,
    /// `..` with no left operand.
    Bdot2,
    /// `...` with no left operand.
    Bdot3,
    /// `[]` in method-name position.
    Aref,
    /// `[]=` in method-name position.
    Aset,
    /// `&.`
    AndDot,
    /// `::` scoped.
    Colon2,
    /// `::` at expression start.
    Colon3,
    Dot,
    Question,
    /// ternary `:`
    Colon,
    Comma,
    Semicolon,
    /// Significant newline.
    Newline,

    // Brackets
    /// `(` at expression start.
    Lparen,
    /// `(` after a space in argument position: `foo (1)`.
    LparenArg,
    /// `(` opening call arguments.
    LparenCall,
    Rparen,
    /// `[` opening an array literal.
    Lbrack,
    /// `[` indexing.
    LbrackIndex,
    Rbracket,
    /// `{` opening a hash literal.
    Lbrace,
    /// `{` block for a command argument.
    LbraceArg,
    /// `{` block.
    Lcurly,
    /// `{` opening a lambda body.
    Lambeg,
    Rbrace,

    /// Synthesized `end` for error-tolerant recovery.
    DummyEnd,
    EndOfInput,
}

impl TokenKind {
    /// Reserved words that may appear as method names after `.` or `def`.
    #[allow(clippy::enum_glob_use, reason = "exhaustive kind table")]
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Class
                | Module
                | Def
                | Undef
                | Begin
                | Rescue
                | Ensure
                | End
                | If
                | Unless
                | Then
                | Elsif
                | Else
                | Case
                | When
                | While
                | Until
                | For
                | Break
                | Next
                | Redo
                | Retry
                | In
                | Do
                | DoCond
                | DoBlock
                | DoLambda
                | Return
                | Yield
                | Super
                | SelfKw
                | Nil
                | True
                | False
                | And
                | Or
                | Not
                | IfMod
                | UnlessMod
                | WhileMod
                | UntilMod
                | RescueMod
                | Alias
                | Defined
                | UpperBegin
                | UpperEnd
                | KwLine
                | KwFile
                | KwEncoding
        )
    }

    /// Tokens that open a quoted literal and leave the lexer inside it.
    pub fn opens_literal(self) -> bool {
        matches!(
            self,
            TokenKind::StringBeg
                | TokenKind::XstringBeg
                | TokenKind::RegexpBeg
                | TokenKind::WordsBeg
                | TokenKind::QwordsBeg
                | TokenKind::SymbolsBeg
                | TokenKind::QsymbolsBeg
                | TokenKind::Symbeg
        )
    }

    /// Tokens that close a quoted literal.
    pub fn closes_literal(self) -> bool {
        matches!(
            self,
            TokenKind::StringEnd | TokenKind::RegexpEnd | TokenKind::LabelEnd
        )
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TokenKind::Integer | TokenKind::Float | TokenKind::Rational | TokenKind::Imaginary
        )
    }

    /// Human-readable name for diagnostics.
    #[allow(clippy::enum_glob_use, reason = "exhaustive kind table")]
    pub fn display_name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Class => "`class'",
            Module => "`module'",
            Def => "`def'",
            Undef => "`undef'",
            Begin => "`begin'",
            Rescue | RescueMod => "`rescue'",
            Ensure => "`ensure'",
            End => "`end'",
            If | IfMod => "`if'",
            Unless | UnlessMod => "`unless'",
            Then => "`then'",
            Elsif => "`elsif'",
            Else => "`else'",
            Case => "`case'",
            When => "`when'",
            While | WhileMod => "`while'",
            Until | UntilMod => "`until'",
            For => "`for'",
            Break => "`break'",
            Next => "`next'",
            Redo => "`redo'",
            Retry => "`retry'",
            In => "`in'",
            Do | DoCond | DoBlock | DoLambda => "`do'",
            Return => "`return'",
            Yield => "`yield'",
            Super => "`super'",
            SelfKw => "`self'",
            Nil => "`nil'",
            True => "`true'",
            False => "`false'",
            And => "`and'",
            Or => "`or'",
            Not => "`not'",
            Alias => "`alias'",
            Defined => "`defined?'",
            UpperBegin => "`BEGIN'",
            UpperEnd => "`END'",
            KwLine => "`__LINE__'",
            KwFile => "`__FILE__'",
            KwEncoding => "`__ENCODING__'",
            Ident => "local variable or method",
            Fid => "method name",
            Gvar => "global variable",
            Ivar => "instance variable",
            Cvar => "class variable",
            Constant => "constant",
            Label => "label",
            NthRef => "numbered reference",
            BackRef => "back reference",
            Backtick => "`",
            Integer => "integer literal",
            Float => "float literal",
            Rational => "rational literal",
            Imaginary => "imaginary literal",
            Char => "char literal",
            StringBeg => "string literal",
            XstringBeg => "backtick literal",
            RegexpBeg => "regexp literal",
            WordsBeg | QwordsBeg => "word list",
            SymbolsBeg | QsymbolsBeg => "symbol list",
            Symbeg => "symbol literal",
            StringContent => "string content",
            StringDbeg => "tSTRING_DBEG",
            StringDvar => "tSTRING_DVAR",
            StringDend => "tSTRING_DEND",
            StringEnd => "string end",
            RegexpEnd => "regexp end",
            LabelEnd => "label end",
            Uplus => "unary +",
            Uminus | UminusNum => "unary -",
            Star => "*",
            Dstar => "**",
            Amper => "&",
            Lambda => "->",
            Plus => "+",
            Minus => "-",
            Mul => "*",
            Pow => "**",
            Div => "/",
            Percent => "%",
            BitAnd => "&",
            Pipe => "|",
            Caret => "^",
            Bang => "!",
            Tilde => "~",
            Lt => "<",
            Gt => ">",
            Leq => "<=",
            Geq => ">=",
            Cmp => "<=>",
            EqEq => "==",
            Eqq => "===",
            Neq => "!=",
            Match => "=~",
            Nmatch => "!~",
            AndOp => "&&",
            OrOp => "||",
            Lshift => "<<",
            Rshift => ">>",
            OpAsgn => "operator-assignment",
            Assign => "=",
            Assoc => "=>",
            Dot2 | Bdot2 => "..",
            Dot3 | Bdot3 => "...",
            Aref => "[]",
            Aset => "[]=",
            AndDot => "&.",
            Colon2 | Colon3 => "::",
            Dot => ".",
            Question => "?",
            Colon => ":",
            Comma => ",",
            Semicolon => ";",
            Newline => "'\\n'",
            Lparen | LparenArg | LparenCall => "(",
            Rparen => ")",
            Lbrack | LbrackIndex => "[",
            Rbracket => "]",
            Lbrace | LbraceArg | Lcurly | Lambeg => "{",
            Rbrace => "}",
            DummyEnd => "dummy end",
            EndOfInput => "end-of-input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
