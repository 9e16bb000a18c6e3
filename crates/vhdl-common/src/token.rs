use serde::Serialize;

use crate::span::Span;

/// A token produced by the VHDL lexer. Its text is `span.text(source)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    /// The source text of this token.
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        self.span.text(source)
    }
}

/// Every kind of token in VHDL-2008 (PSL-only reserved words excluded).
///
/// Each reserved word is its own kind so the verifier can compare tokens by
/// category without looking at their spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Reserved words (103) ──────────────────────────────────────────
    Abs,
    Access,
    After,
    Alias,
    All,
    And,
    Architecture,
    Array,
    Assert,
    Attribute,
    Begin,
    Block,
    Body,
    Buffer,
    Bus,
    Case,
    Component,
    Configuration,
    Constant,
    Context,
    Default,
    Disconnect,
    Downto,
    Else,
    Elsif,
    End,
    Entity,
    Exit,
    File,
    For,
    Force,
    Function,
    Generate,
    Generic,
    Group,
    Guarded,
    If,
    Impure,
    In,
    Inertial,
    Inout,
    Is,
    Label,
    Library,
    Linkage,
    Literal,
    Loop,
    Map,
    Mod,
    Nand,
    New,
    Next,
    Nor,
    Not,
    Null,
    Of,
    On,
    Open,
    Or,
    Others,
    Out,
    Package,
    Parameter,
    Port,
    Postponed,
    Procedure,
    Process,
    Protected,
    Pure,
    Range,
    Record,
    Register,
    Reject,
    Release,
    Rem,
    Report,
    Return,
    Rol,
    Ror,
    Select,
    Severity,
    Shared,
    Signal,
    Sla,
    Sll,
    Sra,
    Srl,
    Subtype,
    Then,
    To,
    Transport,
    Type,
    Unaffected,
    Units,
    Until,
    Use,
    Variable,
    Wait,
    When,
    While,
    With,
    Xnor,
    Xor,

    // ── Delimiters ─────────────────────────────────────────────────────
    /// `&`
    Ampersand,
    /// `'` when used for attributes and qualified expressions.
    Tick,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `,`
    Comma,
    /// `-`
    Minus,
    /// `.`
    Dot,
    /// `/`
    Slash,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `<`
    Lt,
    /// `=`
    Eq,
    /// `>`
    Gt,
    /// `|` (or its replacement `!`)
    Bar,
    /// `@`
    At,
    /// `^`
    Caret,
    /// `?`
    Question,

    // ── Compound delimiters ────────────────────────────────────────────
    /// `=>`
    Arrow,
    /// `**`
    DoubleStar,
    /// `:=`
    VarAssign,
    /// `/=`
    NotEq,
    /// `>=`
    GtEq,
    /// `<=` (relational operator and signal assignment)
    LtEq,
    /// `<>`
    Diamond,
    /// `??`
    Condition,
    /// `?=`
    MatchEq,
    /// `?/=`
    MatchNotEq,
    /// `?<`
    MatchLt,
    /// `?<=`
    MatchLtEq,
    /// `?>`
    MatchGt,
    /// `?>=`
    MatchGtEq,
    /// `<<`
    DoubleLt,
    /// `>>`
    DoubleGt,

    // ── Literals ───────────────────────────────────────────────────────
    /// Decimal or based integer, e.g. `42`, `16#FF#`.
    IntLiteral,
    /// Decimal or based real, e.g. `1.0e-9`, `2#1.1#E4`.
    RealLiteral,
    /// `'a'`
    CharLiteral,
    /// `"text"`
    StringLiteral,
    /// `X"FF"`, `8B"1010_1010"`
    BitStringLiteral,

    // ── Identifiers and comments ───────────────────────────────────────
    /// Basic identifier, e.g. `clk`, `data_in`.
    Ident,
    /// Extended identifier, e.g. `\bus(0)\`.
    ExtendedIdent,
    /// `-- ...` or `/* ... */`
    Comment,

    // ── Special ────────────────────────────────────────────────────────
    Eof,
    /// Invalid input. Used for error recovery.
    Error,
}

impl TokenKind {
    /// Whether this kind is a reserved word.
    pub fn is_keyword(self) -> bool {
        self.keyword_str().is_some()
    }

    /// Whether this kind is a basic or extended identifier.
    pub fn is_identifier(self) -> bool {
        matches!(self, TokenKind::Ident | TokenKind::ExtendedIdent)
    }

    /// Comments and end-of-file carry no meaning for equivalence checks.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Eof)
    }

    /// Lower-case spelling of a reserved word, `None` for any other kind.
    pub fn keyword_str(self) -> Option<&'static str> {
        let s = match self {
            TokenKind::Abs => "abs",
            TokenKind::Access => "access",
            TokenKind::After => "after",
            TokenKind::Alias => "alias",
            TokenKind::All => "all",
            TokenKind::And => "and",
            TokenKind::Architecture => "architecture",
            TokenKind::Array => "array",
            TokenKind::Assert => "assert",
            TokenKind::Attribute => "attribute",
            TokenKind::Begin => "begin",
            TokenKind::Block => "block",
            TokenKind::Body => "body",
            TokenKind::Buffer => "buffer",
            TokenKind::Bus => "bus",
            TokenKind::Case => "case",
            TokenKind::Component => "component",
            TokenKind::Configuration => "configuration",
            TokenKind::Constant => "constant",
            TokenKind::Context => "context",
            TokenKind::Default => "default",
            TokenKind::Disconnect => "disconnect",
            TokenKind::Downto => "downto",
            TokenKind::Else => "else",
            TokenKind::Elsif => "elsif",
            TokenKind::End => "end",
            TokenKind::Entity => "entity",
            TokenKind::Exit => "exit",
            TokenKind::File => "file",
            TokenKind::For => "for",
            TokenKind::Force => "force",
            TokenKind::Function => "function",
            TokenKind::Generate => "generate",
            TokenKind::Generic => "generic",
            TokenKind::Group => "group",
            TokenKind::Guarded => "guarded",
            TokenKind::If => "if",
            TokenKind::Impure => "impure",
            TokenKind::In => "in",
            TokenKind::Inertial => "inertial",
            TokenKind::Inout => "inout",
            TokenKind::Is => "is",
            TokenKind::Label => "label",
            TokenKind::Library => "library",
            TokenKind::Linkage => "linkage",
            TokenKind::Literal => "literal",
            TokenKind::Loop => "loop",
            TokenKind::Map => "map",
            TokenKind::Mod => "mod",
            TokenKind::Nand => "nand",
            TokenKind::New => "new",
            TokenKind::Next => "next",
            TokenKind::Nor => "nor",
            TokenKind::Not => "not",
            TokenKind::Null => "null",
            TokenKind::Of => "of",
            TokenKind::On => "on",
            TokenKind::Open => "open",
            TokenKind::Or => "or",
            TokenKind::Others => "others",
            TokenKind::Out => "out",
            TokenKind::Package => "package",
            TokenKind::Parameter => "parameter",
            TokenKind::Port => "port",
            TokenKind::Postponed => "postponed",
            TokenKind::Procedure => "procedure",
            TokenKind::Process => "process",
            TokenKind::Protected => "protected",
            TokenKind::Pure => "pure",
            TokenKind::Range => "range",
            TokenKind::Record => "record",
            TokenKind::Register => "register",
            TokenKind::Reject => "reject",
            TokenKind::Release => "release",
            TokenKind::Rem => "rem",
            TokenKind::Report => "report",
            TokenKind::Return => "return",
            TokenKind::Rol => "rol",
            TokenKind::Ror => "ror",
            TokenKind::Select => "select",
            TokenKind::Severity => "severity",
            TokenKind::Shared => "shared",
            TokenKind::Signal => "signal",
            TokenKind::Sla => "sla",
            TokenKind::Sll => "sll",
            TokenKind::Sra => "sra",
            TokenKind::Srl => "srl",
            TokenKind::Subtype => "subtype",
            TokenKind::Then => "then",
            TokenKind::To => "to",
            TokenKind::Transport => "transport",
            TokenKind::Type => "type",
            TokenKind::Unaffected => "unaffected",
            TokenKind::Units => "units",
            TokenKind::Until => "until",
            TokenKind::Use => "use",
            TokenKind::Variable => "variable",
            TokenKind::Wait => "wait",
            TokenKind::When => "when",
            TokenKind::While => "while",
            TokenKind::With => "with",
            TokenKind::Xnor => "xnor",
            TokenKind::Xor => "xor",
            _ => return None,
        };
        Some(s)
    }
}

/// Look up a reserved word. VHDL reserved words are case-insensitive.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    // The longest reserved word is `architecture`/`configuration`.
    if s.len() > 13 {
        return None;
    }
    let lower = s.to_ascii_lowercase();
    let kind = match lower.as_str() {
        "abs" => TokenKind::Abs,
        "access" => TokenKind::Access,
        "after" => TokenKind::After,
        "alias" => TokenKind::Alias,
        "all" => TokenKind::All,
        "and" => TokenKind::And,
        "architecture" => TokenKind::Architecture,
        "array" => TokenKind::Array,
        "assert" => TokenKind::Assert,
        "attribute" => TokenKind::Attribute,
        "begin" => TokenKind::Begin,
        "block" => TokenKind::Block,
        "body" => TokenKind::Body,
        "buffer" => TokenKind::Buffer,
        "bus" => TokenKind::Bus,
        "case" => TokenKind::Case,
        "component" => TokenKind::Component,
        "configuration" => TokenKind::Configuration,
        "constant" => TokenKind::Constant,
        "context" => TokenKind::Context,
        "default" => TokenKind::Default,
        "disconnect" => TokenKind::Disconnect,
        "downto" => TokenKind::Downto,
        "else" => TokenKind::Else,
        "elsif" => TokenKind::Elsif,
        "end" => TokenKind::End,
        "entity" => TokenKind::Entity,
        "exit" => TokenKind::Exit,
        "file" => TokenKind::File,
        "for" => TokenKind::For,
        "force" => TokenKind::Force,
        "function" => TokenKind::Function,
        "generate" => TokenKind::Generate,
        "generic" => TokenKind::Generic,
        "group" => TokenKind::Group,
        "guarded" => TokenKind::Guarded,
        "if" => TokenKind::If,
        "impure" => TokenKind::Impure,
        "in" => TokenKind::In,
        "inertial" => TokenKind::Inertial,
        "inout" => TokenKind::Inout,
        "is" => TokenKind::Is,
        "label" => TokenKind::Label,
        "library" => TokenKind::Library,
        "linkage" => TokenKind::Linkage,
        "literal" => TokenKind::Literal,
        "loop" => TokenKind::Loop,
        "map" => TokenKind::Map,
        "mod" => TokenKind::Mod,
        "nand" => TokenKind::Nand,
        "new" => TokenKind::New,
        "next" => TokenKind::Next,
        "nor" => TokenKind::Nor,
        "not" => TokenKind::Not,
        "null" => TokenKind::Null,
        "of" => TokenKind::Of,
        "on" => TokenKind::On,
        "open" => TokenKind::Open,
        "or" => TokenKind::Or,
        "others" => TokenKind::Others,
        "out" => TokenKind::Out,
        "package" => TokenKind::Package,
        "parameter" => TokenKind::Parameter,
        "port" => TokenKind::Port,
        "postponed" => TokenKind::Postponed,
        "procedure" => TokenKind::Procedure,
        "process" => TokenKind::Process,
        "protected" => TokenKind::Protected,
        "pure" => TokenKind::Pure,
        "range" => TokenKind::Range,
        "record" => TokenKind::Record,
        "register" => TokenKind::Register,
        "reject" => TokenKind::Reject,
        "release" => TokenKind::Release,
        "rem" => TokenKind::Rem,
        "report" => TokenKind::Report,
        "return" => TokenKind::Return,
        "rol" => TokenKind::Rol,
        "ror" => TokenKind::Ror,
        "select" => TokenKind::Select,
        "severity" => TokenKind::Severity,
        "shared" => TokenKind::Shared,
        "signal" => TokenKind::Signal,
        "sla" => TokenKind::Sla,
        "sll" => TokenKind::Sll,
        "sra" => TokenKind::Sra,
        "srl" => TokenKind::Srl,
        "subtype" => TokenKind::Subtype,
        "then" => TokenKind::Then,
        "to" => TokenKind::To,
        "transport" => TokenKind::Transport,
        "type" => TokenKind::Type,
        "unaffected" => TokenKind::Unaffected,
        "units" => TokenKind::Units,
        "until" => TokenKind::Until,
        "use" => TokenKind::Use,
        "variable" => TokenKind::Variable,
        "wait" => TokenKind::Wait,
        "when" => TokenKind::When,
        "while" => TokenKind::While,
        "with" => TokenKind::With,
        "xnor" => TokenKind::Xnor,
        "xor" => TokenKind::Xor,
        _ => return None,
    };
    Some(kind)
}
