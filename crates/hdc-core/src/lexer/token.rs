//! Token kinds of the documented source language

use logos::Logos;

/// The kind of token produced by the lexer
///
/// Whitespace and comments (including documentation comments) are skipped,
/// so the text between two consecutive tokens is pure trivia.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum TokenKind {
    // ========== Keywords ==========
    #[token("fun")]
    Fun,
    #[token("let")]
    Let,
    #[token("var")]
    Var,
    #[token("inout")]
    Inout,
    #[token("sink")]
    Sink,
    #[token("set")]
    Set,
    #[token("type")]
    Type,
    #[token("trait")]
    Trait,
    #[token("typealias")]
    Typealias,
    #[token("subscript")]
    Subscript,
    #[token("property")]
    Property,
    #[token("init")]
    Init,
    #[token("deinit")]
    Deinit,
    #[token("memberwise")]
    Memberwise,
    #[token("operator")]
    Operator,
    #[token("infix")]
    Infix,
    #[token("prefix")]
    Prefix,
    #[token("postfix")]
    Postfix,
    #[token("public")]
    Public,
    #[token("internal")]
    Internal,
    #[token("private")]
    Private,
    #[token("static")]
    Static,
    #[token("import")]
    Import,
    #[token("extension")]
    Extension,
    #[token("conformance")]
    Conformance,
    #[token("namespace")]
    Namespace,
    #[token("where")]
    Where,
    #[token("return")]
    Return,
    #[token("yield")]
    Yield,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("match")]
    Match,
    #[token("any")]
    KwAny,
    #[token("some")]
    KwSome,

    // ========== Literals ==========
    #[regex(r"[0-9][0-9_]*")]
    Int,
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*")]
    HexInt,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?")]
    Float,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLit,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // ========== Identifiers ==========
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", priority = 3)]
    Ident,
    #[regex(r"[\p{XID_Start}][\p{XID_Continue}]*", priority = 2)]
    UnicodeIdent,

    // ========== Operators ==========
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("!")]
    Not,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("?")]
    Question,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,

    // ========== Delimiters ==========
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("..<")]
    HalfOpenRange,
    #[token("...")]
    ClosedRange,
    #[token("@")]
    At,

    /// Lexer error - a character no rule accepts
    Error,
}

impl TokenKind {
    /// Returns true if this token is a keyword
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Fun
                | Self::Let
                | Self::Var
                | Self::Inout
                | Self::Sink
                | Self::Set
                | Self::Type
                | Self::Trait
                | Self::Typealias
                | Self::Subscript
                | Self::Property
                | Self::Init
                | Self::Deinit
                | Self::Memberwise
                | Self::Operator
                | Self::Infix
                | Self::Prefix
                | Self::Postfix
                | Self::Public
                | Self::Internal
                | Self::Private
                | Self::Static
                | Self::Import
                | Self::Extension
                | Self::Conformance
                | Self::Namespace
                | Self::Where
                | Self::Return
                | Self::Yield
                | Self::If
                | Self::Else
                | Self::While
                | Self::For
                | Self::In
                | Self::Match
                | Self::KwAny
                | Self::KwSome
                | Self::True
                | Self::False
        )
    }

    /// Returns true if this token can open a declaration
    #[must_use]
    pub const fn is_declaration_introducer(&self) -> bool {
        matches!(
            self,
            Self::Fun
                | Self::Let
                | Self::Var
                | Self::Inout
                | Self::Sink
                | Self::Type
                | Self::Trait
                | Self::Typealias
                | Self::Subscript
                | Self::Property
                | Self::Init
                | Self::Operator
                | Self::Public
                | Self::Internal
                | Self::Private
                | Self::Static
                | Self::Extension
                | Self::Conformance
                | Self::Namespace
                | Self::Import
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Fun => "fun",
            Self::Let => "let",
            Self::Var => "var",
            Self::Inout => "inout",
            Self::Sink => "sink",
            Self::Set => "set",
            Self::Type => "type",
            Self::Trait => "trait",
            Self::Typealias => "typealias",
            Self::Subscript => "subscript",
            Self::Property => "property",
            Self::Init => "init",
            Self::Deinit => "deinit",
            Self::Memberwise => "memberwise",
            Self::Operator => "operator",
            Self::Infix => "infix",
            Self::Prefix => "prefix",
            Self::Postfix => "postfix",
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Private => "private",
            Self::Static => "static",
            Self::Import => "import",
            Self::Extension => "extension",
            Self::Conformance => "conformance",
            Self::Namespace => "namespace",
            Self::Where => "where",
            Self::Return => "return",
            Self::Yield => "yield",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::In => "in",
            Self::Match => "match",
            Self::KwAny => "any",
            Self::KwSome => "some",
            Self::Int => "integer",
            Self::HexInt => "hex integer",
            Self::Float => "float",
            Self::StringLit => "string",
            Self::True => "true",
            Self::False => "false",
            Self::Ident | Self::UnicodeIdent => "identifier",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Eq => "=",
            Self::EqEq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Not => "!",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Tilde => "~",
            Self::Question => "?",
            Self::Arrow => "->",
            Self::FatArrow => "=>",
            Self::PlusEq => "+=",
            Self::MinusEq => "-=",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::ColonColon => "::",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::HalfOpenRange => "..<",
            Self::ClosedRange => "...",
            Self::At => "@",
            Self::Error => "error",
        };
        f.write_str(text)
    }
}
