use log::trace;
use serde::Serialize;
use std::fmt;

/// The closed set of token kinds produced by the [`Scanner`](crate::scanner::Scanner).
///
/// Names follow the upper-case spelling used when tokens are printed, so
/// `TokenKind::NOT_EQ` renders as `NOT_EQ`.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// A character the language does not recognise
    ILLEGAL,

    /// End of input; repeated forever once reached
    EOF,

    /// A user-defined name
    IDENT,

    /// A run of decimal digits
    INT,

    /// '='
    ASSIGN,

    /// '+'
    PLUS,

    /// '-'
    MINUS,

    /// '!'
    BANG,

    /// '*'
    ASTERISK,

    /// '/'
    SLASH,

    /// '<'
    LT,

    /// '>'
    GT,

    /// '=='
    EQ,

    /// '!='
    NOT_EQ,

    /// ','
    COMMA,

    /// ';'
    SEMICOLON,

    /// '('
    LPAREN,

    /// ')'
    RPAREN,

    /// '{'
    LBRACE,

    /// '}'
    RBRACE,

    /// 'fn'
    FUNCTION,

    /// 'let'
    LET,

    /// 'true'
    TRUE,

    /// 'false'
    FALSE,

    /// 'if'
    IF,

    /// 'else'
    ELSE,

    /// 'return'
    RETURN,
}

impl TokenKind {
    /// Upper-case name of the kind, as printed by `tokenize`.
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::ILLEGAL => "ILLEGAL",
            TokenKind::EOF => "EOF",
            TokenKind::IDENT => "IDENT",
            TokenKind::INT => "INT",
            TokenKind::ASSIGN => "ASSIGN",
            TokenKind::PLUS => "PLUS",
            TokenKind::MINUS => "MINUS",
            TokenKind::BANG => "BANG",
            TokenKind::ASTERISK => "ASTERISK",
            TokenKind::SLASH => "SLASH",
            TokenKind::LT => "LT",
            TokenKind::GT => "GT",
            TokenKind::EQ => "EQ",
            TokenKind::NOT_EQ => "NOT_EQ",
            TokenKind::COMMA => "COMMA",
            TokenKind::SEMICOLON => "SEMICOLON",
            TokenKind::LPAREN => "LPAREN",
            TokenKind::RPAREN => "RPAREN",
            TokenKind::LBRACE => "LBRACE",
            TokenKind::RBRACE => "RBRACE",
            TokenKind::FUNCTION => "FUNCTION",
            TokenKind::LET => "LET",
            TokenKind::TRUE => "TRUE",
            TokenKind::FALSE => "FALSE",
            TokenKind::IF => "IF",
            TokenKind::ELSE => "ELSE",
            TokenKind::RETURN => "RETURN",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scanned token. The literal borrows from the source buffer, except for
/// the EOF sentinel whose literal is the static text `<EOF>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    /// The category of this token.
    pub kind: TokenKind,

    /// The exact source text that produced this token.
    pub literal: &'a str,
}

impl<'a> Token<'a> {
    /// Literal carried by every EOF token.
    pub const EOF_LITERAL: &'static str = "<EOF>";

    pub fn new(kind: TokenKind, literal: &'a str) -> Self {
        trace!("Creating new token: kind={}, literal={:?}", kind, literal);

        Self { kind, literal }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::EOF, Self::EOF_LITERAL)
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.literal)
    }
}
