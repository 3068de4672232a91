//! Module `scanner` implements the single-pass tokenizer for the Monkey language.
//!
//! It walks an immutable `&str` buffer and hands out one [`Token`] per call to
//! [`Scanner::next_token`]. Lexemes are sliced straight out of the source, so
//! scanning never allocates.
//!
//! # Rules
//!
//! - Whitespace (`' '`, `'\t'`, `'\r'`, `'\n'`) is skipped before every token.
//! - Identifiers are maximal runs of ASCII letters and `_`; a run that exactly
//!   matches a keyword yields that keyword's kind instead of `IDENT`.
//! - Integers are maximal runs of decimal digits. The text is kept as-is and
//!   converted by the parser.
//! - `==` and `!=` need one byte of lookahead after `=` / `!`.
//! - Anything else becomes an `ILLEGAL` token carrying that one character, and
//!   the cursor still moves forward. The scanner never fails.
//! - Once the input is exhausted every call returns an `EOF` token.
//!
//! # Example
//!
//! ```rust
//! use monkey_interpreter::scanner::Scanner;
//! use monkey_interpreter::token::TokenKind;
//!
//! let mut scanner = Scanner::new("let x = 5;");
//! assert_eq!(scanner.next_token().kind, TokenKind::LET);
//! ```

use crate::token::{Token, TokenKind};
use log::{debug, info};
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile-time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "fn"     => TokenKind::FUNCTION,
    "let"    => TokenKind::LET,
    "true"   => TokenKind::TRUE,
    "false"  => TokenKind::FALSE,
    "if"     => TokenKind::IF,
    "else"   => TokenKind::ELSE,
    "return" => TokenKind::RETURN,
};

/// Resolve an identifier-shaped word to its keyword kind, or `IDENT`.
pub fn lookup_ident(word: &str) -> TokenKind {
    KEYWORDS.get(word).copied().unwrap_or(TokenKind::IDENT)
}

/// Tokenizer over a borrowed source buffer. The lifetime `'a` ties every
/// emitted token's literal back to that buffer.
pub struct Scanner<'a> {
    src: &'a str, // entire input line or file
    start: usize, // byte index of the first byte of the current lexeme
    curr: usize,  // byte index one past the last byte examined
    done: bool,   // iterator already yielded EOF
}

impl<'a> Scanner<'a> {
    /// Create a new scanner over `src`.
    #[inline]
    pub fn new(src: &'a str) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            curr: 0,
            done: false,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Current byte, or `0` past the end.
    #[inline(always)]
    fn peek(&self) -> u8 {
        self.src.as_bytes().get(self.curr).copied().unwrap_or(0)
    }

    /// Byte after [`peek`](Self::peek), or `0` past the end.
    #[inline(always)]
    fn peek_next(&self) -> u8 {
        self.src.as_bytes().get(self.curr + 1).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), b' ' | b'\t' | b'\r' | b'\n') {
            self.curr += 1;
        }
    }

    /// Slice of the source covering the current lexeme.
    #[inline(always)]
    fn lexeme(&self) -> &'a str {
        &self.src[self.start..self.curr]
    }

    /// Consume one byte and emit `kind`.
    #[inline(always)]
    fn single(&mut self, kind: TokenKind) -> Token<'a> {
        self.curr += 1;
        Token::new(kind, self.lexeme())
    }

    /// Emit `double` if the byte after the current one is `=`, otherwise
    /// `single`.
    #[inline(always)]
    fn with_equals(&mut self, single: TokenKind, double: TokenKind) -> Token<'a> {
        if self.peek_next() == b'=' {
            self.curr += 2;
            Token::new(double, self.lexeme())
        } else {
            self.single(single)
        }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan exactly one token. Past the end of input this keeps returning
    /// EOF.
    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_whitespace();
        self.start = self.curr;

        if self.is_at_end() {
            return Token::eof();
        }

        let token = match self.peek() {
            // ── structural ──────────────────────────────────────────────
            b'(' => self.single(TokenKind::LPAREN),
            b')' => self.single(TokenKind::RPAREN),
            b'{' => self.single(TokenKind::LBRACE),
            b'}' => self.single(TokenKind::RBRACE),
            b',' => self.single(TokenKind::COMMA),
            b';' => self.single(TokenKind::SEMICOLON),

            // ── operators ───────────────────────────────────────────────
            b'+' => self.single(TokenKind::PLUS),
            b'-' => self.single(TokenKind::MINUS),
            b'*' => self.single(TokenKind::ASTERISK),
            b'/' => self.single(TokenKind::SLASH),
            b'<' => self.single(TokenKind::LT),
            b'>' => self.single(TokenKind::GT),
            b'=' => self.with_equals(TokenKind::ASSIGN, TokenKind::EQ),
            b'!' => self.with_equals(TokenKind::BANG, TokenKind::NOT_EQ),

            // ── literals / identifiers ──────────────────────────────────
            b'0'..=b'9' => self.scan_integer(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(),

            // ── unrecognised ────────────────────────────────────────────
            _ => self.scan_illegal(),
        };

        debug!("Scanned token {}", token);

        token
    }

    fn scan_integer(&mut self) -> Token<'a> {
        while self.peek().is_ascii_digit() {
            self.curr += 1;
        }

        Token::new(TokenKind::INT, self.lexeme())
    }

    fn scan_identifier(&mut self) -> Token<'a> {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphabetic() || c == b'_'
        } {
            self.curr += 1;
        }

        let word: &'a str = self.lexeme();

        Token::new(lookup_ident(word), word)
    }

    /// Emit the whole (possibly multi-byte) character as ILLEGAL so the
    /// literal stays on a char boundary.
    fn scan_illegal(&mut self) -> Token<'a> {
        let width: usize = self.src[self.curr..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);

        self.curr += width;

        Token::new(TokenKind::ILLEGAL, self.lexeme())
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    /// Yields every token up to and including the first EOF.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let token: Token<'a> = self.next_token();

        if token.kind == TokenKind::EOF {
            self.done = true;
        }

        Some(token)
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
