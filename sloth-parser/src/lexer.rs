//! Tokenizer built on top of [`logos`].

use logos::Logos;
use std::{fmt, ops::Range};

#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // literals
    #[regex("[0-9]+")]
    Int,
    #[regex(r#""[^"]*""#)]
    Str,
    /// A string literal missing its closing quote. Runs to end of input.
    #[regex(r#""[^"]*"#)]
    UnterminatedStr,

    // identifiers
    #[regex("[a-zA-Z_]+")]
    Ident,

    // unary operators
    #[token("!")]
    Bang,

    // binary operators
    // - arithmetics
    #[token("+")]
    Plus,
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    // - assignment
    #[token("=")]
    Assign,
    // - equality
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    NotEquals,
    // - ordering
    #[token(">")]
    GreaterThan,
    #[token("<")]
    LessThan,

    // punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,

    // keywords
    #[token("fn")]
    Fn,
    #[token("let")]
    Let,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("return")]
    Return,

    // misc
    #[regex(r"[ \t\n\r]+", logos::skip)]
    #[error]
    Illegal,

    /// Only generated when the underlying lexer is exhausted.
    Eof,
}

/// Binding power of prefix operators (`!` and unary `-`).
pub const PREFIX_BP: u8 = 12;

impl TokenKind {
    /// Returns the infix binding power or `None` if the token cannot continue an expression.
    /// Binding power `0` is reserved for accepting any expression.
    /// Every operator is left associative, so the right binding power is always `left + 1`.
    pub fn infix_bp(self) -> Option<(u8, u8)> {
        match self {
            /* Equality */
            TokenKind::EqualsEquals | TokenKind::NotEquals => Some((4, 5)),
            /* Relational */
            TokenKind::GreaterThan | TokenKind::LessThan => Some((6, 7)),
            /* Additive */
            TokenKind::Plus | TokenKind::Minus => Some((8, 9)),
            /* Multiplicative */
            TokenKind::Asterisk | TokenKind::Slash => Some((10, 11)),
            /* Call and index */
            TokenKind::OpenParen | TokenKind::OpenBracket => Some((14, 15)),
            _ => None,
        }
    }

    /// Upper case name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Int => "INT",
            TokenKind::Str => "STRING",
            TokenKind::UnterminatedStr => "UNTERMINATED_STRING",
            TokenKind::Ident => "IDENT",
            TokenKind::Bang => "BANG",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::Slash => "SLASH",
            TokenKind::Assign => "ASSIGN",
            TokenKind::EqualsEquals => "EQ",
            TokenKind::NotEquals => "NOT_EQ",
            TokenKind::GreaterThan => "GT",
            TokenKind::LessThan => "LT",
            TokenKind::OpenParen => "LPAREN",
            TokenKind::CloseParen => "RPAREN",
            TokenKind::OpenBrace => "LBRACE",
            TokenKind::CloseBrace => "RBRACE",
            TokenKind::OpenBracket => "LBRACKET",
            TokenKind::CloseBracket => "RBRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Semi => "SEMICOLON",
            TokenKind::Colon => "COLON",
            TokenKind::Fn => "FUNCTION",
            TokenKind::Let => "LET",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token. Owns its literal text so the AST can outlive the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token. String literals exclude their quotes.
    pub literal: String,
    /// Byte range in the source.
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }
}

/// Produces [`Token`]s on demand from a source string.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }

    /// Returns the next token and advances the cursor.
    /// Once the input is exhausted, every call returns an [`TokenKind::Eof`] token.
    pub fn next_token(&mut self) -> Token {
        match self.inner.next() {
            Some(kind) => {
                let slice = self.inner.slice();
                let literal = match kind {
                    TokenKind::Str => &slice[1..slice.len() - 1],
                    TokenKind::UnterminatedStr => &slice[1..],
                    _ => slice,
                };
                Token::new(kind, literal, self.inner.span())
            }
            None => {
                let end = self.inner.source().len();
                Token::new(TokenKind::Eof, "", end..end)
            }
        }
    }
}

/// Iterates over every token before [`TokenKind::Eof`].
impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}
