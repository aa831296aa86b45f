//! Token contract consumed by the parsing core.
//!
//! The lexer lives upstream of this crate; it hands us an ordered sequence of
//! immutable tokens, each carrying a lexical category, the literal text, and
//! the source line it came from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of lexical categories a documentation comment lexes into.
///
/// Reconstruction treats `Indent` and `Newline` as structural whitespace and
/// gives `Colon` special spacing; everything else is an ordinary token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Word,
    Colon,
    Indent,
    Newline,
    LParen,
    RParen,
    Hash,
    Arguments,
    Returns,
    Yields,
    Raises,
    Variables,
    Noqa,
    Other,
}

impl TokenKind {
    /// Whether this category is structural whitespace (indentation or a line
    /// break) for the purposes of text reconstruction.
    pub fn is_structural_whitespace(self) -> bool {
        matches!(self, TokenKind::Indent | TokenKind::Newline)
    }
}

/// A single lexed token.
///
/// # Examples
///
/// ```rust
/// use marginalia::token::{Token, TokenKind};
/// let token = Token::new(TokenKind::Word, "Returns", 3);
/// assert_eq!(token.line, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, self.text)
    }
}
