//! Tokens: the leaves of the syntax tree.

use std::fmt;
use std::sync::Arc;

use crate::trivia::{Trivia, TriviaList};

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A name, including verbatim `@name` identifiers and contextual
    /// keywords such as `partial` or `record`.
    Identifier,
    /// A reserved C# keyword.
    Keyword,
    /// A numeric literal.
    NumericLiteral,
    /// A string literal of any flavour.
    StringLiteral,
    /// A character literal.
    CharacterLiteral,
    /// An operator or punctuator.
    Punctuation,
    /// A character the lexer could not classify.
    Unknown,
    /// Zero-width token that carries the trivia at the end of a file.
    EndOfFile,
    /// Zero-width placeholder inserted by error recovery.
    Missing,
}

/// An immutable token with its surrounding trivia.
///
/// Cloning is cheap: text and trivia are shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    text: Arc<str>,
    leading: TriviaList,
    trailing: TriviaList,
}

impl Token {
    /// Creates a token without trivia.
    #[must_use]
    pub fn new(kind: TokenKind, text: &str) -> Self {
        Self {
            kind,
            text: Arc::from(text),
            leading: TriviaList::default(),
            trailing: TriviaList::default(),
        }
    }

    /// Creates an identifier token.
    #[must_use]
    pub fn identifier(text: &str) -> Self {
        Self::new(TokenKind::Identifier, text)
    }

    /// Creates a keyword token.
    #[must_use]
    pub fn keyword(text: &str) -> Self {
        Self::new(TokenKind::Keyword, text)
    }

    /// Creates a punctuation token.
    #[must_use]
    pub fn punctuation(text: &str) -> Self {
        Self::new(TokenKind::Punctuation, text)
    }

    /// Creates a zero-width placeholder token.
    #[must_use]
    pub fn missing() -> Self {
        Self::new(TokenKind::Missing, "")
    }

    /// Returns the token kind.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the token text without trivia.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the token text equals `text`.
    #[must_use]
    pub fn is(&self, text: &str) -> bool {
        &*self.text == text
    }

    /// Whether the token can name something: identifiers and keywords.
    #[must_use]
    pub const fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Identifier | TokenKind::Keyword)
    }

    /// Leading trivia.
    #[must_use]
    pub const fn leading_trivia(&self) -> &TriviaList {
        &self.leading
    }

    /// Trailing trivia.
    #[must_use]
    pub const fn trailing_trivia(&self) -> &TriviaList {
        &self.trailing
    }

    /// Returns a copy with the leading trivia replaced.
    #[must_use]
    pub fn with_leading_trivia(&self, trivia: impl Into<TriviaList>) -> Self {
        Self {
            leading: trivia.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with the trailing trivia replaced.
    #[must_use]
    pub fn with_trailing_trivia(&self, trivia: impl Into<TriviaList>) -> Self {
        Self {
            trailing: trivia.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with a single space of trailing trivia.
    #[must_use]
    pub fn with_trailing_space(&self) -> Self {
        self.with_trailing_trivia(vec![Trivia::whitespace(" ")])
    }

    /// Length of the token text in bytes.
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.len()
    }

    /// Length of the leading trivia in bytes.
    #[must_use]
    pub fn leading_width(&self) -> usize {
        self.leading.iter().map(|piece| piece.text().len()).sum()
    }

    /// Length of the trailing trivia in bytes.
    #[must_use]
    pub fn trailing_width(&self) -> usize {
        self.trailing.iter().map(|piece| piece.text().len()).sum()
    }

    /// Length of the token including trivia in bytes.
    #[must_use]
    pub fn full_width(&self) -> usize {
        self.leading_width() + self.width() + self.trailing_width()
    }

    /// Iterates every trivia piece, leading then trailing.
    pub fn trivia(&self) -> impl Iterator<Item = &Trivia> {
        self.leading.iter().chain(self.trailing.iter())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in self.leading.iter() {
            f.write_str(piece.text())?;
        }
        f.write_str(&self.text)?;
        for piece in self.trailing.iter() {
            f.write_str(piece.text())?;
        }
        Ok(())
    }
}

/// Reserved C# keywords. Contextual keywords lex as identifiers.
pub(crate) const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_trivia() {
        let token = Token::keyword("extern")
            .with_leading_trivia(vec![Trivia::whitespace("    ")])
            .with_trailing_trivia(vec![Trivia::whitespace(" ")]);
        assert_eq!(token.to_string(), "    extern ");
        assert_eq!(token.full_width(), 11);
        assert_eq!(token.width(), 6);
    }

    #[test]
    fn trivia_replacement_leaves_original_untouched() {
        let original = Token::identifier("M").with_trailing_space();
        let changed = original.with_trailing_trivia(TriviaList::default());
        assert_eq!(original.to_string(), "M ");
        assert_eq!(changed.to_string(), "M");
    }
}
