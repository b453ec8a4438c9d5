//! Lossless C# lexer.
//!
//! The lexer splits source text into tokens and trivia, then attaches the
//! trivia to tokens following the convention described in [`crate::trivia`].
//! It never fails: characters it cannot classify become
//! [`TokenKind::Unknown`] tokens and are reported alongside the output.

use std::mem;

use crate::grammar::SyntaxErrorInfo;
use crate::token::{KEYWORDS, Token, TokenKind};
use crate::trivia::{Trivia, TriviaKind};

/// Operators longer than one character, longest first.
const MULTI_CHAR_PUNCTUATION: &[&str] = &[
    "??=", "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "::", "++", "--", "->", "+=", "-=",
    "*=", "/=", "%=", "&=", "|=", "^=",
];

const SINGLE_CHAR_PUNCTUATION: &str = "{}[]();,.:?+-*/%&|^!~<>=";

/// Output of [`lex`].
#[derive(Debug)]
pub(crate) struct Lexed {
    /// Tokens in source order, trivia attached.
    pub tokens: Vec<Token>,
    /// Byte offset of each token's text.
    pub starts: Vec<usize>,
    /// Zero-width token holding the trivia after the last token.
    pub end_of_file: Token,
    /// Lexical errors.
    pub errors: Vec<SyntaxErrorInfo>,
}

enum Piece {
    Trivia(Trivia),
    Token {
        kind: TokenKind,
        start: usize,
        end: usize,
    },
}

/// Lexes `source` into tokens with attached trivia.
pub(crate) fn lex(source: &str) -> Lexed {
    let mut lexer = Lexer {
        source,
        pos: 0,
        at_line_start: true,
        pieces: Vec::new(),
        errors: Vec::new(),
    };
    lexer.scan();
    let Lexer { pieces, errors, .. } = lexer;
    let (tokens, starts, end_of_file) = attach(source, pieces);
    Lexed {
        tokens,
        starts,
        end_of_file,
        errors,
    }
}

fn attach(source: &str, pieces: Vec<Piece>) -> (Vec<Token>, Vec<usize>, Token) {
    let mut tokens = Vec::new();
    let mut starts = Vec::new();
    let mut leading = Vec::new();
    let mut pieces = pieces.into_iter().peekable();
    while let Some(piece) = pieces.next() {
        match piece {
            Piece::Trivia(trivia) => leading.push(trivia),
            Piece::Token { kind, start, end } => {
                let mut trailing = Vec::new();
                while let Some(Piece::Trivia(trivia)) = pieces.next_if(
                    |next| matches!(next, Piece::Trivia(trivia) if trivia.directive().is_none()),
                ) {
                    let ends_line = trivia.is_end_of_line();
                    trailing.push(trivia);
                    if ends_line {
                        break;
                    }
                }
                let text = source.get(start..end).unwrap_or_default();
                tokens.push(
                    Token::new(kind, text)
                        .with_leading_trivia(mem::take(&mut leading))
                        .with_trailing_trivia(trailing),
                );
                starts.push(start);
            }
        }
    }
    let end_of_file = Token::new(TokenKind::EndOfFile, "").with_leading_trivia(leading);
    (tokens, starts, end_of_file)
}

struct Lexer<'s> {
    source: &'s str,
    pos: usize,
    at_line_start: bool,
    pieces: Vec<Piece>,
    errors: Vec<SyntaxErrorInfo>,
}

impl Lexer<'_> {
    fn rest(&self) -> &str {
        self.source.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.bump();
        }
    }

    fn text_from(&self, start: usize) -> &str {
        self.source.get(start..self.pos).unwrap_or_default()
    }

    fn error(&mut self, start: usize, message: &str) {
        let end = self.pos.max(start);
        self.errors
            .push(SyntaxErrorInfo::at(self.source, start..end, message));
    }

    fn push_trivia(&mut self, kind: TriviaKind, start: usize) {
        let trivia = Trivia::new(kind, self.text_from(start));
        self.pieces.push(Piece::Trivia(trivia));
    }

    fn scan(&mut self) {
        while let Some(c) = self.peek() {
            let start = self.pos;
            match c {
                '\r' | '\n' => {
                    self.bump();
                    if c == '\r' && self.peek() == Some('\n') {
                        self.bump();
                    }
                    self.push_trivia(TriviaKind::EndOfLine, start);
                    self.at_line_start = true;
                }
                c if is_inline_whitespace(c) => {
                    self.bump_while(is_inline_whitespace);
                    self.push_trivia(TriviaKind::Whitespace, start);
                }
                '/' if self.peek_nth(1) == Some('/') => {
                    self.bump_while(|c| !is_newline(c));
                    self.push_trivia(TriviaKind::SingleLineComment, start);
                    self.at_line_start = false;
                }
                '/' if self.peek_nth(1) == Some('*') => {
                    self.scan_block_comment(start);
                    self.push_trivia(TriviaKind::MultiLineComment, start);
                    self.at_line_start = false;
                }
                '#' if self.at_line_start => {
                    self.bump_while(|c| !is_newline(c));
                    let directive = Trivia::directive_from_source(self.text_from(start));
                    self.pieces.push(Piece::Trivia(directive));
                    self.at_line_start = false;
                }
                _ => {
                    let kind = self.scan_token(c, start);
                    self.pieces.push(Piece::Token {
                        kind,
                        start,
                        end: self.pos,
                    });
                    self.at_line_start = false;
                }
            }
        }
    }

    fn scan_block_comment(&mut self, start: usize) {
        match self.rest().get(2..).and_then(|body| body.find("*/")) {
            Some(offset) => self.pos += offset + 4,
            None => {
                self.pos = self.source.len();
                self.error(start, "unterminated block comment");
            }
        }
    }

    fn scan_token(&mut self, c: char, start: usize) -> TokenKind {
        if let Some((dollars, verbatim, prefix_len)) = self.string_prefix() {
            self.pos += prefix_len;
            self.scan_string(dollars, verbatim, start);
            return TokenKind::StringLiteral;
        }
        if c == '@' && self.peek_nth(1).is_some_and(is_identifier_start) {
            self.bump();
            self.bump_while(is_identifier_part);
            return TokenKind::Identifier;
        }
        if is_identifier_start(c) {
            self.bump_while(is_identifier_part);
            if KEYWORDS.contains(&self.text_from(start)) {
                return TokenKind::Keyword;
            }
            return TokenKind::Identifier;
        }
        if c.is_ascii_digit() || (c == '.' && self.peek_nth(1).is_some_and(|d| d.is_ascii_digit()))
        {
            self.scan_number();
            return TokenKind::NumericLiteral;
        }
        if c == '\'' {
            self.scan_char(start);
            return TokenKind::CharacterLiteral;
        }
        if let Some(operator) = MULTI_CHAR_PUNCTUATION
            .iter()
            .find(|operator| self.rest().starts_with(**operator))
        {
            self.pos += operator.len();
            return TokenKind::Punctuation;
        }
        self.bump();
        if SINGLE_CHAR_PUNCTUATION.contains(c) {
            return TokenKind::Punctuation;
        }
        self.error(start, &format!("unexpected character `{c}`"));
        TokenKind::Unknown
    }

    /// Recognises `"`, `@"`, `$"`, `$@"`, `@$"` and `$$"""` openers.
    ///
    /// Returns the number of `$`, whether `@` was present, and the prefix
    /// length in bytes (excluding the quote).
    fn string_prefix(&self) -> Option<(usize, bool, usize)> {
        let prefix: String = self
            .rest()
            .chars()
            .take_while(|c| *c == '$' || *c == '@')
            .collect();
        let ats = prefix.matches('@').count();
        let next = self.rest().get(prefix.len()..)?.chars().next();
        (next == Some('"') && ats <= 1)
            .then(|| (prefix.matches('$').count(), ats == 1, prefix.len()))
    }

    fn scan_string(&mut self, dollars: usize, verbatim: bool, start: usize) {
        let quotes = self.rest().chars().take_while(|c| *c == '"').count();
        if quotes >= 3 {
            self.pos += quotes;
            let closing = "\"".repeat(quotes);
            match self.rest().find(&closing) {
                Some(offset) => {
                    self.pos += offset;
                    self.bump_while(|c| c == '"');
                }
                None => {
                    self.pos = self.source.len();
                    self.error(start, "unterminated raw string literal");
                }
            }
            return;
        }
        self.bump();
        loop {
            let Some(c) = self.peek() else {
                self.error(start, "unterminated string literal");
                return;
            };
            match c {
                '"' => {
                    self.bump();
                    if verbatim && self.peek() == Some('"') {
                        self.bump();
                        continue;
                    }
                    return;
                }
                '\\' if !verbatim => {
                    self.bump();
                    if self.peek().is_some_and(|next| !is_newline(next)) {
                        self.bump();
                    }
                }
                c if is_newline(c) && !verbatim => {
                    self.error(start, "newline in string literal");
                    return;
                }
                '{' if dollars > 0 => {
                    self.bump();
                    if self.peek() == Some('{') {
                        self.bump();
                    } else {
                        self.scan_interpolation_hole();
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn scan_interpolation_hole(&mut self) {
        let mut depth = 1_usize;
        while let Some(c) = self.peek() {
            let start = self.pos;
            if let Some((dollars, verbatim, prefix_len)) = self.string_prefix() {
                self.pos += prefix_len;
                self.scan_string(dollars, verbatim, start);
                continue;
            }
            match c {
                '\'' => self.scan_char(start),
                '{' => {
                    depth += 1;
                    self.bump();
                }
                '}' => {
                    self.bump();
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn scan_char(&mut self, start: usize) {
        self.bump();
        loop {
            match self.peek() {
                None => {
                    self.error(start, "unterminated character literal");
                    return;
                }
                Some(c) if is_newline(c) => {
                    self.error(start, "newline in character literal");
                    return;
                }
                Some('\\') => {
                    self.bump();
                    if self.peek().is_some_and(|next| !is_newline(next)) {
                        self.bump();
                    }
                }
                Some('\'') => {
                    self.bump();
                    return;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn scan_number(&mut self) {
        let is_hex = self.rest().starts_with("0x") || self.rest().starts_with("0X");
        let mut previous = None;
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-')
                && !is_hex
                && matches!(previous, Some('e' | 'E'))
                && self.peek_nth(1).is_some_and(|d| d.is_ascii_digit());
            let fraction = c == '.' && self.peek_nth(1).is_some_and(|d| d.is_ascii_digit());
            if !(c.is_ascii_alphanumeric() || c == '_' || exponent_sign || fraction) {
                break;
            }
            previous = Some(c);
            self.bump();
        }
    }
}

const fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

fn is_inline_whitespace(c: char) -> bool {
    !is_newline(c) && (c.is_whitespace() || c == '\u{feff}')
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_identifier_part(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn texts(source: &str) -> Vec<String> {
        lex(source)
            .tokens
            .iter()
            .map(|token| token.text().to_owned())
            .collect()
    }

    fn reprint(lexed: &Lexed) -> String {
        let mut out: String = lexed.tokens.iter().map(ToString::to_string).collect();
        out.push_str(&lexed.end_of_file.to_string());
        out
    }

    #[rstest]
    #[case("a.b", &["a", ".", "b"])]
    #[case("x => y", &["x", "=>", "y"])]
    #[case("A::B", &["A", "::", "B"])]
    #[case("1.5e-3f", &["1.5e-3f"])]
    #[case("1.ToString()", &["1", ".", "ToString", "(", ")"])]
    #[case("@class", &["@class"])]
    #[case("List<List<int>>", &["List", "<", "List", "<", "int", ">", ">"])]
    fn splits_tokens(#[case] source: &str, #[case] expected: &[&str]) {
        assert_eq!(texts(source), expected);
    }

    #[rstest]
    #[case(r#""a\"b""#)]
    #[case(r#"@"C:\dir""name""#)]
    #[case(r#"$"{x} and {y:N2}""#)]
    #[case(r#"$"{(a ? "x" : "y")}""#)]
    #[case(r#"$@"{{literal}} {value}""#)]
    #[case(r#""""raw "quoted" text""""#)]
    fn string_literals_are_single_tokens(#[case] source: &str) {
        let lexed = lex(source);
        assert_eq!(lexed.tokens.len(), 1, "{source}");
        assert_eq!(
            lexed.tokens.first().map(Token::kind),
            Some(TokenKind::StringLiteral)
        );
        assert!(lexed.errors.is_empty());
    }

    #[test]
    fn trailing_trivia_stops_after_first_newline() {
        let lexed = lex("a // note\n\n  b");
        let first = lexed.tokens.first().expect("token a");
        assert_eq!(first.to_string(), "a // note\n");
        let second = lexed.tokens.get(1).expect("token b");
        assert_eq!(second.to_string(), "\n  b");
    }

    #[test]
    fn directives_are_leading_trivia_at_line_start() {
        let lexed = lex("a\n#if DEBUG\nb\n#endif\n");
        let second = lexed.tokens.get(1).expect("token b");
        let directive = second
            .leading_trivia()
            .iter()
            .find_map(Trivia::directive)
            .expect("directive");
        assert_eq!(directive.kind().condition(), Some("DEBUG"));
        assert_eq!(lexed.end_of_file.to_string(), "#endif\n");
    }

    #[rstest]
    #[case("")]
    #[case("\u{feff}class C { }\r\n")]
    #[case("/* open")]
    #[case("x = \"unterminated\ny;")]
    #[case("a ` b")]
    #[case("#region r\r\nstatic extern int M(); // tail\r\n#endregion")]
    fn lexing_is_lossless(#[case] source: &str) {
        assert_eq!(reprint(&lex(source)), source);
    }

    #[rstest]
    #[case("a ` b", "unexpected character ```")]
    #[case("/* open", "unterminated block comment")]
    #[case("'x", "unterminated character literal")]
    fn reports_lexical_errors(#[case] source: &str, #[case] message: &str) {
        let lexed = lex(source);
        let messages: Vec<&str> = lexed.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec![message]);
    }
}
