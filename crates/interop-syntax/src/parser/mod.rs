//! Recursive-descent parser for the C# declaration subset.
//!
//! The parser models what the conversion engine edits: usings, namespaces,
//! type declarations, method declarations and attribute lists. Everything
//! else (fields, properties, method bodies, initialisers) is kept as opaque
//! token runs. Parsing never fails; problems are reported as
//! [`SyntaxErrorInfo`] values next to a tree that still prints the input
//! exactly.

mod attributes;
mod members;

use crate::grammar::SyntaxErrorInfo;
use crate::lexer::lex;
use crate::nodes::CompilationUnit;
use crate::token::Token;

/// Result of parsing a compilation unit.
#[derive(Debug, Clone)]
pub struct ParseResult {
    unit: CompilationUnit,
    errors: Vec<SyntaxErrorInfo>,
}

impl ParseResult {
    /// Returns the parsed tree.
    #[must_use]
    pub const fn unit(&self) -> &CompilationUnit {
        &self.unit
    }

    /// Consumes the result, returning the tree.
    #[must_use]
    pub fn into_unit(self) -> CompilationUnit {
        self.unit
    }

    /// Returns lexical and syntactic errors in source order.
    #[must_use]
    pub fn errors(&self) -> &[SyntaxErrorInfo] {
        &self.errors
    }

    /// Whether any error was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parses C# source text.
///
/// Preprocessor directives are kept as trivia and never evaluated, so
/// every conditional branch is parsed as ordinary code.
#[must_use]
pub fn parse(source: &str) -> ParseResult {
    let lexed = lex(source);
    let mut parser = Parser {
        source,
        tokens: lexed.tokens,
        starts: lexed.starts,
        pos: 0,
        errors: lexed.errors,
    };
    let members = parser.parse_members(false);
    let mut errors = parser.errors;
    errors.sort_by_key(|error| error.byte_range.start);
    ParseResult {
        unit: CompilationUnit::new(members, lexed.end_of_file),
        errors,
    }
}

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    starts: Vec<usize>,
    pos: usize,
    errors: Vec<SyntaxErrorInfo>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn at(&self, text: &str) -> bool {
        self.peek().is_some_and(|token| token.is(text))
    }

    fn nth_is(&self, n: usize, text: &str) -> bool {
        self.peek_nth(n).is_some_and(|token| token.is(text))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    /// Consumes `text` or reports it missing and returns a placeholder.
    fn expect(&mut self, text: &str) -> Token {
        if self.at(text) {
            if let Some(token) = self.bump() {
                return token;
            }
        }
        self.error_here(&format!("expected `{text}`"));
        Token::missing()
    }

    fn current_offset(&self) -> usize {
        self.starts.get(self.pos).copied().unwrap_or(self.source.len())
    }

    fn error_here(&mut self, message: &str) {
        let start = self.current_offset();
        let end = start + self.peek().map_or(0, Token::width);
        self.errors
            .push(SyntaxErrorInfo::at(self.source, start..end, message));
    }

    /// Consumes a balanced `open ... close` run starting at `open`.
    fn bump_balanced(&mut self, open: &str, close: &str, out: &mut Vec<Token>) {
        let mut depth = 0_usize;
        while let Some(token) = self.bump() {
            if token.is(open) {
                depth += 1;
            } else if token.is(close) {
                depth = depth.saturating_sub(1);
            }
            out.push(token);
            if depth == 0 {
                return;
            }
        }
        self.error_here(&format!("expected `{close}`"));
    }

    /// Consumes tokens up to and including a `;` outside any brackets.
    ///
    /// Stops without consuming at a closing brace that would end the
    /// enclosing block.
    fn bump_statement(&mut self, out: &mut Vec<Token>) {
        let mut depth = 0_usize;
        loop {
            let Some(token) = self.peek() else {
                self.error_here("expected `;`");
                return;
            };
            if depth == 0 && token.is("}") {
                self.error_here("expected `;`");
                return;
            }
            let is_semicolon = depth == 0 && token.is(";");
            if is_open_bracket(token) {
                depth += 1;
            } else if is_close_bracket(token) {
                depth = depth.saturating_sub(1);
            }
            if let Some(token) = self.bump() {
                out.push(token);
            }
            if is_semicolon {
                return;
            }
        }
    }
}

fn is_open_bracket(token: &Token) -> bool {
    token.is("(") || token.is("[") || token.is("{")
}

fn is_close_bracket(token: &Token) -> bool {
    token.is(")") || token.is("]") || token.is("}")
}
