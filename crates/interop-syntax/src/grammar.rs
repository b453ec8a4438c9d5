//! Tree-sitter parsing wrapper with error recovery.
//!
//! The declaration parser in [`crate::parser`] only models the constructs
//! the conversion engine edits. This module wraps the full Tree-sitter C#
//! grammar so produced text can be checked against the complete language.

use std::ops::Range;

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::position::{offset_to_one_based, point_to_one_based};

/// Result of parsing source code with a Tree-sitter grammar.
///
/// Tree-sitter is error-tolerant, so a parse result may contain both a
/// valid tree and error nodes.
#[derive(Debug)]
pub struct GrammarTree {
    tree: tree_sitter::Tree,
    source: String,
    language: SupportedLanguage,
}

impl GrammarTree {
    /// Returns the parsed syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// Returns the source code that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the language of the parsed code.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns whether the tree contains ERROR or MISSING nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        has_error_nodes(self.tree.root_node())
    }

    /// Collects all syntax errors found in the tree.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &self.source, &mut errors);
        errors
    }
}

/// Information about a syntax error found during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte range of the error in the source.
    pub byte_range: Range<usize>,
    /// Line number (one-based) where the error starts.
    pub line: u32,
    /// Column number (one-based) where the error starts.
    pub column: u32,
    /// A snippet of the problematic source text.
    pub context: String,
    /// Human-readable description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    /// Creates an error for a byte range of `source`.
    pub(crate) fn at(source: &str, byte_range: Range<usize>, message: &str) -> Self {
        let (line, column) = offset_to_one_based(source, byte_range.start);
        Self {
            context: context_snippet(source, &byte_range),
            byte_range,
            line,
            column,
            message: message.to_owned(),
        }
    }

    fn from_node(node: tree_sitter::Node<'_>, source: &str) -> Self {
        let byte_range = node.byte_range();
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "syntax error".to_owned()
        };
        let (line, column) = point_to_one_based(node.start_position());
        Self {
            context: context_snippet(source, &byte_range),
            byte_range,
            line,
            column,
            message,
        }
    }
}

impl std::fmt::Display for SyntaxErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// The text of the error, truncated if too long.
fn context_snippet(source: &str, byte_range: &Range<usize>) -> String {
    source
        .get(byte_range.clone())
        .map(|s| {
            if s.len() > 50 {
                let truncated: String = s.chars().take(47).collect();
                format!("{truncated}...")
            } else {
                s.to_owned()
            }
        })
        .unwrap_or_default()
}

/// Tree-sitter parser wrapper for a specific language.
pub struct GrammarParser {
    inner: tree_sitter::Parser,
    language: SupportedLanguage,
}

impl GrammarParser {
    /// Creates a new parser for the given language.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tree-sitter parser cannot be initialised
    /// with the language grammar.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.tree_sitter_language())
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;

        Ok(Self { inner, language })
    }

    /// Returns the language this parser is configured for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Parses source code.
    ///
    /// # Errors
    ///
    /// Returns an error if the parser fails to produce a syntax tree. This
    /// is rare and typically indicates a parser configuration issue.
    pub fn parse(&mut self, source: &str) -> Result<GrammarTree, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "parsing failed"))?;

        Ok(GrammarTree {
            tree,
            source: source.to_owned(),
            language: self.language,
        })
    }
}

impl std::fmt::Debug for GrammarParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarParser")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

/// Recursively checks if a node or any of its descendants is an ERROR node.
fn has_error_nodes(node: tree_sitter::Node<'_>) -> bool {
    if node.is_error() || node.is_missing() {
        return true;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if has_error_nodes(child) {
            return true;
        }
    }

    false
}

/// Recursively collects all ERROR nodes from a syntax tree.
fn collect_error_nodes(
    node: tree_sitter::Node<'_>,
    source: &str,
    errors: &mut Vec<SyntaxErrorInfo>,
) {
    if node.is_error() || node.is_missing() {
        errors.push(SyntaxErrorInfo::from_node(node, source));
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, source, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("class C { static extern void M(); }")]
    #[case("namespace N;\npartial class C { }\n")]
    fn grammar_accepts_valid_source(#[case] source: &str) {
        let mut parser = GrammarParser::new(SupportedLanguage::CSharp).expect("parser init");
        let result = parser.parse(source).expect("parse");

        assert!(!result.has_errors());
        assert_eq!(result.language(), SupportedLanguage::CSharp);
    }

    #[rstest]
    #[case("class C {")]
    #[case("class C { void M( }")]
    fn grammar_detects_syntax_errors(#[case] source: &str) {
        let mut parser = GrammarParser::new(SupportedLanguage::CSharp).expect("parser init");
        let result = parser.parse(source).expect("parse");

        assert!(result.has_errors());
        assert!(!result.errors().is_empty());
    }

    #[test]
    fn error_info_from_offset_has_line_and_column() {
        let info = SyntaxErrorInfo::at("ab\ncd", 4..5, "bad");
        assert_eq!((info.line, info.column), (2, 2));
        assert_eq!(info.context, "d");
        assert_eq!(info.to_string(), "2:2: bad");
    }
}
