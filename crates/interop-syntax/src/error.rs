//! Error types for syntax tree operations.
//!
//! This module provides structured error types for all operations in the
//! `interop-syntax` crate, including grammar initialisation, parsing, and
//! positional tree editing.

use thiserror::Error;

use crate::editor::MemberPath;
use crate::language::SupportedLanguage;

/// Errors from syntax tree operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser for a language.
    #[error("failed to initialise parser for {language}: {message}")]
    ParserInitError {
        /// The language that failed to initialise.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// Failed to parse source code.
    #[error("failed to parse {language}: {message}")]
    ParseError {
        /// The language that failed to parse.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// An edit referred to a member that does not exist in the tree.
    #[error("edit target {path} does not exist")]
    MissingEditTarget {
        /// The unresolved member path.
        path: MemberPath,
    },

    /// Two edits claimed the same member or nested within a replaced member.
    #[error("conflicting edits at {path}: {message}")]
    ConflictingEdits {
        /// The member path both edits refer to.
        path: MemberPath,
        /// Description of the conflict.
        message: String,
    },

    /// A list operation referred to an element outside the list.
    #[error("index {index} is out of range for a list of {len} elements")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the list.
        len: usize,
    },

    /// Internal error indicating a bug or system failure.
    #[error("internal error: {message}")]
    InternalError {
        /// Description of the internal error.
        message: String,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::ParserInitError {
            language,
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::ParseError {
            language,
            message: message.into(),
        }
    }

    /// Creates a missing edit target error.
    #[must_use]
    pub const fn missing_edit_target(path: MemberPath) -> Self {
        Self::MissingEditTarget { path }
    }

    /// Creates a conflicting edits error.
    #[must_use]
    pub fn conflicting_edits(path: MemberPath, message: impl Into<String>) -> Self {
        Self::ConflictingEdits {
            path,
            message: message.into(),
        }
    }

    /// Creates an index out of range error.
    #[must_use]
    pub const fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}
