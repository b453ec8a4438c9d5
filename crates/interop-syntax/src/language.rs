//! Tree-sitter grammar selection.

use std::fmt;

/// Languages the grammar-backed checks can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SupportedLanguage {
    /// C#.
    #[default]
    CSharp,
}

impl SupportedLanguage {
    /// Returns the Tree-sitter language grammar for this language.
    #[must_use]
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CSharp => f.write_str("C#"),
        }
    }
}
