//! Tree-sitter based syntactic validation of produced source.
//!
//! [`TreeSitterSyntacticLock`] checks text against the complete Tree-sitter
//! grammar. The conversion engine runs it over every proposed change so a
//! rewrite can never leave a file with new syntax errors.

use std::fmt;
use std::sync::Mutex;

use crate::error::SyntaxError;
use crate::grammar::{GrammarParser, SyntaxErrorInfo};
use crate::language::SupportedLanguage;

/// Tree-sitter based syntactic validation.
///
/// The grammar parser is built on first use and reused for later checks.
/// The lock can be shared across threads; checks run one at a time.
pub struct TreeSitterSyntacticLock {
    parser: Mutex<Option<GrammarParser>>,
}

impl TreeSitterSyntacticLock {
    /// Creates a lock with no parser built yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parser: Mutex::new(None),
        }
    }

    /// Validates source text.
    ///
    /// Returns the syntax errors found; an empty list means the text is
    /// syntactically valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the parser cannot be initialised, or if the
    /// internal parser lock is poisoned.
    pub fn validate_source(
        &self,
        language: SupportedLanguage,
        content: &str,
    ) -> Result<Vec<SyntaxErrorInfo>, SyntaxError> {
        let mut slot = self
            .parser
            .lock()
            .map_err(|_| SyntaxError::parser_init(language, "lock poisoned"))?;
        if !slot
            .as_ref()
            .is_some_and(|parser| parser.language() == language)
        {
            *slot = Some(GrammarParser::new(language)?);
        }
        let Some(parser) = slot.as_mut() else {
            return Err(SyntaxError::parser_init(language, "parser missing"));
        };
        Ok(parser.parse(content)?.errors())
    }
}

impl Default for TreeSitterSyntacticLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TreeSitterSyntacticLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeSitterSyntacticLock")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("static partial class Native\n{\n    [DllImport(\"user32.dll\")]\n    public static extern bool MessageBeep(uint type);\n}\n")]
    #[case("class C\n{\n    [LibraryImport(\"a.dll\")]\n    static partial void Beep();\n}\n")]
    fn accepts_valid_declarations(#[case] content: &str) {
        let lock = TreeSitterSyntacticLock::new();
        let errors = lock
            .validate_source(SupportedLanguage::CSharp, content)
            .expect("validate");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn reports_location_of_errors() {
        let lock = TreeSitterSyntacticLock::new();
        let errors = lock
            .validate_source(SupportedLanguage::CSharp, "class C\n{\n    void M( \n}")
            .expect("validate");
        let first = errors.first().expect("an error");
        assert!(first.line >= 1);
        assert!(first.column >= 1);
        assert!(!first.message.is_empty());
    }

    #[test]
    fn parser_is_reused_between_checks() {
        let lock = TreeSitterSyntacticLock::new();
        for content in ["class C { }", "class D {"] {
            lock.validate_source(SupportedLanguage::CSharp, content)
                .expect("validate");
        }
        let slot = lock.parser.lock().expect("lock");
        assert!(slot.is_some());
    }
}
