//! Checks that produced text is no less valid than the input.
//!
//! Conditional directives are trivia to the declaration parser, so both
//! branches of a guarded conversion are parsed. Tree-sitter checks the same
//! text through the full C# grammar with directive lines blanked out, which
//! keeps every branch visible to it as well. Neither check may report more
//! errors for the produced text than for the original. Directive nesting is
//! checked separately when the guard is built.

use interop_syntax::{
    CompilationUnit, MemberPath, SupportedLanguage, SyntaxNode, TreeSitterSyntacticLock, Trivia,
    parse,
};
use tracing::trace;

use crate::document::Document;
use crate::error::ConversionError;

/// Verifies produced trees against their source document.
#[derive(Debug)]
pub struct OutputVerifier<'l> {
    lock: Option<&'l TreeSitterSyntacticLock>,
}

impl<'l> OutputVerifier<'l> {
    /// Creates a verifier; `lock` enables the grammar check.
    #[must_use]
    pub const fn new(lock: Option<&'l TreeSitterSyntacticLock>) -> Self {
        Self { lock }
    }

    /// Checks `produced`, converted at `path`, against `original`.
    ///
    /// # Errors
    ///
    /// Returns a structural defect when the produced text gains syntax
    /// errors, and [`ConversionError::Syntax`] when the grammar parser
    /// cannot run.
    pub fn verify(
        &self,
        original: &Document,
        produced: &CompilationUnit,
        path: &MemberPath,
    ) -> Result<(), ConversionError> {
        let text = produced.to_full_string();
        let reparsed = parse(&text);
        if reparsed.errors().len() > original.syntax_errors() {
            let first = reparsed
                .errors()
                .first()
                .map_or_else(String::new, |error| error.message.clone());
            return Err(ConversionError::structural_defect(
                path.clone(),
                format!("produced text does not re-parse: {first}"),
            ));
        }

        let Some(lock) = self.lock else {
            return Ok(());
        };
        let before =
            lock.validate_source(SupportedLanguage::CSharp, &grammar_view(original.unit()))?;
        let after = lock.validate_source(SupportedLanguage::CSharp, &grammar_view(produced))?;
        trace!(
            path = %path,
            before = before.len(),
            after = after.len(),
            "grammar check of produced text"
        );
        if after.len() > before.len() {
            let first = after
                .iter()
                .find(|error| !before.contains(error))
                .or_else(|| after.first())
                .map_or_else(String::new, |error| {
                    format!("{}:{}: {}", error.line, error.column, error.message)
                });
            return Err(ConversionError::structural_defect(
                path.clone(),
                format!("produced text fails the grammar check at {first}"),
            ));
        }
        Ok(())
    }
}

/// Prints `unit` with directive trivia replaced by spaces of equal width,
/// so reported positions still match the real text.
fn grammar_view(unit: &CompilationUnit) -> String {
    let mut out = String::new();
    unit.for_each_token(&mut |token| {
        push_blanking_directives(&mut out, token.leading_trivia());
        out.push_str(token.text());
        push_blanking_directives(&mut out, token.trailing_trivia());
    });
    out
}

fn push_blanking_directives(out: &mut String, trivia: &[Trivia]) {
    for piece in trivia {
        if piece.directive().is_some() {
            out.extend(std::iter::repeat_n(' ', piece.text().len()));
        } else {
            out.push_str(piece.text());
        }
    }
}

#[cfg(test)]
mod tests {
    use interop_syntax::{SyntaxEdit, apply_edits};

    use super::*;

    const SOURCE: &str = "class C\n{\n    static extern void Beep();\n}\n";

    fn method_path() -> MemberPath {
        MemberPath::new(vec![0, 0])
    }

    #[test]
    fn unchanged_tree_verifies() {
        let document = Document::parse(SOURCE);
        let lock = TreeSitterSyntacticLock::new();
        OutputVerifier::new(Some(&lock))
            .verify(&document, document.unit(), &method_path())
            .expect("original text verifies");
    }

    #[test]
    fn broken_replacement_is_a_structural_defect() {
        let document = Document::parse(SOURCE);
        let broken = parse("class D { void M( }").into_unit();
        let class = broken.members().first().expect("class").clone();
        let unit = apply_edits(
            document.unit(),
            [SyntaxEdit::Replace {
                target: MemberPath::new(vec![0]),
                node: class,
            }],
        )
        .expect("edit applies");
        let error = OutputVerifier::new(None)
            .verify(&document, &unit, &method_path())
            .expect_err("gained errors");
        assert!(matches!(error, ConversionError::StructuralDefect { .. }));
    }

    #[test]
    fn grammar_view_blanks_directives_in_place() {
        let source = "class C\n{\n#if NET\n    void M();\n#endif\n}\n";
        let view = grammar_view(Document::parse(source).unit());
        assert_eq!(view.len(), source.len());
        assert_eq!(view, "class C\n{\n       \n    void M();\n      \n}\n");
    }

    #[test]
    fn preexisting_errors_are_tolerated() {
        let document = Document::parse("class C { void M( }");
        assert!(document.syntax_errors() > 0);
        OutputVerifier::new(None)
            .verify(&document, document.unit(), &MemberPath::new(vec![0]))
            .expect("no new errors");
    }
}
