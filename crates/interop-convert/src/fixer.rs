//! The two conversion variants offered for a flagged declaration.
//!
//! Each variant is a [`CodeAction`] with a stable equivalence key, so a
//! caller that picked one variant for a single diagnostic can apply the
//! same variant to every diagnostic in a document with
//! [`ConvertToGeneratedImportFixer::fix_all`].

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::document::{Diagnostic, Document};
use crate::engine::{ConversionEngine, ProposedChange};
use crate::error::{ConversionError, PreconditionViolation};
use crate::mode::ConversionMode;
use crate::options::ConversionOptions;
use crate::semantic::SemanticContext;

/// Equivalence key of the in-place conversion.
pub const CONVERT_KEY: &str = "ConvertToLibraryImport";

/// Equivalence key of the conversion guarded by `#if`.
pub const CONVERT_WITH_GUARD_KEY: &str = "ConvertToLibraryImportWithPreprocessorGuard";

/// Returns the equivalence key of `mode`.
#[must_use]
pub const fn equivalence_key(mode: ConversionMode) -> &'static str {
    match mode {
        ConversionMode::Direct => CONVERT_KEY,
        ConversionMode::PreprocessorGuarded => CONVERT_WITH_GUARD_KEY,
    }
}

/// Maps an equivalence key back to its mode.
///
/// # Errors
///
/// Returns [`PreconditionViolation::UnknownEquivalenceKey`] for keys this
/// fixer never issued.
pub fn mode_for_key(key: &str) -> Result<ConversionMode, PreconditionViolation> {
    match key {
        CONVERT_KEY => Ok(ConversionMode::Direct),
        CONVERT_WITH_GUARD_KEY => Ok(ConversionMode::PreprocessorGuarded),
        _ => Err(PreconditionViolation::UnknownEquivalenceKey {
            key: key.to_owned(),
        }),
    }
}

/// One offered conversion, computed when applied.
#[derive(Debug, Clone, Copy)]
pub struct CodeAction<'a> {
    engine: &'a ConversionEngine<'a>,
    document: &'a Document,
    diagnostic: &'a Diagnostic,
    mode: ConversionMode,
}

impl CodeAction<'_> {
    /// Human-readable title.
    #[must_use]
    pub fn title(&self) -> String {
        self.engine.title(self.mode)
    }

    /// Stable key shared by every action of this variant.
    #[must_use]
    pub const fn equivalence_key(&self) -> &'static str {
        equivalence_key(self.mode)
    }

    /// The conversion mode.
    #[must_use]
    pub const fn mode(&self) -> ConversionMode {
        self.mode
    }

    /// Produces the converted tree.
    ///
    /// # Errors
    ///
    /// Returns the conversion failure; the document is left untouched.
    pub fn apply(&self) -> Result<ProposedChange, ConversionError> {
        self.engine.try_convert(self.document, self.diagnostic, self.mode)
    }
}

/// Offers the direct and guarded conversions for legacy interop
/// declarations.
#[derive(Debug)]
pub struct ConvertToGeneratedImportFixer<'c> {
    engine: ConversionEngine<'c>,
}

impl<'c> ConvertToGeneratedImportFixer<'c> {
    /// Creates a fixer reading symbols from `context`.
    #[must_use]
    pub fn new(context: &'c dyn SemanticContext, options: &'c ConversionOptions) -> Self {
        Self {
            engine: ConversionEngine::new(context, options),
        }
    }

    /// The engine behind the actions.
    #[must_use]
    pub const fn engine(&self) -> &ConversionEngine<'c> {
        &self.engine
    }

    /// Diagnostic identifiers this fixer responds to.
    #[must_use]
    pub fn fixable_diagnostic_ids(&self) -> [&str; 1] {
        [self.engine.options().diagnostic_id.as_str()]
    }

    /// Returns the variants that can be built for `diagnostic`.
    ///
    /// A declaration that fails a precondition gets no actions. A variant
    /// whose edits cannot be built is left out.
    #[must_use]
    pub fn register_fixes<'a>(
        &'a self,
        document: &'a Document,
        diagnostic: &'a Diagnostic,
    ) -> Vec<CodeAction<'a>> {
        [ConversionMode::Direct, ConversionMode::PreprocessorGuarded]
            .into_iter()
            .filter(|&mode| match self.engine.plan(document, diagnostic, mode) {
                Ok(_) => true,
                Err(ConversionError::Precondition(violation)) => {
                    debug!(
                        diagnostic_id = diagnostic.id(),
                        mode = %mode,
                        reason = %violation,
                        "fix not offered"
                    );
                    false
                }
                Err(error) => {
                    warn!(
                        diagnostic_id = diagnostic.id(),
                        mode = %mode,
                        error = %error,
                        "fix not offered"
                    );
                    false
                }
            })
            .map(|mode| CodeAction {
                engine: &self.engine,
                document,
                diagnostic,
                mode,
            })
            .collect()
    }

    /// Applies the variant named by `key` to every flagged declaration in
    /// one editing session.
    ///
    /// Diagnostics that fail a precondition, hit a structural defect or
    /// point at an already converted declaration are skipped. Returns
    /// `Ok(None)` when nothing was converted.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation::UnknownEquivalenceKey`] for a key
    /// this fixer never issued, [`ConversionError::Config`] for options
    /// that fail validation, and a structural defect when the combined
    /// output fails verification.
    pub fn fix_all(
        &self,
        document: &Document,
        diagnostics: &[Diagnostic],
        key: &str,
    ) -> Result<Option<ProposedChange>, ConversionError> {
        let mode = mode_for_key(key)?;
        self.engine.options().validate()?;
        let mut seen = BTreeSet::new();
        let mut paths = Vec::new();
        let mut edits = Vec::new();
        for diagnostic in diagnostics {
            let planned = match self.engine.plan(document, diagnostic, mode) {
                Ok(planned) => planned,
                Err(ConversionError::Precondition(violation)) => {
                    debug!(diagnostic_id = diagnostic.id(), reason = %violation, "skipped");
                    continue;
                }
                Err(error) => {
                    warn!(diagnostic_id = diagnostic.id(), error = %error, "skipped");
                    continue;
                }
            };
            if !seen.insert(planned.path.clone()) {
                continue;
            }
            edits.extend(planned.edits.into_edits());
            paths.push(planned.path);
        }
        let Some(first) = paths.first() else {
            return Ok(None);
        };
        let unit = self.engine.apply_and_verify(document, &edits, first)?;
        info!(
            mode = %mode,
            converted = paths.len(),
            flagged = diagnostics.len(),
            "converted flagged declarations"
        );
        Ok(Some(ProposedChange::new(
            self.engine.title(mode),
            equivalence_key(mode),
            mode,
            paths,
            edits,
            unit,
        )))
    }
}
