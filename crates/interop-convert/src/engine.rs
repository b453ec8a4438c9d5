//! Conversion of one flagged declaration, end to end.
//!
//! The engine locates the flagged method, finds its single legacy
//! attribute, asks [`AttributeRewriter`] for the replacement attribute and
//! hands both to [`DeclarationTransformer`]. The resulting edits are applied
//! to a copy of the tree and the produced text is verified before a
//! [`ProposedChange`] is returned. The input document is never modified.

use std::fmt;

use interop_syntax::{
    Attribute, AttributeList, CompilationUnit, Member, MemberPath, SyntaxAnnotation, SyntaxEdit,
    SyntaxNode, TreeSitterSyntacticLock, apply_edits,
};
use tracing::{debug, warn};

use crate::attribute_rewriter::AttributeRewriter;
use crate::declaration_transformer::{DeclarationEdits, DeclarationSite, DeclarationTransformer};
use crate::document::{Diagnostic, Document};
use crate::error::{ConversionError, PreconditionViolation};
use crate::mode::ConversionMode;
use crate::options::ConversionOptions;
use crate::semantic::{AttributeTypeInfo, ImportScope, SemanticContext};
use crate::verify::OutputVerifier;

/// Edits planned for one declaration, not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedConversion {
    /// Path of the converted method in the original tree.
    pub path: MemberPath,
    /// The edits converting it.
    pub edits: DeclarationEdits,
}

/// A converted tree, ready for the caller to print or store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedChange {
    title: String,
    equivalence_key: &'static str,
    mode: ConversionMode,
    paths: Vec<MemberPath>,
    edits: Vec<SyntaxEdit>,
    unit: CompilationUnit,
}

impl ProposedChange {
    pub(crate) const fn new(
        title: String,
        equivalence_key: &'static str,
        mode: ConversionMode,
        paths: Vec<MemberPath>,
        edits: Vec<SyntaxEdit>,
        unit: CompilationUnit,
    ) -> Self {
        Self {
            title,
            equivalence_key,
            mode,
            paths,
            edits,
            unit,
        }
    }

    /// Human-readable title of the conversion.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Stable key identifying the conversion variant.
    #[must_use]
    pub const fn equivalence_key(&self) -> &'static str {
        self.equivalence_key
    }

    /// The mode the conversion ran in.
    #[must_use]
    pub const fn mode(&self) -> ConversionMode {
        self.mode
    }

    /// Paths of the converted methods in the original tree.
    #[must_use]
    pub fn converted_paths(&self) -> &[MemberPath] {
        &self.paths
    }

    /// The edits, in application order, against the original tree.
    #[must_use]
    pub fn edits(&self) -> &[SyntaxEdit] {
        &self.edits
    }

    /// The converted tree.
    #[must_use]
    pub const fn unit(&self) -> &CompilationUnit {
        &self.unit
    }

    /// The converted source text.
    #[must_use]
    pub fn text(&self) -> String {
        self.unit.to_full_string()
    }

    /// Advisory notes attached to the converted declarations.
    pub fn annotations(&self) -> impl Iterator<Item = &SyntaxAnnotation> {
        self.edits
            .iter()
            .filter_map(|edit| edit.node().as_method())
            .flat_map(|method| method.annotations())
    }
}

/// Converts flagged legacy interop declarations.
pub struct ConversionEngine<'c> {
    context: &'c dyn SemanticContext,
    options: &'c ConversionOptions,
    lock: TreeSitterSyntacticLock,
}

impl fmt::Debug for ConversionEngine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionEngine")
            .field("options", &self.options)
            .field("lock", &self.lock)
            .finish_non_exhaustive()
    }
}

impl<'c> ConversionEngine<'c> {
    /// Creates an engine reading symbols from `context`.
    #[must_use]
    pub fn new(context: &'c dyn SemanticContext, options: &'c ConversionOptions) -> Self {
        Self {
            context,
            options,
            lock: TreeSitterSyntacticLock::new(),
        }
    }

    /// The options this engine converts with.
    #[must_use]
    pub const fn options(&self) -> &'c ConversionOptions {
        self.options
    }

    /// Converts the declaration flagged by `diagnostic` in place.
    ///
    /// # Errors
    ///
    /// See [`Self::convert`].
    pub fn convert_direct(
        &self,
        document: &Document,
        diagnostic: &Diagnostic,
    ) -> Result<Option<ProposedChange>, ConversionError> {
        self.convert(document, diagnostic, ConversionMode::Direct)
    }

    /// Converts the declaration flagged by `diagnostic` behind `#if`,
    /// keeping the legacy declaration under `#else`.
    ///
    /// # Errors
    ///
    /// See [`Self::convert`].
    pub fn convert_with_preprocessor_fallback(
        &self,
        document: &Document,
        diagnostic: &Diagnostic,
    ) -> Result<Option<ProposedChange>, ConversionError> {
        self.convert(document, diagnostic, ConversionMode::PreprocessorGuarded)
    }

    /// Converts the flagged declaration, treating precondition violations
    /// as "no edit produced".
    ///
    /// # Errors
    ///
    /// Returns invalid options, structural defects and syntax-layer
    /// failures. Precondition violations yield `Ok(None)`.
    pub fn convert(
        &self,
        document: &Document,
        diagnostic: &Diagnostic,
        mode: ConversionMode,
    ) -> Result<Option<ProposedChange>, ConversionError> {
        match self.try_convert(document, diagnostic, mode) {
            Ok(change) => Ok(Some(change)),
            Err(ConversionError::Precondition(violation)) => {
                debug!(
                    diagnostic_id = diagnostic.id(),
                    mode = %mode,
                    reason = %violation,
                    "no conversion produced"
                );
                Ok(None)
            }
            Err(error) => {
                warn!(
                    diagnostic_id = diagnostic.id(),
                    mode = %mode,
                    error = %error,
                    "conversion discarded"
                );
                Err(error)
            }
        }
    }

    /// Converts the flagged declaration, reporting every failure.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Precondition`] when the declaration is not
    /// eligible, [`ConversionError::StructuralDefect`] when the produced
    /// output would be malformed and [`ConversionError::Config`] when the
    /// options fail validation.
    pub fn try_convert(
        &self,
        document: &Document,
        diagnostic: &Diagnostic,
        mode: ConversionMode,
    ) -> Result<ProposedChange, ConversionError> {
        let planned = self.plan(document, diagnostic, mode)?;
        let edits = planned.edits.into_edits();
        let unit = self.apply_and_verify(document, &edits, &planned.path)?;
        Ok(ProposedChange::new(
            self.title(mode),
            crate::fixer::equivalence_key(mode),
            mode,
            vec![planned.path],
            edits,
            unit,
        ))
    }

    /// Builds the edits for the flagged declaration without applying them.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Config`] when the options fail
    /// validation, precondition violations for ineligible declarations and
    /// structural defects from the rewrite.
    pub fn plan(
        &self,
        document: &Document,
        diagnostic: &Diagnostic,
        mode: ConversionMode,
    ) -> Result<PlannedConversion, ConversionError> {
        self.options.validate()?;
        if diagnostic.id() != self.options.diagnostic_id {
            return Err(PreconditionViolation::UnhandledDiagnostic {
                diagnostic_id: diagnostic.id().to_owned(),
            }
            .into());
        }
        let legacy_type = self.required_type(&self.options.legacy_attribute)?;
        let generated_type = self.required_type(&self.options.generated_attribute)?;

        let unit = document.unit();
        let located = unit.member_at(diagnostic.span()).ok_or_else(|| {
            PreconditionViolation::NoDeclaration {
                diagnostic_id: diagnostic.id().to_owned(),
            }
        })?;
        let path = located.path().clone();
        let method = unit
            .member(&path)
            .and_then(Member::as_method)
            .ok_or_else(|| PreconditionViolation::NotAMethod { path: path.clone() })?;

        let scope = document.import_scope(&path);
        let old_attribute =
            self.legacy_attribute(&scope, &path, method.attribute_lists(), legacy_type)?;
        let resolved = self.context.resolved_options(old_attribute, legacy_type);
        let new_attribute = AttributeRewriter::new(legacy_type)
            .with_scope(&scope)
            .rewrite(old_attribute, generated_type, &resolved)
            .map_err(|error| ConversionError::structural_defect(path.clone(), error.to_string()))?;

        let site = DeclarationSite {
            path: &path,
            declaration: method,
            at_line_start: located.at_line_start(),
        };
        let edits = DeclarationTransformer::new(self.options).transform(
            &site,
            old_attribute,
            &new_attribute,
            mode,
        )?;
        Ok(PlannedConversion { path, edits })
    }

    /// Applies `edits` to the document's tree and verifies the result.
    pub(crate) fn apply_and_verify(
        &self,
        document: &Document,
        edits: &[SyntaxEdit],
        path: &MemberPath,
    ) -> Result<CompilationUnit, ConversionError> {
        let unit = apply_edits(document.unit(), edits.iter().cloned())?;
        let lock = self.options.verify_output.then_some(&self.lock);
        OutputVerifier::new(lock).verify(document, &unit, path)?;
        Ok(unit)
    }

    /// Title shown for a conversion in `mode`.
    #[must_use]
    pub fn title(&self, mode: ConversionMode) -> String {
        let generated = AttributeTypeInfo::new(&self.options.generated_attribute, Vec::new());
        match mode {
            ConversionMode::Direct => format!("Convert to '{}'", generated.short_name()),
            ConversionMode::PreprocessorGuarded => format!(
                "Convert to '{}' under '#if {}'",
                generated.short_name(),
                self.options.condition_symbol
            ),
        }
    }

    fn required_type(
        &self,
        metadata_name: &str,
    ) -> Result<&'c AttributeTypeInfo, ConversionError> {
        self.context
            .type_by_metadata_name(metadata_name)
            .ok_or_else(|| {
                PreconditionViolation::MissingType {
                    metadata_name: metadata_name.to_owned(),
                }
                .into()
            })
    }

    /// Finds the one attribute on the method that resolves to `legacy_type`.
    fn legacy_attribute<'m>(
        &self,
        scope: &ImportScope,
        path: &MemberPath,
        attribute_lists: &'m [AttributeList],
        legacy_type: &AttributeTypeInfo,
    ) -> Result<&'m Attribute, ConversionError> {
        let matching: Vec<&Attribute> = attribute_lists
            .iter()
            .flat_map(|list| list.attributes().iter())
            .filter(|attribute| {
                self.context
                    .resolve_attribute(attribute, scope)
                    .is_some_and(|resolved| resolved.metadata_name() == legacy_type.metadata_name())
            })
            .collect();
        match matching.as_slice() {
            [only] => Ok(*only),
            [] => Err(PreconditionViolation::AttributeNotFound {
                path: path.clone(),
                attribute: legacy_type.metadata_name().to_owned(),
            }
            .into()),
            several => Err(PreconditionViolation::AmbiguousAttribute {
                path: path.clone(),
                attribute: legacy_type.metadata_name().to_owned(),
                count: several.len(),
            }
            .into()),
        }
    }
}
