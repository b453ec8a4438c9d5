//! Converts `DllImport` declarations to `LibraryImport`.
//!
//! Given a method flagged by an upstream diagnostic, this crate produces a
//! converted syntax tree in one of two modes:
//!
//! - **Direct** replaces the declaration: the attribute is renamed, `false`
//!   values of `BestFitMapping` and `ThrowOnUnmappableChar` are dropped and
//!   `extern` becomes `partial`
//! - **Preprocessor guarded** inserts the converted declaration under
//!   `#if SYMBOL` and keeps the original under `#else`, closed by `#endif`
//!
//! The work is split between [`AttributeRewriter`], which builds the new
//! attribute, and [`DeclarationTransformer`], which builds the new
//! declaration and the edits placing it. [`ConversionEngine`] locates the
//! flagged declaration and verifies the produced text, and
//! [`ConvertToGeneratedImportFixer`] offers both variants and applies one
//! across a document.
//!
//! Symbol lookups go through a caller-supplied [`SemanticContext`]. The
//! crate performs no file I/O and never modifies its input tree.
//!
//! # Example
//!
//! ```ignore
//! use interop_convert::{
//!     ConversionOptions, ConvertToGeneratedImportFixer, Diagnostic, Document,
//!     StaticSemanticContext,
//! };
//!
//! let document = Document::parse(source);
//! let context = StaticSemanticContext::with_interop_types();
//! let options = ConversionOptions::default();
//! let fixer = ConvertToGeneratedImportFixer::new(&context, &options);
//! for action in fixer.register_fixes(&document, &diagnostic) {
//!     let change = action.apply()?;
//!     println!("{}: {}", action.title(), change.text());
//! }
//! ```

mod attribute_rewriter;
mod declaration_transformer;
mod document;
mod engine;
mod error;
mod fixer;
mod mode;
pub mod options;
pub mod semantic;
mod verify;

pub use attribute_rewriter::{AttributeRewriter, redundant_arguments};
pub use declaration_transformer::{DeclarationEdits, DeclarationSite, DeclarationTransformer};
pub use document::{Diagnostic, Document};
pub use engine::{ConversionEngine, PlannedConversion, ProposedChange};
pub use error::{ConfigError, ConversionError, PreconditionViolation};
pub use fixer::{
    CONVERT_KEY, CONVERT_WITH_GUARD_KEY, CodeAction, ConvertToGeneratedImportFixer,
    equivalence_key, mode_for_key,
};
pub use mode::{ConversionMode, ConversionModeParseError};
pub use options::ConversionOptions;
pub use semantic::{
    AttributeProperty, AttributeTypeInfo, ImportScope, LegacyOption, ResolvedOptionData,
    SemanticContext, StaticSemanticContext,
};
pub use verify::OutputVerifier;

#[cfg(test)]
mod tests;
