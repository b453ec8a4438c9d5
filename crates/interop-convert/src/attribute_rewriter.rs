//! Rewrites a legacy interop attribute into its generated-marshalling form.
//!
//! The rewrite renames the type reference and drops named arguments whose
//! resolved value is what the generated form does anyway. Everything else,
//! including arguments the engine does not recognise, is copied verbatim.

use interop_syntax::{ArgumentKind, Attribute, SyntaxError, Token};
use tracing::debug;

use crate::semantic::{AttributeTypeInfo, ImportScope, LegacyOption, ResolvedOptionData};

/// Builds the new attribute for one legacy attribute type.
#[derive(Debug, Clone, Copy)]
pub struct AttributeRewriter<'t> {
    legacy_type: &'t AttributeTypeInfo,
    scope: Option<&'t ImportScope>,
}

impl<'t> AttributeRewriter<'t> {
    /// Creates a rewriter for attributes of `legacy_type`.
    #[must_use]
    pub const fn new(legacy_type: &'t AttributeTypeInfo) -> Self {
        Self {
            legacy_type,
            scope: None,
        }
    }

    /// Names in scope where the attribute is written.
    ///
    /// A simple name that is a `using` alias for the legacy type is
    /// rewritten to the new type's qualified name.
    #[must_use]
    pub const fn with_scope(mut self, scope: &'t ImportScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Returns the legacy attribute type.
    #[must_use]
    pub const fn legacy_type(&self) -> &'t AttributeTypeInfo {
        self.legacy_type
    }

    /// Produces the attribute that replaces `old_attribute`.
    ///
    /// The type reference now names `new_type`, written in the style of the
    /// old reference. Named arguments for legacy-only options whose value
    /// resolved to the redundant sentinel are removed in one batch.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::IndexOutOfRange`] if the argument list
    /// changed between scanning and removal.
    pub fn rewrite(
        &self,
        old_attribute: &Attribute,
        new_type: &AttributeTypeInfo,
        resolved_options: &ResolvedOptionData,
    ) -> Result<Attribute, SyntaxError> {
        let aliased = self
            .scope
            .is_some_and(|scope| scope.alias(&old_attribute.name_text()).is_some());
        let name = type_reference(old_attribute.name_tokens(), new_type, aliased);
        let renamed = old_attribute.with_name(name);
        Self::remove_redundant(&renamed, self.legacy_type, resolved_options)
    }

    /// Removes the redundant named arguments of `attribute`.
    ///
    /// Argument names are resolved through `attribute_type`'s property
    /// table, so an attribute already converted to a type without
    /// legacy-only properties comes back unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::IndexOutOfRange`] if a computed index falls
    /// outside the argument list.
    pub fn remove_redundant(
        attribute: &Attribute,
        attribute_type: &AttributeTypeInfo,
        resolved_options: &ResolvedOptionData,
    ) -> Result<Attribute, SyntaxError> {
        let indices = redundant_arguments(attribute, attribute_type, resolved_options);
        let Some(list) = attribute.argument_list() else {
            return Ok(attribute.clone());
        };
        if indices.is_empty() {
            return Ok(attribute.clone());
        }
        let removed: Vec<&str> = indices
            .iter()
            .filter_map(|&index| list.arguments().get(index)?.name())
            .collect();
        debug!(
            attribute = %attribute_type.metadata_name(),
            removed = ?removed,
            "dropping redundant attribute arguments"
        );
        let survivors = list.arguments().remove_all(&indices)?;
        Ok(attribute.with_argument_list(Some(list.with_arguments(survivors))))
    }
}

/// Indices of the named arguments that are provably redundant.
///
/// An argument qualifies when it is written `Name = value`, its name maps
/// (case-sensitively, aliases included) to a legacy-only option of
/// `attribute_type`, and that option resolved to its redundant value.
#[must_use]
pub fn redundant_arguments(
    attribute: &Attribute,
    attribute_type: &AttributeTypeInfo,
    resolved_options: &ResolvedOptionData,
) -> Vec<usize> {
    attribute
        .arguments()
        .enumerate()
        .filter(|(_, argument)| argument.kind() == ArgumentKind::NameEquals)
        .filter_map(|(index, argument)| {
            let property = attribute_type.canonical_property(argument.name()?)?;
            let option = LegacyOption::from_property_name(property)?;
            resolved_options.is_redundant(option).then_some(index)
        })
        .collect()
}

/// Writes a reference to `new_type` in the style of `old_name`.
///
/// A simple name stays simple and keeps or drops the `Attribute` suffix as
/// the old one did. A qualified, alias-qualified or `aliased` name becomes
/// the new type's full namespace path, keeping a `global::` prefix.
fn type_reference(
    old_name: &[Token],
    new_type: &AttributeTypeInfo,
    aliased: bool,
) -> Vec<Token> {
    let is_global = matches!(
        old_name,
        [first, separator, ..] if first.is("global") && separator.is("::")
    );
    let is_qualified = aliased
        || old_name
            .iter()
            .any(|token| token.is(".") || token.is("::"));
    let keeps_suffix = old_name
        .iter()
        .rev()
        .find(|token| token.is_word())
        .is_some_and(|last| last.text().ends_with("Attribute"));
    let name = if keeps_suffix {
        new_type.type_name()
    } else {
        new_type.short_name()
    };

    let mut tokens = Vec::new();
    if is_qualified {
        if is_global {
            tokens.push(Token::identifier("global"));
            tokens.push(Token::punctuation("::"));
        }
        for segment in new_type.namespace().split('.').filter(|part| !part.is_empty()) {
            tokens.push(Token::identifier(segment));
            tokens.push(Token::punctuation("."));
        }
    }
    tokens.push(Token::identifier(name));
    tokens
}

#[cfg(test)]
mod tests {
    use interop_syntax::{Member, SyntaxNode, parse};
    use rstest::rstest;

    use super::*;
    use crate::options::defaults::{DEFAULT_GENERATED_ATTRIBUTE, DEFAULT_LEGACY_ATTRIBUTE};
    use crate::semantic::{SemanticContext, StaticSemanticContext};

    fn attribute(source: &str) -> Attribute {
        let text = format!("class C {{ {source} static extern void M(); }}");
        let unit = parse(&text).into_unit();
        unit.members()
            .first()
            .and_then(|class| class.members().first())
            .and_then(Member::as_method)
            .and_then(|method| method.attribute_lists().first())
            .and_then(|list| list.attributes().get(0))
            .expect("attribute")
            .clone()
    }

    fn rewrite(source: &str) -> String {
        let context = StaticSemanticContext::with_interop_types();
        let legacy = context
            .type_by_metadata_name(DEFAULT_LEGACY_ATTRIBUTE)
            .expect("legacy");
        let generated = context
            .type_by_metadata_name(DEFAULT_GENERATED_ATTRIBUTE)
            .expect("generated");
        let old = attribute(source);
        let options = context.resolved_options(&old, legacy);
        AttributeRewriter::new(legacy)
            .rewrite(&old, generated, &options)
            .expect("rewrite")
            .to_full_string()
    }

    #[rstest]
    #[case(
        "[DllImport(\"user32.dll\", CallingConvention = CallingConvention.StdCall, BestFitMapping = false)]",
        "LibraryImport(\"user32.dll\", CallingConvention = CallingConvention.StdCall)"
    )]
    #[case(
        "[DllImport(\"a\", BestFitMapping = true)]",
        "LibraryImport(\"a\", BestFitMapping = true)"
    )]
    #[case(
        "[DllImport(\"a\", ThrowOnUnmappableChar = false)]",
        "LibraryImport(\"a\")"
    )]
    #[case(
        "[DllImport(\"a\", ThrowOnUnmappableCharacter = false, SetLastError = true)]",
        "LibraryImport(\"a\", SetLastError = true)"
    )]
    #[case(
        "[DllImport(\"a\", ThrowOnUnmappableChar = true)]",
        "LibraryImport(\"a\", ThrowOnUnmappableChar = true)"
    )]
    #[case(
        "[DllImport(\"a\", BestFitMapping = false, ThrowOnUnmappableChar = false)]",
        "LibraryImport(\"a\")"
    )]
    #[case(
        "[DllImport(\"a\", BestFitMapping = Settings.Mapping)]",
        "LibraryImport(\"a\", BestFitMapping = Settings.Mapping)"
    )]
    #[case(
        "[DllImport(\"a\", bestFitMapping = false)]",
        "LibraryImport(\"a\", bestFitMapping = false)"
    )]
    #[case(
        "[DllImport(\"a\", Unknown = false)]",
        "LibraryImport(\"a\", Unknown = false)"
    )]
    fn drops_only_provably_redundant_arguments(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(rewrite(source), expected);
    }

    #[test]
    fn first_survivor_inherits_leading_layout() {
        let source = "[DllImport(BestFitMapping = false,\n    EntryPoint = \"Beep\")]";
        assert_eq!(rewrite(source), "LibraryImport(EntryPoint = \"Beep\")");
    }

    #[rstest]
    #[case("[DllImport(\"a\")]", "LibraryImport(\"a\")")]
    #[case("[DllImportAttribute(\"a\")]", "LibraryImportAttribute(\"a\")")]
    #[case(
        "[System.Runtime.InteropServices.DllImport(\"a\")]",
        "System.Runtime.InteropServices.LibraryImport(\"a\")"
    )]
    #[case(
        "[global::System.Runtime.InteropServices.DllImportAttribute(\"a\")]",
        "global::System.Runtime.InteropServices.LibraryImportAttribute(\"a\")"
    )]
    #[case(
        "[Interop.DllImport(\"a\")]",
        "System.Runtime.InteropServices.LibraryImport(\"a\")"
    )]
    fn type_reference_follows_written_style(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(rewrite(source), expected);
    }

    #[rstest]
    #[case("[DI(\"a\")]", "System.Runtime.InteropServices.LibraryImport(\"a\")")]
    #[case("[DllImport(\"a\")]", "LibraryImport(\"a\")")]
    fn aliased_names_are_written_in_full(#[case] source: &str, #[case] expected: &str) {
        let context = StaticSemanticContext::with_interop_types();
        let legacy = context
            .type_by_metadata_name(DEFAULT_LEGACY_ATTRIBUTE)
            .expect("legacy");
        let generated = context
            .type_by_metadata_name(DEFAULT_GENERATED_ATTRIBUTE)
            .expect("generated");
        let scope = ImportScope {
            aliases: vec![("DI".to_owned(), DEFAULT_LEGACY_ATTRIBUTE.to_owned())],
            ..ImportScope::default()
        };
        let old = attribute(source);
        let rewritten = AttributeRewriter::new(legacy)
            .with_scope(&scope)
            .rewrite(&old, generated, &ResolvedOptionData::default())
            .expect("rewrite");
        assert_eq!(rewritten.to_full_string(), expected);
    }

    #[test]
    fn removal_on_converted_attribute_is_a_no_op() {
        let context = StaticSemanticContext::with_interop_types();
        let generated = context
            .type_by_metadata_name(DEFAULT_GENERATED_ATTRIBUTE)
            .expect("generated");
        let converted = attribute("[LibraryImport(\"a\", BestFitMapping = false)]");
        let options = ResolvedOptionData {
            best_fit_mapping: Some(false),
            throw_on_unmappable_char: Some(false),
        };
        let once = AttributeRewriter::remove_redundant(&converted, generated, &options)
            .expect("first pass");
        let twice =
            AttributeRewriter::remove_redundant(&once, generated, &options).expect("second pass");
        assert_eq!(once, converted);
        assert_eq!(twice, once);
    }

    #[test]
    fn attributes_without_arguments_are_renamed_only() {
        assert_eq!(rewrite("[DllImport]"), "LibraryImport");
    }
}
