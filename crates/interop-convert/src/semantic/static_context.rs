use std::collections::BTreeMap;

use interop_syntax::{ArgumentKind, Attribute, Token};

use super::{
    AttributeProperty, AttributeTypeInfo, ImportScope, LegacyOption, ResolvedOptionData,
    SemanticContext,
};
use crate::options::defaults::{DEFAULT_GENERATED_ATTRIBUTE, DEFAULT_LEGACY_ATTRIBUTE};

const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// A [`SemanticContext`] backed by registered types and constants.
///
/// Attribute names resolve through `using` aliases, enclosing and imported
/// namespaces, `global::` and the implicit `Attribute` suffix. Option
/// values evaluate boolean literals, `!`, parentheses and registered named
/// constants; anything else resolves to "unknown".
#[derive(Debug, Clone, Default)]
pub struct StaticSemanticContext {
    types: Vec<AttributeTypeInfo>,
    constants: BTreeMap<String, bool>,
}

impl StaticSemanticContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context knowing `DllImportAttribute` and
    /// `LibraryImportAttribute` with their named-argument properties.
    #[must_use]
    pub fn with_interop_types() -> Self {
        Self::new()
            .with_type(AttributeTypeInfo::new(
                DEFAULT_LEGACY_ATTRIBUTE,
                vec![
                    AttributeProperty::new("EntryPoint"),
                    AttributeProperty::new("CharSet"),
                    AttributeProperty::new("CallingConvention"),
                    AttributeProperty::new("SetLastError"),
                    AttributeProperty::new("ExactSpelling"),
                    AttributeProperty::new("PreserveSig"),
                    AttributeProperty::new("BestFitMapping"),
                    AttributeProperty::new("ThrowOnUnmappableChar")
                        .with_alias("ThrowOnUnmappableCharacter"),
                ],
            ))
            .with_type(AttributeTypeInfo::new(
                DEFAULT_GENERATED_ATTRIBUTE,
                vec![
                    AttributeProperty::new("EntryPoint"),
                    AttributeProperty::new("SetLastError"),
                    AttributeProperty::new("StringMarshalling"),
                    AttributeProperty::new("StringMarshallingCustomType"),
                ],
            ))
    }

    /// Registers an attribute type, replacing one with the same name.
    #[must_use]
    pub fn with_type(mut self, info: AttributeTypeInfo) -> Self {
        self.types
            .retain(|known| known.metadata_name() != info.metadata_name());
        self.types.push(info);
        self
    }

    /// Registers a named boolean constant, as written in argument values.
    #[must_use]
    pub fn with_constant(mut self, name: &str, value: bool) -> Self {
        self.constants.insert(name.to_owned(), value);
        self
    }

    fn lookup(&self, metadata_name: &str) -> Option<&AttributeTypeInfo> {
        self.types
            .iter()
            .find(|info| info.metadata_name() == metadata_name)
    }

    fn evaluate(&self, tokens: &[Token]) -> Option<bool> {
        match tokens {
            [] => None,
            [only] if only.is("true") => Some(true),
            [only] if only.is("false") => Some(false),
            [bang, rest @ ..] if bang.is("!") => self.evaluate(rest).map(|value| !value),
            [open, inner @ .., close] if open.is("(") && close.is(")") => self.evaluate(inner),
            _ => self.constants.get(&joined(tokens)).copied(),
        }
    }
}

impl SemanticContext for StaticSemanticContext {
    fn type_by_metadata_name(&self, metadata_name: &str) -> Option<&AttributeTypeInfo> {
        self.lookup(metadata_name)
    }

    fn resolve_attribute(
        &self,
        attribute: &Attribute,
        scope: &ImportScope,
    ) -> Option<&AttributeTypeInfo> {
        let written = joined(attribute.name_tokens());
        qualified_candidates(&written, scope)
            .iter()
            .flat_map(|candidate| {
                [
                    format!("{candidate}{ATTRIBUTE_SUFFIX}"),
                    candidate.clone(),
                ]
            })
            .find_map(|candidate| self.lookup(&candidate))
    }

    fn resolved_options(
        &self,
        attribute: &Attribute,
        attribute_type: &AttributeTypeInfo,
    ) -> ResolvedOptionData {
        attribute
            .arguments()
            .filter(|argument| argument.kind() == ArgumentKind::NameEquals)
            .filter_map(|argument| {
                let property = attribute_type.canonical_property(argument.name()?)?;
                let option = LegacyOption::from_property_name(property)?;
                Some((option, self.evaluate(argument.expression())))
            })
            .fold(ResolvedOptionData::default(), |data, (option, value)| {
                data.with(option, value)
            })
    }
}

/// Expands a written type name into the fully qualified names it may mean.
fn qualified_candidates(written: &str, scope: &ImportScope) -> Vec<String> {
    if let Some(rooted) = written.strip_prefix("global::") {
        return vec![rooted.to_owned()];
    }
    if let Some((alias, rest)) = written.split_once("::") {
        return scope
            .alias(alias)
            .map(|target| vec![qualify(target, rest)])
            .unwrap_or_default();
    }
    let head = written.split('.').next().unwrap_or(written);
    if let Some(target) = scope.alias(head) {
        let rest = written.get(head.len()..).unwrap_or_default();
        return vec![format!("{target}{rest}")];
    }
    scope
        .search_namespaces()
        .map(|namespace| qualify(namespace, written))
        .collect()
}

fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_owned()
    } else {
        format!("{namespace}.{name}")
    }
}

fn joined(tokens: &[Token]) -> String {
    tokens.iter().map(Token::text).collect()
}

#[cfg(test)]
mod tests {
    use interop_syntax::{Member, parse};
    use rstest::rstest;

    use super::*;

    fn attribute(source: &str) -> Attribute {
        let text = format!("class C {{ {source} static extern void M(); }}");
        let unit = parse(&text).into_unit();
        let method = unit
            .members()
            .first()
            .and_then(|class| class.members().first())
            .and_then(Member::as_method)
            .expect("method")
            .clone();
        let list = method.attribute_lists().first().expect("list").clone();
        list.attributes().get(0).expect("attribute").clone()
    }

    fn interop_scope() -> ImportScope {
        ImportScope {
            namespaces: vec!["Demo".to_owned()],
            usings: vec!["System.Runtime.InteropServices".to_owned()],
            aliases: vec![(
                "Interop".to_owned(),
                "System.Runtime.InteropServices".to_owned(),
            )],
        }
    }

    #[rstest]
    #[case("[DllImport(\"a\")]")]
    #[case("[DllImportAttribute(\"a\")]")]
    #[case("[System.Runtime.InteropServices.DllImport(\"a\")]")]
    #[case("[global::System.Runtime.InteropServices.DllImportAttribute(\"a\")]")]
    #[case("[Interop.DllImport(\"a\")]")]
    #[case("[Interop::DllImport(\"a\")]")]
    fn resolves_legacy_attribute_spellings(#[case] source: &str) {
        let context = StaticSemanticContext::with_interop_types();
        let resolved = context
            .resolve_attribute(&attribute(source), &interop_scope())
            .map(AttributeTypeInfo::metadata_name);
        assert_eq!(resolved, Some(DEFAULT_LEGACY_ATTRIBUTE));
    }

    #[rstest]
    #[case("[DllImport(\"a\")]", ImportScope::default())]
    #[case("[Obsolete]", interop_scope())]
    #[case("[Other.DllImport(\"a\")]", interop_scope())]
    fn unresolvable_names_yield_none(#[case] source: &str, #[case] scope: ImportScope) {
        let context = StaticSemanticContext::with_interop_types();
        assert!(context.resolve_attribute(&attribute(source), &scope).is_none());
    }

    #[rstest]
    #[case("BestFitMapping = false", Some(false), None)]
    #[case("BestFitMapping = true", Some(true), None)]
    #[case("BestFitMapping = !true", Some(false), None)]
    #[case("BestFitMapping = (false)", Some(false), None)]
    #[case("BestFitMapping = Flags.Mapping", None, None)]
    #[case("BestFitMapping = Config.Off", Some(false), None)]
    #[case("ThrowOnUnmappableCharacter = false", None, Some(false))]
    #[case("throwOnUnmappableChar = false", None, None)]
    #[case("CharSet = CharSet.Unicode", None, None)]
    fn evaluates_option_values(
        #[case] argument: &str,
        #[case] best_fit: Option<bool>,
        #[case] throw_on_unmappable: Option<bool>,
    ) {
        let context = StaticSemanticContext::with_interop_types().with_constant("Config.Off", false);
        let legacy = context
            .type_by_metadata_name(DEFAULT_LEGACY_ATTRIBUTE)
            .expect("legacy type");
        let source = format!("[DllImport(\"a\", {argument})]");
        let data = context.resolved_options(&attribute(&source), legacy);
        assert_eq!(data.best_fit_mapping, best_fit);
        assert_eq!(data.throw_on_unmappable_char, throw_on_unmappable);
    }

    #[test]
    fn registering_a_type_replaces_its_namesake() {
        let context = StaticSemanticContext::with_interop_types()
            .with_type(AttributeTypeInfo::new(DEFAULT_LEGACY_ATTRIBUTE, Vec::new()));
        let legacy = context
            .type_by_metadata_name(DEFAULT_LEGACY_ATTRIBUTE)
            .expect("legacy type");
        assert!(legacy.properties().is_empty());
    }
}
