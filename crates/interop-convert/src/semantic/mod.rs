//! Read-only semantic services consumed by the conversion.
//!
//! The engine never resolves symbols itself. It asks a [`SemanticContext`]
//! which attribute type a syntactic attribute refers to and what values
//! its options resolve to. [`StaticSemanticContext`] is a table-driven
//! implementation suitable for tests and for hosts without a compiler.

mod static_context;

pub use static_context::StaticSemanticContext;

use interop_syntax::Attribute;

/// A property an attribute type exposes to named arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeProperty {
    name: String,
    aliases: Vec<String>,
}

impl AttributeProperty {
    /// Creates a property with its canonical identifier.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            aliases: Vec::new(),
        }
    }

    /// Adds a source spelling that resolves to this property.
    #[must_use]
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_owned());
        self
    }

    /// The canonical identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `written` names this property, exactly and case-sensitively.
    #[must_use]
    pub fn is_named(&self, written: &str) -> bool {
        self.name == written || self.aliases.iter().any(|alias| alias == written)
    }
}

/// Identity and property table of an attribute type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTypeInfo {
    metadata_name: String,
    properties: Vec<AttributeProperty>,
}

impl AttributeTypeInfo {
    /// Creates a type from its fully qualified metadata name.
    #[must_use]
    pub fn new(metadata_name: &str, properties: Vec<AttributeProperty>) -> Self {
        Self {
            metadata_name: metadata_name.to_owned(),
            properties,
        }
    }

    /// `System.Runtime.InteropServices.DllImportAttribute`, for instance.
    #[must_use]
    pub fn metadata_name(&self) -> &str {
        &self.metadata_name
    }

    /// The namespace part of the metadata name; empty for global types.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.metadata_name
            .rsplit_once('.')
            .map_or("", |(namespace, _)| namespace)
    }

    /// The type name without its namespace.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.metadata_name
            .rsplit_once('.')
            .map_or(self.metadata_name.as_str(), |(_, name)| name)
    }

    /// The name as usually written in source, without an `Attribute` suffix.
    #[must_use]
    pub fn short_name(&self) -> &str {
        let name = self.type_name();
        match name.strip_suffix("Attribute") {
            Some(short) if !short.is_empty() => short,
            _ => name,
        }
    }

    /// The declared properties.
    #[must_use]
    pub fn properties(&self) -> &[AttributeProperty] {
        &self.properties
    }

    /// Resolves a written argument name to the canonical property identifier.
    #[must_use]
    pub fn canonical_property(&self, written: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|property| property.is_named(written))
            .map(AttributeProperty::name)
    }
}

/// Options of the legacy attribute that the generated form makes redundant
/// when they are `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyOption {
    /// `BestFitMapping`.
    BestFitMapping,
    /// `ThrowOnUnmappableChar`.
    ThrowOnUnmappableChar,
}

impl LegacyOption {
    /// Every legacy-only option.
    pub const ALL: [Self; 2] = [Self::BestFitMapping, Self::ThrowOnUnmappableChar];

    /// The canonical property identifier.
    #[must_use]
    pub const fn property_name(self) -> &'static str {
        match self {
            Self::BestFitMapping => "BestFitMapping",
            Self::ThrowOnUnmappableChar => "ThrowOnUnmappableChar",
        }
    }

    /// Looks up an option by canonical property identifier.
    #[must_use]
    pub fn from_property_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.property_name() == name)
    }

    /// The value the generated attribute already implies.
    #[must_use]
    pub const fn redundant_value(self) -> bool {
        match self {
            Self::BestFitMapping | Self::ThrowOnUnmappableChar => false,
        }
    }
}

/// Resolved values of the legacy-only options of one attribute.
///
/// `None` means the option is unset or its value could not be determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedOptionData {
    /// Resolved `BestFitMapping`.
    pub best_fit_mapping: Option<bool>,
    /// Resolved `ThrowOnUnmappableChar`.
    pub throw_on_unmappable_char: Option<bool>,
}

impl ResolvedOptionData {
    /// Returns the resolved value of `option`.
    #[must_use]
    pub const fn get(&self, option: LegacyOption) -> Option<bool> {
        match option {
            LegacyOption::BestFitMapping => self.best_fit_mapping,
            LegacyOption::ThrowOnUnmappableChar => self.throw_on_unmappable_char,
        }
    }

    /// Returns a copy with `option` set.
    #[must_use]
    pub const fn with(mut self, option: LegacyOption, value: Option<bool>) -> Self {
        match option {
            LegacyOption::BestFitMapping => self.best_fit_mapping = value,
            LegacyOption::ThrowOnUnmappableChar => self.throw_on_unmappable_char = value,
        }
        self
    }

    /// Whether `option` resolves to the value the generated form implies.
    #[must_use]
    pub fn is_redundant(&self, option: LegacyOption) -> bool {
        self.get(option) == Some(option.redundant_value())
    }
}

/// Names in scope at a declaration: enclosing namespaces and `using`s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportScope {
    /// Enclosing namespaces, outermost first, fully qualified.
    pub namespaces: Vec<String>,
    /// Namespaces imported with `using`.
    pub usings: Vec<String>,
    /// `using Alias = Target;` pairs.
    pub aliases: Vec<(String, String)>,
}

impl ImportScope {
    /// Returns the target of a `using` alias.
    #[must_use]
    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(alias, _)| alias == name)
            .map(|(_, target)| target.as_str())
    }

    /// Namespaces searched for a simple name, innermost enclosing namespace
    /// first, then imported namespaces, then the global namespace.
    pub fn search_namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces
            .iter()
            .rev()
            .chain(self.usings.iter())
            .map(String::as_str)
            .chain(std::iter::once(""))
    }
}

/// Symbol services the conversion reads from.
///
/// Implementations must be deterministic for the duration of a conversion.
pub trait SemanticContext {
    /// Looks up an attribute type by fully qualified metadata name.
    fn type_by_metadata_name(&self, metadata_name: &str) -> Option<&AttributeTypeInfo>;

    /// Resolves the type an attribute refers to from the names in scope.
    fn resolve_attribute(
        &self,
        attribute: &Attribute,
        scope: &ImportScope,
    ) -> Option<&AttributeTypeInfo>;

    /// Resolves the legacy-only option values set on `attribute`.
    fn resolved_options(
        &self,
        attribute: &Attribute,
        attribute_type: &AttributeTypeInfo,
    ) -> ResolvedOptionData;
}
