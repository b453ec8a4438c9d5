//! Default values for [`super::ConversionOptions`].

/// Symbol defined when the target runtime supports generated marshalling.
pub const DEFAULT_CONDITION_SYMBOL: &str = "NET7_0_OR_GREATER";

/// Where the caveats of generated marshalling are documented.
pub const DEFAULT_DOCUMENTATION_LINK: &str =
    "https://learn.microsoft.com/dotnet/standard/native-interop/pinvoke-source-generation";

/// Advisory text attached to converted declarations. `{link}` expands to
/// the documentation link.
pub const DEFAULT_COMPATIBILITY_NOTE: &str = "LibraryImport generates marshalling code at \
    compile time; its behaviour can differ from the runtime marshaller used by DllImport. \
    See {link}";

/// Metadata name of the legacy interop attribute.
pub const DEFAULT_LEGACY_ATTRIBUTE: &str = "System.Runtime.InteropServices.DllImportAttribute";

/// Metadata name of the generated-marshalling attribute.
pub const DEFAULT_GENERATED_ATTRIBUTE: &str =
    "System.Runtime.InteropServices.LibraryImportAttribute";

/// Diagnostic that flags convertible declarations.
pub const DEFAULT_DIAGNOSTIC_ID: &str = "SYSLIB1054";

/// Owned condition symbol for serde defaults.
#[must_use]
pub fn default_condition_symbol() -> String {
    DEFAULT_CONDITION_SYMBOL.to_owned()
}

/// Owned documentation link for serde defaults.
#[must_use]
pub fn default_documentation_link() -> String {
    DEFAULT_DOCUMENTATION_LINK.to_owned()
}

/// Owned compatibility note for serde defaults.
#[must_use]
pub fn default_compatibility_note() -> String {
    DEFAULT_COMPATIBILITY_NOTE.to_owned()
}

/// Owned legacy attribute name for serde defaults.
#[must_use]
pub fn default_legacy_attribute() -> String {
    DEFAULT_LEGACY_ATTRIBUTE.to_owned()
}

/// Owned generated attribute name for serde defaults.
#[must_use]
pub fn default_generated_attribute() -> String {
    DEFAULT_GENERATED_ATTRIBUTE.to_owned()
}

/// Owned diagnostic identifier for serde defaults.
#[must_use]
pub fn default_diagnostic_id() -> String {
    DEFAULT_DIAGNOSTIC_ID.to_owned()
}

/// Produced text is checked by the syntactic lock unless disabled.
#[must_use]
pub const fn default_verify_output() -> bool {
    true
}
