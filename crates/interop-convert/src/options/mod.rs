//! Conversion settings.
//!
//! Every field has a default, so an empty JSON object (or
//! [`ConversionOptions::default`]) yields a usable configuration. The
//! condition symbol and documentation link are injectable so callers can
//! target a different runtime check or point at their own guidance.

pub mod defaults;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings threaded through every conversion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionOptions {
    /// Symbol tested by `#if` in guarded conversions.
    pub condition_symbol: String,
    /// Documentation link attached to the advisory note.
    pub documentation_link: String,
    /// Advisory text; `{link}` expands to [`Self::documentation_link`].
    pub compatibility_note: String,
    /// Metadata name of the attribute being converted away from.
    pub legacy_attribute: String,
    /// Metadata name of the attribute being converted to.
    pub generated_attribute: String,
    /// Diagnostic identifier the fixer responds to.
    pub diagnostic_id: String,
    /// Whether produced text is re-validated with the Tree-sitter grammar.
    pub verify_output: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            condition_symbol: defaults::default_condition_symbol(),
            documentation_link: defaults::default_documentation_link(),
            compatibility_note: defaults::default_compatibility_note(),
            legacy_attribute: defaults::default_legacy_attribute(),
            generated_attribute: defaults::default_generated_attribute(),
            diagnostic_id: defaults::default_diagnostic_id(),
            verify_output: defaults::default_verify_output(),
        }
    }
}

impl ConversionOptions {
    /// Parses and validates options from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields
    /// and [`ConfigError::InvalidValue`] for values that fail validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks that every field holds a usable value.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_identifier(&self.condition_symbol) {
            return Err(ConfigError::invalid_value(
                "condition_symbol",
                format!("'{}' is not a preprocessor symbol", self.condition_symbol),
            ));
        }
        if self.documentation_link.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "documentation_link",
                "must not be empty",
            ));
        }
        if self.compatibility_note.contains(['\r', '\n']) {
            return Err(ConfigError::invalid_value(
                "compatibility_note",
                "must be a single line",
            ));
        }
        for (field, name) in [
            ("legacy_attribute", &self.legacy_attribute),
            ("generated_attribute", &self.generated_attribute),
        ] {
            if !is_metadata_name(name) {
                return Err(ConfigError::invalid_value(
                    field,
                    format!("'{name}' is not a qualified type name"),
                ));
            }
        }
        if self.legacy_attribute == self.generated_attribute {
            return Err(ConfigError::invalid_value(
                "generated_attribute",
                "must differ from legacy_attribute",
            ));
        }
        if self.diagnostic_id.trim().is_empty() {
            return Err(ConfigError::invalid_value("diagnostic_id", "must not be empty"));
        }
        Ok(())
    }

    /// The advisory note with the documentation link substituted.
    #[must_use]
    pub fn compatibility_message(&self) -> String {
        self.compatibility_note
            .replace("{link}", &self.documentation_link)
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn is_metadata_name(text: &str) -> bool {
    text.split('.').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let options = ConversionOptions::from_json("{}").expect("defaults are valid");
        assert_eq!(options, ConversionOptions::default());
        assert_eq!(options.condition_symbol, "NET7_0_OR_GREATER");
        assert!(options.verify_output);
    }

    #[test]
    fn overrides_individual_fields() {
        let options = ConversionOptions::from_json(
            r#"{"condition_symbol": "USE_GENERATED", "documentation_link": "https://example.test/interop"}"#,
        )
        .expect("valid options");
        assert_eq!(options.condition_symbol, "USE_GENERATED");
        assert_eq!(options.diagnostic_id, "SYSLIB1054");
        assert!(
            options
                .compatibility_message()
                .ends_with("See https://example.test/interop")
        );
    }

    #[rstest]
    #[case(r#"{"condition_symbol": "NET 7"}"#, "condition_symbol")]
    #[case(r#"{"condition_symbol": "7NET"}"#, "condition_symbol")]
    #[case(r#"{"documentation_link": "  "}"#, "documentation_link")]
    #[case(r#"{"compatibility_note": "two\nlines"}"#, "compatibility_note")]
    #[case(r#"{"legacy_attribute": "Interop..Legacy"}"#, "legacy_attribute")]
    #[case(
        r#"{"generated_attribute": "System.Runtime.InteropServices.DllImportAttribute"}"#,
        "generated_attribute"
    )]
    #[case(r#"{"diagnostic_id": ""}"#, "diagnostic_id")]
    fn rejects_invalid_values(#[case] json: &str, #[case] expected_field: &str) {
        let error = ConversionOptions::from_json(json).expect_err("invalid options");
        assert!(
            matches!(error, ConfigError::InvalidValue { field, .. } if field == expected_field),
            "unexpected error: {error}"
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        let error = ConversionOptions::from_json(r#"{"symbol": "X"}"#).expect_err("unknown field");
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}
