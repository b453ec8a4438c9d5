use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How a flagged declaration is converted.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConversionMode {
    /// Replace the declaration in place.
    #[default]
    Direct,
    /// Emit the new declaration under `#if`, keeping the legacy one under
    /// `#else`.
    PreprocessorGuarded,
}

/// Errors encountered while parsing a [`ConversionMode`] from text.
pub type ConversionModeParseError = strum::ParseError;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("direct", ConversionMode::Direct)]
    #[case("preprocessor_guarded", ConversionMode::PreprocessorGuarded)]
    #[case("Preprocessor_Guarded", ConversionMode::PreprocessorGuarded)]
    fn parses_from_text(#[case] text: &str, #[case] expected: ConversionMode) {
        assert_eq!(ConversionMode::from_str(text), Ok(expected));
    }

    #[test]
    fn rejects_unknown_modes() {
        assert!(ConversionMode::from_str("inline").is_err());
    }

    #[test]
    fn displays_in_snake_case() {
        assert_eq!(
            ConversionMode::PreprocessorGuarded.to_string(),
            "preprocessor_guarded"
        );
    }
}
