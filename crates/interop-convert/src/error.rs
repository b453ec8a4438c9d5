//! Error types for conversions and their configuration.
//!
//! Conversion failures fall into two classes. Precondition violations mean
//! the flagged declaration is not something the engine converts; callers
//! treat them as "no edit produced". Structural defects mean a conversion
//! was attempted and found to be unsafe; the attempt is discarded and the
//! original tree stays untouched.

use interop_syntax::{MemberPath, SyntaxError, UnbalancedDirective};
use thiserror::Error;

/// Why a flagged declaration cannot be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PreconditionViolation {
    /// A required attribute type is not known to the semantic context.
    #[error("type '{metadata_name}' is not available in the compilation")]
    MissingType {
        /// Metadata name that failed to resolve.
        metadata_name: String,
    },

    /// The diagnostic does not point inside any member.
    #[error("diagnostic {diagnostic_id} does not point at a declaration")]
    NoDeclaration {
        /// The diagnostic identifier.
        diagnostic_id: String,
    },

    /// The located member is not a method declaration.
    #[error("member at {path} is not a method declaration")]
    NotAMethod {
        /// Path of the located member.
        path: MemberPath,
    },

    /// The method carries no legacy interop attribute.
    #[error("method at {path} has no {attribute} attribute")]
    AttributeNotFound {
        /// Path of the method.
        path: MemberPath,
        /// Metadata name of the expected attribute.
        attribute: String,
    },

    /// The method carries more than one legacy interop attribute.
    #[error("method at {path} has {count} {attribute} attributes")]
    AmbiguousAttribute {
        /// Path of the method.
        path: MemberPath,
        /// Metadata name of the expected attribute.
        attribute: String,
        /// How many matched.
        count: usize,
    },

    /// The method is not declared `extern`.
    #[error("method at {path} is not declared extern")]
    NotExtern {
        /// Path of the method.
        path: MemberPath,
    },

    /// The method has a body.
    #[error("method at {path} has a body")]
    HasBody {
        /// Path of the method.
        path: MemberPath,
    },

    /// The diagnostic carries an identifier this fixer does not handle.
    #[error("diagnostic {diagnostic_id} is not handled by this fixer")]
    UnhandledDiagnostic {
        /// The diagnostic identifier.
        diagnostic_id: String,
    },

    /// The equivalence key does not name a conversion variant.
    #[error("unknown conversion key '{key}'")]
    UnknownEquivalenceKey {
        /// The unrecognised key.
        key: String,
    },
}

/// Errors from a conversion attempt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// The declaration is not eligible; no edit is produced.
    #[error("precondition violated: {0}")]
    Precondition(#[from] PreconditionViolation),

    /// The conversion would produce malformed or unsafe output.
    #[error("structural defect at {path}: {message}")]
    StructuralDefect {
        /// Path of the declaration being converted.
        path: MemberPath,
        /// Description of the defect.
        message: String,
    },

    /// The syntax layer rejected an edit or could not validate output.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The options the engine was built with are unusable.
    #[error("invalid conversion options: {0}")]
    Config(#[from] ConfigError),
}

impl ConversionError {
    /// Creates a structural defect error.
    #[must_use]
    pub fn structural_defect(path: MemberPath, message: impl Into<String>) -> Self {
        Self::StructuralDefect {
            path,
            message: message.into(),
        }
    }

    /// Creates a structural defect for unbalanced directive trivia.
    #[must_use]
    pub fn unbalanced(path: MemberPath, directive: &UnbalancedDirective) -> Self {
        Self::structural_defect(path, directive.to_string())
    }

    /// Whether the error only means "no edit produced".
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

/// Errors from loading or validating [`crate::ConversionOptions`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The options document could not be deserialised.
    #[error("failed to parse conversion options: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the engine cannot use.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

impl ConfigError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}
