//! Non-printing annotations carried by nodes.

use std::fmt;
use std::sync::Arc;

/// What an annotation tells the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// A caveat the caller should show next to the proposed change.
    Warning,
}

/// Advisory data attached to a node.
///
/// Annotations never affect printed text, spans or equality of the printed
/// tree; they only travel with the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxAnnotation {
    kind: AnnotationKind,
    data: Arc<str>,
}

impl SyntaxAnnotation {
    /// Creates a warning annotation.
    #[must_use]
    pub fn warning(data: &str) -> Self {
        Self {
            kind: AnnotationKind::Warning,
            data: Arc::from(data),
        }
    }

    /// Returns the annotation kind.
    #[must_use]
    pub const fn kind(&self) -> AnnotationKind {
        self.kind
    }

    /// Returns the annotation payload.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }
}

impl fmt::Display for SyntaxAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AnnotationKind::Warning => write!(f, "warning: {}", self.data),
        }
    }
}
