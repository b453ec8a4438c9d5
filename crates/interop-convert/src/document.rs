//! Parsed source documents and the diagnostics that flag their members.

use interop_syntax::{CompilationUnit, Member, MemberPath, SyntaxNode, TextRange, parse};

use crate::semantic::ImportScope;

/// A parsed source file.
///
/// The document keeps the number of syntax errors the original text had so
/// that produced text can be held to the same standard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    unit: CompilationUnit,
    syntax_errors: usize,
}

impl Document {
    /// Parses `text` into a document.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let result = parse(text);
        let syntax_errors = result.errors().len();
        Self {
            unit: result.into_unit(),
            syntax_errors,
        }
    }

    /// Wraps an already parsed compilation unit.
    #[must_use]
    pub const fn from_unit(unit: CompilationUnit, syntax_errors: usize) -> Self {
        Self {
            unit,
            syntax_errors,
        }
    }

    /// The syntax tree.
    #[must_use]
    pub const fn unit(&self) -> &CompilationUnit {
        &self.unit
    }

    /// The full source text.
    #[must_use]
    pub fn text(&self) -> String {
        self.unit.to_full_string()
    }

    /// Syntax errors reported when the document was parsed.
    #[must_use]
    pub const fn syntax_errors(&self) -> usize {
        self.syntax_errors
    }

    /// Collects the namespaces and `using`s visible at `path`.
    ///
    /// Usings count only when they precede the member's ancestors in the
    /// same member list, matching where C# allows them.
    #[must_use]
    pub fn import_scope(&self, path: &MemberPath) -> ImportScope {
        let mut scope = ImportScope::default();
        let mut members = self.unit.members();
        let mut namespace = String::new();
        for &index in path.indices() {
            for member in members.iter().take(index) {
                let Member::Using(using) = member else {
                    continue;
                };
                if let Some((alias, target)) = using.alias() {
                    scope.aliases.push((alias, target));
                } else if let Some(imported) = using.namespace() {
                    scope.usings.push(imported);
                }
            }
            let Some(member) = members.get(index) else {
                break;
            };
            if let Member::Namespace(declaration) = member {
                for segment in declaration.name().split('.') {
                    if !namespace.is_empty() {
                        namespace.push('.');
                    }
                    namespace.push_str(segment);
                    scope.namespaces.push(namespace.clone());
                }
            }
            members = member.members();
        }
        scope
    }
}

/// An upstream signal that a declaration is eligible for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    id: String,
    span: TextRange,
}

impl Diagnostic {
    /// Creates a diagnostic with its identifier and flagged span.
    #[must_use]
    pub fn new(id: &str, span: TextRange) -> Self {
        Self {
            id: id.to_owned(),
            span,
        }
    }

    /// The diagnostic identifier, e.g. `SYSLIB1054`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The flagged source range.
    #[must_use]
    pub const fn span(&self) -> TextRange {
        self.span
    }
}
