//! Turns a flagged method into its converted form.
//!
//! Direct mode replaces the method in place. Guarded mode inserts the
//! converted method under `#if SYMBOL` and keeps the original under
//! `#else`, closing the pair with `#endif`:
//!
//! ```text
//! #if NET7_0_OR_GREATER
//!     [LibraryImport("user32.dll")]
//!     public static partial int MessageBox(...);
//! #else
//!     [DllImport("user32.dll")]
//!     public static extern int MessageBox(...);
//! #endif
//! ```

use interop_syntax::{
    Attribute, AttributeList, MemberPath, MethodDeclaration, SyntaxAnnotation, SyntaxEdit,
    SyntaxNode, Token, Trivia, check_directive_balance, ends_with_end_of_line, line_indentation,
    split_after_last_directive,
};
use tracing::trace;

use crate::error::{ConversionError, PreconditionViolation};
use crate::mode::ConversionMode;
use crate::options::ConversionOptions;

/// A method selected for conversion and where it sits in the tree.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationSite<'d> {
    /// Path of the method in the original tree.
    pub path: &'d MemberPath,
    /// The method itself.
    pub declaration: &'d MethodDeclaration,
    /// Whether only whitespace precedes the method on its line.
    pub at_line_start: bool,
}

/// The edits that convert one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationEdits {
    /// A single in-place replacement.
    Direct {
        /// Replaces the original declaration.
        replace: SyntaxEdit,
    },
    /// An insertion of the guarded declaration, then the legacy replacement.
    Guarded {
        /// Inserts the converted declaration before the original.
        insert: SyntaxEdit,
        /// Replaces the original with the legacy branch.
        replace: SyntaxEdit,
    },
}

impl DeclarationEdits {
    /// The mode that produced the edits.
    #[must_use]
    pub const fn mode(&self) -> ConversionMode {
        match self {
            Self::Direct { .. } => ConversionMode::Direct,
            Self::Guarded { .. } => ConversionMode::PreprocessorGuarded,
        }
    }

    /// The edits in application order.
    #[must_use]
    pub fn into_edits(self) -> Vec<SyntaxEdit> {
        match self {
            Self::Direct { replace } => vec![replace],
            Self::Guarded { insert, replace } => vec![insert, replace],
        }
    }
}

/// Builds converted declarations and the edits that place them.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationTransformer<'o> {
    options: &'o ConversionOptions,
}

impl<'o> DeclarationTransformer<'o> {
    /// Creates a transformer using `options` for the advisory note and the
    /// guard symbol.
    #[must_use]
    pub const fn new(options: &'o ConversionOptions) -> Self {
        Self { options }
    }

    /// Produces the edits converting `site` in `mode`.
    ///
    /// # Errors
    ///
    /// Returns a precondition violation when `old_attribute` is not on the
    /// declaration, the declaration is not `extern` or has a body, and a
    /// structural defect when its directive trivia does not nest.
    pub fn transform(
        &self,
        site: &DeclarationSite<'_>,
        old_attribute: &Attribute,
        new_attribute: &Attribute,
        mode: ConversionMode,
    ) -> Result<DeclarationEdits, ConversionError> {
        let converted = self.convert(site, old_attribute, new_attribute)?;
        let path = site.path.clone();
        trace!(path = %path, mode = %mode, "building declaration edits");
        match mode {
            ConversionMode::Direct => Ok(DeclarationEdits::Direct {
                replace: SyntaxEdit::Replace {
                    target: path,
                    node: converted.into(),
                },
            }),
            ConversionMode::PreprocessorGuarded => {
                let (guarded, legacy) = self.guard(site, &converted)?;
                Ok(DeclarationEdits::Guarded {
                    insert: SyntaxEdit::InsertBefore {
                        anchor: path.clone(),
                        node: guarded.into(),
                    },
                    replace: SyntaxEdit::Replace {
                        target: path,
                        node: legacy.into(),
                    },
                })
            }
        }
    }

    /// Swaps the attribute, flips `extern` to `partial` and attaches the
    /// advisory note.
    fn convert(
        &self,
        site: &DeclarationSite<'_>,
        old_attribute: &Attribute,
        new_attribute: &Attribute,
    ) -> Result<MethodDeclaration, ConversionError> {
        let declaration = site.declaration;
        if !declaration.is_bodiless() {
            return Err(PreconditionViolation::HasBody {
                path: site.path.clone(),
            }
            .into());
        }
        if !declaration.has_modifier("extern") {
            return Err(PreconditionViolation::NotExtern {
                path: site.path.clone(),
            }
            .into());
        }
        let attribute_lists = swap_attribute(declaration, old_attribute, new_attribute)
            .ok_or_else(|| PreconditionViolation::AttributeNotFound {
                path: site.path.clone(),
                attribute: old_attribute.name_text(),
            })?;
        let note = self.options.compatibility_message();
        Ok(declaration
            .with_attribute_lists(attribute_lists)
            .with_modifiers(extern_to_partial(declaration.modifiers()))
            .with_annotation(SyntaxAnnotation::warning(&note)))
    }

    /// Wraps the converted declaration in `#if`/`#else` and closes the
    /// legacy copy with `#endif`.
    fn guard(
        &self,
        site: &DeclarationSite<'_>,
        converted: &MethodDeclaration,
    ) -> Result<(MethodDeclaration, MethodDeclaration), ConversionError> {
        let original = site.declaration;
        check_directive_balance(&inner_trivia(original))
            .map_err(|directive| ConversionError::unbalanced(site.path.clone(), &directive))?;

        let eol = end_of_line_style(original);
        let prior_leading = original.leading_trivia();
        let prior_trailing = original.trailing_trivia();
        let (directive_prefix, rest) = split_after_last_directive(&prior_leading);

        let mut leading = directive_prefix;
        let prefix_len = leading.len();
        if !site.at_line_start {
            leading.push(eol.clone());
        }
        leading.push(Trivia::if_directive(&self.options.condition_symbol, true));
        leading.push(eol.clone());
        leading.extend(rest);

        let mut terminated = prior_trailing.to_vec();
        if !ends_with_end_of_line(&terminated) {
            terminated.push(eol.clone());
        }
        let mut trailing = terminated.clone();
        trailing.push(Trivia::else_directive(false));
        trailing.push(eol.clone());

        let guarded = converted
            .with_leading_trivia(leading)
            .with_trailing_trivia(trailing);

        let mut legacy_trailing = terminated;
        legacy_trailing.push(Trivia::end_if_directive(true));
        legacy_trailing.push(eol);
        let legacy = original
            .with_leading_trivia(line_indentation(&prior_leading))
            .with_trailing_trivia(legacy_trailing);

        let mut produced = all_trivia(&guarded);
        produced.drain(..prefix_len.min(produced.len()));
        produced.extend(all_trivia(&legacy));
        check_directive_balance(&produced)
            .map_err(|directive| ConversionError::unbalanced(site.path.clone(), &directive))?;
        Ok((guarded, legacy))
    }
}

/// Replaces the first attribute equal to `old` with `new`, keeping its
/// place in its list.
fn swap_attribute(
    declaration: &MethodDeclaration,
    old: &Attribute,
    new: &Attribute,
) -> Option<Vec<AttributeList>> {
    let lists = declaration.attribute_lists();
    let (list_index, attribute_index) = lists.iter().enumerate().find_map(|(list_index, list)| {
        list.attributes()
            .iter()
            .position(|attribute| attribute == old)
            .map(|attribute_index| (list_index, attribute_index))
    })?;
    lists
        .iter()
        .enumerate()
        .map(|(index, list)| {
            if index != list_index {
                return Some(list.clone());
            }
            let attributes = list.attributes().replace(attribute_index, new.clone()).ok()?;
            Some(list.with_attributes(attributes))
        })
        .collect()
}

/// Drops `extern` and appends `partial` as the last modifier.
///
/// The leading trivia of `extern` moves to the token that takes its place,
/// so indentation and comments in front of the modifiers survive.
fn extern_to_partial(modifiers: &[Token]) -> Vec<Token> {
    let mut result: Vec<Token> = Vec::with_capacity(modifiers.len() + 1);
    let mut carried: Option<&Token> = None;
    for token in modifiers {
        if token.is("extern") {
            carried = Some(token);
            continue;
        }
        match carried.take() {
            Some(removed) => {
                let leading: Vec<Trivia> = removed
                    .leading_trivia()
                    .iter()
                    .chain(token.leading_trivia().iter())
                    .cloned()
                    .collect();
                result.push(token.with_leading_trivia(leading));
            }
            None => result.push(token.clone()),
        }
    }
    if result.iter().any(|token| token.is("partial")) {
        return result;
    }
    let keyword = Token::identifier("partial");
    result.push(match carried {
        Some(removed) => keyword
            .with_leading_trivia(removed.leading_trivia().clone())
            .with_trailing_trivia(removed.trailing_trivia().clone()),
        None => keyword.with_trailing_space(),
    });
    result
}

/// Trivia strictly inside the declaration: everything except the leading
/// trivia of its first token and the trailing trivia of its last.
fn inner_trivia(declaration: &MethodDeclaration) -> Vec<Trivia> {
    let mut tokens: Vec<&Token> = Vec::new();
    declaration.for_each_token(&mut |token| tokens.push(token));
    let last = tokens.len().saturating_sub(1);
    let mut trivia = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        if index != 0 {
            trivia.extend(token.leading_trivia().iter().cloned());
        }
        if index != last {
            trivia.extend(token.trailing_trivia().iter().cloned());
        }
    }
    trivia
}

fn all_trivia(declaration: &MethodDeclaration) -> Vec<Trivia> {
    let mut trivia = Vec::new();
    declaration.for_each_token(&mut |token| trivia.extend(token.trivia().cloned()));
    trivia
}

/// Reuses the declaration's own line ending so CRLF files stay CRLF.
fn end_of_line_style(declaration: &MethodDeclaration) -> Trivia {
    let mut found = None;
    declaration.for_each_token(&mut |token| {
        if found.is_none() {
            found = token.trivia().find(|piece| piece.is_end_of_line()).cloned();
        }
    });
    found.unwrap_or_else(Trivia::end_of_line)
}
