//! Immutable syntax nodes.
//!
//! Every node is a plain value: cloning shares children through `Arc`, and
//! every `with_*` method returns a new node that reuses the untouched parts
//! of the original. Nothing in this module mutates a node in place.

mod annotation;
mod attribute;
mod list;
mod member;
mod unit;

use std::sync::Arc;

pub use annotation::{AnnotationKind, SyntaxAnnotation};
pub use attribute::{
    ArgumentKind, Attribute, AttributeArgument, AttributeArgumentList, AttributeList,
    AttributeTarget,
};
pub use list::SeparatedList;
pub use member::{
    Member, MethodBody, MethodDeclaration, NamespaceBody, NamespaceDeclaration, OpaqueMember,
    TypeBody, TypeDeclaration, UsingDirective,
};
pub use unit::{CompilationUnit, LocatedMember};

use crate::token::Token;
use crate::trivia::TriviaList;

/// Behaviour shared by every node: token traversal and trivia access.
pub trait SyntaxNode: Clone {
    /// Visits every token of the node in source order.
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token));

    /// Returns the first token, if the node has any.
    fn first_token(&self) -> Option<&Token>;

    /// Returns the last token, if the node has any.
    fn last_token(&self) -> Option<&Token>;

    /// Returns a copy with the first token swapped for `token`.
    #[must_use]
    fn replace_first_token(&self, token: Token) -> Self;

    /// Returns a copy with the last token swapped for `token`.
    #[must_use]
    fn replace_last_token(&self, token: Token) -> Self;

    /// Leading trivia of the first token.
    fn leading_trivia(&self) -> TriviaList {
        self.first_token()
            .map(|token| token.leading_trivia().clone())
            .unwrap_or_default()
    }

    /// Trailing trivia of the last token.
    fn trailing_trivia(&self) -> TriviaList {
        self.last_token()
            .map(|token| token.trailing_trivia().clone())
            .unwrap_or_default()
    }

    /// Returns a copy whose first token carries `trivia` as leading trivia.
    #[must_use]
    fn with_leading_trivia(&self, trivia: impl Into<TriviaList>) -> Self {
        match self.first_token() {
            Some(token) => self.replace_first_token(token.with_leading_trivia(trivia)),
            None => self.clone(),
        }
    }

    /// Returns a copy whose last token carries `trivia` as trailing trivia.
    #[must_use]
    fn with_trailing_trivia(&self, trivia: impl Into<TriviaList>) -> Self {
        match self.last_token() {
            Some(token) => self.replace_last_token(token.with_trailing_trivia(trivia)),
            None => self.clone(),
        }
    }

    /// Prints the node exactly, trivia included.
    fn to_full_string(&self) -> String {
        let mut out = String::new();
        self.for_each_token(&mut |token| out.push_str(&token.to_string()));
        out
    }

    /// Length of the printed node in bytes, trivia included.
    fn full_width(&self) -> usize {
        let mut width = 0;
        self.for_each_token(&mut |token| width += token.full_width());
        width
    }

    /// Number of tokens with text, ignoring zero-width placeholders.
    fn token_count(&self) -> usize {
        let mut count = 0;
        self.for_each_token(&mut |token| {
            if !token.text().is_empty() {
                count += 1;
            }
        });
        count
    }
}

impl SyntaxNode for Token {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        visit(self);
    }

    fn first_token(&self) -> Option<&Token> {
        Some(self)
    }

    fn last_token(&self) -> Option<&Token> {
        Some(self)
    }

    fn replace_first_token(&self, token: Token) -> Self {
        token
    }

    fn replace_last_token(&self, token: Token) -> Self {
        token
    }
}

/// Token runs behave as nodes so signatures and bodies compose uniformly.
impl SyntaxNode for Arc<[Token]> {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        self.iter().for_each(visit);
    }

    fn first_token(&self) -> Option<&Token> {
        self.first()
    }

    fn last_token(&self) -> Option<&Token> {
        self.last()
    }

    fn replace_first_token(&self, token: Token) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        replace_at(self, 0, token)
    }

    fn replace_last_token(&self, token: Token) -> Self {
        match self.len().checked_sub(1) {
            Some(last) => replace_at(self, last, token),
            None => self.clone(),
        }
    }
}

/// Rebuilds `items` with the element at `index` replaced.
pub(crate) fn replace_at<T: Clone>(items: &[T], index: usize, item: T) -> Arc<[T]> {
    let mut replacement = Some(item);
    items
        .iter()
        .enumerate()
        .map(|(idx, existing)| {
            if idx == index {
                replacement.take().unwrap_or_else(|| existing.clone())
            } else {
                existing.clone()
            }
        })
        .collect()
}

/// First token across a sequence of nodes.
pub(crate) fn first_of<T: SyntaxNode>(nodes: &[T]) -> Option<&Token> {
    nodes.iter().find_map(SyntaxNode::first_token)
}

/// Last token across a sequence of nodes.
pub(crate) fn last_of<T: SyntaxNode>(nodes: &[T]) -> Option<&Token> {
    nodes.iter().rev().find_map(SyntaxNode::last_token)
}

/// Replaces the first token across a sequence of nodes, if any has one.
pub(crate) fn replace_first_of<T: SyntaxNode>(nodes: &[T], token: Token) -> Option<Arc<[T]>> {
    let index = nodes.iter().position(|node| node.first_token().is_some())?;
    let node = nodes.get(index)?;
    Some(replace_at(nodes, index, node.replace_first_token(token)))
}

/// Replaces the last token across a sequence of nodes, if any has one.
pub(crate) fn replace_last_of<T: SyntaxNode>(nodes: &[T], token: Token) -> Option<Arc<[T]>> {
    let index = nodes.iter().rposition(|node| node.last_token().is_some())?;
    let node = nodes.get(index)?;
    Some(replace_at(nodes, index, node.replace_last_token(token)))
}

/// Concatenates token texts without trivia.
pub(crate) fn plain_text(tokens: &[Token]) -> String {
    tokens.iter().map(Token::text).collect()
}
