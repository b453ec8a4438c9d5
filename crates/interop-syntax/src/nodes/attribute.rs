//! Attribute lists, attributes and their arguments.

use std::sync::Arc;

use super::{SeparatedList, SyntaxNode, first_of, last_of, plain_text, replace_first_of, replace_last_of};
use crate::token::Token;

/// How an attribute argument is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentKind {
    /// `value`.
    Positional,
    /// `Name = value`, a property or field assignment.
    NameEquals,
    /// `name: value`, a named constructor parameter.
    NameColon,
}

/// A single attribute argument. The value is an opaque token run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeArgument {
    name: Option<Token>,
    separator: Option<Token>,
    expression: Arc<[Token]>,
}

impl AttributeArgument {
    /// Creates a positional argument.
    #[must_use]
    pub fn positional(expression: Vec<Token>) -> Self {
        Self {
            name: None,
            separator: None,
            expression: Arc::from(expression),
        }
    }

    /// Creates a `Name = value` argument.
    #[must_use]
    pub fn name_equals(name: Token, equals: Token, expression: Vec<Token>) -> Self {
        Self {
            name: Some(name),
            separator: Some(equals),
            expression: Arc::from(expression),
        }
    }

    /// Classifies a raw token run the way the parser does.
    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Self {
        let is_named = match (tokens.first(), tokens.get(1)) {
            (Some(name), Some(separator)) => {
                name.is_word() && (separator.is("=") || separator.is(":"))
            }
            _ => false,
        };
        if !is_named {
            return Self::positional(tokens);
        }
        let mut rest = tokens.into_iter();
        let name = rest.next();
        let separator = rest.next();
        Self {
            name,
            separator,
            expression: rest.collect(),
        }
    }

    /// Returns how the argument is written.
    #[must_use]
    pub fn kind(&self) -> ArgumentKind {
        match &self.separator {
            Some(separator) if separator.is(":") => ArgumentKind::NameColon,
            Some(_) => ArgumentKind::NameEquals,
            None => ArgumentKind::Positional,
        }
    }

    /// Returns the argument name as written, for named arguments.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(Token::text)
    }

    /// Returns the value tokens.
    #[must_use]
    pub fn expression(&self) -> &[Token] {
        &self.expression
    }

    /// Returns the value text without surrounding trivia.
    #[must_use]
    pub fn expression_text(&self) -> String {
        let full = self.expression.to_full_string();
        let leading = self
            .expression
            .first()
            .map_or(0, Token::leading_width);
        let trailing = self
            .expression
            .last()
            .map_or(0, Token::trailing_width);
        full.get(leading..full.len().saturating_sub(trailing))
            .unwrap_or_default()
            .to_owned()
    }
}

impl SyntaxNode for AttributeArgument {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        if let Some(name) = &self.name {
            visit(name);
        }
        if let Some(separator) = &self.separator {
            visit(separator);
        }
        self.expression.for_each_token(visit);
    }

    fn first_token(&self) -> Option<&Token> {
        self.name
            .as_ref()
            .or(self.separator.as_ref())
            .or_else(|| self.expression.first())
    }

    fn last_token(&self) -> Option<&Token> {
        self.expression
            .last()
            .or(self.separator.as_ref())
            .or(self.name.as_ref())
    }

    fn replace_first_token(&self, token: Token) -> Self {
        if self.name.is_some() {
            return Self {
                name: Some(token),
                ..self.clone()
            };
        }
        if self.separator.is_some() {
            return Self {
                separator: Some(token),
                ..self.clone()
            };
        }
        Self {
            expression: self.expression.replace_first_token(token),
            ..self.clone()
        }
    }

    fn replace_last_token(&self, token: Token) -> Self {
        if !self.expression.is_empty() {
            return Self {
                expression: self.expression.replace_last_token(token),
                ..self.clone()
            };
        }
        if self.separator.is_some() {
            return Self {
                separator: Some(token),
                ..self.clone()
            };
        }
        if self.name.is_some() {
            return Self {
                name: Some(token),
                ..self.clone()
            };
        }
        self.clone()
    }
}

/// `( arguments )` following an attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeArgumentList {
    open: Token,
    arguments: SeparatedList<AttributeArgument>,
    close: Token,
}

impl AttributeArgumentList {
    /// Creates an argument list.
    #[must_use]
    pub const fn new(
        open: Token,
        arguments: SeparatedList<AttributeArgument>,
        close: Token,
    ) -> Self {
        Self {
            open,
            arguments,
            close,
        }
    }

    /// Returns the arguments.
    #[must_use]
    pub const fn arguments(&self) -> &SeparatedList<AttributeArgument> {
        &self.arguments
    }

    /// Returns a copy with the arguments replaced.
    #[must_use]
    pub fn with_arguments(&self, arguments: SeparatedList<AttributeArgument>) -> Self {
        Self {
            arguments,
            ..self.clone()
        }
    }
}

impl SyntaxNode for AttributeArgumentList {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        visit(&self.open);
        self.arguments.for_each_token(visit);
        visit(&self.close);
    }

    fn first_token(&self) -> Option<&Token> {
        Some(&self.open)
    }

    fn last_token(&self) -> Option<&Token> {
        Some(&self.close)
    }

    fn replace_first_token(&self, token: Token) -> Self {
        Self {
            open: token,
            ..self.clone()
        }
    }

    fn replace_last_token(&self, token: Token) -> Self {
        Self {
            close: token,
            ..self.clone()
        }
    }
}

/// An attribute: a type reference with optional arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    name: Arc<[Token]>,
    arguments: Option<AttributeArgumentList>,
}

impl Attribute {
    /// Creates an attribute from its name tokens and argument list.
    #[must_use]
    pub fn new(name: Vec<Token>, arguments: Option<AttributeArgumentList>) -> Self {
        Self {
            name: Arc::from(name),
            arguments,
        }
    }

    /// Returns the name tokens (`System`, `.`, `DllImport`, ...).
    #[must_use]
    pub fn name_tokens(&self) -> &[Token] {
        &self.name
    }

    /// Returns the type reference as written, without trivia.
    #[must_use]
    pub fn name_text(&self) -> String {
        plain_text(&self.name)
    }

    /// Returns the argument list, if present.
    #[must_use]
    pub const fn argument_list(&self) -> Option<&AttributeArgumentList> {
        self.arguments.as_ref()
    }

    /// Iterates the arguments; empty when there is no argument list.
    pub fn arguments(&self) -> impl Iterator<Item = &AttributeArgument> {
        self.arguments
            .iter()
            .flat_map(|list| list.arguments().iter())
    }

    /// Returns a copy referring to a different type.
    ///
    /// The leading trivia of the old first name token and the trailing
    /// trivia of the old last name token move onto the new name.
    #[must_use]
    pub fn with_name(&self, name: Vec<Token>) -> Self {
        let mut tokens: Arc<[Token]> = Arc::from(name);
        if let Some(first) = self.name.first() {
            tokens = tokens.with_leading_trivia(first.leading_trivia().clone());
        }
        if let Some(last) = self.name.last() {
            tokens = tokens.with_trailing_trivia(last.trailing_trivia().clone());
        }
        Self {
            name: tokens,
            arguments: self.arguments.clone(),
        }
    }

    /// Returns a copy with a different argument list.
    #[must_use]
    pub fn with_argument_list(&self, arguments: Option<AttributeArgumentList>) -> Self {
        Self {
            name: self.name.clone(),
            arguments,
        }
    }
}

impl SyntaxNode for Attribute {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        self.name.for_each_token(visit);
        if let Some(arguments) = &self.arguments {
            arguments.for_each_token(visit);
        }
    }

    fn first_token(&self) -> Option<&Token> {
        self.name
            .first()
            .or_else(|| self.arguments.as_ref().and_then(SyntaxNode::first_token))
    }

    fn last_token(&self) -> Option<&Token> {
        self.arguments
            .as_ref()
            .and_then(SyntaxNode::last_token)
            .or_else(|| self.name.last())
    }

    fn replace_first_token(&self, token: Token) -> Self {
        if self.name.is_empty() {
            return Self {
                arguments: self
                    .arguments
                    .as_ref()
                    .map(|arguments| arguments.replace_first_token(token)),
                ..self.clone()
            };
        }
        Self {
            name: self.name.replace_first_token(token),
            ..self.clone()
        }
    }

    fn replace_last_token(&self, token: Token) -> Self {
        match &self.arguments {
            Some(arguments) => Self {
                arguments: Some(arguments.replace_last_token(token)),
                ..self.clone()
            },
            None => Self {
                name: self.name.replace_last_token(token),
                ..self.clone()
            },
        }
    }
}

/// The `target:` prefix of an attribute list (`[return: ...]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeTarget {
    identifier: Token,
    colon: Token,
}

impl AttributeTarget {
    /// Creates a target prefix.
    #[must_use]
    pub const fn new(identifier: Token, colon: Token) -> Self {
        Self { identifier, colon }
    }

    /// Returns the target name (`return`, `method`, ...).
    #[must_use]
    pub fn name(&self) -> &str {
        self.identifier.text()
    }
}

/// `[ target: Attr1, Attr2(...) ]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeList {
    open: Token,
    target: Option<AttributeTarget>,
    attributes: SeparatedList<Attribute>,
    close: Token,
}

impl AttributeList {
    /// Creates an attribute list.
    #[must_use]
    pub const fn new(
        open: Token,
        target: Option<AttributeTarget>,
        attributes: SeparatedList<Attribute>,
        close: Token,
    ) -> Self {
        Self {
            open,
            target,
            attributes,
            close,
        }
    }

    /// Returns the target prefix, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&AttributeTarget> {
        self.target.as_ref()
    }

    /// Returns the attributes.
    #[must_use]
    pub const fn attributes(&self) -> &SeparatedList<Attribute> {
        &self.attributes
    }

    /// Returns a copy with the attributes replaced.
    #[must_use]
    pub fn with_attributes(&self, attributes: SeparatedList<Attribute>) -> Self {
        Self {
            attributes,
            ..self.clone()
        }
    }
}

impl SyntaxNode for AttributeList {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        visit(&self.open);
        if let Some(target) = &self.target {
            visit(&target.identifier);
            visit(&target.colon);
        }
        self.attributes.for_each_token(visit);
        visit(&self.close);
    }

    fn first_token(&self) -> Option<&Token> {
        Some(&self.open)
    }

    fn last_token(&self) -> Option<&Token> {
        Some(&self.close)
    }

    fn replace_first_token(&self, token: Token) -> Self {
        Self {
            open: token,
            ..self.clone()
        }
    }

    fn replace_last_token(&self, token: Token) -> Self {
        Self {
            close: token,
            ..self.clone()
        }
    }
}

/// Attribute lists as a run behave like one node.
impl SyntaxNode for Arc<[AttributeList]> {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        for list in self.iter() {
            list.for_each_token(visit);
        }
    }

    fn first_token(&self) -> Option<&Token> {
        first_of(self)
    }

    fn last_token(&self) -> Option<&Token> {
        last_of(self)
    }

    fn replace_first_token(&self, token: Token) -> Self {
        replace_first_of(self, token).unwrap_or_else(|| self.clone())
    }

    fn replace_last_token(&self, token: Token) -> Self {
        replace_last_of(self, token).unwrap_or_else(|| self.clone())
    }
}
