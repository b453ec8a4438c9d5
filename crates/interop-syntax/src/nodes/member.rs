//! Members of compilation units, namespaces and types.

use std::sync::Arc;

use super::{
    AttributeList, SyntaxAnnotation, SyntaxNode, first_of, last_of, plain_text, replace_first_of,
    replace_last_of,
};
use crate::token::Token;

/// The body of a method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MethodBody {
    /// `;` with no body.
    Semicolon(Token),
    /// `{ ... }`, kept as an opaque token run.
    Block(Arc<[Token]>),
    /// `=> expression;`, kept as an opaque token run including the `;`.
    Expression(Arc<[Token]>),
}

impl SyntaxNode for MethodBody {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        match self {
            Self::Semicolon(token) => visit(token),
            Self::Block(tokens) | Self::Expression(tokens) => tokens.for_each_token(visit),
        }
    }

    fn first_token(&self) -> Option<&Token> {
        match self {
            Self::Semicolon(token) => Some(token),
            Self::Block(tokens) | Self::Expression(tokens) => tokens.first(),
        }
    }

    fn last_token(&self) -> Option<&Token> {
        match self {
            Self::Semicolon(token) => Some(token),
            Self::Block(tokens) | Self::Expression(tokens) => tokens.last(),
        }
    }

    fn replace_first_token(&self, token: Token) -> Self {
        match self {
            Self::Semicolon(_) => Self::Semicolon(token),
            Self::Block(tokens) => Self::Block(tokens.replace_first_token(token)),
            Self::Expression(tokens) => Self::Expression(tokens.replace_first_token(token)),
        }
    }

    fn replace_last_token(&self, token: Token) -> Self {
        match self {
            Self::Semicolon(_) => Self::Semicolon(token),
            Self::Block(tokens) => Self::Block(tokens.replace_last_token(token)),
            Self::Expression(tokens) => Self::Expression(tokens.replace_last_token(token)),
        }
    }
}

/// A method declaration: attributes, modifiers, signature and body.
///
/// The signature holds every token between the modifiers and the body:
/// return type, name, type parameters, parameter list and constraints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDeclaration {
    attribute_lists: Arc<[AttributeList]>,
    modifiers: Arc<[Token]>,
    signature: Arc<[Token]>,
    body: MethodBody,
    annotations: Arc<[SyntaxAnnotation]>,
}

impl MethodDeclaration {
    /// Creates a method declaration.
    #[must_use]
    pub fn new(
        attribute_lists: Vec<AttributeList>,
        modifiers: Vec<Token>,
        signature: Vec<Token>,
        body: MethodBody,
    ) -> Self {
        Self {
            attribute_lists: Arc::from(attribute_lists),
            modifiers: Arc::from(modifiers),
            signature: Arc::from(signature),
            body,
            annotations: Arc::from(Vec::new()),
        }
    }

    /// Returns the attribute lists in source order.
    #[must_use]
    pub fn attribute_lists(&self) -> &[AttributeList] {
        &self.attribute_lists
    }

    /// Returns the modifier tokens in source order.
    #[must_use]
    pub fn modifiers(&self) -> &[Token] {
        &self.modifiers
    }

    /// Whether a modifier with the given text is present.
    #[must_use]
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|token| token.is(modifier))
    }

    /// Returns the signature tokens.
    #[must_use]
    pub fn signature(&self) -> &[Token] {
        &self.signature
    }

    /// Returns the body.
    #[must_use]
    pub const fn body(&self) -> &MethodBody {
        &self.body
    }

    /// Whether the declaration ends in `;` with no body.
    #[must_use]
    pub const fn is_bodiless(&self) -> bool {
        matches!(self.body, MethodBody::Semicolon(_))
    }

    /// Returns the method name: the identifier before the parameter list,
    /// skipping a type parameter list.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        let mut depth = 0_usize;
        let mut open = None;
        for (index, token) in self.signature.iter().enumerate() {
            if token.is("(") {
                let follows_name = index
                    .checked_sub(1)
                    .and_then(|prev| self.signature.get(prev))
                    .is_some_and(|prev| prev.is_word() || prev.is(">"));
                if depth == 0 && follows_name {
                    open = Some(index);
                    break;
                }
                depth += 1;
            } else if token.is(")") {
                depth = depth.saturating_sub(1);
            }
        }
        let before = self.signature.get(..open?)?;
        let mut depth = 0_usize;
        for token in before.iter().rev() {
            if token.is(">") {
                depth += 1;
            } else if token.is(">>") {
                depth += 2;
            } else if token.is("<") {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && token.is_word() {
                return Some(token.text());
            }
        }
        None
    }

    /// Returns the annotations attached to the node.
    #[must_use]
    pub fn annotations(&self) -> &[SyntaxAnnotation] {
        &self.annotations
    }

    /// Returns a copy with different attribute lists.
    #[must_use]
    pub fn with_attribute_lists(&self, attribute_lists: Vec<AttributeList>) -> Self {
        Self {
            attribute_lists: Arc::from(attribute_lists),
            ..self.clone()
        }
    }

    /// Returns a copy with different modifiers.
    #[must_use]
    pub fn with_modifiers(&self, modifiers: Vec<Token>) -> Self {
        Self {
            modifiers: Arc::from(modifiers),
            ..self.clone()
        }
    }

    /// Returns a copy carrying one more annotation.
    #[must_use]
    pub fn with_annotation(&self, annotation: SyntaxAnnotation) -> Self {
        let annotations: Arc<[SyntaxAnnotation]> = self
            .annotations
            .iter()
            .cloned()
            .chain(std::iter::once(annotation))
            .collect();
        Self {
            annotations,
            ..self.clone()
        }
    }
}

impl SyntaxNode for MethodDeclaration {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        self.attribute_lists.for_each_token(visit);
        self.modifiers.for_each_token(visit);
        self.signature.for_each_token(visit);
        self.body.for_each_token(visit);
    }

    fn first_token(&self) -> Option<&Token> {
        first_of(&self.attribute_lists)
            .or_else(|| self.modifiers.first())
            .or_else(|| self.signature.first())
            .or_else(|| self.body.first_token())
    }

    fn last_token(&self) -> Option<&Token> {
        self.body
            .last_token()
            .or_else(|| self.signature.last())
            .or_else(|| self.modifiers.last())
            .or_else(|| last_of(&self.attribute_lists))
    }

    fn replace_first_token(&self, token: Token) -> Self {
        if let Some(attribute_lists) = replace_first_of(&self.attribute_lists, token.clone()) {
            return Self {
                attribute_lists,
                ..self.clone()
            };
        }
        if !self.modifiers.is_empty() {
            return Self {
                modifiers: self.modifiers.replace_first_token(token),
                ..self.clone()
            };
        }
        if !self.signature.is_empty() {
            return Self {
                signature: self.signature.replace_first_token(token),
                ..self.clone()
            };
        }
        Self {
            body: self.body.replace_first_token(token),
            ..self.clone()
        }
    }

    fn replace_last_token(&self, token: Token) -> Self {
        if self.body.last_token().is_some() {
            return Self {
                body: self.body.replace_last_token(token),
                ..self.clone()
            };
        }
        if !self.signature.is_empty() {
            return Self {
                signature: self.signature.replace_last_token(token),
                ..self.clone()
            };
        }
        if !self.modifiers.is_empty() {
            return Self {
                modifiers: self.modifiers.replace_last_token(token),
                ..self.clone()
            };
        }
        match replace_last_of(&self.attribute_lists, token) {
            Some(attribute_lists) => Self {
                attribute_lists,
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}

/// `{ members }` of a type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeBody {
    open: Token,
    members: Arc<[Member]>,
    close: Token,
}

impl TypeBody {
    /// Creates a type body.
    #[must_use]
    pub fn new(open: Token, members: Vec<Member>, close: Token) -> Self {
        Self {
            open,
            members: Arc::from(members),
            close,
        }
    }
}

/// A class, struct, interface or record declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDeclaration {
    attribute_lists: Arc<[AttributeList]>,
    modifiers: Arc<[Token]>,
    header: Arc<[Token]>,
    body: Option<TypeBody>,
    terminator: Option<Token>,
}

impl TypeDeclaration {
    /// Creates a type declaration.
    #[must_use]
    pub fn new(
        attribute_lists: Vec<AttributeList>,
        modifiers: Vec<Token>,
        header: Vec<Token>,
        body: Option<TypeBody>,
        terminator: Option<Token>,
    ) -> Self {
        Self {
            attribute_lists: Arc::from(attribute_lists),
            modifiers: Arc::from(modifiers),
            header: Arc::from(header),
            body,
            terminator,
        }
    }

    /// Returns the declaring keyword (`class`, `struct`, `interface`, `record`).
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.header.first().map(Token::text)
    }

    /// Returns the declared type name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.header
            .iter()
            .skip(1)
            .find(|token| token.is_word() && !token.is("class") && !token.is("struct"))
            .map(Token::text)
    }

    /// Returns the modifier tokens.
    #[must_use]
    pub fn modifiers(&self) -> &[Token] {
        &self.modifiers
    }

    /// Returns the nested members; empty for body-less declarations.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        match &self.body {
            Some(body) => &body.members,
            None => &[],
        }
    }

    /// Returns a copy with the nested members replaced.
    ///
    /// Body-less declarations are returned unchanged.
    #[must_use]
    pub fn with_members(&self, members: Vec<Member>) -> Self {
        Self {
            body: self.body.as_ref().map(|body| TypeBody {
                members: Arc::from(members),
                ..body.clone()
            }),
            ..self.clone()
        }
    }
}

impl SyntaxNode for TypeDeclaration {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        self.attribute_lists.for_each_token(visit);
        self.modifiers.for_each_token(visit);
        self.header.for_each_token(visit);
        if let Some(body) = &self.body {
            visit(&body.open);
            body.members.for_each_token(visit);
            visit(&body.close);
        }
        if let Some(terminator) = &self.terminator {
            visit(terminator);
        }
    }

    fn first_token(&self) -> Option<&Token> {
        first_of(&self.attribute_lists)
            .or_else(|| self.modifiers.first())
            .or_else(|| self.header.first())
            .or_else(|| self.body.as_ref().map(|body| &body.open))
            .or(self.terminator.as_ref())
    }

    fn last_token(&self) -> Option<&Token> {
        self.terminator
            .as_ref()
            .or_else(|| self.body.as_ref().map(|body| &body.close))
            .or_else(|| self.header.last())
            .or_else(|| self.modifiers.last())
            .or_else(|| last_of(&self.attribute_lists))
    }

    fn replace_first_token(&self, token: Token) -> Self {
        if let Some(attribute_lists) = replace_first_of(&self.attribute_lists, token.clone()) {
            return Self {
                attribute_lists,
                ..self.clone()
            };
        }
        if !self.modifiers.is_empty() {
            return Self {
                modifiers: self.modifiers.replace_first_token(token),
                ..self.clone()
            };
        }
        Self {
            header: self.header.replace_first_token(token),
            ..self.clone()
        }
    }

    fn replace_last_token(&self, token: Token) -> Self {
        if self.terminator.is_some() {
            return Self {
                terminator: Some(token),
                ..self.clone()
            };
        }
        if let Some(body) = &self.body {
            return Self {
                body: Some(TypeBody {
                    close: token,
                    ..body.clone()
                }),
                ..self.clone()
            };
        }
        Self {
            header: self.header.replace_last_token(token),
            ..self.clone()
        }
    }
}

/// The body of a namespace declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NamespaceBody {
    /// `namespace N { ... }` with an optional trailing `;`.
    Block {
        /// `{`.
        open: Token,
        /// Nested members.
        members: Arc<[Member]>,
        /// `}`.
        close: Token,
        /// Optional `;` after the closing brace.
        terminator: Option<Token>,
    },
    /// `namespace N;` followed by the rest of the file.
    FileScoped {
        /// `;`.
        semicolon: Token,
        /// Every member after the declaration.
        members: Arc<[Member]>,
    },
}

/// A block or file-scoped namespace declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceDeclaration {
    header: Arc<[Token]>,
    body: NamespaceBody,
}

impl NamespaceDeclaration {
    /// Creates a namespace declaration; `header` starts with `namespace`.
    #[must_use]
    pub fn new(header: Vec<Token>, body: NamespaceBody) -> Self {
        Self {
            header: Arc::from(header),
            body,
        }
    }

    /// Returns the dotted namespace name.
    #[must_use]
    pub fn name(&self) -> String {
        self.header
            .get(1..)
            .map(plain_text)
            .unwrap_or_default()
    }

    /// Returns the body.
    #[must_use]
    pub const fn body(&self) -> &NamespaceBody {
        &self.body
    }

    /// Returns the nested members.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        match &self.body {
            NamespaceBody::Block { members, .. } | NamespaceBody::FileScoped { members, .. } => {
                members
            }
        }
    }

    /// Returns a copy with the nested members replaced.
    #[must_use]
    pub fn with_members(&self, members: Vec<Member>) -> Self {
        let shared: Arc<[Member]> = Arc::from(members);
        let body = match &self.body {
            NamespaceBody::Block {
                open,
                close,
                terminator,
                ..
            } => NamespaceBody::Block {
                open: open.clone(),
                members: shared,
                close: close.clone(),
                terminator: terminator.clone(),
            },
            NamespaceBody::FileScoped { semicolon, .. } => NamespaceBody::FileScoped {
                semicolon: semicolon.clone(),
                members: shared,
            },
        };
        Self {
            header: self.header.clone(),
            body,
        }
    }
}

impl SyntaxNode for NamespaceDeclaration {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        self.header.for_each_token(visit);
        match &self.body {
            NamespaceBody::Block {
                open,
                members,
                close,
                terminator,
            } => {
                visit(open);
                members.for_each_token(visit);
                visit(close);
                if let Some(terminator) = terminator {
                    visit(terminator);
                }
            }
            NamespaceBody::FileScoped { semicolon, members } => {
                visit(semicolon);
                members.for_each_token(visit);
            }
        }
    }

    fn first_token(&self) -> Option<&Token> {
        self.header.first()
    }

    fn last_token(&self) -> Option<&Token> {
        match &self.body {
            NamespaceBody::Block {
                close, terminator, ..
            } => terminator.as_ref().or(Some(close)),
            NamespaceBody::FileScoped { semicolon, members } => {
                last_of(members).or(Some(semicolon))
            }
        }
    }

    fn replace_first_token(&self, token: Token) -> Self {
        Self {
            header: self.header.replace_first_token(token),
            body: self.body.clone(),
        }
    }

    fn replace_last_token(&self, token: Token) -> Self {
        let body = match &self.body {
            NamespaceBody::Block {
                open,
                members,
                close,
                terminator,
            } => match terminator {
                Some(_) => NamespaceBody::Block {
                    open: open.clone(),
                    members: members.clone(),
                    close: close.clone(),
                    terminator: Some(token),
                },
                None => NamespaceBody::Block {
                    open: open.clone(),
                    members: members.clone(),
                    close: token,
                    terminator: None,
                },
            },
            NamespaceBody::FileScoped { semicolon, members } => {
                match replace_last_of(members, token.clone()) {
                    Some(members) => NamespaceBody::FileScoped {
                        semicolon: semicolon.clone(),
                        members,
                    },
                    None => NamespaceBody::FileScoped {
                        semicolon: token,
                        members: members.clone(),
                    },
                }
            }
        };
        Self {
            header: self.header.clone(),
            body,
        }
    }
}

/// A `using` directive, kept as a token run ending in `;`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsingDirective {
    tokens: Arc<[Token]>,
}

impl UsingDirective {
    /// Creates a using directive from its tokens.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: Arc::from(tokens),
        }
    }

    fn body(&self) -> &[Token] {
        let start = self
            .tokens
            .iter()
            .position(|token| token.is("using"))
            .map_or(0, |idx| idx + 1);
        let end = self
            .tokens
            .iter()
            .rposition(|token| token.is(";"))
            .unwrap_or(self.tokens.len());
        self.tokens.get(start..end).unwrap_or_default()
    }

    /// Returns the imported namespace for a plain `using N;` directive.
    ///
    /// `using static` and alias directives import no namespace.
    #[must_use]
    pub fn namespace(&self) -> Option<String> {
        let body = self.body();
        let is_plain = !body.is_empty()
            && !body.iter().any(|token| token.is("=") || token.is("static"));
        is_plain.then(|| plain_text(body))
    }

    /// Returns `(alias, target)` for `using Alias = Target;`.
    #[must_use]
    pub fn alias(&self) -> Option<(String, String)> {
        let body = self.body();
        let equals = body.iter().position(|token| token.is("="))?;
        let alias = body.get(..equals).map(plain_text)?;
        let target = body.get(equals + 1..).map(plain_text)?;
        Some((alias, target))
    }
}

/// A member the engine does not model: fields, properties, events,
/// delegates, enums and anything the parser could not classify.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpaqueMember {
    attribute_lists: Arc<[AttributeList]>,
    modifiers: Arc<[Token]>,
    tokens: Arc<[Token]>,
}

impl OpaqueMember {
    /// Creates an opaque member.
    #[must_use]
    pub fn new(attribute_lists: Vec<AttributeList>, modifiers: Vec<Token>, tokens: Vec<Token>) -> Self {
        Self {
            attribute_lists: Arc::from(attribute_lists),
            modifiers: Arc::from(modifiers),
            tokens: Arc::from(tokens),
        }
    }

    /// Returns the attribute lists.
    #[must_use]
    pub fn attribute_lists(&self) -> &[AttributeList] {
        &self.attribute_lists
    }
}

impl SyntaxNode for OpaqueMember {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        self.attribute_lists.for_each_token(visit);
        self.modifiers.for_each_token(visit);
        self.tokens.for_each_token(visit);
    }

    fn first_token(&self) -> Option<&Token> {
        first_of(&self.attribute_lists)
            .or_else(|| self.modifiers.first())
            .or_else(|| self.tokens.first())
    }

    fn last_token(&self) -> Option<&Token> {
        self.tokens
            .last()
            .or_else(|| self.modifiers.last())
            .or_else(|| last_of(&self.attribute_lists))
    }

    fn replace_first_token(&self, token: Token) -> Self {
        if let Some(attribute_lists) = replace_first_of(&self.attribute_lists, token.clone()) {
            return Self {
                attribute_lists,
                ..self.clone()
            };
        }
        if !self.modifiers.is_empty() {
            return Self {
                modifiers: self.modifiers.replace_first_token(token),
                ..self.clone()
            };
        }
        Self {
            tokens: self.tokens.replace_first_token(token),
            ..self.clone()
        }
    }

    fn replace_last_token(&self, token: Token) -> Self {
        if !self.tokens.is_empty() {
            return Self {
                tokens: self.tokens.replace_last_token(token),
                ..self.clone()
            };
        }
        if !self.modifiers.is_empty() {
            return Self {
                modifiers: self.modifiers.replace_last_token(token),
                ..self.clone()
            };
        }
        match replace_last_of(&self.attribute_lists, token) {
            Some(attribute_lists) => Self {
                attribute_lists,
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}

/// Any member of a compilation unit, namespace or type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Member {
    /// `using ...;`
    Using(UsingDirective),
    /// `namespace ...`
    Namespace(NamespaceDeclaration),
    /// `class`, `struct`, `interface` or `record`.
    Type(TypeDeclaration),
    /// A method declaration.
    Method(MethodDeclaration),
    /// Anything else, kept verbatim.
    Other(OpaqueMember),
}

impl Member {
    /// Returns the nested members of a namespace or type.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        match self {
            Self::Namespace(namespace) => namespace.members(),
            Self::Type(declaration) => declaration.members(),
            Self::Using(_) | Self::Method(_) | Self::Other(_) => &[],
        }
    }

    /// Returns a copy with the nested members replaced.
    ///
    /// Members without children are returned unchanged.
    #[must_use]
    pub fn with_members(&self, members: Vec<Member>) -> Self {
        match self {
            Self::Namespace(namespace) => Self::Namespace(namespace.with_members(members)),
            Self::Type(declaration) => Self::Type(declaration.with_members(members)),
            Self::Using(_) | Self::Method(_) | Self::Other(_) => self.clone(),
        }
    }

    /// Returns the method declaration, if this member is one.
    #[must_use]
    pub const fn as_method(&self) -> Option<&MethodDeclaration> {
        match self {
            Self::Method(method) => Some(method),
            Self::Using(_) | Self::Namespace(_) | Self::Type(_) | Self::Other(_) => None,
        }
    }
}

impl Member {
    /// Bytes between the start of the member and its first nested member.
    pub(crate) fn children_offset(&self) -> usize {
        match self {
            Self::Namespace(namespace) => {
                let opener = match &namespace.body {
                    NamespaceBody::Block { open, .. } => open,
                    NamespaceBody::FileScoped { semicolon, .. } => semicolon,
                };
                namespace.header.full_width() + opener.full_width()
            }
            Self::Type(declaration) => {
                declaration.attribute_lists.full_width()
                    + declaration.modifiers.full_width()
                    + declaration.header.full_width()
                    + declaration
                        .body
                        .as_ref()
                        .map_or(0, |body| body.open.full_width())
            }
            Self::Using(_) | Self::Method(_) | Self::Other(_) => 0,
        }
    }
}

impl From<MethodDeclaration> for Member {
    fn from(method: MethodDeclaration) -> Self {
        Self::Method(method)
    }
}

impl SyntaxNode for Member {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        match self {
            Self::Using(using) => using.tokens.for_each_token(visit),
            Self::Namespace(namespace) => namespace.for_each_token(visit),
            Self::Type(declaration) => declaration.for_each_token(visit),
            Self::Method(method) => method.for_each_token(visit),
            Self::Other(other) => other.for_each_token(visit),
        }
    }

    fn first_token(&self) -> Option<&Token> {
        match self {
            Self::Using(using) => using.tokens.first(),
            Self::Namespace(namespace) => namespace.first_token(),
            Self::Type(declaration) => declaration.first_token(),
            Self::Method(method) => method.first_token(),
            Self::Other(other) => other.first_token(),
        }
    }

    fn last_token(&self) -> Option<&Token> {
        match self {
            Self::Using(using) => using.tokens.last(),
            Self::Namespace(namespace) => namespace.last_token(),
            Self::Type(declaration) => declaration.last_token(),
            Self::Method(method) => method.last_token(),
            Self::Other(other) => other.last_token(),
        }
    }

    fn replace_first_token(&self, token: Token) -> Self {
        match self {
            Self::Using(using) => Self::Using(UsingDirective {
                tokens: using.tokens.replace_first_token(token),
            }),
            Self::Namespace(namespace) => Self::Namespace(namespace.replace_first_token(token)),
            Self::Type(declaration) => Self::Type(declaration.replace_first_token(token)),
            Self::Method(method) => Self::Method(method.replace_first_token(token)),
            Self::Other(other) => Self::Other(other.replace_first_token(token)),
        }
    }

    fn replace_last_token(&self, token: Token) -> Self {
        match self {
            Self::Using(using) => Self::Using(UsingDirective {
                tokens: using.tokens.replace_last_token(token),
            }),
            Self::Namespace(namespace) => Self::Namespace(namespace.replace_last_token(token)),
            Self::Type(declaration) => Self::Type(declaration.replace_last_token(token)),
            Self::Method(method) => Self::Method(method.replace_last_token(token)),
            Self::Other(other) => Self::Other(other.replace_last_token(token)),
        }
    }
}

impl SyntaxNode for Arc<[Member]> {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        for member in self.iter() {
            member.for_each_token(visit);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trivia::Trivia;
    use rstest::rstest;

    fn words(texts: &[&str]) -> Vec<Token> {
        texts
            .iter()
            .map(|text| {
                if text.chars().all(|c| c.is_alphanumeric() || c == '_') {
                    Token::identifier(text)
                } else {
                    Token::punctuation(text)
                }
            })
            .collect()
    }

    #[rstest]
    #[case(&["void", "Beep", "(", ")"], Some("Beep"))]
    #[case(&["int", "Pick", "<", "T", ">", "(", "T", "x", ")"], Some("Pick"))]
    #[case(&["(", "int", ",", "int", ")", "Pair", "(", ")"], Some("Pair"))]
    #[case(&["int"], None)]
    fn method_name_skips_type_parameters(#[case] signature: &[&str], #[case] expected: Option<&str>) {
        let method = MethodDeclaration::new(
            Vec::new(),
            Vec::new(),
            words(signature),
            MethodBody::Semicolon(Token::punctuation(";")),
        );
        assert_eq!(method.name(), expected);
    }

    #[test]
    fn annotations_do_not_print() {
        let method = MethodDeclaration::new(
            Vec::new(),
            vec![Token::keyword("extern").with_trailing_space()],
            words(&["void", "M", "(", ")"]),
            MethodBody::Semicolon(Token::punctuation(";")),
        );
        let annotated = method.with_annotation(SyntaxAnnotation::warning("note"));
        assert_eq!(annotated.to_full_string(), method.to_full_string());
        assert_eq!(annotated.annotations().len(), 1);
    }

    #[rstest]
    #[case(&["using", "System", ".", "Text", ";"], Some("System.Text"))]
    #[case(&["global", "using", "System", ";"], Some("System"))]
    #[case(&["using", "static", "System", ".", "Math", ";"], None)]
    #[case(&["using", "Interop", "=", "System", ";"], None)]
    fn using_namespace_ignores_static_and_alias(
        #[case] tokens: &[&str],
        #[case] expected: Option<&str>,
    ) {
        let using = UsingDirective::new(words(tokens));
        assert_eq!(using.namespace().as_deref(), expected);
    }

    #[test]
    fn using_alias_splits_on_equals() {
        let using = UsingDirective::new(words(&["using", "Native", "=", "A", ".", "B", ";"]));
        assert_eq!(
            using.alias(),
            Some(("Native".to_owned(), "A.B".to_owned()))
        );
    }

    #[test]
    fn member_trivia_updates_reach_the_first_token() {
        let member = Member::Method(MethodDeclaration::new(
            Vec::new(),
            vec![Token::keyword("static")],
            words(&["void", "M", "(", ")"]),
            MethodBody::Semicolon(Token::punctuation(";")),
        ));
        let indented = member.with_leading_trivia(vec![Trivia::whitespace("    ")]);
        assert!(indented.to_full_string().starts_with("    static"));
    }
}
