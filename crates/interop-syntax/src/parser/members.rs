//! Member-level parsing: usings, namespaces, types and methods.

use super::{Parser, is_close_bracket, is_open_bracket};
use crate::nodes::{
    AttributeList, Member, MethodBody, MethodDeclaration, NamespaceBody, NamespaceDeclaration,
    OpaqueMember, TypeBody, TypeDeclaration, UsingDirective,
};
use crate::token::{Token, TokenKind};

/// Reserved keywords that always act as modifiers in member position.
const KEYWORD_MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "extern", "unsafe", "new", "virtual",
    "override", "abstract", "sealed", "readonly", "volatile", "const",
];

/// Contextual keywords that act as modifiers only when another word follows.
const CONTEXTUAL_MODIFIERS: &[&str] = &["partial", "async", "required", "file"];

/// Declarations that look like methods but are not.
const OPAQUE_LEADS: &[&str] = &["delegate", "event", "enum"];

impl Parser<'_> {
    /// Parses members until the end of input or, inside a block, a `}`.
    pub(super) fn parse_members(&mut self, in_block: bool) -> Vec<Member> {
        let mut members = Vec::new();
        while !self.at_end() {
            if in_block && self.at("}") {
                break;
            }
            members.push(self.parse_member(in_block));
        }
        members
    }

    fn parse_member(&mut self, in_block: bool) -> Member {
        if self.at_using_directive() {
            return Member::Using(self.parse_using());
        }
        if self.at("}") {
            self.error_here("unexpected `}`");
            let tokens = self.bump().into_iter().collect();
            return Member::Other(OpaqueMember::new(Vec::new(), Vec::new(), tokens));
        }
        let mut attribute_lists = Vec::new();
        while self.at("[") {
            attribute_lists.push(self.parse_attribute_list());
        }
        let modifiers = self.parse_modifiers();
        if attribute_lists.is_empty() && modifiers.is_empty() && self.at("namespace") {
            return Member::Namespace(self.parse_namespace(in_block));
        }
        if self.at_type_keyword() {
            return Member::Type(self.parse_type(attribute_lists, modifiers));
        }
        self.parse_method_or_opaque(attribute_lists, modifiers, in_block)
    }

    fn at_using_directive(&self) -> bool {
        let offset = usize::from(self.at("global"));
        self.nth_is(offset, "using") && !self.nth_is(offset + 1, "(")
    }

    fn parse_using(&mut self) -> UsingDirective {
        let mut tokens = Vec::new();
        self.bump_statement(&mut tokens);
        UsingDirective::new(tokens)
    }

    fn parse_modifiers(&mut self) -> Vec<Token> {
        let mut modifiers = Vec::new();
        while let Some(token) = self.peek() {
            let next_is_word = self.peek_nth(1).is_some_and(Token::is_word);
            let is_modifier = match token.kind() {
                TokenKind::Keyword if token.is("ref") => {
                    self.nth_is(1, "struct") || self.nth_is(1, "partial")
                }
                TokenKind::Keyword => KEYWORD_MODIFIERS.contains(&token.text()),
                TokenKind::Identifier => {
                    CONTEXTUAL_MODIFIERS.contains(&token.text()) && next_is_word
                }
                _ => false,
            };
            if !is_modifier {
                break;
            }
            modifiers.extend(self.bump());
        }
        modifiers
    }

    fn at_type_keyword(&self) -> bool {
        if self.at("class") || self.at("struct") || self.at("interface") {
            return true;
        }
        self.at("record") && self.peek_nth(1).is_some_and(Token::is_word)
    }

    fn parse_namespace(&mut self, in_block: bool) -> NamespaceDeclaration {
        let mut header = Vec::new();
        header.extend(self.bump());
        while let Some(token) = self.peek() {
            if token.is("{") || token.is(";") || token.is("}") {
                break;
            }
            header.extend(self.bump());
        }
        if self.at(";") {
            let semicolon = self.expect(";");
            let members = self.parse_members(in_block);
            let body = NamespaceBody::FileScoped {
                semicolon,
                members: members.into(),
            };
            return NamespaceDeclaration::new(header, body);
        }
        let open = self.expect("{");
        let members = self.parse_members(true);
        let close = self.expect("}");
        let terminator = if self.at(";") { self.bump() } else { None };
        NamespaceDeclaration::new(
            header,
            NamespaceBody::Block {
                open,
                members: members.into(),
                close,
                terminator,
            },
        )
    }

    fn parse_type(
        &mut self,
        attribute_lists: Vec<AttributeList>,
        modifiers: Vec<Token>,
    ) -> TypeDeclaration {
        let mut header = Vec::new();
        let mut depth = 0_usize;
        while let Some(token) = self.peek() {
            if depth == 0 && (token.is("{") || token.is(";") || token.is("}")) {
                break;
            }
            if is_open_bracket(token) {
                depth += 1;
            } else if is_close_bracket(token) {
                depth = depth.saturating_sub(1);
            }
            header.extend(self.bump());
        }
        if self.at(";") {
            let terminator = self.bump();
            return TypeDeclaration::new(attribute_lists, modifiers, header, None, terminator);
        }
        if !self.at("{") {
            self.error_here("expected `{` or `;`");
            return TypeDeclaration::new(attribute_lists, modifiers, header, None, None);
        }
        let open = self.expect("{");
        let members = self.parse_members(true);
        let close = self.expect("}");
        let terminator = if self.at(";") { self.bump() } else { None };
        TypeDeclaration::new(
            attribute_lists,
            modifiers,
            header,
            Some(TypeBody::new(open, members, close)),
            terminator,
        )
    }

    /// Parses a method declaration, or keeps the member verbatim when its
    /// shape is not a method.
    ///
    /// A member is a method when its last top-level `)` before the body is
    /// followed by nothing or by a `where` constraint clause, and no `=`
    /// initialiser appears first.
    fn parse_method_or_opaque(
        &mut self,
        attribute_lists: Vec<AttributeList>,
        modifiers: Vec<Token>,
        in_block: bool,
    ) -> Member {
        let mut tokens: Vec<Token> = Vec::new();
        let mut depth = 0_usize;
        let mut last_close_paren = None;
        let is_opaque_lead = self
            .peek()
            .is_some_and(|token| OPAQUE_LEADS.contains(&token.text()));
        loop {
            let Some(token) = self.peek() else {
                self.error_here("expected `;` or a body");
                return opaque(attribute_lists, modifiers, tokens);
            };
            if depth == 0 {
                if token.is(";") || token.is("{") || token.is("=>") {
                    break;
                }
                if token.is("}") {
                    if in_block && tokens.is_empty() {
                        self.error_here("expected a member declaration");
                    } else {
                        self.error_here("expected `;` or a body");
                    }
                    return opaque(attribute_lists, modifiers, tokens);
                }
                if token.is("=") {
                    self.bump_statement(&mut tokens);
                    return opaque(attribute_lists, modifiers, tokens);
                }
            }
            let closes_paren = depth == 1 && token.is(")");
            if is_open_bracket(token) {
                depth += 1;
            } else if is_close_bracket(token) {
                depth = depth.saturating_sub(1);
            }
            if closes_paren {
                last_close_paren = Some(tokens.len());
            }
            tokens.extend(self.bump());
        }

        let is_method = !is_opaque_lead
            && last_close_paren.is_some_and(|index| {
                tokens
                    .get(index + 1)
                    .is_none_or(|next| next.is("where"))
            });
        let mut body_tokens = Vec::new();
        if self.at("{") {
            self.bump_balanced("{", "}", &mut body_tokens);
        } else {
            self.bump_statement(&mut body_tokens);
        }
        if is_method {
            let body = if body_tokens.first().is_some_and(|token| token.is("{")) {
                MethodBody::Block(body_tokens.into())
            } else if body_tokens.first().is_some_and(|token| token.is("=>")) {
                MethodBody::Expression(body_tokens.into())
            } else {
                match body_tokens.pop() {
                    Some(semicolon) => MethodBody::Semicolon(semicolon),
                    None => MethodBody::Semicolon(Token::missing()),
                }
            };
            return Member::Method(MethodDeclaration::new(
                attribute_lists,
                modifiers,
                tokens,
                body,
            ));
        }
        tokens.extend(body_tokens);
        if self.at("=") {
            self.bump_statement(&mut tokens);
        } else if self.at(";") && tokens.last().is_some_and(|token| token.is("}")) {
            tokens.extend(self.bump());
        }
        opaque(attribute_lists, modifiers, tokens)
    }
}

fn opaque(attribute_lists: Vec<AttributeList>, modifiers: Vec<Token>, tokens: Vec<Token>) -> Member {
    Member::Other(OpaqueMember::new(attribute_lists, modifiers, tokens))
}
