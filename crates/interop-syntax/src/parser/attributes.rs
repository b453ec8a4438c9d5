//! Attribute list parsing.

use super::{Parser, is_close_bracket, is_open_bracket};
use crate::nodes::{
    Attribute, AttributeArgument, AttributeArgumentList, AttributeList, AttributeTarget,
    SeparatedList,
};
use crate::token::Token;

impl Parser<'_> {
    /// Parses `[target: A, B(...)]` starting at `[`.
    pub(super) fn parse_attribute_list(&mut self) -> AttributeList {
        let open = self.expect("[");
        let target = self.parse_attribute_target();
        let mut attributes = Vec::new();
        let mut separators = Vec::new();
        while !self.at_end() && !self.at("]") {
            let before = self.pos;
            let attribute = self.parse_attribute();
            if self.pos == before {
                self.error_here("expected an attribute");
                break;
            }
            attributes.push(attribute);
            if !self.at(",") {
                break;
            }
            separators.extend(self.bump());
        }
        let close = self.expect("]");
        AttributeList::new(
            open,
            target,
            SeparatedList::new(attributes, separators),
            close,
        )
    }

    fn parse_attribute_target(&mut self) -> Option<AttributeTarget> {
        let is_target = self.peek().is_some_and(Token::is_word) && self.nth_is(1, ":");
        if !is_target {
            return None;
        }
        let identifier = self.bump()?;
        let colon = self.bump()?;
        Some(AttributeTarget::new(identifier, colon))
    }

    fn parse_attribute(&mut self) -> Attribute {
        let name = self.parse_attribute_name();
        let arguments = if self.at("(") {
            Some(self.parse_attribute_arguments())
        } else {
            None
        };
        Attribute::new(name, arguments)
    }

    /// Reads a possibly qualified, possibly generic type name.
    fn parse_attribute_name(&mut self) -> Vec<Token> {
        let mut name = Vec::new();
        while self.peek().is_some_and(Token::is_word) {
            name.extend(self.bump());
            if self.at("<") {
                self.bump_balanced("<", ">", &mut name);
            }
            if !(self.at(".") || self.at("::")) {
                break;
            }
            name.extend(self.bump());
        }
        if name.is_empty() {
            self.error_here("expected an attribute name");
        }
        name
    }

    fn parse_attribute_arguments(&mut self) -> AttributeArgumentList {
        let open = self.expect("(");
        let mut arguments = Vec::new();
        let mut separators = Vec::new();
        while !self.at_end() && !self.at(")") {
            let tokens = self.parse_argument_tokens();
            if tokens.is_empty() {
                self.error_here("expected an argument");
            }
            arguments.push(AttributeArgument::from_tokens(tokens));
            if !self.at(",") {
                break;
            }
            separators.extend(self.bump());
        }
        let close = self.expect(")");
        AttributeArgumentList::new(open, SeparatedList::new(arguments, separators), close)
    }

    /// Collects one argument's tokens up to a top-level `,` or `)`.
    fn parse_argument_tokens(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut depth = 0_usize;
        while let Some(token) = self.peek() {
            if depth == 0 && (token.is(",") || token.is(")") || token.is("]") || token.is(";")) {
                break;
            }
            if is_open_bracket(token) {
                depth += 1;
            } else if is_close_bracket(token) {
                depth = depth.saturating_sub(1);
            }
            tokens.extend(self.bump());
        }
        tokens
    }
}
