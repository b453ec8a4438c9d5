//! The compilation unit root and member location.

use std::fmt;
use std::sync::Arc;

use super::{Member, SyntaxNode, first_of};
use crate::editor::MemberPath;
use crate::position::TextRange;
use crate::token::Token;

/// The root of a parsed file.
///
/// `end_of_file` is a zero-width token that owns the trivia after the last
/// member, so printing the unit reproduces the source byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompilationUnit {
    members: Arc<[Member]>,
    end_of_file: Token,
}

/// Where a member sits in a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedMember {
    path: MemberPath,
    full_span: TextRange,
    span: TextRange,
    at_line_start: bool,
}

impl LocatedMember {
    /// The member's index path from the root.
    #[must_use]
    pub const fn path(&self) -> &MemberPath {
        &self.path
    }

    /// Byte range including leading and trailing trivia.
    #[must_use]
    pub const fn full_span(&self) -> TextRange {
        self.full_span
    }

    /// Byte range from the first to the last token, trivia excluded.
    #[must_use]
    pub const fn span(&self) -> TextRange {
        self.span
    }

    /// Whether the member's leading trivia begins a fresh line.
    #[must_use]
    pub const fn at_line_start(&self) -> bool {
        self.at_line_start
    }
}

impl CompilationUnit {
    /// Creates a compilation unit.
    #[must_use]
    pub fn new(members: Vec<Member>, end_of_file: Token) -> Self {
        Self {
            members: Arc::from(members),
            end_of_file,
        }
    }

    /// Returns the top-level members.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Returns the end-of-file token.
    #[must_use]
    pub const fn end_of_file(&self) -> &Token {
        &self.end_of_file
    }

    /// Returns a copy with the top-level members replaced.
    #[must_use]
    pub fn with_members(&self, members: Vec<Member>) -> Self {
        Self {
            members: Arc::from(members),
            end_of_file: self.end_of_file.clone(),
        }
    }

    /// Resolves a member path.
    #[must_use]
    pub fn member(&self, path: &MemberPath) -> Option<&Member> {
        let (&first, rest) = path.indices().split_first()?;
        let mut member = self.members.get(first)?;
        for &index in rest {
            member = member.members().get(index)?;
        }
        Some(member)
    }

    /// Lists every member, depth first, with its path and spans.
    #[must_use]
    pub fn located_members(&self) -> Vec<LocatedMember> {
        let text = self.to_full_string();
        let mut located = Vec::new();
        locate(&text, &self.members, 0, &MemberPath::root(), &mut located);
        located
    }

    /// Returns the innermost member whose token span contains `range`.
    #[must_use]
    pub fn member_at(&self, range: TextRange) -> Option<LocatedMember> {
        self.located_members()
            .into_iter()
            .filter(|member| member.span.contains_range(range))
            .max_by_key(|member| member.path.depth())
    }
}

fn locate(
    text: &str,
    members: &[Member],
    start: usize,
    prefix: &MemberPath,
    out: &mut Vec<LocatedMember>,
) {
    let mut offset = start;
    for (index, member) in members.iter().enumerate() {
        let path = prefix.child(index);
        let full_width = member.full_width();
        let leading = member.first_token().map_or(0, Token::leading_width);
        let trailing = member.last_token().map_or(0, Token::trailing_width);
        let span_start = offset + leading;
        let span_end = (offset + full_width).saturating_sub(trailing).max(span_start);
        out.push(LocatedMember {
            path: path.clone(),
            full_span: TextRange::new(offset, offset + full_width),
            span: TextRange::new(span_start, span_end),
            at_line_start: starts_line(text, offset),
        });
        if !member.members().is_empty() {
            locate(
                text,
                member.members(),
                offset + member.children_offset(),
                &path,
                out,
            );
        }
        offset += full_width;
    }
}

fn starts_line(text: &str, offset: usize) -> bool {
    let Some(before) = text.get(..offset) else {
        return false;
    };
    let line = before.rfind(['\n', '\r']).map_or(before, |idx| {
        before.get(idx + 1..).unwrap_or_default()
    });
    line.chars().all(|c| c == ' ' || c == '\t' || c == '\u{feff}')
}

impl SyntaxNode for CompilationUnit {
    fn for_each_token<'a>(&'a self, visit: &mut dyn FnMut(&'a Token)) {
        self.members.for_each_token(visit);
        visit(&self.end_of_file);
    }

    fn first_token(&self) -> Option<&Token> {
        first_of(&self.members).or(Some(&self.end_of_file))
    }

    fn last_token(&self) -> Option<&Token> {
        Some(&self.end_of_file)
    }

    fn replace_first_token(&self, token: Token) -> Self {
        if self.members.first_token().is_some() {
            return Self {
                members: self.members.replace_first_token(token),
                end_of_file: self.end_of_file.clone(),
            };
        }
        Self {
            members: self.members.clone(),
            end_of_file: token,
        }
    }

    fn replace_last_token(&self, token: Token) -> Self {
        Self {
            members: self.members.clone(),
            end_of_file: token,
        }
    }
}

impl fmt::Display for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_full_string())
    }
}
