//! Formatting trivia attached to tokens.
//!
//! Trivia follows the usual lossless-tree convention: a token owns the
//! trivia on its own line up to and including the first end-of-line as
//! trailing trivia; everything else before the next token is that token's
//! leading trivia. Preprocessor directives are trivia and are never
//! evaluated, so every conditional branch is parsed as ordinary syntax.

use std::fmt;
use std::sync::Arc;

/// Shared, immutable run of trivia.
pub type TriviaList = Arc<[Trivia]>;

/// The kind of a conditional-compilation or region directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// `#if <condition>`.
    If {
        /// The condition expression text.
        condition: String,
    },
    /// `#elif <condition>`.
    Elif {
        /// The condition expression text.
        condition: String,
    },
    /// `#else`.
    Else,
    /// `#endif`.
    EndIf,
    /// `#region`.
    Region,
    /// `#endregion`.
    EndRegion,
    /// Any other directive (`#pragma`, `#nullable`, `#define`, ...).
    Other,
}

impl DirectiveKind {
    /// Returns the condition symbol expression for `#if`/`#elif`.
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        match self {
            Self::If { condition } | Self::Elif { condition } => Some(condition),
            Self::Else | Self::EndIf | Self::Region | Self::EndRegion | Self::Other => None,
        }
    }

    /// Whether the directive takes part in conditional compilation.
    #[must_use]
    pub const fn is_conditional(&self) -> bool {
        matches!(
            self,
            Self::If { .. } | Self::Elif { .. } | Self::Else | Self::EndIf
        )
    }
}

/// A directive trivia payload.
///
/// `is_active` records whether the branch the directive opens is taken.
/// Directives read from source are always active because the parser does
/// not evaluate conditions; constructed directives carry whatever the
/// builder asked for. The flag never affects printing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Directive {
    kind: DirectiveKind,
    is_active: bool,
}

impl Directive {
    /// Returns the directive kind.
    #[must_use]
    pub const fn kind(&self) -> &DirectiveKind {
        &self.kind
    }

    /// Whether the branch introduced by this directive is taken.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }
}

/// The kind of a trivia piece.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriviaKind {
    /// Spaces and tabs.
    Whitespace,
    /// `\n`, `\r\n` or `\r`.
    EndOfLine,
    /// `// ...` up to, but excluding, the end of line.
    SingleLineComment,
    /// `/* ... */`.
    MultiLineComment,
    /// A `#...` preprocessor line, excluding its end of line.
    Directive(Directive),
}

/// A single piece of trivia with its exact source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trivia {
    kind: TriviaKind,
    text: Arc<str>,
}

impl Trivia {
    pub(crate) fn new(kind: TriviaKind, text: impl Into<Arc<str>>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Creates whitespace trivia.
    #[must_use]
    pub fn whitespace(text: &str) -> Self {
        Self::new(TriviaKind::Whitespace, text)
    }

    /// Creates a `\n` end-of-line trivia.
    #[must_use]
    pub fn end_of_line() -> Self {
        Self::new(TriviaKind::EndOfLine, "\n")
    }

    /// Creates an end-of-line trivia with explicit text (`\r\n`, `\n`).
    #[must_use]
    pub fn end_of_line_text(text: &str) -> Self {
        Self::new(TriviaKind::EndOfLine, text)
    }

    /// Creates a `// ...` comment; `text` must include the slashes.
    #[must_use]
    pub fn single_line_comment(text: &str) -> Self {
        Self::new(TriviaKind::SingleLineComment, text)
    }

    /// Creates an `#if <condition>` directive.
    #[must_use]
    pub fn if_directive(condition: &str, is_active: bool) -> Self {
        let directive = Directive {
            kind: DirectiveKind::If {
                condition: condition.to_owned(),
            },
            is_active,
        };
        Self::new(
            TriviaKind::Directive(directive),
            format!("#if {condition}"),
        )
    }

    /// Creates an `#else` directive.
    #[must_use]
    pub fn else_directive(is_active: bool) -> Self {
        let directive = Directive {
            kind: DirectiveKind::Else,
            is_active,
        };
        Self::new(TriviaKind::Directive(directive), "#else")
    }

    /// Creates an `#endif` directive.
    #[must_use]
    pub fn end_if_directive(is_active: bool) -> Self {
        let directive = Directive {
            kind: DirectiveKind::EndIf,
            is_active,
        };
        Self::new(TriviaKind::Directive(directive), "#endif")
    }

    /// Classifies a raw directive line (starting at `#`).
    pub(crate) fn directive_from_source(text: &str) -> Self {
        let body = text.trim_start_matches('#').trim_start();
        let (keyword, rest) = body
            .split_once(|c: char| c.is_whitespace())
            .unwrap_or((body, ""));
        let condition = strip_line_comment(rest).trim().to_owned();
        let kind = match keyword {
            "if" => DirectiveKind::If { condition },
            "elif" => DirectiveKind::Elif { condition },
            "else" => DirectiveKind::Else,
            "endif" => DirectiveKind::EndIf,
            "region" => DirectiveKind::Region,
            "endregion" => DirectiveKind::EndRegion,
            _ => DirectiveKind::Other,
        };
        Self::new(
            TriviaKind::Directive(Directive {
                kind,
                is_active: true,
            }),
            text,
        )
    }

    /// Returns the trivia kind.
    #[must_use]
    pub const fn kind(&self) -> &TriviaKind {
        &self.kind
    }

    /// Returns the exact source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this trivia is an end of line.
    #[must_use]
    pub const fn is_end_of_line(&self) -> bool {
        matches!(self.kind, TriviaKind::EndOfLine)
    }

    /// Whether this trivia is whitespace.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self.kind, TriviaKind::Whitespace)
    }

    /// Returns the directive payload, if this trivia is a directive.
    #[must_use]
    pub const fn directive(&self) -> Option<&Directive> {
        match &self.kind {
            TriviaKind::Directive(directive) => Some(directive),
            TriviaKind::Whitespace
            | TriviaKind::EndOfLine
            | TriviaKind::SingleLineComment
            | TriviaKind::MultiLineComment => None,
        }
    }
}

impl fmt::Display for Trivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn strip_line_comment(text: &str) -> &str {
    text.find("//").and_then(|idx| text.get(..idx)).unwrap_or(text)
}

/// Concatenates the text of a trivia run.
#[must_use]
pub fn trivia_text(trivia: &[Trivia]) -> String {
    trivia.iter().map(Trivia::text).collect()
}

/// Whether the run ends with an end-of-line trivia.
#[must_use]
pub fn ends_with_end_of_line(trivia: &[Trivia]) -> bool {
    trivia.last().is_some_and(Trivia::is_end_of_line)
}

/// Returns the whitespace that indents the line the run finishes on.
///
/// This is the whitespace following the final end-of-line, or the leading
/// whitespace of a run that contains no end-of-line.
#[must_use]
pub fn line_indentation(trivia: &[Trivia]) -> Vec<Trivia> {
    let line_start = trivia
        .iter()
        .rposition(Trivia::is_end_of_line)
        .map_or(0, |idx| idx + 1);
    trivia
        .iter()
        .skip(line_start)
        .take_while(|piece| piece.is_whitespace())
        .cloned()
        .collect()
}

/// Splits a leading-trivia run after its last directive line.
///
/// The first half holds every piece up to and including the end-of-line
/// that terminates the last directive; the second half holds the rest. A
/// run without directives yields an empty first half.
#[must_use]
pub fn split_after_last_directive(trivia: &[Trivia]) -> (Vec<Trivia>, Vec<Trivia>) {
    let Some(last_directive) = trivia.iter().rposition(|piece| piece.directive().is_some())
    else {
        return (Vec::new(), trivia.to_vec());
    };
    let split = trivia
        .iter()
        .enumerate()
        .skip(last_directive)
        .find(|(_, piece)| piece.is_end_of_line())
        .map_or(trivia.len(), |(idx, _)| idx + 1);
    let (head, tail) = trivia.split_at(split);
    (head.to_vec(), tail.to_vec())
}

/// A conditional directive that does not pair up with its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbalancedDirective {
    /// The offending directive text, or the open `#if` left unclosed.
    pub text: String,
}

impl fmt::Display for UnbalancedDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unbalanced directive `{}`", self.text)
    }
}

/// Checks that the conditional directives in `trivia` nest properly.
///
/// `#elif`/`#else` must sit inside an open `#if` (and nothing may follow an
/// `#else` except `#endif`), every `#endif` must close one, and nothing may
/// be left open at the end.
///
/// # Errors
///
/// Returns the first directive that breaks nesting.
pub fn check_directive_balance<'a>(
    trivia: impl IntoIterator<Item = &'a Trivia>,
) -> Result<(), UnbalancedDirective> {
    // One entry per open `#if`, recording whether its `#else` was seen.
    let mut open: Vec<(&'a str, bool)> = Vec::new();
    for piece in trivia {
        let Some(directive) = piece.directive() else {
            continue;
        };
        let unbalanced = || UnbalancedDirective {
            text: piece.text().to_owned(),
        };
        match directive.kind() {
            DirectiveKind::If { .. } => open.push((piece.text(), false)),
            DirectiveKind::Elif { .. } => match open.last() {
                Some((_, false)) => {}
                Some((_, true)) | None => return Err(unbalanced()),
            },
            DirectiveKind::Else => match open.last_mut() {
                Some((_, seen_else @ false)) => *seen_else = true,
                Some((_, true)) | None => return Err(unbalanced()),
            },
            DirectiveKind::EndIf => {
                if open.pop().is_none() {
                    return Err(unbalanced());
                }
            }
            DirectiveKind::Region | DirectiveKind::EndRegion | DirectiveKind::Other => {}
        }
    }
    match open.first() {
        Some((text, _)) => Err(UnbalancedDirective {
            text: (*text).to_owned(),
        }),
        None => Ok(()),
    }
}
