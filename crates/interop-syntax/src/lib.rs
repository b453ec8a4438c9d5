//! Lossless, immutable C# declaration syntax trees.
//!
//! This crate provides the syntax tree capability the conversion engine in
//! `interop-convert` builds on:
//!
//! - **Parsing** via [`parse`], producing a [`CompilationUnit`] that prints
//!   back to the exact input text, trivia included
//! - **Immutable nodes** whose `with_*` builders return new values sharing
//!   unchanged children through `Arc`
//! - **Trivia** modelling whitespace, comments and preprocessor directives,
//!   with helpers to build `#if`/`#else`/`#endif` markers
//! - **Positional editing** via [`SyntaxEditor`], applying
//!   [`SyntaxEdit`] values addressed by [`MemberPath`]
//! - **Syntactic validation** via [`TreeSitterSyntacticLock`], which checks
//!   text against the full Tree-sitter C# grammar
//!
//! # Example
//!
//! ```
//! use interop_syntax::{SyntaxNode, parse};
//!
//! let source = "class C\n{\n    static extern void Beep();\n}\n";
//! let result = parse(source);
//! assert!(!result.has_errors());
//! assert_eq!(result.unit().to_full_string(), source);
//! ```

mod editor;
mod error;
mod grammar;
mod language;
mod lexer;
mod nodes;
mod parser;
mod position;
mod syntactic_lock;
mod token;
mod trivia;

pub use editor::{MemberPath, SyntaxEdit, SyntaxEditor, apply_edits};
pub use error::SyntaxError;
pub use grammar::{GrammarParser, GrammarTree, SyntaxErrorInfo};
pub use language::SupportedLanguage;
pub use nodes::{
    AnnotationKind, ArgumentKind, Attribute, AttributeArgument, AttributeArgumentList,
    AttributeList, AttributeTarget, CompilationUnit, LocatedMember, Member, MethodBody,
    MethodDeclaration, NamespaceBody, NamespaceDeclaration, OpaqueMember, SeparatedList,
    SyntaxAnnotation, SyntaxNode, TypeBody, TypeDeclaration, UsingDirective,
};
pub use parser::{ParseResult, parse};
pub use position::TextRange;
pub use syntactic_lock::TreeSitterSyntacticLock;
pub use token::{Token, TokenKind};
pub use trivia::{
    Directive, DirectiveKind, Trivia, TriviaKind, TriviaList, UnbalancedDirective,
    check_directive_balance, ends_with_end_of_line, line_indentation, split_after_last_directive,
    trivia_text,
};

#[cfg(test)]
mod tests;
