//! Behaviour-driven development (BDD) step definitions for interop-syntax scenarios.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::fixture_source;
use crate::{
    LocatedMember, MemberPath, SupportedLanguage, SyntaxEdit, SyntaxError, SyntaxErrorInfo,
    SyntaxNode, TreeSitterSyntacticLock, apply_edits, parse,
};

// =============================================================================
// Test World
// =============================================================================

/// State shared across BDD steps.
#[derive(Default)]
struct TestWorld {
    /// Source text under test.
    source: String,
    /// Text printed back from the parsed tree.
    printed: Option<String>,
    /// Errors reported by the parser.
    parse_errors: Vec<SyntaxErrorInfo>,
    /// Member located by text search.
    located: Option<LocatedMember>,
    /// Text of the edited tree.
    edited: Option<String>,
    /// Error from the last edit batch.
    edit_error: Option<SyntaxError>,
    /// Failures from the syntactic lock.
    validation_failures: Vec<SyntaxErrorInfo>,
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

/// Strips surrounding double quotes from a string if present.
fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

fn parse_path(text: &str) -> MemberPath {
    let indices = strip_quotes(text)
        .split('/')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().expect("numeric path segment"))
        .collect();
    MemberPath::new(indices)
}

// =============================================================================
// Given Steps
// =============================================================================

#[given("the {name} source")]
fn given_source(world: &RefCell<TestWorld>, name: String) {
    world.borrow_mut().source = fixture_source(strip_quotes(&name)).to_owned();
}

// =============================================================================
// When Steps
// =============================================================================

#[when("the source is parsed")]
fn when_parsed(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let result = parse(&w.source);
    w.printed = Some(result.unit().to_full_string());
    w.parse_errors = result.errors().to_vec();
}

#[when("the member containing {text} is located")]
fn when_located(world: &RefCell<TestWorld>, text: String) {
    let mut w = world.borrow_mut();
    let needle = strip_quotes(&text);
    let start = w.source.find(needle).expect("text occurs in the source");
    let unit = parse(&w.source).into_unit();
    w.located = unit.member_at((start..start + needle.len()).into());
}

#[when("a copy of the member at {from} is inserted before {to}")]
fn when_copied(world: &RefCell<TestWorld>, from: String, to: String) {
    let mut w = world.borrow_mut();
    let unit = parse(&w.source).into_unit();
    let node = unit.member(&parse_path(&from)).expect("member to copy").clone();
    let edits = vec![SyntaxEdit::InsertBefore {
        anchor: parse_path(&to),
        node,
    }];
    match apply_edits(&unit, edits) {
        Ok(edited) => w.edited = Some(edited.to_full_string()),
        Err(error) => w.edit_error = Some(error),
    }
}

#[when("the member at {target} is replaced twice")]
fn when_replaced_twice(world: &RefCell<TestWorld>, target: String) {
    let mut w = world.borrow_mut();
    let unit = parse(&w.source).into_unit();
    let path = parse_path(&target);
    let node = unit.member(&path).expect("member to replace").clone();
    let edits = vec![
        SyntaxEdit::Replace {
            target: path.clone(),
            node: node.clone(),
        },
        SyntaxEdit::Replace { target: path, node },
    ];
    match apply_edits(&unit, edits) {
        Ok(edited) => w.edited = Some(edited.to_full_string()),
        Err(error) => w.edit_error = Some(error),
    }
}

#[when("the syntactic lock validates the source")]
fn when_validated(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let lock = TreeSitterSyntacticLock::new();
    let failures = lock
        .validate_source(SupportedLanguage::CSharp, &w.source)
        .expect("syntactic lock validation should succeed");
    w.validation_failures = failures;
}

// =============================================================================
// Then Steps
// =============================================================================

#[then("the printed text equals the source")]
fn then_round_trips(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert_eq!(w.printed.as_deref(), Some(w.source.as_str()));
}

#[then("no parse errors are reported")]
fn then_no_parse_errors(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(w.parse_errors.is_empty(), "{:?}", w.parse_errors);
}

#[then("a parse error mentions {message}")]
fn then_parse_error(world: &RefCell<TestWorld>, message: String) {
    let w = world.borrow();
    let expected = strip_quotes(&message);
    assert!(
        w.parse_errors
            .iter()
            .any(|error| error.message.contains(expected)),
        "no parse error mentions '{expected}': {:?}",
        w.parse_errors
    );
}

#[then("the located member is at {path}")]
fn then_located_at(world: &RefCell<TestWorld>, path: String) {
    let w = world.borrow();
    let located = w.located.as_ref().expect("a member was located");
    assert_eq!(located.path(), &parse_path(&path));
}

#[then("the located member starts its line")]
fn then_starts_line(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(w.located.as_ref().expect("located").at_line_start());
}

#[then("the located member shares its line")]
fn then_shares_line(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(!w.located.as_ref().expect("located").at_line_start());
}

#[then("the edited text places {first} before {second}")]
fn then_order(world: &RefCell<TestWorld>, first: String, second: String) {
    let w = world.borrow();
    let text = w.edited.as_deref().expect("edits applied");
    let first_at = text.find(strip_quotes(&first)).expect("first text");
    let second_at = text.find(strip_quotes(&second)).expect("second text");
    assert!(first_at < second_at, "unexpected order in:\n{text}");
}

#[then("the edit is rejected as conflicting")]
fn then_conflict(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(
        matches!(w.edit_error, Some(SyntaxError::ConflictingEdits { .. })),
        "expected a conflict, got {:?}",
        w.edit_error
    );
}

#[then("validation passes with no failures")]
fn then_validation_passes(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(
        w.validation_failures.is_empty(),
        "unexpected failures: {:?}",
        w.validation_failures
    );
}

#[then("validation fails")]
fn then_validation_fails(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(!w.validation_failures.is_empty());
}

// =============================================================================
// Scenarios
// =============================================================================

#[scenario(
    path = "tests/features/interop_syntax.feature",
    name = "Interop source prints back unchanged"
)]
fn lossless_round_trip(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/interop_syntax.feature",
    name = "Opaque members print back unchanged"
)]
fn opaque_round_trip(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/interop_syntax.feature",
    name = "Unterminated type reports a parse error"
)]
fn unterminated_type(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/interop_syntax.feature",
    name = "A diagnostic span locates its method"
)]
fn locate_method(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/interop_syntax.feature",
    name = "A method sharing a line with its type"
)]
fn locate_inline_method(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/interop_syntax.feature",
    name = "Inserted members precede their anchor"
)]
fn insert_before_anchor(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/interop_syntax.feature",
    name = "Replacing a member twice conflicts"
)]
fn double_replace(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/interop_syntax.feature",
    name = "Tree-sitter accepts the interop source"
)]
fn lock_accepts(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/interop_syntax.feature",
    name = "Tree-sitter rejects an unterminated type"
)]
fn lock_rejects(world: RefCell<TestWorld>) {
    let _ = world;
}
