//! Unit tests for interop-syntax.

use rstest::rstest;

use super::{MIXED_MEMBERS, NATIVE_CLASS};
use crate::{
    ArgumentKind, Member, MemberPath, SyntaxEdit, SyntaxEditor, SyntaxError, SyntaxNode,
    SupportedLanguage, TextRange, TreeSitterSyntacticLock, apply_edits, parse,
};

fn path(indices: &[usize]) -> MemberPath {
    MemberPath::new(indices.to_vec())
}

fn member_kind(member: &Member) -> &'static str {
    match member {
        Member::Using(_) => "using",
        Member::Namespace(_) => "namespace",
        Member::Type(_) => "type",
        Member::Method(_) => "method",
        Member::Other(_) => "other",
    }
}

// =============================================================================
// Parser Tests
// =============================================================================

#[rstest]
#[case(NATIVE_CLASS)]
#[case(MIXED_MEMBERS)]
#[case("")]
#[case("\r\n// only a comment\r\n")]
#[case("#if WINDOWS\nclass A { }\n#else\nclass B { }\n#endif\n")]
#[case("class Broken {\n    void M(\n")]
#[case("}\n} stray")]
#[case("[Obsolete(\"a\", true)]\nstatic extern void M();")]
fn parsing_is_lossless(#[case] source: &str) {
    let result = parse(source);
    assert_eq!(result.unit().to_full_string(), source);
    assert_eq!(result.unit().full_width(), source.len());
}

#[test]
fn parses_interop_class_structure() {
    let result = parse(NATIVE_CLASS);
    assert!(!result.has_errors(), "{:?}", result.errors());
    let unit = result.unit();

    let kinds: Vec<&str> = unit.members().iter().map(member_kind).collect();
    assert_eq!(kinds, vec!["using", "namespace"]);

    let method = unit
        .member(&path(&[1, 0, 0]))
        .and_then(Member::as_method)
        .expect("method at /1/0/0");
    assert_eq!(method.name(), Some("MessageBox"));
    assert!(method.has_modifier("extern"));
    assert!(method.is_bodiless());

    let list = method.attribute_lists().first().expect("attribute list");
    let attribute = list.attributes().get(0).expect("attribute");
    assert_eq!(attribute.name_text(), "DllImport");
    let kinds: Vec<ArgumentKind> = attribute.arguments().map(|arg| arg.kind()).collect();
    assert_eq!(kinds, vec![ArgumentKind::Positional, ArgumentKind::NameEquals]);
    let charset = attribute.arguments().nth(1).expect("CharSet argument");
    assert_eq!(charset.name(), Some("CharSet"));
    assert_eq!(charset.expression_text(), "CharSet.Unicode");

    let field = unit.member(&path(&[1, 0, 1])).expect("field");
    assert_eq!(member_kind(field), "other");
}

#[test]
fn comment_and_indentation_lead_the_declaration() {
    let unit = parse(NATIVE_CLASS).into_unit();
    let method = unit.member(&path(&[1, 0, 0])).expect("method");
    let leading = crate::trivia_text(&method.leading_trivia());
    assert_eq!(leading, "        // Shows a message box.\n        ");
}

#[test]
fn classifies_mixed_members() {
    let result = parse(MIXED_MEMBERS);
    assert!(!result.has_errors(), "{:?}", result.errors());
    let unit = result.unit();

    let namespace = unit.members().first().expect("namespace");
    let top: Vec<&str> = namespace.members().iter().map(member_kind).collect();
    assert_eq!(top, vec!["other", "other", "type"]);

    let class = namespace.members().get(2).expect("class");
    let nested: Vec<&str> = class.members().iter().map(member_kind).collect();
    assert_eq!(
        nested,
        vec![
            "other", "other", "other", "other", "method", "method", "method", "method", "method"
        ]
    );
    let names: Vec<Option<&str>> = class
        .members()
        .iter()
        .filter_map(Member::as_method)
        .map(|method| method.name())
        .collect();
    assert_eq!(
        names,
        vec![
            Some("Widget"),
            Some("Widget"),
            Some("Dispose"),
            Some("Range"),
            Some("Widget")
        ]
    );
}

#[rstest]
#[case("class Broken {\n    void M(\n", "expected `;` or a body")]
#[case("class C { void M(); ", "expected `}`")]
#[case("class C { [Obsolete( }", "expected `)`")]
fn reports_parse_errors(#[case] source: &str, #[case] message: &str) {
    let result = parse(source);
    assert!(
        result.errors().iter().any(|error| error.message == message),
        "missing '{message}' in {:?}",
        result.errors()
    );
}

// =============================================================================
// Location Tests
// =============================================================================

#[test]
fn member_at_finds_innermost_declaration() {
    let unit = parse(NATIVE_CLASS).into_unit();
    let start = NATIVE_CLASS.find("MessageBox").expect("name offset");
    let located = unit
        .member_at(TextRange::new(start, start + "MessageBox".len()))
        .expect("located member");
    assert_eq!(located.path(), &path(&[1, 0, 0]));
    assert!(located.at_line_start());

    let span_text = NATIVE_CLASS
        .get(located.span().as_range())
        .expect("span in bounds");
    assert!(span_text.starts_with("[DllImport"));
    assert!(span_text.ends_with("uint type);"));
}

#[test]
fn located_members_cover_nested_paths() {
    let unit = parse(NATIVE_CLASS).into_unit();
    let paths: Vec<String> = unit
        .located_members()
        .iter()
        .map(|located| located.path().to_string())
        .collect();
    assert_eq!(paths, vec!["/0", "/1", "/1/0", "/1/0/0", "/1/0/1"]);
}

#[test]
fn comments_on_the_member_line_still_start_it() {
    let source = "class C\n{\n    /* x */ [DllImport(\"a.dll\")] static extern void M();\n}\n";
    let unit = parse(source).into_unit();
    let located = unit
        .located_members()
        .into_iter()
        .find(|located| located.path() == &path(&[0, 0]))
        .expect("method");
    assert!(located.at_line_start());
    assert_eq!(
        source.get(located.full_span().as_range()),
        Some("    /* x */ [DllImport(\"a.dll\")] static extern void M();\n")
    );
}

#[test]
fn one_line_members_do_not_start_a_line() {
    let source = "class C { static extern void M(); }";
    let unit = parse(source).into_unit();
    let located = unit
        .located_members()
        .into_iter()
        .find(|located| located.path() == &path(&[0, 0]))
        .expect("method");
    assert!(!located.at_line_start());
    assert_eq!(
        source.get(located.span().as_range()),
        Some("static extern void M();")
    );
}

// =============================================================================
// Editor Tests
// =============================================================================

#[test]
fn insert_then_replace_keeps_order() {
    let unit = parse(NATIVE_CLASS).into_unit();
    let method = unit.member(&path(&[1, 0, 0])).expect("method").clone();
    let field = unit.member(&path(&[1, 0, 1])).expect("field").clone();
    let method_tokens = method.token_count();

    let edited = apply_edits(
        &unit,
        vec![
            SyntaxEdit::InsertBefore {
                anchor: path(&[1, 0, 0]),
                node: field,
            },
            SyntaxEdit::Replace {
                target: path(&[1, 0, 1]),
                node: method,
            },
        ],
    )
    .expect("edits apply");

    let text = edited.to_full_string();
    let first_field = text.find("private const").expect("field text");
    let first_method = text.find("MessageBox").expect("method text");
    assert!(first_field < first_method);
    assert_eq!(text.matches("MessageBox").count(), 2);
    assert_eq!(text.matches("private const").count(), 1);
    assert_eq!(edited.token_count(), unit.token_count() + method_tokens);
}

#[test]
fn untouched_subtrees_are_shared() {
    let unit = parse(NATIVE_CLASS).into_unit();
    let mut editor = SyntaxEditor::new(unit.clone());
    let field = unit.member(&path(&[1, 0, 1])).expect("field").clone();
    editor
        .replace(path(&[1, 0, 1]), field)
        .expect("replace field");
    let edited = editor.finish();
    assert_eq!(edited, unit);
    assert_eq!(edited.members().first(), unit.members().first());
}

#[rstest]
#[case(vec![vec![1, 0], vec![1, 0, 0]])]
#[case(vec![vec![1, 0, 0], vec![1, 0]])]
#[case(vec![vec![1, 0, 0], vec![1, 0, 0]])]
fn overlapping_replacements_conflict(#[case] targets: Vec<Vec<usize>>) {
    let unit = parse(NATIVE_CLASS).into_unit();
    let node = unit.member(&path(&[1, 0, 0])).expect("method").clone();
    let edits = targets.into_iter().map(|target| SyntaxEdit::Replace {
        target: MemberPath::new(target),
        node: node.clone(),
    });
    let error = apply_edits(&unit, edits).expect_err("conflict");
    assert!(
        matches!(error, SyntaxError::ConflictingEdits { .. }),
        "unexpected error: {error}"
    );
}

#[test]
fn missing_targets_are_rejected() {
    let unit = parse(NATIVE_CLASS).into_unit();
    let node = unit.member(&path(&[0])).expect("using").clone();
    let error = apply_edits(
        &unit,
        vec![SyntaxEdit::InsertBefore {
            anchor: path(&[4, 2]),
            node,
        }],
    )
    .expect_err("missing target");
    assert!(matches!(error, SyntaxError::MissingEditTarget { .. }));
    assert_eq!(error.to_string(), "edit target /4/2 does not exist");
}

// =============================================================================
// Syntactic Lock Tests
// =============================================================================

#[rstest]
#[case(NATIVE_CLASS, true)]
#[case(MIXED_MEMBERS, true)]
#[case("class Broken {", false)]
#[case("class C\n{\n    static extern void Beep(\n}\n", false)]
fn syntactic_lock_validates_correctly(#[case] content: &str, #[case] should_pass: bool) {
    let lock = TreeSitterSyntacticLock::new();
    let failures = lock
        .validate_source(SupportedLanguage::CSharp, content)
        .expect("validate");

    if should_pass {
        assert!(failures.is_empty(), "Expected no failures for {content}: {failures:?}");
    } else {
        assert!(!failures.is_empty(), "Expected failures for {content}");
    }
}
