//! Diagnostic behavior of the accessor units against whole documents.

use crate::common::{parse, row_spec, table_field};
use xmlsync::accessors::{attribute, child, integer, AttrMode, ChildMode};
use xmlsync::{
    field, object, parse_with, pipe, rebuild_with, PathSegment, SyncContext, Value,
};

#[test]
fn missing_required_attribute_emits_exactly_one_error() {
    let original = parse("<cell name=\"a\"/>");
    let spec = object(vec![
        field("name", attribute("name", AttrMode::Required)),
        field("name2", attribute("name2", AttrMode::Required)),
    ]);
    let mut cx = SyncContext::new();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    assert_eq!(parsed.as_shape().unwrap().get("name2"), Some(&Value::Absent));

    let diags = cx.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "Required attribute \"name2\" is missing");

    // The missing attribute stays omitted on rebuild
    let rebuilt = rebuild_with(spec.as_ref(), parsed, &original, &mut cx).unwrap();
    assert_eq!(rebuilt.attribute("name2"), None);
}

#[test]
fn duplicate_single_child_warns_once_and_uses_the_first() {
    let original =
        parse("<top><singleChild v=\"1\"/><singleChild v=\"2\"/></top>");
    let spec = object(vec![field(
        "only",
        child("singleChild", ChildMode::Optional),
    )]);
    let mut cx = SyncContext::new();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    let diags = cx.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(
        diags[0].message,
        "Expected to find at most one <singleChild /> child"
    );

    let only = parsed.as_shape().unwrap().get("only").unwrap();
    assert_eq!(only.as_node().unwrap().attribute("v"), Some("1"));
}

#[test]
fn missing_required_child_is_an_error() {
    let original = parse("<top/>");
    let spec = object(vec![field("body", child("body", ChildMode::Required))]);
    let mut cx = SyncContext::new();

    parse_with(spec.as_ref(), &original, &mut cx);
    assert!(cx.has_errors());
    assert_eq!(
        cx.diagnostics()[0].message,
        "Required child <body /> is missing"
    );
}

#[test]
fn piped_scalar_errors_carry_the_attribute_segment() {
    // The numeric stage runs after the attribute accessor; its diagnostic
    // must still name the attribute it refined.
    let original = parse("<cell min=\"abc\" max=\"5\"/>");
    let spec = object(vec![
        field("min", pipe(vec![attribute("min", AttrMode::Skip), integer()])),
        field("max", pipe(vec![attribute("max", AttrMode::Skip), integer()])),
    ]);
    let mut cx = SyncContext::new();

    parse_with(spec.as_ref(), &original, &mut cx);
    let diags = cx.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "Expected a number, got \"abc\"");
    assert!(diags[0]
        .path
        .contains(&PathSegment::Attribute("min".to_string())));
    assert!(!diags[0]
        .path
        .contains(&PathSegment::Attribute("max".to_string())));
}

#[test]
fn mapped_elements_get_isolated_diagnostic_paths() {
    // First cell is missing its required name; the second is fine. The
    // error must point at element 0 only.
    let original = parse("<row><cell/><cell name=\"b\"/></row>");
    let mut cx = SyncContext::new();

    parse_with(row_spec().as_ref(), &original, &mut cx);
    let diags = cx.diagnostics();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].path.contains(&PathSegment::Index(0)));
    assert!(diags[0]
        .path
        .contains(&PathSegment::Attribute("name".to_string())));
    assert!(!diags[0].path.contains(&PathSegment::Index(1)));
}

#[test]
fn unresolved_table_name_reports_and_keeps_the_spelling() {
    let original = parse("<search table=\"edu.institution.Borrowing\"/>");
    let spec = object(vec![table_field("table", "table")]);
    let mut cx = SyncContext::new();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    assert!(cx.has_errors());
    assert_eq!(
        cx.diagnostics()[0].message,
        "Unknown table \"edu.institution.Borrowing\""
    );
    assert_eq!(parsed.as_shape().unwrap().get("table"), Some(&Value::Absent));

    // Best effort on rebuild: the unresolved name round-trips untouched
    let rebuilt = rebuild_with(spec.as_ref(), parsed, &original, &mut cx).unwrap();
    assert_eq!(
        rebuilt.attribute("table"),
        Some("edu.institution.Borrowing")
    );
}

#[test]
fn resolved_table_name_round_trips_case_loosely() {
    let original = parse("<search table=\"edu.institution.AGENT\"/>");
    let spec = object(vec![table_field("table", "table")]);
    let mut cx = SyncContext::new();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    assert!(cx.diagnostics().is_empty());
    let handle = match parsed.as_shape().unwrap().get("table") {
        Some(Value::Table(handle)) => handle.clone(),
        other => panic!("expected a table handle, got {other:?}"),
    };
    assert_eq!(handle.display_name, "Agent");

    let rebuilt = rebuild_with(spec.as_ref(), parsed, &original, &mut cx).unwrap();
    assert_eq!(rebuilt.attribute("table"), Some("edu.institution.AGENT"));
}
