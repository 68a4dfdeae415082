//! Tagged-union dispatch against whole documents.

use crate::common::parse;
use xmlsync::accessors::{attribute, AttrMode};
use xmlsync::{
    field, parse_with, rebuild_with, switch, write_document, AliasTable, ReportLevel,
    Shape, SyncContext, Syncer, Value, WriteOptions,
};

fn union_spec() -> Box<dyn Syncer> {
    let table = AliasTable::new(&[("aa", "A"), ("a", "A"), ("b", "B")]);
    switch(
        "kind",
        "body",
        table,
        vec![
            (
                "A".to_string(),
                vec![field("alpha", attribute("alpha", AttrMode::Skip))],
            ),
            (
                "B".to_string(),
                vec![field("beta", attribute("beta", AttrMode::Skip))],
            ),
        ],
        "B",
        ReportLevel::Error,
    )
}

#[test]
fn unknown_discriminator_reports_and_round_trips() {
    let original = parse("<item kind=\"c\" beta=\"x\"/>");
    let mut cx = SyncContext::new();
    let spec = union_spec();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    let diags = cx.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(
        diags[0].message,
        "Unknown value \"c\". Expected one of aa, a, or b"
    );

    // The fallback variant parsed the node, and the raw literal is kept
    let shape = parsed.as_shape().unwrap();
    assert_eq!(shape.get("kind"), Some(&Value::from("c")));
    let body = shape.get("body").unwrap().as_shape().unwrap();
    assert_eq!(body.get("beta"), Some(&Value::from("x")));

    let mut cx = SyncContext::new();
    let rebuilt = rebuild_with(spec.as_ref(), parsed, &original, &mut cx).unwrap();
    assert_eq!(rebuilt.attribute("kind"), Some("c"));
    assert_eq!(rebuilt.attribute("beta"), Some("x"));
}

#[test]
fn alias_resolves_to_canonical_and_back() {
    let original = parse("<item kind=\"aa\" alpha=\"1\"/>");
    let mut cx = SyncContext::new();
    let spec = union_spec();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    let shape = parsed.as_shape().unwrap();
    assert_eq!(shape.get("kind"), Some(&Value::from("A")));
    // The variant's sub-shape sits under the payload field, nothing else
    assert_eq!(shape.len(), 2);
    let body = shape.get("body").unwrap().as_shape().unwrap();
    assert_eq!(body.get("alpha"), Some(&Value::from("1")));

    let rebuilt = rebuild_with(spec.as_ref(), parsed, &original, &mut cx).unwrap();
    assert_eq!(rebuilt, original);
}

#[test]
fn switching_variants_discards_the_old_variant_fields() {
    let original = parse("<item kind=\"a\" alpha=\"1\" scratch=\"z\"/>");
    let mut cx = SyncContext::new();
    let spec = union_spec();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    let mut shape = parsed.as_shape().unwrap().clone();
    shape.set("kind", Value::from("b"));
    let mut body = Shape::new();
    body.set("beta", Value::from("2"));
    shape.set("body", Value::Shape(body));

    let rebuilt =
        rebuild_with(spec.as_ref(), Value::Shape(shape), &original, &mut cx).unwrap();
    assert_eq!(rebuilt.attribute("kind"), Some("b"));
    assert_eq!(rebuilt.attribute("beta"), Some("2"));
    assert_eq!(rebuilt.attribute("alpha"), None);
    assert_eq!(rebuilt.attribute("scratch"), None);

    let text = write_document(&rebuilt, &WriteOptions::default());
    assert!(text.contains("kind=\"b\""));
    assert!(!text.contains("alpha"));
}

#[test]
fn canonical_discriminator_is_written_as_its_first_alias() {
    let original = parse("<item kind=\"b\"/>");
    let mut cx = SyncContext::new();
    let spec = union_spec();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    let mut shape = parsed.as_shape().unwrap().clone();
    // The caller writes the canonical tag, not one of its aliases
    shape.set("kind", Value::from("A"));
    let mut body = Shape::new();
    body.set("alpha", Value::from("9"));
    shape.set("body", Value::Shape(body));

    let rebuilt =
        rebuild_with(spec.as_ref(), Value::Shape(shape), &original, &mut cx).unwrap();
    assert_eq!(rebuilt.attribute("kind"), Some("aa"));
    assert_eq!(rebuilt.attribute("alpha"), Some("9"));
}
