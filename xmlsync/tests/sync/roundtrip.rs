//! Round-trip identity and unknown-content preservation.

use crate::common::{cell_spec, parse};
use xmlsync::accessors::{
    attribute, child, default_to, fallback_to, text_content, AttrMode, ChildMode,
};
use xmlsync::{
    field, object, parse_with, pipe, rebuild_with, write_document, SyncContext, Syncer, Value,
    WriteOptions,
};

fn body_spec() -> Box<dyn Syncer> {
    object(vec![field(
        "body",
        pipe(vec![child("body", ChildMode::Required), text_content()]),
    )])
}

#[test]
fn unchanged_rebuild_reproduces_the_document() {
    let original = parse("<top><body>text</body></top>");
    let mut cx = SyncContext::new();
    let spec = body_spec();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    assert_eq!(
        parsed.as_shape().unwrap().get("body"),
        Some(&Value::from("text"))
    );
    assert!(cx.diagnostics().is_empty());

    let rebuilt = rebuild_with(spec.as_ref(), parsed, &original, &mut cx).unwrap();
    assert_eq!(rebuilt, original);
}

#[test]
fn edited_field_flows_into_the_document() {
    let original = parse("<top><body>text</body></top>");
    let mut cx = SyncContext::new();
    let spec = body_spec();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    let mut shape = parsed.as_shape().unwrap().clone();
    shape.set("body", Value::from("new text"));

    let rebuilt =
        rebuild_with(spec.as_ref(), Value::Shape(shape), &original, &mut cx).unwrap();
    let text = write_document(&rebuilt, &WriteOptions::default());
    assert!(text.contains("<body>new text</body>"));
}

#[test]
fn unmodeled_content_survives_an_edit() {
    let original = parse(
        "<top note=\"keep\"><!-- audit --><body>text</body><extra k=\"1\"/></top>",
    );
    let mut cx = SyncContext::new();
    let spec = body_spec();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    let mut shape = parsed.as_shape().unwrap().clone();
    shape.set("body", Value::from("edited"));

    let rebuilt =
        rebuild_with(spec.as_ref(), Value::Shape(shape), &original, &mut cx).unwrap();
    assert_eq!(rebuilt.attribute("note"), Some("keep"));

    let text = write_document(&rebuilt, &WriteOptions::default());
    assert!(text.contains("<!-- audit -->"));
    assert!(text.contains("<extra k=\"1\"/>"));
    assert!(text.contains("<body>edited</body>"));
}

#[test]
fn field_cell_parses_typed_values() {
    let original = parse(
        "<cell type=\"text\" name=\"f\" default=\"a\" min=\"4\" max=\"-10\" \
         step=\"3.2\" readOnly=\"true\" />",
    );
    let mut cx = SyncContext::new();
    let spec = cell_spec();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    let shape = parsed.as_shape().unwrap();
    assert_eq!(shape.get("defaultValue"), Some(&Value::from("a")));
    assert_eq!(shape.get("isReadOnly"), Some(&Value::Bool(true)));
    assert_eq!(shape.get("min"), Some(&Value::Int(4)));
    assert_eq!(shape.get("max"), Some(&Value::Int(-10)));
    assert_eq!(shape.get("step"), Some(&Value::Float(3.2)));
    assert!(cx.diagnostics().is_empty());

    // The type attribute is not modeled by this spec but must survive
    let rebuilt = rebuild_with(spec.as_ref(), parsed, &original, &mut cx).unwrap();
    assert_eq!(rebuilt.attribute("type"), Some("text"));
    assert_eq!(rebuilt, original);
}

#[test]
fn default_leaves_an_absent_attribute_absent() {
    let original = parse("<cell name=\"a\"/>");
    let spec = object(vec![
        field("name", attribute("name", AttrMode::Required)),
        field(
            "mode",
            pipe(vec![
                attribute("mode", AttrMode::Skip),
                default_to(Value::from("auto")),
            ]),
        ),
    ]);
    let mut cx = SyncContext::new();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    assert_eq!(
        parsed.as_shape().unwrap().get("mode"),
        Some(&Value::from("auto"))
    );

    let rebuilt = rebuild_with(spec.as_ref(), parsed, &original, &mut cx).unwrap();
    assert_eq!(rebuilt.attribute("mode"), None);
}

#[test]
fn fallback_commits_the_substituted_value() {
    let original = parse("<cell name=\"a\"/>");
    let spec = object(vec![
        field("name", attribute("name", AttrMode::Required)),
        field(
            "mode",
            pipe(vec![
                attribute("mode", AttrMode::Skip),
                fallback_to(Value::from("auto")),
            ]),
        ),
    ]);
    let mut cx = SyncContext::new();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    let rebuilt = rebuild_with(spec.as_ref(), parsed, &original, &mut cx).unwrap();
    assert_eq!(rebuilt.attribute("mode"), Some("auto"));
}

#[test]
fn attribute_case_is_read_loosely_and_written_lower() {
    let original = parse("<cell NAME=\"total\" READONLY=\"YES\"/>");
    let mut cx = SyncContext::new();
    let spec = cell_spec();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    let mut shape = parsed.as_shape().unwrap().clone();
    assert_eq!(shape.get("name"), Some(&Value::from("total")));
    assert_eq!(shape.get("isReadOnly"), Some(&Value::Bool(true)));

    shape.set("isReadOnly", Value::Bool(false));
    let rebuilt =
        rebuild_with(spec.as_ref(), Value::Shape(shape), &original, &mut cx).unwrap();
    let text = write_document(&rebuilt, &WriteOptions::default());
    assert!(text.contains("readonly=\"false\""));
    // Untouched fields keep the document's exact spelling
    assert!(text.contains("name=\"total\""));
}

#[test]
fn rebuild_output_is_textually_stable() {
    let original = parse(
        "<top note=\"keep\"><!-- audit --><body>text</body><extra k=\"1\"/></top>",
    );
    let mut cx = SyncContext::new();
    let spec = body_spec();
    let options = WriteOptions::default();

    let parsed = parse_with(spec.as_ref(), &original, &mut cx);
    let rebuilt = rebuild_with(spec.as_ref(), parsed, &original, &mut cx).unwrap();
    assert_eq!(
        write_document(&rebuilt, &options),
        write_document(&original, &options)
    );
}
