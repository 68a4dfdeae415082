//! Bidirectional XML synchronization
//!
//! This crate keeps a typed, editable view of an XML document in sync with
//! the document's text. Parsing runs a spec (a composition of
//! transformation units) over the document and yields [`Shape`] values;
//! rebuilding takes an edited shape and produces a new document in which
//! everything the spec did not model (unknown attributes, extra elements,
//! comments) survives from the original.
//!
//! The flow, in order:
//!
//! 1. [`tree::parse_document`] converts the text into a lossless
//!    [`StructuralNode`] mirror;
//! 2. [`tree::simplify`] projects it into the [`SimplifiedNode`] form the
//!    accessor units consume;
//! 3. the spec's [`Syncer`] units run forward ([`parse_with`]), producing
//!    typed values plus traces of every lossy step;
//! 4. after edits, the units run backward ([`rebuild_with`]), consulting
//!    traces and shape provenance so untouched values keep their original
//!    spelling;
//! 5. [`tree::graft`] merges the rebuilt simplified node onto the original
//!    structural tree, and [`writer::write_document`] renders the result.
//!
//! Problems found along the way (missing attributes, unknown enum values,
//! cardinality violations) never abort a run: they accumulate on the
//! [`SyncContext`] as located diagnostics, and the run produces its best
//! effort. Only malformed XML and a non-element rebuild result are hard
//! errors.

pub mod accessors;
pub mod context;
pub mod error;
pub mod object;
pub mod registry;
pub mod syncer;
pub mod tree;
pub mod value;
pub mod variants;
pub mod writer;

pub use context::{Diagnostic, PathSegment, ReportLevel, Severity, SyncContext};
pub use error::SyncError;
pub use object::{field, object, SyncSpec};
pub use registry::{SchemaRegistry, StaticRegistry};
pub use syncer::{pipe, Syncer, Trace};
pub use tree::{parse_document, simplify, SimplifiedNode, StructuralNode};
pub use value::{Provenance, Shape, TableHandle, Value};
pub use variants::{dependent, switch, AliasTable};
pub use writer::{write_document, WriteOptions};

/// Run a spec forward over a parsed document
pub fn parse_with(
    unit: &dyn Syncer,
    document: &StructuralNode,
    cx: &mut SyncContext,
) -> Value {
    let node = tree::simplify(document);
    let (parsed, _) = unit.serialize(Value::Node(node), cx);
    parsed
}

/// Rebuild a document tree from an edited value
///
/// The value's own provenance carries everything the reverse pass needs,
/// so no trace threads through from the forward pass. The result is
/// grafted onto `original`, which preserves comments, interleaving, and
/// unmodeled content.
pub fn rebuild_with(
    unit: &dyn Syncer,
    parsed: Value,
    original: &StructuralNode,
    cx: &mut SyncContext,
) -> Result<StructuralNode, SyncError> {
    match unit.deserialize(parsed, &Trace::None, cx) {
        Value::Node(edited) => Ok(tree::graft(original, &edited)),
        other => Err(SyncError::Rebuild(format!(
            "expected an element at the document root, got {other:?}"
        ))),
    }
}

/// [`rebuild_with`] plus rendering to text
pub fn rebuild_document(
    unit: &dyn Syncer,
    parsed: Value,
    original: &StructuralNode,
    cx: &mut SyncContext,
    options: &WriteOptions,
) -> Result<String, SyncError> {
    let rebuilt = rebuild_with(unit, parsed, original, cx)?;
    Ok(write_document(&rebuilt, options))
}
