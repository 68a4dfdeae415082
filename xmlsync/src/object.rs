//! The object runner
//!
//! [`object`] turns a named list of field units (a sync spec) into a
//! single unit that parses an element into a [`Shape`] and rebuilds an
//! element from an edited one. Parse hands every field unit the same
//! source node; rebuild runs each field unit in spec order and merges the
//! partial nodes they produce onto a base cloned from the shape's
//! provenance, so attributes and children no field models pass through
//! untouched.
//!
//! Merge policy per tag group: the first field to rebuild a group replaces
//! the provenance copy of that group, later fields append to it. Attribute
//! writes always replace, including clears.

use crate::context::SyncContext;
use crate::syncer::{Syncer, Trace};
use crate::tree::{Content, SimplifiedNode};
use crate::value::{Provenance, Shape, Value};

/// Named field units, in declaration order
pub type SyncSpec = Vec<(String, Box<dyn Syncer>)>;

/// Build a field unit pair, saving callers the `to_string` noise
pub fn field(name: &str, unit: Box<dyn Syncer>) -> (String, Box<dyn Syncer>) {
    (name.to_string(), unit)
}

/// Run a sync spec over an element
pub fn object(spec: SyncSpec) -> Box<dyn Syncer> {
    Box::new(ObjectSyncer { spec })
}

struct ObjectSyncer {
    spec: SyncSpec,
}

impl ObjectSyncer {
    fn parse_node(&self, node: &SimplifiedNode, cx: &mut SyncContext) -> Shape {
        let mut shape = Shape::new();
        let mut entries = Vec::with_capacity(self.spec.len());
        cx.push_siblings(Shape::new());
        for (name, unit) in &self.spec {
            let depth = cx.depth();
            let (value, trace) = unit.serialize(Value::Node(node.clone()), cx);
            cx.truncate(depth);
            shape.set(name, value);
            entries.push((name.clone(), trace));
            // Later fields (via `dependent`) see everything parsed so far
            cx.set_siblings(shape.clone());
        }
        cx.pop_siblings();
        shape.provenance = Some(Provenance {
            node: node.clone(),
            entries,
        });
        shape
    }

    fn rebuild_shape(&self, shape: &Shape, cx: &mut SyncContext) -> SimplifiedNode {
        let mut base = shape
            .provenance
            .as_ref()
            .map(|provenance| provenance.node.clone())
            .unwrap_or_else(|| SimplifiedNode::empty(""));

        for (name, _) in shape.fields() {
            if !self.spec.iter().any(|(field, _)| field == name) {
                cx.error(format!("Unknown field \"{name}\""));
            }
        }

        cx.push_siblings(shape.clone());
        let mut touched_groups: Vec<String> = Vec::new();
        for (name, unit) in &self.spec {
            let value = shape.get(name).cloned().unwrap_or(Value::Absent);
            let trace = shape
                .provenance
                .as_ref()
                .and_then(|provenance| provenance.entry(name))
                .cloned()
                .unwrap_or(Trace::None);
            let depth = cx.depth();
            let partial = unit.deserialize(value, &trace, cx);
            cx.truncate(depth);
            match partial {
                Value::Node(node) => {
                    merge_partial(&mut base, node, &mut touched_groups);
                }
                Value::Absent => {}
                other => {
                    cx.error(format!(
                        "Field \"{name}\" did not rebuild to an element, got {other:?}"
                    ));
                }
            }
        }
        cx.pop_siblings();
        base
    }
}

/// Fold one field's partial node into the base being rebuilt
fn merge_partial(base: &mut SimplifiedNode, partial: SimplifiedNode, touched: &mut Vec<String>) {
    if !partial.tag_name.is_empty() {
        base.tag_name = partial.tag_name;
    }
    for (key, value) in partial.attributes {
        base.set_attribute(&key, value);
    }
    match partial.content {
        Content::Text(text) => {
            base.content = Content::Text(text);
        }
        Content::Children(groups) => {
            for (tag, nodes) in groups {
                if touched.iter().any(|t| t == &tag) {
                    base.extend_group(&tag, nodes);
                } else {
                    base.set_group(&tag, nodes);
                    touched.push(tag);
                }
            }
        }
    }
}

impl Syncer for ObjectSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        match &raw {
            Value::Node(node) => {
                let shape = self.parse_node(node, cx);
                // State lives in the shape's provenance, so a caller-held
                // shape rebuilds without any external trace
                (Value::Shape(shape), Trace::None)
            }
            Value::Absent => (Value::Absent, Trace::None),
            _ => {
                cx.error(format!("Expected an element, got {raw:?}"));
                (Value::Absent, Trace::None)
            }
        }
    }

    fn deserialize(&self, parsed: Value, _trace: &Trace, cx: &mut SyncContext) -> Value {
        match &parsed {
            Value::Shape(shape) => Value::Node(self.rebuild_shape(shape, cx)),
            Value::Absent => Value::Absent,
            _ => {
                cx.error(format!("Expected a shape, got {parsed:?}"));
                Value::Absent
            }
        }
    }
}
