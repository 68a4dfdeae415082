//! Accessor library
//!
//! The reusable transformation units every spec is assembled from.
//! Node-rooted units (attribute, child, children) read from a
//! [`SimplifiedNode`] and rebuild *partial* nodes — a node carrying only
//! the attribute or group they control — which the object runner merges.
//! Scalar units (boolean, integer, float, enumeration, table, split)
//! refine strings further down a [`crate::syncer::pipe`] chain and lean on
//! their trace to restore the original spelling whenever the parsed value
//! comes back unchanged.
//!
//! None of these units ever abort: problems become diagnostics on the
//! context and the unit yields a best-effort value, so every problem in a
//! document surfaces in one pass.
//!
//! Node-rooted units push their path segment and leave it on the stack, so
//! diagnostics from later stages of the same chain still carry it. The
//! composite units ([`crate::syncer::pipe`], [`crate::object::object`],
//! [`map`]) restore the depth around each chain, field, or element.

use crate::context::{PathSegment, ReportLevel, SyncContext};
use crate::registry::SchemaRegistry;
use crate::syncer::{Syncer, Trace};
use crate::tree::{Content, SimplifiedNode};
use crate::value::Value;
use std::rc::Rc;

/// How an attribute unit treats missing/blank values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMode {
    /// Blank or missing is an error (the field still parses as absent)
    Required,
    /// Omit the attribute entirely when the value is blank
    Skip,
    /// Write an empty string rather than omitting
    Empty,
}

/// Whether a child element must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildMode {
    Required,
    Optional,
}

/// Read/write a single attribute, trimming on read
pub fn attribute(name: &str, mode: AttrMode) -> Box<dyn Syncer> {
    Box::new(AttributeSyncer {
        name: name.to_string(),
        mode,
    })
}

struct AttributeSyncer {
    name: String,
    mode: AttrMode,
}

impl Syncer for AttributeSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        cx.push(PathSegment::Attribute(self.name.clone()));
        match &raw {
            Value::Node(node) => {
                let original = node.attribute(&self.name).map(|s| s.to_string());
                let trimmed = original.as_deref().map(str::trim).unwrap_or("");
                let parsed = if trimmed.is_empty() {
                    if self.mode == AttrMode::Required {
                        cx.error(format!(
                            "Required attribute \"{}\" is missing",
                            self.name
                        ));
                    }
                    Value::Absent
                } else {
                    Value::Str(trimmed.to_string())
                };
                let trace = match original {
                    Some(text) => Trace::Raw(Value::Str(text)),
                    None => Trace::Raw(Value::Absent),
                };
                (parsed, trace)
            }
            Value::Absent => (Value::Absent, Trace::None),
            _ => {
                cx.error(format!("Attribute \"{}\" expects an element", self.name));
                (Value::Absent, Trace::None)
            }
        }
    }

    fn deserialize(&self, parsed: Value, trace: &Trace, cx: &mut SyncContext) -> Value {
        cx.push(PathSegment::Attribute(self.name.clone()));
        let mut partial = SimplifiedNode::empty("");
        let key = self.name.to_lowercase();
        match &parsed {
            Value::Str(text) => {
                if text.trim().is_empty() {
                    match self.mode {
                        AttrMode::Skip => partial.set_attribute(&key, None),
                        AttrMode::Empty => partial.set_attribute(&key, Some(String::new())),
                        AttrMode::Required => partial.set_attribute(&key, Some(text.clone())),
                    }
                } else if let Trace::Raw(Value::Str(original)) = trace {
                    // Unchanged value: restore the untrimmed original
                    if original.trim() == text {
                        partial.set_attribute(&key, Some(original.clone()));
                    } else {
                        partial.set_attribute(&key, Some(text.clone()));
                    }
                } else {
                    partial.set_attribute(&key, Some(text.clone()));
                }
            }
            Value::Absent => {
                if self.mode == AttrMode::Empty {
                    partial.set_attribute(&key, Some(String::new()));
                } else {
                    partial.set_attribute(&key, None);
                }
            }
            _ => {
                cx.error(format!(
                    "Attribute \"{}\" expects a string, got {:?}",
                    self.name, parsed
                ));
                partial.set_attribute(&key, None);
            }
        }
        Value::Node(partial)
    }
}

/// Read/write the first child element with the given tag
pub fn child(tag: &str, mode: ChildMode) -> Box<dyn Syncer> {
    Box::new(ChildSyncer {
        tag: tag.to_string(),
        mode,
    })
}

struct ChildSyncer {
    tag: String,
    mode: ChildMode,
}

impl Syncer for ChildSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        cx.push(PathSegment::Child(self.tag.clone()));
        match &raw {
            Value::Node(node) => match node.group_ci(&self.tag) {
                Some(nodes) if !nodes.is_empty() => {
                    if nodes.len() > 1 {
                        cx.warn(format!(
                            "Expected to find at most one <{} /> child",
                            self.tag
                        ));
                    }
                    (Value::Node(nodes[0].clone()), Trace::None)
                }
                _ => {
                    if self.mode == ChildMode::Required {
                        cx.error(format!("Required child <{} /> is missing", self.tag));
                    }
                    (Value::Absent, Trace::None)
                }
            },
            Value::Absent => (Value::Absent, Trace::None),
            _ => {
                cx.error(format!("Child <{} /> expects an element", self.tag));
                (Value::Absent, Trace::None)
            }
        }
    }

    fn deserialize(&self, parsed: Value, _trace: &Trace, cx: &mut SyncContext) -> Value {
        cx.push(PathSegment::Child(self.tag.clone()));
        let mut partial = SimplifiedNode::empty("");
        let key = self.tag.to_lowercase();
        match parsed {
            Value::Node(mut node) => {
                node.tag_name = key.clone();
                partial.set_group(&key, vec![node]);
            }
            Value::Absent => {
                partial.set_group(&key, Vec::new());
            }
            other => {
                cx.error(format!(
                    "Child <{} /> expects an element, got {:?}",
                    self.tag, other
                ));
                partial.set_group(&key, Vec::new());
            }
        }
        Value::Node(partial)
    }
}

/// Read/write the full ordered list of children with the given tag
pub fn children(tag: &str) -> Box<dyn Syncer> {
    Box::new(ChildrenSyncer {
        tag: tag.to_string(),
    })
}

struct ChildrenSyncer {
    tag: String,
}

impl Syncer for ChildrenSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        cx.push(PathSegment::Children(self.tag.clone()));
        match &raw {
            Value::Node(node) => {
                let nodes = node
                    .group_ci(&self.tag)
                    .map(|nodes| nodes.iter().cloned().map(Value::Node).collect())
                    .unwrap_or_default();
                (Value::List(nodes), Trace::None)
            }
            Value::Absent => (Value::Absent, Trace::None),
            _ => {
                cx.error(format!("Children <{} /> expects an element", self.tag));
                (Value::List(Vec::new()), Trace::None)
            }
        }
    }

    fn deserialize(&self, parsed: Value, _trace: &Trace, cx: &mut SyncContext) -> Value {
        cx.push(PathSegment::Children(self.tag.clone()));
        let mut partial = SimplifiedNode::empty("");
        let key = self.tag.to_lowercase();
        let mut nodes = Vec::new();
        match parsed {
            Value::List(items) => {
                for item in items {
                    match item {
                        Value::Node(mut node) => {
                            node.tag_name = key.clone();
                            nodes.push(node);
                        }
                        other => {
                            cx.error(format!(
                                "Children <{} /> expects elements, got {:?}",
                                self.tag, other
                            ));
                        }
                    }
                }
            }
            Value::Absent => {}
            other => {
                cx.error(format!(
                    "Children <{} /> expects a list, got {:?}",
                    self.tag, other
                ));
            }
        }
        partial.set_group(&key, nodes);
        Value::Node(partial)
    }
}

/// Read/write an element's text content
pub fn text_content() -> Box<dyn Syncer> {
    Box::new(TextContentSyncer)
}

struct TextContentSyncer;

impl Syncer for TextContentSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        match raw {
            Value::Node(node) => {
                let text = node.text().unwrap_or("").to_string();
                (Value::Str(text), Trace::Raw(Value::Node(node)))
            }
            Value::Absent => (Value::Absent, Trace::None),
            _ => {
                cx.error("Text content expects an element");
                (Value::Absent, Trace::None)
            }
        }
    }

    fn deserialize(&self, parsed: Value, trace: &Trace, cx: &mut SyncContext) -> Value {
        // The trace carries the whole original node so tag and attributes
        // survive a content edit
        let mut base = match trace {
            Trace::Raw(Value::Node(node)) => node.clone(),
            _ => SimplifiedNode::empty(""),
        };
        match parsed {
            Value::Str(text) => {
                base.content = if text.is_empty() {
                    Content::Children(Vec::new())
                } else {
                    Content::Text(text)
                };
            }
            Value::Absent => {
                base.content = Content::Children(Vec::new());
            }
            other => {
                cx.error(format!("Text content expects a string, got {other:?}"));
            }
        }
        Value::Node(base)
    }
}

const TRUTHY: [&str; 4] = ["true", "yes", "1", "on"];

fn parse_bool(text: &str) -> bool {
    TRUTHY.contains(&text.trim().to_lowercase().as_str())
}

/// Permissive boolean parsing; unrecognized tokens read as `false`
pub fn boolean() -> Box<dyn Syncer> {
    Box::new(BooleanSyncer)
}

struct BooleanSyncer;

impl Syncer for BooleanSyncer {
    fn serialize(&self, raw: Value, _cx: &mut SyncContext) -> (Value, Trace) {
        match &raw {
            Value::Str(text) => (Value::Bool(parse_bool(text)), Trace::Raw(raw.clone())),
            Value::Bool(b) => (Value::Bool(*b), Trace::Raw(raw.clone())),
            _ => (Value::Bool(false), Trace::Raw(raw.clone())),
        }
    }

    fn deserialize(&self, parsed: Value, trace: &Trace, _cx: &mut SyncContext) -> Value {
        match parsed {
            Value::Bool(value) => match trace {
                Trace::Raw(Value::Str(original)) if parse_bool(original) == value => {
                    Value::Str(original.clone())
                }
                Trace::Raw(Value::Absent) if !value => Value::Absent,
                _ => Value::Str(value.to_string()),
            },
            Value::Absent => Value::Absent,
            other => other,
        }
    }
}

/// Longest numeric prefix of `text`, honoring an optional sign and, when
/// `allow_fraction`, a decimal point
fn numeric_prefix(text: &str, allow_fraction: bool) -> Option<&str> {
    let text = text.trim();
    let bytes = text.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if allow_fraction && end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        None
    } else {
        Some(&text[..end])
    }
}

/// Permissive integer parsing: a partial numeric prefix still yields a
/// value, alongside an error diagnostic
pub fn integer() -> Box<dyn Syncer> {
    Box::new(IntegerSyncer)
}

struct IntegerSyncer;

impl Syncer for IntegerSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        match &raw {
            Value::Str(text) => {
                let trimmed = text.trim();
                let parsed = match numeric_prefix(trimmed, false) {
                    Some(prefix) => {
                        if prefix.len() != trimmed.len() {
                            cx.error(format!("Expected a number, got \"{trimmed}\""));
                        }
                        match prefix.parse::<i64>() {
                            Ok(value) => Value::Int(value),
                            Err(_) => {
                                cx.error(format!("Number out of range: \"{trimmed}\""));
                                Value::Absent
                            }
                        }
                    }
                    None => {
                        cx.error(format!("Expected a number, got \"{trimmed}\""));
                        Value::Absent
                    }
                };
                (parsed, Trace::Raw(raw.clone()))
            }
            Value::Int(i) => (Value::Int(*i), Trace::Raw(raw.clone())),
            Value::Absent => (Value::Absent, Trace::Raw(Value::Absent)),
            _ => {
                cx.error(format!("Expected a number, got {raw:?}"));
                (Value::Absent, Trace::Raw(raw.clone()))
            }
        }
    }

    fn deserialize(&self, parsed: Value, trace: &Trace, _cx: &mut SyncContext) -> Value {
        match parsed {
            Value::Int(value) => match trace {
                Trace::Raw(Value::Str(original))
                    if numeric_prefix(original, false)
                        .and_then(|p| p.parse::<i64>().ok())
                        == Some(value) =>
                {
                    Value::Str(original.clone())
                }
                _ => Value::Str(value.to_string()),
            },
            // The field never parsed; put the original text back untouched
            Value::Absent => match trace {
                Trace::Raw(Value::Str(original)) => Value::Str(original.clone()),
                _ => Value::Absent,
            },
            other => other,
        }
    }
}

/// Permissive float parsing, mirroring [`integer`]
pub fn float() -> Box<dyn Syncer> {
    Box::new(FloatSyncer)
}

struct FloatSyncer;

impl Syncer for FloatSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        match &raw {
            Value::Str(text) => {
                let trimmed = text.trim();
                let parsed = match numeric_prefix(trimmed, true) {
                    Some(prefix) => {
                        if prefix.len() != trimmed.len() {
                            cx.error(format!("Expected a number, got \"{trimmed}\""));
                        }
                        match prefix.parse::<f64>() {
                            Ok(value) => Value::Float(value),
                            Err(_) => {
                                cx.error(format!("Number out of range: \"{trimmed}\""));
                                Value::Absent
                            }
                        }
                    }
                    None => {
                        cx.error(format!("Expected a number, got \"{trimmed}\""));
                        Value::Absent
                    }
                };
                (parsed, Trace::Raw(raw.clone()))
            }
            Value::Float(f) => (Value::Float(*f), Trace::Raw(raw.clone())),
            Value::Int(i) => (Value::Float(*i as f64), Trace::Raw(raw.clone())),
            Value::Absent => (Value::Absent, Trace::Raw(Value::Absent)),
            _ => {
                cx.error(format!("Expected a number, got {raw:?}"));
                (Value::Absent, Trace::Raw(raw.clone()))
            }
        }
    }

    fn deserialize(&self, parsed: Value, trace: &Trace, _cx: &mut SyncContext) -> Value {
        match parsed {
            Value::Float(value) => match trace {
                Trace::Raw(Value::Str(original))
                    if numeric_prefix(original, true)
                        .and_then(|p| p.parse::<f64>().ok())
                        == Some(value) =>
                {
                    Value::Str(original.clone())
                }
                _ => Value::Str(value.to_string()),
            },
            Value::Absent => match trace {
                Trace::Raw(Value::Str(original)) => Value::Str(original.clone()),
                _ => Value::Absent,
            },
            other => other,
        }
    }
}

/// Natural-language disjunction: `a`, `a or b`, `a, b, or c`
pub(crate) fn disjunction(items: &[String]) -> String {
    match items.len() {
        0 => String::new(),
        1 => items[0].clone(),
        2 => format!("{} or {}", items[0], items[1]),
        n => {
            let head = items[..n - 1].join(", ");
            format!("{}, or {}", head, items[n - 1])
        }
    }
}

/// Case-insensitive match against an allowed set, yielding the canonical
/// spelling
pub fn enumeration(allowed: &[&str], level: ReportLevel) -> Box<dyn Syncer> {
    Box::new(EnumSyncer {
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
        level,
    })
}

struct EnumSyncer {
    allowed: Vec<String>,
    level: ReportLevel,
}

impl EnumSyncer {
    fn canonical(&self, text: &str) -> Option<&str> {
        self.allowed
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(text))
            .map(|s| s.as_str())
    }
}

impl Syncer for EnumSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        match &raw {
            Value::Str(text) => {
                let trimmed = text.trim();
                let parsed = match self.canonical(trimmed) {
                    Some(canonical) => Value::Str(canonical.to_string()),
                    None => {
                        cx.report(
                            self.level,
                            format!(
                                "Unknown value \"{trimmed}\". Expected one of {}",
                                disjunction(&self.allowed)
                            ),
                        );
                        // Best effort: the raw spelling passes through
                        Value::Str(trimmed.to_string())
                    }
                };
                (parsed, Trace::Raw(raw.clone()))
            }
            Value::Absent => (Value::Absent, Trace::Raw(Value::Absent)),
            _ => {
                cx.error(format!("Expected a string, got {raw:?}"));
                (Value::Absent, Trace::Raw(raw.clone()))
            }
        }
    }

    fn deserialize(&self, parsed: Value, trace: &Trace, _cx: &mut SyncContext) -> Value {
        match parsed {
            Value::Str(value) => match trace {
                Trace::Raw(Value::Str(original))
                    if self.canonical(original.trim()).unwrap_or(original.trim())
                        == value =>
                {
                    Value::Str(original.clone())
                }
                _ => Value::Str(value),
            },
            Value::Absent => Value::Absent,
            other => other,
        }
    }
}

/// Resolve an external qualified name through the schema registry
pub fn table(registry: Rc<dyn SchemaRegistry>, level: ReportLevel) -> Box<dyn Syncer> {
    Box::new(TableSyncer { registry, level })
}

struct TableSyncer {
    registry: Rc<dyn SchemaRegistry>,
    level: ReportLevel,
}

impl Syncer for TableSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        match &raw {
            Value::Str(text) => {
                let trimmed = text.trim();
                let parsed = match self.registry.resolve(trimmed) {
                    Some(handle) => Value::Table(handle),
                    None => {
                        cx.report(self.level, format!("Unknown table \"{trimmed}\""));
                        Value::Absent
                    }
                };
                (parsed, Trace::Raw(raw.clone()))
            }
            Value::Absent => (Value::Absent, Trace::Raw(Value::Absent)),
            _ => {
                cx.error(format!("Expected a table name, got {raw:?}"));
                (Value::Absent, Trace::Raw(raw.clone()))
            }
        }
    }

    fn deserialize(&self, parsed: Value, trace: &Trace, _cx: &mut SyncContext) -> Value {
        match parsed {
            Value::Table(handle) => match trace {
                Trace::Raw(Value::Str(original))
                    if original.trim().eq_ignore_ascii_case(&handle.qualified_name) =>
                {
                    Value::Str(original.clone())
                }
                _ => Value::Str(handle.qualified_name),
            },
            // Unresolved at parse time: keep the document's spelling
            Value::Absent => match trace {
                Trace::Raw(Value::Str(original)) => Value::Str(original.clone()),
                _ => Value::Absent,
            },
            other => other,
        }
    }
}

/// Substitute a default at read time only; an untouched defaulted field
/// rebuilds as absent
pub fn default_to(value: Value) -> Box<dyn Syncer> {
    Box::new(DefaultSyncer {
        value,
        commit: false,
    })
}

/// Substitute a default and commit it: rebuild writes the substituted
/// value even when the caller never touched the field
pub fn fallback_to(value: Value) -> Box<dyn Syncer> {
    Box::new(DefaultSyncer {
        value,
        commit: true,
    })
}

struct DefaultSyncer {
    value: Value,
    commit: bool,
}

impl Syncer for DefaultSyncer {
    fn serialize(&self, raw: Value, _cx: &mut SyncContext) -> (Value, Trace) {
        if raw.is_absent() {
            (self.value.clone(), Trace::Raw(Value::Absent))
        } else {
            (raw.clone(), Trace::Raw(raw))
        }
    }

    fn deserialize(&self, parsed: Value, trace: &Trace, _cx: &mut SyncContext) -> Value {
        if !self.commit {
            if let Trace::Raw(Value::Absent) = trace {
                if parsed == self.value {
                    return Value::Absent;
                }
            }
        }
        parsed
    }
}

/// Apply a unit element-wise over a list
///
/// The traversal path is snapshotted and restored around every element so
/// sibling contexts do not bleed into each other.
pub fn map(inner: Box<dyn Syncer>) -> Box<dyn Syncer> {
    Box::new(MapSyncer { inner })
}

struct MapSyncer {
    inner: Box<dyn Syncer>,
}

impl Syncer for MapSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        match raw {
            Value::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                let mut traces = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let depth = cx.depth();
                    cx.push(PathSegment::Index(index));
                    let (value, trace) = self.inner.serialize(item, cx);
                    cx.truncate(depth);
                    values.push(value);
                    traces.push(trace);
                }
                (Value::List(values), Trace::Items(traces))
            }
            Value::Absent => (Value::Absent, Trace::None),
            other => {
                cx.error(format!("Expected a list, got {other:?}"));
                (Value::List(Vec::new()), Trace::None)
            }
        }
    }

    fn deserialize(&self, parsed: Value, trace: &Trace, cx: &mut SyncContext) -> Value {
        let empty = Vec::new();
        let traces = match trace {
            Trace::Items(traces) => traces,
            _ => &empty,
        };
        match parsed {
            Value::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let depth = cx.depth();
                    cx.push(PathSegment::Index(index));
                    let item_trace = traces.get(index).unwrap_or(&Trace::None);
                    values.push(self.inner.deserialize(item, item_trace, cx));
                    cx.truncate(depth);
                }
                Value::List(values)
            }
            Value::Absent => Value::Absent,
            other => {
                cx.error(format!("Expected a list, got {other:?}"));
                other
            }
        }
    }
}

/// Literal split on a separator; no escape handling
pub fn split(separator: char) -> Box<dyn Syncer> {
    Box::new(SplitSyncer { separator })
}

struct SplitSyncer {
    separator: char,
}

impl Syncer for SplitSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        match &raw {
            Value::Str(text) => {
                let tokens = text
                    .split(self.separator)
                    .map(|token| Value::Str(token.to_string()))
                    .collect();
                (Value::List(tokens), Trace::Raw(raw.clone()))
            }
            Value::Absent => (Value::Absent, Trace::Raw(Value::Absent)),
            _ => {
                cx.error(format!("Expected a string, got {raw:?}"));
                (Value::List(Vec::new()), Trace::Raw(raw.clone()))
            }
        }
    }

    fn deserialize(&self, parsed: Value, _trace: &Trace, cx: &mut SyncContext) -> Value {
        match parsed {
            Value::List(items) => {
                let mut tokens = Vec::with_capacity(items.len());
                for item in &items {
                    match item.as_str() {
                        Some(token) => tokens.push(token.to_string()),
                        None => cx.error(format!("Expected string tokens, got {item:?}")),
                    }
                }
                Value::Str(tokens.join(&self.separator.to_string()))
            }
            Value::Absent => Value::Absent,
            other => other,
        }
    }
}

/// Split with backslash-unescaping of the separator and inter-token trim
///
/// `\<sep>` yields a literal separator, `\\` a literal backslash, and any
/// other backslash sequence is kept as written.
pub fn fancy_split(separator: char) -> Box<dyn Syncer> {
    Box::new(FancySplitSyncer { separator })
}

struct FancySplitSyncer {
    separator: char,
}

fn fancy_tokens(text: &str, separator: char) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) if next == separator || next == '\\' => current.push(next),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            }
        } else if c == separator {
            tokens.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    tokens.push(current.trim().to_string());
    tokens
}

fn fancy_escape(token: &str, separator: char) -> String {
    token
        .replace('\\', "\\\\")
        .replace(separator, &format!("\\{separator}"))
}

impl Syncer for FancySplitSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        match &raw {
            Value::Str(text) => {
                let tokens = fancy_tokens(text, self.separator)
                    .into_iter()
                    .map(Value::Str)
                    .collect();
                (Value::List(tokens), Trace::Raw(raw.clone()))
            }
            Value::Absent => (Value::Absent, Trace::Raw(Value::Absent)),
            _ => {
                cx.error(format!("Expected a string, got {raw:?}"));
                (Value::List(Vec::new()), Trace::Raw(raw.clone()))
            }
        }
    }

    fn deserialize(&self, parsed: Value, trace: &Trace, cx: &mut SyncContext) -> Value {
        match parsed {
            Value::List(items) => {
                let mut tokens = Vec::with_capacity(items.len());
                for item in &items {
                    match item.as_str() {
                        Some(token) => tokens.push(token.to_string()),
                        None => cx.error(format!("Expected string tokens, got {item:?}")),
                    }
                }
                if let Trace::Raw(Value::Str(original)) = trace {
                    if fancy_tokens(original, self.separator) == tokens {
                        return Value::Str(original.clone());
                    }
                }
                let escaped: Vec<String> = tokens
                    .iter()
                    .map(|token| fancy_escape(token, self.separator))
                    .collect();
                Value::Str(escaped.join(&format!("{} ", self.separator)))
            }
            Value::Absent => Value::Absent,
            other => other,
        }
    }
}
