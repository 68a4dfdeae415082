//! The dynamic value model
//!
//! Specs describe heterogeneous fields (strings, numbers, nested shapes,
//! node lists), so the transformation units all work over one closed sum
//! type, [`Value`]. [`Shape`] is the object a spec run produces: named
//! fields plus an explicit [`Provenance`] record linking back to the exact
//! simplified node (and per-field traces) the shape was derived from. The
//! provenance is a first-class field, not a hidden side channel; rebuild
//! recovers everything a spec did not model from it.

use crate::syncer::Trace;
use crate::tree::SimplifiedNode;

/// Any value flowing through a transformation unit
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing / not present (an absent attribute, an unresolved name)
    Absent,
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    List(Vec<Value>),
    Node(SimplifiedNode),
    Shape(Shape),
    Table(TableHandle),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            Value::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&SimplifiedNode> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// A resolved table (or field) from the caller's schema registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHandle {
    /// The external qualified name as documents spell it
    pub qualified_name: String,
    /// Human-readable name for editor surfaces
    pub display_name: String,
}

impl TableHandle {
    pub fn new(qualified_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        TableHandle {
            qualified_name: qualified_name.into(),
            display_name: display_name.into(),
        }
    }
}

/// Link from a parsed shape back to its source node
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    /// The untouched simplified node the shape was parsed from
    pub node: SimplifiedNode,
    /// Per-field traces, in spec order
    pub entries: Vec<(String, Trace)>,
}

impl Provenance {
    pub fn entry(&self, name: &str) -> Option<&Trace> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, trace)| trace)
    }
}

/// The typed object a spec run produces
///
/// Field order follows spec declaration order. A shape without provenance
/// (freshly constructed by a caller, or the payload of a variant switch)
/// rebuilds against an empty base node: nothing old survives.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    fields: Vec<(String, Value)>,
    pub provenance: Option<Provenance>,
}

impl Shape {
    pub fn new() -> Self {
        Shape::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Set a field, replacing in place or appending
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(entry) = self.fields.iter_mut().find(|(field, _)| field == name) {
            entry.1 = value;
        } else {
            self.fields.push((name.to_string(), value));
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.fields.retain(|(field, _)| field != name);
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| field == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
