//! Document tree representations
//!
//! Two trees back everything in this crate:
//!
//! - [`StructuralNode`] is an exact, lossless mirror of an XML element:
//!   tag name, ordered attributes (keys lower-cased), and an ordered list
//!   of text / comment / element children. It is what the writer consumes
//!   and what edits are grafted back onto.
//! - [`SimplifiedNode`] (see [`simplified`]) is the pattern-matching
//!   projection the accessor units work with: comments dropped, text and
//!   element children mutually exclusive, element children grouped by tag.
//!
//! Conversion from the host tree (`roxmltree`) lives in [`convert`]; the
//! reverse direction is [`graft`], which merges an edited simplified node
//! back onto the untouched structural original.

pub mod convert;
pub mod graft;
pub mod simplified;

pub use convert::{from_host, parse_document, parse_document_lenient};
pub use graft::graft;
pub use simplified::{simplify, Content, SimplifiedNode};

/// A single child slot of a [`StructuralNode`]
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralChild {
    /// Literal character data (including CDATA)
    Text(String),
    /// Comment body, without the `<!--` / `-->` delimiters
    Comment(String),
    /// A nested element
    Element(StructuralNode),
}

/// Lossless mirror of an XML element
///
/// Attribute keys are stored lower-cased; a `None` value marks an attribute
/// that should be omitted when the node is written out.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralNode {
    pub tag_name: String,
    pub attributes: Vec<(String, Option<String>)>,
    pub children: Vec<StructuralChild>,
}

impl StructuralNode {
    pub fn new(tag_name: impl Into<String>) -> Self {
        StructuralNode {
            tag_name: tag_name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value by its lower-cased key
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Replace an attribute value in place, or append it
    pub fn set_attribute(&mut self, name: &str, value: Option<String>) {
        let name = name.to_lowercase();
        if let Some(entry) = self.attributes.iter_mut().find(|(key, _)| *key == name) {
            entry.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Iterate over element children only
    pub fn elements(&self) -> impl Iterator<Item = &StructuralNode> {
        self.children.iter().filter_map(|child| match child {
            StructuralChild::Element(node) => Some(node),
            _ => None,
        })
    }
}
