//! Host tree conversion
//!
//! The host document tree is `roxmltree`'s read-only DOM. Parsing converts
//! it into an owned [`StructuralNode`] immediately; the host tree is never
//! held onto. The reverse direction goes through [`super::graft`] and the
//! writer, since `roxmltree` documents cannot be constructed or mutated.

use super::{StructuralChild, StructuralNode};
use crate::error::SyncError;
use roxmltree::NodeType;

/// Parse a document strictly; malformed XML is an error
pub fn parse_document(source: &str) -> Result<StructuralNode, SyncError> {
    roxmltree::Document::parse(source)
        .map(|doc| from_host(doc.root_element()))
        .map_err(|e| SyncError::Parse(e.to_string()))
}

/// Parse a document leniently, returning the parser's native message
///
/// Callers that want to surface a malformed document to the user rather
/// than fail (interactive editors, the `check` command) use this entry
/// point and decide themselves whether the message is fatal.
pub fn parse_document_lenient(source: &str) -> Result<StructuralNode, String> {
    roxmltree::Document::parse(source)
        .map(|doc| from_host(doc.root_element()))
        .map_err(|e| e.to_string())
}

/// Recursively copy a host element into a [`StructuralNode`]
///
/// Attribute keys are lower-cased here, once, so every later lookup can
/// rely on it. CDATA sections arrive as plain text children.
pub fn from_host(node: roxmltree::Node) -> StructuralNode {
    let mut out = StructuralNode::new(node.tag_name().name());
    for attr in node.attributes() {
        out.attributes
            .push((attr.name().to_lowercase(), Some(attr.value().to_string())));
    }
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => {
                out.children.push(StructuralChild::Element(from_host(child)));
            }
            NodeType::Text => {
                out.children
                    .push(StructuralChild::Text(child.text().unwrap_or("").to_string()));
            }
            NodeType::Comment => {
                out.children.push(StructuralChild::Comment(
                    child.text().unwrap_or("").to_string(),
                ));
            }
            _ => {}
        }
    }
    out
}
