//! Simplified tree projection
//!
//! [`SimplifiedNode`] restates a [`StructuralNode`] under three assumptions
//! the whole accessor library relies on:
//!
//! 1. comments carry no semantic information and are dropped;
//! 2. a node has either text content or element children, never
//!    meaningfully both;
//! 3. ordering between children of different tag names does not matter,
//!    only ordering within a same-tag group.
//!
//! These are projections, not edits: the structural original stays around
//! (as provenance) and the dropped information is recovered by
//! [`super::graft`] on rebuild.

use super::{StructuralChild, StructuralNode};

/// Content of a [`SimplifiedNode`]: trimmed text, or element children
/// grouped by tag name
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Children(Vec<(String, Vec<SimplifiedNode>)>),
}

/// Pattern-matching-friendly projection of an element
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifiedNode {
    pub tag_name: String,
    pub attributes: Vec<(String, Option<String>)>,
    pub content: Content,
}

impl SimplifiedNode {
    /// A node with no attributes and no children
    pub fn empty(tag_name: impl Into<String>) -> Self {
        SimplifiedNode {
            tag_name: tag_name.into(),
            attributes: Vec::new(),
            content: Content::Children(Vec::new()),
        }
    }

    /// Look up an attribute by exact key, falling back to the lower-cased key
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let exact = self
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref());
        if exact.is_some() {
            return exact;
        }
        let lower = name.to_lowercase();
        self.attributes
            .iter()
            .find(|(key, _)| *key == lower)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Replace an attribute entry in place, or append it
    ///
    /// A `None` value keeps the key but marks it as cleared: the writer
    /// omits it, and a later merge may still override it.
    pub fn set_attribute(&mut self, name: &str, value: Option<String>) {
        if let Some(entry) = self.attributes.iter_mut().find(|(key, _)| key == name) {
            entry.1 = value;
        } else {
            self.attributes.push((name.to_string(), value));
        }
    }

    /// The same-tag child group for `tag` (exact match)
    pub fn group(&self, tag: &str) -> Option<&[SimplifiedNode]> {
        match &self.content {
            Content::Children(groups) => groups
                .iter()
                .find(|(name, _)| name == tag)
                .map(|(_, nodes)| nodes.as_slice()),
            Content::Text(_) => None,
        }
    }

    /// Group lookup with a case-insensitive fallback
    pub fn group_ci(&self, tag: &str) -> Option<&[SimplifiedNode]> {
        if let Some(nodes) = self.group(tag) {
            return Some(nodes);
        }
        match &self.content {
            Content::Children(groups) => groups
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(tag))
                .map(|(_, nodes)| nodes.as_slice()),
            Content::Text(_) => None,
        }
    }

    /// Replace a whole group in place, or append it
    pub fn set_group(&mut self, tag: &str, nodes: Vec<SimplifiedNode>) {
        match &mut self.content {
            Content::Children(groups) => {
                if let Some(entry) = groups.iter_mut().find(|(name, _)| name == tag) {
                    entry.1 = nodes;
                } else {
                    groups.push((tag.to_string(), nodes));
                }
            }
            Content::Text(_) => {
                self.content = Content::Children(vec![(tag.to_string(), nodes)]);
            }
        }
    }

    /// Extend a group, creating it if absent
    pub fn extend_group(&mut self, tag: &str, nodes: Vec<SimplifiedNode>) {
        match &mut self.content {
            Content::Children(groups) => {
                if let Some(entry) = groups.iter_mut().find(|(name, _)| name == tag) {
                    entry.1.extend(nodes);
                } else {
                    groups.push((tag.to_string(), nodes));
                }
            }
            Content::Text(_) => {
                self.content = Content::Children(vec![(tag.to_string(), nodes)]);
            }
        }
    }

    /// Text content, if this node holds text
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Children(_) => None,
        }
    }
}

/// Project a structural node into its simplified form
pub fn simplify(node: &StructuralNode) -> SimplifiedNode {
    let has_elements = node
        .children
        .iter()
        .any(|child| matches!(child, StructuralChild::Element(_)));

    let content = if has_elements {
        let mut groups: Vec<(String, Vec<SimplifiedNode>)> = Vec::new();
        for child in &node.children {
            if let StructuralChild::Element(element) = child {
                let simplified = simplify(element);
                if let Some(entry) = groups
                    .iter_mut()
                    .find(|(tag, _)| *tag == element.tag_name)
                {
                    entry.1.push(simplified);
                } else {
                    groups.push((element.tag_name.clone(), vec![simplified]));
                }
            }
        }
        Content::Children(groups)
    } else {
        let joined: String = node
            .children
            .iter()
            .filter_map(|child| match child {
                StructuralChild::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            // Blank text is formatting, not content
            Content::Children(Vec::new())
        } else {
            Content::Text(trimmed.to_string())
        }
    };

    SimplifiedNode {
        tag_name: node.tag_name.clone(),
        attributes: node.attributes.clone(),
        content,
    }
}
