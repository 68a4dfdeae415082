//! Grafting edits back onto the structural original
//!
//! The simplified projection loses comments, child interleaving across tag
//! groups, and blank text. [`graft`] recovers all of it: it walks the
//! untouched [`StructuralNode`] and consumes the edited
//! [`SimplifiedNode`]'s tag groups positionally, so everything the edit did
//! not touch keeps its original place.
//!
//! Policy for group length mismatches: surplus original elements in a
//! still-present group are dropped (the edit shortened the group), surplus
//! edited elements are synthesized fresh and appended after the original
//! children.

use super::{Content, SimplifiedNode, StructuralChild, StructuralNode};

/// Merge an edited simplified node onto its structural original
pub fn graft(original: &StructuralNode, edited: &SimplifiedNode) -> StructuralNode {
    let tag_name = if edited.tag_name.is_empty() {
        original.tag_name.clone()
    } else {
        edited.tag_name.clone()
    };
    let mut out = StructuralNode::new(tag_name);

    // Surviving attributes keep the original's order; new keys append in
    // edit order. A `None` value drops the attribute.
    for (key, _) in &original.attributes {
        if let Some((_, value)) = edited
            .attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            if let Some(value) = value {
                out.attributes.push((key.clone(), Some(value.clone())));
            }
        }
    }
    for (key, value) in &edited.attributes {
        if original
            .attributes
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            continue;
        }
        if let Some(value) = value {
            out.attributes.push((key.to_lowercase(), Some(value.clone())));
        }
    }

    match &edited.content {
        Content::Text(text) => {
            let mut placed = false;
            for child in &original.children {
                match child {
                    StructuralChild::Comment(comment) => {
                        out.children.push(StructuralChild::Comment(comment.clone()));
                    }
                    StructuralChild::Text(_) if !placed => {
                        out.children.push(StructuralChild::Text(text.clone()));
                        placed = true;
                    }
                    _ => {}
                }
            }
            if !placed {
                out.children.push(StructuralChild::Text(text.clone()));
            }
        }
        Content::Children(groups) => {
            let mut consumed = vec![0usize; groups.len()];
            for child in &original.children {
                match child {
                    StructuralChild::Comment(comment) => {
                        out.children.push(StructuralChild::Comment(comment.clone()));
                    }
                    // Blank text between elements is formatting; the writer
                    // re-indents, so it is not carried over.
                    StructuralChild::Text(_) => {}
                    StructuralChild::Element(orig_child) => {
                        let position = groups
                            .iter()
                            .position(|(tag, _)| tag.eq_ignore_ascii_case(&orig_child.tag_name));
                        if let Some(index) = position {
                            let (_, nodes) = &groups[index];
                            if consumed[index] < nodes.len() {
                                out.children.push(StructuralChild::Element(graft(
                                    orig_child,
                                    &nodes[consumed[index]],
                                )));
                                consumed[index] += 1;
                            }
                            // group shortened: surplus original dropped
                        }
                        // group removed entirely: element dropped
                    }
                }
            }
            for (index, (_, nodes)) in groups.iter().enumerate() {
                for node in &nodes[consumed[index]..] {
                    out.children.push(StructuralChild::Element(synthesize(node)));
                }
            }
        }
    }

    out
}

/// Build a fresh structural node for an edited child with no original
fn synthesize(node: &SimplifiedNode) -> StructuralNode {
    let mut out = StructuralNode::new(&node.tag_name);
    for (key, value) in &node.attributes {
        if let Some(value) = value {
            out.attributes.push((key.to_lowercase(), Some(value.clone())));
        }
    }
    match &node.content {
        Content::Text(text) => {
            out.children.push(StructuralChild::Text(text.clone()));
        }
        Content::Children(groups) => {
            for (_, nodes) in groups {
                for child in nodes {
                    out.children.push(StructuralChild::Element(synthesize(child)));
                }
            }
        }
    }
    out
}
