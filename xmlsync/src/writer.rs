//! Canonical document serialization
//!
//! The writer owns all whitespace: indentation, attribute wrapping, and
//! line breaks are regenerated from scratch on every write, which is what
//! makes blank text disposable everywhere else in the crate. Comments and
//! text content pass through escaped but otherwise untouched.

use crate::tree::{StructuralChild, StructuralNode};

/// Formatting knobs for [`write_document`]
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// One level of indentation
    pub indent_string: String,
    /// Open tags wider than this wrap their attributes, aligned under the
    /// first one
    pub attr_wrap_column: usize,
    /// Emit the `<?xml ?>` declaration line
    pub declaration: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            indent_string: "  ".to_string(),
            attr_wrap_column: 80,
            declaration: true,
        }
    }
}

/// Render a structural tree to its canonical textual form
pub fn write_document(root: &StructuralNode, options: &WriteOptions) -> String {
    let mut out = String::new();
    if options.declaration {
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }
    write_element(&mut out, root, 0, options);
    out
}

fn write_element(out: &mut String, node: &StructuralNode, depth: usize, options: &WriteOptions) {
    let indent = options.indent_string.repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&node.tag_name);

    let attrs: Vec<String> = node
        .attributes
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|value| format!("{key}=\"{}\"", escape_attr(value)))
        })
        .collect();

    let single_line_width = indent.len()
        + 1
        + node.tag_name.len()
        + attrs.iter().map(|attr| attr.len() + 1).sum::<usize>()
        + 2;
    if attrs.len() > 1 && single_line_width > options.attr_wrap_column {
        // Continuations align under the first attribute
        let column = indent.len() + 1 + node.tag_name.len() + 1;
        for (index, attr) in attrs.iter().enumerate() {
            if index == 0 {
                out.push(' ');
            } else {
                out.push('\n');
                out.push_str(&" ".repeat(column));
            }
            out.push_str(attr);
        }
    } else {
        for attr in &attrs {
            out.push(' ');
            out.push_str(attr);
        }
    }

    let text_only = node
        .children
        .iter()
        .all(|child| matches!(child, StructuralChild::Text(_)));

    if text_only {
        // Merge adjacent fragments and trim; whitespace-only content
        // collapses to a self-closing tag like an empty element
        let mut merged = String::new();
        for child in &node.children {
            if let StructuralChild::Text(text) = child {
                merged.push_str(text);
            }
        }
        let merged = merged.trim();
        if merged.is_empty() {
            out.push_str("/>\n");
        } else {
            out.push('>');
            out.push_str(&escape_text(merged));
            out.push_str("</");
            out.push_str(&node.tag_name);
            out.push_str(">\n");
        }
    } else {
        out.push_str(">\n");
        for child in &node.children {
            match child {
                StructuralChild::Element(element) => {
                    write_element(out, element, depth + 1, options);
                }
                StructuralChild::Comment(comment) => {
                    out.push_str(&options.indent_string.repeat(depth + 1));
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->\n");
                }
                StructuralChild::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        out.push_str(&options.indent_string.repeat(depth + 1));
                        out.push_str(&escape_text(trimmed));
                        out.push('\n');
                    }
                }
            }
        }
        out.push_str(&indent);
        out.push_str("</");
        out.push_str(&node.tag_name);
        out.push_str(">\n");
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
