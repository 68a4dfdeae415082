//! Traversal context and diagnostics
//!
//! Every serialize/deserialize call threads a [`SyncContext`] explicitly.
//! It carries the current document path (which attribute, which child,
//! which array index) so that any warning or error raised during a unit's
//! work can be attributed to a location, and it collects those diagnostics
//! instead of aborting: the typical caller is an interactive editor that
//! wants every problem in a file at once, against a live view of a
//! possibly-invalid document.
//!
//! The context is a plain value created per operation. There is no ambient
//! state and nothing to clear afterwards; callers read the diagnostics off
//! the context when the call returns.

use crate::value::Shape;
use serde::Serialize;
use std::fmt;

/// One step of the traversal path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PathSegment {
    Root,
    Attribute(String),
    Child(String),
    Children(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Root => write!(f, "$"),
            PathSegment::Attribute(name) => write!(f, "@{name}"),
            PathSegment::Child(tag) => write!(f, "{tag}"),
            PathSegment::Children(tag) => write!(f, "{tag}[]"),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

/// How a call site wants resolution failures reported
///
/// Units that resolve external names (tables, enums, discriminators)
/// default to [`ReportLevel::Error`] but individual call sites may
/// downgrade to a warning or silence the problem entirely. The unit still
/// produces a best-effort value either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Error,
    Warning,
    Silent,
}

/// A localized warning or error collected during parse or rebuild
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub path: Vec<PathSegment>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        let path = self
            .path
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{label}: {} (at {path})", self.message)
    }
}

/// Explicit, stack-scoped traversal state
#[derive(Debug, Default)]
pub struct SyncContext {
    path: Vec<PathSegment>,
    diagnostics: Vec<Diagnostic>,
    siblings: Vec<Shape>,
}

impl SyncContext {
    pub fn new() -> Self {
        SyncContext {
            path: vec![PathSegment::Root],
            diagnostics: Vec::new(),
            siblings: Vec::new(),
        }
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.path.push(segment);
    }

    pub fn pop(&mut self) {
        self.path.pop();
    }

    /// Current path depth, for snapshot/restore around array elements
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Restore the path to a previously recorded depth
    pub fn truncate(&mut self, depth: usize) {
        self.path.truncate(depth);
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.emit(Severity::Error, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.emit(Severity::Warning, message);
    }

    /// Emit at a call-site-configured level; [`ReportLevel::Silent`] drops
    /// the message
    pub fn report(&mut self, level: ReportLevel, message: impl Into<String>) {
        match level {
            ReportLevel::Error => self.error(message),
            ReportLevel::Warning => self.warn(message),
            ReportLevel::Silent => {}
        }
    }

    fn emit(&mut self, severity: Severity, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            message: message.into(),
            path: self.path.clone(),
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    // Sibling shapes for the `dependent` combinator. The object runner
    // pushes the shape being built (or rebuilt) so a dependent field can
    // read the values of fields declared before it.

    pub(crate) fn push_siblings(&mut self, shape: Shape) {
        self.siblings.push(shape);
    }

    pub(crate) fn set_siblings(&mut self, shape: Shape) {
        if let Some(top) = self.siblings.last_mut() {
            *top = shape;
        }
    }

    pub(crate) fn pop_siblings(&mut self) {
        self.siblings.pop();
    }

    pub fn current_siblings(&self) -> Option<&Shape> {
        self.siblings.last()
    }
}
