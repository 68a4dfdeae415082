//! Error types for document-level operations
//!
//! Unit-level problems (missing attributes, cardinality violations, bad
//! numbers) are never errors: they are collected as diagnostics on the
//! [`crate::context::SyncContext`] so a whole document's problems surface
//! together. Only document-level failures use [`SyncError`].

use std::fmt;

/// Errors that can occur while parsing or rebuilding a document
#[derive(Debug, Clone, PartialEq)]
pub enum SyncError {
    /// The source text is not well-formed XML
    Parse(String),
    /// An edited shape could not be turned back into a document
    Rebuild(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Parse(msg) => write!(f, "Parse error: {msg}"),
            SyncError::Rebuild(msg) => write!(f, "Rebuild error: {msg}"),
        }
    }
}

impl std::error::Error for SyncError {}
