//! Schema registry collaborator interface
//!
//! Several accessor units resolve external qualified names (tables,
//! fields) against the application's data-model registry. That registry is
//! outside this crate; units see it only through [`SchemaRegistry`].
//! [`StaticRegistry`] is a simple in-memory implementation used by tests
//! and small tools.

use crate::value::TableHandle;

/// Resolves external qualified names to registry entries
pub trait SchemaRegistry {
    fn resolve(&self, qualified_name: &str) -> Option<TableHandle>;
}

/// Fixed in-memory registry
#[derive(Debug, Default)]
pub struct StaticRegistry {
    tables: Vec<TableHandle>,
}

impl StaticRegistry {
    pub fn new(tables: Vec<TableHandle>) -> Self {
        StaticRegistry { tables }
    }

    pub fn register(&mut self, table: TableHandle) {
        self.tables.push(table);
    }
}

impl SchemaRegistry for StaticRegistry {
    fn resolve(&self, qualified_name: &str) -> Option<TableHandle> {
        self.tables
            .iter()
            .find(|table| table.qualified_name.eq_ignore_ascii_case(qualified_name))
            .cloned()
    }
}
