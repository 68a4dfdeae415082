//! Shared fixtures: a form-cell spec in the style the engine is used for.

use once_cell::sync::Lazy;
use std::rc::Rc;
use xmlsync::accessors::{
    attribute, boolean, children, float, integer, map, table, AttrMode,
};
use xmlsync::{
    field, object, parse_document, pipe, ReportLevel, StaticRegistry, StructuralNode, Syncer,
    TableHandle,
};

pub static TABLES: Lazy<Vec<TableHandle>> = Lazy::new(|| {
    vec![
        TableHandle::new("edu.institution.Agent", "Agent"),
        TableHandle::new("edu.institution.Accession", "Accession"),
    ]
});

pub fn registry() -> Rc<StaticRegistry> {
    Rc::new(StaticRegistry::new(TABLES.clone()))
}

/// A field cell: `<cell name=".." min=".." max=".." step=".." readOnly=".."/>`
pub fn cell_spec() -> Box<dyn Syncer> {
    object(vec![
        field("name", attribute("name", AttrMode::Required)),
        field(
            "defaultValue",
            attribute("default", AttrMode::Skip),
        ),
        field(
            "isReadOnly",
            pipe(vec![attribute("readOnly", AttrMode::Skip), boolean()]),
        ),
        field(
            "min",
            pipe(vec![attribute("min", AttrMode::Skip), integer()]),
        ),
        field(
            "max",
            pipe(vec![attribute("max", AttrMode::Skip), integer()]),
        ),
        field(
            "step",
            pipe(vec![attribute("step", AttrMode::Skip), float()]),
        ),
    ])
}

/// A row of cells: `<row><cell/>...</row>`
pub fn row_spec() -> Box<dyn Syncer> {
    object(vec![
        field("label", attribute("label", AttrMode::Skip)),
        field("cells", pipe(vec![children("cell"), map(cell_spec())])),
    ])
}

/// A spec field resolving a table name against the shared registry
pub fn table_field(name: &str, attr: &str) -> (String, Box<dyn Syncer>) {
    field(
        name,
        pipe(vec![
            attribute(attr, AttrMode::Skip),
            table(registry(), ReportLevel::Error),
        ]),
    )
}

pub fn parse(source: &str) -> StructuralNode {
    parse_document(source).expect("fixture documents are well-formed")
}
