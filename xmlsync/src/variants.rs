//! Variant dispatch and dependent specs
//!
//! [`switch`] handles elements whose shape depends on a discriminator
//! attribute: it resolves the attribute's literal through an [`AliasTable`]
//! to a canonical variant name, runs that variant's field spec over the
//! node, and surfaces the variant's sub-shape under a payload field next to
//! the discriminator. Rebuild goes the other way, and a rebuild under a
//! *changed* variant deliberately starts from an empty base: leftovers from
//! the old variant must not leak into the new one.
//!
//! [`dependent`] defers spec construction until the sibling fields parsed
//! so far are known, for elements whose later structure depends on an
//! earlier field.

use crate::accessors::disjunction;
use crate::context::{PathSegment, ReportLevel, SyncContext};
use crate::object::{object, SyncSpec};
use crate::syncer::{Syncer, Trace};
use crate::value::{Provenance, Shape, Value};

/// Ordered literal-to-canonical mapping for discriminator values
///
/// Lookups are case-insensitive and total: an unmapped literal resolves to
/// `None`, never a panic. The first alias listed for a canonical name is
/// its preferred spelling when one has to be invented on rebuild.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    pairs: Vec<(String, String)>,
}

impl AliasTable {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        AliasTable {
            pairs: pairs
                .iter()
                .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
                .collect(),
        }
    }

    pub fn canonical_for(&self, literal: &str) -> Option<&str> {
        self.canonical_for_exact(literal).or_else(|| {
            self.pairs
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(literal))
                .map(|(_, canonical)| canonical.as_str())
        })
    }

    /// Case-sensitive alias lookup
    pub fn canonical_for_exact(&self, literal: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(alias, _)| alias == literal)
            .map(|(_, canonical)| canonical.as_str())
    }

    pub fn default_alias(&self, canonical: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(_, c)| c.eq_ignore_ascii_case(canonical))
            .map(|(alias, _)| alias.as_str())
    }

    pub fn aliases(&self) -> Vec<String> {
        self.pairs.iter().map(|(alias, _)| alias.clone()).collect()
    }
}

/// Dispatch on a discriminator attribute
///
/// The resolved variant's sub-shape lands under the `payload` field, with
/// the discriminator literal alongside it. `variants` pairs canonical names
/// with the field spec to run for them; `fallback` names the variant used
/// when the discriminator does not resolve (the raw literal is kept, so an
/// unrecognized document round-trips unchanged).
pub fn switch(
    discriminator: &str,
    payload: &str,
    table: AliasTable,
    variants: Vec<(String, SyncSpec)>,
    fallback: &str,
    level: ReportLevel,
) -> Box<dyn Syncer> {
    Box::new(SwitchSyncer {
        discriminator: discriminator.to_string(),
        payload: payload.to_string(),
        table,
        variants: variants
            .into_iter()
            .map(|(name, spec)| (name, object(spec)))
            .collect(),
        fallback: fallback.to_string(),
        level,
    })
}

struct SwitchSyncer {
    discriminator: String,
    payload: String,
    table: AliasTable,
    variants: Vec<(String, Box<dyn Syncer>)>,
    fallback: String,
    level: ReportLevel,
}

impl SwitchSyncer {
    fn variant(&self, name: &str) -> Option<&dyn Syncer> {
        self.variants
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, unit)| unit.as_ref())
    }

    fn report_unknown(&self, literal: &str, cx: &mut SyncContext) {
        let depth = cx.depth();
        cx.push(PathSegment::Attribute(self.discriminator.clone()));
        cx.report(
            self.level,
            format!(
                "Unknown value \"{literal}\". Expected one of {}",
                disjunction(&self.table.aliases())
            ),
        );
        cx.truncate(depth);
    }
}

impl Syncer for SwitchSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        let node = match &raw {
            Value::Node(node) => node,
            Value::Absent => return (Value::Absent, Trace::None),
            _ => {
                cx.error(format!("Expected an element, got {raw:?}"));
                return (Value::Absent, Trace::None);
            }
        };

        let literal = node
            .attribute(&self.discriminator)
            .unwrap_or("")
            .trim()
            .to_string();
        let resolved = self
            .table
            .canonical_for(&literal)
            .filter(|canonical| self.variant(canonical).is_some())
            .map(str::to_string);
        let (variant_name, field_value) = match resolved {
            Some(canonical) => (canonical.clone(), canonical),
            None => {
                self.report_unknown(&literal, cx);
                // Fall back, keeping the raw literal visible to the caller
                (self.fallback.clone(), literal.clone())
            }
        };

        let unit = match self.variant(&variant_name) {
            Some(unit) => unit,
            None => {
                cx.error(format!("No variant named \"{variant_name}\""));
                return (Value::Absent, Trace::None);
            }
        };
        let (parsed, _) = unit.serialize(Value::Node(node.clone()), cx);
        match parsed {
            Value::Shape(sub) => {
                let mut shape = Shape::new();
                shape.set(&self.discriminator, Value::Str(field_value));
                shape.set(&self.payload, Value::Shape(sub));
                shape.provenance = Some(Provenance {
                    node: node.clone(),
                    entries: vec![(
                        self.discriminator.clone(),
                        Trace::Variant {
                            canonical: variant_name,
                            literal,
                        },
                    )],
                });
                (Value::Shape(shape), Trace::None)
            }
            other => (other, Trace::None),
        }
    }

    fn deserialize(&self, parsed: Value, _trace: &Trace, cx: &mut SyncContext) -> Value {
        let shape = match &parsed {
            Value::Shape(shape) => shape,
            Value::Absent => return Value::Absent,
            _ => {
                cx.error(format!("Expected a shape, got {parsed:?}"));
                return Value::Absent;
            }
        };

        let caller = shape
            .get(&self.discriminator)
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string();
        let recorded = shape
            .provenance
            .as_ref()
            .and_then(|provenance| provenance.entry(&self.discriminator))
            .and_then(|trace| match trace {
                Trace::Variant { canonical, literal } => {
                    Some((canonical.clone(), literal.clone()))
                }
                _ => None,
            });

        // Resolve the caller's value to a variant and the literal to write:
        // an alias keeps the caller's spelling, a canonical name gets its
        // preferred alias, anything else falls back with the raw literal.
        // Exact alias spellings win over canonical names, which win over
        // loose-case alias matches.
        let exact_alias = self
            .table
            .canonical_for_exact(&caller)
            .filter(|canonical| self.variant(canonical).is_some());
        let (target, mut literal_out) = if let Some(canonical) = exact_alias {
            (canonical.to_string(), caller.clone())
        } else if let Some((name, _)) = self
            .variants
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&caller))
        {
            let alias = self
                .table
                .default_alias(name)
                .map(str::to_string)
                .unwrap_or_else(|| caller.clone());
            (name.clone(), alias)
        } else if let Some(canonical) = self
            .table
            .canonical_for(&caller)
            .filter(|canonical| self.variant(canonical).is_some())
        {
            (canonical.to_string(), caller.clone())
        } else {
            self.report_unknown(&caller, cx);
            (self.fallback.clone(), caller.clone())
        };

        // Untouched discriminator: restore the document's exact spelling
        if let Some((canonical, literal)) = &recorded {
            if caller == *canonical || caller == *literal {
                literal_out = literal.clone();
            }
        }

        let changed = recorded
            .as_ref()
            .map(|(canonical, _)| !canonical.eq_ignore_ascii_case(&target))
            .unwrap_or(false);

        let mut body = shape
            .get(&self.payload)
            .and_then(Value::as_shape)
            .cloned()
            .unwrap_or_else(Shape::new);
        if changed {
            // Clean switch: nothing from the old variant survives
            body.provenance = None;
        }

        let unit = match self.variant(&target) {
            Some(unit) => unit,
            None => {
                cx.error(format!("No variant named \"{target}\""));
                return parsed;
            }
        };
        match unit.deserialize(Value::Shape(body), &Trace::None, cx) {
            Value::Node(mut node) => {
                node.set_attribute(&self.discriminator.to_lowercase(), Some(literal_out));
                Value::Node(node)
            }
            other => other,
        }
    }
}

/// Build the field spec from the sibling fields parsed so far
///
/// Useful when one field's structure depends on another (a value element
/// whose parsing depends on the declared type, say). Outside an enclosing
/// [`object`] there are no siblings and the builder sees an empty shape.
pub fn dependent(build: impl Fn(&Shape) -> SyncSpec + 'static) -> Box<dyn Syncer> {
    Box::new(DependentSyncer {
        build: Box::new(build),
    })
}

struct DependentSyncer {
    build: Box<dyn Fn(&Shape) -> SyncSpec>,
}

impl Syncer for DependentSyncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        let siblings = cx.current_siblings().cloned().unwrap_or_default();
        let unit = object((self.build)(&siblings));
        unit.serialize(raw, cx)
    }

    fn deserialize(&self, parsed: Value, trace: &Trace, cx: &mut SyncContext) -> Value {
        let siblings = cx.current_siblings().cloned().unwrap_or_default();
        let unit = object((self.build)(&siblings));
        unit.deserialize(parsed, trace, cx)
    }
}
