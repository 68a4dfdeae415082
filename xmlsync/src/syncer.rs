//! The transformation unit primitive and its composer
//!
//! A [`Syncer`] is a bidirectional lens: `serialize` turns a raw value
//! (usually a [`crate::tree::SimplifiedNode`] or a scalar pulled out of
//! one) into a parsed value, and `deserialize` turns an edited parsed
//! value back into a raw one. Forward stages are often lossy (trimming,
//! name resolution, defaulting), so `serialize` also returns a [`Trace`]:
//! an explicit record of the intermediates it consumed. `deserialize`
//! receives that trace and reconstructs from what was actually produced
//! last time rather than recomputing, which is the only way a lossy stage
//! can restore the parts of the raw value it discarded.
//!
//! Traces are plain values handed back to the caller (and stored in shape
//! provenance), so units are stateless and nested or repeated calls cannot
//! interleave through any shared slot.

use crate::context::SyncContext;
use crate::value::Value;

/// Record of the raw intermediates a serialize pass consumed
#[derive(Debug, Clone, PartialEq)]
pub enum Trace {
    /// Nothing retained; deserialize writes canonical forms
    None,
    /// The raw value the unit saw
    Raw(Value),
    /// One trace per stage of a [`pipe`], in forward order
    Chain(Vec<Trace>),
    /// One trace per element of a mapped list
    Items(Vec<Trace>),
    /// The variant a switch resolved, and the literal discriminator it saw
    Variant { canonical: String, literal: String },
}

/// A bidirectional transformation unit
///
/// Implementations are created once (or once per call with arguments) and
/// reused for every parse/build call; they hold configuration, never
/// per-call state.
pub trait Syncer {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace);

    fn deserialize(&self, parsed: Value, trace: &Trace, cx: &mut SyncContext) -> Value;
}

/// Compose units sequentially into one unit
///
/// `serialize` folds forward through the stages, retaining every stage's
/// trace; `deserialize` walks the chain in reverse, handing each stage the
/// trace it produced during the most recent serialize. A stage whose trace
/// is missing (a field the caller added fresh) gets [`Trace::None`] and
/// falls back to canonical output.
pub fn pipe(units: Vec<Box<dyn Syncer>>) -> Box<dyn Syncer> {
    Box::new(Pipe { units })
}

struct Pipe {
    units: Vec<Box<dyn Syncer>>,
}

impl Syncer for Pipe {
    fn serialize(&self, raw: Value, cx: &mut SyncContext) -> (Value, Trace) {
        // Node accessors leave their path segment pushed so later stages
        // report under it; the chain as a whole restores the depth.
        let depth = cx.depth();
        let mut value = raw;
        let mut traces = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            let (next, trace) = unit.serialize(value, cx);
            value = next;
            traces.push(trace);
        }
        cx.truncate(depth);
        (value, Trace::Chain(traces))
    }

    fn deserialize(&self, parsed: Value, trace: &Trace, cx: &mut SyncContext) -> Value {
        let empty = Vec::new();
        let traces = match trace {
            Trace::Chain(traces) => traces,
            _ => &empty,
        };
        let depth = cx.depth();
        let mut value = parsed;
        for (index, unit) in self.units.iter().enumerate().rev() {
            let stage_trace = traces.get(index).unwrap_or(&Trace::None);
            value = unit.deserialize(value, stage_trace, cx);
        }
        cx.truncate(depth);
        value
    }
}
