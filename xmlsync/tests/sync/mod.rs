//! End-to-end engine tests: parse, edit, rebuild.

mod accessors;
mod roundtrip;
mod variants;
