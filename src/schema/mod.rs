//! Minimal schema surface: only what the column-chunk writer needs from a column's type.
//!
//! Full nested schema resolution (groups, logical/converted types, thrift (de)serialization
//! of the schema tree) lives upstream of this crate; see the spec's Non-goals.
pub mod types;
