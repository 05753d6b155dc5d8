#![forbid(unsafe_code)]
//! Per-column page buffering and finalization engine for Parquet column chunks: dictionary
//! speculative encoding with fallback, dictionary sorting with index remapping, and
//! binary-exact page v1/v2 framing.

pub mod error;
pub mod allocator;
pub mod compression;
pub mod dictionary;
pub mod encoding;
pub mod metadata;
pub mod page;
pub mod page_header;
pub mod properties;
mod rle;
pub mod schema;
pub mod statistics;
pub mod types;
pub mod write;
