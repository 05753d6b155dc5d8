//! The per-column page buffering and finalization engine: buffer pages and at most one
//! dictionary page per column, then on flush decide whether to keep or fall back from the
//! dictionary, sort a kept dictionary and remap indices, frame every page to its exact on-disk
//! bytes, and hand the result to a [`ColumnFileWriter`].
//!
//! Row-group/file assembly (magic bytes, footer, multiple row groups) and column/offset index
//! construction sit above this engine and are out of scope; see `file_writer`'s module docs.

mod column_chunk;
mod dictionary_fallback;
mod dictionary_sort;
mod file_writer;
mod framer;
mod store;

pub use column_chunk::{ColumnChunkPageWriter, DictionaryPageHolder};
pub use file_writer::{
    ColumnChunkSummary, ColumnFileWriter, InMemoryColumnFileWriter, PageHeaderWithOffset, PageKind,
    WrittenColumnChunk,
};
pub use store::PageWriteStore;
