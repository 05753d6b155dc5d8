//! The `ColumnFileWriter` collaborator: the downstream sink a column chunk is written to, and
//! an in-memory reference implementation used by this crate's own tests.
//!
//! Row-group and file-level assembly (magic bytes, footer, multiple row groups) sit above
//! this trait and are out of scope; see the crate's Non-goals.

use std::collections::HashSet;
use std::io;
use std::sync::Arc;

use crate::compression::Compression;
use crate::encoding::Encoding;
use crate::metadata::ColumnDescriptor;
use crate::statistics::Statistics;

/// Which page-format variant (or the dictionary page) a [`PageHeaderWithOffset`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Dictionary,
    DataV1,
    DataV2,
}

/// The on-disk position of one page's body, paired with enough of its header to be useful to
/// a caller building column/offset indexes (out of scope here, but this is the seam such a
/// feature would hook into).
#[derive(Debug, Clone)]
pub struct PageHeaderWithOffset {
    pub kind: PageKind,
    pub value_count: i64,
    /// Absolute byte offset, within the file, at which this page's body begins.
    pub offset: u64,
}

/// Column-level aggregates handed to [`ColumnFileWriter::write_data_pages`] alongside the
/// concatenated page bytes.
#[derive(Debug, Clone)]
pub struct ColumnChunkSummary {
    pub uncompressed_length: u64,
    pub compressed_length: u64,
    pub total_statistics: Option<Arc<dyn Statistics>>,
    pub rl_encodings: HashSet<Encoding>,
    pub dl_encodings: HashSet<Encoding>,
    /// Ordered, not deduplicated: includes the dictionary page's own encoding (if one was
    /// emitted) ahead of every data page's values-encoding, in submission order. See the
    /// spec's Open Question on this — column-metadata consumers may rely on the exact shape.
    pub data_encodings: Vec<Encoding>,
    pub page_headers: Vec<PageHeaderWithOffset>,
}

/// The downstream file-writer collaborator a [`crate::write::ColumnChunkPageWriter`] drives
/// during finalization. Synchronous, fallible with [`io::Error`].
pub trait ColumnFileWriter {
    /// Current absolute byte position in the output.
    fn pos(&mut self) -> io::Result<u64>;

    /// Begins a new column chunk.
    fn start_column(
        &mut self,
        descriptor: &ColumnDescriptor,
        total_value_count: i64,
        codec: Compression,
    ) -> io::Result<()>;

    /// Writes an already-framed (header + body) dictionary page.
    fn write_dictionary_page(
        &mut self,
        page_bytes: &[u8],
        num_values: usize,
        encoding: Encoding,
        sorted: bool,
    ) -> io::Result<()>;

    /// Writes the concatenated (header + body, per page) bytes of every data page, alongside
    /// the column aggregates describing them.
    fn write_data_pages(&mut self, concatenated: &[u8], summary: ColumnChunkSummary) -> io::Result<()>;

    /// Ends the current column chunk.
    fn end_column(&mut self) -> io::Result<()>;
}

/// One column chunk as recorded by [`InMemoryColumnFileWriter`], for test assertions.
#[derive(Debug, Clone)]
pub struct WrittenColumnChunk {
    pub path: String,
    pub total_value_count: i64,
    pub codec: Compression,
    pub dictionary_page_offset: Option<u64>,
    pub dictionary_num_values: Option<usize>,
    pub dictionary_encoding: Option<Encoding>,
    pub dictionary_sorted: Option<bool>,
    pub data_page_offset: u64,
    pub summary: Option<ColumnChunkSummary>,
}

/// A `std::io::Write`-backed [`ColumnFileWriter`] scoped to one column chunk at a time,
/// tracking absolute position and recording each chunk's layout for test assertions. Mirrors
/// the teacher's `FileWriter` in spirit (position tracking, sequential column writes) but
/// without row-group/file-level framing, which is out of scope here.
#[derive(Debug)]
pub struct InMemoryColumnFileWriter<W> {
    writer: W,
    pos: u64,
    pub columns: Vec<WrittenColumnChunk>,
    current: Option<WrittenColumnChunk>,
}

impl<W: io::Write> InMemoryColumnFileWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pos: 0, columns: Vec::new(), current: None }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> ColumnFileWriter for InMemoryColumnFileWriter<W> {
    fn pos(&mut self) -> io::Result<u64> {
        Ok(self.pos)
    }

    fn start_column(
        &mut self,
        descriptor: &ColumnDescriptor,
        total_value_count: i64,
        codec: Compression,
    ) -> io::Result<()> {
        self.current = Some(WrittenColumnChunk {
            path: descriptor.path_string(),
            total_value_count,
            codec,
            dictionary_page_offset: None,
            dictionary_num_values: None,
            dictionary_encoding: None,
            dictionary_sorted: None,
            data_page_offset: 0,
            summary: None,
        });
        Ok(())
    }

    fn write_dictionary_page(
        &mut self,
        page_bytes: &[u8],
        num_values: usize,
        encoding: Encoding,
        sorted: bool,
    ) -> io::Result<()> {
        let offset = self.pos;
        self.writer.write_all(page_bytes)?;
        self.pos += page_bytes.len() as u64;
        if let Some(chunk) = self.current.as_mut() {
            chunk.dictionary_page_offset = Some(offset);
            chunk.dictionary_num_values = Some(num_values);
            chunk.dictionary_encoding = Some(encoding);
            chunk.dictionary_sorted = Some(sorted);
        }
        Ok(())
    }

    fn write_data_pages(&mut self, concatenated: &[u8], summary: ColumnChunkSummary) -> io::Result<()> {
        let offset = self.pos;
        self.writer.write_all(concatenated)?;
        self.pos += concatenated.len() as u64;
        if let Some(chunk) = self.current.as_mut() {
            chunk.data_page_offset = offset;
            chunk.summary = Some(summary);
        }
        Ok(())
    }

    fn end_column(&mut self) -> io::Result<()> {
        if let Some(chunk) = self.current.take() {
            self.columns.push(chunk);
        }
        Ok(())
    }
}
