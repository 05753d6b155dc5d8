//! `PageWriteStore`: owns one [`ColumnChunkPageWriter`] per column in a schema and flushes
//! them, strictly sequentially, in schema iteration order.

use std::sync::Arc;

use crate::compression::Compression;
use crate::error::Result;
use crate::metadata::SchemaDescriptor;
use crate::properties::WriterProperties;

use super::column_chunk::ColumnChunkPageWriter;
use super::file_writer::ColumnFileWriter;

/// Container mapping each column descriptor in a flat schema to its own
/// [`ColumnChunkPageWriter`].
pub struct PageWriteStore {
    writers: Vec<ColumnChunkPageWriter>,
}

impl PageWriteStore {
    /// Creates one writer per column in `schema`, all sharing `properties`' allocator and
    /// defaulting to `properties`' compression codec.
    pub fn try_new(schema: &SchemaDescriptor, properties: &WriterProperties) -> Result<Self> {
        Self::try_new_with_compression(schema, properties.compression(), properties)
    }

    /// As [`PageWriteStore::try_new`], but with an explicit compression override (e.g. a
    /// caller applying a per-column codec rather than the properties-wide default).
    pub fn try_new_with_compression(
        schema: &SchemaDescriptor,
        compression: Compression,
        properties: &WriterProperties,
    ) -> Result<Self> {
        let allocator = properties.allocator();
        let writers = schema
            .columns()
            .iter()
            .map(|descriptor| ColumnChunkPageWriter::new(descriptor.clone(), compression, Arc::clone(&allocator)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { writers })
    }

    /// Returns the writer for the column at `index`, or `None` if out of range.
    pub fn get_page_writer(&mut self, index: usize) -> Option<&mut ColumnChunkPageWriter> {
        self.writers.get_mut(index)
    }

    /// The number of column writers this store holds.
    pub fn num_columns(&self) -> usize {
        self.writers.len()
    }

    /// Finalizes every column writer, strictly sequentially (column order = schema order),
    /// against `file_writer`. A mid-flush error leaves later columns unwritten and earlier
    /// writers already finalized; see the crate's error-handling design for why no rollback
    /// is attempted.
    pub fn flush_to_file_writer(&mut self, file_writer: &mut dyn ColumnFileWriter) -> Result<()> {
        for writer in self.writers.iter_mut() {
            writer.write_to_file_writer(file_writer)?;
        }
        Ok(())
    }
}
