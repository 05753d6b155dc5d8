//! `ColumnChunkPageWriter`: the per-column state machine. Buffers pages as they're written,
//! then orchestrates finalization (fallback check -> dictionary sort -> emit) on flush.

use std::sync::Arc;

use log::{debug, trace, warn};

use crate::allocator::{Allocator, Buffer};
use crate::compression::{create_codec, Codec, Compression};
use crate::dictionary::{DictionaryValueCodec, PlainDictionaryValueCodec};
use crate::encoding::Encoding;
use crate::error::{ParquetCoreError, Result};
use crate::metadata::ColumnDescriptor;
use crate::page::{PageHolder, PageHolderV1, PageHolderV2};
use crate::page_header::{PageHeaderSerializer, ThriftPageHeaderSerializer};
use crate::statistics::{self, Statistics};

use super::dictionary_fallback;
use super::dictionary_sort;
use super::file_writer::{ColumnChunkSummary, ColumnFileWriter};
use super::framer::{ColumnAggregates, PageFramer};

/// The buffered dictionary page for a column, kept until fallback discards it or sort
/// replaces it with a sorted copy.
#[derive(Debug)]
pub struct DictionaryPageHolder {
    body: Buffer,
    num_values: usize,
    encoding: Encoding,
    sorted: bool,
}

impl DictionaryPageHolder {
    pub fn new(body: Vec<u8>, num_values: usize, encoding: Encoding) -> Self {
        Self { body: Buffer(body), num_values, encoding, sorted: false }
    }

    /// Marks this dictionary page as sorted, for the `sorted` flag handed to the file writer.
    pub fn sorted(mut self) -> Self {
        self.sorted = true;
        self
    }

    pub fn body(&self) -> &[u8] {
        self.body.as_slice()
    }

    pub fn uncompressed_size(&self) -> usize {
        self.body.as_slice().len()
    }

    pub fn num_values(&self) -> usize {
        self.num_values
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }
}

/// Per-column page buffer and finalization state machine. One instance per
/// [`ColumnDescriptor`] in a [`super::PageWriteStore`]; created once, driven by
/// `write_dictionary_page`/`write_page`/`write_page_v2` until `write_to_file_writer` is
/// called, after which it is spent and should be discarded.
pub struct ColumnChunkPageWriter {
    descriptor: ColumnDescriptor,
    allocator: Arc<dyn Allocator>,
    codec: Option<Arc<dyn Codec>>,
    compression: Compression,
    dictionary_value_codec: Arc<dyn DictionaryValueCodec>,
    header_serializer: Arc<dyn PageHeaderSerializer>,

    pages: Vec<PageHolder>,
    dictionary: Option<DictionaryPageHolder>,
    dictionary_encoding_used_for_all_pages: bool,

    total_value_count: i64,
    merged_statistics: Option<Arc<dyn Statistics>>,
}

impl ColumnChunkPageWriter {
    pub fn new(descriptor: ColumnDescriptor, compression: Compression, allocator: Arc<dyn Allocator>) -> Result<Self> {
        Ok(Self {
            descriptor,
            allocator,
            codec: create_codec(compression)?.map(Arc::from),
            compression,
            dictionary_value_codec: Arc::new(PlainDictionaryValueCodec),
            header_serializer: Arc::new(ThriftPageHeaderSerializer),
            pages: Vec::new(),
            dictionary: None,
            dictionary_encoding_used_for_all_pages: true,
            total_value_count: 0,
            merged_statistics: None,
        })
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    fn column(&self) -> String {
        self.descriptor.path_string()
    }

    /// Accepts the column's (at most one) dictionary page. `data` is copied into a fresh
    /// allocator-owned buffer; compression is deferred to emit time.
    pub fn write_dictionary_page(&mut self, data: &[u8], num_values: usize, encoding: Encoding) -> Result<()> {
        if self.dictionary.is_some() {
            return Err(ParquetCoreError::DuplicateDictionary { column: self.column() });
        }
        let mut buffer = self.allocator.allocate(data.len());
        buffer.0.copy_from_slice(data);
        trace!(target: "parquet_column_writer", "column {:?}: buffered dictionary page ({} values)", self.column(), num_values);
        self.dictionary = Some(DictionaryPageHolder::new(buffer.into_vec(), num_values, encoding));
        Ok(())
    }

    /// Buffers a v1 data page. If `values_encoding` uses a dictionary, the body is stored
    /// uncompressed (deferred); otherwise it is compressed immediately.
    #[allow(clippy::too_many_arguments)]
    pub fn write_page(
        &mut self,
        data: Vec<u8>,
        uncompressed_size: usize,
        value_count: i64,
        statistics: Option<Arc<dyn Statistics>>,
        rl_encoding: Encoding,
        dl_encoding: Encoding,
        values_encoding: Encoding,
    ) -> Result<()> {
        self.total_value_count += value_count;
        self.merged_statistics = statistics::reduce(&[self.merged_statistics.take(), statistics.clone()])?;
        self.dictionary_encoding_used_for_all_pages &= values_encoding.uses_dictionary();

        let mut page = PageHolderV1::new(
            data,
            uncompressed_size,
            value_count,
            statistics,
            rl_encoding,
            dl_encoding,
            values_encoding,
        );
        if !values_encoding.uses_dictionary() {
            if let Some(codec) = &self.codec {
                page.compress_if_needed(codec.as_ref())?;
            }
        }
        trace!(target: "parquet_column_writer", "column {:?}: buffered v1 page ({} values, {:?})", self.column(), value_count, values_encoding);
        self.pages.push(PageHolder::V1(page));
        Ok(())
    }

    /// Buffers a v2 data page. Repetition/definition-level bytes are always stored
    /// uncompressed; only the values body is eligible for (deferred) compression.
    #[allow(clippy::too_many_arguments)]
    pub fn write_page_v2(
        &mut self,
        row_count: i64,
        null_count: i64,
        value_count: i64,
        rl_bytes: Vec<u8>,
        dl_bytes: Vec<u8>,
        values_encoding: Encoding,
        data: Vec<u8>,
        uncompressed_values_size: usize,
        statistics: Option<Arc<dyn Statistics>>,
    ) -> Result<()> {
        self.total_value_count += value_count;
        self.merged_statistics = statistics::reduce(&[self.merged_statistics.take(), statistics.clone()])?;
        self.dictionary_encoding_used_for_all_pages &= values_encoding.uses_dictionary();

        let mut page = PageHolderV2::new(
            rl_bytes,
            dl_bytes,
            data,
            uncompressed_values_size,
            row_count,
            null_count,
            value_count,
            statistics,
            values_encoding,
        );
        if !values_encoding.uses_dictionary() {
            if let Some(codec) = &self.codec {
                page.compress_if_needed(codec.as_ref())?;
            }
        }
        trace!(target: "parquet_column_writer", "column {:?}: buffered v2 page ({} values, {:?})", self.column(), value_count, values_encoding);
        self.pages.push(PageHolder::V2(page));
        Ok(())
    }

    /// Runs the strict finalize phase order (fallback check -> dictionary sort -> emit)
    /// against `file_writer`, then releases every owned buffer and clears running state.
    /// Errors leave the writer poisoned; callers must not reuse it.
    pub fn write_to_file_writer(&mut self, file_writer: &mut dyn ColumnFileWriter) -> Result<()> {
        if self.dictionary.is_some() && !self.dictionary_encoding_used_for_all_pages {
            debug!(
                target: "parquet_column_writer",
                "column {:?}: dictionary fallback triggered, rewriting {} pages",
                self.column(),
                self.pages.len(),
            );
            let dict = self.dictionary.take().expect("checked Some above");
            dictionary_fallback::apply(&self.descriptor, &dict, &mut self.pages, self.dictionary_value_codec.as_ref())?;
            self.allocator.release(dict.body);
        }

        if let Some(dict) = self.dictionary.take() {
            debug!(target: "parquet_column_writer", "column {:?}: sorting dictionary ({} entries)", self.column(), dict.num_values());
            let sorted = dictionary_sort::apply(&self.descriptor, dict, &mut self.pages, self.dictionary_value_codec.as_ref())?;
            self.dictionary = Some(sorted);
        }

        self.emit(file_writer)?;

        self.pages.clear();
        self.dictionary = None;
        self.total_value_count = 0;
        self.merged_statistics = None;
        self.dictionary_encoding_used_for_all_pages = true;
        Ok(())
    }

    fn emit(&mut self, file_writer: &mut dyn ColumnFileWriter) -> Result<()> {
        let column = self.column();
        let serializer = self.header_serializer.clone();
        let framer = PageFramer::new(serializer.as_ref(), &column);
        let mut aggregates = ColumnAggregates::new();

        file_writer.start_column(&self.descriptor, self.total_value_count, self.compression)?;

        if let Some(dict) = &self.dictionary {
            let compressed_body = match &self.codec {
                Some(codec) => codec.compress(dict.body())?,
                None => dict.body().to_vec(),
            };
            let framed = framer
                .frame_dictionary(dict.uncompressed_size(), &compressed_body, dict.num_values(), dict.encoding(), dict.is_sorted())
                .map_err(|e| log_if_too_large(&column, e))?;
            file_writer.write_dictionary_page(&framed, dict.num_values(), dict.encoding(), dict.is_sorted())?;
            aggregates.data_encodings.push(dict.encoding());
        }

        let mut page_offset = file_writer.pos()?;
        let mut output = Vec::new();
        for page in self.pages.iter_mut() {
            if let Some(codec) = &self.codec {
                page.compress_if_needed(codec.as_ref())?;
            }
            let framed = framer
                .frame_page(page, page_offset, &mut aggregates)
                .map_err(|e| log_if_too_large(&column, e))?;
            page_offset += framed.len() as u64;
            output.extend_from_slice(&framed);
        }

        let summary = ColumnChunkSummary {
            uncompressed_length: aggregates.uncompressed_length,
            compressed_length: aggregates.compressed_length,
            total_statistics: self.merged_statistics.clone(),
            rl_encodings: aggregates.rl_encodings,
            dl_encodings: aggregates.dl_encodings,
            data_encodings: aggregates.data_encodings,
            page_headers: aggregates.page_headers,
        };
        file_writer.write_data_pages(&output, summary)?;
        file_writer.end_column()?;

        for page in self.pages.drain(..) {
            match page {
                PageHolder::V1(p) => self.allocator.release(p.into_body()),
                PageHolder::V2(p) => {
                    let (rl, dl, values) = p.into_bodies();
                    self.allocator.release(rl);
                    self.allocator.release(dl);
                    self.allocator.release(values);
                }
            }
        }
        if let Some(dict) = self.dictionary.take() {
            self.allocator.release(dict.body);
        }
        Ok(())
    }
}

fn log_if_too_large(column: &str, err: ParquetCoreError) -> ParquetCoreError {
    if let ParquetCoreError::PageTooLarge { size, .. } = &err {
        warn!(target: "parquet_column_writer", "column {:?}: page rejected, {} bytes exceeds i32::MAX", column, size);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::HeapAllocator;
    use crate::schema::types::PhysicalType;
    use crate::write::file_writer::InMemoryColumnFileWriter;

    fn descriptor() -> ColumnDescriptor {
        ColumnDescriptor::new(PhysicalType::Int32, 0, 0, vec!["c".to_string()])
    }

    #[test]
    fn duplicate_dictionary_page_fails() {
        let mut writer = ColumnChunkPageWriter::new(descriptor(), Compression::Uncompressed, Arc::new(HeapAllocator)).unwrap();
        writer.write_dictionary_page(&[1, 2, 3, 4], 1, Encoding::Plain).unwrap();
        let err = writer.write_dictionary_page(&[5, 6, 7, 8], 1, Encoding::Plain).unwrap_err();
        assert!(matches!(err, ParquetCoreError::DuplicateDictionary { .. }));
    }

    #[test]
    fn zero_pages_no_dictionary_brackets_empty_body() {
        let mut writer = ColumnChunkPageWriter::new(descriptor(), Compression::Uncompressed, Arc::new(HeapAllocator)).unwrap();
        let mut file_writer = InMemoryColumnFileWriter::new(Vec::new());
        writer.write_to_file_writer(&mut file_writer).unwrap();

        assert_eq!(file_writer.columns.len(), 1);
        let chunk = &file_writer.columns[0];
        assert!(chunk.dictionary_page_offset.is_none());
        assert_eq!(chunk.summary.as_ref().unwrap().uncompressed_length, 0);
    }

    #[test]
    fn dictionary_with_zero_data_pages_is_still_emitted() {
        let mut writer = ColumnChunkPageWriter::new(descriptor(), Compression::Uncompressed, Arc::new(HeapAllocator)).unwrap();
        writer.write_dictionary_page(&42i32.to_le_bytes(), 1, Encoding::Plain).unwrap();
        let mut file_writer = InMemoryColumnFileWriter::new(Vec::new());
        writer.write_to_file_writer(&mut file_writer).unwrap();

        let chunk = &file_writer.columns[0];
        assert!(chunk.dictionary_page_offset.is_some());
    }
}
