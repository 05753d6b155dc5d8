//! `PageFramer`: turns a buffered [`PageHolder`] into on-disk bytes (serialized header +
//! body) and accumulates the column-level aggregates the emit pipeline hands to the file
//! writer.

use std::collections::HashSet;

use crate::encoding::Encoding;
use crate::error::Result;
use crate::page::{PageHolder, PageHolderV1, PageHolderV2};
use crate::page_header::{DataPageHeaderV1Spec, DataPageHeaderV2Spec, DictionaryPageHeaderSpec, PageHeaderSerializer};

use super::file_writer::{PageHeaderWithOffset, PageKind};

/// Running totals built up as the emit pipeline frames each buffered page in turn. Becomes
/// (most of) the [`super::file_writer::ColumnChunkSummary`] handed to the file writer.
#[derive(Debug, Default)]
pub struct ColumnAggregates {
    pub uncompressed_length: u64,
    pub compressed_length: u64,
    pub rl_encodings: HashSet<Encoding>,
    pub dl_encodings: HashSet<Encoding>,
    pub data_encodings: Vec<Encoding>,
    pub page_headers: Vec<PageHeaderWithOffset>,
}

impl ColumnAggregates {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Frames pages for one column, driven by an injected [`PageHeaderSerializer`].
pub struct PageFramer<'a> {
    serializer: &'a dyn PageHeaderSerializer,
    column: &'a str,
}

impl<'a> PageFramer<'a> {
    pub fn new(serializer: &'a dyn PageHeaderSerializer, column: &'a str) -> Self {
        Self { serializer, column }
    }

    /// Serializes a dictionary page's header and concatenates it with the already-compressed
    /// body, ready to hand to [`super::file_writer::ColumnFileWriter::write_dictionary_page`].
    /// Does not touch [`ColumnAggregates`]; the dictionary's own encoding is recorded by the
    /// emit pipeline directly into `data_encodings`.
    pub fn frame_dictionary(
        &self,
        uncompressed_size: usize,
        compressed_body: &[u8],
        num_values: usize,
        encoding: Encoding,
        sorted: bool,
    ) -> Result<Vec<u8>> {
        let spec = DictionaryPageHeaderSpec {
            uncompressed_size,
            compressed_size: compressed_body.len(),
            num_values,
            encoding,
            is_sorted: sorted,
        };
        let mut out = Vec::new();
        self.serializer.write_dictionary_header(&mut out, self.column, &spec)?;
        out.extend_from_slice(compressed_body);
        Ok(out)
    }

    /// Frames one buffered data page (either variant), returning the concatenated
    /// header-then-body bytes to append to the emit pipeline's output buffer. `page_offset`
    /// is the absolute file position the page's header will be written at.
    pub fn frame_page(
        &self,
        page: &PageHolder,
        page_offset: u64,
        aggregates: &mut ColumnAggregates,
    ) -> Result<Vec<u8>> {
        match page {
            PageHolder::V1(p) => self.frame_v1(p, page_offset, aggregates),
            PageHolder::V2(p) => self.frame_v2(p, page_offset, aggregates),
        }
    }

    fn frame_v1(
        &self,
        page: &PageHolderV1,
        page_offset: u64,
        aggregates: &mut ColumnAggregates,
    ) -> Result<Vec<u8>> {
        let spec = DataPageHeaderV1Spec {
            uncompressed_size: page.uncompressed_size(),
            compressed_size: page.compressed_size(),
            value_count: page.value_count(),
            statistics: page.statistics().cloned(),
            rl_encoding: page.rl_encoding(),
            dl_encoding: page.dl_encoding(),
            values_encoding: page.values_encoding(),
        };
        let mut out = Vec::new();
        let header_len = self.serializer.write_v1_header(&mut out, self.column, &spec)?;

        aggregates.uncompressed_length += page.uncompressed_size() as u64;
        aggregates.compressed_length += page.compressed_size() as u64;
        aggregates.rl_encodings.insert(page.rl_encoding());
        aggregates.dl_encodings.insert(page.dl_encoding());
        aggregates.data_encodings.push(page.values_encoding());
        aggregates.page_headers.push(PageHeaderWithOffset {
            kind: PageKind::DataV1,
            value_count: page.value_count(),
            offset: page_offset + header_len,
        });

        out.extend_from_slice(page.body());
        Ok(out)
    }

    fn frame_v2(
        &self,
        page: &PageHolderV2,
        page_offset: u64,
        aggregates: &mut ColumnAggregates,
    ) -> Result<Vec<u8>> {
        let rl_len = page.rl_bytes().len();
        let dl_len = page.dl_bytes().len();
        let uncompressed_size = rl_len + dl_len + page.uncompressed_values_size();
        let compressed_size = rl_len + dl_len + page.values_compressed_size();

        let spec = DataPageHeaderV2Spec {
            uncompressed_size,
            compressed_size,
            value_count: page.value_count(),
            null_count: page.null_count(),
            row_count: page.row_count(),
            statistics: page.statistics().cloned(),
            values_encoding: page.values_encoding(),
            rl_byte_length: rl_len as i32,
            dl_byte_length: dl_len as i32,
            is_compressed: page.compressed(),
        };
        let mut out = Vec::new();
        let header_len = self.serializer.write_v2_header(&mut out, self.column, &spec)?;

        aggregates.uncompressed_length += uncompressed_size as u64;
        aggregates.compressed_length += compressed_size as u64;
        aggregates.data_encodings.push(page.values_encoding());
        aggregates.page_headers.push(PageHeaderWithOffset {
            kind: PageKind::DataV2,
            value_count: page.value_count(),
            offset: page_offset + header_len,
        });

        out.extend_from_slice(page.rl_bytes());
        out.extend_from_slice(page.dl_bytes());
        out.extend_from_slice(page.values_body());
        Ok(out)
    }
}
