//! `PageHolder`: the in-memory representation of one buffered page, owned by a
//! [`crate::write::ColumnChunkPageWriter`] until it is framed and emitted.
//!
//! Unlike the teacher's `CompressedDataPage`/`DataPage` (read-path types describing a page
//! decoded off disk), a `PageHolder` is mutated in place: `compress_if_needed` may compress its
//! body once, and dictionary fallback/sort rewrite its body and encoding before it is ever
//! written out.

use std::sync::Arc;

use crate::allocator::Buffer;
use crate::compression::Codec;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::statistics::Statistics;

/// A buffered v1 data page.
#[derive(Debug)]
pub struct PageHolderV1 {
    body: Buffer,
    compressed: bool,
    uncompressed_size: usize,
    value_count: i64,
    statistics: Option<Arc<dyn Statistics>>,
    rl_encoding: Encoding,
    dl_encoding: Encoding,
    values_encoding: Encoding,
    /// Byte offset within `body` at which the values payload begins, skipping the
    /// concatenated rl/dl prefix. Decoding levels is out of scope for this engine, so callers
    /// that need dictionary fallback/sort to work correctly on a v1 page with non-trivial
    /// (nested or nullable) rl/dl must supply this; it defaults to 0 (the common flat-schema
    /// case, where there is no rl/dl prefix to skip).
    data_offset: usize,
}

impl PageHolderV1 {
    pub fn new(
        body: Vec<u8>,
        uncompressed_size: usize,
        value_count: i64,
        statistics: Option<Arc<dyn Statistics>>,
        rl_encoding: Encoding,
        dl_encoding: Encoding,
        values_encoding: Encoding,
    ) -> Self {
        Self {
            body: Buffer(body),
            compressed: false,
            uncompressed_size,
            value_count,
            statistics,
            rl_encoding,
            dl_encoding,
            values_encoding,
            data_offset: 0,
        }
    }

    /// Overrides the rl/dl-prefix length skipped by dictionary fallback/sort (see field docs).
    pub fn with_data_offset(mut self, data_offset: usize) -> Self {
        self.data_offset = data_offset;
        self
    }

    pub fn body(&self) -> &[u8] {
        self.body.as_slice()
    }

    /// Consumes the holder, returning its owned buffer for release back to the allocator.
    pub fn into_body(self) -> Buffer {
        self.body
    }

    pub fn compressed(&self) -> bool {
        self.compressed
    }

    pub fn uncompressed_size(&self) -> usize {
        self.uncompressed_size
    }

    pub fn compressed_size(&self) -> usize {
        self.body.as_slice().len()
    }

    pub fn value_count(&self) -> i64 {
        self.value_count
    }

    pub fn statistics(&self) -> Option<&Arc<dyn Statistics>> {
        self.statistics.as_ref()
    }

    pub fn rl_encoding(&self) -> Encoding {
        self.rl_encoding
    }

    pub fn dl_encoding(&self) -> Encoding {
        self.dl_encoding
    }

    pub fn values_encoding(&self) -> Encoding {
        self.values_encoding
    }

    pub fn get_data_offset(&self) -> usize {
        self.data_offset
    }

    /// Non-null value count, derived from the page's own null-count statistic since decoding
    /// definition levels is out of scope for this engine.
    pub fn non_null_value_count(&self) -> usize {
        let null_count = self.statistics.as_ref().and_then(|s| s.null_count()).unwrap_or(0);
        (self.value_count - null_count).max(0) as usize
    }

    /// Compresses the body via `codec` if it is not already compressed. Idempotent.
    pub fn compress_if_needed(&mut self, codec: &dyn Codec) -> Result<()> {
        if self.compressed {
            return Ok(());
        }
        let compressed = codec.compress(self.body.as_slice())?;
        self.body = Buffer(compressed);
        self.compressed = true;
        Ok(())
    }

    /// Replaces the values payload (the portion of the body at and after `data_offset`),
    /// e.g. as part of dictionary fallback or sort. The rl/dl prefix before `data_offset` is
    /// preserved byte-for-byte; `data_offset` itself is unchanged since the prefix's length
    /// doesn't change. Resets `compressed` to false: the replacement bytes are always
    /// uncompressed.
    pub fn replace_values_portion(&mut self, new_values: Vec<u8>, values_encoding: Encoding) {
        let mut body = self.body.as_slice()[..self.data_offset].to_vec();
        body.extend_from_slice(&new_values);
        self.uncompressed_size = body.len();
        self.body = Buffer(body);
        self.compressed = false;
        self.values_encoding = values_encoding;
    }
}

/// A buffered v2 data page: rl/dl bytes are always stored uncompressed and separate from the
/// (possibly compressed) values body.
#[derive(Debug)]
pub struct PageHolderV2 {
    rl_bytes: Buffer,
    dl_bytes: Buffer,
    values_body: Buffer,
    compressed: bool,
    uncompressed_values_size: usize,
    row_count: i64,
    null_count: i64,
    value_count: i64,
    statistics: Option<Arc<dyn Statistics>>,
    values_encoding: Encoding,
}

impl PageHolderV2 {
    pub fn new(
        rl_bytes: Vec<u8>,
        dl_bytes: Vec<u8>,
        values_body: Vec<u8>,
        uncompressed_values_size: usize,
        row_count: i64,
        null_count: i64,
        value_count: i64,
        statistics: Option<Arc<dyn Statistics>>,
        values_encoding: Encoding,
    ) -> Self {
        Self {
            rl_bytes: Buffer(rl_bytes),
            dl_bytes: Buffer(dl_bytes),
            values_body: Buffer(values_body),
            compressed: false,
            uncompressed_values_size,
            row_count,
            null_count,
            value_count,
            statistics,
            values_encoding,
        }
    }

    pub fn rl_bytes(&self) -> &[u8] {
        self.rl_bytes.as_slice()
    }

    pub fn dl_bytes(&self) -> &[u8] {
        self.dl_bytes.as_slice()
    }

    pub fn values_body(&self) -> &[u8] {
        self.values_body.as_slice()
    }

    /// Consumes the holder, returning its three owned buffers for release back to the
    /// allocator, as `(rl, dl, values)`.
    pub fn into_bodies(self) -> (Buffer, Buffer, Buffer) {
        (self.rl_bytes, self.dl_bytes, self.values_body)
    }

    pub fn compressed(&self) -> bool {
        self.compressed
    }

    pub fn uncompressed_values_size(&self) -> usize {
        self.uncompressed_values_size
    }

    pub fn values_compressed_size(&self) -> usize {
        self.values_body.as_slice().len()
    }

    /// Total buffered size: rl + dl + values body, per the `buffered_size` aggregate.
    pub fn buffered_size(&self) -> usize {
        self.rl_bytes.as_slice().len() + self.dl_bytes.as_slice().len() + self.values_body.as_slice().len()
    }

    pub fn row_count(&self) -> i64 {
        self.row_count
    }

    pub fn null_count(&self) -> i64 {
        self.null_count
    }

    pub fn value_count(&self) -> i64 {
        self.value_count
    }

    pub fn statistics(&self) -> Option<&Arc<dyn Statistics>> {
        self.statistics.as_ref()
    }

    pub fn values_encoding(&self) -> Encoding {
        self.values_encoding
    }

    pub fn non_null_value_count(&self) -> usize {
        (self.value_count - self.null_count).max(0) as usize
    }

    pub fn compress_if_needed(&mut self, codec: &dyn Codec) -> Result<()> {
        if self.compressed {
            return Ok(());
        }
        let compressed = codec.compress(self.values_body.as_slice())?;
        self.values_body = Buffer(compressed);
        self.compressed = true;
        Ok(())
    }

    pub fn replace_values_body(&mut self, values_body: Vec<u8>, values_encoding: Encoding) {
        self.uncompressed_values_size = values_body.len();
        self.values_body = Buffer(values_body);
        self.compressed = false;
        self.values_encoding = values_encoding;
    }
}

/// One buffered page: either page-format variant.
#[derive(Debug)]
pub enum PageHolder {
    V1(PageHolderV1),
    V2(PageHolderV2),
}

impl PageHolder {
    pub fn value_count(&self) -> i64 {
        match self {
            PageHolder::V1(p) => p.value_count(),
            PageHolder::V2(p) => p.value_count(),
        }
    }

    pub fn non_null_value_count(&self) -> usize {
        match self {
            PageHolder::V1(p) => p.non_null_value_count(),
            PageHolder::V2(p) => p.non_null_value_count(),
        }
    }

    pub fn values_encoding(&self) -> Encoding {
        match self {
            PageHolder::V1(p) => p.values_encoding(),
            PageHolder::V2(p) => p.values_encoding(),
        }
    }

    pub fn statistics(&self) -> Option<&Arc<dyn Statistics>> {
        match self {
            PageHolder::V1(p) => p.statistics(),
            PageHolder::V2(p) => p.statistics(),
        }
    }

    pub fn compress_if_needed(&mut self, codec: &dyn Codec) -> Result<()> {
        match self {
            PageHolder::V1(p) => p.compress_if_needed(codec),
            PageHolder::V2(p) => p.compress_if_needed(codec),
        }
    }
}
