//! Ambient writer configuration, in the teacher's `WriterProperties`/builder idiom.

use std::sync::Arc;

use crate::allocator::{Allocator, HeapAllocator};
use crate::compression::Compression;

/// Ambient configuration shared by every column writer a [`crate::write::PageWriteStore`]
/// creates: the default compression codec, the allocator, and advisory size hints.
///
/// The engine itself never rejects a dictionary page for size; `dictionary_page_size_limit`
/// is read by callers upstream of `write_dictionary_page` to decide whether to offer one at
/// all.
#[derive(Clone)]
pub struct WriterProperties {
    compression: Compression,
    allocator: Arc<dyn Allocator>,
    created_by: Option<String>,
    dictionary_page_size_limit: usize,
}

impl std::fmt::Debug for WriterProperties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterProperties")
            .field("compression", &self.compression)
            .field("created_by", &self.created_by)
            .field("dictionary_page_size_limit", &self.dictionary_page_size_limit)
            .finish()
    }
}

/// Default dictionary page size hint: 1 MiB, matching the teacher's own default.
pub const DEFAULT_DICTIONARY_PAGE_SIZE_LIMIT: usize = 1024 * 1024;

impl Default for WriterProperties {
    fn default() -> Self {
        Self {
            compression: Compression::Uncompressed,
            allocator: Arc::new(HeapAllocator),
            created_by: None,
            dictionary_page_size_limit: DEFAULT_DICTIONARY_PAGE_SIZE_LIMIT,
        }
    }
}

impl WriterProperties {
    /// Starts a [`WriterPropertiesBuilder`] seeded with the defaults.
    pub fn builder() -> WriterPropertiesBuilder {
        WriterPropertiesBuilder(Self::default())
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn allocator(&self) -> Arc<dyn Allocator> {
        self.allocator.clone()
    }

    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    pub fn dictionary_page_size_limit(&self) -> usize {
        self.dictionary_page_size_limit
    }
}

/// Builder for [`WriterProperties`].
#[derive(Clone)]
pub struct WriterPropertiesBuilder(WriterProperties);

impl WriterPropertiesBuilder {
    pub fn set_compression(mut self, compression: Compression) -> Self {
        self.0.compression = compression;
        self
    }

    pub fn set_allocator(mut self, allocator: Arc<dyn Allocator>) -> Self {
        self.0.allocator = allocator;
        self
    }

    pub fn set_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.0.created_by = Some(created_by.into());
        self
    }

    pub fn set_dictionary_page_size_limit(mut self, limit: usize) -> Self {
        self.0.dictionary_page_size_limit = limit;
        self
    }

    pub fn build(self) -> WriterProperties {
        self.0
    }
}
