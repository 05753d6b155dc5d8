//! Error taxonomy for the column-chunk page writer.

/// Errors raised while buffering, falling back, sorting, or emitting pages for a column chunk.
#[derive(Debug, thiserror::Error)]
pub enum ParquetCoreError {
    /// A page (or the dictionary page) would need a 32-bit size field to exceed `i32::MAX`.
    #[error("page for column {column:?} is too large to encode ({size} bytes, max is i32::MAX)")]
    PageTooLarge {
        /// Dotted path of the offending column.
        column: String,
        /// The size, in bytes, that could not be represented.
        size: usize,
    },

    /// `write_dictionary_page` was called more than once for the same column.
    #[error("column {column:?} already has a buffered dictionary page")]
    DuplicateDictionary {
        /// Dotted path of the offending column.
        column: String,
    },

    /// A buffered page carried a variant the emit path does not recognize.
    ///
    /// Unreachable under correct construction; kept as a defensive guard.
    #[error("buffered page has an unrecognized page type")]
    InvalidPageType,

    /// Propagated verbatim from the injected file writer or codec.
    #[error("underlying I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Propagated from the thrift-compact-protocol header serializer.
    #[error("underlying thrift error: {0}")]
    Thrift(#[from] thrift::Error),

    /// Dictionary fallback's decode/re-encode step failed.
    #[error("dictionary fallback encoding failed: {0}")]
    Encoding(String),

    /// A collaborator handed the core data that violates the Parquet on-disk contract.
    #[error("input is out of spec: {0}")]
    OutOfSpec(String),
}

#[cfg(feature = "snappy")]
impl From<snap::Error> for ParquetCoreError {
    fn from(e: snap::Error) -> Self {
        ParquetCoreError::Encoding(format!("underlying snap error: {}", e))
    }
}

/// A specialized `Result` for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, ParquetCoreError>;
