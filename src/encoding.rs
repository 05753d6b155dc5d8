//! The value-encoding enum shared by page headers, and the thrift bridge for it.
//!
//! Actually encoding or decoding a run of values is an external concern (see
//! [`crate::values`]); this module only carries the tag that says which scheme a page's
//! bytes were written with.

use std::convert::TryFrom;

use parquet_format_safe::Encoding as ThriftEncoding;

use crate::error::{ParquetCoreError, Result};

/// Encoding used for a page's repetition levels, definition levels, or values.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum Encoding {
    /// Fixed-width native encoding (ints/floats little-endian, byte arrays length-prefixed).
    Plain,
    /// Deprecated: dictionary ids in-line in the data page, plain-encoded dictionary.
    PlainDictionary,
    /// Group packed run-length encoding. Used for levels and booleans.
    Rle,
    /// Bit-packed encoding for a known max width. Used for levels.
    BitPacked,
    /// Delta encoding for integers.
    DeltaBinaryPacked,
    /// Byte arrays with lengths delta-encoded separately from the data.
    DeltaLengthByteArray,
    /// Incremental byte array encoding (prefix + delta length byte array suffix).
    DeltaByteArray,
    /// Dictionary ids encoded with the RLE/bit-packing hybrid.
    RleDictionary,
    /// Byte-stream-split encoding for floating point data.
    ByteStreamSplit,
}

impl Encoding {
    /// Whether a page using this encoding refers to a dictionary page for its values.
    pub fn uses_dictionary(&self) -> bool {
        matches!(self, Encoding::PlainDictionary | Encoding::RleDictionary)
    }
}

impl TryFrom<ThriftEncoding> for Encoding {
    type Error = ParquetCoreError;

    fn try_from(encoding: ThriftEncoding) -> Result<Self> {
        Ok(match encoding {
            ThriftEncoding::PLAIN => Encoding::Plain,
            ThriftEncoding::PLAIN_DICTIONARY => Encoding::PlainDictionary,
            ThriftEncoding::RLE => Encoding::Rle,
            ThriftEncoding::BIT_PACKED => Encoding::BitPacked,
            ThriftEncoding::DELTA_BINARY_PACKED => Encoding::DeltaBinaryPacked,
            ThriftEncoding::DELTA_LENGTH_BYTE_ARRAY => Encoding::DeltaLengthByteArray,
            ThriftEncoding::DELTA_BYTE_ARRAY => Encoding::DeltaByteArray,
            ThriftEncoding::RLE_DICTIONARY => Encoding::RleDictionary,
            ThriftEncoding::BYTE_STREAM_SPLIT => Encoding::ByteStreamSplit,
            _ => return Err(ParquetCoreError::OutOfSpec("unknown thrift encoding".to_string())),
        })
    }
}

impl From<Encoding> for ThriftEncoding {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Plain => ThriftEncoding::PLAIN,
            Encoding::PlainDictionary => ThriftEncoding::PLAIN_DICTIONARY,
            Encoding::Rle => ThriftEncoding::RLE,
            Encoding::BitPacked => ThriftEncoding::BIT_PACKED,
            Encoding::DeltaBinaryPacked => ThriftEncoding::DELTA_BINARY_PACKED,
            Encoding::DeltaLengthByteArray => ThriftEncoding::DELTA_LENGTH_BYTE_ARRAY,
            Encoding::DeltaByteArray => ThriftEncoding::DELTA_BYTE_ARRAY,
            Encoding::RleDictionary => ThriftEncoding::RLE_DICTIONARY,
            Encoding::ByteStreamSplit => ThriftEncoding::BYTE_STREAM_SPLIT,
        }
    }
}
