//! Compression codec collaborator and the reference implementation the teacher's `parquet2`
//! ships: one concrete [`Codec`] per cargo feature, selected through [`create_codec`].
//!
//! Actually picking a codec for a column is an external (upstream) concern; this module only
//! defines the trait the core drives and the bundled implementations so the engine works
//! end-to-end without a caller-supplied substitute.

use std::convert::TryFrom;

use parquet_format_safe::CompressionCodec as ThriftCompression;

use crate::error::{ParquetCoreError, Result};

/// The compression algorithm applied to a page's body.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy, Default)]
pub enum Compression {
    #[default]
    Uncompressed,
    Snappy,
    Gzip,
    Lz4,
    Zstd,
    Brotli,
}

impl TryFrom<ThriftCompression> for Compression {
    type Error = ParquetCoreError;

    fn try_from(codec: ThriftCompression) -> Result<Self> {
        Ok(match codec {
            ThriftCompression::UNCOMPRESSED => Compression::Uncompressed,
            ThriftCompression::SNAPPY => Compression::Snappy,
            ThriftCompression::GZIP => Compression::Gzip,
            ThriftCompression::LZ4 | ThriftCompression::LZ4_RAW => Compression::Lz4,
            ThriftCompression::ZSTD => Compression::Zstd,
            ThriftCompression::BROTLI => Compression::Brotli,
            _ => {
                return Err(ParquetCoreError::OutOfSpec(
                    "unknown thrift compression codec".to_string(),
                ))
            }
        })
    }
}

impl From<Compression> for ThriftCompression {
    fn from(codec: Compression) -> Self {
        match codec {
            Compression::Uncompressed => ThriftCompression::UNCOMPRESSED,
            Compression::Snappy => ThriftCompression::SNAPPY,
            Compression::Gzip => ThriftCompression::GZIP,
            Compression::Lz4 => ThriftCompression::LZ4_RAW,
            Compression::Zstd => ThriftCompression::ZSTD,
            Compression::Brotli => ThriftCompression::BROTLI,
        }
    }
}

/// Compression codec collaborator.
///
/// Implementations are shared (`Arc<dyn Codec>`) across a chunk's column writers and so must
/// be `Send + Sync`; they hold no per-call mutable state of their own.
pub trait Codec: std::fmt::Debug + Send + Sync {
    /// Compresses `input`, returning the compressed bytes.
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decompresses `input` into a buffer of exactly `decompressed_size` bytes.
    fn decompress(&self, input: &[u8], decompressed_size: usize) -> Result<Vec<u8>>;

    /// The [`Compression`] variant this codec implements.
    fn codec_name(&self) -> Compression;
}

/// Given a [`Compression`], returns the codec that implements it, or `None` for
/// [`Compression::Uncompressed`] (the caller treats a page body as-is in that case).
pub fn create_codec(codec: Compression) -> Result<Option<Box<dyn Codec>>> {
    match codec {
        #[cfg(feature = "snappy")]
        Compression::Snappy => Ok(Some(Box::new(SnappyCodec::new()))),
        #[cfg(feature = "gzip")]
        Compression::Gzip => Ok(Some(Box::new(GZipCodec::new()))),
        #[cfg(feature = "brotli")]
        Compression::Brotli => Ok(Some(Box::new(BrotliCodec::new()))),
        #[cfg(feature = "lz4")]
        Compression::Lz4 => Ok(Some(Box::new(Lz4Codec::new()))),
        #[cfg(feature = "zstd")]
        Compression::Zstd => Ok(Some(Box::new(ZstdCodec::new()))),
        Compression::Uncompressed => Ok(None),
        #[allow(unreachable_patterns)]
        other => Err(ParquetCoreError::OutOfSpec(format!(
            "codec {:?} is not installed (cargo feature disabled)",
            other
        ))),
    }
}

#[cfg(feature = "snappy")]
mod snappy_codec {
    use snap::raw::{decompress_len, max_compress_len, Decoder, Encoder};

    use super::{Codec, Compression};
    use crate::error::Result;

    /// Codec for the Snappy compression format.
    #[derive(Debug, Default)]
    pub struct SnappyCodec;

    impl SnappyCodec {
        pub(crate) fn new() -> Self {
            Self
        }
    }

    impl Codec for SnappyCodec {
        fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
            let mut output = vec![0u8; max_compress_len(input.len())];
            let n = Encoder::new().compress(input, &mut output)?;
            output.truncate(n);
            Ok(output)
        }

        fn decompress(&self, input: &[u8], decompressed_size: usize) -> Result<Vec<u8>> {
            let len = decompress_len(input)?;
            debug_assert_eq!(len, decompressed_size);
            let mut output = vec![0u8; len];
            Decoder::new().decompress(input, &mut output)?;
            Ok(output)
        }

        fn codec_name(&self) -> Compression {
            Compression::Snappy
        }
    }
}
#[cfg(feature = "snappy")]
pub use snappy_codec::SnappyCodec;

#[cfg(feature = "gzip")]
mod gzip_codec {
    use std::io::{Read, Write};

    use flate2::{read, write, Compression as Flate2Compression};

    use super::{Codec, Compression};
    use crate::error::Result;

    /// Codec for the GZIP compression algorithm.
    #[derive(Debug, Default)]
    pub struct GZipCodec;

    impl GZipCodec {
        pub(crate) fn new() -> Self {
            Self
        }
    }

    impl Codec for GZipCodec {
        fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
            let mut output = Vec::new();
            let mut encoder = write::GzEncoder::new(&mut output, Flate2Compression::default());
            encoder.write_all(input)?;
            encoder.try_finish()?;
            Ok(output)
        }

        fn decompress(&self, input: &[u8], decompressed_size: usize) -> Result<Vec<u8>> {
            let mut output = vec![0u8; decompressed_size];
            read::GzDecoder::new(input).read_exact(&mut output)?;
            Ok(output)
        }

        fn codec_name(&self) -> Compression {
            Compression::Gzip
        }
    }
}
#[cfg(feature = "gzip")]
pub use gzip_codec::GZipCodec;

#[cfg(feature = "brotli")]
mod brotli_codec {
    use std::io::{Read, Write};

    use super::{Codec, Compression};
    use crate::error::Result;

    const BROTLI_DEFAULT_BUFFER_SIZE: usize = 4096;
    const BROTLI_DEFAULT_COMPRESSION_QUALITY: u32 = 1;
    const BROTLI_DEFAULT_LG_WINDOW_SIZE: u32 = 22;

    /// Codec for the Brotli compression algorithm.
    #[derive(Debug, Default)]
    pub struct BrotliCodec;

    impl BrotliCodec {
        pub(crate) fn new() -> Self {
            Self
        }
    }

    impl Codec for BrotliCodec {
        fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
            let mut output = Vec::new();
            let mut encoder = brotli::CompressorWriter::new(
                &mut output,
                BROTLI_DEFAULT_BUFFER_SIZE,
                BROTLI_DEFAULT_COMPRESSION_QUALITY,
                BROTLI_DEFAULT_LG_WINDOW_SIZE,
            );
            encoder.write_all(input)?;
            encoder.flush()?;
            drop(encoder);
            Ok(output)
        }

        fn decompress(&self, input: &[u8], decompressed_size: usize) -> Result<Vec<u8>> {
            let mut output = vec![0u8; decompressed_size];
            brotli::Decompressor::new(input, BROTLI_DEFAULT_BUFFER_SIZE).read_exact(&mut output)?;
            Ok(output)
        }

        fn codec_name(&self) -> Compression {
            Compression::Brotli
        }
    }
}
#[cfg(feature = "brotli")]
pub use brotli_codec::BrotliCodec;

#[cfg(feature = "lz4")]
mod lz4_codec {
    use super::{Codec, Compression};
    use crate::error::{ParquetCoreError, Result};

    /// Codec for the LZ4 compression algorithm, via the frame format (`lz4_flex`).
    #[derive(Debug, Default)]
    pub struct Lz4Codec;

    impl Lz4Codec {
        pub(crate) fn new() -> Self {
            Self
        }
    }

    impl Codec for Lz4Codec {
        fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
            Ok(lz4_flex::compress_prepend_size(input))
        }

        fn decompress(&self, input: &[u8], decompressed_size: usize) -> Result<Vec<u8>> {
            lz4_flex::decompress_size_prepended(input)
                .map_err(|e| ParquetCoreError::Encoding(format!("lz4 decode failed: {}", e)))
                .map(|mut output| {
                    output.truncate(decompressed_size);
                    output
                })
        }

        fn codec_name(&self) -> Compression {
            Compression::Lz4
        }
    }
}
#[cfg(feature = "lz4")]
pub use lz4_codec::Lz4Codec;

#[cfg(feature = "zstd")]
mod zstd_codec {
    use std::io::{Read, Write};

    use super::{Codec, Compression};
    use crate::error::Result;

    /// Compression level (1-21) for ZSTD. 1 favors speed over ratio.
    const ZSTD_COMPRESSION_LEVEL: i32 = 1;

    /// Codec for the Zstandard compression algorithm.
    #[derive(Debug, Default)]
    pub struct ZstdCodec;

    impl ZstdCodec {
        pub(crate) fn new() -> Self {
            Self
        }
    }

    impl Codec for ZstdCodec {
        fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
            let mut output = Vec::new();
            let mut encoder = zstd::Encoder::new(&mut output, ZSTD_COMPRESSION_LEVEL)?;
            encoder.write_all(input)?;
            encoder.finish()?;
            Ok(output)
        }

        fn decompress(&self, input: &[u8], decompressed_size: usize) -> Result<Vec<u8>> {
            let mut output = vec![0u8; decompressed_size];
            zstd::Decoder::new(input)?.read_exact(&mut output)?;
            Ok(output)
        }

        fn codec_name(&self) -> Compression {
            Compression::Zstd
        }
    }
}
#[cfg(feature = "zstd")]
pub use zstd_codec::ZstdCodec;
