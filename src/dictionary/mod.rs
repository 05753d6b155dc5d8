//! `DictionaryValueCodec` / `Dictionary`: the dictionary-page decode/sort/re-encode collaborator.
//!
//! Grounded in the teacher's `page::page_dict` submodules (`PrimitivePageDict`,
//! `BinaryPageDict`, `FixedLenByteArrayPageDict`), generalized from a read-only decoded
//! dictionary into one that also knows how to sort itself and re-emit a single value in plain
//! encoding (needed by [`crate::write::DictionaryFallback`]).

mod binary;
mod fixed_len_binary;
mod primitive;

pub use binary::BinaryDictionary;
pub use fixed_len_binary::FixedLenDictionary;
pub use primitive::PrimitiveDictionary;

use std::any::Any;

use crate::error::{ParquetCoreError, Result};
use crate::schema::types::PhysicalType;

/// A decoded dictionary page: an ordered list of distinct values, indexable by id.
pub trait Dictionary: std::fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn physical_type(&self) -> PhysicalType;

    /// Number of distinct entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends the plain-encoding of entry `id` to `out`.
    fn write_plain_value(&self, id: u32, out: &mut Vec<u8>) -> Result<()>;

    /// Returns `perm` of length `len()` with `perm[old_id] == new_id`, the mapping that puts
    /// entries into this dictionary's natural sort order (numeric for numeric physical types,
    /// lexicographic byte order for byte arrays).
    fn sort_permutation(&self) -> Vec<u32>;

    /// Serializes entries in new-id order (plain encoding, preserving the physical type's
    /// on-disk shape) given the `old_to_new` mapping from [`Dictionary::sort_permutation`].
    fn to_sorted_bytes(&self, old_to_new: &[u32]) -> Vec<u8>;
}

/// Decodes a plain-encoded, decompressed dictionary page's bytes into a [`Dictionary`].
///
/// Reference [`crate::compression::Codec`]-decompression happens upstream of this call; this
/// function only parses the already-decompressed plain encoding, by physical type.
pub trait DictionaryValueCodec: std::fmt::Debug + Send + Sync {
    fn init_dictionary(
        &self,
        bytes: &[u8],
        num_values: usize,
        physical_type: PhysicalType,
    ) -> Result<Box<dyn Dictionary>>;
}

/// The reference [`DictionaryValueCodec`]: plain-encoded dictionaries for every physical type
/// except `Boolean` (which Parquet never dictionary-encodes).
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainDictionaryValueCodec;

impl DictionaryValueCodec for PlainDictionaryValueCodec {
    fn init_dictionary(
        &self,
        bytes: &[u8],
        num_values: usize,
        physical_type: PhysicalType,
    ) -> Result<Box<dyn Dictionary>> {
        match physical_type {
            PhysicalType::Boolean => Err(ParquetCoreError::OutOfSpec(
                "boolean columns are never dictionary-encoded".to_string(),
            )),
            PhysicalType::Int32 => Ok(Box::new(primitive::read::<i32>(bytes, num_values))),
            PhysicalType::Int64 => Ok(Box::new(primitive::read::<i64>(bytes, num_values))),
            PhysicalType::Float => Ok(Box::new(primitive::read::<f32>(bytes, num_values))),
            PhysicalType::Double => Ok(Box::new(primitive::read::<f64>(bytes, num_values))),
            PhysicalType::ByteArray => Ok(Box::new(binary::read(bytes, num_values)?)),
            PhysicalType::FixedLenByteArray(size) => Ok(Box::new(fixed_len_binary::read(
                bytes,
                size as usize,
                num_values,
                physical_type,
            ))),
            PhysicalType::Int96 => Ok(Box::new(fixed_len_binary::read(bytes, 12, num_values, physical_type))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_boolean() {
        let codec = PlainDictionaryValueCodec;
        assert!(codec.init_dictionary(&[], 0, PhysicalType::Boolean).is_err());
    }
}
