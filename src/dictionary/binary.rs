use std::any::Any;

use super::Dictionary;
use crate::error::{ParquetCoreError, Result};
use crate::schema::types::PhysicalType;

/// Dictionary of plain-encoded (4-byte-length-prefixed) byte-array values.
#[derive(Debug)]
pub struct BinaryDictionary {
    values: Vec<u8>,
    offsets: Vec<i32>,
}

impl BinaryDictionary {
    pub fn new(values: Vec<u8>, offsets: Vec<i32>) -> Self {
        Self { values, offsets }
    }

    pub fn value(&self, index: usize) -> Result<&[u8]> {
        let start = *self.offsets.get(index).ok_or_else(|| {
            ParquetCoreError::OutOfSpec("dictionary index out of range".to_string())
        })? as usize;
        let end = *self.offsets.get(index + 1).ok_or_else(|| {
            ParquetCoreError::OutOfSpec("dictionary index out of range".to_string())
        })? as usize;
        Ok(&self.values[start..end])
    }
}

impl Dictionary for BinaryDictionary {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn physical_type(&self) -> PhysicalType {
        PhysicalType::ByteArray
    }

    fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    fn write_plain_value(&self, id: u32, out: &mut Vec<u8>) -> Result<()> {
        let value = self.value(id as usize)?;
        out.extend_from_slice(&(value.len() as i32).to_le_bytes());
        out.extend_from_slice(value);
        Ok(())
    }

    fn sort_permutation(&self) -> Vec<u32> {
        let mut sorted_ids: Vec<u32> = (0..self.len() as u32).collect();
        sorted_ids.sort_by(|&a, &b| {
            self.value(a as usize)
                .unwrap_or(&[])
                .cmp(self.value(b as usize).unwrap_or(&[]))
        });
        let mut old_to_new = vec![0u32; self.len()];
        for (new_id, &old_id) in sorted_ids.iter().enumerate() {
            old_to_new[old_id as usize] = new_id as u32;
        }
        old_to_new
    }

    fn to_sorted_bytes(&self, old_to_new: &[u32]) -> Vec<u8> {
        let mut sorted: Vec<Option<&[u8]>> = vec![None; self.len()];
        for (old_id, &new_id) in old_to_new.iter().enumerate() {
            sorted[new_id as usize] = self.value(old_id).ok();
        }
        let mut out = Vec::with_capacity(self.values.len() + self.len() * 4);
        for v in sorted.into_iter().flatten() {
            out.extend_from_slice(&(v.len() as i32).to_le_bytes());
            out.extend_from_slice(v);
        }
        out
    }
}

/// Parses a run of plain-encoded (length-prefixed) byte-array values.
pub fn read(buf: &[u8], num_values: usize) -> Result<BinaryDictionary> {
    let mut bytes = buf;
    let mut values = Vec::new();
    let mut offsets = Vec::with_capacity(num_values + 1);
    offsets.push(0);

    let mut current_length = 0i32;
    for _ in 0..num_values {
        if bytes.len() < 4 {
            return Err(ParquetCoreError::OutOfSpec(
                "dictionary page truncated before a value's length prefix".to_string(),
            ));
        }
        let slot_length = i32::from_le_bytes(bytes[..4].try_into().unwrap());
        bytes = &bytes[4..];
        if slot_length < 0 || slot_length as usize > bytes.len() {
            return Err(ParquetCoreError::OutOfSpec(
                "dictionary page value length out of bounds".to_string(),
            ));
        }
        current_length += slot_length;
        let (value, remaining) = bytes.split_at(slot_length as usize);
        values.extend_from_slice(value);
        bytes = remaining;
        offsets.push(current_length);
    }

    Ok(BinaryDictionary::new(values, offsets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_sorts_byte_array_entries() {
        let mut buf = Vec::new();
        for v in ["banana", "apple", "cherry"] {
            buf.extend_from_slice(&(v.len() as i32).to_le_bytes());
            buf.extend_from_slice(v.as_bytes());
        }
        let dict = read(&buf, 3).unwrap();
        assert_eq!(dict.len(), 3);

        let perm = dict.sort_permutation();
        let sorted = dict.to_sorted_bytes(&perm);

        let mut cursor = sorted.as_slice();
        let mut out = vec![];
        for _ in 0..3 {
            let len = i32::from_le_bytes(cursor[..4].try_into().unwrap()) as usize;
            cursor = &cursor[4..];
            out.push(String::from_utf8(cursor[..len].to_vec()).unwrap());
            cursor = &cursor[len..];
        }
        assert_eq!(out, vec!["apple", "banana", "cherry"]);
    }
}
