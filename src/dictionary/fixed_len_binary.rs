use std::any::Any;

use super::Dictionary;
use crate::schema::types::PhysicalType;
use crate::error::Result;

/// Dictionary of plain-encoded fixed-length byte-array values (including the legacy
/// 12-byte `Int96` representation, which is just a `FixedLenByteArray(12)` for this purpose).
#[derive(Debug)]
pub struct FixedLenDictionary {
    values: Vec<u8>,
    size: usize,
    physical_type: PhysicalType,
}

impl FixedLenDictionary {
    pub fn new(values: Vec<u8>, size: usize, physical_type: PhysicalType) -> Self {
        Self { values, size, physical_type }
    }

    pub fn value(&self, index: usize) -> &[u8] {
        let start = index * self.size;
        &self.values[start..start + self.size]
    }
}

impl Dictionary for FixedLenDictionary {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    fn len(&self) -> usize {
        if self.size == 0 {
            0
        } else {
            self.values.len() / self.size
        }
    }

    fn write_plain_value(&self, id: u32, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(self.value(id as usize));
        Ok(())
    }

    fn sort_permutation(&self) -> Vec<u32> {
        let mut sorted_ids: Vec<u32> = (0..self.len() as u32).collect();
        sorted_ids.sort_by(|&a, &b| self.value(a as usize).cmp(self.value(b as usize)));
        let mut old_to_new = vec![0u32; self.len()];
        for (new_id, &old_id) in sorted_ids.iter().enumerate() {
            old_to_new[old_id as usize] = new_id as u32;
        }
        old_to_new
    }

    fn to_sorted_bytes(&self, old_to_new: &[u32]) -> Vec<u8> {
        let mut sorted: Vec<Option<&[u8]>> = vec![None; self.len()];
        for (old_id, &new_id) in old_to_new.iter().enumerate() {
            sorted[new_id as usize] = Some(self.value(old_id));
        }
        let mut out = Vec::with_capacity(self.values.len());
        for v in sorted.into_iter().flatten() {
            out.extend_from_slice(v);
        }
        out
    }
}

/// Parses a run of plain-encoded fixed-length byte-array values, `size` bytes each.
pub fn read(buf: &[u8], size: usize, num_values: usize, physical_type: PhysicalType) -> FixedLenDictionary {
    let values = buf[..size * num_values].to_vec();
    FixedLenDictionary::new(values, size, physical_type)
}
