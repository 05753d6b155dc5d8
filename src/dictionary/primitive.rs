use std::any::Any;

use super::Dictionary;
use crate::error::Result;
use crate::schema::types::PhysicalType;
use crate::types::{self, NativeType};

/// Dictionary of plain-encoded numeric values (int32/int64/float/double).
#[derive(Debug)]
pub struct PrimitiveDictionary<T: NativeType> {
    values: Vec<T>,
}

impl<T: NativeType> PrimitiveDictionary<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T: NativeType + 'static> Dictionary for PrimitiveDictionary<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn physical_type(&self) -> PhysicalType {
        T::TYPE
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn write_plain_value(&self, id: u32, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(self.values[id as usize].to_le_bytes().as_ref());
        Ok(())
    }

    fn sort_permutation(&self) -> Vec<u32> {
        let mut sorted_ids: Vec<u32> = (0..self.values.len() as u32).collect();
        sorted_ids.sort_by(|&a, &b| {
            self.values[a as usize]
                .partial_cmp(&self.values[b as usize])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut old_to_new = vec![0u32; self.values.len()];
        for (new_id, &old_id) in sorted_ids.iter().enumerate() {
            old_to_new[old_id as usize] = new_id as u32;
        }
        old_to_new
    }

    fn to_sorted_bytes(&self, old_to_new: &[u32]) -> Vec<u8> {
        let mut sorted = vec![None; self.values.len()];
        for (old_id, &new_id) in old_to_new.iter().enumerate() {
            sorted[new_id as usize] = Some(self.values[old_id]);
        }
        let mut out = Vec::with_capacity(self.values.len() * std::mem::size_of::<T>());
        for v in sorted.into_iter().flatten() {
            out.extend_from_slice(v.to_le_bytes().as_ref());
        }
        out
    }
}

pub fn read<T: NativeType>(buf: &[u8], num_values: usize) -> PrimitiveDictionary<T> {
    let typed_size = num_values * std::mem::size_of::<T>();
    let values = buf[..typed_size]
        .chunks_exact(std::mem::size_of::<T>())
        .map(types::decode::<T>)
        .collect();
    PrimitiveDictionary::new(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_permutation_orders_ascending() {
        let dict = PrimitiveDictionary::new(vec![30i32, 10, 20]);
        let perm = dict.sort_permutation();
        // old id 1 (value 10) is smallest -> new id 0
        assert_eq!(perm[1], 0);
        assert_eq!(perm[2], 1);
        assert_eq!(perm[0], 2);

        let sorted_bytes = dict.to_sorted_bytes(&perm);
        let sorted_values: Vec<i32> = sorted_bytes
            .chunks_exact(4)
            .map(types::decode::<i32>)
            .collect();
        assert_eq!(sorted_values, vec![10, 20, 30]);
    }
}
