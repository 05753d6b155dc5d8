use parquet_format_safe::Statistics as ThriftStatistics;

use super::Statistics;
use crate::schema::types::PhysicalType;
use crate::types::NativeType;

/// Statistics for a numeric (int32/int64/float/double) column.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveStatistics<T: NativeType> {
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub max_value: Option<T>,
    pub min_value: Option<T>,
}

impl<T: NativeType> Statistics for PrimitiveStatistics<T> {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn physical_type(&self) -> PhysicalType {
        T::TYPE
    }

    fn null_count(&self) -> Option<i64> {
        self.null_count
    }

    fn write(&self) -> ThriftStatistics {
        ThriftStatistics {
            null_count: self.null_count,
            distinct_count: self.distinct_count,
            max_value: self.max_value.map(|x| x.to_le_bytes().as_ref().to_vec()),
            min_value: self.min_value.map(|x| x.to_le_bytes().as_ref().to_vec()),
            min: None,
            max: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_plain_encoded_bounds() {
        let stats = PrimitiveStatistics::<i32> {
            null_count: Some(1),
            distinct_count: None,
            max_value: Some(10),
            min_value: Some(-3),
        };
        let thrift = stats.write();
        assert_eq!(thrift.max_value, Some(10i32.to_le_bytes().to_vec()));
        assert_eq!(thrift.min_value, Some((-3i32).to_le_bytes().to_vec()));
        assert_eq!(thrift.null_count, Some(1));
    }
}
