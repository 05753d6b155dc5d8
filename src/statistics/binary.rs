use parquet_format_safe::Statistics as ThriftStatistics;

use super::Statistics;
use crate::schema::types::PhysicalType;

/// Statistics for a variable-length byte-array column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinaryStatistics {
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub max_value: Option<Vec<u8>>,
    pub min_value: Option<Vec<u8>>,
}

impl Statistics for BinaryStatistics {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn physical_type(&self) -> PhysicalType {
        PhysicalType::ByteArray
    }

    fn null_count(&self) -> Option<i64> {
        self.null_count
    }

    fn write(&self) -> ThriftStatistics {
        ThriftStatistics {
            null_count: self.null_count,
            distinct_count: self.distinct_count,
            max_value: self.max_value.clone(),
            min_value: self.min_value.clone(),
            min: None,
            max: None,
        }
    }
}
