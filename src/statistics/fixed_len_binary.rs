use parquet_format_safe::Statistics as ThriftStatistics;

use super::Statistics;
use crate::schema::types::PhysicalType;

/// Statistics for a fixed-length byte-array column, and for the legacy `Int96` type (whose
/// 12-byte values are compared lexicographically rather than numerically — the same
/// simplification the teacher leaves as a known gap for this rarely-written type).
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLenStatistics {
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub max_value: Option<Vec<u8>>,
    pub min_value: Option<Vec<u8>>,
    physical_type: PhysicalType,
}

impl FixedLenStatistics {
    pub fn new(
        physical_type: PhysicalType,
        null_count: Option<i64>,
        distinct_count: Option<i64>,
        min_value: Option<Vec<u8>>,
        max_value: Option<Vec<u8>>,
    ) -> Self {
        Self {
            null_count,
            distinct_count,
            min_value,
            max_value,
            physical_type,
        }
    }
}

impl Statistics for FixedLenStatistics {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn physical_type(&self) -> PhysicalType {
        self.physical_type
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
