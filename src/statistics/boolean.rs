use parquet_format_safe::Statistics as ThriftStatistics;

use super::Statistics;
use crate::schema::types::PhysicalType;

/// Statistics for a boolean column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BooleanStatistics {
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub max_value: Option<bool>,
    pub min_value: Option<bool>,
}

impl Statistics for BooleanStatistics {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn physical_type(&self) -> PhysicalType {
        PhysicalType::Boolean
    }

    fn null_count(&self) -> Option<i64> {
        self.null_count
    }

    fn write(&self) -> ThriftStatistics {
        ThriftStatistics {
            null_count: self.null_count,
            distinct_count: self.distinct_count,
            max_value: self.max_value.map(|x| vec![x as u8]),
            min_value: self.min_value.map(|x| vec![x as u8]),
            min: None,
            max: None,
        }
    }
}
