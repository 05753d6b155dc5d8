//! Per-page and per-column statistics: the `Statistics` trait, one struct per physical
//! type family, and the `reduce` merge used to roll page statistics up into column statistics.

mod binary;
mod boolean;
mod fixed_len_binary;
mod primitive;

use std::any::Any;

use parquet_format_safe::Statistics as ThriftStatistics;

pub use binary::BinaryStatistics;
pub use boolean::BooleanStatistics;
pub use fixed_len_binary::FixedLenStatistics;
pub use primitive::PrimitiveStatistics;

use crate::schema::types::PhysicalType;

/// Min/max/null-count summary for one page or one column chunk.
///
/// Each physical type has its own concrete struct; match [`Statistics::physical_type`] and
/// downcast via [`Statistics::as_any`] to recover it (the same pattern the teacher's reader
/// uses on the decode side).
pub trait Statistics: std::fmt::Debug + Send + Sync {
    /// Downcasts to the concrete statistics struct for this physical type.
    fn as_any(&self) -> &dyn Any;

    /// The physical type these statistics were computed over.
    fn physical_type(&self) -> PhysicalType;

    /// Number of null values counted, if tracked.
    fn null_count(&self) -> Option<i64>;

    /// Serializes into the thrift wire representation written into a page header.
    fn write(&self) -> ThriftStatistics;
}

mod reduce;
pub use reduce::reduce;
