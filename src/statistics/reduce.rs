use std::sync::Arc;

use super::{BinaryStatistics, BooleanStatistics, FixedLenStatistics, PrimitiveStatistics, Statistics};
use crate::error::{ParquetCoreError, Result};
use crate::schema::types::PhysicalType;
use crate::types::NativeType;

/// Merges a column's per-page statistics into one column-level summary.
///
/// `None` entries (a page written without statistics) are skipped; if none of the inputs
/// carry statistics the result is `None`.
pub fn reduce(stats: &[Option<Arc<dyn Statistics>>]) -> Result<Option<Arc<dyn Statistics>>> {
    let stats = stats
        .iter()
        .filter_map(|x| x.as_ref())
        .map(Arc::as_ref)
        .collect::<Vec<&dyn Statistics>>();
    if stats.is_empty() {
        return Ok(None);
    }

    let physical_type = stats[0].physical_type();
    if !stats.iter().all(|x| x.physical_type() == physical_type) {
        return Err(ParquetCoreError::OutOfSpec(
            "cannot merge statistics of different physical types".to_string(),
        ));
    }

    Ok(Some(match physical_type {
        PhysicalType::Boolean => Arc::new(reduce_boolean(
            stats.iter().copied().map(downcast::<BooleanStatistics>),
        )) as Arc<dyn Statistics>,
        PhysicalType::Int32 => Arc::new(reduce_primitive::<i32>(
            stats.iter().copied().map(downcast::<PrimitiveStatistics<i32>>),
        )) as Arc<dyn Statistics>,
        PhysicalType::Int64 => Arc::new(reduce_primitive::<i64>(
            stats.iter().copied().map(downcast::<PrimitiveStatistics<i64>>),
        )) as Arc<dyn Statistics>,
        PhysicalType::Float => Arc::new(reduce_primitive::<f32>(
            stats.iter().copied().map(downcast::<PrimitiveStatistics<f32>>),
        )) as Arc<dyn Statistics>,
        PhysicalType::Double => Arc::new(reduce_primitive::<f64>(
            stats.iter().copied().map(downcast::<PrimitiveStatistics<f64>>),
        )) as Arc<dyn Statistics>,
        PhysicalType::ByteArray => Arc::new(reduce_binary(
            stats.iter().copied().map(downcast::<BinaryStatistics>),
        )) as Arc<dyn Statistics>,
        PhysicalType::Int96 | PhysicalType::FixedLenByteArray(_) => Arc::new(reduce_fixed_len(
            stats.iter().copied().map(downcast::<FixedLenStatistics>),
        )) as Arc<dyn Statistics>,
    }))
}

fn downcast<T: 'static>(stat: &dyn Statistics) -> &T {
    stat.as_any()
        .downcast_ref()
        .expect("physical_type already matched; downcast cannot fail")
}

fn reduce_binary<'a, I: Iterator<Item = &'a BinaryStatistics>>(mut stats: I) -> BinaryStatistics {
    let initial = stats.next().expect("non-empty").clone();
    stats.fold(initial, |mut acc, new| {
        acc.min_value = merge_option(acc.min_value, new.min_value.clone(), |a, b| ord_bytes(a, b, false));
        acc.max_value = merge_option(acc.max_value, new.max_value.clone(), |a, b| ord_bytes(a, b, true));
        acc.null_count = merge_counts(acc.null_count, new.null_count);
        acc.distinct_count = None;
        acc
    })
}

fn reduce_fixed_len<'a, I: Iterator<Item = &'a FixedLenStatistics>>(
    mut stats: I,
) -> FixedLenStatistics {
    let initial = stats.next().expect("non-empty").clone();
    stats.fold(initial, |mut acc, new| {
        let min = merge_option(acc.min_value.clone(), new.min_value.clone(), |a, b| {
            ord_bytes(a, b, false)
        });
        let max = merge_option(acc.max_value.clone(), new.max_value.clone(), |a, b| {
            ord_bytes(a, b, true)
        });
        let null_count = merge_counts(acc.null_count, new.null_count);
        acc.min_value = min;
        acc.max_value = max;
        acc.null_count = null_count;
        acc.distinct_count = None;
        acc
    })
}

fn ord_bytes(a: Vec<u8>, b: Vec<u8>, max: bool) -> Vec<u8> {
    match a.cmp(&b) {
        std::cmp::Ordering::Less => if max { b } else { a },
        std::cmp::Ordering::Greater => if max { a } else { b },
        std::cmp::Ordering::Equal => a,
    }
}

fn reduce_boolean<'a, I: Iterator<Item = &'a BooleanStatistics>>(mut stats: I) -> BooleanStatistics {
    let initial = stats.next().expect("non-empty").clone();
    stats.fold(initial, |mut acc, new| {
        acc.min_value = match (acc.min_value, new.min_value) {
            (None, None) => None,
            (Some(x), None) => Some(x),
            (None, Some(x)) => Some(x),
            (Some(x), Some(y)) => Some(x && y),
        };
        acc.max_value = match (acc.max_value, new.max_value) {
            (None, None) => None,
            (Some(x), None) => Some(x),
            (None, Some(x)) => Some(x),
            (Some(x), Some(y)) => Some(x || y),
        };
        acc.null_count = merge_counts(acc.null_count, new.null_count);
        acc.distinct_count = None;
        acc
    })
}

fn reduce_primitive<'a, T>(mut stats: impl Iterator<Item = &'a PrimitiveStatistics<T>>) -> PrimitiveStatistics<T>
where
    T: NativeType + 'a,
{
    let initial = stats.next().expect("non-empty").clone();
    stats.fold(initial, |mut acc, new| {
        acc.min_value = merge_option(acc.min_value, new.min_value, |a, b| if a < b { a } else { b });
        acc.max_value = merge_option(acc.max_value, new.max_value, |a, b| if a > b { a } else { b });
        acc.null_count = merge_counts(acc.null_count, new.null_count);
        acc.distinct_count = None;
        acc
    })
}

fn merge_option<T>(a: Option<T>, b: Option<T>, pick: impl FnOnce(T, T) -> T) -> Option<T> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) => Some(x),
        (None, Some(x)) => Some(x),
        (Some(x), Some(y)) => Some(pick(x, y)),
    }
}

fn merge_counts(a: Option<i64>, b: Option<i64>) -> Option<i64> {
    merge_option(a, b, |x, y| x + y)
}
