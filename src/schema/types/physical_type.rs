/// The on-disk physical representation of a leaf column's values.
///
/// Full schema resolution (nested groups, logical types, converted types) is an external
/// concern; this engine only needs the physical type to pick a statistics implementation
/// and to drive dictionary decode/re-encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray(i32),
}
