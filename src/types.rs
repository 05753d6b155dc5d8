use crate::schema::types::PhysicalType;

/// A physical native representation of a Parquet fixed-sized type.
pub trait NativeType: Sized + Copy + std::fmt::Debug + PartialOrd {
    type Bytes: AsRef<[u8]>;

    /// The [`PhysicalType`] this Rust type stands in for.
    const TYPE: PhysicalType;

    fn to_le_bytes(&self) -> Self::Bytes;

    fn to_be_bytes(&self) -> Self::Bytes;

    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    fn from_be_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! native {
    ($type:ty, $physical_type:expr) => {
        impl NativeType for $type {
            type Bytes = [u8; std::mem::size_of::<Self>()];
            const TYPE: PhysicalType = $physical_type;

            #[inline]
            fn to_le_bytes(&self) -> Self::Bytes {
                Self::to_le_bytes(*self)
            }

            #[inline]
            fn to_be_bytes(&self) -> Self::Bytes {
                Self::to_be_bytes(*self)
            }

            #[inline]
            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                Self::from_le_bytes(bytes)
            }

            #[inline]
            fn from_be_bytes(bytes: Self::Bytes) -> Self {
                Self::from_be_bytes(bytes)
            }
        }
    };
}

native!(i32, PhysicalType::Int32);
native!(i64, PhysicalType::Int64);
native!(f32, PhysicalType::Float);
native!(f64, PhysicalType::Double);
// int96 is legacy and rarely written by modern producers; its statistics are handled as
// opaque 12-byte values (see `FixedLenStatistics`) rather than given a `NativeType` impl.

/// Decodes a little-endian plain-encoded value of `T` from a byte slice.
pub fn decode<T: NativeType>(bytes: &[u8]) -> T
where
    T::Bytes: Default + AsMut<[u8]>,
{
    let mut buf = T::Bytes::default();
    buf.as_mut().copy_from_slice(&bytes[..std::mem::size_of::<T>()]);
    T::from_le_bytes(buf)
}
