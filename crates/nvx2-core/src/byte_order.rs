//! Byte-order normalization between a file's source order and the host.
//!
//! Only multi-byte fields go through here. Single-byte data (packed
//! `UByte4`/`UByte4N` components) is order-invariant; [`Normalize`] is
//! not implemented for `u8`/`i8`.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte order a mesh file was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceByteOrder {
    LittleEndian,
    BigEndian,
}

impl SourceByteOrder {
    /// The byte order of the machine running the decoder.
    pub const fn host() -> Self {
        if cfg!(target_endian = "big") {
            SourceByteOrder::BigEndian
        } else {
            SourceByteOrder::LittleEndian
        }
    }

    pub fn is_host(self) -> bool {
        self == Self::host()
    }

    /// Converts a value read verbatim from the file into host order.
    #[inline]
    pub fn normalize<T: Normalize>(self, value: T) -> T {
        if self.is_host() {
            value
        } else {
            value.swap_byte_order()
        }
    }

    /// Reads a u16 in this order from the first two bytes of `buf`.
    #[inline]
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            SourceByteOrder::LittleEndian => LittleEndian::read_u16(buf),
            SourceByteOrder::BigEndian => BigEndian::read_u16(buf),
        }
    }

    /// Reads a u32 in this order from the first four bytes of `buf`.
    #[inline]
    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            SourceByteOrder::LittleEndian => LittleEndian::read_u32(buf),
            SourceByteOrder::BigEndian => BigEndian::read_u32(buf),
        }
    }

    /// Reads an f32 in this order from the first four bytes of `buf`.
    #[inline]
    pub fn read_f32(self, buf: &[u8]) -> f32 {
        match self {
            SourceByteOrder::LittleEndian => LittleEndian::read_f32(buf),
            SourceByteOrder::BigEndian => BigEndian::read_f32(buf),
        }
    }

    /// Converts u16 values loaded verbatim from the file to host order, in place.
    pub fn normalize_u16_slice(self, values: &mut [u16]) {
        match self {
            SourceByteOrder::LittleEndian => LittleEndian::from_slice_u16(values),
            SourceByteOrder::BigEndian => BigEndian::from_slice_u16(values),
        }
    }

    /// Converts u32 values loaded verbatim from the file to host order, in place.
    pub fn normalize_u32_slice(self, values: &mut [u32]) {
        match self {
            SourceByteOrder::LittleEndian => LittleEndian::from_slice_u32(values),
            SourceByteOrder::BigEndian => BigEndian::from_slice_u32(values),
        }
    }

    /// Converts f32 values loaded verbatim from the file to host order, in place.
    pub fn normalize_f32_slice(self, values: &mut [f32]) {
        self.normalize_u32_slice(bytemuck::cast_slice_mut(values));
    }
}

impl Default for SourceByteOrder {
    fn default() -> Self {
        Self::host()
    }
}

/// Primitive values of width 2, 4 or 8 whose byte order can be reversed.
pub trait Normalize: Copy {
    fn swap_byte_order(self) -> Self;
}

macro_rules! impl_normalize_int {
    ($($t:ty),*) => {
        $(
            impl Normalize for $t {
                #[inline]
                fn swap_byte_order(self) -> Self {
                    self.swap_bytes()
                }
            }
        )*
    };
}

impl_normalize_int!(u16, i16, u32, i32, u64, i64);

impl Normalize for f32 {
    #[inline]
    fn swap_byte_order(self) -> Self {
        f32::from_bits(self.to_bits().swap_bytes())
    }
}

impl Normalize for f64 {
    #[inline]
    fn swap_byte_order(self) -> Self {
        f64::from_bits(self.to_bits().swap_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foreign() -> SourceByteOrder {
        match SourceByteOrder::host() {
            SourceByteOrder::LittleEndian => SourceByteOrder::BigEndian,
            SourceByteOrder::BigEndian => SourceByteOrder::LittleEndian,
        }
    }

    #[test]
    fn test_host_order_is_identity() {
        let host = SourceByteOrder::host();
        assert_eq!(host.normalize(0x1234u16), 0x1234);
        assert_eq!(host.normalize(0x1234_5678u32), 0x1234_5678);
        assert_eq!(host.normalize(1.5f32), 1.5);
    }

    #[test]
    fn test_foreign_order_swaps() {
        assert_eq!(foreign().normalize(0x1234u16), 0x3412);
        assert_eq!(foreign().normalize(0x0102_0304u32), 0x0403_0201);
        assert_eq!(
            foreign().normalize(0x0102_0304_0506_0708u64),
            0x0807_0605_0403_0201
        );
    }

    #[test]
    fn test_read_helpers() {
        let bytes = [0x00, 0x00, 0x80, 0x3f];
        assert_eq!(SourceByteOrder::LittleEndian.read_f32(&bytes), 1.0);
        assert_eq!(SourceByteOrder::BigEndian.read_u32(&[0, 0, 0, 7]), 7);
        assert_eq!(SourceByteOrder::BigEndian.read_u16(&[1, 2]), 0x0102);
    }

    #[test]
    fn test_f32_slice_roundtrip() {
        let original = [1.0f32, -2.5, 1.0e-3];
        let mut values: Vec<f32> = original.iter().map(|v| v.swap_byte_order()).collect();
        foreign().normalize_f32_slice(&mut values);
        assert_eq!(values, original);
    }
}
