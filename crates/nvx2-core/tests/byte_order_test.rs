use nvx2_core::byte_order::{Normalize, SourceByteOrder};
use proptest::prelude::*;

fn swap_u32_reference(v: u32) -> u32 {
    let b = v.to_ne_bytes();
    u32::from_ne_bytes([b[3], b[2], b[1], b[0]])
}

proptest! {
    #[test]
    fn big_endian_matches_manual_decode(v in any::<u32>()) {
        // `v` is the value as loaded verbatim from a big-endian file.
        let expected = u32::from_be_bytes(v.to_ne_bytes());
        prop_assert_eq!(SourceByteOrder::BigEndian.normalize(v), expected);
    }

    #[test]
    fn little_endian_matches_manual_decode(v in any::<u16>()) {
        let expected = u16::from_le_bytes(v.to_ne_bytes());
        prop_assert_eq!(SourceByteOrder::LittleEndian.normalize(v), expected);
    }

    #[test]
    fn host_order_is_identity(v in any::<u64>(), f in any::<f32>()) {
        let host = SourceByteOrder::host();
        prop_assert_eq!(host.normalize(v), v);
        prop_assert_eq!(host.normalize(f).to_bits(), f.to_bits());
    }

    #[test]
    fn normalization_is_self_inverse(v in any::<u32>(), order in prop_oneof![
        Just(SourceByteOrder::LittleEndian),
        Just(SourceByteOrder::BigEndian),
    ]) {
        prop_assert_eq!(order.normalize(order.normalize(v)), v);
    }

    #[test]
    fn foreign_order_matches_reference_swap(v in any::<u32>()) {
        let foreign = match SourceByteOrder::host() {
            SourceByteOrder::LittleEndian => SourceByteOrder::BigEndian,
            SourceByteOrder::BigEndian => SourceByteOrder::LittleEndian,
        };
        prop_assert_eq!(foreign.normalize(v), swap_u32_reference(v));
        prop_assert_eq!(foreign.normalize(v as i32), v.swap_byte_order() as i32);
    }

    #[test]
    fn slice_normalization_matches_scalar(values in prop::collection::vec(any::<u16>(), 0..32)) {
        let mut converted = values.clone();
        SourceByteOrder::BigEndian.normalize_u16_slice(&mut converted);
        let expected: Vec<u16> = values.iter().map(|&v| SourceByteOrder::BigEndian.normalize(v)).collect();
        prop_assert_eq!(converted, expected);
    }
}
