//! Legacy vertex component mask and the per-vertex layout derived from it.
//!
//! An NVX2 file describes its vertex layout with a 21-bit mask. Each semantic
//! slot has a float variant and, for most slots, a packed variant; the slots
//! are laid out in a fixed order with no padding.

use std::fmt;
use std::ops::BitOr;

use log::trace;

use crate::byte_order::SourceByteOrder;
use crate::status::{Nvx2Error, Nvx2Result};
use crate::vertex_format::VertexFormat;

/// Bit mask of legacy vertex components as stored in the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VertexComponentMask(pub u32);

impl VertexComponentMask {
    pub const COORD: Self = Self(1 << 0);
    pub const NORMAL: Self = Self(1 << 1);
    pub const NORMAL_UB4N: Self = Self(1 << 2);
    pub const UV0: Self = Self(1 << 3);
    pub const UV0_S2: Self = Self(1 << 4);
    pub const UV1: Self = Self(1 << 5);
    pub const UV1_S2: Self = Self(1 << 6);
    pub const UV2: Self = Self(1 << 7);
    pub const UV2_S2: Self = Self(1 << 8);
    pub const UV3: Self = Self(1 << 9);
    pub const UV3_S2: Self = Self(1 << 10);
    pub const COLOR: Self = Self(1 << 11);
    pub const COLOR_UB4N: Self = Self(1 << 12);
    pub const TANGENT: Self = Self(1 << 13);
    pub const TANGENT_UB4N: Self = Self(1 << 14);
    pub const BINORMAL: Self = Self(1 << 15);
    pub const BINORMAL_UB4N: Self = Self(1 << 16);
    pub const WEIGHTS: Self = Self(1 << 17);
    pub const WEIGHTS_UB4N: Self = Self(1 << 18);
    pub const JINDICES: Self = Self(1 << 19);
    pub const JINDICES_UB4: Self = Self(1 << 20);

    pub const NUM_COMPONENTS: u32 = 21;
    pub const ALL: Self = Self((1 << Self::NUM_COMPONENTS) - 1);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bits that do not name any known component.
    pub const fn unknown_bits(self) -> u32 {
        self.0 & !Self::ALL.0
    }
}

impl BitOr for VertexComponentMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<u32> for VertexComponentMask {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl fmt::Display for VertexComponentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#08x}", self.0)
    }
}

/// What a vertex component means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexSemantic {
    Position,
    Normal,
    TexCoord,
    Color,
    Tangent,
    Binormal,
    SkinWeights,
    SkinJointIndices,
}

/// One entry of the decoded vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexComponent {
    pub semantic: VertexSemantic,
    /// Distinguishes the four texture coordinate sets; zero elsewhere.
    pub semantic_index: u8,
    pub format: VertexFormat,
    pub byte_offset: usize,
}

impl VertexComponent {
    pub fn byte_size(&self) -> usize {
        self.format.byte_size()
    }

    pub fn is_normalized(&self) -> bool {
        self.format.is_normalized()
    }

    /// Decodes this component of a single host-order vertex into floats.
    ///
    /// Missing elements are zero. Returns `None` if `vertex` is too short.
    pub fn unpack(&self, vertex: &[u8]) -> Option<[f32; 4]> {
        let bytes = vertex.get(self.byte_offset..self.byte_offset + self.byte_size())?;
        let mut out = [0.0f32; 4];
        match self.format {
            VertexFormat::Float2 | VertexFormat::Float3 | VertexFormat::Float4 => {
                for (dst, src) in out.iter_mut().zip(bytes.chunks_exact(4)) {
                    *dst = f32::from_ne_bytes([src[0], src[1], src[2], src[3]]);
                }
            }
            VertexFormat::Short2 => {
                for (dst, src) in out.iter_mut().zip(bytes.chunks_exact(2)) {
                    *dst = i16::from_ne_bytes([src[0], src[1]]) as f32 / 4096.0;
                }
            }
            VertexFormat::UByte4 => {
                for (dst, &b) in out.iter_mut().zip(bytes) {
                    *dst = b as f32;
                }
            }
            VertexFormat::UByte4N => {
                for (dst, &b) in out.iter_mut().zip(bytes) {
                    *dst = b as f32 / 255.0;
                }
            }
        }
        Some(out)
    }
}

struct Slot {
    semantic: VertexSemantic,
    index: u8,
    float: (VertexComponentMask, VertexFormat),
    packed: Option<(VertexComponentMask, VertexFormat)>,
}

type M = VertexComponentMask;

// Canonical scan order. Offsets accumulate in exactly this order.
#[rustfmt::skip]
const SLOTS: [Slot; 11] = [
    Slot { semantic: VertexSemantic::Position, index: 0, float: (M::COORD, VertexFormat::Float3), packed: None },
    Slot { semantic: VertexSemantic::Normal, index: 0, float: (M::NORMAL, VertexFormat::Float3), packed: Some((M::NORMAL_UB4N, VertexFormat::UByte4N)) },
    Slot { semantic: VertexSemantic::TexCoord, index: 0, float: (M::UV0, VertexFormat::Float2), packed: Some((M::UV0_S2, VertexFormat::Short2)) },
    Slot { semantic: VertexSemantic::TexCoord, index: 1, float: (M::UV1, VertexFormat::Float2), packed: Some((M::UV1_S2, VertexFormat::Short2)) },
    Slot { semantic: VertexSemantic::TexCoord, index: 2, float: (M::UV2, VertexFormat::Float2), packed: Some((M::UV2_S2, VertexFormat::Short2)) },
    Slot { semantic: VertexSemantic::TexCoord, index: 3, float: (M::UV3, VertexFormat::Float2), packed: Some((M::UV3_S2, VertexFormat::Short2)) },
    Slot { semantic: VertexSemantic::Color, index: 0, float: (M::COLOR, VertexFormat::Float4), packed: Some((M::COLOR_UB4N, VertexFormat::UByte4N)) },
    Slot { semantic: VertexSemantic::Tangent, index: 0, float: (M::TANGENT, VertexFormat::Float3), packed: Some((M::TANGENT_UB4N, VertexFormat::UByte4N)) },
    Slot { semantic: VertexSemantic::Binormal, index: 0, float: (M::BINORMAL, VertexFormat::Float3), packed: Some((M::BINORMAL_UB4N, VertexFormat::UByte4N)) },
    Slot { semantic: VertexSemantic::SkinWeights, index: 0, float: (M::WEIGHTS, VertexFormat::Float4), packed: Some((M::WEIGHTS_UB4N, VertexFormat::UByte4N)) },
    Slot { semantic: VertexSemantic::SkinJointIndices, index: 0, float: (M::JINDICES, VertexFormat::Float4), packed: Some((M::JINDICES_UB4, VertexFormat::UByte4)) },
];

/// Resolves a component mask into the ordered vertex layout.
///
/// # Errors
///
/// Returns `Nvx2Error::Format` if the mask sets unknown bits, or both the
/// float and the packed variant of the same slot.
pub fn decode_components(mask: VertexComponentMask) -> Nvx2Result<Vec<VertexComponent>> {
    if mask.unknown_bits() != 0 {
        return Err(Nvx2Error::format(format!(
            "vertex component mask {} sets unknown bits {:#x}",
            mask,
            mask.unknown_bits()
        )));
    }

    let mut components = Vec::new();
    let mut offset = 0usize;
    for slot in SLOTS.iter() {
        let has_float = mask.contains(slot.float.0);
        let packed = slot.packed.filter(|(bit, _)| mask.contains(*bit));
        let format = match (has_float, packed) {
            (true, Some(_)) => {
                return Err(Nvx2Error::format(format!(
                    "vertex component mask {} sets both float and packed {:?}{}",
                    mask,
                    slot.semantic,
                    if slot.semantic == VertexSemantic::TexCoord { slot.index.to_string() } else { String::new() }
                )));
            }
            (true, None) => slot.float.1,
            (false, Some((_, format))) => format,
            (false, None) => continue,
        };
        components.push(VertexComponent {
            semantic: slot.semantic,
            semantic_index: slot.index,
            format,
            byte_offset: offset,
        });
        offset += format.byte_size();
    }

    trace!("mask {} -> {} components, {} bytes per vertex", mask, components.len(), offset);
    Ok(components)
}

/// Total bytes per vertex for a decoded layout.
pub fn vertex_width(components: &[VertexComponent]) -> usize {
    components.last().map_or(0, |c| c.byte_offset + c.byte_size())
}

/// Checks a decoded layout against the width declared in the header.
pub fn validate_vertex_width(components: &[VertexComponent], declared: usize) -> Nvx2Result<()> {
    let computed = vertex_width(components);
    if computed != declared {
        return Err(Nvx2Error::format(format!(
            "vertex components need {} bytes per vertex, header declares {}",
            computed, declared
        )));
    }
    Ok(())
}

/// Finds the first component with the given semantic.
pub fn find_component(components: &[VertexComponent], semantic: VertexSemantic) -> Option<&VertexComponent> {
    components.iter().find(|c| c.semantic == semantic)
}

/// Converts a block of vertices from `source` order to host order in place.
///
/// Every 2- and 4-byte element is swapped; byte-sized components are left
/// untouched. Does nothing when `source` already is the host order.
///
/// # Errors
///
/// Returns `Nvx2Error::Format` if the components need more than
/// `vertex_width` bytes per vertex. `vertices` is left unchanged.
pub fn convert_vertex_endianness(
    vertices: &mut [u8],
    vertex_width: usize,
    components: &[VertexComponent],
    source: SourceByteOrder,
) -> Nvx2Result<()> {
    let needed = self::vertex_width(components);
    if needed > vertex_width {
        return Err(Nvx2Error::format(format!(
            "vertex components need {} bytes per vertex, vertices are {} bytes",
            needed, vertex_width
        )));
    }
    if source.is_host() || vertex_width == 0 {
        return Ok(());
    }
    for vertex in vertices.chunks_exact_mut(vertex_width) {
        for component in components.iter().filter(|c| c.format.needs_byte_swap()) {
            let size = component.format.element_size();
            let start = component.byte_offset;
            let end = start + component.byte_size();
            for element in vertex[start..end].chunks_exact_mut(size) {
                element.reverse();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_only() {
        let components = decode_components(M::COORD).unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].semantic, VertexSemantic::Position);
        assert_eq!(components[0].format, VertexFormat::Float3);
        assert_eq!(vertex_width(&components), 12);
    }

    #[test]
    fn test_offsets_follow_canonical_order() {
        let mask = M::JINDICES_UB4 | M::COORD | M::UV1_S2 | M::NORMAL_UB4N | M::COLOR;
        let components = decode_components(mask).unwrap();
        let summary: Vec<_> = components
            .iter()
            .map(|c| (c.semantic, c.semantic_index, c.byte_offset))
            .collect();
        assert_eq!(
            summary,
            vec![
                (VertexSemantic::Position, 0, 0),
                (VertexSemantic::Normal, 0, 12),
                (VertexSemantic::TexCoord, 1, 16),
                (VertexSemantic::Color, 0, 20),
                (VertexSemantic::SkinJointIndices, 0, 36),
            ]
        );
        assert_eq!(vertex_width(&components), 40);
    }

    #[test]
    fn test_ambiguous_slot_rejected() {
        let err = decode_components(M::COORD | M::UV2 | M::UV2_S2).unwrap_err();
        assert!(matches!(err, Nvx2Error::Format(_)));
    }

    #[test]
    fn test_unknown_bits_rejected() {
        let err = decode_components(VertexComponentMask(1 << 21)).unwrap_err();
        assert!(matches!(err, Nvx2Error::Format(_)));
    }

    #[test]
    fn test_empty_mask_has_zero_width() {
        let components = decode_components(VertexComponentMask::empty()).unwrap();
        assert!(components.is_empty());
        assert!(validate_vertex_width(&components, 0).is_ok());
        assert!(validate_vertex_width(&components, 4).is_err());
    }

    #[test]
    fn test_unpack_packed_formats() {
        let components = decode_components(M::UV0_S2 | M::COLOR_UB4N | M::JINDICES_UB4).unwrap();
        let mut vertex = Vec::new();
        vertex.extend_from_slice(&4096i16.to_ne_bytes());
        vertex.extend_from_slice(&(-2048i16).to_ne_bytes());
        vertex.extend_from_slice(&[255, 0, 51, 255]);
        vertex.extend_from_slice(&[3, 7, 0, 1]);

        assert_eq!(components[0].unpack(&vertex), Some([1.0, -0.5, 0.0, 0.0]));
        assert_eq!(components[1].unpack(&vertex), Some([1.0, 0.0, 0.2, 1.0]));
        assert_eq!(components[2].unpack(&vertex), Some([3.0, 7.0, 0.0, 1.0]));
        assert_eq!(components[2].unpack(&vertex[..10]), None);
    }

    #[test]
    fn test_convert_endianness_skips_byte_components() {
        let components = decode_components(M::COORD | M::COLOR_UB4N).unwrap();
        let foreign = match SourceByteOrder::host() {
            SourceByteOrder::LittleEndian => SourceByteOrder::BigEndian,
            SourceByteOrder::BigEndian => SourceByteOrder::LittleEndian,
        };
        let mut vertex = Vec::new();
        for v in [1.0f32, 2.0, 3.0] {
            let mut b = v.to_ne_bytes();
            b.reverse();
            vertex.extend_from_slice(&b);
        }
        vertex.extend_from_slice(&[10, 20, 30, 40]);

        convert_vertex_endianness(&mut vertex, 16, &components, foreign).unwrap();

        assert_eq!(components[0].unpack(&vertex), Some([1.0, 2.0, 3.0, 0.0]));
        assert_eq!(&vertex[12..], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_convert_endianness_rejects_layout_wider_than_vertex() {
        let components = decode_components(M::COORD | M::NORMAL).unwrap();
        let mut vertices = vec![7u8; 24];

        for source in [SourceByteOrder::LittleEndian, SourceByteOrder::BigEndian] {
            let err = convert_vertex_endianness(&mut vertices, 12, &components, source).unwrap_err();
            assert!(matches!(err, Nvx2Error::Format(_)));
        }
        assert_eq!(vertices, vec![7u8; 24]);
    }
}
