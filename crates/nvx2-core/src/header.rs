//! NVX2 file header.
//!
//! # Layout
//! ```text
//! 0x00: num_groups     u32
//! 0x04: num_vertices   u32
//! 0x08: vertex_width   u32 (bytes per vertex)
//! 0x0C: num_indices    u32
//! 0x10: num_edges      u32
//! 0x14: component_mask u32
//! 0x18: group table, vertex block, index block
//! ```
//!
//! Every field is stored in the source byte order of the file.

use std::io::{Read, Seek};

use crate::block_reader::BlockReader;
use crate::byte_order::SourceByteOrder;
use crate::primitive_group::GROUP_ENTRY_SIZE;
use crate::status::{Nvx2Error, Nvx2Result};
use crate::vertex_component::VertexComponentMask;

/// Bytes per index in the index block.
pub const INDEX_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nvx2Header {
    pub num_groups: u32,
    pub num_vertices: u32,
    pub vertex_width: u32,
    pub num_indices: u32,
    pub num_edges: u32,
    pub component_mask: VertexComponentMask,
}

impl Nvx2Header {
    pub const SIZE: usize = 24;

    /// Reads and validates the header at the current stream position.
    pub fn decode<R: Read + Seek>(reader: &mut BlockReader<R>) -> Nvx2Result<Self> {
        let mut bytes = [0u8; Self::SIZE];
        reader.decode_bytes(&mut bytes, "header")?;
        Self::from_bytes(&bytes, reader.byte_order())
    }

    /// Parses and validates a header from raw file bytes.
    ///
    /// # Errors
    ///
    /// - `TruncatedInput` if fewer than [`Nvx2Header::SIZE`] bytes are given
    /// - `Format` if a count is negative when read as a signed value, or if
    ///   exactly one of vertex width and component mask is zero
    pub fn from_bytes(bytes: &[u8], byte_order: SourceByteOrder) -> Nvx2Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(Nvx2Error::TruncatedInput(format!(
                "header needs {} bytes, have {}",
                Self::SIZE,
                bytes.len()
            )));
        }
        let field = |i: usize| byte_order.read_u32(&bytes[i * 4..i * 4 + 4]);
        let header = Self {
            num_groups: field(0),
            num_vertices: field(1),
            vertex_width: field(2),
            num_indices: field(3),
            num_edges: field(4),
            component_mask: VertexComponentMask(field(5)),
        };
        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> Nvx2Result<()> {
        let counts = [
            ("num_groups", self.num_groups),
            ("num_vertices", self.num_vertices),
            ("vertex_width", self.vertex_width),
            ("num_indices", self.num_indices),
            ("num_edges", self.num_edges),
        ];
        for (name, value) in counts {
            if (value as i32) < 0 {
                return Err(Nvx2Error::format(format!(
                    "header field {} is negative ({})",
                    name, value as i32
                )));
            }
        }
        if (self.vertex_width == 0) != self.component_mask.is_empty() {
            return Err(Nvx2Error::format(format!(
                "vertex width {} does not match component mask {}",
                self.vertex_width, self.component_mask
            )));
        }
        Ok(())
    }

    pub fn group_table_size(&self) -> Nvx2Result<usize> {
        checked_size(self.num_groups, GROUP_ENTRY_SIZE, "group table")
    }

    pub fn vertex_block_size(&self) -> Nvx2Result<usize> {
        checked_size(self.num_vertices, self.vertex_width as usize, "vertex block")
    }

    pub fn index_block_size(&self) -> Nvx2Result<usize> {
        checked_size(self.num_indices, INDEX_SIZE, "index block")
    }

    /// Size of the whole file as described by this header.
    pub fn file_size(&self) -> Nvx2Result<u64> {
        let total = [self.group_table_size()?, self.vertex_block_size()?, self.index_block_size()?]
            .iter()
            .try_fold(Self::SIZE as u64, |acc, &size| acc.checked_add(size as u64));
        total.ok_or_else(|| Nvx2Error::format("mesh size overflows"))
    }
}

fn checked_size(count: u32, element: usize, what: &str) -> Nvx2Result<usize> {
    (count as usize)
        .checked_mul(element)
        .ok_or_else(|| Nvx2Error::format(format!("{} size overflows", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(fields: [u32; 6]) -> Vec<u8> {
        fields.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_parse_le_header() {
        let bytes = header_bytes([1, 3, 12, 3, 0, 1]);
        let header = Nvx2Header::from_bytes(&bytes, SourceByteOrder::LittleEndian).unwrap();
        assert_eq!(header.num_groups, 1);
        assert_eq!(header.num_vertices, 3);
        assert_eq!(header.vertex_width, 12);
        assert_eq!(header.num_indices, 3);
        assert_eq!(header.component_mask, VertexComponentMask::COORD);
        assert_eq!(header.file_size().unwrap(), 24 + 16 + 36 + 6);
    }

    #[test]
    fn test_truncated_header() {
        let bytes = header_bytes([1, 3, 12, 3, 0, 1]);
        let err = Nvx2Header::from_bytes(&bytes[..20], SourceByteOrder::LittleEndian).unwrap_err();
        assert!(matches!(err, Nvx2Error::TruncatedInput(_)));
    }

    #[test]
    fn test_negative_count_rejected() {
        let bytes = header_bytes([1, 0x8000_0000, 12, 3, 0, 1]);
        let err = Nvx2Header::from_bytes(&bytes, SourceByteOrder::LittleEndian).unwrap_err();
        assert!(matches!(err, Nvx2Error::Format(_)));
    }

    #[test]
    fn test_width_mask_mismatch_rejected() {
        for fields in [[1, 3, 0, 3, 0, 1], [1, 3, 12, 3, 0, 0]] {
            let bytes = header_bytes(fields);
            let err = Nvx2Header::from_bytes(&bytes, SourceByteOrder::LittleEndian).unwrap_err();
            assert!(matches!(err, Nvx2Error::Format(_)));
        }
    }

    #[test]
    fn test_empty_mesh_header() {
        let bytes = header_bytes([0, 0, 0, 0, 0, 0]);
        let header = Nvx2Header::from_bytes(&bytes, SourceByteOrder::LittleEndian).unwrap();
        assert_eq!(header.file_size().unwrap(), 24);
    }
}
