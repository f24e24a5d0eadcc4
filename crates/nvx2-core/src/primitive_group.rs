use std::ops::Range;

use log::{debug, warn};

use crate::bounding_box::BoundingBox;
use crate::byte_order::SourceByteOrder;
use crate::header::Nvx2Header;
use crate::status::{Nvx2Error, Nvx2Result};
use crate::vertex_component::{find_component, VertexComponent, VertexSemantic};
use crate::vertex_format::VertexFormat;

/// Bytes per entry in the group table: four u32 range fields.
pub const GROUP_ENTRY_SIZE: usize = 16;

/// How a group's indices form primitives. NVX2 only stores triangle lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveTopology {
    #[default]
    TriangleList,
}

/// A drawable sub-range of a mesh's vertex and index blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveGroup {
    pub first_vertex: u32,
    pub num_vertices: u32,
    pub first_index: u32,
    pub num_indices: u32,
    pub topology: PrimitiveTopology,
    /// Derived from the group's vertex range, never read from the file.
    pub bounding_box: BoundingBox,
}

impl PrimitiveGroup {
    pub fn new(first_vertex: u32, num_vertices: u32, first_index: u32, num_indices: u32) -> Self {
        Self {
            first_vertex,
            num_vertices,
            first_index,
            num_indices,
            topology: PrimitiveTopology::TriangleList,
            bounding_box: BoundingBox::EMPTY,
        }
    }

    pub fn vertex_range(&self) -> Range<usize> {
        let start = self.first_vertex as usize;
        start..start + self.num_vertices as usize
    }

    pub fn index_range(&self) -> Range<usize> {
        let start = self.first_index as usize;
        start..start + self.num_indices as usize
    }

    pub fn num_primitives(&self) -> usize {
        match self.topology {
            PrimitiveTopology::TriangleList => self.num_indices as usize / 3,
        }
    }
}

/// Parses the raw group table and checks every range against the header.
///
/// Zero-length and overlapping groups are accepted as long as they stay in
/// bounds.
///
/// # Errors
///
/// - `TruncatedInput` if `bytes` is shorter than the table
/// - `Format` if a group reaches past the mesh's vertex or index count
pub fn decode_group_table(
    bytes: &[u8],
    header: &Nvx2Header,
    byte_order: SourceByteOrder,
) -> Nvx2Result<Vec<PrimitiveGroup>> {
    let table_size = header.group_table_size()?;
    if bytes.len() < table_size {
        return Err(Nvx2Error::TruncatedInput(format!(
            "group table needs {} bytes, have {}",
            table_size,
            bytes.len()
        )));
    }

    let mut groups = Vec::with_capacity(header.num_groups as usize);
    for (i, entry) in bytes[..table_size].chunks_exact(GROUP_ENTRY_SIZE).enumerate() {
        let field = |n: usize| byte_order.read_u32(&entry[n * 4..n * 4 + 4]);
        let group = PrimitiveGroup::new(field(0), field(1), field(2), field(3));

        check_range(i, "vertex", group.first_vertex, group.num_vertices, header.num_vertices)?;
        check_range(i, "index", group.first_index, group.num_indices, header.num_indices)?;
        if group.num_vertices == 0 || group.num_indices == 0 {
            warn!("primitive group {} is empty ({} vertices, {} indices)", i, group.num_vertices, group.num_indices);
        }
        groups.push(group);
    }
    Ok(groups)
}

fn check_range(group: usize, what: &str, first: u32, count: u32, total: u32) -> Nvx2Result<()> {
    match first.checked_add(count) {
        Some(end) if end <= total => Ok(()),
        _ => Err(Nvx2Error::format(format!(
            "primitive group {} {} range {}+{} exceeds {} {}s",
            group, what, first, count, total, what
        ))),
    }
}

/// Recomputes every group's bounding box from a host-order vertex block.
///
/// Groups without vertices, and all groups of a mesh without a float
/// position component, keep [`BoundingBox::EMPTY`].
pub fn update_bounding_boxes(
    groups: &mut [PrimitiveGroup],
    vertices: &[u8],
    vertex_width: usize,
    components: &[VertexComponent],
) {
    let position = match find_component(components, VertexSemantic::Position) {
        Some(c) if c.format == VertexFormat::Float3 => *c,
        _ => {
            debug!("mesh has no position component, bounding boxes stay empty");
            for group in groups.iter_mut() {
                group.bounding_box = BoundingBox::EMPTY;
            }
            return;
        }
    };
    if vertex_width == 0 {
        return;
    }

    for group in groups.iter_mut() {
        let points = vertices
            .chunks_exact(vertex_width)
            .skip(group.first_vertex as usize)
            .take(group.num_vertices as usize)
            .filter_map(|vertex| position.unpack(vertex))
            .map(|p| [p[0], p[1], p[2]]);
        group.bounding_box = BoundingBox::from_points(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex_component::{decode_components, VertexComponentMask};

    fn header(num_groups: u32, num_vertices: u32, num_indices: u32) -> Nvx2Header {
        Nvx2Header {
            num_groups,
            num_vertices,
            vertex_width: 12,
            num_indices,
            num_edges: 0,
            component_mask: VertexComponentMask::COORD,
        }
    }

    fn table(entries: &[[u32; 4]]) -> Vec<u8> {
        entries.iter().flatten().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_decode_table() {
        let bytes = table(&[[0, 3, 0, 3], [3, 1, 3, 0]]);
        let groups = decode_group_table(&bytes, &header(2, 4, 3), SourceByteOrder::LittleEndian).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].vertex_range(), 0..3);
        assert_eq!(groups[0].num_primitives(), 1);
        assert_eq!(groups[1].index_range(), 3..3);
        assert_eq!(groups[1].topology, PrimitiveTopology::TriangleList);
    }

    #[test]
    fn test_triangle_list_counts_whole_triangles() {
        let group = PrimitiveGroup::new(0, 4, 0, 7);
        assert_eq!(group.topology, PrimitiveTopology::default());
        assert_eq!(group.num_primitives(), 2);
    }

    #[test]
    fn test_out_of_range_vertex() {
        let bytes = table(&[[2, 2, 0, 3]]);
        let err = decode_group_table(&bytes, &header(1, 3, 3), SourceByteOrder::LittleEndian).unwrap_err();
        assert!(matches!(err, Nvx2Error::Format(_)));
    }

    #[test]
    fn test_overflowing_range() {
        let bytes = table(&[[0, 3, u32::MAX, 2]]);
        let err = decode_group_table(&bytes, &header(1, 3, 3), SourceByteOrder::LittleEndian).unwrap_err();
        assert!(matches!(err, Nvx2Error::Format(_)));
    }

    #[test]
    fn test_bounding_boxes() {
        let components = decode_components(VertexComponentMask::COORD).unwrap();
        let vertices: Vec<u8> = [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [5.0, 5.0, 5.0]]
            .iter()
            .flatten()
            .flat_map(|v| v.to_ne_bytes())
            .collect();
        let mut groups = vec![PrimitiveGroup::new(0, 3, 0, 3), PrimitiveGroup::new(3, 0, 3, 0)];
        update_bounding_boxes(&mut groups, &vertices, 12, &components);
        assert_eq!(groups[0].bounding_box, BoundingBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 0.0]));
        assert_eq!(groups[1].bounding_box, BoundingBox::EMPTY);
    }
}
