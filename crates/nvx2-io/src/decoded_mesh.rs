use nvx2_core::header::Nvx2Header;
use nvx2_core::primitive_group::PrimitiveGroup;
use nvx2_core::status::{Nvx2Error, Nvx2Result};
use nvx2_core::vertex_component::{VertexComponent, VertexComponentMask};

use crate::buffer_assembler::MeshBuffers;

/// Everything decoded from one NVX2 file.
///
/// The decoded blocks are kept in host byte order for the whole session.
/// Depending on how the reader was configured, callers either look at them
/// directly (raw mode) or use the buffers built from them.
#[derive(Debug)]
pub struct DecodedMesh<VH, IH> {
    header: Nvx2Header,
    components: Vec<VertexComponent>,
    group_data: Vec<u8>,
    vertex_data: Vec<f32>,
    index_data: Vec<u16>,
    groups: Vec<PrimitiveGroup>,
    buffers: MeshBuffers<VH, IH>,
}

impl<VH, IH> DecodedMesh<VH, IH> {
    pub(crate) fn new(
        header: Nvx2Header,
        components: Vec<VertexComponent>,
        group_data: Vec<u8>,
        vertex_data: Vec<f32>,
        index_data: Vec<u16>,
        groups: Vec<PrimitiveGroup>,
        buffers: MeshBuffers<VH, IH>,
    ) -> Self {
        Self {
            header,
            components,
            group_data,
            vertex_data,
            index_data,
            groups,
            buffers,
        }
    }

    pub fn header(&self) -> &Nvx2Header {
        &self.header
    }

    pub fn num_groups(&self) -> usize {
        self.header.num_groups as usize
    }

    pub fn num_vertices(&self) -> usize {
        self.header.num_vertices as usize
    }

    pub fn num_indices(&self) -> usize {
        self.header.num_indices as usize
    }

    /// Bytes per vertex.
    pub fn vertex_width(&self) -> usize {
        self.header.vertex_width as usize
    }

    pub fn num_edges(&self) -> usize {
        self.header.num_edges as usize
    }

    pub fn component_mask(&self) -> VertexComponentMask {
        self.header.component_mask
    }

    pub fn vertex_components(&self) -> &[VertexComponent] {
        &self.components
    }

    pub fn primitive_groups(&self) -> &[PrimitiveGroup] {
        &self.groups
    }

    /// The group table exactly as it was stored in the file.
    pub fn group_table_bytes(&self) -> &[u8] {
        &self.group_data
    }

    pub fn is_raw(&self) -> bool {
        self.buffers.is_raw()
    }

    fn require_raw(&self, what: &str) -> Nvx2Result<()> {
        if self.is_raw() {
            Ok(())
        } else {
            Err(Nvx2Error::invalid_state(format!(
                "{} is only available in raw mode",
                what
            )))
        }
    }

    /// The vertex block as 32-bit words, host order.
    ///
    /// Packed components share words with their neighbours; use
    /// [`DecodedMesh::vertex_bytes`] with the component offsets to pick them
    /// apart.
    ///
    /// # Errors
    ///
    /// Returns `Nvx2Error::InvalidState` unless the mesh was opened in raw mode.
    pub fn vertex_data(&self) -> Nvx2Result<&[f32]> {
        self.require_raw("vertex data")?;
        Ok(&self.vertex_data)
    }

    pub fn vertex_bytes(&self) -> Nvx2Result<&[u8]> {
        self.require_raw("vertex data")?;
        Ok(bytemuck::cast_slice(&self.vertex_data))
    }

    pub fn index_data(&self) -> Nvx2Result<&[u16]> {
        self.require_raw("index data")?;
        Ok(&self.index_data)
    }

    /// The built vertex buffer.
    ///
    /// # Errors
    ///
    /// Returns `Nvx2Error::InvalidState` if the mesh was opened in raw mode.
    pub fn vertex_buffer(&self) -> Nvx2Result<&VH> {
        match &self.buffers {
            MeshBuffers::Materialized { vertex, .. } => Ok(vertex),
            MeshBuffers::Raw => Err(Nvx2Error::invalid_state("no vertex buffer in raw mode")),
        }
    }

    pub fn index_buffer(&self) -> Nvx2Result<&IH> {
        match &self.buffers {
            MeshBuffers::Materialized { index, .. } => Ok(index),
            MeshBuffers::Raw => Err(Nvx2Error::invalid_state("no index buffer in raw mode")),
        }
    }

    /// Gives up the mesh and returns the built buffers, if any.
    pub fn into_buffers(self) -> MeshBuffers<VH, IH> {
        self.buffers
    }
}
