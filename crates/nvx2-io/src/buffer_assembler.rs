//! Turning decoded vertex and index blocks into buffer objects.
//!
//! The reader never creates GPU or engine resources itself. It hands the
//! decoded blocks to a [`VertexBufferBuilder`] and an [`IndexBufferBuilder`]
//! and keeps whatever handles they return. [`MemoryVertexBufferBuilder`] and
//! [`MemoryIndexBufferBuilder`] keep the data in plain owned buffers; any
//! `FnMut` closure with the right signature works as a builder too:
//!
//! ```ignore
//! let mut created = 0;
//! let builder = |request: &VertexBufferRequest<'_>| -> Nvx2Result<usize> {
//!     created += 1;
//!     Ok(request.data.len())
//! };
//! ```

use log::debug;
use nvx2_core::resource::{Access, Usage};
use nvx2_core::status::{Nvx2Error, Nvx2Result};
use nvx2_core::vertex_component::VertexComponent;

/// Element type of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U16,
}

impl IndexType {
    pub fn byte_size(self) -> usize {
        match self {
            IndexType::U16 => 2,
        }
    }
}

/// Everything a vertex buffer builder gets to see.
#[derive(Debug, Clone, Copy)]
pub struct VertexBufferRequest<'a> {
    /// Host-order vertex block, `num_vertices * vertex_width` bytes.
    pub data: &'a [u8],
    pub components: &'a [VertexComponent],
    pub vertex_width: usize,
    pub num_vertices: usize,
    pub usage: Usage,
    pub access: Access,
}

/// Everything an index buffer builder gets to see.
#[derive(Debug, Clone, Copy)]
pub struct IndexBufferRequest<'a> {
    /// Host-order indices.
    pub data: &'a [u16],
    pub index_type: IndexType,
    pub usage: Usage,
    pub access: Access,
}

impl IndexBufferRequest<'_> {
    pub fn num_indices(&self) -> usize {
        self.data.len()
    }
}

pub trait VertexBufferBuilder {
    type Handle;

    fn build_vertex_buffer(&mut self, request: &VertexBufferRequest<'_>) -> Nvx2Result<Self::Handle>;
}

pub trait IndexBufferBuilder {
    type Handle;

    fn build_index_buffer(&mut self, request: &IndexBufferRequest<'_>) -> Nvx2Result<Self::Handle>;
}

impl<F, H> VertexBufferBuilder for F
where
    F: FnMut(&VertexBufferRequest<'_>) -> Nvx2Result<H>,
{
    type Handle = H;

    fn build_vertex_buffer(&mut self, request: &VertexBufferRequest<'_>) -> Nvx2Result<H> {
        self(request)
    }
}

impl<F, H> IndexBufferBuilder for F
where
    F: FnMut(&IndexBufferRequest<'_>) -> Nvx2Result<H>,
{
    type Handle = H;

    fn build_index_buffer(&mut self, request: &IndexBufferRequest<'_>) -> Nvx2Result<H> {
        self(request)
    }
}

/// Vertex data copied into owned memory together with its layout.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    data: Vec<u8>,
    components: Vec<VertexComponent>,
    vertex_width: usize,
    num_vertices: usize,
    usage: Usage,
    access: Access,
}

impl VertexBuffer {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    pub fn components(&self) -> &[VertexComponent] {
        &self.components
    }

    pub fn vertex_width(&self) -> usize {
        self.vertex_width
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Bytes of one vertex, or `None` past the end.
    pub fn vertex(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(self.vertex_width)?;
        self.data.get(start..start + self.vertex_width)
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub fn access(&self) -> Access {
        self.access
    }
}

/// Index data copied into owned memory.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexBuffer {
    data: Vec<u16>,
    index_type: IndexType,
    usage: Usage,
    access: Access,
}

impl IndexBuffer {
    pub fn data(&self) -> &[u16] {
        &self.data
    }

    pub fn num_indices(&self) -> usize {
        self.data.len()
    }

    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    pub fn byte_size(&self) -> usize {
        self.data.len() * self.index_type.byte_size()
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub fn access(&self) -> Access {
        self.access
    }
}

/// Builds [`VertexBuffer`]s in CPU memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryVertexBufferBuilder;

impl VertexBufferBuilder for MemoryVertexBufferBuilder {
    type Handle = VertexBuffer;

    fn build_vertex_buffer(&mut self, request: &VertexBufferRequest<'_>) -> Nvx2Result<VertexBuffer> {
        let expected = request.num_vertices.checked_mul(request.vertex_width);
        if expected != Some(request.data.len()) {
            return Err(Nvx2Error::resource_creation(format!(
                "vertex data is {} bytes, layout needs {} x {}",
                request.data.len(),
                request.num_vertices,
                request.vertex_width
            )));
        }
        Ok(VertexBuffer {
            data: request.data.to_vec(),
            components: request.components.to_vec(),
            vertex_width: request.vertex_width,
            num_vertices: request.num_vertices,
            usage: request.usage,
            access: request.access,
        })
    }
}

/// Builds [`IndexBuffer`]s in CPU memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryIndexBufferBuilder;

impl IndexBufferBuilder for MemoryIndexBufferBuilder {
    type Handle = IndexBuffer;

    fn build_index_buffer(&mut self, request: &IndexBufferRequest<'_>) -> Nvx2Result<IndexBuffer> {
        Ok(IndexBuffer {
            data: request.data.to_vec(),
            index_type: request.index_type,
            usage: request.usage,
            access: request.access,
        })
    }
}

/// Output of a successful open: either the raw decoded blocks are the
/// product, or a pair of built buffers is.
#[derive(Debug)]
pub enum MeshBuffers<VH, IH> {
    Raw,
    Materialized { vertex: VH, index: IH },
}

impl<VH, IH> MeshBuffers<VH, IH> {
    pub fn is_raw(&self) -> bool {
        matches!(self, MeshBuffers::Raw)
    }
}

fn as_resource_error(err: Nvx2Error, what: &str) -> Nvx2Error {
    match err {
        Nvx2Error::ResourceCreation(_) => err,
        other => Nvx2Error::resource_creation(format!("{}: {}", what, other)),
    }
}

/// Builds the vertex buffer, then the index buffer.
///
/// If the index buffer fails the already built vertex buffer is dropped
/// before the error is returned, so nothing outlives a failed assembly.
pub fn assemble<V, I>(
    vertex_builder: &mut V,
    index_builder: &mut I,
    vertex_request: &VertexBufferRequest<'_>,
    index_request: &IndexBufferRequest<'_>,
) -> Nvx2Result<MeshBuffers<V::Handle, I::Handle>>
where
    V: VertexBufferBuilder,
    I: IndexBufferBuilder,
{
    let vertex = vertex_builder
        .build_vertex_buffer(vertex_request)
        .map_err(|e| as_resource_error(e, "vertex buffer"))?;
    debug!(
        "built vertex buffer: {} vertices x {} bytes",
        vertex_request.num_vertices, vertex_request.vertex_width
    );

    let index = match index_builder.build_index_buffer(index_request) {
        Ok(index) => index,
        Err(e) => {
            drop(vertex);
            return Err(as_resource_error(e, "index buffer"));
        }
    };
    debug!("built index buffer: {} indices", index_request.num_indices());

    Ok(MeshBuffers::Materialized { vertex, index })
}
