//! NVX2 stream reader.
//!
//! Reads a complete legacy NVX2 mesh from a seekable stream in one blocking
//! call, optionally converting it from big-endian platforms.
//!
//! # Example
//!
//! ```ignore
//! use nvx2_io::{Nvx2Reader, ReaderConfig};
//! use nvx2_core::SourceByteOrder;
//!
//! let mut reader = Nvx2Reader::open_path("model.nvx2")?;
//! reader.set_source_byte_order(SourceByteOrder::BigEndian)?;
//! reader.open()?;
//! for group in reader.primitive_groups()? {
//!     println!("{:?}", group.bounding_box);
//! }
//! reader.close()?;
//! ```

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use log::{debug, warn};
use nvx2_core::block_reader::BlockReader;
use nvx2_core::byte_order::SourceByteOrder;
use nvx2_core::header::Nvx2Header;
use nvx2_core::primitive_group::{decode_group_table, update_bounding_boxes, PrimitiveGroup};
use nvx2_core::resource::{Access, Usage};
use nvx2_core::status::{Nvx2Error, Nvx2Result};
use nvx2_core::vertex_component::{
    convert_vertex_endianness, decode_components, validate_vertex_width, VertexComponent,
};

use crate::buffer_assembler::{
    assemble, IndexBufferBuilder, IndexBufferRequest, IndexType, MemoryIndexBufferBuilder,
    MemoryVertexBufferBuilder, MeshBuffers, VertexBufferBuilder, VertexBufferRequest,
};
use crate::decoded_mesh::DecodedMesh;
use crate::reader_config::ReaderConfig;

/// Lifecycle of a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Closed,
    Opening,
    Open,
}

enum Session<VH, IH> {
    Closed,
    Opening,
    Open {
        mesh: Box<DecodedMesh<VH, IH>>,
        /// Stream position the mesh was read from.
        start: u64,
    },
}

/// Reader for legacy NVX2 mesh files.
///
/// A reader owns its stream and at most one open session. Configuration can
/// only change while the reader is closed.
pub struct Nvx2Reader<R, V = MemoryVertexBufferBuilder, I = MemoryIndexBufferBuilder>
where
    V: VertexBufferBuilder,
    I: IndexBufferBuilder,
{
    stream: R,
    config: ReaderConfig,
    vertex_builder: V,
    index_builder: I,
    session: Session<V::Handle, I::Handle>,
}

impl<R: Read + Seek> Nvx2Reader<R> {
    /// Creates a reader that builds in-memory buffers.
    pub fn new(stream: R) -> Self {
        Self::with_builders(stream, MemoryVertexBufferBuilder, MemoryIndexBufferBuilder)
    }
}

impl Nvx2Reader<BufReader<File>> {
    /// Creates a reader over a file. The mesh itself is read by [`Nvx2Reader::open`].
    pub fn open_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R, V, I> Nvx2Reader<R, V, I>
where
    R: Read + Seek,
    V: VertexBufferBuilder,
    I: IndexBufferBuilder,
{
    /// Creates a reader that hands decoded blocks to the given builders.
    pub fn with_builders(stream: R, vertex_builder: V, index_builder: I) -> Self {
        Self {
            stream,
            config: ReaderConfig::default(),
            vertex_builder,
            index_builder,
            session: Session::Closed,
        }
    }

    pub fn state(&self) -> ReaderState {
        match self.session {
            Session::Closed => ReaderState::Closed,
            Session::Opening => ReaderState::Opening,
            Session::Open { .. } => ReaderState::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == ReaderState::Open
    }

    pub fn config(&self) -> ReaderConfig {
        self.config
    }

    /// Replaces the configuration used by the next [`Nvx2Reader::open`].
    ///
    /// # Errors
    ///
    /// Returns `Nvx2Error::InvalidState` unless the reader is closed.
    pub fn set_config(&mut self, config: ReaderConfig) -> Nvx2Result<()> {
        if self.state() != ReaderState::Closed {
            return Err(Nvx2Error::invalid_state(
                "configuration cannot change while a mesh is open",
            ));
        }
        self.config = config;
        Ok(())
    }

    pub fn set_raw_mode(&mut self, raw_mode: bool) -> Nvx2Result<()> {
        self.set_config(self.config.with_raw_mode(raw_mode))
    }

    pub fn is_raw_mode(&self) -> bool {
        self.config.raw_mode
    }

    pub fn set_usage(&mut self, usage: Usage) -> Nvx2Result<()> {
        self.set_config(self.config.with_usage(usage))
    }

    pub fn usage(&self) -> Usage {
        self.config.usage
    }

    pub fn set_access(&mut self, access: Access) -> Nvx2Result<()> {
        self.set_config(self.config.with_access(access))
    }

    pub fn access(&self) -> Access {
        self.config.access
    }

    pub fn set_source_byte_order(&mut self, order: SourceByteOrder) -> Nvx2Result<()> {
        self.set_config(self.config.with_source_byte_order(order))
    }

    pub fn source_byte_order(&self) -> SourceByteOrder {
        self.config.source_byte_order
    }

    /// Reads and decodes the whole mesh from the current stream position.
    ///
    /// On failure nothing is kept: buffers built so far are dropped, the
    /// stream is rewound and the reader is closed again, ready for another
    /// attempt.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the reader is not closed
    /// - `TruncatedInput` if the stream is shorter than the header describes
    /// - `Format` for inconsistent header, layout or group table
    /// - `ResourceCreation` if a buffer builder fails
    pub fn open(&mut self) -> Nvx2Result<()> {
        if self.state() != ReaderState::Closed {
            return Err(Nvx2Error::invalid_state("open() called on a reader that is not closed"));
        }
        self.session = Session::Opening;

        let start = match self.stream.stream_position() {
            Ok(pos) => pos,
            Err(e) => {
                self.session = Session::Closed;
                return Err(Nvx2Error::from_read(e, "stream position"));
            }
        };
        let result = decode_mesh(
            &mut self.stream,
            self.config,
            &mut self.vertex_builder,
            &mut self.index_builder,
        );
        match result {
            Ok(mesh) => {
                debug!(
                    "opened nvx2 mesh: {} groups, {} vertices x {} bytes, {} indices{}",
                    mesh.num_groups(),
                    mesh.num_vertices(),
                    mesh.vertex_width(),
                    mesh.num_indices(),
                    if mesh.is_raw() { " (raw)" } else { "" }
                );
                self.session = Session::Open {
                    mesh: Box::new(mesh),
                    start,
                };
                Ok(())
            }
            Err(e) => {
                warn!("failed to open nvx2 mesh: {}", e);
                self.session = Session::Closed;
                // Rewind so a later open() starts from the same place.
                if let Err(seek_err) = self.stream.seek(SeekFrom::Start(start)) {
                    warn!("could not rewind stream after failed open: {}", seek_err);
                }
                Err(e)
            }
        }
    }

    /// Releases the decoded mesh and any built buffers.
    ///
    /// The stream is rewound to where the mesh started, so the reader can be
    /// opened again.
    ///
    /// # Errors
    ///
    /// Returns `Nvx2Error::InvalidState` if the reader is not open.
    pub fn close(&mut self) -> Nvx2Result<()> {
        self.take_mesh().map(drop)
    }

    /// Closes the reader and hands the decoded mesh to the caller.
    pub fn take_mesh(&mut self) -> Nvx2Result<DecodedMesh<V::Handle, I::Handle>> {
        match std::mem::replace(&mut self.session, Session::Closed) {
            Session::Open { mesh, start } => {
                if let Err(e) = self.stream.seek(SeekFrom::Start(start)) {
                    warn!("could not rewind stream after closing mesh: {}", e);
                }
                Ok(*mesh)
            }
            other => {
                self.session = other;
                Err(Nvx2Error::invalid_state("reader is not open"))
            }
        }
    }

    /// The decoded mesh of the current session.
    ///
    /// # Errors
    ///
    /// Returns `Nvx2Error::InvalidState` if the reader is not open.
    pub fn mesh(&self) -> Nvx2Result<&DecodedMesh<V::Handle, I::Handle>> {
        match &self.session {
            Session::Open { mesh, .. } => Ok(mesh.as_ref()),
            _ => Err(Nvx2Error::invalid_state("reader is not open")),
        }
    }

    pub fn num_vertices(&self) -> Nvx2Result<usize> {
        Ok(self.mesh()?.num_vertices())
    }

    pub fn num_indices(&self) -> Nvx2Result<usize> {
        Ok(self.mesh()?.num_indices())
    }

    pub fn vertex_width(&self) -> Nvx2Result<usize> {
        Ok(self.mesh()?.vertex_width())
    }

    pub fn num_edges(&self) -> Nvx2Result<usize> {
        Ok(self.mesh()?.num_edges())
    }

    pub fn vertex_components(&self) -> Nvx2Result<&[VertexComponent]> {
        Ok(self.mesh()?.vertex_components())
    }

    pub fn primitive_groups(&self) -> Nvx2Result<&[PrimitiveGroup]> {
        Ok(self.mesh()?.primitive_groups())
    }

    /// Raw-mode view of the vertex block.
    pub fn vertex_data(&self) -> Nvx2Result<&[f32]> {
        self.mesh()?.vertex_data()
    }

    /// Raw-mode view of the index block.
    pub fn index_data(&self) -> Nvx2Result<&[u16]> {
        self.mesh()?.index_data()
    }

    /// The built vertex buffer; not available in raw mode.
    pub fn vertex_buffer(&self) -> Nvx2Result<&V::Handle> {
        self.mesh()?.vertex_buffer()
    }

    /// The built index buffer; not available in raw mode.
    pub fn index_buffer(&self) -> Nvx2Result<&I::Handle> {
        self.mesh()?.index_buffer()
    }

    pub fn get_ref(&self) -> &R {
        &self.stream
    }

    /// Drops any open session and returns the stream.
    pub fn into_inner(self) -> R {
        self.stream
    }
}

fn decode_mesh<R, V, I>(
    stream: &mut R,
    config: ReaderConfig,
    vertex_builder: &mut V,
    index_builder: &mut I,
) -> Nvx2Result<DecodedMesh<V::Handle, I::Handle>>
where
    R: Read + Seek,
    V: VertexBufferBuilder,
    I: IndexBufferBuilder,
{
    let byte_order = config.source_byte_order;
    let mut reader = BlockReader::new(stream, byte_order);
    let start = reader.position()?;

    let header = Nvx2Header::decode(&mut reader)?;
    let components = decode_components(header.component_mask)?;
    let vertex_width = header.vertex_width as usize;
    validate_vertex_width(&components, vertex_width)?;
    // Every component format is a multiple of 4 bytes, so the vertex block
    // is a whole number of 32-bit words.
    debug_assert_eq!(vertex_width % 4, 0);

    let group_table_size = header.group_table_size()?;
    let vertex_block_size = header.vertex_block_size()?;
    let required = header.file_size()?;
    let available = reader.stream_len()?.saturating_sub(start);
    if available < required {
        return Err(Nvx2Error::TruncatedInput(format!(
            "mesh needs {} bytes, stream has {}",
            required, available
        )));
    }

    let group_offset = start + Nvx2Header::SIZE as u64;
    let vertex_offset = group_offset + group_table_size as u64;
    let index_offset = vertex_offset + vertex_block_size as u64;

    reader.set_position(group_offset)?;
    let group_data = reader.decode_block(group_table_size, "group table")?;
    reader.set_position(vertex_offset)?;
    let mut vertex_data = reader.decode_f32_block(vertex_block_size / 4, "vertex block")?;
    reader.set_position(index_offset)?;
    let index_data = reader.decode_u16_block(header.num_indices as usize, "index block")?;

    if !byte_order.is_host() {
        debug!("converting vertex block from {:?}", byte_order);
        convert_vertex_endianness(
            bytemuck::cast_slice_mut(&mut vertex_data),
            vertex_width,
            &components,
            byte_order,
        )?;
    }

    let mut groups = decode_group_table(&group_data, &header, byte_order)?;
    update_bounding_boxes(
        &mut groups,
        bytemuck::cast_slice(&vertex_data),
        vertex_width,
        &components,
    );

    let buffers = if config.raw_mode {
        MeshBuffers::Raw
    } else {
        let vertex_request = VertexBufferRequest {
            data: bytemuck::cast_slice(&vertex_data),
            components: &components,
            vertex_width,
            num_vertices: header.num_vertices as usize,
            usage: config.usage,
            access: config.access,
        };
        let index_request = IndexBufferRequest {
            data: &index_data,
            index_type: IndexType::U16,
            usage: config.usage,
            access: config.access,
        };
        assemble(vertex_builder, index_builder, &vertex_request, &index_request)?
    };

    Ok(DecodedMesh::new(
        header,
        components,
        group_data,
        vertex_data,
        index_data,
        groups,
        buffers,
    ))
}
