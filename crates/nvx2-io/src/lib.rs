//! NVX2 I/O library for reading legacy NVX2 binary mesh files.
//!
//! [`Nvx2Reader`] reads a whole mesh from any `Read + Seek` stream. Depending
//! on its [`ReaderConfig`] it either exposes the decoded vertex and index
//! blocks directly (raw mode) or passes them to a pair of buffer builders.
//!
//! ```ignore
//! use nvx2_io::{Nvx2Reader, ReaderConfig};
//!
//! let mut reader = Nvx2Reader::open_path("tiger.nvx2")?;
//! reader.set_config(ReaderConfig::new().with_raw_mode(true))?;
//! reader.open()?;
//! let positions = reader.vertex_data()?;
//! ```

pub mod buffer_assembler;
pub mod decoded_mesh;
pub mod nvx2_reader;
pub mod reader_config;

pub use buffer_assembler::{
    IndexBuffer, IndexBufferBuilder, IndexBufferRequest, IndexType, MemoryIndexBufferBuilder,
    MemoryVertexBufferBuilder, MeshBuffers, VertexBuffer, VertexBufferBuilder, VertexBufferRequest,
};
pub use decoded_mesh::DecodedMesh;
pub use nvx2_reader::{Nvx2Reader, ReaderState};
pub use reader_config::ReaderConfig;
