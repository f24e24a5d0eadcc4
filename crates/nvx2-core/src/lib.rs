//! NVX2 Core Library
//!
//! Types and decoders for legacy NVX2 binary mesh files: byte-order
//! normalization, the vertex component table, the file header and the
//! primitive group table.

pub mod block_reader;
pub mod bounding_box;
pub mod byte_order;
pub mod header;
pub mod primitive_group;
pub mod resource;
pub mod status;
pub mod vertex_component;
pub mod vertex_format;

pub use block_reader::BlockReader;
pub use bounding_box::BoundingBox;
pub use byte_order::{Normalize, SourceByteOrder};
pub use header::{Nvx2Header, INDEX_SIZE};
pub use primitive_group::{
    decode_group_table, update_bounding_boxes, PrimitiveGroup, PrimitiveTopology, GROUP_ENTRY_SIZE,
};
pub use resource::{Access, Usage};
pub use status::{Nvx2Error, Nvx2Result};
pub use vertex_component::{
    convert_vertex_endianness, decode_components, find_component, validate_vertex_width,
    vertex_width, VertexComponent, VertexComponentMask, VertexSemantic,
};
pub use vertex_format::VertexFormat;
