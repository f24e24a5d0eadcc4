use nvx2_core::byte_order::SourceByteOrder;
use nvx2_core::resource::{Access, Usage};

/// Settings a reader applies when it opens a mesh.
///
/// The defaults build in-memory buffers with immutable usage, no CPU access,
/// and assume the file was written in host byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReaderConfig {
    /// Expose the decoded blocks directly instead of building buffers.
    pub raw_mode: bool,
    pub usage: Usage,
    pub access: Access,
    pub source_byte_order: SourceByteOrder,
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw_mode(mut self, raw_mode: bool) -> Self {
        self.raw_mode = raw_mode;
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_source_byte_order(mut self, source_byte_order: SourceByteOrder) -> Self {
        self.source_byte_order = source_byte_order;
        self
    }
}
