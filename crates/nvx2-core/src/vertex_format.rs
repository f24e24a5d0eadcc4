/// Storage format of one vertex component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Float2,
    Float3,
    Float4,
    /// Two signed 16-bit values in 4.12 fixed point.
    Short2,
    /// Four unsigned bytes, read as integers.
    UByte4,
    /// Four unsigned bytes, normalized to `0.0..=1.0`.
    UByte4N,
}

impl VertexFormat {
    pub fn element_count(&self) -> usize {
        match self {
            VertexFormat::Float2 | VertexFormat::Short2 => 2,
            VertexFormat::Float3 => 3,
            VertexFormat::Float4 | VertexFormat::UByte4 | VertexFormat::UByte4N => 4,
        }
    }

    /// Width in bytes of a single element.
    pub fn element_size(&self) -> usize {
        match self {
            VertexFormat::Float2 | VertexFormat::Float3 | VertexFormat::Float4 => 4,
            VertexFormat::Short2 => 2,
            VertexFormat::UByte4 | VertexFormat::UByte4N => 1,
        }
    }

    pub fn byte_size(&self) -> usize {
        self.element_count() * self.element_size()
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self, VertexFormat::UByte4N)
    }

    pub fn is_float(&self) -> bool {
        matches!(
            self,
            VertexFormat::Float2 | VertexFormat::Float3 | VertexFormat::Float4
        )
    }

    /// Whether the elements have to be converted when the source byte order
    /// differs from the host.
    pub fn needs_byte_swap(&self) -> bool {
        self.element_size() > 1
    }
}
