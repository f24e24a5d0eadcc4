use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::byte_order::SourceByteOrder;
use crate::status::{Nvx2Error, Nvx2Result};

/// Seekable input for reading fixed-size NVX2 regions.
///
/// `BlockReader` wraps any `Read + Seek` stream and remembers the byte order
/// the file was written with. Scalar reads come back in host order; block
/// reads come back verbatim and are normalized by the caller, who knows which
/// parts of a block are multi-byte.
///
/// # Example
///
/// ```ignore
/// use std::io::Cursor;
/// use nvx2_core::{BlockReader, SourceByteOrder};
///
/// let data = vec![0, 0, 0, 7];
/// let mut reader = BlockReader::new(Cursor::new(data), SourceByteOrder::BigEndian);
///
/// assert_eq!(reader.decode_u32("count").unwrap(), 7);
/// ```
pub struct BlockReader<R> {
    inner: R,
    byte_order: SourceByteOrder,
}

impl<R: Read + Seek> BlockReader<R> {
    pub fn new(inner: R, byte_order: SourceByteOrder) -> Self {
        Self { inner, byte_order }
    }

    pub fn byte_order(&self) -> SourceByteOrder {
        self.byte_order
    }

    /// Returns the current read position in bytes.
    pub fn position(&mut self) -> Nvx2Result<u64> {
        self.inner
            .stream_position()
            .map_err(|e| Nvx2Error::from_read(e, "stream position"))
    }

    /// Moves the read position to `pos` bytes from the start of the stream.
    pub fn set_position(&mut self, pos: u64) -> Nvx2Result<()> {
        self.inner
            .seek(SeekFrom::Start(pos))
            .map_err(|e| Nvx2Error::from_read(e, "seek"))?;
        Ok(())
    }

    /// Total length of the stream. The read position is preserved.
    pub fn stream_len(&mut self) -> Nvx2Result<u64> {
        let pos = self.position()?;
        let len = self
            .inner
            .seek(SeekFrom::End(0))
            .map_err(|e| Nvx2Error::from_read(e, "stream length"))?;
        self.set_position(pos)?;
        Ok(len)
    }

    /// Reads exactly `out.len()` bytes.
    ///
    /// # Errors
    ///
    /// Returns `Nvx2Error::TruncatedInput` if the stream ends first.
    pub fn decode_bytes(&mut self, out: &mut [u8], what: &str) -> Nvx2Result<()> {
        self.inner
            .read_exact(out)
            .map_err(|e| Nvx2Error::from_read(e, what))
    }

    /// Reads a u32 and converts it to host order.
    pub fn decode_u32(&mut self, what: &str) -> Nvx2Result<u32> {
        let value = match self.byte_order {
            SourceByteOrder::LittleEndian => self.inner.read_u32::<LittleEndian>(),
            SourceByteOrder::BigEndian => self.inner.read_u32::<BigEndian>(),
        };
        value.map_err(|e| Nvx2Error::from_read(e, what))
    }

    /// Reads `len` bytes verbatim.
    pub fn decode_block(&mut self, len: usize, what: &str) -> Nvx2Result<Vec<u8>> {
        let mut block = vec![0u8; len];
        self.decode_bytes(&mut block, what)?;
        Ok(block)
    }

    /// Reads `count` 32-bit words verbatim into float storage.
    ///
    /// The words are not normalized; mixed layouts such as vertex blocks
    /// need per-component conversion.
    pub fn decode_f32_block(&mut self, count: usize, what: &str) -> Nvx2Result<Vec<f32>> {
        let mut block = vec![0.0f32; count];
        self.decode_bytes(bytemuck::cast_slice_mut(&mut block), what)?;
        Ok(block)
    }

    /// Reads `count` u16 values and converts them to host order.
    pub fn decode_u16_block(&mut self, count: usize, what: &str) -> Nvx2Result<Vec<u16>> {
        let mut block = vec![0u16; count];
        self.decode_bytes(bytemuck::cast_slice_mut(&mut block), what)?;
        self.byte_order.normalize_u16_slice(&mut block);
        Ok(block)
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
