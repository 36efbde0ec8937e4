use std::fmt::{self, Debug, Formatter};
use std::io::{ErrorKind, Read, Write};

use crate::chunks::ChunkType;
use crate::utils::crc::crc32;
use crate::utils::error::{ApngError, ApngResult};

/// An untyped chunk: the 4-byte tag and its payload.
///
/// The CRC is not stored. It is verified when reading and recomputed when
/// writing, so a `RawChunk` can never carry a stale checksum.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RawChunk {
    chunk_type: ChunkType,
    data: Vec<u8>,
}

impl Debug for RawChunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawChunk")
            .field("chunk_type", &self.chunk_type)
            .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
            .finish()
    }
}

impl RawChunk {
    pub fn new(chunk_type: ChunkType, data: Vec<u8>) -> Self {
        RawChunk { chunk_type, data }
    }

    pub fn chunk_type(&self) -> ChunkType {
        self.chunk_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn crc(&self) -> u32 {
        crc32(&[&self.chunk_type.0, &self.data])
    }

    /// Reads one `[length][type][data][crc]` record and verifies its CRC.
    ///
    /// Returns `Ok(None)` when the stream ends exactly on a chunk boundary.
    /// A stream that ends anywhere inside a chunk is `BufferTooShort`.
    pub fn read_from<R: Read>(reader: &mut R) -> ApngResult<Option<RawChunk>> {
        let mut length_bytes = [0u8; 4];
        match read_full(reader, &mut length_bytes)? {
            0 => return Ok(None),
            4 => {}
            n => return Err(ApngError::BufferTooShort { offset: 0, needed: 4, available: n }),
        }
        let length = u32::from_be_bytes(length_bytes) as usize;

        let mut type_bytes = [0u8; 4];
        let n = read_full(reader, &mut type_bytes)?;
        if n < 4 {
            return Err(ApngError::BufferTooShort { offset: 4, needed: 4, available: n });
        }
        let chunk_type = ChunkType(type_bytes);

        // Bounded by what the stream really holds, so a corrupted length
        // cannot force a huge allocation up front.
        let mut data = Vec::new();
        reader.by_ref().take(length as u64).read_to_end(&mut data)?;
        if data.len() < length {
            return Err(ApngError::BufferTooShort { offset: 8, needed: length, available: data.len() });
        }

        let mut crc_bytes = [0u8; 4];
        let n = read_full(reader, &mut crc_bytes)?;
        if n < 4 {
            return Err(ApngError::BufferTooShort { offset: 8 + length, needed: 4, available: n });
        }
        let expected = u32::from_be_bytes(crc_bytes);

        let chunk = RawChunk { chunk_type, data };
        let calculated = chunk.crc();

        if calculated != expected {
            return Err(ApngError::CrcMismatch { chunk_type, expected, calculated });
        }

        log::debug!("Read {} chunk ({} bytes)", chunk_type, length);

        Ok(Some(chunk))
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> ApngResult<()> {
        writer.write_all(&(self.data.len() as u32).to_be_bytes())?;
        writer.write_all(&self.chunk_type.0)?;
        writer.write_all(&self.data)?;
        writer.write_all(&self.crc().to_be_bytes())?;

        Ok(())
    }
}

// Like `read_exact`, but reports how many bytes were available instead of
// failing on a short read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> ApngResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
