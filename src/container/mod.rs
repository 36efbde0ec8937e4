mod apng;
mod frame;
mod metadata;
mod png;

use std::io::{ErrorKind, Read, Write};

pub use apng::Apng;
pub use frame::{Frame, FramePayload};
pub use metadata::Metadata;
pub use png::Png;

use crate::chunks::{Chunk, ChunkType, DecodeChunk, ImageEnd, ImageHeader, RawChunk};
use crate::utils::error::{ApngError, ApngResult};

pub const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn read_signature<R: Read>(reader: &mut R) -> ApngResult<()> {
    let mut signature = [0u8; 8];

    match reader.read_exact(&mut signature) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Err(ApngError::SignatureMismatch),
        Err(e) => return Err(e.into()),
    }

    if signature != SIGNATURE {
        return Err(ApngError::SignatureMismatch);
    }

    Ok(())
}

/// Reads the signature and the header, then passes every chunk up to the
/// end marker to `handle`. The end marker itself is consumed here.
fn read_stream<R, F>(reader: &mut R, mut handle: F) -> ApngResult<ImageHeader>
where
    R: Read,
    F: FnMut(&ImageHeader, RawChunk) -> ApngResult<()>,
{
    read_signature(reader)?;

    let header = match RawChunk::read_from(reader)? {
        Some(chunk) if chunk.chunk_type() == ChunkType::IHDR => ImageHeader::decode(chunk.data())?,
        Some(chunk) => {
            log::debug!("Stream starts with {} instead of IHDR", chunk.chunk_type());
            return Err(ApngError::MissingRequiredChunk(ChunkType::IHDR));
        }
        None => return Err(ApngError::MissingRequiredChunk(ChunkType::IHDR)),
    };

    log::debug!(
        "IHDR: {}x{}, bit depth {}, {:?}",
        header.width,
        header.height,
        header.bit_depth,
        header.color_type
    );

    loop {
        let chunk = RawChunk::read_from(reader)?.ok_or(ApngError::MissingRequiredChunk(ChunkType::IEND))?;

        match chunk.chunk_type() {
            ChunkType::IHDR => return Err(ApngError::DuplicateChunk(ChunkType::IHDR)),
            ChunkType::IEND => {
                ImageEnd::decode(chunk.data())?;
                break;
            }
            _ => handle(&header, chunk)?,
        }
    }

    Ok(header)
}

fn write_head<W: Write>(writer: &mut W, header: &ImageHeader) -> ApngResult<()> {
    writer.write_all(&SIGNATURE)?;
    header.to_raw().write_to(writer)
}

fn write_end<W: Write>(writer: &mut W) -> ApngResult<()> {
    ImageEnd.to_raw().write_to(writer)
}
