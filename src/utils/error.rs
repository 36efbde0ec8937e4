use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;

use crate::chunks::ChunkType;

#[derive(Debug)]
pub enum ApngError {
    IoError(io::Error),
    ImageError(image::ImageError),
    SignatureMismatch,
    CrcMismatch { chunk_type: ChunkType, expected: u32, calculated: u32 },
    DuplicateChunk(ChunkType),
    OutOfOrderChunk { chunk_type: ChunkType, reason: &'static str },
    UnsupportedColorModel { chunk_type: ChunkType, color_type: u8 },
    InvalidFrameGeometry { x_offset: u32, y_offset: u32, width: u32, height: u32, canvas_width: u32, canvas_height: u32 },
    InvalidEnumeration { field: &'static str, value: u8 },
    MissingRequiredChunk(ChunkType),
    FrameCountMismatch { declared: u32, actual: usize },
    BufferTooShort { offset: usize, needed: usize, available: usize },
    FrameOutOfRange { index: usize, count: usize },
    InvalidChunkData { chunk_type: ChunkType, reason: String },
}

impl Error for ApngError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApngError::IoError(err) => Some(err),
            ApngError::ImageError(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for ApngError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ApngError::IoError(err) => write!(f, "I/O error: {}", err),
            ApngError::ImageError(err) => write!(f, "Pixel codec error: {}", err),
            ApngError::SignatureMismatch => write!(f, "PNG signature not found"),
            ApngError::CrcMismatch { chunk_type, expected, calculated } => write!(
                f,
                "CRC mismatch for chunk {}: expected 0x{:08x}, calculated 0x{:08x}",
                chunk_type, expected, calculated
            ),
            ApngError::DuplicateChunk(chunk_type) => {
                write!(f, "{} chunk encountered more than once", chunk_type)
            }
            ApngError::OutOfOrderChunk { chunk_type, reason } => {
                write!(f, "{} chunk encountered out of order: {}", chunk_type, reason)
            }
            ApngError::UnsupportedColorModel { chunk_type, color_type } => {
                write!(f, "Color type {} is not supported by {} chunk", color_type, chunk_type)
            }
            ApngError::InvalidFrameGeometry { x_offset, y_offset, width, height, canvas_width, canvas_height } => write!(
                f,
                "Frame {}x{} at ({}, {}) does not fit inside {}x{} image",
                width, height, x_offset, y_offset, canvas_width, canvas_height
            ),
            ApngError::InvalidEnumeration { field, value } => write!(f, "Invalid {}: {}", field, value),
            ApngError::MissingRequiredChunk(chunk_type) => write!(f, "Required chunk {} is missing", chunk_type),
            ApngError::FrameCountMismatch { declared, actual } => write!(
                f,
                "acTL declares {} frames but {} frames are present",
                declared, actual
            ),
            ApngError::BufferTooShort { offset, needed, available } => write!(
                f,
                "Buffer is not long enough to read {} bytes at offset {} ({} available)",
                needed, offset, available
            ),
            ApngError::FrameOutOfRange { index, count } => {
                write!(f, "Frame index {} out of range ({} frames)", index, count)
            }
            ApngError::InvalidChunkData { chunk_type, reason } => {
                write!(f, "Invalid {} chunk: {}", chunk_type, reason)
            }
        }
    }
}

impl From<io::Error> for ApngError {
    fn from(error: io::Error) -> Self {
        ApngError::IoError(error)
    }
}

impl From<image::ImageError> for ApngError {
    fn from(error: image::ImageError) -> Self {
        ApngError::ImageError(error)
    }
}

impl ApngError {
    pub(crate) fn invalid_data(chunk_type: ChunkType, reason: impl Into<String>) -> Self {
        ApngError::InvalidChunkData { chunk_type, reason: reason.into() }
    }
}

// Result type alias for codec operations
pub type ApngResult<T> = Result<T, ApngError>;
