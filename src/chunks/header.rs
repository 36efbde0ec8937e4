use std::sync::Arc;

use crate::chunks::{warn_trailing, Chunk, ChunkType, DecodeChunk};
use crate::utils::bytes::{ByteReader, ByteWriter};
use crate::utils::error::{ApngError, ApngResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorType {
    Grayscale = 0,
    RGB = 2,
    Indexed = 3,
    GrayscaleAlpha = 4,
    RGBA = 6,
}

impl ColorType {
    pub fn from_u8(chunk_type: ChunkType, value: u8) -> ApngResult<Self> {
        match value {
            0 => Ok(ColorType::Grayscale),
            2 => Ok(ColorType::RGB),
            3 => Ok(ColorType::Indexed),
            4 => Ok(ColorType::GrayscaleAlpha),
            6 => Ok(ColorType::RGBA),
            _ => Err(ApngError::UnsupportedColorModel { chunk_type, color_type: value }),
        }
    }

    pub fn channels(&self) -> u8 {
        match self {
            ColorType::Grayscale | ColorType::Indexed => 1,
            ColorType::GrayscaleAlpha => 2,
            ColorType::RGB => 3,
            ColorType::RGBA => 4,
        }
    }

    fn allows_bit_depth(&self, bit_depth: u8) -> bool {
        match self {
            ColorType::Grayscale => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
            ColorType::Indexed => matches!(bit_depth, 1 | 2 | 4 | 8),
            ColorType::RGB | ColorType::GrayscaleAlpha | ColorType::RGBA => matches!(bit_depth, 8 | 16),
        }
    }
}

/// IHDR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub compression_method: u8,
    pub filter_method: u8,
    pub interlace_method: u8,
}

impl ImageHeader {
    /// A non-interlaced header with the default compression and filter methods.
    pub fn new(width: u32, height: u32, bit_depth: u8, color_type: ColorType) -> Self {
        ImageHeader {
            width,
            height,
            bit_depth,
            color_type,
            compression_method: 0,
            filter_method: 0,
            interlace_method: 0,
        }
    }
}

impl Chunk for ImageHeader {
    const TYPE: ChunkType = ChunkType::IHDR;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_u32(self.width)
            .write_u32(self.height)
            .write_u8(self.bit_depth)
            .write_u8(self.color_type as u8)
            .write_u8(self.compression_method)
            .write_u8(self.filter_method)
            .write_u8(self.interlace_method);
    }
}

impl DecodeChunk for ImageHeader {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let width = reader.read_u32()?;
        let height = reader.read_u32()?;
        let bit_depth = reader.read_u8()?;
        let color_type = ColorType::from_u8(Self::TYPE, reader.read_u8()?)?;
        let compression_method = reader.read_u8()?;
        let filter_method = reader.read_u8()?;
        let interlace_method = reader.read_u8()?;
        warn_trailing(&reader, Self::TYPE);

        if width == 0 || height == 0 {
            return Err(ApngError::invalid_data(
                Self::TYPE,
                format!("image dimensions {}x{} must be positive", width, height),
            ));
        }

        if !color_type.allows_bit_depth(bit_depth) {
            return Err(ApngError::invalid_data(
                Self::TYPE,
                format!("bit depth {} not allowed for {:?}", bit_depth, color_type),
            ));
        }

        Ok(ImageHeader {
            width,
            height,
            bit_depth,
            color_type,
            compression_method,
            filter_method,
            interlace_method,
        })
    }
}

/// IDAT. The compressed bytes are reference counted so the default frame
/// of an animation and the container's own image data can share them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    data: Arc<[u8]>,
}

impl ImageData {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        ImageData { data: data.into() }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True when both records point at the same allocation.
    pub fn shares_buffer(&self, other: &ImageData) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Chunk for ImageData {
    const TYPE: ChunkType = ChunkType::IDAT;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_bytes(&self.data);
    }
}

impl DecodeChunk for ImageData {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        Ok(ImageData::new(data))
    }
}

/// IEND
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageEnd;

impl Chunk for ImageEnd {
    const TYPE: ChunkType = ChunkType::IEND;

    fn write_payload(&self, _out: &mut ByteWriter) {}
}

impl DecodeChunk for ImageEnd {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        if !data.is_empty() {
            log::warn!("IEND chunk carries {} bytes of payload, ignoring", data.len());
        }
        Ok(ImageEnd)
    }
}
