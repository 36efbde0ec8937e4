use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::chunks::{Chunk, ChunkType, DecodeChunk, ImageData, ImageHeader};
use crate::container::{read_stream, write_end, write_head, Metadata};
use crate::utils::error::{ApngError, ApngResult};

/// A still image: header, metadata and the compressed image data, kept
/// opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct Png {
    pub header: ImageHeader,
    pub metadata: Metadata,
    pub image_data: Vec<ImageData>,
}

impl Png {
    pub fn new(header: ImageHeader, metadata: Metadata, image_data: Vec<ImageData>) -> Self {
        Png { header, metadata, image_data }
    }

    /// Reads and validates a complete stream. Animation chunks are not
    /// interpreted and end up with the other unknown chunks.
    pub fn from_reader<R: Read>(reader: &mut R) -> ApngResult<Self> {
        let mut metadata = Metadata::default();
        let mut image_data = Vec::new();

        let header = read_stream(reader, |header, chunk| {
            if chunk.chunk_type() == ChunkType::IDAT {
                image_data.push(ImageData::decode(chunk.data())?);
                Ok(())
            } else {
                metadata.read_chunk(header, chunk)
            }
        })?;

        let png = Png { header, metadata, image_data };
        png.validate()?;

        Ok(png)
    }

    pub fn from_bytes(bytes: &[u8]) -> ApngResult<Self> {
        Self::from_reader(&mut Cursor::new(bytes))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> ApngResult<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::from_reader(&mut reader)
    }

    pub fn validate(&self) -> ApngResult<()> {
        if self.image_data.is_empty() {
            return Err(ApngError::MissingRequiredChunk(ChunkType::IDAT));
        }

        self.metadata.validate(&self.header)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> ApngResult<()> {
        write_head(writer, &self.header)?;
        self.metadata.write_to(writer)?;

        for data in &self.image_data {
            data.to_raw().write_to(writer)?;
        }

        write_end(writer)
    }

    pub fn to_bytes(&self) -> ApngResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> ApngResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Concatenation of all IDAT payloads, i.e. the whole zlib stream.
    pub fn compressed_data(&self) -> Vec<u8> {
        self.image_data.iter().flat_map(|d| d.data().iter().copied()).collect()
    }

    /// Decodes the pixels into an RGBA bitmap using the `image` crate.
    pub fn to_rgba_image(&self) -> ApngResult<RgbaImage> {
        let bytes = self.to_bytes()?;
        let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?;
        Ok(image.to_rgba8())
    }

    /// Encodes an RGBA bitmap with the `image` crate and reads the result back.
    pub fn from_rgba_image(image: &RgbaImage) -> ApngResult<Self> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Self::from_bytes(&bytes)
    }
}
