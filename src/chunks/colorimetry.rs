use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::chunks::{validate_keyword, warn_trailing, Chunk, ChunkType, DecodeChunk};
use crate::utils::bytes::{string_to_latin1, ByteReader, ByteWriter};
use crate::utils::error::{ApngError, ApngResult};

/// cHRM. Values are stored as the chunk stores them, scaled by 100000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chromaticities {
    pub white_point_x: u32,
    pub white_point_y: u32,
    pub red_x: u32,
    pub red_y: u32,
    pub green_x: u32,
    pub green_y: u32,
    pub blue_x: u32,
    pub blue_y: u32,
}

impl Chromaticities {
    pub fn white_point(&self) -> (f32, f32) {
        (self.white_point_x as f32 / 100000.0, self.white_point_y as f32 / 100000.0)
    }
}

impl Chunk for Chromaticities {
    const TYPE: ChunkType = ChunkType::CHRM;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_u32(self.white_point_x)
            .write_u32(self.white_point_y)
            .write_u32(self.red_x)
            .write_u32(self.red_y)
            .write_u32(self.green_x)
            .write_u32(self.green_y)
            .write_u32(self.blue_x)
            .write_u32(self.blue_y);
    }
}

impl DecodeChunk for Chromaticities {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let chrm = Chromaticities {
            white_point_x: reader.read_u32()?,
            white_point_y: reader.read_u32()?,
            red_x: reader.read_u32()?,
            red_y: reader.read_u32()?,
            green_x: reader.read_u32()?,
            green_y: reader.read_u32()?,
            blue_x: reader.read_u32()?,
            blue_y: reader.read_u32()?,
        };
        warn_trailing(&reader, Self::TYPE);

        Ok(chrm)
    }
}

/// gAMA, scaled by 100000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gamma(pub u32);

impl Gamma {
    pub fn value(&self) -> f32 {
        self.0 as f32 / 100000.0
    }
}

impl Chunk for Gamma {
    const TYPE: ChunkType = ChunkType::GAMA;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_u32(self.0);
    }
}

impl DecodeChunk for Gamma {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);
        let gamma = Gamma(reader.read_u32()?);
        warn_trailing(&reader, Self::TYPE);

        Ok(gamma)
    }
}

/// iCCP. The profile stays compressed; [`IccProfile::profile`] inflates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IccProfile {
    pub name: String,
    pub compression_method: u8,
    pub compressed_profile: Vec<u8>,
}

impl IccProfile {
    pub fn new(name: impl Into<String>, profile: &[u8]) -> ApngResult<Self> {
        Ok(IccProfile {
            name: name.into(),
            compression_method: 0,
            compressed_profile: deflate(profile)?,
        })
    }

    pub fn profile(&self) -> ApngResult<Vec<u8>> {
        inflate(Self::TYPE, self.compression_method, &self.compressed_profile)
    }
}

impl Chunk for IccProfile {
    const TYPE: ChunkType = ChunkType::ICCP;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_null_terminated(&string_to_latin1(&self.name))
            .write_u8(self.compression_method)
            .write_bytes(&self.compressed_profile);
    }
}

impl DecodeChunk for IccProfile {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let name = validate_keyword(Self::TYPE, reader.read_null_terminated()?)?;
        let compression_method = reader.read_u8()?;
        let compressed_profile = reader.read_rest().to_vec();

        Ok(IccProfile { name, compression_method, compressed_profile })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderingIntent {
    Perceptual = 0,
    RelativeColorimetric = 1,
    Saturation = 2,
    AbsoluteColorimetric = 3,
}

impl TryFrom<u8> for RenderingIntent {
    type Error = ApngError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RenderingIntent::Perceptual),
            1 => Ok(RenderingIntent::RelativeColorimetric),
            2 => Ok(RenderingIntent::Saturation),
            3 => Ok(RenderingIntent::AbsoluteColorimetric),
            _ => Err(ApngError::InvalidEnumeration { field: "rendering intent", value }),
        }
    }
}

/// sRGB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardRgb {
    pub intent: RenderingIntent,
}

impl Chunk for StandardRgb {
    const TYPE: ChunkType = ChunkType::SRGB;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_u8(self.intent as u8);
    }
}

impl DecodeChunk for StandardRgb {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);
        let intent = RenderingIntent::try_from(reader.read_u8()?)?;
        warn_trailing(&reader, Self::TYPE);

        Ok(StandardRgb { intent })
    }
}

/// Inflates a zlib stream stored in a chunk. Only compression method 0 exists.
pub(crate) fn inflate(chunk_type: ChunkType, method: u8, data: &[u8]) -> ApngResult<Vec<u8>> {
    if method != 0 {
        return Err(ApngError::invalid_data(
            chunk_type,
            format!("unknown compression method {}", method),
        ));
    }

    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| ApngError::invalid_data(chunk_type, format!("corrupt compressed data: {}", e)))?;

    Ok(out)
}

pub(crate) fn deflate(data: &[u8]) -> ApngResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icc_profile_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let profile = IccProfile::new("sRGB IEC61966-2.1", b"not really a profile")?;
        let decoded = IccProfile::decode(profile.to_raw().data())?;

        assert_eq!(decoded, profile);
        assert_eq!(decoded.profile()?, b"not really a profile");

        Ok(())
    }

    #[test]
    fn test_rendering_intent_range() {
        assert!(matches!(
            StandardRgb::decode(&[4]),
            Err(ApngError::InvalidEnumeration { value: 4, .. })
        ));
    }

    #[test]
    fn test_gamma_value() -> Result<(), Box<dyn std::error::Error>> {
        let gamma = Gamma::decode(&45455u32.to_be_bytes())?;
        assert!((gamma.value() - 0.45455).abs() < 1e-6);

        Ok(())
    }
}
