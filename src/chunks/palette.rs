use crate::chunks::{validate_keyword, Chunk, ChunkType, DecodeChunk};
use crate::utils::bytes::{string_to_latin1, ByteReader, ByteWriter};
use crate::utils::error::{ApngError, ApngResult};

/// PLTE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub entries: Vec<[u8; 3]>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Chunk for Palette {
    const TYPE: ChunkType = ChunkType::PLTE;

    fn write_payload(&self, out: &mut ByteWriter) {
        for entry in &self.entries {
            out.write_bytes(entry);
        }
    }
}

impl DecodeChunk for Palette {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        if data.len() % 3 != 0 {
            return Err(ApngError::invalid_data(
                Self::TYPE,
                format!("length {} is not a multiple of 3", data.len()),
            ));
        }

        let count = data.len() / 3;
        if count == 0 || count > 256 {
            return Err(ApngError::invalid_data(
                Self::TYPE,
                format!("{} entries, expected 1..=256", count),
            ));
        }

        let entries = data
            .chunks_exact(3)
            .map(|rgb| [rgb[0], rgb[1], rgb[2]])
            .collect();

        Ok(Palette { entries })
    }
}

/// hIST. One frequency per palette entry; the count is checked against the
/// palette during container validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    pub frequencies: Vec<u16>,
}

impl Chunk for Histogram {
    const TYPE: ChunkType = ChunkType::HIST;

    fn write_payload(&self, out: &mut ByteWriter) {
        for &frequency in &self.frequencies {
            out.write_u16(frequency);
        }
    }
}

impl DecodeChunk for Histogram {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        if data.len() % 2 != 0 {
            return Err(ApngError::invalid_data(
                Self::TYPE,
                format!("length {} is not a multiple of 2", data.len()),
            ));
        }

        let frequencies = data
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();

        Ok(Histogram { frequencies })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedPaletteEntry {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub alpha: u16,
    pub frequency: u16,
}

/// sPLT. With a sample depth of 8 the color samples are stored as single
/// bytes; they are widened to `u16` here and narrowed again on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedPalette {
    pub name: String,
    pub sample_depth: u8,
    pub entries: Vec<SuggestedPaletteEntry>,
}

impl SuggestedPalette {
    fn entry_size(sample_depth: u8) -> usize {
        if sample_depth == 8 { 6 } else { 10 }
    }
}

impl Chunk for SuggestedPalette {
    const TYPE: ChunkType = ChunkType::SPLT;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_null_terminated(&string_to_latin1(&self.name))
            .write_u8(self.sample_depth);

        for entry in &self.entries {
            if self.sample_depth == 8 {
                out.write_u8(entry.red as u8)
                    .write_u8(entry.green as u8)
                    .write_u8(entry.blue as u8)
                    .write_u8(entry.alpha as u8);
            } else {
                out.write_u16(entry.red)
                    .write_u16(entry.green)
                    .write_u16(entry.blue)
                    .write_u16(entry.alpha);
            }
            out.write_u16(entry.frequency);
        }
    }
}

impl DecodeChunk for SuggestedPalette {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let name = validate_keyword(Self::TYPE, reader.read_null_terminated()?)?;
        let sample_depth = reader.read_u8()?;

        if sample_depth != 8 && sample_depth != 16 {
            return Err(ApngError::invalid_data(
                Self::TYPE,
                format!("sample depth {} must be 8 or 16", sample_depth),
            ));
        }

        let entry_size = Self::entry_size(sample_depth);
        if reader.remaining() % entry_size != 0 {
            return Err(ApngError::invalid_data(
                Self::TYPE,
                format!("{} bytes of entries is not a multiple of {}", reader.remaining(), entry_size),
            ));
        }

        let mut entries = Vec::with_capacity(reader.remaining() / entry_size);
        while !reader.is_empty() {
            let (red, green, blue, alpha) = if sample_depth == 8 {
                (
                    reader.read_u8()? as u16,
                    reader.read_u8()? as u16,
                    reader.read_u8()? as u16,
                    reader.read_u8()? as u16,
                )
            } else {
                (reader.read_u16()?, reader.read_u16()?, reader.read_u16()?, reader.read_u16()?)
            };
            let frequency = reader.read_u16()?;

            entries.push(SuggestedPaletteEntry { red, green, blue, alpha, frequency });
        }

        Ok(SuggestedPalette { name, sample_depth, entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_length_checks() {
        assert!(matches!(Palette::decode(&[1, 2, 3, 4]), Err(ApngError::InvalidChunkData { .. })));
        assert!(matches!(Palette::decode(&[0; 257 * 3]), Err(ApngError::InvalidChunkData { .. })));
        assert_eq!(Palette::decode(&[1, 2, 3, 4, 5, 6]).map(|p| p.len()).ok(), Some(2));
    }

    #[test]
    fn test_suggested_palette_depth_8() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"ramp\0\x08\x10\x20\x30\xff\x00\x07";
        let palette = SuggestedPalette::decode(data)?;

        assert_eq!(palette.name, "ramp");
        assert_eq!(palette.entries.len(), 1);
        assert_eq!(palette.entries[0].green, 0x20);
        assert_eq!(palette.entries[0].frequency, 7);
        assert_eq!(palette.to_raw().data(), &data[..]);

        Ok(())
    }

    #[test]
    fn test_suggested_palette_rejects_depth() {
        assert!(matches!(
            SuggestedPalette::decode(b"ramp\0\x04"),
            Err(ApngError::InvalidChunkData { .. })
        ));
    }

    #[test]
    fn test_histogram_odd_length() {
        assert!(Histogram::decode(&[0, 1, 2]).is_err());
    }
}
