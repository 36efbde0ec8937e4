use crate::chunks::{warn_trailing, Chunk, ChunkType, ColorType, Palette};
use crate::utils::bytes::{ByteReader, ByteWriter};
use crate::utils::error::{ApngError, ApngResult};

/// tRNS. The layout is chosen by the header's color type; color types with
/// an alpha channel cannot carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transparency {
    Grayscale(u16),
    RGB { red: u16, green: u16, blue: u16 },
    Indexed(Vec<u8>),
}

impl Transparency {
    pub fn decode(data: &[u8], color_type: ColorType, palette: Option<&Palette>) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let transparency = match color_type {
            ColorType::Grayscale => Transparency::Grayscale(reader.read_u16()?),
            ColorType::RGB => Transparency::RGB {
                red: reader.read_u16()?,
                green: reader.read_u16()?,
                blue: reader.read_u16()?,
            },
            ColorType::Indexed => {
                let palette = palette.ok_or(ApngError::MissingRequiredChunk(ChunkType::PLTE))?;
                let alphas = reader.read_rest();

                if alphas.len() > palette.len() {
                    return Err(ApngError::invalid_data(
                        ChunkType::TRNS,
                        format!("{} alpha values for {} palette entries", alphas.len(), palette.len()),
                    ));
                }

                Transparency::Indexed(alphas.to_vec())
            }
            ColorType::GrayscaleAlpha | ColorType::RGBA => {
                return Err(ApngError::UnsupportedColorModel {
                    chunk_type: ChunkType::TRNS,
                    color_type: color_type as u8,
                });
            }
        };
        warn_trailing(&reader, ChunkType::TRNS);

        Ok(transparency)
    }

    pub fn matches(&self, color_type: ColorType) -> bool {
        matches!(
            (self, color_type),
            (Transparency::Grayscale(_), ColorType::Grayscale)
                | (Transparency::RGB { .. }, ColorType::RGB)
                | (Transparency::Indexed(_), ColorType::Indexed)
        )
    }
}

impl Chunk for Transparency {
    const TYPE: ChunkType = ChunkType::TRNS;

    fn write_payload(&self, out: &mut ByteWriter) {
        match self {
            Transparency::Grayscale(gray) => {
                out.write_u16(*gray);
            }
            Transparency::RGB { red, green, blue } => {
                out.write_u16(*red).write_u16(*green).write_u16(*blue);
            }
            Transparency::Indexed(alphas) => {
                out.write_bytes(alphas);
            }
        }
    }
}

/// sBIT, one variant per color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignificantBits {
    Grayscale { gray: u8 },
    RGB { red: u8, green: u8, blue: u8 },
    Indexed { red: u8, green: u8, blue: u8 },
    GrayscaleAlpha { gray: u8, alpha: u8 },
    RGBA { red: u8, green: u8, blue: u8, alpha: u8 },
}

impl SignificantBits {
    pub fn decode(data: &[u8], color_type: ColorType) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let bits = match color_type {
            ColorType::Grayscale => SignificantBits::Grayscale { gray: reader.read_u8()? },
            ColorType::RGB => SignificantBits::RGB {
                red: reader.read_u8()?,
                green: reader.read_u8()?,
                blue: reader.read_u8()?,
            },
            ColorType::Indexed => SignificantBits::Indexed {
                red: reader.read_u8()?,
                green: reader.read_u8()?,
                blue: reader.read_u8()?,
            },
            ColorType::GrayscaleAlpha => SignificantBits::GrayscaleAlpha {
                gray: reader.read_u8()?,
                alpha: reader.read_u8()?,
            },
            ColorType::RGBA => SignificantBits::RGBA {
                red: reader.read_u8()?,
                green: reader.read_u8()?,
                blue: reader.read_u8()?,
                alpha: reader.read_u8()?,
            },
        };
        warn_trailing(&reader, ChunkType::SBIT);

        Ok(bits)
    }

    pub fn matches(&self, color_type: ColorType) -> bool {
        let expected = match self {
            SignificantBits::Grayscale { .. } => ColorType::Grayscale,
            SignificantBits::RGB { .. } => ColorType::RGB,
            SignificantBits::Indexed { .. } => ColorType::Indexed,
            SignificantBits::GrayscaleAlpha { .. } => ColorType::GrayscaleAlpha,
            SignificantBits::RGBA { .. } => ColorType::RGBA,
        };
        expected == color_type
    }
}

impl Chunk for SignificantBits {
    const TYPE: ChunkType = ChunkType::SBIT;

    fn write_payload(&self, out: &mut ByteWriter) {
        match *self {
            SignificantBits::Grayscale { gray } => {
                out.write_u8(gray);
            }
            SignificantBits::RGB { red, green, blue } | SignificantBits::Indexed { red, green, blue } => {
                out.write_u8(red).write_u8(green).write_u8(blue);
            }
            SignificantBits::GrayscaleAlpha { gray, alpha } => {
                out.write_u8(gray).write_u8(alpha);
            }
            SignificantBits::RGBA { red, green, blue, alpha } => {
                out.write_u8(red).write_u8(green).write_u8(blue).write_u8(alpha);
            }
        }
    }
}

/// bKGD. Grayscale layouts are shared by color types 0 and 4, RGB layouts by
/// 2 and 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Grayscale(u16),
    RGB { red: u16, green: u16, blue: u16 },
    PaletteIndex(u8),
}

impl Background {
    pub fn decode(data: &[u8], color_type: ColorType, palette: Option<&Palette>) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let background = match color_type {
            ColorType::Grayscale | ColorType::GrayscaleAlpha => Background::Grayscale(reader.read_u16()?),
            ColorType::RGB | ColorType::RGBA => Background::RGB {
                red: reader.read_u16()?,
                green: reader.read_u16()?,
                blue: reader.read_u16()?,
            },
            ColorType::Indexed => {
                let palette = palette.ok_or(ApngError::MissingRequiredChunk(ChunkType::PLTE))?;
                let index = reader.read_u8()?;

                if index as usize >= palette.len() {
                    return Err(ApngError::invalid_data(
                        ChunkType::BKGD,
                        format!("palette index {} out of range ({} entries)", index, palette.len()),
                    ));
                }

                Background::PaletteIndex(index)
            }
        };
        warn_trailing(&reader, ChunkType::BKGD);

        Ok(background)
    }

    pub fn matches(&self, color_type: ColorType) -> bool {
        matches!(
            (self, color_type),
            (Background::Grayscale(_), ColorType::Grayscale | ColorType::GrayscaleAlpha)
                | (Background::RGB { .. }, ColorType::RGB | ColorType::RGBA)
                | (Background::PaletteIndex(_), ColorType::Indexed)
        )
    }
}

impl Chunk for Background {
    const TYPE: ChunkType = ChunkType::BKGD;

    fn write_payload(&self, out: &mut ByteWriter) {
        match *self {
            Background::Grayscale(gray) => {
                out.write_u16(gray);
            }
            Background::RGB { red, green, blue } => {
                out.write_u16(red).write_u16(green).write_u16(blue);
            }
            Background::PaletteIndex(index) => {
                out.write_u8(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(n: usize) -> Palette {
        Palette { entries: vec![[0, 0, 0]; n] }
    }

    #[test]
    fn test_transparency_rgb_order() -> Result<(), Box<dyn std::error::Error>> {
        let data = [0, 1, 0, 2, 0, 3];
        let trns = Transparency::decode(&data, ColorType::RGB, None)?;

        assert_eq!(trns, Transparency::RGB { red: 1, green: 2, blue: 3 });
        assert_eq!(trns.to_raw().data(), &data);

        Ok(())
    }

    #[test]
    fn test_transparency_alpha_color_types() {
        for color_type in [ColorType::GrayscaleAlpha, ColorType::RGBA] {
            match Transparency::decode(&[0, 0], color_type, None) {
                Err(ApngError::UnsupportedColorModel { chunk_type, .. }) => {
                    assert_eq!(chunk_type, ChunkType::TRNS)
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn test_indexed_requires_palette() {
        assert!(matches!(
            Transparency::decode(&[255], ColorType::Indexed, None),
            Err(ApngError::MissingRequiredChunk(ChunkType::PLTE))
        ));
        assert!(matches!(
            Background::decode(&[0], ColorType::Indexed, None),
            Err(ApngError::MissingRequiredChunk(ChunkType::PLTE))
        ));
    }

    #[test]
    fn test_indexed_range_checks() {
        assert!(Transparency::decode(&[1, 2, 3], ColorType::Indexed, Some(&palette(2))).is_err());
        assert!(Background::decode(&[2], ColorType::Indexed, Some(&palette(2))).is_err());
        assert!(Background::decode(&[1], ColorType::Indexed, Some(&palette(2))).is_ok());
    }

    #[test]
    fn test_significant_bits_layouts() -> Result<(), Box<dyn std::error::Error>> {
        let bits = SignificantBits::decode(&[5, 6], ColorType::GrayscaleAlpha)?;
        assert_eq!(bits, SignificantBits::GrayscaleAlpha { gray: 5, alpha: 6 });
        assert!(bits.matches(ColorType::GrayscaleAlpha));
        assert!(!bits.matches(ColorType::Grayscale));

        assert!(matches!(
            SignificantBits::decode(&[5, 6], ColorType::RGBA),
            Err(ApngError::BufferTooShort { .. })
        ));

        Ok(())
    }

    #[test]
    fn test_background_shared_layouts() -> Result<(), Box<dyn std::error::Error>> {
        let gray = Background::decode(&[0x12, 0x34], ColorType::GrayscaleAlpha, None)?;
        assert_eq!(gray, Background::Grayscale(0x1234));
        assert!(gray.matches(ColorType::Grayscale));

        let rgb = Background::decode(&[0, 1, 0, 2, 0, 3], ColorType::RGBA, None)?;
        assert!(rgb.matches(ColorType::RGB));

        Ok(())
    }
}
