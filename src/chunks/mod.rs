mod animation;
mod color;
mod colorimetry;
mod header;
mod misc;
mod palette;
mod raw;
mod text;

use std::fmt::{self, Debug, Display, Formatter};

pub use animation::{AnimationControl, BlendOp, DisposeOp, FrameControl, FrameDataChunk};
pub use color::{Background, SignificantBits, Transparency};
pub use colorimetry::{Chromaticities, Gamma, IccProfile, RenderingIntent, StandardRgb};
pub use header::{ColorType, ImageData, ImageEnd, ImageHeader};
pub use misc::{PhysicalDimensions, PhysicalUnit, Timestamp};
pub use palette::{Histogram, Palette, SuggestedPalette, SuggestedPaletteEntry};
pub use raw::RawChunk;
pub use text::{CompressedText, InternationalText, Text};

use crate::utils::bytes::{latin1_to_string, ByteReader, ByteWriter};
use crate::utils::error::{ApngError, ApngResult};

/// Four-byte chunk tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    // Critical chunks
    pub const IHDR: ChunkType = ChunkType(*b"IHDR"); // Image header
    pub const PLTE: ChunkType = ChunkType(*b"PLTE"); // Palette
    pub const IDAT: ChunkType = ChunkType(*b"IDAT"); // Image data
    pub const IEND: ChunkType = ChunkType(*b"IEND"); // End of image

    // Ancillary chunks
    pub const TRNS: ChunkType = ChunkType(*b"tRNS"); // Transparency
    pub const CHRM: ChunkType = ChunkType(*b"cHRM"); // Chromaticity
    pub const GAMA: ChunkType = ChunkType(*b"gAMA"); // Gamma
    pub const ICCP: ChunkType = ChunkType(*b"iCCP"); // ICC Profile
    pub const SBIT: ChunkType = ChunkType(*b"sBIT"); // Significant bits
    pub const SRGB: ChunkType = ChunkType(*b"sRGB"); // Standard RGB
    pub const TEXT: ChunkType = ChunkType(*b"tEXt"); // Text
    pub const ZTXT: ChunkType = ChunkType(*b"zTXt"); // Compressed text
    pub const ITXT: ChunkType = ChunkType(*b"iTXt"); // International text
    pub const BKGD: ChunkType = ChunkType(*b"bKGD"); // Background color
    pub const PHYS: ChunkType = ChunkType(*b"pHYs"); // Physical dimensions
    pub const TIME: ChunkType = ChunkType(*b"tIME"); // Last modification time
    pub const SPLT: ChunkType = ChunkType(*b"sPLT"); // Suggested palette
    pub const HIST: ChunkType = ChunkType(*b"hIST"); // Palette histogram

    // Animation chunks
    pub const ACTL: ChunkType = ChunkType(*b"acTL"); // Animation control
    pub const FCTL: ChunkType = ChunkType(*b"fcTL"); // Frame control
    pub const FDAT: ChunkType = ChunkType(*b"fdAT"); // Frame data

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Critical chunks have an uppercase first letter.
    pub fn is_critical(&self) -> bool {
        self.0[0] & 0x20 == 0
    }

    pub fn is_public(&self) -> bool {
        self.0[1] & 0x20 == 0
    }

    pub fn is_safe_to_copy(&self) -> bool {
        self.0[3] & 0x20 != 0
    }
}

impl Display for ChunkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl Debug for ChunkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

impl From<[u8; 4]> for ChunkType {
    fn from(tag: [u8; 4]) -> Self {
        ChunkType(tag)
    }
}

/// A typed chunk that knows its tag and how to lay out its payload.
pub trait Chunk {
    const TYPE: ChunkType;

    fn write_payload(&self, out: &mut ByteWriter);

    fn to_raw(&self) -> RawChunk {
        let mut out = ByteWriter::new();
        self.write_payload(&mut out);
        RawChunk::new(Self::TYPE, out.into_inner())
    }
}

/// Decoding for chunks whose layout does not depend on other chunks.
pub trait DecodeChunk: Sized {
    fn decode(data: &[u8]) -> ApngResult<Self>;
}

// Keywords and palette names are 1-79 bytes of printable Latin-1.
pub(crate) fn validate_keyword(chunk_type: ChunkType, keyword: &[u8]) -> ApngResult<String> {
    if keyword.is_empty() || keyword.len() > 79 {
        return Err(ApngError::invalid_data(
            chunk_type,
            format!("keyword length {} outside 1..=79", keyword.len()),
        ));
    }

    if let Some(&b) = keyword.iter().find(|&&b| !matches!(b, 32..=126 | 161..=255)) {
        return Err(ApngError::invalid_data(
            chunk_type,
            format!("keyword contains non-printable byte 0x{:02x}", b),
        ));
    }

    Ok(latin1_to_string(keyword))
}

pub(crate) fn warn_trailing(reader: &ByteReader, chunk_type: ChunkType) {
    if !reader.is_empty() {
        log::warn!("{} chunk has {} trailing bytes, ignoring", chunk_type, reader.remaining());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_bits() {
        assert!(ChunkType::IHDR.is_critical());
        assert!(!ChunkType::TEXT.is_critical());
        assert!(ChunkType::IHDR.is_public());
        assert!(ChunkType::TEXT.is_public());
        assert!(!ChunkType::ACTL.is_public());
        assert!(!ChunkType(*b"prVt").is_public());
        assert!(ChunkType::TEXT.is_safe_to_copy());
        assert!(!ChunkType::IDAT.is_safe_to_copy());
    }

    #[test]
    fn test_keyword_validation() {
        assert_eq!(validate_keyword(ChunkType::TEXT, b"Title").ok(), Some("Title".to_string()));
        assert!(validate_keyword(ChunkType::TEXT, b"").is_err());
        assert!(validate_keyword(ChunkType::TEXT, b"Bad\nKey").is_err());
        assert!(validate_keyword(ChunkType::TEXT, &[b'a'; 80]).is_err());
    }

    #[test]
    fn test_display_escapes_binary_tags() {
        assert_eq!(ChunkType::FDAT.to_string(), "fdAT");
        assert_eq!(ChunkType([b'a', 0, b'b', b'c']).to_string(), "a\\x00bc");
    }
}
