use std::io::Write;

use crate::chunks::{
    Background, Chromaticities, Chunk, ChunkType, ColorType, CompressedText, DecodeChunk, Gamma, Histogram,
    IccProfile, ImageHeader, InternationalText, Palette, PhysicalDimensions, RawChunk, SignificantBits,
    StandardRgb, SuggestedPalette, Text, Timestamp, Transparency,
};
use crate::utils::error::{ApngError, ApngResult};

/// Every ancillary record of an image plus the palette, and any chunk the
/// codec does not recognize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub palette: Option<Palette>,
    pub transparency: Option<Transparency>,
    pub chromaticities: Option<Chromaticities>,
    pub gamma: Option<Gamma>,
    pub icc_profile: Option<IccProfile>,
    pub significant_bits: Option<SignificantBits>,
    pub srgb: Option<StandardRgb>,
    pub background: Option<Background>,
    pub histogram: Option<Histogram>,
    pub physical_dimensions: Option<PhysicalDimensions>,
    pub suggested_palette: Option<SuggestedPalette>,
    pub time: Option<Timestamp>,
    pub texts: Vec<Text>,
    pub compressed_texts: Vec<CompressedText>,
    pub international_texts: Vec<InternationalText>,
    /// Unrecognized chunks in the order they were read.
    pub unknown_chunks: Vec<RawChunk>,
}

fn set_once<T, F>(slot: &mut Option<T>, chunk_type: ChunkType, decode: F) -> ApngResult<()>
where
    F: FnOnce() -> ApngResult<T>,
{
    if slot.is_some() {
        return Err(ApngError::DuplicateChunk(chunk_type));
    }

    *slot = Some(decode()?);

    Ok(())
}

fn write_optional<W: Write, C: Chunk>(writer: &mut W, chunk: &Option<C>) -> ApngResult<()> {
    match chunk {
        Some(chunk) => chunk.to_raw().write_to(writer),
        None => Ok(()),
    }
}

impl Metadata {
    /// Folds one chunk into the metadata. Color dependent records are
    /// decoded against `header` and any palette read so far.
    pub fn read_chunk(&mut self, header: &ImageHeader, chunk: RawChunk) -> ApngResult<()> {
        let data = chunk.data();
        let color_type = header.color_type;

        match chunk.chunk_type() {
            ChunkType::PLTE => set_once(&mut self.palette, ChunkType::PLTE, || Palette::decode(data))?,
            ChunkType::TRNS => set_once(&mut self.transparency, ChunkType::TRNS, || {
                Transparency::decode(data, color_type, self.palette.as_ref())
            })?,
            ChunkType::CHRM => {
                set_once(&mut self.chromaticities, ChunkType::CHRM, || Chromaticities::decode(data))?
            }
            ChunkType::GAMA => set_once(&mut self.gamma, ChunkType::GAMA, || Gamma::decode(data))?,
            ChunkType::ICCP => set_once(&mut self.icc_profile, ChunkType::ICCP, || IccProfile::decode(data))?,
            ChunkType::SBIT => set_once(&mut self.significant_bits, ChunkType::SBIT, || {
                SignificantBits::decode(data, color_type)
            })?,
            ChunkType::SRGB => set_once(&mut self.srgb, ChunkType::SRGB, || StandardRgb::decode(data))?,
            ChunkType::BKGD => set_once(&mut self.background, ChunkType::BKGD, || {
                Background::decode(data, color_type, self.palette.as_ref())
            })?,
            ChunkType::HIST => set_once(&mut self.histogram, ChunkType::HIST, || Histogram::decode(data))?,
            ChunkType::PHYS => {
                set_once(&mut self.physical_dimensions, ChunkType::PHYS, || PhysicalDimensions::decode(data))?
            }
            ChunkType::SPLT => {
                set_once(&mut self.suggested_palette, ChunkType::SPLT, || SuggestedPalette::decode(data))?
            }
            ChunkType::TIME => set_once(&mut self.time, ChunkType::TIME, || Timestamp::decode(data))?,
            ChunkType::TEXT => self.texts.push(Text::decode(data)?),
            ChunkType::ZTXT => self.compressed_texts.push(CompressedText::decode(data)?),
            ChunkType::ITXT => self.international_texts.push(InternationalText::decode(data)?),
            chunk_type => {
                if chunk_type.is_critical() {
                    log::warn!("Unknown critical chunk {}, keeping it as is", chunk_type);
                } else {
                    log::debug!("Keeping unknown chunk {}", chunk_type);
                }
                self.unknown_chunks.push(chunk);
            }
        }

        Ok(())
    }

    pub fn validate(&self, header: &ImageHeader) -> ApngResult<()> {
        if header.color_type == ColorType::Indexed && self.palette.is_none() {
            return Err(ApngError::MissingRequiredChunk(ChunkType::PLTE));
        }

        if let Some(histogram) = &self.histogram {
            let palette = self.palette.as_ref().ok_or(ApngError::MissingRequiredChunk(ChunkType::PLTE))?;

            if histogram.frequencies.len() != palette.len() {
                return Err(ApngError::invalid_data(
                    ChunkType::HIST,
                    format!(
                        "{} frequencies for {} palette entries",
                        histogram.frequencies.len(),
                        palette.len()
                    ),
                ));
            }
        }

        let unsupported = |chunk_type| ApngError::UnsupportedColorModel {
            chunk_type,
            color_type: header.color_type as u8,
        };

        if matches!(&self.transparency, Some(trns) if !trns.matches(header.color_type)) {
            return Err(unsupported(ChunkType::TRNS));
        }
        if matches!(&self.significant_bits, Some(sbit) if !sbit.matches(header.color_type)) {
            return Err(unsupported(ChunkType::SBIT));
        }
        if matches!(&self.background, Some(bkgd) if !bkgd.matches(header.color_type)) {
            return Err(unsupported(ChunkType::BKGD));
        }

        Ok(())
    }

    /// Writes the records in the canonical order, regardless of the order
    /// they were read in.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> ApngResult<()> {
        write_optional(writer, &self.palette)?;
        write_optional(writer, &self.transparency)?;
        write_optional(writer, &self.chromaticities)?;
        write_optional(writer, &self.gamma)?;
        write_optional(writer, &self.icc_profile)?;
        write_optional(writer, &self.significant_bits)?;
        write_optional(writer, &self.srgb)?;
        write_optional(writer, &self.background)?;
        write_optional(writer, &self.histogram)?;
        write_optional(writer, &self.physical_dimensions)?;
        write_optional(writer, &self.suggested_palette)?;
        write_optional(writer, &self.time)?;

        for text in &self.texts {
            text.to_raw().write_to(writer)?;
        }
        for text in &self.compressed_texts {
            text.to_raw().write_to(writer)?;
        }
        for text in &self.international_texts {
            text.to_raw().write_to(writer)?;
        }
        for chunk in &self.unknown_chunks {
            chunk.write_to(writer)?;
        }

        Ok(())
    }
}
