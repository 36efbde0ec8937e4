use std::fmt::{self, Display, Formatter};

use crate::container::{Apng, FramePayload, Metadata};

fn print_optional<T: fmt::Debug>(f: &mut Formatter<'_>, name: &str, value: &Option<T>) -> fmt::Result {
    if let Some(value) = value {
        writeln!(f, "  {:<20}{:?}", name, value)?;
    }
    Ok(())
}

fn print_metadata(f: &mut Formatter<'_>, metadata: &Metadata) -> fmt::Result {
    writeln!(f, "Metadata:")?;

    if let Some(palette) = &metadata.palette {
        writeln!(f, "  {:<20}{} entries", "Palette", palette.len())?;
    }
    print_optional(f, "Transparency", &metadata.transparency)?;
    print_optional(f, "Chromaticities", &metadata.chromaticities)?;
    if let Some(gamma) = &metadata.gamma {
        writeln!(f, "  {:<20}{}", "Gamma", gamma.value())?;
    }
    if let Some(icc) = &metadata.icc_profile {
        writeln!(f, "  {:<20}{} ({} bytes compressed)", "ICC profile", icc.name, icc.compressed_profile.len())?;
    }
    print_optional(f, "Significant bits", &metadata.significant_bits)?;
    print_optional(f, "sRGB", &metadata.srgb.map(|s| s.intent))?;
    print_optional(f, "Background", &metadata.background)?;
    if let Some(histogram) = &metadata.histogram {
        writeln!(f, "  {:<20}{} entries", "Histogram", histogram.frequencies.len())?;
    }
    print_optional(f, "Physical size", &metadata.physical_dimensions)?;
    if let Some(splt) = &metadata.suggested_palette {
        writeln!(
            f,
            "  {:<20}{} ({} entries, depth {})",
            "Suggested palette",
            splt.name,
            splt.entries.len(),
            splt.sample_depth
        )?;
    }
    if let Some(time) = &metadata.time {
        writeln!(
            f,
            "  {:<20}{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
            "Modified", time.year, time.month, time.day, time.hour, time.minute, time.second
        )?;
    }

    for text in &metadata.texts {
        writeln!(f, "  tEXt {:<15}{}", text.keyword, text.text)?;
    }
    for text in &metadata.compressed_texts {
        match text.text() {
            Ok(value) => writeln!(f, "  zTXt {:<15}{}", text.keyword, value)?,
            Err(e) => writeln!(f, "  zTXt {:<15}<{}>", text.keyword, e)?,
        }
    }
    for text in &metadata.international_texts {
        match text.text() {
            Ok(value) => writeln!(f, "  iTXt {:<15}[{}] {}", text.keyword, text.language_tag, value)?,
            Err(e) => writeln!(f, "  iTXt {:<15}<{}>", text.keyword, e)?,
        }
    }
    for chunk in &metadata.unknown_chunks {
        writeln!(f, "  {:<20}{} bytes", chunk.chunk_type().to_string(), chunk.data().len())?;
    }

    Ok(())
}

/// Human readable summary of a decoded file.
pub struct ApngInfo<'a>(pub &'a Apng);

impl Display for ApngInfo<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let apng = self.0;
        let header = apng.header();

        writeln!(f, "Header:")?;
        writeln!(f, "  {:<20}{}x{}", "Size", header.width, header.height)?;
        writeln!(f, "  {:<20}{}", "Bit depth", header.bit_depth)?;
        writeln!(f, "  {:<20}{:?}", "Color type", header.color_type)?;
        writeln!(f, "  {:<20}{}", "Interlaced", header.interlace_method != 0)?;
        writeln!(
            f,
            "  {:<20}{} chunks, {} bytes",
            "Image data",
            apng.image_data().len(),
            apng.image_data().iter().map(|d| d.len()).sum::<usize>()
        )?;

        print_metadata(f, apng.metadata())?;

        let Some(control) = apng.animation_control() else {
            return writeln!(f, "Not animated");
        };

        let plays = if control.num_plays == 0 { "forever".to_string() } else { control.num_plays.to_string() };
        writeln!(f, "Animation: {} frames, plays {}", control.num_frames, plays)?;

        for (index, frame) in apng.frames().iter().enumerate() {
            let c = frame.control();
            let kind = match frame.payload() {
                FramePayload::DefaultImage(list) => format!("default image, {} IDAT", list.len()),
                FramePayload::Delta(list) => format!("{} fdAT", list.len()),
            };

            writeln!(
                f,
                "  #{:<4} seq {:<5} {}x{} at ({}, {}), {} ms, {:?}/{:?}, {}",
                index,
                c.sequence_number,
                c.width,
                c.height,
                c.x_offset,
                c.y_offset,
                c.delay_millis(),
                c.dispose_op,
                c.blend_op,
                kind
            )?;
        }

        Ok(())
    }
}
