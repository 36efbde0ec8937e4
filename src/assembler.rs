use std::path::Path;

use image::{imageops, ImageFormat, RgbaImage};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::chunks::{
    AnimationControl, BlendOp, ChunkType, ColorType, DisposeOp, FrameControl, FrameDataChunk, ImageData,
    ImageHeader, Timestamp,
};
use crate::container::{Apng, Frame, Png};
use crate::utils::error::ApngResult;

// Fixed per-frame settings: 1/10 s, clear to background, replace.
const DELAY_NUM: u16 = 1;
const DELAY_DEN: u16 = 10;
const DISPOSE_OP: DisposeOp = DisposeOp::Background;
const BLEND_OP: BlendOp = BlendOp::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblerOptions {
    /// Crop every frame after the first to its non-transparent pixels.
    pub optimize: bool,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        AssemblerOptions { optimize: true }
    }
}

/// A bitmap cropped to its visible pixels, with its position in the
/// original bitmap.
#[derive(Debug, Clone)]
pub struct TrimmedImage {
    pub image: RgbaImage,
    pub x_offset: u32,
    pub y_offset: u32,
}

/// Crops `image` to the smallest rectangle holding every pixel with a
/// non-zero alpha. A fully transparent image becomes a single transparent
/// pixel at the origin.
pub fn trim_transparent(image: &RgbaImage) -> TrimmedImage {
    let (width, height) = image.dimensions();
    let opaque = |x: u32, y: u32| image.get_pixel(x, y)[3] != 0;

    let Some(left) = (0..width).find(|&x| (0..height).any(|y| opaque(x, y))) else {
        return TrimmedImage { image: RgbaImage::new(1, 1), x_offset: 0, y_offset: 0 };
    };

    // Each later scan is limited by what the earlier ones found. A visible
    // pixel exists in column `left`, so all of them succeed.
    let top = (0..height).find(|&y| (left..width).any(|x| opaque(x, y))).unwrap_or(0);
    let right = (left..width).rev().find(|&x| (top..height).any(|y| opaque(x, y))).unwrap_or(left);
    let bottom = (top..height).rev().find(|&y| (left..=right).any(|x| opaque(x, y))).unwrap_or(top);

    let cropped = imageops::crop_imm(image, left, top, right - left + 1, bottom - top + 1).to_image();

    TrimmedImage { image: cropped, x_offset: left, y_offset: top }
}

/// Hands out sequence numbers for fcTL and fdAT chunks.
#[derive(Debug, Default)]
struct SequenceCounter {
    next: u32,
}

impl SequenceCounter {
    fn next(&mut self) -> u32 {
        let value = self.next;
        self.next += 1;
        value
    }
}

// A decoded input image, ready to become a delta frame.
struct PreparedFrame {
    x_offset: u32,
    y_offset: u32,
    header: ImageHeader,
    image_data: Vec<ImageData>,
}

fn prepare_frame(bytes: &[u8], options: AssemblerOptions) -> ApngResult<PreparedFrame> {
    if !options.optimize {
        let png = Png::from_bytes(bytes)?;
        return Ok(PreparedFrame { x_offset: 0, y_offset: 0, header: png.header, image_data: png.image_data });
    }

    let bitmap = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
    let trimmed = trim_transparent(&bitmap);
    let png = Png::from_rgba_image(&trimmed.image)?;

    Ok(PreparedFrame {
        x_offset: trimmed.x_offset,
        y_offset: trimmed.y_offset,
        header: png.header,
        image_data: png.image_data,
    })
}

fn frame_control(sequence_number: u32, header: &ImageHeader, x_offset: u32, y_offset: u32) -> FrameControl {
    FrameControl {
        sequence_number,
        width: header.width,
        height: header.height,
        x_offset,
        y_offset,
        delay_num: DELAY_NUM,
        delay_den: DELAY_DEN,
        dispose_op: DISPOSE_OP,
        blend_op: BLEND_OP,
    }
}

fn same_pixel_format(a: &ImageHeader, b: &ImageHeader) -> bool {
    a.color_type == b.color_type && a.bit_depth == b.bit_depth && a.interlace_method == b.interlace_method
}

/// Builds an animation from still images, one per frame, each already
/// fully drawn. The first image becomes the default image frame and
/// provides the header and metadata.
///
/// Returns `Ok(None)` for an empty list.
pub fn assemble<B>(images: &[B], options: AssemblerOptions) -> ApngResult<Option<Apng>>
where
    B: AsRef<[u8]> + Sync,
{
    let Some((first, rest)) = images.split_first() else {
        return Ok(None);
    };

    let mut first = Png::from_bytes(first.as_ref())?;
    first.metadata.unknown_chunks.retain(|chunk| {
        let animation_chunk = matches!(chunk.chunk_type(), ChunkType::ACTL | ChunkType::FCTL | ChunkType::FDAT);
        if animation_chunk {
            log::warn!("Dropping {} chunk from the first input image", chunk.chunk_type());
        }
        !animation_chunk
    });
    first.metadata.time = Some(Timestamp::now());

    if options.optimize
        && !rest.is_empty()
        && (first.header.color_type != ColorType::RGBA || first.header.bit_depth != 8)
    {
        log::warn!(
            "Optimized frames are stored as 8-bit RGBA but the first image is {:?} at {} bits",
            first.header.color_type,
            first.header.bit_depth
        );
    }

    let header = first.header.clone();
    let mut apng = Apng::from_png(first);
    let mut sequence = SequenceCounter::default();

    let control = frame_control(sequence.next(), &header, 0, 0);
    let default_data = apng.image_data().to_vec();
    apng.add_frame(Frame::default_image(control, default_data))?;

    #[cfg(feature = "rayon")]
    let prepared: Vec<ApngResult<PreparedFrame>> =
        rest.par_iter().map(|bytes| prepare_frame(bytes.as_ref(), options)).collect();
    #[cfg(not(feature = "rayon"))]
    let prepared: Vec<ApngResult<PreparedFrame>> =
        rest.iter().map(|bytes| prepare_frame(bytes.as_ref(), options)).collect();

    // Sequence numbers are handed out in input order once all frames are ready.
    for (index, frame) in prepared.into_iter().enumerate() {
        let frame = frame?;

        if !options.optimize && !same_pixel_format(&header, &frame.header) {
            log::warn!("Input image {} has a different pixel format than the first image", index + 1);
        }

        let control = frame_control(sequence.next(), &frame.header, frame.x_offset, frame.y_offset);
        let frame_data = frame
            .image_data
            .iter()
            .map(|data| FrameDataChunk { sequence_number: sequence.next(), data: data.data().to_vec() })
            .collect();

        apng.add_frame(Frame::delta(control, frame_data))?;
    }

    let num_frames = apng.frame_count() as u32;
    apng.set_animation_control(AnimationControl { num_frames, num_plays: 0 });
    apng.validate()?;

    log::info!("Assembled {} frames ({} sequence numbers)", num_frames, sequence.next);

    Ok(Some(apng))
}

/// Reads every file and assembles them in the given order.
pub fn assemble_files<P: AsRef<Path>>(paths: &[P], options: AssemblerOptions) -> ApngResult<Option<Apng>> {
    let images = paths
        .iter()
        .map(|path| {
            log::debug!("Reading {}", path.as_ref().display());
            std::fs::read(path)
        })
        .collect::<Result<Vec<_>, _>>()?;

    assemble(&images, options)
}
