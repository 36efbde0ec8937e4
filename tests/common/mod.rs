#![allow(dead_code)]

use std::io::Cursor;

use apngkit::chunks::{BlendOp, Chunk, ColorType, DisposeOp, FrameControl, ImageHeader};
use apngkit::{ChunkType, Png, RawChunk, SIGNATURE};
use image::{ImageFormat, Rgba, RgbaImage};

pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

pub fn encode_png(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encoding a bitmap in memory");
    bytes
}

/// Compressed pixel data of a solid bitmap, ready to go into IDAT or fdAT.
pub fn solid_payload(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
    let png = Png::from_bytes(&encode_png(&RgbaImage::from_pixel(width, height, color)))
        .expect("reading back an encoded bitmap");
    png.compressed_data()
}

pub fn stream(chunks: &[RawChunk]) -> Vec<u8> {
    let mut bytes = SIGNATURE.to_vec();
    for chunk in chunks {
        chunk.write_to(&mut bytes).expect("writing to a Vec");
    }
    bytes
}

pub fn ihdr(width: u32, height: u32, color_type: ColorType) -> RawChunk {
    ImageHeader::new(width, height, 8, color_type).to_raw()
}

pub fn raw(tag: &[u8; 4], data: &[u8]) -> RawChunk {
    RawChunk::new(ChunkType(*tag), data.to_vec())
}

pub fn iend() -> RawChunk {
    raw(b"IEND", &[])
}

pub fn fctl(sequence_number: u32, width: u32, height: u32, x_offset: u32, y_offset: u32) -> FrameControl {
    FrameControl {
        sequence_number,
        width,
        height,
        x_offset,
        y_offset,
        delay_num: 1,
        delay_den: 10,
        dispose_op: DisposeOp::None,
        blend_op: BlendOp::Source,
    }
}

pub fn fdat(sequence_number: u32, data: &[u8]) -> RawChunk {
    let mut payload = sequence_number.to_be_bytes().to_vec();
    payload.extend_from_slice(data);
    RawChunk::new(ChunkType::FDAT, payload)
}

pub fn actl(num_frames: u32, num_plays: u32) -> RawChunk {
    let mut payload = num_frames.to_be_bytes().to_vec();
    payload.extend_from_slice(&num_plays.to_be_bytes());
    RawChunk::new(ChunkType::ACTL, payload)
}

/// Tags of every chunk in a stream, in order.
pub fn chunk_types(bytes: &[u8]) -> Vec<ChunkType> {
    read_chunks(bytes).iter().map(|c| c.chunk_type()).collect()
}

pub fn read_chunks(bytes: &[u8]) -> Vec<RawChunk> {
    let mut cursor = &bytes[SIGNATURE.len()..];
    let mut chunks = Vec::new();
    while let Some(chunk) = RawChunk::read_from(&mut cursor).expect("well formed stream") {
        chunks.push(chunk);
    }
    chunks
}
