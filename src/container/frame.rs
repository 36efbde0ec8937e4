use std::io::Write;

use crate::chunks::{Chunk, ChunkType, FrameControl, FrameDataChunk, ImageData};
use crate::utils::error::{ApngError, ApngResult};

/// Where a frame's pixels live. Fixed when the frame is created.
#[derive(Debug, Clone, PartialEq)]
pub enum FramePayload {
    /// The container's own IDAT records, shared with it.
    DefaultImage(Vec<ImageData>),
    /// fdAT records belonging to this frame only.
    Delta(Vec<FrameDataChunk>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    control: FrameControl,
    payload: FramePayload,
}

impl Frame {
    pub fn default_image(control: FrameControl, image_data: Vec<ImageData>) -> Self {
        Frame { control, payload: FramePayload::DefaultImage(image_data) }
    }

    pub fn delta(control: FrameControl, frame_data: Vec<FrameDataChunk>) -> Self {
        Frame { control, payload: FramePayload::Delta(frame_data) }
    }

    pub fn control(&self) -> &FrameControl {
        &self.control
    }

    pub fn payload(&self) -> &FramePayload {
        &self.payload
    }

    pub fn is_default_image(&self) -> bool {
        matches!(self.payload, FramePayload::DefaultImage(_))
    }

    pub(crate) fn push_image_data(&mut self, data: ImageData) -> ApngResult<()> {
        match &mut self.payload {
            FramePayload::DefaultImage(list) => {
                list.push(data);
                Ok(())
            }
            FramePayload::Delta(_) => Err(ApngError::OutOfOrderChunk {
                chunk_type: ChunkType::IDAT,
                reason: "image data after a frame that carries its own data",
            }),
        }
    }

    pub(crate) fn push_frame_data(&mut self, data: FrameDataChunk) -> ApngResult<()> {
        match &mut self.payload {
            FramePayload::Delta(list) => {
                list.push(data);
                Ok(())
            }
            FramePayload::DefaultImage(_) => Err(ApngError::OutOfOrderChunk {
                chunk_type: ChunkType::FDAT,
                reason: "frame data for the default image frame",
            }),
        }
    }

    /// The frame's zlib stream, with fdAT sequence numbers stripped.
    pub fn compressed_data(&self) -> Vec<u8> {
        match &self.payload {
            FramePayload::DefaultImage(list) => list.iter().flat_map(|d| d.data().iter().copied()).collect(),
            FramePayload::Delta(list) => list.iter().flat_map(|d| d.data.iter().copied()).collect(),
        }
    }

    /// Writes the fcTL chunk followed by the payload chunks.
    pub(crate) fn write_to<W: Write>(&self, writer: &mut W) -> ApngResult<()> {
        self.control.to_raw().write_to(writer)?;

        match &self.payload {
            FramePayload::DefaultImage(list) => {
                for data in list {
                    data.to_raw().write_to(writer)?;
                }
            }
            FramePayload::Delta(list) => {
                for data in list {
                    data.to_raw().write_to(writer)?;
                }
            }
        }

        Ok(())
    }
}
