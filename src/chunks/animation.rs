use crate::chunks::{warn_trailing, Chunk, ChunkType, DecodeChunk, ImageHeader};
use crate::utils::bytes::{ByteReader, ByteWriter};
use crate::utils::error::{ApngError, ApngResult};

/// acTL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationControl {
    pub num_frames: u32,
    /// 0 means loop forever.
    pub num_plays: u32,
}

impl Chunk for AnimationControl {
    const TYPE: ChunkType = ChunkType::ACTL;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_u32(self.num_frames).write_u32(self.num_plays);
    }
}

impl DecodeChunk for AnimationControl {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let actl = AnimationControl {
            num_frames: reader.read_u32()?,
            num_plays: reader.read_u32()?,
        };
        warn_trailing(&reader, Self::TYPE);

        Ok(actl)
    }
}

/// What happens to a frame's region before the next frame is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisposeOp {
    #[default]
    None = 0,
    Background = 1,
    Previous = 2,
}

impl TryFrom<u8> for DisposeOp {
    type Error = ApngError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DisposeOp::None),
            1 => Ok(DisposeOp::Background),
            2 => Ok(DisposeOp::Previous),
            _ => Err(ApngError::InvalidEnumeration { field: "dispose op", value }),
        }
    }
}

/// How a frame's pixels are combined with the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendOp {
    #[default]
    Source = 0,
    Over = 1,
}

impl TryFrom<u8> for BlendOp {
    type Error = ApngError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BlendOp::Source),
            1 => Ok(BlendOp::Over),
            _ => Err(ApngError::InvalidEnumeration { field: "blend op", value }),
        }
    }
}

/// fcTL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameControl {
    pub sequence_number: u32,
    pub width: u32,
    pub height: u32,
    pub x_offset: u32,
    pub y_offset: u32,
    pub delay_num: u16,
    pub delay_den: u16,
    pub dispose_op: DisposeOp,
    pub blend_op: BlendOp,
}

impl FrameControl {
    /// Frame delay in seconds. A zero denominator means hundredths.
    pub fn delay_seconds(&self) -> f64 {
        let den = if self.delay_den == 0 { 100 } else { self.delay_den };
        self.delay_num as f64 / den as f64
    }

    pub fn delay_millis(&self) -> u32 {
        (self.delay_seconds() * 1000.0).round() as u32
    }

    /// Checks that the frame is non-empty and lies within the canvas.
    pub fn validate_geometry(&self, header: &ImageHeader) -> ApngResult<()> {
        let fits_x = self.x_offset as u64 + self.width as u64 <= header.width as u64;
        let fits_y = self.y_offset as u64 + self.height as u64 <= header.height as u64;

        if self.width == 0 || self.height == 0 || !fits_x || !fits_y {
            return Err(ApngError::InvalidFrameGeometry {
                x_offset: self.x_offset,
                y_offset: self.y_offset,
                width: self.width,
                height: self.height,
                canvas_width: header.width,
                canvas_height: header.height,
            });
        }

        Ok(())
    }
}

impl Chunk for FrameControl {
    const TYPE: ChunkType = ChunkType::FCTL;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_u32(self.sequence_number)
            .write_u32(self.width)
            .write_u32(self.height)
            .write_u32(self.x_offset)
            .write_u32(self.y_offset)
            .write_u16(self.delay_num)
            .write_u16(self.delay_den)
            .write_u8(self.dispose_op as u8)
            .write_u8(self.blend_op as u8);
    }
}

impl DecodeChunk for FrameControl {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let fctl = FrameControl {
            sequence_number: reader.read_u32()?,
            width: reader.read_u32()?,
            height: reader.read_u32()?,
            x_offset: reader.read_u32()?,
            y_offset: reader.read_u32()?,
            delay_num: reader.read_u16()?,
            delay_den: reader.read_u16()?,
            dispose_op: DisposeOp::try_from(reader.read_u8()?)?,
            blend_op: BlendOp::try_from(reader.read_u8()?)?,
        };
        warn_trailing(&reader, Self::TYPE);

        Ok(fctl)
    }
}

/// fdAT: a sequence number followed by compressed frame data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDataChunk {
    pub sequence_number: u32,
    pub data: Vec<u8>,
}

impl Chunk for FrameDataChunk {
    const TYPE: ChunkType = ChunkType::FDAT;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_u32(self.sequence_number).write_bytes(&self.data);
    }
}

impl DecodeChunk for FrameDataChunk {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let sequence_number = reader.read_u32()?;
        let data = reader.read_rest().to_vec();

        Ok(FrameDataChunk { sequence_number, data })
    }
}
