use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use image::RgbaImage;

use crate::chunks::{
    AnimationControl, Chunk, ChunkType, DecodeChunk, FrameControl, FrameDataChunk, ImageData, ImageHeader,
    RawChunk,
};
use crate::container::{read_stream, write_end, write_head, Frame, FramePayload, Metadata, Png};
use crate::utils::error::{ApngError, ApngResult};

/// An animated image. Without an acTL chunk it behaves like a still image.
#[derive(Debug, Clone, PartialEq)]
pub struct Apng {
    header: ImageHeader,
    metadata: Metadata,
    image_data: Vec<ImageData>,
    animation_control: Option<AnimationControl>,
    frames: Vec<Frame>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequenceState {
    BeforeFirstFrame,
    InDefaultFrame,
    InDeltaFrames,
}

/// Sorts incoming IDAT, fcTL and fdAT chunks into frames.
struct FrameSequencer {
    state: SequenceState,
    image_data: Vec<ImageData>,
    animation_control: Option<AnimationControl>,
    frames: Vec<Frame>,
    next_sequence_number: u32,
}

impl FrameSequencer {
    fn new() -> Self {
        FrameSequencer {
            state: SequenceState::BeforeFirstFrame,
            image_data: Vec::new(),
            animation_control: None,
            frames: Vec::new(),
            next_sequence_number: 0,
        }
    }

    fn check_sequence_number(&mut self, chunk_type: ChunkType, sequence_number: u32) {
        if sequence_number != self.next_sequence_number {
            log::warn!(
                "{} has sequence number {}, expected {}",
                chunk_type,
                sequence_number,
                self.next_sequence_number
            );
        }
        self.next_sequence_number = sequence_number.wrapping_add(1);
    }

    fn image_data(&mut self, data: ImageData) -> ApngResult<()> {
        match self.state {
            SequenceState::BeforeFirstFrame => {}
            SequenceState::InDefaultFrame => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.push_image_data(data.clone())?;
                }
            }
            SequenceState::InDeltaFrames => {
                return Err(ApngError::OutOfOrderChunk {
                    chunk_type: ChunkType::IDAT,
                    reason: "image data after the first frame",
                });
            }
        }

        self.image_data.push(data);

        Ok(())
    }

    fn frame_control(&mut self, header: &ImageHeader, control: FrameControl) -> ApngResult<()> {
        control.validate_geometry(header)?;
        self.check_sequence_number(ChunkType::FCTL, control.sequence_number);

        if self.state == SequenceState::BeforeFirstFrame && self.image_data.is_empty() {
            log::debug!("fcTL {} starts the default image frame", control.sequence_number);
            self.frames.push(Frame::default_image(control, Vec::new()));
            self.state = SequenceState::InDefaultFrame;
        } else {
            log::debug!("fcTL {} starts frame {}", control.sequence_number, self.frames.len());
            self.frames.push(Frame::delta(control, Vec::new()));
            self.state = SequenceState::InDeltaFrames;
        }

        Ok(())
    }

    fn frame_data(&mut self, data: FrameDataChunk) -> ApngResult<()> {
        self.check_sequence_number(ChunkType::FDAT, data.sequence_number);

        match self.frames.last_mut() {
            Some(frame) => frame.push_frame_data(data),
            None => Err(ApngError::OutOfOrderChunk {
                chunk_type: ChunkType::FDAT,
                reason: "frame data before any fcTL",
            }),
        }
    }

    fn animation_control(&mut self, control: AnimationControl) -> ApngResult<()> {
        if self.animation_control.is_some() {
            return Err(ApngError::DuplicateChunk(ChunkType::ACTL));
        }

        log::debug!("acTL: {} frames, {} plays", control.num_frames, control.num_plays);
        self.animation_control = Some(control);

        Ok(())
    }

    fn handle(&mut self, header: &ImageHeader, metadata: &mut Metadata, chunk: RawChunk) -> ApngResult<()> {
        match chunk.chunk_type() {
            ChunkType::IDAT => self.image_data(ImageData::decode(chunk.data())?),
            ChunkType::FCTL => self.frame_control(header, FrameControl::decode(chunk.data())?),
            ChunkType::FDAT => self.frame_data(FrameDataChunk::decode(chunk.data())?),
            ChunkType::ACTL => self.animation_control(AnimationControl::decode(chunk.data())?),
            _ => metadata.read_chunk(header, chunk),
        }
    }
}

impl Apng {
    pub fn from_reader<R: Read>(reader: &mut R) -> ApngResult<Self> {
        let mut metadata = Metadata::default();
        let mut sequencer = FrameSequencer::new();

        let header = read_stream(reader, |header, chunk| sequencer.handle(header, &mut metadata, chunk))?;

        let apng = Apng {
            header,
            metadata,
            image_data: sequencer.image_data,
            animation_control: sequencer.animation_control,
            frames: sequencer.frames,
        };
        apng.validate()?;

        Ok(apng)
    }

    pub fn from_bytes(bytes: &[u8]) -> ApngResult<Self> {
        Self::from_reader(&mut Cursor::new(bytes))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> ApngResult<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::from_reader(&mut reader)
    }

    /// Starts an animation from a still image. Its image data becomes the
    /// data of a default image frame if one is added.
    pub fn from_png(png: Png) -> Self {
        Apng {
            header: png.header,
            metadata: png.metadata,
            image_data: png.image_data,
            animation_control: None,
            frames: Vec::new(),
        }
    }

    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn image_data(&self) -> &[ImageData] {
        &self.image_data
    }

    pub fn animation_control(&self) -> Option<&AnimationControl> {
        self.animation_control.as_ref()
    }

    pub fn set_animation_control(&mut self, control: AnimationControl) {
        self.animation_control = Some(control);
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_animated(&self) -> bool {
        self.animation_control.is_some() && !self.frames.is_empty()
    }

    /// Number of times to play the animation, 0 meaning forever.
    pub fn num_plays(&self) -> u32 {
        self.animation_control.map(|c| c.num_plays).unwrap_or(0)
    }

    /// Appends a frame after checking it fits the canvas. A default image
    /// frame must come first and takes over the container's image data.
    pub fn add_frame(&mut self, frame: Frame) -> ApngResult<()> {
        frame.control().validate_geometry(&self.header)?;

        match frame.payload() {
            FramePayload::DefaultImage(list) => {
                if !self.frames.is_empty() {
                    return Err(ApngError::OutOfOrderChunk {
                        chunk_type: ChunkType::IDAT,
                        reason: "default image frame must be the first frame",
                    });
                }
                self.image_data = list.clone();
            }
            FramePayload::Delta(_) => {}
        }

        self.frames.push(frame);

        Ok(())
    }

    pub fn validate(&self) -> ApngResult<()> {
        if self.image_data.is_empty() {
            return Err(ApngError::MissingRequiredChunk(ChunkType::IDAT));
        }

        self.metadata.validate(&self.header)?;

        match self.animation_control {
            Some(control) => {
                if control.num_frames as usize != self.frames.len() {
                    return Err(ApngError::FrameCountMismatch {
                        declared: control.num_frames,
                        actual: self.frames.len(),
                    });
                }
            }
            None if !self.frames.is_empty() => {
                return Err(ApngError::MissingRequiredChunk(ChunkType::ACTL));
            }
            None => {}
        }

        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> ApngResult<()> {
        write_head(writer, &self.header)?;
        self.metadata.write_to(writer)?;

        if let Some(control) = &self.animation_control {
            control.to_raw().write_to(writer)?;
        }

        if !matches!(self.frames.first(), Some(first) if first.is_default_image()) {
            for data in &self.image_data {
                data.to_raw().write_to(writer)?;
            }
        }

        for frame in &self.frames {
            frame.write_to(writer)?;
        }

        write_end(writer)
    }

    pub fn to_bytes(&self) -> ApngResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> ApngResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// The still image a viewer without animation support would show.
    pub fn default_image(&self) -> Png {
        Png::new(self.header.clone(), self.metadata.clone(), self.image_data.clone())
    }

    /// Frame `index` as a standalone still image sized to the frame.
    pub fn frame_image(&self, index: usize) -> ApngResult<Png> {
        let frame = self.frames.get(index).ok_or(ApngError::FrameOutOfRange {
            index,
            count: self.frames.len(),
        })?;

        let mut header = self.header.clone();
        if !frame.is_default_image() {
            header.width = frame.control().width;
            header.height = frame.control().height;
        }

        let png = Png::new(header, self.metadata.clone(), vec![ImageData::new(frame.compressed_data())]);

        Ok(png)
    }

    pub fn frame_bitmap(&self, index: usize) -> ApngResult<RgbaImage> {
        self.frame_image(index)?.to_rgba_image()
    }
}
