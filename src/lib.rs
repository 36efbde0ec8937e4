mod utils;
pub mod assembler;
pub mod chunks;
pub mod compositor;
pub mod container;
pub mod playback;

pub use utils::{bytes, crc, logger};
pub use utils::error::{ApngError, ApngResult};
pub use utils::info_display::ApngInfo;

pub use assembler::{assemble, assemble_files, trim_transparent, AssemblerOptions, TrimmedImage};
pub use chunks::{ChunkType, RawChunk};
pub use compositor::{blend, dispose, Region};
pub use container::{Apng, Frame, FramePayload, Metadata, Png, SIGNATURE};
pub use playback::{render_frames, Player, RenderedFrame};
