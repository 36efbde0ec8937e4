use image::RgbaImage;

use crate::chunks::{BlendOp, DisposeOp};
use crate::compositor::{blend, dispose, Region};
use crate::container::Apng;
use crate::utils::error::ApngResult;

/// One fully composited canvas and how long to show it.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub image: RgbaImage,
    pub delay_ms: u32,
}

/// Steps through an animation, compositing each frame onto a canvas the
/// size of the image. An image without frames yields its default image once.
pub struct Player<'a> {
    apng: &'a Apng,
    index: usize,
    canvas: RgbaImage,
    snapshot: Option<RgbaImage>,
}

impl<'a> Player<'a> {
    pub fn new(apng: &'a Apng) -> Self {
        let header = apng.header();

        Player {
            apng,
            index: 0,
            canvas: RgbaImage::new(header.width, header.height),
            snapshot: None,
        }
    }

    /// The canvas as left by the last rendered frame.
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    fn render_still(&self) -> ApngResult<RenderedFrame> {
        let image = self.apng.default_image().to_rgba_image()?;
        Ok(RenderedFrame { image, delay_ms: 0 })
    }

    fn render_frame(&mut self, index: usize) -> ApngResult<RenderedFrame> {
        let apng = self.apng;
        let frames = apng.frames();
        let control = *frames[index].control();
        let bitmap = apng.frame_bitmap(index)?;

        let blend_op = if index == 0 {
            BlendOp::Source
        } else {
            let previous = frames[index - 1].control();
            dispose(
                &mut self.canvas,
                Region::of_frame(previous),
                previous.dispose_op,
                self.snapshot.as_ref(),
            );
            control.blend_op
        };

        // The snapshot holds the canvas as it was before the latest frame
        // whose own disposal is not a restore. Until then there is none, and
        // disposing to the previous state leaves the canvas alone.
        if index > 0 && frames[index - 1].control().dispose_op != DisposeOp::Previous {
            self.snapshot = Some(self.canvas.clone());
        }

        blend(&mut self.canvas, control.x_offset, control.y_offset, &bitmap, blend_op);

        Ok(RenderedFrame {
            image: self.canvas.clone(),
            delay_ms: control.delay_millis(),
        })
    }
}

impl Iterator for Player<'_> {
    type Item = ApngResult<RenderedFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        let count = self.apng.frame_count();
        let index = self.index;

        if count == 0 {
            if index > 0 {
                return None;
            }
            self.index += 1;
            return Some(self.render_still());
        }

        if index >= count {
            return None;
        }
        self.index += 1;

        Some(self.render_frame(index))
    }
}

/// Renders every frame of the animation in order.
pub fn render_frames(apng: &Apng) -> ApngResult<Vec<RenderedFrame>> {
    Player::new(apng).collect()
}
