use image::{Rgba, RgbaImage};

use crate::chunks::{BlendOp, DisposeOp, FrameControl};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A rectangle on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Region { x, y, width, height }
    }

    /// The area a frame draws into.
    pub fn of_frame(control: &FrameControl) -> Self {
        Region::new(control.x_offset, control.y_offset, control.width, control.height)
    }

    // Pixel ranges clipped to an image of the given size.
    fn clip(&self, width: u32, height: u32) -> (std::ops::Range<u32>, std::ops::Range<u32>) {
        let x_end = self.x.saturating_add(self.width).min(width);
        let y_end = self.y.saturating_add(self.height).min(height);
        (self.x.min(x_end)..x_end, self.y.min(y_end)..y_end)
    }
}

/// Applies a frame's dispose operation to its region of the canvas.
///
/// `Previous` restores the region from `snapshot`; without a snapshot
/// the canvas is left alone.
pub fn dispose(canvas: &mut RgbaImage, region: Region, op: DisposeOp, snapshot: Option<&RgbaImage>) {
    let (xs, ys) = region.clip(canvas.width(), canvas.height());

    match op {
        DisposeOp::None => {}
        DisposeOp::Background => {
            for y in ys {
                for x in xs.clone() {
                    canvas.put_pixel(x, y, TRANSPARENT);
                }
            }
        }
        DisposeOp::Previous => {
            let Some(snapshot) = snapshot else {
                return;
            };

            for y in ys {
                for x in xs.clone() {
                    let restored = snapshot.get_pixel_checked(x, y).copied().unwrap_or(TRANSPARENT);
                    canvas.put_pixel(x, y, restored);
                }
            }
        }
    }
}

/// Draws `source` onto the canvas with its top-left corner at `(x, y)`.
/// Pixels falling outside the canvas are dropped.
pub fn blend(canvas: &mut RgbaImage, x: u32, y: u32, source: &RgbaImage, op: BlendOp) {
    let region = Region::new(x, y, source.width(), source.height());
    let (xs, ys) = region.clip(canvas.width(), canvas.height());

    for dy in ys {
        for dx in xs.clone() {
            let src = *source.get_pixel(dx - x, dy - y);
            let dst = canvas.get_pixel_mut(dx, dy);

            *dst = match op {
                BlendOp::Source => src,
                BlendOp::Over => over(src, *dst),
            };
        }
    }
}

/// Porter-Duff "over" on non-premultiplied pixels.
fn over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        255 => return src,
        0 => return dst,
        _ => {}
    }

    let src_a = src[3] as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let blended = (src[i] as f32 * src_a + dst[i] as f32 * dst_a * (1.0 - src_a)) / out_a;
        out[i] = blended.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;

    Rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn test_dispose_background_clears_region_only() {
        let mut canvas = RgbaImage::from_pixel(4, 4, RED);
        dispose(&mut canvas, Region::new(1, 1, 2, 2), DisposeOp::Background, None);

        assert_eq!(*canvas.get_pixel(1, 1), TRANSPARENT);
        assert_eq!(*canvas.get_pixel(2, 2), TRANSPARENT);
        assert_eq!(*canvas.get_pixel(0, 0), RED);
        assert_eq!(*canvas.get_pixel(3, 3), RED);
    }

    #[test]
    fn test_dispose_previous_without_snapshot() {
        let mut canvas = RgbaImage::from_pixel(2, 2, RED);
        dispose(&mut canvas, Region::new(0, 0, 2, 2), DisposeOp::Previous, None);
        assert!(canvas.pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_dispose_previous_restores_region() {
        let snapshot = RgbaImage::from_pixel(4, 4, BLUE);
        let mut canvas = RgbaImage::from_pixel(4, 4, RED);

        dispose(&mut canvas, Region::new(0, 0, 2, 4), DisposeOp::Previous, Some(&snapshot));

        assert_eq!(*canvas.get_pixel(1, 3), BLUE);
        assert_eq!(*canvas.get_pixel(2, 0), RED);
    }

    #[test]
    fn test_blend_source_copies_alpha() {
        let mut canvas = RgbaImage::from_pixel(3, 3, RED);
        let source = RgbaImage::from_pixel(1, 1, Rgba([0, 255, 0, 10]));

        blend(&mut canvas, 2, 2, &source, BlendOp::Source);

        assert_eq!(*canvas.get_pixel(2, 2), Rgba([0, 255, 0, 10]));
        assert_eq!(*canvas.get_pixel(1, 1), RED);
    }

    #[test]
    fn test_blend_over() {
        let mut canvas = RgbaImage::from_pixel(1, 1, BLUE);
        blend(&mut canvas, 0, 0, &RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 0])), BlendOp::Over);
        assert_eq!(*canvas.get_pixel(0, 0), BLUE);

        blend(&mut canvas, 0, 0, &RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128])), BlendOp::Over);
        let pixel = *canvas.get_pixel(0, 0);
        assert_eq!(pixel[3], 255);
        assert!((pixel[0] as i32 - 128).abs() <= 1);
        assert!((pixel[2] as i32 - 127).abs() <= 1);

        let mut empty = RgbaImage::new(1, 1);
        blend(&mut empty, 0, 0, &RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 40])), BlendOp::Over);
        assert_eq!(*empty.get_pixel(0, 0), Rgba([10, 20, 30, 40]));
    }

    #[test]
    fn test_blend_clips_to_canvas() {
        let mut canvas = RgbaImage::new(2, 2);
        blend(&mut canvas, 1, 1, &RgbaImage::from_pixel(3, 3, RED), BlendOp::Source);

        assert_eq!(*canvas.get_pixel(1, 1), RED);
        assert_eq!(*canvas.get_pixel(0, 0), TRANSPARENT);
    }
}
