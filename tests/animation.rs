mod common;

#[cfg(test)]
mod tests {
    use crate::common::*;
    use apngkit::chunks::{BlendOp, DisposeOp, FrameDataChunk};
    use apngkit::{
        assemble, blend, dispose, render_frames, Apng, ApngError, AssemblerOptions, ChunkType, Frame, FramePayload,
        Png, Region,
    };
    use image::{Rgba, RgbaImage};

    fn inputs() -> Vec<Vec<u8>> {
        let opaque = RgbaImage::from_pixel(10, 10, RED);

        let mut single = RgbaImage::new(10, 10);
        single.put_pixel(3, 5, GREEN);

        let empty = RgbaImage::new(10, 10);

        vec![encode_png(&opaque), encode_png(&single), encode_png(&empty)]
    }

    #[test]
    pub fn test_assemble_optimized() -> Result<(), Box<dyn std::error::Error>> {
        let apng = assemble(&inputs(), AssemblerOptions::default())?.ok_or("no animation")?;

        assert_eq!(apng.frame_count(), 3);
        assert_eq!(apng.animation_control().map(|c| (c.num_frames, c.num_plays)), Some((3, 0)));
        assert!(apng.metadata().time.is_some());
        assert!(apng.frames()[0].is_default_image());

        let geometry: Vec<_> = apng
            .frames()
            .iter()
            .map(|f| {
                let c = f.control();
                (c.x_offset, c.y_offset, c.width, c.height)
            })
            .collect();
        assert_eq!(geometry, vec![(0, 0, 10, 10), (3, 5, 1, 1), (0, 0, 1, 1)]);

        for frame in apng.frames() {
            let c = frame.control();
            assert_eq!((c.delay_num, c.delay_den), (1, 10));
            assert_eq!(c.dispose_op, DisposeOp::Background);
            assert_eq!(c.blend_op, BlendOp::Source);
        }

        assert_eq!(*apng.frame_bitmap(1)?.get_pixel(0, 0), GREEN);
        assert_eq!(apng.frame_bitmap(2)?.get_pixel(0, 0)[3], 0);

        Ok(())
    }

    #[test]
    pub fn test_assembled_sequence_numbers() -> Result<(), Box<dyn std::error::Error>> {
        let apng = assemble(&inputs(), AssemblerOptions::default())?.ok_or("no animation")?;
        let bytes = apng.to_bytes()?;

        let mut sequence = Vec::new();
        let mut idat_after_first_fctl = 0;
        for chunk in read_chunks(&bytes) {
            match chunk.chunk_type() {
                ChunkType::FCTL | ChunkType::FDAT => {
                    let data = chunk.data();
                    sequence.push(u32::from_be_bytes([data[0], data[1], data[2], data[3]]));
                }
                ChunkType::IDAT => {
                    assert_eq!(sequence, vec![0], "IDAT must directly follow the first fcTL");
                    idat_after_first_fctl += 1;
                }
                _ => {}
            }
        }

        assert!(idat_after_first_fctl > 0);
        assert_eq!(sequence, (0..sequence.len() as u32).collect::<Vec<_>>());

        // fcTL, fdAT..., fcTL, fdAT... in construction order.
        let tags: Vec<_> = chunk_types(&bytes)
            .into_iter()
            .filter(|t| matches!(*t, ChunkType::FCTL | ChunkType::FDAT))
            .collect();
        assert_eq!(tags[0], ChunkType::FCTL);
        assert_eq!(tags[1], ChunkType::FCTL);
        assert_eq!(tags[2], ChunkType::FDAT);

        let reloaded = Apng::from_bytes(&bytes)?;
        assert_eq!(reloaded.frame_count(), 3);
        assert_eq!(reloaded.to_bytes()?, bytes);

        Ok(())
    }

    #[test]
    pub fn test_assemble_without_optimizing() -> Result<(), Box<dyn std::error::Error>> {
        let apng = assemble(&inputs(), AssemblerOptions { optimize: false })?.ok_or("no animation")?;

        for frame in apng.frames() {
            let c = frame.control();
            assert_eq!((c.x_offset, c.y_offset, c.width, c.height), (0, 0, 10, 10));
        }

        match apng.frames()[1].payload() {
            FramePayload::Delta(list) => {
                let expected = Png::from_bytes(&inputs()[1])?.compressed_data();
                let actual: Vec<u8> = list.iter().flat_map(|d| d.data.clone()).collect();
                assert_eq!(actual, expected);
            }
            FramePayload::DefaultImage(_) => panic!("second frame should carry its own data"),
        }

        Ok(())
    }

    #[test]
    pub fn test_assemble_rejects_oversized_frames() {
        let images = vec![
            encode_png(&RgbaImage::from_pixel(4, 4, RED)),
            encode_png(&RgbaImage::from_pixel(5, 4, RED)),
        ];

        assert!(matches!(
            assemble(&images, AssemblerOptions { optimize: false }),
            Err(ApngError::InvalidFrameGeometry { width: 5, canvas_width: 4, .. })
        ));
    }

    #[test]
    pub fn test_assemble_single_image() -> Result<(), Box<dyn std::error::Error>> {
        let images = vec![encode_png(&RgbaImage::from_pixel(3, 3, BLUE))];
        let apng = assemble(&images, AssemblerOptions::default())?.ok_or("no animation")?;

        assert_eq!(apng.frame_count(), 1);
        assert!(apng.is_animated());
        assert!(chunk_types(&apng.to_bytes()?).iter().all(|t| *t != ChunkType::FDAT));

        Ok(())
    }

    #[test]
    pub fn test_dispose_previous_scenario() {
        let mut canvas = RgbaImage::new(8, 8);
        let snapshot = canvas.clone();

        let region_a = Region::new(0, 0, 4, 4);
        blend(&mut canvas, 0, 0, &RgbaImage::from_pixel(4, 4, RED), BlendOp::Source);
        blend(&mut canvas, 1, 1, &RgbaImage::from_pixel(4, 4, BLUE), BlendOp::Over);

        dispose(&mut canvas, region_a, DisposeOp::Previous, Some(&snapshot));

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(*canvas.get_pixel(x, y), CLEAR, "({}, {})", x, y);
            }
        }
        assert_eq!(*canvas.get_pixel(4, 4), BLUE);
        assert_eq!(*canvas.get_pixel(1, 4), BLUE);
        assert_eq!(*canvas.get_pixel(5, 5), CLEAR);
    }

    fn animation(second_dispose: DisposeOp) -> Result<Apng, Box<dyn std::error::Error>> {
        let base = Png::from_bytes(&encode_png(&RgbaImage::from_pixel(4, 4, RED)))?;
        let default_data = base.image_data.clone();
        let mut apng = Apng::from_png(base);

        apng.add_frame(Frame::default_image(fctl(0, 4, 4, 0, 0), default_data))?;

        let mut second = fctl(1, 2, 2, 1, 1);
        second.dispose_op = second_dispose;
        apng.add_frame(Frame::delta(
            second,
            vec![FrameDataChunk { sequence_number: 2, data: solid_payload(2, 2, BLUE) }],
        ))?;

        let mut third = fctl(3, 1, 1, 0, 0);
        third.blend_op = BlendOp::Over;
        third.delay_num = 1;
        third.delay_den = 4;
        apng.add_frame(Frame::delta(
            third,
            vec![FrameDataChunk { sequence_number: 4, data: solid_payload(1, 1, Rgba([0, 255, 0, 128])) }],
        ))?;

        apng.set_animation_control(apngkit::chunks::AnimationControl { num_frames: 3, num_plays: 0 });
        apng.validate()?;

        Ok(apng)
    }

    #[test]
    pub fn test_playback_restores_previous() -> Result<(), Box<dyn std::error::Error>> {
        let frames = render_frames(&animation(DisposeOp::Previous)?)?;
        assert_eq!(frames.len(), 3);

        assert!(frames[0].image.pixels().all(|p| *p == RED));
        assert_eq!(*frames[1].image.get_pixel(1, 1), BLUE);
        assert_eq!(*frames[1].image.get_pixel(2, 2), BLUE);
        assert_eq!(*frames[1].image.get_pixel(3, 3), RED);

        let last = &frames[2].image;
        assert_eq!(*last.get_pixel(1, 1), RED);
        assert_eq!(*last.get_pixel(2, 2), RED);
        let corner = last.get_pixel(0, 0);
        assert_eq!(corner[3], 255);
        assert!(corner[0] > 100 && corner[1] > 100 && corner[2] == 0);

        assert_eq!(frames[1].delay_ms, 100);
        assert_eq!(frames[2].delay_ms, 250);

        Ok(())
    }

    #[test]
    pub fn test_playback_clears_background() -> Result<(), Box<dyn std::error::Error>> {
        let frames = render_frames(&animation(DisposeOp::Background)?)?;
        let last = &frames[2].image;

        assert_eq!(*last.get_pixel(1, 1), CLEAR);
        assert_eq!(*last.get_pixel(2, 2), CLEAR);
        assert_eq!(*last.get_pixel(3, 3), RED);

        Ok(())
    }

    #[test]
    pub fn test_playback_keeps_frame() -> Result<(), Box<dyn std::error::Error>> {
        let frames = render_frames(&animation(DisposeOp::None)?)?;
        assert_eq!(*frames[2].image.get_pixel(2, 2), BLUE);

        Ok(())
    }

    #[test]
    pub fn test_playback_first_frame_restore_is_noop() -> Result<(), Box<dyn std::error::Error>> {
        let base = Png::from_bytes(&encode_png(&RgbaImage::from_pixel(4, 4, RED)))?;
        let default_data = base.image_data.clone();
        let mut apng = Apng::from_png(base);

        let mut first = fctl(0, 4, 4, 0, 0);
        first.dispose_op = DisposeOp::Previous;
        apng.add_frame(Frame::default_image(first, default_data))?;
        apng.add_frame(Frame::delta(
            fctl(1, 1, 1, 0, 0),
            vec![FrameDataChunk { sequence_number: 2, data: solid_payload(1, 1, GREEN) }],
        ))?;

        apng.set_animation_control(apngkit::chunks::AnimationControl { num_frames: 2, num_plays: 0 });
        apng.validate()?;

        let frames = render_frames(&apng)?;
        assert_eq!(frames.len(), 2);
        assert_eq!(*frames[1].image.get_pixel(0, 0), GREEN);
        assert_eq!(*frames[1].image.get_pixel(3, 3), RED);
        assert_eq!(*frames[1].image.get_pixel(1, 0), RED);

        Ok(())
    }

    #[test]
    pub fn test_playback_still_image() ->Result<(), Box<dyn std::error::Error>> {
        let apng = Apng::from_bytes(&encode_png(&RgbaImage::from_pixel(2, 2, GREEN)))?;
        let frames = render_frames(&apng)?;

        assert_eq!(frames.len(), 1);
        assert!(frames[0].image.pixels().all(|p| *p == GREEN));

        Ok(())
    }

    #[test]
    pub fn test_playback_of_assembled_animation() -> Result<(), Box<dyn std::error::Error>> {
        let apng = assemble(&inputs(), AssemblerOptions::default())?.ok_or("no animation")?;
        let frames = render_frames(&apng)?;

        assert_eq!(frames.len(), 3);
        assert!(frames[0].image.pixels().all(|p| *p == RED));

        // Frame 0 is cleared to background before frame 1 is drawn.
        assert_eq!(*frames[1].image.get_pixel(3, 5), GREEN);
        assert_eq!(frames[1].image.get_pixel(0, 0)[3], 0);
        assert!(frames[2].image.pixels().all(|p| p[3] == 0));

        Ok(())
    }
}
