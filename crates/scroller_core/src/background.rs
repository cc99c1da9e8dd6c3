//! Horizontally tiling background.
//!
//! The visible window of the source image starts at the scroll offset and is
//! `min(viewport_width, image_width)` source pixels wide, stretched over the
//! whole viewport. When that window runs past the right edge of the image, the
//! overflow is copied from the left edge into the rest of the viewport:
//!
//! ```text
//! dest_remainder = viewport_width * (overflow / window_width)
//! ```
//!
//! With equal image and viewport widths the scale is 1 and this is a plain
//! two-piece copy. Narrower images are stretched; wider ones are cropped.

use crate::animation::ImageHandle;
use crate::error::{check_finite, ConfigError};
use crate::render::Rect;

/// One source-to-destination copy of a background segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub src: Rect,
    pub dst: Rect,
}

/// The one or two copies needed to fill the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPair {
    pub main: Segment,
    pub wrapped: Option<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollingBackground {
    image: ImageHandle,
    offset: f32,
    speed: f32,
}

impl ScrollingBackground {
    pub fn new(image: ImageHandle, speed: f32) -> Result<Self, ConfigError> {
        if image.width == 0 || image.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "background.image",
                reason: format!("image is {}x{}", image.width, image.height),
            });
        }
        check_finite("background.scroll_speed", speed, true)?;
        Ok(Self {
            image,
            offset: 0.0,
            speed,
        })
    }

    pub fn image(&self) -> ImageHandle {
        self.image
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Advance by one tick. Overshoot past the image width is kept rather
    /// than discarded so non-integer speeds don't stutter at the seam.
    pub fn step(&mut self) {
        let width = self.image.width as f32;
        self.offset += self.speed;
        if self.offset >= width {
            self.offset %= width;
            log::debug!("Background {} wrapped to {:.2}", self.image.id, self.offset);
        }
    }

    pub fn segments(&self, viewport_width: f32, viewport_height: f32) -> SegmentPair {
        segments_at(self.image, self.offset, viewport_width, viewport_height)
    }
}

pub fn segments_at(
    image: ImageHandle,
    offset: f32,
    viewport_width: f32,
    viewport_height: f32,
) -> SegmentPair {
    let image_width = image.width as f32;
    let image_height = image.height as f32;
    let window = viewport_width.min(image_width);
    let main_width = window.min(image_width - offset);
    let overflow = window - main_width;

    if overflow <= 0.0 {
        return SegmentPair {
            main: Segment {
                src: Rect::new(offset, 0.0, window, image_height),
                dst: Rect::new(0.0, 0.0, viewport_width, viewport_height),
            },
            wrapped: None,
        };
    }

    let wrapped_dst_width = viewport_width * (overflow / window);
    let main_dst_width = viewport_width - wrapped_dst_width;
    SegmentPair {
        main: Segment {
            src: Rect::new(offset, 0.0, main_width, image_height),
            dst: Rect::new(0.0, 0.0, main_dst_width, viewport_height),
        },
        wrapped: Some(Segment {
            src: Rect::new(0.0, 0.0, overflow, image_height),
            dst: Rect::new(main_dst_width, 0.0, wrapped_dst_width, viewport_height),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn image(width: u32) -> ImageHandle {
        ImageHandle::new(3, width, 500)
    }

    #[test]
    fn offset_stays_in_range_and_wraps() {
        let width = 800;
        let speed = 3.0_f32;
        let mut background = ScrollingBackground::new(image(width), speed).expect("valid");
        let ticks = (width as f32 / speed).ceil() as usize;

        let mut wrapped = false;
        let mut previous = background.offset();
        for _ in 0..ticks {
            background.step();
            let offset = background.offset();
            assert!(offset >= 0.0, "negative offset {offset}");
            assert!(offset < width as f32, "offset {offset} reached image width");
            if offset < previous {
                wrapped = true;
            }
            previous = offset;
        }
        assert!(wrapped, "no wrap after {ticks} ticks");
    }

    #[test]
    fn wrap_keeps_overshoot() {
        let mut background = ScrollingBackground::new(image(10), 4.0).expect("valid");
        background.step();
        background.step();
        background.step();
        assert!((background.offset() - 2.0).abs() < EPS);
    }

    #[test]
    fn speed_larger_than_image_still_in_range() {
        let mut background = ScrollingBackground::new(image(10), 25.0).expect("valid");
        background.step();
        assert!((background.offset() - 5.0).abs() < EPS);
    }

    #[test]
    fn zero_speed_never_moves() {
        let mut background = ScrollingBackground::new(image(10), 0.0).expect("valid");
        for _ in 0..10 {
            background.step();
        }
        assert_eq!(background.offset(), 0.0);
    }

    #[test]
    fn invalid_speed_or_image_is_rejected() {
        assert!(ScrollingBackground::new(image(10), -1.0).is_err());
        assert!(ScrollingBackground::new(image(10), f32::NAN).is_err());
        assert!(ScrollingBackground::new(image(0), 1.0).is_err());
    }

    #[test]
    fn single_segment_at_zero_offset() {
        let pair = segments_at(image(800), 0.0, 800.0, 500.0);
        assert!(pair.wrapped.is_none());
        assert_eq!(pair.main.src, Rect::new(0.0, 0.0, 800.0, 500.0));
        assert_eq!(pair.main.dst, Rect::new(0.0, 0.0, 800.0, 500.0));
    }

    #[test]
    fn wrapped_segment_fills_remaining_width() {
        let pair = segments_at(image(800), 600.0, 800.0, 500.0);
        assert_eq!(pair.main.src, Rect::new(600.0, 0.0, 200.0, 500.0));
        assert_eq!(pair.main.dst, Rect::new(0.0, 0.0, 200.0, 500.0));
        let wrapped = pair.wrapped.expect("second segment");
        assert_eq!(wrapped.src, Rect::new(0.0, 0.0, 600.0, 500.0));
        assert_eq!(wrapped.dst, Rect::new(200.0, 0.0, 600.0, 500.0));
    }

    #[test]
    fn wider_image_crops_to_viewport() {
        let pair = segments_at(image(1000), 100.0, 800.0, 500.0);
        assert!(pair.wrapped.is_none());
        assert_eq!(pair.main.src, Rect::new(100.0, 0.0, 800.0, 500.0));

        let pair = segments_at(image(1000), 900.0, 800.0, 500.0);
        let wrapped = pair.wrapped.expect("second segment");
        assert_eq!(pair.main.src.w, 100.0);
        assert_eq!(wrapped.src.w, 700.0);
        assert_eq!(pair.main.dst.w + wrapped.dst.w, 800.0);
    }

    #[test]
    fn narrow_image_is_stretched_with_scaled_remainder() {
        // 400px image over an 800px viewport: source window is the whole image.
        let pair = segments_at(image(400), 100.0, 800.0, 500.0);
        assert_eq!(pair.main.src, Rect::new(100.0, 0.0, 300.0, 500.0));
        assert!((pair.main.dst.w - 600.0).abs() < EPS);
        let wrapped = pair.wrapped.expect("second segment");
        assert_eq!(wrapped.src, Rect::new(0.0, 0.0, 100.0, 500.0));
        assert!((wrapped.dst.x - 600.0).abs() < EPS);
        assert!((wrapped.dst.w - 200.0).abs() < EPS);
    }

    #[test]
    fn segments_always_cover_viewport() {
        let mut background = ScrollingBackground::new(image(640), 7.3).expect("valid");
        for _ in 0..500 {
            background.step();
            let pair = background.segments(800.0, 500.0);
            let covered = pair.main.dst.w + pair.wrapped.map_or(0.0, |s| s.dst.w);
            assert!((covered - 800.0).abs() < 1e-2);
            assert!(pair.main.src.x + pair.main.src.w <= 640.0 + EPS);
        }
    }
}
