//! Image table behind the core's opaque [`ImageHandle`]s.
//!
//! Missing files are not fatal: callers supply a generated placeholder and a
//! warning is logged.

use std::f32::consts::TAU;
use std::path::Path;

use image::{ImageError, Rgba, RgbaImage};
use scroller_core::ImageHandle;

#[derive(Default)]
pub struct ImageStore {
    images: Vec<RgbaImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn insert(&mut self, image: RgbaImage) -> ImageHandle {
        let handle = ImageHandle::new(self.images.len() as u32, image.width(), image.height());
        self.images.push(image);
        handle
    }

    pub fn get(&self, handle: ImageHandle) -> Option<&RgbaImage> {
        self.images.get(handle.id as usize)
    }

    pub fn load(&mut self, path: &Path) -> Result<ImageHandle, ImageError> {
        let image = image::open(path)?.to_rgba8();
        log::info!(
            "Loaded image {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(self.insert(image))
    }

    pub fn load_or_else(
        &mut self,
        path: &Path,
        fallback: impl FnOnce() -> RgbaImage,
    ) -> ImageHandle {
        match self.load(path) {
            Ok(handle) => handle,
            Err(err) => {
                let image = fallback();
                log::warn!(
                    "Failed to load image '{}': {}. Using a generated {}x{} placeholder.",
                    path.display(),
                    err,
                    image.width(),
                    image.height()
                );
                self.insert(image)
            }
        }
    }
}

/// Sprite sheet of `columns x rows` frames: a block figure whose legs swing
/// with the frame index, so animation is visible without real art.
pub fn placeholder_sheet(
    frame_width: u32,
    frame_height: u32,
    columns: u32,
    rows: u32,
) -> RgbaImage {
    let width = (frame_width * columns).max(1);
    let height = (frame_height * rows).max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        let column = x / frame_width.max(1);
        let row = y / frame_height.max(1);
        let fx = (x % frame_width.max(1)) as f32 / frame_width.max(1) as f32;
        let fy = (y % frame_height.max(1)) as f32 / frame_height.max(1) as f32;
        let phase = column as f32 / columns.max(1) as f32 * TAU;

        let body = (0.3..0.7).contains(&fx) && (0.15..0.65).contains(&fy);
        let head = (0.35..0.65).contains(&fx) && fy < 0.15;
        let leg_shift = phase.sin() * 0.12;
        let legs = fy >= 0.65
            && ((0.3 + leg_shift..0.45 + leg_shift).contains(&fx)
                || (0.55 - leg_shift..0.7 - leg_shift).contains(&fx));

        if head {
            Rgba([240, 200, 160, 255])
        } else if body {
            if row == 0 {
                Rgba([200, 60, 60, 255])
            } else {
                Rgba([60, 90, 200, 255])
            }
        } else if legs {
            Rgba([40, 40, 40, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Sky gradient over rolling hills. The hill profile repeats exactly across
/// the width so the image tiles horizontally.
pub fn placeholder_background(width: u32, height: u32) -> RgbaImage {
    let width = width.max(1);
    let height = height.max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        let u = x as f32 / width as f32;
        let v = y as f32 / height as f32;
        let hill = 0.7 - 0.08 * (u * TAU * 2.0).sin() - 0.04 * (u * TAU * 5.0).cos();
        if v > hill {
            let shade = (90.0 + 40.0 * (1.0 - v)) as u8;
            Rgba([40, shade, 50, 255])
        } else {
            let r = (110.0 + 80.0 * v) as u8;
            let g = (160.0 + 60.0 * v) as u8;
            Rgba([r, g, 235, 255])
        }
    })
}
