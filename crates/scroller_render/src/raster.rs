//! CPU implementation of the core's [`Surface`]: nearest-neighbour scaled
//! blits with source-over alpha blending into an RGBA canvas.
//!
//! A destination pixel is written when its centre falls inside the blit's
//! destination rectangle, so two blits that share an edge never overlap or
//! leave a gap.

use std::path::Path;

use image::{ImageError, Rgba, RgbaImage};
use scroller_core::{Blit, Surface};

use crate::images::ImageStore;

pub const DEFAULT_CLEAR: Rgba<u8> = Rgba([0, 0, 0, 255]);

pub struct RasterSurface {
    canvas: RgbaImage,
    clear_color: Rgba<u8>,
    images: ImageStore,
    blits: u64,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, images: ImageStore) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width.max(1), height.max(1), DEFAULT_CLEAR),
            clear_color: DEFAULT_CLEAR,
            images,
            blits: 0,
        }
    }

    pub fn with_clear_color(mut self, color: Rgba<u8>) -> Self {
        self.clear_color = color;
        self
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut ImageStore {
        &mut self.images
    }

    /// Total blits issued since creation, skipped ones included.
    pub fn blit_count(&self) -> u64 {
        self.blits
    }

    pub fn save_png(&self, path: &Path) -> Result<(), ImageError> {
        self.canvas.save(path)
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn clear(&mut self) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = self.clear_color;
        }
    }

    fn draw_image(&mut self, blit: &Blit) {
        self.blits += 1;
        let Some(source) = self.images.get(blit.image) else {
            log::warn!("Blit references unknown image {}", blit.image.id);
            return;
        };
        let (src, dst) = (blit.src, blit.dst);
        if dst.w <= 0.0 || dst.h <= 0.0 || src.w <= 0.0 || src.h <= 0.0 {
            return;
        }

        // Source window clamped to the image, in whole pixels.
        let src_x0 = src.x.max(0.0).floor() as u32;
        let src_y0 = src.y.max(0.0).floor() as u32;
        let src_x1 = ((src.x + src.w).ceil() as u32).min(source.width());
        let src_y1 = ((src.y + src.h).ceil() as u32).min(source.height());
        if src_x0 >= src_x1 || src_y0 >= src_y1 {
            return;
        }

        let canvas_w = self.canvas.width() as f32;
        let canvas_h = self.canvas.height() as f32;
        let x_start = (dst.x - 0.5).ceil().max(0.0) as u32;
        let y_start = (dst.y - 0.5).ceil().max(0.0) as u32;
        let x_end = (dst.x + dst.w - 0.5).ceil().clamp(0.0, canvas_w) as u32;
        let y_end = (dst.y + dst.h - 0.5).ceil().clamp(0.0, canvas_h) as u32;

        for py in y_start..y_end {
            let v = (py as f32 + 0.5 - dst.y) / dst.h;
            let sy = ((src.y + v * src.h).floor() as u32).clamp(src_y0, src_y1 - 1);
            for px in x_start..x_end {
                let mut u = (px as f32 + 0.5 - dst.x) / dst.w;
                if blit.flip_x {
                    u = 1.0 - u;
                }
                let sx = ((src.x + u * src.w).floor() as u32).clamp(src_x0, src_x1 - 1);
                let color = *source.get_pixel(sx, sy);
                blend(self.canvas.get_pixel_mut(px, py), color);
            }
        }
    }
}

fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let alpha = u32::from(src[3]);
    if alpha == 255 {
        *dst = src;
        return;
    }
    if alpha == 0 {
        return;
    }
    let inverse = 255 - alpha;
    for channel in 0..3 {
        let mixed = u32::from(src[channel]) * alpha + u32::from(dst[channel]) * inverse;
        dst[channel] = ((mixed + 127) / 255) as u8;
    }
    dst[3] = (alpha + (u32::from(dst[3]) * inverse + 127) / 255) as u8;
}
