//! Sprite-sheet frame selection.
//!
//! A [`FrameStrip`] describes one row of equally sized frames in an image.
//! An [`AnimatedSprite`] owns a real-valued animation cursor; the frame shown
//! is `floor(cursor) mod frame_count`, so looping is implicit in frame
//! selection and the cursor itself only ever grows.

use crate::error::ConfigError;
use crate::render::Rect;

/// Opaque reference to an image owned by the platform layer, carrying the
/// dimensions the core needs for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

impl ImageHandle {
    pub fn new(id: u32, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStrip {
    image: ImageHandle,
    frame_width: u32,
    frame_height: u32,
    row: u32,
    frame_count: u32,
}

impl FrameStrip {
    pub fn new(
        image: ImageHandle,
        frame_width: u32,
        frame_height: u32,
        row: u32,
        frame_count: u32,
    ) -> Result<Self, ConfigError> {
        if frame_count == 0 {
            return Err(ConfigError::EmptyFrameStrip);
        }
        if frame_width == 0 || frame_height == 0 {
            return Err(ConfigError::ZeroFrameSize {
                width: frame_width,
                height: frame_height,
            });
        }
        let strip_width = u64::from(frame_width) * u64::from(frame_count);
        if strip_width > u64::from(image.width) {
            return Err(ConfigError::StripTooWide {
                frame_width,
                frame_count,
                image_width: image.width,
            });
        }
        let strip_bottom = (u64::from(row) + 1) * u64::from(frame_height);
        if strip_bottom > u64::from(image.height) {
            return Err(ConfigError::RowOutOfBounds {
                row,
                frame_height,
                image_height: image.height,
            });
        }
        Ok(Self {
            image,
            frame_width,
            frame_height,
            row,
            frame_count,
        })
    }

    pub fn image(&self) -> ImageHandle {
        self.image
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedSprite {
    strip: FrameStrip,
    cursor: f64,
}

impl AnimatedSprite {
    pub fn new(strip: FrameStrip) -> Self {
        Self { strip, cursor: 0.0 }
    }

    pub fn strip(&self) -> &FrameStrip {
        &self.strip
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Move the cursor forward. Negative or non-finite deltas are ignored so
    /// the cursor stays monotonic.
    pub fn advance(&mut self, delta: f64) {
        if delta.is_finite() && delta > 0.0 {
            self.cursor += delta;
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0.0;
    }

    pub fn frame_index(&self) -> u32 {
        let whole = self.cursor.floor() as u64;
        (whole % u64::from(self.strip.frame_count)) as u32
    }

    /// Source rectangle of the current frame within the strip's image.
    pub fn current_frame_rect(&self) -> Rect {
        let column = self.frame_index();
        Rect {
            x: (column * self.strip.frame_width) as f32,
            y: (self.strip.row * self.strip.frame_height) as f32,
            w: self.strip.frame_width as f32,
            h: self.strip.frame_height as f32,
        }
    }
}
