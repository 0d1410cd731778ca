//! 8-bit interleaved pixel access shared by the per-pixel transforms.
//!
//! `DynamicImage` has a dozen variants. The noise, enhance and filter code
//! only ever needs bytes, so every image is narrowed to one of four 8-bit
//! layouts, processed as a flat `Vec<u8>`, and rebuilt afterwards.

use image::{DynamicImage, ImageBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    L,
    La,
    Rgb,
    Rgba,
}

impl Layout {
    pub fn channels(self) -> usize {
        match self {
            Self::L => 1,
            Self::La => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, Self::La | Self::Rgba)
    }

    /// Channels carrying color or luminance, i.e. everything but alpha.
    pub fn color_channels(self) -> usize {
        if self.has_alpha() {
            self.channels() - 1
        } else {
            self.channels()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ByteImage {
    pub width: u32,
    pub height: u32,
    pub layout: Layout,
    pub data: Vec<u8>,
}

impl ByteImage {
    /// Narrow any image to 8 bits per channel, keeping gray/color and alpha.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let color = image.color();
        let (layout, data) = match image {
            DynamicImage::ImageLuma8(buf) => (Layout::L, buf.as_raw().clone()),
            DynamicImage::ImageLumaA8(buf) => (Layout::La, buf.as_raw().clone()),
            DynamicImage::ImageRgb8(buf) => (Layout::Rgb, buf.as_raw().clone()),
            DynamicImage::ImageRgba8(buf) => (Layout::Rgba, buf.as_raw().clone()),
            other if !color.has_color() && color.has_alpha() => {
                (Layout::La, other.to_luma_alpha8().into_raw())
            }
            other if !color.has_color() => (Layout::L, other.to_luma8().into_raw()),
            other if color.has_alpha() => (Layout::Rgba, other.to_rgba8().into_raw()),
            other => (Layout::Rgb, other.to_rgb8().into_raw()),
        };
        Self {
            width,
            height,
            layout,
            data,
        }
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels()
    }

    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let at = self.offset(x, y);
        &self.data[at..at + self.channels()]
    }

    pub fn into_dynamic(self) -> DynamicImage {
        let Self {
            width,
            height,
            layout,
            data,
        } = self;
        let expect_len = "buffer length always matches width * height * channels";
        match layout {
            Layout::L => {
                DynamicImage::ImageLuma8(ImageBuffer::from_raw(width, height, data).expect(expect_len))
            }
            Layout::La => DynamicImage::ImageLumaA8(
                ImageBuffer::from_raw(width, height, data).expect(expect_len),
            ),
            Layout::Rgb => {
                DynamicImage::ImageRgb8(ImageBuffer::from_raw(width, height, data).expect(expect_len))
            }
            Layout::Rgba => DynamicImage::ImageRgba8(
                ImageBuffer::from_raw(width, height, data).expect(expect_len),
            ),
        }
    }
}

/// ITU-R 601-2 luma of an RGB triple, rounded.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}

/// Luma of one pixel in `layout`. Gray layouts return their value as is.
pub fn pixel_luma(px: &[u8], layout: Layout) -> u8 {
    match layout {
        Layout::L | Layout::La => px[0],
        Layout::Rgb | Layout::Rgba => luma(px[0], px[1], px[2]),
    }
}

/// Clamp a float channel value back into a byte.
pub fn to_byte(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
