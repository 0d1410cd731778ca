//! Shared test fixtures: synthetic images and files on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_png(&tmp.path().join("a.png"), 64, 48);
//! write_corrupt_file(&tmp.path().join("b.png"));
//!
//! let framed = framed_image(100, 80, 10); // 10 px black frame
//! ```

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

// =========================================================================
// In-memory images
// =========================================================================

/// RGB gradient: red follows x, green follows y, blue is constant 128.
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    let (dx, dy) = (width.max(2) - 1, height.max(2) - 1);
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / dx) as u8, (y * 255 / dy) as u8, 128])
    }))
}

/// RGBA gradient with alpha falling from 255 on the left to 55 on the right.
pub fn gradient_rgba(width: u32, height: u32) -> DynamicImage {
    let rgb = gradient_rgb(width, height).to_rgb8();
    let dx = width.max(2) - 1;
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Rgba([r, g, b, (255 - x * 200 / dx) as u8])
    }))
}

pub fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

/// Gradient content surrounded by a uniform black frame `border` px wide.
///
/// The content never contains a black pixel.
pub fn framed_image(width: u32, height: u32, border: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let inside = x >= border && y >= border && x < width - border && y < height - border;
        if inside {
            Rgb([(x % 200) as u8 + 40, (y % 200) as u8 + 40, 90])
        } else {
            Rgb([0, 0, 0])
        }
    }))
}

// =========================================================================
// Files on disk
// =========================================================================

/// Write an RGB gradient PNG of the given size.
pub fn write_png(path: &Path, width: u32, height: u32) {
    gradient_rgb(width, height).save(path).unwrap();
}

/// Write bytes that carry an image extension but decode as nothing.
pub fn write_corrupt_file(path: &Path) {
    std::fs::write(path, b"definitely not an image, just some text").unwrap();
}
