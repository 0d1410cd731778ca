//! Color and tone enhancement by blending against a degenerate image.
//!
//! Every operation here has the same shape: build a "degenerate" version of
//! the input, then interpolate (or extrapolate) between the two:
//!
//! ```text
//! out = degenerate + factor · (image − degenerate)
//! ```
//!
//! | Operation | Degenerate image | factor 0 | factor 1 |
//! |---|---|---|---|
//! | [`saturate`] | grayscale copy | grayscale | identity |
//! | [`brighten`] | black | black | identity |
//! | [`contrast`] | flat gray at the mean luma | flat gray | identity |
//! | [`sharpen`] | 3×3 smoothed copy | soft | identity |
//!
//! Factors above 1 push away from the degenerate image. Alpha channels pass
//! through untouched.

use super::filters::{SMOOTH, filter3x3};
use super::pixels::{ByteImage, pixel_luma, to_byte};
use image::DynamicImage;

/// Blend `image` against a degenerate gray level computed per pixel.
fn blend_with(image: ByteImage, factor: f32, degenerate: impl Fn(&[u8]) -> u8) -> DynamicImage {
    let mut out = image;
    let channels = out.channels();
    let color = out.layout.color_channels();
    for px in out.data.chunks_exact_mut(channels) {
        let d = degenerate(px) as f32;
        for v in &mut px[..color] {
            *v = to_byte(d + factor * (*v as f32 - d));
        }
    }
    out.into_dynamic()
}

/// Scale color saturation. 1.0 is identity, 0.0 is grayscale.
pub fn saturate(image: &DynamicImage, factor: f32) -> DynamicImage {
    let bytes = ByteImage::from_dynamic(image);
    let layout = bytes.layout;
    blend_with(bytes, factor, |px| pixel_luma(px, layout))
}

/// Scale brightness. 1.0 is identity, 0.0 is black.
pub fn brighten(image: &DynamicImage, factor: f32) -> DynamicImage {
    blend_with(ByteImage::from_dynamic(image), factor, |_| 0)
}

/// Scale contrast around the image's mean luma.
pub fn contrast(image: &DynamicImage, factor: f32) -> DynamicImage {
    let bytes = ByteImage::from_dynamic(image);
    let mean = mean_luma(&bytes);
    blend_with(bytes, factor, |_| mean)
}

/// Sharpen (`factor > 1`) or soften (`factor < 1`) against a smoothed copy.
pub fn sharpen(image: &DynamicImage, factor: f32) -> DynamicImage {
    let bytes = ByteImage::from_dynamic(image);
    let smooth = filter3x3(&bytes, &SMOOTH);
    let channels = bytes.channels();
    let color = bytes.layout.color_channels();

    let mut out = bytes;
    for (px, sm) in out
        .data
        .chunks_exact_mut(channels)
        .zip(smooth.data.chunks_exact(channels))
    {
        for c in 0..color {
            let d = sm[c] as f32;
            px[c] = to_byte(d + factor * (px[c] as f32 - d));
        }
    }
    out.into_dynamic()
}

/// Mean luma over all pixels, rounded. Empty images report 0.
pub fn mean_luma(bytes: &ByteImage) -> u8 {
    let channels = bytes.channels();
    let count = bytes.data.len() / channels;
    if count == 0 {
        return 0;
    }
    let sum: u64 = bytes
        .data
        .chunks_exact(channels)
        .map(|px| pixel_luma(px, bytes.layout) as u64)
        .sum();
    ((sum as f64 / count as f64) + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_rgb, gradient_rgba, solid_rgb};
    use image::Rgb;

    // =========================================================================
    // saturate
    // =========================================================================

    #[test]
    fn saturate_one_is_identity() {
        let img = gradient_rgb(20, 10);
        assert_eq!(saturate(&img, 1.0), img);
    }

    #[test]
    fn saturate_zero_is_grayscale() {
        let img = gradient_rgb(20, 10);
        let gray = saturate(&img, 0.0).to_rgb8();
        for p in gray.pixels() {
            assert_eq!(p[0], p[1]);
            assert_eq!(p[1], p[2]);
        }
    }

    #[test]
    fn saturate_boost_pushes_channels_apart() {
        let img = solid_rgb(4, 4, [150, 100, 100]);
        let boosted = saturate(&img, 2.0).to_rgb8();
        let p = boosted.get_pixel(0, 0);
        assert!(p[0] > 150);
        assert!(p[1] < 100);
    }

    #[test]
    fn saturate_keeps_alpha() {
        let img = gradient_rgba(8, 8);
        let out = saturate(&img, 0.0).to_rgba8();
        for (after, before) in out.pixels().zip(img.to_rgba8().pixels()) {
            assert_eq!(after[3], before[3]);
        }
    }

    // =========================================================================
    // brighten
    // =========================================================================

    #[test]
    fn brighten_zero_is_black() {
        let out = brighten(&gradient_rgb(8, 8), 0.0).to_rgb8();
        assert!(out.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn brighten_scales_linearly() {
        let out = brighten(&solid_rgb(2, 2, [100, 50, 200]), 1.5).to_rgb8();
        assert_eq!(*out.get_pixel(0, 0), Rgb([150, 75, 255]));
    }

    // =========================================================================
    // contrast
    // =========================================================================

    #[test]
    fn contrast_zero_is_flat_mean_gray() {
        let out = contrast(&gradient_rgb(16, 16), 0.0).to_rgb8();
        let first = *out.get_pixel(0, 0);
        assert!(out.pixels().all(|p| *p == first));
        assert_eq!(first[0], first[1]);
    }

    #[test]
    fn contrast_boost_widens_range() {
        let img = gradient_rgb(32, 32);
        let spread = |i: &DynamicImage| {
            let l = i.to_luma8();
            let max = *l.as_raw().iter().max().unwrap() as i32;
            let min = *l.as_raw().iter().min().unwrap() as i32;
            max - min
        };
        assert!(spread(&contrast(&img, 1.8)) >= spread(&img));
    }

    #[test]
    fn mean_luma_of_solid_image() {
        let bytes = ByteImage::from_dynamic(&solid_rgb(3, 3, [255, 0, 0]));
        assert_eq!(mean_luma(&bytes), 76);
    }

    // =========================================================================
    // sharpen
    // =========================================================================

    #[test]
    fn sharpen_one_is_identity() {
        let img = gradient_rgb(12, 12);
        assert_eq!(sharpen(&img, 1.0), img);
    }

    #[test]
    fn sharpen_leaves_flat_regions_alone() {
        let img = solid_rgb(10, 10, [90, 90, 90]);
        assert_eq!(sharpen(&img, 3.0), img);
    }

    #[test]
    fn sharpen_increases_step_edge_overshoot() {
        let mut buf = image::RgbImage::from_pixel(10, 10, Rgb([50, 50, 50]));
        for y in 0..10 {
            for x in 5..10 {
                buf.put_pixel(x, y, Rgb([200, 200, 200]));
            }
        }
        let out = sharpen(&DynamicImage::ImageRgb8(buf), 2.0).to_rgb8();
        assert!(out.get_pixel(4, 5)[0] < 50);
        assert!(out.get_pixel(5, 5)[0] > 200);
    }
}
