//! Neighborhood filters: 3×3 kernels, Gaussian blur, edge detection.

use super::enhance::contrast;
use super::pixels::ByteImage;
use image::DynamicImage;

/// Center-weighted smoothing used as the degenerate image for sharpening.
/// Normalized by its weight sum of 13.
pub const SMOOTH: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0];

/// Laplacian-style edge finder. Weights sum to zero, so flat regions map to 0.
pub const FIND_EDGES: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];

/// Apply a row-major 3×3 kernel to the color channels of `image`.
///
/// Convolution is `image::imageops::filter3x3`, which divides by the kernel's
/// weight sum when that sum is non-zero and clamps to 0..=255. The outermost
/// one-pixel frame is copied from the source unchanged, as is alpha, so
/// images narrower or shorter than 3 px come back as they went in.
pub fn filter3x3(image: &ByteImage, kernel: &[f32; 9]) -> ByteImage {
    let mut out = image.clone();
    if image.width < 3 || image.height < 3 {
        return out;
    }

    let filtered = ByteImage::from_dynamic(&image.clone().into_dynamic().filter3x3(kernel));
    let color = image.layout.color_channels();
    for y in 1..image.height - 1 {
        for x in 1..image.width - 1 {
            let at = out.offset(x, y);
            out.data[at..at + color].copy_from_slice(&filtered.data[at..at + color]);
        }
    }
    out
}

/// Gaussian blur using `radius` as sigma. A zero radius is a copy.
pub fn blur(image: &DynamicImage, radius: f32) -> DynamicImage {
    if radius <= 0.0 {
        return image.clone();
    }
    image.blur(radius)
}

/// Grayscale edge map: contrast-adjust the luma plane, then find edges.
///
/// The result is always single-channel 8-bit. Its one-pixel frame holds the
/// contrast-adjusted luma rather than edge strength.
pub fn simple_edge_detection(image: &DynamicImage, intensity: f32) -> DynamicImage {
    let gray = DynamicImage::ImageLuma8(image.to_luma8());
    let adjusted = contrast(&gray, intensity);
    filter3x3(&ByteImage::from_dynamic(&adjusted), &FIND_EDGES).into_dynamic()
}
