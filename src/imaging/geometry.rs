//! Geometric transforms: crop, rotate, resize, scale and black-border trim.
//!
//! Rotations that are a whole number of quarter turns go through the `image`
//! crate's lossless `rotate90`/`rotate180`/`rotate270` whenever the output
//! canvas matches. Every other angle goes through `imageproc`'s projective
//! warp with nearest-neighbor sampling; uncovered canvas is filled with zeros
//! (black, or transparent for layouts with alpha).
//!
//! Resize and scale refuse targets whose pixel buffer would exceed the
//! `image` crate's default allocation limit.

use super::calculations::{calculate_rotated_bounds, calculate_scaled_dimensions, quarter_turns};
use super::params::{CropBox, Rotation};
use super::pixels::{ByteImage, pixel_luma};
use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, Limits, Pixel};
use imageproc::geometric_transformations::{
    Interpolation, Projection, rotate_about_center, warp_into,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Crop box {crop} does not fit a {width}x{height} image")]
    CropOutOfBounds {
        crop: CropBox,
        width: u32,
        height: u32,
    },
    #[error("Resize target {0}x{1} has a zero dimension")]
    ZeroDimension(u32, u32),
    #[error("Scale factor must be positive and finite, got {0}")]
    InvalidScale(f64),
    #[error("Output of {width}x{height} pixels exceeds the allocation limit")]
    DimensionsTooLarge { width: u64, height: u64 },
}

/// Crop to the half-open rectangle `crop`.
pub fn crop(image: &DynamicImage, crop: CropBox) -> Result<DynamicImage, TransformError> {
    let (width, height) = (image.width(), image.height());
    if !crop.fits_within(width, height) {
        return Err(TransformError::CropOutOfBounds {
            crop,
            width,
            height,
        });
    }
    Ok(image.crop_imm(crop.left, crop.top, crop.width(), crop.height()))
}

/// Rotate counter-clockwise about the image center.
pub fn rotate(image: &DynamicImage, rotation: Rotation) -> DynamicImage {
    let degrees = rotation.degrees as f64;
    let square = image.width() == image.height();

    match quarter_turns(degrees) {
        Some(0) => image.clone(),
        Some(2) => image.rotate180(),
        // image's rotate90 is clockwise
        Some(1) if rotation.expand || square => image.rotate270(),
        Some(3) if rotation.expand || square => image.rotate90(),
        _ => rotate_warped(image, degrees, rotation.expand),
    }
}

fn rotate_warped(image: &DynamicImage, degrees: f64, expand: bool) -> DynamicImage {
    // imageproc turns clockwise for positive angles
    let theta = -(degrees.to_radians() as f32);
    let canvas = expand.then(|| calculate_rotated_bounds((image.width(), image.height()), degrees));

    match image {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(rotate_buffer(buf, theta, canvas)),
        DynamicImage::ImageLumaA8(buf) => {
            DynamicImage::ImageLumaA8(rotate_buffer(buf, theta, canvas))
        }
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(rotate_buffer(buf, theta, canvas)),
        DynamicImage::ImageRgba8(buf) => {
            DynamicImage::ImageRgba8(rotate_buffer(buf, theta, canvas))
        }
        other => rotate_warped(&ByteImage::from_dynamic(other).into_dynamic(), degrees, expand),
    }
}

/// Rotate by `theta` radians (clockwise) onto the source canvas, or onto a
/// `canvas` of the given size centered on the rotated image.
fn rotate_buffer<P>(
    buf: &ImageBuffer<P, Vec<u8>>,
    theta: f32,
    canvas: Option<(u32, u32)>,
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + Send + Sync + 'static,
{
    let fill = *P::from_slice(&[0u8; 4][..usize::from(P::CHANNEL_COUNT)]);
    let Some((width, height)) = canvas else {
        return rotate_about_center(buf, theta, Interpolation::Nearest, fill);
    };

    let (src_w, src_h) = buf.dimensions();
    let projection = Projection::translate(width as f32 / 2.0, height as f32 / 2.0)
        * Projection::rotate(theta)
        * Projection::translate(-(src_w as f32) / 2.0, -(src_h as f32) / 2.0);
    let mut out = ImageBuffer::new(width, height);
    warp_into(buf, &projection, Interpolation::Nearest, fill, &mut out);
    out
}

/// Check that a `width × height` resample of `image` fits in `u32` edges and
/// under the default decoder allocation limit.
///
/// Both buffers count: the output, and the `Rgba32F` intermediate of source
/// width × target height that the separable filter passes through.
fn checked_target(
    image: &DynamicImage,
    width: u64,
    height: u64,
) -> Result<(u32, u32), TransformError> {
    let too_large = TransformError::DimensionsTooLarge { width, height };
    let limit = Limits::default().max_alloc.unwrap_or(u64::MAX);
    let output = width
        .checked_mul(height)
        .and_then(|px| px.checked_mul(u64::from(image.color().bytes_per_pixel())));
    let intermediate = u64::from(image.width())
        .checked_mul(height)
        .and_then(|px| px.checked_mul(16));
    match (output, intermediate) {
        (Some(out), Some(tmp)) if out <= limit && tmp <= limit => {}
        _ => return Err(too_large),
    }
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(too_large),
    }
}

/// Resample to exactly `width × height` with Lanczos3.
pub fn resize(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<DynamicImage, TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::ZeroDimension(width, height));
    }
    if (width, height) == (image.width(), image.height()) {
        return Ok(image.clone());
    }
    let (width, height) = checked_target(image, width.into(), height.into())?;
    Ok(image.resize_exact(width, height, FilterType::Lanczos3))
}

/// Resize both edges by `factor`, rounding and keeping at least one pixel.
pub fn scale(image: &DynamicImage, factor: f64) -> Result<DynamicImage, TransformError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(TransformError::InvalidScale(factor));
    }
    let (w, h) = calculate_scaled_dimensions((image.width(), image.height()), factor).ok_or(
        TransformError::DimensionsTooLarge {
            width: (image.width() as f64 * factor) as u64,
            height: (image.height() as f64 * factor) as u64,
        },
    )?;
    resize(image, w, h)
}

/// Bounding box of every pixel whose luma is above zero, if any.
pub fn content_bounds(image: &DynamicImage) -> Option<CropBox> {
    let bytes = ByteImage::from_dynamic(image);
    let mut bounds: Option<CropBox> = None;
    for y in 0..bytes.height {
        for x in 0..bytes.width {
            if pixel_luma(bytes.pixel(x, y), bytes.layout) == 0 {
                continue;
            }
            let b = bounds.get_or_insert(CropBox::new(x, y, x + 1, y + 1));
            b.left = b.left.min(x);
            b.top = b.top.min(y);
            b.right = b.right.max(x + 1);
            b.bottom = b.bottom.max(y + 1);
        }
    }
    bounds
}

/// Crop away black rows and columns around the content.
///
/// An all-black image is returned unchanged.
pub fn remove_black_borders(image: &DynamicImage) -> DynamicImage {
    match content_bounds(image) {
        Some(b) => image.crop_imm(b.left, b.top, b.width(), b.height()),
        None => image.clone(),
    }
}
