//! Pure Rust codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, BMP) | `image::ImageReader` with content sniffing |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) with quality |
//! | Encode → PNG, TIFF, WebP, BMP | `DynamicImage::write_to` (quality ignored) |

use super::backend::{BackendError, ImageBackend};
use super::params::{OutputFormat, Quality};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageError, ImageReader};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Codec backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Color types each encoder accepts without conversion.
fn encoder_accepts(format: OutputFormat, color: ColorType) -> bool {
    use ColorType::*;
    match format {
        OutputFormat::Jpeg => matches!(color, L8 | Rgb8),
        OutputFormat::Png => matches!(
            color,
            L8 | La8 | Rgb8 | Rgba8 | L16 | La16 | Rgb16 | Rgba16
        ),
        OutputFormat::Tiff => matches!(color, L8 | Rgb8 | Rgba8 | L16 | Rgb16 | Rgba16),
        OutputFormat::WebP | OutputFormat::Bmp => matches!(color, L8 | La8 | Rgb8 | Rgba8),
        OutputFormat::Avif => matches!(color, Rgb8 | Rgba8),
    }
}

/// Convert the color model when the target encoder cannot store it.
///
/// Formats without alpha get 3-channel RGB; everything else falls back to
/// 8-bit RGBA when the image has alpha and 8-bit RGB when it does not.
pub fn prepare_for_format(image: &DynamicImage, format: OutputFormat) -> Cow<'_, DynamicImage> {
    if encoder_accepts(format, image.color()) {
        return Cow::Borrowed(image);
    }
    if format.supports_alpha() && image.color().has_alpha() {
        Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8()))
    } else {
        Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8()))
    }
}

fn encode_error(format: OutputFormat, e: ImageError) -> BackendError {
    match e {
        ImageError::IoError(io) => BackendError::Io(io),
        other => BackendError::EncodeFailed(format!("{format}: {other}")),
    }
}

/// JPEG or AVIF with the requested quality.
fn encode_lossy<W: Write>(
    image: &DynamicImage,
    writer: W,
    format: OutputFormat,
    quality: Quality,
) -> Result<(), BackendError> {
    let q = quality.value();
    let result = match format {
        OutputFormat::Avif => {
            image.write_with_encoder(AvifEncoder::new_with_speed_quality(writer, 6, q))
        }
        _ => image.write_with_encoder(JpegEncoder::new_with_quality(writer, q)),
    };
    result.map_err(|e| encode_error(format, e))
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        reader.decode().map_err(|e| BackendError::Undecodable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<(), BackendError> {
        let prepared = prepare_for_format(image, format);
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        if format.uses_quality() {
            encode_lossy(&prepared, &mut writer, format, quality)?;
        } else {
            prepared
                .write_to(&mut writer, format.image_format())
                .map_err(|e| encode_error(format, e))?;
        }

        writer.flush()?;
        Ok(())
    }
}
