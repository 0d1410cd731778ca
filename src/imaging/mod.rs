//! Image processing: codecs, noise, enhancement, filters and geometry.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` with content sniffing |
//! | **Encode** | `image` codecs (JPEG/AVIF with quality, others lossless) |
//! | **Noise** | `rand` draws, bilinear upsampling of coarse fields |
//! | **Enhance** | per-pixel blends on 8-bit buffers |
//! | **3×3 filters** | `DynamicImage::filter3x3`, source border kept |
//! | **Blur / resize** | `DynamicImage::blur`, `resize_exact` with Lanczos3 |
//! | **Rotate** | `rotate90`/`rotate180`/`rotate270`, else `imageproc` warp (nearest) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Transforms**: [`noise`], [`enhance`], [`filters`], [`geometry`], each a
//!   pure `&DynamicImage -> DynamicImage` function set

pub mod backend;
mod calculations;
pub mod enhance;
pub mod filters;
pub mod geometry;
pub mod noise;
mod params;
pub(crate) mod pixels;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    calculate_field_dimensions, calculate_rotated_bounds, calculate_scaled_dimensions,
};
pub use geometry::TransformError;
pub use noise::{NoiseMode, UnknownNoiseMode};
pub use params::{CropBox, OutputFormat, Quality, Rotation, UnknownFormat};
pub use rust_backend::RustBackend;
