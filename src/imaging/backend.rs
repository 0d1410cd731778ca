//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations that touch the
//! filesystem: decode and encode. Everything between those two calls is a
//! pure function over [`DynamicImage`] values.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust codecs.

use super::params::{OutputFormat, Quality};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file exists but is not an image we can decode.
    #[error("Cannot decode {path}: {reason}")]
    Undecodable { path: PathBuf, reason: String },
    #[error("Encoding failed: {0}")]
    EncodeFailed(String),
}

/// Trait for image codec backends.
///
/// The pipeline is generic over this trait so orchestration can be tested
/// with a recording mock that never touches pixels on disk.
pub trait ImageBackend {
    /// Decode the file at `path`, sniffing the format from its content.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode `image` to `path` in `format`.
    ///
    /// Implementations convert the color model first when the format cannot
    /// store it (e.g. RGBA → RGB for JPEG).
    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<(), BackendError>;
}
