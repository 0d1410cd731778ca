//! Degradation orchestration for single images and whole directories.
//!
//! ## Flow
//!
//! ```text
//! decode → saturation → brightness → contrast → sharpness
//!        → simple noise → complex noise
//!        → black-border removal → blur → edge detection
//!        → crop → rotate → resize → scale → encode
//! ```
//!
//! Each transform runs only when its parameter is set in [`DegradeConfig`].
//! The order is fixed: pixel-level changes first, geometry last, so a crop box
//! always refers to the image as it looks after the pixel transforms.
//!
//! ## Failure handling
//!
//! - [`degrade_image`] propagates every error to the caller.
//! - [`batch_degrade`] fails only when the input directory is missing or the
//!   configuration is invalid. Any error on an individual image is reported,
//!   recorded in the [`BatchReport`] and the batch moves on to the next file.
//!
//! ## Events
//!
//! Progress is pushed through a [`Reporter`] instead of printed, so the CLI
//! can log it and tests can record it.

use crate::config::{ConfigError, DegradeConfig};
use crate::imaging::{
    BackendError, ImageBackend, OutputFormat, RustBackend, TransformError, enhance, filters,
    geometry, noise,
};
use crate::naming;
use crate::scan::{self, ScanError};
use crate::timing::Stopwatch;
use image::DynamicImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DegradeError {
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
    #[error("Not a decodable image: {0}")]
    InvalidImage(PathBuf),
    #[error("Invalid parameters: {0}")]
    Validation(String),
    #[error("Image codec error: {0}")]
    Backend(BackendError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for DegradeError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Validation(msg) => Self::Validation(msg),
            ConfigError::Io(io) => Self::Io(io),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<TransformError> for DegradeError {
    fn from(e: TransformError) -> Self {
        Self::Validation(e.to_string())
    }
}

/// Progress events emitted while degrading.
#[derive(Debug, Clone, PartialEq)]
pub enum DegradeEvent {
    BatchStarted {
        input_dir: PathBuf,
        image_count: usize,
    },
    ImageStarted {
        index: usize,
        total: usize,
        source: PathBuf,
    },
    /// One transform ran; dimensions are those of its result.
    TransformApplied {
        name: &'static str,
        width: u32,
        height: u32,
    },
    ImageSaved {
        source: PathBuf,
        output: PathBuf,
        width: u32,
        height: u32,
    },
    /// Batch mode only: the image failed and was left out.
    ImageSkipped { source: PathBuf, reason: String },
    BatchFinished { written: usize, skipped: usize },
}

/// Receives [`DegradeEvent`]s as the pipeline runs.
pub trait Reporter {
    fn report(&self, event: &DegradeEvent);
}

/// Discards every event.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &DegradeEvent) {}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrittenImage {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedImage {
    pub source: PathBuf,
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub written: Vec<WrittenImage>,
    pub skipped: Vec<SkippedImage>,
}

impl BatchReport {
    /// True when every discovered image was written.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// RNG for the noise transforms: seeded when `seed` is set, fresh otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Degrade one image with the pure Rust backend. Returns the written path.
pub fn degrade_image(
    path: &Path,
    config: &DegradeConfig,
    reporter: &impl Reporter,
) -> Result<PathBuf, DegradeError> {
    let mut rng = make_rng(config.seed);
    degrade_image_with_backend(&RustBackend::new(), path, config, reporter, &mut rng)
}

/// Degrade one image using a specific backend (allows testing with mock).
pub fn degrade_image_with_backend<R: Rng + ?Sized>(
    backend: &impl ImageBackend,
    path: &Path,
    config: &DegradeConfig,
    reporter: &impl Reporter,
    rng: &mut R,
) -> Result<PathBuf, DegradeError> {
    config.validate()?;
    let format = config.format()?;
    if !path.exists() {
        return Err(DegradeError::PathNotFound(path.to_path_buf()));
    }
    std::fs::create_dir_all(&config.output_dir)?;

    reporter.report(&DegradeEvent::ImageStarted {
        index: 1,
        total: 1,
        source: path.to_path_buf(),
    });
    let written = degrade_one(backend, path, config, format, reporter, rng)?;
    Ok(written.output)
}

/// Degrade every image in `input_dir` with the pure Rust backend.
pub fn batch_degrade(
    input_dir: &Path,
    config: &DegradeConfig,
    reporter: &impl Reporter,
) -> Result<BatchReport, DegradeError> {
    let mut rng = make_rng(config.seed);
    batch_degrade_with_backend(&RustBackend::new(), input_dir, config, reporter, &mut rng)
}

/// Degrade a directory using a specific backend (allows testing with mock).
pub fn batch_degrade_with_backend<R: Rng + ?Sized>(
    backend: &impl ImageBackend,
    input_dir: &Path,
    config: &DegradeConfig,
    reporter: &impl Reporter,
    rng: &mut R,
) -> Result<BatchReport, DegradeError> {
    if !input_dir.exists() {
        return Err(DegradeError::PathNotFound(input_dir.to_path_buf()));
    }
    config.validate()?;
    let format = config.format()?;

    let _timer = Stopwatch::start(format!("batch {}", input_dir.display()));
    std::fs::create_dir_all(&config.output_dir)?;
    let images = scan::find_images(input_dir)?;

    reporter.report(&DegradeEvent::BatchStarted {
        input_dir: input_dir.to_path_buf(),
        image_count: images.len(),
    });

    let mut report = BatchReport::default();
    let total = images.len();
    for (i, path) in images.into_iter().enumerate() {
        reporter.report(&DegradeEvent::ImageStarted {
            index: i + 1,
            total,
            source: path.clone(),
        });
        match degrade_one(backend, &path, config, format, reporter, rng) {
            Ok(written) => report.written.push(written),
            Err(e) => {
                let reason = e.to_string();
                reporter.report(&DegradeEvent::ImageSkipped {
                    source: path.clone(),
                    reason: reason.clone(),
                });
                report.skipped.push(SkippedImage {
                    source: path,
                    reason,
                });
            }
        }
    }

    reporter.report(&DegradeEvent::BatchFinished {
        written: report.written.len(),
        skipped: report.skipped.len(),
    });
    Ok(report)
}

/// Decode, transform and encode a single file. Config is already validated.
fn degrade_one<R: Rng + ?Sized>(
    backend: &impl ImageBackend,
    path: &Path,
    config: &DegradeConfig,
    format: OutputFormat,
    reporter: &impl Reporter,
    rng: &mut R,
) -> Result<WrittenImage, DegradeError> {
    let _timer = Stopwatch::start(format!("degrade {}", path.display()));

    let image = backend
        .decode(path)
        .map_err(|e| classify_decode_error(path, e))?;
    let image = apply_transforms(image, config, reporter, rng)?;

    let output = naming::output_path(
        &config.output_dir,
        path,
        &config.prefix,
        &config.suffix,
        &config.output_format,
    );
    backend
        .encode(&image, &output, format, config.encode_quality())
        .map_err(DegradeError::Backend)?;

    let written = WrittenImage {
        source: path.to_path_buf(),
        output,
        width: image.width(),
        height: image.height(),
    };
    reporter.report(&DegradeEvent::ImageSaved {
        source: written.source.clone(),
        output: written.output.clone(),
        width: written.width,
        height: written.height,
    });
    Ok(written)
}

fn classify_decode_error(path: &Path, e: BackendError) -> DegradeError {
    match e {
        BackendError::Undecodable { .. } => DegradeError::InvalidImage(path.to_path_buf()),
        BackendError::Io(io) if io.kind() == ErrorKind::NotFound => {
            DegradeError::PathNotFound(path.to_path_buf())
        }
        other => DegradeError::Backend(other),
    }
}

fn applied(reporter: &impl Reporter, name: &'static str, image: DynamicImage) -> DynamicImage {
    reporter.report(&DegradeEvent::TransformApplied {
        name,
        width: image.width(),
        height: image.height(),
    });
    image
}

/// Run every enabled transform in the fixed pipeline order.
pub fn apply_transforms<R: Rng + ?Sized>(
    image: DynamicImage,
    config: &DegradeConfig,
    reporter: &impl Reporter,
    rng: &mut R,
) -> Result<DynamicImage, DegradeError> {
    let mut image = image;
    let adjust = &config.adjust;
    let filter = &config.filters;
    let geo = &config.geometry;

    if let Some(f) = adjust.saturation {
        image = applied(reporter, "saturation", enhance::saturate(&image, f));
    }
    if let Some(f) = adjust.brightness {
        image = applied(reporter, "brightness", enhance::brighten(&image, f));
    }
    if let Some(f) = adjust.contrast {
        image = applied(reporter, "contrast", enhance::contrast(&image, f));
    }
    if let Some(f) = adjust.sharpness {
        image = applied(reporter, "sharpness", enhance::sharpen(&image, f));
    }
    if let Some(intensity) = config.noise.simple {
        image = applied(
            reporter,
            "simple noise",
            noise::simple_noise(&image, intensity, rng),
        );
    }
    if let Some(intensity) = config.noise.complex {
        image = applied(
            reporter,
            "complex noise",
            noise::complex_noise(&image, intensity, config.noise.complex_mode, rng),
        );
    }
    if filter.remove_black_borders {
        image = applied(
            reporter,
            "remove black borders",
            geometry::remove_black_borders(&image),
        );
    }
    if let Some(radius) = filter.blur {
        image = applied(reporter, "blur", filters::blur(&image, radius));
    }
    if let Some(intensity) = filter.edge_detection {
        image = applied(
            reporter,
            "edge detection",
            filters::simple_edge_detection(&image, intensity),
        );
    }
    if let Some(crop) = geo.crop {
        image = applied(reporter, "crop", geometry::crop(&image, crop)?);
    }
    if let Some(rotation) = config.rotation() {
        image = applied(reporter, "rotate", geometry::rotate(&image, rotation));
    }
    if let Some([w, h]) = geo.resize {
        image = applied(reporter, "resize", geometry::resize(&image, w, h)?);
    }
    if let Some(factor) = geo.scale {
        image = applied(reporter, "scale", geometry::scale(&image, factor)?);
    }
    Ok(image)
}
