//! Degradation configuration.
//!
//! Handles loading, validating, and layering configuration. Three layers are
//! merged, later ones winning key by key:
//!
//! ```text
//! stock defaults  <-  --config file.toml  <-  command-line flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output_dir = "result"     # Where degraded images are written
//! output_format = "jpeg"    # jpeg/jpg, png, tiff/tif, webp, bmp, avif
//! quality = 100             # JPEG/AVIF quality (0-100)
//! prefix = ""               # Prepended to each output stem
//! suffix = ""               # Appended to each output stem
//! # seed = 42               # Fixed RNG seed for repeatable noise
//!
//! [adjust]
//! # saturation = 0.5        # 1.0 = unchanged, 0.0 = grayscale
//! # brightness = 1.2        # 1.0 = unchanged, 0.0 = black
//! # contrast = 0.8          # 1.0 = unchanged, 0.0 = flat gray
//! # sharpness = 2.0         # 1.0 = unchanged, < 1 softens
//!
//! [noise]
//! # simple = 20             # Uniform integer noise amplitude
//! # complex = 30            # Layered noise strength (sigma = complex / 1000)
//! complex_mode = "gaussian" # gaussian | uniform
//!
//! [filters]
//! # blur = 2.0              # Gaussian sigma
//! # edge_detection = 1.5    # Contrast applied before edge finding
//! remove_black_borders = false
//!
//! [geometry]
//! # crop = [10, 10, 310, 210]   # left, top, right, bottom (exclusive)
//! # rotate = 15.0               # Degrees, counter-clockwise
//! expand = false                # Grow canvas to fit the rotation
//! # resize = [640, 480]         # Exact width, height
//! # scale = 0.5                 # Uniform factor
//! ```
//!
//! A parameter that is absent means the transform is skipped. Unknown keys
//! are rejected to catch typos early.

use crate::imaging::{CropBox, NoiseMode, OutputFormat, Quality, Rotation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything one degradation run needs: which transforms, and where the
/// result goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DegradeConfig {
    pub output_dir: PathBuf,
    /// Format name as written by the user; also the output extension.
    pub output_format: String,
    /// Encoder quality, 0-100. Only JPEG and AVIF use it.
    pub quality: u32,
    pub prefix: String,
    pub suffix: String,
    /// Fixed seed for the noise RNG. Absent means a fresh seed per run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub adjust: AdjustConfig,
    pub noise: NoiseConfig,
    pub filters: FilterConfig,
    pub geometry: GeometryConfig,
}

impl Default for DegradeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("result"),
            output_format: "jpeg".to_string(),
            quality: 100,
            prefix: String::new(),
            suffix: String::new(),
            seed: None,
            adjust: AdjustConfig::default(),
            noise: NoiseConfig::default(),
            filters: FilterConfig::default(),
            geometry: GeometryConfig::default(),
        }
    }
}

/// Color and tone factors. 1.0 leaves the image unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdjustConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharpness: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseConfig {
    /// Amplitude of uniform integer noise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple: Option<f32>,
    /// Strength of layered multi-resolution noise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complex: Option<f32>,
    pub complex_mode: NoiseMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_detection: Option<f32>,
    pub remove_black_borders: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeometryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f32>,
    pub expand: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize: Option<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

fn check_non_negative(name: &str, value: Option<f32>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ConfigError::Validation(format!(
            "{name} must be a finite number >= 0, got {v}"
        ))),
        _ => Ok(()),
    }
}

impl DegradeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 0-100".into()));
        }
        self.format()?;

        check_non_negative("adjust.saturation", self.adjust.saturation)?;
        check_non_negative("adjust.brightness", self.adjust.brightness)?;
        check_non_negative("adjust.contrast", self.adjust.contrast)?;
        check_non_negative("adjust.sharpness", self.adjust.sharpness)?;
        check_non_negative("noise.simple", self.noise.simple)?;
        check_non_negative("noise.complex", self.noise.complex)?;
        check_non_negative("filters.blur", self.filters.blur)?;
        check_non_negative("filters.edge_detection", self.filters.edge_detection)?;

        let geometry = &self.geometry;
        if let Some(crop) = geometry.crop {
            if crop.left >= crop.right || crop.top >= crop.bottom {
                return Err(ConfigError::Validation(format!(
                    "geometry.crop {crop} needs left < right and top < bottom"
                )));
            }
        }
        if geometry.rotate.is_some_and(|d| !d.is_finite()) {
            return Err(ConfigError::Validation(
                "geometry.rotate must be a finite angle".into(),
            ));
        }
        if let Some([w, h]) = geometry.resize {
            if w == 0 || h == 0 {
                return Err(ConfigError::Validation(format!(
                    "geometry.resize dimensions must be non-zero, got {w}x{h}"
                )));
            }
        }
        if let Some(factor) = geometry.scale {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "geometry.scale must be > 0, got {factor}"
                )));
            }
        }
        Ok(())
    }

    /// The encoder selected by `output_format`.
    pub fn format(&self) -> Result<OutputFormat, ConfigError> {
        self.output_format
            .parse()
            .map_err(|e| ConfigError::Validation(format!("output_format: {e}")))
    }

    pub fn encode_quality(&self) -> Quality {
        Quality::new(self.quality)
    }

    pub fn rotation(&self) -> Option<Rotation> {
        self.geometry.rotate.map(|degrees| Rotation {
            degrees,
            expand: self.geometry.expand,
        })
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer every other layer is merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(DegradeConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value without interpreting it.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<DegradeConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: DegradeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Build the effective config: stock defaults, then `file`, then `flags`.
pub fn load_layered(
    file: Option<&Path>,
    flags: Option<toml::Value>,
) -> Result<DegradeConfig, ConfigError> {
    let mut base = stock_defaults_value();
    if let Some(path) = file {
        base = merge_toml(base, load_raw_config(path)?);
    }
    resolve_config(base, flags)
}

/// Parse `L,T,R,B` into a crop box.
pub fn parse_crop_box(s: &str) -> Result<CropBox, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let &[l, t, r, b] = parts.as_slice() else {
        return Err(format!("expected LEFT,TOP,RIGHT,BOTTOM, got '{s}'"));
    };
    let num = |v: &str| {
        v.parse::<u32>()
            .map_err(|_| format!("'{v}' is not a pixel coordinate"))
    };
    Ok(CropBox::new(num(l)?, num(t)?, num(r)?, num(b)?))
}

/// Parse `WxH` into a `[width, height]` pair.
pub fn parse_dimensions(s: &str) -> Result<[u32; 2], String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let num = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|_| format!("'{v}' is not a pixel count"))
    };
    Ok([num(w)?, num(h)?])
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Image Degrader Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults; commented-out keys are transforms
# that are skipped unless you enable them.
#
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# Directory the degraded images are written to (created if missing).
output_dir = "result"

# Output encoding: jpeg/jpg, png, tiff/tif, webp, bmp, avif.
# The name is also used as the file extension.
output_format = "jpeg"

# Encoder quality (0 = worst, 100 = best). Used by JPEG and AVIF only.
quality = 100

# Output file name is {prefix}{stem}{suffix}.{output_format}
prefix = ""
suffix = ""

# Fixed RNG seed. Same seed + same input = same noise.
# seed = 42

# ---------------------------------------------------------------------------
# Color and tone (1.0 = unchanged)
# ---------------------------------------------------------------------------
[adjust]
# saturation = 0.5    # 0.0 = grayscale
# brightness = 1.2    # 0.0 = black
# contrast = 0.8      # 0.0 = flat gray at the mean luminance
# sharpness = 2.0     # < 1 softens, > 1 sharpens

# ---------------------------------------------------------------------------
# Noise
# ---------------------------------------------------------------------------
[noise]
# Uniform integer noise in [-simple, +simple] on every channel.
# simple = 20

# Fine, medium and coarse grain layered together (sigma = complex / 1000).
# complex = 30

# Distribution of the layered grain: "gaussian" or "uniform".
complex_mode = "gaussian"

# ---------------------------------------------------------------------------
# Filters
# ---------------------------------------------------------------------------
[filters]
# Gaussian blur sigma in pixels.
# blur = 2.0

# Replace the image by a grayscale edge map, after this contrast factor.
# edge_detection = 1.5

# Crop away surrounding black rows and columns.
remove_black_borders = false

# ---------------------------------------------------------------------------
# Geometry (applied after all pixel transforms)
# ---------------------------------------------------------------------------
[geometry]
# Crop box as [left, top, right, bottom]; right and bottom are exclusive.
# crop = [10, 10, 310, 210]

# Counter-clockwise rotation in degrees.
# rotate = 15.0

# Grow the canvas so the rotated image is not clipped.
expand = false

# Exact output size as [width, height].
# resize = [640, 480]

# Uniform scale factor, applied last.
# scale = 0.5
"##
}
