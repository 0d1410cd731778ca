//! Additive noise generators.
//!
//! Two generators share the same contract: same dimensions and channel
//! layout in, 8-bit image out, every channel (alpha included) perturbed and
//! clipped to `[0, 255]`. The RNG is passed in so a seeded run is repeatable.
//!
//! ## Simple noise
//!
//! Each channel value gets an independent integer offset drawn uniformly from
//! `[-intensity, +intensity]`. Sums are formed in `i16` so nothing wraps
//! before the clamp.
//!
//! ## Complex noise
//!
//! Three noise fields are layered per channel to get fine, medium and coarse
//! grain:
//!
//! ```text
//! field     resolution       std deviation
//! fine      rows   × cols    σ
//! medium    rows/2 × cols/2  2σ        (upsampled, bilinear)
//! coarse    rows/4 × cols/4  4σ        (upsampled, bilinear)
//!
//! σ = intensity / 1000, in normalized [0, 1] pixel units
//! ```
//!
//! The summed field is added to the image scaled into `[0, 1]`, then the
//! result is scaled back by 255, rounded and clipped. [`NoiseMode`] picks the
//! distribution the fields are drawn from; the deviations above hold for
//! every mode.

use super::calculations::calculate_field_dimensions;
use super::pixels::{ByteImage, to_byte};
use image::DynamicImage;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distribution family used for complex noise fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseMode {
    /// Zero-mean normal samples.
    #[default]
    Gaussian,
    /// Zero-mean uniform samples on `[-√3σ, √3σ]`, which has variance σ².
    Uniform,
}

impl NoiseMode {
    /// Draw one zero-mean sample with standard deviation `sigma`.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R, sigma: f32) -> f32 {
        match self {
            Self::Gaussian => standard_normal(rng) * sigma,
            Self::Uniform => (rng.r#gen::<f32>() * 2.0 - 1.0) * 3f32.sqrt() * sigma,
        }
    }
}

impl FromStr for NoiseMode {
    type Err = UnknownNoiseMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaussian" | "normal" => Ok(Self::Gaussian),
            "uniform" => Ok(Self::Uniform),
            _ => Err(UnknownNoiseMode(s.to_string())),
        }
    }
}

impl fmt::Display for NoiseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gaussian => "gaussian",
            Self::Uniform => "uniform",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNoiseMode(pub String);

impl fmt::Display for UnknownNoiseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown noise mode '{}' (expected gaussian or uniform)",
            self.0
        )
    }
}

impl std::error::Error for UnknownNoiseMode {}

/// Box-Muller transform over two uniform draws.
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let u1 = rng.r#gen::<f64>().max(f64::MIN_POSITIVE);
    let u2 = rng.r#gen::<f64>();
    ((-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()) as f32
}

/// Add uniform integer noise in `[-intensity, +intensity]` to every channel.
///
/// The fractional part of `intensity` is dropped; values above 255 behave
/// like 255.
pub fn simple_noise<R: Rng + ?Sized>(
    image: &DynamicImage,
    intensity: f32,
    rng: &mut R,
) -> DynamicImage {
    let mut bytes = ByteImage::from_dynamic(image);
    let amplitude = intensity.clamp(0.0, 255.0) as i16;
    if amplitude > 0 {
        for v in bytes.data.iter_mut() {
            let perturbed = *v as i16 + rng.gen_range(-amplitude..=amplitude);
            *v = perturbed.clamp(0, 255) as u8;
        }
    }
    bytes.into_dynamic()
}

/// Add layered multi-resolution noise to every channel.
///
/// See the [module docs](self) for the field layout.
pub fn complex_noise<R: Rng + ?Sized>(
    image: &DynamicImage,
    intensity: f32,
    mode: NoiseMode,
    rng: &mut R,
) -> DynamicImage {
    let mut bytes = ByteImage::from_dynamic(image);
    let sigma = intensity.max(0.0) / 1000.0;
    if sigma == 0.0 {
        return bytes.into_dynamic();
    }

    let (width, height) = (bytes.width, bytes.height);
    let channels = bytes.channels();
    for channel in 0..channels {
        let mask = noise_mask((width, height), sigma, mode, rng);
        for (i, n) in mask.iter().enumerate() {
            let at = i * channels + channel;
            let normalized = bytes.data[at] as f32 / 255.0 + n;
            bytes.data[at] = to_byte(normalized * 255.0);
        }
    }
    bytes.into_dynamic()
}

/// Full-resolution sum of the fine, medium and coarse fields.
fn noise_mask<R: Rng + ?Sized>(
    dims: (u32, u32),
    sigma: f32,
    mode: NoiseMode,
    rng: &mut R,
) -> Vec<f32> {
    let mut mask = noise_field(dims, sigma, mode, rng);

    for (divisor, scale) in [(2u32, 2.0f32), (4, 4.0)] {
        let small_dims = calculate_field_dimensions(dims, divisor);
        let small = noise_field(small_dims, sigma * scale, mode, rng);
        let upsampled = upsample_bilinear(&small, small_dims, dims);
        for (m, u) in mask.iter_mut().zip(upsampled) {
            *m += u;
        }
    }
    mask
}

fn noise_field<R: Rng + ?Sized>(
    (width, height): (u32, u32),
    sigma: f32,
    mode: NoiseMode,
    rng: &mut R,
) -> Vec<f32> {
    (0..width as usize * height as usize)
        .map(|_| mode.sample(rng, sigma))
        .collect()
}

/// Bilinear resampling of a single-channel field.
///
/// Pixel centers are aligned (`src = (dst + 0.5) · scale − 0.5`) and samples
/// outside the source clamp to the nearest edge.
pub fn upsample_bilinear(field: &[f32], from: (u32, u32), to: (u32, u32)) -> Vec<f32> {
    let (src_w, src_h) = (from.0 as usize, from.1 as usize);
    let (dst_w, dst_h) = (to.0 as usize, to.1 as usize);
    let scale_x = src_w as f32 / dst_w as f32;
    let scale_y = src_h as f32 / dst_h as f32;

    // (low index, high index, weight of high)
    let taps = |dst: usize, scale: f32, len: usize| -> (usize, usize, f32) {
        let src = ((dst as f32 + 0.5) * scale - 0.5).clamp(0.0, (len - 1) as f32);
        let lo = src.floor() as usize;
        let hi = (lo + 1).min(len - 1);
        (lo, hi, src - lo as f32)
    };
    let columns: Vec<_> = (0..dst_w).map(|x| taps(x, scale_x, src_w)).collect();

    let mut out = Vec::with_capacity(dst_w * dst_h);
    for y in 0..dst_h {
        let (y0, y1, wy) = taps(y, scale_y, src_h);
        let (row0, row1) = (&field[y0 * src_w..], &field[y1 * src_w..]);
        for &(x0, x1, wx) in &columns {
            let top = row0[x0] + (row0[x1] - row0[x0]) * wx;
            let bottom = row1[x0] + (row1[x1] - row1[x0]) * wx;
            out.push(top + (bottom - top) * wy);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_rgb, gradient_rgba, solid_rgb};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    // =========================================================================
    // simple_noise
    // =========================================================================

    #[test]
    fn simple_noise_stays_within_intensity() {
        let img = gradient_rgb(64, 48);
        let noisy = simple_noise(&img, 20.0, &mut rng());

        let (before, after) = (img.to_rgb8(), noisy.to_rgb8());
        for (a, b) in before.as_raw().iter().zip(after.as_raw()) {
            assert!(a.abs_diff(*b) <= 20);
        }
    }

    #[test]
    fn simple_noise_clamps_at_extremes() {
        // Intensities far beyond the byte range must saturate, not wrap.
        for value in [0u8, 255] {
            let img = solid_rgb(16, 16, [value; 3]);
            let noisy = simple_noise(&img, 1000.0, &mut rng()).to_rgb8();
            let changed = noisy.as_raw().iter().filter(|&&v| v != value).count();
            assert!(changed > 0, "noise had no effect on {value}");
        }
    }

    #[test]
    fn simple_noise_zero_is_identity() {
        let img = gradient_rgb(10, 10);
        assert_eq!(simple_noise(&img, 0.0, &mut rng()), img);
    }

    #[test]
    fn simple_noise_is_centered() {
        let img = solid_rgb(100, 100, [128; 3]);
        let noisy = simple_noise(&img, 30.0, &mut rng()).to_rgb8();
        let mean: f64 = noisy.as_raw().iter().map(|&v| v as f64).sum::<f64>()
            / noisy.as_raw().len() as f64;
        assert!((mean - 128.0).abs() < 1.0, "mean drifted to {mean}");
    }

    #[test]
    fn simple_noise_same_seed_same_output() {
        let img = gradient_rgb(20, 20);
        let a = simple_noise(&img, 15.0, &mut StdRng::seed_from_u64(1));
        let b = simple_noise(&img, 15.0, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn simple_noise_touches_alpha_too() {
        let img = gradient_rgba(32, 32);
        let noisy = simple_noise(&img, 50.0, &mut rng()).to_rgba8();
        let alpha_changed = noisy.pixels().any(|p| p[3] != 255);
        assert!(alpha_changed);
    }

    // =========================================================================
    // complex_noise
    // =========================================================================

    #[test]
    fn complex_noise_preserves_dimensions_and_layout() {
        let img = gradient_rgba(37, 21);
        let noisy = complex_noise(&img, 50.0, NoiseMode::Gaussian, &mut rng());
        assert_eq!((noisy.width(), noisy.height()), (37, 21));
        assert_eq!(noisy.color(), image::ColorType::Rgba8);
    }

    #[test]
    fn complex_noise_zero_is_identity() {
        let img = gradient_rgb(10, 10);
        let noisy = complex_noise(&img, 0.0, NoiseMode::Gaussian, &mut rng());
        assert_eq!(noisy, img);
    }

    #[test]
    fn complex_noise_spread_matches_layered_variance() {
        // Layered std dev: sqrt(1 + 4 + 16) · σ ≈ 4.58σ. With intensity 20,
        // σ = 0.02 → ≈ 0.0917 normalized ≈ 23.4 levels.
        let img = solid_rgb(128, 128, [128; 3]);
        let noisy = complex_noise(&img, 20.0, NoiseMode::Gaussian, &mut rng()).to_rgb8();

        let values: Vec<f64> = noisy.as_raw().iter().map(|&v| v as f64).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        let std = var.sqrt();

        assert!((mean - 128.0).abs() < 3.0, "mean {mean}");
        // Bilinear upsampling smooths the coarse fields, so the spread sits
        // below the raw layered figure but well above the fine field alone.
        assert!(std > 8.0 && std < 26.0, "std {std}");
    }

    #[test]
    fn complex_noise_uniform_mode_runs() {
        let img = gradient_rgb(33, 17);
        let noisy = complex_noise(&img, 30.0, NoiseMode::Uniform, &mut rng());
        assert_ne!(noisy, img);
    }

    #[test]
    fn complex_noise_handles_tiny_images() {
        // Quarter resolution of 3x1 collapses to a 1x1 field.
        let img = gradient_rgb(3, 1);
        let noisy = complex_noise(&img, 100.0, NoiseMode::Gaussian, &mut rng());
        assert_eq!((noisy.width(), noisy.height()), (3, 1));
    }

    // =========================================================================
    // NoiseMode
    // =========================================================================

    #[test]
    fn noise_mode_parses() {
        assert_eq!("gaussian".parse::<NoiseMode>(), Ok(NoiseMode::Gaussian));
        assert_eq!("Uniform".parse::<NoiseMode>(), Ok(NoiseMode::Uniform));
        assert!("speckle".parse::<NoiseMode>().is_err());
    }

    #[test]
    fn noise_mode_default_is_gaussian() {
        assert_eq!(NoiseMode::default(), NoiseMode::Gaussian);
    }

    #[test]
    fn uniform_samples_have_requested_variance() {
        let mut r = rng();
        let samples: Vec<f32> = (0..20_000)
            .map(|_| NoiseMode::Uniform.sample(&mut r, 2.0))
            .collect();
        let var = samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32;
        assert!((var - 4.0).abs() < 0.2, "variance {var}");
    }

    #[test]
    fn gaussian_samples_have_requested_variance() {
        let mut r = rng();
        let samples: Vec<f32> = (0..20_000)
            .map(|_| NoiseMode::Gaussian.sample(&mut r, 2.0))
            .collect();
        let var = samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32;
        assert!((var - 4.0).abs() < 0.25, "variance {var}");
    }

    // =========================================================================
    // upsample_bilinear
    // =========================================================================

    #[test]
    fn upsample_constant_field_stays_constant() {
        let out = upsample_bilinear(&[0.25; 4], (2, 2), (7, 5));
        assert_eq!(out.len(), 35);
        assert!(out.iter().all(|&v| (v - 0.25).abs() < 1e-6));
    }

    #[test]
    fn upsample_interpolates_between_columns() {
        // 2x1 → 4x1: centers at -0.25, 0.25, 0.75, 1.25 in source space.
        let out = upsample_bilinear(&[0.0, 1.0], (2, 1), (4, 1));
        let expected = [0.0, 0.25, 0.75, 1.0];
        for (o, e) in out.iter().zip(expected) {
            assert!((o - e).abs() < 1e-6, "{out:?}");
        }
    }

    #[test]
    fn upsample_single_sample_broadcasts() {
        let out = upsample_bilinear(&[-0.5], (1, 1), (3, 2));
        assert_eq!(out, vec![-0.5; 6]);
    }
}
