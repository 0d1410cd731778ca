//! # Image Degrader
//!
//! Applies configurable visual degradations (noise, blur, color and tone
//! shifts, edge detection, geometric changes) to a single image or to every
//! image in a directory, then writes the result in a chosen format.
//!
//! # Architecture: Decode → Transform → Encode
//!
//! ```text
//! input.png ──decode──▶ DynamicImage ──transforms──▶ DynamicImage ──encode──▶ result/input.jpeg
//!             (backend)                (pure fns)                  (backend)
//! ```
//!
//! Only the two ends touch the filesystem, and both go through the
//! [`imaging::ImageBackend`] trait. Everything in between is a pure function
//! from image to image, so the orchestration in [`pipeline`] is tested with a
//! recording mock and the transforms are tested on in-memory buffers.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Single-image and batch orchestration, events, the batch report |
//! | [`imaging`] | Codecs, noise generators, enhancement, filters, geometry |
//! | [`config`] | TOML config layering (defaults ← file ← flags) and validation |
//! | [`scan`] | Non-recursive discovery of `.jpg`/`.jpeg`/`.png` inputs |
//! | [`naming`] | `{prefix}{stem}{suffix}.{format}` output names |
//! | [`output`] | Pure line formatting for events and the batch summary |
//! | [`logging`] | `tracing` subscriber setup and the logging [`pipeline::Reporter`] |
//! | [`timing`] | Scoped stopwatch logged at debug level |
//!
//! # Design Decisions
//!
//! ## Tolerant Batches
//!
//! Every per-image failure in a batch becomes a skipped entry in the
//! [`pipeline::BatchReport`]. Only a missing input directory or an invalid
//! configuration aborts the run.
//!
//! ## Seeded Noise
//!
//! Both noise generators draw from an injected RNG. With `seed` set, the same
//! input and config always produce the same bytes.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod scan;
pub mod timing;

#[cfg(test)]
pub(crate) mod test_helpers;
