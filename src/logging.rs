//! Logging initialization and the `tracing`-backed event reporter.
//!
//! Uses the `tracing` ecosystem with either human-readable or JSON output.
//! Log output goes to stderr; stdout is reserved for the batch summary.

use crate::output::format_event;
use crate::pipeline::{DegradeEvent, Reporter};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `verbose` - If true, enables DEBUG level logging; otherwise INFO level.
/// * `json_format` - If true, outputs structured JSON logs; otherwise colored text.
///
/// The `RUST_LOG` environment variable overrides the level when set.
pub fn init(verbose: bool, json_format: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Forwards pipeline events to `tracing` at a level matching their weight.
///
/// | Event | Level |
/// |---|---|
/// | batch/image start, image saved, batch finished | INFO |
/// | transform applied | DEBUG |
/// | image skipped | ERROR |
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &DegradeEvent) {
        for line in format_event(event) {
            let line = line.trim_start();
            match event {
                DegradeEvent::TransformApplied { .. } => tracing::debug!("{line}"),
                DegradeEvent::ImageSkipped { source, .. } => {
                    tracing::error!(source = %source.display(), "{line}")
                }
                _ => tracing::info!("{line}"),
            }
        }
    }
}

