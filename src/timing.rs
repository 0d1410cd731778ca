//! Scoped wall-clock timing.

use std::time::{Duration, Instant};

/// Logs `"{label} took {secs:.2}s"` at debug level when dropped.
///
/// ```
/// # use image_degrader::timing::Stopwatch;
/// {
///     let _timer = Stopwatch::start("degrade photo.png");
///     // ... work ...
/// } // logged here
/// ```
#[must_use = "the elapsed time is logged when the stopwatch is dropped"]
pub struct Stopwatch {
    label: String,
    started: Instant,
}

impl Stopwatch {
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        tracing::debug!(
            "{} took {:.2}s",
            self.label,
            self.started.elapsed().as_secs_f64()
        );
    }
}
