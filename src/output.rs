//! CLI output formatting for degradation runs.
//!
//! # Output Format
//!
//! ## Progress (logged per event)
//!
//! ```text
//! Batch photos/ (3 images)
//! [1/3] photos/a.png
//!     saturation → 640x480
//!     crop → 300x200
//!     Saved: result/a.jpeg (300x200)
//! [2/3] photos/b.png
//!     Skipped: Not a decodable image: photos/b.png
//! ```
//!
//! ## Summary (stdout, after a batch)
//!
//! ```text
//! Degraded 2 of 3 images
//! Skipped
//!     photos/b.png: Not a decodable image: photos/b.png
//! ```
//!
//! # Architecture
//!
//! Format functions return `Vec<String>` and do no I/O. The `print_*`
//! wrapper writes to stdout.

use crate::pipeline::{BatchReport, DegradeEvent};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format a single pipeline event as display lines.
pub fn format_event(event: &DegradeEvent) -> Vec<String> {
    match event {
        DegradeEvent::BatchStarted {
            input_dir,
            image_count,
        } => vec![format!(
            "Batch {} ({})",
            input_dir.display(),
            plural(*image_count, "image")
        )],
        DegradeEvent::ImageStarted {
            index,
            total,
            source,
        } => vec![format!("[{index}/{total}] {}", source.display())],
        DegradeEvent::TransformApplied {
            name,
            width,
            height,
        } => vec![format!("{}{name} \u{2192} {width}x{height}", indent(1))],
        DegradeEvent::ImageSaved {
            output,
            width,
            height,
            ..
        } => vec![format!(
            "{}Saved: {} ({width}x{height})",
            indent(1),
            output.display()
        )],
        DegradeEvent::ImageSkipped { reason, .. } => {
            vec![format!("{}Skipped: {reason}", indent(1))]
        }
        DegradeEvent::BatchFinished { written, skipped } => vec![format!(
            "Finished: {} written, {skipped} skipped",
            plural(*written, "image")
        )],
    }
}

/// Format the end-of-batch summary.
pub fn format_batch_summary(report: &BatchReport) -> Vec<String> {
    let total = report.written.len() + report.skipped.len();
    let mut lines = vec![format!(
        "Degraded {} of {}",
        report.written.len(),
        plural(total, "image")
    )];
    if !report.skipped.is_empty() {
        lines.push("Skipped".to_string());
        for skipped in &report.skipped {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                skipped.source.display(),
                skipped.reason
            ));
        }
    }
    lines
}

pub fn print_batch_summary(report: &BatchReport) {
    for line in format_batch_summary(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{SkippedImage, WrittenImage};
    use std::path::PathBuf;

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    // =========================================================================
    // Event formatting tests
    // =========================================================================

    #[test]
    fn format_batch_started() {
        let event = DegradeEvent::BatchStarted {
            input_dir: PathBuf::from("photos"),
            image_count: 3,
        };
        assert_eq!(format_event(&event), vec!["Batch photos (3 images)"]);
    }

    #[test]
    fn format_batch_started_singular() {
        let event = DegradeEvent::BatchStarted {
            input_dir: PathBuf::from("photos"),
            image_count: 1,
        };
        assert_eq!(format_event(&event), vec!["Batch photos (1 image)"]);
    }

    #[test]
    fn format_image_started() {
        let event = DegradeEvent::ImageStarted {
            index: 2,
            total: 5,
            source: PathBuf::from("photos/b.png"),
        };
        assert_eq!(format_event(&event), vec!["[2/5] photos/b.png"]);
    }

    #[test]
    fn format_transform_applied() {
        let event = DegradeEvent::TransformApplied {
            name: "crop",
            width: 300,
            height: 200,
        };
        assert_eq!(format_event(&event), vec!["    crop \u{2192} 300x200"]);
    }

    #[test]
    fn format_image_saved() {
        let event = DegradeEvent::ImageSaved {
            source: PathBuf::from("photos/a.png"),
            output: PathBuf::from("result/a.jpeg"),
            width: 64,
            height: 48,
        };
        assert_eq!(
            format_event(&event),
            vec!["    Saved: result/a.jpeg (64x48)"]
        );
    }

    #[test]
    fn format_image_skipped() {
        let event = DegradeEvent::ImageSkipped {
            source: PathBuf::from("photos/b.png"),
            reason: "Not a decodable image: photos/b.png".into(),
        };
        assert_eq!(
            format_event(&event),
            vec!["    Skipped: Not a decodable image: photos/b.png"]
        );
    }

    #[test]
    fn format_batch_finished() {
        let event = DegradeEvent::BatchFinished {
            written: 2,
            skipped: 1,
        };
        assert_eq!(
            format_event(&event),
            vec!["Finished: 2 images written, 1 skipped"]
        );
    }

    // =========================================================================
    // Summary formatting tests
    // =========================================================================

    #[test]
    fn summary_without_failures_is_one_line() {
        let report = BatchReport {
            written: vec![WrittenImage {
                source: PathBuf::from("a.png"),
                output: PathBuf::from("result/a.jpeg"),
                width: 1,
                height: 1,
            }],
            skipped: vec![],
        };
        assert_eq!(format_batch_summary(&report), vec!["Degraded 1 of 1 image"]);
    }

    #[test]
    fn summary_lists_skipped_files() {
        let report = BatchReport {
            written: vec![],
            skipped: vec![SkippedImage {
                source: PathBuf::from("photos/b.png"),
                reason: "boom".into(),
            }],
        };
        assert_eq!(
            format_batch_summary(&report),
            vec!["Degraded 0 of 1 image", "Skipped", "    photos/b.png: boom"]
        );
    }

    #[test]
    fn summary_of_empty_batch() {
        assert_eq!(
            format_batch_summary(&BatchReport::default()),
            vec!["Degraded 0 of 0 images"]
        );
    }
}
