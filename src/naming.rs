//! Output filename composition.
//!
//! Every degraded image is written as `{prefix}{stem}{suffix}.{format}`:
//! - `photo.png`, prefix `deg_`, format `jpeg` → `deg_photo.jpeg`
//! - `scan.JPG`, suffix `-noisy`, format `jpg` → `scan-noisy.jpg`
//!
//! The extension is the format name as configured (trimmed, lowercased, no
//! leading dot), so `jpg` and `jpeg` both stay as written.

use std::path::{Path, PathBuf};

/// Normalize a configured format name into a file extension.
pub fn extension_for(format_name: &str) -> String {
    format_name.trim().trim_start_matches('.').to_lowercase()
}

/// Compose the output file name for `source`.
pub fn output_file_name(source: &Path, prefix: &str, suffix: &str, format_name: &str) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    format!("{prefix}{stem}{suffix}.{}", extension_for(format_name))
}

/// Full output path for `source` inside `output_dir`.
pub fn output_path(
    output_dir: &Path,
    source: &Path,
    prefix: &str,
    suffix: &str,
    format_name: &str,
) -> PathBuf {
    output_dir.join(output_file_name(source, prefix, suffix, format_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name_changes_extension() {
        assert_eq!(
            output_file_name(Path::new("in/photo.png"), "", "", "jpeg"),
            "photo.jpeg"
        );
    }

    #[test]
    fn prefix_and_suffix_wrap_stem() {
        assert_eq!(
            output_file_name(Path::new("photo.png"), "deg_", "-v2", "png"),
            "deg_photo-v2.png"
        );
    }

    #[test]
    fn format_spelling_is_kept() {
        assert_eq!(output_file_name(Path::new("a.png"), "", "", "jpg"), "a.jpg");
        assert_eq!(output_file_name(Path::new("a.png"), "", "", "tif"), "a.tif");
    }

    #[test]
    fn format_is_normalized() {
        assert_eq!(output_file_name(Path::new("a.png"), "", "", " .PNG "), "a.png");
    }

    #[test]
    fn multi_dot_stem_keeps_inner_dots() {
        assert_eq!(
            output_file_name(Path::new("archive.2024.01.jpg"), "", "", "png"),
            "archive.2024.01.png"
        );
    }

    #[test]
    fn output_path_joins_directory() {
        let path = output_path(Path::new("result"), Path::new("/in/x.jpg"), "p", "s", "bmp");
        assert_eq!(path, PathBuf::from("result/pxs.bmp"));
    }
}
