//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate output dimensions for a uniform scale factor.
///
/// Each edge is rounded to the nearest pixel and never drops below 1.
/// Returns `None` when an edge would not fit in a `u32`.
///
/// # Examples
/// ```
/// # use image_degrader::imaging::calculate_scaled_dimensions;
/// assert_eq!(calculate_scaled_dimensions((200, 100), 0.5), Some((100, 50)));
/// assert_eq!(calculate_scaled_dimensions((3, 3), 0.5), Some((2, 2)));
/// assert_eq!(calculate_scaled_dimensions((100, 100), 1e9), None);
/// ```
pub fn calculate_scaled_dimensions(source: (u32, u32), factor: f64) -> Option<(u32, u32)> {
    let scale = |edge: u32| {
        let scaled = (edge as f64 * factor).round().max(1.0);
        (scaled <= u32::MAX as f64).then_some(scaled as u32)
    };
    Some((scale(source.0)?, scale(source.1)?))
}

/// Calculate the canvas needed to hold an image rotated by `degrees`.
///
/// This is the axis-aligned bounding box of the rotated rectangle, rounded up.
/// A tolerance absorbs floating point noise so quarter turns stay exact
/// (`800x600` at 90° is `600x800`, not `601x801`).
pub fn calculate_rotated_bounds(source: (u32, u32), degrees: f64) -> (u32, u32) {
    let (w, h) = (source.0 as f64, source.1 as f64);
    let rad = degrees.to_radians();
    let (sin, cos) = (rad.sin().abs(), rad.cos().abs());

    let bound = |v: f64| ((v - 1e-6).ceil() as u32).max(1);
    (bound(w * cos + h * sin), bound(w * sin + h * cos))
}

/// Normalize an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees % 360.0;
    if d < 0.0 { d + 360.0 } else { d }
}

/// Number of counter-clockwise quarter turns if `degrees` is a multiple of 90.
///
/// Returns `None` for any other angle.
pub fn quarter_turns(degrees: f64) -> Option<u8> {
    let d = normalize_degrees(degrees);
    let turns = (d / 90.0).round();
    if (d - turns * 90.0).abs() < 1e-9 {
        Some((turns as u8) % 4)
    } else {
        None
    }
}

/// Dimensions of a reduced-resolution noise field.
///
/// `divisor` of 2 gives the half-resolution field, 4 the quarter one.
/// Images smaller than the divisor still get a 1x1 field.
pub fn calculate_field_dimensions(source: (u32, u32), divisor: u32) -> (u32, u32) {
    ((source.0 / divisor).max(1), (source.1 / divisor).max(1))
}
