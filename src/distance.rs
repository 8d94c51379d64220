//! Fast approximate 2D distance.
//!
//! The tick runs this once per particle per frame, so it avoids a square
//! root in favour of the alpha-max-plus-beta-min estimate in 10-bit fixed
//! point.

/// Approximate Euclidean length of `(dx, dy)`.
///
/// Computes `max * 1007 + min * 441` (minus `max * 40` when the two
/// components are within a factor of 16 of each other) and rounds the
/// result divided by 1024. The result is always a whole number.
///
/// # Example
///
/// ```
/// use image_particles::approx_distance;
///
/// assert_eq!(approx_distance(3.0, 4.0), 5.0);
/// assert_eq!(approx_distance(0.0, 0.0), 0.0);
/// ```
#[inline]
pub fn approx_distance(dx: f64, dy: f64) -> f64 {
    let dx = dx.abs();
    let dy = dy.abs();

    let max = dx.max(dy);
    let min = dx.min(dy);
    let mut approx = max * 1007.0 + min * 441.0;

    if max < min * 16.0 {
        approx -= max * 40.0;
    }

    // approx is non-negative, so truncation is the same as floor here
    (((approx + 512.0) as i64) >> 10) as f64
}
