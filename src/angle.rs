//! Angle arithmetic on the circle.
//!
//! All angles handled by the minimizers are stored in the principal range
//! `[-π, π)`. The helpers here canonicalize arbitrary values into that range,
//! compute the signed shortest-path deviation between two angles, and order
//! canonical angles for clamping against per-point bounds.
//!
//! # Example
//!
//! ```
//! use arcsmooth::angle;
//! use std::f64::consts::PI;
//!
//! let a = 179f64.to_radians();
//! let b = angle::cast(-179f64.to_radians());
//!
//! // Crossing the seam at ±π is a short step, not a full turn.
//! let d = angle::deviation(b, a);
//! assert!((d - 2f64.to_radians()).abs() < 1e-12);
//! assert!(angle::cast(3.0 * PI) < PI);
//! ```

use std::f64::consts::{PI, TAU};

/// Map an arbitrary angle into the principal range `[-π, π)`.
#[inline]
pub fn cast(theta: f64) -> f64 {
    let wrapped = theta - TAU * ((theta + PI) / TAU).floor();
    // floor() rounding can land exactly on the excluded end
    if wrapped >= PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Signed shortest-path difference `a - b`, in `[-π, π)`.
///
/// Positive when `a` is reached from `b` by turning counter-clockwise.
#[inline]
pub fn deviation(a: f64, b: f64) -> f64 {
    cast(a - b)
}

/// Total order on canonical angles.
///
/// Angles are compared by their position in `[-π, π)`, which is what the
/// admissible `[min, max]` ranges of a point are expressed in.
#[inline]
pub fn less(a: f64, b: f64) -> bool {
    a < b
}

/// Clamp `theta` into `[min, max]` using [`less`].
#[inline]
pub fn clamp(theta: f64, min: f64, max: f64) -> f64 {
    if less(theta, min) {
        min
    } else if less(max, theta) {
        max
    } else {
        theta
    }
}

/// Weighted interpolation between two angles along the shortest arc.
///
/// Returns the angle at fraction `t` of the way from `from` to `to`.
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    cast(from + t * deviation(to, from))
}
