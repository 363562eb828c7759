//! Error types for arcsmooth.
//!
//! The minimization core itself only asserts its preconditions. These errors
//! are reported when a sequence is populated or resized, and by the
//! convergence helpers, so invalid input can be caught before iterating.

use thiserror::Error;

/// Result type alias using [`SmoothError`].
pub type Result<T> = std::result::Result<T, SmoothError>;

/// Errors that can occur while building or driving an angle sequence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SmoothError {
    /// The sequence is too short to be optimized.
    #[error("sequence has {size} points, at least 3 are required")]
    TooFewPoints {
        /// The active number of points.
        size: usize,
    },

    /// A point index is past the active size of the sequence.
    #[error("point index {index} out of range for sequence of size {size}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The active size.
        size: usize,
    },

    /// The requested active size does not fit in the allocated buffer.
    #[error("size {size} exceeds capacity {capacity}")]
    SizeExceedsCapacity {
        /// The requested size.
        size: usize,
        /// The allocated capacity.
        capacity: usize,
    },

    /// The admissible range of a point is empty or outside `[-π, π]`.
    #[error("point {index} has invalid bounds [{min}, {max}]")]
    InvalidBounds {
        /// The point index.
        index: usize,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// The spacing between a point and its successor is not strictly positive.
    #[error("point {index} has non-positive distance to next ({distance})")]
    NonPositiveDistance {
        /// The point index.
        index: usize,
        /// The offending distance.
        distance: f64,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl SmoothError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        SmoothError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
