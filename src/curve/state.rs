//! Per-point optimization state and the circular buffer holding it.

use std::f64::consts::PI;

use crate::angle;
use crate::error::{Result, SmoothError};

use super::Modulo;

/// Optimization state of one curve sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointState {
    /// Current angle estimate, in `[-π, π)`.
    pub value: f64,
    /// Snapshot of `value` taken at the start of the current pass.
    pub previous_value: f64,
    /// Lower admissible angle.
    pub min: f64,
    /// Upper admissible angle.
    pub max: f64,
    /// Spacing between this point and its circular successor.
    pub distance_to_next: f64,
}

impl Default for PointState {
    fn default() -> Self {
        Self {
            value: 0.0,
            previous_value: 0.0,
            min: -PI,
            max: PI,
            distance_to_next: 1.0,
        }
    }
}

impl PointState {
    /// Create an unconstrained point with the given angle and spacing.
    ///
    /// The angle is canonicalized; the snapshot starts equal to it.
    pub fn new(value: f64, distance_to_next: f64) -> Self {
        let value = angle::cast(value);
        Self {
            value,
            previous_value: value,
            distance_to_next,
            ..Self::default()
        }
    }

    /// Restrict the admissible range to `[min, max]`.
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Restrict the admissible range to `value ± tolerance`, cut at `[-π, π]`.
    pub fn with_tolerance(self, tolerance: f64) -> Self {
        let min = (self.value - tolerance).max(-PI);
        let max = (self.value + tolerance).min(PI);
        self.with_bounds(min, max)
    }

    /// Whether `value` is a finite angle within `[min, max]`.
    #[inline]
    pub fn in_bounds(&self) -> bool {
        self.value.is_finite()
            && !angle::less(self.value, self.min) && !angle::less(self.max, self.value)
    }

    fn check(&self, index: usize) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite())
            || self.min > self.max
            || self.min < -PI
            || self.max > PI
        {
            return Err(SmoothError::InvalidBounds {
                index,
                min: self.min,
                max: self.max,
            });
        }
        if !(self.distance_to_next.is_finite() && self.distance_to_next > 0.0) {
            return Err(SmoothError::NonPositiveDistance {
                index,
                distance: self.distance_to_next,
            });
        }
        Ok(())
    }
}

/// A circular sequence of [`PointState`]s.
///
/// The buffer has a fixed capacity chosen by [`init`](Self::init) and an active
/// size that may be lowered with [`set_size`](Self::set_size). Neighbor indices
/// always wrap at the active size. In an open sequence the first and last points
/// are free extremities with a single neighbor each.
///
/// The sequence also carries the statistics of the last optimization pass
/// (`sum` and `max` of the per-point angular change).
#[derive(Debug, Clone, Default)]
pub struct AngleSequence {
    points: Vec<PointState>,
    size: usize,
    open: bool,
    sum_change: f64,
    max_change: f64,
}

impl AngleSequence {
    /// Create an empty sequence. Call [`init`](Self::init) before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a closed sequence from already populated points, validating them.
    ///
    /// Angles are canonicalized the same way [`set_point`](Self::set_point) does.
    pub fn from_points(mut points: Vec<PointState>) -> Result<Self> {
        for p in &mut points {
            p.value = angle::cast(p.value);
            p.previous_value = angle::cast(p.previous_value);
        }
        let size = points.len();
        let seq = Self {
            points,
            size,
            ..Self::default()
        };
        seq.validate()?;
        Ok(seq)
    }

    /// Allocate room for `capacity` points and make them all active.
    ///
    /// Any previous content is discarded, statistics are reset and the
    /// topology goes back to closed. Points start unconstrained at angle 0
    /// with unit spacing; callers are expected to populate them.
    pub fn init(&mut self, capacity: usize) {
        self.reset();
        self.points = vec![PointState::default(); capacity];
        self.size = capacity;
        self.open = false;
    }

    /// Release the buffer and reset statistics.
    pub fn reset(&mut self) {
        self.points = Vec::new();
        self.size = 0;
        self.sum_change = 0.0;
        self.max_change = 0.0;
    }

    /// Number of allocated points.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.points.len()
    }

    /// Number of active points.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the sequence has no active points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Change the number of active points, keeping the allocation.
    pub fn set_size(&mut self, size: usize) -> Result<()> {
        if size > self.max_size() {
            return Err(SmoothError::SizeExceedsCapacity {
                size,
                capacity: self.max_size(),
            });
        }
        self.size = size;
        Ok(())
    }

    /// Whether the first and last points are free extremities.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Select open (`true`) or closed (`false`) topology.
    #[inline]
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Circular index helper for the active size.
    #[inline]
    pub fn modulo(&self) -> Modulo {
        Modulo::new(self.size)
    }

    /// Whether `i` is the free left extremity of an open sequence.
    #[inline]
    pub(crate) fn is_first(&self, i: usize) -> bool {
        self.open && i == 0
    }

    /// Whether `i` is the free right extremity of an open sequence.
    #[inline]
    pub(crate) fn is_last(&self, i: usize) -> bool {
        self.open && i + 1 == self.size
    }

    /// Read-only access to point `i`.
    ///
    /// # Panics
    /// Panics if `i` is not below the active size.
    #[inline]
    pub fn ro(&self, i: usize) -> &PointState {
        &self.points[..self.size][i]
    }

    /// Mutable access to point `i`.
    ///
    /// # Panics
    /// Panics if `i` is not below the active size.
    #[inline]
    pub fn rw(&mut self, i: usize) -> &mut PointState {
        &mut self.points[..self.size][i]
    }

    /// Checked read access.
    pub fn get(&self, i: usize) -> Option<&PointState> {
        self.points[..self.size].get(i)
    }

    /// Replace point `i` after validating its bounds and spacing.
    pub fn set_point(&mut self, i: usize, point: PointState) -> Result<()> {
        if i >= self.size {
            return Err(SmoothError::IndexOutOfRange {
                index: i,
                size: self.size,
            });
        }
        point.check(i)?;
        let mut point = point;
        point.value = angle::cast(point.value);
        point.previous_value = angle::cast(point.previous_value);
        self.points[i] = point;
        Ok(())
    }

    /// Active points in order.
    #[inline]
    pub fn points(&self) -> &[PointState] {
        &self.points[..self.size]
    }

    /// Current angle of every active point, in order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.points().iter().map(|p| p.value)
    }

    /// Sum of absolute angular changes over the last pass.
    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum_change
    }

    /// Largest absolute angular change over the last pass.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max_change
    }

    pub(crate) fn set_statistics(&mut self, sum: f64, max: f64) {
        self.sum_change = sum;
        self.max_change = max;
    }

    /// Check every active point and the sequence length.
    ///
    /// Reports the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.size <= 2 {
            return Err(SmoothError::TooFewPoints { size: self.size });
        }
        for (i, p) in self.points().iter().enumerate() {
            p.check(i)?;
        }
        Ok(())
    }

    /// Whether [`validate`](Self::validate) succeeds.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
