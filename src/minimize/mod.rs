//! Iterative minimizers for angle sequences.
//!
//! An [`AngleMinimizer`] owns an [`AngleSequence`] and a [`StepRule`]. Each
//! call to [`optimize`](AngleMinimizer::optimize) snapshots the current angles,
//! lets the rule compute new ones from that snapshot, and records how much the
//! angles moved. Callers repeat the call until
//! [`last_delta`](AngleMinimizer::last_delta) is small enough, or use
//! [`minimize_until_converged`] to run that loop for them.
//!
//! # Step rules
//!
//! - [`Standard`]: damped move half-way toward the weighted neighbor midpoint
//! - [`Relaxation`]: in-place move all the way to the midpoint
//! - [`GradientDescent`]: fixed-step descent along the energy gradient
//! - [`AdaptiveGradientDescent`]: descent whose step grows or shrinks with the energy
//!
//! # Example
//!
//! ```
//! use arcsmooth::prelude::*;
//!
//! let mut minimizer = AngleMinimizer::new(Standard);
//! minimizer.init(8);
//! for i in 0..8 {
//!     let noisy = if i % 2 == 0 { 0.1 } else { -0.1 };
//!     minimizer.set_point(i, PointState::new(noisy, 1.0)).unwrap();
//! }
//!
//! let mut iterations = 0;
//! while iterations < 100 {
//!     minimizer.optimize();
//!     iterations += 1;
//!     if minimizer.last_delta() < 1e-9 {
//!         break;
//!     }
//! }
//! assert!(minimizer.sequence().energy(0, 0) < 1e-12);
//! ```

mod converge;
mod gradient;
mod progress;
mod relax;

use std::fmt;

use crate::angle;
use crate::curve::{AngleSequence, PointState};
use crate::error::Result;

pub use converge::{minimize_until_converged, ConvergeOptions, ConvergeReport, DeltaMeasure};
pub use gradient::{
    AdaptiveGradientDescent, GradientDescent, StepObserver, StepReport, DEFAULT_STEP,
};
pub use progress::Progress;
pub use relax::{Relaxation, Standard};

/// One update rule of an [`AngleMinimizer`].
///
/// The `Display` implementation identifies the rule in logs.
pub trait StepRule: fmt::Display {
    /// Compute new values for the points from `i1` up to (not including) `i2`.
    ///
    /// Runs after the snapshot: `previous_value` holds the angles from before
    /// this step for every point of the range.
    fn one_step(&mut self, seq: &mut AngleSequence, i1: usize, i2: usize);

    /// Convergence measure of the last step; smaller means closer to a minimum.
    fn last_delta(&self, seq: &AngleSequence) -> f64;

    /// Human-readable identification of the rule.
    fn describe(&self) -> String {
        self.to_string()
    }

    /// Check the rule's own parameters before iterating.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl<R: StepRule + ?Sized> StepRule for Box<R> {
    fn one_step(&mut self, seq: &mut AngleSequence, i1: usize, i2: usize) {
        (**self).one_step(seq, i1, i2)
    }

    fn last_delta(&self, seq: &AngleSequence) -> f64 {
        (**self).last_delta(seq)
    }

    fn validate(&self) -> Result<()> {
        (**self).validate()
    }
}

/// Drives a [`StepRule`] over an owned [`AngleSequence`].
#[derive(Debug, Clone)]
pub struct AngleMinimizer<R> {
    sequence: AngleSequence,
    rule: R,
}

impl<R: StepRule> AngleMinimizer<R> {
    /// Create a minimizer with an empty sequence.
    pub fn new(rule: R) -> Self {
        Self::with_sequence(rule, AngleSequence::new())
    }

    /// Create a minimizer over an already populated sequence.
    pub fn with_sequence(rule: R, sequence: AngleSequence) -> Self {
        Self { sequence, rule }
    }

    /// Allocate `capacity` closed, unconstrained points. See [`AngleSequence::init`].
    pub fn init(&mut self, capacity: usize) {
        self.sequence.init(capacity);
    }

    /// Release the sequence and reset statistics.
    pub fn reset(&mut self) {
        self.sequence.reset();
    }

    /// The optimized sequence.
    #[inline]
    pub fn sequence(&self) -> &AngleSequence {
        &self.sequence
    }

    /// Mutable access to the sequence, for populating it.
    #[inline]
    pub fn sequence_mut(&mut self) -> &mut AngleSequence {
        &mut self.sequence
    }

    /// Give back the sequence.
    pub fn into_sequence(self) -> AngleSequence {
        self.sequence
    }

    /// The step rule.
    #[inline]
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Mutable access to the step rule.
    #[inline]
    pub fn rule_mut(&mut self) -> &mut R {
        &mut self.rule
    }

    /// Number of active points.
    #[inline]
    pub fn size(&self) -> usize {
        self.sequence.size()
    }

    /// Read-only access to point `i`.
    #[inline]
    pub fn ro(&self, i: usize) -> &PointState {
        self.sequence.ro(i)
    }

    /// Mutable access to point `i`.
    #[inline]
    pub fn rw(&mut self, i: usize) -> &mut PointState {
        self.sequence.rw(i)
    }

    /// Replace point `i` after validation. See [`AngleSequence::set_point`].
    pub fn set_point(&mut self, i: usize, point: PointState) -> Result<()> {
        self.sequence.set_point(i, point)
    }

    /// Select open (`true`) or closed (`false`) topology.
    pub fn set_open(&mut self, open: bool) {
        self.sequence.set_open(open);
    }

    /// Current angles, in order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.sequence.values()
    }

    /// One step over the whole ring. Same as `optimize_range(0, 0)`.
    pub fn optimize(&mut self) -> f64 {
        self.optimize_range(0, 0)
    }

    /// One step over the points from `i1` up to (not including) `i2`.
    ///
    /// `i1 == i2` covers the whole ring starting at `i1`. Returns the sum of
    /// absolute angular changes; the largest one is available from
    /// [`max`](Self::max).
    ///
    /// # Panics
    /// Panics if the sequence has two points or fewer.
    pub fn optimize_range(&mut self, i1: usize, i2: usize) -> f64 {
        assert!(
            self.sequence.size() > 2,
            "optimizing requires more than two points, got {}",
            self.sequence.size()
        );
        let mc = self.sequence.modulo();
        let (i1, i2) = (mc.cast(i1), mc.cast(i2));

        for i in mc.walk(i1, i2) {
            let p = self.sequence.rw(i);
            p.previous_value = p.value;
        }

        self.rule.one_step(&mut self.sequence, i1, i2);

        let mut sum = 0.0;
        let mut max = 0.0_f64;
        for i in mc.walk(i1, i2) {
            let p = self.sequence.ro(i);
            let diff = angle::deviation(p.value, p.previous_value).abs();
            max = max.max(diff);
            sum += diff;
        }
        self.sequence.set_statistics(sum, max);
        sum
    }

    /// Validate the rule and the sequence, then run [`optimize`](Self::optimize).
    pub fn try_optimize(&mut self) -> Result<f64> {
        self.rule.validate()?;
        self.sequence.validate()?;
        Ok(self.optimize())
    }

    /// Convergence measure of the last step, as defined by the rule.
    pub fn last_delta(&self) -> f64 {
        self.rule.last_delta(&self.sequence)
    }

    /// Sum of absolute angular changes over the last step.
    #[inline]
    pub fn sum(&self) -> f64 {
        self.sequence.sum()
    }

    /// Largest absolute angular change over the last step.
    #[inline]
    pub fn max(&self) -> f64 {
        self.sequence.max()
    }

    /// Human-readable identification of the step rule.
    pub fn describe(&self) -> String {
        self.rule.describe()
    }
}

impl<R: StepRule> fmt::Display for AngleMinimizer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.rule, f)
    }
}
