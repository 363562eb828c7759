//! Running a minimizer until it converges.
//!
//! The minimizers only perform single steps. This module provides the loop a
//! caller usually writes around them: step, check the convergence measure
//! against a tolerance, stop when it is met or the iteration budget runs out.

use crate::error::{Result, SmoothError};

use super::{AngleMinimizer, Progress, StepRule};

/// Which quantity is compared against the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMeasure {
    /// The rule's own measure, [`AngleMinimizer::last_delta`].
    #[default]
    LastDelta,
    /// Total absolute angular change of the step, [`AngleMinimizer::sum`].
    SumChange,
}

/// Options for [`minimize_until_converged`].
#[derive(Debug, Clone)]
pub struct ConvergeOptions {
    /// Maximum number of steps.
    pub max_iterations: usize,

    /// Stop once the measure falls strictly below this value.
    pub tolerance: f64,

    /// Convergence measure.
    pub measure: DeltaMeasure,

    /// Range `(i1, i2)` handed to every step; the whole ring when `None`.
    pub range: Option<(usize, usize)>,
}

impl Default for ConvergeOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-6,
            measure: DeltaMeasure::LastDelta,
            range: None,
        }
    }
}

impl ConvergeOptions {
    /// Create options with the specified iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Create options with the specified tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Create options using the given convergence measure.
    pub fn with_measure(mut self, measure: DeltaMeasure) -> Self {
        self.measure = measure;
        self
    }

    /// Restrict every step to the points from `i1` up to `i2`.
    pub fn with_range(mut self, i1: usize, i2: usize) -> Self {
        self.range = Some((i1, i2));
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(SmoothError::invalid_param(
                "max_iterations",
                self.max_iterations,
                "must be at least 1",
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(SmoothError::invalid_param(
                "tolerance",
                self.tolerance,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Outcome of [`minimize_until_converged`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergeReport {
    /// Number of steps performed.
    pub iterations: usize,
    /// Whether the tolerance was met before the budget ran out.
    pub converged: bool,
    /// Convergence measure after the last step.
    pub last_delta: f64,
    /// Energy of the stepped range after the last step.
    pub energy: f64,
}

/// Step `minimizer` until its convergence measure drops below the tolerance.
///
/// The options, the rule and the sequence are validated first, so degenerate input is reported as an
/// error instead of tripping the precondition of
/// [`AngleMinimizer::optimize_range`].
///
/// # Example
///
/// ```
/// use arcsmooth::prelude::*;
///
/// let points = [0.0, 0.2, -0.1, 0.15, 0.05]
///     .iter()
///     .map(|&v| PointState::new(v, 1.0))
///     .collect();
/// let seq = AngleSequence::from_points(points).unwrap();
/// let mut minimizer = AngleMinimizer::with_sequence(Standard, seq);
///
/// let options = ConvergeOptions::default().with_tolerance(1e-9);
/// let report = minimize_until_converged(&mut minimizer, &options, &Progress::none()).unwrap();
/// assert!(report.converged);
/// ```
pub fn minimize_until_converged<R: StepRule>(
    minimizer: &mut AngleMinimizer<R>,
    options: &ConvergeOptions,
    progress: &Progress,
) -> Result<ConvergeReport> {
    options.validate()?;
    minimizer.rule().validate()?;
    minimizer.sequence().validate()?;

    let (i1, i2) = options.range.unwrap_or((0, 0));
    let budget = options.max_iterations;

    let mut iterations = 0;
    let mut delta = f64::INFINITY;
    let mut converged = false;
    while iterations < budget {
        let sum = minimizer.optimize_range(i1, i2);
        iterations += 1;
        delta = match options.measure {
            DeltaMeasure::LastDelta => minimizer.last_delta(),
            DeltaMeasure::SumChange => sum,
        };
        progress.report(iterations, budget, delta);
        if delta < options.tolerance {
            converged = true;
            break;
        }
    }

    let energy = minimizer.sequence().energy(i1, i2);
    if converged {
        log::debug!(
            "{} converged after {} iterations (delta={:e}, E={:e})",
            minimizer.describe(),
            iterations,
            delta,
            energy
        );
    } else {
        log::warn!(
            "{} stopped after {} iterations without converging (delta={:e})",
            minimizer.describe(),
            iterations,
            delta
        );
    }

    Ok(ConvergeReport {
        iterations,
        converged,
        last_delta: delta,
        energy,
    })
}
