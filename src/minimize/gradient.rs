//! Gradient-descent step rules.
//!
//! Both rules compute the gradient of the snapshot energy over the whole
//! sequence once per step, then move every point of the range against it:
//!
//! ```text
//! θ[i] ← clamp(θ_prev[i] - step · ∇E[i], min[i], max[i])
//! ```
//!
//! After each step the energy of the range before and after the move is
//! logged at debug level and handed to the optional [`StepObserver`].

use std::fmt;

use crate::angle;
use crate::curve::AngleSequence;
use crate::error::{Result, SmoothError};

use super::StepRule;

/// Default descent step.
pub const DEFAULT_STEP: f64 = 0.1;

/// Energies around one gradient step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Energy of the snapshot values over the stepped range.
    pub energy_before: f64,
    /// Energy of the new values over the stepped range.
    pub energy_after: f64,
    /// Step size used for this step.
    pub step: f64,
}

/// Receives a [`StepReport`] after every gradient step.
pub struct StepObserver {
    callback: Box<dyn Fn(&StepReport) + Send + Sync>,
}

impl StepObserver {
    /// Create an observer from a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&StepReport) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    #[inline]
    fn report(&self, report: &StepReport) {
        (self.callback)(report);
    }
}

impl fmt::Debug for StepObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepObserver").finish_non_exhaustive()
    }
}

/// Move the range against the snapshot gradient and return the energies
/// before and after.
fn descend(seq: &mut AngleSequence, i1: usize, i2: usize, step: f64) -> StepReport {
    let grad = seq.former_gradient();
    let mc = seq.modulo();
    for i in mc.walk(i1, i2) {
        let p = seq.rw(i);
        let mid = angle::cast(p.previous_value - step * grad[i]);
        p.value = angle::clamp(mid, p.min, p.max);
    }
    StepReport {
        energy_before: seq.former_energy(i1, i2),
        energy_after: seq.energy(i1, i2),
        step,
    }
}

fn check_step(step: f64) -> Result<()> {
    if !(step.is_finite() && step > 0.0) {
        return Err(SmoothError::invalid_param(
            "step",
            step,
            "must be finite and positive",
        ));
    }
    Ok(())
}

fn publish(report: &StepReport, observer: Option<&StepObserver>) {
    log::debug!(
        "E1={} E2={} s={}",
        report.energy_before,
        report.energy_after,
        report.step
    );
    if let Some(observer) = observer {
        observer.report(report);
    }
}

/// Largest gradient magnitude among the points that moved in the last step.
///
/// Points pinned at a bound do not count, so a sequence stuck against its
/// constraints reports zero.
fn moving_gradient_norm(seq: &AngleSequence) -> f64 {
    seq.former_gradient()
        .iter()
        .zip(seq.points())
        .filter(|(_, p)| p.value != p.previous_value)
        .fold(0.0_f64, |ninf, (g, _)| ninf.max(g.abs()))
}

/// Fixed-step gradient descent.
#[derive(Debug)]
pub struct GradientDescent {
    step: f64,
    observer: Option<StepObserver>,
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

impl GradientDescent {
    /// Create a rule with the given step size.
    pub fn new(step: f64) -> Self {
        Self {
            step,
            observer: None,
        }
    }

    /// Attach an observer called after every step.
    pub fn with_observer(mut self, observer: StepObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Current step size.
    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Change the step size.
    pub fn set_step(&mut self, step: f64) {
        self.step = step;
    }
}

impl StepRule for GradientDescent {
    fn one_step(&mut self, seq: &mut AngleSequence, i1: usize, i2: usize) {
        let report = descend(seq, i1, i2, self.step);
        publish(&report, self.observer.as_ref());
    }

    fn last_delta(&self, seq: &AngleSequence) -> f64 {
        moving_gradient_norm(seq)
    }

    fn validate(&self) -> Result<()> {
        check_step(self.step)
    }
}

impl fmt::Display for GradientDescent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[LinearMinimizer::gradient descent {}]", self.step)
    }
}

/// Gradient descent whose step adapts to the outcome of each step.
///
/// If a step fails to lower the energy of the range the step size is halved,
/// otherwise it is doubled for the next step. The values computed by a failed
/// step are kept.
#[derive(Debug)]
pub struct AdaptiveGradientDescent {
    step: f64,
    observer: Option<StepObserver>,
}

impl Default for AdaptiveGradientDescent {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

impl AdaptiveGradientDescent {
    /// Create a rule with the given initial step size.
    pub fn new(step: f64) -> Self {
        Self {
            step,
            observer: None,
        }
    }

    /// Attach an observer called after every step.
    pub fn with_observer(mut self, observer: StepObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Step size that the next step will use.
    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Change the step size.
    pub fn set_step(&mut self, step: f64) {
        self.step = step;
    }
}

impl StepRule for AdaptiveGradientDescent {
    fn one_step(&mut self, seq: &mut AngleSequence, i1: usize, i2: usize) {
        let report = descend(seq, i1, i2, self.step);
        publish(&report, self.observer.as_ref());
        if report.energy_before <= report.energy_after {
            self.step /= 2.0;
        } else {
            self.step *= 2.0;
        }
    }

    fn last_delta(&self, seq: &AngleSequence) -> f64 {
        moving_gradient_norm(seq)
    }

    fn validate(&self) -> Result<()> {
        check_step(self.step)
    }
}

impl fmt::Display for AdaptiveGradientDescent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[LinearMinimizer::gradient descent with adaptive step {}]",
            self.step
        )
    }
}
