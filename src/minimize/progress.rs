//! Progress reporting for convergence loops.
//!
//! [`minimize_until_converged`](super::minimize_until_converged) reports once
//! per iteration with the iteration index, the iteration budget and the
//! convergence measure of the step just taken.
//!
//! # Example
//!
//! ```
//! use arcsmooth::minimize::Progress;
//!
//! let progress = Progress::new(|iteration, budget, delta| {
//!     println!("[{}/{}] delta={:.3e}", iteration, budget, delta);
//! });
//! progress.report(0, 10, 0.5);
//! ```

use std::fmt;

/// A callback receiving `(iteration, budget, delta)` while a loop runs.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, f64) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, f64) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, iteration: usize, budget: usize, delta: f64) {
        (self.callback)(iteration, budget, delta);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
