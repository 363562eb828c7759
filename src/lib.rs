//! # Arcsmooth
//!
//! Curvature-minimizing smoothing of tangent-angle sequences sampled along a
//! discrete curve.
//!
//! Given a noisy tangent angle for every sample of an open or closed curve,
//! the spacing between consecutive samples and an admissible angle range per
//! sample, arcsmooth iteratively relaxes the angles toward a sequence of
//! minimal angular variation. Converting the smoothed angles back into point
//! coordinates is left to the caller.
//!
//! ## Features
//!
//! - **Circular state buffer**: [`AngleSequence`](curve::AngleSequence) with
//!   open or closed topology and per-point bounds
//! - **Seam-aware angle arithmetic**: [`angle`] works in `[-π, π)` with
//!   shortest-path deviations
//! - **Energy and gradient**: analytic curvature energy and its derivative,
//!   for current and snapshot values
//! - **Four step rules**: damped midpoint, relaxation, gradient descent and
//!   adaptive-step gradient descent behind one [`StepRule`](minimize::StepRule) trait
//!
//! ## Quick Start
//!
//! ```
//! use arcsmooth::prelude::*;
//! use std::f64::consts::PI;
//!
//! // tangent angles of a noisy closed polygon approximating a circle
//! let n = 16;
//! let mut minimizer = AngleMinimizer::new(Standard);
//! minimizer.init(n);
//! for i in 0..n {
//!     let ideal = 2.0 * PI * i as f64 / n as f64;
//!     let noise = if i % 3 == 0 { 0.05 } else { -0.02 };
//!     minimizer
//!         .set_point(i, PointState::new(ideal + noise, 1.0).with_tolerance(0.1))
//!         .unwrap();
//! }
//!
//! let options = ConvergeOptions::default().with_tolerance(1e-9);
//! let report = minimize_until_converged(&mut minimizer, &options, &Progress::none()).unwrap();
//! println!("{} after {} steps", minimizer, report.iterations);
//!
//! for theta in minimizer.values() {
//!     assert!((-PI..PI).contains(&theta));
//! }
//! ```
//!
//! ## Driving the loop by hand
//!
//! The core never decides when to stop; callers step it themselves:
//!
//! ```
//! use arcsmooth::prelude::*;
//!
//! let points = [0.0, 0.3, 0.1, 0.4, 0.2]
//!     .iter()
//!     .map(|&v| PointState::new(v, 1.0))
//!     .collect();
//! let seq = AngleSequence::from_points(points).unwrap();
//! let mut minimizer = AngleMinimizer::with_sequence(AdaptiveGradientDescent::new(0.1), seq);
//! minimizer.set_open(true);
//!
//! for _ in 0..200 {
//!     minimizer.optimize();
//!     if minimizer.last_delta() < 1e-6 {
//!         break;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod angle;
pub mod curve;
pub mod error;
pub mod minimize;

/// Prelude module for convenient imports.
///
/// ```
/// use arcsmooth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::curve::{AngleSequence, Modulo, PointState};
    pub use crate::error::{Result, SmoothError};
    pub use crate::minimize::{
        minimize_until_converged, AdaptiveGradientDescent, AngleMinimizer, ConvergeOptions,
        ConvergeReport, DeltaMeasure, GradientDescent, Progress, Relaxation, Standard,
        StepObserver, StepReport, StepRule,
    };
}
