//! Circular sequences of angle samples.
//!
//! This module holds the state shared by every minimizer:
//!
//! - [`Modulo`]: successor/predecessor arithmetic on a ring of indices
//! - [`PointState`]: current angle, snapshot, bounds and spacing of a sample
//! - [`AngleSequence`]: the buffer of samples, with open or closed topology
//!
//! Energy and gradient evaluators are implemented directly on
//! [`AngleSequence`] (see [`AngleSequence::energy`] and
//! [`AngleSequence::gradient`]).

mod energy;
mod modulo;
mod state;

pub use modulo::{Modulo, Walk};
pub use state::{AngleSequence, PointState};
