//! Neighbor-midpoint step rules.
//!
//! Both rules move each point toward the angle its two neighbors predict for
//! it: the shortest-arc interpolation between the neighbors, placed according
//! to the spacing on each side. Free extremities of an open curve simply
//! follow their only neighbor.

use std::fmt;

use crate::angle;
use crate::curve::{AngleSequence, PointState};

use super::StepRule;

/// Damping factor of the [`Standard`] rule.
const DAMPING: f64 = 0.5;

/// Angle interpolated between `valp` and `valn` at the position of point `vi`.
///
/// `vprev` is the predecessor of `vi`, so the fraction of the way from the
/// predecessor is `d(prev) / (d(prev) + d(i))`.
#[inline]
fn weighted_mid(vprev: &PointState, vi: &PointState, valp: f64, valn: f64) -> f64 {
    let y = angle::deviation(valn, valp);
    let offset = vprev.distance_to_next * y / (vi.distance_to_next + vprev.distance_to_next);
    angle::cast(valp + offset)
}

/// Jacobi-style damped smoothing.
///
/// Every point reads only snapshot values of its neighbors, so the order in
/// which points are visited does not matter. The point then moves half-way
/// from its snapshot value toward the clamped midpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct Standard;

impl StepRule for Standard {
    fn one_step(&mut self, seq: &mut AngleSequence, i1: usize, i2: usize) {
        let mc = seq.modulo();
        for i in mc.walk(i1, i2) {
            let iprev = mc.previous(i);
            let inext = mc.next(i);
            let mid = if seq.is_last(i) {
                seq.ro(iprev).previous_value
            } else if seq.is_first(i) {
                seq.ro(inext).previous_value
            } else {
                let vprev = seq.ro(iprev);
                let vnext = seq.ro(inext);
                weighted_mid(vprev, seq.ro(i), vprev.previous_value, vnext.previous_value)
            };

            let p = seq.rw(i);
            let mid = angle::clamp(mid, p.min, p.max);
            // the half-way point can leave [min, max] when the short arc crosses the seam
            let moved = angle::lerp(p.previous_value, mid, DAMPING);
            p.value = angle::clamp(moved, p.min, p.max);
        }
    }

    fn last_delta(&self, seq: &AngleSequence) -> f64 {
        seq.max()
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[AngleLinearMinimizer::standard {}]", DAMPING)
    }
}

/// Gauss-Seidel-style relaxation.
///
/// Points are visited in ring order starting at `i1`. The predecessor is read
/// with its freshly updated value, the successor with its current value, and
/// the point jumps straight to the clamped midpoint. A free left extremity
/// reads its successor's snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relaxation;

impl StepRule for Relaxation {
    fn one_step(&mut self, seq: &mut AngleSequence, i1: usize, i2: usize) {
        let mc = seq.modulo();
        for i in mc.walk(i1, i2) {
            let iprev = mc.previous(i);
            let inext = mc.next(i);
            let mid = if seq.is_last(i) {
                seq.ro(iprev).value
            } else if seq.is_first(i) {
                seq.ro(inext).previous_value
            } else {
                let vprev = seq.ro(iprev);
                let vnext = seq.ro(inext);
                weighted_mid(vprev, seq.ro(i), vprev.value, vnext.value)
            };

            let p = seq.rw(i);
            p.value = angle::clamp(mid, p.min, p.max);
        }
    }

    fn last_delta(&self, seq: &AngleSequence) -> f64 {
        seq.max()
    }
}

impl fmt::Display for Relaxation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[LinearMinimizer::relaxation]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minimize::AngleMinimizer;

    fn sequence(values: &[f64], distances: &[f64]) -> AngleSequence {
        let points = values
            .iter()
            .zip(distances)
            .map(|(&v, &d)| PointState::new(v, d))
            .collect();
        AngleSequence::from_points(points).unwrap()
    }

    #[test]
    fn test_weighted_mid_follows_spacing() {
        // point sits one unit after prev and three units before next
        let vprev = PointState::new(0.0, 1.0);
        let vi = PointState::new(0.0, 3.0);
        let mid = weighted_mid(&vprev, &vi, 0.0, 0.8);
        assert!((mid - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_standard_respects_bounds() {
        let mut seq = sequence(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0], &[1.0; 6]);
        for i in 0..seq.size() {
            let p = *seq.ro(i);
            seq.set_point(i, p.with_tolerance(0.1)).unwrap();
        }
        let mut minimizer = AngleMinimizer::with_sequence(Standard, seq);
        for _ in 0..60 {
            minimizer.optimize();
            for p in minimizer.sequence().points() {
                assert!(p.in_bounds(), "{:?} escaped its bounds", p);
            }
        }
        // every point ends pinned at the bound nearest the others
        assert!((minimizer.ro(0).value - 0.1).abs() < 1e-12);
        assert!((minimizer.ro(1).value - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_standard_clamps_damped_move_across_seam() {
        // bounds exclude the seam, the short arc from 2.9 to -2.9 crosses it
        let mut seq = sequence(&[2.9, 2.9, -2.9, -2.9], &[1.0; 4]);
        for i in 0..seq.size() {
            let p = *seq.ro(i);
            seq.set_point(i, p.with_bounds(-3.0, 3.0)).unwrap();
        }
        let mut minimizer = AngleMinimizer::with_sequence(Standard, seq);
        minimizer.optimize();
        for p in minimizer.sequence().points() {
            assert!(p.in_bounds(), "{:?} escaped its bounds", p);
        }
    }

    #[test]
    fn test_standard_decreases_energy_on_open_curve() {
        let mut seq = sequence(
            &[0.0, 0.3, -0.1, 0.4, 0.2, -0.2, 0.1],
            &[1.0, 0.5, 2.0, 1.0, 1.5, 1.0, 1.0],
        );
        seq.set_open(true);
        let mut minimizer = AngleMinimizer::with_sequence(Standard, seq);
        for _ in 0..30 {
            minimizer.optimize();
            let before = minimizer.sequence().former_energy(0, 0);
            let after = minimizer.sequence().energy(0, 0);
            assert!(after <= before + 1e-12, "energy rose from {} to {}", before, after);
        }
    }

    #[test]
    fn test_open_extremities_follow_neighbor() {
        let mut seq = sequence(&[0.4, 0.0, 0.0, -0.4], &[1.0; 4]);
        seq.set_open(true);
        let mut minimizer = AngleMinimizer::with_sequence(Standard, seq);
        minimizer.optimize();
        // ends move half-way toward their single neighbor's snapshot
        assert!((minimizer.ro(0).value - 0.2).abs() < 1e-12);
        assert!((minimizer.ro(3).value + 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_relaxation_uses_updated_predecessor() {
        let values = [0.0, 0.6, 0.0, 0.0, 0.0];
        let mut relaxed = AngleMinimizer::with_sequence(Relaxation, sequence(&values, &[1.0; 5]));
        relaxed.optimize();

        // point 0 reads snapshot neighbors (4 and 1): (0 + 0.6) / 2
        assert!((relaxed.ro(0).value - 0.3).abs() < 1e-12);
        // point 1 reads the updated point 0: (0.3 + 0) / 2
        assert!((relaxed.ro(1).value - 0.15).abs() < 1e-12);
        // point 2 reads the updated point 1
        assert!((relaxed.ro(2).value - 0.075).abs() < 1e-12);

        // a synchronized damped update moves point 2 half-way to (0.6 + 0) / 2
        let mut synced = AngleMinimizer::with_sequence(Standard, sequence(&values, &[1.0; 5]));
        synced.optimize();
        assert!((synced.ro(2).value - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_relaxation_open_extremities() {
        let mut seq = sequence(&[0.4, 0.2, 0.0, -0.4], &[1.0; 4]);
        seq.set_open(true);
        let mut minimizer = AngleMinimizer::with_sequence(Relaxation, seq);
        minimizer.optimize();

        // left end jumps onto its successor's snapshot
        assert!((minimizer.ro(0).value - minimizer.ro(1).previous_value).abs() < 1e-12);
        assert!((minimizer.ro(0).value - 0.2).abs() < 1e-12);
        // interior points read the updated predecessor: (0.2 + 0) / 2, then (0.1 - 0.4) / 2
        assert!((minimizer.ro(1).value - 0.1).abs() < 1e-12);
        assert!((minimizer.ro(2).value + 0.15).abs() < 1e-12);
        // right end copies the updated value of its predecessor, not its snapshot
        assert_eq!(minimizer.ro(3).value, minimizer.ro(2).value);
        assert_ne!(minimizer.ro(3).value, minimizer.ro(2).previous_value);
    }

    #[test]
    fn test_relaxation_converges() {
        let seq = sequence(&[0.2, -0.1, 0.4, 0.0, 0.3, -0.2], &[1.0; 6]);
        let mut minimizer = AngleMinimizer::with_sequence(Relaxation, seq);
        let mut iterations = 0;
        while iterations < 1000 {
            minimizer.optimize();
            iterations += 1;
            if minimizer.last_delta() < 1e-12 {
                break;
            }
        }
        assert!(iterations < 1000, "relaxation did not converge");
        let first = minimizer.ro(0).value;
        assert!(minimizer.values().all(|v| (v - first).abs() < 1e-9));
    }

    #[test]
    fn test_describe() {
        assert_eq!(Standard.describe(), "[AngleLinearMinimizer::standard 0.5]");
        assert_eq!(Relaxation.describe(), "[LinearMinimizer::relaxation]");
    }
}
