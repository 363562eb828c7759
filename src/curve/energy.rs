//! Curvature energy and its gradient.
//!
//! The energy of a run of points is the sum of squared angular deviations
//! between consecutive points, each divided by the spacing separating them:
//!
//! ```text
//! E = Σ dev(θ[i], θ[i-1])² / d[i-1]
//! ```
//!
//! Every evaluator comes in two flavors: one reading the current `value` of
//! each point and one reading the `previous_value` snapshot. None of them
//! mutate the sequence.

use crate::angle;

use super::{AngleSequence, PointState};

#[inline]
fn current(p: &PointState) -> f64 {
    p.value
}

#[inline]
fn former(p: &PointState) -> f64 {
    p.previous_value
}

impl AngleSequence {
    /// Energy of the current values between `i1` and `i2`.
    ///
    /// The first term pairs the successor of `i1` with `i1`; the walk stops
    /// when it reaches `i2`, which contributes nothing. `(0, 0)` therefore
    /// sums every link except the one closing the ring.
    pub fn energy(&self, i1: usize, i2: usize) -> f64 {
        self.energy_by(i1, i2, current)
    }

    /// Energy of the snapshot values between `i1` and `i2`.
    pub fn former_energy(&self, i1: usize, i2: usize) -> f64 {
        self.energy_by(i1, i2, former)
    }

    /// Derivative of the energy with respect to each current value.
    pub fn gradient(&self) -> Vec<f64> {
        self.gradient_by(current)
    }

    /// Derivative of the energy with respect to each snapshot value.
    pub fn former_gradient(&self) -> Vec<f64> {
        self.gradient_by(former)
    }

    fn energy_by(&self, i1: usize, i2: usize, read: fn(&PointState) -> f64) -> f64 {
        let mc = self.modulo();
        let i2 = mc.cast(i2);
        let mut e = 0.0;
        let mut i = mc.next(mc.cast(i1));
        while i != i2 {
            let vi = self.ro(i);
            let vprev = self.ro(mc.previous(i));
            let dev = angle::deviation(read(vi), read(vprev));
            e += dev * dev / vprev.distance_to_next;
            i = mc.next(i);
        }
        e
    }

    fn gradient_by(&self, read: fn(&PointState) -> f64) -> Vec<f64> {
        let mc = self.modulo();
        (0..self.size())
            .map(|i| {
                let vi = self.ro(i);
                let val = read(vi);
                if self.is_last(i) {
                    // free right extremity
                    let vprev = self.ro(mc.previous(i));
                    2.0 * angle::deviation(val, read(vprev)) / vprev.distance_to_next
                } else if self.is_first(i) {
                    // free left extremity
                    let vnext = self.ro(mc.next(i));
                    -2.0 * angle::deviation(read(vnext), val) / vi.distance_to_next
                } else {
                    let vprev = self.ro(mc.previous(i));
                    let vnext = self.ro(mc.next(i));
                    2.0 * (angle::deviation(val, read(vprev)) / vprev.distance_to_next
                        - angle::deviation(read(vnext), val) / vi.distance_to_next)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(values: &[f64], distances: &[f64]) -> AngleSequence {
        let points = values
            .iter()
            .zip(distances)
            .map(|(&v, &d)| PointState::new(v, d))
            .collect();
        AngleSequence::from_points(points).unwrap()
    }

    #[test]
    fn test_uniform_sequence_has_zero_energy() {
        let seq = sequence(&[0.4; 6], &[1.0; 6]);
        assert_eq!(seq.energy(0, 0), 0.0);
        assert!(seq.gradient().iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_energy_weights_by_spacing() {
        // links 0->1 and 1->2 are summed, the closing link 2->0 is not
        let seq = sequence(&[0.0, 0.2, 0.6], &[2.0, 0.5, 1.0]);
        let expected = 0.2 * 0.2 / 2.0 + 0.4 * 0.4 / 0.5;
        assert!((seq.energy(0, 0) - expected).abs() < 1e-12);

        // a sub-range only sees the links inside it
        assert!((seq.energy(0, 2) - 0.2 * 0.2 / 2.0).abs() < 1e-12);
        assert_eq!(seq.energy(1, 2), 0.0);
    }

    #[test]
    fn test_former_energy_reads_snapshot() {
        let mut seq = sequence(&[0.0, 0.2, 0.6, 0.6], &[1.0; 4]);
        let before = seq.energy(0, 0);
        for i in 0..seq.size() {
            let p = seq.rw(i);
            p.previous_value = p.value;
            p.value = 0.0;
        }
        assert_eq!(seq.energy(0, 0), 0.0);
        assert!((seq.former_energy(0, 0) - before).abs() < 1e-12);
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        let mut seq = sequence(&[0.1, 0.5, 0.2, -0.3, -0.1], &[1.0, 0.7, 1.3, 0.9, 1.1]);
        let grad = seq.gradient();
        let h = 1e-6;

        // interior points of the full ring: total energy includes the closing link
        let total = |s: &AngleSequence| s.energy(0, 0) + {
            let n = s.size();
            let dev = angle::deviation(s.ro(0).value, s.ro(n - 1).value);
            dev * dev / s.ro(n - 1).distance_to_next
        };
        for i in 0..seq.size() {
            let v = seq.ro(i).value;
            seq.rw(i).value = v + h;
            let up = total(&seq);
            seq.rw(i).value = v - h;
            let down = total(&seq);
            seq.rw(i).value = v;
            let numeric = (up - down) / (2.0 * h);
            assert!(
                (numeric - grad[i]).abs() < 1e-5,
                "gradient[{}] = {}, numeric = {}",
                i,
                grad[i],
                numeric
            );
        }
    }

    #[test]
    fn test_open_extremities_use_one_neighbor() {
        let mut seq = sequence(&[0.1, 0.5, 0.2, -0.3], &[1.0, 2.0, 1.0, 4.0]);
        seq.set_open(true);
        let grad = seq.gradient();

        // index 0 only sees its successor
        let expected_first = -2.0 * angle::deviation(0.5, 0.1) / 1.0;
        assert!((grad[0] - expected_first).abs() < 1e-12);
        // last index only sees its predecessor
        let expected_last = 2.0 * angle::deviation(-0.3, 0.2) / 1.0;
        assert!((grad[3] - expected_last).abs() < 1e-12);

        // changing the far neighbor across the seam must not affect either end
        seq.rw(3).value = 1.2;
        let moved = seq.gradient();
        assert_eq!(moved[0], grad[0]);
        seq.rw(0).value = -1.0;
        let moved = seq.gradient();
        assert!((moved[3] - 2.0 * angle::deviation(1.2, 0.2)).abs() < 1e-12);
    }
}
