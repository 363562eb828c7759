//! Circular index arithmetic.

/// Computes successor and predecessor indices modulo a fixed size.
///
/// Built from the *active* size of a sequence, never from its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modulo {
    size: usize,
}

impl Modulo {
    /// Create a helper for indices in `0..size`.
    ///
    /// # Panics
    /// Panics if `size` is zero.
    #[inline]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "circular indexing requires a non-empty range");
        Self { size }
    }

    /// The modulus.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Index following `i`, wrapping to 0 after the last one.
    #[inline]
    pub fn next(&self, i: usize) -> usize {
        if i + 1 >= self.size {
            0
        } else {
            i + 1
        }
    }

    /// Index preceding `i`, wrapping to the last one before 0.
    #[inline]
    pub fn previous(&self, i: usize) -> usize {
        if i == 0 {
            self.size - 1
        } else {
            i - 1
        }
    }

    /// Reduce an arbitrary index into `0..size`.
    #[inline]
    pub fn cast(&self, i: usize) -> usize {
        i % self.size
    }

    /// Indices from `i1` up to (not including) `i2`, walking forward.
    ///
    /// When `i1 == i2` the walk covers the whole ring exactly once.
    pub fn walk(&self, i1: usize, i2: usize) -> Walk {
        Walk {
            modulo: *self,
            current: self.cast(i1),
            end: self.cast(i2),
            started: false,
        }
    }
}

/// Iterator returned by [`Modulo::walk`].
#[derive(Debug, Clone)]
pub struct Walk {
    modulo: Modulo,
    current: usize,
    end: usize,
    started: bool,
}

impl Iterator for Walk {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.started && self.current == self.end {
            return None;
        }
        self.started = true;
        let i = self.current;
        self.current = self.modulo.next(i);
        Some(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_previous_wrap() {
        let m = Modulo::new(4);
        assert_eq!(m.next(3), 0);
        assert_eq!(m.next(1), 2);
        assert_eq!(m.previous(0), 3);
        assert_eq!(m.previous(2), 1);
    }

    #[test]
    fn test_walk_full_ring() {
        let m = Modulo::new(5);
        let all: Vec<usize> = m.walk(0, 0).collect();
        assert_eq!(all, vec![0, 1, 2, 3, 4]);

        let from_three: Vec<usize> = m.walk(3, 3).collect();
        assert_eq!(from_three, vec![3, 4, 0, 1, 2]);
    }

    #[test]
    fn test_walk_sub_range() {
        let m = Modulo::new(6);
        let wrapped: Vec<usize> = m.walk(4, 2).collect();
        assert_eq!(wrapped, vec![4, 5, 0, 1]);

        let single: Vec<usize> = m.walk(2, 3).collect();
        assert_eq!(single, vec![2]);
    }

    #[test]
    #[should_panic]
    fn test_empty_modulus_panics() {
        let _ = Modulo::new(0);
    }
}
