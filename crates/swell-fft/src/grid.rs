//! Square complex-valued grid storage shared by the spectrum and FFT stages.

use crate::Complex32;

/// An `n × n` row-major grid of complex samples.
#[derive(Clone)]
pub struct ComplexGrid {
    n: usize,
    data: Vec<Complex32>,
}

impl ComplexGrid {
    /// Create a zero-filled grid of size `n × n`.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            data: vec![Complex32::new(0.0, 0.0); n * n],
        }
    }

    /// Grid side length.
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Complex32 {
        self.data[y * self.n + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: Complex32) {
        self.data[y * self.n + x] = value;
    }

    /// Read with toroidal wrap-around, used for conjugate-mirror lookups
    /// where the mirrored index of 0 is `n`.
    #[inline]
    pub fn get_wrapped(&self, x: usize, y: usize) -> Complex32 {
        self.data[(y % self.n) * self.n + (x % self.n)]
    }

    /// Flat row-major view of the samples.
    pub fn as_slice(&self) -> &[Complex32] {
        &self.data
    }

    /// Reset every sample to zero.
    pub fn clear(&mut self) {
        self.data.fill(Complex32::new(0.0, 0.0));
    }

    /// True if any sample is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.data.iter().any(|c| !c.re.is_finite() || !c.im.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_zeroed() {
        let grid = ComplexGrid::new(8);
        assert_eq!(grid.size(), 8);
        assert!(grid.as_slice().iter().all(|c| c.re == 0.0 && c.im == 0.0));
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut grid = ComplexGrid::new(4);
        grid.set(3, 1, Complex32::new(2.5, -1.0));
        assert_eq!(grid.get(3, 1), Complex32::new(2.5, -1.0));
        assert_eq!(grid.get(1, 3), Complex32::new(0.0, 0.0));
    }

    #[test]
    fn test_wrapped_access() {
        let mut grid = ComplexGrid::new(4);
        grid.set(0, 0, Complex32::new(1.0, 0.0));
        // The mirror of index 0 is n, which wraps back to 0.
        assert_eq!(grid.get_wrapped(4, 4), Complex32::new(1.0, 0.0));
    }

    #[test]
    fn test_non_finite_detection() {
        let mut grid = ComplexGrid::new(2);
        assert!(!grid.has_non_finite());
        grid.set(1, 1, Complex32::new(f32::NAN, 0.0));
        assert!(grid.has_non_finite());
    }
}
