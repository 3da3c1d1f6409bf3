//! 2D inverse FFT over a complex grid using the precomputed butterfly tables.
//!
//! Mirrors the two-kernel dispatch structure of the GPU original: `log2(n)`
//! butterfly stages along rows into a temporary buffer, then `log2(n)`
//! stages along columns into the destination. The `1/n²` inverse scaling is
//! folded into the passes as `1/n` per axis, so callers never renormalize.

use crate::{ButterflyTable, Complex32, ComplexGrid, DisplacementField, FftError};

/// Selects which displacement-field channel an FFT dispatch writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FftChannel {
    /// Vertical wave height.
    Height = 0,
    /// Horizontal displacement along X.
    DispX = 1,
    /// Horizontal displacement along Y.
    DispY = 2,
}

impl FftChannel {
    /// All channels in dispatch order.
    pub const ALL: [FftChannel; 3] = [FftChannel::Height, FftChannel::DispX, FftChannel::DispY];

    /// Slot index used to select the output component.
    pub fn slot(self) -> usize {
        self as usize
    }
}

/// Inverse-FFT executor for one grid size.
///
/// Holds the shared [`ButterflyTable`] plus scratch buffers so per-tick
/// execution allocates nothing. All three channels of a dispatch share the
/// same tables.
pub struct FftEngine {
    table: ButterflyTable,
    /// Row-pass output, consumed by the column pass.
    temp: ComplexGrid,
    /// Spatial-domain scratch for field extraction.
    spatial: ComplexGrid,
    /// Ping-pong line buffers for the butterfly stages.
    line_a: Vec<Complex32>,
    line_b: Vec<Complex32>,
}

impl FftEngine {
    /// Create an engine for grid size `n` (power of two).
    pub fn new(n: usize) -> Result<Self, FftError> {
        let table = ButterflyTable::new(n)?;
        Ok(Self {
            table,
            temp: ComplexGrid::new(n),
            spatial: ComplexGrid::new(n),
            line_a: vec![Complex32::new(0.0, 0.0); n],
            line_b: vec![Complex32::new(0.0, 0.0); n],
        })
    }

    /// Grid size the engine was built for.
    pub fn size(&self) -> usize {
        self.table.size()
    }

    /// The shared butterfly table.
    pub fn table(&self) -> &ButterflyTable {
        &self.table
    }

    /// Run the 2D inverse FFT of `spectrum` into `out`.
    pub fn inverse_2d(&mut self, spectrum: &ComplexGrid, out: &mut ComplexGrid) -> Result<(), FftError> {
        let n = self.table.size();
        if spectrum.size() != n {
            return Err(FftError::SizeMismatch {
                expected: n,
                actual: spectrum.size(),
            });
        }
        if out.size() != n {
            return Err(FftError::SizeMismatch {
                expected: n,
                actual: out.size(),
            });
        }

        // Row pass (X axis) into the temporary buffer.
        for y in 0..n {
            for x in 0..n {
                self.line_a[x] = spectrum.get(x, y);
            }
            self.inverse_line();
            for x in 0..n {
                self.temp.set(x, y, self.line_a[x]);
            }
        }

        // Column pass (Y axis) into the destination.
        for x in 0..n {
            for y in 0..n {
                self.line_a[y] = self.temp.get(x, y);
            }
            self.inverse_line();
            for y in 0..n {
                out.set(x, y, self.line_a[y]);
            }
        }

        Ok(())
    }

    /// Run the 2D inverse FFT of `spectrum` and write the real part into one
    /// channel of `field`. The spectrum is expected to be Hermitian, so the
    /// spatial result is real up to rounding.
    pub fn inverse_into_field(
        &mut self,
        spectrum: &ComplexGrid,
        channel: FftChannel,
        field: &mut DisplacementField,
    ) -> Result<(), FftError> {
        let n = self.table.size();
        if field.size() != n {
            return Err(FftError::SizeMismatch {
                expected: n,
                actual: field.size(),
            });
        }

        let mut spatial = std::mem::replace(&mut self.spatial, ComplexGrid::new(0));
        let result = self.inverse_2d(spectrum, &mut spatial);
        if result.is_ok() {
            for y in 0..n {
                for x in 0..n {
                    field.set_channel(channel, x, y, spatial.get(x, y).re);
                }
            }
        }
        self.spatial = spatial;
        result
    }

    /// One in-place inverse transform of `line_a`.
    ///
    /// The butterfly tables encode the forward kernel `e^{-iθ}`, so the
    /// inverse is taken as `conj(F(conj(x))) / n` with the permutation and
    /// stages applied directly from the table.
    fn inverse_line(&mut self) {
        let n = self.table.size();

        for j in 0..n {
            self.line_b[j] = self.line_a[self.table.reversed(j)].conj();
        }
        std::mem::swap(&mut self.line_a, &mut self.line_b);

        for stage in 0..self.table.stages() as usize {
            let offset = 1usize << stage;
            let span = 2 * offset;
            for j in 0..n {
                let base = j - (j % span) + (j % offset);
                let w = self.table.twiddle(stage, j);
                self.line_b[j] = self.line_a[base] + w * self.line_a[base + offset];
            }
            std::mem::swap(&mut self.line_a, &mut self.line_b);
        }

        let scale = 1.0 / n as f32;
        for v in &mut self.line_a {
            *v = v.conj() * scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256StarStar;

    /// Forward DFT computed directly from the definition, for reference.
    fn dft_2d_forward(input: &ComplexGrid) -> ComplexGrid {
        let n = input.size();
        let mut out = ComplexGrid::new(n);
        for ky in 0..n {
            for kx in 0..n {
                let mut acc = Complex32::new(0.0, 0.0);
                for y in 0..n {
                    for x in 0..n {
                        let phase = -2.0 * std::f32::consts::PI
                            * ((kx * x) as f32 + (ky * y) as f32)
                            / n as f32;
                        acc += input.get(x, y) * Complex32::new(phase.cos(), phase.sin());
                    }
                }
                out.set(kx, ky, acc);
            }
        }
        out
    }

    /// A flat (all-ones DC) spectrum inverse-transforms to a single impulse
    /// of height 1 at the origin, confirming the `1/n²` scaling.
    #[test]
    fn test_delta_round_trip_scaling() {
        let n = 16;
        let mut engine = FftEngine::new(n).unwrap();

        let mut spectrum = ComplexGrid::new(n);
        for y in 0..n {
            for x in 0..n {
                spectrum.set(x, y, Complex32::new(1.0, 0.0));
            }
        }

        let mut out = ComplexGrid::new(n);
        engine.inverse_2d(&spectrum, &mut out).unwrap();

        for y in 0..n {
            for x in 0..n {
                let expected = if x == 0 && y == 0 { 1.0 } else { 0.0 };
                let v = out.get(x, y);
                assert!(
                    (v.re - expected).abs() < 1e-4 && v.im.abs() < 1e-4,
                    "({x},{y}): got {v}, expected {expected}"
                );
            }
        }
    }

    /// Forward-DFT then inverse-FFT reproduces random input data.
    #[test]
    fn test_forward_inverse_round_trip() {
        let n = 8;
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);

        let mut input = ComplexGrid::new(n);
        for y in 0..n {
            for x in 0..n {
                input.set(
                    x,
                    y,
                    Complex32::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
                );
            }
        }

        let spectrum = dft_2d_forward(&input);
        let mut engine = FftEngine::new(n).unwrap();
        let mut recovered = ComplexGrid::new(n);
        engine.inverse_2d(&spectrum, &mut recovered).unwrap();

        for y in 0..n {
            for x in 0..n {
                let a = input.get(x, y);
                let b = recovered.get(x, y);
                assert!(
                    (a - b).norm() < 1e-3,
                    "({x},{y}): original {a}, recovered {b}"
                );
            }
        }
    }

    /// A single off-origin spectrum bin produces a complex exponential wave.
    #[test]
    fn test_single_bin_produces_plane_wave() {
        let n = 8;
        let mut engine = FftEngine::new(n).unwrap();

        let mut spectrum = ComplexGrid::new(n);
        spectrum.set(1, 0, Complex32::new(n as f32 * n as f32, 0.0));

        let mut out = ComplexGrid::new(n);
        engine.inverse_2d(&spectrum, &mut out).unwrap();

        for x in 0..n {
            let phase = 2.0 * std::f32::consts::PI * x as f32 / n as f32;
            let v = out.get(x, 0);
            assert!(
                (v.re - phase.cos()).abs() < 1e-3 && (v.im - phase.sin()).abs() < 1e-3,
                "x={x}: got {v}"
            );
        }
    }

    #[test]
    fn test_size_mismatch_is_error() {
        let mut engine = FftEngine::new(8).unwrap();
        let spectrum = ComplexGrid::new(16);
        let mut out = ComplexGrid::new(8);
        assert!(matches!(
            engine.inverse_2d(&spectrum, &mut out),
            Err(FftError::SizeMismatch { expected: 8, actual: 16 })
        ));
    }

    /// Channel slots match the original dispatch selector values.
    #[test]
    fn test_channel_slots() {
        assert_eq!(FftChannel::Height.slot(), 0);
        assert_eq!(FftChannel::DispX.slot(), 1);
        assert_eq!(FftChannel::DispY.slot(), 2);
    }
}
