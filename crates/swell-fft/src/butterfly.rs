//! Precomputed butterfly twiddle factors and bit-reversal permutation.
//!
//! One table serves every FFT pass for a given grid size: `log2(n)` stage
//! rows of `n` twiddle factors each, plus the length-`n` bit-reversal
//! permutation applied before the first stage. Both are pure functions of
//! `n` and reproduce bit-for-bit across builds.

use std::f32::consts::PI;

use crate::{Complex32, FftError};
use swell_math::{bit_reverse, log2_exact, write_f32_le, write_half_le};

/// Twiddle-factor and bit-reversal tables for a power-of-two FFT size.
///
/// Stage `s` pairs elements `offset = 2^s` apart. The first half of each
/// butterfly stores `(cos θ, -sin θ)` and its mirrored partner stores the
/// negated factor, so a pass can apply `out[j] = in[a] + w[j] * in[b]`
/// uniformly over the whole row.
pub struct ButterflyTable {
    n: usize,
    log2n: u32,
    /// `log2n` rows of `n` twiddle factors, row-major by stage.
    twiddles: Vec<Complex32>,
    /// Bit-reversal permutation over `0..n`.
    bit_reverse: Vec<u32>,
}

impl ButterflyTable {
    /// Build the tables for grid size `n`.
    pub fn new(n: usize) -> Result<Self, FftError> {
        let log2n = log2_exact(n).filter(|&b| b >= 1).ok_or(FftError::NotPowerOfTwo { n })?;

        let mut twiddles = vec![Complex32::new(0.0, 0.0); n * log2n as usize];

        let mut offset = 1usize;
        let mut num_iterations = n >> 1;
        for stage in 0..log2n as usize {
            let row = stage * n;

            let mut start = 0usize;
            let mut end = 2 * offset;
            for _ in 0..num_iterations {
                let mut big_k = 0.0f32;
                let mut k = start;
                while k < end {
                    let phase = 2.0 * PI * big_k * num_iterations as f32 / n as f32;
                    let (sin, cos) = phase.sin_cos();

                    twiddles[row + k / 2] = Complex32::new(cos, -sin);
                    twiddles[row + k / 2 + offset] = Complex32::new(-cos, sin);

                    big_k += 1.0;
                    k += 2;
                }
                start += 4 * offset;
                end = start + 2 * offset;
            }

            num_iterations >>= 1;
            offset <<= 1;
        }

        let bit_reverse = (0..n as u32).map(|i| bit_reverse(i, log2n)).collect();

        Ok(Self {
            n,
            log2n,
            twiddles,
            bit_reverse,
        })
    }

    /// Grid size the table was built for.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Number of butterfly stages (`log2(n)`).
    pub fn stages(&self) -> u32 {
        self.log2n
    }

    /// Twiddle factor for `index` within `stage`.
    #[inline]
    pub fn twiddle(&self, stage: usize, index: usize) -> Complex32 {
        self.twiddles[stage * self.n + index]
    }

    /// Bit-reversed source index for position `i`.
    #[inline]
    pub fn reversed(&self, i: usize) -> usize {
        self.bit_reverse[i] as usize
    }

    /// The bit-reversal permutation as a slice.
    pub fn permutation(&self) -> &[u32] {
        &self.bit_reverse
    }

    /// Byte-encode the twiddle table as little-endian RG half floats,
    /// `n × log2(n)` entries of 4 bytes each, for lookup-texture upload.
    pub fn twiddle_half_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.twiddles.len() * 4];
        for (i, w) in self.twiddles.iter().enumerate() {
            write_half_le(w.re, &mut bytes, i * 4);
            write_half_le(w.im, &mut bytes, i * 4 + 2);
        }
        bytes
    }

    /// Byte-encode the bit-reversal permutation as little-endian f32 values,
    /// one per index, for lookup-texture upload.
    pub fn bit_reverse_f32_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.n * 4];
        for (i, &r) in self.bit_reverse.iter().enumerate() {
            write_f32_le(r as f32, &mut bytes, i * 4);
        }
        bytes
    }
}
