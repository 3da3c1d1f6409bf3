//! Initial spectrum synthesis and per-tick dispersion evolution.
//!
//! `init` computes the Phillips-model initial spectrum `H0` once per
//! parameter set. `update` evolves it to the time-dependent `H`, `Dx`, `Dy`
//! spectra using the deep-water dispersion relation `ω(k) = sqrt(g·|k|)`,
//! pairing each wavevector with the conjugate of its mirror so the inverse
//! FFT yields a real-valued field.

use glam::Vec2;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256StarStar;

use crate::SpectrumParams;
use swell_fft::{Complex32, ComplexGrid};

/// Wavelengths much shorter than this fraction of the peak wavelength are
/// damped out (capillary cutoff).
const CAPILLARY_CUTOFF_FRACTION: f32 = 1.0e-3;

/// Owns the initial and evolved spectra for one grid resolution.
pub struct WaveSpectrum {
    n: usize,
    params: SpectrumParams,
    initialized: bool,
    h0: ComplexGrid,
    h: ComplexGrid,
    dx: ComplexGrid,
    dy: ComplexGrid,
}

impl WaveSpectrum {
    /// Allocate spectra for an `n × n` grid. `n` must match the FFT engine
    /// the spectra will be fed into.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            params: SpectrumParams::default(),
            initialized: false,
            h0: ComplexGrid::new(n),
            h: ComplexGrid::new(n),
            dx: ComplexGrid::new(n),
            dy: ComplexGrid::new(n),
        }
    }

    /// Grid side length.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Compute `H0` for `params`, skipping the work when the parameters are
    /// unchanged since the last call.
    pub fn init(&mut self, params: &SpectrumParams) {
        if self.initialized && self.params == *params {
            return;
        }
        self.params = params.clone();
        self.initialized = true;

        let mut rng = Xoshiro256StarStar::seed_from_u64(params.seed);
        let n = self.n;
        for j in 0..n {
            for i in 0..n {
                // Draw the gaussian pair unconditionally so the stream stays
                // aligned regardless of which cells carry energy.
                let xi_re: f32 = StandardNormal.sample(&mut rng);
                let xi_im: f32 = StandardNormal.sample(&mut rng);

                let k = self.wavevector(i, j);
                let p = phillips(k, &self.params);
                let scale = (p * 0.5).sqrt();
                self.h0.set(i, j, Complex32::new(xi_re * scale, xi_im * scale));
            }
        }

        // The DC term carries no energy; anything else is a singularity.
        self.h0.set(0, 0, Complex32::new(0.0, 0.0));
    }

    /// Evolve `H0` to the time-dependent `H`, `Dx`, `Dy` spectra.
    ///
    /// Must be called every simulation tick before the FFT dispatches read
    /// the evolved spectra.
    pub fn update(&mut self, time: f32) {
        let n = self.n;
        let g = self.params.gravity.max(0.0);

        for j in 0..n {
            for i in 0..n {
                let k = self.wavevector(i, j);
                let k_len = k.length();
                if k_len <= f32::EPSILON {
                    self.h.set(i, j, Complex32::new(0.0, 0.0));
                    self.dx.set(i, j, Complex32::new(0.0, 0.0));
                    self.dy.set(i, j, Complex32::new(0.0, 0.0));
                    continue;
                }

                let omega = (g * k_len).sqrt();
                let (sin, cos) = (omega * time).sin_cos();
                let phase = Complex32::new(cos, sin);

                let h0k = self.h0.get(i, j);
                let h0mk = self.h0.get_wrapped(n - i, n - j).conj();
                let h = h0k * phase + h0mk * phase.conj();

                self.h.set(i, j, h);
                self.dx.set(i, j, h * Complex32::new(0.0, -k.x / k_len));
                self.dy.set(i, j, h * Complex32::new(0.0, -k.y / k_len));
            }
        }
    }

    /// Evolved height spectrum.
    pub fn height_spectrum(&self) -> &ComplexGrid {
        &self.h
    }

    /// Evolved X-displacement spectrum.
    pub fn disp_x_spectrum(&self) -> &ComplexGrid {
        &self.dx
    }

    /// Evolved Y-displacement spectrum.
    pub fn disp_y_spectrum(&self) -> &ComplexGrid {
        &self.dy
    }

    /// The cached initial spectrum.
    pub fn initial_spectrum(&self) -> &ComplexGrid {
        &self.h0
    }

    /// Wavevector for grid cell `(i, j)` in FFT index order: frequencies
    /// run `0..n/2` then wrap negative, so no spectrum shift is needed
    /// before the inverse transform.
    fn wavevector(&self, i: usize, j: usize) -> Vec2 {
        let n = self.n as isize;
        let half = n / 2;
        let mx = if (i as isize) <= half { i as isize } else { i as isize - n };
        let my = if (j as isize) <= half { j as isize } else { j as isize - n };
        let base = 2.0 * std::f32::consts::PI / self.params.domain_size;
        Vec2::new(mx as f32 * base, my as f32 * base)
    }
}

/// Phillips spectrum: energy inversely related to `k⁴`, peaked along the
/// wind direction, damped below the capillary cutoff.
fn phillips(k: Vec2, params: &SpectrumParams) -> f32 {
    let k_len = k.length();
    if k_len <= f32::EPSILON {
        return 0.0;
    }

    // Largest wave sustained by the wind.
    let l = params.wind_speed * params.wind_speed / params.gravity.max(f32::EPSILON);
    let kl = k_len * l;

    let wind = Vec2::new(params.wind_direction.cos(), params.wind_direction.sin());
    let alignment = (k / k_len).dot(wind);

    let cutoff = CAPILLARY_CUTOFF_FRACTION * l;
    let damping = (-(k_len * cutoff) * (k_len * cutoff)).exp();

    params.amplitude * (-1.0 / (kl * kl)).exp() / (k_len * k_len * k_len * k_len)
        * alignment
        * alignment
        * damping
}

#[cfg(test)]
mod tests {
    use super::*;
    use swell_fft::{DisplacementField, FftChannel, FftEngine};

    fn test_params() -> SpectrumParams {
        SpectrumParams {
            wind_speed: 10.0,
            wind_direction: 0.0,
            gravity: 9.81,
            ..Default::default()
        }
    }

    /// The DC term must be zero for any wind parameter set.
    #[test]
    fn test_dc_term_is_zero() {
        for (speed, dir, gravity) in [(0.1, 0.0, 9.81), (10.0, 1.3, 9.81), (200.0, 6.2, 98.1)] {
            let mut spectrum = WaveSpectrum::new(64);
            spectrum.init(&SpectrumParams {
                wind_speed: speed,
                wind_direction: dir,
                gravity,
                ..Default::default()
            });
            let dc = spectrum.initial_spectrum().get(0, 0);
            assert_eq!(dc, Complex32::new(0.0, 0.0), "DC not zero for wind={speed}");
        }
    }

    /// Two inits with the same parameters produce identical spectra.
    #[test]
    fn test_deterministic_for_fixed_params() {
        let params = test_params();
        let mut a = WaveSpectrum::new(32);
        let mut b = WaveSpectrum::new(32);
        a.init(&params);
        b.init(&params);
        assert_eq!(a.initial_spectrum().as_slice(), b.initial_spectrum().as_slice());
    }

    /// Re-initializing with unchanged parameters is a cache hit; a parameter
    /// change recomputes.
    #[test]
    fn test_init_is_cached_until_params_change() {
        let params = test_params();
        let mut spectrum = WaveSpectrum::new(32);
        spectrum.init(&params);
        let first: Vec<_> = spectrum.initial_spectrum().as_slice().to_vec();

        spectrum.init(&params);
        assert_eq!(spectrum.initial_spectrum().as_slice(), &first[..]);

        let mut stronger = params.clone();
        stronger.wind_speed = 40.0;
        spectrum.init(&stronger);
        assert_ne!(spectrum.initial_spectrum().as_slice(), &first[..]);
    }

    /// The evolved height spectrum is Hermitian, so the spatial field is real.
    #[test]
    fn test_evolved_spectrum_is_hermitian() {
        let n = 32;
        let mut spectrum = WaveSpectrum::new(n);
        spectrum.init(&test_params());
        spectrum.update(1.7);

        let h = spectrum.height_spectrum();
        for j in 0..n {
            for i in 0..n {
                let a = h.get(i, j);
                let b = h.get_wrapped(n - i, n - j).conj();
                assert!(
                    (a - b).norm() < 1e-4,
                    "H({i},{j}) not conjugate-mirrored: {a} vs {b}"
                );
            }
        }
    }

    /// Full scenario: n=256, wind 10 m/s, direction 0, gravity ×1. No cell of
    /// the spectra or the synthesized fields may be NaN/Inf, and displacement
    /// magnitudes stay within a generous wind-speed bound.
    #[test]
    fn test_scenario_256_no_non_finite_and_bounded() {
        let n = 256;
        let mut spectrum = WaveSpectrum::new(n);
        spectrum.init(&test_params());
        spectrum.update(3.2);

        assert!(!spectrum.initial_spectrum().has_non_finite());
        assert!(!spectrum.height_spectrum().has_non_finite());
        assert!(!spectrum.disp_x_spectrum().has_non_finite());
        assert!(!spectrum.disp_y_spectrum().has_non_finite());

        let mut engine = FftEngine::new(n).unwrap();
        let mut field = DisplacementField::new(n);
        engine
            .inverse_into_field(spectrum.height_spectrum(), FftChannel::Height, &mut field)
            .unwrap();
        engine
            .inverse_into_field(spectrum.disp_x_spectrum(), FftChannel::DispX, &mut field)
            .unwrap();
        engine
            .inverse_into_field(spectrum.disp_y_spectrum(), FftChannel::DispY, &mut field)
            .unwrap();

        assert!(!field.has_non_finite());
        let (horiz, vert) = field.max_displacement();
        let bound = test_params().wind_speed;
        assert!(vert < bound, "vertical displacement {vert} exceeds bound {bound}");
        assert!(horiz < bound, "horizontal displacement {horiz} exceeds bound {bound}");
    }

    /// Energy concentrates along the wind direction.
    #[test]
    fn test_energy_peaks_along_wind() {
        let params = test_params();
        let along = phillips(Vec2::new(0.1, 0.0), &params);
        let across = phillips(Vec2::new(0.0, 0.1), &params);
        assert!(
            along > across * 100.0,
            "along-wind energy {along} should dwarf cross-wind {across}"
        );
    }
}
