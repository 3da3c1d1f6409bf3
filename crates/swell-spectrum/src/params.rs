//! Statistical wave-spectrum parameters.

/// Inputs to the initial spectrum. `H0` is a pure function of these values,
/// so re-initialization is skipped while they are unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumParams {
    /// World-space span of the simulated patch, in meters.
    pub domain_size: f32,
    /// Effective gravity in m/s² (physical gravity times the configured multiplier).
    pub gravity: f32,
    /// Wind direction in radians, 0..2π.
    pub wind_direction: f32,
    /// Wind speed in m/s.
    pub wind_speed: f32,
    /// Phillips spectrum amplitude constant.
    pub amplitude: f32,
    /// Seed for the gaussian amplitude draws. Fixed seed keeps the ocean
    /// reproducible across runs.
    pub seed: u64,
}

impl Default for SpectrumParams {
    fn default() -> Self {
        Self {
            domain_size: 256.0,
            gravity: 9.81,
            wind_direction: 0.0,
            wind_speed: 10.0,
            amplitude: 2.0e-3,
            seed: 42,
        }
    }
}
