//! Phillips-spectrum generation and dispersion evolution for the Swell ocean simulation.

mod params;
mod spectrum;

pub use params::SpectrumParams;
pub use spectrum::WaveSpectrum;
