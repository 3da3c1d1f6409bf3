//! Butterfly-table 2D inverse FFT and displacement-field output for the Swell ocean simulation.

mod butterfly;
mod engine;
mod error;
mod field;
mod grid;

pub use butterfly::ButterflyTable;
pub use engine::{FftChannel, FftEngine};
pub use error::FftError;
pub use field::{DisplacementField, DisplacementTexel};
pub use grid::ComplexGrid;

/// Complex sample type used throughout the FFT pipeline.
pub type Complex32 = num_complex::Complex<f32>;
