//! FFT error types.

/// Errors from butterfly-table construction and FFT execution.
#[derive(Debug, thiserror::Error)]
pub enum FftError {
    /// The requested grid size cannot be decomposed into radix-2 stages.
    #[error("grid size {n} is not a power of two")]
    NotPowerOfTwo { n: usize },

    /// A grid passed to the engine does not match the size it was built for.
    #[error("grid size {actual} does not match engine size {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}
