//! Simulation error types.

use crate::channel::SimQuantity;

/// Errors surfaced by the ocean simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Invalid or unsupported parameters, or a missing capability.
    /// Fatal: the context refuses to construct.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An arena layer could not be created. Fatal for the requesting
    /// quantity, which stays disabled.
    #[error("failed to allocate {quantity:?} layers: {reason}")]
    Allocation {
        /// The quantity whose layers were requested.
        quantity: SimQuantity,
        /// What prevented the allocation.
        reason: String,
    },

    /// A draw or update referenced a released layer handle. This is an
    /// internal consistency violation, not a recoverable condition.
    #[error("stale layer handle for {quantity:?} slice {slice}")]
    StaleBuffer {
        /// The quantity the handle belonged to.
        quantity: SimQuantity,
        /// The LOD slice the handle addressed.
        slice: u32,
    },

    /// No viewpoint was supplied for this tick. Recoverable: supply a
    /// viewpoint on the next tick.
    #[error("no viewpoint set for this tick")]
    MissingViewpoint,
}

impl From<swell_config::ConfigError> for SimError {
    fn from(err: swell_config::ConfigError) -> Self {
        SimError::Configuration(err.to_string())
    }
}
