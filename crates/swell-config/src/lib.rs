//! Configuration system for the Swell ocean simulation.
//!
//! Runtime-configurable settings that persist to disk as RON files, with
//! range validation, CLI overrides via clap, and hot-reload detection.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, MAX_LOD_COUNT, SimConfig, WavesConfig};
pub use error::ConfigError;
