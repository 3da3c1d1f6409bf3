//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Swell command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "swell", about = "Swell ocean simulation")]
pub struct CliArgs {
    /// Wind speed in m/s.
    #[arg(long)]
    pub wind_speed: Option<f32>,

    /// Wind direction in radians.
    #[arg(long)]
    pub wind_direction: Option<f32>,

    /// Simulation resolution (256, 512, 1024).
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Number of LOD slices.
    #[arg(long)]
    pub lod_count: Option<u32>,

    /// Horizontal displacement strength.
    #[arg(long)]
    pub choppiness: Option<f32>,

    /// Simulate foam.
    #[arg(long)]
    pub foam: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of ticks to simulate before exiting.
    #[arg(long, default_value_t = 120)]
    pub ticks: u64,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(speed) = args.wind_speed {
            self.waves.wind_speed = speed;
        }
        if let Some(dir) = args.wind_direction {
            self.waves.wind_direction = dir;
        }
        if let Some(res) = args.resolution {
            self.sim.resolution = res;
        }
        if let Some(count) = args.lod_count {
            self.sim.lod_count = count;
        }
        if let Some(chop) = args.choppiness {
            self.waves.choppiness = chop;
        }
        if let Some(foam) = args.foam {
            self.sim.enable_foam = foam;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
