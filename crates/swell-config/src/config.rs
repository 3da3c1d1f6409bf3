//! Configuration structs with sensible defaults, validation, and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Hard upper bound on the number of LOD slices.
pub const MAX_LOD_COUNT: u32 = 15;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Wave generation settings.
    pub waves: WavesConfig,
    /// Simulation grid and LOD settings.
    pub sim: SimConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Wave generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WavesConfig {
    /// Wind direction in radians, 0..2π.
    pub wind_direction: f32,
    /// Wind speed in m/s (0.1 - 200).
    pub wind_speed: f32,
    /// Gravity multiplier applied to 9.81 m/s² (0 - 10).
    pub gravity_multiplier: f32,
    /// Horizontal displacement strength (0 - 3).
    pub choppiness: f32,
    /// Spectrum amplitude constant.
    pub amplitude: f32,
    /// Seed for the spectrum's gaussian draws.
    pub seed: u64,
}

/// Simulation grid and LOD configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Simulation texture resolution (256, 512, or 1024).
    pub resolution: u32,
    /// Number of LOD slices (2 - 15).
    pub lod_count: u32,
    /// Smallest horizontal scale the viewer can pull the ocean down to.
    pub min_scale: f32,
    /// Largest horizontal scale the viewer can push the ocean up to.
    pub max_scale: f32,
    /// Simulate foam accumulation and decay.
    pub enable_foam: bool,
    /// Per-second exponential decay rate of foam.
    pub foam_fade_rate: f32,
    /// Foam injected per unit of wave pinch.
    pub foam_wave_strength: f32,
    /// Track sea-floor depth from registered inputs.
    pub enable_sea_floor_depth: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write logs to a file next to the config.
    pub log_to_file: bool,
    /// Log per-tick timing stats.
    pub log_frame_stats: bool,
}

impl Default for WavesConfig {
    fn default() -> Self {
        Self {
            wind_direction: 0.0,
            wind_speed: 10.0,
            gravity_multiplier: 1.0,
            choppiness: 1.5,
            amplitude: 2.0e-3,
            seed: 42,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            resolution: 256,
            lod_count: 7,
            min_scale: 8.0,
            max_scale: 256.0,
            enable_foam: true,
            foam_fade_rate: 0.85,
            foam_wave_strength: 1.0,
            enable_sea_floor_depth: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
            log_frame_stats: false,
        }
    }
}

// --- Validation ---

impl Config {
    /// Check every field against its documented range. The simulation refuses
    /// to construct from an invalid config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.waves;
        if !(0.0..std::f32::consts::TAU).contains(&w.wind_direction) {
            return Err(ConfigError::Invalid {
                field: "waves.wind_direction",
                reason: format!("{} not in [0, 2π)", w.wind_direction),
            });
        }
        if !(0.1..=200.0).contains(&w.wind_speed) {
            return Err(ConfigError::Invalid {
                field: "waves.wind_speed",
                reason: format!("{} not in [0.1, 200]", w.wind_speed),
            });
        }
        if !(0.0..=10.0).contains(&w.gravity_multiplier) {
            return Err(ConfigError::Invalid {
                field: "waves.gravity_multiplier",
                reason: format!("{} not in [0, 10]", w.gravity_multiplier),
            });
        }
        if !(0.0..=3.0).contains(&w.choppiness) {
            return Err(ConfigError::Invalid {
                field: "waves.choppiness",
                reason: format!("{} not in [0, 3]", w.choppiness),
            });
        }
        if !w.amplitude.is_finite() || w.amplitude <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "waves.amplitude",
                reason: format!("{} must be finite and positive", w.amplitude),
            });
        }

        let s = &self.sim;
        if ![256, 512, 1024].contains(&s.resolution) {
            return Err(ConfigError::Invalid {
                field: "sim.resolution",
                reason: format!("{} not one of 256, 512, 1024", s.resolution),
            });
        }
        if !(2..=MAX_LOD_COUNT).contains(&s.lod_count) {
            return Err(ConfigError::Invalid {
                field: "sim.lod_count",
                reason: format!("{} not in [2, {MAX_LOD_COUNT}]", s.lod_count),
            });
        }
        if !(s.min_scale > 0.0 && s.min_scale < s.max_scale) {
            return Err(ConfigError::Invalid {
                field: "sim.min_scale",
                reason: format!(
                    "[{}, {}] is not a positive ascending range",
                    s.min_scale, s.max_scale
                ),
            });
        }
        if !(0.0..=1.0).contains(&s.foam_fade_rate) {
            return Err(ConfigError::Invalid {
                field: "sim.foam_fade_rate",
                reason: format!("{} not in [0, 1]", s.foam_fade_rate),
            });
        }
        Ok(())
    }

    /// Effective gravity in m/s².
    pub fn gravity(&self) -> f32 {
        9.81 * self.waves.gravity_multiplier
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
