//! Structured logging for the Swell ocean simulation.
//!
//! Span-based, filterable logging via the `tracing` ecosystem: console output
//! with uptime timestamps and module paths, plus optional JSON file logging
//! for post-mortem analysis. Integrates with the configuration system for
//! runtime log level control.

use std::path::Path;
use swell_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.debug.log_level`, otherwise `info`. When `config.debug.log_to_file`
/// is set and `log_dir` is given, a JSON file layer is added next to the
/// console layer.
pub fn init_logging(log_dir: Option<&Path>, config: Option<&Config>) {
    let filter_str = match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => "info".to_string(),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let to_file = config.map(|c| c.debug.log_to_file).unwrap_or(false);
    if to_file
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("swell.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info")
}
