//! Headless demo that runs the ocean simulation for a fixed number of ticks.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags. Run with `cargo run -p swell-demo` for the default two seconds of
//! simulation, or `cargo run -p swell-demo -- --ticks 600 --wind-speed 25`
//! for a longer, rougher sea.

use clap::Parser;
use glam::Vec3;
use tracing::{error, info};

use swell_config::{CliArgs, Config};
use swell_sim::{CollectingSink, LayerView, LodInput, OceanContext, SimQuantity};

/// A shallow shelf along the +X half of the origin, written in as sea-floor
/// depth every tick.
struct ShelfInput {
    depth: f32,
}

impl LodInput for ShelfInput {
    fn draw(&self, view: &mut LayerView<'_>) {
        let res = view.resolution();
        for y in 0..res {
            for x in res / 2..res {
                view.blend(x, y, 0, self.depth);
            }
        }
    }

    fn wavelength(&self) -> f32 {
        0.0
    }
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(|| dirs::config_dir().map(|d| d.join("swell")))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load config: {err}");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    swell_log::init_logging(Some(config_dir.as_path()), Some(&config));

    if let Err(err) = run(config, args.ticks) {
        error!("simulation failed: {err}");
        std::process::exit(1);
    }
}

fn run(config: Config, ticks: u64) -> Result<(), swell_sim::SimError> {
    let log_stats = config.debug.log_frame_stats;
    let sea_floor = config.sim.enable_sea_floor_depth;
    let mut ocean = OceanContext::new(config)?;

    if sea_floor {
        ocean.register_input(SimQuantity::SeaFloorDepth, 0, Box::new(ShelfInput { depth: 20.0 }));
    }

    let dt = 1.0 / 60.0;
    let mut viewpoint = Vec3::new(0.0, 30.0, 0.0);

    for tick in 0..ticks {
        // Drift forward and climb, sweeping the viewer through scale bands.
        viewpoint.x += 2.0 * dt;
        viewpoint.y += 0.5 * dt;

        let report = ocean.tick(dt, Some(viewpoint))?;
        if log_stats || tick % 60 == 0 {
            info!(
                frame = report.frame,
                scale = report.scale,
                commands = report.commands_executed,
                max_vert = report.max_vertical_disp,
                max_horiz = report.max_horizontal_disp,
                "tick"
            );
        }
    }

    let mut sink = CollectingSink::new();
    ocean.bind_properties(&mut sink);
    info!(
        time = sink.f32("swell_time").unwrap_or(0.0),
        scale = sink.f32("swell_scale").unwrap_or(0.0),
        "simulation finished after {ticks} ticks"
    );
    Ok(())
}
