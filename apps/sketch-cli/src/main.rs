use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use sketch_common::{ObjectId, SketchConfig};
use sketch_loop::{Callbacks, LoopStats, ManualTime, Sketch, Ticker};
use sketch_render::{DebugTextRenderer, HeadlessContainer};
use sketch_scene::{Drawable, Geometry, Material};

#[derive(Parser)]
#[command(name = "sketch-cli", about = "CLI tool for sketch inspection and headless runs")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the effective config (defaults merged with a file, if given)
    Config {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: Format,
    },
    /// Drive the loop headlessly on simulated time
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Display refresh rate
        #[arg(long, default_value = "60")]
        fps: f64,
        /// Frames to dispatch
        #[arg(long, default_value = "120")]
        frames: u64,
        /// Frame index before which the host stalls
        #[arg(long)]
        stall_at: Option<u64>,
        /// Stall length in seconds
        #[arg(long, default_value = "1.0")]
        stall_secs: f64,
        /// Cap fixed updates per frame (overrides the config)
        #[arg(long)]
        max_fixed_steps: Option<u32>,
        /// Print the last rendered frame
        #[arg(long)]
        show_frame: bool,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SketchConfig> {
    match path {
        Some(path) => SketchConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(SketchConfig::default()),
    }
}

struct SimulationPlan {
    fps: f64,
    frames: u64,
    stall_at: Option<u64>,
    stall_secs: f64,
}

struct SimulationReport {
    stats: LoopStats,
    elapsed: f64,
    last_frame: String,
}

fn simulate(config: &SketchConfig, plan: &SimulationPlan) -> anyhow::Result<SimulationReport> {
    if !(plan.fps.is_finite() && plan.fps > 0.0) {
        bail!("fps must be positive, got {}", plan.fps);
    }

    let time = ManualTime::new();
    let ticker = Ticker::new();
    let mut host = HeadlessContainer::new(800.0, 600.0, 1.0);

    let cube = ObjectId::new();
    let callbacks = Callbacks::new().on_fixed_update(move |t, scene| {
        if let Some(d) = scene.get_mut(cube) {
            let e = t.elapsed as f32;
            d.transform.set_euler(e, e * 0.5, e * 0.25);
        }
    });

    let mut sketch = Sketch::with_time_source(
        &mut host,
        config,
        DebugTextRenderer::new(),
        ticker.clone(),
        callbacks,
        time.clone(),
    )?;
    sketch
        .scene()
        .add_with_id(cube, Drawable::new(Geometry::cube(25.0), Material::Normal));
    sketch.resume();

    let frame = 1.0 / plan.fps;
    for i in 0..plan.frames {
        if plan.stall_at == Some(i) {
            tracing::info!(frame = i, seconds = plan.stall_secs, "simulating host stall");
            time.advance(plan.stall_secs.max(0.0));
        }
        time.advance(frame);
        ticker.dispatch();
    }
    sketch.pause();

    let last_frame = sketch.renderer().last_frame().to_string();
    Ok(SimulationReport {
        stats: sketch.stats(),
        elapsed: sketch.elapsed(),
        last_frame,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("sketch-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", sketch_scene::crate_info());
            println!("render: {}", sketch_render::crate_info());
            println!("loop: {}", sketch_loop::crate_info());
            println!(
                "default fixed update interval: {:.6}s",
                sketch_common::DEFAULT_FIXED_UPDATE_INTERVAL
            );
        }
        Commands::Config { config, format } => {
            let config = load_config(config.as_deref())?;
            config.validate()?;
            let text = match format {
                Format::Yaml => config.to_yaml()?,
                Format::Json => config.to_json()?,
            };
            println!("{text}");
        }
        Commands::Simulate {
            config,
            fps,
            frames,
            stall_at,
            stall_secs,
            max_fixed_steps,
            show_frame,
        } => {
            let mut config = load_config(config.as_deref())?;
            if max_fixed_steps.is_some() {
                config.max_fixed_steps_per_frame = max_fixed_steps;
            }
            let plan = SimulationPlan {
                fps,
                frames,
                stall_at,
                stall_secs,
            };
            let report = simulate(&config, &plan)?;
            let stats = &report.stats;

            println!(
                "Simulated {frames} frames at {fps} Hz, interval {:.6}s",
                config.fixed_update_interval
            );
            println!("elapsed: {:.3}s", report.elapsed);
            println!("frames rendered: {}", stats.frames);
            println!("fixed updates: {}", stats.fixed_steps);
            println!("dropped updates: {}", stats.dropped_steps);
            println!("max updates in one frame: {}", stats.max_steps_in_frame);
            println!(
                "recent frame time: avg={:.2}ms min={:.2}ms max={:.2}ms",
                stats.frame_times.average() * 1000.0,
                stats.frame_times.min() * 1000.0,
                stats.frame_times.max() * 1000.0
            );
            if show_frame {
                print!("{}", report.last_frame);
            }
        }
    }

    Ok(())
}
