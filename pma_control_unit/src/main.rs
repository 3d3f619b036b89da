//! # PMA Simulator
//!
//! Runs one closed-loop PMA simulation, prints a text preview and, with
//! `--plot <FILE>`, writes an SVG (or PNG with the `png` feature) chart.
//!
//! Configuration comes from `--config`, else `config/pma.toml` when it
//! exists; every field falls back to the reference scenario. Individual parameters can be
//! overridden on the command line. Ctrl-C stops the run before its next step
//! and the completed prefix is still rendered.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use pma_common::config::{ConfigLoader, LogLevel};
use pma_common::consts::DEFAULT_CONFIG_PATH;
use pma_common::sim::config::{DivergencePolicy, SimConfig};
use pma_control_unit::chart::{ChartOptions, PlotOptions, render_chart, save_plot};
use pma_control_unit::config::{LoadedConfig, resolve_config_path};
use pma_control_unit::cycle::progress::{LogProgress, NoProgress, ProgressObserver};
use pma_control_unit::cycle::{CancelToken, RunStatus, Simulation};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// PMA closed-loop simulator
#[derive(Parser, Debug)]
#[command(name = "pma_control_unit")]
#[command(version)]
#[command(about = "Fixed-step simulation of a PMA-controlled first-order plant")]
struct Args {
    /// Path to the simulation TOML (falls back to config/pma.toml if present).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the number of steps N.
    #[arg(long)]
    steps: Option<usize>,

    /// Override the integration step dt [s].
    #[arg(long)]
    time_step: Option<f64>,

    /// Override the constant reference R.
    #[arg(long, allow_hyphen_values = true)]
    reference: Option<f64>,

    /// Stop at the first non-finite value instead of warning.
    #[arg(long)]
    abort_on_divergence: bool,

    /// Write the chart image to FILE (.svg; .png with the `png` feature).
    #[arg(long, value_name = "FILE")]
    plot: Option<PathBuf>,

    /// Do not print the chart.
    #[arg(long)]
    no_chart: bool,

    /// Chart width in columns.
    #[arg(long)]
    width: Option<usize>,

    /// Chart panel height in rows.
    #[arg(long)]
    height: Option<usize>,

    /// Disable progress logging.
    #[arg(long)]
    no_progress: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Parse errors are reported once tracing is up.
    let sim = load(&args);
    let log_level = sim
        .as_ref()
        .map(|s| s.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, log_level);

    info!("PMA simulator v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = sim.and_then(|s| run(&args, s)) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

/// Read the optional file and apply CLI overrides. Validation happens in
/// [`run`].
fn load(args: &Args) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut sim = match config_path(args) {
        Some(path) => SimConfig::load(&path)?,
        None => SimConfig::default(),
    };

    if let Some(steps) = args.steps {
        sim.simulation.steps = steps;
    }
    if let Some(dt) = args.time_step {
        sim.simulation.time_step = dt;
    }
    if let Some(r) = args.reference {
        sim.simulation.reference = r;
    }
    if args.abort_on_divergence {
        sim.simulation.divergence_policy = DivergencePolicy::Abort;
    }

    Ok(sim)
}

fn config_path(args: &Args) -> Option<PathBuf> {
    resolve_config_path(args.config.as_deref(), Path::new(DEFAULT_CONFIG_PATH))
}

fn run(args: &Args, sim: SimConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = config_path(args) {
        info!("Loaded config from {}", path.display());
    }
    let loaded = LoadedConfig::from_config(sim)?;
    let sim = &loaded.sim;
    info!(
        service = %sim.shared.service_name,
        "Config OK: steps={}, dt={}s, horizon={}s, reference={}",
        sim.simulation.steps,
        sim.simulation.time_step,
        sim.simulation.duration(),
        sim.simulation.reference,
    );

    // Setup signal handler for graceful cancellation.
    let cancel = CancelToken::new();
    let c = cancel.clone();
    ctrlc::set_handler(move || {
        info!("Received interrupt, stopping after the current step");
        c.cancel();
    })?;

    let simulation = Simulation::new(sim)?.with_cancel(cancel);
    let mut progress: Box<dyn ProgressObserver> = if args.no_progress {
        Box::new(NoProgress)
    } else {
        Box::new(LogProgress::new())
    };
    let result = simulation.run_with_progress(progress.as_mut())?;

    match result.status {
        RunStatus::Completed => info!("Simulation complete ({} steps)", result.completed_steps()),
        RunStatus::Cancelled { completed_steps } => {
            warn!("Simulation cancelled after {completed_steps} steps")
        }
    }
    if let Some(d) = result.divergence {
        warn!(
            source = ?d.source(),
            "Non-finite values from step {} ({:?}); chart omits them",
            d.step, d.signals
        );
    }
    if let Some(y) = result.output.last() {
        info!(final_output = *y, "final output");
    }

    if !args.no_chart {
        let defaults = ChartOptions::default();
        let options = ChartOptions {
            width: args.width.unwrap_or(defaults.width),
            height: args.height.unwrap_or(defaults.height),
        };
        println!("{}", render_chart(&result, &options));
    }

    if let Some(path) = &args.plot {
        save_plot(&result, path, &PlotOptions::default())?;
        info!("Plot written to {}", path.display());
    }

    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and the config level.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from(configured)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
