//! Velum CLI: simulation, benchmarking, validation and inspection.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "velum")]
#[command(version, about = "Velum: position-based cloth and soft-body simulation")]
struct Cli {
    /// Log at debug level instead of RUST_LOG / info.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a scene file.
    Simulate {
        /// Path to the scene description (TOML).
        #[arg(short, long, default_value = "scene.toml")]
        scene: PathBuf,

        /// Frames to run. Defaults to the scene duration over dt.
        #[arg(short, long)]
        frames: Option<u64>,

        /// Write the final body geometry (.obj or .json).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a binary state snapshot after the last frame.
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Resume from a binary state snapshot.
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Log per-frame telemetry events.
        #[arg(long)]
        events: bool,
    },

    /// Run benchmark suite.
    Benchmark {
        /// Which scenario to run (hanging_sheet, balloon, cloth_on_cube, sphere_drape, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Override the number of frames per scenario.
        #[arg(short, long)]
        frames: Option<u32>,

        /// Output file path (.csv, or .json for JSON).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect a state snapshot or a mesh file.
    Inspect {
        /// Path to a snapshot (.bin) or mesh (.obj, .json).
        path: PathBuf,
    },

    /// Validate a scene or mesh file.
    Validate {
        /// Path to a scene (.toml) or mesh (.obj, .json).
        path: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Simulate {
            scene,
            frames,
            output,
            snapshot,
            resume,
            events,
        } => commands::simulate(&commands::SimulateArgs {
            scene,
            frames,
            output,
            snapshot,
            resume,
            events,
        }),
        Commands::Benchmark {
            scenario,
            frames,
            output,
        } => commands::benchmark(&scenario, frames, output.as_deref()),
        Commands::Inspect { path } => commands::inspect(&path),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
