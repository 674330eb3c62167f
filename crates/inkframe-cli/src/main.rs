//! Inkframe CLI - preprocessing and geometry tools
//!
//! Runs the same preprocessing chain the apps use on image files and touch
//! paths, so samples can be inspected or fed to an offline model.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use inkframe_core::InkframeConfig;

mod commands;

use commands::{DrawCommand, PrepareCommand, RectCommand};

#[derive(Parser)]
#[command(
    name = "inkframe",
    version,
    about = "Prepare classifier samples from drawings and images",
    after_help = "EXAMPLES:\n  \
                  # 28x28 sample from a photo, written as PNG\n  \
                  inkframe prepare digit.jpg --output sample.png\n\n  \
                  # Draw a stroke and classify-ready sample\n  \
                  inkframe draw --points \"10,10 20,20 30,10\" --output sample.png\n\n  \
                  # Map a detector rectangle onto a 200x100 view\n  \
                  inkframe rect 0.25 0.25 0.5 0.5 --view 200x100"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML); defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn an image file into a classifier sample
    Prepare(PrepareCommand),

    /// Render a touch path on a canvas and prepare a sample from it
    Draw(DrawCommand),

    /// Map a normalized detector rectangle into view coordinates
    Rect(RectCommand),

    /// Print the effective settings as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise info, or debug with --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Prepare(cmd) => cmd.execute(&config),
        Commands::Draw(cmd) => cmd.execute(&config),
        Commands::Rect(cmd) => cmd.execute(),
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

/// Load settings from `path`, or use defaults.
fn load_config(path: Option<&std::path::Path>) -> Result<InkframeConfig> {
    match path {
        Some(path) => {
            let config = InkframeConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            info!("Loaded configuration from {:?}", path);
            Ok(config)
        }
        None => Ok(InkframeConfig::default()),
    }
}
