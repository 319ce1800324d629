// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use photobooth::constants::{APP_ID, terminal::LOG_FILE_NAME};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "photobooth")]
#[command(about = "Take photos and browse them with face overlays")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive terminal UI (default)
    Terminal {
        /// Image replayed by the virtual camera (default: camera_source from config)
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// List photos in the photos directory
    List,

    /// Take a single photo
    Snap {
        /// Image replayed by the virtual camera (default: camera_source from config)
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// Print the face overlays of a photo as drawn on a gallery thumbnail
    Faces {
        /// File name inside the photos directory
        name: String,
    },

    /// Save photos to the shared photo library
    Export {
        /// File names inside the photos directory
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => {
            init_logging();
            cli::list_photos()?;
        }
        Some(Commands::Snap { source }) => {
            init_logging();
            cli::snap(source)?;
        }
        Some(Commands::Faces { name }) => {
            init_logging();
            cli::faces(&name)?;
        }
        Some(Commands::Export { names }) => {
            init_logging();
            cli::export(&names)?;
        }
        Some(Commands::Terminal { source }) => run_terminal(source)?,
        None => run_terminal(None)?,
    }
    Ok(())
}

fn env_filter() -> EnvFilter {
    // Set RUST_LOG to control the log level, e.g. RUST_LOG=photobooth=debug
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_level(true)
        .init();
}

fn run_terminal(source: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    // The terminal owns the screen, so logs go to a file instead
    if let Some(dir) = dirs::cache_dir().map(|d| d.join(APP_ID)) {
        std::fs::create_dir_all(&dir)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE_NAME))?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let (config, source) = cli::resolve_source(source)?;
    photobooth::terminal::run(config, source)
}
