//! sevoice: Stack Exchange data dumps as voice-reader transcripts

use anyhow::Result;
use clap::{Parser, Subcommand};
use sevoice::config::{Config, LogFormat, LogLevel};
use std::path::PathBuf;
use tracing::Level;

mod commands;

#[derive(Parser)]
#[command(name = "sevoice")]
#[command(about = "Convert Stack Exchange data dumps into voice-reader transcripts")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "sevoice.toml")]
    config: PathBuf,

    /// Output base directory (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a data-dump archive into per-question transcripts
    Convert {
        /// Path to the data-dump archive (.7z)
        archive: PathBuf,

        /// Path to the 7-Zip executable (overrides config)
        #[arg(long)]
        seven_zip: Option<PathBuf>,

        /// Stop after this many questions
        #[arg(long)]
        max_questions: Option<usize>,

        /// Quiet mode (no progress output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Report table and thread counts for an already-extracted dump directory
    Inspect {
        /// Directory containing Posts.xml and Comments.xml
        dir: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Initialize a new sevoice configuration
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load or create config
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    setup_logging(&config, cli.verbose)?;

    match cli.command {
        Commands::Convert {
            archive,
            seven_zip,
            max_questions,
            quiet,
        } => {
            commands::convert::run(
                config,
                archive,
                seven_zip,
                cli.output,
                max_questions,
                quiet,
            )
            .await
        }
        Commands::Inspect { dir, format } => commands::inspect::run(dir, format).await,
        Commands::Init { path } => commands::init::run(path).await,
    }
}

/// Configure the global tracing subscriber from config plus `-v` count.
/// Command-line verbosity wins over the configured level.
fn setup_logging(config: &Config, verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => match config.logging.level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        },
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    match config.logging.format {
        LogFormat::Json => {
            let subscriber = tracing_subscriber::fmt()
                .json()
                .with_max_level(level)
                .with_target(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Text => {
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(level)
                .with_target(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}
