//! Cortex CLI - Adaptive study-plan backend
//!
//! A command-line interface for serving the Cortex API and generating
//! study plans and quizzes directly from the terminal.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cortex_core::Config;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Cortex - Adaptive study-plan backend
#[derive(Parser)]
#[command(name = "cortex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model to use (overrides config)
    #[arg(short, long, global = true, env = "CORTEX_MODEL")]
    model: Option<String>,

    /// Server port (overrides config)
    #[arg(long, global = true, env = "CORTEX_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info", env = "CORTEX_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Cortex HTTP server
    Serve,

    /// Generate a study plan from a PDF
    Plan {
        /// Path to the PDF file
        pdf: PathBuf,

        /// Difficulty tier (basic, intermediate, advanced)
        #[arg(long, default_value = "basic")]
        level: String,

        /// Schedule start time as HH:MM (defaults to now)
        #[arg(long)]
        start: Option<String>,
    },

    /// Generate a quiz from raw text or a PDF
    Quiz {
        /// The text to quiz on (or read from stdin if not provided)
        text: Option<String>,

        /// Quiz a PDF instead of raw text
        #[arg(long, conflicts_with = "text")]
        pdf: Option<PathBuf>,

        /// Number of questions to generate (1-20)
        #[arg(short, long, default_value = "15")]
        num_questions: usize,

        /// Difficulty tier (basic, intermediate, advanced)
        #[arg(long, default_value = "basic")]
        level: String,
    },

    /// Summarize a PDF at a difficulty tier
    Summarize {
        /// Path to the PDF file
        pdf: PathBuf,

        /// Difficulty tier (basic, intermediate, advanced)
        #[arg(long, default_value = "basic")]
        level: String,
    },

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Initialize default configuration
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    // Load configuration
    let mut config = if let Some(path) = &cli.config {
        Config::load_from_file(path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Apply CLI overrides
    if let Some(model) = &cli.model {
        config.gemini.model = model.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    Config::ensure_dirs()?;

    match cli.command {
        Commands::Serve => commands::serve::run(config).await,
        Commands::Plan { pdf, level, start } => {
            commands::plan::run(config, pdf, level, start).await
        }
        Commands::Quiz {
            text,
            pdf,
            num_questions,
            level,
        } => commands::quiz::run(config, text, pdf, num_questions, level).await,
        Commands::Summarize { pdf, level } => commands::summarize::run(config, pdf, level).await,
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(config),
            ConfigCommands::Init { force } => commands::config::init(force),
        },
    }
}
