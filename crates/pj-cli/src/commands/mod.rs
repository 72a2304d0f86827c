//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod comment;
pub mod config;
pub mod post;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pj_core::config::Config;
use pj_storage::FileForestStore;
use std::path::{Path, PathBuf};

/// Project-local configuration file, used when `--config` is not given
pub const LOCAL_CONFIG_PATH: &str = ".pandajeon/config.toml";

/// pandajeon - anonymous community board
#[derive(Debug, Parser)]
#[command(name = "pandajeon")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding stored comment forests
    #[arg(long, global = true, env = "PANDAJEON_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Submit, like and browse posts
    #[command(subcommand)]
    Post(post::PostCommand),

    /// Add, like and show comments on a post
    #[command(subcommand)]
    Comment(comment::CommentCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Settings shared by every command
pub struct AppContext {
    /// Effective configuration
    pub config: Config,
    /// Where the config came from, if a file
    pub config_path: Option<PathBuf>,
    /// Storage directory override
    pub data_dir: Option<PathBuf>,
}

impl AppContext {
    /// Open the forest store
    pub fn store(&self) -> Result<FileForestStore> {
        let dir = self
            .data_dir
            .clone()
            .unwrap_or_else(FileForestStore::default_dir);
        FileForestStore::new(&dir)
            .with_context(|| format!("Failed to open data directory {}", dir.display()))
    }
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let (config, config_path) = load_config(cli.config.as_deref())?;
    let ctx = AppContext {
        config,
        config_path,
        data_dir: cli.data_dir,
    };

    // Dispatch to command handler
    match cli.command {
        Commands::Post(cmd) => post::execute(&ctx, cmd),
        Commands::Comment(cmd) => comment::execute(&ctx, cmd),
        Commands::Config(cmd) => config::execute(&ctx, cmd),
    }
}

/// Load the explicit config, else the project-local one, else defaults
fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let local = PathBuf::from(LOCAL_CONFIG_PATH);
            if !local.exists() {
                tracing::debug!("No config file found, using defaults");
                return Ok((Config::default(), None));
            }
            local
        }
    };

    let config = Config::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    tracing::debug!("Loaded config from {:?}", path);
    Ok((config, Some(path)))
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
