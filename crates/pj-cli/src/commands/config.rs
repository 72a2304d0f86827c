//! Config command
//!
//! Show and create pandajeon configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use pj_core::config::Config;
use std::fs;
use std::path::PathBuf;

use super::{AppContext, LOCAL_CONFIG_PATH};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Where to write (default: .pandajeon/config.toml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command
pub fn execute(ctx: &AppContext, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(ctx, json),
        ConfigCommand::Init { path, force } => init_config(path, force),
    }
}

fn show_config(ctx: &AppContext, as_json: bool) -> Result<()> {
    use colored::Colorize;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&ctx.config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    match &ctx.config_path {
        Some(path) => println!("{}", path.display().to_string().dimmed()),
        None => println!("{}", "(defaults)".dimmed()),
    }
    println!();
    println!("{}", ctx.config.to_toml_string()?);

    Ok(())
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    use colored::Colorize;

    let path = path.unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_PATH));

    if path.exists() && !force {
        eprintln!(
            "{} {} already exists. Use {} to overwrite.",
            "⚠".yellow(),
            path.display(),
            "--force".cyan()
        );
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = Config::default().to_toml_string()?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}
