//! aaas CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use aaas_cli_lib::{BuildCommand, TemplatesCommand};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aaas")]
#[command(version)]
#[command(about = "Builds Doctrine entity and repository classes from a project file", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate entity and repository classes for every service of a project
    Build(BuildCommand),
    /// Inspect class templates
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    aaas::observability::init(cli.verbose).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Build(command) => command.execute()?,
        Commands::Templates { command } => command.execute()?,
    }

    Ok(())
}
