//! CLI command implementations

pub mod build;
pub mod templates;

pub use build::BuildCommand;
pub use templates::TemplatesCommand;

use aaas::config::BuilderConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Load builder configuration from `path`, or from `./aaas.toml` when none is given
///
/// # Errors
///
/// Returns an error if the configuration file or an `AAAS_*` variable is invalid.
pub fn load_config(path: Option<&Path>) -> Result<BuilderConfig> {
    match path {
        Some(path) => BuilderConfig::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => BuilderConfig::load().context("Failed to load configuration"),
    }
}
