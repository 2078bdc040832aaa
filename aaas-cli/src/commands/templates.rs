//! Template inspection commands

use aaas::scaffold::TemplateRegistry;
use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use std::path::PathBuf;

/// Template commands
#[derive(Debug, Clone, Subcommand)]
pub enum TemplatesCommand {
    /// List the class templates available to the builder
    List {
        /// Configuration file (default: ./aaas.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl TemplatesCommand {
    /// Registered template names, including overrides from `template_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or a template fails to parse.
    pub fn template_names(&self) -> Result<Vec<String>> {
        match self {
            Self::List { config } => {
                let config = super::load_config(config.as_deref())?;
                let registry = match &config.template_dir {
                    Some(dir) => TemplateRegistry::with_overrides(dir)
                        .with_context(|| format!("Failed to load templates from {}", dir.display()))?,
                    None => TemplateRegistry::new().context("Failed to load embedded templates")?,
                };
                Ok(registry.template_names())
            }
        }
    }

    /// Execute the templates command
    ///
    /// # Errors
    ///
    /// Returns an error if the templates cannot be loaded.
    pub fn execute(&self) -> Result<()> {
        let names = self.template_names()?;

        println!("\n{}", style("Available templates:").cyan().bold());
        for name in &names {
            println!("  {}", style(name).green());
        }

        Ok(())
    }
}
