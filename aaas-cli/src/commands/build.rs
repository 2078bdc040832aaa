//! Build Doctrine classes from a project file
//!
//! # Example
//!
//! ```bash
//! aaas build project.toml --output ./generated
//! ```

use aaas::builder::{Builder, BuiltService};
use aaas::model::Project;
use aaas::scaffold::Generator;
use aaas::source::ClassSourceManipulator;
use anyhow::{Context, Result};
use clap::Args;
use console::{style, Emoji};
use std::path::PathBuf;

static SUCCESS: Emoji = Emoji("✓", "+");
static PREVIEW: Emoji = Emoji("○", "-");

/// Build every service of a project
#[derive(Debug, Clone, Args)]
pub struct BuildCommand {
    /// Project description file (`.toml` or `.json`)
    pub project: PathBuf,

    /// Output directory (overrides `output_dir` from configuration)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (default: ./aaas.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show what would be generated without writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl BuildCommand {
    /// Build the project, returning the services built
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration or the project file cannot be loaded
    /// - Template overrides fail to parse
    /// - Any service fails to build or its files cannot be written
    pub fn run(&self) -> Result<Vec<BuiltService>> {
        let mut config = super::load_config(self.config.as_deref())?;
        if let Some(output) = &self.output {
            config.output_dir.clone_from(output);
        }

        let project = Project::from_path(&self.project)
            .with_context(|| format!("Failed to load project file: {}", self.project.display()))?;
        tracing::debug!(
            project = %project.name,
            output = %config.output_dir.display(),
            dry_run = self.dry_run,
            "Loaded project"
        );

        let generator = Generator::from_config(&config)
            .context("Failed to load class templates")?
            .with_dry_run(self.dry_run);
        let editor = ClassSourceManipulator::new().context("Failed to create source editor")?;

        let mut builder = Builder::new(generator, editor, config.namespaces());
        builder
            .build_project(&project)
            .with_context(|| format!("Failed to build project '{}'", project.name))?;

        Ok(builder.built_services().to_vec())
    }

    /// Build the project and print a summary
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails.
    pub fn execute(&self) -> Result<()> {
        println!(
            "\n{} {}",
            style("Building").cyan().bold(),
            style(self.project.display()).green().bold()
        );

        let services = self.run()?;
        let marker = if self.dry_run { &PREVIEW } else { &SUCCESS };

        for service in &services {
            match &service.description {
                Some(description) => println!(
                    "\n{} {}",
                    style(&service.name).green().bold(),
                    style(format!("({description})")).dim()
                ),
                None => println!("\n{}", style(&service.name).green().bold()),
            }

            for file in &service.files {
                println!("  {} {}", style(marker).green(), style(file.display()).dim());
            }
        }

        let files: usize = services.iter().map(|service| service.files.len()).sum();
        let verb = if self.dry_run { "Would generate" } else { "Generated" };
        println!(
            "\n{} {} files for {} services",
            style(verb).green().bold(),
            files,
            services.len()
        );

        Ok(())
    }
}
