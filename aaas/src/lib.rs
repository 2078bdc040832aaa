//! aaas: entity and repository class generator
//!
//! Turns a declarative project description (repository groupings of services,
//! each with typed fields) into Doctrine entity and repository classes.
//!
//! # Pipeline
//!
//! ```text
//! Project ─▶ Repository ─▶ Service ─▶ entity class ─▶ fields folded in ─▶ repository class ─▶ flush
//! ```
//!
//! - [`builder::Builder`] drives the traversal
//! - [`scaffold::Scaffolder`] renders templates into pending classes ([`scaffold::Generator`] writes them to disk)
//! - [`source::SourceEditor`] appends properties and accessors ([`source::ClassSourceManipulator`])
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aaas::prelude::*;
//!
//! # fn main() -> aaas::error::Result<()> {
//! let config = BuilderConfig::load()?;
//! let project = Project::from_path("project.toml")?;
//!
//! let mut builder = Builder::new(
//!     Generator::from_config(&config)?,
//!     ClassSourceManipulator::new()?,
//!     config.namespaces(),
//! );
//! builder.build_project(&project)?;
//!
//! for path in builder.written_files() {
//!     println!("{}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml

pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod observability;
pub mod scaffold;
pub mod source;

/// Commonly used types
pub mod prelude {
    pub use crate::builder::{Builder, BuiltService, ClassKind};
    pub use crate::config::{BuilderConfig, Namespaces};
    pub use crate::error::{BuildError, Result};
    pub use crate::model::{Project, Repository, Service, ServiceField};
    pub use crate::scaffold::{Generator, Scaffolder, TemplateRegistry};
    pub use crate::source::{ClassSourceManipulator, FieldOptions, SourceEditor};
}
