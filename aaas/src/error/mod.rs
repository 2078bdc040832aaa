//! Error types and error handling

use std::path::PathBuf;
use thiserror::Error;

/// Build pipeline error type
///
/// Every failure in the pipeline surfaces as one of these variants. Nothing is
/// recovered locally: an error aborts the current service build before its
/// pending classes are flushed.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Class name is empty or otherwise unusable
    #[error("Invalid class name: '{0}'")]
    InvalidClassName(String),

    /// Class short name has no internal capitalized segment to derive an entity name from
    #[error(
        "Cannot derive entity name from '{0}': expected a capitalized segment (e.g. 'Customer', 'UserProfile')"
    )]
    ClassNameSegmentation(String),

    /// Field name is not a valid property identifier
    #[error("Invalid field name: '{0}'. Must start with a letter or underscore")]
    InvalidFieldName(String),

    /// Field is already declared in the class source
    #[error("Field '{0}' is already declared in the class")]
    DuplicateField(String),

    /// Field accessor collides with a method already declared in the class
    #[error("Field '{field}' needs method '{method}', which is already declared in the class")]
    DuplicateAccessor {
        /// Field being appended
        field: String,
        /// Conflicting accessor name
        method: String,
    },

    /// Source text has no class body to edit
    #[error("Source code does not contain a class body")]
    MalformedSource,

    /// Source pattern could not be compiled
    #[error("Invalid source pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Template name is not registered
    #[error("Template not found: {0}")]
    UnknownTemplate(String),

    /// Template could not be parsed
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// Template could not be rendered
    #[error("Template render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// Class is already pending generation
    #[error("Class '{0}' is already pending generation")]
    DuplicateClass(String),

    /// Class lies outside the configured base namespace
    #[error("Class '{class_name}' is outside the base namespace '{base}'")]
    OutsideNamespace {
        /// Fully-qualified class name
        class_name: String,
        /// Configured base namespace
        base: String,
    },

    /// Target file already exists on disk
    #[error("The file '{0}' can't be generated because it already exists")]
    TargetExists(PathBuf),

    /// No pending class is registered under the handle
    #[error("No pending class at '{0}'")]
    UnknownPending(PathBuf),

    /// Filesystem error
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    /// Default configuration could not be serialized
    #[error("Configuration error: {0}")]
    ConfigDefaults(#[from] toml::ser::Error),

    /// Project description could not be parsed
    #[error("Failed to parse project file {path}: {message}")]
    ProjectFormat {
        /// Project file path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Project description has an unknown extension
    #[error("Unsupported project file: {0}. Expected a .toml or .json file")]
    UnsupportedProjectFormat(PathBuf),
}

impl BuildError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for build operations
pub type Result<T, E = BuildError> = std::result::Result<T, E>;
