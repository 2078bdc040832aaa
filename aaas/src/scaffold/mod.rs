//! Class scaffolding
//!
//! A [`Scaffolder`] renders named templates into pending, in-memory source
//! units addressed by fully-qualified class name, lets callers read and
//! replace their text, and flushes all of them to storage in one call.
//! [`Generator`] is the filesystem-backed implementation.

pub mod generator;
pub mod helpers;
pub mod templates;

pub use generator::Generator;
pub use helpers::TemplateHelpers;
pub use templates::TemplateRegistry;

use crate::error::Result;
use std::fmt;
use std::path::{Path, PathBuf};

/// Handle of a pending source unit: its target path relative to the output root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingHandle(PathBuf);

impl PendingHandle {
    /// Create a handle for a target path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Target path relative to the output root
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for PendingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Variables passed to a class template
///
/// The scaffolder adds `namespace` and `class_name` for the class being
/// rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassOptions {
    /// Emit the API resource annotation
    pub api_resource: bool,
    /// Short name of the class being generated
    pub entity_class_name: String,
    /// Lowercase first letter of the short name
    pub entity_alias: String,
    /// Repository class paired with the short name
    pub repository_full_class_name: String,
    /// Entity class derived from the first capitalized word of the short name
    pub entity_full_class_name: String,
}

/// Renders templates into pending source units and flushes them to storage
#[cfg_attr(test, mockall::automock)]
pub trait Scaffolder {
    /// Render `template_name` into a new pending unit for `fqcn`
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown or fails to render, or the
    /// class is already pending or already exists.
    fn render_template(
        &mut self,
        fqcn: &str,
        template_name: &str,
        options: &ClassOptions,
    ) -> Result<PendingHandle>;

    /// Current text of a pending unit
    ///
    /// # Errors
    ///
    /// Returns an error if no unit is pending under `handle`.
    fn pending_text(&self, handle: &PendingHandle) -> Result<String>;

    /// Replace the text of a pending unit
    ///
    /// # Errors
    ///
    /// Returns an error if no unit is pending under `handle`.
    fn set_pending_text(&mut self, handle: &PendingHandle, text: String) -> Result<()>;

    /// Drop a pending unit without writing it
    ///
    /// Returns `false` if no unit is pending under `handle`.
    fn discard(&mut self, handle: &PendingHandle) -> bool;

    /// Write every pending unit to storage, returning the written paths
    ///
    /// # Errors
    ///
    /// Returns an error if a unit cannot be written.
    fn flush_all(&mut self) -> Result<Vec<PathBuf>>;
}
