//! Template registry for class generation
//!
//! Templates are Handlebars sources rendered without HTML escaping. The
//! registry starts with the embedded Doctrine templates; a template directory
//! can override them (or add new ones) with `*.hbs` files whose path relative
//! to the directory, minus the `.hbs` suffix, is the template name:
//!
//! ```text
//! templates/
//! └── doctrine/
//!     ├── Entity.php.hbs       → "doctrine/Entity.php"
//!     └── Repository.php.hbs   → "doctrine/Repository.php"
//! ```

pub mod files;

pub use files::{ENTITY_TEMPLATE, REPOSITORY_TEMPLATE};

use super::helpers::TemplateHelpers;
use crate::error::{BuildError, Result};
use handlebars::Handlebars;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Template name of the entity class
pub const ENTITY: &str = "doctrine/Entity.php";

/// Template name of the repository class
pub const REPOSITORY: &str = "doctrine/Repository.php";

const TEMPLATE_EXTENSION: &str = "hbs";

#[allow(missing_docs)]
mod helper_defs {
    use super::TemplateHelpers;
    use handlebars::handlebars_helper;

    handlebars_helper!(short_name: |fqcn: str| TemplateHelpers::short_class_name(fqcn).to_string());
}
pub use helper_defs::short_name;

/// Registry of named class templates
pub struct TemplateRegistry {
    handlebars: Handlebars<'static>,
}

impl TemplateRegistry {
    /// Create a registry holding the embedded templates
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded template fails to parse.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Disable HTML escaping since we're generating code
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        handlebars.register_helper("short_name", Box::new(short_name));

        handlebars.register_template_string(ENTITY, ENTITY_TEMPLATE)?;
        handlebars.register_template_string(REPOSITORY, REPOSITORY_TEMPLATE)?;

        Ok(Self { handlebars })
    }

    /// Create a registry with overrides loaded from a template directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or a template fails to parse.
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut registry = Self::new()?;
        registry.register_directory(dir)?;
        Ok(registry)
    }

    /// Register every `*.hbs` file below `dir`, returning how many were loaded
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be walked, a file cannot be
    /// read, or a template fails to parse.
    pub fn register_directory(&mut self, dir: &Path) -> Result<usize> {
        let mut count = 0;

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                BuildError::io(path, e.into())
            })?;

            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(TEMPLATE_EXTENSION)
            {
                continue;
            }

            let Ok(relative) = path.with_extension("").strip_prefix(dir).map(Path::to_path_buf) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let source = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
            self.handlebars.register_template_string(&name, source)?;
            tracing::debug!(template = %name, path = %path.display(), "Registered template override");
            count += 1;
        }

        Ok(count)
    }

    /// Whether a template is registered under `name`
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    /// Registered template names, sorted
    #[must_use]
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlebars.get_templates().keys().cloned().collect();
        names.sort();
        names
    }

    /// Render a named template
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownTemplate`] if nothing is registered under
    /// `name`, or a render error if a variable is missing.
    pub fn render(&self, name: &str, data: &serde_json::Value) -> Result<String> {
        if !self.has_template(name) {
            return Err(BuildError::UnknownTemplate(name.to_string()));
        }
        Ok(self.handlebars.render(name, data)?)
    }
}
