//! Configuration management for the builder
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `AAAS_` prefix, `__` for nesting)
//! 2. `./aaas.toml` (or an explicit file passed to [`BuilderConfig::load_from`])
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # aaas.toml
//! output_dir = "./generated"
//! source_dir = "src"
//! template_dir = "./templates"
//! overwrite = false
//!
//! [namespaces]
//! base = "Aaas\\"
//! # entity = "Aaas\\Entity\\"
//! # repository = "Aaas\\Repository\\"
//! ```

use crate::error::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default base namespace for generated classes
pub const DEFAULT_BASE_NAMESPACE: &str = "Aaas\\";

/// Local configuration file name
pub const CONFIG_FILE: &str = "aaas.toml";

/// Namespace separator in generated class names
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Namespace configuration as written by the user
///
/// Only `base` is required; the entity and repository namespaces are derived
/// from it unless overridden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceSettings {
    /// Base namespace (e.g. `Aaas\`)
    pub base: String,

    /// Entity namespace override (defaults to `<base>Entity\`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,

    /// Repository namespace override (defaults to `<base>Repository\`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

impl Default for NamespaceSettings {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_NAMESPACE.to_string(),
            entity: None,
            repository: None,
        }
    }
}

impl NamespaceSettings {
    /// Resolve the effective namespaces
    #[must_use]
    pub fn resolve(&self) -> Namespaces {
        let mut namespaces = Namespaces::new(&self.base);
        if let Some(entity) = &self.entity {
            namespaces.entity = with_separator(entity);
        }
        if let Some(repository) = &self.repository {
            namespaces.repository = with_separator(repository);
        }
        namespaces
    }
}

/// Resolved namespace prefixes used when naming generated classes
///
/// Every prefix ends with the namespace separator so class names can be
/// appended directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    /// Base namespace
    pub base: String,
    /// Namespace of generated entities
    pub entity: String,
    /// Namespace of generated repositories
    pub repository: String,
}

impl Namespaces {
    /// Derive entity and repository namespaces from a base namespace
    ///
    /// # Examples
    ///
    /// ```
    /// use aaas::config::Namespaces;
    ///
    /// let namespaces = Namespaces::new("App");
    /// assert_eq!(namespaces.base, "App\\");
    /// assert_eq!(namespaces.entity, "App\\Entity\\");
    /// assert_eq!(namespaces.repository, "App\\Repository\\");
    /// ```
    #[must_use]
    pub fn new(base: &str) -> Self {
        let base = with_separator(base);
        Self {
            entity: format!("{base}Entity{NAMESPACE_SEPARATOR}"),
            repository: format!("{base}Repository{NAMESPACE_SEPARATOR}"),
            base,
        }
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_NAMESPACE)
    }
}

fn with_separator(namespace: &str) -> String {
    let trimmed = namespace.trim();
    if trimmed.is_empty() || trimmed.ends_with(NAMESPACE_SEPARATOR) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{NAMESPACE_SEPARATOR}")
    }
}

/// Complete builder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Root directory generated files are written under
    pub output_dir: PathBuf,

    /// Source directory (relative to `output_dir`) mapped to the base namespace
    pub source_dir: PathBuf,

    /// Directory of `*.hbs` files overriding the embedded templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,

    /// Replace files that already exist on disk instead of failing
    pub overwrite: bool,

    /// Namespace settings
    pub namespaces: NamespaceSettings,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            source_dir: PathBuf::from("src"),
            template_dir: None,
            overwrite: false,
            namespaces: NamespaceSettings::default(),
        }
    }
}

impl BuilderConfig {
    /// Load configuration from `./aaas.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - `./aaas.toml` contains invalid TOML or mistyped values
    /// - An `AAAS_*` environment variable has a mistyped value
    pub fn load() -> Result<Self> {
        Self::load_with(None)
    }

    /// Load configuration from a specific file and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - The file contains invalid TOML or mistyped values
    /// - An `AAAS_*` environment variable has a mistyped value
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(Some(path.as_ref()))
    }

    fn load_with(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new()
            // 3. Start with defaults (lowest priority)
            .merge(Toml::string(&toml::to_string(&Self::default())?));

        // 2. Explicit file, or ./aaas.toml when present
        match path {
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let local_config = PathBuf::from(CONFIG_FILE);
                if local_config.exists() {
                    figment = figment.merge(Toml::file(local_config));
                }
            }
        }

        // 1. Environment variables (highest priority, double underscore for nesting)
        figment = figment.merge(Env::prefixed("AAAS_").split("__").lowercase(true));

        let config = figment.extract()?;
        tracing::debug!(?config, "Loaded builder configuration");
        Ok(config)
    }

    /// Resolved namespaces
    #[must_use]
    pub fn namespaces(&self) -> Namespaces {
        self.namespaces.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = BuilderConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.source_dir, PathBuf::from("src"));
        assert!(config.template_dir.is_none());
        assert!(!config.overwrite);
        assert_eq!(config.namespaces.base, "Aaas\\");
    }

    #[test]
    fn test_default_namespaces() {
        let namespaces = Namespaces::default();
        assert_eq!(namespaces.base, "Aaas\\");
        assert_eq!(namespaces.entity, "Aaas\\Entity\\");
        assert_eq!(namespaces.repository, "Aaas\\Repository\\");
    }

    #[test]
    fn test_namespace_overrides() {
        let settings = NamespaceSettings {
            base: "Shop".to_string(),
            entity: Some("Shop\\Model".to_string()),
            repository: None,
        };
        let namespaces = settings.resolve();
        assert_eq!(namespaces.base, "Shop\\");
        assert_eq!(namespaces.entity, "Shop\\Model\\");
        assert_eq!(namespaces.repository, "Shop\\Repository\\");
    }

    #[test]
    fn test_empty_base_namespace() {
        let namespaces = Namespaces::new("");
        assert_eq!(namespaces.base, "");
        assert_eq!(namespaces.entity, "Entity\\");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            "output_dir = \"./out\"\noverwrite = true\n\n[namespaces]\nbase = \"Shop\\\\\"\n",
        )
        .unwrap();

        let config = BuilderConfig::load_from(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("./out"));
        assert_eq!(config.source_dir, PathBuf::from("src"));
        assert!(config.overwrite);
        assert_eq!(config.namespaces().entity, "Shop\\Entity\\");
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "overwrite = \"sometimes\"\n").unwrap();

        assert!(BuilderConfig::load_from(&path).is_err());
    }
}
