//! Project model consumed by the builder
//!
//! A [`Project`] owns repository groupings, each grouping owns services and
//! each service owns field descriptions. The builder only reads these
//! structures; they are usually loaded from a TOML or JSON project file.
//!
//! # Example Project File
//!
//! ```toml
//! name = "shop"
//!
//! [[repositories]]
//! name = "sales"
//!
//! [[repositories.services]]
//! name = "Customer"
//! description = "A paying customer"
//!
//! [[repositories.services.fields]]
//! name = "email"
//! data_type = "string"
//! is_unique = true
//! length = 180
//!
//! [[repositories.services.fields]]
//! name = "age"
//! data_type = "integer"
//! ```

use crate::error::{BuildError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level aggregate of repository groupings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project name
    #[serde(default)]
    pub name: String,
    /// Repository groupings in build order
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

/// Named collection of services
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository grouping name
    #[serde(default)]
    pub name: String,
    /// Services in build order
    #[serde(default)]
    pub services: Vec<Service>,
}

/// One generated entity (a database table)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Short class name of the generated entity (e.g. "Customer")
    pub name: String,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field descriptions in declaration order
    #[serde(default)]
    pub fields: Vec<ServiceField>,
}

/// One property of a generated entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceField {
    /// Property name
    pub name: String,
    /// Doctrine column type (e.g. "string", "integer", "datetime")
    pub data_type: String,
    /// Whether the column is nullable (unset counts as not nullable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nullable: Option<bool>,
    /// Whether the column is unique (unset counts as not unique)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unique: Option<bool>,
    /// Column length for "string" columns
    ///
    /// A string column without a length is generated with `length=255`
    /// (Doctrine's default). Other column types ignore it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

impl Project {
    /// Create an empty project
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repositories: Vec::new(),
        }
    }

    /// Load a project description from a `.toml` or `.json` file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The extension is neither `toml` nor `json`
    /// - The content does not describe a project
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let is_json = match extension.as_deref() {
            Some("toml") => false,
            Some("json") => true,
            _ => return Err(BuildError::UnsupportedProjectFormat(path.to_path_buf())),
        };

        let content = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        let parsed: std::result::Result<Self, String> = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| BuildError::ProjectFormat {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Add a repository grouping
    #[must_use]
    pub fn with_repository(mut self, repository: Repository) -> Self {
        self.repositories.push(repository);
        self
    }

    /// Total number of services across all repository groupings
    #[must_use]
    pub fn service_count(&self) -> usize {
        self.repositories.iter().map(|r| r.services.len()).sum()
    }
}

impl Repository {
    /// Create an empty repository grouping
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            services: Vec::new(),
        }
    }

    /// Add a service
    #[must_use]
    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }
}

impl Service {
    /// Create a service without fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Set the service description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a field description
    #[must_use]
    pub fn with_field(mut self, field: ServiceField) -> Self {
        self.fields.push(field);
        self
    }
}

impl ServiceField {
    /// Create a field with the given name and column type
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ..Self::default()
        }
    }

    /// Mark the field as nullable
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.is_nullable = Some(true);
        self
    }

    /// Mark the field as unique
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.is_unique = Some(true);
        self
    }

    /// Set the column length
    #[must_use]
    pub const fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PROJECT_TOML: &str = r#"
name = "shop"

[[repositories]]
name = "sales"

[[repositories.services]]
name = "Customer"
description = "A paying customer"

[[repositories.services.fields]]
name = "email"
data_type = "string"
is_unique = true
length = 180

[[repositories.services.fields]]
name = "age"
data_type = "integer"
"#;

    #[test]
    fn test_load_toml_project() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("project.toml");
        fs::write(&path, PROJECT_TOML).unwrap();

        let project = Project::from_path(&path).unwrap();
        assert_eq!(project.name, "shop");
        assert_eq!(project.service_count(), 1);

        let service = &project.repositories[0].services[0];
        assert_eq!(service.name, "Customer");
        assert_eq!(service.description.as_deref(), Some("A paying customer"));
        assert_eq!(
            service.fields,
            vec![
                ServiceField::new("email", "string").unique().with_length(180),
                ServiceField::new("age", "integer"),
            ]
        );
    }

    #[test]
    fn test_load_json_project() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("project.json");
        fs::write(
            &path,
            r#"{"name":"shop","repositories":[{"name":"sales","services":[{"name":"Order","fields":[{"name":"total","data_type":"decimal","is_nullable":null}]}]}]}"#,
        )
        .unwrap();

        let project = Project::from_path(&path).unwrap();
        let field = &project.repositories[0].services[0].fields[0];
        assert_eq!(field.name, "total");
        assert_eq!(field.is_nullable, None);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = Project::from_path("project.yaml");
        assert!(matches!(result, Err(BuildError::UnsupportedProjectFormat(_))));
    }

    #[test]
    fn test_invalid_content_names_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[[repositories]]\nservices = 3\n").unwrap();

        let err = Project::from_path(&path).unwrap_err();
        assert!(matches!(err, BuildError::ProjectFormat { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = Project::from_path(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(BuildError::Io { .. })));
    }
}
