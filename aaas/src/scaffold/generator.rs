//! Filesystem-backed class scaffolder
//!
//! Rendered classes are kept in memory, in the order they were rendered, until
//! [`Scaffolder::flush_all`] writes them below the output root. A class
//! `Aaas\Entity\Customer` with base namespace `Aaas\` lands at
//! `<output_dir>/<source_dir>/Entity/Customer.php`.

use super::helpers::TemplateHelpers;
use super::templates::TemplateRegistry;
use super::{ClassOptions, PendingHandle, Scaffolder};
use crate::config::{BuilderConfig, NAMESPACE_SEPARATOR};
use crate::error::{BuildError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const CLASS_FILE_EXTENSION: &str = "php";

/// A rendered class waiting to be written
#[derive(Debug, Clone)]
struct PendingUnit {
    class_name: String,
    handle: PendingHandle,
    content: String,
}

/// Class scaffolder writing generated classes to disk
pub struct Generator {
    templates: TemplateRegistry,
    base_namespace: String,
    output_dir: PathBuf,
    source_dir: PathBuf,
    overwrite: bool,
    dry_run: bool,
    pending: Vec<PendingUnit>,
    flushed: HashSet<String>,
}

impl Generator {
    /// Create a generator writing below `output_dir`
    ///
    /// # Arguments
    ///
    /// * `templates` - Template registry to render classes with
    /// * `base_namespace` - Namespace mapped to `source_dir` (e.g. `Aaas\`)
    /// * `output_dir` - Root directory of generated files
    pub fn new(templates: TemplateRegistry, base_namespace: &str, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates,
            base_namespace: base_namespace.to_string(),
            output_dir: output_dir.into(),
            source_dir: PathBuf::from("src"),
            overwrite: false,
            dry_run: false,
            pending: Vec::new(),
            flushed: HashSet::new(),
        }
    }

    /// Create a generator from builder configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded templates fail to parse or the
    /// configured template directory cannot be loaded.
    pub fn from_config(config: &BuilderConfig) -> Result<Self> {
        let templates = match &config.template_dir {
            Some(dir) => TemplateRegistry::with_overrides(dir)?,
            None => TemplateRegistry::new()?,
        };

        let namespaces = config.namespaces();
        Ok(Self::new(templates, &namespaces.base, &config.output_dir)
            .with_source_dir(&config.source_dir)
            .with_overwrite(config.overwrite))
    }

    /// Set the source directory mapped to the base namespace
    #[must_use]
    pub fn with_source_dir(mut self, source_dir: impl Into<PathBuf>) -> Self {
        self.source_dir = source_dir.into();
        self
    }

    /// Replace existing files instead of failing
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Log pending classes on flush instead of writing them
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Root directory of generated files
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Template registry
    #[must_use]
    pub const fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Number of classes waiting to be flushed
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Target paths of the classes waiting to be flushed, in render order
    #[must_use]
    pub fn pending_paths(&self) -> Vec<&Path> {
        self.pending.iter().map(|unit| unit.handle.path()).collect()
    }

    /// Target path of a class, relative to the output root
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::OutsideNamespace`] if `fqcn` does not start with
    /// the base namespace.
    pub fn target_path(&self, fqcn: &str) -> Result<PathBuf> {
        let relative = fqcn
            .strip_prefix(self.base_namespace.as_str())
            .filter(|rest| !rest.is_empty())
            .ok_or_else(|| BuildError::OutsideNamespace {
                class_name: fqcn.to_string(),
                base: self.base_namespace.clone(),
            })?;

        let mut path = self.source_dir.clone();
        path.extend(relative.split(NAMESPACE_SEPARATOR));
        path.set_extension(CLASS_FILE_EXTENSION);
        Ok(path)
    }

    fn unit(&self, handle: &PendingHandle) -> Result<&PendingUnit> {
        self.pending
            .iter()
            .find(|unit| &unit.handle == handle)
            .ok_or_else(|| BuildError::UnknownPending(handle.path().to_path_buf()))
    }

    fn unit_mut(&mut self, handle: &PendingHandle) -> Result<&mut PendingUnit> {
        self.pending
            .iter_mut()
            .find(|unit| &unit.handle == handle)
            .ok_or_else(|| BuildError::UnknownPending(handle.path().to_path_buf()))
    }
}

impl Scaffolder for Generator {
    fn render_template(
        &mut self,
        fqcn: &str,
        template_name: &str,
        options: &ClassOptions,
    ) -> Result<PendingHandle> {
        // A class is generated once per run, whether or not it reached the disk
        if self.flushed.contains(fqcn) || self.pending.iter().any(|unit| unit.class_name == fqcn) {
            return Err(BuildError::DuplicateClass(fqcn.to_string()));
        }

        let target = self.target_path(fqcn)?;
        let full_path = self.output_dir.join(&target);
        if !self.overwrite && full_path.exists() {
            return Err(BuildError::TargetExists(full_path));
        }

        let data = serde_json::json!({
            "namespace": TemplateHelpers::namespace_of(fqcn),
            "class_name": TemplateHelpers::short_class_name(fqcn),
            "api_resource": options.api_resource,
            "entity_class_name": options.entity_class_name,
            "entity_alias": options.entity_alias,
            "repository_full_class_name": options.repository_full_class_name,
            "entity_full_class_name": options.entity_full_class_name,
        });
        let content = self.templates.render(template_name, &data)?;

        tracing::debug!(
            class = fqcn,
            template = template_name,
            path = %target.display(),
            "Rendered pending class"
        );

        let handle = PendingHandle::new(target);
        self.pending.push(PendingUnit {
            class_name: fqcn.to_string(),
            handle: handle.clone(),
            content,
        });

        Ok(handle)
    }

    fn pending_text(&self, handle: &PendingHandle) -> Result<String> {
        Ok(self.unit(handle)?.content.clone())
    }

    fn set_pending_text(&mut self, handle: &PendingHandle, text: String) -> Result<()> {
        self.unit_mut(handle)?.content = text;
        Ok(())
    }

    fn discard(&mut self, handle: &PendingHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|unit| &unit.handle != handle);
        let discarded = self.pending.len() < before;
        if discarded {
            tracing::debug!(path = %handle, "Discarded pending class");
        }
        discarded
    }

    fn flush_all(&mut self) -> Result<Vec<PathBuf>> {
        let units = std::mem::take(&mut self.pending);
        let mut written = Vec::with_capacity(units.len());

        for unit in units {
            let full_path = self.output_dir.join(unit.handle.path());
            self.flushed.insert(unit.class_name.clone());

            if self.dry_run {
                tracing::info!(
                    class = %unit.class_name,
                    path = %full_path.display(),
                    bytes = unit.content.len(),
                    "Dry run, skipping write"
                );
                written.push(full_path);
                continue;
            }

            // Create parent directories if they don't exist
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
            }

            fs::write(&full_path, &unit.content).map_err(|e| BuildError::io(&full_path, e))?;

            tracing::info!(class = %unit.class_name, path = %full_path.display(), "Wrote class");
            written.push(full_path);
        }

        Ok(written)
    }
}
