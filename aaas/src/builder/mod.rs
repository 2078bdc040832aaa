//! Build pipeline
//!
//! The [`Builder`] walks a [`Project`] top-down:
//!
//! 1. every repository grouping, in order
//! 2. every service of a grouping, in order
//! 3. for each service: render the entity, fold each field into its text
//!    (writing the result back after every field), render the repository and
//!    flush both classes in a single call
//!
//! Errors abort the service being built and propagate unchanged. Nothing of
//! that service is flushed.

pub mod class_path;
pub mod field;

pub use class_path::{ClassKind, ClassPathGenerator};
pub use field::{build_service_field, field_options};

use crate::config::Namespaces;
use crate::error::{BuildError, Result};
use crate::model::{Project, Repository, Service, ServiceField};
use crate::scaffold::{PendingHandle, Scaffolder, TemplateHelpers};
use crate::source::SourceEditor;
use std::path::PathBuf;

/// Files written for one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltService {
    /// Service name
    pub name: String,
    /// Service description, if any
    pub description: Option<String>,
    /// Written paths, entity first
    pub files: Vec<PathBuf>,
}

/// Generates entity and repository classes for a project
pub struct Builder<S, E> {
    scaffolder: S,
    editor: E,
    class_paths: ClassPathGenerator,
    built: Vec<BuiltService>,
}

impl<S: Scaffolder, E: SourceEditor> Builder<S, E> {
    /// Create a builder
    ///
    /// # Arguments
    ///
    /// * `scaffolder` - Renders and stores generated classes
    /// * `editor` - Appends fields to entity source
    /// * `namespaces` - Namespaces of generated entities and repositories
    pub const fn new(scaffolder: S, editor: E, namespaces: Namespaces) -> Self {
        Self {
            scaffolder,
            editor,
            class_paths: ClassPathGenerator::new(namespaces),
            built: Vec::new(),
        }
    }

    /// Build every repository grouping of a project, in order
    ///
    /// Returns the project it was given.
    ///
    /// # Errors
    ///
    /// Returns the first error of any service build.
    pub fn build_project<'p>(&mut self, project: &'p Project) -> Result<&'p Project> {
        tracing::info!(
            project = %project.name,
            repositories = project.repositories.len(),
            services = project.service_count(),
            "Building project"
        );

        for repository in &project.repositories {
            self.build_repository(repository)?;
        }

        Ok(project)
    }

    /// Build every service of a repository grouping, in order
    ///
    /// # Errors
    ///
    /// Returns the first error of any service build.
    pub fn build_repository(&mut self, repository: &Repository) -> Result<()> {
        tracing::info!(repository = %repository.name, services = repository.services.len(), "Building repository");

        for service in &repository.services {
            self.build_service(service)?;
        }

        Ok(())
    }

    /// Generate the entity and repository classes of one service
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The service name cannot be used as a class name
    /// - A template fails to render or the class already exists
    /// - A field cannot be appended (e.g. declared twice)
    /// - Flushing the generated classes fails
    pub fn build_service(&mut self, service: &Service) -> Result<()> {
        tracing::info!(service = %service.name, fields = service.fields.len(), "Building service");

        let mut registered = Vec::new();
        let files = match self.generate_service(service, &mut registered) {
            Ok(files) => files,
            Err(err) => {
                // Classes of a failed service never reach a later flush
                let discarded = registered
                    .iter()
                    .filter(|handle| self.scaffolder.discard(handle))
                    .count();
                tracing::warn!(service = %service.name, discarded, error = %err, "Service build failed");
                return Err(err);
            }
        };
        tracing::info!(service = %service.name, files = files.len(), "Built service");

        self.built.push(BuiltService {
            name: service.name.clone(),
            description: service.description.clone(),
            files,
        });

        Ok(())
    }

    /// Render, fold and flush the classes of one service
    ///
    /// Every pending class is pushed to `registered` as soon as it is rendered.
    fn generate_service(&mut self, service: &Service, registered: &mut Vec<PendingHandle>) -> Result<Vec<PathBuf>> {
        let entity = self.build_class(&service.name, ClassKind::Entity)?;
        registered.push(entity.clone());
        let source = self.scaffolder.pending_text(&entity)?;

        let editor = &self.editor;
        let scaffolder = &mut self.scaffolder;
        service.fields.iter().try_fold(source, |source, field| {
            let folded = build_service_field(editor, field, &source)?;
            scaffolder.set_pending_text(&entity, folded.clone())?;
            Ok::<_, BuildError>(folded)
        })?;

        registered.push(self.build_class(&service.name, ClassKind::Repository)?);

        self.scaffolder.flush_all()
    }

    /// Render the entity or repository class for a service name
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidClassName`] if `name` is not an
    /// identifier, or any error of [`Self::generate_class_target_path`].
    pub fn build_class(&mut self, name: &str, kind: ClassKind) -> Result<PendingHandle> {
        if !TemplateHelpers::is_identifier(name) {
            return Err(BuildError::InvalidClassName(name.to_string()));
        }

        let fqcn = kind.fqcn(self.class_paths.namespaces(), name);
        self.generate_class_target_path(&fqcn, kind.template_name())
    }

    /// Render `template_name` for `fqcn` into a pending class
    ///
    /// # Errors
    ///
    /// Returns an error if the class name cannot be segmented or rendering fails.
    pub fn generate_class_target_path(&mut self, fqcn: &str, template_name: &str) -> Result<PendingHandle> {
        self.class_paths.generate(&mut self.scaffolder, fqcn, template_name)
    }

    /// Append one field to entity source
    ///
    /// # Errors
    ///
    /// Returns the source editor's error.
    pub fn build_service_field(&self, field: &ServiceField, source: &str) -> Result<String> {
        build_service_field(&self.editor, field, source)
    }

    /// Services built so far, in build order
    #[must_use]
    pub fn built_services(&self) -> &[BuiltService] {
        &self.built
    }

    /// All files written so far, in write order
    #[must_use]
    pub fn written_files(&self) -> Vec<&PathBuf> {
        self.built.iter().flat_map(|service| &service.files).collect()
    }

    /// The scaffolder
    #[must_use]
    pub const fn scaffolder(&self) -> &S {
        &self.scaffolder
    }

    /// Consume the builder, returning the scaffolder
    pub fn into_scaffolder(self) -> S {
        self.scaffolder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::{ClassOptions, MockScaffolder};
    use crate::source::{FieldOptions, MockSourceEditor};
    use mockall::Sequence;
    use std::collections::HashMap;

    /// Scaffolder recording every call
    #[derive(Default)]
    struct RecordingScaffolder {
        calls: Vec<String>,
        texts: HashMap<PendingHandle, String>,
        options: Vec<ClassOptions>,
    }

    impl Scaffolder for RecordingScaffolder {
        fn render_template(&mut self, fqcn: &str, template_name: &str, options: &ClassOptions) -> Result<PendingHandle> {
            self.calls.push(format!("render {fqcn}"));
            self.options.push(options.clone());
            let handle = PendingHandle::new(format!("{}.php", TemplateHelpers::short_class_name(fqcn)));
            self.texts.insert(handle.clone(), format!("[{template_name}]"));
            Ok(handle)
        }

        fn pending_text(&self, handle: &PendingHandle) -> Result<String> {
            self.texts
                .get(handle)
                .cloned()
                .ok_or_else(|| BuildError::UnknownPending(handle.path().to_path_buf()))
        }

        fn set_pending_text(&mut self, handle: &PendingHandle, text: String) -> Result<()> {
            self.calls.push(format!("set {handle} {text}"));
            self.texts.insert(handle.clone(), text);
            Ok(())
        }

        fn discard(&mut self, handle: &PendingHandle) -> bool {
            self.calls.push(format!("discard {handle}"));
            self.texts.remove(handle).is_some()
        }

        fn flush_all(&mut self) -> Result<Vec<PathBuf>> {
            self.calls.push("flush".to_string());
            let mut paths: Vec<PathBuf> = self.texts.drain().map(|(handle, _)| handle.path().to_path_buf()).collect();
            paths.sort();
            Ok(paths)
        }
    }

    /// Editor appending `+<field>` to the source
    struct SuffixEditor;

    impl SourceEditor for SuffixEditor {
        fn append_field(&self, source: &str, field_name: &str, _options: &FieldOptions) -> Result<String> {
            if source.contains(&format!("+{field_name}")) {
                return Err(BuildError::DuplicateField(field_name.to_string()));
            }
            Ok(format!("{source}+{field_name}"))
        }
    }

    fn customer() -> Service {
        Service::new("Customer")
            .with_field(ServiceField::new("email", "string").unique().with_length(180))
            .with_field(ServiceField::new("age", "integer"))
    }

    fn builder() -> Builder<RecordingScaffolder, SuffixEditor> {
        Builder::new(RecordingScaffolder::default(), SuffixEditor, Namespaces::default())
    }

    #[test]
    fn test_service_folds_fields_in_order() {
        let mut builder = builder();
        builder.build_service(&customer()).unwrap();

        assert_eq!(
            builder.scaffolder().calls,
            vec![
                "render Aaas\\Entity\\Customer",
                "set Customer.php [doctrine/Entity.php]+email",
                "set Customer.php [doctrine/Entity.php]+email+age",
                "render Aaas\\Repository\\CustomerRepository",
                "flush",
            ]
        );
    }

    #[test]
    fn test_service_records_written_files() {
        let mut builder = builder();
        builder
            .build_service(&customer().with_description("Paying customers"))
            .unwrap();

        let built = builder.built_services();
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].name, "Customer");
        assert_eq!(built[0].description.as_deref(), Some("Paying customers"));
        assert_eq!(
            built[0].files,
            vec![PathBuf::from("Customer.php"), PathBuf::from("CustomerRepository.php")]
        );
        assert_eq!(builder.written_files().len(), 2);
    }

    #[test]
    fn test_service_without_fields() {
        let mut builder = builder();
        builder.build_service(&Service::new("Invoice")).unwrap();

        assert_eq!(
            builder.scaffolder().calls,
            vec![
                "render Aaas\\Entity\\Invoice",
                "render Aaas\\Repository\\InvoiceRepository",
                "flush",
            ]
        );
    }

    #[test]
    fn test_class_options_for_both_classes() {
        let mut builder = builder();
        builder.build_service(&Service::new("UserProfile")).unwrap();

        let options = &builder.scaffolder().options;
        assert_eq!(options[0].entity_alias, "u");
        assert_eq!(options[0].repository_full_class_name, "Aaas\\Repository\\UserProfileRepository");
        assert_eq!(options[0].entity_full_class_name, "Aaas\\Entity\\User");
        assert_eq!(options[1].entity_class_name, "UserProfileRepository");
        assert_eq!(options[1].entity_full_class_name, "Aaas\\Entity\\User");
    }

    #[test]
    fn test_duplicate_field_aborts_before_flush() {
        let service = Service::new("Customer")
            .with_field(ServiceField::new("email", "string"))
            .with_field(ServiceField::new("email", "string"));

        let mut builder = builder();
        let result = builder.build_service(&service);

        assert!(matches!(result, Err(BuildError::DuplicateField(_))));
        let calls = &builder.scaffolder().calls;
        assert!(!calls.iter().any(|call| call == "flush"));
        assert!(!calls.iter().any(|call| call.contains("CustomerRepository")));
        assert!(builder.built_services().is_empty());
    }

    #[test]
    fn test_failed_service_is_not_flushed_with_next() {
        let broken = Service::new("Customer")
            .with_field(ServiceField::new("email", "string"))
            .with_field(ServiceField::new("email", "string"));

        let mut builder = builder();
        assert!(builder.build_service(&broken).is_err());
        assert!(builder.scaffolder().calls.contains(&"discard Customer.php".to_string()));

        builder.build_service(&Service::new("Invoice")).unwrap();
        assert_eq!(
            builder.built_services()[0].files,
            vec![PathBuf::from("Invoice.php"), PathBuf::from("InvoiceRepository.php")]
        );
    }

    #[test]
    fn test_lowercase_service_name_rejected() {
        let mut builder = builder();
        let result = builder.build_service(&Service::new("customer"));

        assert!(matches!(result, Err(BuildError::ClassNameSegmentation(_))));
        assert!(builder.scaffolder().calls.is_empty());
    }

    #[test]
    fn test_invalid_service_name_rejected() {
        let mut builder = builder();
        assert!(matches!(
            builder.build_service(&Service::new("Customer Order")),
            Err(BuildError::InvalidClassName(_))
        ));
        assert!(matches!(builder.build_service(&Service::new("")), Err(BuildError::InvalidClassName(_))));
    }

    #[test]
    fn test_project_visits_repositories_in_order() {
        let project = Project::new("shop")
            .with_repository(
                Repository::new("sales")
                    .with_service(Service::new("Customer"))
                    .with_service(Service::new("Invoice")),
            )
            .with_repository(Repository::new("empty"))
            .with_repository(Repository::new("catalog").with_service(Service::new("Product")));

        let mut builder = builder();
        let returned = builder.build_project(&project).unwrap();
        assert!(std::ptr::eq(returned, &project));

        let renders: Vec<&String> = builder
            .scaffolder()
            .calls
            .iter()
            .filter(|call| call.starts_with("render Aaas\\Entity"))
            .collect();
        assert_eq!(
            renders,
            vec![
                "render Aaas\\Entity\\Customer",
                "render Aaas\\Entity\\Invoice",
                "render Aaas\\Entity\\Product",
            ]
        );
        let flushes = builder.scaffolder().calls.iter().filter(|call| *call == "flush").count();
        assert_eq!(flushes, 3);
    }

    #[test]
    fn test_project_error_stops_later_services() {
        let project = Project::new("shop").with_repository(
            Repository::new("sales")
                .with_service(Service::new("Customer"))
                .with_service(Service::new("invoice"))
                .with_service(Service::new("Product")),
        );

        let mut builder = builder();
        assert!(builder.build_project(&project).is_err());
        assert_eq!(builder.built_services().len(), 1);
        assert!(!builder
            .scaffolder()
            .calls
            .iter()
            .any(|call| call.contains("Product")));
    }

    #[test]
    fn test_single_flush_after_both_classes() {
        let mut seq = Sequence::new();
        let mut scaffolder = MockScaffolder::new();
        let mut editor = MockSourceEditor::new();

        scaffolder
            .expect_render_template()
            .withf(|fqcn, template, _| fqcn == "Aaas\\Entity\\Customer" && template == "doctrine/Entity.php")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(PendingHandle::new("src/Entity/Customer.php")));
        scaffolder
            .expect_pending_text()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("entity".to_string()));

        editor
            .expect_append_field()
            .withf(|source, name, options| {
                source == "entity"
                    && name == "email"
                    && serde_json::to_value(options).ok()
                        == Some(serde_json::json!({
                            "fieldName": "email", "type": "string", "unique": true, "length": 180
                        }))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|source, name, _| Ok(format!("{source}+{name}")));
        scaffolder
            .expect_set_pending_text()
            .withf(|handle, text| handle.to_string() == "src/Entity/Customer.php" && text == "entity+email")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        editor
            .expect_append_field()
            .withf(|source, name, options| {
                source == "entity+email" && name == "age" && options.nullable.is_none() && options.length.is_none()
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|source, name, _| Ok(format!("{source}+{name}")));
        scaffolder
            .expect_set_pending_text()
            .withf(|_, text| text == "entity+email+age")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        scaffolder
            .expect_render_template()
            .withf(|fqcn, template, _| {
                fqcn == "Aaas\\Repository\\CustomerRepository" && template == "doctrine/Repository.php"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(PendingHandle::new("src/Repository/CustomerRepository.php")));
        scaffolder
            .expect_flush_all()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| {
                Ok(vec![
                    PathBuf::from("src/Entity/Customer.php"),
                    PathBuf::from("src/Repository/CustomerRepository.php"),
                ])
            });

        let mut builder = Builder::new(scaffolder, editor, Namespaces::default());
        builder.build_service(&customer()).unwrap();
        assert_eq!(builder.written_files().len(), 2);
    }
}
