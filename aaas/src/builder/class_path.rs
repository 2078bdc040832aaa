//! Class naming and target path generation

use crate::config::Namespaces;
use crate::error::{BuildError, Result};
use crate::scaffold::templates::{ENTITY, REPOSITORY};
use crate::scaffold::{ClassOptions, PendingHandle, Scaffolder, TemplateHelpers};

/// Kind of class generated for a service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// Doctrine entity named after the service
    Entity,
    /// Repository class named `<service>Repository`
    Repository,
}

impl ClassKind {
    /// Template rendered for this kind
    #[must_use]
    pub const fn template_name(self) -> &'static str {
        match self {
            Self::Entity => ENTITY,
            Self::Repository => REPOSITORY,
        }
    }

    /// Fully-qualified class name for a service name
    ///
    /// # Examples
    ///
    /// ```
    /// use aaas::builder::ClassKind;
    /// use aaas::config::Namespaces;
    ///
    /// let namespaces = Namespaces::default();
    /// assert_eq!(ClassKind::Entity.fqcn(&namespaces, "Customer"), "Aaas\\Entity\\Customer");
    /// assert_eq!(
    ///     ClassKind::Repository.fqcn(&namespaces, "Customer"),
    ///     "Aaas\\Repository\\CustomerRepository"
    /// );
    /// ```
    #[must_use]
    pub fn fqcn(self, namespaces: &Namespaces, name: &str) -> String {
        match self {
            Self::Entity => format!("{}{name}", namespaces.entity),
            Self::Repository => format!("{}{name}Repository", namespaces.repository),
        }
    }
}

/// Derives template variables from a class name and renders the class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPathGenerator {
    namespaces: Namespaces,
}

impl ClassPathGenerator {
    /// Create a generator for the given namespaces
    #[must_use]
    pub const fn new(namespaces: Namespaces) -> Self {
        Self { namespaces }
    }

    /// Namespaces classes are generated in
    #[must_use]
    pub const fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Template variables for a fully-qualified class name
    ///
    /// The entity class is derived from the first capitalized word of the
    /// short name, so `UserProfile` pairs with `<entity namespace>User`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidClassName`] for an empty short name and
    /// [`BuildError::ClassNameSegmentation`] when it has no uppercase letter.
    pub fn class_options(&self, fqcn: &str) -> Result<ClassOptions> {
        let class_name = TemplateHelpers::short_class_name(fqcn);
        if class_name.is_empty() {
            return Err(BuildError::InvalidClassName(fqcn.to_string()));
        }

        Ok(ClassOptions {
            api_resource: true,
            entity_class_name: class_name.to_string(),
            entity_alias: TemplateHelpers::to_alias(class_name)?,
            repository_full_class_name: format!("{}{class_name}Repository", self.namespaces.repository),
            entity_full_class_name: format!(
                "{}{}",
                self.namespaces.entity,
                TemplateHelpers::leading_word(class_name)?
            ),
        })
    }

    /// Render `template_name` for `fqcn` into a pending unit
    ///
    /// # Errors
    ///
    /// Returns an error if the class name cannot be segmented or the
    /// scaffolder rejects the render.
    pub fn generate<S: Scaffolder + ?Sized>(
        &self,
        scaffolder: &mut S,
        fqcn: &str,
        template_name: &str,
    ) -> Result<PendingHandle> {
        let options = self.class_options(fqcn)?;
        let handle = scaffolder.render_template(fqcn, template_name, &options)?;
        tracing::debug!(class = fqcn, template = template_name, target = %handle, "Generated class");
        Ok(handle)
    }
}
