//! Naming helpers for class generation
//!
//! This module provides the naming conventions used when deriving class names,
//! aliases and accessor names from a service description.

use crate::config::NAMESPACE_SEPARATOR;
use crate::error::{BuildError, Result};
use inflector::Inflector;

/// Naming helpers for generated classes
pub struct TemplateHelpers;

impl TemplateHelpers {
    /// Convert string to `PascalCase`
    ///
    /// # Examples
    ///
    /// ```
    /// # use aaas::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_pascal_case("created_at"), "CreatedAt");
    /// assert_eq!(TemplateHelpers::to_pascal_case("email"), "Email");
    /// ```
    #[must_use]
    pub fn to_pascal_case(input: &str) -> String {
        input.to_pascal_case()
    }

    /// Last segment of a fully-qualified class name
    ///
    /// # Examples
    ///
    /// ```
    /// # use aaas::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::short_class_name("Aaas\\Entity\\Customer"), "Customer");
    /// assert_eq!(TemplateHelpers::short_class_name("Customer"), "Customer");
    /// ```
    #[must_use]
    pub fn short_class_name(fqcn: &str) -> &str {
        fqcn.rsplit(NAMESPACE_SEPARATOR).next().unwrap_or(fqcn)
    }

    /// Namespace part of a fully-qualified class name, without trailing separator
    ///
    /// # Examples
    ///
    /// ```
    /// # use aaas::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::namespace_of("Aaas\\Entity\\Customer"), "Aaas\\Entity");
    /// assert_eq!(TemplateHelpers::namespace_of("Customer"), "");
    /// ```
    #[must_use]
    pub fn namespace_of(fqcn: &str) -> &str {
        fqcn.rsplit_once(NAMESPACE_SEPARATOR)
            .map_or("", |(namespace, _)| namespace)
    }

    /// Lowercased first character of a class name, used as query alias
    ///
    /// # Examples
    ///
    /// ```
    /// # use aaas::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_alias("UserProfile").unwrap(), "u");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidClassName`] for an empty name.
    pub fn to_alias(class_name: &str) -> Result<String> {
        class_name
            .chars()
            .next()
            .map(|first| first.to_lowercase().collect())
            .ok_or_else(|| BuildError::InvalidClassName(class_name.to_string()))
    }

    /// Split a name before every uppercase ASCII letter
    ///
    /// A name starting with an uppercase letter yields a leading empty
    /// segment, so the first word is always at index 1. Concatenating the
    /// segments gives back the input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use aaas::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::split_on_capitals("UserProfile"), vec!["", "User", "Profile"]);
    /// assert_eq!(TemplateHelpers::split_on_capitals("customer"), vec!["customer"]);
    /// ```
    #[must_use]
    pub fn split_on_capitals(input: &str) -> Vec<&str> {
        let mut segments = Vec::new();
        let mut start = 0;
        for (idx, ch) in input.char_indices() {
            if ch.is_ascii_uppercase() {
                segments.push(&input[start..idx]);
                start = idx;
            }
        }
        segments.push(&input[start..]);
        segments
    }

    /// First capitalized word of a class name
    ///
    /// # Examples
    ///
    /// ```
    /// # use aaas::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::leading_word("CustomerRepository").unwrap(), "Customer");
    /// assert_eq!(TemplateHelpers::leading_word("UserProfile").unwrap(), "User");
    /// assert!(TemplateHelpers::leading_word("customer").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ClassNameSegmentation`] when the name has no
    /// uppercase letter to split on.
    pub fn leading_word(class_name: &str) -> Result<&str> {
        Self::split_on_capitals(class_name)
            .get(1)
            .copied()
            .ok_or_else(|| BuildError::ClassNameSegmentation(class_name.to_string()))
    }

    /// Check that a name is usable as a PHP identifier
    #[must_use]
    pub fn is_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        chars
            .next()
            .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
