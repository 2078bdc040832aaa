//! Class source editing
//!
//! A [`SourceEditor`] appends a property and its accessors to the text of a
//! class. The default implementation is [`ClassSourceManipulator`].

pub mod manipulator;

pub use manipulator::ClassSourceManipulator;

use crate::error::Result;
use serde::Serialize;

/// Options describing a field appended to a class
///
/// Only the flags that are set are present: `nullable` and `unique` are either
/// `Some(true)` or absent, never `Some(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOptions {
    /// Property name
    pub field_name: String,

    /// Doctrine column type (e.g. `string`, `integer`)
    #[serde(rename = "type")]
    pub field_type: String,

    /// Column accepts null
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    /// Column carries a unique constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,

    /// Column length, only for `string` columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

impl FieldOptions {
    /// Options with only the property name and column type set
    pub fn new(field_name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_type: field_type.into(),
            nullable: None,
            unique: None,
            length: None,
        }
    }

    /// Whether the column accepts null
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable == Some(true)
    }

    /// Whether the column is unique
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.unique == Some(true)
    }
}

/// Appends fields to class source text
#[cfg_attr(test, mockall::automock)]
pub trait SourceEditor {
    /// Append a property named `field_name` with its accessors to `source`
    ///
    /// # Errors
    ///
    /// Returns an error if the field is already declared, the name is not a
    /// valid identifier, or `source` has no class body.
    fn append_field(&self, source: &str, field_name: &str, options: &FieldOptions) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_options_serialization() {
        let options = FieldOptions::new("age", "integer");
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({ "fieldName": "age", "type": "integer" })
        );
    }

    #[test]
    fn test_full_options_serialization() {
        let options = FieldOptions {
            nullable: Some(true),
            unique: Some(true),
            length: Some(180),
            ..FieldOptions::new("email", "string")
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "fieldName": "email",
                "type": "string",
                "nullable": true,
                "unique": true,
                "length": 180,
            })
        );
        assert!(options.is_nullable());
        assert!(options.is_unique());
    }
}
