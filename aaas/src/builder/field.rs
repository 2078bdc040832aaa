//! Folding service fields into entity source

use crate::error::Result;
use crate::model::ServiceField;
use crate::source::{FieldOptions, SourceEditor};

/// Column type that carries a length
pub const STRING_TYPE: &str = "string";

/// Length used for string columns that do not declare one
pub const DEFAULT_STRING_LENGTH: u32 = 255;

/// Column options for a service field
///
/// `nullable` and `unique` are only present when the field sets them to
/// `true`. `length` is only present for string columns.
#[must_use]
pub fn field_options(field: &ServiceField) -> FieldOptions {
    FieldOptions {
        field_name: field.name.clone(),
        field_type: field.data_type.clone(),
        nullable: (field.is_nullable == Some(true)).then_some(true),
        unique: (field.is_unique == Some(true)).then_some(true),
        length: (field.data_type == STRING_TYPE).then(|| field.length.unwrap_or(DEFAULT_STRING_LENGTH)),
    }
}

/// Append one field to `source`, returning the editor's result unchanged
///
/// # Errors
///
/// Returns the editor's error, e.g. when the field is already declared.
pub fn build_service_field<E: SourceEditor + ?Sized>(
    editor: &E,
    field: &ServiceField,
    source: &str,
) -> Result<String> {
    let options = field_options(field);
    tracing::debug!(field = %field.name, data_type = %field.data_type, "Folding field");
    editor.append_field(source, &field.name, &options)
}
