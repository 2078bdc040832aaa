//! Textual PHP class editor
//!
//! Appends Doctrine-mapped properties to an entity class:
//!
//! - the property, with an `@ORM\Column` annotation, goes after the last
//!   declared property (or right after the class opening brace)
//! - the getter and setter go before the class closing brace

use super::{FieldOptions, SourceEditor};
use crate::error::{BuildError, Result};
use crate::scaffold::helpers::TemplateHelpers;
use regex::Regex;
use std::fmt::Write as _;

const INDENT: &str = "    ";

const CLASS_PATTERN: &str = r"(?m)^[ \t]*(?:(?:final|abstract)[ \t]+)?class[ \t]+\w+[^{]*\{";

const PROPERTY_PATTERN: &str =
    r"(?m)^[ \t]*(?:public|protected|private)(?:[ \t]+static)?(?:[ \t]+\??[\w\\]+)?[ \t]+\$\w+[^;\n]*;[ \t]*\n?";

/// PHP type hint for a Doctrine column type
///
/// Returns `None` for types without a natural hint; accessors for those are
/// left untyped.
///
/// # Examples
///
/// ```
/// # use aaas::source::manipulator::type_hint;
/// assert_eq!(type_hint("string"), Some("string"));
/// assert_eq!(type_hint("datetime_immutable"), Some("\\DateTimeImmutable"));
/// assert_eq!(type_hint("blob"), None);
/// ```
#[must_use]
pub fn type_hint(column_type: &str) -> Option<&'static str> {
    match column_type {
        "string" | "text" | "guid" | "bigint" | "decimal" => Some("string"),
        "integer" | "smallint" => Some("int"),
        "boolean" => Some("bool"),
        "float" => Some("float"),
        "json" | "array" | "simple_array" => Some("array"),
        "date" | "datetime" | "datetimetz" | "time" => Some("\\DateTimeInterface"),
        "dateinterval" => Some("\\DateInterval"),
        other if other.ends_with("_immutable") => Some("\\DateTimeImmutable"),
        _ => None,
    }
}

/// Source editor for Doctrine entity classes
#[derive(Debug, Clone)]
pub struct ClassSourceManipulator {
    class_pattern: Regex,
    property_pattern: Regex,
}

impl ClassSourceManipulator {
    /// Create a manipulator
    ///
    /// # Errors
    ///
    /// Returns an error if the class patterns fail to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            class_pattern: Regex::new(CLASS_PATTERN)?,
            property_pattern: Regex::new(PROPERTY_PATTERN)?,
        })
    }

    /// Offsets just after the class opening brace and of the closing brace
    fn class_body(&self, source: &str) -> Result<(usize, usize)> {
        let open_end = self
            .class_pattern
            .find(source)
            .map(|m| m.end())
            .ok_or(BuildError::MalformedSource)?;

        match source.rfind('}') {
            Some(close) if close >= open_end => Ok((open_end, close)),
            _ => Err(BuildError::MalformedSource),
        }
    }

    /// Whether `source` already declares a property named `field_name`
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup pattern fails to compile.
    pub fn declares(&self, source: &str, field_name: &str) -> Result<bool> {
        let pattern = Regex::new(&format!(
            r"(?m)^[ \t]*(?:public|protected|private)(?:[ \t]+static)?(?:[ \t]+\??[\w\\]+)?[ \t]+\${}\b",
            regex::escape(field_name)
        ))?;
        Ok(pattern.is_match(source))
    }

    /// Whether `source` already declares a method named `method` (case-insensitive, like PHP)
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup pattern fails to compile.
    pub fn declares_method(&self, source: &str, method: &str) -> Result<bool> {
        let pattern = Regex::new(&format!(r"(?mi)\bfunction[ \t]+{}[ \t]*\(", regex::escape(method)))?;
        Ok(pattern.is_match(source))
    }

    fn last_property_end(&self, source: &str, open_end: usize, close: usize) -> Option<usize> {
        self.property_pattern
            .find_iter(source)
            .filter(|m| m.start() >= open_end && m.end() <= close)
            .last()
            .map(|m| m.end())
    }
}

impl SourceEditor for ClassSourceManipulator {
    fn append_field(&self, source: &str, field_name: &str, options: &FieldOptions) -> Result<String> {
        if !TemplateHelpers::is_identifier(field_name) {
            return Err(BuildError::InvalidFieldName(field_name.to_string()));
        }

        let (open_end, close) = self.class_body(source)?;
        if self.declares(source, field_name)? {
            return Err(BuildError::DuplicateField(field_name.to_string()));
        }

        let accessor = TemplateHelpers::to_pascal_case(field_name);
        for method in [format!("get{accessor}"), format!("set{accessor}")] {
            if self.declares_method(source, &method)? {
                return Err(BuildError::DuplicateAccessor {
                    field: field_name.to_string(),
                    method,
                });
            }
        }

        let property = property_block(field_name, options);
        let (at, block) = match self.last_property_end(source, open_end, close) {
            Some(end) => (end, format!("\n{property}")),
            None if source[open_end..].starts_with('\n') => {
                let at = open_end + 1;
                let separator = if source[at..].trim_start().starts_with('}') { "" } else { "\n" };
                (at, format!("{property}{separator}"))
            }
            None => (open_end, format!("\n{property}")),
        };

        let mut code = source.to_string();
        code.insert_str(at, &block);

        // Closing brace moved by the inserted property
        let close = close + block.len();
        let line_start = code[..close].rfind('\n').map_or(0, |idx| idx + 1);
        let accessors = accessor_block(field_name, options);
        if line_start > open_end && code[line_start..close].trim().is_empty() {
            code.insert_str(line_start, &format!("\n{accessors}"));
        } else {
            code.insert_str(close, &format!("\n{accessors}"));
        }

        Ok(code)
    }
}

fn column_annotation(options: &FieldOptions) -> String {
    let mut attributes = vec![format!("type=\"{}\"", options.field_type)];
    if options.is_nullable() {
        attributes.push("nullable=true".to_string());
    }
    if options.is_unique() {
        attributes.push("unique=true".to_string());
    }
    if let Some(length) = options.length {
        attributes.push(format!("length={length}"));
    }
    format!("@ORM\\Column({})", attributes.join(", "))
}

fn property_block(field_name: &str, options: &FieldOptions) -> String {
    format!(
        "{INDENT}/**\n{INDENT} * {}\n{INDENT} */\n{INDENT}private ${field_name};\n",
        column_annotation(options)
    )
}

fn accessor_block(field_name: &str, options: &FieldOptions) -> String {
    let accessor = TemplateHelpers::to_pascal_case(field_name);
    let hint = type_hint(&options.field_type);

    let return_type = hint.map(|h| format!(": ?{h}")).unwrap_or_default();
    let parameter_type = match hint {
        Some(h) if options.is_nullable() => format!("?{h} "),
        Some(h) => format!("{h} "),
        None => String::new(),
    };

    let mut block = String::new();
    let _ = writeln!(block, "{INDENT}public function get{accessor}(){return_type}");
    let _ = writeln!(block, "{INDENT}{{");
    let _ = writeln!(block, "{INDENT}{INDENT}return $this->{field_name};");
    let _ = writeln!(block, "{INDENT}}}");
    block.push('\n');
    let _ = writeln!(
        block,
        "{INDENT}public function set{accessor}({parameter_type}${field_name}): self"
    );
    let _ = writeln!(block, "{INDENT}{{");
    let _ = writeln!(block, "{INDENT}{INDENT}$this->{field_name} = ${field_name};");
    block.push('\n');
    let _ = writeln!(block, "{INDENT}{INDENT}return $this;");
    let _ = writeln!(block, "{INDENT}}}");
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTITY: &str = r#"<?php

namespace Aaas\Entity;

use Doctrine\ORM\Mapping as ORM;

/**
 * @ORM\Entity(repositoryClass="Aaas\Repository\CustomerRepository")
 */
class Customer
{
    /**
     * @ORM\Id()
     * @ORM\GeneratedValue()
     * @ORM\Column(type="integer")
     */
    private $id;

    public function getId(): ?int
    {
        return $this->id;
    }
}
"#;

    fn manipulator() -> ClassSourceManipulator {
        ClassSourceManipulator::new().unwrap()
    }

    fn email() -> FieldOptions {
        FieldOptions {
            unique: Some(true),
            length: Some(180),
            ..FieldOptions::new("email", "string")
        }
    }

    #[test]
    fn test_append_string_field() {
        let code = manipulator().append_field(ENTITY, "email", &email()).unwrap();

        let expected_property = "    private $id;\n\n    /**\n     * @ORM\\Column(type=\"string\", unique=true, length=180)\n     */\n    private $email;\n\n    public function getId()";
        assert!(code.contains(expected_property), "{code}");
        assert!(code.contains("    public function getEmail(): ?string\n    {\n        return $this->email;\n    }\n"));
        assert!(code.contains("    public function setEmail(string $email): self\n"));
        assert!(code.ends_with("        return $this;\n    }\n}\n"));
    }

    #[test]
    fn test_fields_keep_order() {
        let manipulator = manipulator();
        let code = manipulator.append_field(ENTITY, "email", &email()).unwrap();
        let code = manipulator
            .append_field(&code, "age", &FieldOptions::new("age", "integer"))
            .unwrap();

        let email = code.find("private $email;").unwrap();
        let age = code.find("private $age;").unwrap();
        assert!(email < age);
        assert!(code.find("function getEmail").unwrap() < code.find("function getAge").unwrap());
        assert!(code.contains("@ORM\\Column(type=\"integer\")\n"));
        assert!(code.contains("public function setAge(int $age): self"));
    }

    #[test]
    fn test_nullable_setter_hint() {
        let options = FieldOptions {
            nullable: Some(true),
            ..FieldOptions::new("birthday", "date")
        };
        let code = manipulator().append_field(ENTITY, "birthday", &options).unwrap();
        assert!(code.contains("@ORM\\Column(type=\"date\", nullable=true)"));
        assert!(code.contains("public function getBirthday(): ?\\DateTimeInterface"));
        assert!(code.contains("public function setBirthday(?\\DateTimeInterface $birthday): self"));
    }

    #[test]
    fn test_untyped_accessors() {
        let code = manipulator()
            .append_field(ENTITY, "payload", &FieldOptions::new("payload", "blob"))
            .unwrap();
        assert!(code.contains("public function getPayload()\n"));
        assert!(code.contains("public function setPayload($payload): self"));
    }

    #[test]
    fn test_snake_case_accessors() {
        let code = manipulator()
            .append_field(ENTITY, "created_at", &FieldOptions::new("created_at", "datetime_immutable"))
            .unwrap();
        assert!(code.contains("public function getCreatedAt(): ?\\DateTimeImmutable"));
        assert!(code.contains("$this->created_at = $created_at;"));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let manipulator = manipulator();
        let code = manipulator.append_field(ENTITY, "email", &email()).unwrap();

        let err = manipulator.append_field(&code, "email", &email()).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateField(ref name) if name == "email"));

        let err = manipulator
            .append_field(ENTITY, "id", &FieldOptions::new("id", "integer"))
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateField(_)));
    }

    #[test]
    fn test_colliding_accessor_rejected() {
        let manipulator = manipulator();
        let code = manipulator
            .append_field(ENTITY, "created_at", &FieldOptions::new("created_at", "datetime"))
            .unwrap();

        let err = manipulator
            .append_field(&code, "createdAt", &FieldOptions::new("createdAt", "datetime"))
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::DuplicateAccessor { ref field, ref method }
                if field == "createdAt" && method == "getCreatedAt"
        ));
        assert_eq!(code.matches("function getCreatedAt(").count(), 1);
    }

    #[test]
    fn test_accessor_lookup_ignores_case() {
        let manipulator = manipulator();
        assert!(manipulator.declares_method(ENTITY, "getId").unwrap());
        assert!(manipulator.declares_method(ENTITY, "GETID").unwrap());
        assert!(!manipulator.declares_method(ENTITY, "getIdentifier").unwrap());

        let result = manipulator.append_field(ENTITY, "ID", &FieldOptions::new("ID", "integer"));
        assert!(matches!(result, Err(BuildError::DuplicateAccessor { .. })));
    }

    #[test]
    fn test_prefix_name_is_not_duplicate() {
        let manipulator = manipulator();
        let code = manipulator.append_field(ENTITY, "email", &email()).unwrap();
        assert!(manipulator
            .append_field(&code, "emailVerified", &FieldOptions::new("emailVerified", "boolean"))
            .is_ok());
    }

    #[test]
    fn test_empty_class_body() {
        let source = "<?php\n\nclass Note\n{\n}\n";
        let code = manipulator()
            .append_field(source, "title", &FieldOptions::new("title", "text"))
            .unwrap();
        assert!(code.starts_with(
            "<?php\n\nclass Note\n{\n    /**\n     * @ORM\\Column(type=\"text\")\n     */\n    private $title;\n\n    public function getTitle(): ?string\n"
        ));
        assert!(code.ends_with("    }\n}\n"));
    }

    #[test]
    fn test_invalid_field_name() {
        let result = manipulator().append_field(ENTITY, "first-name", &FieldOptions::new("first-name", "string"));
        assert!(matches!(result, Err(BuildError::InvalidFieldName(_))));
    }

    #[test]
    fn test_source_without_class() {
        let result = manipulator().append_field("<?php\n\nfunction helper() {}\n", "email", &email());
        assert!(matches!(result, Err(BuildError::MalformedSource)));
    }

    #[test]
    fn test_type_hints() {
        assert_eq!(type_hint("integer"), Some("int"));
        assert_eq!(type_hint("smallint"), Some("int"));
        assert_eq!(type_hint("boolean"), Some("bool"));
        assert_eq!(type_hint("decimal"), Some("string"));
        assert_eq!(type_hint("simple_array"), Some("array"));
        assert_eq!(type_hint("dateinterval"), Some("\\DateInterval"));
        assert_eq!(type_hint("date_immutable"), Some("\\DateTimeImmutable"));
    }
}
