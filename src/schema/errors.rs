//! Validation failure details
//!
//! One [`ValidationDetails`] is produced per failed field. The message is
//! client-facing; the field path is kept for logs and tests.

use std::fmt;

use serde_json::Value;

/// A single failed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field path (e.g., "location.city")
    pub field: String,
    /// Client-facing message
    pub message: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Missing field without a custom message
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("Path `{}` is required.", field);
        Self { field, message }
    }

    /// Value could not be cast to the declared type
    pub fn cast_failed(field: impl Into<String>, type_name: &str, value: &Value) -> Self {
        let field = field.into();
        let message = format!(
            "Cast to {} failed for value {} at path \"{}\"",
            type_name, value, field
        );
        Self { field, message }
    }

    /// Value is not one of the allowed enumeration members
    pub fn not_allowed(field: impl Into<String>, value: &str) -> Self {
        let field = field.into();
        let message = format!("`{}` is not a valid value for path `{}`.", value, field);
        Self { field, message }
    }

    /// Attempt to change an immutable field
    pub fn immutable(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("Path `{}` is immutable.", field);
        Self { field, message }
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Join messages the way they are reported to clients
pub fn join_messages(details: &[ValidationDetails]) -> String {
    details
        .iter()
        .map(|d| d.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_field_message() {
        let details = ValidationDetails::missing_field("careers");
        assert_eq!(details.to_string(), "Path `careers` is required.");
    }

    #[test]
    fn test_cast_message_names_path() {
        let details = ValidationDetails::cast_failed("tuition", "Number", &json!("lots"));
        assert_eq!(details.field, "tuition");
        assert!(details.message.contains("\"lots\""));
        assert!(details.message.contains("Number"));
    }

    #[test]
    fn test_join_messages() {
        let joined = join_messages(&[
            ValidationDetails::new("name", "Please add a name"),
            ValidationDetails::new("address", "Please add an address"),
        ]);
        assert_eq!(joined, "Please add a name, Please add an address");
    }
}
