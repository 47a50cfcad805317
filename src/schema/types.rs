//! Schema type definitions
//!
//! Supported types:
//! - string: UTF-8 string (numbers and booleans are cast)
//! - number: 64-bit float (numeric strings are cast)
//! - bool: Boolean ("true"/"false" strings are cast)
//! - reference: id of a document in another collection
//! - string array: array of strings (a lone string is wrapped)
//! - object: free-form nested object

use regex::Regex;
use serde_json::Value;

/// Declared field types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Bool,
    Reference,
    StringArray,
    Object,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Number => "Number",
            FieldType::Bool => "Boolean",
            FieldType::Reference => "ObjectId",
            FieldType::StringArray => "[String]",
            FieldType::Object => "Object",
        }
    }
}

/// A constraint paired with its failure message
#[derive(Debug, Clone)]
pub struct Rule<T> {
    pub limit: T,
    pub message: String,
}

impl<T> Rule<T> {
    fn new(limit: T, message: impl Into<String>) -> Self {
        Self {
            limit,
            message: message.into(),
        }
    }
}

/// Field definition
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub field_type: FieldType,
    /// Required, with the message reported when missing
    pub required: Option<String>,
    /// Trim surrounding whitespace before validation
    pub trim: bool,
    pub max_length: Option<Rule<usize>>,
    pub pattern: Option<Rule<Regex>>,
    /// Allowed values (applied per element for string arrays)
    pub one_of: Option<Vec<&'static str>>,
    pub min: Option<Rule<f64>>,
    pub max: Option<Rule<f64>>,
    pub unique: bool,
    /// Value inserted when the field is absent
    pub default: Option<Value>,
}

impl FieldDef {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: None,
            trim: false,
            max_length: None,
            pattern: None,
            one_of: None,
            min: None,
            max: None,
            unique: false,
            default: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Bool)
    }

    pub fn reference() -> Self {
        Self::new(FieldType::Reference)
    }

    pub fn string_array() -> Self {
        Self::new(FieldType::StringArray)
    }

    pub fn object() -> Self {
        Self::new(FieldType::Object)
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn max_length(mut self, limit: usize, message: impl Into<String>) -> Self {
        self.max_length = Some(Rule::new(limit, message));
        self
    }

    pub fn pattern(mut self, regex: Regex, message: impl Into<String>) -> Self {
        self.pattern = Some(Rule::new(regex, message));
        self
    }

    pub fn one_of(mut self, values: &[&'static str]) -> Self {
        self.one_of = Some(values.to_vec());
        self
    }

    pub fn min(mut self, limit: f64, message: impl Into<String>) -> Self {
        self.min = Some(Rule::new(limit, message));
        self
    }

    pub fn max(mut self, limit: f64, message: impl Into<String>) -> Self {
        self.max = Some(Rule::new(limit, message));
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// An ordered set of field definitions for one collection
#[derive(Debug, Clone)]
pub struct Schema {
    /// Resource name used in messages (e.g., "Bootcamp")
    pub name: &'static str,
    fields: Vec<(&'static str, FieldDef)>,
}

impl Schema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: &'static str, def: FieldDef) -> Self {
        self.fields.push((name, def));
        self
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldDef)> {
        self.fields.iter().map(|(name, def)| (*name, def))
    }

    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, def)| def)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|(_, def)| def.unique)
            .map(|(name, _)| *name)
    }
}
