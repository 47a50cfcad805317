//! # Filter Expression AST
//!
//! Predicates evaluated against stored documents. Field names may be dotted
//! paths into nested objects (`location.state`).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::geo::{GeoPoint, GeoWithin};
use super::Document;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    /// Equals (array fields match when they contain the value)
    Eq,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Value in list
    In,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::In => "in",
        }
    }

    /// Parse an operator name, `None` if unknown
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(FilterOperator::Eq),
            "gt" => Some(FilterOperator::Gt),
            "gte" => Some(FilterOperator::Gte),
            "lt" => Some(FilterOperator::Lt),
            "lte" => Some(FilterOperator::Lte),
            "in" => Some(FilterOperator::In),
            _ => None,
        }
    }
}

/// A single field comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpr {
    /// Field to filter on
    pub field: String,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Value to compare against
    pub value: Value,
}

impl FilterExpr {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    /// Create a greater than filter
    pub fn gt(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Gt, value)
    }

    /// Create an "in list" filter
    pub fn in_list(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, FilterOperator::In, Value::Array(values))
    }

    /// Check if a document matches this filter
    pub fn matches(&self, doc: &Document) -> bool {
        let field_value = match lookup(doc, &self.field) {
            Some(v) => v,
            // A missing field only equals null
            None => return self.operator == FilterOperator::Eq && self.value.is_null(),
        };

        // Array fields match when any element matches
        if let Value::Array(items) = field_value {
            let whole_array_eq = self.operator == FilterOperator::Eq && self.value.is_array();
            if !whole_array_eq {
                return items.iter().any(|item| self.matches_scalar(item));
            }
        }

        self.matches_scalar(field_value)
    }

    fn matches_scalar(&self, field_value: &Value) -> bool {
        let ordering = || compare_json_values(field_value, &self.value);
        match self.operator {
            FilterOperator::Eq => values_equal(field_value, &self.value),
            FilterOperator::Gt => ordering() == Some(Ordering::Greater),
            FilterOperator::Gte => matches!(ordering(), Some(Ordering::Greater | Ordering::Equal)),
            FilterOperator::Lt => ordering() == Some(Ordering::Less),
            FilterOperator::Lte => matches!(ordering(), Some(Ordering::Less | Ordering::Equal)),
            FilterOperator::In => match self.value.as_array() {
                Some(candidates) => candidates.iter().any(|c| values_equal(field_value, c)),
                None => false,
            },
        }
    }
}

/// One conjunct of a [`Filter`]
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Field(FilterExpr),
    GeoWithin(GeoWithin),
}

impl Predicate {
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Predicate::Field(expr) => expr.matches(doc),
            Predicate::GeoWithin(cap) => lookup(doc, &cap.field)
                .and_then(GeoPoint::from_geojson)
                .is_some_and(|point| cap.contains(&point)),
        }
    }
}

/// A set of predicates combined with AND logic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, expr: FilterExpr) -> Self {
        self.predicates.push(Predicate::Field(expr));
        self
    }

    pub fn within(mut self, cap: GeoWithin) -> Self {
        self.predicates.push(Predicate::GeoWithin(cap));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Check if a document matches all predicates
    pub fn matches(&self, doc: &Document) -> bool {
        self.predicates.iter().all(|p| p.matches(doc))
    }
}

/// Resolve a dotted path inside a document
pub fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Equality with numbers compared by value (`5` equals `5.0`)
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare_json_values(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}

/// Compare two JSON values of the same kind; `None` across kinds
pub fn compare_json_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test documents must be objects"),
        }
    }

    #[test]
    fn test_eq_filter() {
        let filter = FilterExpr::eq("name", json!("Devworks"));

        assert!(filter.matches(&doc(json!({"name": "Devworks"}))));
        assert!(!filter.matches(&doc(json!({"name": "ModernTech"}))));
    }

    #[test]
    fn test_eq_compares_numbers_by_value() {
        let filter = FilterExpr::eq("tuition", json!(8000));
        assert!(filter.matches(&doc(json!({"tuition": 8000.0}))));
    }

    #[test]
    fn test_gt_filter() {
        let filter = FilterExpr::gt("averageCost", json!(10000));

        assert!(filter.matches(&doc(json!({"averageCost": 12000}))));
        assert!(!filter.matches(&doc(json!({"averageCost": 10000}))));
        assert!(!filter.matches(&doc(json!({"averageCost": "12000"}))));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let gte = FilterExpr::new("weeks", FilterOperator::Gte, json!(8));
        let lte = FilterExpr::new("weeks", FilterOperator::Lte, json!(8));
        let d = doc(json!({"weeks": 8}));
        assert!(gte.matches(&d));
        assert!(lte.matches(&d));
    }

    #[test]
    fn test_eq_on_array_field_checks_membership() {
        let filter = FilterExpr::eq("careers", json!("Business"));

        assert!(filter.matches(&doc(json!({"careers": ["Web Development", "Business"]}))));
        assert!(!filter.matches(&doc(json!({"careers": ["UI/UX"]}))));
    }

    #[test]
    fn test_in_filter() {
        let filter = FilterExpr::in_list("location.state", vec![json!("MA"), json!("VT")]);

        assert!(filter.matches(&doc(json!({"location": {"state": "MA"}}))));
        assert!(!filter.matches(&doc(json!({"location": {"state": "NY"}}))));
        assert!(!filter.matches(&doc(json!({"name": "no location"}))));
    }

    #[test]
    fn test_in_filter_on_array_field() {
        let filter = FilterExpr::in_list("careers", vec![json!("Business"), json!("Other")]);
        assert!(filter.matches(&doc(json!({"careers": ["UI/UX", "Other"]}))));
        assert!(!filter.matches(&doc(json!({"careers": ["UI/UX"]}))));
    }

    #[test]
    fn test_missing_field_equals_null_only() {
        assert!(FilterExpr::eq("phone", Value::Null).matches(&doc(json!({}))));
        assert!(!FilterExpr::eq("phone", json!("555")).matches(&doc(json!({}))));
    }

    #[test]
    fn test_geo_predicate() {
        let cap = GeoWithin::new("location", GeoPoint::new(-71.06, 42.36), 10.0 / 3963.0);
        let filter = Filter::new().within(cap);

        let inside = doc(json!({"location": {"type": "Point", "coordinates": [-71.10, 42.35]}}));
        let outside = doc(json!({"location": {"type": "Point", "coordinates": [-74.0, 40.7]}}));
        let unlocated = doc(json!({"name": "x"}));

        assert!(filter.matches(&inside));
        assert!(!filter.matches(&outside));
        assert!(!filter.matches(&unlocated));
    }

    #[test]
    fn test_filter_conjunction() {
        let filter = Filter::new()
            .and(FilterExpr::eq("housing", json!(true)))
            .and(FilterExpr::gt("averageCost", json!(5000)));

        assert!(filter.matches(&doc(json!({"housing": true, "averageCost": 9000}))));
        assert!(!filter.matches(&doc(json!({"housing": false, "averageCost": 9000}))));
        assert!(Filter::new().matches(&doc(json!({}))));
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!(FilterOperator::parse("lte"), Some(FilterOperator::Lte));
        assert_eq!(FilterOperator::parse("like"), None);
        assert_eq!(FilterOperator::Gte.as_str(), "gte");
    }
}
