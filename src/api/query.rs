//! # Query Builder
//!
//! Turns list-endpoint query parameters into an immutable [`ReadSpec`].
//!
//! - `select=a,b` keeps those fields plus `_id`
//! - `sort=a,-b` sorts ascending / descending (default `-createdAt`)
//! - `page` / `limit` paginate (defaults 1 / 25)
//! - every other key is a filter: `field=value` or `field[op]=value` with
//!   `op` one of `eq`, `gt`, `gte`, `lt`, `lte`, `in`

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use thiserror::Error;

use super::response::{PageRef, Pagination};
use crate::schema::{parse_number, FieldType, Schema};
use crate::store::{Collection, Filter, FilterExpr, FilterOperator, FindOptions, SortKey, CREATED_AT_FIELD};

/// Page used when `page` is absent or unusable
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when `limit` is absent or unusable
pub const DEFAULT_LIMIT: usize = 25;

/// Keys that shape the read rather than filter it
pub const RESERVED_KEYS: [&str; 4] = ["select", "sort", "page", "limit"];

/// Query parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Unknown bracket operator
    #[error("Invalid filter operator '{operator}' on field '{field}'")]
    InvalidOperator { field: String, operator: String },

    /// Malformed filter key or value
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Malformed `select` / `sort`
    #[error("Invalid query parameter: {0}")]
    InvalidParam(String),
}

/// Related records attached to each listed document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Populate {
    /// Bootcamps get their `courses`
    Courses,
    /// Courses get a summary of their `bootcamp`
    Bootcamp,
}

impl Populate {
    pub fn field(&self) -> &'static str {
        match self {
            Populate::Courses => "courses",
            Populate::Bootcamp => "bootcamp",
        }
    }

    fn for_collection(collection: Collection) -> Self {
        match collection {
            Collection::Bootcamps => Populate::Courses,
            Collection::Courses => Populate::Bootcamp,
        }
    }
}

/// Normalized read of one listing request
#[derive(Debug, Clone, PartialEq)]
pub struct ReadSpec {
    pub filter: Filter,
    /// Fields to keep (None = all)
    pub select: Option<Vec<String>>,
    pub sort: Vec<SortKey>,
    pub page: usize,
    pub limit: usize,
    pub populate: Populate,
}

impl ReadSpec {
    /// Build the read specification for a listing of `collection`.
    ///
    /// Filter values are cast to the declared type of the field they target;
    /// fields the schema does not declare get a best-effort inference.
    pub fn parse(collection: Collection, params: &HashMap<String, String>) -> Result<Self, QueryError> {
        let schema = collection.schema();

        // Sorted for a deterministic predicate order
        let ordered: BTreeMap<&str, &str> = params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

        let mut filter = Filter::new();
        for (key, value) in &ordered {
            if RESERVED_KEYS.contains(key) {
                continue;
            }
            filter = filter.and(parse_filter(schema, key, value)?);
        }

        let select = ordered.get("select").map(|v| parse_select(v)).transpose()?;
        let sort = match ordered.get("sort") {
            Some(v) => parse_sort(v)?,
            None => vec![SortKey::desc(CREATED_AT_FIELD)],
        };

        Ok(Self {
            filter,
            select,
            sort,
            page: parse_positive(ordered.get("page").copied(), DEFAULT_PAGE),
            limit: parse_positive(ordered.get("limit").copied(), DEFAULT_LIMIT),
            populate: Populate::for_collection(collection),
        })
    }

    pub fn skip(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Store read options for the current page
    pub fn find_options(&self) -> FindOptions {
        FindOptions {
            sort: self.sort.clone(),
            skip: self.skip(),
            limit: Some(self.limit),
            projection: self.select.clone(),
        }
    }

    /// Whether related records are attached (always, unless `select` omits them)
    pub fn populates(&self) -> bool {
        match &self.select {
            None => true,
            Some(fields) => fields.iter().any(|f| f == self.populate.field()),
        }
    }

    /// Pagination metadata given the filter's total match count
    pub fn pagination(&self, total: usize) -> Pagination {
        let skip = self.skip();
        Pagination {
            page: self.page,
            limit: self.limit,
            total,
            prev: (skip > 0).then(|| PageRef {
                page: self.page - 1,
                limit: self.limit,
            }),
            next: (skip.saturating_add(self.limit) < total).then(|| PageRef {
                page: self.page + 1,
                limit: self.limit,
            }),
        }
    }
}

/// Parse select parameter (comma-separated field list)
fn parse_select(value: &str) -> Result<Vec<String>, QueryError> {
    let fields: Vec<String> = value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if fields.is_empty() {
        return Err(QueryError::InvalidParam("select cannot be empty".to_string()));
    }

    Ok(fields)
}

/// Parse sort parameter (comma-separated, `-` prefix for descending)
fn parse_sort(value: &str) -> Result<Vec<SortKey>, QueryError> {
    let mut keys = Vec::new();

    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let key = match part.strip_prefix('-') {
            Some(field) => SortKey::desc(field.trim()),
            None => SortKey::asc(part),
        };
        if key.field.is_empty() {
            return Err(QueryError::InvalidParam(format!("Invalid sort: {}", value)));
        }
        keys.push(key);
    }

    if keys.is_empty() {
        return Err(QueryError::InvalidParam("sort cannot be empty".to_string()));
    }

    Ok(keys)
}

/// Positive integer or the default
fn parse_positive(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(default)
}

/// Parse `field` / `field[op]` with its value
fn parse_filter(schema: &Schema, key: &str, value: &str) -> Result<FilterExpr, QueryError> {
    let (field, operator) = match key.find('[') {
        None => (key, FilterOperator::Eq),
        Some(open) => {
            let op = key[open + 1..]
                .strip_suffix(']')
                .ok_or_else(|| QueryError::InvalidFilter(format!("malformed filter key '{}'", key)))?;
            let operator = FilterOperator::parse(op).ok_or_else(|| QueryError::InvalidOperator {
                field: key[..open].to_string(),
                operator: op.to_string(),
            })?;
            (&key[..open], operator)
        }
    };

    if field.is_empty() {
        return Err(QueryError::InvalidFilter(format!("missing field name in '{}'", key)));
    }

    let value = if operator == FilterOperator::In {
        let items = value
            .split(',')
            .map(|item| coerce_value(schema, field, item.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Value::Array(items)
    } else {
        coerce_value(schema, field, value)?
    };

    Ok(FilterExpr::new(field, operator, value))
}

/// Cast a raw filter value to the type of the field it targets
fn coerce_value(schema: &Schema, field: &str, raw: &str) -> Result<Value, QueryError> {
    match schema.get(field).map(|def| def.field_type) {
        Some(FieldType::String | FieldType::StringArray | FieldType::Reference) => Ok(Value::String(raw.to_string())),
        Some(FieldType::Number) => parse_number(raw.trim()).ok_or_else(|| {
            QueryError::InvalidFilter(format!("'{}' is not a number for field '{}'", raw, field))
        }),
        Some(FieldType::Bool) => match raw.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(QueryError::InvalidFilter(format!(
                "'{}' is not a boolean for field '{}'",
                raw, field
            ))),
        },
        _ => Ok(infer_value(raw)),
    }
}

/// Best-effort typing for undeclared or nested fields
fn infer_value(value: &str) -> Value {
    match value {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    // Keep codes like "02118" as strings
    let leading_zero = value.len() > 1 && value.starts_with('0') && !value.starts_with("0.");
    if !leading_zero {
        if let Some(number) = parse_number(value) {
            return number;
        }
    }

    Value::String(value.to_string())
}
