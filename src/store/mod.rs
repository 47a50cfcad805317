//! # Resource Store
//!
//! Persistence abstraction over the `bootcamps` and `courses` collections.
//! Documents are JSON objects identified by `_id` (a UUID string).
//!
//! Stores own all persisted state. Every write validates the full resulting
//! document against the collection schema and runs the relationship hooks
//! (cascade on bootcamp removal, course cost aggregation) atomically with it.

pub mod errors;
pub mod filter;
pub mod geo;
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::schema::{bootcamp_schema, course_schema, Schema};

pub use errors::{StoreError, StoreResult};
pub use filter::{Filter, FilterExpr, FilterOperator, Predicate};
pub use geo::{GeoPoint, GeoWithin};
pub use memory::InMemoryStore;

/// A stored document
pub type Document = Map<String, Value>;

/// Identity field of every document
pub const ID_FIELD: &str = "_id";

/// Creation timestamp field of every document
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Collections known to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Bootcamps,
    Courses,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Bootcamps => "bootcamps",
            Collection::Courses => "courses",
        }
    }

    pub fn schema(&self) -> &'static Schema {
        match self {
            Collection::Bootcamps => bootcamp_schema(),
            Collection::Courses => course_schema(),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sort clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }
}

/// Everything about a read except the filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Vec<SortKey>,
    pub skip: usize,
    /// `None` = unbounded
    pub limit: Option<usize>,
    /// Fields to keep besides `_id` (`None` = all)
    pub projection: Option<Vec<String>>,
}

/// Storage backend for the API
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents matching `filter`, shaped by `options`
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// Number of documents matching `filter`, ignoring pagination
    async fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<usize>;

    /// Document by id; `InvalidId` if `id` is malformed
    async fn find_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;

    /// Validate and insert, returning the stored document
    async fn insert(&self, collection: Collection, doc: Document) -> StoreResult<Document>;

    /// Merge `patch` into the document, re-validate and store it.
    /// Returns the post-update document, `None` if absent.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: Document,
    ) -> StoreResult<Option<Document>>;

    /// Remove one document, running removal hooks. Returns what was removed.
    async fn remove(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;
}

/// Parse a document id, normalizing its representation
pub fn parse_id(id: &str) -> StoreResult<String> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// The `_id` of a document, if present
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}
