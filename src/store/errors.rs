//! # Store Errors
//!
//! Raw persistence outcomes, shaped like the errors of a document database
//! driver. The API layer decides what clients see.

use thiserror::Error;

use crate::schema::{join_messages, ValidationDetails};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// An identifier that cannot be cast to a document id
    #[error("Cast to ObjectId failed for value \"{0}\"")]
    InvalidId(String),

    /// Schema validation failed on one or more fields
    #[error("Validation failed: {}", join_messages(.0))]
    Validation(Vec<ValidationDetails>),

    /// Unique index violation
    #[error("E11000 duplicate key error collection: {collection} index: {field} dup key: {value}")]
    DuplicateKey {
        collection: String,
        field: String,
        value: String,
    },

    /// A reference field naming a document that is not stored
    #[error("Referenced document not found: {field} = {id}")]
    MissingReference { field: String, id: String },

    /// Backend failure (poisoned lock, I/O, ...)
    #[error("Store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn validation(details: ValidationDetails) -> Self {
        StoreError::Validation(vec![details])
    }
}
