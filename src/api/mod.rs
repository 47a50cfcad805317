//! # API Layer
//!
//! Request-to-resource resolution for bootcamps and courses.
//!
//! # Request flow
//!
//! 1. The router matches method and path
//! 2. Listing handlers build a [`ReadSpec`] from the query string
//! 3. Handlers resolve the request against the [`DocumentStore`](crate::store::DocumentStore)
//! 4. Success is wrapped in an [`Envelope`]; any failure becomes an
//!    [`ApiError`], whose `IntoResponse` is the only error rendering path

pub mod bootcamps;
pub mod courses;
mod errors;
mod extract;
mod listing;
mod query;
mod response;
mod routes;
mod state;

pub use errors::{ApiError, ApiResult, INTERNAL_MESSAGE};
pub use extract::JsonBody;
pub use query::{Populate, QueryError, ReadSpec, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use response::{Envelope, ErrorEnvelope, PageRef, Pagination};
pub use routes::{resource_routes, router};
pub use state::AppState;
