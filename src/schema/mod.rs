//! Document schemas enforced by the store at write time.
//!
//! # Design Principles
//!
//! - Every insert and update validates the full resulting document
//! - All failed fields are reported at once, one message each
//! - Casts are limited to unambiguous conversions (numeric strings, etc.)

mod errors;
mod resources;
mod types;
mod validator;

pub use errors::{join_messages, ValidationDetails};
pub use resources::{bootcamp_schema, course_schema, CAREERS, SKILL_LEVELS};
pub use types::{FieldDef, FieldType, Rule, Schema};
pub use validator::SchemaValidator;

pub(crate) use validator::parse_number;
