//! # HTTP Server Module
//!
//! Binds the API router to a TCP listener.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `{api_prefix}/bootcamps/*` - Bootcamps, their courses and radius search
//! - `{api_prefix}/courses/*` - Courses

pub mod config;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{HttpServer, ServerError};
