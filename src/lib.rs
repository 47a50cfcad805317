//! devcamp - bootcamp and course directory API
//!
//! Layers, leaf-first:
//! - `schema`: field rules enforced on every write
//! - `store`: document persistence with relationship hooks
//! - `geocoder`: address to coordinates
//! - `api`: query building, handlers, routing, error normalization
//! - `http_server`, `config`, `telemetry`, `seed`, `cli`: process plumbing

pub mod api;
pub mod cli;
pub mod config;
pub mod geocoder;
pub mod http_server;
pub mod schema;
pub mod seed;
pub mod store;
pub mod telemetry;
