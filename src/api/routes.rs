//! # Router
//!
//! Method + path to handler. Courses are reachable nested under their
//! bootcamp (`/bootcamps/{id}/courses`) and top-level (`/courses`).

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use super::errors::ApiError;
use super::state::AppState;
use super::{bootcamps, courses};

/// Resource routes, relative to the API prefix
pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/bootcamps", get(bootcamps::list_handler).post(bootcamps::create_handler))
        .route("/bootcamps/radius/{zipcode}/{distance}", get(bootcamps::radius_handler))
        .route(
            "/bootcamps/{id}",
            get(bootcamps::get_handler)
                .put(bootcamps::update_handler)
                .delete(bootcamps::delete_handler),
        )
        .route(
            "/bootcamps/{id}/courses",
            get(courses::nested_list_handler).post(courses::create_handler),
        )
        .route("/courses", get(courses::list_handler))
        .route(
            "/courses/{id}",
            get(courses::get_handler)
                .put(courses::update_handler)
                .delete(courses::delete_handler),
        )
        .method_not_allowed_fallback(method_not_allowed)
}

/// Full application router: `/health`, the resources under `prefix`,
/// and enveloped 404 / 405 for everything else
pub fn router(state: AppState, prefix: &str) -> Router {
    let prefix = prefix.trim_end_matches('/');
    let app = Router::new().route("/health", get(health));

    let app = if prefix.is_empty() {
        app.merge(resource_routes())
    } else {
        app.nest(prefix, resource_routes())
    };

    app.fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
