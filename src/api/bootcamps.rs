//! # Bootcamp Handlers
//!
//! CRUD over the `bootcamps` collection plus the geo-radius search. Writes
//! derive `slug` from `name` and `location` from `address`; clients can
//! never set either directly.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use super::extract::JsonBody;
use super::listing::{attach_courses, read_page};
use super::query::ReadSpec;
use super::response::Envelope;
use super::state::AppState;
use crate::geocoder::{GeoLocation, Geocoder};
use crate::store::geo::radius_from_miles;
use crate::store::{Collection, Document, Filter, FindOptions, GeoWithin, ID_FIELD};

/// Fields computed by the server
const DERIVED_FIELDS: [&str; 3] = ["location", "averageCost", "slug"];

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Bootcamp not found with id of {}", id))
}

/// URL-friendly form of a name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// First geocoder match for `query`; nothing found is a failure
pub(crate) async fn locate(geocoder: &dyn Geocoder, query: &str) -> ApiResult<GeoLocation> {
    geocoder
        .geocode(query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::ExternalService(format!("no location found for '{}'", query)))
}

/// Client fields the derived ones are computed from
const SOURCE_FIELDS: [&str; 2] = ["name", "address"];

/// Store scalar `name` / `address` values as the strings the schema keeps
fn normalize_sources(body: &mut Document) {
    for field in SOURCE_FIELDS {
        let text = match body.get(field) {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => continue,
        };
        body.insert(field.to_string(), Value::String(text));
    }
}

/// Fill `slug` and `location` from the client fields present in `body`
async fn derive_fields(state: &AppState, body: &mut Document) -> ApiResult<()> {
    normalize_sources(body);

    if let Some(name) = body.get("name").and_then(Value::as_str) {
        let slug = slugify(name);
        body.insert("slug".to_string(), Value::String(slug));
    }

    let address = body
        .get("address")
        .and_then(Value::as_str)
        .filter(|a| !a.trim().is_empty())
        .map(str::to_string);
    if let Some(address) = address {
        let location = locate(state.geocoder.as_ref(), &address).await?;
        body.insert("location".to_string(), location.to_geojson());
    }
    Ok(())
}

// ==================
// Operations
// ==================

/// One page of bootcamps, each with its courses unless `select` omits them
pub async fn list_bootcamps(state: &AppState, spec: &ReadSpec) -> ApiResult<Envelope<Vec<Document>>> {
    let (mut bootcamps, pagination) = read_page(state.store.as_ref(), Collection::Bootcamps, spec).await?;
    if spec.populates() {
        attach_courses(state.store.as_ref(), &mut bootcamps).await?;
    }
    Ok(Envelope::page(bootcamps, pagination))
}

pub async fn get_bootcamp(state: &AppState, id: &str) -> ApiResult<Document> {
    state
        .store
        .find_by_id(Collection::Bootcamps, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Validate, geocode and store a new bootcamp.
///
/// A provided `_id` is kept; the HTTP handler strips it beforehand.
pub async fn create_bootcamp(state: &AppState, mut body: Document) -> ApiResult<Document> {
    for field in DERIVED_FIELDS {
        body.remove(field);
    }
    derive_fields(state, &mut body).await?;

    let created = state.store.insert(Collection::Bootcamps, body).await?;
    tracing::info!(id = ?created.get(ID_FIELD), "bootcamp created");
    Ok(created)
}

/// Apply the supplied fields, re-geocoding when `address` changes
pub async fn update_bootcamp(state: &AppState, id: &str, mut patch: Document) -> ApiResult<Document> {
    let existing = get_bootcamp(state, id).await?;

    for field in DERIVED_FIELDS {
        patch.remove(field);
    }
    normalize_sources(&mut patch);
    if patch.get("address").is_some() && patch.get("address") == existing.get("address") {
        patch.remove("address");
    }
    derive_fields(state, &mut patch).await?;

    state
        .store
        .update_by_id(Collection::Bootcamps, id, patch)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Remove a bootcamp (and, through the store, its courses)
pub async fn delete_bootcamp(state: &AppState, id: &str) -> ApiResult<Document> {
    get_bootcamp(state, id).await?;

    let removed = state
        .store
        .remove(Collection::Bootcamps, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id, "bootcamp deleted");
    Ok(removed)
}

/// Bootcamps within `distance` miles of the geocoded `zipcode`
pub async fn bootcamps_in_radius(state: &AppState, zipcode: &str, distance: &str) -> ApiResult<Vec<Document>> {
    let miles: f64 = distance
        .trim()
        .parse()
        .ok()
        .filter(|d: &f64| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid distance '{}'", distance)))?;

    let center = locate(state.geocoder.as_ref(), zipcode).await?.point();
    let filter = Filter::new().within(GeoWithin::new("location", center, radius_from_miles(miles)));

    let found = state
        .store
        .find(Collection::Bootcamps, &filter, &FindOptions::default())
        .await?;
    tracing::debug!(zipcode, miles, found = found.len(), "radius search");
    Ok(found)
}

// ==================
// HTTP handlers
// ==================

pub async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Envelope<Vec<Document>>>> {
    let spec = ReadSpec::parse(Collection::Bootcamps, &params)?;
    Ok(Json(list_bootcamps(&state, &spec).await?))
}

pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Document>>> {
    Ok(Json(Envelope::new(get_bootcamp(&state, &id).await?)))
}

pub async fn create_handler(
    State(state): State<AppState>,
    JsonBody(mut body): JsonBody,
) -> ApiResult<(StatusCode, Json<Envelope<Document>>)> {
    body.remove(ID_FIELD);
    let created = create_bootcamp(&state, body).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(created))))
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Envelope<Document>>> {
    Ok(Json(Envelope::new(update_bootcamp(&state, &id, body).await?)))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Document>>> {
    Ok(Json(Envelope::new(delete_bootcamp(&state, &id).await?)))
}

pub async fn radius_handler(
    State(state): State<AppState>,
    Path((zipcode, distance)): Path<(String, String)>,
) -> ApiResult<Json<Envelope<Vec<Document>>>> {
    let found = bootcamps_in_radius(&state, &zipcode, &distance).await?;
    Ok(Json(Envelope::list(found)))
}
