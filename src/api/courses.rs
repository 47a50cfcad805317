//! # Course Handlers
//!
//! CRUD over the `courses` collection. Courses are created under their
//! bootcamp (`/bootcamps/{id}/courses`) and read either nested or top-level.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use super::extract::JsonBody;
use super::listing::{attach_bootcamp_summaries, courses_of, read_page, PARENT_FIELD};
use super::query::ReadSpec;
use super::response::Envelope;
use super::state::AppState;
use crate::store::{parse_id, Collection, Document, ID_FIELD};

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("No course with the id of {}", id))
}

async fn find_course(state: &AppState, id: &str) -> ApiResult<Document> {
    state
        .store
        .find_by_id(Collection::Courses, id)
        .await?
        .ok_or_else(|| not_found(id))
}

// ==================
// Operations
// ==================

/// Every course of one bootcamp, unpaginated
pub async fn list_bootcamp_courses(state: &AppState, bootcamp_id: &str) -> ApiResult<Vec<Document>> {
    let bootcamp_id = parse_id(bootcamp_id)?;
    courses_of(state.store.as_ref(), &bootcamp_id).await
}

/// One page of courses, each with its bootcamp summary unless `select` omits it
pub async fn list_courses(state: &AppState, spec: &ReadSpec) -> ApiResult<Envelope<Vec<Document>>> {
    let (mut courses, pagination) = read_page(state.store.as_ref(), Collection::Courses, spec).await?;
    if spec.populates() {
        attach_bootcamp_summaries(state.store.as_ref(), &mut courses).await?;
    }
    Ok(Envelope::page(courses, pagination))
}

/// A course with its bootcamp's `{_id, name, description}`
pub async fn get_course(state: &AppState, id: &str) -> ApiResult<Document> {
    let course = find_course(state, id).await?;
    let mut populated = [course];
    attach_bootcamp_summaries(state.store.as_ref(), &mut populated).await?;
    let [course] = populated;
    Ok(course)
}

/// Store a course under an existing bootcamp
pub async fn create_course(state: &AppState, bootcamp_id: &str, mut body: Document) -> ApiResult<Document> {
    let parent = state.store.find_by_id(Collection::Bootcamps, bootcamp_id).await?;
    let Some(parent) = parent else {
        return Err(ApiError::NotFound(format!(
            "No bootcamp with the id of {}",
            bootcamp_id
        )));
    };

    let parent_id = parent.get(ID_FIELD).cloned().unwrap_or(Value::Null);
    body.insert(PARENT_FIELD.to_string(), parent_id);

    let created = state.store.insert(Collection::Courses, body).await?;
    tracing::info!(id = ?created.get(ID_FIELD), bootcamp = bootcamp_id, "course created");
    Ok(created)
}

/// Apply the supplied fields; a reassigned `bootcamp` must already be stored
pub async fn update_course(state: &AppState, id: &str, patch: Document) -> ApiResult<Document> {
    find_course(state, id).await?;

    state
        .store
        .update_by_id(Collection::Courses, id, patch)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn delete_course(state: &AppState, id: &str) -> ApiResult<Document> {
    find_course(state, id).await?;

    let removed = state
        .store
        .remove(Collection::Courses, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id, "course deleted");
    Ok(removed)
}

// ==================
// HTTP handlers
// ==================

pub async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Envelope<Vec<Document>>>> {
    let spec = ReadSpec::parse(Collection::Courses, &params)?;
    Ok(Json(list_courses(&state, &spec).await?))
}

pub async fn nested_list_handler(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<Document>>>> {
    let courses = list_bootcamp_courses(&state, &bootcamp_id).await?;
    Ok(Json(Envelope::list(courses)))
}

pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Document>>> {
    Ok(Json(Envelope::new(get_course(&state, &id).await?)))
}

pub async fn create_handler(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<String>,
    JsonBody(mut body): JsonBody,
) -> ApiResult<(StatusCode, Json<Envelope<Document>>)> {
    body.remove(ID_FIELD);
    let created = create_course(&state, &bootcamp_id, body).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(created))))
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Envelope<Document>>> {
    Ok(Json(Envelope::new(update_course(&state, &id, body).await?)))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Document>>> {
    Ok(Json(Envelope::new(delete_course(&state, &id).await?)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::bootcamps::create_bootcamp;
    use crate::geocoder::{GeoLocation, StaticGeocoder};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn with_bootcamp() -> (AppState, String) {
        let geocoder = StaticGeocoder::new().with("Boston MA", GeoLocation::new(42.36, -71.06));
        let state = AppState::in_memory(Arc::new(geocoder));
        let bootcamp = create_bootcamp(
            &state,
            doc(json!({
                "name": "Devworks",
                "description": "Full stack training",
                "address": "Boston MA",
                "careers": ["Web Development"]
            })),
        )
        .await
        .unwrap();
        let id = bootcamp["_id"].as_str().unwrap().to_string();
        (state, id)
    }

    fn course(title: &str, tuition: i64) -> Document {
        doc(json!({
            "title": title,
            "description": "Learn it",
            "weeks": "8",
            "tuition": tuition,
            "minimumSkill": "beginner"
        }))
    }

    #[tokio::test]
    async fn test_create_injects_parent() {
        let (state, bootcamp_id) = with_bootcamp().await;

        let mut body = course("Front End", 8000);
        body.insert("bootcamp".to_string(), json!(uuid::Uuid::new_v4().to_string()));
        let created = create_course(&state, &bootcamp_id, body).await.unwrap();

        assert_eq!(created["bootcamp"], json!(bootcamp_id));
        assert_eq!(created["scholarshipAvailable"], json!(false));
    }

    #[tokio::test]
    async fn test_create_requires_existing_parent() {
        let (state, _) = with_bootcamp().await;
        let missing = uuid::Uuid::new_v4().to_string();

        let err = create_course(&state, &missing, course("Front End", 8000))
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), format!("No bootcamp with the id of {}", missing));
    }

    #[tokio::test]
    async fn test_get_populates_bootcamp_summary() {
        let (state, bootcamp_id) = with_bootcamp().await;
        let created = create_course(&state, &bootcamp_id, course("Front End", 8000)).await.unwrap();

        let fetched = get_course(&state, created["_id"].as_str().unwrap()).await.unwrap();
        assert_eq!(
            fetched["bootcamp"],
            json!({"_id": bootcamp_id, "name": "Devworks", "description": "Full stack training"})
        );
    }

    #[tokio::test]
    async fn test_nested_list_and_delete() {
        let (state, bootcamp_id) = with_bootcamp().await;
        let first = create_course(&state, &bootcamp_id, course("Front End", 8000)).await.unwrap();
        create_course(&state, &bootcamp_id, course("Back End", 9000)).await.unwrap();

        assert_eq!(list_bootcamp_courses(&state, &bootcamp_id).await.unwrap().len(), 2);

        let id = first["_id"].as_str().unwrap();
        delete_course(&state, id).await.unwrap();
        assert!(matches!(delete_course(&state, id).await, Err(ApiError::NotFound(_))));
        assert_eq!(list_bootcamp_courses(&state, &bootcamp_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_validates_result() {
        let (state, bootcamp_id) = with_bootcamp().await;
        let created = create_course(&state, &bootcamp_id, course("Front End", 8000)).await.unwrap();
        let id = created["_id"].as_str().unwrap();

        let updated = update_course(&state, id, doc(json!({"tuition": 9500}))).await.unwrap();
        assert_eq!(updated["tuition"], json!(9500));
        assert_eq!(updated["title"], json!("Front End"));

        let err = update_course(&state, id, doc(json!({"minimumSkill": "expert"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_nested_list_rejects_malformed_id() {
        let (state, _) = with_bootcamp().await;
        let err = list_bootcamp_courses(&state, "not-an-id").await.unwrap_err();
        assert_eq!(err.client_message(), "Resource not found with id of not-an-id");
    }
}
