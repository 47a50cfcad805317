//! Paged reads and related-record population shared by the handlers.

use std::collections::HashMap;

use serde_json::Value;

use super::errors::ApiResult;
use super::query::ReadSpec;
use super::response::Pagination;
use crate::store::{
    document_id, Collection, Document, DocumentStore, Filter, FilterExpr, FindOptions, SortKey,
    CREATED_AT_FIELD, ID_FIELD,
};

/// Field of a course referencing its bootcamp
pub(crate) const PARENT_FIELD: &str = "bootcamp";

/// Bootcamp fields exposed when populated into a course
const SUMMARY_FIELDS: [&str; 2] = ["name", "description"];

/// One page of `collection` plus its pagination metadata
pub(crate) async fn read_page(
    store: &dyn DocumentStore,
    collection: Collection,
    spec: &ReadSpec,
) -> ApiResult<(Vec<Document>, Pagination)> {
    let total = store.count(collection, &spec.filter).await?;
    let docs = store.find(collection, &spec.filter, &spec.find_options()).await?;
    Ok((docs, spec.pagination(total)))
}

/// Courses of one bootcamp, oldest first
pub(crate) async fn courses_of(store: &dyn DocumentStore, bootcamp_id: &str) -> ApiResult<Vec<Document>> {
    let filter = Filter::new().and(FilterExpr::eq(PARENT_FIELD, Value::String(bootcamp_id.to_string())));
    let options = FindOptions {
        sort: vec![SortKey::asc(CREATED_AT_FIELD)],
        ..Default::default()
    };
    Ok(store.find(Collection::Courses, &filter, &options).await?)
}

/// Attach each bootcamp's `courses` array
pub(crate) async fn attach_courses(store: &dyn DocumentStore, bootcamps: &mut [Document]) -> ApiResult<()> {
    if bootcamps.is_empty() {
        return Ok(());
    }

    let ids = ids_of(bootcamps.iter().filter_map(document_id));
    let filter = Filter::new().and(FilterExpr::in_list(PARENT_FIELD, ids));
    let options = FindOptions {
        sort: vec![SortKey::asc(CREATED_AT_FIELD)],
        ..Default::default()
    };

    let mut by_parent: HashMap<String, Vec<Value>> = HashMap::new();
    for course in store.find(Collection::Courses, &filter, &options).await? {
        if let Some(parent) = course.get(PARENT_FIELD).and_then(Value::as_str) {
            by_parent
                .entry(parent.to_string())
                .or_default()
                .push(Value::Object(course));
        }
    }

    for bootcamp in bootcamps.iter_mut() {
        let courses = document_id(bootcamp)
            .and_then(|id| by_parent.remove(id))
            .unwrap_or_default();
        bootcamp.insert("courses".to_string(), Value::Array(courses));
    }
    Ok(())
}

/// Replace each course's `bootcamp` id with `{_id, name, description}`
pub(crate) async fn attach_bootcamp_summaries(
    store: &dyn DocumentStore,
    courses: &mut [Document],
) -> ApiResult<()> {
    let parent_ids: Vec<&str> = courses
        .iter()
        .filter_map(|course| course.get(PARENT_FIELD).and_then(Value::as_str))
        .collect();
    if parent_ids.is_empty() {
        return Ok(());
    }

    let filter = Filter::new().and(FilterExpr::in_list(ID_FIELD, ids_of(parent_ids.into_iter())));
    let options = FindOptions {
        projection: Some(SUMMARY_FIELDS.iter().map(|f| f.to_string()).collect()),
        ..Default::default()
    };
    let summaries: HashMap<String, Document> = store
        .find(Collection::Bootcamps, &filter, &options)
        .await?
        .into_iter()
        .filter_map(|doc| {
            let id = document_id(&doc)?.to_string();
            Some((id, doc))
        })
        .collect();

    for course in courses.iter_mut() {
        let summary = course
            .get(PARENT_FIELD)
            .and_then(Value::as_str)
            .and_then(|id| summaries.get(id))
            .cloned();
        if let Some(summary) = summary {
            course.insert(PARENT_FIELD.to_string(), Value::Object(summary));
        }
    }
    Ok(())
}

fn ids_of<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::new();
    for id in ids {
        let value = Value::String(id.to_string());
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}
