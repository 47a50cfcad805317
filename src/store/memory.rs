//! # In-Memory Document Store
//!
//! Lock-protected collections held in process memory. A single write lock
//! covers a document write together with its hooks, so each write (and the
//! cascade or aggregate update it triggers) is atomic.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::filter::{compare_json_values, lookup, values_equal, Filter};
use super::{
    document_id, parse_id, Collection, Document, DocumentStore, FindOptions, SortKey,
    CREATED_AT_FIELD, ID_FIELD,
};
use crate::schema::{SchemaValidator, ValidationDetails};

/// Field of a course referencing its bootcamp
const PARENT_FIELD: &str = "bootcamp";

/// In-memory document store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, CollectionData>>,
}

/// Documents of one collection, in insertion order
#[derive(Debug, Default)]
struct CollectionData {
    documents: Vec<Document>,
}

impl CollectionData {
    fn position(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|doc| document_id(doc) == Some(id))
    }
}

type Collections = HashMap<Collection, CollectionData>;

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| StoreError::Backend("Lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| StoreError::Backend("Lock poisoned".to_string()))
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.read()?;

        let mut records: Vec<Document> = collections
            .get(&collection)
            .map(|data| {
                data.documents
                    .iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        apply_ordering(&mut records, &options.sort);

        let page = records
            .into_iter()
            .skip(options.skip)
            .take(options.limit.unwrap_or(usize::MAX));

        Ok(match &options.projection {
            Some(fields) => page.map(|doc| project(doc, fields)).collect(),
            None => page.collect(),
        })
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<usize> {
        let collections = self.read()?;
        Ok(collections
            .get(&collection)
            .map(|data| data.documents.iter().filter(|doc| filter.matches(doc)).count())
            .unwrap_or(0))
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let id = parse_id(id)?;
        let collections = self.read()?;
        Ok(collections.get(&collection).and_then(|data| {
            data.position(&id).map(|index| data.documents[index].clone())
        }))
    }

    async fn insert(&self, collection: Collection, mut doc: Document) -> StoreResult<Document> {
        let id = match doc.get(ID_FIELD) {
            None | Some(Value::Null) => Uuid::new_v4().to_string(),
            Some(Value::String(s)) => parse_id(s)?,
            Some(other) => return Err(StoreError::InvalidId(other.to_string())),
        };
        doc.insert(ID_FIELD.to_string(), Value::String(id));
        doc.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );

        SchemaValidator::new(collection.schema())
            .check(&mut doc)
            .map_err(StoreError::Validation)?;

        let mut collections = self.write()?;
        check_parent(collection, &collections, &doc)?;
        let data = collections.entry(collection).or_default();
        check_unique(collection, &data.documents, &doc, None)?;
        data.documents.push(doc.clone());

        if collection == Collection::Courses {
            if let Some(parent) = doc.get(PARENT_FIELD).and_then(Value::as_str) {
                refresh_average_cost(&mut collections, parent);
            }
        }

        tracing::debug!(collection = %collection, id = ?document_id(&doc), "document inserted");
        Ok(doc)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        mut patch: Document,
    ) -> StoreResult<Option<Document>> {
        let id = parse_id(id)?;

        match patch.remove(ID_FIELD) {
            None => {}
            Some(Value::String(new_id)) if parse_id(&new_id).ok().as_deref() == Some(id.as_str()) => {}
            Some(_) => return Err(StoreError::validation(ValidationDetails::immutable(ID_FIELD))),
        }
        patch.remove(CREATED_AT_FIELD);

        let mut collections = self.write()?;
        let data = collections.entry(collection).or_default();
        let Some(index) = data.position(&id) else {
            return Ok(None);
        };

        let previous_parent = parent_of(&data.documents[index]);
        let mut merged = data.documents[index].clone();
        merged.extend(patch);

        SchemaValidator::new(collection.schema())
            .check(&mut merged)
            .map_err(StoreError::Validation)?;
        check_unique(collection, &data.documents, &merged, Some(index))?;
        check_parent(collection, &collections, &merged)?;
        if let Some(data) = collections.get_mut(&collection) {
            data.documents[index] = merged.clone();
        }

        if collection == Collection::Courses {
            let current_parent = parent_of(&merged);
            for parent in [previous_parent, current_parent].into_iter().flatten() {
                refresh_average_cost(&mut collections, &parent);
            }
        }

        tracing::debug!(collection = %collection, id = %id, "document updated");
        Ok(Some(merged))
    }

    async fn remove(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let id = parse_id(id)?;

        let mut collections = self.write()?;
        let data = collections.entry(collection).or_default();
        let Some(index) = data.position(&id) else {
            return Ok(None);
        };
        let removed = data.documents.remove(index);

        match collection {
            Collection::Bootcamps => {
                let cascaded = cascade_courses(&mut collections, &id);
                tracing::info!(bootcamp = %id, courses = cascaded, "bootcamp removed with its courses");
            }
            Collection::Courses => {
                if let Some(parent) = parent_of(&removed) {
                    refresh_average_cost(&mut collections, &parent);
                }
                tracing::debug!(course = %id, "course removed");
            }
        }

        Ok(Some(removed))
    }
}

fn parent_of(doc: &Document) -> Option<String> {
    doc.get(PARENT_FIELD).and_then(Value::as_str).map(str::to_string)
}

/// A course must reference a stored bootcamp
fn check_parent(collection: Collection, collections: &Collections, doc: &Document) -> StoreResult<()> {
    if collection != Collection::Courses {
        return Ok(());
    }
    let Some(parent) = parent_of(doc) else {
        return Ok(());
    };
    let exists = collections
        .get(&Collection::Bootcamps)
        .and_then(|data| data.position(&parent))
        .is_some();
    if exists {
        Ok(())
    } else {
        Err(StoreError::MissingReference {
            field: PARENT_FIELD.to_string(),
            id: parent,
        })
    }
}

/// Reject a candidate whose unique fields collide with another document
fn check_unique(
    collection: Collection,
    documents: &[Document],
    candidate: &Document,
    own_index: Option<usize>,
) -> StoreResult<()> {
    for field in collection.schema().unique_fields() {
        let Some(value) = candidate.get(field).filter(|v| !v.is_null()) else {
            continue;
        };
        let clash = documents
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != own_index)
            .any(|(_, doc)| doc.get(field).is_some_and(|other| values_equal(other, value)));
        if clash {
            return Err(StoreError::DuplicateKey {
                collection: collection.name().to_string(),
                field: field.to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

/// Remove every course of a bootcamp, returning how many went
fn cascade_courses(collections: &mut Collections, bootcamp_id: &str) -> usize {
    let Some(courses) = collections.get_mut(&Collection::Courses) else {
        return 0;
    };
    let before = courses.documents.len();
    courses
        .documents
        .retain(|course| course.get(PARENT_FIELD).and_then(Value::as_str) != Some(bootcamp_id));
    before - courses.documents.len()
}

/// Recompute a bootcamp's `averageCost` from its courses' tuition,
/// rounded up to the next multiple of ten.
fn refresh_average_cost(collections: &mut Collections, bootcamp_id: &str) {
    let tuitions: Vec<f64> = collections
        .get(&Collection::Courses)
        .map(|data| {
            data.documents
                .iter()
                .filter(|course| course.get(PARENT_FIELD).and_then(Value::as_str) == Some(bootcamp_id))
                .filter_map(|course| course.get("tuition").and_then(Value::as_f64))
                .collect()
        })
        .unwrap_or_default();

    let Some(bootcamp) = collections
        .get_mut(&Collection::Bootcamps)
        .and_then(|data| data.documents.iter_mut().find(|b| document_id(b) == Some(bootcamp_id)))
    else {
        return;
    };

    if tuitions.is_empty() {
        bootcamp.remove("averageCost");
    } else {
        let average = tuitions.iter().sum::<f64>() / tuitions.len() as f64;
        let rounded = ((average / 10.0).ceil() * 10.0) as i64;
        bootcamp.insert("averageCost".to_string(), json!(rounded));
    }
}

/// Stable multi-key sort; missing and null values sort first
fn apply_ordering(records: &mut [Document], sort: &[SortKey]) {
    if sort.is_empty() {
        return;
    }

    records.sort_by(|a, b| {
        for key in sort {
            let a_val = lookup(a, &key.field).filter(|v| !v.is_null());
            let b_val = lookup(b, &key.field).filter(|v| !v.is_null());

            let cmp = match (a_val, b_val) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => {
                    compare_json_values(a, b).unwrap_or_else(|| type_rank(a).cmp(&type_rank(b)))
                }
            };

            let cmp = if key.ascending { cmp } else { cmp.reverse() };
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    });
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}

/// Keep `_id` plus the selected fields (dotted selections keep their root)
fn project(doc: Document, fields: &[String]) -> Document {
    doc.into_iter()
        .filter(|(key, _)| {
            key == ID_FIELD
                || fields
                    .iter()
                    .any(|f| f == key || f.split('.').next() == Some(key.as_str()))
        })
        .collect()
}
