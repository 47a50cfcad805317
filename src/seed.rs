//! Seed data loading.
//!
//! Reads `bootcamps.json` and `courses.json` (JSON arrays) from a directory
//! and stores them through the regular create paths, so seeded documents are
//! validated, geocoded and aggregated exactly like API writes. Provided `_id`s
//! are kept so courses can reference their bootcamp.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::api::{bootcamps, courses, ApiError, AppState};
use crate::store::Document;

pub const BOOTCAMPS_FILE: &str = "bootcamps.json";
pub const COURSES_FILE: &str = "courses.json";

/// Seed loading errors
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed directory {0} does not exist")]
    MissingDir(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{file}[{index}] is not a JSON object")]
    NotAnObject { file: &'static str, index: usize },

    #[error("{file}[{index}] has no bootcamp id")]
    MissingParent { file: &'static str, index: usize },

    #[error("{file}[{index}] rejected: {source}")]
    Rejected {
        file: &'static str,
        index: usize,
        #[source]
        source: ApiError,
    },
}

/// What a seed run stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub bootcamps: usize,
    pub courses: usize,
}

/// Load every seed file present in `dir`
pub async fn load_seed(state: &AppState, dir: &Path) -> Result<SeedReport, SeedError> {
    if !dir.is_dir() {
        return Err(SeedError::MissingDir(dir.to_path_buf()));
    }

    let mut report = SeedReport::default();

    for (index, doc) in read_documents(dir, BOOTCAMPS_FILE)?.into_iter().enumerate() {
        bootcamps::create_bootcamp(state, doc)
            .await
            .map_err(|source| SeedError::Rejected {
                file: BOOTCAMPS_FILE,
                index,
                source,
            })?;
        report.bootcamps += 1;
    }

    for (index, doc) in read_documents(dir, COURSES_FILE)?.into_iter().enumerate() {
        let parent = doc
            .get("bootcamp")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(SeedError::MissingParent {
                file: COURSES_FILE,
                index,
            })?;
        courses::create_course(state, &parent, doc)
            .await
            .map_err(|source| SeedError::Rejected {
                file: COURSES_FILE,
                index,
                source,
            })?;
        report.courses += 1;
    }

    tracing::info!(
        dir = %dir.display(),
        bootcamps = report.bootcamps,
        courses = report.courses,
        "seed data loaded"
    );
    Ok(report)
}

/// Objects of one seed file; a missing file is empty
fn read_documents(dir: &Path, file: &'static str) -> Result<Vec<Document>, SeedError> {
    let path = dir.join(file);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no seed file");
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path).map_err(|source| SeedError::Read {
        path: path.clone(),
        source,
    })?;
    let values: Vec<Value> =
        serde_json::from_str(&content).map_err(|source| SeedError::Parse { path, source })?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(doc) => Ok(doc),
            _ => Err(SeedError::NotAnObject { file, index }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geocoder::{GeoLocation, StaticGeocoder};
    use crate::store::{Collection, Filter};
    use serde_json::json;
    use tempfile::TempDir;

    const BOOTCAMP_UUID: &str = "0b6f7a0e-2f4b-4b8e-9a53-5f3b1f7d2c10";

    fn state() -> AppState {
        let geocoder = StaticGeocoder::new().with("Boston MA", GeoLocation::new(42.36, -71.06));
        AppState::in_memory(Arc::new(geocoder))
    }

    fn write(dir: &TempDir, file: &str, value: Value) {
        fs::write(dir.path().join(file), value.to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_loads_bootcamps_and_courses() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            BOOTCAMPS_FILE,
            json!([{
                "_id": BOOTCAMP_UUID,
                "name": "Devworks",
                "description": "Full stack training",
                "address": "Boston MA",
                "careers": ["Web Development"]
            }]),
        );
        write(
            &dir,
            COURSES_FILE,
            json!([
                {"title": "Front End", "description": "d", "weeks": "8", "tuition": 8000,
                 "minimumSkill": "beginner", "bootcamp": BOOTCAMP_UUID},
                {"title": "Back End", "description": "d", "weeks": "12", "tuition": 10000,
                 "minimumSkill": "intermediate", "bootcamp": BOOTCAMP_UUID}
            ]),
        );

        let state = state();
        let report = load_seed(&state, dir.path()).await.unwrap();
        assert_eq!(report, SeedReport { bootcamps: 1, courses: 2 });

        let bootcamp = state
            .store
            .find_by_id(Collection::Bootcamps, BOOTCAMP_UUID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bootcamp["averageCost"], json!(9000));
        assert_eq!(bootcamp["slug"], json!("devworks"));
    }

    #[tokio::test]
    async fn test_missing_files_are_empty() {
        let dir = TempDir::new().unwrap();
        let report = load_seed(&state(), dir.path()).await.unwrap();
        assert_eq!(report, SeedReport::default());
    }

    #[tokio::test]
    async fn test_missing_dir_is_error() {
        let err = load_seed(&state(), Path::new("/nonexistent/seed")).await.unwrap_err();
        assert!(matches!(err, SeedError::MissingDir(_)));
    }

    #[tokio::test]
    async fn test_invalid_document_reports_position() {
        let dir = TempDir::new().unwrap();
        write(&dir, BOOTCAMPS_FILE, json!([{"_id": "5d713995b721c3bb38c1f5d0", "name": "Devworks"}]));

        let state = state();
        let err = load_seed(&state, dir.path()).await.unwrap_err();
        assert!(matches!(err, SeedError::Rejected { index: 0, .. }));

        let stored = state
            .store
            .count(Collection::Bootcamps, &Filter::new())
            .await
            .unwrap();
        assert_eq!(stored, 0);
    }

    #[tokio::test]
    async fn test_course_without_parent_rejected() {
        let dir = TempDir::new().unwrap();
        write(&dir, COURSES_FILE, json!([{"title": "Orphan"}]));

        let err = load_seed(&state(), dir.path()).await.unwrap_err();
        assert!(matches!(err, SeedError::MissingParent { index: 0, .. }));
    }
}
