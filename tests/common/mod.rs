//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use devcamp::api::{router, AppState};
use devcamp::geocoder::{GeoLocation, StaticGeocoder};
use serde_json::{json, Value};

pub const PREFIX: &str = "/api/v1";

fn located(latitude: f64, longitude: f64, city: &str, state: &str) -> GeoLocation {
    GeoLocation {
        city: Some(city.to_string()),
        state: Some(state.to_string()),
        country: Some("US".to_string()),
        ..GeoLocation::new(latitude, longitude)
    }
}

/// Fixed answers for every address the tests use
pub fn geocoder() -> StaticGeocoder {
    StaticGeocoder::new()
        .with("Boston MA", located(42.3601, -71.0589, "Boston", "MA"))
        .with("02118", located(42.3388, -71.0765, "Boston", "MA"))
        .with("Providence RI", located(41.824, -71.4128, "Providence", "RI"))
        .with("Denver CO", located(39.7392, -104.9903, "Denver", "CO"))
        .with("80202", located(39.7525, -104.9995, "Denver", "CO"))
        .with("Null Island", GeoLocation::new(0.0, 0.0))
        .with("00000", GeoLocation::new(0.0, 0.0))
        .with("Near Null Island", GeoLocation::new(0.01, 0.01))
}

pub fn test_state() -> AppState {
    AppState::in_memory(Arc::new(geocoder()))
}

pub fn test_server() -> TestServer {
    TestServer::new(router(test_state(), PREFIX)).unwrap()
}

pub fn url(path: &str) -> String {
    format!("{}{}", PREFIX, path)
}

pub fn bootcamp_body(name: &str, address: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{} teaches full stack development", name),
        "website": "https://devworks.com",
        "phone": "(111) 111-1111",
        "email": "enroll@devworks.com",
        "address": address,
        "careers": ["Web Development", "UI/UX", "Business"],
        "housing": true,
        "jobAssistance": true
    })
}

pub fn course_body(title: &str, tuition: i64) -> Value {
    json!({
        "title": title,
        "description": "Learn the stack from the ground up",
        "weeks": "12",
        "tuition": tuition,
        "minimumSkill": "beginner",
        "scholarshipAvailable": true
    })
}

/// Create a bootcamp and return its id
pub async fn create_bootcamp(server: &TestServer, name: &str, address: &str) -> String {
    let response = server.post(&url("/bootcamps")).json(&bootcamp_body(name, address)).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["_id"].as_str().unwrap().to_string()
}

/// Create a course under a bootcamp and return its id
pub async fn create_course(server: &TestServer, bootcamp_id: &str, title: &str, tuition: i64) -> String {
    let response = server
        .post(&url(&format!("/bootcamps/{}/courses", bootcamp_id)))
        .json(&course_body(title, tuition))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["_id"].as_str().unwrap().to_string()
}
