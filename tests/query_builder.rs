//! Query Builder Tests
//!
//! Listing parameters end to end: select, sort, page/limit, filters with
//! bracket operators, and the pagination metadata.

mod common;

use axum_test::TestServer;
use common::*;
use serde_json::{json, Value};

async fn seeded(count: usize) -> TestServer {
    let server = test_server();
    for n in 1..=count {
        create_bootcamp(&server, &format!("Bootcamp {:02}", n), "Boston MA").await;
    }
    server
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["name"].as_str().unwrap().to_string())
        .collect()
}

/// `?select=name&sort=-name&page=2&limit=10` over 25 documents.
#[tokio::test]
async fn test_select_sort_page() {
    let server = seeded(25).await;

    let response = server
        .get(&url("/bootcamps"))
        .add_query_param("select", "name")
        .add_query_param("sort", "-name")
        .add_query_param("page", "2")
        .add_query_param("limit", "10")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    let expected: Vec<String> = (6..=15).rev().map(|n| format!("Bootcamp {:02}", n)).collect();
    assert_eq!(names(&body), expected);
    assert_eq!(body["count"], json!(10));

    for doc in body["data"].as_array().unwrap() {
        let mut keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["_id", "name"]);
    }

    assert_eq!(
        body["pagination"],
        json!({
            "page": 2,
            "limit": 10,
            "total": 25,
            "prev": {"page": 1, "limit": 10},
            "next": {"page": 3, "limit": 10}
        })
    );
}

#[tokio::test]
async fn test_default_page_size() {
    let server = seeded(27).await;

    let body: Value = server.get(&url("/bootcamps")).await.json();
    assert_eq!(body["count"], json!(25));
    assert_eq!(body["pagination"]["next"], json!({"page": 2, "limit": 25}));
    assert!(body["pagination"].get("prev").is_none());

    let body: Value = server
        .get(&url("/bootcamps"))
        .add_query_param("page", "2")
        .await
        .json();
    assert_eq!(body["count"], json!(2));
    assert!(body["pagination"].get("next").is_none());
}

#[tokio::test]
async fn test_unusable_paging_falls_back() {
    let server = seeded(3).await;

    let body: Value = server
        .get(&url("/bootcamps"))
        .add_query_param("page", "zero")
        .add_query_param("limit", "-4")
        .await
        .json();
    assert_eq!(body["count"], json!(3));
    assert_eq!(body["pagination"]["page"], json!(1));
    assert_eq!(body["pagination"]["limit"], json!(25));
}

#[tokio::test]
async fn test_comparison_filters() {
    let server = test_server();
    for (name, rating) in [("Low", 3), ("Mid", 6), ("High", 9)] {
        let mut body = bootcamp_body(name, "Boston MA");
        body["averageRating"] = json!(rating);
        server.post(&url("/bootcamps")).json(&body).await;
    }

    let body: Value = server
        .get(&url("/bootcamps"))
        .add_query_param("averageRating[gte]", "6")
        .add_query_param("sort", "name")
        .await
        .json();
    assert_eq!(names(&body), vec!["High", "Mid"]);
    assert_eq!(body["pagination"]["total"], json!(2));

    let body: Value = server
        .get(&url("/bootcamps"))
        .add_query_param("averageRating[lt]", "9")
        .add_query_param("averageRating[gt]", "3")
        .await
        .json();
    assert_eq!(names(&body), vec!["Mid"]);

    let body: Value = server
        .get(&url("/bootcamps"))
        .add_query_param("averageRating", "3")
        .await
        .json();
    assert_eq!(names(&body), vec!["Low"]);
}

#[tokio::test]
async fn test_nested_and_array_filters() {
    let server = test_server();
    create_bootcamp(&server, "Devworks", "Boston MA").await;
    create_bootcamp(&server, "Codemasters", "Providence RI").await;

    let mut body = bootcamp_body("Devcentral", "Denver CO");
    body["careers"] = json!(["Mobile Development"]);
    server.post(&url("/bootcamps")).json(&body).await;

    let body: Value = server
        .get(&url("/bootcamps"))
        .add_query_param("location.state", "MA")
        .await
        .json();
    assert_eq!(names(&body), vec!["Devworks"]);

    let body: Value = server
        .get(&url("/bootcamps"))
        .add_query_param("careers", "UI/UX")
        .add_query_param("sort", "name")
        .await
        .json();
    assert_eq!(names(&body), vec!["Codemasters", "Devworks"]);

    let body: Value = server
        .get(&url("/bootcamps"))
        .add_query_param("careers[in]", "Mobile Development,Data Science")
        .await
        .json();
    assert_eq!(names(&body), vec!["Devcentral"]);
}

#[tokio::test]
async fn test_select_with_courses_keeps_population() {
    let server = test_server();
    let id = create_bootcamp(&server, "Devworks", "Boston MA").await;
    create_course(&server, &id, "Front End", 8000).await;

    let body: Value = server
        .get(&url("/bootcamps"))
        .add_query_param("select", "name,courses")
        .await
        .json();
    let doc = &body["data"][0];
    assert_eq!(doc["courses"][0]["title"], json!("Front End"));
    assert!(doc.get("description").is_none());
}

#[tokio::test]
async fn test_course_filters_by_tuition() {
    let server = test_server();
    let id = create_bootcamp(&server, "Devworks", "Boston MA").await;
    create_course(&server, &id, "Cheap", 1000).await;
    create_course(&server, &id, "Pricey", 15000).await;

    let body: Value = server
        .get(&url("/courses"))
        .add_query_param("tuition[lte]", "5000")
        .await
        .json();
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["data"][0]["title"], json!("Cheap"));
}

#[tokio::test]
async fn test_unknown_operator_is_bad_request() {
    let server = seeded(1).await;

    let response = server
        .get(&url("/bootcamps"))
        .add_query_param("averageCost[ne]", "5000")
        .await;
    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>(),
        json!({"success": false, "error": "Invalid filter operator 'ne' on field 'averageCost'"})
    );
}
