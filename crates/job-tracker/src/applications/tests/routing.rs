use super::common::*;
use axum::http::{header, Method, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::applications::router::application_router;
use crate::applications::service::JobApplicationService;

fn router() -> axum::Router {
    let (service, _) = build_service();
    application_router(Arc::new(service))
}

fn acme_body() -> Value {
    json!({
        "Company": "Acme",
        "Role": "Engineer",
        "AppliedFromPlatform": "LinkedIn",
        "Status": "Applied",
        "AppliedDate": "2024-01-01"
    })
}

#[tokio::test]
async fn full_lifecycle_over_http() {
    let app = router();

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/jobapplications", &acme_body()))
        .await
        .expect("create responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
        .to_string();
    let created = read_json_body(response).await;
    let id = created["id"].as_i64().expect("numeric id");
    assert_eq!(location, format!("/jobapplications/{id}"));
    assert_eq!(created["appliedDate"], "2024-01-01T00:00:00");

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, &location))
        .await
        .expect("get responds");
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = read_json_body(response).await;
    assert_eq!(fetched, created);
    assert_eq!(fetched["company"], "Acme");
    assert_eq!(fetched["role"], "Engineer");
    assert_eq!(fetched["appliedFromPlatform"], "LinkedIn");
    assert_eq!(fetched["status"], "Applied");

    let mut replacement = acme_body();
    replacement["Id"] = json!(id);
    replacement["Status"] = json!("Interview");
    let response = app
        .clone()
        .oneshot(json_request(Method::PUT, &location, &replacement))
        .await
        .expect("update responds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, &location))
        .await
        .expect("get responds");
    assert_eq!(read_json_body(response).await["status"], "Interview");

    let response = app
        .clone()
        .oneshot(empty_request(Method::DELETE, &location))
        .await
        .expect("delete responds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(empty_request(Method::GET, &location))
        .await
        .expect("get responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_prefix_serves_the_same_resource() {
    let app = router();

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/jobapplications", &acme_body()))
        .await
        .expect("create responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .expect("location header");
    assert_eq!(location, "/api/jobapplications/1");

    let response = app
        .oneshot(empty_request(Method::GET, "/jobapplications/1"))
        .await
        .expect("get responds");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_and_search_endpoints_filter_records() {
    let app = router();
    let seeds = [
        ("Acme Corp", "Engineer"),
        ("Globex", "Engineer"),
        ("acme labs", "Designer"),
    ];
    for (company, role) in seeds {
        let mut body = acme_body();
        body["Company"] = json!(company);
        body["Role"] = json!(role);
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/jobapplications", &body))
            .await
            .expect("create responds");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/jobapplications"))
        .await
        .expect("list responds");
    assert_eq!(response.status(), StatusCode::OK);
    let all = read_json_body(response).await;
    assert_eq!(all.as_array().map(Vec::len), Some(3));

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/jobapplications/search?company=ACME"))
        .await
        .expect("search responds");
    let found = read_json_body(response).await;
    let companies: Vec<&str> = found
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|record| record["company"].as_str())
        .collect();
    assert_eq!(companies, vec!["Acme Corp", "acme labs"]);

    let response = app
        .clone()
        .oneshot(empty_request(
            Method::GET,
            "/jobapplications/search?company=acme&role=engineer",
        ))
        .await
        .expect("search responds");
    let found = read_json_body(response).await;
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    let response = app
        .oneshot(empty_request(Method::GET, "/jobapplications/search?company=&role="))
        .await
        .expect("search responds");
    let found = read_json_body(response).await;
    assert_eq!(found.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn create_reports_validation_errors() {
    let app = router();
    let body = json!({ "role": "Engineer", "company": "x".repeat(201) });

    let response = app
        .oneshot(json_request(Method::POST, "/jobapplications", &body))
        .await
        .expect("create responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let payload = read_json_body(response).await;
    let errors = payload["errors"].as_object().expect("field errors");
    assert!(errors.contains_key("company"));
    assert!(errors.contains_key("appliedDate"));
    assert!(errors.contains_key("status"));
    assert!(!errors.contains_key("role"));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = router();
    let request = axum::http::Request::post("/jobapplications")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{\"company\": "))
        .expect("request builds");

    let response = app.oneshot(request).await.expect("create responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn wrongly_typed_fields_are_a_bad_request() {
    let app = router();
    let mut body = acme_body();
    body["AppliedDate"] = json!("someday");

    let response = app
        .oneshot(json_request(Method::POST, "/jobapplications", &body))
        .await
        .expect("create responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() {
    let app = router();
    let response = app
        .oneshot(empty_request(Method::GET, "/jobapplications/abc"))
        .await
        .expect("get responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_with_mismatched_id_is_rejected() {
    let app = router();
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/jobapplications", &acme_body()))
        .await
        .expect("create responds");
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut replacement = acme_body();
    replacement["id"] = json!(2);
    replacement["Status"] = json!("Rejected");
    let response = app
        .clone()
        .oneshot(json_request(Method::PUT, "/jobapplications/1", &replacement))
        .await
        .expect("update responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["error"], "ID mismatch");

    let response = app
        .oneshot(empty_request(Method::GET, "/jobapplications/1"))
        .await
        .expect("get responds");
    assert_eq!(read_json_body(response).await["status"], "Applied");
}

#[tokio::test]
async fn update_and_delete_of_missing_records_are_not_found() {
    let app = router();

    let mut body = acme_body();
    body["Id"] = json!(9);
    let response = app
        .clone()
        .oneshot(json_request(Method::PUT, "/jobapplications/9", &body))
        .await
        .expect("update responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request(Method::DELETE, "/jobapplications/9"))
        .await
        .expect("delete responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_failures_are_internal_errors() {
    let service = JobApplicationService::new(Arc::new(UnavailableRepository));
    let app = application_router(Arc::new(service));

    let response = app
        .oneshot(empty_request(Method::GET, "/jobapplications"))
        .await
        .expect("list responds");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json_body(response).await["error"],
        "internal server error"
    );
}

#[tokio::test]
async fn malformed_search_query_is_a_json_bad_request() {
    let app = router();
    let response = app
        .oneshot(empty_request(
            Method::GET,
            "/jobapplications/search?company=a&company=b",
        ))
        .await
        .expect("search responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert!(read_json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn nul_characters_are_rejected_before_storage() {
    let (service, repository) = build_service();
    let app = application_router(Arc::new(service));
    let mut body = acme_body();
    body["Company"] = json!("Ac\u{0}me");

    let response = app
        .oneshot(json_request(Method::POST, "/jobapplications", &body))
        .await
        .expect("create responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["errors"]["company"].is_array());
    assert!(repository.is_empty().expect("store readable"));
}

#[tokio::test]
async fn applied_date_is_returned_in_whole_seconds() {
    let app = router();
    let mut body = acme_body();
    body["AppliedDate"] = json!("2024-03-05T10:15:30.987Z");

    let response = app
        .oneshot(json_request(Method::POST, "/jobapplications", &body))
        .await
        .expect("create responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        read_json_body(response).await["appliedDate"],
        "2024-03-05T10:15:30"
    );
}
