use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::applications::domain::{
    JobApplication, JobApplicationRequest, NewJobApplication, SearchFilter,
};
use crate::applications::memory::InMemoryJobApplicationRepository;
use crate::applications::repository::{JobApplicationRepository, RepositoryError};
use crate::applications::service::JobApplicationService;

pub(super) fn applied_on(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid timestamp")
}

pub(super) fn request(company: &str, role: &str) -> JobApplicationRequest {
    JobApplicationRequest {
        id: None,
        applied_date: Some(applied_on(2024, 1, 1)),
        company: Some(company.to_string()),
        role: Some(role.to_string()),
        applied_from_platform: Some("LinkedIn".to_string()),
        status: Some("Applied".to_string()),
        payment: None,
        contact: None,
        observation: None,
    }
}

pub(super) fn acme_request() -> JobApplicationRequest {
    request("Acme", "Engineer")
}

pub(super) fn build_service() -> (JobApplicationService, InMemoryJobApplicationRepository) {
    let repository = InMemoryJobApplicationRepository::default();
    let service = JobApplicationService::new(Arc::new(repository.clone()));
    (service, repository)
}

pub(super) struct UnavailableRepository;

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("database offline".to_string())
}

#[async_trait]
impl JobApplicationRepository for UnavailableRepository {
    async fn list(&self) -> Result<Vec<JobApplication>, RepositoryError> {
        Err(offline())
    }

    async fn search(&self, _filter: &SearchFilter) -> Result<Vec<JobApplication>, RepositoryError> {
        Err(offline())
    }

    async fn get(&self, _id: i32) -> Result<Option<JobApplication>, RepositoryError> {
        Err(offline())
    }

    async fn create(
        &self,
        _application: NewJobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        Err(offline())
    }

    async fn update(&self, _application: &JobApplication) -> Result<bool, RepositoryError> {
        Err(offline())
    }

    async fn delete(&self, _id: i32) -> Result<bool, RepositoryError> {
        Err(offline())
    }

    async fn exists(&self, _id: i32) -> Result<bool, RepositoryError> {
        Err(offline())
    }
}

pub(super) fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

pub(super) fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
