use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use super::domain::{JobApplication, JobApplicationRequest, SearchFilter};
use super::service::{JobApplicationService, JobApplicationServiceError};

type SharedService = State<Arc<JobApplicationService>>;

/// Error payload for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    /// Field name to violated constraints; present on validation failures.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ErrorBody {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            errors: BTreeMap::new(),
        }
    }
}

/// Query string of the search endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the company name.
    pub company: Option<String>,
    /// Case-insensitive substring of the role.
    pub role: Option<String>,
}

impl From<SearchQuery> for SearchFilter {
    fn from(query: SearchQuery) -> Self {
        SearchFilter::new(query.company, query.role)
    }
}

/// Routes for the job application resource, served both at the root and
/// under `/api`.
pub fn application_router(service: Arc<JobApplicationService>) -> Router {
    let routes = Router::new()
        .route("/jobapplications", get(list_handler).post(create_handler))
        .route("/jobapplications/search", get(search_handler))
        .route(
            "/jobapplications/{id}",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .with_state(service);

    Router::new().merge(routes.clone()).nest("/api", routes)
}

impl IntoResponse for JobApplicationServiceError {
    fn into_response(self) -> Response {
        match self {
            JobApplicationServiceError::Validation(errors) => {
                let body = ErrorBody {
                    error: errors.to_string(),
                    errors: errors
                        .fields()
                        .map(|field| (field.to_string(), errors.messages(field).to_vec()))
                        .collect(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            JobApplicationServiceError::IdMismatch { .. } => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::message(self.to_string())))
                    .into_response()
            }
            JobApplicationServiceError::NotFound(_) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody::message(self.to_string())))
                    .into_response()
            }
            JobApplicationServiceError::Repository(err) => {
                error!(error = %err, "job application store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::message("internal server error")),
                )
                    .into_response()
            }
        }
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::message(message))).into_response()
}

#[utoipa::path(
    get,
    path = "/jobapplications",
    tag = "jobapplications",
    responses(
        (status = 200, description = "Every job application", body = [JobApplication]),
    )
)]
pub async fn list_handler(State(service): SharedService) -> Response {
    match service.list().await {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/jobapplications/search",
    tag = "jobapplications",
    params(SearchQuery),
    responses(
        (status = 200, description = "Job applications matching every provided filter", body = [JobApplication]),
        (status = 400, description = "Malformed query string", body = ErrorBody),
    )
)]
pub async fn search_handler(
    State(service): SharedService,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let filter = SearchFilter::from(query);
    match service.search(&filter).await {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/jobapplications/{id}",
    tag = "jobapplications",
    params(("id" = i32, Path, description = "Job application id")),
    responses(
        (status = 200, description = "The job application", body = JobApplication),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No job application with this id", body = ErrorBody),
    )
)]
pub async fn get_handler(
    State(service): SharedService,
    id: Result<Path<i32>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.get(id).await {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/jobapplications",
    tag = "jobapplications",
    request_body = JobApplicationRequest,
    responses(
        (status = 201, description = "Stored job application", body = JobApplication,
            headers(("Location" = String, description = "Path of the new job application"))),
        (status = 400, description = "Malformed body or failed validation", body = ErrorBody),
    )
)]
pub async fn create_handler(
    State(service): SharedService,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<JobApplicationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.create(request).await {
        Ok(application) => {
            let location = format!("{}/{}", uri.path().trim_end_matches('/'), application.id);
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(application),
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/jobapplications/{id}",
    tag = "jobapplications",
    params(("id" = i32, Path, description = "Job application id; must equal the body id")),
    request_body = JobApplicationRequest,
    responses(
        (status = 204, description = "Job application replaced"),
        (status = 400, description = "Id mismatch, malformed body or failed validation", body = ErrorBody),
        (status = 404, description = "No job application with this id", body = ErrorBody),
    )
)]
pub async fn update_handler(
    State(service): SharedService,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<JobApplicationRequest>, JsonRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.update(id, request).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/jobapplications/{id}",
    tag = "jobapplications",
    params(("id" = i32, Path, description = "Job application id")),
    responses(
        (status = 204, description = "Job application removed"),
        (status = 404, description = "No job application with this id", body = ErrorBody),
    )
)]
pub async fn delete_handler(
    State(service): SharedService,
    id: Result<Path<i32>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
