//! OpenAPI document and the interactive documentation page.

use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::applications::router::{self as routes, ErrorBody};
use crate::applications::{JobApplication, JobApplicationRequest};

const STOPLIGHT_ELEMENTS_VERSION: &str = "8.4.2";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Job Tracker API",
        description = "Track job applications: company, role, source platform, status, payment and notes."
    ),
    paths(
        routes::list_handler,
        routes::search_handler,
        routes::get_handler,
        routes::create_handler,
        routes::update_handler,
        routes::delete_handler,
    ),
    components(schemas(JobApplication, JobApplicationRequest, ErrorBody)),
    tags((name = "jobapplications", description = "Job application records"))
)]
pub struct ApiDoc;

/// `/openapi.json` and `/docs`. Mounted only when API docs are enabled.
pub fn docs_router() -> Router {
    let document = ApiDoc::openapi();

    Router::new()
        .route(
            "/openapi.json",
            get(move || {
                let document = document.clone();
                async move { ([(header::CACHE_CONTROL, "no-store")], Json(document)).into_response() }
            }),
        )
        .route("/docs", get(serve_docs))
}

async fn serve_docs() -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Job Tracker API</title>
    <script src="https://unpkg.com/@stoplight/elements@{version}/web-components.min.js"></script>
    <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@{version}/styles.min.css">
  </head>
  <body>
    <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
  </body>
</html>
"#,
        version = STOPLIGHT_ELEMENTS_VERSION
    ))
}
