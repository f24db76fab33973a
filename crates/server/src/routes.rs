use axum::{
    http::{Method, StatusCode, Uri},
    routing::get,
    Json, Router,
};
use common::pagination::{Page, Pagination};
use common::response::ApiResponse;
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::{IntoParams, OpenApi};

use crate::errors::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod assignments;
pub mod courses;
pub mod health;
pub mod persons;
pub mod positions;
pub mod schedule_blocks;
pub mod subjects;
pub mod teachers;
pub mod views;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// `?page=&per_page=` on every list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number, default 1
    pub page: Option<u32>,
    /// Page size, default 20, at most 100
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(self.page, self.per_page)
    }
}

pub(crate) fn ok<T: Serialize>(data: T, message: &str) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(data, message))
}

pub(crate) fn created<T: Serialize>(data: T, message: &str) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::ok(data, message)))
}

pub(crate) fn listed<T: Serialize>(page: Page<T>, message: &str) -> Json<ApiResponse<Vec<T>>> {
    Json(ApiResponse::paginated(page, message))
}

async fn fallback(uri: Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        "METHOD_NOT_ALLOWED",
        format!("{} is not supported on {}", method, uri.path()),
    )
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::api_health))
        .route("/status", get(health::status))
        .route("/positions", get(positions::list).post(positions::create))
        .route("/positions/:id", get(positions::get).put(positions::update).delete(positions::delete))
        .route("/persons", get(persons::list).post(persons::create))
        .route("/persons/:id", get(persons::get).put(persons::update).delete(persons::delete))
        .route("/teachers", get(teachers::list).post(teachers::create))
        .route("/teachers/:id", get(teachers::get).put(teachers::update).delete(teachers::delete))
        .route("/teachers/:id/assignments", get(teachers::assignments))
        .route("/subjects", get(subjects::list).post(subjects::create))
        .route("/subjects/:id", get(subjects::get).put(subjects::update).delete(subjects::delete))
        .route("/courses", get(courses::list).post(courses::create))
        .route("/courses/:id", get(courses::get).put(courses::update).delete(courses::delete))
        .route("/assignments", get(assignments::list).post(assignments::create))
        .route(
            "/assignments/:teacher_id/:course_id/:subject_id",
            get(assignments::get).put(assignments::update).delete(assignments::delete),
        )
        .route("/schedule-blocks", get(schedule_blocks::list).post(schedule_blocks::create))
        .route(
            "/schedule-blocks/:id",
            get(schedule_blocks::get).put(schedule_blocks::update).delete(schedule_blocks::delete),
        )
        .route("/views/teacher-load", get(views::teacher_loads))
        .route("/views/teacher-load/:teacher_id", get(views::teacher_load))
        .route("/views/teachers/:teacher_id/schedule", get(views::teacher_schedule))
        .route("/views/courses/:course_id/schedule", get(views::course_schedule))
}

/// Build the full application router: `/health`, the OpenAPI document and everything under `/api`.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api_routes())
        // applies to the routes registered above, so it stays after `nest`
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(fallback)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and transport failures
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
