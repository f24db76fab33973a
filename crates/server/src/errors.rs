use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::response::ErrorResponse;
use models::errors::ModelError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// An error rendered as the standard failure envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self { status, body: ErrorResponse::new(code, message) }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e {
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => Self::bad_request(msg),
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, "CONFLICT", msg),
            ServiceError::ScheduleConflict(block) => {
                let details = serde_json::to_value(&*block).unwrap_or_default();
                let mut err = Self::new(StatusCode::CONFLICT, "SCHEDULE_CONFLICT", message);
                err.body = err.body.with_details(serde_json::json!({ "conflicting_block": details }));
                err
            }
            ServiceError::Db(msg) | ServiceError::Model(ModelError::Db(msg)) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", msg)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            // internals stay in the log, not in the response
            error!(status = %self.status, error = %self.body.message, "request failed");
            let body = ErrorResponse::new(self.body.error_code.as_str(), "internal server error");
            return (self.status, Json(body)).into_response();
        }
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_and_code() {
        let cases = [
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (ServiceError::Model(ModelError::validation("x")), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (ServiceError::not_found("teacher"), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ServiceError::conflict("dup"), StatusCode::CONFLICT, "CONFLICT"),
            (ServiceError::Db("down".into()), StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        ];
        for (e, status, code) in cases {
            let api = ApiError::from(e);
            assert_eq!(api.status, status);
            assert_eq!(api.body.error_code, code);
        }
    }
}
