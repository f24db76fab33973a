//! Standard response envelope.
//!
//! Every endpoint answers with `{success, message, data, timestamp}`; list
//! endpoints add a `pagination` block and failures use [`ErrorResponse`].

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::pagination::Page;

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self { success: true, message: message.into(), data, pagination: None, timestamp: now() }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn paginated(page: Page<T>, message: impl Into<String>) -> Self {
        let meta = PageMeta {
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            pages: page.pages,
            has_next: page.has_next(),
            has_prev: page.has_prev(),
        };
        Self {
            success: true,
            message: message.into(),
            data: page.items,
            pagination: Some(meta),
            timestamp: now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error_code: String,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            errors: vec![message.clone()],
            message,
            error_code: error_code.into(),
            details: None,
            timestamp: now(),
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
