use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use common::types::{ApiStatus, DatabaseStatus, Health, HealthReport, ModuleStatus, StatusReport};
use sea_orm::ConnectionTrait;
use tracing::warn;

use super::{ok, ApiResult};
use crate::openapi::HealthResponse;
use crate::state::AppState;

const SERVICE_NAME: &str = "faculty-api";
const VERSION: &str = env!("CARGO_PKG_VERSION");
const MODULES: [&str; 8] =
    ["positions", "persons", "teachers", "subjects", "courses", "assignments", "schedule-blocks", "views"];

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Liveness probe
#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Process is up", body = HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Service identity and environment
#[utoipa::path(get, path = "/api/health", tag = "health", responses((status = 200, description = "API is running")))]
pub async fn api_health(State(state): State<AppState>) -> ApiResult<HealthReport> {
    let report = HealthReport {
        status: "healthy",
        service: SERVICE_NAME,
        version: VERSION,
        environment: state.environment.to_string(),
        timestamp: now(),
    };
    Ok(ok(report, "API is running successfully"))
}

/// Detailed status including database reachability
#[utoipa::path(get, path = "/api/status", tag = "health", responses((status = 200, description = "System status")))]
pub async fn status(State(state): State<AppState>) -> ApiResult<StatusReport> {
    let db_status = match state.db.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            warn!(error = %e, "database ping failed");
            "unreachable"
        }
    };
    let report = StatusReport {
        api: ApiStatus { status: "online", name: SERVICE_NAME, version: VERSION },
        database: DatabaseStatus {
            status: db_status,
            backend: format!("{:?}", state.db.get_database_backend()).to_lowercase(),
        },
        modules: MODULES.iter().map(|&name| ModuleStatus { name, status: "active" }).collect(),
        timestamp: now(),
    };
    Ok(ok(report, "System status retrieved successfully"))
}
