use axum::extract::State;
use models::subject;
use service::domain::{NewSubject, SubjectPatch};
use service::subject_service;
use tracing::info;
use uuid::Uuid;

use super::{created, listed, ok, ApiResult, CreatedResult, PageQuery};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::openapi::{NewSubjectDoc, SubjectPatchDoc};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/subjects", tag = "subjects", params(PageQuery),
    responses((status = 200, description = "Page of subjects ordered by code")))]
pub async fn list(State(state): State<AppState>, ApiQuery(q): ApiQuery<PageQuery>) -> ApiResult<Vec<subject::Model>> {
    let page = subject_service::list_subjects(&state.db, q.pagination()).await?;
    info!(count = page.items.len(), total = page.total, "list subjects");
    Ok(listed(page, "Subjects retrieved successfully"))
}

#[utoipa::path(post, path = "/api/subjects", tag = "subjects", request_body = NewSubjectDoc,
    responses((status = 201, description = "Subject created"), (status = 409, description = "Code taken")))]
pub async fn create(State(state): State<AppState>, ApiJson(input): ApiJson<NewSubject>) -> CreatedResult<subject::Model> {
    let s = subject_service::create_subject(&state.db, input).await?;
    Ok(created(s, "Subject created successfully"))
}

#[utoipa::path(get, path = "/api/subjects/{id}", tag = "subjects",
    params(("id" = Uuid, Path, description = "Subject id")),
    responses((status = 200, description = "Subject"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<subject::Model> {
    let s = subject_service::get_subject(&state.db, id).await?;
    Ok(ok(s, "Subject retrieved successfully"))
}

#[utoipa::path(put, path = "/api/subjects/{id}", tag = "subjects", request_body = SubjectPatchDoc,
    params(("id" = Uuid, Path, description = "Subject id")),
    responses((status = 200, description = "Subject updated"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<SubjectPatch>,
) -> ApiResult<subject::Model> {
    let s = subject_service::update_subject(&state.db, id, patch).await?;
    Ok(ok(s, "Subject updated successfully"))
}

/// Also removes the assignments and blocks that teach this subject.
#[utoipa::path(delete, path = "/api/subjects/{id}", tag = "subjects",
    params(("id" = Uuid, Path, description = "Subject id")),
    responses((status = 200, description = "Deleted subject"), (status = 404, description = "Not found")))]
pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<subject::Model> {
    let s = subject_service::delete_subject(&state.db, id).await?;
    Ok(ok(s, "Subject deleted successfully"))
}
