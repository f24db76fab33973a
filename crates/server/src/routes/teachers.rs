use axum::extract::State;
use service::domain::{AssignmentDetail, NewTeacher, TeacherPatch, TeacherView};
use service::teacher_service;
use tracing::info;
use uuid::Uuid;

use super::{created, listed, ok, ApiResult, CreatedResult, PageQuery};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::openapi::{NewTeacherDoc, TeacherPatchDoc};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/teachers", tag = "teachers", params(PageQuery),
    responses((status = 200, description = "Page of teachers ordered by surname")))]
pub async fn list(State(state): State<AppState>, ApiQuery(q): ApiQuery<PageQuery>) -> ApiResult<Vec<TeacherView>> {
    let page = teacher_service::list_teachers(&state.db, q.pagination()).await?;
    info!(count = page.items.len(), total = page.total, "list teachers");
    Ok(listed(page, "Teachers retrieved successfully"))
}

/// Creates the person and its teacher record together.
#[utoipa::path(post, path = "/api/teachers", tag = "teachers", request_body = NewTeacherDoc,
    responses(
        (status = 201, description = "Teacher created"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "National id or email already registered")))]
pub async fn create(State(state): State<AppState>, ApiJson(input): ApiJson<NewTeacher>) -> CreatedResult<TeacherView> {
    let t = teacher_service::create_teacher(&state.db, input).await?;
    Ok(created(t, "Teacher created successfully"))
}

#[utoipa::path(get, path = "/api/teachers/{id}", tag = "teachers",
    params(("id" = Uuid, Path, description = "Teacher (person) id")),
    responses((status = 200, description = "Teacher"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<TeacherView> {
    let t = teacher_service::get_teacher(&state.db, id).await?;
    Ok(ok(t, "Teacher retrieved successfully"))
}

#[utoipa::path(put, path = "/api/teachers/{id}", tag = "teachers", request_body = TeacherPatchDoc,
    params(("id" = Uuid, Path, description = "Teacher (person) id")),
    responses((status = 200, description = "Teacher updated"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<TeacherPatch>,
) -> ApiResult<TeacherView> {
    let t = teacher_service::update_teacher(&state.db, id, patch).await?;
    Ok(ok(t, "Teacher updated successfully"))
}

/// Deletes the person too, with every assignment and block of the teacher.
#[utoipa::path(delete, path = "/api/teachers/{id}", tag = "teachers",
    params(("id" = Uuid, Path, description = "Teacher (person) id")),
    responses((status = 200, description = "Deleted teacher"), (status = 404, description = "Not found")))]
pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<TeacherView> {
    let t = teacher_service::delete_teacher(&state.db, id).await?;
    Ok(ok(t, "Teacher deleted successfully"))
}

#[utoipa::path(get, path = "/api/teachers/{id}/assignments", tag = "teachers",
    params(("id" = Uuid, Path, description = "Teacher (person) id")),
    responses((status = 200, description = "Assignments with course and subject names"), (status = 404, description = "Not found")))]
pub async fn assignments(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Vec<AssignmentDetail>> {
    let rows = teacher_service::list_teacher_assignments(&state.db, id).await?;
    Ok(ok(rows, "Teacher assignments retrieved successfully"))
}
