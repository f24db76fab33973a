use axum::extract::State;
use models::assignment::{self, AssignmentKey};
use serde::Deserialize;
use service::assignment_service;
use service::domain::{AssignmentFilter, AssignmentPatch, NewAssignment};
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use super::{created, listed, ok, ApiResult, CreatedResult, PageQuery};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::openapi::{AssignmentPatchDoc, NewAssignmentDoc};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssignmentQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub teacher_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
}

fn key((teacher_id, course_id, subject_id): (Uuid, Uuid, Uuid)) -> AssignmentKey {
    AssignmentKey { teacher_id, course_id, subject_id }
}

#[utoipa::path(get, path = "/api/assignments", tag = "assignments", params(AssignmentQuery),
    responses((status = 200, description = "Page of assignments")))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<AssignmentQuery>,
) -> ApiResult<Vec<assignment::Model>> {
    let opts = PageQuery { page: q.page, per_page: q.per_page }.pagination();
    let filter = AssignmentFilter { teacher_id: q.teacher_id, course_id: q.course_id, subject_id: q.subject_id };
    let page = assignment_service::list_assignments(&state.db, filter, opts).await?;
    info!(count = page.items.len(), total = page.total, "list assignments");
    Ok(listed(page, "Assignments retrieved successfully"))
}

#[utoipa::path(post, path = "/api/assignments", tag = "assignments", request_body = NewAssignmentDoc,
    responses(
        (status = 201, description = "Assignment created"),
        (status = 404, description = "Teacher, course or subject missing"),
        (status = 409, description = "Assignment already exists")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewAssignment>,
) -> CreatedResult<assignment::Model> {
    let a = assignment_service::create_assignment(&state.db, input).await?;
    Ok(created(a, "Assignment created successfully"))
}

#[utoipa::path(get, path = "/api/assignments/{teacher_id}/{course_id}/{subject_id}", tag = "assignments",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher id"),
        ("course_id" = Uuid, Path, description = "Course id"),
        ("subject_id" = Uuid, Path, description = "Subject id")),
    responses((status = 200, description = "Assignment"), (status = 404, description = "Not found")))]
pub async fn get(
    State(state): State<AppState>,
    ApiPath(ids): ApiPath<(Uuid, Uuid, Uuid)>,
) -> ApiResult<assignment::Model> {
    let a = assignment_service::get_assignment(&state.db, key(ids)).await?;
    Ok(ok(a, "Assignment retrieved successfully"))
}

#[utoipa::path(put, path = "/api/assignments/{teacher_id}/{course_id}/{subject_id}", tag = "assignments",
    request_body = AssignmentPatchDoc,
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher id"),
        ("course_id" = Uuid, Path, description = "Course id"),
        ("subject_id" = Uuid, Path, description = "Subject id")),
    responses((status = 200, description = "Assignment updated"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(ids): ApiPath<(Uuid, Uuid, Uuid)>,
    ApiJson(patch): ApiJson<AssignmentPatch>,
) -> ApiResult<assignment::Model> {
    let a = assignment_service::update_assignment(&state.db, key(ids), patch).await?;
    Ok(ok(a, "Assignment updated successfully"))
}

/// Also removes the assignment's schedule blocks.
#[utoipa::path(delete, path = "/api/assignments/{teacher_id}/{course_id}/{subject_id}", tag = "assignments",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher id"),
        ("course_id" = Uuid, Path, description = "Course id"),
        ("subject_id" = Uuid, Path, description = "Subject id")),
    responses((status = 200, description = "Deleted assignment"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(ids): ApiPath<(Uuid, Uuid, Uuid)>,
) -> ApiResult<assignment::Model> {
    let a = assignment_service::delete_assignment(&state.db, key(ids)).await?;
    Ok(ok(a, "Assignment deleted successfully"))
}
