use axum::extract::State;
use service::domain::{TeacherLoad, WeeklySchedule};
use service::view_service;
use uuid::Uuid;

use super::{listed, ok, ApiResult, PageQuery};
use crate::extract::{ApiPath, ApiQuery};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/views/teacher-load", tag = "views", params(PageQuery),
    responses((status = 200, description = "Weekly load of each teacher")))]
pub async fn teacher_loads(State(state): State<AppState>, ApiQuery(q): ApiQuery<PageQuery>) -> ApiResult<Vec<TeacherLoad>> {
    let page = view_service::teacher_loads(&state.db, q.pagination()).await?;
    Ok(listed(page, "Teacher load retrieved successfully"))
}

#[utoipa::path(get, path = "/api/views/teacher-load/{teacher_id}", tag = "views",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    responses((status = 200, description = "Weekly load of one teacher"), (status = 404, description = "Not found")))]
pub async fn teacher_load(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<TeacherLoad> {
    let load = view_service::teacher_load(&state.db, id).await?;
    Ok(ok(load, "Teacher load retrieved successfully"))
}

#[utoipa::path(get, path = "/api/views/teachers/{teacher_id}/schedule", tag = "views",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    responses((status = 200, description = "Week timetable of a teacher"), (status = 404, description = "Not found")))]
pub async fn teacher_schedule(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<WeeklySchedule> {
    let week = view_service::teacher_schedule(&state.db, id).await?;
    Ok(ok(week, "Teacher schedule retrieved successfully"))
}

#[utoipa::path(get, path = "/api/views/courses/{course_id}/schedule", tag = "views",
    params(("course_id" = Uuid, Path, description = "Course id")),
    responses((status = 200, description = "Week timetable of a course"), (status = 404, description = "Not found")))]
pub async fn course_schedule(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<WeeklySchedule> {
    let week = view_service::course_schedule(&state.db, id).await?;
    Ok(ok(week, "Course schedule retrieved successfully"))
}
