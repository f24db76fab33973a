use axum::extract::State;
use models::course;
use service::course_service;
use service::domain::{CoursePatch, NewCourse};
use tracing::info;
use uuid::Uuid;

use super::{created, listed, ok, ApiResult, CreatedResult, PageQuery};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::openapi::{CoursePatchDoc, NewCourseDoc};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/courses", tag = "courses", params(PageQuery),
    responses((status = 200, description = "Page of courses")))]
pub async fn list(State(state): State<AppState>, ApiQuery(q): ApiQuery<PageQuery>) -> ApiResult<Vec<course::Model>> {
    let page = course_service::list_courses(&state.db, q.pagination()).await?;
    info!(count = page.items.len(), total = page.total, "list courses");
    Ok(listed(page, "Courses retrieved successfully"))
}

#[utoipa::path(post, path = "/api/courses", tag = "courses", request_body = NewCourseDoc,
    responses((status = 201, description = "Course created"), (status = 409, description = "Same name, level and section exists")))]
pub async fn create(State(state): State<AppState>, ApiJson(input): ApiJson<NewCourse>) -> CreatedResult<course::Model> {
    let c = course_service::create_course(&state.db, input).await?;
    Ok(created(c, "Course created successfully"))
}

#[utoipa::path(get, path = "/api/courses/{id}", tag = "courses",
    params(("id" = Uuid, Path, description = "Course id")),
    responses((status = 200, description = "Course"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<course::Model> {
    let c = course_service::get_course(&state.db, id).await?;
    Ok(ok(c, "Course retrieved successfully"))
}

#[utoipa::path(put, path = "/api/courses/{id}", tag = "courses", request_body = CoursePatchDoc,
    params(("id" = Uuid, Path, description = "Course id")),
    responses((status = 200, description = "Course updated"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<CoursePatch>,
) -> ApiResult<course::Model> {
    let c = course_service::update_course(&state.db, id, patch).await?;
    Ok(ok(c, "Course updated successfully"))
}

/// Also removes the course's assignments and their blocks.
#[utoipa::path(delete, path = "/api/courses/{id}", tag = "courses",
    params(("id" = Uuid, Path, description = "Course id")),
    responses((status = 200, description = "Deleted course"), (status = 404, description = "Not found")))]
pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<course::Model> {
    let c = course_service::delete_course(&state.db, id).await?;
    Ok(ok(c, "Course deleted successfully"))
}
