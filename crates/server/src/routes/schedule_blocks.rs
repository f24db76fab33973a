use axum::extract::State;
use models::schedule_block::{self, Weekday};
use serde::Deserialize;
use service::domain::{NewScheduleBlock, ScheduleBlockFilter, ScheduleBlockPatch};
use service::schedule_service;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use super::{created, listed, ok, ApiResult, CreatedResult, PageQuery};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::openapi::{NewScheduleBlockDoc, ScheduleBlockPatchDoc};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleBlockQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub teacher_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    /// Day name, e.g. `monday` or `lunes`
    #[param(value_type = Option<String>)]
    pub day: Option<Weekday>,
}

#[utoipa::path(get, path = "/api/schedule-blocks", tag = "schedule-blocks", params(ScheduleBlockQuery),
    responses((status = 200, description = "Page of schedule blocks")))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<ScheduleBlockQuery>,
) -> ApiResult<Vec<schedule_block::Model>> {
    let opts = PageQuery { page: q.page, per_page: q.per_page }.pagination();
    let filter = ScheduleBlockFilter {
        teacher_id: q.teacher_id,
        course_id: q.course_id,
        subject_id: q.subject_id,
        day: q.day,
    };
    let page = schedule_service::list_blocks(&state.db, filter, opts).await?;
    info!(count = page.items.len(), total = page.total, "list schedule blocks");
    Ok(listed(page, "Schedule blocks retrieved successfully"))
}

/// Rejected with `SCHEDULE_CONFLICT` when it overlaps another block of the same teacher and day.
#[utoipa::path(post, path = "/api/schedule-blocks", tag = "schedule-blocks", request_body = NewScheduleBlockDoc,
    responses(
        (status = 201, description = "Block created"),
        (status = 400, description = "Invalid time range"),
        (status = 404, description = "Assignment missing"),
        (status = 409, description = "Overlaps an existing block")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewScheduleBlock>,
) -> CreatedResult<schedule_block::Model> {
    let b = schedule_service::create_block(&state.db, input).await?;
    Ok(created(b, "Schedule block created successfully"))
}

#[utoipa::path(get, path = "/api/schedule-blocks/{id}", tag = "schedule-blocks",
    params(("id" = Uuid, Path, description = "Block id")),
    responses((status = 200, description = "Schedule block"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<schedule_block::Model> {
    let b = schedule_service::get_block(&state.db, id).await?;
    Ok(ok(b, "Schedule block retrieved successfully"))
}

#[utoipa::path(put, path = "/api/schedule-blocks/{id}", tag = "schedule-blocks", request_body = ScheduleBlockPatchDoc,
    params(("id" = Uuid, Path, description = "Block id")),
    responses(
        (status = 200, description = "Block updated"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Overlaps an existing block")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<ScheduleBlockPatch>,
) -> ApiResult<schedule_block::Model> {
    let b = schedule_service::update_block(&state.db, id, patch).await?;
    Ok(ok(b, "Schedule block updated successfully"))
}

#[utoipa::path(delete, path = "/api/schedule-blocks/{id}", tag = "schedule-blocks",
    params(("id" = Uuid, Path, description = "Block id")),
    responses((status = 200, description = "Deleted block"), (status = 404, description = "Not found")))]
pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<schedule_block::Model> {
    let b = schedule_service::delete_block(&state.db, id).await?;
    Ok(ok(b, "Schedule block deleted successfully"))
}
