use axum::extract::State;
use models::position;
use service::domain::{NewPosition, PositionPatch};
use service::position_service;
use tracing::info;
use uuid::Uuid;

use super::{created, listed, ok, ApiResult, CreatedResult, PageQuery};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::openapi::{NewPositionDoc, PositionPatchDoc};
use crate::state::AppState;

#[utoipa::path(get, path = "/api/positions", tag = "positions", params(PageQuery),
    responses((status = 200, description = "Page of positions")))]
pub async fn list(State(state): State<AppState>, ApiQuery(q): ApiQuery<PageQuery>) -> ApiResult<Vec<position::Model>> {
    let page = position_service::list_positions(&state.db, q.pagination()).await?;
    info!(count = page.items.len(), total = page.total, "list positions");
    Ok(listed(page, "Positions retrieved successfully"))
}

#[utoipa::path(post, path = "/api/positions", tag = "positions", request_body = NewPositionDoc,
    responses((status = 201, description = "Position created"), (status = 409, description = "Name taken")))]
pub async fn create(State(state): State<AppState>, ApiJson(input): ApiJson<NewPosition>) -> CreatedResult<position::Model> {
    let p = position_service::create_position(&state.db, input).await?;
    Ok(created(p, "Position created successfully"))
}

#[utoipa::path(get, path = "/api/positions/{id}", tag = "positions",
    params(("id" = Uuid, Path, description = "Position id")),
    responses((status = 200, description = "Position"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<position::Model> {
    let p = position_service::get_position(&state.db, id).await?;
    Ok(ok(p, "Position retrieved successfully"))
}

#[utoipa::path(put, path = "/api/positions/{id}", tag = "positions", request_body = PositionPatchDoc,
    params(("id" = Uuid, Path, description = "Position id")),
    responses((status = 200, description = "Position updated"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<PositionPatch>,
) -> ApiResult<position::Model> {
    let p = position_service::update_position(&state.db, id, patch).await?;
    Ok(ok(p, "Position updated successfully"))
}

#[utoipa::path(delete, path = "/api/positions/{id}", tag = "positions",
    params(("id" = Uuid, Path, description = "Position id")),
    responses((status = 200, description = "Deleted position"), (status = 404, description = "Not found")))]
pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<position::Model> {
    let p = position_service::delete_position(&state.db, id).await?;
    Ok(ok(p, "Position deleted successfully"))
}
