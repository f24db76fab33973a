use axum::extract::State;
use models::person::PersonKind;
use serde::Deserialize;
use service::domain::{NewPerson, PersonPatch, PersonView};
use service::person_service;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use super::{created, listed, ok, ApiResult, CreatedResult, PageQuery};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::openapi::{NewPersonDoc, PersonPatchDoc};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PersonQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// `teacher`, `administrative` or `support`
    #[param(value_type = Option<String>)]
    pub kind: Option<PersonKind>,
}

#[utoipa::path(get, path = "/api/persons", tag = "persons", params(PersonQuery),
    responses((status = 200, description = "Page of persons")))]
pub async fn list(State(state): State<AppState>, ApiQuery(q): ApiQuery<PersonQuery>) -> ApiResult<Vec<PersonView>> {
    let opts = PageQuery { page: q.page, per_page: q.per_page }.pagination();
    let page = person_service::list_persons(&state.db, q.kind, opts).await?;
    info!(count = page.items.len(), total = page.total, kind = ?q.kind, "list persons");
    Ok(listed(page.map(PersonView::from), "Persons retrieved successfully"))
}

/// Registers administrative or support staff; teachers use `/api/teachers`.
#[utoipa::path(post, path = "/api/persons", tag = "persons", request_body = NewPersonDoc,
    responses(
        (status = 201, description = "Person created"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "National id or email already registered")))]
pub async fn create(State(state): State<AppState>, ApiJson(input): ApiJson<NewPerson>) -> CreatedResult<PersonView> {
    let p = person_service::create_person(&state.db, input).await?;
    Ok(created(PersonView::from(p), "Person created successfully"))
}

#[utoipa::path(get, path = "/api/persons/{id}", tag = "persons",
    params(("id" = Uuid, Path, description = "Person id")),
    responses((status = 200, description = "Person"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<PersonView> {
    let p = person_service::get_person(&state.db, id).await?;
    Ok(ok(PersonView::from(p), "Person retrieved successfully"))
}

#[utoipa::path(put, path = "/api/persons/{id}", tag = "persons", request_body = PersonPatchDoc,
    params(("id" = Uuid, Path, description = "Person id")),
    responses(
        (status = 200, description = "Person updated"),
        (status = 404, description = "Not found"),
        (status = 409, description = "National id or email already registered")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<PersonPatch>,
) -> ApiResult<PersonView> {
    let p = person_service::update_person(&state.db, id, patch).await?;
    Ok(ok(PersonView::from(p), "Person updated successfully"))
}

/// Cascades to the teacher record, its assignments and blocks.
#[utoipa::path(delete, path = "/api/persons/{id}", tag = "persons",
    params(("id" = Uuid, Path, description = "Person id")),
    responses((status = 200, description = "Deleted person"), (status = 404, description = "Not found")))]
pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<PersonView> {
    let p = person_service::delete_person(&state.db, id).await?;
    Ok(ok(PersonView::from(p), "Person deleted successfully"))
}
