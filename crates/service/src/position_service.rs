use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, Value,
};
use tracing::{info, instrument};
use uuid::Uuid;

use models::{person, position};
use crate::domain::{NewPosition, PositionPatch};
use crate::errors::ServiceError;
use crate::{Page, Pagination};

async fn ensure_name_free<C: ConnectionTrait>(db: &C, name: &str, exclude: Option<Uuid>) -> Result<(), ServiceError> {
    let mut finder = position::Entity::find().filter(position::Column::Name.eq(name));
    if let Some(id) = exclude { finder = finder.filter(position::Column::Id.ne(id)); }
    if finder.one(db).await?.is_some() {
        return Err(ServiceError::conflict(format!("position '{name}' already exists")));
    }
    Ok(())
}

/// Fails with `NotFound` unless the position exists. `None` passes.
pub(crate) async fn ensure_exists<C: ConnectionTrait>(db: &C, id: Option<Uuid>) -> Result<(), ServiceError> {
    if let Some(id) = id {
        position::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("position"))?;
    }
    Ok(())
}

/// Create a position after validation.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_position(db: &DatabaseConnection, input: NewPosition) -> Result<position::Model, ServiceError> {
    let name = position::validate_name(&input.name)?;
    let description = position::validate_description(input.description.as_deref())?;

    let txn = db.begin().await?;
    ensure_name_free(&txn, &name, None).await?;
    let now = Utc::now().into();
    let created = position::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(position_id = %created.id, "position_created");
    Ok(created)
}

/// Get a position by id.
pub async fn get_position(db: &DatabaseConnection, id: Uuid) -> Result<position::Model, ServiceError> {
    position::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("position"))
}

/// List positions ordered by name.
pub async fn list_positions(db: &DatabaseConnection, opts: Pagination) -> Result<Page<position::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let paginator = position::Entity::find().order_by_asc(position::Column::Name).paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(Page::new(items, total, page_idx, per_page))
}

/// Update a position with optional fields.
#[instrument(skip(db, patch), fields(position_id = %id))]
pub async fn update_position(db: &DatabaseConnection, id: Uuid, patch: PositionPatch) -> Result<position::Model, ServiceError> {
    let txn = db.begin().await?;
    let existing = position::Entity::find_by_id(id).one(&txn).await?.ok_or_else(|| ServiceError::not_found("position"))?;
    let mut am: position::ActiveModel = existing.into();
    if let Some(n) = patch.name.as_deref() {
        let n = position::validate_name(n)?;
        ensure_name_free(&txn, &n, Some(id)).await?;
        am.name = Set(n);
    }
    if let Some(d) = patch.description.as_deref() { am.description = Set(position::validate_description(Some(d))?); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    info!("position_updated");
    Ok(updated)
}

/// Delete a position; persons holding it keep their record with no position.
#[instrument(skip(db), fields(position_id = %id))]
pub async fn delete_position(db: &DatabaseConnection, id: Uuid) -> Result<position::Model, ServiceError> {
    let txn = db.begin().await?;
    let existing = position::Entity::find_by_id(id).one(&txn).await?.ok_or_else(|| ServiceError::not_found("position"))?;
    let detached = person::Entity::update_many()
        .col_expr(person::Column::PositionId, Expr::value(Value::Uuid(None)))
        .filter(person::Column::PositionId.eq(id))
        .exec(&txn)
        .await?;
    position::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(detached_persons = detached.rows_affected, "position_deleted");
    Ok(existing)
}
