use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use models::person::{self, PersonKind};
use models::{assignment, schedule_block, teacher};
use crate::domain::{NewPerson, PersonFields, PersonFieldsPatch, PersonPatch};
use crate::errors::ServiceError;
use crate::{position_service, Page, Pagination};

/// Reject a national id or email already held by another person.
pub(crate) async fn ensure_unique_identity<C: ConnectionTrait>(
    db: &C,
    national_id: Option<&str>,
    email: Option<&str>,
    exclude: Option<Uuid>,
) -> Result<(), ServiceError> {
    let scoped = |cond: Condition| match exclude {
        Some(id) => cond.add(person::Column::Id.ne(id)),
        None => cond,
    };
    if let Some(nid) = national_id {
        let taken = person::Entity::find()
            .filter(scoped(Condition::all().add(person::Column::NationalId.eq(nid))))
            .one(db)
            .await?;
        if taken.is_some() {
            return Err(ServiceError::conflict(format!("national_id '{nid}' is already registered")));
        }
    }
    if let Some(email) = email {
        let taken = person::Entity::find()
            .filter(scoped(Condition::all().add(person::Column::Email.eq(email))))
            .one(db)
            .await?;
        if taken.is_some() {
            return Err(ServiceError::conflict(format!("email '{email}' is already registered")));
        }
    }
    Ok(())
}

/// Validate and insert a person row inside the caller's transaction.
pub(crate) async fn insert_person<C: ConnectionTrait>(
    db: &C,
    fields: PersonFields,
    kind: PersonKind,
) -> Result<person::Model, ServiceError> {
    let national_id = person::validate_national_id(&fields.national_id)?;
    let email = person::validate_email(&fields.email)?;
    let first_names = person::validate_first_names(&fields.first_names)?;
    let paternal_surname = person::validate_paternal_surname(&fields.paternal_surname)?;
    let maternal_surname = person::validate_maternal_surname(fields.maternal_surname.as_deref())?;
    let address = person::validate_address(fields.address.as_deref())?;
    let phone = person::validate_phone(fields.phone.as_deref())?;

    ensure_unique_identity(db, Some(&national_id), Some(&email), None).await?;
    position_service::ensure_exists(db, fields.position_id).await?;

    let now = Utc::now().into();
    let created = person::ActiveModel {
        id: Set(Uuid::new_v4()),
        national_id: Set(national_id),
        first_names: Set(first_names),
        paternal_surname: Set(paternal_surname),
        maternal_surname: Set(maternal_surname),
        address: Set(address),
        email: Set(email),
        phone: Set(phone),
        kind: Set(kind.as_str().to_string()),
        position_id: Set(fields.position_id),
        hire_date: Set(fields.hire_date),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;
    Ok(created)
}

/// Apply a partial update to a person row inside the caller's transaction.
pub(crate) async fn patch_person<C: ConnectionTrait>(
    db: &C,
    existing: person::Model,
    patch: PersonFieldsPatch,
    kind: Option<PersonKind>,
) -> Result<person::Model, ServiceError> {
    let id = existing.id;
    let national_id = patch.national_id.as_deref().map(person::validate_national_id).transpose()?;
    let email = patch.email.as_deref().map(person::validate_email).transpose()?;
    ensure_unique_identity(db, national_id.as_deref(), email.as_deref(), Some(id)).await?;
    position_service::ensure_exists(db, patch.position_id).await?;

    let mut am: person::ActiveModel = existing.into();
    if let Some(v) = national_id { am.national_id = Set(v); }
    if let Some(v) = email { am.email = Set(v); }
    if let Some(v) = patch.first_names.as_deref() { am.first_names = Set(person::validate_first_names(v)?); }
    if let Some(v) = patch.paternal_surname.as_deref() { am.paternal_surname = Set(person::validate_paternal_surname(v)?); }
    if let Some(v) = patch.maternal_surname.as_deref() { am.maternal_surname = Set(person::validate_maternal_surname(Some(v))?); }
    if let Some(v) = patch.address.as_deref() { am.address = Set(person::validate_address(Some(v))?); }
    if let Some(v) = patch.phone.as_deref() { am.phone = Set(person::validate_phone(Some(v))?); }
    if let Some(v) = patch.position_id { am.position_id = Set(Some(v)); }
    if let Some(v) = patch.hire_date { am.hire_date = Set(Some(v)); }
    if let Some(k) = kind { am.kind = Set(k.as_str().to_string()); }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Delete a person and everything hanging off it: blocks, assignments, teacher row.
///
/// Runs inside the caller's transaction; the FK cascades would do the same but
/// not every backend enforces them.
pub(crate) async fn delete_person_cascade<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(u64, u64), ServiceError> {
    let blocks = schedule_block::Entity::delete_many()
        .filter(schedule_block::Column::TeacherId.eq(id))
        .exec(db)
        .await?;
    let assignments = assignment::Entity::delete_many()
        .filter(assignment::Column::TeacherId.eq(id))
        .exec(db)
        .await?;
    teacher::Entity::delete_by_id(id).exec(db).await?;
    person::Entity::delete_by_id(id).exec(db).await?;
    Ok((assignments.rows_affected, blocks.rows_affected))
}

/// Create a non-teaching person. Teachers go through the teacher service.
#[instrument(skip(db, input), fields(national_id = %input.fields.national_id))]
pub async fn create_person(db: &DatabaseConnection, input: NewPerson) -> Result<person::Model, ServiceError> {
    let kind = input.kind.unwrap_or(PersonKind::Administrative);
    if kind == PersonKind::Teacher {
        return Err(ServiceError::Validation("teachers are registered through the teacher endpoints".into()));
    }
    let txn = db.begin().await?;
    let created = insert_person(&txn, input.fields, kind).await?;
    txn.commit().await?;
    info!(person_id = %created.id, kind = %kind, "person_created");
    Ok(created)
}

/// Get a person by id.
pub async fn get_person(db: &DatabaseConnection, id: Uuid) -> Result<person::Model, ServiceError> {
    person::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("person"))
}

/// List persons by surname, optionally only one kind.
pub async fn list_persons(
    db: &DatabaseConnection,
    kind: Option<PersonKind>,
    opts: Pagination,
) -> Result<Page<person::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut finder = person::Entity::find();
    if let Some(k) = kind { finder = finder.filter(person::Column::Kind.eq(k.as_str())); }
    let paginator = finder
        .order_by_asc(person::Column::PaternalSurname)
        .order_by_asc(person::Column::FirstNames)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(Page::new(items, total, page_idx, per_page))
}

/// Update a person. The teacher kind can be neither granted nor removed here.
#[instrument(skip(db, patch), fields(person_id = %id))]
pub async fn update_person(db: &DatabaseConnection, id: Uuid, patch: PersonPatch) -> Result<person::Model, ServiceError> {
    let txn = db.begin().await?;
    let existing = person::Entity::find_by_id(id).one(&txn).await?.ok_or_else(|| ServiceError::not_found("person"))?;
    if let Some(k) = patch.kind {
        if existing.is_teacher() != (k == PersonKind::Teacher) {
            return Err(ServiceError::Validation("teacher status is managed through the teacher endpoints".into()));
        }
    }
    let updated = patch_person(&txn, existing, patch.fields, patch.kind).await?;
    txn.commit().await?;
    info!("person_updated");
    Ok(updated)
}

/// Delete a person, cascading to its teacher record, assignments and blocks.
#[instrument(skip(db), fields(person_id = %id))]
pub async fn delete_person(db: &DatabaseConnection, id: Uuid) -> Result<person::Model, ServiceError> {
    let txn = db.begin().await?;
    let existing = person::Entity::find_by_id(id).one(&txn).await?.ok_or_else(|| ServiceError::not_found("person"))?;
    let (assignments, blocks) = delete_person_cascade(&txn, id).await?;
    txn.commit().await?;
    info!(assignments, blocks, "person_deleted");
    Ok(existing)
}
