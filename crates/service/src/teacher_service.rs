use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use models::person::{self, PersonKind};
use models::{assignment, course, position, schedule_block, subject, teacher};
use crate::domain::{AssignmentDetail, NewTeacher, TeacherPatch, TeacherView};
use crate::errors::ServiceError;
use crate::person_service::{delete_person_cascade, insert_person, patch_person};
use crate::{Page, Pagination};

async fn position_names<C: ConnectionTrait>(
    db: &C,
    persons: impl Iterator<Item = &person::Model>,
) -> Result<HashMap<Uuid, String>, ServiceError> {
    let ids: Vec<Uuid> = persons.filter_map(|p| p.position_id).collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = position::Entity::find().filter(position::Column::Id.is_in(ids)).all(db).await?;
    Ok(rows.into_iter().map(|p| (p.id, p.name)).collect())
}

async fn load_view<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<TeacherView, ServiceError> {
    let (t, p) = teacher::Entity::find_by_id(id)
        .find_also_related(person::Entity)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("teacher"))?;
    let p = p.ok_or_else(|| ServiceError::Db(format!("teacher {id} has no person row")))?;
    let names = position_names(db, std::iter::once(&p)).await?;
    let position_name = p.position_id.and_then(|pid| names.get(&pid).cloned());
    Ok(TeacherView::new(p, t, position_name))
}

/// Fails with `NotFound` unless `id` is a teacher.
pub(crate) async fn ensure_exists<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<teacher::Model, ServiceError> {
    teacher::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("teacher"))
}

/// Create the person and its teacher record in one transaction.
#[instrument(skip(db, input), fields(national_id = %input.person.national_id))]
pub async fn create_teacher(db: &DatabaseConnection, input: NewTeacher) -> Result<TeacherView, ServiceError> {
    let academic_title = teacher::validate_academic_title(input.academic_title.as_deref())?;
    let specialty = teacher::validate_specialty(input.specialty.as_deref())?;

    let txn = db.begin().await?;
    let p = insert_person(&txn, input.person, PersonKind::Teacher).await?;
    let now = Utc::now().into();
    teacher::ActiveModel {
        person_id: Set(p.id),
        academic_title: Set(academic_title),
        specialty: Set(specialty),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    let view = load_view(&txn, p.id).await?;
    txn.commit().await?;
    info!(teacher_id = %p.id, "teacher_created");
    Ok(view)
}

/// Get a teacher with its person data.
pub async fn get_teacher(db: &DatabaseConnection, id: Uuid) -> Result<TeacherView, ServiceError> {
    load_view(db, id).await
}

/// List teachers ordered by surname.
pub async fn list_teachers(db: &DatabaseConnection, opts: Pagination) -> Result<Page<TeacherView>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let paginator = teacher::Entity::find()
        .find_also_related(person::Entity)
        .order_by_asc(person::Column::PaternalSurname)
        .order_by_asc(person::Column::FirstNames)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let rows: Vec<(teacher::Model, person::Model)> = paginator
        .fetch_page(page_idx)
        .await?
        .into_iter()
        .filter_map(|(t, p)| p.map(|p| (t, p)))
        .collect();
    let names = position_names(db, rows.iter().map(|(_, p)| p)).await?;
    let items = rows
        .into_iter()
        .map(|(t, p)| {
            let position_name = p.position_id.and_then(|pid| names.get(&pid).cloned());
            TeacherView::new(p, t, position_name)
        })
        .collect();
    Ok(Page::new(items, total, page_idx, per_page))
}

/// Update person and academic fields of a teacher together.
#[instrument(skip(db, patch), fields(teacher_id = %id))]
pub async fn update_teacher(db: &DatabaseConnection, id: Uuid, patch: TeacherPatch) -> Result<TeacherView, ServiceError> {
    let txn = db.begin().await?;
    let t = ensure_exists(&txn, id).await?;
    let p = person::Entity::find_by_id(id).one(&txn).await?.ok_or_else(|| ServiceError::not_found("person"))?;
    patch_person(&txn, p, patch.person, None).await?;

    let mut am: teacher::ActiveModel = t.into();
    if let Some(v) = patch.academic_title.as_deref() { am.academic_title = Set(teacher::validate_academic_title(Some(v))?); }
    if let Some(v) = patch.specialty.as_deref() { am.specialty = Set(teacher::validate_specialty(Some(v))?); }
    am.updated_at = Set(Utc::now().into());
    am.update(&txn).await?;

    let view = load_view(&txn, id).await?;
    txn.commit().await?;
    info!("teacher_updated");
    Ok(view)
}

/// Delete a teacher together with its person row, assignments and blocks.
#[instrument(skip(db), fields(teacher_id = %id))]
pub async fn delete_teacher(db: &DatabaseConnection, id: Uuid) -> Result<TeacherView, ServiceError> {
    let txn = db.begin().await?;
    let view = load_view(&txn, id).await?;
    let (assignments, blocks) = delete_person_cascade(&txn, id).await?;
    txn.commit().await?;
    info!(assignments, blocks, "teacher_deleted");
    Ok(view)
}

/// Assignments of one teacher, labelled with course and subject names.
pub async fn list_teacher_assignments(db: &DatabaseConnection, id: Uuid) -> Result<Vec<AssignmentDetail>, ServiceError> {
    let t = load_view(db, id).await?;
    let rows = assignment::Entity::find()
        .filter(assignment::Column::TeacherId.eq(id))
        .all(db)
        .await?;
    let blocks = schedule_block::Entity::find()
        .filter(schedule_block::Column::TeacherId.eq(id))
        .all(db)
        .await?;
    let courses: HashMap<Uuid, course::Model> = course::Entity::find()
        .filter(course::Column::Id.is_in(rows.iter().map(|a| a.course_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let subjects: HashMap<Uuid, subject::Model> = subject::Entity::find()
        .filter(subject::Column::Id.is_in(rows.iter().map(|a| a.subject_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let mut details: Vec<AssignmentDetail> = rows
        .into_iter()
        .map(|a| {
            let own: Vec<&schedule_block::Model> = blocks
                .iter()
                .filter(|b| b.course_id == a.course_id && b.subject_id == a.subject_id)
                .collect();
            let course = courses.get(&a.course_id);
            let subject = subjects.get(&a.subject_id);
            AssignmentDetail {
                teacher_name: t.full_name.clone(),
                course_label: course.map(|c| c.label()).unwrap_or_default(),
                subject_code: subject.map(|s| s.code.clone()).unwrap_or_default(),
                subject_name: subject.map(|s| s.name.clone()).unwrap_or_default(),
                block_count: own.len() as u64,
                scheduled_minutes: own.iter().map(|b| b.duration_minutes()).sum(),
                assignment: a,
            }
        })
        .collect();
    details.sort_by(|x, y| (&x.course_label, &x.subject_code).cmp(&(&y.course_label, &y.subject_code)));
    Ok(details)
}
