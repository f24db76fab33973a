use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{info, instrument};

use models::assignment::{self, AssignmentKey};
use models::schedule_block;
use crate::domain::{AssignmentFilter, AssignmentPatch, NewAssignment};
use crate::errors::ServiceError;
use crate::{course_service, subject_service, teacher_service, Page, Pagination};

pub(crate) async fn find<C: ConnectionTrait>(db: &C, key: AssignmentKey) -> Result<Option<assignment::Model>, ServiceError> {
    Ok(assignment::Entity::find_by_id(key.as_tuple()).one(db).await?)
}

pub(crate) async fn ensure_exists<C: ConnectionTrait>(db: &C, key: AssignmentKey) -> Result<assignment::Model, ServiceError> {
    find(db, key).await?.ok_or_else(|| ServiceError::not_found("assignment"))
}

/// Bind a teacher to a course and subject. All three must exist.
#[instrument(skip(db, input), fields(teacher_id = %input.teacher_id, course_id = %input.course_id, subject_id = %input.subject_id))]
pub async fn create_assignment(db: &DatabaseConnection, input: NewAssignment) -> Result<assignment::Model, ServiceError> {
    let planned = assignment::validate_planned_hours(input.planned_weekly_hours)?;
    let key = AssignmentKey { teacher_id: input.teacher_id, course_id: input.course_id, subject_id: input.subject_id };

    let txn = db.begin().await?;
    teacher_service::ensure_exists(&txn, key.teacher_id).await?;
    course_service::ensure_exists(&txn, key.course_id).await?;
    subject_service::ensure_exists(&txn, key.subject_id).await?;
    if find(&txn, key).await?.is_some() {
        return Err(ServiceError::conflict("teacher already teaches this subject to this course"));
    }
    let now = Utc::now().into();
    let created = assignment::ActiveModel {
        teacher_id: Set(key.teacher_id),
        course_id: Set(key.course_id),
        subject_id: Set(key.subject_id),
        planned_weekly_hours: Set(planned),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!("assignment_created");
    Ok(created)
}

pub async fn get_assignment(db: &DatabaseConnection, key: AssignmentKey) -> Result<assignment::Model, ServiceError> {
    ensure_exists(db, key).await
}

/// List assignments, narrowed by any combination of teacher, course and subject.
pub async fn list_assignments(
    db: &DatabaseConnection,
    filter: AssignmentFilter,
    opts: Pagination,
) -> Result<Page<assignment::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut finder = assignment::Entity::find();
    if let Some(id) = filter.teacher_id { finder = finder.filter(assignment::Column::TeacherId.eq(id)); }
    if let Some(id) = filter.course_id { finder = finder.filter(assignment::Column::CourseId.eq(id)); }
    if let Some(id) = filter.subject_id { finder = finder.filter(assignment::Column::SubjectId.eq(id)); }
    let paginator = finder
        .order_by_asc(assignment::Column::TeacherId)
        .order_by_asc(assignment::Column::CourseId)
        .order_by_asc(assignment::Column::SubjectId)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(Page::new(items, total, page_idx, per_page))
}

/// Only the planned hours are mutable; the key is the identity.
#[instrument(skip(db, patch), fields(teacher_id = %key.teacher_id, course_id = %key.course_id, subject_id = %key.subject_id))]
pub async fn update_assignment(
    db: &DatabaseConnection,
    key: AssignmentKey,
    patch: AssignmentPatch,
) -> Result<assignment::Model, ServiceError> {
    let planned = assignment::validate_planned_hours(patch.planned_weekly_hours)?;
    let txn = db.begin().await?;
    let mut am: assignment::ActiveModel = ensure_exists(&txn, key).await?.into();
    if planned.is_some() { am.planned_weekly_hours = Set(planned); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    info!("assignment_updated");
    Ok(updated)
}

/// Delete an assignment and its schedule blocks.
#[instrument(skip(db), fields(teacher_id = %key.teacher_id, course_id = %key.course_id, subject_id = %key.subject_id))]
pub async fn delete_assignment(db: &DatabaseConnection, key: AssignmentKey) -> Result<assignment::Model, ServiceError> {
    let txn = db.begin().await?;
    let existing = ensure_exists(&txn, key).await?;
    let blocks = schedule_block::Entity::delete_many()
        .filter(schedule_block::Column::TeacherId.eq(key.teacher_id))
        .filter(schedule_block::Column::CourseId.eq(key.course_id))
        .filter(schedule_block::Column::SubjectId.eq(key.subject_id))
        .exec(&txn)
        .await?;
    assignment::Entity::delete_by_id(key.as_tuple()).exec(&txn).await?;
    txn.commit().await?;
    info!(blocks = blocks.rows_affected, "assignment_deleted");
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course_service::create_course;
    use crate::domain::NewScheduleBlock;
    use crate::schedule_service::{create_block, get_block};
    use crate::subject_service::create_subject;
    use crate::teacher_service::create_teacher;
    use crate::test_support::{get_db, hm, new_course, new_subject, new_teacher};
    use models::schedule_block::Weekday;
    use uuid::Uuid;

    #[tokio::test]
    async fn assignment_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = create_teacher(&db, new_teacher("asg")).await?;
        let c = create_course(&db, new_course("4to")).await?;
        let s = create_subject(&db, new_subject("BIO-4")).await?;
        let input = NewAssignment { teacher_id: t.person.id, course_id: c.id, subject_id: s.id, planned_weekly_hours: Some(3) };

        let a = create_assignment(&db, input.clone()).await?;
        assert_eq!(a.planned_weekly_hours, Some(3));
        assert!(matches!(create_assignment(&db, input).await, Err(ServiceError::Conflict(_))));

        let updated = update_assignment(&db, a.key(), AssignmentPatch { planned_weekly_hours: Some(5) }).await?;
        assert_eq!(updated.planned_weekly_hours, Some(5));
        let bad = update_assignment(&db, a.key(), AssignmentPatch { planned_weekly_hours: Some(99) }).await;
        assert!(matches!(bad, Err(ServiceError::Model(_))));

        let by_course = list_assignments(
            &db,
            AssignmentFilter { course_id: Some(c.id), ..Default::default() },
            Pagination::default(),
        )
        .await?;
        assert_eq!(by_course.total, 1);
        let none = list_assignments(
            &db,
            AssignmentFilter { subject_id: Some(Uuid::new_v4()), ..Default::default() },
            Pagination::default(),
        )
        .await?;
        assert_eq!(none.total, 0);

        let b = create_block(
            &db,
            NewScheduleBlock {
                teacher_id: t.person.id,
                course_id: c.id,
                subject_id: s.id,
                day: Weekday::Monday,
                start_time: hm(10, 0),
                end_time: hm(11, 0),
                room: Some("Lab 1".into()),
            },
        )
        .await?;
        delete_assignment(&db, a.key()).await?;
        assert!(matches!(get_assignment(&db, a.key()).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(get_block(&db, b.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn references_must_exist() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = create_teacher(&db, new_teacher("ref")).await?;
        let c = create_course(&db, new_course("5to")).await?;
        let missing_subject = NewAssignment {
            teacher_id: t.person.id,
            course_id: c.id,
            subject_id: Uuid::new_v4(),
            planned_weekly_hours: None,
        };
        let err = create_assignment(&db, missing_subject).await;
        assert!(matches!(err, Err(ServiceError::NotFound(m)) if m.contains("subject")));
        Ok(())
    }
}
