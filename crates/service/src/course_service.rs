use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use models::{assignment, course, schedule_block};
use crate::domain::{CoursePatch, NewCourse};
use crate::errors::ServiceError;
use crate::{Page, Pagination};

/// `(name, level, section)` identifies a course; a missing section counts as a value.
async fn ensure_identity_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    level: &str,
    section: Option<&str>,
    exclude: Option<Uuid>,
) -> Result<(), ServiceError> {
    let mut finder = course::Entity::find()
        .filter(course::Column::Name.eq(name))
        .filter(course::Column::Level.eq(level));
    finder = match section {
        Some(s) => finder.filter(course::Column::Section.eq(s)),
        None => finder.filter(course::Column::Section.is_null()),
    };
    if let Some(id) = exclude { finder = finder.filter(course::Column::Id.ne(id)); }
    if finder.one(db).await?.is_some() {
        return Err(ServiceError::conflict(format!(
            "course '{} {} {}' already exists",
            name,
            level,
            section.unwrap_or("-")
        )));
    }
    Ok(())
}

pub(crate) async fn ensure_exists<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<course::Model, ServiceError> {
    course::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("course"))
}

#[instrument(skip(db, input), fields(name = %input.name, level = %input.level))]
pub async fn create_course(db: &DatabaseConnection, input: NewCourse) -> Result<course::Model, ServiceError> {
    let name = course::validate_name(&input.name)?;
    let level = course::validate_level(&input.level)?;
    let section = course::validate_section(input.section.as_deref())?;

    let txn = db.begin().await?;
    ensure_identity_free(&txn, &name, &level, section.as_deref(), None).await?;
    let now = Utc::now().into();
    let created = course::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        level: Set(level),
        section: Set(section),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(course_id = %created.id, "course_created");
    Ok(created)
}

pub async fn get_course(db: &DatabaseConnection, id: Uuid) -> Result<course::Model, ServiceError> {
    ensure_exists(db, id).await
}

pub async fn list_courses(db: &DatabaseConnection, opts: Pagination) -> Result<Page<course::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let paginator = course::Entity::find()
        .order_by_asc(course::Column::Level)
        .order_by_asc(course::Column::Name)
        .order_by_asc(course::Column::Section)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(Page::new(items, total, page_idx, per_page))
}

#[instrument(skip(db, patch), fields(course_id = %id))]
pub async fn update_course(db: &DatabaseConnection, id: Uuid, patch: CoursePatch) -> Result<course::Model, ServiceError> {
    let txn = db.begin().await?;
    let existing = ensure_exists(&txn, id).await?;
    let name = match patch.name.as_deref() {
        Some(n) => course::validate_name(n)?,
        None => existing.name.clone(),
    };
    let level = match patch.level.as_deref() {
        Some(l) => course::validate_level(l)?,
        None => existing.level.clone(),
    };
    let section = match patch.section.as_deref() {
        Some(s) => course::validate_section(Some(s))?,
        None => existing.section.clone(),
    };
    ensure_identity_free(&txn, &name, &level, section.as_deref(), Some(id)).await?;

    let mut am: course::ActiveModel = existing.into();
    am.name = Set(name);
    am.level = Set(level);
    am.section = Set(section);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    info!("course_updated");
    Ok(updated)
}

/// Delete a course with its assignments and their blocks.
#[instrument(skip(db), fields(course_id = %id))]
pub async fn delete_course(db: &DatabaseConnection, id: Uuid) -> Result<course::Model, ServiceError> {
    let txn = db.begin().await?;
    let existing = ensure_exists(&txn, id).await?;
    let blocks = schedule_block::Entity::delete_many()
        .filter(schedule_block::Column::CourseId.eq(id))
        .exec(&txn)
        .await?;
    let assignments = assignment::Entity::delete_many()
        .filter(assignment::Column::CourseId.eq(id))
        .exec(&txn)
        .await?;
    course::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(assignments = assignments.rows_affected, blocks = blocks.rows_affected, "course_deleted");
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, new_course};

    #[tokio::test]
    async fn course_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = create_course(&db, new_course("1ro")).await?;
        assert_eq!(c.label(), "1ro secundaria A");

        let dup = create_course(&db, NewCourse { section: Some("a".into()), ..new_course("1ro") }).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let no_section = NewCourse { section: None, ..new_course("1ro") };
        create_course(&db, no_section.clone()).await?;
        assert!(matches!(create_course(&db, no_section).await, Err(ServiceError::Conflict(_))));

        let b = create_course(&db, NewCourse { section: Some("B".into()), ..new_course("1ro") }).await?;
        let clash = update_course(&db, b.id, CoursePatch { section: Some("A".into()), ..Default::default() }).await;
        assert!(matches!(clash, Err(ServiceError::Conflict(_))));

        let moved = update_course(&db, b.id, CoursePatch { name: Some("2do".into()), ..Default::default() }).await?;
        assert_eq!(moved.label(), "2do secundaria B");

        assert_eq!(list_courses(&db, Pagination::default()).await?.total, 3);

        delete_course(&db, c.id).await?;
        assert!(matches!(get_course(&db, c.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn deleting_course_removes_its_assignments_and_blocks() -> Result<(), anyhow::Error> {
        use crate::assignment_service::create_assignment;
        use crate::domain::{NewAssignment, NewScheduleBlock};
        use crate::schedule_service::create_block;
        use crate::subject_service::create_subject;
        use crate::teacher_service::create_teacher;
        use crate::test_support::{hm, new_subject, new_teacher};
        use models::schedule_block::Weekday;

        let db = get_db().await?;
        let t = create_teacher(&db, new_teacher("cascade")).await?;
        let s = create_subject(&db, new_subject("ART-1")).await?;
        let doomed = create_course(&db, new_course("4to")).await?;
        let kept = create_course(&db, new_course("5to")).await?;
        for (c, day) in [(doomed.id, Weekday::Monday), (kept.id, Weekday::Tuesday)] {
            create_assignment(
                &db,
                NewAssignment { teacher_id: t.person.id, course_id: c, subject_id: s.id, planned_weekly_hours: Some(2) },
            )
            .await?;
            create_block(
                &db,
                NewScheduleBlock {
                    teacher_id: t.person.id,
                    course_id: c,
                    subject_id: s.id,
                    day,
                    start_time: hm(8, 0),
                    end_time: hm(9, 0),
                    room: None,
                },
            )
            .await?;
        }

        delete_course(&db, doomed.id).await?;

        let by_course = |id: Uuid| assignment::Entity::find().filter(assignment::Column::CourseId.eq(id));
        assert_eq!(by_course(doomed.id).count(&db).await?, 0);
        assert_eq!(by_course(kept.id).count(&db).await?, 1);
        let blocks = schedule_block::Entity::find().all(&db).await?;
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].course_id, kept.id);
        Ok(())
    }

}
