//! Schedule blocks: the only writes with a cross-row invariant.
//!
//! Create and update run inside one transaction that first locks the teacher
//! row, so two concurrent writers for the same teacher serialize and cannot
//! both pass the overlap check.

use chrono::Utc;
use sea_orm::sea_query::{CaseStatement, Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use models::assignment::AssignmentKey;
use models::schedule_block::{self, Weekday};
use models::teacher;
use sea_orm::prelude::Time;
use crate::domain::{NewScheduleBlock, ScheduleBlockFilter, ScheduleBlockPatch};
use crate::errors::ServiceError;
use crate::{assignment_service, conflict, Page, Pagination};

/// Take the teacher row lock for the rest of the transaction.
///
/// SQLite has no row locks; its single writer already serializes transactions.
async fn lock_teacher<C: ConnectionTrait>(db: &C, teacher_id: Uuid) -> Result<teacher::Model, ServiceError> {
    let mut q = teacher::Entity::find_by_id(teacher_id);
    if db.get_database_backend() == DbBackend::Postgres {
        q = q.lock_exclusive();
    }
    q.one(db).await?.ok_or_else(|| ServiceError::not_found("teacher"))
}

/// Blocks of one teacher on one day, earliest first.
pub(crate) async fn teacher_day_blocks<C: ConnectionTrait>(
    db: &C,
    teacher_id: Uuid,
    day: Weekday,
) -> Result<Vec<schedule_block::Model>, ServiceError> {
    Ok(schedule_block::Entity::find()
        .filter(schedule_block::Column::TeacherId.eq(teacher_id))
        .filter(schedule_block::Column::Day.eq(day.as_str()))
        .order_by_asc(schedule_block::Column::StartTime)
        .all(db)
        .await?)
}

/// Steps 3 to 6 of every block write: lock, check the assignment, check overlaps.
async fn check_slot<C: ConnectionTrait>(
    db: &C,
    key: AssignmentKey,
    day: Weekday,
    start: Time,
    end: Time,
    exclude: Option<Uuid>,
) -> Result<(), ServiceError> {
    lock_teacher(db, key.teacher_id).await?;
    assignment_service::ensure_exists(db, key).await?;
    let existing = teacher_day_blocks(db, key.teacher_id, day).await?;
    debug!(existing = existing.len(), "checking_overlaps");
    if let Some(hit) = conflict::find_conflict(start, end, &existing, exclude) {
        warn!(conflicting_block = %hit.id, %day, %start, %end, "schedule_conflict");
        return Err(ServiceError::ScheduleConflict(Box::new(hit.clone())));
    }
    Ok(())
}

/// Create a block after checking it fits in the teacher's day.
#[instrument(skip(db, input), fields(teacher_id = %input.teacher_id, day = %input.day))]
pub async fn create_block(db: &DatabaseConnection, input: NewScheduleBlock) -> Result<schedule_block::Model, ServiceError> {
    schedule_block::validate_time_range(input.start_time, input.end_time)?;
    let room = schedule_block::validate_room(input.room.as_deref())?;
    let key = AssignmentKey { teacher_id: input.teacher_id, course_id: input.course_id, subject_id: input.subject_id };

    let txn = db.begin().await?;
    check_slot(&txn, key, input.day, input.start_time, input.end_time, None).await?;
    let now = Utc::now().into();
    let created = schedule_block::ActiveModel {
        id: Set(Uuid::new_v4()),
        teacher_id: Set(key.teacher_id),
        course_id: Set(key.course_id),
        subject_id: Set(key.subject_id),
        day: Set(input.day.as_str().to_string()),
        start_time: Set(input.start_time),
        end_time: Set(input.end_time),
        room: Set(room),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(block_id = %created.id, "schedule_block_created");
    Ok(created)
}

pub async fn get_block(db: &DatabaseConnection, id: Uuid) -> Result<schedule_block::Model, ServiceError> {
    schedule_block::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("schedule block"))
}

/// Rank of the stored `day` string in calendar order, Monday first.
fn weekday_rank() -> SimpleExpr {
    Weekday::ALL
        .iter()
        .enumerate()
        .fold(CaseStatement::new(), |case, (rank, day)| {
            case.case(Expr::col(schedule_block::Column::Day).eq(day.as_str()), rank as i32)
        })
        .finally(Weekday::ALL.len() as i32)
        .into()
}

/// List blocks, narrowed by teacher, course, subject or day.
/// Ordered by teacher, then Monday to Sunday, then start time.
pub async fn list_blocks(
    db: &DatabaseConnection,
    filter: ScheduleBlockFilter,
    opts: Pagination,
) -> Result<Page<schedule_block::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut finder = schedule_block::Entity::find();
    if let Some(id) = filter.teacher_id { finder = finder.filter(schedule_block::Column::TeacherId.eq(id)); }
    if let Some(id) = filter.course_id { finder = finder.filter(schedule_block::Column::CourseId.eq(id)); }
    if let Some(id) = filter.subject_id { finder = finder.filter(schedule_block::Column::SubjectId.eq(id)); }
    if let Some(d) = filter.day { finder = finder.filter(schedule_block::Column::Day.eq(d.as_str())); }
    let paginator = finder
        .order_by_asc(schedule_block::Column::TeacherId)
        .order_by(weekday_rank(), Order::Asc)
        .order_by_asc(schedule_block::Column::StartTime)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(Page::new(items, total, page_idx, per_page))
}

/// Update a block. Omitted fields keep their value, so a block can move to
/// another day, time or assignment; the result is checked like a new block.
#[instrument(skip(db, patch), fields(block_id = %id))]
pub async fn update_block(
    db: &DatabaseConnection,
    id: Uuid,
    patch: ScheduleBlockPatch,
) -> Result<schedule_block::Model, ServiceError> {
    let txn = db.begin().await?;
    let existing = schedule_block::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("schedule block"))?;

    let key = AssignmentKey {
        teacher_id: patch.teacher_id.unwrap_or(existing.teacher_id),
        course_id: patch.course_id.unwrap_or(existing.course_id),
        subject_id: patch.subject_id.unwrap_or(existing.subject_id),
    };
    let day = match patch.day {
        Some(d) => d,
        None => existing.day.parse::<Weekday>()?,
    };
    let start = patch.start_time.unwrap_or(existing.start_time);
    let end = patch.end_time.unwrap_or(existing.end_time);
    schedule_block::validate_time_range(start, end)?;

    check_slot(&txn, key, day, start, end, Some(id)).await?;

    let mut am: schedule_block::ActiveModel = existing.into();
    am.teacher_id = Set(key.teacher_id);
    am.course_id = Set(key.course_id);
    am.subject_id = Set(key.subject_id);
    am.day = Set(day.as_str().to_string());
    am.start_time = Set(start);
    am.end_time = Set(end);
    if let Some(r) = patch.room.as_deref() { am.room = Set(schedule_block::validate_room(Some(r))?); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    info!("schedule_block_updated");
    Ok(updated)
}

#[instrument(skip(db), fields(block_id = %id))]
pub async fn delete_block(db: &DatabaseConnection, id: Uuid) -> Result<schedule_block::Model, ServiceError> {
    let txn = db.begin().await?;
    let existing = schedule_block::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("schedule block"))?;
    schedule_block::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!("schedule_block_deleted");
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment_service::create_assignment;
    use crate::course_service::create_course;
    use crate::domain::NewAssignment;
    use crate::subject_service::create_subject;
    use crate::teacher_service::create_teacher;
    use crate::test_support::{get_db, hm, new_course, new_subject, new_teacher};

    struct Fixture {
        db: DatabaseConnection,
        teacher: Uuid,
        math: AssignmentKey,
        physics: AssignmentKey,
    }

    async fn fixture() -> Result<Fixture, anyhow::Error> {
        let db = get_db().await?;
        let t = create_teacher(&db, new_teacher("sched")).await?;
        let c = create_course(&db, new_course("6to")).await?;
        let math = create_subject(&db, new_subject("MAT-6")).await?;
        let physics = create_subject(&db, new_subject("FIS-6")).await?;
        let mut keys = Vec::new();
        for s in [math.id, physics.id] {
            let a = create_assignment(
                &db,
                NewAssignment { teacher_id: t.person.id, course_id: c.id, subject_id: s, planned_weekly_hours: None },
            )
            .await?;
            keys.push(a.key());
        }
        Ok(Fixture { db, teacher: t.person.id, math: keys[0], physics: keys[1] })
    }

    fn block(key: AssignmentKey, day: Weekday, start: Time, end: Time) -> NewScheduleBlock {
        NewScheduleBlock {
            teacher_id: key.teacher_id,
            course_id: key.course_id,
            subject_id: key.subject_id,
            day,
            start_time: start,
            end_time: end,
            room: None,
        }
    }

    #[tokio::test]
    async fn overlapping_create_rejected() -> Result<(), anyhow::Error> {
        let f = fixture().await?;
        let first = create_block(&f.db, block(f.math, Weekday::Monday, hm(8, 0), hm(9, 30))).await?;

        let err = create_block(&f.db, block(f.physics, Weekday::Monday, hm(9, 0), hm(10, 0))).await;
        match err {
            Err(ServiceError::ScheduleConflict(hit)) => assert_eq!(hit.id, first.id),
            other => panic!("expected schedule conflict, got {other:?}"),
        }

        // same slot on another day is free
        create_block(&f.db, block(f.physics, Weekday::Tuesday, hm(9, 0), hm(10, 0))).await?;
        assert_eq!(list_blocks(&f.db, ScheduleBlockFilter::default(), Pagination::default()).await?.total, 2);
        Ok(())
    }

    #[tokio::test]
    async fn list_runs_monday_to_sunday() -> Result<(), anyhow::Error> {
        let f = fixture().await?;
        for day in [Weekday::Sunday, Weekday::Friday, Weekday::Monday, Weekday::Wednesday] {
            create_block(&f.db, block(f.math, day, hm(8, 0), hm(9, 0))).await?;
        }
        create_block(&f.db, block(f.physics, Weekday::Monday, hm(7, 0), hm(8, 0))).await?;

        let page = list_blocks(&f.db, ScheduleBlockFilter::default(), Pagination::default()).await?;
        let order: Vec<(String, Time)> = page.items.iter().map(|b| (b.day.clone(), b.start_time)).collect();
        assert_eq!(
            order,
            vec![
                ("monday".to_string(), hm(7, 0)),
                ("monday".to_string(), hm(8, 0)),
                ("wednesday".to_string(), hm(8, 0)),
                ("friday".to_string(), hm(8, 0)),
                ("sunday".to_string(), hm(8, 0)),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn adjacent_blocks_both_succeed() -> Result<(), anyhow::Error> {
        let f = fixture().await?;
        create_block(&f.db, block(f.math, Weekday::Wednesday, hm(8, 0), hm(9, 0))).await?;
        create_block(&f.db, block(f.physics, Weekday::Wednesday, hm(9, 0), hm(10, 0))).await?;
        create_block(&f.db, block(f.math, Weekday::Wednesday, hm(7, 0), hm(8, 0))).await?;
        let day = teacher_day_blocks(&f.db, f.teacher, Weekday::Wednesday).await?;
        assert_eq!(day.iter().map(|b| b.start_time).collect::<Vec<_>>(), vec![hm(7, 0), hm(8, 0), hm(9, 0)]);
        Ok(())
    }

    #[tokio::test]
    async fn overlapping_update_rejected_but_self_ignored() -> Result<(), anyhow::Error> {
        let f = fixture().await?;
        let a = create_block(&f.db, block(f.math, Weekday::Friday, hm(8, 0), hm(9, 0))).await?;
        let b = create_block(&f.db, block(f.physics, Weekday::Friday, hm(10, 0), hm(11, 0))).await?;

        // stretching within its own old range only overlaps itself
        let stretched = update_block(
            &f.db,
            a.id,
            ScheduleBlockPatch { end_time: Some(hm(9, 45)), ..Default::default() },
        )
        .await?;
        assert_eq!(stretched.end_time, hm(9, 45));

        let err = update_block(
            &f.db,
            b.id,
            ScheduleBlockPatch { start_time: Some(hm(9, 30)), ..Default::default() },
        )
        .await;
        assert!(matches!(err, Err(ServiceError::ScheduleConflict(hit)) if hit.id == a.id));

        // moving to another day clears the clash
        let moved = update_block(
            &f.db,
            b.id,
            ScheduleBlockPatch { day: Some(Weekday::Thursday), start_time: Some(hm(9, 30)), ..Default::default() },
        )
        .await?;
        assert_eq!(moved.day, "thursday");
        Ok(())
    }

    #[tokio::test]
    async fn invalid_ranges_and_missing_assignment() -> Result<(), anyhow::Error> {
        let f = fixture().await?;
        let err = create_block(&f.db, block(f.math, Weekday::Monday, hm(9, 0), hm(9, 0))).await;
        assert!(matches!(err, Err(ServiceError::Model(_))));

        let off_minute = Time::from_hms_opt(8, 0, 30).unwrap();
        let err = create_block(&f.db, block(f.math, Weekday::Monday, off_minute, hm(9, 0))).await;
        assert!(matches!(err, Err(ServiceError::Model(_))));

        let ghost = AssignmentKey { subject_id: Uuid::new_v4(), ..f.math };
        let err = create_block(&f.db, block(ghost, Weekday::Monday, hm(9, 0), hm(10, 0))).await;
        assert!(matches!(err, Err(ServiceError::NotFound(m)) if m.contains("assignment")));

        let stranger = AssignmentKey { teacher_id: Uuid::new_v4(), ..f.math };
        let err = create_block(&f.db, block(stranger, Weekday::Monday, hm(9, 0), hm(10, 0))).await;
        assert!(matches!(err, Err(ServiceError::NotFound(m)) if m.contains("teacher")));

        let b = create_block(&f.db, block(f.math, Weekday::Monday, hm(9, 0), hm(10, 0))).await?;
        let inverted = update_block(&f.db, b.id, ScheduleBlockPatch { end_time: Some(hm(8, 0)), ..Default::default() }).await;
        assert!(matches!(inverted, Err(ServiceError::Model(_))));

        let seconds = update_block(
            &f.db,
            b.id,
            ScheduleBlockPatch { end_time: Some(Time::from_hms_opt(10, 0, 15).unwrap()), ..Default::default() },
        )
        .await;
        assert!(matches!(seconds, Err(ServiceError::Model(_))));

        let deleted = delete_block(&f.db, b.id).await?;
        assert_eq!(deleted.id, b.id);
        assert!(matches!(delete_block(&f.db, b.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
