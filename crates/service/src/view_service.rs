//! Read-only aggregates: teaching load and weekly timetables.

use std::collections::{BTreeMap, HashMap};

use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;
use uuid::Uuid;

use models::schedule_block::{self, Weekday};
use models::{assignment, course, person, subject};
use crate::domain::{DayLoad, DaySchedule, ScheduleEntry, TeacherLoad, WeeklySchedule};
use crate::errors::ServiceError;
use crate::{course_service, teacher_service, Page, Pagination};

/// Aggregate one teacher's assignments and blocks.
pub fn compute_load(
    teacher_id: Uuid,
    full_name: String,
    assignments: &[assignment::Model],
    blocks: &[schedule_block::Model],
) -> TeacherLoad {
    let mut by_day: BTreeMap<Weekday, DayLoad> = BTreeMap::new();
    for b in blocks.iter().filter(|b| b.teacher_id == teacher_id) {
        let Some(day) = b.weekday() else { continue };
        let entry = by_day.entry(day).or_insert(DayLoad { day, blocks: 0, minutes: 0 });
        entry.blocks += 1;
        entry.minutes += b.duration_minutes();
    }
    let weekly_minutes: i64 = by_day.values().map(|d| d.minutes).sum();
    let block_count: u64 = by_day.values().map(|d| d.blocks).sum();
    let own: Vec<&assignment::Model> = assignments.iter().filter(|a| a.teacher_id == teacher_id).collect();
    TeacherLoad {
        teacher_id,
        full_name,
        assignment_count: own.len() as u64,
        block_count,
        planned_weekly_hours: own.iter().filter_map(|a| a.planned_weekly_hours).map(i64::from).sum(),
        weekly_minutes,
        weekly_hours: (weekly_minutes as f64 / 60.0 * 100.0).round() / 100.0,
        by_day: by_day.into_values().collect(),
    }
}

/// Group entries by day in weekday order, each day sorted by start time.
pub fn group_week(owner_id: Uuid, owner_label: String, entries: Vec<(Weekday, ScheduleEntry)>) -> WeeklySchedule {
    let total_blocks = entries.len() as u64;
    let mut days: BTreeMap<Weekday, Vec<ScheduleEntry>> = BTreeMap::new();
    for (day, e) in entries {
        days.entry(day).or_default().push(e);
    }
    let days: Vec<DaySchedule> = days
        .into_iter()
        .map(|(day, mut entries)| {
            entries.sort_by_key(|e| (e.start_time, e.end_time));
            DaySchedule { day, total_minutes: entries.iter().map(|e| e.duration_minutes).sum(), entries }
        })
        .collect();
    WeeklySchedule {
        owner_id,
        owner_label,
        total_blocks,
        total_minutes: days.iter().map(|d| d.total_minutes).sum(),
        days,
    }
}

/// Attach teacher, course and subject names to blocks.
async fn label_blocks<C: ConnectionTrait>(
    db: &C,
    blocks: Vec<schedule_block::Model>,
) -> Result<Vec<(Weekday, ScheduleEntry)>, ServiceError> {
    let persons: HashMap<Uuid, String> = person::Entity::find()
        .filter(person::Column::Id.is_in(blocks.iter().map(|b| b.teacher_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.full_name()))
        .collect();
    let courses: HashMap<Uuid, String> = course::Entity::find()
        .filter(course::Column::Id.is_in(blocks.iter().map(|b| b.course_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.label()))
        .collect();
    let subjects: HashMap<Uuid, subject::Model> = subject::Entity::find()
        .filter(subject::Column::Id.is_in(blocks.iter().map(|b| b.subject_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    Ok(blocks
        .into_iter()
        .filter_map(|b| {
            let day = b.weekday()?;
            let subject = subjects.get(&b.subject_id);
            Some((
                day,
                ScheduleEntry {
                    block_id: b.id,
                    duration_minutes: b.duration_minutes(),
                    start_time: b.start_time,
                    end_time: b.end_time,
                    room: b.room,
                    teacher_id: b.teacher_id,
                    teacher_name: persons.get(&b.teacher_id).cloned().unwrap_or_default(),
                    course_id: b.course_id,
                    course_label: courses.get(&b.course_id).cloned().unwrap_or_default(),
                    subject_id: b.subject_id,
                    subject_code: subject.map(|s| s.code.clone()).unwrap_or_default(),
                    subject_name: subject.map(|s| s.name.clone()).unwrap_or_default(),
                },
            ))
        })
        .collect())
}

/// Load of every teacher on the requested page, ordered like the teacher list.
#[instrument(skip(db))]
pub async fn teacher_loads(db: &DatabaseConnection, opts: Pagination) -> Result<Page<TeacherLoad>, ServiceError> {
    let teachers = teacher_service::list_teachers(db, opts).await?;
    let ids: Vec<Uuid> = teachers.items.iter().map(|t| t.person.id).collect();
    let assignments = assignment::Entity::find()
        .filter(assignment::Column::TeacherId.is_in(ids.clone()))
        .all(db)
        .await?;
    let blocks = schedule_block::Entity::find()
        .filter(schedule_block::Column::TeacherId.is_in(ids))
        .all(db)
        .await?;
    Ok(teachers.map(|t| compute_load(t.person.id, t.full_name, &assignments, &blocks)))
}

#[instrument(skip(db))]
pub async fn teacher_load(db: &DatabaseConnection, teacher_id: Uuid) -> Result<TeacherLoad, ServiceError> {
    let t = teacher_service::get_teacher(db, teacher_id).await?;
    let assignments = assignment::Entity::find()
        .filter(assignment::Column::TeacherId.eq(teacher_id))
        .all(db)
        .await?;
    let blocks = schedule_block::Entity::find()
        .filter(schedule_block::Column::TeacherId.eq(teacher_id))
        .all(db)
        .await?;
    Ok(compute_load(teacher_id, t.full_name, &assignments, &blocks))
}

#[instrument(skip(db))]
pub async fn teacher_schedule(db: &DatabaseConnection, teacher_id: Uuid) -> Result<WeeklySchedule, ServiceError> {
    let t = teacher_service::get_teacher(db, teacher_id).await?;
    let blocks = schedule_block::Entity::find()
        .filter(schedule_block::Column::TeacherId.eq(teacher_id))
        .order_by_asc(schedule_block::Column::StartTime)
        .all(db)
        .await?;
    let entries = label_blocks(db, blocks).await?;
    Ok(group_week(teacher_id, t.full_name, entries))
}

#[instrument(skip(db))]
pub async fn course_schedule(db: &DatabaseConnection, course_id: Uuid) -> Result<WeeklySchedule, ServiceError> {
    let c = course_service::get_course(db, course_id).await?;
    let blocks = schedule_block::Entity::find()
        .filter(schedule_block::Column::CourseId.eq(course_id))
        .order_by_asc(schedule_block::Column::StartTime)
        .all(db)
        .await?;
    let entries = label_blocks(db, blocks).await?;
    Ok(group_week(course_id, c.label(), entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment_service::create_assignment;
    use crate::course_service::create_course;
    use crate::domain::{NewAssignment, NewScheduleBlock};
    use crate::schedule_service::create_block;
    use crate::subject_service::create_subject;
    use crate::teacher_service::create_teacher;
    use crate::test_support::{get_db, hm, new_course, new_subject, new_teacher};
    use chrono::Utc;
    use sea_orm::prelude::Time;

    fn raw_block(teacher_id: Uuid, day: &str, start: Time, end: Time) -> schedule_block::Model {
        let now = Utc::now().into();
        schedule_block::Model {
            id: Uuid::new_v4(),
            teacher_id,
            course_id: Uuid::nil(),
            subject_id: Uuid::nil(),
            day: day.into(),
            start_time: start,
            end_time: end,
            room: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn load_sums_minutes_per_day_in_weekday_order() {
        let t = Uuid::new_v4();
        let blocks = vec![
            raw_block(t, "friday", hm(8, 0), hm(9, 30)),
            raw_block(t, "monday", hm(8, 0), hm(8, 45)),
            raw_block(t, "monday", hm(10, 0), hm(11, 0)),
            raw_block(Uuid::new_v4(), "monday", hm(8, 0), hm(12, 0)),
        ];
        let load = compute_load(t, "Ana".into(), &[], &blocks);
        assert_eq!(load.block_count, 3);
        assert_eq!(load.weekly_minutes, 195);
        assert_eq!(load.weekly_hours, 3.25);
        assert_eq!(load.by_day.len(), 2);
        assert_eq!(load.by_day[0].day, Weekday::Monday);
        assert_eq!(load.by_day[0].minutes, 105);
        assert_eq!(load.by_day[1].day, Weekday::Friday);
    }

    #[tokio::test]
    async fn load_and_schedules_from_database() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let t = create_teacher(&db, new_teacher("view")).await?;
        let other = create_teacher(&db, new_teacher("idle")).await?;
        let c = create_course(&db, new_course("1ro")).await?;
        let s1 = create_subject(&db, new_subject("LEN-1")).await?;
        let s2 = create_subject(&db, new_subject("HIS-1")).await?;
        for (s, hours) in [(s1.id, 4), (s2.id, 2)] {
            create_assignment(
                &db,
                NewAssignment { teacher_id: t.person.id, course_id: c.id, subject_id: s, planned_weekly_hours: Some(hours) },
            )
            .await?;
        }
        for (s, day, start, end) in [
            (s1.id, Weekday::Tuesday, hm(10, 0), hm(11, 30)),
            (s1.id, Weekday::Monday, hm(9, 0), hm(10, 0)),
            (s2.id, Weekday::Monday, hm(7, 30), hm(8, 30)),
        ] {
            create_block(
                &db,
                NewScheduleBlock {
                    teacher_id: t.person.id,
                    course_id: c.id,
                    subject_id: s,
                    day,
                    start_time: start,
                    end_time: end,
                    room: None,
                },
            )
            .await?;
        }

        let load = teacher_load(&db, t.person.id).await?;
        assert_eq!(load.assignment_count, 2);
        assert_eq!(load.planned_weekly_hours, 6);
        assert_eq!(load.weekly_minutes, 210);
        assert_eq!(load.weekly_hours, 3.5);

        let all = teacher_loads(&db, Pagination::default()).await?;
        assert_eq!(all.total, 2);
        let idle = all.items.iter().find(|l| l.teacher_id == other.person.id).unwrap();
        assert_eq!(idle.weekly_minutes, 0);
        assert!(idle.by_day.is_empty());

        let week = teacher_schedule(&db, t.person.id).await?;
        assert_eq!(week.total_blocks, 3);
        assert_eq!(week.days.len(), 2);
        assert_eq!(week.days[0].day, Weekday::Monday);
        assert_eq!(week.days[0].entries[0].subject_code, "HIS-1");
        assert_eq!(week.days[0].entries[1].subject_code, "LEN-1");
        assert_eq!(week.days[0].entries[0].course_label, "1ro secundaria A");

        let course_week = course_schedule(&db, c.id).await?;
        assert_eq!(course_week.owner_label, "1ro secundaria A");
        assert_eq!(course_week.total_minutes, 210);
        assert_eq!(course_week.days[1].entries[0].teacher_name, t.full_name);

        assert!(matches!(teacher_load(&db, c.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
