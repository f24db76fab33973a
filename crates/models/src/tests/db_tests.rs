use anyhow::Result;
use chrono::{NaiveTime, Utc};
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};
use uuid::Uuid;

use crate::db::connect_with_config;
use crate::{assignment, course, person, schedule_block, subject, teacher};

async fn fresh_db() -> Result<DatabaseConnection> {
    let db = connect_with_config(&DatabaseConfig::sqlite_memory()).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn insert_teacher(db: &DatabaseConnection, national_id: &str, email: &str) -> Result<Uuid> {
    let now = Utc::now().into();
    let id = Uuid::new_v4();
    person::ActiveModel {
        id: Set(id),
        national_id: Set(national_id.into()),
        first_names: Set("Ana".into()),
        paternal_surname: Set("Quispe".into()),
        maternal_surname: Set(None),
        address: Set(None),
        email: Set(email.into()),
        phone: Set(None),
        kind: Set("teacher".into()),
        position_id: Set(None),
        hire_date: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;
    teacher::ActiveModel {
        person_id: Set(id),
        academic_title: Set(Some("Lic.".into())),
        specialty: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;
    Ok(id)
}

#[tokio::test]
async fn migrations_apply_and_roll_back() -> Result<()> {
    let db = fresh_db().await?;
    migration::Migrator::down(&db, None).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(())
}

#[tokio::test]
async fn unique_national_id_enforced_by_schema() -> Result<()> {
    let db = fresh_db().await?;
    insert_teacher(&db, "1111111", "a@school.bo").await?;
    let dup = insert_teacher(&db, "1111111", "b@school.bo").await;
    assert!(dup.is_err());
    Ok(())
}

#[tokio::test]
async fn block_round_trips_time_and_composite_key() -> Result<()> {
    let db = fresh_db().await?;
    let now = Utc::now().into();
    let tid = insert_teacher(&db, "2222222", "c@school.bo").await?;
    let c = course::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("1ro".into()),
        level: Set("secundaria".into()),
        section: Set(Some("A".into())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;
    let s = subject::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set("MAT-1".into()),
        name: Set("Matemáticas".into()),
        description: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;
    let a = assignment::ActiveModel {
        teacher_id: Set(tid),
        course_id: Set(c.id),
        subject_id: Set(s.id),
        planned_weekly_hours: Set(Some(4)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    let block = schedule_block::ActiveModel {
        id: Set(Uuid::new_v4()),
        teacher_id: Set(tid),
        course_id: Set(c.id),
        subject_id: Set(s.id),
        day: Set("monday".into()),
        start_time: Set(NaiveTime::from_hms_opt(8, 0, 0).unwrap()),
        end_time: Set(NaiveTime::from_hms_opt(9, 30, 0).unwrap()),
        room: Set(Some("B-12".into())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    let found = schedule_block::Entity::find_by_id(block.id).one(&db).await?.unwrap();
    assert_eq!(found.start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    assert_eq!(found.duration_minutes(), 90);
    assert_eq!(found.weekday(), Some(schedule_block::Weekday::Monday));

    let by_key = assignment::Entity::find_by_id(a.key().as_tuple()).one(&db).await?;
    assert!(by_key.is_some());

    let blocks = a.find_related(schedule_block::Entity).all(&db).await?;
    assert_eq!(blocks.len(), 1);
    Ok(())
}
