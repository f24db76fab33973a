#![cfg(test)]
use chrono::NaiveTime;
use configs::DatabaseConfig;
use migration::MigratorTrait;
use models::db::connect_with_config;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::domain::{NewCourse, NewSubject, NewTeacher, PersonFields};

/// Fresh in-memory database with the schema applied.
///
/// The pool holds exactly one connection so the memory database lives as long
/// as the returned handle; each test gets its own.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_with_config(&DatabaseConfig::sqlite_memory()).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn person_fields(tag: &str) -> PersonFields {
    let digits: String = Uuid::new_v4().simple().to_string().chars().take(10).collect();
    PersonFields {
        national_id: format!("CI-{digits}"),
        first_names: format!("Ana {tag}"),
        paternal_surname: "Quispe".into(),
        maternal_surname: Some("Flores".into()),
        address: None,
        email: format!("{tag}.{digits}@school.bo"),
        phone: Some("+591 7000 0000".into()),
        position_id: None,
        hire_date: None,
    }
}

pub fn new_teacher(tag: &str) -> NewTeacher {
    NewTeacher { person: person_fields(tag), academic_title: Some("Lic.".into()), specialty: None }
}

pub fn new_course(name: &str) -> NewCourse {
    NewCourse { name: name.into(), level: "secundaria".into(), section: Some("A".into()) }
}

pub fn new_subject(code: &str) -> NewSubject {
    NewSubject { code: code.into(), name: format!("Subject {code}"), description: None }
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}
