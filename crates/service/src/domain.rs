//! Inputs accepted by the services and the read models they return.
//!
//! Create inputs carry every required field; `*Patch` inputs are partial
//! updates where an absent field keeps its value. Optional text fields are
//! cleared by sending an empty string.

use chrono::NaiveDate;
use models::person::PersonKind;
use models::schedule_block::Weekday;
use models::{assignment, person};
use sea_orm::prelude::{DateTimeWithTimeZone, Time};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct NewPosition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Identity and contact fields shared by persons and teachers.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonFields {
    pub national_id: String,
    pub first_names: String,
    pub paternal_surname: String,
    #[serde(default)]
    pub maternal_surname: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position_id: Option<Uuid>,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonFieldsPatch {
    pub national_id: Option<String>,
    pub first_names: Option<String>,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position_id: Option<Uuid>,
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPerson {
    #[serde(flatten)]
    pub fields: PersonFields,
    /// Defaults to `administrative`; teachers are created through the teacher service.
    #[serde(default)]
    pub kind: Option<PersonKind>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonPatch {
    #[serde(flatten)]
    pub fields: PersonFieldsPatch,
    pub kind: Option<PersonKind>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTeacher {
    #[serde(flatten)]
    pub person: PersonFields,
    #[serde(default)]
    pub academic_title: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeacherPatch {
    #[serde(flatten)]
    pub person: PersonFieldsPatch,
    pub academic_title: Option<String>,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubject {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub name: String,
    pub level: String,
    #[serde(default)]
    pub section: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub level: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAssignment {
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub subject_id: Uuid,
    #[serde(default)]
    pub planned_weekly_hours: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentPatch {
    pub planned_weekly_hours: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub teacher_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewScheduleBlock {
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub subject_id: Uuid,
    pub day: Weekday,
    #[serde(with = "time_of_day")]
    pub start_time: Time,
    #[serde(with = "time_of_day")]
    pub end_time: Time,
    #[serde(default)]
    pub room: Option<String>,
}

/// Ids left out keep their stored value; the resulting assignment must exist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleBlockPatch {
    pub teacher_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub day: Option<Weekday>,
    #[serde(default, with = "time_of_day::option")]
    pub start_time: Option<Time>,
    #[serde(default, with = "time_of_day::option")]
    pub end_time: Option<Time>,
    pub room: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleBlockFilter {
    pub teacher_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub day: Option<Weekday>,
}

/// A person with the derived display name.
#[derive(Debug, Clone, Serialize)]
pub struct PersonView {
    #[serde(flatten)]
    pub person: person::Model,
    pub full_name: String,
}

impl From<person::Model> for PersonView {
    fn from(person: person::Model) -> Self {
        let full_name = person.full_name();
        Self { person, full_name }
    }
}

/// A teacher joined with its person row.
#[derive(Debug, Clone, Serialize)]
pub struct TeacherView {
    #[serde(flatten)]
    pub person: person::Model,
    pub full_name: String,
    pub position_name: Option<String>,
    pub academic_title: Option<String>,
    pub specialty: Option<String>,
    pub teacher_since: DateTimeWithTimeZone,
}

impl TeacherView {
    pub fn new(person: person::Model, teacher: models::teacher::Model, position_name: Option<String>) -> Self {
        Self {
            full_name: person.full_name(),
            person,
            position_name,
            academic_title: teacher.academic_title,
            specialty: teacher.specialty,
            teacher_since: teacher.created_at,
        }
    }
}

/// An assignment labelled with the names of what it binds.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentDetail {
    #[serde(flatten)]
    pub assignment: assignment::Model,
    pub teacher_name: String,
    pub course_label: String,
    pub subject_code: String,
    pub subject_name: String,
    pub block_count: u64,
    pub scheduled_minutes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayLoad {
    pub day: Weekday,
    pub blocks: u64,
    pub minutes: i64,
}

/// Weekly teaching load of one teacher.
#[derive(Debug, Clone, Serialize)]
pub struct TeacherLoad {
    pub teacher_id: Uuid,
    pub full_name: String,
    pub assignment_count: u64,
    pub block_count: u64,
    pub planned_weekly_hours: i64,
    pub weekly_minutes: i64,
    pub weekly_hours: f64,
    pub by_day: Vec<DayLoad>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    pub block_id: Uuid,
    #[serde(with = "time_of_day")]
    pub start_time: Time,
    #[serde(with = "time_of_day")]
    pub end_time: Time,
    pub duration_minutes: i64,
    pub room: Option<String>,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub course_id: Uuid,
    pub course_label: String,
    pub subject_id: Uuid,
    pub subject_code: String,
    pub subject_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySchedule {
    pub day: Weekday,
    pub total_minutes: i64,
    pub entries: Vec<ScheduleEntry>,
}

/// Week timetable of a teacher or a course, Monday first.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklySchedule {
    pub owner_id: Uuid,
    pub owner_label: String,
    pub total_blocks: u64,
    pub total_minutes: i64,
    pub days: Vec<DaySchedule>,
}

/// `HH:MM` or `HH:MM:SS` on input, `HH:MM` on output.
/// Block writes reject nonzero seconds, so the output never loses precision.
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(s: &str) -> Option<NaiveTime> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .ok()
    }

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{de, Deserialize, Deserializer};

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(d)? {
                None => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid time '{raw}', expected HH:MM"))),
            }
        }
    }
}
