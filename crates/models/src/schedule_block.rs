use std::{fmt, str::FromStr};

use chrono::Timelike;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{assignment, errors::ModelError, rules, teacher};

/// One weekly time slot in which a teacher gives an assignment's subject to its course.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule_block")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub subject_id: Uuid,
    pub day: String,
    pub start_time: Time,
    pub end_time: Time,
    pub room: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn weekday(&self) -> Option<Weekday> {
        self.day.parse().ok()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Assignment, Teacher }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Assignment => Entity::belongs_to(assignment::Entity)
                .from((Column::TeacherId, Column::CourseId, Column::SubjectId))
                .to((
                    assignment::Column::TeacherId,
                    assignment::Column::CourseId,
                    assignment::Column::SubjectId,
                ))
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Teacher => Entity::belongs_to(teacher::Entity)
                .from(Column::TeacherId)
                .to(teacher::Column::PersonId)
                .into(),
        }
    }
}

impl Related<assignment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Assignment.def() }
}

impl Related<teacher::Entity> for Entity {
    fn to() -> RelationDef { Relation::Teacher.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Day of the school week. Ordering follows the calendar, Monday first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Weekday {
    type Err = ModelError;

    /// Accepts English names and the Spanish ones used by the school office.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.trim().to_lowercase().as_str() {
            "monday" | "lunes" => Weekday::Monday,
            "tuesday" | "martes" => Weekday::Tuesday,
            "wednesday" | "miercoles" | "miércoles" => Weekday::Wednesday,
            "thursday" | "jueves" => Weekday::Thursday,
            "friday" | "viernes" => Weekday::Friday,
            "saturday" | "sabado" | "sábado" => Weekday::Saturday,
            "sunday" | "domingo" => Weekday::Sunday,
            other => return Err(ModelError::validation(format!("unknown day '{other}'"))),
        };
        Ok(day)
    }
}

impl TryFrom<String> for Weekday {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

/// `start` must be strictly before `end`; blocks never wrap past midnight.
/// Both ends fall on a whole minute so durations add up exactly in minutes.
pub fn validate_time_range(start: Time, end: Time) -> Result<(), ModelError> {
    for (field, t) in [("start_time", start), ("end_time", end)] {
        if t.second() != 0 || t.nanosecond() != 0 {
            return Err(ModelError::validation(format!("{field} ({t}) must be a whole minute")));
        }
    }
    if start >= end {
        return Err(ModelError::validation(format!(
            "start_time ({start}) must be before end_time ({end})"
        )));
    }
    Ok(())
}

pub fn validate_room(room: Option<&str>) -> Result<Option<String>, ModelError> {
    rules::optional_text("room", room, 50)
}
