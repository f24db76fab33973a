use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{course, errors::ModelError, schedule_block, subject, teacher};

pub const MAX_PLANNED_WEEKLY_HOURS: i32 = 60;

/// A teacher teaching one subject to one course.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub teacher_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub subject_id: Uuid,
    pub planned_weekly_hours: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn key(&self) -> AssignmentKey {
        AssignmentKey { teacher_id: self.teacher_id, course_id: self.course_id, subject_id: self.subject_id }
    }
}

/// Composite identity of an assignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentKey {
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub subject_id: Uuid,
}

impl AssignmentKey {
    pub fn as_tuple(&self) -> (Uuid, Uuid, Uuid) {
        (self.teacher_id, self.course_id, self.subject_id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Teacher, Course, Subject, ScheduleBlock }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Teacher => Entity::belongs_to(teacher::Entity)
                .from(Column::TeacherId)
                .to(teacher::Column::PersonId)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Course => Entity::belongs_to(course::Entity)
                .from(Column::CourseId)
                .to(course::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Subject => Entity::belongs_to(subject::Entity)
                .from(Column::SubjectId)
                .to(subject::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::ScheduleBlock => Entity::has_many(schedule_block::Entity).into(),
        }
    }
}

impl Related<teacher::Entity> for Entity {
    fn to() -> RelationDef { Relation::Teacher.def() }
}

impl Related<course::Entity> for Entity {
    fn to() -> RelationDef { Relation::Course.def() }
}

impl Related<subject::Entity> for Entity {
    fn to() -> RelationDef { Relation::Subject.def() }
}

impl Related<schedule_block::Entity> for Entity {
    fn to() -> RelationDef { Relation::ScheduleBlock.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_planned_hours(h: Option<i32>) -> Result<Option<i32>, ModelError> {
    match h {
        Some(v) if !(0..=MAX_PLANNED_WEEKLY_HOURS).contains(&v) => Err(ModelError::validation(format!(
            "planned_weekly_hours must be between 0 and {MAX_PLANNED_WEEKLY_HOURS}"
        ))),
        other => Ok(other),
    }
}
