use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{assignment, errors::ModelError, person, rules};

/// Academic profile of a person whose kind is `teacher`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teacher")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub person_id: Uuid,
    pub academic_title: Option<String>,
    pub specialty: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Person, Assignment }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Person => Entity::belongs_to(person::Entity)
                .from(Column::PersonId)
                .to(person::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Assignment => Entity::has_many(assignment::Entity).into(),
        }
    }
}

impl Related<person::Entity> for Entity {
    fn to() -> RelationDef { Relation::Person.def() }
}

impl Related<assignment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Assignment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_academic_title(v: Option<&str>) -> Result<Option<String>, ModelError> {
    rules::optional_text("academic_title", v, 100)
}

pub fn validate_specialty(v: Option<&str>) -> Result<Option<String>, ModelError> {
    rules::optional_text("specialty", v, 100)
}
