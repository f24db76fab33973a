use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{assignment, errors::ModelError, rules};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub level: String,
    pub section: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Human label, e.g. `3ro secundaria A`.
    pub fn label(&self) -> String {
        match &self.section {
            Some(s) => format!("{} {} {}", self.name, self.level, s),
            None => format!("{} {}", self.name, self.level),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Assignment }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Assignment => Entity::has_many(assignment::Entity).into() }
    }
}

impl Related<assignment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Assignment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    rules::text("course name", name, 1, 50)
}

pub fn validate_level(level: &str) -> Result<String, ModelError> {
    rules::text("course level", level, 1, 50)
}

pub fn validate_section(section: Option<&str>) -> Result<Option<String>, ModelError> {
    Ok(rules::optional_text("course section", section, 10)?.map(|s| s.to_uppercase()))
}
