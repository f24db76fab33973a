use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, person, rules};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "position")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Person }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Person => Entity::has_many(person::Entity).into() }
    }
}

impl Related<person::Entity> for Entity {
    fn to() -> RelationDef { Relation::Person.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    rules::text("position name", name, 2, 100)
}

pub fn validate_description(d: Option<&str>) -> Result<Option<String>, ModelError> {
    rules::optional_text("description", d, 255)
}
