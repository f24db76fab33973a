use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{assignment, errors::ModelError, rules};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subject")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
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

/// Codes are stored upper-case, e.g. `MAT-101`.
pub fn validate_code(code: &str) -> Result<String, ModelError> {
    let code = rules::text("subject code", code, 2, 20)?;
    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ModelError::validation("subject code may only contain letters, digits, '-' and '_'"));
    }
    Ok(code.to_ascii_uppercase())
}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    rules::text("subject name", name, 2, 100)
}

pub fn validate_description(d: Option<&str>) -> Result<Option<String>, ModelError> {
    rules::optional_text("description", d, 255)
}
