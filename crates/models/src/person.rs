use std::{fmt, str::FromStr};

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, position, rules, teacher};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "person")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub national_id: String,
    pub first_names: String,
    pub paternal_surname: String,
    pub maternal_surname: Option<String>,
    pub address: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub kind: String,
    pub position_id: Option<Uuid>,
    pub hire_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn full_name(&self) -> String {
        match &self.maternal_surname {
            Some(m) => format!("{} {} {}", self.first_names, self.paternal_surname, m),
            None => format!("{} {}", self.first_names, self.paternal_surname),
        }
    }

    pub fn is_teacher(&self) -> bool {
        self.kind == PersonKind::Teacher.as_str()
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Position, Teacher }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Position => Entity::belongs_to(position::Entity)
                .from(Column::PositionId)
                .to(position::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Relation::Teacher => Entity::has_one(teacher::Entity).into(),
        }
    }
}

impl Related<position::Entity> for Entity {
    fn to() -> RelationDef { Relation::Position.def() }
}

impl Related<teacher::Entity> for Entity {
    fn to() -> RelationDef { Relation::Teacher.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Role of a person inside the institution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    Teacher,
    Administrative,
    Support,
}

impl PersonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PersonKind::Teacher => "teacher",
            PersonKind::Administrative => "administrative",
            PersonKind::Support => "support",
        }
    }
}

impl fmt::Display for PersonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for PersonKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teacher" => Ok(PersonKind::Teacher),
            "administrative" => Ok(PersonKind::Administrative),
            "support" => Ok(PersonKind::Support),
            other => Err(ModelError::validation(format!("unknown person kind '{other}'"))),
        }
    }
}

pub fn validate_national_id(v: &str) -> Result<String, ModelError> {
    let v = rules::text("national_id", v, 5, 20)?;
    if !v.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ModelError::validation("national_id may only contain letters, digits and '-'"));
    }
    Ok(v.to_ascii_uppercase())
}

pub fn validate_email(email: &str) -> Result<String, ModelError> {
    let email = rules::text("email", email, 3, 100)?.to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ModelError::validation("invalid email"));
    }
    Ok(email)
}

pub fn validate_first_names(v: &str) -> Result<String, ModelError> {
    rules::text("first_names", v, 2, 100)
}

pub fn validate_paternal_surname(v: &str) -> Result<String, ModelError> {
    rules::text("paternal_surname", v, 2, 50)
}

pub fn validate_maternal_surname(v: Option<&str>) -> Result<Option<String>, ModelError> {
    rules::optional_text("maternal_surname", v, 50)
}

pub fn validate_address(v: Option<&str>) -> Result<Option<String>, ModelError> {
    rules::optional_text("address", v, 200)
}

pub fn validate_phone(v: Option<&str>) -> Result<Option<String>, ModelError> {
    let phone = rules::optional_text("phone", v, 20)?;
    if let Some(p) = &phone {
        let ok = p.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
        if !ok || !p.chars().any(|c| c.is_ascii_digit()) {
            return Err(ModelError::validation("invalid phone number"));
        }
    }
    Ok(phone)
}
