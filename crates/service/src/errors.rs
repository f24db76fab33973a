use models::{errors::ModelError, schedule_block};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(
        "schedule conflict: overlaps block {} on {} ({}-{})",
        .0.id, .0.day, .0.start_time, .0.end_time
    )]
    ScheduleConflict(Box<schedule_block::Model>),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn conflict(msg: impl Into<String>) -> Self { Self::Conflict(msg.into()) }
}

/// Constraint violations reported by the database become domain errors;
/// everything else stays a database error.
impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::Conflict(format!("duplicate value ({msg})")),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                Self::Validation(format!("invalid reference ({msg})"))
            }
            _ => Self::Db(e.to_string()),
        }
    }
}
