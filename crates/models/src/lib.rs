//! SeaORM entities for the staff schema plus field-level validators.

pub mod errors;
pub mod db;
mod rules;
pub mod position;
pub mod person;
pub mod teacher;
pub mod subject;
pub mod course;
pub mod assignment;
pub mod schedule_block;

#[cfg(test)]
mod tests;
