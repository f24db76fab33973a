//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Runs every mutation inside one transaction and reports typed errors.

pub mod errors;
pub mod domain;
pub mod conflict;
pub mod position_service;
pub mod person_service;
pub mod teacher_service;
pub mod subject_service;
pub mod course_service;
pub mod assignment_service;
pub mod schedule_service;
pub mod view_service;
#[cfg(test)]
pub mod test_support;

pub use common::pagination::{Page, Pagination};
