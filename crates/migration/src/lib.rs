//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240901_000001_create_position;
mod m20240901_000002_create_person;
mod m20240901_000003_create_teacher;
mod m20240901_000004_create_subject;
mod m20240901_000005_create_course;
mod m20240901_000006_create_assignment;
mod m20240901_000007_create_schedule_block;
mod m20240901_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_create_position::Migration),
            Box::new(m20240901_000002_create_person::Migration),
            Box::new(m20240901_000003_create_teacher::Migration),
            Box::new(m20240901_000004_create_subject::Migration),
            Box::new(m20240901_000005_create_course::Migration),
            Box::new(m20240901_000006_create_assignment::Migration),
            Box::new(m20240901_000007_create_schedule_block::Migration),
            // Indexes should always be applied last
            Box::new(m20240901_000010_add_indexes::Migration),
        ]
    }
}
