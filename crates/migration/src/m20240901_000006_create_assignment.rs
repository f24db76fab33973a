//! Create `assignment` table: a teacher teaching a subject in a course.
//!
//! Keyed by (teacher_id, course_id, subject_id); removing any side removes the binding.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Assignment::Table)
                    .if_not_exists()
                    .col(uuid(Assignment::TeacherId).not_null())
                    .col(uuid(Assignment::CourseId).not_null())
                    .col(uuid(Assignment::SubjectId).not_null())
                    .col(ColumnDef::new(Assignment::PlannedWeeklyHours).integer().null())
                    .col(timestamp_with_time_zone(Assignment::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Assignment::UpdatedAt).not_null())
                    .primary_key(
                        Index::create()
                            .col(Assignment::TeacherId)
                            .col(Assignment::CourseId)
                            .col(Assignment::SubjectId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignment_teacher")
                            .from(Assignment::Table, Assignment::TeacherId)
                            .to(Teacher::Table, Teacher::PersonId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignment_course")
                            .from(Assignment::Table, Assignment::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignment_subject")
                            .from(Assignment::Table, Assignment::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Assignment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Assignment { Table, TeacherId, CourseId, SubjectId, PlannedWeeklyHours, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Teacher { Table, PersonId }

#[derive(DeriveIden)]
enum Course { Table, Id }

#[derive(DeriveIden)]
enum Subject { Table, Id }
