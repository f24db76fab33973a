use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Person: listing by kind
        manager
            .create_index(
                Index::create()
                    .name("idx_person_kind")
                    .table(Person::Table)
                    .col(Person::Kind)
                    .to_owned(),
            )
            .await?;

        // Course: composite unique (name, level, section)
        manager
            .create_index(
                Index::create()
                    .name("uniq_course_name_level_section")
                    .table(Course::Table)
                    .col(Course::Name)
                    .col(Course::Level)
                    .col(Course::Section)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Assignment: lookups by course and by subject
        manager
            .create_index(
                Index::create()
                    .name("idx_assignment_course")
                    .table(Assignment::Table)
                    .col(Assignment::CourseId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_assignment_subject")
                    .table(Assignment::Table)
                    .col(Assignment::SubjectId)
                    .to_owned(),
            )
            .await?;

        // ScheduleBlock: overlap checks scan one teacher's day
        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_block_teacher_day")
                    .table(ScheduleBlock::Table)
                    .col(ScheduleBlock::TeacherId)
                    .col(ScheduleBlock::Day)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_block_course_day")
                    .table(ScheduleBlock::Table)
                    .col(ScheduleBlock::CourseId)
                    .col(ScheduleBlock::Day)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_person_kind").table(Person::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_course_name_level_section").table(Course::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_assignment_course").table(Assignment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_assignment_subject").table(Assignment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_schedule_block_teacher_day").table(ScheduleBlock::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_schedule_block_course_day").table(ScheduleBlock::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Person { Table, Kind }

#[derive(DeriveIden)]
enum Course { Table, Name, Level, Section }

#[derive(DeriveIden)]
enum Assignment { Table, CourseId, SubjectId }

#[derive(DeriveIden)]
enum ScheduleBlock { Table, TeacherId, CourseId, Day }
