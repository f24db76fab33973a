//! Create `schedule_block` table: one weekly time slot of an assignment.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduleBlock::Table)
                    .if_not_exists()
                    .col(uuid(ScheduleBlock::Id).primary_key())
                    .col(uuid(ScheduleBlock::TeacherId).not_null())
                    .col(uuid(ScheduleBlock::CourseId).not_null())
                    .col(uuid(ScheduleBlock::SubjectId).not_null())
                    .col(string_len(ScheduleBlock::Day, 16).not_null())
                    .col(time(ScheduleBlock::StartTime).not_null())
                    .col(time(ScheduleBlock::EndTime).not_null())
                    .col(ColumnDef::new(ScheduleBlock::Room).string_len(50).null())
                    .col(timestamp_with_time_zone(ScheduleBlock::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ScheduleBlock::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_block_assignment")
                            .from(
                                ScheduleBlock::Table,
                                (ScheduleBlock::TeacherId, ScheduleBlock::CourseId, ScheduleBlock::SubjectId),
                            )
                            .to(
                                Assignment::Table,
                                (Assignment::TeacherId, Assignment::CourseId, Assignment::SubjectId),
                            )
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ScheduleBlock::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ScheduleBlock {
    Table,
    Id,
    TeacherId,
    CourseId,
    SubjectId,
    Day,
    StartTime,
    EndTime,
    Room,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assignment { Table, TeacherId, CourseId, SubjectId }
