//! Create `teacher` table; the primary key is also the FK to `person`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teacher::Table)
                    .if_not_exists()
                    .col(uuid(Teacher::PersonId).primary_key())
                    .col(ColumnDef::new(Teacher::AcademicTitle).string_len(100).null())
                    .col(ColumnDef::new(Teacher::Specialty).string_len(100).null())
                    .col(timestamp_with_time_zone(Teacher::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Teacher::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teacher_person")
                            .from(Teacher::Table, Teacher::PersonId)
                            .to(Person::Table, Person::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Teacher::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Teacher { Table, PersonId, AcademicTitle, Specialty, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Person { Table, Id }
