//! Create `person` table with optional FK to `position`.
//!
//! National id and email are unique across all persons.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Person::Table)
                    .if_not_exists()
                    .col(uuid(Person::Id).primary_key())
                    .col(string_len(Person::NationalId, 20).unique_key().not_null())
                    .col(string_len(Person::FirstNames, 100).not_null())
                    .col(string_len(Person::PaternalSurname, 50).not_null())
                    .col(ColumnDef::new(Person::MaternalSurname).string_len(50).null())
                    .col(ColumnDef::new(Person::Address).string_len(200).null())
                    .col(string_len(Person::Email, 100).unique_key().not_null())
                    .col(ColumnDef::new(Person::Phone).string_len(20).null())
                    .col(string_len(Person::Kind, 20).not_null())
                    .col(ColumnDef::new(Person::PositionId).uuid().null())
                    .col(ColumnDef::new(Person::HireDate).date().null())
                    .col(timestamp_with_time_zone(Person::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Person::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_person_position")
                            .from(Person::Table, Person::PositionId)
                            .to(Position::Table, Position::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Person::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Person {
    Table,
    Id,
    NationalId,
    FirstNames,
    PaternalSurname,
    MaternalSurname,
    Address,
    Email,
    Phone,
    Kind,
    PositionId,
    HireDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Position { Table, Id }
