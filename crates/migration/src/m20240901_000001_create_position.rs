//! Create `position` table (employment positions held by staff).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Position::Table)
                    .if_not_exists()
                    .col(uuid(Position::Id).primary_key())
                    .col(string_len(Position::Name, 100).unique_key().not_null())
                    .col(ColumnDef::new(Position::Description).string_len(255).null())
                    .col(timestamp_with_time_zone(Position::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Position::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Position::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Position { Table, Id, Name, Description, CreatedAt, UpdatedAt }
