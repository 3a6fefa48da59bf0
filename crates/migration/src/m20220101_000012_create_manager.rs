//! Create `manager` table.
//!
//! Dashboard accounts; `permissions` is a JSONB string list.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Manager::Table)
                    .if_not_exists()
                    .col(uuid(Manager::Id).primary_key())
                    .col(string_len(Manager::Name, 128).not_null())
                    .col(string_len(Manager::Email, 255).unique_key().not_null())
                    .col(string_len(Manager::Role, 32).not_null())
                    .col(string_len(Manager::Department, 32).not_null())
                    .col(json_binary(Manager::Permissions).not_null())
                    .col(boolean(Manager::IsActive).not_null())
                    .col(
                        ColumnDef::new(Manager::ProfileImage)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Manager::LastLogin)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Manager::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Manager::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Manager::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Manager {
    Table,
    Id,
    Name,
    Email,
    Role,
    Department,
    Permissions,
    IsActive,
    ProfileImage,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}
