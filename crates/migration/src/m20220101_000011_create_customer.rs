//! Create `customer` table.
//!
//! Stores customer accounts; password material lives in `credentials`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(uuid(Customer::Id).primary_key())
                    .col(string_len(Customer::Name, 128).not_null())
                    .col(string_len(Customer::Email, 255).unique_key().not_null())
                    .col(
                        ColumnDef::new(Customer::ResetPasswordToken)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Customer::ResetPasswordExpires)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Customer::LastActive).not_null())
                    .col(boolean(Customer::RememberMe).not_null())
                    .col(integer(Customer::SessionTimeoutMinutes).not_null())
                    .col(
                        ColumnDef::new(Customer::ProfileImage)
                            .string_len(255)
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Customer::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Customer::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customer {
    Table,
    Id,
    Name,
    Email,
    ResetPasswordToken,
    ResetPasswordExpires,
    LastActive,
    RememberMe,
    SessionTimeoutMinutes,
    ProfileImage,
    CreatedAt,
    UpdatedAt,
}
