//! Create `credentials` table.
//!
//! One row per account (customer or manager); no FK because the owner may
//! live in either table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Credentials::Table)
                    .if_not_exists()
                    .col(uuid(Credentials::Id).primary_key())
                    .col(uuid(Credentials::AccountId).unique_key().not_null())
                    .col(string_len(Credentials::PasswordHash, 255).not_null())
                    .col(string_len(Credentials::PasswordAlgorithm, 32).not_null())
                    .col(timestamp_with_time_zone(Credentials::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Credentials::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Credentials::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Credentials { Table, Id, AccountId, PasswordHash, PasswordAlgorithm, CreatedAt, UpdatedAt }
