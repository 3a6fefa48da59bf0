//! Create `booking_progress` table with FK to `booking`.
//!
//! One row per booking; the ordered step list is a JSONB document.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookingProgress::Table)
                    .if_not_exists()
                    .col(uuid(BookingProgress::Id).primary_key())
                    .col(uuid(BookingProgress::BookingId).unique_key().not_null())
                    .col(json_binary(BookingProgress::Steps).not_null())
                    .col(integer(BookingProgress::CurrentStep).not_null())
                    .col(boolean(BookingProgress::IsCompleted).not_null())
                    .col(timestamp_with_time_zone(BookingProgress::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(BookingProgress::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_progress_booking")
                            .from(BookingProgress::Table, BookingProgress::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BookingProgress::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BookingProgress { Table, Id, BookingId, Steps, CurrentStep, IsCompleted, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Booking { Table, Id }
