//! Create `booking_history` table with FK to `booking`.
//!
//! Append-only audit trail of actions performed on a booking.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookingHistory::Table)
                    .if_not_exists()
                    .col(big_integer(BookingHistory::Id).primary_key().auto_increment())
                    .col(uuid(BookingHistory::BookingId).not_null())
                    .col(string_len(BookingHistory::Action, 32).not_null())
                    .col(text(BookingHistory::Description).not_null())
                    .col(uuid(BookingHistory::PerformedBy).not_null())
                    .col(string_len(BookingHistory::ActorRole, 16).not_null())
                    .col(
                        ColumnDef::new(BookingHistory::PreviousStatus)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BookingHistory::NewStatus)
                            .string_len(64)
                            .null(),
                    )
                    .col(timestamp_with_time_zone(BookingHistory::Timestamp).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_history_booking")
                            .from(BookingHistory::Table, BookingHistory::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BookingHistory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BookingHistory {
    Table,
    Id,
    BookingId,
    Action,
    Description,
    PerformedBy,
    ActorRole,
    PreviousStatus,
    NewStatus,
    Timestamp,
}

#[derive(DeriveIden)]
enum Booking { Table, Id }
