use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Booking: index on customer_id
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_customer")
                    .table(Booking::Table)
                    .col(Booking::CustomerId)
                    .to_owned(),
            )
            .await?;

        // Booking: composite index on (date, status) for slot counting
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_date_status")
                    .table(Booking::Table)
                    .col(Booking::Date)
                    .col(Booking::Status)
                    .to_owned(),
            )
            .await?;

        // ServiceOption: index on service_id
        manager
            .create_index(
                Index::create()
                    .name("idx_option_service")
                    .table(ServiceOption::Table)
                    .col(ServiceOption::ServiceId)
                    .to_owned(),
            )
            .await?;

        // BookingHistory: index on booking_id and timestamp
        manager
            .create_index(
                Index::create()
                    .name("idx_history_booking")
                    .table(BookingHistory::Table)
                    .col(BookingHistory::BookingId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_history_timestamp")
                    .table(BookingHistory::Table)
                    .col(BookingHistory::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_booking_customer").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_booking_date_status").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_option_service").table(ServiceOption::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_history_booking").table(BookingHistory::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_history_timestamp").table(BookingHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Booking { Table, CustomerId, Date, Status }

#[derive(DeriveIden)]
enum ServiceOption { Table, ServiceId }

#[derive(DeriveIden)]
enum BookingHistory { Table, BookingId, Timestamp }
