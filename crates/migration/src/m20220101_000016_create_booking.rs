//! Create `booking` table with FKs to `customer` and `product_service`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::CustomerId).not_null())
                    .col(uuid(Booking::ServiceId).not_null())
                    .col(date(Booking::Date).not_null())
                    // studio slots are "HH:MM" strings
                    .col(string_len(Booking::Time, 5).not_null())
                    .col(big_integer(Booking::Price).not_null())
                    .col(big_integer(Booking::TotalPrice).not_null())
                    .col(string_len(Booking::Status, 64).not_null())
                    .col(string_len(Booking::PaymentStatus, 16).not_null())
                    .col(
                        ColumnDef::new(Booking::Notes)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Booking::OrderId)
                            .string_len(64)
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Booking::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Booking::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_customer")
                            .from(Booking::Table, Booking::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_service")
                            .from(Booking::Table, Booking::ServiceId)
                            .to(ProductService::Table, ProductService::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Booking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Booking {
    Table,
    Id,
    CustomerId,
    ServiceId,
    Date,
    Time,
    Price,
    TotalPrice,
    Status,
    PaymentStatus,
    Notes,
    OrderId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customer { Table, Id }

#[derive(DeriveIden)]
enum ProductService { Table, Id }
