//! Create `product_service` table.
//!
//! Catalog entries; weekday and time-window availability are JSONB lists.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductService::Table)
                    .if_not_exists()
                    .col(uuid(ProductService::Id).primary_key())
                    .col(string_len(ProductService::Name, 128).not_null())
                    .col(text(ProductService::Description).not_null())
                    .col(string_len(ProductService::Category, 32).not_null())
                    .col(big_integer(ProductService::Price).not_null())
                    .col(integer(ProductService::DurationMinutes).not_null())
                    .col(
                        ColumnDef::new(ProductService::Image)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ProductService::WebArUrl)
                            .string_len(512)
                            .null(),
                    )
                    .col(boolean(ProductService::IsActive).not_null())
                    .col(json_binary(ProductService::AvailableDays).not_null())
                    .col(json_binary(ProductService::AvailableTimeSlots).not_null())
                    .col(timestamp_with_time_zone(ProductService::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ProductService::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProductService::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProductService {
    Table,
    Id,
    Name,
    Description,
    Category,
    Price,
    DurationMinutes,
    Image,
    WebArUrl,
    IsActive,
    AvailableDays,
    AvailableTimeSlots,
    CreatedAt,
    UpdatedAt,
}
