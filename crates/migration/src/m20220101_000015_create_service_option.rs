//! Create `service_option` table with FK to `product_service`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceOption::Table)
                    .if_not_exists()
                    .col(uuid(ServiceOption::Id).primary_key())
                    .col(uuid(ServiceOption::ServiceId).not_null())
                    .col(string_len(ServiceOption::Name, 128).not_null())
                    .col(
                        ColumnDef::new(ServiceOption::Description)
                            .text()
                            .null(),
                    )
                    .col(big_integer(ServiceOption::AdditionalPrice).not_null())
                    .col(integer(ServiceOption::AdditionalDurationMinutes).not_null())
                    .col(timestamp_with_time_zone(ServiceOption::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_option_service")
                            .from(ServiceOption::Table, ServiceOption::ServiceId)
                            .to(ProductService::Table, ProductService::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceOption::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceOption {
    Table,
    Id,
    ServiceId,
    Name,
    Description,
    AdditionalPrice,
    AdditionalDurationMinutes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ProductService { Table, Id }
