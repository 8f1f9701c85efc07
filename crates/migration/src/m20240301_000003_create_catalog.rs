//! Create `course` and `service_offering` tables: what the marketing site
//! lists and what bookings point at.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(pk_auto(Course::Id))
                    .col(string_len(Course::Title, 200).not_null())
                    .col(string_len(Course::Slug, 220).unique_key().not_null())
                    .col(text(Course::Description).not_null())
                    .col(integer(Course::DurationWeeks).not_null())
                    .col(big_integer(Course::MonthlyFee).not_null())
                    .col(boolean(Course::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Course::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Course::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ServiceOffering::Table)
                    .if_not_exists()
                    .col(pk_auto(ServiceOffering::Id))
                    .col(string_len(ServiceOffering::Title, 200).not_null())
                    .col(text(ServiceOffering::Description).not_null())
                    .col(string_len_null(ServiceOffering::Icon, 64))
                    .col(boolean(ServiceOffering::IsActive).not_null().default(true))
                    .col(integer(ServiceOffering::SortOrder).not_null().default(0))
                    .col(timestamp_with_time_zone(ServiceOffering::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ServiceOffering::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceOffering::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Course::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Course { Table, Id, Title, Slug, Description, DurationWeeks, MonthlyFee, IsActive, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum ServiceOffering { Table, Id, Title, Description, Icon, IsActive, SortOrder, CreatedAt, UpdatedAt }
