//! Create `testimonial` and `setting` tables.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Testimonial::Table)
                    .if_not_exists()
                    .col(pk_auto(Testimonial::Id))
                    .col(string_len(Testimonial::AuthorName, 128).not_null())
                    .col(text(Testimonial::Content).not_null())
                    .col(small_integer(Testimonial::Rating).not_null())
                    .col(boolean(Testimonial::IsApproved).not_null().default(false))
                    .col(timestamp_with_time_zone(Testimonial::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Setting::Table)
                    .if_not_exists()
                    .col(string_len(Setting::Key, 64).primary_key())
                    .col(text(Setting::Value).not_null())
                    .col(timestamp_with_time_zone(Setting::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Setting::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Testimonial::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Testimonial { Table, Id, AuthorName, Content, Rating, IsApproved, CreatedAt }

#[derive(DeriveIden)]
enum Setting { Table, Key, Value, UpdatedAt }
