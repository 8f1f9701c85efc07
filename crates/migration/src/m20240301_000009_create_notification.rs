//! Create `notification` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(pk_auto(Notification::Id))
                    .col(integer(Notification::UserId).not_null())
                    .col(string_len(Notification::Title, 200).not_null())
                    .col(text(Notification::Body).not_null())
                    .col(string_len(Notification::Kind, 16).not_null())
                    .col(boolean(Notification::IsRead).not_null().default(false))
                    .col(timestamp_with_time_zone(Notification::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_user")
                            .from(Notification::Table, Notification::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Notification::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Notification { Table, Id, UserId, Title, Body, Kind, IsRead, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
