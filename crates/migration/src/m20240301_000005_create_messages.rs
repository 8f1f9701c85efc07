//! Create `contact_message` (public contact form) and `direct_message`
//! (dashboard inbox between users).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactMessage::Table)
                    .if_not_exists()
                    .col(pk_auto(ContactMessage::Id))
                    .col(string_len(ContactMessage::Name, 128).not_null())
                    .col(string_len(ContactMessage::Email, 255).not_null())
                    .col(string_len_null(ContactMessage::Subject, 200))
                    .col(text(ContactMessage::Body).not_null())
                    .col(boolean(ContactMessage::IsRead).not_null().default(false))
                    .col(timestamp_with_time_zone(ContactMessage::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DirectMessage::Table)
                    .if_not_exists()
                    .col(pk_auto(DirectMessage::Id))
                    .col(integer(DirectMessage::SenderId).not_null())
                    .col(integer(DirectMessage::RecipientId).not_null())
                    .col(text(DirectMessage::Body).not_null())
                    .col(boolean(DirectMessage::IsRead).not_null().default(false))
                    .col(timestamp_with_time_zone(DirectMessage::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_direct_message_sender")
                            .from(DirectMessage::Table, DirectMessage::SenderId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_direct_message_recipient")
                            .from(DirectMessage::Table, DirectMessage::RecipientId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(DirectMessage::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ContactMessage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ContactMessage { Table, Id, Name, Email, Subject, Body, IsRead, CreatedAt }

#[derive(DeriveIden)]
enum DirectMessage { Table, Id, SenderId, RecipientId, Body, IsRead, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
