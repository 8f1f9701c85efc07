//! Create `booking` table: trial-class and service requests from the
//! public site. Catalog references are cleared, not cascaded, on delete.
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
                    .col(pk_auto(Booking::Id))
                    .col(string_len(Booking::Name, 128).not_null())
                    .col(string_len(Booking::Email, 255).not_null())
                    .col(string_len_null(Booking::Phone, 32))
                    .col(integer_null(Booking::CourseId))
                    .col(integer_null(Booking::ServiceId))
                    .col(string_len_null(Booking::PreferredTime, 64))
                    .col(text_null(Booking::Message))
                    .col(string_len(Booking::Status, 16).not_null())
                    .col(timestamp_with_time_zone(Booking::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Booking::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_course")
                            .from(Booking::Table, Booking::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_service")
                            .from(Booking::Table, Booking::ServiceId)
                            .to(ServiceOffering::Table, ServiceOffering::Id)
                            .on_delete(ForeignKeyAction::SetNull)
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
    Name,
    Email,
    Phone,
    CourseId,
    ServiceId,
    PreferredTime,
    Message,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Course { Table, Id }

#[derive(DeriveIden)]
enum ServiceOffering { Table, Id }
