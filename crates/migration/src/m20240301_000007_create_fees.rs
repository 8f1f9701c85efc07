//! Create `fee_plan`, `installment` and `payment`.
//!
//! Deleting a plan removes its installments and their payments. Deleting a
//! student removes their plans.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeePlan::Table)
                    .if_not_exists()
                    .col(pk_auto(FeePlan::Id))
                    .col(integer(FeePlan::StudentId).not_null())
                    .col(integer_null(FeePlan::CourseId))
                    .col(big_integer(FeePlan::TotalAmount).not_null())
                    .col(string_len(FeePlan::PlanType, 16).not_null())
                    .col(integer(FeePlan::InstallmentCount).not_null())
                    .col(date(FeePlan::StartDate).not_null())
                    .col(timestamp_with_time_zone(FeePlan::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_plan_student")
                            .from(FeePlan::Table, FeePlan::StudentId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_plan_course")
                            .from(FeePlan::Table, FeePlan::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Installment::Table)
                    .if_not_exists()
                    .col(pk_auto(Installment::Id))
                    .col(integer(Installment::FeePlanId).not_null())
                    .col(integer(Installment::Seq).not_null())
                    .col(big_integer(Installment::Amount).not_null())
                    .col(big_integer(Installment::PaidAmount).not_null().default(0))
                    .col(date(Installment::DueDate).not_null())
                    .col(string_len(Installment::Status, 16).not_null())
                    .col(timestamp_with_time_zone_null(Installment::PaidAt))
                    .col(timestamp_with_time_zone(Installment::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_installment_fee_plan")
                            .from(Installment::Table, Installment::FeePlanId)
                            .to(FeePlan::Table, FeePlan::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(pk_auto(Payment::Id))
                    .col(integer(Payment::InstallmentId).not_null())
                    .col(big_integer(Payment::Amount).not_null())
                    .col(string_len(Payment::Method, 32).not_null())
                    .col(string_len_null(Payment::Reference, 128))
                    .col(timestamp_with_time_zone(Payment::PaidAt).not_null())
                    .col(integer_null(Payment::RecordedBy))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_installment")
                            .from(Payment::Table, Payment::InstallmentId)
                            .to(Installment::Table, Installment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_recorded_by")
                            .from(Payment::Table, Payment::RecordedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Payment::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Installment::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FeePlan::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum FeePlan { Table, Id, StudentId, CourseId, TotalAmount, PlanType, InstallmentCount, StartDate, CreatedAt }

#[derive(DeriveIden)]
enum Installment { Table, Id, FeePlanId, Seq, Amount, PaidAmount, DueDate, Status, PaidAt, CreatedAt }

#[derive(DeriveIden)]
enum Payment { Table, Id, InstallmentId, Amount, Method, Reference, PaidAt, RecordedBy }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Course { Table, Id }
