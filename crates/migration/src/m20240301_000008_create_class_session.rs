//! Create `class_session`: weekly recurring class slots pairing a teacher
//! with a student.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClassSession::Table)
                    .if_not_exists()
                    .col(pk_auto(ClassSession::Id))
                    .col(integer_null(ClassSession::CourseId))
                    .col(integer(ClassSession::TeacherId).not_null())
                    .col(integer(ClassSession::StudentId).not_null())
                    .col(small_integer(ClassSession::Weekday).not_null())
                    .col(string_len(ClassSession::StartTime, 5).not_null())
                    .col(integer(ClassSession::DurationMinutes).not_null())
                    .col(string_len_null(ClassSession::MeetingLink, 512))
                    .col(timestamp_with_time_zone(ClassSession::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_class_session_course")
                            .from(ClassSession::Table, ClassSession::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_class_session_teacher")
                            .from(ClassSession::Table, ClassSession::TeacherId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_class_session_student")
                            .from(ClassSession::Table, ClassSession::StudentId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ClassSession::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ClassSession {
    Table,
    Id,
    CourseId,
    TeacherId,
    StudentId,
    Weekday,
    StartTime,
    DurationMinutes,
    MeetingLink,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Course { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
