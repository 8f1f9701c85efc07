use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[(&str, &str, &[&str])] = &[
    ("idx_user_role", "user", &["role"]),
    ("idx_booking_status", "booking", &["status"]),
    ("idx_booking_created_at", "booking", &["created_at"]),
    ("idx_contact_message_is_read", "contact_message", &["is_read"]),
    ("idx_direct_message_recipient", "direct_message", &["recipient_id"]),
    ("idx_direct_message_sender", "direct_message", &["sender_id"]),
    ("idx_fee_plan_student", "fee_plan", &["student_id"]),
    ("uniq_installment_plan_seq", "installment", &["fee_plan_id", "seq"]),
    ("idx_payment_installment", "payment", &["installment_id"]),
    ("idx_class_session_teacher", "class_session", &["teacher_id"]),
    ("idx_class_session_student", "class_session", &["student_id"]),
    ("idx_notification_user", "notification", &["user_id", "is_read"]),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, cols) in INDEXES {
            let mut idx = Index::create();
            idx.name(*name).table(Alias::new(*table));
            for col in cols.iter() {
                idx.col(Alias::new(*col));
            }
            if name.starts_with("uniq_") {
                idx.unique();
            }
            manager.create_index(idx.to_owned()).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _) in INDEXES {
            manager
                .drop_index(Index::drop().name(*name).table(Alias::new(*table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
