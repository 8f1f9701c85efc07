/// CRUD round trips against the migrated schema
pub mod crud_tests;


use anyhow::Result;
use sea_orm::DatabaseConnection;

/// Fresh in-memory database with every migration applied.
pub(crate) async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::db::connect_memory().await?;
    crate::db::migrate(&db).await?;
    Ok(db)
}
