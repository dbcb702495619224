use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_listings_category ON listings(category)",
        )
        .await?;
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_listings_user_id ON listings(user_id)",
        )
        .await?;
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_notifications_user_unread ON notifications(user_id, is_read)",
        )
        .await?;
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_messages_recipient ON messages(recipient_id, created_at)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP INDEX IF EXISTS idx_listings_category")
            .await?;
        db.execute_unprepared("DROP INDEX IF EXISTS idx_listings_user_id")
            .await?;
        db.execute_unprepared("DROP INDEX IF EXISTS idx_notifications_user_unread")
            .await?;
        db.execute_unprepared("DROP INDEX IF EXISTS idx_messages_recipient")
            .await?;
        Ok(())
    }
}
