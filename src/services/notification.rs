use crate::{
    error::AppResult,
    models::{notification, Notification, NotificationKind, NotificationModel},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

pub struct NotificationService {
    db: DatabaseConnection,
}

impl NotificationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn notify(
        &self,
        user_id: i32,
        actor_id: i32,
        kind: NotificationKind,
        listing_id: i32,
        message: &str,
    ) -> AppResult<()> {
        // Don't notify yourself
        if user_id == actor_id {
            return Ok(());
        }

        let now = chrono::Utc::now().naive_utc();
        let model = notification::ActiveModel {
            user_id: sea_orm::ActiveValue::Set(user_id),
            actor_id: sea_orm::ActiveValue::Set(actor_id),
            kind: sea_orm::ActiveValue::Set(kind),
            listing_id: sea_orm::ActiveValue::Set(listing_id),
            message: sea_orm::ActiveValue::Set(message.to_string()),
            is_read: sea_orm::ActiveValue::Set(false),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        model.insert(&self.db).await?;
        Ok(())
    }

    pub async fn list_for_user(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<NotificationModel>, u64)> {
        let paginator = Notification::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn unread_count(&self, user_id: i32) -> AppResult<u64> {
        let count = Notification::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    pub async fn mark_read(&self, id: i32, user_id: i32) -> AppResult<()> {
        let existing = Notification::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(crate::error::AppError::NotFound)?;

        if existing.user_id != user_id {
            return Err(crate::error::AppError::Forbidden);
        }

        let mut active: notification::ActiveModel = existing.into();
        active.is_read = sea_orm::ActiveValue::Set(true);
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<u64> {
        use sea_orm::sea_query::Expr;
        let result = Notification::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Bulk delete, recipient-initiated.
    pub async fn delete_all(&self, user_id: i32) -> AppResult<u64> {
        let result = Notification::delete_many()
            .filter(notification::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
