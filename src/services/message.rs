use crate::{
    error::{AppError, AppResult},
    models::{message, Listing, Message, MessageModel, NotificationKind},
    services::notification::NotificationService,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

pub struct MessageService {
    db: DatabaseConnection,
}

impl MessageService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Send a message to a listing's owner. Fans out a MESSAGE notification
    /// (best-effort, logged on failure).
    pub async fn send(
        &self,
        sender_id: i32,
        listing_id: i32,
        body: &str,
        notifications: &NotificationService,
    ) -> AppResult<MessageModel> {
        let listing = Listing::find_by_id(listing_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::ListingNotFound)?;

        if listing.user_id == sender_id {
            return Err(AppError::Validation(
                "Cannot message your own listing".to_string(),
            ));
        }

        let now = chrono::Utc::now().naive_utc();
        let model = message::ActiveModel {
            sender_id: sea_orm::ActiveValue::Set(sender_id),
            recipient_id: sea_orm::ActiveValue::Set(listing.user_id),
            listing_id: sea_orm::ActiveValue::Set(listing.id),
            body: sea_orm::ActiveValue::Set(body.to_string()),
            is_read: sea_orm::ActiveValue::Set(false),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;

        let note = format!("Mesaj nou pentru anuntul \"{}\"", listing.title);
        if let Err(e) = notifications
            .notify(
                listing.user_id,
                sender_id,
                NotificationKind::Message,
                listing.id,
                &note,
            )
            .await
        {
            tracing::warn!(listing_id = listing.id, "message notification failed: {e}");
        }

        Ok(saved)
    }

    /// Inbox: messages received by the user, newest first.
    pub async fn inbox(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<MessageModel>, u64)> {
        let paginator = Message::find()
            .filter(message::Column::RecipientId.eq(user_id))
            .order_by_desc(message::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }
}
