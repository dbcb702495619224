use crate::{
    error::{AppError, AppResult},
    models::{favorite, listing, Favorite, Listing, ListingModel, NotificationKind},
    services::notification::NotificationService,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Statement,
};
use std::collections::HashMap;

pub struct FavoriteService {
    db: DatabaseConnection,
}

impl FavoriteService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a favorite for (user, listing). The insert is a single
    /// conditional write: ON CONFLICT DO NOTHING plus an affected-row check
    /// stands in for read-then-insert, so concurrent duplicates cannot both
    /// succeed. On success a FAVORITE notification fans out to the owner
    /// (best-effort, never rolls back the favorite).
    pub async fn add_favorite(
        &self,
        user_id: i32,
        listing_id: i32,
        notifications: &NotificationService,
    ) -> AppResult<()> {
        let listing = Listing::find_by_id(listing_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::ListingNotFound)?;

        let result = self
            .db
            .execute(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                "INSERT INTO favorites (user_id, listing_id, created_at)
                 VALUES ($1, $2, NOW())
                 ON CONFLICT (user_id, listing_id) DO NOTHING",
                vec![user_id.into(), listing_id.into()],
            ))
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::AlreadyFavorited);
        }

        // No self-notification when favoriting your own listing.
        if listing.user_id != user_id {
            let message = format!("Anuntul \"{}\" a fost adaugat la favorite", listing.title);
            if let Err(e) = notifications
                .notify(
                    listing.user_id,
                    user_id,
                    NotificationKind::Favorite,
                    listing.id,
                    &message,
                )
                .await
            {
                tracing::warn!(
                    listing_id = listing.id,
                    "favorite notification failed: {e}"
                );
            }
        }

        Ok(())
    }

    /// Remove the (user, listing) favorite. Absent pair is NotFound.
    pub async fn remove_favorite(&self, user_id: i32, listing_id: i32) -> AppResult<()> {
        let result = Favorite::delete_many()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::ListingId.eq(listing_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// List the user's favorited listings, most recently favorited first.
    pub async fn list_favorites(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<ListingModel>, u64)> {
        let paginator = Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_desc(favorite::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let favorites = paginator.fetch_page(page.saturating_sub(1)).await?;

        let listing_ids: Vec<i32> = favorites.iter().map(|f| f.listing_id).collect();
        if listing_ids.is_empty() {
            return Ok((vec![], total));
        }

        let listings = Listing::find()
            .filter(listing::Column::Id.is_in(listing_ids.clone()))
            .all(&self.db)
            .await?;

        // Reorder to match favorite order
        let by_id: HashMap<i32, ListingModel> = listings.into_iter().map(|l| (l.id, l)).collect();
        let ordered: Vec<ListingModel> = listing_ids
            .into_iter()
            .filter_map(|id| by_id.get(&id).cloned())
            .collect();

        Ok((ordered, total))
    }
}

#[cfg(test)]
mod tests {
    fn should_notify(owner_id: i32, actor_id: i32) -> bool {
        owner_id != actor_id
    }

    #[test]
    fn no_notification_for_own_listing() {
        assert!(!should_notify(1, 1));
    }

    #[test]
    fn notification_for_other_owner() {
        assert!(should_notify(1, 2));
    }
}
