use crate::{
    config::validation::ValidationConfig,
    error::{AppError, AppResult},
    models::{listing, validation_token, Listing, ListingModel, ListingStatus, ValidationTokenModel},
    services::email::{EmailDispatch, EmailService},
    utils::token::generate_validation_token,
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};

/// Issues and consumes listing validation tokens. Confirmation is the one
/// piece with real state-machine semantics: a token is ISSUED until it
/// expires or is consumed, and both of those states are terminal.
pub struct ValidationService {
    db: DatabaseConnection,
    config: ValidationConfig,
}

impl ValidationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            config: ValidationConfig::from_env(),
        }
    }

    /// Persist a fresh token for the listing. Any earlier unconsumed token is
    /// retired first, so at most one live token exists per listing and a
    /// stale emailed link cannot activate a listing after a newer link was
    /// requested.
    pub async fn issue(&self, listing_id: i32) -> AppResult<ValidationTokenModel> {
        let now = chrono::Utc::now().naive_utc();
        let expires_at = now + chrono::Duration::hours(self.config.token_ttl_hours);

        validation_token::Entity::update_many()
            .col_expr(validation_token::Column::Consumed, Expr::value(true))
            .filter(validation_token::Column::ListingId.eq(listing_id))
            .filter(validation_token::Column::Consumed.eq(false))
            .exec(&self.db)
            .await?;

        let model = validation_token::ActiveModel {
            listing_id: sea_orm::ActiveValue::Set(listing_id),
            token: sea_orm::ActiveValue::Set(generate_validation_token()),
            expires_at: sea_orm::ActiveValue::Set(expires_at),
            consumed: sea_orm::ActiveValue::Set(false),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Issue a token and dispatch the confirmation email. Email failure does
    /// not roll back token creation; the dispatch outcome is returned so the
    /// caller can report partial success.
    pub async fn issue_and_send(
        &self,
        listing: &ListingModel,
        owner_email: &str,
        email_service: &EmailService,
    ) -> AppResult<(ValidationTokenModel, EmailDispatch)> {
        let issued = self.issue(listing.id).await?;

        let dispatch = email_service
            .send_listing_validation_email(owner_email, &listing.title, listing.id, &issued.token)
            .await;

        if dispatch == EmailDispatch::Failed {
            tracing::warn!(
                listing_id = listing.id,
                "confirmation email dispatch failed, token remains valid"
            );
        }

        Ok((issued, dispatch))
    }

    /// Confirm a listing: consume the token and flip the listing to ACTIVE.
    /// Returns the listing slug for redirect.
    ///
    /// The token consume is a single conditional update (WHERE consumed =
    /// false AND expires_at > now), so of two racing confirms at most one
    /// sees an unconsumed token. Both mutations run in one transaction; if
    /// the listing update fails the rollback leaves the token consumable,
    /// which is safe to retry.
    pub async fn confirm(&self, listing_id: i32, token: &str) -> AppResult<String> {
        let now = chrono::Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let consumed = validation_token::Entity::update_many()
            .col_expr(validation_token::Column::Consumed, Expr::value(true))
            .filter(validation_token::Column::ListingId.eq(listing_id))
            .filter(validation_token::Column::Token.eq(token))
            .filter(validation_token::Column::Consumed.eq(false))
            .filter(validation_token::Column::ExpiresAt.gt(now))
            .exec(&txn)
            .await?;

        if consumed.rows_affected == 0 {
            txn.rollback().await?;
            return Err(AppError::InvalidOrExpiredToken);
        }

        let listing = match Listing::find_by_id(listing_id).one(&txn).await? {
            Some(l) => l,
            None => {
                // Referential integrity should make this impossible; a live
                // token pointing at a missing listing is a consistency
                // violation, not a user error.
                txn.rollback().await?;
                tracing::error!(
                    listing_id,
                    "validation token references a missing listing"
                );
                return Err(AppError::Internal(anyhow::anyhow!(
                    "listing referenced by validation token is missing"
                )));
            }
        };

        let slug = listing.slug.clone();
        let mut active: listing::ActiveModel = listing.into();
        active.status = sea_orm::ActiveValue::Set(ListingStatus::Active);
        active.updated_at = sea_orm::ActiveValue::Set(now);
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(slug)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    fn token_is_live(consumed: bool, expires_at: NaiveDateTime, now: NaiveDateTime) -> bool {
        !consumed && expires_at > now
    }

    #[test]
    fn issued_token_is_live() {
        let now = chrono::Utc::now().naive_utc();
        assert!(token_is_live(false, now + chrono::Duration::hours(1), now));
    }

    #[test]
    fn expired_token_is_terminal() {
        let now = chrono::Utc::now().naive_utc();
        assert!(!token_is_live(false, now - chrono::Duration::seconds(1), now));
    }

    #[test]
    fn consumed_token_is_terminal_even_before_expiry() {
        let now = chrono::Utc::now().naive_utc();
        assert!(!token_is_live(true, now + chrono::Duration::hours(1), now));
    }
}
