use crate::{
    error::{AppError, AppResult},
    models::{listing, Currency, Listing, ListingModel, ListingStatus},
    services::cache::CacheService,
    utils::slug::unique_slug,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

const CACHE_TTL_LISTING: u64 = 300; // 5 minutes

fn listing_cache_key(slug: &str) -> String {
    format!("listing:{}", slug)
}

#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub currency: Currency,
    pub category: String,
    pub location: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub location: Option<String>,
}

pub struct ListingService {
    db: DatabaseConnection,
    cache: Option<CacheService>,
}

impl ListingService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, cache: None }
    }

    pub fn with_cache(mut self, cache: CacheService) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Create a listing in PENDING status with a fresh, immutable slug.
    pub async fn create(&self, user_id: i32, input: NewListing) -> AppResult<ListingModel> {
        if !input.price.is_finite() || input.price < 0.0 {
            return Err(AppError::Validation(
                "Price must be a non-negative number".to_string(),
            ));
        }

        let now = chrono::Utc::now().naive_utc();
        let slug = unique_slug(&input.title);

        let model = listing::ActiveModel {
            user_id: sea_orm::ActiveValue::Set(user_id),
            title: sea_orm::ActiveValue::Set(input.title),
            description: sea_orm::ActiveValue::Set(input.description),
            price: sea_orm::ActiveValue::Set(input.price),
            currency: sea_orm::ActiveValue::Set(input.currency),
            status: sea_orm::ActiveValue::Set(ListingStatus::Pending),
            slug: sea_orm::ActiveValue::Set(slug),
            category: sea_orm::ActiveValue::Set(input.category),
            location: sea_orm::ActiveValue::Set(input.location),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ListingModel> {
        Listing::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::ListingNotFound)
    }

    pub async fn get_by_slug(&self, slug: &str) -> AppResult<ListingModel> {
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get::<ListingModel>(&listing_cache_key(slug)).await {
                return Ok(cached);
            }
        }

        let found = Listing::find()
            .filter(listing::Column::Slug.eq(slug))
            .one(&self.db)
            .await?
            .ok_or(AppError::ListingNotFound)?;

        if let Some(cache) = &self.cache {
            cache
                .set(&listing_cache_key(slug), &found, CACHE_TTL_LISTING)
                .await;
        }

        Ok(found)
    }

    /// Paginated ACTIVE listings, newest first, optionally filtered by
    /// category and location.
    pub async fn list_active(
        &self,
        filter: ListingFilter,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<ListingModel>, u64)> {
        let mut query = Listing::find().filter(listing::Column::Status.eq(ListingStatus::Active));

        if let Some(category) = filter.category {
            query = query.filter(listing::Column::Category.eq(category));
        }
        if let Some(location) = filter.location {
            query = query.filter(listing::Column::Location.eq(location));
        }

        let paginator = query
            .order_by_desc(listing::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn list_by_status(
        &self,
        status: ListingStatus,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<ListingModel>, u64)> {
        let paginator = Listing::find()
            .filter(listing::Column::Status.eq(status))
            .order_by_desc(listing::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Owner edit. The slug never changes once assigned.
    pub async fn update_own(
        &self,
        user_id: i32,
        id: i32,
        input: NewListing,
    ) -> AppResult<ListingModel> {
        if !input.price.is_finite() || input.price < 0.0 {
            return Err(AppError::Validation(
                "Price must be a non-negative number".to_string(),
            ));
        }

        let existing = self.get_by_id(id).await?;
        if existing.user_id != user_id {
            return Err(AppError::Forbidden);
        }

        let now = chrono::Utc::now().naive_utc();
        let slug = existing.slug.clone();

        let mut active: listing::ActiveModel = existing.into();
        active.title = sea_orm::ActiveValue::Set(input.title);
        active.description = sea_orm::ActiveValue::Set(input.description);
        active.price = sea_orm::ActiveValue::Set(input.price);
        active.currency = sea_orm::ActiveValue::Set(input.currency);
        active.category = sea_orm::ActiveValue::Set(input.category);
        active.location = sea_orm::ActiveValue::Set(input.location);
        active.updated_at = sea_orm::ActiveValue::Set(now);

        let updated = active.update(&self.db).await?;
        self.invalidate(&slug).await;
        Ok(updated)
    }

    /// Admin override: the one path allowed to move status in any direction.
    pub async fn set_status(&self, id: i32, status: ListingStatus) -> AppResult<ListingModel> {
        let existing = self.get_by_id(id).await?;
        let now = chrono::Utc::now().naive_utc();
        let slug = existing.slug.clone();

        let mut active: listing::ActiveModel = existing.into();
        active.status = sea_orm::ActiveValue::Set(status);
        active.updated_at = sea_orm::ActiveValue::Set(now);

        let updated = active.update(&self.db).await?;
        self.invalidate(&slug).await;
        Ok(updated)
    }

    pub async fn invalidate(&self, slug: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&listing_cache_key(slug)).await;
        }
    }

    pub async fn count_by_status(&self, status: ListingStatus) -> AppResult<u64> {
        let count = Listing::find()
            .filter(listing::Column::Status.eq(status))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
