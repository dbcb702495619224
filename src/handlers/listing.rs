use crate::error::{AppError, AppResult};
use crate::middleware::auth::parse_user_id;
use crate::middleware::AuthUser;
use crate::models::{Currency, ListingModel, ListingStatus};
use crate::response::{ApiResponse, PaginatedResponse};
use crate::services::auth::AuthService;
use crate::services::cache::CacheService;
use crate::services::email::EmailService;
use crate::services::listing::{ListingFilter, ListingService, NewListing};
use crate::services::validation::ValidationService;
use crate::utils::{convert, format_price};
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateListingRequest {
    /// Listing title (3-200 characters)
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    /// Listing description
    #[validate(length(min = 10, max = 10000))]
    pub description: String,
    /// Asking price (non-negative)
    pub price: f64,
    pub currency: Currency,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListingListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub category: Option<String>,
    pub location: Option<String>,
    /// Currency to display prices in (conversion via static rate table)
    pub currency: Option<Currency>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DisplayCurrencyQuery {
    pub currency: Option<Currency>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingResponse {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub currency: Currency,
    /// Price rendered in the requested display currency
    pub price_display: String,
    pub status: ListingStatus,
    pub slug: String,
    pub category: String,
    pub location: String,
    pub created_at: String,
}

impl ListingResponse {
    /// Render with prices converted into `display` (falls back to the
    /// listing's own currency).
    pub fn with_display_currency(listing: ListingModel, display: Option<Currency>) -> Self {
        let display = display.unwrap_or(listing.currency);
        let converted = convert(listing.price, listing.currency, display);
        let price_display = format_price(converted, display, true);

        Self {
            id: listing.id,
            owner_id: listing.user_id,
            title: listing.title,
            description: listing.description,
            price: listing.price,
            currency: listing.currency,
            price_display,
            status: listing.status,
            slug: listing.slug,
            category: listing.category,
            location: listing.location,
            created_at: listing.created_at.to_string(),
        }
    }
}

impl From<ListingModel> for ListingResponse {
    fn from(listing: ListingModel) -> Self {
        Self::with_display_currency(listing, None)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateListingResponse {
    pub listing: ListingResponse,
    /// When the emailed validation link expires
    pub validation_expires_at: String,
}

fn make_listing_service(db: DatabaseConnection, cache: Option<CacheService>) -> ListingService {
    let service = ListingService::new(db);
    match cache {
        Some(c) => service.with_cache(c),
        None => service,
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/listings",
    security(("jwt_token" = [])),
    request_body = CreateListingRequest,
    responses(
        (status = 200, description = "Listing created (pending validation)", body = CreateListingResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "listings"
)]
pub async fn create_listing(
    Extension(db): Extension<DatabaseConnection>,
    Extension(email_service): Extension<EmailService>,
    auth_user: AuthUser,
    Json(payload): Json<CreateListingRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let user_id = parse_user_id(&auth_user)?;
    let owner = AuthService::new(db.clone()).get_user_by_id(user_id).await?;

    let service = ListingService::new(db.clone());
    let listing = service
        .create(
            user_id,
            NewListing {
                title: payload.title,
                description: payload.description,
                price: payload.price,
                currency: payload.currency,
                category: payload.category,
                location: payload.location,
            },
        )
        .await?;

    let validation = ValidationService::new(db);
    let (issued, dispatch) = validation
        .issue_and_send(&listing, &owner.email, &email_service)
        .await?;

    let response = CreateListingResponse {
        listing: ListingResponse::from(listing),
        validation_expires_at: issued.expires_at.to_string(),
    };

    if dispatch.is_ok() {
        Ok(ApiResponse::with_message(
            response,
            "Listing created. Check your email to activate it.".to_string(),
        ))
    } else {
        Ok(ApiResponse::partial(
            response,
            "Listing created, but the confirmation email could not be sent. Request a new link."
                .to_string(),
        ))
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/listings",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("location" = Option<String>, Query, description = "Filter by location"),
        ("currency" = Option<String>, Query, description = "Display currency"),
    ),
    responses(
        (status = 200, description = "Active listings", body = PaginatedResponse<ListingResponse>),
    ),
    tag = "listings"
)]
pub async fn list_listings(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<ListingListQuery>,
) -> AppResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(20).min(100);

    let service = ListingService::new(db);
    let (listings, total) = service
        .list_active(
            ListingFilter {
                category: params.category,
                location: params.location,
            },
            page,
            per_page,
        )
        .await?;

    let items = listings
        .into_iter()
        .map(|l| ListingResponse::with_display_currency(l, params.currency))
        .collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/listings/{slug}",
    params(
        ("slug" = String, Path, description = "Listing slug"),
        ("currency" = Option<String>, Query, description = "Display currency"),
    ),
    responses(
        (status = 200, description = "Listing detail", body = ListingResponse),
        (status = 404, description = "Listing not found", body = AppError),
    ),
    tag = "listings"
)]
pub async fn get_listing(
    Extension(db): Extension<DatabaseConnection>,
    cache: Option<Extension<CacheService>>,
    Path(slug): Path<String>,
    Query(params): Query<DisplayCurrencyQuery>,
) -> AppResult<impl IntoResponse> {
    let service = make_listing_service(db, cache.map(|c| c.0));
    let listing = service.get_by_slug(&slug).await?;
    Ok(ApiResponse::ok(ListingResponse::with_display_currency(
        listing,
        params.currency,
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/listings/{id}",
    security(("jwt_token" = [])),
    request_body = CreateListingRequest,
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing updated", body = ListingResponse),
        (status = 403, description = "Not the owner", body = AppError),
        (status = 404, description = "Listing not found", body = AppError),
    ),
    tag = "listings"
)]
pub async fn update_listing(
    Extension(db): Extension<DatabaseConnection>,
    cache: Option<Extension<CacheService>>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<CreateListingRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let user_id = parse_user_id(&auth_user)?;
    let service = make_listing_service(db, cache.map(|c| c.0));
    let updated = service
        .update_own(
            user_id,
            id,
            NewListing {
                title: payload.title,
                description: payload.description,
                price: payload.price,
                currency: payload.currency,
                category: payload.category,
                location: payload.location,
            },
        )
        .await?;

    Ok(ApiResponse::ok(ListingResponse::from(updated)))
}

#[utoipa::path(
    post,
    path = "/api/v1/listings/{id}/resend-validation",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Validation email re-sent", body = serde_json::Value),
        (status = 400, description = "Listing is not pending", body = AppError),
        (status = 403, description = "Not the owner", body = AppError),
    ),
    tag = "listings"
)]
pub async fn resend_validation(
    Extension(db): Extension<DatabaseConnection>,
    Extension(email_service): Extension<EmailService>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let listing = ListingService::new(db.clone()).get_by_id(id).await?;
    if listing.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    if listing.status != ListingStatus::Pending {
        return Err(AppError::Validation(
            "Listing is not awaiting validation".to_string(),
        ));
    }

    let owner = AuthService::new(db.clone()).get_user_by_id(user_id).await?;
    let validation = ValidationService::new(db);
    let (issued, dispatch) = validation
        .issue_and_send(&listing, &owner.email, &email_service)
        .await?;

    let body = serde_json::json!({ "validation_expires_at": issued.expires_at.to_string() });
    if dispatch.is_ok() {
        Ok(ApiResponse::with_message(
            body,
            "Validation email sent.".to_string(),
        ))
    } else {
        Ok(ApiResponse::partial(
            body,
            "New token issued, but the email could not be sent.".to_string(),
        ))
    }
}
