use crate::error::{AppError, AppResult};
use crate::handlers::listing::ListingResponse;
use crate::middleware::auth::require_admin;
use crate::middleware::AuthUser;
use crate::models::ListingStatus;
use crate::response::{ApiResponse, PaginatedResponse};
use crate::services::auth::AuthService;
use crate::services::cache::CacheService;
use crate::services::listing::ListingService;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusQuery {
    pub status: Option<ListingStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    pub status: ListingStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStats {
    pub users: u64,
    pub pending_listings: u64,
    pub active_listings: u64,
    pub rejected_listings: u64,
    pub expired_listings: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/listings",
    security(("jwt_token" = [])),
    params(
        ("status" = Option<String>, Query, description = "Filter by status (defaults to pending)"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Listings by status", body = PaginatedResponse<ListingResponse>),
        (status = 403, description = "Admin access required", body = AppError),
    ),
    tag = "admin"
)]
pub async fn list_listings_by_status(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(params): Query<StatusQuery>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let status = params.status.unwrap_or(ListingStatus::Pending);
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(20).min(100);

    let service = ListingService::new(db);
    let (listings, total) = service.list_by_status(status, page, per_page).await?;

    let items: Vec<ListingResponse> = listings.into_iter().map(ListingResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/listings/{id}/status",
    security(("jwt_token" = [])),
    request_body = SetStatusRequest,
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Status updated", body = ListingResponse),
        (status = 403, description = "Admin access required", body = AppError),
        (status = 404, description = "Listing not found", body = AppError),
    ),
    tag = "admin"
)]
pub async fn set_listing_status(
    Extension(db): Extension<DatabaseConnection>,
    cache: Option<Extension<CacheService>>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<SetStatusRequest>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let mut service = ListingService::new(db.clone());
    if let Some(Extension(c)) = cache {
        service = service.with_cache(c);
    }

    let updated = service.set_status(id, payload.status).await?;
    Ok(ApiResponse::ok(ListingResponse::from(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Platform counts", body = AdminStats),
        (status = 403, description = "Admin access required", body = AppError),
    ),
    tag = "admin"
)]
pub async fn stats(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let listings = ListingService::new(db.clone());
    let users = AuthService::new(db);

    let stats = AdminStats {
        users: users.count_users().await?,
        pending_listings: listings.count_by_status(ListingStatus::Pending).await?,
        active_listings: listings.count_by_status(ListingStatus::Active).await?,
        rejected_listings: listings.count_by_status(ListingStatus::Rejected).await?,
        expired_listings: listings.count_by_status(ListingStatus::Expired).await?,
    };

    Ok(ApiResponse::ok(stats))
}
