use crate::error::{AppError, AppResult};
use crate::handlers::listing::ListingResponse;
use crate::middleware::auth::parse_user_id;
use crate::middleware::AuthUser;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::favorite::FavoriteService;
use crate::services::notification::NotificationService;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension,
};
use sea_orm::DatabaseConnection;

#[utoipa::path(
    post,
    path = "/api/v1/listings/{id}/favorite",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing favorited", body = serde_json::Value),
        (status = 404, description = "Listing not found", body = AppError),
        (status = 409, description = "Already favorited", body = AppError),
    ),
    tag = "favorites"
)]
pub async fn add_favorite(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let notifications = NotificationService::new(db.clone());
    let service = FavoriteService::new(db);
    service.add_favorite(user_id, id, &notifications).await?;

    Ok(ApiResponse::with_message(
        serde_json::json!({ "listing_id": id }),
        "Added to favorites".to_string(),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}/favorite",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Favorite removed", body = serde_json::Value),
        (status = 404, description = "Favorite not found", body = AppError),
    ),
    tag = "favorites"
)]
pub async fn remove_favorite(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = FavoriteService::new(db);
    service.remove_favorite(user_id, id).await?;

    Ok(ApiResponse::with_message(
        serde_json::json!({ "listing_id": id }),
        "Removed from favorites".to_string(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/favorites",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "User's favorited listings", body = PaginatedResponse<ListingResponse>),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "favorites"
)]
pub async fn list_favorites(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let page = pagination.page.unwrap_or(1);
    let per_page = pagination.per_page.unwrap_or(20).min(100);

    let service = FavoriteService::new(db);
    let (listings, total) = service.list_favorites(user_id, page, per_page).await?;

    let items: Vec<ListingResponse> = listings.into_iter().map(ListingResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}
