use crate::error::{AppError, AppResult};
use crate::middleware::auth::parse_user_id;
use crate::middleware::AuthUser;
use crate::models::{NotificationKind, NotificationModel};
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::notification::NotificationService;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i32,
    pub actor_id: i32,
    pub kind: NotificationKind,
    pub listing_id: i32,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<NotificationModel> for NotificationResponse {
    fn from(n: NotificationModel) -> Self {
        Self {
            id: n.id,
            actor_id: n.actor_id,
            kind: n.kind,
            listing_id: n.listing_id,
            message: n.message,
            is_read: n.is_read,
            created_at: n.created_at.to_string(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Notifications, newest first", body = PaginatedResponse<NotificationResponse>),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let page = pagination.page.unwrap_or(1);
    let per_page = pagination.per_page.unwrap_or(20).min(100);

    let service = NotificationService::new(db);
    let (items, total) = service.list_for_user(user_id, page, per_page).await?;

    let items: Vec<NotificationResponse> =
        items.into_iter().map(NotificationResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Unread notification count", body = serde_json::Value),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "notifications"
)]
pub async fn unread_count(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = NotificationService::new(db);
    let count = service.unread_count(user_id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "unread": count })))
}

#[utoipa::path(
    put,
    path = "/api/v1/notifications/{id}/read",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = serde_json::Value),
        (status = 403, description = "Not the recipient", body = AppError),
        (status = 404, description = "Notification not found", body = AppError),
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = NotificationService::new(db);
    service.mark_read(id, user_id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "id": id })))
}

#[utoipa::path(
    put,
    path = "/api/v1/notifications/read-all",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "All notifications marked read", body = serde_json::Value),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "notifications"
)]
pub async fn mark_all_read(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = NotificationService::new(db);
    let updated = service.mark_all_read(user_id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "updated": updated })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/notifications",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "All notifications deleted", body = serde_json::Value),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "notifications"
)]
pub async fn delete_all(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = NotificationService::new(db);
    let deleted = service.delete_all(user_id).await?;

    Ok(ApiResponse::ok(serde_json::json!({ "deleted": deleted })))
}
