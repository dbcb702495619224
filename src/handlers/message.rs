use crate::error::{AppError, AppResult};
use crate::middleware::auth::parse_user_id;
use crate::middleware::AuthUser;
use crate::models::MessageModel;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::message::MessageService;
use crate::services::notification::NotificationService;
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
pub struct SendMessageRequest {
    /// Message body (1-5000 characters)
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: i32,
    pub sender_id: i32,
    pub recipient_id: i32,
    pub listing_id: i32,
    pub body: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<MessageModel> for MessageResponse {
    fn from(m: MessageModel) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            recipient_id: m.recipient_id,
            listing_id: m.listing_id,
            body: m.body,
            is_read: m.is_read,
            created_at: m.created_at.to_string(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/listings/{id}/messages",
    security(("jwt_token" = [])),
    request_body = SendMessageRequest,
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Message sent to listing owner", body = MessageResponse),
        (status = 400, description = "Cannot message your own listing", body = AppError),
        (status = 404, description = "Listing not found", body = AppError),
    ),
    tag = "messages"
)]
pub async fn send_message(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<SendMessageRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let user_id = parse_user_id(&auth_user)?;

    let notifications = NotificationService::new(db.clone());
    let service = MessageService::new(db);
    let saved = service
        .send(user_id, id, &payload.body, &notifications)
        .await?;

    Ok(ApiResponse::ok(MessageResponse::from(saved)))
}

#[utoipa::path(
    get,
    path = "/api/v1/messages",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Received messages, newest first", body = PaginatedResponse<MessageResponse>),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "messages"
)]
pub async fn inbox(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let page = pagination.page.unwrap_or(1);
    let per_page = pagination.per_page.unwrap_or(20).min(100);

    let service = MessageService::new(db);
    let (items, total) = service.inbox(user_id, page, per_page).await?;

    let items: Vec<MessageResponse> = items.into_iter().map(MessageResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}
