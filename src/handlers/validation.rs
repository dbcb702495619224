use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::services::validation::ValidationService;
use axum::{extract::Query, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmQuery {
    /// Listing ID from the emailed link
    pub id: i32,
    /// Opaque validation token from the emailed link
    pub token: String,
}

#[utoipa::path(
    get,
    path = "/validare-anunt",
    params(
        ("id" = i32, Query, description = "Listing ID"),
        ("token" = String, Query, description = "Validation token"),
    ),
    responses(
        (status = 200, description = "Listing activated", body = serde_json::Value),
        (status = 400, description = "Invalid or expired token", body = AppError),
    ),
    tag = "validation"
)]
pub async fn confirm_listing(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<ConfirmQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ValidationService::new(db);
    let slug = service.confirm(params.id, &params.token).await?;

    Ok(ApiResponse::with_message(
        serde_json::json!({ "slug": slug }),
        "Anuntul a fost activat.".to_string(),
    ))
}
