use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PingResponse {
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "testing",
    responses(
        (status = 200, description = "Server is healthy", body = String, content_type = "text/plain")
    )
)]
pub async fn health() -> &'static str {
    "Server is healthy"
}

#[utoipa::path(
    get,
    path = "/test",
    tag = "testing",
    responses(
        (status = 200, description = "Server is running", body = PingResponse)
    )
)]
pub async fn ping() -> impl IntoResponse {
    tracing::debug!("Test endpoint hit");
    Json(PingResponse {
        message: "Server is running!".to_string(),
    })
}
